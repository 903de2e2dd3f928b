use serde::{Deserialize, Serialize};

use crate::retry::RetryPolicy;

/// Site-specific harvest configuration.
///
/// Everything the pipeline needs to know about the source catalog lives
/// here; the code itself is site-agnostic.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Absolute base for resolving relative links on listing pages.
    pub base_url: String,
    /// Listing root; page N is fetched from `{search_url}{N}`.
    pub search_url: String,
    /// Category tokens always dropped by the card filter.
    pub excluded_categories: Vec<String>,
    pub page_retry: RetryPolicy,
    pub card_retry: RetryPolicy,
    /// Dedicated proxies for attachment downloads, rotated round-robin.
    pub attachment_proxies: Vec<String>,
    /// Root directory for emitted records and run manifests.
    pub output_dir: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            search_url: String::new(),
            excluded_categories: vec![
                "Приказ".to_string(),
                "Письмо".to_string(),
                "СП".to_string(),
                "Изменение".to_string(),
            ],
            page_retry: RetryPolicy::for_pages(),
            card_retry: RetryPolicy::for_cards(),
            attachment_proxies: Vec::new(),
            output_dir: "./harvest-output".to_string(),
        }
    }
}

impl SiteConfig {
    /// URL of one listing page.
    pub fn page_url(&self, page: u64) -> String {
        format!("{}{}", self.search_url, page)
    }
}
