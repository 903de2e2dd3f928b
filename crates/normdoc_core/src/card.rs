use std::collections::BTreeSet;

use crate::extract::ExtractedFields;

/// Known document categories on the source catalog.
///
/// The category is always the first whitespace-delimited token of a listing
/// title; tokens outside the known set classify as `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocCategory {
    Order,
    Letter,
    SpecRule,
    Amendment,
    Other,
}

impl DocCategory {
    pub fn from_token(token: &str) -> Self {
        match token {
            "Приказ" => DocCategory::Order,
            "Письмо" => DocCategory::Letter,
            "СП" => DocCategory::SpecRule,
            "Изменение" => DocCategory::Amendment,
            _ => DocCategory::Other,
        }
    }
}

/// One document listing entry.
///
/// Extracted fields default to empty strings / empty sets rather than
/// options so downstream record serialization stays uniform.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Card {
    pub title: String,
    pub link: String,
    pub attachment_url: Option<String>,
    pub filename: String,
    pub extension: String,
    pub category: String,
    pub identifier: String,
    pub effective_date: String,
    pub related_rule: String,
    pub issuing_bodies: BTreeSet<String>,
    pub content_fingerprint: String,
    /// Base64-encoded attachment payload, populated by the attachment loader.
    pub attachment_content: Option<String>,
    pub attachment_size: u64,
}

impl Card {
    /// Copies the extracted title attributes onto the card.
    pub fn apply_fields(&mut self, fields: ExtractedFields) {
        self.category = fields.category;
        self.identifier = fields.identifier;
        self.effective_date = fields.effective_date;
        self.related_rule = fields.related_rule;
        self.issuing_bodies = fields.issuing_bodies;
    }

    pub fn category_kind(&self) -> DocCategory {
        DocCategory::from_token(&self.category)
    }
}
