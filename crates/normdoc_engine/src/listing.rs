use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use url::Url;

use normdoc_core::{content_fingerprint, extract_fields, page_count, Card, PagingError};

static DOC_COUNT_SEL: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.documents-number").expect("doc count selector"));
static ROW_SEL: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.document-search-result").expect("row selector"));
static TITLE_SEL: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a.document-title").expect("title selector"));
static DOWNLOAD_SEL: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a.document-download").expect("download selector"));

/// Parsed view of one fetched listing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingPage {
    pub total_docs: u64,
    /// Result rows on this page; on the first page this is the page size
    /// the catalog paginates with.
    pub page_size: u64,
    /// `ceil(total_docs / page_size)`.
    pub page_count: u64,
    pub cards: Vec<Card>,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ListingError {
    #[error("document count element missing from listing page")]
    MissingDocCount,
    #[error("document count is not a number: {0:?}")]
    BadDocCount(String),
    #[error("base url is invalid: {0}")]
    BadBaseUrl(String),
    #[error(transparent)]
    Paging(#[from] PagingError),
}

/// Parses a listing page into counts and cards.
///
/// Every result row yields a card with absolute links, attachment filename
/// and extension, extracted title fields, and a content fingerprint. Rows
/// without a title link are malformed and dropped (they still count toward
/// the page size).
pub fn parse_listing(html: &str, base_url: &str) -> Result<ListingPage, ListingError> {
    let base = Url::parse(base_url).map_err(|err| ListingError::BadBaseUrl(err.to_string()))?;
    let doc = Html::parse_document(html);

    let count_text = doc
        .select(&DOC_COUNT_SEL)
        .next()
        .map(|node| node.text().collect::<String>())
        .ok_or(ListingError::MissingDocCount)?;
    let count_token = count_text.split_whitespace().next().unwrap_or_default();
    let total_docs = count_token
        .parse::<u64>()
        .map_err(|_| ListingError::BadDocCount(count_token.to_string()))?;

    let rows: Vec<_> = doc.select(&ROW_SEL).collect();
    let page_size = rows.len() as u64;
    let pages = page_count(total_docs, page_size)?;

    let mut cards = Vec::with_capacity(rows.len());
    for row in rows {
        let Some(title_link) = row.select(&TITLE_SEL).next() else {
            harvest_logging::harvest_debug!("listing row without title link, dropping");
            continue;
        };
        let title = title_link.text().collect::<String>().trim().to_string();
        let Some(href) = title_link.value().attr("href") else {
            harvest_logging::harvest_debug!("listing row title link without href, dropping");
            continue;
        };
        let Ok(link) = base.join(href) else {
            continue;
        };

        let mut card = Card {
            title: title.clone(),
            link: link.to_string(),
            ..Card::default()
        };

        if let Some(download) = row.select(&DOWNLOAD_SEL).next() {
            if let Some(attach_href) = download.value().attr("href") {
                if let Ok(attach_url) = base.join(attach_href) {
                    card.filename = attach_url
                        .path_segments()
                        .and_then(|segments| segments.last())
                        .unwrap_or_default()
                        .to_string();
                    card.extension = extension_of(&card.filename);
                    card.attachment_url = Some(attach_url.to_string());
                }
            }
        }

        card.apply_fields(extract_fields(&title));
        card.content_fingerprint = content_fingerprint(&card);
        cards.push(card);
    }

    Ok(ListingPage {
        total_docs,
        page_size,
        page_count: pages,
        cards,
    })
}

/// File extension including the leading dot, or empty when absent.
fn extension_of(filename: &str) -> String {
    match filename.rfind('.') {
        Some(0) | None => String::new(),
        Some(index) => filename[index..].to_string(),
    }
}
