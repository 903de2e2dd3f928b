use std::sync::Arc;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;

use normdoc_core::Card;

use crate::{FetchError, Fetcher};

/// Base64-encoded attachment payload ready to be copied onto a card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedAttachment {
    pub content: String,
    pub size: u64,
}

impl EncodedAttachment {
    /// Annotates the card with the encoded content and byte size.
    pub fn apply(self, card: &mut Card) {
        card.attachment_size = self.size;
        card.attachment_content = Some(self.content);
    }
}

/// Fetches a card's attachment binary and encodes it.
///
/// Loading is idempotent: fetching the same URL again yields the same
/// payload, which is what makes the card stage safe to retry.
pub struct AttachmentLoader {
    fetcher: Arc<dyn Fetcher>,
}

impl AttachmentLoader {
    pub fn new(fetcher: Arc<dyn Fetcher>) -> Self {
        Self { fetcher }
    }

    /// Returns `None` when the card has no attachment URL.
    pub async fn load(&self, card: &Card) -> Result<Option<EncodedAttachment>, FetchError> {
        let Some(url) = card.attachment_url.as_deref() else {
            return Ok(None);
        };
        let payload = self.fetcher.fetch(url).await?;
        Ok(Some(EncodedAttachment {
            content: BASE64.encode(&payload.bytes),
            size: payload.byte_len,
        }))
    }
}
