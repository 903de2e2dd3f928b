use sha2::{Digest, Sha256};

use crate::card::Card;

/// Derives the dedup fingerprint over a card's stable fields.
///
/// Only fields known before attachment loading participate, so the
/// fingerprint is available as soon as the listing row has been parsed.
pub fn content_fingerprint(card: &Card) -> String {
    let mut hasher = Sha256::new();
    for field in [
        card.title.as_str(),
        card.link.as_str(),
        card.identifier.as_str(),
        card.effective_date.as_str(),
    ] {
        hasher.update(field.as_bytes());
        hasher.update([0u8]);
    }
    let digest = hasher.finalize();
    let mut hex = String::with_capacity(digest.len() * 2);
    for byte in digest.iter() {
        use std::fmt::Write;
        let _ = write!(&mut hex, "{byte:02x}");
    }
    hex
}
