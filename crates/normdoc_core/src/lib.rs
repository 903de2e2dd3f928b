//! Normdoc core: pure catalog domain logic, no I/O.
mod card;
mod extract;
mod filter;
mod fingerprint;
mod paging;
mod tables;

pub use card::{Card, DocCategory};
pub use extract::{extract_fields, ExtractedFields};
pub use filter::{filter_cards, FilterOutcome};
pub use fingerprint::content_fingerprint;
pub use paging::{page_count, PagingError};
pub use tables::{issuing_bodies_in, month_number};
