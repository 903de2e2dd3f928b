use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PagingError {
    #[error("page size must be at least 1")]
    ZeroPageSize,
}

/// Number of listing pages needed for `total_docs` at `page_size` rows per
/// page. A zero page size is a configuration error, never a silent divide.
pub fn page_count(total_docs: u64, page_size: u64) -> Result<u64, PagingError> {
    if page_size == 0 {
        return Err(PagingError::ZeroPageSize);
    }
    Ok(total_docs.div_ceil(page_size))
}
