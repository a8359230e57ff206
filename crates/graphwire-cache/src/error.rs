//! Cache error types

use thiserror::Error;

/// Result type alias for cache operations
pub type CacheResult<T> = std::result::Result<T, CacheError>;

/// Cache-specific error types
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Lock error: {0}")]
    Lock(String),

    #[error("Cannot cache {0} without an id")]
    MissingId(graphwire_core::EntityKind),
}

impl From<CacheError> for graphwire_core::Error {
    fn from(err: CacheError) -> Self {
        match err {
            CacheError::MissingId(kind) => {
                graphwire_core::ValidationError::MissingId(kind).into()
            }
            other => graphwire_core::Error::Cache(other.to_string()),
        }
    }
}
