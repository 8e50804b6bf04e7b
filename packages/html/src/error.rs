//! Error types for HTML conversion

use thiserror::Error;

/// Result type for conversion operations
pub type HtmlResult<T> = Result<T, HtmlError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HtmlError {
    #[error("Markup produced no blocks")]
    NoContent,

    #[error("Markup is {len} bytes, conversion limit is {limit}")]
    TooLarge { len: usize, limit: usize },
}
