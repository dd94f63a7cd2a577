//! Mapping document errors.

use thiserror::Error;

/// Errors raised while loading or saving a mapping document.
#[derive(Debug, Error)]
pub enum Error {
    /// Reading or writing the document failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Deserialization failed.
    #[error("deserialization error: {0}")]
    Deserialization(String),
}
