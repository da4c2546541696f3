//! Error taxonomy for the core crate.
//!
//! Handlers convert each variant into a fixed user-facing reply; nothing
//! here ever escapes to the process level.

use thiserror::Error;

/// Errors raised by the document store implementations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// I/O error while persisting.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Unique-constraint violation on the named field.
    #[error("duplicate key: {0}")]
    DuplicateKey(&'static str),
}

/// Errors raised by `ChannelDirectory` operations.
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// A channel with the same chat id or username is already registered.
    #[error("channel already registered")]
    Duplicate,

    /// The handle could not be resolved to a chat on the platform.
    #[error("channel handle could not be resolved: {0}")]
    Unresolvable(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Errors raised by `MediaCatalog` operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The film code argument did not parse as an integer.
    #[error("film code must be an integer")]
    InvalidCode,

    /// A film with this url already exists.
    #[error("film url already registered")]
    DuplicateUrl,

    /// A film with this code already exists.
    #[error("film code already registered")]
    DuplicateCode,

    /// No film matches the given code.
    #[error("film not found")]
    NotFound,

    #[error(transparent)]
    Store(#[from] StoreError),
}
