//! Theme engine error types

use thiserror::Error;

use crate::remote::RemoteError;

/// Errors from theme operations that report failure to the caller
#[derive(Error, Debug)]
pub enum ThemeError {
    #[error(transparent)]
    Remote(#[from] RemoteError),

    /// Serializing or parsing theme JSON failed
    #[error("theme serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// An interchange document had neither a config nor tokens
    #[error("theme document contains neither config nor tokens")]
    EmptyImport,
}

/// Result type for theme operations
pub type Result<T> = std::result::Result<T, ThemeError>;
