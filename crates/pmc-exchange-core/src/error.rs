//! Error types for the core library.

use thiserror::Error;

/// Errors that can occur while extracting messages.
#[derive(Debug, Error)]
pub enum Error {
    /// EWS operation failed (authentication, discovery, or a request).
    #[error("EWS error: {0}")]
    Ews(#[from] pmc_exchange_ews::Error),

    /// A folder the queries depend on is absent or ambiguous.
    #[error("Expected exactly one {name} folder, found {found}")]
    MissingFolder {
        /// Folder display name that was searched for.
        name: String,
        /// Number of matches returned.
        found: usize,
    },

    /// Configuration file missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error, including writes to the output stream.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
