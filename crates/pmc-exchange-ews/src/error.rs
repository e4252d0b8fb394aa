//! Error types for the EWS client.

use thiserror::Error;

/// Errors that can occur while talking to Exchange Web Services.
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Malformed XML in a request or response.
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Malformed XML attribute.
    #[error("XML attribute error: {0}")]
    XmlAttr(#[from] quick_xml::events::attributes::AttrError),

    /// URL parsing error.
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// The server rejected the credentials.
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// The EWS endpoint could not be discovered.
    #[error("Autodiscover failed: {0}")]
    Discovery(#[from] DiscoveryError),

    /// A URL that must be encrypted uses a plaintext scheme.
    #[error("Refusing non-https endpoint: {0}")]
    InsecureUrl(String),

    /// EWS returned `ResponseClass="Error"`.
    #[error("EWS error {code}: {message}")]
    Response {
        /// EWS response code (e.g. `ErrorFolderNotFound`).
        code: String,
        /// Human-readable message text.
        message: String,
    },

    /// The server answered with a SOAP fault.
    #[error("SOAP fault: {0}")]
    SoapFault(String),

    /// Response was well-formed XML but not what EWS should send.
    #[error("Protocol error: {0}")]
    Protocol(String),
}

impl Error {
    /// Creates a response error from an EWS code and message text.
    #[must_use]
    pub fn response(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Response {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// Reasons autodiscover gave up.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DiscoveryError {
    /// The account address has no usable domain part.
    #[error("invalid account address: {0}")]
    InvalidAddress(String),

    /// A redirect pointed at a non-https location.
    #[error("insecure redirect to {0}")]
    InsecureRedirect(String),

    /// Redirection limit reached.
    #[error("too many redirections (limit {0})")]
    TooManyRedirects(usize),

    /// Every candidate endpoint failed.
    #[error("no autodiscover endpoint answered for {0}")]
    NoEndpoint(String),
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
