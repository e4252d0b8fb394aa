//! Configuration file loading.
//!
//! The configuration is a JSON object with the account credentials:
//!
//! ```json
//! {
//!   "username": "DOMAIN\\user",
//!   "password": "secret",
//!   "email": "user@example.com"
//! }
//! ```
//!
//! `ews_url` may be added to skip autodiscover.

use std::path::Path;

use serde::Deserialize;

use crate::error::{Error, Result};

/// Default configuration file, relative to the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "config.json";

/// Account configuration.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct Config {
    /// Logon name sent to the server.
    pub username: String,
    /// Password sent to the server.
    pub password: String,
    /// Account address used for autodiscover.
    pub email: String,
    /// Fixed EWS endpoint; when set, autodiscover is skipped.
    #[serde(default)]
    pub ews_url: Option<String>,
}

impl Config {
    /// Reads and validates the configuration file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the file cannot be read, is not valid
    /// JSON, or lacks a required key.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("cannot read {}: {e}", path.display())))?;
        Self::from_json(&text)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))
    }

    /// Parses and validates configuration from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or a required value is empty.
    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        for (key, value) in [
            ("username", &self.username),
            ("password", &self.password),
            ("email", &self.email),
        ] {
            if value.trim().is_empty() {
                return Err(Error::Config(format!("`{key}` must not be empty")));
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("email", &self.email)
            .field("ews_url", &self.ews_url)
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json() {
        let config = Config::from_json(
            r#"{"username": "alice", "password": "pw", "email": "alice@example.com"}"#,
        )
        .unwrap();
        assert_eq!(config.username, "alice");
        assert_eq!(config.email, "alice@example.com");
        assert!(config.ews_url.is_none());
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let config = Config::from_json(
            r#"{"username": "a", "password": "b", "email": "a@b.c", "ews_url": "https://x/EWS/Exchange.asmx", "extra": 1}"#,
        )
        .unwrap();
        assert_eq!(config.ews_url.as_deref(), Some("https://x/EWS/Exchange.asmx"));
    }

    #[test]
    fn test_missing_key() {
        assert!(matches!(
            Config::from_json(r#"{"username": "a", "password": "b"}"#),
            Err(Error::Serde(_))
        ));
    }

    #[test]
    fn test_empty_value() {
        assert!(matches!(
            Config::from_json(r#"{"username": "a", "password": "", "email": "a@b.c"}"#),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load("/nonexistent/pmc-exchange/config.json").unwrap_err();
        assert!(err.to_string().contains("cannot read"));
    }

    #[test]
    fn test_debug_redacts_password() {
        let config = Config::from_json(
            r#"{"username": "a", "password": "hunter2", "email": "a@b.c"}"#,
        )
        .unwrap();
        assert!(!format!("{config:?}").contains("hunter2"));
    }
}
