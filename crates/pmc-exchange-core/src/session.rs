//! Session bootstrap: from configuration to an authenticated EWS handle.

use pmc_exchange_ews::{Credentials, ExchangeService, http_client};
use tracing::info;

use crate::config::Config;
use crate::error::Result;

/// Builds an [`ExchangeService`] for the configured account.
///
/// Uses `ews_url` when configured, otherwise runs autodiscover on `email`.
/// Either way the endpoint must be `https`.
///
/// # Errors
///
/// Returns an authentication or discovery error. Neither is retried.
pub async fn connect(config: &Config) -> Result<ExchangeService> {
    let http = http_client()?;
    let credentials = Credentials::new(&config.username, &config.password);

    let service = match &config.ews_url {
        Some(url) => {
            info!(%url, "Using configured EWS endpoint");
            ExchangeService::with_url(http, url, credentials)?
        }
        None => ExchangeService::autodiscover(http, &config.email, credentials).await?,
    };
    Ok(service)
}
