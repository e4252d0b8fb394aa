//! EWS client bound to one endpoint and one set of credentials.

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::header::CONTENT_TYPE;
use reqwest::redirect::Policy;
use tracing::{debug, trace};
use url::Url;

use crate::autodiscover::{Autodiscover, require_https};
use crate::error::{Error, Result};
use crate::soap::{request, response};
use crate::types::{Folder, FolderPage, FolderRef, ItemPage, PageView, Restriction, Traversal};

/// Default connect timeout for all requests.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Username and password sent with HTTP basic authentication.
#[derive(Clone)]
pub struct Credentials {
    /// Logon name (UPN or `DOMAIN\user`).
    pub username: String,
    /// Password.
    pub password: String,
}

impl Credentials {
    /// Creates credentials.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Builds the HTTP client shared by autodiscover and EWS calls.
///
/// Redirects are never followed automatically: autodiscover inspects each
/// one, and an EWS endpoint has no business redirecting a SOAP POST.
///
/// # Errors
///
/// Returns an error if the TLS backend cannot be initialised.
pub fn http_client() -> Result<reqwest::Client> {
    Ok(reqwest::Client::builder()
        .redirect(Policy::none())
        .connect_timeout(CONNECT_TIMEOUT)
        .user_agent(concat!("pmc-exchange/", env!("CARGO_PKG_VERSION")))
        .build()?)
}

/// Authenticated handle to an EWS endpoint.
#[derive(Debug, Clone)]
pub struct ExchangeService {
    http: reqwest::Client,
    url: Url,
    credentials: Credentials,
}

impl ExchangeService {
    /// Binds to a known EWS URL, which must be `https`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InsecureUrl`] for a plaintext URL.
    pub fn with_url(http: reqwest::Client, url: &str, credentials: Credentials) -> Result<Self> {
        Ok(Self {
            http,
            url: require_https(url)?,
            credentials,
        })
    }

    /// Runs autodiscover for `email` and binds to the endpoint it returns.
    ///
    /// # Errors
    ///
    /// Returns an authentication or discovery error; see
    /// [`Autodiscover::discover`].
    pub async fn autodiscover(
        http: reqwest::Client,
        email: &str,
        credentials: Credentials,
    ) -> Result<Self> {
        let url = Autodiscover::new(http.clone(), credentials.clone())
            .discover(email)
            .await?;
        Ok(Self {
            http,
            url,
            credentials,
        })
    }

    /// Returns the EWS endpoint.
    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.url
    }

    /// `FindFolder`: one page of folders under `parent`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or EWS reports an error.
    pub async fn find_folders(
        &self,
        parent: &FolderRef,
        traversal: Traversal,
        view: PageView,
        restriction: Option<&Restriction>,
    ) -> Result<FolderPage> {
        let body = request::find_folder(parent, traversal, view, restriction)?;
        let page = response::find_folder(&self.call("FindFolder", body).await?)?;
        debug!(
            folders = page.entries.len(),
            offset = view.offset,
            total = ?page.total,
            more = page.more_available,
            "FindFolder page"
        );
        Ok(page)
    }

    /// `GetFolder`: binds to a single folder.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the folder does not exist.
    pub async fn get_folder(&self, target: &FolderRef) -> Result<Folder> {
        let body = request::get_folder(target)?;
        response::get_folder(&self.call("GetFolder", body).await?)
    }

    /// `FindItem`: one page of items in `parent` matching `restriction`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or EWS reports an error.
    pub async fn find_items(
        &self,
        parent: &FolderRef,
        view: PageView,
        restriction: &Restriction,
    ) -> Result<ItemPage> {
        let body = request::find_item(parent, view, restriction)?;
        let page = response::find_item(&self.call("FindItem", body).await?)?;
        debug!(
            items = page.entries.len(),
            offset = view.offset,
            total = ?page.total,
            more = page.more_available,
            "FindItem page"
        );
        Ok(page)
    }

    /// POSTs a SOAP envelope and returns the response body.
    ///
    /// EWS reports faults with HTTP 500 and a SOAP body, so a 500 is
    /// handed to the decoder rather than treated as transport failure.
    async fn call(&self, operation: &str, body: String) -> Result<String> {
        trace!(operation, %body, "EWS request");
        let response = self
            .http
            .post(self.url.clone())
            .basic_auth(&self.credentials.username, Some(&self.credentials.password))
            .header(CONTENT_TYPE, "text/xml; charset=utf-8")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(Error::Authentication(format!(
                "{operation} rejected with {status}"
            )));
        }
        if !status.is_success() && status != StatusCode::INTERNAL_SERVER_ERROR {
            return Err(Error::Protocol(format!("{operation} answered {status}")));
        }

        let text = response.text().await?;
        trace!(operation, body = %text, "EWS response");
        Ok(text)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_debug_redacts_password() {
        let creds = Credentials::new("alice", "hunter2");
        let shown = format!("{creds:?}");
        assert!(shown.contains("alice"));
        assert!(!shown.contains("hunter2"));
    }

    #[test]
    fn test_with_url_requires_https() {
        let http = http_client().unwrap();
        let creds = Credentials::new("a", "b");
        assert!(
            ExchangeService::with_url(http.clone(), "https://mail.example.com/EWS/Exchange.asmx", creds.clone())
                .is_ok()
        );
        assert!(matches!(
            ExchangeService::with_url(http, "http://mail.example.com/EWS/Exchange.asmx", creds),
            Err(Error::InsecureUrl(_))
        ));
    }
}
