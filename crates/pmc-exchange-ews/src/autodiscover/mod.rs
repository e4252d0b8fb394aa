//! Autodiscover: resolving the EWS endpoint from an account address.
//!
//! Candidates are tried in order:
//!
//! 1. `https://{domain}/autodiscover/autodiscover.xml`
//! 2. `https://autodiscover.{domain}/autodiscover/autodiscover.xml`
//! 3. an unauthenticated GET of `http://autodiscover.{domain}/...`, used
//!    only for the redirect it may answer with
//!
//! Every redirect target, whether from an HTTP 3xx or from a
//! `redirectUrl` action, must be `https`. A plaintext target aborts
//! discovery; it is never skipped over.

pub mod pox;

use std::collections::VecDeque;

use reqwest::StatusCode;
use reqwest::header::{CONTENT_TYPE, LOCATION};
use tracing::{debug, info, warn};
use url::Url;

use crate::client::Credentials;
use crate::error::{DiscoveryError, Error, Result};
use pox::PoxResponse;

/// Maximum number of redirections (address or URL) before giving up.
pub const MAX_REDIRECTS: usize = 10;

const AUTODISCOVER_PATH: &str = "/autodiscover/autodiscover.xml";

/// Returns the domain part of an account address.
///
/// # Errors
///
/// Returns [`DiscoveryError::InvalidAddress`] if there is no non-empty
/// domain after the last `@`.
pub fn domain_of(email: &str) -> Result<&str> {
    email
        .rsplit_once('@')
        .map(|(_, domain)| domain.trim())
        .filter(|domain| !domain.is_empty() && !domain.contains('/'))
        .ok_or_else(|| DiscoveryError::InvalidAddress(email.to_string()).into())
}

/// Returns the encrypted candidate endpoints for a domain, in order.
///
/// # Errors
///
/// Returns an error if the domain does not form a valid URL.
pub fn candidates(domain: &str) -> Result<Vec<Url>> {
    Ok(vec![
        Url::parse(&format!("https://{domain}{AUTODISCOVER_PATH}"))?,
        Url::parse(&format!("https://autodiscover.{domain}{AUTODISCOVER_PATH}"))?,
    ])
}

/// Returns the plaintext probe URL, used only to look for a redirect.
///
/// # Errors
///
/// Returns an error if the domain does not form a valid URL.
pub fn plaintext_probe(domain: &str) -> Result<Url> {
    Ok(Url::parse(&format!(
        "http://autodiscover.{domain}{AUTODISCOVER_PATH}"
    ))?)
}

/// Resolves a redirect `location` against `base` and accepts it only if
/// the result is `https`.
///
/// # Errors
///
/// Returns [`DiscoveryError::InsecureRedirect`] for any other scheme.
pub fn validate_redirect(base: &Url, location: &str) -> Result<Url> {
    let target = base.join(location)?;
    if target.scheme() == "https" {
        Ok(target)
    } else {
        Err(DiscoveryError::InsecureRedirect(target.to_string()).into())
    }
}

/// Parses `url` and requires the `https` scheme.
///
/// # Errors
///
/// Returns [`Error::InsecureUrl`] for any other scheme.
pub fn require_https(url: &str) -> Result<Url> {
    let parsed = Url::parse(url)?;
    if parsed.scheme() == "https" {
        Ok(parsed)
    } else {
        Err(Error::InsecureUrl(url.to_string()))
    }
}

/// Errors that end discovery immediately instead of moving to the next
/// candidate.
const fn is_fatal(error: &Error) -> bool {
    matches!(
        error,
        Error::Authentication(_) | Error::Discovery(_) | Error::InsecureUrl(_)
    )
}

/// Where to look for one account domain.
struct Endpoints {
    candidates: Vec<Url>,
    probe: Url,
}

impl Endpoints {
    fn for_domain(domain: &str) -> Result<Self> {
        Ok(Self {
            candidates: candidates(domain)?,
            probe: plaintext_probe(domain)?,
        })
    }
}

/// Outcome of asking one autodiscover endpoint.
enum Answer {
    Pox(PoxResponse),
    Redirect(Url),
}

/// Autodiscover client.
#[derive(Debug, Clone)]
pub struct Autodiscover {
    http: reqwest::Client,
    credentials: Credentials,
}

impl Autodiscover {
    /// Creates a client that authenticates with `credentials`.
    ///
    /// `http` must not follow redirects on its own; see
    /// [`crate::client::http_client`].
    #[must_use]
    pub const fn new(http: reqwest::Client, credentials: Credentials) -> Self {
        Self { http, credentials }
    }

    /// Resolves the EWS URL for `email`.
    ///
    /// # Errors
    ///
    /// - [`Error::Authentication`] when an endpoint refuses the credentials
    /// - [`Error::Discovery`] on an insecure redirect, too many
    ///   redirections, or when no candidate answers
    /// - [`Error::InsecureUrl`] when the server hands out a plaintext EWS URL
    pub async fn discover(&self, email: &str) -> Result<Url> {
        self.discover_with(email, Endpoints::for_domain).await
    }

    async fn discover_with<F>(&self, email: &str, endpoints: F) -> Result<Url>
    where
        F: Fn(&str) -> Result<Endpoints>,
    {
        let mut address = email.to_string();
        let mut redirects = 0;

        'address: loop {
            let Endpoints { candidates, probe } = endpoints(domain_of(&address)?)?;
            let mut queue: VecDeque<Url> = candidates.into();
            let mut probe = Some(probe);
            info!(%address, "Running autodiscover");

            loop {
                let Some(url) = queue.pop_front() else {
                    if let Some(probe_url) = probe.take()
                        && let Some(target) = self.probe(probe_url).await?
                    {
                        queue.push_back(target);
                        continue;
                    }
                    return Err(DiscoveryError::NoEndpoint(address).into());
                };

                match self.ask(&url, &address).await {
                    Ok(Answer::Pox(PoxResponse::Settings { ews_url })) => {
                        let ews_url = require_https(&ews_url)?;
                        info!(%ews_url, "Autodiscover succeeded");
                        return Ok(ews_url);
                    }
                    Ok(Answer::Pox(PoxResponse::RedirectAddr(next))) => {
                        redirects = bump(redirects)?;
                        debug!(from = %address, to = %next, "Autodiscover address redirect");
                        address = next;
                        continue 'address;
                    }
                    Ok(Answer::Pox(PoxResponse::RedirectUrl(next))) => {
                        redirects = bump(redirects)?;
                        queue.push_front(validate_redirect(&url, &next)?);
                    }
                    Ok(Answer::Redirect(next)) => {
                        redirects = bump(redirects)?;
                        queue.push_front(next);
                    }
                    Err(e) if is_fatal(&e) => return Err(e),
                    Err(e) => warn!(%url, error = %e, "Autodiscover candidate failed"),
                }
            }
        }
    }

    /// POSTs the autodiscover request to one endpoint.
    async fn ask(&self, url: &Url, address: &str) -> Result<Answer> {
        debug!(%url, "Querying autodiscover endpoint");
        let response = self
            .http
            .post(url.clone())
            .basic_auth(&self.credentials.username, Some(&self.credentials.password))
            .header(CONTENT_TYPE, "text/xml; charset=utf-8")
            .body(pox::request(address)?)
            .send()
            .await?;

        let status = response.status();
        if status.is_redirection() {
            let location = location(&response)?;
            return Ok(Answer::Redirect(validate_redirect(url, &location)?));
        }
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(Error::Authentication(format!("{url} answered {status}")));
        }
        if !status.is_success() {
            return Err(Error::Protocol(format!("{url} answered {status}")));
        }

        let body = response.text().await?;
        Ok(Answer::Pox(pox::parse(&body)?))
    }

    /// Plaintext GET that is only trusted for a redirect to `https`.
    ///
    /// No credentials or request body are sent.
    async fn probe(&self, url: Url) -> Result<Option<Url>> {
        debug!(%url, "Probing for autodiscover redirect");
        let response = match self.http.get(url.clone()).send().await {
            Ok(response) => response,
            Err(e) => {
                debug!(%url, error = %e, "Redirect probe failed");
                return Ok(None);
            }
        };

        if !response.status().is_redirection() {
            return Ok(None);
        }
        let location = location(&response)?;
        validate_redirect(&url, &location).map(Some)
    }
}

fn bump(redirects: usize) -> Result<usize> {
    let redirects = redirects + 1;
    if redirects > MAX_REDIRECTS {
        return Err(DiscoveryError::TooManyRedirects(MAX_REDIRECTS).into());
    }
    Ok(redirects)
}

fn location(response: &reqwest::Response) -> Result<String> {
    response
        .headers()
        .get(LOCATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .ok_or_else(|| Error::Protocol(format!("{} redirect without Location", response.status())))
}
