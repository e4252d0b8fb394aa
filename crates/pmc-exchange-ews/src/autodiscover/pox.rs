//! Plain-old-XML autodiscover payloads (`autodiscover.xml`).

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesText, Event};

use crate::error::{Error, Result};
use crate::soap::XmlNode;

const REQUEST_NS: &str =
    "http://schemas.microsoft.com/exchange/autodiscover/outlook/requestschema/2006";
const RESPONSE_SCHEMA: &str =
    "http://schemas.microsoft.com/exchange/autodiscover/outlook/responseschema/2006a";

/// What an autodiscover server told us to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PoxResponse {
    /// Final answer: the EWS endpoint (not yet validated).
    Settings {
        /// `EwsUrl` of the preferred protocol block.
        ews_url: String,
    },
    /// Start over with a different account address.
    RedirectAddr(String),
    /// Ask another autodiscover URL.
    RedirectUrl(String),
}

/// Encodes the autodiscover request for `email`.
///
/// # Errors
///
/// Returns an error if XML serialization fails.
pub fn request(email: &str) -> Result<String> {
    let mut writer = Writer::new(Vec::new());
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
    writer
        .create_element("Autodiscover")
        .with_attribute(("xmlns", REQUEST_NS))
        .write_inner_content(|w| {
            w.create_element("Request").write_inner_content(|w| {
                w.create_element("EMailAddress")
                    .write_text_content(BytesText::new(email))?;
                w.create_element("AcceptableResponseSchema")
                    .write_text_content(BytesText::new(RESPONSE_SCHEMA))?;
                Ok::<(), quick_xml::Error>(())
            })?;
            Ok::<(), quick_xml::Error>(())
        })?;

    String::from_utf8(writer.into_inner())
        .map_err(|e| Error::Protocol(format!("request is not UTF-8: {e}")))
}

/// Decodes an autodiscover response.
///
/// Prefers the `EXCH` (internal) protocol block over `EXPR` (external),
/// matching how Outlook picks an endpoint.
///
/// # Errors
///
/// Returns an error when the server reports an error or the response
/// carries neither settings nor a redirect.
pub fn parse(xml: &str) -> Result<PoxResponse> {
    let root = XmlNode::parse(xml)?;
    let response = root
        .child("Response")
        .ok_or_else(|| Error::Protocol("autodiscover response without Response".to_string()))?;

    if let Some(error) = response.child("Error") {
        return Err(Error::response(
            error.child_value("ErrorCode").unwrap_or("Unknown"),
            error.child_text("Message").unwrap_or_default(),
        ));
    }

    let account = response
        .child("Account")
        .ok_or_else(|| Error::Protocol("autodiscover response without Account".to_string()))?;

    match account.child_value("Action").unwrap_or("settings") {
        "redirectAddr" => account
            .child_value("RedirectAddr")
            .map(|a| PoxResponse::RedirectAddr(a.to_string()))
            .ok_or_else(|| Error::Protocol("redirectAddr without RedirectAddr".to_string())),
        "redirectUrl" => account
            .child_value("RedirectUrl")
            .map(|u| PoxResponse::RedirectUrl(u.to_string()))
            .ok_or_else(|| Error::Protocol("redirectUrl without RedirectUrl".to_string())),
        _ => {
            let ews_url = ["EXCH", "EXPR"]
                .iter()
                .find_map(|kind| {
                    account
                        .children_named("Protocol")
                        .find(|p| p.child_value("Type") == Some(*kind))
                        .and_then(|p| p.child_value("EwsUrl"))
                })
                .ok_or_else(|| Error::Protocol("autodiscover settings without EwsUrl".to_string()))?;
            Ok(PoxResponse::Settings {
                ews_url: ews_url.to_string(),
            })
        }
    }
}
