//! SOAP envelopes for the EWS operations we use.
//!
//! - [`request`]: builds `FindFolder`, `GetFolder` and `FindItem` envelopes
//! - [`response`]: decodes the matching responses into typed pages
//! - [`XmlNode`]: the small element tree both sides are tested against

pub mod request;
pub mod response;
mod tree;

pub use tree::XmlNode;
