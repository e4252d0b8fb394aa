//! # pmc-exchange-core
//!
//! Extraction logic for `pmc-exchange`: which folders to search, which
//! messages to pick, and how each becomes a line of JSON.
//!
//! This crate provides:
//! - **Configuration** - account credentials from a JSON file
//! - **Session bootstrap** - autodiscover or a pinned endpoint
//! - **Folder resolution** - `AllItems`, the Inbox subtree, and Junk
//! - **Filtered enumeration** - unread and flagged queries, paged to exhaustion
//! - **Deduplication** - one record per message per run
//! - **Record emission** - newline-delimited JSON, flushed per record
//!
//! The pipeline only sees the mailbox through [`MailService`], which is
//! implemented for [`pmc_exchange_ews::ExchangeService`].

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod config;
pub mod dedup;
mod error;
pub mod pipeline;
pub mod query;
pub mod record;
pub mod resolver;
pub mod service;
pub mod session;

pub use config::{Config, DEFAULT_CONFIG_FILE};
pub use dedup::Deduplicator;
pub use error::{Error, Result};
pub use pipeline::{QueryMode, RunSummary, run};
pub use record::{OutputRecord, RecordEmitter};
pub use service::MailService;
pub use session::connect;
