//! # pmc-exchange-ews
//!
//! A small Exchange Web Services (EWS) client covering exactly what a
//! read-only extraction agent needs.
//!
//! ## Features
//!
//! - **Autodiscover (POX)**: resolves the EWS endpoint from an account
//!   address, following address and URL redirects but only to `https`
//! - **Folder lookup**: `FindFolder` with restrictions and indexed paging,
//!   `GetFolder` on distinguished folders
//! - **Item search**: `FindItem` with restrictions, returning a fixed
//!   projection (no bodies, no attachments)
//! - **TLS via rustls** through `reqwest`
//!
//! ## Quick Start
//!
//! ```ignore
//! use pmc_exchange_ews::{Credentials, ExchangeService, FolderRef, PageView, Traversal, WellKnownFolder};
//!
//! #[tokio::main]
//! async fn main() -> pmc_exchange_ews::Result<()> {
//!     let http = pmc_exchange_ews::http_client()?;
//!     let creds = Credentials::new("user@example.com", "password");
//!     let service = ExchangeService::autodiscover(http, "user@example.com", creds).await?;
//!
//!     let inbox = FolderRef::WellKnown(WellKnownFolder::Inbox);
//!     let page = service
//!         .find_folders(&inbox, Traversal::Deep, PageView::new(10), None)
//!         .await?;
//!     for folder in &page.entries {
//!         println!("{}", folder.display_name);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`autodiscover`]: endpoint discovery and its `https` gate
//! - [`soap`]: request encoding and response decoding
//! - [`types`]: identifiers, folders, items, restrictions and paging

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod autodiscover;
mod client;
mod error;
pub mod soap;
pub mod types;

pub use autodiscover::Autodiscover;
pub use client::{CONNECT_TIMEOUT, Credentials, ExchangeService, http_client};
pub use error::{DiscoveryError, Error, Result};
pub use types::{
    ExtendedProperty, FlagStatus, Folder, FolderId, FolderKind, FolderPage, FolderRef, Item,
    ItemId, ItemPage, MapiPropertyType, Page, PageView, PropertyPath, Restriction, Traversal,
    WellKnownFolder,
};
