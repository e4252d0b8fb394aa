//! The capability interface the pipeline runs against.
//!
//! Everything downstream of session bootstrap talks to the mailbox through
//! [`MailService`], so tests can drive the pipeline with synthetic pages.

use std::future::Future;

use pmc_exchange_ews::{
    ExchangeService, Folder, FolderPage, FolderRef, ItemPage, PageView, Restriction, Traversal,
    WellKnownFolder,
};

/// Read-only mailbox operations.
pub trait MailService {
    /// Searches for folders under `parent`, returning one page.
    fn find_folders(
        &self,
        parent: &FolderRef,
        traversal: Traversal,
        view: PageView,
        restriction: Option<&Restriction>,
    ) -> impl Future<Output = pmc_exchange_ews::Result<FolderPage>> + Send;

    /// Searches one folder for items matching `restriction`, returning one page.
    fn find_items(
        &self,
        parent: &FolderRef,
        view: PageView,
        restriction: &Restriction,
    ) -> impl Future<Output = pmc_exchange_ews::Result<ItemPage>> + Send;

    /// Binds to a well-known folder by role.
    fn bind_well_known_folder(
        &self,
        folder: WellKnownFolder,
    ) -> impl Future<Output = pmc_exchange_ews::Result<Folder>> + Send;
}

impl MailService for ExchangeService {
    async fn find_folders(
        &self,
        parent: &FolderRef,
        traversal: Traversal,
        view: PageView,
        restriction: Option<&Restriction>,
    ) -> pmc_exchange_ews::Result<FolderPage> {
        Self::find_folders(self, parent, traversal, view, restriction).await
    }

    async fn find_items(
        &self,
        parent: &FolderRef,
        view: PageView,
        restriction: &Restriction,
    ) -> pmc_exchange_ews::Result<ItemPage> {
        Self::find_items(self, parent, view, restriction).await
    }

    async fn bind_well_known_folder(
        &self,
        folder: WellKnownFolder,
    ) -> pmc_exchange_ews::Result<Folder> {
        self.get_folder(&FolderRef::WellKnown(folder)).await
    }
}
