//! Folder resolution: the scopes the item queries run over.

use pmc_exchange_ews::{
    ExtendedProperty, Folder, FolderRef, PageView, PropertyPath, Restriction, Traversal,
    WellKnownFolder,
};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::service::MailService;

/// Display name of Outlook's search folder spanning the whole mailbox.
pub const ALL_ITEMS_NAME: &str = "AllItems";

/// `PidTagFolderType` value for search folders.
pub const SEARCH_FOLDER_TYPE: &str = "2";

/// Folders requested per `FindFolder` page.
pub const FOLDER_PAGE_SIZE: u32 = 10;

/// Finds the `AllItems` search folder under the mailbox root.
///
/// # Errors
///
/// Returns [`Error::MissingFolder`] unless exactly one folder matches.
pub async fn all_items<S: MailService>(service: &S) -> Result<Folder> {
    let restriction = Restriction::and([
        Restriction::is_equal_to(
            PropertyPath::Extended(ExtendedProperty::FOLDER_TYPE),
            SEARCH_FOLDER_TYPE,
        ),
        Restriction::is_equal_to(PropertyPath::FOLDER_DISPLAY_NAME, ALL_ITEMS_NAME),
    ]);

    let page = service
        .find_folders(
            &FolderRef::WellKnown(WellKnownFolder::Root),
            Traversal::Shallow,
            PageView::new(FOLDER_PAGE_SIZE),
            Some(&restriction),
        )
        .await?;

    let mut folders = page.entries;
    if folders.len() != 1 {
        return Err(Error::MissingFolder {
            name: ALL_ITEMS_NAME.to_string(),
            found: folders.len(),
        });
    }
    let folder = folders.remove(0);
    debug!(id = %folder.id, "Resolved AllItems search folder");
    Ok(folder)
}

/// Returns the Inbox followed by every folder beneath it, depth unbounded,
/// in the order the service lists them.
///
/// # Errors
///
/// Returns an error if the Inbox cannot be bound or a page request fails.
pub async fn inbox_subtree<S: MailService>(service: &S) -> Result<Vec<Folder>> {
    let inbox = service
        .bind_well_known_folder(WellKnownFolder::Inbox)
        .await?;
    let parent = FolderRef::Id(inbox.id.clone());
    let mut folders = vec![inbox];

    let mut view = PageView::new(FOLDER_PAGE_SIZE);
    loop {
        let page = service
            .find_folders(&parent, Traversal::Deep, view, None)
            .await?;
        let next = page.continuation();
        folders.extend(page.entries);
        match next {
            Some(offset) => view = view.at(offset),
            None => break,
        }
    }

    info!(folders = folders.len(), "Resolved Inbox subtree");
    Ok(folders)
}

/// Binds the Junk E-mail folder.
///
/// # Errors
///
/// Returns an error if the folder cannot be bound.
pub async fn junk<S: MailService>(service: &S) -> Result<Folder> {
    let folder = service
        .bind_well_known_folder(WellKnownFolder::JunkEmail)
        .await?;
    debug!(id = %folder.id, "Resolved Junk folder");
    Ok(folder)
}
