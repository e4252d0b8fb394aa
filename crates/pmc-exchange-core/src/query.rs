//! Filtered item enumeration.
//!
//! Two queries, each a conjunction of predicates:
//!
//! - **unread**: `IsRead == false AND ItemClass == "IPM.Note"`, run folder by
//!   folder over the Inbox subtree
//! - **flagged**: `Exists(PidTagFlagStatus) AND ItemClass == "IPM.Note" AND
//!   ParentFolderId != Junk`, run once over the `AllItems` search folder
//!
//! `PidTagFlagStatus` exists on an item once it has ever been flagged. The
//! schema's own `item:Flag` cannot be used in a restriction.

use pmc_exchange_ews::{
    ExtendedProperty, FolderId, FolderRef, Item, PageView, PropertyPath, Restriction,
};
use tracing::debug;

use crate::error::Result;
use crate::service::MailService;

/// Items requested per `FindItem` page.
pub const ITEM_PAGE_SIZE: u32 = 1000;

/// Item class of ordinary e-mail messages.
pub const MESSAGE_CLASS: &str = "IPM.Note";

/// Restriction for unread messages.
#[must_use]
pub fn unread_restriction() -> Restriction {
    Restriction::and([
        Restriction::is_equal_to(PropertyPath::IS_READ, "false"),
        Restriction::is_equal_to(PropertyPath::ITEM_CLASS, MESSAGE_CLASS),
    ])
}

/// Restriction for flagged messages outside the Junk folder.
#[must_use]
pub fn flagged_restriction(junk: &FolderId) -> Restriction {
    Restriction::and([
        Restriction::Exists(PropertyPath::Extended(ExtendedProperty::FLAG_STATUS)),
        Restriction::is_equal_to(PropertyPath::ITEM_CLASS, MESSAGE_CLASS),
        Restriction::is_not_equal_to(PropertyPath::PARENT_FOLDER_ID, junk.as_str()),
    ])
}

/// Pages through every item in `folder` matching `restriction`, handing each
/// to `on_item` in service order. Returns the number of items seen.
///
/// Pages are fetched strictly one after another. After each page the next
/// offset is the one the service reported, or 0 when it reported none;
/// enumeration stops once the service says nothing more is available.
///
/// # Errors
///
/// Returns the first error from the service or from `on_item`. Items
/// already handed over stay handed over.
pub async fn drain<S, F>(
    service: &S,
    folder: &FolderRef,
    restriction: &Restriction,
    page_size: u32,
    mut on_item: F,
) -> Result<u64>
where
    S: MailService,
    F: FnMut(Item) -> Result<()>,
{
    let mut view = PageView::new(page_size);
    let mut seen = 0;

    loop {
        let page = service.find_items(folder, view, restriction).await?;
        let next = page.continuation();
        debug!(
            offset = view.offset,
            items = page.entries.len(),
            more = page.more_available,
            "Received item page"
        );

        for item in page.entries {
            on_item(item)?;
            seen += 1;
        }

        match next {
            Some(offset) => view = view.at(offset),
            None => return Ok(seen),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unread_restriction_shape() {
        let Restriction::And(parts) = unread_restriction() else {
            panic!("Expected And");
        };
        assert_eq!(
            parts,
            vec![
                Restriction::IsEqualTo(PropertyPath::IS_READ, "false".to_string()),
                Restriction::IsEqualTo(PropertyPath::ITEM_CLASS, "IPM.Note".to_string()),
            ]
        );
    }

    #[test]
    fn test_flagged_restriction_excludes_junk() {
        let Restriction::And(parts) = flagged_restriction(&FolderId::new("junk-1")) else {
            panic!("Expected And");
        };
        assert_eq!(parts.len(), 3);
        assert_eq!(
            parts[0],
            Restriction::Exists(PropertyPath::Extended(ExtendedProperty::FLAG_STATUS))
        );
        assert_eq!(
            parts[2],
            Restriction::IsNotEqualTo(PropertyPath::PARENT_FOLDER_ID, "junk-1".to_string())
        );
    }
}
