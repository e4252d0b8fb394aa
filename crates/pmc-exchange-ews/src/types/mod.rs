//! Core EWS types.
//!
//! Identifiers, folders, items, search restrictions and paging views.
//! Only the subset of the EWS schema needed for folder lookup and
//! paged item search is modelled.

#![allow(clippy::missing_const_for_fn)]

mod folder;
mod identifiers;
mod item;
mod restriction;
mod view;

pub use folder::{Folder, FolderKind};
pub use identifiers::{FolderId, FolderRef, ItemId, WellKnownFolder};
pub use item::{FlagStatus, Item};
pub use restriction::{ExtendedProperty, MapiPropertyType, PropertyPath, Restriction};
pub use view::{FolderPage, ItemPage, Page, PageView, Traversal};
