//! Paging views and paged results.

use super::{Folder, Item};

/// Folder hierarchy traversal for `FindFolder`/`FindItem`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Traversal {
    /// Direct children only.
    #[default]
    Shallow,
    /// Whole subtree.
    Deep,
}

impl Traversal {
    /// Returns the `Traversal` attribute value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Shallow => "Shallow",
            Self::Deep => "Deep",
        }
    }
}

/// Indexed page view: `page_size` entries starting at `offset`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageView {
    /// Maximum entries per page (`MaxEntriesReturned`).
    pub page_size: u32,
    /// Zero-based offset from the beginning.
    pub offset: u32,
}

impl PageView {
    /// Creates a view for the first page.
    #[must_use]
    pub const fn new(page_size: u32) -> Self {
        Self {
            page_size,
            offset: 0,
        }
    }

    /// Returns a view positioned at `offset`.
    #[must_use]
    pub const fn at(self, offset: u32) -> Self {
        Self {
            page_size: self.page_size,
            offset,
        }
    }
}

/// One page of a paged search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    /// Entries on this page, in server order.
    pub entries: Vec<T>,
    /// True when the server has entries past this page.
    pub more_available: bool,
    /// Offset of the next page, when the server supplied one.
    pub next_offset: Option<u32>,
    /// Total entries in the view, if reported.
    pub total: Option<u32>,
}

impl<T> Page<T> {
    /// A final page holding `entries`.
    #[must_use]
    pub fn last(entries: Vec<T>) -> Self {
        Self {
            entries,
            more_available: false,
            next_offset: None,
            total: None,
        }
    }

    /// A page followed by more entries starting at `next_offset`.
    #[must_use]
    pub fn more(entries: Vec<T>, next_offset: u32) -> Self {
        Self {
            entries,
            more_available: true,
            next_offset: Some(next_offset),
            total: None,
        }
    }

    /// Offset to request next, or `None` when the search is exhausted.
    ///
    /// A page that reports more entries without an offset restarts at 0.
    #[must_use]
    pub fn continuation(&self) -> Option<u32> {
        self.more_available.then(|| self.next_offset.unwrap_or(0))
    }
}

/// Page of folders.
pub type FolderPage = Page<Folder>;

/// Page of items.
pub type ItemPage = Page<Item>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_continuation() {
        assert_eq!(Page::<u8>::last(vec![]).continuation(), None);
        assert_eq!(Page::<u8>::more(vec![1], 10).continuation(), Some(10));

        let no_offset = Page::<u8> {
            entries: vec![],
            more_available: true,
            next_offset: None,
            total: None,
        };
        assert_eq!(no_offset.continuation(), Some(0));
    }

    #[test]
    fn test_page_view_at() {
        let view = PageView::new(1000).at(2000);
        assert_eq!(view.page_size, 1000);
        assert_eq!(view.offset, 2000);
    }
}
