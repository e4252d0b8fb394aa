//! Folder types.

use super::FolderId;

/// Kind of folder, taken from the element name in EWS responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FolderKind {
    /// Plain mail folder (`t:Folder`).
    Generic,
    /// Saved-query folder (`t:SearchFolder`).
    Search,
    /// Calendar folder.
    Calendar,
    /// Contacts folder.
    Contacts,
    /// Tasks folder.
    Tasks,
}

impl FolderKind {
    /// Maps an EWS folder element local name to a kind.
    ///
    /// Returns `None` for elements that are not folders.
    #[must_use]
    pub fn from_element(name: &str) -> Option<Self> {
        match name {
            "Folder" => Some(Self::Generic),
            "SearchFolder" => Some(Self::Search),
            "CalendarFolder" => Some(Self::Calendar),
            "ContactsFolder" => Some(Self::Contacts),
            "TasksFolder" => Some(Self::Tasks),
            _ => None,
        }
    }
}

/// A folder as returned by `FindFolder` or `GetFolder`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Folder {
    /// Server-assigned id.
    pub id: FolderId,
    /// Display name (empty if the server did not return it).
    pub display_name: String,
    /// Folder kind.
    pub kind: FolderKind,
}

impl Folder {
    /// Creates a plain folder with the given id and name.
    #[must_use]
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: FolderId::new(id),
            display_name: display_name.into(),
            kind: FolderKind::Generic,
        }
    }

    /// Sets the folder kind.
    #[must_use]
    pub fn with_kind(mut self, kind: FolderKind) -> Self {
        self.kind = kind;
        self
    }
}
