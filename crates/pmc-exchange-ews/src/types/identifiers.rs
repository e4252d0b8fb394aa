//! EWS identifiers.

/// Opaque folder identifier assigned by the server.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FolderId(pub String);

impl FolderId {
    /// Creates a folder id from its server representation.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for FolderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque item identifier, stable per message and unique within the mailbox.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ItemId(pub String);

impl ItemId {
    /// Creates an item id from its server representation.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Folders addressed by role rather than by id (`DistinguishedFolderId`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WellKnownFolder {
    /// Root of the whole mailbox, including non-IPM folders.
    Root,
    /// Inbox.
    Inbox,
    /// Junk E-mail.
    JunkEmail,
}

impl WellKnownFolder {
    /// Returns the distinguished folder id used on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Root => "root",
            Self::Inbox => "inbox",
            Self::JunkEmail => "junkemail",
        }
    }
}

impl std::fmt::Display for WellKnownFolder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A folder reference in a request: either distinguished or by id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FolderRef {
    /// `t:DistinguishedFolderId`
    WellKnown(WellKnownFolder),
    /// `t:FolderId`
    Id(FolderId),
}

impl From<WellKnownFolder> for FolderRef {
    fn from(folder: WellKnownFolder) -> Self {
        Self::WellKnown(folder)
    }
}

impl From<FolderId> for FolderRef {
    fn from(id: FolderId) -> Self {
        Self::Id(id)
    }
}

impl From<&FolderId> for FolderRef {
    fn from(id: &FolderId) -> Self {
        Self::Id(id.clone())
    }
}
