//! Search restrictions (`t:Restriction`).
//!
//! A restriction is a tree of predicates over item or folder properties.
//! Properties are addressed either by schema path (`item:Subject`) or, for
//! MAPI properties the schema does not expose, by numeric tag.

/// MAPI property type of an extended property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapiPropertyType {
    /// 32-bit integer.
    Integer,
    /// Boolean.
    Boolean,
    /// Unicode string.
    String,
    /// Timestamp.
    SystemTime,
}

impl MapiPropertyType {
    /// Returns the `PropertyType` attribute value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Integer => "Integer",
            Self::Boolean => "Boolean",
            Self::String => "String",
            Self::SystemTime => "SystemTime",
        }
    }
}

/// A MAPI property addressed by tag (`t:ExtendedFieldURI`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtendedProperty {
    /// Property tag (e.g. `0x1090`).
    pub tag: u16,
    /// Property type.
    pub kind: MapiPropertyType,
}

impl ExtendedProperty {
    /// `PidTagFolderType`: 1 = generic, 2 = search folder.
    pub const FOLDER_TYPE: Self = Self::new(0x3601, MapiPropertyType::Integer);

    /// `PidTagFlagStatus`: present once an item has ever been flagged.
    pub const FLAG_STATUS: Self = Self::new(0x1090, MapiPropertyType::Integer);

    /// Creates an extended property reference.
    #[must_use]
    pub const fn new(tag: u16, kind: MapiPropertyType) -> Self {
        Self { tag, kind }
    }

    /// Returns the tag formatted as EWS expects it (`0x1090`).
    #[must_use]
    pub fn tag_hex(&self) -> String {
        format!("0x{:04x}", self.tag)
    }
}

/// A property reference inside a restriction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyPath {
    /// Schema property (`t:FieldURI FieldURI="item:Subject"`).
    Field(&'static str),
    /// Extended MAPI property.
    Extended(ExtendedProperty),
}

impl PropertyPath {
    /// `folder:DisplayName`
    pub const FOLDER_DISPLAY_NAME: Self = Self::Field("folder:DisplayName");
    /// `item:ItemClass`
    pub const ITEM_CLASS: Self = Self::Field("item:ItemClass");
    /// `item:ParentFolderId`
    pub const PARENT_FOLDER_ID: Self = Self::Field("item:ParentFolderId");
    /// `message:IsRead`
    pub const IS_READ: Self = Self::Field("message:IsRead");
}

/// A search predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Restriction {
    /// All sub-restrictions must hold.
    And(Vec<Restriction>),
    /// Property equals a constant.
    IsEqualTo(PropertyPath, String),
    /// Property differs from a constant.
    IsNotEqualTo(PropertyPath, String),
    /// Property is set on the item.
    Exists(PropertyPath),
}

impl Restriction {
    /// Builds an equality predicate.
    #[must_use]
    pub fn is_equal_to(path: PropertyPath, value: impl Into<String>) -> Self {
        Self::IsEqualTo(path, value.into())
    }

    /// Builds an inequality predicate.
    #[must_use]
    pub fn is_not_equal_to(path: PropertyPath, value: impl Into<String>) -> Self {
        Self::IsNotEqualTo(path, value.into())
    }

    /// Builds a conjunction.
    #[must_use]
    pub fn and(parts: impl IntoIterator<Item = Self>) -> Self {
        Self::And(parts.into_iter().collect())
    }
}
