//! Item (message) projections.

use chrono::{DateTime, Utc};

use super::ItemId;

/// Follow-up flag state of an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlagStatus {
    /// Never flagged, or flag cleared.
    #[default]
    NotFlagged,
    /// Flagged for follow-up, not yet completed.
    Flagged,
    /// Flagged and marked complete.
    Complete,
}

impl FlagStatus {
    /// Parses the text of a `t:FlagStatus` element.
    ///
    /// Unknown values are treated as not flagged.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.trim() {
            "Flagged" => Self::Flagged,
            "Complete" => Self::Complete,
            _ => Self::NotFlagged,
        }
    }

    /// Returns true if the item carries any flag, completed or not.
    #[must_use]
    pub const fn is_flagged(self) -> bool {
        matches!(self, Self::Flagged | Self::Complete)
    }

    /// Returns true if the flag has been marked complete.
    #[must_use]
    pub const fn is_complete(self) -> bool {
        matches!(self, Self::Complete)
    }
}

/// The projection of a message returned by `FindItem`.
///
/// Only identifier, timestamps, subject and state are requested;
/// bodies and attachments are never transferred.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    /// Server-assigned id.
    pub id: ItemId,
    /// When the message was received.
    pub received: Option<DateTime<Utc>>,
    /// Subject line.
    pub subject: Option<String>,
    /// Whether the message has been read.
    pub is_read: bool,
    /// Follow-up flag state.
    pub flag: FlagStatus,
    /// Item class (e.g. `IPM.Note`).
    pub item_class: Option<String>,
}

impl Item {
    /// Creates an unread, unflagged item with only an id.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: ItemId::new(id),
            received: None,
            subject: None,
            is_read: false,
            flag: FlagStatus::NotFlagged,
            item_class: None,
        }
    }
}
