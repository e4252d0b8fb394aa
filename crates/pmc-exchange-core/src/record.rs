//! Output records and the NDJSON emitter.

use std::io::Write;

use chrono::SecondsFormat;
use pmc_exchange_ews::Item;
use serde::Serialize;

use crate::error::Result;

/// Value of the `source` field on every record.
pub const SOURCE: &str = "pmc-exchange";

/// Value of the `type` field on every record.
pub const RECORD_TYPE: &str = "email";

/// One line of output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputRecord {
    /// Always [`SOURCE`].
    pub source: &'static str,
    /// Always [`RECORD_TYPE`].
    #[serde(rename = "type")]
    pub kind: &'static str,
    /// EWS item id.
    pub id: String,
    /// Received time, RFC 3339 in UTC; `null` if the server sent none.
    pub datetime: Option<String>,
    /// Subject, empty if absent.
    pub subject: String,
    /// Flagged at some point, completed or not.
    pub flagged: bool,
    /// Flag marked complete.
    pub completed: bool,
    /// Message has been read.
    pub read: bool,
    /// Ordering hint for consumers; always 0.
    pub rank: u32,
}

impl From<&Item> for OutputRecord {
    fn from(item: &Item) -> Self {
        Self {
            source: SOURCE,
            kind: RECORD_TYPE,
            id: item.id.to_string(),
            datetime: item
                .received
                .map(|t| t.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
            subject: item.subject.clone().unwrap_or_default(),
            flagged: item.flag.is_flagged(),
            completed: item.flag.is_complete(),
            read: item.is_read,
            rank: 0,
        }
    }
}

/// Writes records as newline-delimited JSON, flushing after each one so a
/// consumer tailing the stream sees records as they are produced.
#[derive(Debug)]
pub struct RecordEmitter<W: Write> {
    out: W,
    emitted: u64,
}

impl<W: Write> RecordEmitter<W> {
    /// Creates an emitter writing to `out`.
    pub const fn new(out: W) -> Self {
        Self { out, emitted: 0 }
    }

    /// Serializes `item` and writes it as one line.
    ///
    /// # Errors
    ///
    /// Returns an error if the output cannot be written (e.g. a closed pipe).
    pub fn emit(&mut self, item: &Item) -> Result<()> {
        let mut line = serde_json::to_vec(&OutputRecord::from(item))?;
        line.push(b'\n');
        self.out.write_all(&line)?;
        self.out.flush()?;
        self.emitted += 1;
        Ok(())
    }

    /// Number of records written.
    #[must_use]
    pub const fn emitted(&self) -> u64 {
        self.emitted
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}
