//! One extraction pass: resolve scopes, enumerate, deduplicate, emit.
//!
//! All folder scopes are resolved before the first item is fetched, so a
//! missing `AllItems` folder fails the run with nothing written.

use std::io::Write;

use pmc_exchange_ews::{Folder, FolderRef, Item};
use tracing::info;

use crate::dedup::Deduplicator;
use crate::error::Result;
use crate::query::{self, ITEM_PAGE_SIZE};
use crate::record::RecordEmitter;
use crate::resolver;
use crate::service::MailService;

/// Which queries a run executes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QueryMode {
    /// Unread messages in the Inbox subtree.
    Unread,
    /// Flagged messages anywhere except Junk.
    Flagged,
    /// Unread, then flagged, with repeats suppressed.
    #[default]
    All,
}

impl QueryMode {
    const fn includes_unread(self) -> bool {
        matches!(self, Self::Unread | Self::All)
    }

    const fn includes_flagged(self) -> bool {
        matches!(self, Self::Flagged | Self::All)
    }
}

/// Counters for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Items returned by the service across all queries.
    pub fetched: u64,
    /// Records written.
    pub emitted: u64,
    /// Items dropped as repeats.
    pub suppressed: u64,
}

/// Folder scopes resolved up front.
struct Scopes {
    unread: Vec<Folder>,
    flagged: Option<FlaggedScope>,
}

struct FlaggedScope {
    all_items: Folder,
    junk: Folder,
}

async fn resolve<S: MailService>(service: &S, mode: QueryMode) -> Result<Scopes> {
    let flagged = if mode.includes_flagged() {
        let all_items = resolver::all_items(service).await?;
        let junk = resolver::junk(service).await?;
        Some(FlaggedScope { all_items, junk })
    } else {
        None
    };

    let unread = if mode.includes_unread() {
        resolver::inbox_subtree(service).await?
    } else {
        Vec::new()
    };

    Ok(Scopes { unread, flagged })
}

/// Where enumerated items go: straight to the emitter, or through the
/// deduplicator first when both queries run.
struct Sink<W: Write> {
    emitter: RecordEmitter<W>,
    dedup: Option<Deduplicator>,
    fetched: u64,
}

impl<W: Write> Sink<W> {
    fn accept(&mut self, item: Item) -> Result<()> {
        self.fetched += 1;
        let admitted = self
            .dedup
            .as_mut()
            .is_none_or(|dedup| dedup.admit(&item.id));
        if admitted {
            self.emitter.emit(&item)?;
        }
        Ok(())
    }
}

/// Runs the queries selected by `mode` and writes one JSON line per message
/// to `out`.
///
/// Items stream to `out` as each page arrives. In [`QueryMode::All`] the
/// unread stream is drained completely before the flagged stream starts, and
/// each identifier is written at most once.
///
/// # Errors
///
/// Returns the first resolution, service, or output error. Records written
/// before the failure are not retracted.
pub async fn run<S, W>(service: &S, mode: QueryMode, out: W) -> Result<RunSummary>
where
    S: MailService,
    W: Write,
{
    let scopes = resolve(service, mode).await?;

    let mut sink = Sink {
        emitter: RecordEmitter::new(out),
        dedup: (mode == QueryMode::All).then(Deduplicator::new),
        fetched: 0,
    };

    if mode.includes_unread() {
        let restriction = query::unread_restriction();
        for folder in &scopes.unread {
            let seen = query::drain(
                service,
                &FolderRef::Id(folder.id.clone()),
                &restriction,
                ITEM_PAGE_SIZE,
                |item| sink.accept(item),
            )
            .await?;
            info!(folder = %folder.display_name, items = seen, "Unread query drained");
        }
    }

    if let Some(scope) = &scopes.flagged {
        let restriction = query::flagged_restriction(&scope.junk.id);
        let seen = query::drain(
            service,
            &FolderRef::Id(scope.all_items.id.clone()),
            &restriction,
            ITEM_PAGE_SIZE,
            |item| sink.accept(item),
        )
        .await?;
        info!(items = seen, "Flagged query drained");
    }

    let summary = RunSummary {
        fetched: sink.fetched,
        emitted: sink.emitter.emitted(),
        suppressed: sink.dedup.as_ref().map_or(0, Deduplicator::suppressed),
    };
    info!(
        fetched = summary.fetched,
        emitted = summary.emitted,
        suppressed = summary.suppressed,
        "Run complete"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_coverage() {
        assert!(QueryMode::All.includes_unread());
        assert!(QueryMode::All.includes_flagged());
        assert!(QueryMode::Unread.includes_unread());
        assert!(!QueryMode::Unread.includes_flagged());
        assert!(!QueryMode::Flagged.includes_unread());
        assert_eq!(QueryMode::default(), QueryMode::All);
    }

    #[test]
    fn test_sink_without_dedup_passes_repeats() {
        let mut sink = Sink {
            emitter: RecordEmitter::new(Vec::new()),
            dedup: None,
            fetched: 0,
        };
        sink.accept(Item::new("a")).ok();
        sink.accept(Item::new("a")).ok();
        assert_eq!(sink.emitter.emitted(), 2);
    }

    #[test]
    fn test_sink_with_dedup_drops_repeats() {
        let mut sink = Sink {
            emitter: RecordEmitter::new(Vec::new()),
            dedup: Some(Deduplicator::new()),
            fetched: 0,
        };
        sink.accept(Item::new("a")).ok();
        sink.accept(Item::new("a")).ok();
        sink.accept(Item::new("b")).ok();
        assert_eq!(sink.fetched, 3);
        assert_eq!(sink.emitter.emitted(), 2);
    }
}
