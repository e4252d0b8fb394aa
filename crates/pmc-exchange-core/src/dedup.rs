//! Run-scoped suppression of repeated message identifiers.

use std::collections::HashSet;

use pmc_exchange_ews::ItemId;

/// Remembers every identifier admitted during one run.
///
/// A message that is both unread and flagged shows up in both queries;
/// only its first appearance is admitted.
#[derive(Debug, Default)]
pub struct Deduplicator {
    seen: HashSet<ItemId>,
    suppressed: u64,
}

impl Deduplicator {
    /// Creates an empty deduplicator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true the first time `id` is offered, false afterwards.
    pub fn admit(&mut self, id: &ItemId) -> bool {
        if self.seen.contains(id) {
            self.suppressed += 1;
            false
        } else {
            self.seen.insert(id.clone());
            true
        }
    }

    /// Number of offers rejected as repeats.
    #[must_use]
    pub const fn suppressed(&self) -> u64 {
        self.suppressed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_admit_once() {
        let mut dedup = Deduplicator::new();
        let id = ItemId::new("U1");
        assert!(dedup.admit(&id));
        assert!(!dedup.admit(&id));
        assert!(!dedup.admit(&ItemId::new("U1")));
        assert!(dedup.admit(&ItemId::new("U2")));
        assert!(!dedup.admit(&ItemId::new("U2")));
        assert_eq!(dedup.suppressed(), 3);
    }

    proptest! {
        #[test]
        fn admitted_ids_are_unique_and_cover_input(
            unread in proptest::collection::vec("[a-e]{1,2}", 0..40),
            flagged in proptest::collection::vec("[a-e]{1,2}", 0..40),
        ) {
            let mut dedup = Deduplicator::new();
            let admitted: Vec<String> = unread
                .iter()
                .chain(flagged.iter())
                .filter(|id| dedup.admit(&ItemId::new(id.as_str())))
                .cloned()
                .collect();

            let unique: HashSet<_> = admitted.iter().collect();
            prop_assert_eq!(unique.len(), admitted.len());

            let union: HashSet<_> = unread.iter().chain(flagged.iter()).collect();
            prop_assert_eq!(unique, union);
        }

        #[test]
        fn first_seen_order_is_kept(ids in proptest::collection::vec("[a-c]", 0..30)) {
            let mut dedup = Deduplicator::new();
            let admitted: Vec<&String> = ids.iter().filter(|id| dedup.admit(&ItemId::new(id.as_str()))).collect();

            let mut expected: Vec<&String> = Vec::new();
            for id in &ids {
                if !expected.contains(&id) {
                    expected.push(id);
                }
            }
            prop_assert_eq!(admitted, expected);
        }
    }
}
