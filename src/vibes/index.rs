//! # Vibe Identifiers: UUID vs Ordinal
//!
//! Vibes are keyed by UUID in the store. UUIDs are the correct technical choice for
//! unique identification, but nobody wants to type one into a menu prompt.
//!
//! ## The Dual-Identifier Solution
//!
//! 1. **UUID (Internal)**: Immutable, canonical, globally unique.
//! 2. **Ordinal (External)**: A 1-based position in a canonical ordering of one
//!    snapshot of the collection.
//!
//! ## Canonical Ordering
//!
//! The store returns vibes in no particular order, so we impose one:
//! - `created_at` descending (Newest = 1)
//! - ties broken by `id` ascending, so equal timestamps still order deterministically
//!
//! ## Snapshots
//!
//! An ordinal only means something relative to the list it was read from. Code that
//! resolves user input must resolve against the **same** `Vec<IndexedVibe>` that was
//! shown, never a fresh fetch. See [`crate::commands::remove`].
//!
//! **Developer Note**: When showing vibes for selection, always use [`index_vibes`].
//! Never enumerate the raw store output yourself.

use crate::model::Vibe;
use std::str::FromStr;

/// Word that aborts a selection prompt.
pub const CANCEL_SENTINEL: &str = "cancel";

/// A vibe paired with its 1-based position in a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedVibe {
    pub index: usize,
    pub vibe: Vibe,
}

/// Sorts vibes into canonical order and numbers them from 1.
pub fn index_vibes(mut vibes: Vec<Vibe>) -> Vec<IndexedVibe> {
    vibes.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| a.id.cmp(&b.id))
    });

    vibes
        .into_iter()
        .enumerate()
        .map(|(i, vibe)| IndexedVibe { index: i + 1, vibe })
        .collect()
}

/// What the user typed at a selection prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Ordinal(usize),
    Cancel,
}

impl FromStr for Selection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case(CANCEL_SENTINEL) {
            return Ok(Selection::Cancel);
        }
        s.parse::<usize>()
            .map(Selection::Ordinal)
            .map_err(|_| format!("Invalid selection: '{}'", s))
    }
}

/// Finds the entry for a 1-based ordinal in a snapshot.
pub fn resolve_ordinal(snapshot: &[IndexedVibe], ordinal: usize) -> Option<&IndexedVibe> {
    snapshot.iter().find(|iv| iv.index == ordinal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::fixtures::{base_time, StoreFixture};
    use crate::store::VibeStore;
    use chrono::Duration;
    use uuid::Uuid;

    #[test]
    fn newest_first() {
        let store = StoreFixture::new()
            .with_vibe("Oldest", "general")
            .with_vibe("Middle", "general")
            .with_vibe("Newest", "general")
            .store;

        let indexed = index_vibes(store.list().unwrap());
        let titles: Vec<_> = indexed.iter().map(|iv| iv.vibe.title.as_str()).collect();
        assert_eq!(titles, vec!["Newest", "Middle", "Oldest"]);
        let indexes: Vec<_> = indexed.iter().map(|iv| iv.index).collect();
        assert_eq!(indexes, vec![1, 2, 3]);
    }

    #[test]
    fn equal_timestamps_order_by_id() {
        let mut a = Vibe::new("A".into(), "".into(), None);
        let mut b = Vibe::new("B".into(), "".into(), None);
        a.id = Uuid::from_u128(2);
        b.id = Uuid::from_u128(1);
        a.created_at = base_time();
        b.created_at = base_time();

        let first = index_vibes(vec![a.clone(), b.clone()]);
        let second = index_vibes(vec![b, a]);
        assert_eq!(first, second);
        assert_eq!(first[0].vibe.title, "B");
    }

    #[test]
    fn empty_input_yields_empty_index() {
        assert!(index_vibes(Vec::new()).is_empty());
    }

    #[test]
    fn parses_selection() {
        assert_eq!("1".parse::<Selection>(), Ok(Selection::Ordinal(1)));
        assert_eq!(" 12 ".parse::<Selection>(), Ok(Selection::Ordinal(12)));
        assert_eq!("cancel".parse::<Selection>(), Ok(Selection::Cancel));
        assert_eq!("CANCEL".parse::<Selection>(), Ok(Selection::Cancel));
        assert!("one".parse::<Selection>().is_err());
        assert!("-1".parse::<Selection>().is_err());
        assert!("".parse::<Selection>().is_err());
        assert!("1.5".parse::<Selection>().is_err());
    }

    #[test]
    fn resolves_within_range_only() {
        let mut vibes = Vec::new();
        for i in 0..3 {
            let mut v = Vibe::new(format!("V{}", i), "".into(), None);
            v.created_at = base_time() + Duration::minutes(i);
            vibes.push(v);
        }
        let snapshot = index_vibes(vibes);

        assert_eq!(resolve_ordinal(&snapshot, 1).unwrap().vibe.title, "V2");
        assert_eq!(resolve_ordinal(&snapshot, 3).unwrap().vibe.title, "V0");
        assert!(resolve_ordinal(&snapshot, 0).is_none());
        assert!(resolve_ordinal(&snapshot, 4).is_none());
    }
}
