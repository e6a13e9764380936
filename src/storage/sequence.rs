// src/storage/sequence.rs
use std::collections::HashMap;

use chrono::NaiveDate;

use crate::entity::MemoId;

/// Highest sequence number in use per creation date.
///
/// Derived from the memo directory and never authoritative: it can always be
/// rebuilt with [`SequenceCache::from_ids`] over a fresh scan.
#[derive(Debug, Default, Clone)]
pub struct SequenceCache {
    max_by_date: HashMap<NaiveDate, u32>,
}

impl SequenceCache {
    pub fn from_ids(ids: impl IntoIterator<Item = MemoId>) -> Self {
        let mut cache = Self::default();
        for id in ids {
            cache.record(id);
        }
        cache
    }

    /// Highest number in use on `date`, 0 when there is none
    pub fn max(&self, date: NaiveDate) -> u32 {
        self.max_by_date.get(&date).copied().unwrap_or(0)
    }

    pub fn next(&self, date: NaiveDate) -> u32 {
        self.max(date).saturating_add(1)
    }

    /// Note that `id` is in use.
    pub fn record(&mut self, id: MemoId) {
        let max = self.max_by_date.entry(id.date()).or_insert(0);
        if id.seq() > *max {
            *max = id.seq();
        }
    }

    pub fn holds_max(&self, id: MemoId) -> bool {
        self.max(id.date()) == id.seq()
    }

    /// Recompute one date from a fresh listing of the ids still on disk.
    pub fn recompute(&mut self, date: NaiveDate, ids: impl IntoIterator<Item = MemoId>) {
        let max = ids
            .into_iter()
            .filter(|id| id.date() == date)
            .map(|id| id.seq())
            .max();

        match max {
            Some(max) => {
                self.max_by_date.insert(date, max);
            }
            None => {
                self.max_by_date.remove(&date);
            }
        }
    }

    /// Number of dates with at least one memo
    pub fn dates(&self) -> usize {
        self.max_by_date.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn id(d: u32, seq: u32) -> MemoId {
        MemoId::new(day(d), seq)
    }

    #[test]
    fn test_empty_cache_starts_at_one() {
        let cache = SequenceCache::default();
        assert_eq!(cache.max(day(1)), 0);
        assert_eq!(cache.next(day(1)), 1);
        assert_eq!(cache.dates(), 0);
    }

    #[test]
    fn test_from_ids_keeps_max_per_date() {
        let cache = SequenceCache::from_ids([id(1, 3), id(1, 1), id(1, 7), id(2, 2)]);
        assert_eq!(cache.max(day(1)), 7);
        assert_eq!(cache.max(day(2)), 2);
        assert_eq!(cache.next(day(3)), 1);
        assert_eq!(cache.dates(), 2);
    }

    #[test]
    fn test_record_never_lowers() {
        let mut cache = SequenceCache::from_ids([id(1, 5)]);
        cache.record(id(1, 2));
        assert_eq!(cache.max(day(1)), 5);
        cache.record(id(1, 6));
        assert_eq!(cache.max(day(1)), 6);
    }

    #[test]
    fn test_holds_max() {
        let cache = SequenceCache::from_ids([id(1, 1), id(1, 2)]);
        assert!(cache.holds_max(id(1, 2)));
        assert!(!cache.holds_max(id(1, 1)));
        assert!(!cache.holds_max(id(2, 1)));
    }

    #[test]
    fn test_recompute_uses_only_matching_date() {
        let mut cache = SequenceCache::from_ids([id(1, 1), id(1, 4), id(2, 9)]);
        cache.recompute(day(1), [id(1, 1), id(2, 9)]);
        assert_eq!(cache.max(day(1)), 1);
        assert_eq!(cache.max(day(2)), 9);
    }

    #[test]
    fn test_recompute_drops_empty_date() {
        let mut cache = SequenceCache::from_ids([id(1, 1), id(2, 1)]);
        cache.recompute(day(1), [id(2, 1)]);
        assert_eq!(cache.max(day(1)), 0);
        assert_eq!(cache.dates(), 1);
    }

    #[test]
    fn test_next_saturates() {
        let cache = SequenceCache::from_ids([id(1, u32::MAX)]);
        assert_eq!(cache.next(day(1)), u32::MAX);
    }
}
