//! Front-page feed selection
//!
//! Produces a shuffled, size-bounded view of all projects. The order is a
//! pure function of the input order and the seed, so every request within
//! the same seed period sees the same page, on every process.
//!
//! # Usage
//!
//! ```ignore
//! use showcase_core::feed::{FeedSelector, SeedStrategy};
//!
//! let selector = FeedSelector::new(20, SeedStrategy::Hourly);
//! let seed = selector.current_seed();
//! let page = selector.select(&projects, seed);
//! ```

pub mod seed;
pub mod shuffle;

use chrono::{DateTime, Utc};

pub use seed::{FIXED_SEED, SeedStrategy, hourly_seed, resolve_seed};
pub use shuffle::{Lcg, lcg_shuffle, sine_shuffle};

/// Default number of projects on the front page
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Deterministic feed selector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedSelector {
    page_size: usize,
    strategy: SeedStrategy,
}

impl Default for FeedSelector {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE, SeedStrategy::default())
    }
}

impl FeedSelector {
    /// Create a selector returning at most `page_size` records
    pub fn new(page_size: usize, strategy: SeedStrategy) -> Self {
        Self {
            page_size,
            strategy,
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn strategy(&self) -> SeedStrategy {
        self.strategy
    }

    /// Seed in effect at `now` under this selector's strategy
    pub fn seed_at(&self, now: DateTime<Utc>) -> i64 {
        self.strategy.seed_at(now)
    }

    /// Seed in effect right now
    pub fn current_seed(&self) -> i64 {
        self.seed_at(Utc::now())
    }

    /// Permute `records` with `seed` and return the first `page_size` of them
    ///
    /// The input is never touched: the shuffle runs over positions and only
    /// the selected prefix is cloned out.
    pub fn select<T: Clone>(&self, records: &[T], seed: i64) -> Vec<T> {
        let order = self.permutation(records.len(), seed);
        order
            .into_iter()
            .take(self.page_size)
            .map(|position| records[position].clone())
            .collect()
    }

    /// Full permutation of `0..len` for `seed`
    pub fn permutation(&self, len: usize, seed: i64) -> Vec<usize> {
        let mut order: Vec<usize> = (0..len).collect();
        match self.strategy {
            SeedStrategy::Hourly => lcg_shuffle(&mut order, seed),
            SeedStrategy::Fixed => sine_shuffle(&mut order, seed),
        }
        order
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::collections::BTreeSet;

    #[derive(Debug, Clone, PartialEq)]
    struct Record {
        id: i64,
        followers_count: i64,
    }

    fn records(n: i64) -> Vec<Record> {
        (1..=n)
            .map(|id| Record {
                id,
                followers_count: id * 3,
            })
            .collect()
    }

    fn ids(records: &[Record]) -> Vec<i64> {
        records.iter().map(|r| r.id).collect()
    }

    #[test]
    fn test_golden_hourly_five() {
        let selector = FeedSelector::new(20, SeedStrategy::Hourly);
        let page = selector.select(&records(5), 2_024_030_110);
        assert_eq!(ids(&page), vec![3, 4, 5, 1, 2]);
    }

    #[test]
    fn test_golden_hourly_ten() {
        let selector = FeedSelector::new(20, SeedStrategy::Hourly);
        let page = selector.select(&records(10), 2_024_030_110);
        assert_eq!(ids(&page), vec![9, 6, 3, 7, 8, 1, 10, 5, 2, 4]);
    }

    #[test]
    fn test_golden_fixed() {
        let selector = FeedSelector::new(20, SeedStrategy::Fixed);
        let seed = selector.current_seed();
        assert_eq!(seed, FIXED_SEED);
        assert_eq!(ids(&selector.select(&records(5), seed)), vec![4, 2, 1, 3, 5]);
        assert_eq!(ids(&selector.select(&records(5), seed)), vec![4, 2, 1, 3, 5]);
    }

    #[test]
    fn test_deterministic_for_same_seed() {
        let selector = FeedSelector::default();
        let input = records(57);
        for seed in [0, 1, 42, 20_240_311, i64::MAX, i64::MIN] {
            assert_eq!(selector.select(&input, seed), selector.select(&input, seed));
        }
    }

    #[test]
    fn test_empty_input() {
        for strategy in [SeedStrategy::Hourly, SeedStrategy::Fixed] {
            let selector = FeedSelector::new(10, strategy);
            assert!(selector.select::<Record>(&[], 12345).is_empty());
        }
    }

    #[test]
    fn test_page_larger_than_input_is_full_permutation() {
        let selector = FeedSelector::new(20, SeedStrategy::Hourly);
        let input = records(7);
        let page = selector.select(&input, 99);
        assert_eq!(page.len(), 7);
        let got: BTreeSet<i64> = ids(&page).into_iter().collect();
        let want: BTreeSet<i64> = ids(&input).into_iter().collect();
        assert_eq!(got, want);
    }

    #[test]
    fn test_page_smaller_than_input_is_truncated() {
        let input = records(35);
        for strategy in [SeedStrategy::Hourly, SeedStrategy::Fixed] {
            let selector = FeedSelector::new(10, strategy);
            let page = selector.select(&input, 2_024_030_110);
            assert_eq!(page.len(), 10);
            for record in &page {
                assert!(input.contains(record));
            }
            let unique: BTreeSet<i64> = ids(&page).into_iter().collect();
            assert_eq!(unique.len(), 10);
        }
    }

    #[test]
    fn test_rotates_between_hours() {
        let selector = FeedSelector::new(20, SeedStrategy::Hourly);
        let input = records(10);
        let h10 = selector.seed_at(Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap());
        let h11 = selector.seed_at(Utc.with_ymd_and_hms(2024, 3, 1, 11, 0, 0).unwrap());
        assert_ne!(h10, h11);
        assert_eq!(ids(&selector.select(&input, h10)), vec![2, 1, 9, 3, 8, 5, 6, 10, 7, 4]);
        assert_eq!(ids(&selector.select(&input, h11)), vec![4, 8, 2, 7, 9, 10, 1, 3, 6, 5]);
    }

    #[test]
    fn test_selection_does_not_mutate_input() {
        let selector = FeedSelector::new(3, SeedStrategy::Hourly);
        let input = records(8);
        let snapshot = input.clone();
        let _ = selector.select(&input, 2_024_030_110);
        assert_eq!(input, snapshot);
        assert!(input.iter().all(|r| r.followers_count == r.id * 3));
    }

    #[test]
    fn test_zero_page_size() {
        let selector = FeedSelector::new(0, SeedStrategy::Hourly);
        assert!(selector.select(&records(4), 1).is_empty());
    }
}
