//! Seed derivation for the front-page feed
//!
//! The hourly seed is `year*10000 + month*100 + day + hour` with a 1-based
//! month. Day and hour are summed, not positioned, so distinct hours can map
//! to the same seed (day 1 hour 10 and day 2 hour 9).

use chrono::{DateTime, Datelike, Timelike, Utc};
use serde::{Deserialize, Serialize};

/// Seed used by the legacy fixed-order feed
pub const FIXED_SEED: i64 = 42;

/// How the feed seed is chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeedStrategy {
    /// Seed changes once per UTC hour, LCG shuffle
    #[default]
    Hourly,
    /// Constant seed 42, sine-step shuffle; the feed never rotates
    Fixed,
}

impl SeedStrategy {
    /// Convert to string for configuration storage
    pub fn as_str(&self) -> &'static str {
        match self {
            SeedStrategy::Hourly => "hourly",
            SeedStrategy::Fixed => "fixed",
        }
    }

    /// Parse from configuration string
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "hourly" => Some(SeedStrategy::Hourly),
            "fixed" => Some(SeedStrategy::Fixed),
            _ => None,
        }
    }

    /// Seed in effect at `now`
    pub fn seed_at(&self, now: DateTime<Utc>) -> i64 {
        match self {
            SeedStrategy::Hourly => hourly_seed(now),
            SeedStrategy::Fixed => FIXED_SEED,
        }
    }
}

/// Time-bucketed seed for the hour containing `at`
pub fn hourly_seed(at: DateTime<Utc>) -> i64 {
    i64::from(at.year()) * 10_000
        + i64::from(at.month()) * 100
        + i64::from(at.day())
        + i64::from(at.hour())
}

/// Parse an externally supplied seed, falling back to the hourly seed
///
/// A seed that is present but unparsable is logged and replaced rather than
/// rejected; the feed must always render.
pub fn resolve_seed(raw: Option<&str>, strategy: SeedStrategy, now: DateTime<Utc>) -> i64 {
    match raw.map(str::trim) {
        None | Some("") => strategy.seed_at(now),
        Some(value) => match value.parse::<i64>() {
            Ok(seed) => seed,
            Err(e) => {
                tracing::warn!(seed = value, error = %e, "Malformed feed seed, using hourly seed");
                hourly_seed(now)
            }
        },
    }
}
