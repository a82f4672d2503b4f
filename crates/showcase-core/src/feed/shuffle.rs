//! Seeded in-place shuffles
//!
//! Both generators walk the slice from the tail: draw an index below the
//! remaining length, shrink the window by one, swap the new tail with the
//! drawn index. Output must match the deployed feed bit-for-bit, so the
//! arithmetic mirrors IEEE-754 doubles exactly.

const LCG_MULTIPLIER: i64 = 9301;
const LCG_INCREMENT: i64 = 49297;
const LCG_MODULUS: i64 = 233_280;

/// Linear congruential generator used by the hourly feed
#[derive(Debug, Clone)]
pub struct Lcg {
    state: i64,
}

impl Lcg {
    /// Create a generator from a seed; any i64 is accepted
    pub fn new(seed: i64) -> Self {
        Self {
            state: seed.rem_euclid(LCG_MODULUS),
        }
    }

    /// Advance the state and return a value in `[0, 1)`
    pub fn next_unit(&mut self) -> f64 {
        self.state = (self.state * LCG_MULTIPLIER + LCG_INCREMENT).rem_euclid(LCG_MODULUS);
        self.state as f64 / LCG_MODULUS as f64
    }

    /// Draw an index in `[0, bound)`; `bound` must be non-zero
    pub fn next_index(&mut self, bound: usize) -> usize {
        let index = (self.next_unit() * bound as f64).floor() as usize;
        index.min(bound - 1)
    }
}

/// Fisher-Yates shuffle driven by [`Lcg`]
pub fn lcg_shuffle<T>(items: &mut [T], seed: i64) {
    let mut rng = Lcg::new(seed);
    let mut remaining = items.len();
    while remaining > 0 {
        let index = rng.next_index(remaining);
        remaining -= 1;
        items.swap(remaining, index);
    }
}

/// Legacy shuffle stepping `sin(seed) * 10000` modulo the remaining length
pub fn sine_shuffle<T>(items: &mut [T], seed: i64) {
    let mut seed = seed;
    let mut remaining = items.len();
    while remaining > 0 {
        let bound = remaining as f64;
        // `%` on f64 keeps the sign of the dividend
        let mut index = ((seed as f64).sin() * 10_000.0 % bound).floor() as i64;
        seed = seed.wrapping_add(1);
        if index < 0 {
            index += remaining as i64;
        }
        remaining -= 1;
        items.swap(remaining, index as usize);
    }
}
