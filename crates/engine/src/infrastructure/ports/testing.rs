//! Testability ports for injecting time and randomness.

use chrono::{DateTime, Utc};

#[cfg_attr(test, mockall::automock)]
pub trait ClockPort: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[cfg_attr(test, mockall::automock)]
pub trait RandomPort: Send + Sync {
    /// Uniform integer in `[min, max]`.
    fn gen_range(&self, min: i64, max: i64) -> i64;

    /// Uniform float in `[0, 1)`.
    fn gen_unit(&self) -> f64;
}

/// Uniform index below `len`; `len` must be positive.
pub fn pick_index(random: &dyn RandomPort, len: usize) -> usize {
    let max = i64::try_from(len.saturating_sub(1)).unwrap_or(i64::MAX);
    usize::try_from(random.gen_range(0, max)).unwrap_or(0)
}

/// In-place Fisher-Yates shuffle driven by `random`.
pub fn shuffle<T>(random: &dyn RandomPort, items: &mut [T]) {
    for i in (1..items.len()).rev() {
        let j = pick_index(random, i + 1).min(i);
        items.swap(i, j);
    }
}
