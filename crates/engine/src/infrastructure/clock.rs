//! Clock and random implementations.

use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::infrastructure::ports::{ClockPort, RandomPort};

/// System clock - uses real time.
pub struct SystemClock;

impl SystemClock {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ClockPort for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// System random - uses real randomness.
pub struct SystemRandom;

impl SystemRandom {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SystemRandom {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomPort for SystemRandom {
    fn gen_range(&self, min: i64, max: i64) -> i64 {
        if max <= min {
            return min;
        }
        rand::thread_rng().gen_range(min..=max)
    }

    fn gen_unit(&self) -> f64 {
        rand::thread_rng().gen::<f64>()
    }
}

/// Reproducible random stream for simulations and statistical tests.
pub struct SeededRandom {
    rng: Mutex<StdRng>,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    fn with_rng<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> T {
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut rng)
    }
}

impl RandomPort for SeededRandom {
    fn gen_range(&self, min: i64, max: i64) -> i64 {
        if max <= min {
            return min;
        }
        self.with_rng(|rng| rng.gen_range(min..=max))
    }

    fn gen_unit(&self) -> f64 {
        self.with_rng(|rng| rng.gen::<f64>())
    }
}

/// Fixed clock for testing.
#[cfg(test)]
pub struct FixedClock(pub DateTime<Utc>);

#[cfg(test)]
impl ClockPort for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Settable clock for tests that move through windows and days.
#[cfg(test)]
pub struct ManualClock(Mutex<DateTime<Utc>>);

#[cfg(test)]
impl ManualClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.0.lock().expect("clock lock") = now;
    }

    pub fn advance(&self, by: chrono::Duration) {
        let mut now = self.0.lock().expect("clock lock");
        *now += by;
    }
}

#[cfg(test)]
impl ClockPort for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.0.lock().expect("clock lock")
    }
}

/// Fixed random for testing.
///
/// Every unit draw returns the stored value and every range draw maps it
/// linearly onto the range, so `0.0` always yields the minimum.
#[cfg(test)]
pub struct FixedRandom(pub f64);

#[cfg(test)]
impl RandomPort for FixedRandom {
    fn gen_range(&self, min: i64, max: i64) -> i64 {
        let span = (max - min) as f64;
        (min + (span * self.0).floor() as i64).clamp(min, max.max(min))
    }

    fn gen_unit(&self) -> f64 {
        self.0
    }
}
