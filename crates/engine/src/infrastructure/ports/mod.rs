//! Port traits for infrastructure boundaries.
//!
//! These are the only abstractions in the engine. Ports exist for:
//! - Document storage (per document type)
//! - Clock/Random (for testing)

mod error;
mod repos;
mod testing;

pub use error::RepoError;
pub use repos::*;
pub use testing::{pick_index, shuffle, ClockPort, RandomPort};

#[cfg(test)]
pub use testing::{MockClockPort, MockRandomPort};
