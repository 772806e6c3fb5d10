//! Gacha engine library.
//!
//! Pull scheduling, card progression, quests and rewards over pluggable
//! storage ports.
//!
//! ## Structure
//!
//! - `use_cases/` - User story orchestration across repositories
//! - `infrastructure/` - Ports, locks, clocks and the in-memory store
//! - `app` - Application composition

pub mod app;
pub mod infrastructure;
pub mod use_cases;

/// Test fixtures shared by unit and end-to-end tests.
#[cfg(test)]
pub mod test_fixtures;

/// End-to-end flows against the in-memory store.
#[cfg(test)]
mod e2e_tests;

pub use app::App;
