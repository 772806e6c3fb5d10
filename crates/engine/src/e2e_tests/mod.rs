//! End-to-end tests.
//!
//! Each test builds a complete `App` over the in-memory store with a manual
//! clock, then drives it only through use cases.
//!
//! ```bash
//! cargo test -p gacha-engine --lib e2e_tests
//! ```

mod e2e_helpers;
mod quest_flow_tests;

pub use e2e_helpers::*;
