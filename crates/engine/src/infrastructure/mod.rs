//! Infrastructure implementations.
//!
//! Contains port trait implementations and shared runtime plumbing.

pub mod catalog;
pub mod clock;
pub mod locks;
pub mod memory;
pub mod ports;
