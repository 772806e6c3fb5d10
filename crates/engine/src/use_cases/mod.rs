//! Use cases - User story orchestration.
//!
//! Each module contains use cases for one area of the economy. Use cases
//! coordinate repository ports under the per-user document locks.

pub mod collection;
pub mod pulls;
pub mod quests;
pub mod rewards;

pub use collection::CollectionUseCases;
pub use pulls::PullUseCases;
pub use quests::QuestUseCases;
pub use rewards::RewardUseCases;
