//! Reward use cases: chest opening and balance/inventory views.
//!
//! The `RewardGenerator` is shared with the quest use cases, which roll quest
//! envelopes and realize them on claim.

use std::sync::Arc;

mod error;
mod generator;
mod open_chests;
mod wallet;

pub use error::RewardError;
pub use generator::RewardGenerator;
pub use open_chests::{ChestOpening, OpenChests};
pub use wallet::Wallet;

/// Container for reward use cases.
pub struct RewardUseCases {
    pub generator: Arc<RewardGenerator>,
    pub open_chests: Arc<OpenChests>,
    pub wallet: Arc<Wallet>,
}

impl RewardUseCases {
    pub fn new(
        generator: Arc<RewardGenerator>,
        open_chests: Arc<OpenChests>,
        wallet: Arc<Wallet>,
    ) -> Self {
        Self {
            generator,
            open_chests,
            wallet,
        }
    }
}
