//! Card collection use cases.

use std::sync::Arc;

mod card_info;
mod error;
mod ledger;
mod xp_bottles;

pub use card_info::{CardInfo, CardInfoView};
pub use error::CollectionError;
pub use ledger::CardProgressLedger;
pub use xp_bottles::{UseXpBottles, XpBottleOutcome};

/// Container for collection use cases.
pub struct CollectionUseCases {
    pub ledger: Arc<CardProgressLedger>,
    pub card_info: Arc<CardInfo>,
    pub use_xp_bottles: Arc<UseXpBottles>,
}

impl CollectionUseCases {
    pub fn new(
        ledger: Arc<CardProgressLedger>,
        card_info: Arc<CardInfo>,
        use_xp_bottles: Arc<UseXpBottles>,
    ) -> Self {
        Self {
            ledger,
            card_info,
            use_xp_bottles,
        }
    }
}
