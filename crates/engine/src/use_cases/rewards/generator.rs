//! Reward generator - turns reward tables into concrete grants.

use std::sync::Arc;

use gacha_domain::{ChestLoot, ChestRank, QuestRewardTable, RewardEnvelope, RewardGrant};

use crate::infrastructure::ports::RandomPort;

pub struct RewardGenerator {
    random: Arc<dyn RandomPort>,
}

impl RewardGenerator {
    pub fn new(random: Arc<dyn RandomPort>) -> Self {
        Self { random }
    }

    /// Roll the chest outcome for a new quest.
    pub fn envelope(&self, table: &QuestRewardTable) -> RewardEnvelope {
        table.envelope(self.random.gen_unit())
    }

    /// Realize a claimed quest's envelope: uniform money, chests as-is and a
    /// reset token rolled against its chance.
    pub fn realize(&self, envelope: &RewardEnvelope) -> RewardGrant {
        envelope.realize(
            |min, max| self.random.gen_range(min, max),
            self.random.gen_unit(),
        )
    }

    /// Loot for one opened chest.
    pub fn chest_loot(&self, rank: ChestRank) -> ChestLoot {
        let (yen_min, yen_max) = rank.yen_range();
        let (bottle_min, bottle_max) = rank.bottle_range();
        let bottles = self
            .random
            .gen_range(i64::from(bottle_min), i64::from(bottle_max))
            .clamp(i64::from(bottle_min), i64::from(bottle_max));
        ChestLoot {
            yen: self.random.gen_range(yen_min, yen_max).clamp(yen_min, yen_max),
            xp_bottles: u32::try_from(bottles).unwrap_or(bottle_min),
        }
    }
}
