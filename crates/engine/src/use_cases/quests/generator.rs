//! Quest generation.
//!
//! A set is built from the archetypes that support its type, shuffled and
//! truncated to the type's quest count. Targets are uniform within the
//! archetype's range and each quest gets its own chest roll.

use std::sync::Arc;

use gacha_domain::{
    DomainError, EconomySettings, QuestArchetype, QuestDefinition, QuestRewardTable, QuestType,
};

use crate::infrastructure::ports::{shuffle, RandomPort};
use crate::use_cases::rewards::RewardGenerator;

pub struct QuestGenerator {
    random: Arc<dyn RandomPort>,
    rewards: Arc<RewardGenerator>,
    daily: QuestRewardTable,
    weekly: QuestRewardTable,
}

impl QuestGenerator {
    pub fn new(
        random: Arc<dyn RandomPort>,
        rewards: Arc<RewardGenerator>,
        settings: &EconomySettings,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            random,
            rewards,
            daily: QuestRewardTable::for_type(QuestType::Daily)
                .with_reset_token_chance(settings.daily_reset_token_chance)?,
            weekly: QuestRewardTable::for_type(QuestType::Weekly)
                .with_reset_token_chance(settings.weekly_reset_token_chance)?,
        })
    }

    fn table(&self, quest_type: QuestType) -> &QuestRewardTable {
        match quest_type {
            QuestType::Daily => &self.daily,
            QuestType::Weekly => &self.weekly,
        }
    }

    pub fn generate(&self, quest_type: QuestType) -> Vec<QuestDefinition> {
        let mut archetypes = QuestArchetype::available_for(quest_type);
        shuffle(self.random.as_ref(), &mut archetypes);

        archetypes
            .into_iter()
            .take(quest_type.quest_count())
            .filter_map(|archetype| {
                let range = archetype.target_range(quest_type)?;
                let target = self
                    .random
                    .gen_range(i64::from(range.min), i64::from(range.max))
                    .clamp(i64::from(range.min), i64::from(range.max));
                let target = u32::try_from(target).unwrap_or(range.min);
                let reward = self.rewards.envelope(self.table(quest_type));
                Some(archetype.definition(target, reward))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::clock::SeededRandom;
    use std::collections::HashSet;

    fn generator(seed: u64) -> QuestGenerator {
        let random: Arc<dyn RandomPort> = Arc::new(SeededRandom::new(seed));
        QuestGenerator::new(
            random.clone(),
            Arc::new(RewardGenerator::new(random)),
            &EconomySettings::default(),
        )
        .expect("valid settings")
    }

    #[test]
    fn daily_sets_have_three_distinct_quests() {
        for seed in 0..50 {
            let quests = generator(seed).generate(QuestType::Daily);
            assert_eq!(quests.len(), 3);
            let actions: HashSet<_> = quests.iter().map(|q| q.action.clone()).collect();
            assert_eq!(actions.len(), 3);
            assert!(!actions.contains("evolve"));
            let ids: HashSet<_> = quests.iter().map(|q| q.id).collect();
            assert_eq!(ids.len(), 3);
        }
    }

    #[test]
    fn targets_and_rewards_follow_tables() {
        for seed in 0..50 {
            for quest_type in QuestType::all() {
                for quest in generator(seed).generate(quest_type) {
                    let archetype = QuestArchetype::all()
                        .into_iter()
                        .find(|a| a.action_key() == quest.action)
                        .expect("known action");
                    let range = archetype.target_range(quest_type).expect("supported");
                    assert!((range.min..=range.max).contains(&quest.target));
                    assert!(quest.description.contains(&quest.target.to_string()));

                    let table = QuestRewardTable::for_type(quest_type);
                    assert_eq!(quest.reward.money, table.money);
                    assert!(table
                        .chests
                        .outcomes()
                        .iter()
                        .any(|o| o.chests == quest.reward.chests));
                }
            }
        }
    }

    #[test]
    fn weekly_sets_have_five_quests() {
        let quests = generator(9).generate(QuestType::Weekly);
        assert_eq!(quests.len(), 5);
    }

    #[test]
    fn rejects_invalid_token_chance() {
        let random: Arc<dyn RandomPort> = Arc::new(SeededRandom::new(1));
        let settings = EconomySettings {
            daily_reset_token_chance: 2.0,
            ..EconomySettings::default()
        };
        let result = QuestGenerator::new(random.clone(), Arc::new(RewardGenerator::new(random)), &settings);
        assert!(result.is_err());
    }
}
