//! E2E test helpers for constructing the full application stack.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use gacha_domain::{
    ChestCounts, EconomySettings, MoneyRange, QuestDefinition, QuestSet, QuestType,
    RewardEnvelope, UserId,
};

use crate::app::{App, Repositories};
use crate::infrastructure::clock::{ManualClock, SeededRandom};
use crate::infrastructure::memory::InMemoryStore;
use crate::infrastructure::ports::{ClockPort, QuestSetRepo, RandomPort};
use crate::test_fixtures::catalog;
use crate::use_cases::pulls::{PullOutcome, PullResult};

/// A fully wired App with handles on its store and clock.
pub struct E2EContext {
    pub app: Arc<App>,
    pub store: Arc<InMemoryStore>,
    pub clock: Arc<ManualClock>,
}

impl E2EContext {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self::with_settings(start, EconomySettings::default())
    }

    pub fn with_settings(start: DateTime<Utc>, settings: EconomySettings) -> Self {
        Self::with_random(start, settings, Arc::new(SeededRandom::new(42)))
    }

    pub fn with_random(
        start: DateTime<Utc>,
        settings: EconomySettings,
        random: Arc<dyn RandomPort>,
    ) -> Self {
        let store = Arc::new(InMemoryStore::new(settings.starting_balance));
        let clock = Arc::new(ManualClock::new(start));
        let app = App::new(
            Repositories::in_memory(store.clone()),
            catalog(),
            settings,
            clock.clone(),
            random,
        )
        .expect("valid settings");

        Self {
            app: Arc::new(app),
            store,
            clock,
        }
    }

    pub fn advance(&self, by: Duration) {
        self.clock.advance(by);
    }

    pub async fn pull(&self, user_id: &UserId) -> PullOutcome {
        self.app
            .use_cases
            .pulls
            .perform_pull
            .execute(user_id)
            .await
            .expect("pull should not fail")
    }

    pub async fn pull_card(&self, user_id: &UserId) -> PullResult {
        match self.pull(user_id).await {
            PullOutcome::Pulled(result) => result,
            other => panic!("expected a card, got {:?}", other),
        }
    }

    /// Store populated sets for both quest types so generation is skipped.
    ///
    /// Returns the daily set.
    pub async fn seed_quests(
        &self,
        daily: Vec<QuestDefinition>,
        weekly: Vec<QuestDefinition>,
    ) -> QuestSet {
        let now = self.clock.now();
        let mut seeded = None;
        for (quest_type, quests) in [(QuestType::Daily, daily), (QuestType::Weekly, weekly)] {
            let mut set = self
                .store
                .create(quest_type, now, quest_type.expiry_after(now))
                .await
                .expect("create set");
            set.quests = quests;
            self.store.save(&set).await.expect("save set");
            if quest_type == QuestType::Daily {
                seeded = Some(set);
            }
        }
        seeded.expect("daily set seeded")
    }
}

/// Fixed reward: `money` yen, the given chests and a reset token chance.
pub fn reward(money: i64, chests: ChestCounts, reset_token_chance: f64) -> RewardEnvelope {
    RewardEnvelope {
        money: MoneyRange {
            min: money,
            max: money,
        },
        chests,
        reset_token_chance,
    }
}
