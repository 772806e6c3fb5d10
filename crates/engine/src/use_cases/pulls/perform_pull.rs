//! Perform pull use case.
//!
//! Orchestrates: rate limit check, rank/card selection, collection update,
//! and quest progress for the "pull" action.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use gacha_domain::{AcquisitionResult, CardCatalogEntry, DomainError, QuestArchetype, Rank, UserId};
use serde::Serialize;

use crate::infrastructure::ports::ClockPort;
use crate::use_cases::collection::CardProgressLedger;
use crate::use_cases::quests::RecordQuestAction;

use super::error::PullError;
use super::rate_limiter::PullRateLimiter;
use super::selector::ProbabilitySelector;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PullResult {
    pub card: CardCatalogEntry,
    pub rank: Rank,
    pub acquisition: AcquisitionResult,
    pub used: u32,
    pub remaining: u32,
    pub next_reset_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PullOutcome {
    Pulled(PullResult),
    /// No pulls left in this window
    Exhausted {
        used: u32,
        next_reset_at: DateTime<Utc>,
    },
}

pub struct PerformPull {
    limiter: Arc<PullRateLimiter>,
    selector: Arc<ProbabilitySelector>,
    ledger: Arc<CardProgressLedger>,
    quests: Arc<RecordQuestAction>,
    clock: Arc<dyn ClockPort>,
}

impl PerformPull {
    pub fn new(
        limiter: Arc<PullRateLimiter>,
        selector: Arc<ProbabilitySelector>,
        ledger: Arc<CardProgressLedger>,
        quests: Arc<RecordQuestAction>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        Self {
            limiter,
            selector,
            ledger,
            quests,
            clock,
        }
    }

    pub async fn execute(&self, user_id: &UserId) -> Result<PullOutcome, PullError> {
        let now = self.clock.now();
        let consumed = self.limiter.try_consume(user_id, now).await?;
        if !consumed.allowed {
            return Ok(PullOutcome::Exhausted {
                used: consumed.used,
                next_reset_at: consumed.next_reset_at,
            });
        }

        let (rank, card) = self
            .selector
            .draw()
            .ok_or_else(|| DomainError::invalid_configuration("Card catalog is empty"))?;
        let acquisition = self.ledger.apply_acquisition(user_id, &card, now).await?;
        self.quests
            .execute(user_id, QuestArchetype::Pull.action_key(), 1)
            .await?;

        tracing::info!(
            user_id = %user_id,
            card_id = %card.id,
            rank = %rank,
            is_new = acquisition.is_new,
            used = consumed.used,
            "Card pulled"
        );

        Ok(PullOutcome::Pulled(PullResult {
            card,
            rank,
            acquisition,
            used: consumed.used,
            remaining: consumed.remaining,
            next_reset_at: consumed.next_reset_at,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::clock::{FixedClock, FixedRandom};
    use crate::infrastructure::locks::UserLocks;
    use crate::infrastructure::memory::InMemoryStore;
    use crate::infrastructure::ports::{
        CardProgressRepo, MockCardProgressRepo, MockPullStateRepo, PullStateRepo, QuestSetRepo,
        RandomPort,
    };
    use crate::test_fixtures::{catalog, now, user};
    use crate::use_cases::quests::{QuestGenerator, QuestLifecycle};
    use crate::use_cases::rewards::RewardGenerator;
    use gacha_domain::{EconomySettings, PullState, RankDistribution};

    fn use_case(pulls: Arc<dyn PullStateRepo>, cards: Arc<dyn CardProgressRepo>) -> PerformPull {
        let store = Arc::new(InMemoryStore::default());
        let quest_repo: Arc<dyn QuestSetRepo> = store;
        let random: Arc<dyn RandomPort> = Arc::new(FixedRandom(0.0));
        let locks = Arc::new(UserLocks::new());
        let clock = Arc::new(FixedClock(now()));
        let generator = QuestGenerator::new(
            random.clone(),
            Arc::new(RewardGenerator::new(random.clone())),
            &EconomySettings::default(),
        )
        .expect("valid settings");
        let lifecycle = Arc::new(QuestLifecycle::new(quest_repo.clone(), Arc::new(generator)));

        PerformPull::new(
            Arc::new(PullRateLimiter::new(pulls, locks.clone(), 8 * 60 * 60 * 1000, 7)),
            Arc::new(ProbabilitySelector::new(catalog(), RankDistribution::default(), random)),
            Arc::new(CardProgressLedger::new(cards, locks.clone())),
            Arc::new(RecordQuestAction::new(lifecycle, quest_repo, locks, clock.clone())),
            clock,
        )
    }

    #[tokio::test]
    async fn when_exhausted_returns_next_reset_without_touching_cards() {
        let window = gacha_domain::schedule::window_index(now(), 8 * 60 * 60 * 1000);
        let mut pulls = MockPullStateRepo::new();
        pulls.expect_get().returning(move |_| {
            Ok(Some(PullState {
                window,
                used: 7,
                total_pulls: 7,
            }))
        });
        pulls.expect_upsert().never();
        let mut cards = MockCardProgressRepo::new();
        cards.expect_get().never();
        cards.expect_upsert().never();

        let outcome = use_case(Arc::new(pulls), Arc::new(cards))
            .execute(&user("alice"))
            .await
            .expect("pull");
        match outcome {
            PullOutcome::Exhausted { used, next_reset_at } => {
                assert_eq!(used, 7);
                assert_eq!(next_reset_at, gacha_domain::schedule::next_reset_at(window, 8 * 60 * 60 * 1000));
            }
            other => panic!("expected exhausted, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn when_allowed_grants_card() {
        let store = Arc::new(InMemoryStore::default());
        let outcome = use_case(store.clone(), store)
            .execute(&user("alice"))
            .await
            .expect("pull");
        match outcome {
            PullOutcome::Pulled(result) => {
                // A zero draw lands in C, and the first C candidate is the base card.
                assert_eq!(result.rank, Rank::C);
                assert_eq!(result.card.id.as_str(), "deckhand_c_01");
                assert!(result.acquisition.is_new);
                assert_eq!(result.used, 1);
                assert_eq!(result.remaining, 6);
            }
            other => panic!("expected a card, got {:?}", other),
        }
    }
}
