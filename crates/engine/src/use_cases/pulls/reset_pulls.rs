//! Redeem a reset token to refill the current pull window.

use std::sync::Arc;

use gacha_domain::{schedule, BalanceDelta, DomainError, PullState, UserId};
use serde::Serialize;

use crate::infrastructure::locks::{Document, UserLocks};
use crate::infrastructure::ports::{BalanceRepo, ClockPort, PullStateRepo};

use super::error::PullError;

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetOutcome {
    pub window: i64,
    pub tokens_left: u32,
}

pub struct ResetPulls {
    pull_repo: Arc<dyn PullStateRepo>,
    balance_repo: Arc<dyn BalanceRepo>,
    locks: Arc<UserLocks>,
    clock: Arc<dyn ClockPort>,
    window_ms: i64,
}

impl ResetPulls {
    pub fn new(
        pull_repo: Arc<dyn PullStateRepo>,
        balance_repo: Arc<dyn BalanceRepo>,
        locks: Arc<UserLocks>,
        clock: Arc<dyn ClockPort>,
        window_ms: i64,
    ) -> Self {
        Self {
            pull_repo,
            balance_repo,
            locks,
            clock,
            window_ms,
        }
    }

    pub async fn execute(&self, user_id: &UserId) -> Result<ResetOutcome, PullError> {
        let window = schedule::window_index(self.clock.now(), self.window_ms);
        let _guards = self
            .locks
            .lock_all(user_id, &[Document::Pulls, Document::Balance])
            .await;

        let tokens = self
            .balance_repo
            .get(user_id)
            .await?
            .map_or(0, |b| b.reset_tokens);
        if tokens == 0 {
            return Err(DomainError::insufficient("reset tokens", 1, 0).into());
        }

        let mut state = self
            .pull_repo
            .get(user_id)
            .await?
            .unwrap_or_else(|| PullState::new(window));
        state.reset_usage(window);

        let balance = self
            .balance_repo
            .credit(
                user_id,
                &BalanceDelta {
                    amount: 0,
                    reset_tokens: -1,
                },
            )
            .await?;
        self.pull_repo.upsert(user_id, &state).await?;

        tracing::info!(
            user_id = %user_id,
            window = window,
            tokens_left = balance.reset_tokens,
            "Pull window reset with token"
        );

        Ok(ResetOutcome {
            window,
            tokens_left: balance.reset_tokens,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::clock::FixedClock;
    use crate::infrastructure::ports::{MockBalanceRepo, MockPullStateRepo};
    use crate::test_fixtures::{now, user};
    use gacha_domain::Balance;

    const WINDOW_MS: i64 = 8 * 60 * 60 * 1000;

    fn use_case(pulls: MockPullStateRepo, balance: MockBalanceRepo) -> ResetPulls {
        ResetPulls::new(
            Arc::new(pulls),
            Arc::new(balance),
            Arc::new(UserLocks::new()),
            Arc::new(FixedClock(now())),
            WINDOW_MS,
        )
    }

    #[tokio::test]
    async fn when_no_tokens_returns_insufficient() {
        let mut balance = MockBalanceRepo::new();
        balance.expect_get().returning(|_| Ok(Some(Balance::starting(500))));
        balance.expect_credit().never();
        let mut pulls = MockPullStateRepo::new();
        pulls.expect_upsert().never();

        let result = use_case(pulls, balance).execute(&user("alice")).await;
        match result {
            Err(PullError::Validation(err)) => assert!(err.is_insufficient()),
            other => panic!("expected insufficient tokens, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn when_token_held_clears_usage() {
        let window = schedule::window_index(now(), WINDOW_MS);
        let mut balance = MockBalanceRepo::new();
        balance.expect_get().returning(|_| {
            Ok(Some(Balance {
                amount: 500,
                reset_tokens: 2,
            }))
        });
        balance
            .expect_credit()
            .withf(|_, d| d.reset_tokens == -1 && d.amount == 0)
            .times(1)
            .returning(|_, _| {
                Ok(Balance {
                    amount: 500,
                    reset_tokens: 1,
                })
            });
        let mut pulls = MockPullStateRepo::new();
        pulls.expect_get().returning(move |_| {
            Ok(Some(PullState {
                window,
                used: 7,
                total_pulls: 30,
            }))
        });
        pulls
            .expect_upsert()
            .withf(move |_, s| s.used == 0 && s.window == window && s.total_pulls == 30)
            .times(1)
            .returning(|_, _| Ok(()));

        let outcome = use_case(pulls, balance)
            .execute(&user("alice"))
            .await
            .expect("reset");
        assert_eq!(outcome.tokens_left, 1);
        assert_eq!(outcome.window, window);
    }
}
