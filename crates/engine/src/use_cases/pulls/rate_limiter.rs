//! Pull rate limiter.
//!
//! Each user may pull `max_pulls` times per fixed window. Load, window roll,
//! check and increment all happen under the user's `Pulls` lock.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use gacha_domain::{schedule, PullState, UserId};
use serde::Serialize;

use crate::infrastructure::locks::{Document, UserLocks};
use crate::infrastructure::ports::PullStateRepo;

use super::error::PullError;

/// Outcome of asking for one pull.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsumeResult {
    pub allowed: bool,
    pub used: u32,
    pub remaining: u32,
    pub window: i64,
    pub next_reset_at: DateTime<Utc>,
}

pub struct PullRateLimiter {
    repo: Arc<dyn PullStateRepo>,
    locks: Arc<UserLocks>,
    window_ms: i64,
    max_pulls: u32,
}

impl PullRateLimiter {
    pub fn new(
        repo: Arc<dyn PullStateRepo>,
        locks: Arc<UserLocks>,
        window_ms: i64,
        max_pulls: u32,
    ) -> Self {
        Self {
            repo,
            locks,
            window_ms,
            max_pulls,
        }
    }

    /// Consume one pull if the user has any left in the current window.
    pub async fn try_consume(
        &self,
        user_id: &UserId,
        now: DateTime<Utc>,
    ) -> Result<ConsumeResult, PullError> {
        let window = schedule::window_index(now, self.window_ms);
        let _guard = self.locks.lock(user_id, Document::Pulls).await;

        let mut state = self
            .repo
            .get(user_id)
            .await?
            .unwrap_or_else(|| PullState::new(window));
        let allowed = state.try_consume(window, self.max_pulls);
        if allowed {
            self.repo.upsert(user_id, &state).await?;
        }

        let result = self.result(&state, window, allowed);
        if allowed {
            tracing::debug!(user_id = %user_id, used = state.used, window = window, "Pull granted");
        } else {
            tracing::warn!(
                user_id = %user_id,
                used = state.used,
                next_reset_at = %result.next_reset_at,
                "Pull rejected, window exhausted"
            );
        }
        Ok(result)
    }

    /// Current usage without consuming anything.
    pub async fn status(
        &self,
        user_id: &UserId,
        now: DateTime<Utc>,
    ) -> Result<ConsumeResult, PullError> {
        let window = schedule::window_index(now, self.window_ms);
        let mut state = self
            .repo
            .get(user_id)
            .await?
            .unwrap_or_else(|| PullState::new(window));
        state.roll_window(window);
        Ok(self.result(&state, window, state.used < self.max_pulls))
    }

    fn result(&self, state: &PullState, window: i64, allowed: bool) -> ConsumeResult {
        ConsumeResult {
            allowed,
            used: state.used,
            remaining: state.remaining(self.max_pulls),
            window,
            next_reset_at: schedule::next_reset_at(window, self.window_ms),
        }
    }
}
