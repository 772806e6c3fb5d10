//! Record a quest-relevant action for a user.

use std::sync::Arc;

use gacha_domain::UserId;

use crate::infrastructure::locks::{Document, UserLocks};
use crate::infrastructure::ports::{ClockPort, QuestSetRepo};

use super::error::QuestError;
use super::lifecycle::QuestLifecycle;

/// Advances every unclaimed quest matching an action key in all active sets.
pub struct RecordQuestAction {
    lifecycle: Arc<QuestLifecycle>,
    repo: Arc<dyn QuestSetRepo>,
    locks: Arc<UserLocks>,
    clock: Arc<dyn ClockPort>,
}

impl RecordQuestAction {
    pub fn new(
        lifecycle: Arc<QuestLifecycle>,
        repo: Arc<dyn QuestSetRepo>,
        locks: Arc<UserLocks>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        Self {
            lifecycle,
            repo,
            locks,
            clock,
        }
    }

    /// Returns true if any quest progressed.
    pub async fn execute(
        &self,
        user_id: &UserId,
        action: &str,
        amount: u32,
    ) -> Result<bool, QuestError> {
        if amount == 0 {
            return Ok(false);
        }

        let now = self.clock.now();
        let _guard = self.locks.lock(user_id, Document::Quests).await;

        let mut progressed = false;
        for mut set in self.lifecycle.active_sets(now).await? {
            let Some(progress) = set.record_action(user_id, action, amount) else {
                continue;
            };
            self.repo
                .save_user_progress(set.id, user_id, &progress)
                .await?;
            progressed = true;
            tracing::debug!(
                user_id = %user_id,
                quest_type = %set.quest_type,
                action = action,
                amount = amount,
                "Quest progress recorded"
            );
        }
        Ok(progressed)
    }
}
