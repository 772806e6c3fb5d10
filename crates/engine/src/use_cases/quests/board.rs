//! Quest board view.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use gacha_domain::{QuestType, QuestView, UserId};
use serde::Serialize;

use crate::infrastructure::ports::ClockPort;

use super::error::QuestError;
use super::lifecycle::QuestLifecycle;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestBoardView {
    pub quest_type: QuestType,
    pub expires_at: DateTime<Utc>,
    pub seconds_remaining: i64,
    pub quests: Vec<QuestView>,
}

pub struct QuestBoard {
    lifecycle: Arc<QuestLifecycle>,
    clock: Arc<dyn ClockPort>,
}

impl QuestBoard {
    pub fn new(lifecycle: Arc<QuestLifecycle>, clock: Arc<dyn ClockPort>) -> Self {
        Self { lifecycle, clock }
    }

    pub async fn execute(
        &self,
        user_id: &UserId,
        quest_type: QuestType,
    ) -> Result<QuestBoardView, QuestError> {
        let now = self.clock.now();
        let set = self.lifecycle.current_quests(quest_type, now).await?;
        Ok(QuestBoardView {
            quest_type,
            expires_at: set.expires_at,
            seconds_remaining: (set.expires_at - now).num_seconds().max(0),
            quests: set.board(user_id),
        })
    }
}
