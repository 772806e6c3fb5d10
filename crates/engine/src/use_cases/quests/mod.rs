//! Quest use cases: set lifecycle, progress recording, claiming and boards.

use std::sync::Arc;

mod board;
mod claim;
mod error;
mod generator;
mod lifecycle;
mod record_action;

pub use board::{QuestBoard, QuestBoardView};
pub use claim::ClaimQuestRewards;
pub use error::QuestError;
pub use generator::QuestGenerator;
pub use lifecycle::QuestLifecycle;
pub use record_action::RecordQuestAction;

/// Container for quest use cases.
pub struct QuestUseCases {
    pub lifecycle: Arc<QuestLifecycle>,
    pub record_action: Arc<RecordQuestAction>,
    pub claim: Arc<ClaimQuestRewards>,
    pub board: Arc<QuestBoard>,
}

impl QuestUseCases {
    pub fn new(
        lifecycle: Arc<QuestLifecycle>,
        record_action: Arc<RecordQuestAction>,
        claim: Arc<ClaimQuestRewards>,
        board: Arc<QuestBoard>,
    ) -> Self {
        Self {
            lifecycle,
            record_action,
            claim,
            board,
        }
    }
}
