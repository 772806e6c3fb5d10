//! Quest set lifecycle.
//!
//! For each quest type there is either no active set, or exactly one whose
//! `expires_at` is after now. Expired sets are left in place and ignored.
//! Creation and population run under a per-type lock so concurrent callers
//! converge on one set.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use gacha_domain::{QuestSet, QuestType};

use crate::infrastructure::locks::QuestTypeLocks;
use crate::infrastructure::ports::QuestSetRepo;

use super::error::QuestError;
use super::generator::QuestGenerator;

pub struct QuestLifecycle {
    repo: Arc<dyn QuestSetRepo>,
    generator: Arc<QuestGenerator>,
    type_locks: QuestTypeLocks,
}

impl QuestLifecycle {
    pub fn new(repo: Arc<dyn QuestSetRepo>, generator: Arc<QuestGenerator>) -> Self {
        Self {
            repo,
            generator,
            type_locks: QuestTypeLocks::new(),
        }
    }

    /// The active set of `quest_type`, created empty if there is none.
    pub async fn ensure_active(
        &self,
        quest_type: QuestType,
        now: DateTime<Utc>,
    ) -> Result<QuestSet, QuestError> {
        let _guard = self.type_locks.lock(quest_type).await;
        self.get_or_create(quest_type, now).await
    }

    /// The active set of `quest_type`, populated with quests.
    pub async fn current_quests(
        &self,
        quest_type: QuestType,
        now: DateTime<Utc>,
    ) -> Result<QuestSet, QuestError> {
        let _guard = self.type_locks.lock(quest_type).await;
        let mut set = self.get_or_create(quest_type, now).await?;
        if !set.is_populated() {
            set.quests = self.generator.generate(quest_type);
            self.repo.save(&set).await?;
            tracing::info!(
                quest_type = %quest_type,
                set_id = %set.id,
                quests = set.quests.len(),
                "Generated quests"
            );
        }
        Ok(set)
    }

    /// Populated active sets of every type, daily first.
    pub async fn active_sets(&self, now: DateTime<Utc>) -> Result<Vec<QuestSet>, QuestError> {
        let mut sets = Vec::with_capacity(QuestType::all().len());
        for quest_type in QuestType::all() {
            sets.push(self.current_quests(quest_type, now).await?);
        }
        Ok(sets)
    }

    async fn get_or_create(
        &self,
        quest_type: QuestType,
        now: DateTime<Utc>,
    ) -> Result<QuestSet, QuestError> {
        if let Some(set) = self.repo.get_active(quest_type, now).await? {
            return Ok(set);
        }

        let expires_at = quest_type.expiry_after(now);
        let set = self.repo.create(quest_type, now, expires_at).await?;
        tracing::info!(
            quest_type = %quest_type,
            set_id = %set.id,
            expires_at = %expires_at,
            "Started new quest set"
        );
        Ok(set)
    }
}
