//! Claim quest rewards use case.
//!
//! Orchestrates: marking completed quests claimed in every active set,
//! realizing their rewards, and crediting balance and inventory.
//!
//! Sets are settled one at a time: a set's claimed flags are persisted, then
//! its rewards are credited before the next set is touched. A failure stops
//! the claim with every earlier set already paid out. A credit that fails
//! after the flags were saved is logged at error level with the amounts that
//! were lost.

use std::sync::Arc;

use gacha_domain::{BalanceDelta, ChestCounts, ClaimSummary, UserId};

use crate::infrastructure::locks::{Document, UserLocks};
use crate::infrastructure::ports::{
    BalanceRepo, ClockPort, InventoryRepo, QuestSetRepo, RepoError,
};
use crate::use_cases::rewards::RewardGenerator;

use super::error::QuestError;
use super::lifecycle::QuestLifecycle;

pub struct ClaimQuestRewards {
    lifecycle: Arc<QuestLifecycle>,
    quest_repo: Arc<dyn QuestSetRepo>,
    balance_repo: Arc<dyn BalanceRepo>,
    inventory_repo: Arc<dyn InventoryRepo>,
    rewards: Arc<RewardGenerator>,
    locks: Arc<UserLocks>,
    clock: Arc<dyn ClockPort>,
}

impl ClaimQuestRewards {
    pub fn new(
        lifecycle: Arc<QuestLifecycle>,
        quest_repo: Arc<dyn QuestSetRepo>,
        balance_repo: Arc<dyn BalanceRepo>,
        inventory_repo: Arc<dyn InventoryRepo>,
        rewards: Arc<RewardGenerator>,
        locks: Arc<UserLocks>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        Self {
            lifecycle,
            quest_repo,
            balance_repo,
            inventory_repo,
            rewards,
            locks,
            clock,
        }
    }

    /// Claim every completed quest. Nothing to claim is not an error.
    pub async fn execute(&self, user_id: &UserId) -> Result<ClaimSummary, QuestError> {
        let now = self.clock.now();
        let _guards = self
            .locks
            .lock_all(
                user_id,
                &[Document::Quests, Document::Balance, Document::Inventory],
            )
            .await;

        let mut summary = ClaimSummary::default();
        for mut set in self.lifecycle.active_sets(now).await? {
            let Some((claimed, progress)) = set.claim_completed(user_id) else {
                continue;
            };
            if let Err(e) = self
                .quest_repo
                .save_user_progress(set.id, user_id, &progress)
                .await
            {
                if summary.claimed > 0 {
                    tracing::warn!(
                        user_id = %user_id,
                        quest_type = %set.quest_type,
                        credited = summary.claimed,
                        error = %e,
                        "Quest claim stopped after earlier sets were credited"
                    );
                }
                return Err(e.into());
            }

            let mut grant = ClaimSummary::default();
            for quest in &claimed {
                grant.add(&self.rewards.realize(&quest.reward));
            }
            self.credit(user_id, &grant).await?;
            summary.merge(&grant);

            tracing::info!(
                user_id = %user_id,
                quest_type = %set.quest_type,
                claimed = grant.claimed,
                money = grant.money,
                chests = grant.chests.total(),
                reset_tokens = grant.reset_tokens,
                "Quest rewards credited"
            );
        }

        if summary.claimed == 0 {
            tracing::debug!(user_id = %user_id, "No completed quests to claim");
        }
        Ok(summary)
    }

    async fn credit(&self, user_id: &UserId, grant: &ClaimSummary) -> Result<(), QuestError> {
        let delta = BalanceDelta {
            amount: grant.money,
            reset_tokens: i64::from(grant.reset_tokens),
        };
        if !delta.is_zero() {
            if let Err(e) = self.balance_repo.credit(user_id, &delta).await {
                tracing::error!(
                    user_id = %user_id,
                    error = %e,
                    money = grant.money,
                    chests = grant.chests.total(),
                    reset_tokens = grant.reset_tokens,
                    "Quests marked claimed but rewards were not credited"
                );
                return Err(e.into());
            }
        }

        if !grant.chests.is_empty() {
            if let Err(e) = self.credit_chests(user_id, &grant.chests).await {
                tracing::error!(
                    user_id = %user_id,
                    error = %e,
                    chests = grant.chests.total(),
                    "Quests marked claimed but chests were not credited"
                );
                return Err(e.into());
            }
        }
        Ok(())
    }

    async fn credit_chests(&self, user_id: &UserId, chests: &ChestCounts) -> Result<(), RepoError> {
        let mut inventory = self.inventory_repo.get(user_id).await?.unwrap_or_default();
        inventory.chests.merge(chests);
        self.inventory_repo.upsert(user_id, &inventory).await
    }
}
