//! Repository port traits for the keyed document store.
//!
//! Each trait owns one document type. Read-modify-write sequences are
//! serialized by callers through `UserLocks`; the store itself only promises
//! that a single call is atomic.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use gacha_domain::{
    Balance, BalanceDelta, CardCollection, Inventory, PullState, QuestSet, QuestSetId, QuestType,
    UserId, UserQuestProgress,
};

use super::error::RepoError;

// =============================================================================
// Pulls
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PullStateRepo: Send + Sync {
    async fn get(&self, user_id: &UserId) -> Result<Option<PullState>, RepoError>;
    async fn upsert(&self, user_id: &UserId, state: &PullState) -> Result<(), RepoError>;
}

// =============================================================================
// Card collections
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CardProgressRepo: Send + Sync {
    async fn get(&self, user_id: &UserId) -> Result<Option<CardCollection>, RepoError>;
    async fn upsert(&self, user_id: &UserId, collection: &CardCollection)
        -> Result<(), RepoError>;
}

// =============================================================================
// Quest sets
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuestSetRepo: Send + Sync {
    /// The set of `quest_type` whose `expires_at` is after `now`, if any.
    async fn get_active(
        &self,
        quest_type: QuestType,
        now: DateTime<Utc>,
    ) -> Result<Option<QuestSet>, RepoError>;

    /// Create an empty set.
    async fn create(
        &self,
        quest_type: QuestType,
        generated_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Result<QuestSet, RepoError>;

    /// Replace the whole document. Only used to populate a set that has no
    /// quests yet, and therefore no user progress.
    async fn save(&self, set: &QuestSet) -> Result<(), RepoError>;

    /// Replace one user's progress entry without touching anyone else's.
    async fn save_user_progress(
        &self,
        set_id: QuestSetId,
        user_id: &UserId,
        progress: &UserQuestProgress,
    ) -> Result<(), RepoError>;
}

// =============================================================================
// Balance & inventory
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BalanceRepo: Send + Sync {
    async fn get(&self, user_id: &UserId) -> Result<Option<Balance>, RepoError>;

    /// Apply `delta`, creating the balance at its starting value first if the
    /// user has none. Returns the new balance.
    async fn credit(&self, user_id: &UserId, delta: &BalanceDelta) -> Result<Balance, RepoError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InventoryRepo: Send + Sync {
    async fn get(&self, user_id: &UserId) -> Result<Option<Inventory>, RepoError>;
    async fn upsert(&self, user_id: &UserId, inventory: &Inventory) -> Result<(), RepoError>;
}
