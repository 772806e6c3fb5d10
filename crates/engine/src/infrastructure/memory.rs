//! In-memory document store.
//!
//! Implements every repository port over `RwLock<HashMap>` tables. Used by the
//! simulation binary and the end-to-end tests.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use gacha_domain::{
    Balance, BalanceDelta, CardCollection, Inventory, PullState, QuestSet, QuestSetId, QuestType,
    UserId, UserQuestProgress, STARTING_BALANCE,
};
use tokio::sync::RwLock;

use crate::infrastructure::ports::{
    BalanceRepo, CardProgressRepo, InventoryRepo, PullStateRepo, QuestSetRepo, RepoError,
};

pub struct InMemoryStore {
    starting_balance: i64,
    pulls: RwLock<HashMap<UserId, PullState>>,
    cards: RwLock<HashMap<UserId, CardCollection>>,
    quest_sets: RwLock<HashMap<QuestSetId, QuestSet>>,
    balances: RwLock<HashMap<UserId, Balance>>,
    inventories: RwLock<HashMap<UserId, Inventory>>,
}

impl InMemoryStore {
    pub fn new(starting_balance: i64) -> Self {
        Self {
            starting_balance,
            pulls: RwLock::new(HashMap::new()),
            cards: RwLock::new(HashMap::new()),
            quest_sets: RwLock::new(HashMap::new()),
            balances: RwLock::new(HashMap::new()),
            inventories: RwLock::new(HashMap::new()),
        }
    }

    /// Number of quest sets ever created, expired ones included.
    pub async fn quest_set_count(&self) -> usize {
        self.quest_sets.read().await.len()
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new(STARTING_BALANCE)
    }
}

#[async_trait]
impl PullStateRepo for InMemoryStore {
    async fn get(&self, user_id: &UserId) -> Result<Option<PullState>, RepoError> {
        Ok(self.pulls.read().await.get(user_id).copied())
    }

    async fn upsert(&self, user_id: &UserId, state: &PullState) -> Result<(), RepoError> {
        self.pulls.write().await.insert(user_id.clone(), *state);
        Ok(())
    }
}

#[async_trait]
impl CardProgressRepo for InMemoryStore {
    async fn get(&self, user_id: &UserId) -> Result<Option<CardCollection>, RepoError> {
        Ok(self.cards.read().await.get(user_id).cloned())
    }

    async fn upsert(
        &self,
        user_id: &UserId,
        collection: &CardCollection,
    ) -> Result<(), RepoError> {
        self.cards
            .write()
            .await
            .insert(user_id.clone(), collection.clone());
        Ok(())
    }
}

#[async_trait]
impl QuestSetRepo for InMemoryStore {
    async fn get_active(
        &self,
        quest_type: QuestType,
        now: DateTime<Utc>,
    ) -> Result<Option<QuestSet>, RepoError> {
        Ok(self
            .quest_sets
            .read()
            .await
            .values()
            .filter(|set| set.quest_type == quest_type && set.is_active(now))
            .max_by_key(|set| set.generated_at)
            .cloned())
    }

    async fn create(
        &self,
        quest_type: QuestType,
        generated_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Result<QuestSet, RepoError> {
        let set = QuestSet::new(quest_type, generated_at, expires_at);
        self.quest_sets.write().await.insert(set.id, set.clone());
        Ok(set)
    }

    async fn save(&self, set: &QuestSet) -> Result<(), RepoError> {
        self.quest_sets.write().await.insert(set.id, set.clone());
        Ok(())
    }

    async fn save_user_progress(
        &self,
        set_id: QuestSetId,
        user_id: &UserId,
        progress: &UserQuestProgress,
    ) -> Result<(), RepoError> {
        let mut sets = self.quest_sets.write().await;
        let set = sets
            .get_mut(&set_id)
            .ok_or_else(|| RepoError::not_found("QuestSet", set_id))?;
        set.progress.insert(user_id.clone(), progress.clone());
        Ok(())
    }
}

#[async_trait]
impl BalanceRepo for InMemoryStore {
    async fn get(&self, user_id: &UserId) -> Result<Option<Balance>, RepoError> {
        Ok(self.balances.read().await.get(user_id).copied())
    }

    async fn credit(&self, user_id: &UserId, delta: &BalanceDelta) -> Result<Balance, RepoError> {
        let mut balances = self.balances.write().await;
        let balance = balances
            .entry(user_id.clone())
            .or_insert_with(|| Balance::starting(self.starting_balance));
        balance.apply(delta);
        Ok(*balance)
    }
}

#[async_trait]
impl InventoryRepo for InMemoryStore {
    async fn get(&self, user_id: &UserId) -> Result<Option<Inventory>, RepoError> {
        Ok(self.inventories.read().await.get(user_id).copied())
    }

    async fn upsert(&self, user_id: &UserId, inventory: &Inventory) -> Result<(), RepoError> {
        self.inventories
            .write()
            .await
            .insert(user_id.clone(), *inventory);
        Ok(())
    }
}
