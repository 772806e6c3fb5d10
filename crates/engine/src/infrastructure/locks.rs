//! Keyed async mutex registry.
//!
//! Every read-modify-write on a user document runs under the lock for
//! `(user, document)`. When a flow needs several documents it acquires them in
//! `Document` order, which is the single global lock order.

use std::hash::Hash;
use std::sync::Arc;

use dashmap::DashMap;
use gacha_domain::{QuestType, UserId};
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Per-user documents, declared in lock-acquisition order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Document {
    Pulls,
    Cards,
    Quests,
    Balance,
    Inventory,
}

/// Lazily created async mutexes, one per key.
pub struct KeyedLocks<K> {
    locks: DashMap<K, Arc<Mutex<()>>>,
}

impl<K: Eq + Hash + Clone> KeyedLocks<K> {
    pub fn new() -> Self {
        Self {
            locks: DashMap::new(),
        }
    }

    pub async fn lock(&self, key: K) -> OwnedMutexGuard<()> {
        // Clone the Arc out so the shard guard is released before awaiting.
        let mutex = self.locks.entry(key).or_default().clone();
        mutex.lock_owned().await
    }
}

impl<K: Eq + Hash + Clone> Default for KeyedLocks<K> {
    fn default() -> Self {
        Self::new()
    }
}

/// Locks for `(user, document)` pairs.
#[derive(Default)]
pub struct UserLocks {
    inner: KeyedLocks<(UserId, Document)>,
}

impl UserLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn lock(&self, user_id: &UserId, document: Document) -> OwnedMutexGuard<()> {
        self.inner.lock((user_id.clone(), document)).await
    }

    /// Acquire several documents in global order. Guards release on drop.
    pub async fn lock_all(
        &self,
        user_id: &UserId,
        documents: &[Document],
    ) -> Vec<OwnedMutexGuard<()>> {
        let mut ordered = documents.to_vec();
        ordered.sort();
        ordered.dedup();

        let mut guards = Vec::with_capacity(ordered.len());
        for document in ordered {
            guards.push(self.lock(user_id, document).await);
        }
        guards
    }
}

/// One lock per quest type; taken after any user lock, never before.
pub type QuestTypeLocks = KeyedLocks<QuestType>;
