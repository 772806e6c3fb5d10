//! Card progress ledger - owns reads and writes of card collections.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use gacha_domain::{AcquisitionResult, CardCatalogEntry, CardCollection, UserId};

use crate::infrastructure::locks::{Document, UserLocks};
use crate::infrastructure::ports::CardProgressRepo;

use super::error::CollectionError;

pub struct CardProgressLedger {
    repo: Arc<dyn CardProgressRepo>,
    locks: Arc<UserLocks>,
}

impl CardProgressLedger {
    pub fn new(repo: Arc<dyn CardProgressRepo>, locks: Arc<UserLocks>) -> Self {
        Self { repo, locks }
    }

    /// Add a pulled card to the user's collection.
    pub async fn apply_acquisition(
        &self,
        user_id: &UserId,
        card: &CardCatalogEntry,
        now: DateTime<Utc>,
    ) -> Result<AcquisitionResult, CollectionError> {
        let _guard = self.locks.lock(user_id, Document::Cards).await;

        let mut collection = self.repo.get(user_id).await?.unwrap_or_default();
        let result = collection.apply_acquisition(&card.id, card.rank, now);
        self.repo.upsert(user_id, &collection).await?;

        if result.is_new {
            tracing::info!(user_id = %user_id, card_id = %card.id, rank = %card.rank, "New card acquired");
        } else if result.leveled_up {
            tracing::info!(
                user_id = %user_id,
                card_id = %card.id,
                xp_gained = result.xp_gained,
                new_level = result.new_level,
                "Duplicate card leveled up"
            );
        } else {
            tracing::debug!(
                user_id = %user_id,
                card_id = %card.id,
                xp_gained = result.xp_gained,
                "Duplicate card converted to XP"
            );
        }

        Ok(result)
    }

    pub async fn collection(&self, user_id: &UserId) -> Result<CardCollection, CollectionError> {
        Ok(self.repo.get(user_id).await?.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::{MockCardProgressRepo, RepoError};
    use crate::test_fixtures::{card, now, user};
    use gacha_domain::Rank;

    #[tokio::test]
    async fn when_card_is_new_creates_entry() {
        let mut repo = MockCardProgressRepo::new();
        repo.expect_get().returning(|_| Ok(None));
        repo.expect_upsert()
            .withf(|_, collection| collection.len() == 1)
            .times(1)
            .returning(|_, _| Ok(()));

        let ledger = CardProgressLedger::new(Arc::new(repo), Arc::new(UserLocks::new()));
        let result = ledger
            .apply_acquisition(&user("alice"), &card("zoro_b_01", Rank::B, false), now())
            .await
            .expect("acquired");
        assert!(result.is_new);
    }

    #[tokio::test]
    async fn when_duplicate_adds_rank_xp() {
        let existing = {
            let mut c = CardCollection::new();
            c.apply_acquisition(&card("beckman_a_01", Rank::A, false).id, Rank::A, now());
            c
        };
        let mut repo = MockCardProgressRepo::new();
        repo.expect_get()
            .returning(move |_| Ok(Some(existing.clone())));
        repo.expect_upsert().returning(|_, _| Ok(()));

        let ledger = CardProgressLedger::new(Arc::new(repo), Arc::new(UserLocks::new()));
        let result = ledger
            .apply_acquisition(&user("alice"), &card("beckman_a_01", Rank::A, false), now())
            .await
            .expect("acquired");
        assert!(!result.is_new);
        assert_eq!(result.xp_gained, 75);
    }

    #[tokio::test]
    async fn when_store_fails_returns_repo_error() {
        let mut repo = MockCardProgressRepo::new();
        repo.expect_get().returning(|_| Ok(None));
        repo.expect_upsert()
            .returning(|_, _| Err(RepoError::storage("upsert_cards", "disk full")));

        let ledger = CardProgressLedger::new(Arc::new(repo), Arc::new(UserLocks::new()));
        let result = ledger
            .apply_acquisition(&user("alice"), &card("zoro_b_01", Rank::B, false), now())
            .await;
        assert!(matches!(result, Err(CollectionError::Repo(_))));
    }
}
