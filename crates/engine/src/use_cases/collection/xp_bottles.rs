//! Use XP bottles on an owned card.
//!
//! The card is resolved with the same free-text lookup as card info.

use std::sync::Arc;

use gacha_domain::{CardCatalog, CardId, DomainError, UserId, XpGrant};
use serde::Serialize;

use crate::infrastructure::locks::{Document, UserLocks};
use crate::infrastructure::ports::{CardProgressRepo, InventoryRepo};

use super::error::CollectionError;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct XpBottleOutcome {
    pub card_id: CardId,
    pub grant: XpGrant,
    pub bottles_used: u32,
    pub bottles_left: u32,
}

pub struct UseXpBottles {
    catalog: Arc<CardCatalog>,
    cards: Arc<dyn CardProgressRepo>,
    inventory: Arc<dyn InventoryRepo>,
    locks: Arc<UserLocks>,
    xp_per_bottle: u32,
}

impl UseXpBottles {
    pub fn new(
        catalog: Arc<CardCatalog>,
        cards: Arc<dyn CardProgressRepo>,
        inventory: Arc<dyn InventoryRepo>,
        locks: Arc<UserLocks>,
        xp_per_bottle: u32,
    ) -> Self {
        Self {
            catalog,
            cards,
            inventory,
            locks,
            xp_per_bottle,
        }
    }

    pub async fn execute(
        &self,
        user_id: &UserId,
        query: &str,
        bottles: u32,
    ) -> Result<XpBottleOutcome, CollectionError> {
        if bottles == 0 {
            return Err(DomainError::validation("Use at least one XP bottle").into());
        }
        let card_id = &self
            .catalog
            .find(query)
            .ok_or_else(|| DomainError::not_found("Card", query.trim()))?
            .id;

        let _guards = self
            .locks
            .lock_all(user_id, &[Document::Cards, Document::Inventory])
            .await;

        let mut collection = self.cards.get(user_id).await?.unwrap_or_default();
        if !collection.owns(card_id) {
            return Err(DomainError::not_found("Owned card", card_id.as_str()).into());
        }

        let mut inventory = self.inventory.get(user_id).await?.unwrap_or_default();
        if inventory.xp_bottles < bottles {
            return Err(DomainError::insufficient(
                "XP bottles",
                u64::from(bottles),
                u64::from(inventory.xp_bottles),
            )
            .into());
        }

        let grant = collection.grant_xp(card_id, bottles.saturating_mul(self.xp_per_bottle))?;
        inventory.xp_bottles -= bottles;

        // Bottles are debited before the card is written.
        self.inventory.upsert(user_id, &inventory).await?;
        self.cards.upsert(user_id, &collection).await?;

        tracing::info!(
            user_id = %user_id,
            card_id = %card_id,
            bottles = bottles,
            levels_gained = grant.levels_gained,
            level = grant.level,
            "XP bottles used"
        );

        Ok(XpBottleOutcome {
            card_id: card_id.clone(),
            grant,
            bottles_used: bottles,
            bottles_left: inventory.xp_bottles,
        })
    }
}
