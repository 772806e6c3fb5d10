//! Open chests use case.
//!
//! Debits chests from the inventory and credits the rolled yen and XP bottles.

use std::sync::Arc;

use gacha_domain::{Balance, BalanceDelta, ChestRank, DomainError, Inventory, UserId};
use serde::Serialize;

use crate::infrastructure::locks::{Document, UserLocks};
use crate::infrastructure::ports::{BalanceRepo, InventoryRepo};

use super::error::RewardError;
use super::generator::RewardGenerator;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChestOpening {
    pub rank: ChestRank,
    pub opened: u32,
    pub yen: i64,
    pub xp_bottles: u32,
    pub balance: Balance,
    pub inventory: Inventory,
}

pub struct OpenChests {
    balance_repo: Arc<dyn BalanceRepo>,
    inventory_repo: Arc<dyn InventoryRepo>,
    generator: Arc<RewardGenerator>,
    locks: Arc<UserLocks>,
    max_per_open: u32,
}

impl OpenChests {
    pub fn new(
        balance_repo: Arc<dyn BalanceRepo>,
        inventory_repo: Arc<dyn InventoryRepo>,
        generator: Arc<RewardGenerator>,
        locks: Arc<UserLocks>,
        max_per_open: u32,
    ) -> Self {
        Self {
            balance_repo,
            inventory_repo,
            generator,
            locks,
            max_per_open,
        }
    }

    pub async fn execute(
        &self,
        user_id: &UserId,
        rank: ChestRank,
        amount: u32,
    ) -> Result<ChestOpening, RewardError> {
        if amount == 0 || amount > self.max_per_open {
            return Err(DomainError::validation(format!(
                "Chest amount must be between 1 and {}",
                self.max_per_open
            ))
            .into());
        }

        let _guards = self
            .locks
            .lock_all(user_id, &[Document::Balance, Document::Inventory])
            .await;

        let mut inventory = self.inventory_repo.get(user_id).await?.unwrap_or_default();
        inventory.chests.remove(rank, amount)?;

        let (yen, xp_bottles) = (0..amount)
            .map(|_| self.generator.chest_loot(rank))
            .fold((0i64, 0u32), |(yen, bottles), loot| {
                (yen.saturating_add(loot.yen), bottles.saturating_add(loot.xp_bottles))
            });
        inventory.xp_bottles = inventory.xp_bottles.saturating_add(xp_bottles);

        self.inventory_repo.upsert(user_id, &inventory).await?;
        let balance = self
            .balance_repo
            .credit(user_id, &BalanceDelta::money(yen))
            .await?;

        tracing::info!(
            user_id = %user_id,
            rank = %rank,
            opened = amount,
            yen = yen,
            xp_bottles = xp_bottles,
            "Chests opened"
        );

        Ok(ChestOpening {
            rank,
            opened: amount,
            yen,
            xp_bottles,
            balance,
            inventory,
        })
    }
}
