//! Balance and inventory views.

use std::sync::Arc;

use gacha_domain::{Balance, Inventory, UserId};

use crate::infrastructure::ports::{BalanceRepo, InventoryRepo};

use super::error::RewardError;

/// Read-only access to a user's balance and consumables.
///
/// Users without stored documents see the starting balance and an empty
/// inventory; nothing is written on read.
pub struct Wallet {
    balance_repo: Arc<dyn BalanceRepo>,
    inventory_repo: Arc<dyn InventoryRepo>,
    starting_balance: i64,
}

impl Wallet {
    pub fn new(
        balance_repo: Arc<dyn BalanceRepo>,
        inventory_repo: Arc<dyn InventoryRepo>,
        starting_balance: i64,
    ) -> Self {
        Self {
            balance_repo,
            inventory_repo,
            starting_balance,
        }
    }

    pub async fn balance(&self, user_id: &UserId) -> Result<Balance, RewardError> {
        Ok(self
            .balance_repo
            .get(user_id)
            .await?
            .unwrap_or_else(|| Balance::starting(self.starting_balance)))
    }

    pub async fn inventory(&self, user_id: &UserId) -> Result<Inventory, RewardError> {
        Ok(self.inventory_repo.get(user_id).await?.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::{MockBalanceRepo, MockInventoryRepo, RepoError};

    fn user() -> UserId {
        UserId::new("alice").expect("valid user id")
    }

    #[tokio::test]
    async fn when_no_balance_returns_starting_balance() {
        let mut balance_repo = MockBalanceRepo::new();
        balance_repo.expect_get().returning(|_| Ok(None));

        let wallet = Wallet::new(Arc::new(balance_repo), Arc::new(MockInventoryRepo::new()), 500);
        let balance = wallet.balance(&user()).await.expect("balance");
        assert_eq!(balance, Balance::starting(500));
    }

    #[tokio::test]
    async fn when_inventory_missing_returns_empty() {
        let mut inventory_repo = MockInventoryRepo::new();
        inventory_repo.expect_get().returning(|_| Ok(None));

        let wallet = Wallet::new(Arc::new(MockBalanceRepo::new()), Arc::new(inventory_repo), 500);
        let inventory = wallet.inventory(&user()).await.expect("inventory");
        assert_eq!(inventory, Inventory::default());
    }

    #[tokio::test]
    async fn when_store_fails_returns_repo_error() {
        let mut balance_repo = MockBalanceRepo::new();
        balance_repo
            .expect_get()
            .returning(|_| Err(RepoError::storage("get_balance", "connection reset")));

        let wallet = Wallet::new(Arc::new(balance_repo), Arc::new(MockInventoryRepo::new()), 500);
        let result = wallet.balance(&user()).await;
        assert!(matches!(result, Err(RewardError::Repo(_))));
    }
}
