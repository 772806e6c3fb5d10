//! Balances and inventories credited by the engine.

use serde::{Deserialize, Serialize};

use crate::reward::ChestCounts;

/// Money granted to a user seen for the first time.
pub const STARTING_BALANCE: i64 = 500;

/// A user's currency and reset tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Balance {
    pub amount: i64,
    #[serde(default)]
    pub reset_tokens: u32,
}

impl Balance {
    pub fn starting(amount: i64) -> Self {
        Self {
            amount,
            reset_tokens: 0,
        }
    }

    /// Apply a delta; token counts floor at zero.
    pub fn apply(&mut self, delta: &BalanceDelta) {
        self.amount = self.amount.saturating_add(delta.amount);
        let tokens = i64::from(self.reset_tokens).saturating_add(delta.reset_tokens);
        self.reset_tokens = u32::try_from(tokens.max(0)).unwrap_or(u32::MAX);
    }
}

impl Default for Balance {
    fn default() -> Self {
        Self::starting(STARTING_BALANCE)
    }
}

/// Signed change to a balance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceDelta {
    pub amount: i64,
    pub reset_tokens: i64,
}

impl BalanceDelta {
    pub fn money(amount: i64) -> Self {
        Self {
            amount,
            reset_tokens: 0,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.amount == 0 && self.reset_tokens == 0
    }
}

/// Consumables held by a user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Inventory {
    #[serde(default)]
    pub chests: ChestCounts,
    #[serde(default)]
    pub xp_bottles: u32,
}
