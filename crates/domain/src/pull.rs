//! Per-user pull allowance within a fixed time window.

use serde::{Deserialize, Serialize};

/// Default number of pulls granted per window.
pub const DEFAULT_MAX_PULLS: u32 = 7;

/// Pull counter for one user.
///
/// `used` only has meaning relative to `window`; a state read for a later
/// window is treated as fresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PullState {
    pub window: i64,
    pub used: u32,
    /// Lifetime count of granted pulls
    #[serde(default)]
    pub total_pulls: u64,
}

impl PullState {
    pub fn new(window: i64) -> Self {
        Self {
            window,
            used: 0,
            total_pulls: 0,
        }
    }

    /// Move to `current_window`, clearing usage if it changed.
    ///
    /// Returns true when a reset happened.
    pub fn roll_window(&mut self, current_window: i64) -> bool {
        if self.window == current_window {
            return false;
        }
        self.window = current_window;
        self.used = 0;
        true
    }

    /// Roll the window, then spend one pull if any are left.
    ///
    /// Both steps happen on the same value, so callers persisting the result
    /// write the reset and the consumption together.
    pub fn try_consume(&mut self, current_window: i64, max_pulls: u32) -> bool {
        self.roll_window(current_window);
        if self.used >= max_pulls {
            return false;
        }
        self.used += 1;
        self.total_pulls = self.total_pulls.saturating_add(1);
        true
    }

    /// Clear usage for `current_window` (reset-token redemption).
    pub fn reset_usage(&mut self, current_window: i64) {
        self.window = current_window;
        self.used = 0;
    }

    pub fn remaining(&self, max_pulls: u32) -> u32 {
        max_pulls.saturating_sub(self.used)
    }
}
