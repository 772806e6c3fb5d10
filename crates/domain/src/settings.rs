//! Economy tuning loaded from the environment.
//!
//! Every value has a default, so an empty environment yields the stock game.
//! Values that parse but violate an invariant (a distribution not summing to
//! 100, a zero-length window) are rejected as `InvalidConfiguration`.

use crate::economy::STARTING_BALANCE;
use crate::error::DomainError;
use crate::probability::RankDistribution;
use crate::pull::DEFAULT_MAX_PULLS;
use crate::schedule::DEFAULT_PULL_WINDOW_MS;

const MS_PER_HOUR: i64 = 60 * 60 * 1000;

#[derive(Debug, Clone, PartialEq)]
pub struct EconomySettings {
    // ============================================================================
    // Pulls
    // ============================================================================
    pub pull_window_ms: i64,
    pub max_pulls: u32,
    pub distribution: RankDistribution,

    // ============================================================================
    // Balance & consumables
    // ============================================================================
    pub starting_balance: i64,
    pub xp_per_bottle: u32,
    pub max_chests_per_open: u32,

    // ============================================================================
    // Quest rewards
    // ============================================================================
    /// Chance a claimed daily quest also grants a reset token
    pub daily_reset_token_chance: f64,
    pub weekly_reset_token_chance: f64,
}

impl Default for EconomySettings {
    fn default() -> Self {
        Self {
            pull_window_ms: DEFAULT_PULL_WINDOW_MS,
            max_pulls: DEFAULT_MAX_PULLS,
            distribution: RankDistribution::default(),
            starting_balance: STARTING_BALANCE,
            xp_per_bottle: 10,
            max_chests_per_open: 10,
            daily_reset_token_chance: 0.0,
            weekly_reset_token_chance: 0.0,
        }
    }
}

impl EconomySettings {
    /// Load from `GACHA_*` environment variables, using defaults for missing values.
    pub fn from_env() -> Result<Self, DomainError> {
        let defaults = Self::default();

        let window_hours: i64 = env_or("GACHA_PULL_WINDOW_HOURS", defaults.pull_window_ms / MS_PER_HOUR);
        let distribution = match std::env::var("GACHA_PULL_DISTRIBUTION") {
            Ok(raw) => RankDistribution::parse(&raw)?,
            Err(_) => defaults.distribution,
        };

        let settings = Self {
            pull_window_ms: window_hours.saturating_mul(MS_PER_HOUR),
            max_pulls: env_or("GACHA_MAX_PULLS", defaults.max_pulls),
            distribution,
            starting_balance: env_or("GACHA_STARTING_BALANCE", defaults.starting_balance),
            xp_per_bottle: env_or("GACHA_XP_PER_BOTTLE", defaults.xp_per_bottle),
            max_chests_per_open: env_or("GACHA_MAX_CHESTS_PER_OPEN", defaults.max_chests_per_open),
            daily_reset_token_chance: env_or("GACHA_DAILY_RESET_TOKEN_CHANCE", defaults.daily_reset_token_chance),
            weekly_reset_token_chance: env_or("GACHA_WEEKLY_RESET_TOKEN_CHANCE", defaults.weekly_reset_token_chance),
        };
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.pull_window_ms <= 0 {
            return Err(DomainError::invalid_configuration(
                "Pull window must be at least one hour",
            ));
        }
        if self.max_pulls == 0 {
            return Err(DomainError::invalid_configuration("Max pulls must be positive"));
        }
        if self.max_chests_per_open == 0 {
            return Err(DomainError::invalid_configuration(
                "Max chests per open must be positive",
            ));
        }
        for (name, chance) in [
            ("daily", self.daily_reset_token_chance),
            ("weekly", self.weekly_reset_token_chance),
        ] {
            if !(0.0..=1.0).contains(&chance) {
                return Err(DomainError::invalid_configuration(format!(
                    "The {} reset token chance must be within [0, 1], got {}",
                    name, chance
                )));
            }
        }
        Ok(())
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}
