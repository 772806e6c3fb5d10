//! Reward descriptors: quest envelopes, chest tables and realized grants.
//!
//! Everything here is deterministic given its draws. The engine's reward
//! generator supplies the randomness.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;
use crate::quest::QuestType;

// =============================================================================
// Chests
// =============================================================================

/// Ranks a reward chest can have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ChestRank {
    C,
    B,
    A,
}

impl ChestRank {
    pub fn all() -> [ChestRank; 3] {
        [ChestRank::C, ChestRank::B, ChestRank::A]
    }

    /// Inclusive yen range rolled per opened chest.
    pub fn yen_range(&self) -> (i64, i64) {
        match self {
            ChestRank::C => (100, 500),
            ChestRank::B => (250, 1000),
            ChestRank::A => (1000, 2000),
        }
    }

    /// Inclusive XP bottle range rolled per opened chest.
    pub fn bottle_range(&self) -> (u32, u32) {
        match self {
            ChestRank::C => (1, 3),
            ChestRank::B => (2, 5),
            ChestRank::A => (5, 10),
        }
    }
}

impl fmt::Display for ChestRank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChestRank::C => f.write_str("C"),
            ChestRank::B => f.write_str("B"),
            ChestRank::A => f.write_str("A"),
        }
    }
}

impl FromStr for ChestRank {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "C" => Ok(ChestRank::C),
            "B" => Ok(ChestRank::B),
            "A" => Ok(ChestRank::A),
            other => Err(DomainError::invalid_configuration(format!(
                "No chest exists for rank {}",
                other
            ))),
        }
    }
}

/// Chest quantities per rank.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChestCounts {
    #[serde(rename = "C", default)]
    pub c: u32,
    #[serde(rename = "B", default)]
    pub b: u32,
    #[serde(rename = "A", default)]
    pub a: u32,
}

impl ChestCounts {
    pub fn of(rank: ChestRank, count: u32) -> Self {
        let mut counts = Self::default();
        counts.add(rank, count);
        counts
    }

    pub fn get(&self, rank: ChestRank) -> u32 {
        match rank {
            ChestRank::C => self.c,
            ChestRank::B => self.b,
            ChestRank::A => self.a,
        }
    }

    fn slot(&mut self, rank: ChestRank) -> &mut u32 {
        match rank {
            ChestRank::C => &mut self.c,
            ChestRank::B => &mut self.b,
            ChestRank::A => &mut self.a,
        }
    }

    pub fn add(&mut self, rank: ChestRank, count: u32) {
        let slot = self.slot(rank);
        *slot = slot.saturating_add(count);
    }

    pub fn merge(&mut self, other: &ChestCounts) {
        for (rank, count) in other.iter() {
            self.add(rank, count);
        }
    }

    /// Take `count` chests of `rank`, or report how many are held.
    pub fn remove(&mut self, rank: ChestRank, count: u32) -> Result<(), DomainError> {
        let slot = self.slot(rank);
        if *slot < count {
            return Err(DomainError::insufficient(
                "chests",
                u64::from(count),
                u64::from(*slot),
            ));
        }
        *slot -= count;
        Ok(())
    }

    pub fn total(&self) -> u32 {
        self.c.saturating_add(self.b).saturating_add(self.a)
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Non-zero entries, lowest rank first.
    pub fn iter(&self) -> impl Iterator<Item = (ChestRank, u32)> + '_ {
        ChestRank::all()
            .into_iter()
            .map(|rank| (rank, self.get(rank)))
            .filter(|(_, count)| *count > 0)
    }
}

/// What opening chests produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChestLoot {
    pub yen: i64,
    pub xp_bottles: u32,
}

// =============================================================================
// Chest roll tables
// =============================================================================

/// One outcome of a chest roll and its probability mass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChestRoll {
    pub chance: f64,
    pub chests: ChestCounts,
}

/// Net probability mass per chest outcome; masses total 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChestRollTable {
    outcomes: Vec<ChestRoll>,
}

impl ChestRollTable {
    pub fn new(outcomes: Vec<ChestRoll>) -> Result<Self, DomainError> {
        if outcomes.is_empty() {
            return Err(DomainError::invalid_configuration("Chest roll table is empty"));
        }
        if outcomes.iter().any(|o| !o.chance.is_finite() || o.chance < 0.0) {
            return Err(DomainError::invalid_configuration(
                "Chest roll table has a negative or non-finite chance",
            ));
        }
        let total: f64 = outcomes.iter().map(|o| o.chance).sum();
        if (total - 1.0).abs() > 1e-9 {
            return Err(DomainError::invalid_configuration(format!(
                "Chest roll table sums to {} instead of 1",
                total
            )));
        }
        Ok(Self { outcomes })
    }

    /// Daily: 1×C 75%, 2×C 18%, 2×B 7%.
    pub fn daily() -> Self {
        Self {
            outcomes: vec![
                ChestRoll {
                    chance: 0.75,
                    chests: ChestCounts::of(ChestRank::C, 1),
                },
                ChestRoll {
                    chance: 0.18,
                    chests: ChestCounts::of(ChestRank::C, 2),
                },
                ChestRoll {
                    chance: 0.07,
                    chests: ChestCounts::of(ChestRank::B, 2),
                },
            ],
        }
    }

    /// Weekly: 1×C 10%, 1×B 45%, 1×A 45%.
    pub fn weekly() -> Self {
        Self {
            outcomes: vec![
                ChestRoll {
                    chance: 0.10,
                    chests: ChestCounts::of(ChestRank::C, 1),
                },
                ChestRoll {
                    chance: 0.45,
                    chests: ChestCounts::of(ChestRank::B, 1),
                },
                ChestRoll {
                    chance: 0.45,
                    chests: ChestCounts::of(ChestRank::A, 1),
                },
            ],
        }
    }

    pub fn outcomes(&self) -> &[ChestRoll] {
        &self.outcomes
    }

    /// Resolve a uniform draw in `[0, 1)`.
    pub fn roll(&self, draw: f64) -> ChestCounts {
        let mut cumulative = 0.0;
        for outcome in &self.outcomes {
            cumulative += outcome.chance;
            if draw < cumulative {
                return outcome.chests;
            }
        }
        // Rounding can leave the last band a hair short of 1.
        self.outcomes
            .last()
            .map(|o| o.chests)
            .unwrap_or_default()
    }
}

// =============================================================================
// Quest reward envelopes
// =============================================================================

/// Inclusive money range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoneyRange {
    pub min: i64,
    pub max: i64,
}

impl MoneyRange {
    pub fn new(min: i64, max: i64) -> Result<Self, DomainError> {
        if min < 0 || min > max {
            return Err(DomainError::invalid_configuration(format!(
                "Invalid money range {}-{}",
                min, max
            )));
        }
        Ok(Self { min, max })
    }
}

/// The promise attached to a quest; realized into a `RewardGrant` on claim.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardEnvelope {
    pub money: MoneyRange,
    pub chests: ChestCounts,
    /// Probability in `[0, 1]` of granting one reset token
    pub reset_token_chance: f64,
}

impl RewardEnvelope {
    /// Turn the envelope into a concrete grant.
    ///
    /// `roll_money` draws uniformly from the inclusive range it is given and
    /// `token_draw` is a uniform draw in `[0, 1)`.
    pub fn realize(&self, roll_money: impl FnOnce(i64, i64) -> i64, token_draw: f64) -> RewardGrant {
        let money = roll_money(self.money.min, self.money.max).clamp(self.money.min, self.money.max);
        let reset_tokens = u32::from(self.reset_token_chance > 0.0 && token_draw < self.reset_token_chance);
        RewardGrant {
            money,
            chests: self.chests,
            reset_tokens,
        }
    }
}

/// Per-quest-type reward configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestRewardTable {
    pub money: MoneyRange,
    pub chests: ChestRollTable,
    pub reset_token_chance: f64,
}

impl QuestRewardTable {
    pub fn for_type(quest_type: QuestType) -> Self {
        match quest_type {
            QuestType::Daily => Self {
                money: MoneyRange { min: 100, max: 250 },
                chests: ChestRollTable::daily(),
                reset_token_chance: 0.0,
            },
            QuestType::Weekly => Self {
                money: MoneyRange {
                    min: 1000,
                    max: 2000,
                },
                chests: ChestRollTable::weekly(),
                reset_token_chance: 0.0,
            },
        }
    }

    pub fn with_reset_token_chance(mut self, chance: f64) -> Result<Self, DomainError> {
        if !(0.0..=1.0).contains(&chance) {
            return Err(DomainError::invalid_configuration(format!(
                "Reset token chance {} is outside [0, 1]",
                chance
            )));
        }
        self.reset_token_chance = chance;
        Ok(self)
    }

    /// Build an envelope from a chest draw in `[0, 1)`.
    pub fn envelope(&self, chest_draw: f64) -> RewardEnvelope {
        RewardEnvelope {
            money: self.money,
            chests: self.chests.roll(chest_draw),
            reset_token_chance: self.reset_token_chance,
        }
    }
}

// =============================================================================
// Realized rewards
// =============================================================================

/// A concrete reward for one claimed quest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardGrant {
    pub money: i64,
    pub chests: ChestCounts,
    pub reset_tokens: u32,
}

/// Totals across every quest claimed in one request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimSummary {
    pub claimed: u32,
    pub money: i64,
    pub chests: ChestCounts,
    pub reset_tokens: u32,
}

impl ClaimSummary {
    pub fn add(&mut self, grant: &RewardGrant) {
        self.claimed += 1;
        self.money = self.money.saturating_add(grant.money);
        self.chests.merge(&grant.chests);
        self.reset_tokens = self.reset_tokens.saturating_add(grant.reset_tokens);
    }

    pub fn merge(&mut self, other: &ClaimSummary) {
        self.claimed += other.claimed;
        self.money = self.money.saturating_add(other.money);
        self.chests.merge(&other.chests);
        self.reset_tokens = self.reset_tokens.saturating_add(other.reset_tokens);
    }

    pub fn is_empty(&self) -> bool {
        self.claimed == 0
    }
}
