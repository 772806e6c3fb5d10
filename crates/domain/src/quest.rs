//! Quest sets, quest definitions and per-user quest progress.
//!
//! # Lifecycle
//!
//! For each `QuestType` at most one set is active (`expires_at > now`). When
//! none is, a new empty set is created and then populated with generated
//! definitions. Expired sets are never mutated again.
//!
//! # Progress
//!
//! `current` only grows and is clamped to the quest's target. `claimed` flips
//! once, after which the entry is frozen.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::ids::{QuestId, QuestSetId, UserId};
use crate::reward::RewardEnvelope;
use crate::schedule;

// =============================================================================
// Quest type
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestType {
    Daily,
    Weekly,
}

impl QuestType {
    pub fn all() -> [QuestType; 2] {
        [QuestType::Daily, QuestType::Weekly]
    }

    /// Number of quests in a generated set.
    pub fn quest_count(&self) -> usize {
        match self {
            QuestType::Daily => 3,
            QuestType::Weekly => 5,
        }
    }

    /// When a set generated at `now` expires.
    pub fn expiry_after(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            QuestType::Daily => schedule::daily_expiry(now),
            QuestType::Weekly => schedule::weekly_expiry(now),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            QuestType::Daily => "daily",
            QuestType::Weekly => "weekly",
        }
    }
}

impl fmt::Display for QuestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuestType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" => Ok(QuestType::Daily),
            "weekly" => Ok(QuestType::Weekly),
            other => Err(DomainError::parse(format!("Unknown quest type: {}", other))),
        }
    }
}

// =============================================================================
// Archetypes
// =============================================================================

/// Inclusive range a quest target is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetRange {
    pub min: u32,
    pub max: u32,
}

const fn range(min: u32, max: u32) -> Option<TargetRange> {
    Some(TargetRange { min, max })
}

/// Kinds of quest, each tied to one external action key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuestArchetype {
    Pull,
    CompleteMission,
    WinBattle,
    BuyItem,
    SellItem,
    WinDuel,
    OpenChest,
    Gamble,
    Evolve,
}

impl QuestArchetype {
    pub fn all() -> [QuestArchetype; 9] {
        [
            QuestArchetype::Pull,
            QuestArchetype::CompleteMission,
            QuestArchetype::WinBattle,
            QuestArchetype::BuyItem,
            QuestArchetype::SellItem,
            QuestArchetype::WinDuel,
            QuestArchetype::OpenChest,
            QuestArchetype::Gamble,
            QuestArchetype::Evolve,
        ]
    }

    /// Archetypes that can appear in a set of `quest_type`, in table order.
    pub fn available_for(quest_type: QuestType) -> Vec<QuestArchetype> {
        Self::all()
            .into_iter()
            .filter(|a| a.target_range(quest_type).is_some())
            .collect()
    }

    /// External event name that advances this quest.
    pub fn action_key(&self) -> &'static str {
        match self {
            QuestArchetype::Pull => "pull",
            QuestArchetype::CompleteMission => "mission",
            QuestArchetype::WinBattle => "battle",
            QuestArchetype::BuyItem => "buy",
            QuestArchetype::SellItem => "sell",
            QuestArchetype::WinDuel => "duel",
            QuestArchetype::OpenChest => "chest",
            QuestArchetype::Gamble => "gamble",
            QuestArchetype::Evolve => "evolve",
        }
    }

    /// Target range for `quest_type`; `None` when unsupported.
    pub fn target_range(&self, quest_type: QuestType) -> Option<TargetRange> {
        use QuestType::{Daily, Weekly};
        match (self, quest_type) {
            (QuestArchetype::Pull, Daily) => range(3, 5),
            (QuestArchetype::Pull, Weekly) => range(25, 40),
            (QuestArchetype::CompleteMission, Daily) => range(3, 3),
            (QuestArchetype::CompleteMission, Weekly) => range(10, 20),
            (QuestArchetype::WinBattle, Daily) => range(3, 5),
            (QuestArchetype::WinBattle, Weekly) => range(10, 20),
            (QuestArchetype::BuyItem, Daily) => range(1, 1),
            (QuestArchetype::BuyItem, Weekly) => range(5, 5),
            (QuestArchetype::SellItem, _) => range(1, 1),
            (QuestArchetype::WinDuel, Daily) => range(3, 5),
            (QuestArchetype::WinDuel, Weekly) => range(10, 20),
            (QuestArchetype::OpenChest, Daily) => range(3, 5),
            (QuestArchetype::OpenChest, Weekly) => range(10, 20),
            (QuestArchetype::Gamble, Daily) => range(3, 5),
            (QuestArchetype::Gamble, Weekly) => range(10, 20),
            (QuestArchetype::Evolve, Daily) => None,
            (QuestArchetype::Evolve, Weekly) => range(1, 3),
        }
    }

    /// Player-facing text for a quest with `target`.
    pub fn describe(&self, target: u32) -> String {
        let plural = if target == 1 { "" } else { "s" };
        match self {
            QuestArchetype::Pull => format!("Pull {} cards", target),
            QuestArchetype::CompleteMission => format!("Complete {} missions", target),
            QuestArchetype::WinBattle => format!("Win {} battles", target),
            QuestArchetype::BuyItem => format!("Buy {} item{}", target, plural),
            QuestArchetype::SellItem => format!("Sell {} item{}", target, plural),
            QuestArchetype::WinDuel => format!("Win {} duels", target),
            QuestArchetype::OpenChest => format!("Open {} chests", target),
            QuestArchetype::Gamble => format!("Gamble {} times", target),
            QuestArchetype::Evolve => format!("Evolve {} card{}", target, plural),
        }
    }

    /// Build a definition with a fresh id.
    pub fn definition(&self, target: u32, reward: RewardEnvelope) -> QuestDefinition {
        QuestDefinition {
            id: QuestId::new(),
            action: self.action_key().to_string(),
            target,
            description: self.describe(target),
            reward,
        }
    }
}

// =============================================================================
// Definitions and progress
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestDefinition {
    pub id: QuestId,
    /// Action key matched against recorded events (e.g. "pull")
    pub action: String,
    pub target: u32,
    pub description: String,
    pub reward: RewardEnvelope,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestProgress {
    pub current: u32,
    pub claimed: bool,
}

impl QuestProgress {
    /// Advance toward `target`. Claimed entries are frozen.
    ///
    /// Returns true if the stored value changed.
    pub fn advance(&mut self, amount: u32, target: u32) -> bool {
        if self.claimed {
            return false;
        }
        let next = self.current.saturating_add(amount).min(target).max(self.current);
        let changed = next != self.current;
        self.current = next;
        changed
    }

    pub fn is_claimable(&self, target: u32) -> bool {
        !self.claimed && self.current >= target
    }
}

/// Where a quest stands for one user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestStatus {
    InProgress,
    /// Target reached, reward not yet claimed
    Completed,
    Claimed,
}

/// One user's progress across a set, keyed by quest id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserQuestProgress {
    entries: BTreeMap<QuestId, QuestProgress>,
}

impl UserQuestProgress {
    pub fn get(&self, quest_id: &QuestId) -> QuestProgress {
        self.entries.get(quest_id).copied().unwrap_or_default()
    }

    pub fn entry(&mut self, quest_id: QuestId) -> &mut QuestProgress {
        self.entries.entry(quest_id).or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A quest definition paired with one user's progress on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestView {
    pub quest: QuestDefinition,
    pub progress: QuestProgress,
    pub status: QuestStatus,
}

// =============================================================================
// Quest set
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestSet {
    pub id: QuestSetId,
    pub quest_type: QuestType,
    pub generated_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub quests: Vec<QuestDefinition>,
    #[serde(default)]
    pub progress: HashMap<UserId, UserQuestProgress>,
}

impl QuestSet {
    /// New, still-empty set for the epoch starting at `now`.
    pub fn new(quest_type: QuestType, generated_at: DateTime<Utc>, expires_at: DateTime<Utc>) -> Self {
        Self {
            id: QuestSetId::new(),
            quest_type,
            generated_at,
            expires_at,
            quests: Vec::new(),
            progress: HashMap::new(),
        }
    }

    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now
    }

    pub fn is_populated(&self) -> bool {
        !self.quests.is_empty()
    }

    pub fn user_progress(&self, user_id: &UserId) -> UserQuestProgress {
        self.progress.get(user_id).cloned().unwrap_or_default()
    }

    /// Advance every unclaimed quest matching `action`.
    ///
    /// Returns the user's updated progress when anything changed.
    pub fn record_action(
        &mut self,
        user_id: &UserId,
        action: &str,
        amount: u32,
    ) -> Option<UserQuestProgress> {
        let mut progress = self.user_progress(user_id);
        let mut changed = false;
        for quest in self.quests.iter().filter(|q| q.action == action) {
            changed |= progress.entry(quest.id).advance(amount, quest.target);
        }
        if !changed {
            return None;
        }
        self.progress.insert(user_id.clone(), progress.clone());
        Some(progress)
    }

    /// Mark every completed, unclaimed quest as claimed.
    ///
    /// Returns the claimed definitions with the user's updated progress, or
    /// `None` when there was nothing to claim.
    pub fn claim_completed(
        &mut self,
        user_id: &UserId,
    ) -> Option<(Vec<QuestDefinition>, UserQuestProgress)> {
        let mut progress = self.user_progress(user_id);
        let mut claimed = Vec::new();
        for quest in &self.quests {
            let entry = progress.entry(quest.id);
            if entry.is_claimable(quest.target) {
                entry.claimed = true;
                claimed.push(quest.clone());
            }
        }
        if claimed.is_empty() {
            return None;
        }
        self.progress.insert(user_id.clone(), progress.clone());
        Some((claimed, progress))
    }

    /// Quests with the user's progress and status, in set order.
    pub fn board(&self, user_id: &UserId) -> Vec<QuestView> {
        let progress = self.user_progress(user_id);
        self.quests
            .iter()
            .map(|quest| {
                let p = progress.get(&quest.id);
                let status = if p.claimed {
                    QuestStatus::Claimed
                } else if p.current >= quest.target {
                    QuestStatus::Completed
                } else {
                    QuestStatus::InProgress
                };
                QuestView {
                    quest: quest.clone(),
                    progress: p,
                    status,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reward::{ChestCounts, ChestRank, MoneyRange};
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 18, 12, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    fn envelope() -> RewardEnvelope {
        RewardEnvelope {
            money: MoneyRange { min: 100, max: 250 },
            chests: ChestCounts::of(ChestRank::C, 1),
            reset_token_chance: 0.0,
        }
    }

    fn user(s: &str) -> UserId {
        UserId::new(s).expect("valid user id")
    }

    fn set_with(defs: Vec<QuestDefinition>) -> QuestSet {
        let mut set = QuestSet::new(QuestType::Daily, now(), QuestType::Daily.expiry_after(now()));
        set.quests = defs;
        set
    }

    #[test]
    fn evolve_is_weekly_only() {
        let daily = QuestArchetype::available_for(QuestType::Daily);
        let weekly = QuestArchetype::available_for(QuestType::Weekly);
        assert!(!daily.contains(&QuestArchetype::Evolve));
        assert!(weekly.contains(&QuestArchetype::Evolve));
        assert_eq!(daily.len(), 8);
        assert_eq!(weekly.len(), 9);
    }

    #[test]
    fn descriptions_reference_target() {
        assert_eq!(QuestArchetype::Pull.describe(4), "Pull 4 cards");
        assert_eq!(QuestArchetype::BuyItem.describe(1), "Buy 1 item");
        assert_eq!(QuestArchetype::BuyItem.describe(5), "Buy 5 items");
        assert_eq!(QuestArchetype::Evolve.describe(2), "Evolve 2 cards");
    }

    #[test]
    fn quest_type_parses() {
        assert_eq!("Weekly".parse::<QuestType>().expect("type"), QuestType::Weekly);
        assert!("monthly".parse::<QuestType>().is_err());
    }

    #[test]
    fn advance_clamps_at_target() {
        let mut progress = QuestProgress {
            current: 4,
            claimed: false,
        };
        assert!(progress.advance(1, 5));
        assert_eq!(progress.current, 5);
        assert!(!progress.advance(1, 5));
        assert_eq!(progress.current, 5);
    }

    #[test]
    fn claimed_progress_is_frozen() {
        let mut progress = QuestProgress {
            current: 2,
            claimed: true,
        };
        assert!(!progress.advance(3, 5));
        assert_eq!(progress.current, 2);
    }

    #[test]
    fn record_action_only_touches_matching_quests() {
        let pull = QuestArchetype::Pull.definition(5, envelope());
        let duel = QuestArchetype::WinDuel.definition(3, envelope());
        let mut set = set_with(vec![pull.clone(), duel.clone()]);
        let alice = user("alice");

        let updated = set.record_action(&alice, "pull", 2).expect("progress changed");
        assert_eq!(updated.get(&pull.id).current, 2);
        assert_eq!(updated.get(&duel.id).current, 0);
        assert!(set.record_action(&alice, "gamble", 1).is_none());
        assert!(set.user_progress(&user("bob")).is_empty());
    }

    #[test]
    fn claim_marks_only_completed_quests() {
        let pull = QuestArchetype::Pull.definition(2, envelope());
        let duel = QuestArchetype::WinDuel.definition(3, envelope());
        let mut set = set_with(vec![pull.clone(), duel.clone()]);
        let alice = user("alice");
        set.record_action(&alice, "pull", 5);
        set.record_action(&alice, "duel", 1);

        let (claimed, progress) = set.claim_completed(&alice).expect("one quest done");
        assert_eq!(claimed.len(), 1);
        assert_eq!(claimed[0].id, pull.id);
        assert!(progress.get(&pull.id).claimed);
        assert!(!progress.get(&duel.id).claimed);

        assert!(set.claim_completed(&alice).is_none());
        assert!(set.record_action(&alice, "pull", 1).is_none());
    }

    #[test]
    fn board_reports_status() {
        let a = QuestArchetype::Pull.definition(1, envelope());
        let b = QuestArchetype::Gamble.definition(3, envelope());
        let c = QuestArchetype::SellItem.definition(1, envelope());
        let mut set = set_with(vec![a, b, c]);
        let alice = user("alice");
        set.record_action(&alice, "sell", 1);
        set.claim_completed(&alice);
        set.record_action(&alice, "pull", 1);

        let statuses: Vec<_> = set.board(&alice).iter().map(|v| v.status).collect();
        assert_eq!(
            statuses,
            vec![QuestStatus::Completed, QuestStatus::InProgress, QuestStatus::Claimed]
        );
    }

    #[test]
    fn new_set_is_empty_and_active() {
        let set = QuestSet::new(QuestType::Weekly, now(), QuestType::Weekly.expiry_after(now()));
        assert!(!set.is_populated());
        assert!(set.is_active(now()));
        assert!(!set.is_active(set.expires_at));
    }
}
