//! Gacha domain: cards, pulls, quests and rewards.
//!
//! Pure types and rules. Nothing here touches storage, clocks or RNGs; time is
//! passed in and randomness arrives as draw values or closures.

pub mod catalog;
pub mod collection;
pub mod economy;
pub mod error;
pub mod ids;
pub mod probability;
pub mod pull;
pub mod quest;
pub mod rank;
pub mod reward;
pub mod schedule;
pub mod settings;

pub use catalog::{CardCatalog, CardCatalogEntry, UpgradeRequirement};
pub use collection::{AcquisitionResult, CardCollection, OwnedCard, XpGrant, XP_PER_LEVEL};
pub use economy::{Balance, BalanceDelta, Inventory, STARTING_BALANCE};
pub use error::DomainError;
pub use ids::{CardId, QuestId, QuestSetId, UserId};
pub use probability::{PullBucket, RankDistribution};
pub use pull::{PullState, DEFAULT_MAX_PULLS};
pub use quest::{
    QuestArchetype, QuestDefinition, QuestProgress, QuestSet, QuestStatus, QuestType, QuestView,
    TargetRange, UserQuestProgress,
};
pub use rank::Rank;
pub use reward::{
    ChestCounts, ChestLoot, ChestRank, ChestRoll, ChestRollTable, ClaimSummary, MoneyRange,
    QuestRewardTable, RewardEnvelope, RewardGrant,
};
pub use settings::EconomySettings;
