//! Application state and composition.

use std::sync::Arc;

use gacha_domain::{CardCatalog, DomainError, EconomySettings};

use crate::infrastructure::{
    locks::UserLocks,
    memory::InMemoryStore,
    ports::{
        BalanceRepo, CardProgressRepo, ClockPort, InventoryRepo, PullStateRepo, QuestSetRepo,
        RandomPort,
    },
};
use crate::use_cases::{self, CollectionUseCases, PullUseCases, QuestUseCases, RewardUseCases};

/// Main application state.
///
/// Holds the repositories, the loaded catalog and every use case. Cloning the
/// `Arc<App>` is how callers share it across tasks.
pub struct App {
    pub repositories: Repositories,
    pub catalog: Arc<CardCatalog>,
    pub settings: EconomySettings,
    pub use_cases: UseCases,
}

/// Container for all repository ports.
#[derive(Clone)]
pub struct Repositories {
    pub pulls: Arc<dyn PullStateRepo>,
    pub cards: Arc<dyn CardProgressRepo>,
    pub quests: Arc<dyn QuestSetRepo>,
    pub balance: Arc<dyn BalanceRepo>,
    pub inventory: Arc<dyn InventoryRepo>,
}

impl Repositories {
    /// Every port backed by one in-memory store.
    pub fn in_memory(store: Arc<InMemoryStore>) -> Self {
        Self {
            pulls: store.clone(),
            cards: store.clone(),
            quests: store.clone(),
            balance: store.clone(),
            inventory: store,
        }
    }
}

/// Container for all use cases.
pub struct UseCases {
    pub pulls: PullUseCases,
    pub collection: CollectionUseCases,
    pub quests: QuestUseCases,
    pub rewards: RewardUseCases,
}

impl App {
    /// Create a new App with all dependencies wired up.
    ///
    /// Fails when `settings` violate an invariant.
    pub fn new(
        repos: Repositories,
        catalog: Arc<CardCatalog>,
        settings: EconomySettings,
        clock: Arc<dyn ClockPort>,
        random: Arc<dyn RandomPort>,
    ) -> Result<Self, DomainError> {
        settings.validate()?;

        // One lock table for every per-user document
        let locks = Arc::new(UserLocks::new());

        // Rewards (shared with quests)
        let reward_generator = Arc::new(use_cases::rewards::RewardGenerator::new(random.clone()));
        let rewards = RewardUseCases::new(
            reward_generator.clone(),
            Arc::new(use_cases::rewards::OpenChests::new(
                repos.balance.clone(),
                repos.inventory.clone(),
                reward_generator.clone(),
                locks.clone(),
                settings.max_chests_per_open,
            )),
            Arc::new(use_cases::rewards::Wallet::new(
                repos.balance.clone(),
                repos.inventory.clone(),
                settings.starting_balance,
            )),
        );

        // Quests
        let quest_generator = Arc::new(use_cases::quests::QuestGenerator::new(
            random.clone(),
            reward_generator.clone(),
            &settings,
        )?);
        let lifecycle = Arc::new(use_cases::quests::QuestLifecycle::new(
            repos.quests.clone(),
            quest_generator,
        ));
        let record_action = Arc::new(use_cases::quests::RecordQuestAction::new(
            lifecycle.clone(),
            repos.quests.clone(),
            locks.clone(),
            clock.clone(),
        ));
        let quests = QuestUseCases::new(
            lifecycle.clone(),
            record_action.clone(),
            Arc::new(use_cases::quests::ClaimQuestRewards::new(
                lifecycle.clone(),
                repos.quests.clone(),
                repos.balance.clone(),
                repos.inventory.clone(),
                reward_generator,
                locks.clone(),
                clock.clone(),
            )),
            Arc::new(use_cases::quests::QuestBoard::new(lifecycle, clock.clone())),
        );

        // Collection
        let ledger = Arc::new(use_cases::collection::CardProgressLedger::new(
            repos.cards.clone(),
            locks.clone(),
        ));
        let collection = CollectionUseCases::new(
            ledger.clone(),
            Arc::new(use_cases::collection::CardInfo::new(
                catalog.clone(),
                repos.cards.clone(),
            )),
            Arc::new(use_cases::collection::UseXpBottles::new(
                catalog.clone(),
                repos.cards.clone(),
                repos.inventory.clone(),
                locks.clone(),
                settings.xp_per_bottle,
            )),
        );

        // Pulls
        let limiter = Arc::new(use_cases::pulls::PullRateLimiter::new(
            repos.pulls.clone(),
            locks.clone(),
            settings.pull_window_ms,
            settings.max_pulls,
        ));
        let selector = Arc::new(use_cases::pulls::ProbabilitySelector::new(
            catalog.clone(),
            settings.distribution.clone(),
            random,
        ));
        let pulls = PullUseCases::new(
            limiter.clone(),
            selector.clone(),
            Arc::new(use_cases::pulls::PerformPull::new(
                limiter,
                selector,
                ledger,
                record_action,
                clock.clone(),
            )),
            Arc::new(use_cases::pulls::ResetPulls::new(
                repos.pulls.clone(),
                repos.balance.clone(),
                locks,
                clock,
                settings.pull_window_ms,
            )),
        );

        tracing::debug!(
            cards = catalog.len(),
            max_pulls = settings.max_pulls,
            pull_window_ms = settings.pull_window_ms,
            "Application wired"
        );

        Ok(Self {
            repositories: repos,
            catalog,
            settings,
            use_cases: UseCases {
                pulls,
                collection,
                quests,
                rewards,
            },
        })
    }

    /// An App over a fresh in-memory store.
    pub fn in_memory(
        catalog: Arc<CardCatalog>,
        settings: EconomySettings,
        clock: Arc<dyn ClockPort>,
        random: Arc<dyn RandomPort>,
    ) -> Result<Self, DomainError> {
        let store = Arc::new(InMemoryStore::new(settings.starting_balance));
        Self::new(Repositories::in_memory(store), catalog, settings, clock, random)
    }
}
