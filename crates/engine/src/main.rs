//! Gacha simulator - drives the engine against the in-memory store.
//!
//! Each simulated user pulls until the window is exhausted, works through the
//! quest boards, claims, opens chests and feeds XP bottles to a card. One extra
//! user fires a burst of concurrent pulls to exercise the rate limiter.

use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gacha_domain::{
    Balance, ChestRank, ClaimSummary, EconomySettings, Inventory, QuestArchetype, QuestStatus,
    QuestType, UserId,
};
use gacha_engine::infrastructure::catalog::load_catalog;
use gacha_engine::infrastructure::clock::{SeededRandom, SystemClock, SystemRandom};
use gacha_engine::infrastructure::ports::RandomPort;
use gacha_engine::use_cases::pulls::{ConsumeResult, PullOutcome};
use gacha_engine::App;

const STORM_PULLS: usize = 20;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UserReport {
    user_id: UserId,
    pulls: u32,
    new_cards: u32,
    duplicates: u32,
    pull_status: ConsumeResult,
    claimed: ClaimSummary,
    chests_opened: u32,
    bottles_used: u32,
    balance: Balance,
    inventory: Inventory,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StormReport {
    user_id: UserId,
    attempted: usize,
    granted: usize,
    rejected: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SimulationReport {
    users: Vec<UserReport>,
    storm: StormReport,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment from repo root (the simulator may run from `crates/engine`).
    load_dotenv_from_repo_root();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gacha_engine=debug,gacha_sim=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting gacha simulator");

    // Load configuration
    let settings = EconomySettings::from_env()?;
    let catalog_path = std::env::var("GACHA_CATALOG_PATH").ok().map(PathBuf::from);
    let catalog = Arc::new(load_catalog(catalog_path.as_deref())?);
    let user_count: usize = std::env::var("GACHA_SIM_USERS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(3);

    let random: Arc<dyn RandomPort> = match std::env::var("GACHA_SIM_SEED")
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
    {
        Some(seed) => {
            tracing::info!(seed = seed, "Using seeded RNG");
            Arc::new(SeededRandom::new(seed))
        }
        None => Arc::new(SystemRandom::new()),
    };

    let app = Arc::new(App::in_memory(
        catalog,
        settings,
        Arc::new(SystemClock::new()),
        random,
    )?);

    // Simulate users concurrently
    let mut handles = Vec::with_capacity(user_count);
    for i in 0..user_count {
        let app = app.clone();
        let user_id = UserId::new(format!("sim-user-{}", i + 1))?;
        handles.push(tokio::spawn(async move { simulate_user(&app, user_id).await }));
    }
    let mut users = Vec::with_capacity(user_count);
    for handle in handles {
        users.push(handle.await??);
    }

    let storm = pull_storm(&app, UserId::new("sim-storm")?).await?;
    if storm.granted > app.settings.max_pulls as usize {
        tracing::error!(
            granted = storm.granted,
            max_pulls = app.settings.max_pulls,
            "Rate limiter let through more pulls than allowed"
        );
    }

    let report = SimulationReport { users, storm };
    println!("{}", serde_json::to_string_pretty(&report)?);

    tracing::info!("Simulation complete");
    Ok(())
}

async fn simulate_user(app: &App, user_id: UserId) -> anyhow::Result<UserReport> {
    let use_cases = &app.use_cases;
    let mut pulls = 0;
    let mut new_cards = 0;
    let mut duplicates = 0;

    // Pull until the window is exhausted
    loop {
        match use_cases.pulls.perform_pull.execute(&user_id).await? {
            PullOutcome::Pulled(result) => {
                pulls += 1;
                if result.acquisition.is_new {
                    new_cards += 1;
                } else {
                    duplicates += 1;
                }
            }
            PullOutcome::Exhausted { next_reset_at, .. } => {
                tracing::info!(user_id = %user_id, pulls = pulls, next_reset_at = %next_reset_at, "Pull window exhausted");
                break;
            }
        }
    }

    let pull_status = use_cases
        .pulls
        .limiter
        .status(&user_id, chrono::Utc::now())
        .await?;

    // Finish the open quests on both boards
    for quest_type in QuestType::all() {
        let board = use_cases.quests.board.execute(&user_id, quest_type).await?;
        for view in board.quests {
            // Pull quests only advance through real pulls
            if view.status != QuestStatus::InProgress
                || view.quest.action == QuestArchetype::Pull.action_key()
            {
                continue;
            }
            let missing = view.quest.target.saturating_sub(view.progress.current);
            use_cases
                .quests
                .record_action
                .execute(&user_id, &view.quest.action, missing)
                .await?;
        }
    }
    let claimed = use_cases.quests.claim.execute(&user_id).await?;

    // Open whatever chests the claim produced
    let max_per_open = app.settings.max_chests_per_open;
    let mut chests_opened = 0;
    for rank in ChestRank::all() {
        let mut left = use_cases.rewards.wallet.inventory(&user_id).await?.chests.get(rank);
        while left > 0 {
            let batch = left.min(max_per_open);
            let opening = use_cases.rewards.open_chests.execute(&user_id, rank, batch).await?;
            chests_opened += opening.opened;
            left -= batch;
        }
    }

    // Feed all bottles to the first owned card
    let mut bottles_used = 0;
    let bottles = use_cases.rewards.wallet.inventory(&user_id).await?.xp_bottles;
    let collection = use_cases.collection.ledger.collection(&user_id).await?;
    if let Some((card_id, _)) = collection.iter().next() {
        if bottles > 0 {
            let outcome = use_cases
                .collection
                .use_xp_bottles
                .execute(&user_id, card_id.as_str(), bottles)
                .await?;
            bottles_used = outcome.bottles_used;
        }
    }

    Ok(UserReport {
        balance: use_cases.rewards.wallet.balance(&user_id).await?,
        inventory: use_cases.rewards.wallet.inventory(&user_id).await?,
        user_id,
        pulls,
        new_cards,
        duplicates,
        pull_status,
        claimed,
        chests_opened,
        bottles_used,
    })
}

async fn pull_storm(app: &Arc<App>, user_id: UserId) -> anyhow::Result<StormReport> {
    let mut handles = Vec::with_capacity(STORM_PULLS);
    for _ in 0..STORM_PULLS {
        let app = app.clone();
        let user_id = user_id.clone();
        handles.push(tokio::spawn(async move {
            app.use_cases.pulls.perform_pull.execute(&user_id).await
        }));
    }

    let mut granted = 0;
    for handle in handles {
        if matches!(handle.await??, PullOutcome::Pulled(_)) {
            granted += 1;
        }
    }
    tracing::info!(user_id = %user_id, attempted = STORM_PULLS, granted = granted, "Pull storm finished");

    Ok(StormReport {
        user_id,
        attempted: STORM_PULLS,
        granted,
        rejected: STORM_PULLS - granted,
    })
}

fn load_dotenv_from_repo_root() {
    let repo_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..");

    // Prefer local overrides.
    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}
