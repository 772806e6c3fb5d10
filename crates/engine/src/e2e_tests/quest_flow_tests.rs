//! Quest flow: lazy set creation, progress, claiming and expiry.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Duration;
use gacha_domain::{
    ChestCounts, ChestRank, QuestArchetype, QuestDefinition, QuestStatus, QuestType,
};

use super::{reward, E2EContext};
use crate::infrastructure::ports::{BalanceRepo, InventoryRepo};
use crate::test_fixtures::{at, now, user};

/// A weekly quest none of these tests advance.
fn idle_weekly() -> Vec<QuestDefinition> {
    vec![QuestArchetype::Evolve.definition(3, reward(0, ChestCounts::default(), 0.0))]
}

#[tokio::test]
async fn daily_set_is_created_empty_then_populated_on_first_view() {
    let ctx = E2EContext::new(now());
    let quests = &ctx.app.use_cases.quests;

    let empty = quests
        .lifecycle
        .ensure_active(QuestType::Daily, now())
        .await
        .expect("active set");
    assert!(!empty.is_populated());
    assert_eq!(empty.expires_at, at(2026, 10, 19, 0, 0, 0));

    let board = quests
        .board
        .execute(&user("alice"), QuestType::Daily)
        .await
        .expect("board");
    assert_eq!(board.expires_at, at(2026, 10, 19, 0, 0, 0));
    assert_eq!(board.seconds_remaining, 12 * 60 * 60);
    assert_eq!(board.quests.len(), 3);

    let ids: HashSet<_> = board.quests.iter().map(|v| v.quest.id).collect();
    assert_eq!(ids.len(), 3);
    for view in &board.quests {
        assert!(view.quest.description.contains(&view.quest.target.to_string()));
        assert_eq!(view.status, QuestStatus::InProgress);
        assert_ne!(view.quest.action, "evolve");
    }

    // Population reuses the empty set.
    assert_eq!(ctx.store.quest_set_count().await, 1);
}

#[tokio::test]
async fn weekly_set_expires_next_monday() {
    let ctx = E2EContext::new(now());
    let board = ctx
        .app
        .use_cases
        .quests
        .board
        .execute(&user("alice"), QuestType::Weekly)
        .await
        .expect("board");
    // Sunday noon, so the week ends at midnight.
    assert_eq!(board.expires_at, at(2026, 10, 19, 0, 0, 0));
    assert_eq!(board.quests.len(), 5);
}

#[tokio::test]
async fn concurrent_first_views_share_one_set() {
    let ctx = E2EContext::new(now());
    let app = ctx.app.clone();

    let mut handles = Vec::new();
    for _ in 0..10 {
        let app = Arc::clone(&app);
        handles.push(tokio::spawn(async move {
            app.use_cases
                .quests
                .lifecycle
                .current_quests(QuestType::Daily, now())
                .await
                .map(|set| set.id)
        }));
    }

    let mut set_ids = HashSet::new();
    for handle in handles {
        set_ids.insert(handle.await.expect("task").expect("set"));
    }
    assert_eq!(set_ids.len(), 1);
    assert_eq!(ctx.store.quest_set_count().await, 1);
}

#[tokio::test]
async fn progress_clamps_at_target_and_ignores_unknown_actions() {
    let ctx = E2EContext::new(now());
    ctx.seed_quests(
        vec![QuestArchetype::WinBattle.definition(3, reward(100, ChestCounts::default(), 0.0))],
        idle_weekly(),
    )
    .await;
    let alice = user("alice");
    let record = &ctx.app.use_cases.quests.record_action;

    assert!(record.execute(&alice, "battle", 10).await.expect("record"));
    assert!(!record.execute(&alice, "battle", 1).await.expect("record"));
    assert!(!record.execute(&alice, "dance", 1).await.expect("record"));

    let board = ctx
        .app
        .use_cases
        .quests
        .board
        .execute(&alice, QuestType::Daily)
        .await
        .expect("board");
    assert_eq!(board.quests[0].progress.current, 3);
    assert_eq!(board.quests[0].status, QuestStatus::Completed);
}

#[tokio::test]
async fn claim_credits_once_and_freezes_progress() {
    let ctx = E2EContext::new(now());
    ctx.seed_quests(
        vec![
            QuestArchetype::WinBattle.definition(3, reward(200, ChestCounts::of(ChestRank::C, 2), 0.0)),
            QuestArchetype::BuyItem.definition(1, reward(150, ChestCounts::of(ChestRank::B, 1), 0.0)),
            QuestArchetype::SellItem.definition(1, reward(100, ChestCounts::default(), 0.0)),
        ],
        vec![QuestArchetype::Evolve.definition(1, reward(1000, ChestCounts::of(ChestRank::A, 1), 0.0))],
    )
    .await;
    let alice = user("alice");
    let quests = &ctx.app.use_cases.quests;

    quests.record_action.execute(&alice, "battle", 3).await.expect("record");
    quests.record_action.execute(&alice, "buy", 1).await.expect("record");

    let summary = quests.claim.execute(&alice).await.expect("claim");
    assert_eq!(summary.claimed, 2);
    assert_eq!(summary.money, 350);
    assert_eq!(summary.chests.get(ChestRank::C), 2);
    assert_eq!(summary.chests.get(ChestRank::B), 1);
    assert_eq!(summary.reset_tokens, 0);

    let balance = BalanceRepo::get(ctx.store.as_ref(), &alice)
        .await
        .expect("balance")
        .expect("stored");
    assert_eq!(balance.amount, 850);
    let inventory = InventoryRepo::get(ctx.store.as_ref(), &alice)
        .await
        .expect("inventory")
        .expect("stored");
    assert_eq!(inventory.chests.get(ChestRank::C), 2);
    assert_eq!(inventory.chests.get(ChestRank::B), 1);

    // Nothing left to claim.
    let again = quests.claim.execute(&alice).await.expect("claim");
    assert!(again.is_empty());
    let balance = BalanceRepo::get(ctx.store.as_ref(), &alice)
        .await
        .expect("balance")
        .expect("stored");
    assert_eq!(balance.amount, 850);

    // Claimed quests no longer advance.
    assert!(!quests.record_action.execute(&alice, "battle", 1).await.expect("record"));

    let board = quests.board.execute(&alice, QuestType::Daily).await.expect("board");
    let statuses: Vec<_> = board.quests.iter().map(|v| v.status).collect();
    assert_eq!(
        statuses,
        vec![QuestStatus::Claimed, QuestStatus::Claimed, QuestStatus::InProgress]
    );
}

#[tokio::test]
async fn claims_are_per_user() {
    let ctx = E2EContext::new(now());
    ctx.seed_quests(
        vec![QuestArchetype::SellItem.definition(1, reward(120, ChestCounts::default(), 0.0))],
        idle_weekly(),
    )
    .await;
    let (alice, bob) = (user("alice"), user("bob"));
    let quests = &ctx.app.use_cases.quests;

    quests.record_action.execute(&alice, "sell", 1).await.expect("record");
    assert_eq!(quests.claim.execute(&bob).await.expect("claim").claimed, 0);
    assert_eq!(quests.claim.execute(&alice).await.expect("claim").claimed, 1);

    quests.record_action.execute(&bob, "sell", 1).await.expect("record");
    assert_eq!(quests.claim.execute(&bob).await.expect("claim").money, 120);
}

#[tokio::test]
async fn expired_daily_set_is_replaced_at_midnight() {
    let ctx = E2EContext::new(now());
    let seeded = ctx
        .seed_quests(
            vec![QuestArchetype::SellItem.definition(1, reward(100, ChestCounts::default(), 0.0))],
            idle_weekly(),
        )
        .await;
    let alice = user("alice");
    let quests = &ctx.app.use_cases.quests;
    quests.record_action.execute(&alice, "sell", 1).await.expect("record");

    ctx.advance(Duration::hours(12));
    let next = quests
        .lifecycle
        .current_quests(QuestType::Daily, at(2026, 10, 19, 0, 0, 0))
        .await
        .expect("set");
    assert_ne!(next.id, seeded.id);
    assert_eq!(next.generated_at, at(2026, 10, 19, 0, 0, 0));
    assert_eq!(next.expires_at, at(2026, 10, 20, 0, 0, 0));
    assert_eq!(next.quests.len(), 3);
    assert!(next.user_progress(&alice).is_empty());

    // Unclaimed progress on the expired set is forfeited.
    let summary = quests.claim.execute(&alice).await.expect("claim");
    assert_eq!(summary.claimed, 0);
}

#[tokio::test]
async fn concurrent_actions_accumulate_without_lost_updates() {
    let ctx = E2EContext::new(now());
    ctx.seed_quests(
        vec![QuestArchetype::WinBattle.definition(3, reward(100, ChestCounts::default(), 0.0))],
        vec![QuestArchetype::Pull.definition(40, reward(500, ChestCounts::default(), 0.0))],
    )
    .await;
    let alice = user("alice");

    let mut handles = Vec::new();
    for _ in 0..20 {
        let app = Arc::clone(&ctx.app);
        let alice = alice.clone();
        handles.push(tokio::spawn(async move {
            app.use_cases
                .quests
                .record_action
                .execute(&alice, QuestArchetype::Pull.action_key(), 1)
                .await
        }));
    }
    for handle in handles {
        handle.await.expect("task").expect("record action");
    }

    let weekly = ctx
        .app
        .use_cases
        .quests
        .board
        .execute(&alice, QuestType::Weekly)
        .await
        .expect("board");
    assert_eq!(weekly.quests[0].progress.current, 20);
    assert_eq!(weekly.quests[0].status, QuestStatus::InProgress);
}
