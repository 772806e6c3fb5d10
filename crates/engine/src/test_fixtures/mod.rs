//! Shared helpers for unit and end-to-end tests.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use gacha_domain::{CardCatalog, CardCatalogEntry, CardId, Rank, UpgradeRequirement, UserId};

/// Sunday 2026-10-18 12:00 UTC.
pub fn now() -> DateTime<Utc> {
    at(2026, 10, 18, 12, 0, 0)
}

pub fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, mo, d, h, mi, s)
        .single()
        .expect("valid timestamp")
}

pub fn user(id: &str) -> UserId {
    UserId::new(id).expect("valid user id")
}

pub fn card_id(id: &str) -> CardId {
    CardId::new(id).expect("valid card id")
}

pub fn card(id: &str, rank: Rank, is_upgrade: bool) -> CardCatalogEntry {
    CardCatalogEntry {
        id: card_id(id),
        name: id.replace('_', " "),
        title: None,
        rank,
        power: 10,
        attack_range: [1, 2],
        health: 10,
        card_type: Some("Attack".to_string()),
        ability: None,
        image: None,
        evolutions: Vec::new(),
        is_upgrade,
        upgrade_requirements: is_upgrade.then_some(UpgradeRequirement {
            cost: 2000,
            min_level: 20,
        }),
    }
}

/// One pullable card per base rank plus an upgrade variant for each.
pub fn catalog() -> Arc<CardCatalog> {
    let entries = vec![
        card("deckhand_c_01", Rank::C, false),
        card("deckhand_c_02", Rank::C, true),
        card("zoro_b_01", Rank::B, false),
        card("zoro_b_02", Rank::B, true),
        card("beckman_a_01", Rank::A, false),
        card("luffy_a_02", Rank::A, true),
        card("shanks_s_01", Rank::S, false),
        card("zoro_s_02", Rank::S, true),
    ];
    Arc::new(CardCatalog::new(entries).expect("valid catalog"))
}
