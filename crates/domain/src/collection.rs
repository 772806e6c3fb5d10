//! Owned cards and their experience/level progression.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::ids::CardId;
use crate::rank::Rank;

/// Experience needed for one level.
pub const XP_PER_LEVEL: u32 = 100;

/// A user's copy of one catalog card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnedCard {
    pub count: u32,
    /// Always below `XP_PER_LEVEL` after a mutation
    pub xp: u32,
    pub level: u32,
    pub acquired_at: DateTime<Utc>,
}

impl OwnedCard {
    pub fn new(acquired_at: DateTime<Utc>) -> Self {
        Self {
            count: 1,
            xp: 0,
            level: 0,
            acquired_at,
        }
    }

    /// Add experience and apply level-ups one at a time.
    ///
    /// Returns the number of levels gained.
    pub fn add_xp(&mut self, gain: u32) -> u32 {
        self.xp = self.xp.saturating_add(gain);
        let mut gained = 0;
        while self.xp >= XP_PER_LEVEL {
            self.xp -= XP_PER_LEVEL;
            self.level = self.level.saturating_add(1);
            gained += 1;
        }
        gained
    }
}

/// Outcome of adding a card to a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcquisitionResult {
    pub is_new: bool,
    pub xp_gained: u32,
    pub leveled_up: bool,
    pub new_level: u32,
}

/// Outcome of feeding bonus experience to an owned card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct XpGrant {
    pub xp_added: u32,
    pub levels_gained: u32,
    pub xp: u32,
    pub level: u32,
}

/// Every card a user owns, keyed by card id (one entry per id).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardCollection {
    cards: BTreeMap<CardId, OwnedCard>,
}

impl CardCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, card_id: &CardId) -> Option<&OwnedCard> {
        self.cards.get(card_id)
    }

    /// Owned means an entry with a positive count.
    pub fn owns(&self, card_id: &CardId) -> bool {
        self.get(card_id).is_some_and(|c| c.count > 0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CardId, &OwnedCard)> {
        self.cards.iter()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Record a pulled card.
    ///
    /// A first copy starts at level 0; a duplicate is converted into the
    /// rank's duplicate XP.
    pub fn apply_acquisition(
        &mut self,
        card_id: &CardId,
        rank: Rank,
        now: DateTime<Utc>,
    ) -> AcquisitionResult {
        match self.cards.get_mut(card_id).filter(|c| c.count > 0) {
            Some(owned) => {
                let xp_gained = rank.duplicate_xp();
                owned.count = owned.count.saturating_add(1);
                let levels = owned.add_xp(xp_gained);
                AcquisitionResult {
                    is_new: false,
                    xp_gained,
                    leveled_up: levels > 0,
                    new_level: owned.level,
                }
            }
            None => {
                self.cards.insert(card_id.clone(), OwnedCard::new(now));
                AcquisitionResult {
                    is_new: true,
                    xp_gained: 0,
                    leveled_up: false,
                    new_level: 0,
                }
            }
        }
    }

    /// Add experience from a consumable to a card the user owns.
    pub fn grant_xp(&mut self, card_id: &CardId, xp: u32) -> Result<XpGrant, DomainError> {
        let owned = self
            .cards
            .get_mut(card_id)
            .filter(|c| c.count > 0)
            .ok_or_else(|| DomainError::not_found("Owned card", card_id.as_str()))?;
        let levels_gained = owned.add_xp(xp);
        Ok(XpGrant {
            xp_added: xp,
            levels_gained,
            xp: owned.xp,
            level: owned.level,
        })
    }
}
