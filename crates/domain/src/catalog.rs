//! Card catalog - read-only reference table of every card in the game.
//!
//! The catalog is validated once at construction and never mutated afterwards,
//! so it can be shared by `Arc` across every component that needs lookups.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::ids::CardId;
use crate::rank::Rank;

/// Cost of reaching an upgrade variant through the explicit upgrade path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpgradeRequirement {
    pub cost: u64,
    pub min_level: u32,
}

/// A single catalog card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardCatalogEntry {
    pub id: CardId,
    pub name: String,
    #[serde(default)]
    pub title: Option<String>,
    pub rank: Rank,
    pub power: u32,
    /// Inclusive `[min, max]` attack roll
    pub attack_range: [u32; 2],
    #[serde(default)]
    pub health: u32,
    #[serde(default, rename = "type")]
    pub card_type: Option<String>,
    #[serde(default)]
    pub ability: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    /// Successor ids, in order
    #[serde(default)]
    pub evolutions: Vec<CardId>,
    /// Upgrade variants are excluded from direct pulls
    #[serde(default)]
    pub is_upgrade: bool,
    #[serde(default)]
    pub upgrade_requirements: Option<UpgradeRequirement>,
}

/// Immutable, validated card table.
#[derive(Debug, Clone)]
pub struct CardCatalog {
    entries: Vec<CardCatalogEntry>,
    index: HashMap<CardId, usize>,
}

impl CardCatalog {
    /// Build a catalog, checking that it is non-empty, ids are unique and
    /// every evolution reference resolves.
    pub fn new(entries: Vec<CardCatalogEntry>) -> Result<Self, DomainError> {
        if entries.is_empty() {
            return Err(DomainError::invalid_configuration("Card catalog is empty"));
        }

        let mut index = HashMap::with_capacity(entries.len());
        for (position, entry) in entries.iter().enumerate() {
            if index.insert(entry.id.clone(), position).is_some() {
                return Err(DomainError::invalid_configuration(format!(
                    "Duplicate card id in catalog: {}",
                    entry.id
                )));
            }
            let [min, max] = entry.attack_range;
            if min > max {
                return Err(DomainError::invalid_configuration(format!(
                    "Card {} has an inverted attack range {}-{}",
                    entry.id, min, max
                )));
            }
        }

        for entry in &entries {
            if let Some(missing) = entry.evolutions.iter().find(|id| !index.contains_key(*id)) {
                return Err(DomainError::invalid_configuration(format!(
                    "Card {} evolves into unknown card {}",
                    entry.id, missing
                )));
            }
        }

        Ok(Self { entries, index })
    }

    pub fn lookup(&self, id: &CardId) -> Option<&CardCatalogEntry> {
        self.index.get(id).map(|&position| &self.entries[position])
    }

    /// Lookup that reports a miss as `NotFound`.
    pub fn get(&self, id: &CardId) -> Result<&CardCatalogEntry, DomainError> {
        self.lookup(id)
            .ok_or_else(|| DomainError::not_found("Card", id.as_str()))
    }

    pub fn all(&self) -> &[CardCatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Cards a pull of `rank` may yield.
    ///
    /// Non-upgrade cards of the rank; otherwise every non-upgrade card;
    /// otherwise the whole catalog. Never empty because the catalog never is.
    pub fn pull_candidates(&self, rank: Rank) -> Vec<&CardCatalogEntry> {
        let of_rank: Vec<_> = self
            .entries
            .iter()
            .filter(|c| !c.is_upgrade && c.rank == rank)
            .collect();
        if !of_rank.is_empty() {
            return of_rank;
        }

        let pullable: Vec<_> = self.entries.iter().filter(|c| !c.is_upgrade).collect();
        if !pullable.is_empty() {
            return pullable;
        }

        self.entries.iter().collect()
    }

    /// Pick a pull result for `rank`; `pick` maps a candidate count to an index.
    pub fn select_for_pull(
        &self,
        rank: Rank,
        pick: impl FnOnce(usize) -> usize,
    ) -> Option<&CardCatalogEntry> {
        let candidates = self.pull_candidates(rank);
        let last = candidates.len().checked_sub(1)?;
        candidates.get(pick(candidates.len()).min(last)).copied()
    }

    /// Resolve a free-text query: exact id, exact name, name prefix, then
    /// substring of name or id. Case-insensitive; first match in catalog order.
    pub fn find(&self, query: &str) -> Option<&CardCatalogEntry> {
        let q = query.trim().to_lowercase();
        if q.is_empty() {
            return None;
        }

        let tier = |c: &CardCatalogEntry| -> Option<u8> {
            let id = c.id.as_str().to_lowercase();
            let name = c.name.to_lowercase();
            if id == q {
                Some(0)
            } else if name == q {
                Some(1)
            } else if name.starts_with(&q) {
                Some(2)
            } else if name.contains(&q) || id.contains(&q) {
                Some(3)
            } else {
                None
            }
        };

        self.entries
            .iter()
            .filter_map(|c| tier(c).map(|t| (t, c)))
            .min_by_key(|(t, _)| *t)
            .map(|(_, c)| c)
    }

    /// The card followed by everything reachable through its evolutions,
    /// depth-first, each card at most once.
    pub fn evolution_chain(&self, root: &CardId) -> Vec<&CardCatalogEntry> {
        let mut chain = Vec::new();
        let mut visited = HashSet::new();
        let mut stack = vec![root.clone()];

        while let Some(id) = stack.pop() {
            if !visited.insert(id.clone()) {
                continue;
            }
            let Some(card) = self.lookup(&id) else {
                continue;
            };
            chain.push(card);
            // Reverse so the first evolution is walked first.
            stack.extend(card.evolutions.iter().rev().cloned());
        }

        chain
    }
}
