//! Card info use case.
//!
//! Resolves a free-text query against the catalog and reports the user's
//! copy of the card together with its evolution chain.

use std::sync::Arc;

use gacha_domain::{CardCatalog, CardCatalogEntry, DomainError, OwnedCard, UserId};
use serde::Serialize;

use crate::infrastructure::ports::CardProgressRepo;

use super::error::CollectionError;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardInfoView {
    pub card: CardCatalogEntry,
    pub owned: Option<OwnedCard>,
    /// Evolutions reachable from the card, depth-first, excluding the card itself
    pub evolutions: Vec<CardCatalogEntry>,
}

pub struct CardInfo {
    catalog: Arc<CardCatalog>,
    repo: Arc<dyn CardProgressRepo>,
}

impl CardInfo {
    pub fn new(catalog: Arc<CardCatalog>, repo: Arc<dyn CardProgressRepo>) -> Self {
        Self { catalog, repo }
    }

    pub async fn execute(
        &self,
        user_id: &UserId,
        query: &str,
    ) -> Result<CardInfoView, CollectionError> {
        let card = self
            .catalog
            .find(query)
            .ok_or_else(|| DomainError::not_found("Card", query.trim()))?;

        let owned = self
            .repo
            .get(user_id)
            .await?
            .and_then(|collection| collection.get(&card.id).cloned())
            .filter(|owned| owned.count > 0);

        let evolutions = self
            .catalog
            .evolution_chain(&card.id)
            .into_iter()
            .skip(1)
            .cloned()
            .collect();

        Ok(CardInfoView {
            card: card.clone(),
            owned,
            evolutions,
        })
    }
}
