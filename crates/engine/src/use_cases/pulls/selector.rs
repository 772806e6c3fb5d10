//! Probability selector - rank draw followed by a uniform card pick.

use std::sync::Arc;

use gacha_domain::{CardCatalog, CardCatalogEntry, Rank, RankDistribution};

use crate::infrastructure::ports::{pick_index, RandomPort};

pub struct ProbabilitySelector {
    catalog: Arc<CardCatalog>,
    distribution: RankDistribution,
    random: Arc<dyn RandomPort>,
}

impl ProbabilitySelector {
    pub fn new(
        catalog: Arc<CardCatalog>,
        distribution: RankDistribution,
        random: Arc<dyn RandomPort>,
    ) -> Self {
        Self {
            catalog,
            distribution,
            random,
        }
    }

    /// One uniform draw in `[0, 100)` resolved against the distribution.
    pub fn select_rank(&self) -> Rank {
        self.distribution.select(self.random.gen_unit() * 100.0)
    }

    /// Uniform pick among the pull candidates for `rank`.
    pub fn select_card(&self, rank: Rank) -> Option<CardCatalogEntry> {
        self.catalog
            .select_for_pull(rank, |len| pick_index(self.random.as_ref(), len))
            .cloned()
    }

    /// Rank draw and card pick in one step.
    pub fn draw(&self) -> Option<(Rank, CardCatalogEntry)> {
        let rank = self.select_rank();
        self.select_card(rank).map(|card| (rank, card))
    }
}
