//! Weighted rank distribution for pulls.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;
use crate::rank::Rank;

/// Allowed deviation of the distribution total from 100%.
const TOTAL_TOLERANCE: f64 = 1e-6;

/// One bucket of the distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PullBucket {
    Card(Rank),
    /// Non-card outcome; resolves to the lowest rank
    Item,
}

impl PullBucket {
    /// The rank a draw landing in this bucket yields.
    pub fn rank(&self) -> Rank {
        match self {
            PullBucket::Card(rank) => *rank,
            PullBucket::Item => Rank::LOWEST,
        }
    }
}

impl fmt::Display for PullBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PullBucket::Card(rank) => write!(f, "{}", rank),
            PullBucket::Item => f.write_str("ITEM"),
        }
    }
}

impl FromStr for PullBucket {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("ITEM") {
            return Ok(PullBucket::Item);
        }
        s.parse::<Rank>()
            .map(PullBucket::Card)
            .map_err(|_| DomainError::invalid_configuration(format!("Unknown pull bucket: {}", s.trim())))
    }
}

/// Ordered bucket → percentage mapping, validated to total 100.
///
/// Order matters: draws are matched against cumulative sums in this order.
#[derive(Debug, Clone, PartialEq)]
pub struct RankDistribution {
    buckets: Vec<(PullBucket, f64)>,
}

impl RankDistribution {
    pub fn new(buckets: Vec<(PullBucket, f64)>) -> Result<Self, DomainError> {
        if buckets.is_empty() {
            return Err(DomainError::invalid_configuration(
                "Pull distribution has no buckets",
            ));
        }
        if let Some((bucket, pct)) = buckets.iter().find(|(_, pct)| !pct.is_finite() || *pct < 0.0) {
            return Err(DomainError::invalid_configuration(format!(
                "Pull distribution bucket {} has invalid percentage {}",
                bucket, pct
            )));
        }
        for (i, (bucket, _)) in buckets.iter().enumerate() {
            if buckets[..i].iter().any(|(b, _)| b == bucket) {
                return Err(DomainError::invalid_configuration(format!(
                    "Pull distribution lists {} twice",
                    bucket
                )));
            }
        }
        let total: f64 = buckets.iter().map(|(_, pct)| pct).sum();
        if (total - 100.0).abs() > TOTAL_TOLERANCE {
            return Err(DomainError::invalid_configuration(format!(
                "Pull distribution sums to {} instead of 100",
                total
            )));
        }
        Ok(Self { buckets })
    }

    /// Parse `"C:50,B:30,A:15,S:3,ITEM:2"`.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let buckets = raw
            .split(',')
            .filter(|part| !part.trim().is_empty())
            .map(|part| -> Result<(PullBucket, f64), DomainError> {
                let (bucket, pct) = part.split_once(':').ok_or_else(|| {
                    DomainError::invalid_configuration(format!(
                        "Pull distribution entry '{}' is not BUCKET:PERCENT",
                        part.trim()
                    ))
                })?;
                let pct = pct.trim().parse::<f64>().map_err(|_| {
                    DomainError::invalid_configuration(format!(
                        "Pull distribution percentage '{}' is not a number",
                        pct.trim()
                    ))
                })?;
                Ok((bucket.parse::<PullBucket>()?, pct))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(buckets)
    }

    pub fn buckets(&self) -> &[(PullBucket, f64)] {
        &self.buckets
    }

    /// Resolve a uniform draw in `[0, 100)` to a rank.
    ///
    /// The first bucket whose cumulative upper bound is at least `draw` wins;
    /// item buckets and unmatched draws yield the lowest rank.
    pub fn select(&self, draw: f64) -> Rank {
        let mut cumulative = 0.0;
        for (bucket, pct) in &self.buckets {
            cumulative += pct;
            if draw <= cumulative {
                return bucket.rank();
            }
        }
        Rank::LOWEST
    }
}

impl Default for RankDistribution {
    fn default() -> Self {
        Self {
            buckets: vec![
                (PullBucket::Card(Rank::C), 50.0),
                (PullBucket::Card(Rank::B), 30.0),
                (PullBucket::Card(Rank::A), 15.0),
                (PullBucket::Card(Rank::S), 3.0),
                (PullBucket::Item, 2.0),
            ],
        }
    }
}

impl fmt::Display for RankDistribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .buckets
            .iter()
            .map(|(bucket, pct)| format!("{}:{}", bucket, pct))
            .collect();
        f.write_str(&parts.join(","))
    }
}
