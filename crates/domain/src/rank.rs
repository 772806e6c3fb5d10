//! Card rank tiers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;

/// Tier label of a catalog card.
///
/// Ordering follows the ordinal value, so `Rank::C < Rank::Ur`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Rank {
    C,
    B,
    A,
    S,
    #[serde(rename = "SS")]
    Ss,
    #[serde(rename = "UR")]
    Ur,
}

impl Rank {
    /// Lowest rank; the fallback for non-card or unmatched draws.
    pub const LOWEST: Rank = Rank::C;

    pub fn all() -> [Rank; 6] {
        [Rank::C, Rank::B, Rank::A, Rank::S, Rank::Ss, Rank::Ur]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Rank::C => "C",
            Rank::B => "B",
            Rank::A => "A",
            Rank::S => "S",
            Rank::Ss => "SS",
            Rank::Ur => "UR",
        }
    }

    /// Ordinal used for sorting upgrade chains.
    pub fn value(&self) -> u8 {
        match self {
            Rank::C => 1,
            Rank::B => 2,
            Rank::A => 3,
            Rank::S => 4,
            Rank::Ss => 5,
            Rank::Ur => 6,
        }
    }

    /// Display color (RGB).
    pub fn color(&self) -> u32 {
        match self {
            Rank::C => 0x95a5a6,
            Rank::B => 0x3498db,
            Rank::A => 0x9b59b6,
            Rank::S => 0xe74c3c,
            Rank::Ss => 0xff8c00,
            Rank::Ur => 0x8b0000,
        }
    }

    /// XP granted when a duplicate of a card with this rank is pulled.
    ///
    /// Ranks above S are never in the pull pool and grant nothing.
    pub fn duplicate_xp(&self) -> u32 {
        match self {
            Rank::C => 20,
            Rank::B => 50,
            Rank::A => 75,
            Rank::S => 100,
            Rank::Ss | Rank::Ur => 0,
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Rank {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "C" => Ok(Rank::C),
            "B" => Ok(Rank::B),
            "A" => Ok(Rank::A),
            "S" => Ok(Rank::S),
            "SS" => Ok(Rank::Ss),
            "UR" => Ok(Rank::Ur),
            other => Err(DomainError::parse(format!("Unknown rank: {}", other))),
        }
    }
}
