//! Competitions and their phase calendars

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Phase group shared by the regular season and the top-16 round
pub const REGULAR_SEASON_GROUP: &str = "RS";

/// Phase group for every knockout phase
pub const PLAYOFFS_GROUP: &str = "Playoffs";

/// The two competitions served by the stats provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Competition {
    /// Top-tier league, provider code `E`
    Euroleague,
    /// Second-tier league, provider code `U`
    Eurocup,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown competition: {0}")]
pub struct UnknownCompetition(pub String);

impl Competition {
    pub const ALL: [Competition; 2] = [Competition::Euroleague, Competition::Eurocup];

    /// Single-letter code used by the provider in season codes (`E2024`)
    pub fn code(self) -> &'static str {
        match self {
            Competition::Euroleague => "E",
            Competition::Eurocup => "U",
        }
    }

    /// Lowercase name used in destination table names
    pub fn slug(self) -> &'static str {
        match self {
            Competition::Euroleague => "euroleague",
            Competition::Eurocup => "eurocup",
        }
    }

    /// Provider season code, e.g. `E2024`
    pub fn season_code(self, season: i32) -> String {
        format!("{}{}", self.code(), season)
    }

    /// Position of a phase in the competition calendar. Unknown phases
    /// return `None` and sort after every known phase.
    pub fn phase_order(self, phase: &str) -> Option<u8> {
        let order = match (self, phase) {
            (_, "RS") => 0,
            (_, "TS") => 1,
            (Competition::Euroleague, "PI") => 2,
            (Competition::Euroleague, "PO") => 3,
            (Competition::Euroleague, "FF") => 4,
            (Competition::Eurocup, "8F") => 2,
            (Competition::Eurocup, "4F") => 3,
            _ => return None,
        };
        Some(order)
    }

    /// Collapse a phase code into the group that running records and
    /// advanced stats are computed over.
    pub fn phase_group(self, phase: &str) -> String {
        match (self, phase) {
            (_, "RS" | "TS") => REGULAR_SEASON_GROUP.to_string(),
            (Competition::Euroleague, "PI" | "PO" | "FF") => PLAYOFFS_GROUP.to_string(),
            (Competition::Eurocup, "2F" | "4F" | "8F" | "Final") => PLAYOFFS_GROUP.to_string(),
            (_, other) => other.to_string(),
        }
    }
}

/// Phase bucket used for player season stats
pub fn phase_bucket(phase: &str) -> &'static str {
    match phase {
        "RS" | "TS" => "Regular Season",
        _ => "Playoffs",
    }
}

impl fmt::Display for Competition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for Competition {
    type Err = UnknownCompetition;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "e" | "euroleague" => Ok(Competition::Euroleague),
            "u" | "eurocup" => Ok(Competition::Eurocup),
            other => Err(UnknownCompetition(other.to_string())),
        }
    }
}
