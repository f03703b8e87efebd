//! Player season stats aggregated from game logs

use crate::boxscore::CountingStats;
use crate::competition::phase_bucket;
use crate::gamelogs::GameLogRow;
use crate::ingest::SkipReason;
use crate::records::TeamDirectory;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

const DID_NOT_PLAY: &str = "DNP";

/// Counting stats reported per game, per 40 minutes and as totals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PlayerStat {
    Points,
    TwoPointersMade,
    TwoPointersAttempted,
    ThreePointersMade,
    ThreePointersAttempted,
    FreeThrowsMade,
    FreeThrowsAttempted,
    OffensiveRebounds,
    DefensiveRebounds,
    TotalRebounds,
    Assists,
    Steals,
    Turnovers,
    Blocks,
    BlocksAgainst,
    FoulsCommitted,
    FoulsDrawn,
    Pir,
}

impl PlayerStat {
    pub const COUNT: usize = 18;

    pub const ALL: [PlayerStat; PlayerStat::COUNT] = [
        PlayerStat::Points,
        PlayerStat::TwoPointersMade,
        PlayerStat::TwoPointersAttempted,
        PlayerStat::ThreePointersMade,
        PlayerStat::ThreePointersAttempted,
        PlayerStat::FreeThrowsMade,
        PlayerStat::FreeThrowsAttempted,
        PlayerStat::OffensiveRebounds,
        PlayerStat::DefensiveRebounds,
        PlayerStat::TotalRebounds,
        PlayerStat::Assists,
        PlayerStat::Steals,
        PlayerStat::Turnovers,
        PlayerStat::Blocks,
        PlayerStat::BlocksAgainst,
        PlayerStat::FoulsCommitted,
        PlayerStat::FoulsDrawn,
        PlayerStat::Pir,
    ];

    /// (per game, per 40, total) column names
    pub fn columns(self) -> (&'static str, &'static str, &'static str) {
        match self {
            PlayerStat::Points => ("points_scored", "points_scored_per_40", "total_points"),
            PlayerStat::TwoPointersMade => (
                "two_pointers_made",
                "two_pointers_made_per_40",
                "total_two_pointers_made",
            ),
            PlayerStat::TwoPointersAttempted => (
                "two_pointers_attempted",
                "two_pointers_attempted_per_40",
                "total_two_pointers_attempted",
            ),
            PlayerStat::ThreePointersMade => (
                "three_pointers_made",
                "three_pointers_made_per_40",
                "total_three_pointers_made",
            ),
            PlayerStat::ThreePointersAttempted => (
                "three_pointers_attempted",
                "three_pointers_attempted_per_40",
                "total_three_pointers_attempted",
            ),
            PlayerStat::FreeThrowsMade => (
                "free_throws_made",
                "free_throws_made_per_40",
                "total_free_throws_made",
            ),
            PlayerStat::FreeThrowsAttempted => (
                "free_throws_attempted",
                "free_throws_attempted_per_40",
                "total_free_throws_attempted",
            ),
            PlayerStat::OffensiveRebounds => (
                "offensive_rebounds",
                "offensive_rebounds_per_40",
                "total_offensive_rebounds",
            ),
            PlayerStat::DefensiveRebounds => (
                "defensive_rebounds",
                "defensive_rebounds_per_40",
                "total_defensive_rebounds",
            ),
            PlayerStat::TotalRebounds => {
                ("total_rebounds", "total_rebounds_per_40", "total_total_rebounds")
            }
            PlayerStat::Assists => ("assists", "assists_per_40", "total_assists"),
            PlayerStat::Steals => ("steals", "steals_per_40", "total_steals"),
            PlayerStat::Turnovers => ("turnovers", "turnovers_per_40", "total_turnovers"),
            PlayerStat::Blocks => ("blocks", "blocks_per_40", "total_blocks"),
            PlayerStat::BlocksAgainst => {
                ("blocks_against", "blocks_against_per_40", "total_blocks_against")
            }
            PlayerStat::FoulsCommitted => {
                ("fouls_commited", "fouls_commited_per_40", "total_fouls_commited")
            }
            PlayerStat::FoulsDrawn => ("fouls_drawn", "fouls_drawn_per_40", "total_fouls_drawn"),
            PlayerStat::Pir => ("pir", "pir_per_40", "total_pir"),
        }
    }

    pub fn value(self, stats: &CountingStats) -> f64 {
        match self {
            PlayerStat::Points => stats.points,
            PlayerStat::TwoPointersMade => stats.fg2_made,
            PlayerStat::TwoPointersAttempted => stats.fg2_attempted,
            PlayerStat::ThreePointersMade => stats.fg3_made,
            PlayerStat::ThreePointersAttempted => stats.fg3_attempted,
            PlayerStat::FreeThrowsMade => stats.ft_made,
            PlayerStat::FreeThrowsAttempted => stats.ft_attempted,
            PlayerStat::OffensiveRebounds => stats.offensive_rebounds,
            PlayerStat::DefensiveRebounds => stats.defensive_rebounds,
            PlayerStat::TotalRebounds => stats.total_rebounds,
            PlayerStat::Assists => stats.assists,
            PlayerStat::Steals => stats.steals,
            PlayerStat::Turnovers => stats.turnovers,
            PlayerStat::Blocks => stats.blocks_favour,
            PlayerStat::BlocksAgainst => stats.blocks_against,
            PlayerStat::FoulsCommitted => stats.fouls_committed,
            PlayerStat::FoulsDrawn => stats.fouls_received,
            PlayerStat::Pir => stats.valuation,
        }
    }
}

/// Per-game average, per-40 rate and total of one stat
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatLine {
    pub per_game: f64,
    /// `None` when the player logged no minutes
    pub per_40: Option<f64>,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSeasonStats {
    pub season: i32,
    /// `Regular Season` or `Playoffs`
    pub phase: String,
    pub player_id: String,
    pub player_name: String,
    pub team_code: String,
    pub team_name: String,
    pub team_logo: Option<String>,
    pub games_played: i64,
    pub games_started: i64,
    pub minutes_played: f64,
    pub total_minutes: f64,
    pub two_pointers_percentage: f64,
    pub three_pointers_percentage: f64,
    pub free_throws_percentage: f64,
    pub stats: BTreeMap<PlayerStat, StatLine>,
}

impl PlayerSeasonStats {
    pub fn stat(&self, stat: PlayerStat) -> StatLine {
        self.stats.get(&stat).copied().unwrap_or(StatLine { per_game: 0.0, per_40: None, total: 0.0 })
    }
}

/// Read the provider's minutes text as a decimal number, the way the
/// dashboard always has: "25:30" becomes 25.30.
pub fn minutes_as_decimal(minutes: &str) -> Result<f64, SkipReason> {
    minutes.trim().replace(':', ".").parse::<f64>().map_err(|_| SkipReason::InvalidValue {
        field: "Minutes",
        value: minutes.to_string(),
    })
}

fn played_minutes(row: &GameLogRow) -> Option<&str> {
    let player = row.line.player.as_deref()?.trim();
    if player.is_empty() || player.eq_ignore_ascii_case("total") || player.eq_ignore_ascii_case("team") {
        return None;
    }
    match row.line.minutes.as_deref() {
        Some(m) if !m.is_empty() && m != DID_NOT_PLAY => Some(m),
        _ => None,
    }
}

#[derive(Default)]
struct PlayerAccumulator<'a> {
    player_name: &'a str,
    games: i64,
    started: i64,
    minutes: f64,
    sums: CountingStats,
}

fn percentage(made: f64, attempted: f64) -> f64 {
    if attempted > 0.0 {
        made / attempted * 100.0
    } else {
        0.0
    }
}

/// Aggregate player lines into season stats per phase bucket and team.
/// Lines whose team is not in the directory are left out.
pub fn build_player_stats(logs: &[GameLogRow], directory: &TeamDirectory) -> Vec<PlayerSeasonStats> {
    let mut groups: BTreeMap<(i32, &str, &str, &str), PlayerAccumulator> = BTreeMap::new();
    let mut unreadable = 0usize;

    for row in logs {
        let Some(minutes) = played_minutes(row) else {
            continue;
        };
        if directory.get(row.line.season, &row.line.team).is_none() {
            continue;
        }
        let minutes = match minutes_as_decimal(minutes) {
            Ok(m) => m,
            Err(_) => {
                unreadable += 1;
                continue;
            }
        };

        let key = (
            row.line.season,
            phase_bucket(&row.line.phase),
            row.line.player_id.as_str(),
            row.line.team.as_str(),
        );
        let acc = groups.entry(key).or_default();
        acc.games += 1;
        if row.line.is_starter == Some(1.0) {
            acc.started += 1;
        }
        acc.minutes += minutes;
        acc.sums += row.line.counting();
        if let Some(name) = row.line.player.as_deref() {
            if name > acc.player_name {
                acc.player_name = name;
            }
        }
    }

    if unreadable > 0 {
        warn!("Left out {} game log lines with unreadable minutes", unreadable);
    }

    groups
        .into_iter()
        .filter_map(|((season, phase, player_id, team_code), acc)| {
            let team = directory.get(season, team_code)?;
            let games = acc.games as f64;
            let stats = PlayerStat::ALL
                .iter()
                .map(|&stat| {
                    let total = stat.value(&acc.sums);
                    let line = StatLine {
                        per_game: total / games,
                        per_40: (acc.minutes != 0.0).then(|| total * 40.0 / acc.minutes),
                        total,
                    };
                    (stat, line)
                })
                .collect();

            Some(PlayerSeasonStats {
                season,
                phase: phase.to_string(),
                player_id: player_id.to_string(),
                player_name: acc.player_name.to_string(),
                team_code: team_code.to_string(),
                team_name: team.name.clone(),
                team_logo: team.logo.clone(),
                games_played: acc.games,
                games_started: acc.started,
                minutes_played: acc.minutes / games,
                total_minutes: acc.minutes,
                two_pointers_percentage: percentage(acc.sums.fg2_made, acc.sums.fg2_attempted),
                three_pointers_percentage: percentage(acc.sums.fg3_made, acc.sums.fg3_attempted),
                free_throws_percentage: percentage(acc.sums.ft_made, acc.sums.ft_attempted),
                stats,
            })
        })
        .collect()
}
