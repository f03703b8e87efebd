//! Regular-season standings built from team game records

use crate::records::{GameOutcome, Location, TeamGameRecord};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Only games of this phase count towards the standings
pub const STANDINGS_PHASE: &str = "RS";

const LAST_GAMES_WINDOW: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandingRow {
    pub season: i32,
    pub phase: String,
    pub position: i32,
    pub team_code: String,
    pub name: String,
    pub logo: Option<String>,
    pub wins: i32,
    pub losses: i32,
    /// W / (W + L), rounded to three decimals
    pub win_percent: f64,
    pub diff: i32,
    pub home: String,
    pub away: String,
    pub last_ten: String,
    pub streak: String,
}

fn win_loss(games: &[&TeamGameRecord]) -> (i32, i32) {
    games.iter().fold((0, 0), |(w, l), g| match g.result {
        GameOutcome::Win => (w + 1, l),
        GameOutcome::Loss => (w, l + 1),
        GameOutcome::Draw => (w, l),
    })
}

fn record_text(games: &[&TeamGameRecord]) -> String {
    let (w, l) = win_loss(games);
    format!("{}-{}", w, l)
}

/// Current streak counted back from the most recent game: `W3`, `L1`, or
/// `0` when there are no games or the last one was a draw.
pub fn streak(results: &[GameOutcome]) -> String {
    let Some(&last) = results.last() else {
        return "0".to_string();
    };

    let prefix = match last {
        GameOutcome::Win => "W",
        GameOutcome::Loss => "L",
        GameOutcome::Draw => return "0".to_string(),
    };
    let length = results.iter().rev().take_while(|&&r| r == last).count();
    format!("{}{}", prefix, length)
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Build standings for every season present in `records`
pub fn build_standings(records: &[TeamGameRecord]) -> Vec<StandingRow> {
    let mut groups: BTreeMap<(i32, &str), Vec<&TeamGameRecord>> = BTreeMap::new();
    for record in records.iter().filter(|r| r.phase == STANDINGS_PHASE) {
        groups.entry((record.season, record.team_code.as_str())).or_default().push(record);
    }

    let mut by_season: BTreeMap<i32, Vec<StandingRow>> = BTreeMap::new();
    for ((season, team_code), mut games) in groups {
        games.sort_by(|a, b| a.game_date.cmp(&b.game_date));
        let Some(latest) = games.last().copied() else {
            continue;
        };

        let (wins, losses) = win_loss(&games);
        let decided = wins + losses;
        let win_percent = if decided > 0 { round3(wins as f64 / decided as f64) } else { 0.0 };
        let diff = games.iter().map(|g| g.team_score - g.opponent_score).sum();

        let home: Vec<&TeamGameRecord> =
            games.iter().copied().filter(|g| g.location == Location::Home).collect();
        let away: Vec<&TeamGameRecord> =
            games.iter().copied().filter(|g| g.location == Location::Away).collect();
        let last_ten = &games[games.len().saturating_sub(LAST_GAMES_WINDOW)..];
        let results: Vec<GameOutcome> = games.iter().map(|g| g.result).collect();

        by_season.entry(season).or_default().push(StandingRow {
            season,
            phase: STANDINGS_PHASE.to_string(),
            position: 0,
            team_code: team_code.to_string(),
            name: latest.team.clone(),
            logo: latest.team_logo.clone(),
            wins,
            losses,
            win_percent,
            diff,
            home: record_text(&home),
            away: record_text(&away),
            last_ten: record_text(last_ten),
            streak: streak(&results),
        });
    }

    let mut standings = Vec::new();
    for (_, mut rows) in by_season {
        rows.sort_by(|a, b| {
            b.wins
                .cmp(&a.wins)
                .then_with(|| b.diff.cmp(&a.diff))
                .then_with(|| a.team_code.cmp(&b.team_code))
        });
        for (index, row) in rows.iter_mut().enumerate() {
            row.position = index as i32 + 1;
        }
        standings.extend(rows);
    }
    standings
}
