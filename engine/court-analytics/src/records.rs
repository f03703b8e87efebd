//! Per-team game records with a running win-loss count

use crate::competition::Competition;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

/// One side of a played game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClubScore {
    pub code: String,
    pub name: String,
    pub crest: Option<String>,
    pub score: i32,
}

/// A played game from the season schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameResult {
    pub season: i32,
    pub phase: String,
    pub round: i32,
    pub gamecode: i32,
    /// Local tip-off time as ISO text
    pub date: String,
    pub local: ClubScore,
    pub road: ClubScore,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOutcome {
    Win,
    Loss,
    Draw,
}

impl GameOutcome {
    pub fn from_scores(team: i32, opponent: i32) -> Self {
        match team.cmp(&opponent) {
            Ordering::Greater => GameOutcome::Win,
            Ordering::Less => GameOutcome::Loss,
            Ordering::Equal => GameOutcome::Draw,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            GameOutcome::Win => "Win",
            GameOutcome::Loss => "Loss",
            GameOutcome::Draw => "Draw",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Location {
    Home,
    Away,
}

impl Location {
    pub fn as_str(self) -> &'static str {
        match self {
            Location::Home => "Home",
            Location::Away => "Away",
        }
    }
}

/// A game seen from one team's side
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamGameRecord {
    pub team: String,
    pub team_code: String,
    pub team_logo: Option<String>,
    pub game_date: String,
    pub opponent: String,
    pub opponent_code: String,
    pub opponent_logo: Option<String>,
    pub round: i32,
    pub result: GameOutcome,
    pub location: Location,
    /// Running "W-L" inside the current phase group
    pub record: String,
    pub team_score: i32,
    pub opponent_score: i32,
    pub gamecode: i32,
    pub season: i32,
    pub phase: String,
    pub phase_group: String,
}

fn perspective(game: &GameResult, location: Location) -> TeamGameRecord {
    let (team, opponent) = match location {
        Location::Home => (&game.local, &game.road),
        Location::Away => (&game.road, &game.local),
    };

    TeamGameRecord {
        team: team.name.clone(),
        team_code: team.code.clone(),
        team_logo: team.crest.clone(),
        game_date: game.date.clone(),
        opponent: opponent.name.clone(),
        opponent_code: opponent.code.clone(),
        opponent_logo: opponent.crest.clone(),
        round: game.round,
        result: GameOutcome::from_scores(team.score, opponent.score),
        location,
        record: String::new(),
        team_score: team.score,
        opponent_score: opponent.score,
        gamecode: game.gamecode,
        season: game.season,
        phase: game.phase.clone(),
        phase_group: String::new(),
    }
}

/// Expand games into two team-side records and fill in the running
/// record. Wins and losses restart whenever a team moves into a new phase
/// group or a new season.
pub fn build_team_records(competition: Competition, games: &[GameResult]) -> Vec<TeamGameRecord> {
    let mut by_team: BTreeMap<String, Vec<TeamGameRecord>> = BTreeMap::new();
    for game in games {
        for location in [Location::Home, Location::Away] {
            let mut record = perspective(game, location);
            record.phase_group = competition.phase_group(&record.phase);
            by_team.entry(record.team.clone()).or_default().push(record);
        }
    }

    let mut records = Vec::with_capacity(games.len() * 2);
    for (_, mut team_games) in by_team {
        team_games.sort_by(|a, b| {
            a.season
                .cmp(&b.season)
                .then_with(|| {
                    phase_rank(competition, &a.phase).cmp(&phase_rank(competition, &b.phase))
                })
                .then_with(|| a.round.cmp(&b.round))
                .then_with(|| a.game_date.cmp(&b.game_date))
        });

        let mut current: Option<(i32, String)> = None;
        let (mut wins, mut losses) = (0, 0);
        for mut record in team_games {
            let group = (record.season, record.phase_group.clone());
            if current.as_ref() != Some(&group) {
                current = Some(group);
                wins = 0;
                losses = 0;
            }
            match record.result {
                GameOutcome::Win => wins += 1,
                GameOutcome::Loss => losses += 1,
                GameOutcome::Draw => {}
            }
            record.record = format!("{}-{}", wins, losses);
            records.push(record);
        }
    }

    records.sort_by(|a, b| {
        a.team
            .cmp(&b.team)
            .then_with(|| a.season.cmp(&b.season))
            .then_with(|| a.phase_group.cmp(&b.phase_group))
            .then_with(|| a.round.cmp(&b.round))
            .then_with(|| a.game_date.cmp(&b.game_date))
    });
    records
}

// Known phases first in calendar order, unknown ones last
fn phase_rank(competition: Competition, phase: &str) -> u8 {
    competition.phase_order(phase).unwrap_or(u8::MAX)
}

/// Team name and logo per (season, team code)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamInfo {
    pub name: String,
    pub logo: Option<String>,
}

/// Lookup of team names and logos built from the season's game records
#[derive(Debug, Clone, Default)]
pub struct TeamDirectory {
    teams: HashMap<(i32, String), TeamInfo>,
}

impl TeamDirectory {
    pub fn from_records(records: &[TeamGameRecord]) -> Self {
        let mut teams = HashMap::new();
        for record in records {
            teams.entry((record.season, record.team_code.clone())).or_insert_with(|| TeamInfo {
                name: record.team.clone(),
                logo: record.team_logo.clone(),
            });
        }
        Self { teams }
    }

    pub fn get(&self, season: i32, team_code: &str) -> Option<&TeamInfo> {
        self.teams.get(&(season, team_code.to_string()))
    }

    pub fn len(&self) -> usize {
        self.teams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::game;
    use super::*;

    fn team_records(records: &[TeamGameRecord], code: &str) -> Vec<TeamGameRecord> {
        records.iter().filter(|r| r.team_code == code).cloned().collect()
    }

    #[test]
    fn test_two_records_per_game() {
        let games = vec![game(2024, "RS", 1, 1, ("MAD", 80), ("PAN", 75))];
        let records = build_team_records(Competition::Euroleague, &games);

        assert_eq!(records.len(), 2);
        let mad = &team_records(&records, "MAD")[0];
        assert_eq!(mad.result, GameOutcome::Win);
        assert_eq!(mad.location, Location::Home);
        assert_eq!(mad.record, "1-0");
        assert_eq!(mad.opponent_code, "PAN");

        let pan = &team_records(&records, "PAN")[0];
        assert_eq!(pan.result, GameOutcome::Loss);
        assert_eq!(pan.location, Location::Away);
        assert_eq!(pan.record, "0-1");
        assert_eq!(pan.team_score, 75);
        assert_eq!(pan.opponent_score, 80);
    }

    #[test]
    fn test_running_record_resets_on_phase_group_change() {
        let games = vec![
            game(2024, "RS", 1, 1, ("MAD", 80), ("PAN", 75)),
            game(2024, "RS", 2, 2, ("PAN", 90), ("MAD", 70)),
            game(2024, "TS", 3, 3, ("MAD", 85), ("PAN", 84)),
            game(2024, "PO", 1, 4, ("MAD", 60), ("PAN", 70)),
            game(2024, "PO", 2, 5, ("MAD", 77), ("PAN", 70)),
        ];
        let records = build_team_records(Competition::Euroleague, &games);
        let mad = team_records(&records, "MAD");

        let summary: Vec<(&str, &str)> =
            mad.iter().map(|r| (r.phase_group.as_str(), r.record.as_str())).collect();
        assert_eq!(
            summary,
            vec![("Playoffs", "0-1"), ("Playoffs", "1-1"), ("RS", "1-0"), ("RS", "1-1"), ("RS", "2-1")]
        );
    }

    #[test]
    fn test_draw_does_not_move_record() {
        let games = vec![
            game(2024, "RS", 1, 1, ("MAD", 80), ("PAN", 80)),
            game(2024, "RS", 2, 2, ("MAD", 81), ("PAN", 80)),
        ];
        let records = build_team_records(Competition::Euroleague, &games);
        let mad = team_records(&records, "MAD");

        assert_eq!(mad[0].result, GameOutcome::Draw);
        assert_eq!(mad[0].record, "0-0");
        assert_eq!(mad[1].record, "1-0");
    }

    #[test]
    fn test_record_resets_each_season() {
        let games = vec![
            game(2023, "RS", 1, 1, ("MAD", 80), ("PAN", 70)),
            game(2024, "RS", 1, 1, ("MAD", 80), ("PAN", 70)),
        ];
        let records = build_team_records(Competition::Euroleague, &games);
        let mad = team_records(&records, "MAD");

        assert_eq!(mad[0].record, "1-0");
        assert_eq!(mad[1].record, "1-0");
    }

    #[test]
    fn test_eurocup_phase_groups() {
        let games = vec![
            game(2024, "RS", 1, 1, ("BUR", 80), ("VAL", 70)),
            game(2024, "8F", 1, 2, ("BUR", 80), ("VAL", 70)),
            game(2024, "4F", 1, 3, ("BUR", 80), ("VAL", 70)),
        ];
        let records = build_team_records(Competition::Eurocup, &games);
        let bur = team_records(&records, "BUR");

        let playoffs: Vec<&str> = bur
            .iter()
            .filter(|r| r.phase_group == "Playoffs")
            .map(|r| r.record.as_str())
            .collect();
        assert_eq!(playoffs, vec!["1-0", "2-0"]);
    }

    #[test]
    fn test_team_directory() {
        let games = vec![game(2024, "RS", 1, 1, ("MAD", 80), ("PAN", 75))];
        let records = build_team_records(Competition::Euroleague, &games);
        let directory = TeamDirectory::from_records(&records);

        assert_eq!(directory.len(), 2);
        let mad = directory.get(2024, "MAD").unwrap();
        assert_eq!(mad.name, "MAD Club");
        assert_eq!(mad.logo.as_deref(), Some("https://img/MAD.png"));
        assert!(directory.get(2023, "MAD").is_none());
    }
}
