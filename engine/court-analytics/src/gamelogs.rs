//! Game logs: every box-score line with its place in the player's history

use crate::boxscore::{BoxScoreLine, LineKind};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameLogRow {
    #[serde(flatten)]
    pub line: BoxScoreLine,
    /// 1 for the player's most recent game; `None` on team and totals lines
    pub game_sequence: Option<i32>,
    /// `"<season>-<round>"`
    pub season_round: String,
    pub row_type: LineKind,
    /// Occurrence of (player, game, season, team), normally 1
    pub row_number: i32,
}

impl GameLogRow {
    pub fn natural_key(&self) -> (&str, i32, i32, &str, i32) {
        (&self.line.player_id, self.line.gamecode, self.line.season, &self.line.team, self.row_number)
    }
}

// Player name ascending with absent names last, then newest game first
fn log_order(a: &BoxScoreLine, b: &BoxScoreLine) -> Ordering {
    let by_name = match (&a.player, &b.player) {
        (Some(x), Some(y)) => x.cmp(y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
    by_name.then_with(|| b.season.cmp(&a.season)).then_with(|| b.round.cmp(&a.round))
}

pub fn build_game_logs(lines: &[BoxScoreLine]) -> Vec<GameLogRow> {
    let mut sorted: Vec<&BoxScoreLine> = lines.iter().collect();
    sorted.sort_by(|a, b| log_order(a, b));

    let mut sequences: HashMap<&str, i32> = HashMap::new();
    let mut occurrences: HashMap<(&str, i32, i32, &str), i32> = HashMap::new();

    sorted
        .into_iter()
        .map(|line| {
            let kind = line.kind();
            let game_sequence = (kind == LineKind::Player).then(|| {
                let seq = sequences.entry(line.player_id.as_str()).or_insert(0);
                *seq += 1;
                *seq
            });

            let occurrence = occurrences
                .entry((line.player_id.as_str(), line.gamecode, line.season, line.team.as_str()))
                .or_insert(0);
            *occurrence += 1;

            GameLogRow {
                line: line.clone(),
                game_sequence,
                season_round: format!("{}-{}", line.season, line.round),
                row_type: kind,
                row_number: *occurrence,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boxscore::test_support::line;

    fn player_line(id: &str, name: &str, season: i32, round: i32) -> BoxScoreLine {
        let mut l = line(id, "MAD", round);
        l.season = season;
        l.round = round;
        l.player = Some(name.to_string());
        l
    }

    #[test]
    fn test_game_sequence_counts_back_from_latest() {
        let lines = vec![
            player_line("P1", "DOE, JOHN", 2024, 1),
            player_line("P1", "DOE, JOHN", 2024, 3),
            player_line("P1", "DOE, JOHN", 2023, 30),
            player_line("P1", "DOE, JOHN", 2024, 2),
        ];
        let logs = build_game_logs(&lines);

        let order: Vec<(String, Option<i32>)> =
            logs.iter().map(|r| (r.season_round.clone(), r.game_sequence)).collect();
        assert_eq!(
            order,
            vec![
                ("2024-3".to_string(), Some(1)),
                ("2024-2".to_string(), Some(2)),
                ("2024-1".to_string(), Some(3)),
                ("2023-30".to_string(), Some(4)),
            ]
        );
    }

    #[test]
    fn test_team_and_total_lines_have_no_sequence() {
        let mut total = line("Total", "MAD", 1);
        total.player = Some("Total".to_string());
        let mut team = line("Team", "MAD", 1);
        team.player = Some("Team".to_string());

        let logs = build_game_logs(&[total, team, player_line("P1", "ADAMS, A", 2024, 1)]);

        assert_eq!(logs[0].line.player_id, "P1");
        assert_eq!(logs[0].row_type, LineKind::Player);
        assert_eq!(logs[0].game_sequence, Some(1));

        let others: Vec<_> = logs.iter().filter(|r| r.row_type != LineKind::Player).collect();
        assert_eq!(others.len(), 2);
        assert!(others.iter().all(|r| r.game_sequence.is_none()));
    }

    #[test]
    fn test_row_number_separates_repeated_keys() {
        let lines = vec![player_line("P1", "DOE, JOHN", 2024, 1), player_line("P1", "DOE, JOHN", 2024, 1)];
        let logs = build_game_logs(&lines);

        let numbers: Vec<i32> = logs.iter().map(|r| r.row_number).collect();
        assert_eq!(numbers, vec![1, 2]);
        assert_ne!(logs[0].natural_key(), logs[1].natural_key());
    }

    #[test]
    fn test_sequences_are_per_player() {
        let lines = vec![
            player_line("P2", "ZED, Z", 2024, 1),
            player_line("P1", "ABE, A", 2024, 1),
            player_line("P1", "ABE, A", 2024, 2),
        ];
        let logs = build_game_logs(&lines);

        let p2 = logs.iter().find(|r| r.line.player_id == "P2").unwrap();
        assert_eq!(p2.game_sequence, Some(1));
        assert_eq!(logs[0].line.player_id, "P1");
        assert_eq!(logs[0].line.round, 2);
    }
}
