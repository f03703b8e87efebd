//! Box-score lines: one per player, plus a team line and a totals line per side

use serde::{Deserialize, Serialize};

/// Player id the provider uses for the team line
pub const TEAM_LINE_ID: &str = "Team";
/// Player id the provider uses for the totals line
pub const TOTAL_LINE_ID: &str = "Total";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LineKind {
    Player,
    Team,
    Total,
}

impl LineKind {
    pub fn from_player_id(player_id: &str) -> Self {
        match player_id {
            TEAM_LINE_ID => LineKind::Team,
            TOTAL_LINE_ID => LineKind::Total,
            _ => LineKind::Player,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LineKind::Player => "player",
            LineKind::Team => "team",
            LineKind::Total => "total",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxScoreLine {
    pub season: i32,
    pub phase: String,
    pub round: i32,
    pub gamecode: i32,
    /// 1 for the home side, 0 for the road side
    pub home: Option<i32>,
    pub player_id: String,
    pub is_starter: Option<f64>,
    pub is_playing: Option<f64>,
    pub team: String,
    pub dorsal: Option<i32>,
    pub player: Option<String>,
    /// "MM:SS", or "DNP" for players who did not play
    pub minutes: Option<String>,
    pub points: Option<i32>,
    pub fg2_made: Option<i32>,
    pub fg2_attempted: Option<i32>,
    pub fg3_made: Option<i32>,
    pub fg3_attempted: Option<i32>,
    pub ft_made: Option<i32>,
    pub ft_attempted: Option<i32>,
    pub offensive_rebounds: Option<i32>,
    pub defensive_rebounds: Option<i32>,
    pub total_rebounds: Option<i32>,
    pub assists: Option<i32>,
    pub steals: Option<i32>,
    pub turnovers: Option<i32>,
    pub blocks_favour: Option<i32>,
    pub blocks_against: Option<i32>,
    pub fouls_committed: Option<i32>,
    pub fouls_received: Option<i32>,
    pub valuation: Option<i32>,
    pub plus_minus: Option<f64>,
}

impl BoxScoreLine {
    pub fn kind(&self) -> LineKind {
        LineKind::from_player_id(&self.player_id)
    }

    /// Counting stats with absent values read as zero
    pub fn counting(&self) -> CountingStats {
        let v = |x: Option<i32>| f64::from(x.unwrap_or(0));
        CountingStats {
            points: v(self.points),
            fg2_made: v(self.fg2_made),
            fg2_attempted: v(self.fg2_attempted),
            fg3_made: v(self.fg3_made),
            fg3_attempted: v(self.fg3_attempted),
            ft_made: v(self.ft_made),
            ft_attempted: v(self.ft_attempted),
            offensive_rebounds: v(self.offensive_rebounds),
            defensive_rebounds: v(self.defensive_rebounds),
            total_rebounds: v(self.total_rebounds),
            assists: v(self.assists),
            steals: v(self.steals),
            turnovers: v(self.turnovers),
            blocks_favour: v(self.blocks_favour),
            blocks_against: v(self.blocks_against),
            fouls_committed: v(self.fouls_committed),
            fouls_received: v(self.fouls_received),
            valuation: v(self.valuation),
        }
    }
}

/// Summable box-score counters
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CountingStats {
    pub points: f64,
    pub fg2_made: f64,
    pub fg2_attempted: f64,
    pub fg3_made: f64,
    pub fg3_attempted: f64,
    pub ft_made: f64,
    pub ft_attempted: f64,
    pub offensive_rebounds: f64,
    pub defensive_rebounds: f64,
    pub total_rebounds: f64,
    pub assists: f64,
    pub steals: f64,
    pub turnovers: f64,
    pub blocks_favour: f64,
    pub blocks_against: f64,
    pub fouls_committed: f64,
    pub fouls_received: f64,
    pub valuation: f64,
}

impl CountingStats {
    pub fn field_goals_made(&self) -> f64 {
        self.fg2_made + self.fg3_made
    }

    pub fn field_goals_attempted(&self) -> f64 {
        self.fg2_attempted + self.fg3_attempted
    }
}

impl std::ops::AddAssign for CountingStats {
    fn add_assign(&mut self, other: Self) {
        self.points += other.points;
        self.fg2_made += other.fg2_made;
        self.fg2_attempted += other.fg2_attempted;
        self.fg3_made += other.fg3_made;
        self.fg3_attempted += other.fg3_attempted;
        self.ft_made += other.ft_made;
        self.ft_attempted += other.ft_attempted;
        self.offensive_rebounds += other.offensive_rebounds;
        self.defensive_rebounds += other.defensive_rebounds;
        self.total_rebounds += other.total_rebounds;
        self.assists += other.assists;
        self.steals += other.steals;
        self.turnovers += other.turnovers;
        self.blocks_favour += other.blocks_favour;
        self.blocks_against += other.blocks_against;
        self.fouls_committed += other.fouls_committed;
        self.fouls_received += other.fouls_received;
        self.valuation += other.valuation;
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    pub fn line(player_id: &str, team: &str, gamecode: i32) -> BoxScoreLine {
        BoxScoreLine {
            season: 2024,
            phase: "RS".to_string(),
            round: gamecode,
            gamecode,
            home: Some(1),
            player_id: player_id.to_string(),
            is_starter: Some(0.0),
            is_playing: Some(1.0),
            team: team.to_string(),
            dorsal: Some(7),
            player: Some(player_id.to_string()),
            minutes: Some("20:00".to_string()),
            points: Some(0),
            fg2_made: Some(0),
            fg2_attempted: Some(0),
            fg3_made: Some(0),
            fg3_attempted: Some(0),
            ft_made: Some(0),
            ft_attempted: Some(0),
            offensive_rebounds: Some(0),
            defensive_rebounds: Some(0),
            total_rebounds: Some(0),
            assists: Some(0),
            steals: Some(0),
            turnovers: Some(0),
            blocks_favour: Some(0),
            blocks_against: Some(0),
            fouls_committed: Some(0),
            fouls_received: Some(0),
            valuation: Some(0),
            plus_minus: Some(0.0),
        }
    }
}
