//! Provider payloads and their conversion into typed records

use crate::de;
use court_analytics::boxscore::{TEAM_LINE_ID, TOTAL_LINE_ID};
use court_analytics::ingest::{require, require_text, SkipReason};
use court_analytics::{BoxScoreLine, ClubScore, GameResult, ShotEvent};
use serde::Deserialize;

/// API response wrapper
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
}

impl<T> Default for ApiResponse<T> {
    fn default() -> Self {
        Self { data: Vec::new() }
    }
}

/// Game entry from the season games endpoint
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawGame {
    #[serde(default, deserialize_with = "de::lenient_i32")]
    pub game_code: Option<i32>,

    #[serde(default, deserialize_with = "de::lenient_i32")]
    pub round: Option<i32>,

    #[serde(default)]
    pub phase_type: Option<RawPhaseType>,

    #[serde(default)]
    pub played: Option<bool>,

    #[serde(default, deserialize_with = "de::lenient_string")]
    pub local_date: Option<String>,

    #[serde(default)]
    pub local: Option<RawSide>,

    #[serde(default)]
    pub road: Option<RawSide>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawPhaseType {
    #[serde(default, deserialize_with = "de::lenient_string")]
    pub code: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawSide {
    #[serde(default)]
    pub club: Option<RawClub>,

    #[serde(default, deserialize_with = "de::lenient_i32")]
    pub score: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawClub {
    #[serde(default, deserialize_with = "de::lenient_string")]
    pub code: Option<String>,

    #[serde(default, deserialize_with = "de::lenient_string")]
    pub name: Option<String>,

    #[serde(default)]
    pub images: Option<RawImages>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawImages {
    #[serde(default, deserialize_with = "de::lenient_string")]
    pub crest: Option<String>,
}

impl RawGame {
    pub fn is_played(&self) -> bool {
        self.played.unwrap_or(false)
    }

    /// Convert to a typed game result
    pub fn to_game_result(&self, season: i32) -> Result<GameResult, SkipReason> {
        let phase = self.phase_type.as_ref().and_then(|p| p.code.clone());
        Ok(GameResult {
            season,
            phase: require_text(phase, "phaseType.code")?,
            round: require(self.round, "round")?,
            gamecode: require(self.game_code, "gameCode")?,
            date: require_text(self.local_date.clone(), "localDate")?,
            local: club_score(self.local.as_ref(), "local")?,
            road: club_score(self.road.as_ref(), "road")?,
        })
    }
}

fn club_score(side: Option<&RawSide>, field: &'static str) -> Result<ClubScore, SkipReason> {
    let side = require(side, field)?;
    let club = require(side.club.as_ref(), field)?;
    Ok(ClubScore {
        code: require_text(club.code.clone(), "club.code")?,
        name: require_text(club.name.clone(), "club.name")?,
        crest: club.images.as_ref().and_then(|i| i.crest.clone()),
        score: require(side.score, "score")?,
    })
}

/// The part of a game every per-game row is stamped with
#[derive(Debug, Clone, PartialEq)]
pub struct GameContext {
    pub season: i32,
    pub phase: String,
    pub round: i32,
    pub gamecode: i32,
}

impl From<&GameResult> for GameContext {
    fn from(game: &GameResult) -> Self {
        Self {
            season: game.season,
            phase: game.phase.clone(),
            round: game.round,
            gamecode: game.gamecode,
        }
    }
}

/// Shot chart payload
#[derive(Debug, Default, Deserialize)]
pub struct RawPoints {
    #[serde(rename = "Rows", default)]
    pub rows: Vec<RawShot>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct RawShot {
    #[serde(default, deserialize_with = "de::lenient_i32")]
    pub num_anot: Option<i32>,
    #[serde(default, deserialize_with = "de::lenient_string")]
    pub team: Option<String>,
    #[serde(default, deserialize_with = "de::lenient_string")]
    pub id_player: Option<String>,
    #[serde(default, deserialize_with = "de::lenient_string")]
    pub player: Option<String>,
    #[serde(default, deserialize_with = "de::lenient_string")]
    pub id_action: Option<String>,
    #[serde(default, deserialize_with = "de::lenient_string")]
    pub action: Option<String>,
    #[serde(default, deserialize_with = "de::lenient_i32")]
    pub points: Option<i32>,
    #[serde(default, deserialize_with = "de::lenient_i32")]
    pub coord_x: Option<i32>,
    #[serde(default, deserialize_with = "de::lenient_i32")]
    pub coord_y: Option<i32>,
    #[serde(default, deserialize_with = "de::lenient_string")]
    pub zone: Option<String>,
    #[serde(default, deserialize_with = "de::lenient_i32")]
    pub fastbreak: Option<i32>,
    #[serde(default, deserialize_with = "de::lenient_i32")]
    pub second_chance: Option<i32>,
    #[serde(default, deserialize_with = "de::lenient_i32")]
    pub points_off_turnover: Option<i32>,
    #[serde(default, deserialize_with = "de::lenient_i32")]
    pub minute: Option<i32>,
    #[serde(default, deserialize_with = "de::lenient_string")]
    pub console: Option<String>,
    #[serde(default, deserialize_with = "de::lenient_i32")]
    pub points_a: Option<i32>,
    #[serde(default, deserialize_with = "de::lenient_i32")]
    pub points_b: Option<i32>,
    #[serde(default, deserialize_with = "de::lenient_string")]
    pub utc: Option<String>,
}

fn flag(value: Option<i32>) -> Option<bool> {
    value.map(|v| v != 0)
}

impl RawShot {
    /// Convert to a typed shot event; the natural key fields are required
    pub fn to_shot_event(&self, game: &GameContext) -> Result<ShotEvent, SkipReason> {
        Ok(ShotEvent {
            season: game.season,
            phase: game.phase.clone(),
            round: game.round,
            gamecode: game.gamecode,
            num_anot: require(self.num_anot, "NUM_ANOT")?,
            team: require_text(self.team.clone(), "TEAM")?,
            player_id: require_text(self.id_player.clone(), "ID_PLAYER")?,
            player: self.player.clone(),
            action_id: self.id_action.clone(),
            action: self.action.clone(),
            points: self.points,
            coord_x: self.coord_x,
            coord_y: self.coord_y,
            provider_zone: self.zone.clone(),
            fastbreak: flag(self.fastbreak),
            second_chance: flag(self.second_chance),
            points_off_turnover: flag(self.points_off_turnover),
            minute: self.minute,
            console: self.console.clone(),
            points_a: self.points_a,
            points_b: self.points_b,
            utc: self.utc.clone(),
        })
    }
}

/// Box score payload: one entry per side, home first
#[derive(Debug, Default, Deserialize)]
pub struct RawBoxscore {
    #[serde(rename = "Stats", default)]
    pub stats: Vec<RawTeamBoxscore>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawTeamBoxscore {
    #[serde(rename = "Team", default, deserialize_with = "de::lenient_string")]
    pub team_name: Option<String>,

    #[serde(rename = "PlayersStats", default)]
    pub players_stats: Vec<RawBoxscoreLine>,

    /// Team rebounds, turnovers and fouls not credited to a player
    #[serde(rename = "tmr", default)]
    pub team_line: Option<RawBoxscoreLine>,

    #[serde(rename = "totr", default)]
    pub totals_line: Option<RawBoxscoreLine>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawBoxscoreLine {
    #[serde(rename = "Player_ID", default, deserialize_with = "de::lenient_string")]
    pub player_id: Option<String>,
    #[serde(default, deserialize_with = "de::lenient_f64")]
    pub is_starter: Option<f64>,
    #[serde(default, deserialize_with = "de::lenient_f64")]
    pub is_playing: Option<f64>,
    #[serde(default, deserialize_with = "de::lenient_string")]
    pub team: Option<String>,
    #[serde(default, deserialize_with = "de::lenient_i32")]
    pub dorsal: Option<i32>,
    #[serde(default, deserialize_with = "de::lenient_string")]
    pub player: Option<String>,
    #[serde(default, deserialize_with = "de::lenient_string")]
    pub minutes: Option<String>,
    #[serde(default, deserialize_with = "de::lenient_i32")]
    pub points: Option<i32>,
    #[serde(default, deserialize_with = "de::lenient_i32")]
    pub field_goals_made2: Option<i32>,
    #[serde(default, deserialize_with = "de::lenient_i32")]
    pub field_goals_attempted2: Option<i32>,
    #[serde(default, deserialize_with = "de::lenient_i32")]
    pub field_goals_made3: Option<i32>,
    #[serde(default, deserialize_with = "de::lenient_i32")]
    pub field_goals_attempted3: Option<i32>,
    #[serde(default, deserialize_with = "de::lenient_i32")]
    pub free_throws_made: Option<i32>,
    #[serde(default, deserialize_with = "de::lenient_i32")]
    pub free_throws_attempted: Option<i32>,
    #[serde(default, deserialize_with = "de::lenient_i32")]
    pub offensive_rebounds: Option<i32>,
    #[serde(default, deserialize_with = "de::lenient_i32")]
    pub defensive_rebounds: Option<i32>,
    #[serde(default, deserialize_with = "de::lenient_i32")]
    pub total_rebounds: Option<i32>,
    #[serde(default, deserialize_with = "de::lenient_i32")]
    pub assistances: Option<i32>,
    #[serde(default, deserialize_with = "de::lenient_i32")]
    pub steals: Option<i32>,
    #[serde(default, deserialize_with = "de::lenient_i32")]
    pub turnovers: Option<i32>,
    #[serde(default, deserialize_with = "de::lenient_i32")]
    pub blocks_favour: Option<i32>,
    #[serde(default, deserialize_with = "de::lenient_i32")]
    pub blocks_against: Option<i32>,
    #[serde(default, deserialize_with = "de::lenient_i32")]
    pub fouls_commited: Option<i32>,
    #[serde(default, deserialize_with = "de::lenient_i32")]
    pub fouls_received: Option<i32>,
    #[serde(default, deserialize_with = "de::lenient_i32")]
    pub valuation: Option<i32>,
    #[serde(default, deserialize_with = "de::lenient_f64")]
    pub plusminus: Option<f64>,
}

impl RawBoxscoreLine {
    fn to_line(
        &self,
        game: &GameContext,
        home: i32,
        player_id: String,
        team: String,
        player: Option<String>,
    ) -> BoxScoreLine {
        BoxScoreLine {
            season: game.season,
            phase: game.phase.clone(),
            round: game.round,
            gamecode: game.gamecode,
            home: Some(home),
            player_id,
            is_starter: self.is_starter,
            is_playing: self.is_playing,
            team,
            dorsal: self.dorsal,
            player,
            minutes: self.minutes.clone(),
            points: self.points,
            fg2_made: self.field_goals_made2,
            fg2_attempted: self.field_goals_attempted2,
            fg3_made: self.field_goals_made3,
            fg3_attempted: self.field_goals_attempted3,
            ft_made: self.free_throws_made,
            ft_attempted: self.free_throws_attempted,
            offensive_rebounds: self.offensive_rebounds,
            defensive_rebounds: self.defensive_rebounds,
            total_rebounds: self.total_rebounds,
            assists: self.assistances,
            steals: self.steals,
            turnovers: self.turnovers,
            blocks_favour: self.blocks_favour,
            blocks_against: self.blocks_against,
            fouls_committed: self.fouls_commited,
            fouls_received: self.fouls_received,
            valuation: self.valuation,
            plus_minus: self.plusminus,
        }
    }

    fn to_player_line(&self, game: &GameContext, home: i32) -> Result<BoxScoreLine, SkipReason> {
        let player_id = require_text(self.player_id.clone(), "Player_ID")?;
        let team = require_text(self.team.clone(), "Team")?;
        Ok(self.to_line(game, home, player_id, team, self.player.clone()))
    }
}

impl RawTeamBoxscore {
    /// The side's team code, read off its player lines
    pub fn team_code(&self) -> Option<String> {
        self.players_stats.iter().find_map(|p| p.team.clone())
    }

    fn summary_line(
        &self,
        raw: Option<&RawBoxscoreLine>,
        id: &str,
        game: &GameContext,
        home: i32,
    ) -> Option<Result<BoxScoreLine, SkipReason>> {
        let raw = raw?;
        Some(
            require(self.team_code(), "Team")
                .map(|team| raw.to_line(game, home, id.to_string(), team, Some(id.to_string()))),
        )
    }
}

impl RawBoxscore {
    /// Flatten both sides into player, team and totals lines
    pub fn to_lines(&self, game: &GameContext) -> Vec<Result<BoxScoreLine, SkipReason>> {
        let mut lines = Vec::new();
        for (index, side) in self.stats.iter().enumerate() {
            let home = if index == 0 { 1 } else { 0 };
            lines.extend(side.players_stats.iter().map(|p| p.to_player_line(game, home)));
            lines.extend(side.summary_line(side.team_line.as_ref(), TEAM_LINE_ID, game, home));
            lines.extend(side.summary_line(side.totals_line.as_ref(), TOTAL_LINE_ID, game, home));
        }
        lines
    }
}
