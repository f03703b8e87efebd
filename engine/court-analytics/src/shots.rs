//! Shot events, the free-throw filter and per-shot enrichment

use crate::zones::{CourtGeometry, Zone};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One field-goal or free-throw attempt as reported by the provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShotEvent {
    pub season: i32,
    pub phase: String,
    pub round: i32,
    pub gamecode: i32,
    /// Sequence number of the play inside the game
    pub num_anot: i32,
    pub team: String,
    pub player_id: String,
    pub player: Option<String>,
    pub action_id: Option<String>,
    pub action: Option<String>,
    pub points: Option<i32>,
    pub coord_x: Option<i32>,
    pub coord_y: Option<i32>,
    /// Provider's own zone letter, kept verbatim
    pub provider_zone: Option<String>,
    pub fastbreak: Option<bool>,
    pub second_chance: Option<bool>,
    pub points_off_turnover: Option<bool>,
    pub minute: Option<i32>,
    pub console: Option<String>,
    pub points_a: Option<i32>,
    pub points_b: Option<i32>,
    pub utc: Option<String>,
}

impl ShotEvent {
    /// (player, game, season, play number) identifies a shot
    pub fn natural_key(&self) -> (&str, i32, i32, i32) {
        (&self.player_id, self.gamecode, self.season, self.num_anot)
    }

    /// True for free-throw attempts, judged from the action code and text
    pub fn is_free_throw(&self) -> bool {
        let id_match = self.action_id.as_deref().map_or(false, |id| {
            let id = id.to_lowercase();
            id.contains("ft") || id.contains("free")
        });
        let action_match = self.action.as_deref().map_or(false, |action| {
            let action = action.to_lowercase();
            action.contains("free throw") || action.contains("ft")
        });
        id_match || action_match
    }

    pub fn is_made(&self) -> bool {
        self.points.map_or(false, |p| p > 0)
    }
}

/// A field-goal attempt with its outcome and zone attached
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedShot {
    #[serde(flatten)]
    pub shot: ShotEvent,
    pub made: bool,
    pub zone: Zone,
}

/// Drop free throws and mark each remaining attempt made or missed
pub fn filter_field_goals(shots: Vec<ShotEvent>) -> Vec<(ShotEvent, bool)> {
    let total = shots.len();
    let kept: Vec<(ShotEvent, bool)> = shots
        .into_iter()
        .filter(|shot| !shot.is_free_throw())
        .map(|shot| {
            let made = shot.is_made();
            (shot, made)
        })
        .collect();

    debug!("Shot filter kept {} of {} events", kept.len(), total);
    kept
}

/// Filter and classify a batch of shots against the given court
pub fn enrich_shots(shots: Vec<ShotEvent>, geometry: &CourtGeometry) -> Vec<EnrichedShot> {
    filter_field_goals(shots)
        .into_iter()
        .map(|(shot, made)| {
            let zone = geometry.classify(shot.coord_x, shot.coord_y);
            EnrichedShot { shot, made, zone }
        })
        .collect()
}
