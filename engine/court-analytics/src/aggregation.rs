//! Shooting aggregates per season and zone

use crate::shots::EnrichedShot;
use crate::zones::Zone;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// League-wide shooting from one zone in one season
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneAggregate {
    pub season: i32,
    pub zone: Zone,
    pub total_shots: i64,
    pub made_shots: i64,
    pub shot_percentage: f64,
}

/// One team's shooting from one zone in one season
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamZoneAggregate {
    pub season: i32,
    pub team: String,
    pub zone: Zone,
    pub total_shots: i64,
    pub made_shots: i64,
    pub shot_percentage: f64,
}

#[derive(Debug, Default, Clone, Copy)]
struct Tally {
    total: i64,
    made: i64,
}

impl Tally {
    fn add(&mut self, made: bool) {
        self.total += 1;
        if made {
            self.made += 1;
        }
    }

    fn percentage(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.made as f64 / self.total as f64
        }
    }
}

/// Group shots by (season, zone), ordered by season then zone
pub fn aggregate_by_zone(shots: &[EnrichedShot]) -> Vec<ZoneAggregate> {
    let mut groups: BTreeMap<(i32, Zone), Tally> = BTreeMap::new();
    for shot in shots {
        groups.entry((shot.shot.season, shot.zone)).or_default().add(shot.made);
    }

    groups
        .into_iter()
        .map(|((season, zone), tally)| ZoneAggregate {
            season,
            zone,
            total_shots: tally.total,
            made_shots: tally.made,
            shot_percentage: tally.percentage(),
        })
        .collect()
}

/// Group shots by (season, team, zone)
pub fn aggregate_by_team_zone(shots: &[EnrichedShot]) -> Vec<TeamZoneAggregate> {
    let mut groups: BTreeMap<(i32, &str, Zone), Tally> = BTreeMap::new();
    for shot in shots {
        groups
            .entry((shot.shot.season, shot.shot.team.as_str(), shot.zone))
            .or_default()
            .add(shot.made);
    }

    groups
        .into_iter()
        .map(|((season, team, zone), tally)| TeamZoneAggregate {
            season,
            team: team.to_string(),
            zone,
            total_shots: tally.total,
            made_shots: tally.made,
            shot_percentage: tally.percentage(),
        })
        .collect()
}

/// Number of shots per zone label, for the post-load distribution log
pub fn zone_distribution(shots: &[EnrichedShot]) -> BTreeMap<Zone, usize> {
    let mut counts = BTreeMap::new();
    for shot in shots {
        *counts.entry(shot.zone).or_insert(0) += 1;
    }
    counts
}
