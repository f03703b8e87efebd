//! Court Analytics
//!
//! Pure transformations behind the basketball stats loader: the shot filter
//! and zone classifier, shooting aggregates, team game records and
//! standings, advanced team stats, game logs and player season stats.
//! Nothing in this crate performs I/O.

pub mod advanced;
pub mod aggregation;
pub mod boxscore;
pub mod competition;
pub mod gamelogs;
pub mod ingest;
pub mod player_stats;
pub mod records;
pub mod shots;
pub mod standings;
pub mod zones;

pub use advanced::{build_advanced_stats, Metric, TeamAdvancedStats};
pub use aggregation::{aggregate_by_team_zone, aggregate_by_zone, TeamZoneAggregate, ZoneAggregate};
pub use boxscore::{BoxScoreLine, LineKind};
pub use competition::Competition;
pub use gamelogs::{build_game_logs, GameLogRow};
pub use ingest::{IngestReport, SkipReason};
pub use player_stats::{build_player_stats, PlayerSeasonStats, PlayerStat};
pub use records::{build_team_records, ClubScore, GameResult, TeamDirectory, TeamGameRecord};
pub use shots::{enrich_shots, EnrichedShot, ShotEvent};
pub use standings::{build_standings, StandingRow};
pub use zones::{classify_zone, CourtGeometry, Zone};
