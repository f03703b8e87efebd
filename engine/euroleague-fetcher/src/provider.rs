//! The stats provider seam used by the loader pipeline

use crate::error::Result;
use crate::fetcher::EuroleagueFetcher;
use crate::models::GameContext;
use async_trait::async_trait;
use court_analytics::{BoxScoreLine, Competition, GameResult, IngestReport, ShotEvent};
use tracing::{debug, info};

/// Source of raw game data for one competition
#[async_trait]
pub trait StatsProvider: Send + Sync {
    /// Played games of the given seasons
    async fn game_results(&self, competition: Competition, seasons: &[i32]) -> Result<IngestReport<GameResult>>;

    /// Box-score lines of the given games
    async fn box_scores(&self, competition: Competition, games: &[GameResult]) -> Result<IngestReport<BoxScoreLine>>;

    /// Shot events of the given games
    async fn shot_events(&self, competition: Competition, games: &[GameResult]) -> Result<IngestReport<ShotEvent>>;
}

fn game_source(competition: Competition, game: &GameResult) -> String {
    format!("{} game {}", competition.season_code(game.season), game.gamecode)
}

#[async_trait]
impl StatsProvider for EuroleagueFetcher {
    async fn game_results(&self, competition: Competition, seasons: &[i32]) -> Result<IngestReport<GameResult>> {
        let mut report = IngestReport::new();

        for &season in seasons {
            let games = self.fetch_season_games(competition, season).await?;
            let total = games.len();
            let played: Vec<_> = games.iter().filter(|g| g.is_played()).collect();
            debug!("{} of {} games played in {}", played.len(), total, competition.season_code(season));

            report.extend(
                &competition.season_code(season),
                played.into_iter().map(|g| g.to_game_result(season)),
            );
        }

        info!("Collected {} played {} games", report.accepted_count(), competition);
        Ok(report)
    }

    async fn box_scores(&self, competition: Competition, games: &[GameResult]) -> Result<IngestReport<BoxScoreLine>> {
        let mut report = IngestReport::new();

        for (i, game) in games.iter().enumerate() {
            if i > 0 {
                self.pause().await;
            }
            let boxscore = self.fetch_box_score(competition, game.season, game.gamecode).await?;
            let context = GameContext::from(game);
            report.extend(&game_source(competition, game), boxscore.to_lines(&context));
        }

        info!("Collected {} {} box score lines from {} games", report.accepted_count(), competition, games.len());
        Ok(report)
    }

    async fn shot_events(&self, competition: Competition, games: &[GameResult]) -> Result<IngestReport<ShotEvent>> {
        let mut report = IngestReport::new();

        for (i, game) in games.iter().enumerate() {
            if i > 0 {
                self.pause().await;
            }
            let points = self.fetch_shots(competition, game.season, game.gamecode).await?;
            let context = GameContext::from(game);
            report.extend(
                &game_source(competition, game),
                points.rows.iter().map(|row| row.to_shot_event(&context)),
            );
        }

        info!("Collected {} {} shot events from {} games", report.accepted_count(), competition, games.len());
        Ok(report)
    }
}
