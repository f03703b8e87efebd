use court_analytics::{enrich_shots, Competition, CourtGeometry};
use euroleague_fetcher::{EuroleagueFetcher, ProviderConfig, StatsProvider};
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let competition: Competition = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "euroleague".to_string())
        .parse()?;
    let season: i32 = std::env::args().nth(2).unwrap_or_else(|| "2024".to_string()).parse()?;

    info!("Testing stats provider for {} {}", competition, season);

    let config = ProviderConfig::from_env()?;
    let fetcher = EuroleagueFetcher::new(config)?;

    let games = match fetcher.game_results(competition, &[season]).await {
        Ok(report) => {
            info!("✅ Fetched {} played games ({} skipped)", report.accepted_count(), report.skipped_count());
            report.into_accepted()
        }
        Err(e) => {
            error!("❌ Failed to fetch games: {}", e);
            return Ok(());
        }
    };

    let Some(first) = games.first() else {
        info!("No played games yet");
        return Ok(());
    };

    info!(
        "First game: {} {} - {} {} (round {}, {})",
        first.local.name, first.local.score, first.road.score, first.road.name, first.round, first.phase
    );

    match fetcher.shot_events(competition, std::slice::from_ref(first)).await {
        Ok(report) => {
            let shots = enrich_shots(report.into_accepted(), &CourtGeometry::default());
            info!("✅ {} field-goal attempts in game {}", shots.len(), first.gamecode);
            for shot in shots.iter().take(5) {
                info!(
                    "  {} {:?} ({:?}, {:?}) -> {}",
                    shot.shot.player.as_deref().unwrap_or("?"),
                    shot.shot.action_id,
                    shot.shot.coord_x,
                    shot.shot.coord_y,
                    shot.zone
                );
            }
        }
        Err(e) => error!("❌ Failed to fetch shots: {}", e),
    }

    match fetcher.box_scores(competition, std::slice::from_ref(first)).await {
        Ok(report) => info!("✅ {} box score lines in game {}", report.accepted_count(), first.gamecode),
        Err(e) => error!("❌ Failed to fetch box score: {}", e),
    }

    Ok(())
}
