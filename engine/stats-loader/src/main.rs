//! Stats loader entry point

use anyhow::{Context, Result};
use clap::Parser;
use court_analytics::Competition;
use euroleague_fetcher::EuroleagueFetcher;
use stats_loader::{
    initialize_logging, CompetitionOutcome, LoaderConfig, MemoryStore, PgStore, Pipeline, RunReport, Stage,
};
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "stats-loader", version, about = "Load EuroLeague and EuroCup stats into PostgreSQL")]
struct Cli {
    /// TOML configuration file (defaults to ./stats-loader.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// First season to load
    #[arg(long)]
    from_season: Option<i32>,

    /// Last season to load
    #[arg(long)]
    to_season: Option<i32>,

    /// Competition to load (repeatable): euroleague or eurocup
    #[arg(long = "competition")]
    competitions: Vec<Competition>,

    /// Dataset to write (repeatable); all datasets when omitted
    #[arg(long = "stage", value_enum)]
    stages: Vec<Stage>,

    /// Log filter, e.g. `debug` or `stats_loader=debug`
    #[arg(long)]
    log_level: Option<String>,

    /// Run against an in-memory store instead of the database
    #[arg(long)]
    dry_run: bool,
}

impl Cli {
    fn apply(&self, config: &mut LoaderConfig) {
        if let Some(season) = self.from_season {
            config.run.season_start = season;
        }
        if let Some(season) = self.to_season {
            config.run.season_end = season;
        }
        if !self.competitions.is_empty() {
            config.run.competitions = self.competitions.clone();
        }
        if !self.stages.is_empty() {
            config.run.stages = self.stages.clone();
        }
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
    }
}

fn log_summary(report: &RunReport) {
    info!("=== Summary ===");
    for competition in &report.competitions {
        let elapsed = competition.finished_at - competition.started_at;
        match &competition.outcome {
            CompetitionOutcome::Completed => info!(
                "✅ {}: {} rows in {} tables, {} source rows skipped ({}s)",
                competition.competition,
                competition.rows_inserted(),
                competition.writes.len(),
                competition.skipped_rows,
                elapsed.num_seconds()
            ),
            CompetitionOutcome::Failed(failures) => {
                error!(
                    "❌ {}: {} steps failed, {} tables written",
                    competition.competition,
                    failures.len(),
                    competition.writes.len()
                );
                for failure in failures {
                    error!("   {}: {}", failure.step, failure.error);
                }
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let mut config = LoaderConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    cli.apply(&mut config);
    config.validate().context("Invalid configuration")?;

    initialize_logging(&config.logging)?;

    info!("Starting stats loader v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Seasons {}..={}, competitions {:?}, stages {:?}",
        config.run.season_start, config.run.season_end, config.run.competitions, config.run.stages
    );

    let fetcher = EuroleagueFetcher::new(config.provider.clone()).context("Failed to create provider client")?;
    let seasons = config.run.seasons();

    let report = if cli.dry_run {
        info!("Dry run: writing to memory only");
        let store = MemoryStore::new();
        let pipeline = Pipeline::new(&fetcher, &store, seasons, &config.run.stages);
        let report = pipeline.run(&config.run.competitions).await;
        for table in store.table_names().await {
            info!("  {}: {} rows", table, store.row_count(&table).await);
        }
        report
    } else {
        let store = PgStore::connect(&config.database).await.context("Failed to connect to database")?;
        let pipeline = Pipeline::new(&fetcher, &store, seasons, &config.run.stages);
        let report = pipeline.run(&config.run.competitions).await;
        store.close().await;
        report
    };

    log_summary(&report);

    let failed = report.failures().count();
    if failed > 0 {
        anyhow::bail!("{} of {} competitions failed", failed, report.competitions.len());
    }

    info!("Stats loader finished");
    Ok(())
}
