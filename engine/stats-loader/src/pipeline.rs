//! The per-competition load
//!
//! For each competition the pipeline fetches the played games, derives
//! team records and standings, then box-score datasets, then shot data, and
//! replaces the affected seasons of every destination table.
//!
//! The games fetch is shared by everything else, so its failure stops the
//! competition. After it, the schedule, box-score and shot branches run on
//! their own: a failed step stops only its branch, and the failures are
//! collected on the competition's report. The next competition still runs.

use crate::error::LoaderError;
use crate::store::{dedup_by_key, TableStore, WriteSummary};
use crate::tables::{TableNames, TableRow};
use chrono::{DateTime, Utc};
use clap::ValueEnum;
use court_analytics::aggregation::zone_distribution;
use court_analytics::{
    aggregate_by_team_zone, aggregate_by_zone, build_advanced_stats, build_game_logs, build_player_stats,
    build_standings, build_team_records, enrich_shots, Competition, CourtGeometry, EnrichedShot, GameResult,
    IngestReport, TeamDirectory, TeamGameRecord,
};
use euroleague_fetcher::StatsProvider;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use tracing::{error, info, warn};

/// A dataset the loader can write
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Stage {
    /// Per-team game results with running records
    Schedule,
    /// Regular-season standings
    Standings,
    /// Team advanced stats and league averages
    AdvancedStats,
    /// Box-score lines with game sequence
    GameLogs,
    /// Player season stats derived from the game logs
    PlayerStats,
    /// Raw shots plus league and team zone aggregates
    Shots,
}

impl Stage {
    pub const ALL: [Stage; 6] = [
        Stage::Schedule,
        Stage::Standings,
        Stage::AdvancedStats,
        Stage::GameLogs,
        Stage::PlayerStats,
        Stage::Shots,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Schedule => "schedule",
            Stage::Standings => "standings",
            Stage::AdvancedStats => "advanced-stats",
            Stage::GameLogs => "game-logs",
            Stage::PlayerStats => "player-stats",
            Stage::Shots => "shots",
        }
    }

    fn needs_box_scores(self) -> bool {
        matches!(self, Stage::AdvancedStats | Stage::GameLogs | Stage::PlayerStats)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const FETCH_GAMES: &str = "fetch games";
const FETCH_BOX_SCORES: &str = "fetch box scores";
const FETCH_SHOTS: &str = "fetch shots";

/// The step a branch stopped at, and why
#[derive(Debug)]
pub struct StepFailure {
    pub step: &'static str,
    pub error: LoaderError,
}

fn failed_at<E: Into<LoaderError>>(step: &'static str) -> impl FnOnce(E) -> StepFailure {
    move |e| StepFailure { step, error: e.into() }
}

#[derive(Debug)]
pub enum CompetitionOutcome {
    Completed,
    /// One entry per branch that stopped
    Failed(Vec<StepFailure>),
}

/// What happened to one competition during a run
#[derive(Debug)]
pub struct CompetitionReport {
    pub competition: Competition,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Source rows rejected at the ingestion boundary
    pub skipped_rows: usize,
    pub writes: Vec<WriteSummary>,
    pub outcome: CompetitionOutcome,
}

impl CompetitionReport {
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, CompetitionOutcome::Completed)
    }

    pub fn failures(&self) -> &[StepFailure] {
        match &self.outcome {
            CompetitionOutcome::Completed => &[],
            CompetitionOutcome::Failed(failures) => failures,
        }
    }

    pub fn rows_inserted(&self) -> u64 {
        self.writes.iter().map(|w| w.inserted).sum()
    }

    pub fn write_for(&self, table: &str) -> Option<&WriteSummary> {
        self.writes.iter().find(|w| w.table == table)
    }
}

#[derive(Debug, Default)]
pub struct RunReport {
    pub competitions: Vec<CompetitionReport>,
}

impl RunReport {
    pub fn is_success(&self) -> bool {
        self.competitions.iter().all(CompetitionReport::is_success)
    }

    pub fn failures(&self) -> impl Iterator<Item = &CompetitionReport> {
        self.competitions.iter().filter(|c| !c.is_success())
    }
}

/// Sequential loader over a stats provider and a table store
pub struct Pipeline<'a, S: TableStore> {
    provider: &'a dyn StatsProvider,
    store: &'a S,
    geometry: CourtGeometry,
    seasons: Vec<i32>,
    stages: BTreeSet<Stage>,
}

impl<'a, S: TableStore> Pipeline<'a, S> {
    pub fn new(provider: &'a dyn StatsProvider, store: &'a S, seasons: Vec<i32>, stages: &[Stage]) -> Self {
        Self {
            provider,
            store,
            geometry: CourtGeometry::default(),
            seasons,
            stages: stages.iter().copied().collect(),
        }
    }

    fn runs(&self, stage: Stage) -> bool {
        self.stages.contains(&stage)
    }

    /// Load every competition in turn
    pub async fn run(&self, competitions: &[Competition]) -> RunReport {
        let mut report = RunReport::default();
        for &competition in competitions {
            report.competitions.push(self.run_competition(competition).await);
        }
        report
    }

    pub async fn run_competition(&self, competition: Competition) -> CompetitionReport {
        info!("=== Loading {} seasons {:?} ===", competition, self.seasons);

        let mut report = CompetitionReport {
            competition,
            started_at: Utc::now(),
            finished_at: Utc::now(),
            skipped_rows: 0,
            writes: Vec::new(),
            outcome: CompetitionOutcome::Completed,
        };

        let failures = self.load(competition, &mut report).await;
        if failures.is_empty() {
            info!("✅ {} loaded: {} rows written to {} tables", competition, report.rows_inserted(), report.writes.len());
        } else {
            for failure in &failures {
                error!("❌ {} failed at {}: {}", competition, failure.step, failure.error);
            }
            report.outcome = CompetitionOutcome::Failed(failures);
        }

        report.finished_at = Utc::now();
        report
    }

    /// Run every selected branch, returning the failure of each branch that stopped
    async fn load(&self, competition: Competition, report: &mut CompetitionReport) -> Vec<StepFailure> {
        let tables = TableNames::for_competition(competition);

        let games = match self.provider.game_results(competition, &self.seasons).await {
            Ok(games) => accept(games, &format!("{} games", competition), report),
            Err(e) => return vec![failed_at(FETCH_GAMES)(e)],
        };
        if games.is_empty() {
            warn!("No played {} games for seasons {:?}; nothing to load", competition, self.seasons);
            return Vec::new();
        }

        let records = build_team_records(competition, &games);
        let directory = TeamDirectory::from_records(&records);
        info!("Built {} team game records for {} teams", records.len(), directory.len());

        let mut failures = Vec::new();

        if let Err(failure) = self.load_schedule(&records, &tables, report).await {
            failures.push(failure);
        }

        if self.stages.iter().any(|s| s.needs_box_scores()) {
            if let Err(failure) = self.load_box_scores(competition, &games, &directory, &tables, report).await {
                failures.push(failure);
            }
        }

        if self.runs(Stage::Shots) {
            if let Err(failure) = self.load_shots(competition, &games, &tables, report).await {
                failures.push(failure);
            }
        }

        failures
    }

    async fn load_schedule(
        &self,
        records: &[TeamGameRecord],
        tables: &TableNames,
        report: &mut CompetitionReport,
    ) -> Result<(), StepFailure> {
        if self.runs(Stage::Schedule) {
            self.write(report, &tables.schedule, records).await.map_err(failed_at(Stage::Schedule.as_str()))?;
        }

        if self.runs(Stage::Standings) {
            let standings = build_standings(records);
            self.write(report, &tables.standings, &standings).await.map_err(failed_at(Stage::Standings.as_str()))?;
        }

        Ok(())
    }

    async fn load_box_scores(
        &self,
        competition: Competition,
        games: &[GameResult],
        directory: &TeamDirectory,
        tables: &TableNames,
        report: &mut CompetitionReport,
    ) -> Result<(), StepFailure> {
        let lines = self
            .provider
            .box_scores(competition, games)
            .await
            .map_err(failed_at(FETCH_BOX_SCORES))?;
        let lines = accept(lines, &format!("{} box scores", competition), report);

        if self.runs(Stage::AdvancedStats) {
            let stats = build_advanced_stats(competition, &lines, directory);
            self.write(report, &tables.advanced_stats, &stats)
                .await
                .map_err(failed_at(Stage::AdvancedStats.as_str()))?;
        }

        if self.runs(Stage::GameLogs) || self.runs(Stage::PlayerStats) {
            let logs = build_game_logs(&lines);

            if self.runs(Stage::GameLogs) {
                self.write(report, &tables.game_logs, &logs).await.map_err(failed_at(Stage::GameLogs.as_str()))?;
            }

            if self.runs(Stage::PlayerStats) {
                let players = build_player_stats(&logs, directory);
                self.write(report, &tables.player_stats, &players)
                    .await
                    .map_err(failed_at(Stage::PlayerStats.as_str()))?;
            }
        }

        Ok(())
    }

    async fn load_shots(
        &self,
        competition: Competition,
        games: &[GameResult],
        tables: &TableNames,
        report: &mut CompetitionReport,
    ) -> Result<(), StepFailure> {
        let events = self.provider.shot_events(competition, games).await.map_err(failed_at(FETCH_SHOTS))?;
        let events = accept(events, &format!("{} shots", competition), report);

        let total = events.len();
        let shots = unique_shots(enrich_shots(events, &self.geometry), competition);
        info!("{} of {} shot events are field-goal attempts", shots.len(), total);

        for (zone, count) in zone_distribution(&shots) {
            info!("  {:<16} {}", zone.label(), count);
        }

        let step = Stage::Shots.as_str();
        self.write(report, &tables.shots, &shots).await.map_err(failed_at(step))?;
        self.write(report, &tables.zone_averages, &aggregate_by_zone(&shots)).await.map_err(failed_at(step))?;
        self.write(report, &tables.team_zone_averages, &aggregate_by_team_zone(&shots))
            .await
            .map_err(failed_at(step))?;

        Ok(())
    }

    async fn write<R: TableRow>(
        &self,
        report: &mut CompetitionReport,
        table: &str,
        rows: &[R],
    ) -> crate::error::Result<()> {
        let summary = self.store.replace_seasons(table, rows).await?;

        if summary.duplicates_dropped > 0 {
            warn!("{}: collapsed {} rows with duplicate keys", table, summary.duplicates_dropped);
        }
        if summary.seasons.is_empty() {
            info!("{}: nothing to write", table);
        } else {
            info!(
                "{}: deleted {} and inserted {} rows for seasons {:?}",
                table, summary.deleted, summary.inserted, summary.seasons
            );
        }

        report.writes.push(summary);
        Ok(())
    }
}

/// Collapse shots sharing a natural key, keeping the last. The raw table and
/// both aggregates are built from the same rows, so their counts agree.
fn unique_shots(shots: Vec<EnrichedShot>, competition: Competition) -> Vec<EnrichedShot> {
    let unique = {
        let (kept, dropped) = dedup_by_key(&shots);
        if dropped > 0 {
            warn!("{} shots: collapsed {} events with duplicate keys", competition, dropped);
            Some(kept.into_iter().cloned().collect())
        } else {
            None
        }
    };
    unique.unwrap_or(shots)
}

fn accept<T>(ingest: IngestReport<T>, dataset: &str, report: &mut CompetitionReport) -> Vec<T> {
    ingest.log_skipped(dataset);
    report.skipped_rows += ingest.skipped_count();
    ingest.into_accepted()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use async_trait::async_trait;
    use court_analytics::{BoxScoreLine, ClubScore, ShotEvent};
    use euroleague_fetcher::FetchError;

    const SEASON: i32 = 2024;

    fn club(code: &str, score: i32) -> ClubScore {
        ClubScore {
            code: code.to_string(),
            name: format!("{} Club", code),
            crest: Some(format!("https://img/{}.png", code)),
            score,
        }
    }

    fn game() -> GameResult {
        GameResult {
            season: SEASON,
            phase: "RS".to_string(),
            round: 1,
            gamecode: 1,
            date: "2024-10-03T20:00:00".to_string(),
            local: club("MAD", 85),
            road: club("BAR", 80),
        }
    }

    fn box_line(player_id: &str, team: &str, points: i32) -> BoxScoreLine {
        let is_player = player_id != "Total";
        BoxScoreLine {
            season: SEASON,
            phase: "RS".to_string(),
            round: 1,
            gamecode: 1,
            home: Some(if team == "MAD" { 1 } else { 0 }),
            player_id: player_id.to_string(),
            is_starter: Some(1.0),
            is_playing: Some(1.0),
            team: team.to_string(),
            dorsal: is_player.then_some(7),
            player: is_player.then(|| format!("PLAYER, {}", player_id)),
            minutes: Some(if is_player { "30:00" } else { "200:00" }.to_string()),
            points: Some(points),
            fg2_made: Some(20),
            fg2_attempted: Some(40),
            fg3_made: Some(10),
            fg3_attempted: Some(25),
            ft_made: Some(15),
            ft_attempted: Some(20),
            offensive_rebounds: Some(10),
            defensive_rebounds: Some(25),
            total_rebounds: Some(35),
            assists: Some(18),
            steals: Some(7),
            turnovers: Some(12),
            blocks_favour: Some(3),
            blocks_against: Some(2),
            fouls_committed: Some(20),
            fouls_received: Some(21),
            valuation: Some(90),
            plus_minus: Some(5.0),
        }
    }

    fn shot(num_anot: i32, x: i32, y: i32, points: i32, action_id: &str) -> ShotEvent {
        ShotEvent {
            season: SEASON,
            phase: "RS".to_string(),
            round: 1,
            gamecode: 1,
            num_anot,
            team: "MAD".to_string(),
            player_id: "P001".to_string(),
            player: Some("PLAYER, P001".to_string()),
            action_id: Some(action_id.to_string()),
            action: None,
            points: Some(points),
            coord_x: Some(x),
            coord_y: Some(y),
            provider_zone: None,
            fastbreak: Some(false),
            second_chance: None,
            points_off_turnover: None,
            minute: Some(3),
            console: Some("07:12".to_string()),
            points_a: Some(2),
            points_b: Some(0),
            utc: None,
        }
    }

    struct FakeProvider {
        games: Vec<GameResult>,
        lines: Vec<BoxScoreLine>,
        shots: Vec<ShotEvent>,
        failing_box_scores: Option<Competition>,
    }

    impl FakeProvider {
        fn new() -> Self {
            Self {
                games: vec![game()],
                lines: vec![
                    box_line("P001", "MAD", 20),
                    box_line("P002", "BAR", 18),
                    box_line("Total", "MAD", 85),
                    box_line("Total", "BAR", 80),
                ],
                shots: vec![
                    shot(10, 0, 0, 2, "2FG"),
                    shot(11, 700, 50, 3, "3FG"),
                    shot(12, 0, 0, 0, "FT"),
                ],
                failing_box_scores: None,
            }
        }
    }

    #[async_trait]
    impl StatsProvider for FakeProvider {
        async fn game_results(
            &self,
            _competition: Competition,
            seasons: &[i32],
        ) -> euroleague_fetcher::Result<IngestReport<GameResult>> {
            let games = self.games.iter().filter(|g| seasons.contains(&g.season)).cloned().map(Ok);
            Ok(IngestReport::collect("fake", games))
        }

        async fn box_scores(
            &self,
            competition: Competition,
            _games: &[GameResult],
        ) -> euroleague_fetcher::Result<IngestReport<BoxScoreLine>> {
            if self.failing_box_scores == Some(competition) {
                return Err(FetchError::Configuration("box score endpoint unavailable".to_string()));
            }
            Ok(IngestReport::collect("fake", self.lines.iter().cloned().map(Ok)))
        }

        async fn shot_events(
            &self,
            _competition: Competition,
            _games: &[GameResult],
        ) -> euroleague_fetcher::Result<IngestReport<ShotEvent>> {
            Ok(IngestReport::collect("fake", self.shots.iter().cloned().map(Ok)))
        }
    }

    #[tokio::test]
    async fn test_full_run_writes_every_table() {
        let provider = FakeProvider::new();
        let store = MemoryStore::new();
        let pipeline = Pipeline::new(&provider, &store, vec![SEASON], &Stage::ALL);

        let report = pipeline.run(&[Competition::Euroleague]).await;

        assert!(report.is_success());
        let tables = TableNames::for_competition(Competition::Euroleague);
        assert_eq!(store.row_count(&tables.schedule).await, 2);
        assert_eq!(store.row_count(&tables.standings).await, 2);
        // two teams plus the league row
        assert_eq!(store.row_count(&tables.advanced_stats).await, 3);
        assert_eq!(store.row_count(&tables.game_logs).await, 4);
        assert_eq!(store.row_count(&tables.player_stats).await, 2);
        assert_eq!(store.row_count(&tables.shots).await, 2);
        assert_eq!(store.row_count(&tables.zone_averages).await, 2);
        assert_eq!(store.row_count(&tables.team_zone_averages).await, 2);
    }

    #[tokio::test]
    async fn test_shot_batch_example() {
        let provider = FakeProvider::new();
        let store = MemoryStore::new();
        let pipeline = Pipeline::new(&provider, &store, vec![SEASON], &[Stage::Shots]);

        pipeline.run(&[Competition::Euroleague]).await;

        let tables = TableNames::for_competition(Competition::Euroleague);
        let shots = store.rows(&tables.shots).await;
        let zones: Vec<&str> = shots.values().map(|r| r.value["zone"].as_str().unwrap()).collect();
        assert_eq!(zones, vec!["AtTheRim", "RightCorner3"]);

        let averages = store.rows(&tables.zone_averages).await;
        for key in ["2024|at the rim", "2024|right corner 3"] {
            let row = &averages[key].value;
            assert_eq!(row["total_shots"], 1);
            assert_eq!(row["made_shots"], 1);
            assert_eq!(row["shot_percentage"], 1.0);
        }

        // only the shots stage was selected
        assert_eq!(store.row_count(&tables.schedule).await, 0);
        assert_eq!(store.row_count(&tables.game_logs).await, 0);
    }

    #[tokio::test]
    async fn test_rerun_is_idempotent() {
        let provider = FakeProvider::new();
        let store = MemoryStore::new();
        let pipeline = Pipeline::new(&provider, &store, vec![SEASON], &Stage::ALL);

        pipeline.run(&[Competition::Eurocup]).await;
        let mut first = Vec::new();
        for table in store.table_names().await {
            first.push(store.rows(&table).await);
        }

        let report = pipeline.run(&[Competition::Eurocup]).await;
        let mut second = Vec::new();
        for table in store.table_names().await {
            second.push(store.rows(&table).await);
        }

        assert_eq!(first, second);
        let shots = report.competitions[0].write_for("shot_data_eurocup").unwrap();
        assert_eq!(shots.deleted, 2);
        assert_eq!(shots.inserted, 2);
    }

    #[tokio::test]
    async fn test_duplicate_shots_are_collapsed() {
        let mut provider = FakeProvider::new();
        let mut replay = shot(10, 0, 0, 0, "2FA");
        replay.player = Some("PLAYER, P001 (corrected)".to_string());
        provider.shots.push(replay);

        let store = MemoryStore::new();
        let pipeline = Pipeline::new(&provider, &store, vec![SEASON], &[Stage::Shots]);
        let report = pipeline.run(&[Competition::Euroleague]).await;

        let write = report.competitions[0].write_for("shot_data_euroleague").unwrap();
        assert_eq!(write.inserted, 2);

        let shots = store.rows("shot_data_euroleague").await;
        let kept = &shots["P001|1|2024|10"].value;
        assert_eq!(kept["player"], "PLAYER, P001 (corrected)");
        assert_eq!(kept["made"], false);
    }

    #[tokio::test]
    async fn test_duplicate_shots_keep_aggregates_in_line_with_rows() {
        let mut provider = FakeProvider::new();
        provider.shots.push(shot(10, 0, 0, 0, "2FA"));

        let store = MemoryStore::new();
        let pipeline = Pipeline::new(&provider, &store, vec![SEASON], &[Stage::Shots]);
        let report = pipeline.run(&[Competition::Euroleague]).await;
        assert!(report.is_success());

        let tables = TableNames::for_competition(Competition::Euroleague);
        let shots = store.rows(&tables.shots).await;
        assert_eq!(shots.len(), 2);

        let averages = store.rows(&tables.zone_averages).await;
        let team_averages = store.rows(&tables.team_zone_averages).await;
        assert_eq!(averages.len(), 2);
        assert_eq!(team_averages.len(), 2);

        for (bin, aggregate) in [("at the rim", "AtTheRim"), ("right corner 3", "RightCorner3")] {
            let persisted: Vec<_> = shots.values().filter(|r| r.value["zone"] == aggregate).collect();
            let made = persisted.iter().filter(|r| r.value["made"] == true).count();

            for row in [&averages[&format!("{}|{}", SEASON, bin)], &team_averages[&format!("{}|MAD|{}", SEASON, bin)]] {
                assert_eq!(row.value["total_shots"], persisted.len());
                assert_eq!(row.value["made_shots"], made);
            }
        }

        // the replayed miss replaced the made rim shot
        let rim = &averages[&format!("{}|at the rim", SEASON)].value;
        assert_eq!(rim["total_shots"], 1);
        assert_eq!(rim["made_shots"], 0);

        let write = report.competitions[0].write_for(&tables.shots).unwrap();
        assert_eq!(write.duplicates_dropped, 0);
    }

    #[tokio::test]
    async fn test_box_score_failure_leaves_other_branches_running() {
        let mut provider = FakeProvider::new();
        provider.failing_box_scores = Some(Competition::Euroleague);

        let store = MemoryStore::new();
        let pipeline = Pipeline::new(&provider, &store, vec![SEASON], &Stage::ALL);
        let report = pipeline.run(&[Competition::Euroleague, Competition::Eurocup]).await;

        assert!(!report.is_success());
        let failures: Vec<_> = report.failures().collect();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].competition, Competition::Euroleague);

        let steps = failures[0].failures();
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].step, FETCH_BOX_SCORES);
        assert!(matches!(steps[0].error, LoaderError::Fetch(_)));

        let euroleague = TableNames::for_competition(Competition::Euroleague);
        assert_eq!(store.row_count(&euroleague.schedule).await, 2);
        assert_eq!(store.row_count(&euroleague.game_logs).await, 0);
        assert_eq!(store.row_count(&euroleague.advanced_stats).await, 0);
        assert_eq!(store.row_count(&euroleague.shots).await, 2);
        assert_eq!(store.row_count(&euroleague.zone_averages).await, 2);

        let eurocup = TableNames::for_competition(Competition::Eurocup);
        assert_eq!(store.row_count(&eurocup.shots).await, 2);
        assert!(report.competitions[1].is_success());
    }

    /// Memory store that refuses writes to one table
    struct RejectingStore {
        inner: MemoryStore,
        rejected: String,
    }

    #[async_trait]
    impl TableStore for RejectingStore {
        async fn replace_seasons<R: TableRow>(&self, table: &str, rows: &[R]) -> crate::error::Result<WriteSummary> {
            if table == self.rejected {
                return Err(LoaderError::TableWrite { table: table.to_string(), source: sqlx::Error::PoolTimedOut });
            }
            self.inner.replace_seasons(table, rows).await
        }
    }

    #[tokio::test]
    async fn test_write_failure_stops_only_its_branch() {
        let provider = FakeProvider::new();
        let tables = TableNames::for_competition(Competition::Euroleague);
        let store = RejectingStore { inner: MemoryStore::new(), rejected: tables.advanced_stats.clone() };
        let pipeline = Pipeline::new(&provider, &store, vec![SEASON], &Stage::ALL);

        let report = pipeline.run(&[Competition::Euroleague]).await;

        let steps = report.competitions[0].failures();
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].step, Stage::AdvancedStats.as_str());
        assert!(matches!(steps[0].error, LoaderError::TableWrite { .. }));

        // later writes in the box-score branch are skipped
        assert_eq!(store.inner.row_count(&tables.game_logs).await, 0);
        assert_eq!(store.inner.row_count(&tables.player_stats).await, 0);
        // the other branches complete
        assert_eq!(store.inner.row_count(&tables.standings).await, 2);
        assert_eq!(store.inner.row_count(&tables.shots).await, 2);
        assert_eq!(store.inner.row_count(&tables.team_zone_averages).await, 2);
    }

    #[tokio::test]
    async fn test_games_failure_stops_the_competition() {
        struct NoGames;

        #[async_trait]
        impl StatsProvider for NoGames {
            async fn game_results(
                &self,
                _competition: Competition,
                _seasons: &[i32],
            ) -> euroleague_fetcher::Result<IngestReport<GameResult>> {
                Err(FetchError::Configuration("results endpoint unavailable".to_string()))
            }

            async fn box_scores(
                &self,
                _competition: Competition,
                _games: &[GameResult],
            ) -> euroleague_fetcher::Result<IngestReport<BoxScoreLine>> {
                Ok(IngestReport::collect("fake", std::iter::empty()))
            }

            async fn shot_events(
                &self,
                _competition: Competition,
                _games: &[GameResult],
            ) -> euroleague_fetcher::Result<IngestReport<ShotEvent>> {
                Ok(IngestReport::collect("fake", std::iter::empty()))
            }
        }

        let store = MemoryStore::new();
        let pipeline = Pipeline::new(&NoGames, &store, vec![SEASON], &Stage::ALL);
        let report = pipeline.run(&[Competition::Euroleague]).await;

        let steps = report.competitions[0].failures();
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].step, FETCH_GAMES);
        assert!(store.table_names().await.is_empty());
    }

    #[tokio::test]
    async fn test_no_games_writes_nothing() {
        let provider = FakeProvider::new();
        let store = MemoryStore::new();
        let pipeline = Pipeline::new(&provider, &store, vec![2019], &Stage::ALL);

        let report = pipeline.run(&[Competition::Euroleague]).await;

        assert!(report.is_success());
        assert!(report.competitions[0].writes.is_empty());
        assert!(store.table_names().await.is_empty());
    }

    #[test]
    fn test_stage_names() {
        assert_eq!(Stage::AdvancedStats.to_string(), "advanced-stats");
        assert_eq!(Stage::from_str("player-stats", true).unwrap(), Stage::PlayerStats);
        assert!(!Stage::Shots.needs_box_scores());
        assert!(Stage::GameLogs.needs_box_scores());
    }
}
