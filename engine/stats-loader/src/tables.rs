//! Destination tables: names, column layouts and row binding
//!
//! Every dataset maps to one table per competition. A row type describes
//! its columns, the columns of its natural key and how its values are bound
//! into a multi-row INSERT.

use bigdecimal::{BigDecimal, FromPrimitive};
use court_analytics::player_stats::StatLine;
use court_analytics::{
    Competition, EnrichedShot, GameLogRow, Metric, PlayerSeasonStats, PlayerStat, StandingRow, TeamAdvancedStats,
    TeamGameRecord, TeamZoneAggregate, ZoneAggregate,
};
use serde::Serialize;
use sqlx::query_builder::Separated;
use sqlx::Postgres;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub name: &'static str,
    pub sql_type: &'static str,
}

const fn column(name: &'static str, sql_type: &'static str) -> Column {
    Column { name, sql_type }
}

/// A record that can be replaced season by season in a destination table
pub trait TableRow: Serialize + Send + Sync {
    /// Data columns in INSERT order (the surrogate `id` is not listed)
    fn columns() -> Vec<Column>;

    /// Columns of the UNIQUE constraint used for upserts
    fn key_columns() -> &'static [&'static str];

    fn season(&self) -> i32;

    /// Natural key rendered as text; equal keys collide in the table
    fn natural_key(&self) -> String;

    /// Push one value per column, in `columns()` order
    fn bind_row<'args>(&self, values: &mut Separated<'_, 'args, Postgres, &'static str>);
}

/// Round to the two decimals the DECIMAL/NUMERIC columns keep
fn decimal(value: f64) -> BigDecimal {
    BigDecimal::from_f64(value).unwrap_or_default().round(2)
}

fn flag(value: Option<bool>) -> Option<i32> {
    value.map(i32::from)
}

/// Table names for one competition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableNames {
    pub shots: String,
    pub zone_averages: String,
    pub team_zone_averages: String,
    pub schedule: String,
    pub standings: String,
    pub advanced_stats: String,
    pub game_logs: String,
    pub player_stats: String,
}

impl TableNames {
    pub fn for_competition(competition: Competition) -> Self {
        let slug = competition.slug();
        Self {
            shots: format!("shot_data_{}", slug),
            zone_averages: format!("shot_data_{}_averages", slug),
            team_zone_averages: format!("shot_data_{}_team_averages", slug),
            schedule: format!("schedule_results_{}", slug),
            standings: format!("cumulative_standings_{}", slug),
            advanced_stats: format!("team_advanced_stats_{}", slug),
            game_logs: format!("{}_game_logs", slug),
            player_stats: format!("player_stats_from_gamelogs_{}", slug),
        }
    }
}

pub fn create_table_sql<R: TableRow>(table: &str) -> String {
    let columns: Vec<String> =
        R::columns().iter().map(|c| format!("    {} {}", c.name, c.sql_type)).collect();

    format!(
        "CREATE TABLE IF NOT EXISTS {} (\n    id SERIAL PRIMARY KEY,\n{},\n    UNIQUE ({})\n)",
        table,
        columns.join(",\n"),
        R::key_columns().join(", ")
    )
}

/// Replacement deletes by season, so every table gets a season index
pub fn create_season_index_sql(table: &str) -> String {
    format!("CREATE INDEX IF NOT EXISTS idx_{}_season ON {} (season)", table, table)
}

pub fn insert_prefix<R: TableRow>(table: &str) -> String {
    let names: Vec<&str> = R::columns().iter().map(|c| c.name).collect();
    format!("INSERT INTO {} ({}) ", table, names.join(", "))
}

/// `ON CONFLICT (<key>) DO UPDATE SET <every other column>`
pub fn upsert_clause<R: TableRow>() -> String {
    let keys = R::key_columns();
    let updates: Vec<String> = R::columns()
        .iter()
        .filter(|c| !keys.contains(&c.name))
        .map(|c| format!("{} = EXCLUDED.{}", c.name, c.name))
        .collect();

    if updates.is_empty() {
        format!(" ON CONFLICT ({}) DO NOTHING", keys.join(", "))
    } else {
        format!(" ON CONFLICT ({}) DO UPDATE SET {}", keys.join(", "), updates.join(", "))
    }
}

impl TableRow for EnrichedShot {
    fn columns() -> Vec<Column> {
        vec![
            column("season", "INTEGER"),
            column("phase", "TEXT"),
            column("round", "INTEGER"),
            column("gamecode", "TEXT"),
            column("num_anot", "INTEGER"),
            column("team", "TEXT"),
            column("id_player", "TEXT"),
            column("player", "TEXT"),
            column("id_action", "TEXT"),
            column("action", "TEXT"),
            column("points", "INTEGER"),
            column("coord_x", "INTEGER"),
            column("coord_y", "INTEGER"),
            column("zone", "TEXT"),
            column("bin", "TEXT"),
            column("fastbreak", "INTEGER"),
            column("second_chance", "INTEGER"),
            column("points_off_turnover", "INTEGER"),
            column("minute", "INTEGER"),
            column("console", "TEXT"),
            column("points_a", "INTEGER"),
            column("points_b", "INTEGER"),
            column("utc", "TEXT"),
        ]
    }

    fn key_columns() -> &'static [&'static str] {
        &["id_player", "gamecode", "season", "num_anot"]
    }

    fn season(&self) -> i32 {
        self.shot.season
    }

    fn natural_key(&self) -> String {
        let (player, gamecode, season, num_anot) = self.shot.natural_key();
        format!("{}|{}|{}|{}", player, gamecode, season, num_anot)
    }

    fn bind_row<'args>(&self, values: &mut Separated<'_, 'args, Postgres, &'static str>) {
        let shot = &self.shot;
        values
            .push_bind(shot.season)
            .push_bind(shot.phase.clone())
            .push_bind(shot.round)
            .push_bind(shot.gamecode.to_string())
            .push_bind(shot.num_anot)
            .push_bind(shot.team.clone())
            .push_bind(shot.player_id.clone())
            .push_bind(shot.player.clone())
            .push_bind(shot.action_id.clone())
            .push_bind(shot.action.clone())
            .push_bind(shot.points)
            .push_bind(shot.coord_x)
            .push_bind(shot.coord_y)
            .push_bind(shot.provider_zone.clone())
            .push_bind(self.zone.label())
            .push_bind(flag(shot.fastbreak))
            .push_bind(flag(shot.second_chance))
            .push_bind(flag(shot.points_off_turnover))
            .push_bind(shot.minute)
            .push_bind(shot.console.clone())
            .push_bind(shot.points_a)
            .push_bind(shot.points_b)
            .push_bind(shot.utc.clone());
    }
}

impl TableRow for ZoneAggregate {
    fn columns() -> Vec<Column> {
        vec![
            column("season", "INTEGER NOT NULL"),
            column("bin", "TEXT NOT NULL"),
            column("total_shots", "INTEGER"),
            column("made_shots", "INTEGER"),
            column("shot_percentage", "REAL"),
        ]
    }

    fn key_columns() -> &'static [&'static str] {
        &["season", "bin"]
    }

    fn season(&self) -> i32 {
        self.season
    }

    fn natural_key(&self) -> String {
        format!("{}|{}", self.season, self.zone)
    }

    fn bind_row<'args>(&self, values: &mut Separated<'_, 'args, Postgres, &'static str>) {
        values
            .push_bind(self.season)
            .push_bind(self.zone.label())
            .push_bind(self.total_shots)
            .push_bind(self.made_shots)
            .push_bind(self.shot_percentage);
    }
}

impl TableRow for TeamZoneAggregate {
    fn columns() -> Vec<Column> {
        vec![
            column("season", "INTEGER NOT NULL"),
            column("team", "TEXT NOT NULL"),
            column("bin", "TEXT NOT NULL"),
            column("total_shots", "INTEGER"),
            column("made_shots", "INTEGER"),
            column("shot_percentage", "REAL"),
        ]
    }

    fn key_columns() -> &'static [&'static str] {
        &["season", "team", "bin"]
    }

    fn season(&self) -> i32 {
        self.season
    }

    fn natural_key(&self) -> String {
        format!("{}|{}|{}", self.season, self.team, self.zone)
    }

    fn bind_row<'args>(&self, values: &mut Separated<'_, 'args, Postgres, &'static str>) {
        values
            .push_bind(self.season)
            .push_bind(self.team.clone())
            .push_bind(self.zone.label())
            .push_bind(self.total_shots)
            .push_bind(self.made_shots)
            .push_bind(self.shot_percentage);
    }
}

impl TableRow for TeamGameRecord {
    fn columns() -> Vec<Column> {
        vec![
            column("team", "TEXT"),
            column("teamcode", "TEXT"),
            column("teamlogo", "TEXT"),
            column("game_date", "TEXT"),
            column("opponent", "TEXT"),
            column("opponentcode", "TEXT"),
            column("opponentlogo", "TEXT"),
            column("round", "INTEGER"),
            column("result", "TEXT"),
            column("location", "TEXT"),
            column("record", "TEXT"),
            column("team_score", "INTEGER"),
            column("opponent_score", "INTEGER"),
            column("gamecode", "TEXT"),
            column("season", "INTEGER"),
            column("phase", "TEXT"),
        ]
    }

    fn key_columns() -> &'static [&'static str] {
        &["team", "gamecode", "season"]
    }

    fn season(&self) -> i32 {
        self.season
    }

    fn natural_key(&self) -> String {
        format!("{}|{}|{}", self.team, self.gamecode, self.season)
    }

    fn bind_row<'args>(&self, values: &mut Separated<'_, 'args, Postgres, &'static str>) {
        values
            .push_bind(self.team.clone())
            .push_bind(self.team_code.clone())
            .push_bind(self.team_logo.clone())
            .push_bind(self.game_date.clone())
            .push_bind(self.opponent.clone())
            .push_bind(self.opponent_code.clone())
            .push_bind(self.opponent_logo.clone())
            .push_bind(self.round)
            .push_bind(self.result.as_str())
            .push_bind(self.location.as_str())
            .push_bind(self.record.clone())
            .push_bind(self.team_score)
            .push_bind(self.opponent_score)
            .push_bind(self.gamecode.to_string())
            .push_bind(self.season)
            .push_bind(self.phase.clone());
    }
}

impl TableRow for StandingRow {
    fn columns() -> Vec<Column> {
        vec![
            column("season", "INTEGER"),
            column("phase", "TEXT"),
            column("position", "INTEGER"),
            column("teamcode", "TEXT"),
            column("name", "TEXT"),
            column("teamlogo", "TEXT"),
            column("w", "INTEGER"),
            column("l", "INTEGER"),
            column("win_percent", "REAL"),
            column("diff", "INTEGER"),
            column("home", "TEXT"),
            column("away", "TEXT"),
            column("l10", "TEXT"),
            column("streak", "TEXT"),
        ]
    }

    fn key_columns() -> &'static [&'static str] {
        &["season", "phase", "teamcode"]
    }

    fn season(&self) -> i32 {
        self.season
    }

    fn natural_key(&self) -> String {
        format!("{}|{}|{}", self.season, self.phase, self.team_code)
    }

    fn bind_row<'args>(&self, values: &mut Separated<'_, 'args, Postgres, &'static str>) {
        values
            .push_bind(self.season)
            .push_bind(self.phase.clone())
            .push_bind(self.position)
            .push_bind(self.team_code.clone())
            .push_bind(self.name.clone())
            .push_bind(self.logo.clone())
            .push_bind(self.wins)
            .push_bind(self.losses)
            .push_bind(self.win_percent)
            .push_bind(self.diff)
            .push_bind(self.home.clone())
            .push_bind(self.away.clone())
            .push_bind(self.last_ten.clone())
            .push_bind(self.streak.clone());
    }
}

impl TableRow for TeamAdvancedStats {
    fn columns() -> Vec<Column> {
        let mut columns = vec![
            column("season", "INTEGER NOT NULL"),
            column("phase", "VARCHAR(10) NOT NULL"),
            column("teamcode", "VARCHAR(10) NOT NULL"),
            column("teamname", "VARCHAR(100) NOT NULL"),
            column("teamlogo", "TEXT"),
            column("games_played", "INTEGER DEFAULT 0"),
        ];
        for metric in Metric::ALL {
            let sql_type = if metric.is_rating() { "DECIMAL(6,2) DEFAULT 0" } else { "DECIMAL(5,2) DEFAULT 0" };
            columns.push(column(metric.column(), sql_type));
        }
        for metric in Metric::ALL {
            columns.push(column(metric.rank_column(), "INTEGER DEFAULT 0"));
        }
        columns
    }

    fn key_columns() -> &'static [&'static str] {
        &["season", "phase", "teamcode"]
    }

    fn season(&self) -> i32 {
        self.season
    }

    fn natural_key(&self) -> String {
        format!("{}|{}|{}", self.season, self.phase, self.team_code)
    }

    fn bind_row<'args>(&self, values: &mut Separated<'_, 'args, Postgres, &'static str>) {
        values
            .push_bind(self.season)
            .push_bind(self.phase.clone())
            .push_bind(self.team_code.clone())
            .push_bind(self.team_name.clone())
            .push_bind(self.team_logo.clone())
            .push_bind(self.games_played);
        for metric in Metric::ALL {
            values.push_bind(decimal(self.metrics[metric]));
        }
        for metric in Metric::ALL {
            values.push_bind(self.ranks[metric]);
        }
    }
}

impl TableRow for GameLogRow {
    fn columns() -> Vec<Column> {
        vec![
            column("season", "INTEGER"),
            column("phase", "TEXT"),
            column("round", "INTEGER"),
            column("gamecode", "TEXT"),
            column("home", "INTEGER"),
            column("player_id", "TEXT"),
            column("is_starter", "REAL"),
            column("is_playing", "REAL"),
            column("team", "TEXT"),
            column("dorsal", "INTEGER"),
            column("player", "TEXT"),
            column("minutes", "TEXT"),
            column("points", "INTEGER"),
            column("field_goals_made_2", "INTEGER"),
            column("field_goals_attempted_2", "INTEGER"),
            column("field_goals_made_3", "INTEGER"),
            column("field_goals_attempted_3", "INTEGER"),
            column("free_throws_made", "INTEGER"),
            column("free_throws_attempted", "INTEGER"),
            column("offensive_rebounds", "INTEGER"),
            column("defensive_rebounds", "INTEGER"),
            column("total_rebounds", "INTEGER"),
            column("assistances", "INTEGER"),
            column("steals", "INTEGER"),
            column("turnovers", "INTEGER"),
            column("blocks_favour", "INTEGER"),
            column("blocks_against", "INTEGER"),
            column("fouls_commited", "INTEGER"),
            column("fouls_received", "INTEGER"),
            column("valuation", "INTEGER"),
            column("plusminus", "REAL"),
            column("game_sequence", "INTEGER"),
            column("season_round", "TEXT"),
            column("row_type", "TEXT DEFAULT 'player'"),
            column("row_number", "INTEGER DEFAULT 1"),
        ]
    }

    fn key_columns() -> &'static [&'static str] {
        &["player_id", "gamecode", "season", "team", "row_number"]
    }

    fn season(&self) -> i32 {
        self.line.season
    }

    fn natural_key(&self) -> String {
        let (player, gamecode, season, team, row_number) = GameLogRow::natural_key(self);
        format!("{}|{}|{}|{}|{}", player, gamecode, season, team, row_number)
    }

    fn bind_row<'args>(&self, values: &mut Separated<'_, 'args, Postgres, &'static str>) {
        let line = &self.line;
        values
            .push_bind(line.season)
            .push_bind(line.phase.clone())
            .push_bind(line.round)
            .push_bind(line.gamecode.to_string())
            .push_bind(line.home)
            .push_bind(line.player_id.clone())
            .push_bind(line.is_starter)
            .push_bind(line.is_playing)
            .push_bind(line.team.clone())
            .push_bind(line.dorsal)
            .push_bind(line.player.clone())
            .push_bind(line.minutes.clone())
            .push_bind(line.points)
            .push_bind(line.fg2_made)
            .push_bind(line.fg2_attempted)
            .push_bind(line.fg3_made)
            .push_bind(line.fg3_attempted)
            .push_bind(line.ft_made)
            .push_bind(line.ft_attempted)
            .push_bind(line.offensive_rebounds)
            .push_bind(line.defensive_rebounds)
            .push_bind(line.total_rebounds)
            .push_bind(line.assists)
            .push_bind(line.steals)
            .push_bind(line.turnovers)
            .push_bind(line.blocks_favour)
            .push_bind(line.blocks_against)
            .push_bind(line.fouls_committed)
            .push_bind(line.fouls_received)
            .push_bind(line.valuation)
            .push_bind(line.plus_minus)
            .push_bind(self.game_sequence)
            .push_bind(self.season_round.clone())
            .push_bind(self.row_type.as_str())
            .push_bind(self.row_number);
    }
}

impl TableRow for PlayerSeasonStats {
    fn columns() -> Vec<Column> {
        let mut columns = vec![
            column("season", "INTEGER"),
            column("phase", "TEXT"),
            column("player_id", "TEXT"),
            column("player_name", "TEXT"),
            column("player_team_code", "TEXT"),
            column("player_team_name", "TEXT"),
            column("teamlogo", "TEXT"),
            column("games_played", "BIGINT"),
            column("games_started", "BIGINT"),
            column("minutes_played", "NUMERIC"),
            column("total_minutes", "NUMERIC"),
            column("two_pointers_percentage", "NUMERIC"),
            column("three_pointers_percentage", "NUMERIC"),
            column("free_throws_percentage", "NUMERIC"),
        ];
        for stat in PlayerStat::ALL {
            let (per_game, per_40, total) = stat.columns();
            columns.push(column(per_game, "NUMERIC"));
            columns.push(column(per_40, "NUMERIC"));
            columns.push(column(total, "BIGINT"));
        }
        columns
    }

    fn key_columns() -> &'static [&'static str] {
        &["season", "phase", "player_id", "player_team_code"]
    }

    fn season(&self) -> i32 {
        self.season
    }

    fn natural_key(&self) -> String {
        format!("{}|{}|{}|{}", self.season, self.phase, self.player_id, self.team_code)
    }

    fn bind_row<'args>(&self, values: &mut Separated<'_, 'args, Postgres, &'static str>) {
        values
            .push_bind(self.season)
            .push_bind(self.phase.clone())
            .push_bind(self.player_id.clone())
            .push_bind(self.player_name.clone())
            .push_bind(self.team_code.clone())
            .push_bind(self.team_name.clone())
            .push_bind(self.team_logo.clone())
            .push_bind(self.games_played)
            .push_bind(self.games_started)
            .push_bind(decimal(self.minutes_played))
            .push_bind(decimal(self.total_minutes))
            .push_bind(decimal(self.two_pointers_percentage))
            .push_bind(decimal(self.three_pointers_percentage))
            .push_bind(decimal(self.free_throws_percentage));
        for stat in PlayerStat::ALL {
            let StatLine { per_game, per_40, total } = self.stat(stat);
            values
                .push_bind(decimal(per_game))
                .push_bind(per_40.map(decimal))
                .push_bind(total.round() as i64);
        }
    }
}
