//! Season-replacing table writers
//!
//! A write replaces every season present in the batch: rows of those
//! seasons are deleted and the batch is inserted in one transaction. Rows of
//! other seasons are left alone.

use crate::config::DatabaseConfig;
use crate::error::{LoaderError, Result};
use crate::tables::{create_season_index_sql, create_table_sql, insert_prefix, upsert_clause, TableRow};
use async_trait::async_trait;
use serde::Serialize;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres, QueryBuilder};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// PostgreSQL accepts at most this many bind parameters per statement
pub const BIND_LIMIT: usize = 65_535;

/// Outcome of one replace-by-season write
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WriteSummary {
    pub table: String,
    pub seasons: Vec<i32>,
    pub deleted: u64,
    pub inserted: u64,
    /// Rows dropped because a later row in the batch had the same key
    pub duplicates_dropped: usize,
}

impl WriteSummary {
    fn new(table: &str) -> Self {
        Self { table: table.to_string(), ..Self::default() }
    }
}

#[async_trait]
pub trait TableStore: Send + Sync {
    /// Replace the seasons present in `rows`. An empty batch is a no-op.
    async fn replace_seasons<R: TableRow>(&self, table: &str, rows: &[R]) -> Result<WriteSummary>;
}

/// Collapse rows sharing a natural key, keeping the last occurrence.
/// Returns the surviving rows in batch order and the number dropped.
pub fn dedup_by_key<R: TableRow>(rows: &[R]) -> (Vec<&R>, usize) {
    let mut last: HashMap<String, usize> = HashMap::with_capacity(rows.len());
    for (i, row) in rows.iter().enumerate() {
        last.insert(row.natural_key(), i);
    }

    let kept: Vec<&R> = rows
        .iter()
        .enumerate()
        .filter(|(i, row)| last.get(&row.natural_key()) == Some(i))
        .map(|(_, row)| row)
        .collect();

    let dropped = rows.len() - kept.len();
    (kept, dropped)
}

fn batch_seasons<R: TableRow>(rows: &[&R]) -> Vec<i32> {
    rows.iter().map(|r| r.season()).collect::<BTreeSet<_>>().into_iter().collect()
}

/// Rows per INSERT, bounded by the configured batch size and the bind limit
pub fn rows_per_statement(column_count: usize, batch_size: usize) -> usize {
    batch_size.min(BIND_LIMIT / column_count.max(1)).max(1)
}

/// PostgreSQL-backed store
pub struct PgStore {
    pool: PgPool,
    batch_size: usize,
}

impl PgStore {
    pub fn new(pool: PgPool, batch_size: usize) -> Self {
        Self { pool, batch_size }
    }

    /// Connect with a fixed number of attempts and a fixed pause between them
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let attempts = config.connect_attempts.max(1);
        let mut attempt = 0;

        loop {
            attempt += 1;
            let result = PgPoolOptions::new()
                .max_connections(config.max_connections)
                .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
                .connect(&config.url)
                .await;

            match result {
                Ok(pool) => {
                    info!("✅ Connected to database (attempt {}/{})", attempt, attempts);
                    return Ok(Self::new(pool, config.insert_batch_size));
                }
                Err(e) if attempt < attempts => {
                    warn!(
                        "Database connection attempt {}/{} failed: {}. Retrying in {}s",
                        attempt, attempts, e, config.retry_delay_secs
                    );
                    tokio::time::sleep(Duration::from_secs(config.retry_delay_secs)).await;
                }
                Err(source) => return Err(LoaderError::Connection { attempts: attempt, source }),
            }
        }
    }

    /// Wait for open connections to finish and close the pool
    pub async fn close(&self) {
        self.pool.close().await;
        info!("Database connections closed");
    }
}

#[async_trait]
impl TableStore for PgStore {
    async fn replace_seasons<R: TableRow>(&self, table: &str, rows: &[R]) -> Result<WriteSummary> {
        let mut summary = WriteSummary::new(table);
        let (rows, duplicates_dropped) = dedup_by_key(rows);
        if rows.is_empty() {
            return Ok(summary);
        }
        summary.seasons = batch_seasons(&rows);
        summary.duplicates_dropped = duplicates_dropped;

        let failed = |source: sqlx::Error| LoaderError::TableWrite { table: table.to_string(), source };

        let mut tx = self.pool.begin().await.map_err(failed)?;

        sqlx::query(&create_table_sql::<R>(table)).execute(&mut *tx).await.map_err(failed)?;
        sqlx::query(&create_season_index_sql(table)).execute(&mut *tx).await.map_err(failed)?;

        let delete = format!("DELETE FROM {} WHERE season = ANY($1)", table);
        summary.deleted = sqlx::query(&delete)
            .bind(summary.seasons.clone())
            .execute(&mut *tx)
            .await
            .map_err(failed)?
            .rows_affected();

        let prefix = insert_prefix::<R>(table);
        let upsert = upsert_clause::<R>();
        let chunk_size = rows_per_statement(R::columns().len(), self.batch_size);

        for chunk in rows.chunks(chunk_size) {
            let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(prefix.as_str());
            qb.push_values(chunk.iter(), |mut values, row| row.bind_row(&mut values));
            qb.push(upsert.as_str());

            let result = qb.build().execute(&mut *tx).await.map_err(failed)?;
            summary.inserted += result.rows_affected();
            debug!("{}: inserted chunk of {} rows", table, chunk.len());
        }

        tx.commit().await.map_err(failed)?;
        Ok(summary)
    }
}

/// A row as held by [`MemoryStore`]
#[derive(Debug, Clone, PartialEq)]
pub struct StoredRow {
    pub season: i32,
    pub value: serde_json::Value,
}

/// In-memory store with the same replace semantics as [`PgStore`]. Used for
/// dry runs and tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<BTreeMap<String, BTreeMap<String, StoredRow>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rows of a table keyed by natural key
    pub async fn rows(&self, table: &str) -> BTreeMap<String, StoredRow> {
        self.tables.lock().await.get(table).cloned().unwrap_or_default()
    }

    pub async fn row_count(&self, table: &str) -> usize {
        self.tables.lock().await.get(table).map_or(0, |rows| rows.len())
    }

    pub async fn table_names(&self) -> Vec<String> {
        self.tables.lock().await.keys().cloned().collect()
    }
}

#[async_trait]
impl TableStore for MemoryStore {
    async fn replace_seasons<R: TableRow>(&self, table: &str, rows: &[R]) -> Result<WriteSummary> {
        let mut summary = WriteSummary::new(table);
        let (rows, duplicates_dropped) = dedup_by_key(rows);
        if rows.is_empty() {
            return Ok(summary);
        }
        summary.seasons = batch_seasons(&rows);
        summary.duplicates_dropped = duplicates_dropped;

        // Encode the whole batch before the table is touched
        let mut encoded = Vec::with_capacity(rows.len());
        for row in &rows {
            let value = serde_json::to_value(row)
                .map_err(|source| LoaderError::Encode { table: table.to_string(), source })?;
            encoded.push((row.natural_key(), StoredRow { season: row.season(), value }));
        }

        let mut tables = self.tables.lock().await;
        let stored = tables.entry(table.to_string()).or_default();

        let before = stored.len();
        stored.retain(|_, row| !summary.seasons.contains(&row.season));
        summary.deleted = (before - stored.len()) as u64;

        for (key, row) in encoded {
            stored.insert(key, row);
            summary.inserted += 1;
        }

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use court_analytics::{Zone, ZoneAggregate};

    fn aggregate(season: i32, zone: Zone, total: i64, made: i64) -> ZoneAggregate {
        ZoneAggregate {
            season,
            zone,
            total_shots: total,
            made_shots: made,
            shot_percentage: if total > 0 { made as f64 / total as f64 } else { 0.0 },
        }
    }

    #[test]
    fn test_dedup_keeps_last_occurrence() {
        let rows = vec![
            aggregate(2024, Zone::Top3, 10, 3),
            aggregate(2024, Zone::AtTheRim, 5, 4),
            aggregate(2024, Zone::Top3, 12, 5),
        ];

        let (kept, dropped) = dedup_by_key(&rows);

        assert_eq!(dropped, 1);
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].zone, Zone::AtTheRim);
        assert_eq!(kept[1].total_shots, 12);
    }

    #[test]
    fn test_rows_per_statement() {
        assert_eq!(rows_per_statement(5, 1000), 1000);
        // 70 columns * 1000 rows would exceed the bind limit
        assert_eq!(rows_per_statement(70, 1000), 936);
        assert_eq!(rows_per_statement(0, 10), 10);
        assert_eq!(rows_per_statement(100_000, 10), 1);
    }

    #[tokio::test]
    async fn test_replace_only_touches_batch_seasons() {
        let store = MemoryStore::new();
        let table = "shot_data_euroleague_averages";

        store
            .replace_seasons(table, &[aggregate(2023, Zone::Top3, 8, 2), aggregate(2024, Zone::Top3, 9, 3)])
            .await
            .unwrap();

        let summary = store.replace_seasons(table, &[aggregate(2024, Zone::AtTheRim, 4, 4)]).await.unwrap();

        assert_eq!(summary.seasons, vec![2024]);
        assert_eq!(summary.deleted, 1);
        assert_eq!(summary.inserted, 1);

        let rows = store.rows(table).await;
        assert_eq!(rows.len(), 2);
        assert!(rows.contains_key("2023|top 3"));
        assert!(rows.contains_key("2024|at the rim"));
        assert!(!rows.contains_key("2024|top 3"));
    }

    #[tokio::test]
    async fn test_empty_batch_is_a_no_op() {
        let store = MemoryStore::new();
        let table = "shot_data_eurocup_averages";
        store.replace_seasons(table, &[aggregate(2024, Zone::Top3, 1, 1)]).await.unwrap();

        let empty: Vec<ZoneAggregate> = Vec::new();
        let summary = store.replace_seasons(table, &empty).await.unwrap();

        assert_eq!(summary, WriteSummary::new(table));
        assert_eq!(store.row_count(table).await, 1);
    }

    #[tokio::test]
    async fn test_replace_is_idempotent() {
        let store = MemoryStore::new();
        let table = "t";
        let batch = vec![
            aggregate(2024, Zone::Top3, 10, 3),
            aggregate(2024, Zone::Top3, 12, 5),
            aggregate(2024, Zone::Corner3Left, 2, 1),
        ];

        let first = store.replace_seasons(table, &batch).await.unwrap();
        let after_first = store.rows(table).await;
        let second = store.replace_seasons(table, &batch).await.unwrap();
        let after_second = store.rows(table).await;

        assert_eq!(first.duplicates_dropped, 1);
        assert_eq!(first.deleted, 0);
        assert_eq!(second.deleted, 2);
        assert_eq!(after_first, after_second);
        assert_eq!(after_second["2024|top 3"].value["total_shots"], 12);
    }
}
