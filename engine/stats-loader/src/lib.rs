//! Stats Loader
//!
//! Batch job that pulls EuroLeague and EuroCup data from the stats
//! provider, derives the shooting, standings, advanced and player datasets
//! and replaces them season by season in PostgreSQL.

pub mod config;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod store;
pub mod tables;

pub use config::LoaderConfig;
pub use error::{LoaderError, Result};
pub use logging::initialize_logging;
pub use pipeline::{CompetitionOutcome, CompetitionReport, Pipeline, RunReport, Stage};
pub use store::{MemoryStore, PgStore, TableStore, WriteSummary};
pub use tables::{TableNames, TableRow};
