//! EuroLeague Fetcher
//!
//! Client for the EuroLeague/EuroCup stats provider. Raw payloads are read
//! leniently and converted at this boundary into the typed records of
//! `court-analytics`; rows that cannot be converted are reported, not fatal.

pub mod config;
pub mod de;
pub mod error;
pub mod fetcher;
pub mod models;
pub mod provider;

pub use config::ProviderConfig;
pub use error::{FetchError, Result};
pub use fetcher::EuroleagueFetcher;
pub use models::GameContext;
pub use provider::StatsProvider;
