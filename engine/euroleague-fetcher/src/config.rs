use crate::error::{FetchError, Result};
use serde::{Deserialize, Serialize};

/// Configuration for the stats provider client
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Base URL of the competition/season/game API
    pub api_base_url: String,

    /// Base URL of the live data API (box scores, shot charts)
    pub live_base_url: String,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,

    /// Pause between consecutive game requests, in milliseconds
    pub request_delay_ms: u64,

    /// User agent sent with every request
    pub user_agent: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://api-live.euroleague.net".to_string(),
            live_base_url: "https://live.euroleague.net".to_string(),
            timeout_secs: 30,
            request_delay_ms: 250,
            user_agent: "court-stats-loader/0.1".to_string(),
        }
    }
}

impl ProviderConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(url) = std::env::var("EUROLEAGUE_API_BASE_URL") {
            config.api_base_url = url;
        }

        if let Ok(url) = std::env::var("EUROLEAGUE_LIVE_BASE_URL") {
            config.live_base_url = url;
        }

        if let Ok(delay) = std::env::var("EUROLEAGUE_REQUEST_DELAY_MS") {
            config.request_delay_ms = delay
                .parse()
                .map_err(|_| FetchError::Configuration(format!("Invalid EUROLEAGUE_REQUEST_DELAY_MS: {}", delay)))?;
        }

        Ok(config)
    }

    /// `/v2/competitions/{E}/seasons/{E2024}/games`
    pub fn season_games_url(&self, competition_code: &str, season_code: &str) -> String {
        format!(
            "{}/v2/competitions/{}/seasons/{}/games",
            self.api_base_url.trim_end_matches('/'),
            competition_code,
            season_code
        )
    }

    pub fn boxscore_url(&self) -> String {
        format!("{}/api/Boxscore", self.live_base_url.trim_end_matches('/'))
    }

    pub fn points_url(&self) -> String {
        format!("{}/api/Points", self.live_base_url.trim_end_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_urls() {
        let config = ProviderConfig {
            api_base_url: "https://api.example/".to_string(),
            ..ProviderConfig::default()
        };

        assert_eq!(
            config.season_games_url("E", "E2024"),
            "https://api.example/v2/competitions/E/seasons/E2024/games"
        );
        assert_eq!(config.points_url(), "https://live.euroleague.net/api/Points");
        assert_eq!(config.boxscore_url(), "https://live.euroleague.net/api/Boxscore");
    }
}
