use crate::config::ProviderConfig;
use crate::error::{FetchError, Result};
use crate::models::*;
use court_analytics::Competition;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, info};

/// HTTP client for the EuroLeague/EuroCup stats provider
pub struct EuroleagueFetcher {
    config: ProviderConfig,
    client: Client,
}

impl EuroleagueFetcher {
    /// Create a new fetcher instance
    pub fn new(config: ProviderConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    /// GET a JSON document. An empty body (the live API's answer for games
    /// without data) decodes to the payload's default.
    async fn get_json<T>(&self, url: &str, query: &[(&str, String)]) -> Result<T>
    where
        T: DeserializeOwned + Default,
    {
        debug!("GET {} {:?}", url, query);

        let response = self.client.get(url).query(query).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status { url: url.to_string(), status });
        }

        let body = response.text().await?;
        if body.trim().is_empty() {
            return Ok(T::default());
        }

        serde_json::from_str(&body).map_err(|source| FetchError::Decode { url: url.to_string(), source })
    }

    /// Fetch every game of a season, played or not
    pub async fn fetch_season_games(&self, competition: Competition, season: i32) -> Result<Vec<RawGame>> {
        let url = self
            .config
            .season_games_url(competition.code(), &competition.season_code(season));

        info!("Fetching {} games from: {}", competition.season_code(season), url);

        let response: ApiResponse<RawGame> = self.get_json(&url, &[]).await?;

        info!("Successfully fetched {} games for {}", response.data.len(), competition.season_code(season));
        Ok(response.data)
    }

    /// Fetch the box score of one game
    pub async fn fetch_box_score(
        &self,
        competition: Competition,
        season: i32,
        gamecode: i32,
    ) -> Result<RawBoxscore> {
        let query = game_query(competition, season, gamecode);
        self.get_json(&self.config.boxscore_url(), &query).await
    }

    /// Fetch the shot chart of one game
    pub async fn fetch_shots(&self, competition: Competition, season: i32, gamecode: i32) -> Result<RawPoints> {
        let query = game_query(competition, season, gamecode);
        self.get_json(&self.config.points_url(), &query).await
    }

    /// Wait between consecutive per-game requests
    pub(crate) async fn pause(&self) {
        if self.config.request_delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.config.request_delay_ms)).await;
        }
    }
}

fn game_query(competition: Competition, season: i32, gamecode: i32) -> Vec<(&'static str, String)> {
    vec![("gamecode", gamecode.to_string()), ("seasoncode", competition.season_code(season))]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_query() {
        let query = game_query(Competition::Eurocup, 2023, 104);
        assert_eq!(
            query,
            vec![("gamecode", "104".to_string()), ("seasoncode", "U2023".to_string())]
        );
    }

    #[test]
    fn test_fetcher_creation() {
        let fetcher = EuroleagueFetcher::new(ProviderConfig::default()).unwrap();
        assert_eq!(fetcher.config().timeout_secs, 30);
    }
}
