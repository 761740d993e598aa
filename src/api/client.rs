use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use crate::{
    api::types::{
        vip_roster, AddVipRequest, ApiResponse, DetailedPlayersResponse, GameStateResponse,
        MessagePlayerRequest, VipEntry,
    },
    config::ApiConfig,
    error::{Result, SeedVipError},
    models::{GameState, ServerPopulation, VipPlayer},
};

/// Everything the seeding monitor needs from the game server
#[async_trait]
pub trait GameServer: Send + Sync {
    async fn get_gamestate(&self) -> Result<GameState>;

    async fn get_players(&self) -> Result<ServerPopulation>;

    async fn get_vips(&self) -> Result<HashMap<String, VipPlayer>>;

    async fn add_vip(&self, steam_id_64: &str, description: &str, expiration: DateTime<Utc>) -> Result<()>;

    async fn message_player(&self, steam_id_64: &str, message: &str) -> Result<()>;
}

/// HTTP client for the community RCON web API
#[derive(Clone)]
pub struct ApiClient {
    http_client: reqwest::Client,
    base_url: String,
    forward: bool,
}

impl ApiClient {
    pub fn new(config: &ApiConfig, forward: bool) -> Result<Self> {
        let mut headers = HeaderMap::new();
        if !config.api_key.is_empty() {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", config.api_key))
                .map_err(|e| SeedVipError::Config(format!("Invalid API key: {}", e)))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let http_client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            forward,
        })
    }

    fn endpoint(&self, command: &str) -> String {
        format!("{}/api/{}", self.base_url, command)
    }

    async fn get<T: DeserializeOwned>(&self, command: &str) -> Result<T> {
        debug!("GET {}", command);

        let response = self
            .http_client
            .get(self.endpoint(command))
            .send()
            .await?
            .error_for_status()?;

        let body: ApiResponse<T> = response.json().await?;
        body.into_result(command)
    }

    async fn post<B: Serialize + Sync>(&self, command: &str, body: &B) -> Result<()> {
        debug!("POST {}", command);

        let response = self
            .http_client
            .post(self.endpoint(command))
            .json(body)
            .send()
            .await?
            .error_for_status()?;

        let body: ApiResponse<serde_json::Value> = response.json().await?;
        if body.failed {
            return Err(SeedVipError::Api(format!(
                "{} failed: {}",
                command,
                body.error.unwrap_or_else(|| "no error message".to_string())
            )));
        }

        Ok(())
    }
}

#[async_trait]
impl GameServer for ApiClient {
    async fn get_gamestate(&self) -> Result<GameState> {
        let gamestate: GameStateResponse = self.get("get_gamestate").await?;
        Ok(gamestate.into())
    }

    async fn get_players(&self) -> Result<ServerPopulation> {
        let players: DetailedPlayersResponse = self.get("get_detailed_players").await?;
        Ok(players.into())
    }

    async fn get_vips(&self) -> Result<HashMap<String, VipPlayer>> {
        let entries: Vec<VipEntry> = self.get("get_vip_ids").await?;
        Ok(vip_roster(entries))
    }

    async fn add_vip(&self, steam_id_64: &str, description: &str, expiration: DateTime<Utc>) -> Result<()> {
        self.post(
            "add_vip",
            &AddVipRequest {
                steam_id_64,
                description,
                expiration,
                forward: self.forward,
            },
        )
        .await
    }

    async fn message_player(&self, steam_id_64: &str, message: &str) -> Result<()> {
        self.post(
            "message_player",
            &MessagePlayerRequest {
                steam_id_64,
                message,
                forward: self.forward,
            },
        )
        .await
    }
}
