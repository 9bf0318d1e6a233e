use log::{debug, warn};
use serde_json::Value;
use std::time::Duration;

use crate::config::FaceitSettings;
use crate::errors::LookupError;
use crate::http::{ApiResponse, Transport, TransportError};

/// FACEIT Data API client.
///
/// Only the player lookup surfaces errors; every other endpoint degrades to
/// `None`/empty so one failed sub-fetch cannot sink a whole aggregation.
pub struct FaceitClient<T: Transport> {
    transport: T,
    api_key: String,
    settings: FaceitSettings,
}

impl<T: Transport> FaceitClient<T> {
    pub fn new(transport: T, api_key: String, settings: FaceitSettings) -> Self {
        Self {
            transport,
            api_key,
            settings,
        }
    }

    pub fn settings(&self) -> &FaceitSettings {
        &self.settings
    }

    async fn get(&self, url: &str) -> Result<ApiResponse, TransportError> {
        self.transport
            .get_json(
                url,
                Some(&self.api_key),
                Duration::from_secs(self.settings.timeout_secs),
            )
            .await
    }

    /// Look up the FACEIT player record for a SteamID64.
    ///
    /// `Ok(None)` means no record (404, timeout, or a 200 body without a
    /// player id); any other transport or protocol failure is upstream.
    pub async fn get_player_by_game_id(&self, steam_id: &str) -> Result<Option<Value>, LookupError> {
        let url = self.build_player_lookup_url(steam_id);
        debug!("Requesting player record from {url}");

        match self.get(&url).await {
            Ok(response) if response.status == 200 => {
                let player = response
                    .body
                    .filter(|body| body.get("player_id").is_some_and(|id| !id.is_null()));
                if player.is_none() {
                    warn!("Player lookup returned 200 without a player_id for {steam_id}");
                }
                Ok(player)
            }
            Ok(response) if response.status == 404 => {
                warn!("No FACEIT player for Steam ID {steam_id}");
                Ok(None)
            }
            Ok(response) => Err(LookupError::Upstream(format!(
                "player lookup returned status {}",
                response.status
            ))),
            Err(e) if e.timeout => {
                warn!("Player lookup timed out for Steam ID {steam_id}");
                Ok(None)
            }
            Err(e) => Err(LookupError::Upstream(e.to_string())),
        }
    }

    pub async fn get_player_stats(&self, player_id: &str) -> Option<Value> {
        let url = format!(
            "{}/players/{}/stats/{}",
            self.settings.api_base_url, player_id, self.settings.game
        );
        self.fetch_optional(&url, "lifetime stats").await
    }

    /// Most recent match-history entries, newest first.
    pub async fn get_player_matches(&self, player_id: &str, limit: usize) -> Vec<Value> {
        let url = format!(
            "{}/players/{}/history?game={}&offset=0&limit={}",
            self.settings.api_base_url, player_id, self.settings.game, limit
        );

        self.fetch_optional(&url, "match history")
            .await
            .and_then(|body| body.get("items").and_then(Value::as_array).cloned())
            .unwrap_or_default()
    }

    pub async fn get_match_details(&self, match_id: &str) -> Option<Value> {
        let url = format!("{}/matches/{}", self.settings.api_base_url, match_id);
        self.fetch_optional(&url, "match details").await
    }

    pub async fn get_match_stats(&self, match_id: &str) -> Option<Value> {
        let url = format!("{}/matches/{}/stats", self.settings.api_base_url, match_id);
        self.fetch_optional(&url, "match stats").await
    }

    /// Ban records; the endpoint has returned both `{items: [...]}` and a
    /// bare list over time.
    pub async fn get_player_bans(&self, player_id: &str) -> Vec<Value> {
        let url = format!("{}/players/{}/bans", self.settings.api_base_url, player_id);

        let Some(body) = self.fetch_optional(&url, "bans").await else {
            return Vec::new();
        };

        match body {
            Value::Object(ref map) => map
                .get("items")
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default(),
            Value::Array(items) => items,
            _ => Vec::new(),
        }
    }

    /// HEAD probe confirming a banner URL serves an actual image.
    pub async fn check_image_availability(&self, image_url: &str) -> bool {
        let timeout = Duration::from_secs(self.settings.banner_probe_timeout_secs);

        match self.transport.head(image_url, timeout).await {
            Ok(response) if response.status == 200 => {
                let is_image = response
                    .content_type
                    .as_deref()
                    .is_some_and(|ct| ct.starts_with("image/"));
                if !is_image {
                    warn!("Banner URL is not an image: {image_url}");
                }
                is_image
            }
            Ok(response) => {
                warn!(
                    "Banner not available (status {}): {image_url}",
                    response.status
                );
                false
            }
            Err(e) => {
                warn!("Error probing banner availability: {e}");
                false
            }
        }
    }

    /// GET a JSON endpoint, degrading every failure mode to `None`.
    async fn fetch_optional(&self, url: &str, what: &str) -> Option<Value> {
        match self.get(url).await {
            Ok(response) if response.status == 200 => {
                if response.body.is_none() {
                    warn!("Malformed body fetching {what} from {url}");
                }
                response.body
            }
            Ok(response) => {
                warn!("Error fetching {what}: status {}", response.status);
                None
            }
            Err(e) => {
                warn!("Error fetching {what}: {e}");
                None
            }
        }
    }

    fn build_player_lookup_url(&self, steam_id: &str) -> String {
        format!(
            "{}/players?game={}&game_player_id={}",
            self.settings.api_base_url, self.settings.game, steam_id
        )
    }
}
