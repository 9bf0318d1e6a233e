use log::{info, warn};
use regex::Regex;
use std::sync::LazyLock;
use std::time::Duration;

use crate::config::SteamSettings;
use crate::errors::LookupError;
use crate::http::Transport;

static PROFILE_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"steamcommunity\.com/profiles/(\d+)").unwrap());
static VANITY_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"steamcommunity\.com/id/([^/?#]+)").unwrap());

/// What a user-supplied Steam reference turned out to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SteamRef {
    /// A SteamID64, directly usable.
    Id64(String),
    /// A custom profile name that must be resolved via the Steam Web API.
    Vanity(String),
}

/// Extract a Steam reference from a profile URL or a bare SteamID64.
pub fn parse_steam_reference(input: &str) -> Option<SteamRef> {
    let trimmed = input.trim();

    if let Some(captures) = PROFILE_URL.captures(trimmed) {
        return Some(SteamRef::Id64(captures[1].to_string()));
    }
    if let Some(captures) = VANITY_URL.captures(trimmed) {
        return Some(SteamRef::Vanity(captures[1].to_string()));
    }
    if trimmed.len() == 17 && trimmed.chars().all(|c| c.is_ascii_digit()) {
        return Some(SteamRef::Id64(trimmed.to_string()));
    }

    None
}

/// Resolve any accepted Steam reference to a SteamID64.
///
/// Invalid references fail before any network call; vanity names go through
/// the `ResolveVanityURL` endpoint.
pub async fn resolve_steam_id<T: Transport>(
    transport: &T,
    settings: &SteamSettings,
    api_key: Option<&str>,
    input: &str,
) -> Result<String, LookupError> {
    match parse_steam_reference(input) {
        None => Err(LookupError::InvalidInput(input.trim().to_string())),
        Some(SteamRef::Id64(id)) => Ok(id),
        Some(SteamRef::Vanity(name)) => {
            info!("Resolving Steam vanity name '{name}'");
            resolve_vanity(transport, settings, api_key, &name).await
        }
    }
}

async fn resolve_vanity<T: Transport>(
    transport: &T,
    settings: &SteamSettings,
    api_key: Option<&str>,
    name: &str,
) -> Result<String, LookupError> {
    let Some(key) = api_key else {
        return Err(LookupError::Upstream(
            "STEAM_API_KEY not configured".to_string(),
        ));
    };

    let url = format!(
        "{}/ISteamUser/ResolveVanityURL/v0001/?key={}&vanityurl={}",
        settings.api_base_url,
        key,
        urlencoding::encode(name)
    );

    let response = transport
        .get_json(&url, None, Duration::from_secs(settings.timeout_secs))
        .await
        .map_err(|e| LookupError::Upstream(e.to_string()))?;

    if !response.is_success() {
        return Err(LookupError::Upstream(format!(
            "Steam vanity resolution returned status {}",
            response.status
        )));
    }

    let reply = response.body.as_ref().and_then(|b| b.get("response"));
    let success = reply
        .and_then(|r| r.get("success"))
        .and_then(serde_json::Value::as_i64);

    if success == Some(1) {
        if let Some(steam_id) = reply
            .and_then(|r| r.get("steamid"))
            .and_then(serde_json::Value::as_str)
        {
            info!("Resolved vanity name '{name}' to Steam ID {steam_id}");
            return Ok(steam_id.to_string());
        }
    }

    warn!("Could not resolve vanity name '{name}'");
    Err(LookupError::NotFound)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_profile_url_with_id64() {
        assert_eq!(
            parse_steam_reference("https://steamcommunity.com/profiles/76561198034202275"),
            Some(SteamRef::Id64("76561198034202275".to_string()))
        );
    }

    #[test]
    fn parses_vanity_url() {
        assert_eq!(
            parse_steam_reference("https://steamcommunity.com/id/gaben/"),
            Some(SteamRef::Vanity("gaben".to_string()))
        );
    }

    #[test]
    fn vanity_capture_stops_at_query_or_fragment() {
        assert_eq!(
            parse_steam_reference("https://steamcommunity.com/id/gaben?tab=friends"),
            Some(SteamRef::Vanity("gaben".to_string()))
        );
    }

    #[test]
    fn accepts_bare_id64() {
        assert_eq!(
            parse_steam_reference("76561198034202275"),
            Some(SteamRef::Id64("76561198034202275".to_string()))
        );
    }

    #[test]
    fn rejects_unrecognizable_input() {
        assert_eq!(parse_steam_reference("https://example.com/whoever"), None);
        assert_eq!(parse_steam_reference("12345"), None);
        assert_eq!(parse_steam_reference(""), None);
    }
}
