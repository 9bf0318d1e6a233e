use serde::Serialize;
use serde_json::Value;

use crate::bans::ActiveBan;
use crate::outcome::MatchOutcome;

/// Where an aggregated profile came from. Part of the output contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    Cache,
    #[default]
    Api,
    Extension,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SteamInfo {
    pub nickname: Option<String>,
    pub id_64: String,
    pub profile_url: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct FaceitInfo {
    pub url: String,
    pub elo: i64,
    pub level: i64,
    pub csgo_elo: i64,
}

/// Lifetime statistics after normalization, fallback computation and
/// defensive numeric coercion. Every field defaults to 0/0.0.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StatSummary {
    pub win_rate_percent: f64,
    pub headshot_percent: f64,
    pub adr: f64,
    pub kd_ratio: f64,
    pub matches: i64,
    pub wins: i64,
    pub longest_win_streak: i64,
    pub current_win_streak: i64,
    pub average_kills: i64,
    pub average_deaths: i64,
    pub average_assists: i64,
    pub average_mvps: i64,
    /// Mirrors `average_kills`; kept for frontend backward compatibility.
    pub last_30_matches_avg_kills: i64,
    /// Always empty; kept for frontend backward compatibility.
    pub recent_results: Vec<String>,
}

/// One processed match, shown in the profile history.
#[derive(Debug, Clone, Serialize)]
pub struct MatchSummary {
    pub match_id: String,
    pub date: Option<i64>,
    pub result: MatchOutcome,
    pub score: String,
    pub map: String,
    pub mode: String,
    pub kills: i64,
    pub deaths: i64,
    pub assists: i64,
    pub match_url: String,
}

/// The canonical aggregated profile. Field names and nesting are the
/// compatibility contract with consuming frontends.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PlayerProfile {
    pub player_id: String,
    pub nickname: Option<String>,
    pub avatar: Option<String>,
    pub banner: Option<String>,
    pub country: Option<String>,
    pub steam: SteamInfo,
    pub faceit: FaceitInfo,
    pub stats: StatSummary,
    pub match_history: Vec<MatchSummary>,
    pub bans: Vec<ActiveBan>,
    /// Per-game sub-objects passed through from the player record.
    pub games: Value,
    pub source: DataSource,
    pub processing_time: f64,
}
