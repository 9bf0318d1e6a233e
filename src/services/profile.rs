use chrono::Utc;
use futures_util::future::join_all;
use log::{debug, info, warn};
use serde_json::Value;
use std::time::Instant;

use crate::api::FaceitClient;
use crate::api::models::{
    DataSource, FaceitInfo, MatchSummary, PlayerProfile, StatSummary, SteamInfo,
};
use crate::bans;
use crate::cache::ProfileCache;
use crate::config::SteamSettings;
use crate::errors::LookupError;
use crate::fields;
use crate::http::Transport;
use crate::outcome;
use crate::recent::{RecentSearchSink, SearchRecord};
use crate::stats::{self, RawLifetimeStats};
use crate::steam;

const MATCH_ROOM_URL: &str = "https://www.faceit.com/en/cs2/room";
const FACEIT_PROFILE_URL: &str = "https://www.faceit.com/ru/players";
const STEAM_PROFILE_URL: &str = "https://steamcommunity.com/profiles";

/// Who is asking. Extension lookups are tagged differently and never land
/// in the recent-search feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchChannel {
    Web,
    Extension,
}

/// Orchestrates a full profile aggregation: identifier resolution, cache,
/// concurrent sub-fetches, normalization and assembly.
pub struct ProfileService<T: Transport, S: RecentSearchSink> {
    transport: T,
    client: FaceitClient<T>,
    cache: ProfileCache,
    sink: S,
    steam_settings: SteamSettings,
    steam_api_key: Option<String>,
}

impl<T: Transport, S: RecentSearchSink> ProfileService<T, S> {
    pub fn new(
        transport: T,
        client: FaceitClient<T>,
        cache: ProfileCache,
        sink: S,
        steam_settings: SteamSettings,
        steam_api_key: Option<String>,
    ) -> Self {
        Self {
            transport,
            client,
            cache,
            sink,
            steam_settings,
            steam_api_key,
        }
    }

    /// Resolve a Steam reference and produce the aggregated profile.
    pub async fn find_by_steam_url(
        &self,
        reference: &str,
        channel: SearchChannel,
    ) -> Result<PlayerProfile, LookupError> {
        let started = Instant::now();

        let steam_id = steam::resolve_steam_id(
            &self.transport,
            &self.steam_settings,
            self.steam_api_key.as_deref(),
            reference,
        )
        .await?;
        info!("Search for Steam ID: {steam_id}");

        if let Some(mut cached) = self.cache.get(&steam_id) {
            cached.source = DataSource::Cache;
            cached.processing_time = started.elapsed().as_secs_f64();
            return Ok(cached);
        }

        match self.aggregate(&steam_id, started).await? {
            Some(mut profile) => {
                profile.source = match channel {
                    SearchChannel::Web => DataSource::Api,
                    SearchChannel::Extension => DataSource::Extension,
                };
                self.cache.put(&steam_id, profile.clone());

                if channel == SearchChannel::Web {
                    self.record_success(&steam_id, &profile).await;
                }

                info!(
                    "Search completed in {:.2} seconds for Steam ID: {steam_id}",
                    profile.processing_time
                );
                Ok(profile)
            }
            None => {
                warn!("Player not found on FACEIT for Steam ID: {steam_id}");
                if channel == SearchChannel::Web {
                    self.record_failure(&steam_id).await;
                }
                Err(LookupError::NotFound)
            }
        }
    }

    /// Fetch everything for one player and assemble the canonical profile.
    /// Only the initial player lookup can fail; every sub-fetch degrades.
    async fn aggregate(
        &self,
        steam_id: &str,
        started: Instant,
    ) -> Result<Option<PlayerProfile>, LookupError> {
        let Some(player) = self.client.get_player_by_game_id(steam_id).await? else {
            return Ok(None);
        };
        let Some(player_id) = player
            .get("player_id")
            .and_then(Value::as_str)
            .map(str::to_owned)
        else {
            return Ok(None);
        };

        let history_limit = self.client.settings().history_limit;
        let (stats_payload, history, raw_bans) = tokio::join!(
            self.client.get_player_stats(&player_id),
            self.client.get_player_matches(&player_id, history_limit),
            self.client.get_player_bans(&player_id),
        );

        let processed = self
            .process_matches(&history, history_limit, &player_id)
            .await;
        info!(
            "Successfully processed {} matches out of {}",
            processed.len(),
            history.len().min(history_limit)
        );

        let summary = finish_stats(stats::normalize(stats_payload.as_ref()), &processed);

        let banner = self.verified_banner(&player).await;
        let nickname = string_field(&player, "nickname");

        let profile = PlayerProfile {
            player_id: player_id.clone(),
            nickname: nickname.clone(),
            avatar: string_field(&player, "avatar"),
            banner,
            country: string_field(&player, "country"),
            steam: SteamInfo {
                nickname: string_field(&player, "steam_nickname"),
                id_64: steam_id.to_string(),
                profile_url: format!("{STEAM_PROFILE_URL}/{steam_id}"),
            },
            faceit: FaceitInfo {
                url: format!(
                    "{FACEIT_PROFILE_URL}/{}",
                    nickname.as_deref().unwrap_or_default()
                ),
                elo: resolve_elo(stats_payload.as_ref(), &player),
                level: resolve_level(stats_payload.as_ref(), &player),
                csgo_elo: resolve_csgo_elo(&player),
            },
            stats: summary,
            match_history: processed
                .into_iter()
                .take(self.client.settings().displayed_matches)
                .collect(),
            bans: bans::filter_active(&raw_bans, Utc::now().naive_utc()),
            games: player
                .get("games")
                .cloned()
                .unwrap_or_else(|| Value::Object(Default::default())),
            source: DataSource::Api,
            processing_time: started.elapsed().as_secs_f64(),
        };

        Ok(Some(profile))
    }

    /// Concurrently fetch detail+stats for each history entry and keep the
    /// matches where both halves arrived. Results are re-associated with
    /// their originating entry by position, not completion order.
    async fn process_matches(
        &self,
        history: &[Value],
        limit: usize,
        player_id: &str,
    ) -> Vec<MatchSummary> {
        let sample = &history[..history.len().min(limit)];
        debug!("Processing {} matches for player {player_id}", sample.len());

        let fetches = sample.iter().map(|entry| {
            let match_id = string_field(entry, "match_id");
            async move {
                let id = match_id?;
                let (details, match_stats) = tokio::join!(
                    self.client.get_match_details(&id),
                    self.client.get_match_stats(&id),
                );
                Some((id, details, match_stats))
            }
        });

        join_all(fetches)
            .await
            .into_iter()
            .filter_map(|slot| match slot {
                Some((id, Some(details), Some(match_stats))) => {
                    Some(build_match_summary(&id, &details, &match_stats, player_id))
                }
                Some((id, details, match_stats)) => {
                    debug!(
                        "Dropping match {id}: details={} stats={}",
                        details.is_some(),
                        match_stats.is_some()
                    );
                    None
                }
                None => None,
            })
            .collect()
    }

    /// Banner URLs are only surfaced after a successful image probe; a
    /// broken banner is omitted, not passed through.
    async fn verified_banner(&self, player: &Value) -> Option<String> {
        let url = string_field(player, "cover_image").filter(|u| !u.is_empty())?;

        if self.client.check_image_availability(&url).await {
            Some(url)
        } else {
            warn!("Banner is not available: {url}");
            None
        }
    }

    async fn record_success(&self, steam_id: &str, profile: &PlayerProfile) {
        self.sink
            .record(SearchRecord {
                steam_id: steam_id.to_string(),
                nickname: profile
                    .nickname
                    .clone()
                    .unwrap_or_else(|| placeholder_nickname(steam_id)),
                avatar: profile.avatar.clone(),
                level: Some(profile.faceit.level),
                country: profile.country.clone(),
                has_bans: !profile.bans.is_empty(),
                success: true,
            })
            .await;
    }

    async fn record_failure(&self, steam_id: &str) {
        self.sink
            .record(SearchRecord {
                steam_id: steam_id.to_string(),
                nickname: placeholder_nickname(steam_id),
                avatar: None,
                level: None,
                country: None,
                has_bans: false,
                success: false,
            })
            .await;
    }
}

fn placeholder_nickname(steam_id: &str) -> String {
    let tail = &steam_id[steam_id.len().saturating_sub(4)..];
    format!("Player_{tail}")
}

fn string_field(container: &Value, key: &str) -> Option<String> {
    container.get(key).and_then(Value::as_str).map(str::to_owned)
}

fn build_match_summary(
    match_id: &str,
    details: &Value,
    match_stats: &Value,
    player_id: &str,
) -> MatchSummary {
    MatchSummary {
        match_id: match_id.to_string(),
        date: details.get("started_at").and_then(Value::as_i64),
        result: outcome::determine(details, Some(match_stats), player_id),
        score: round_stat(match_stats, "Score").unwrap_or_else(|| "0-0".to_string()),
        map: round_stat(match_stats, "Map").unwrap_or_else(|| "Unknown".to_string()),
        mode: mode_label(match_stats),
        kills: player_round_stat(match_stats, player_id, "Kills"),
        deaths: player_round_stat(match_stats, player_id, "Deaths"),
        assists: player_round_stat(match_stats, player_id, "Assists"),
        match_url: format!("{MATCH_ROOM_URL}/{match_id}"),
    }
}

fn first_round(match_stats: &Value) -> Option<&Value> {
    match_stats.get("rounds")?.as_array()?.first()
}

fn round_stat(match_stats: &Value, key: &str) -> Option<String> {
    first_round(match_stats)?
        .get("round_stats")?
        .get(key)?
        .as_str()
        .map(str::to_owned)
}

fn mode_label(match_stats: &Value) -> String {
    let mode = first_round(match_stats)
        .and_then(|r| r.get("game_mode"))
        .and_then(Value::as_str)
        .unwrap_or("Unknown");

    match mode {
        "5v5" => "Competitive".to_string(),
        "2v2" => "Wingman".to_string(),
        other => other.to_string(),
    }
}

/// Per-player figure from the round team listings, 0 when absent.
fn player_round_stat(match_stats: &Value, player_id: &str, key: &str) -> i64 {
    let Some(rounds) = match_stats.get("rounds").and_then(Value::as_array) else {
        return 0;
    };

    for round in rounds {
        let Some(teams) = round.get("teams").and_then(Value::as_array) else {
            continue;
        };
        for team in teams {
            let Some(players) = team.get("players").and_then(Value::as_array) else {
                continue;
            };
            for player in players {
                if fields::id_matches(player.get("player_id"), player_id) {
                    return fields::coerce_i64(
                        player.get("player_stats").and_then(|s| s.get(key)),
                    );
                }
            }
        }
    }

    0
}

/// Coerce the normalized lifetime stats and fill the average figures from
/// the processed-match sample when the API omits them. The sample is the
/// full processed set (up to 30 matches), not the 5-entry display slice.
fn finish_stats(raw: RawLifetimeStats, processed: &[MatchSummary]) -> StatSummary {
    let average_kills = average_stat(raw.average_kills.as_ref(), processed, |m| m.kills, "kills");
    let average_deaths =
        average_stat(raw.average_deaths.as_ref(), processed, |m| m.deaths, "deaths");
    let average_assists = average_stat(
        raw.average_assists.as_ref(),
        processed,
        |m| m.assists,
        "assists",
    );

    StatSummary {
        win_rate_percent: fields::coerce_f64(raw.win_rate_percent.as_ref()),
        headshot_percent: fields::coerce_f64(raw.headshot_percent.as_ref()),
        adr: fields::coerce_f64(raw.adr.as_ref()),
        kd_ratio: fields::coerce_f64(raw.kd_ratio.as_ref()),
        matches: fields::coerce_i64(raw.matches.as_ref()),
        wins: fields::coerce_i64(raw.wins.as_ref()),
        longest_win_streak: fields::coerce_i64(raw.longest_win_streak.as_ref()),
        current_win_streak: fields::coerce_i64(raw.current_win_streak.as_ref()),
        average_kills,
        average_deaths,
        average_assists,
        average_mvps: fields::coerce_i64(raw.average_mvps.as_ref()),
        last_30_matches_avg_kills: average_kills,
        recent_results: Vec::new(),
    }
}

fn average_stat(
    api_value: Option<&Value>,
    processed: &[MatchSummary],
    figure: impl Fn(&MatchSummary) -> i64,
    what: &str,
) -> i64 {
    match fields::coerce_opt_f64(api_value) {
        Some(value) => value.round() as i64,
        None if !processed.is_empty() => {
            let total: i64 = processed.iter().map(figure).sum();
            let average = (total as f64 / processed.len() as f64).round() as i64;
            info!(
                "Computed average {what} from last {} matches: {average}",
                processed.len()
            );
            average
        }
        None => 0,
    }
}

/// Rating resolution order: lifetime stats payload first, then the player
/// record's cs2 sub-object, then flattened top-level fields.
fn resolve_elo(stats_payload: Option<&Value>, player: &Value) -> i64 {
    let lifetime = stats_payload.and_then(|s| s.get("lifetime"));

    fields::coerce_opt_i64(fields::resolve(
        lifetime,
        &["Current Elo", "Elo", "faceit_elo"],
    ))
    .or_else(|| {
        fields::coerce_opt_i64(fields::resolve(
            fields::resolve_path(Some(player), &["games", "cs2"]),
            &["faceit_elo", "elo"],
        ))
    })
    .or_else(|| fields::coerce_opt_i64(fields::resolve(Some(player), &["faceit_elo", "elo"])))
    .unwrap_or(0)
}

fn resolve_level(stats_payload: Option<&Value>, player: &Value) -> i64 {
    let lifetime = stats_payload.and_then(|s| s.get("lifetime"));

    fields::coerce_opt_i64(fields::resolve(
        lifetime,
        &["Current Level", "Level", "skill_level"],
    ))
    .or_else(|| {
        fields::coerce_opt_i64(fields::resolve(
            fields::resolve_path(Some(player), &["games", "cs2"]),
            &["skill_level", "level"],
        ))
    })
    .or_else(|| fields::coerce_opt_i64(fields::resolve(Some(player), &["skill_level", "level"])))
    .unwrap_or(0)
}

fn resolve_csgo_elo(player: &Value) -> i64 {
    fields::coerce_opt_i64(fields::resolve(
        fields::resolve_path(Some(player), &["games", "csgo"]),
        &["faceit_elo", "elo"],
    ))
    .or_else(|| {
        fields::coerce_opt_i64(fields::resolve(
            Some(player),
            &["csgo_faceit_elo", "csgo_elo"],
        ))
    })
    .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn match_with(kills: i64) -> MatchSummary {
        MatchSummary {
            match_id: "m".to_string(),
            date: None,
            result: crate::outcome::MatchOutcome::Unknown,
            score: "0-0".to_string(),
            map: "Unknown".to_string(),
            mode: "Competitive".to_string(),
            kills,
            deaths: kills / 2,
            assists: 1,
            match_url: String::new(),
        }
    }

    #[test]
    fn average_kills_fall_back_to_processed_sample() {
        let processed: Vec<_> = [10, 8, 12, 9, 11].into_iter().map(match_with).collect();
        let summary = finish_stats(RawLifetimeStats::default(), &processed);

        assert_eq!(summary.average_kills, 10);
        assert_eq!(summary.last_30_matches_avg_kills, 10);
    }

    #[test]
    fn api_provided_average_is_rounded_not_recomputed() {
        let raw = RawLifetimeStats {
            average_kills: Some(json!("17.6")),
            ..RawLifetimeStats::default()
        };
        let processed = vec![match_with(2)];

        let summary = finish_stats(raw, &processed);
        assert_eq!(summary.average_kills, 18);
    }

    #[test]
    fn no_api_average_and_no_matches_yields_zero() {
        let summary = finish_stats(RawLifetimeStats::default(), &[]);
        assert_eq!(summary.average_kills, 0);
        assert_eq!(summary.last_30_matches_avg_kills, 0);
    }

    #[test]
    fn elo_prefers_lifetime_stats_over_player_record() {
        let stats = json!({"lifetime": {"Current Elo": "2100"}});
        let player = json!({"games": {"cs2": {"faceit_elo": 1800}}});
        assert_eq!(resolve_elo(Some(&stats), &player), 2100);
    }

    #[test]
    fn elo_falls_back_to_game_subobject_then_flat_fields() {
        let player = json!({"games": {"cs2": {"faceit_elo": 1800}}});
        assert_eq!(resolve_elo(None, &player), 1800);

        let flat = json!({"faceit_elo": 1500});
        assert_eq!(resolve_elo(None, &flat), 1500);

        assert_eq!(resolve_elo(None, &json!({})), 0);
    }

    #[test]
    fn mode_labels_are_humanized() {
        let stats = json!({"rounds": [{"game_mode": "5v5"}]});
        assert_eq!(mode_label(&stats), "Competitive");

        let stats = json!({"rounds": [{"game_mode": "2v2"}]});
        assert_eq!(mode_label(&stats), "Wingman");

        let stats = json!({"rounds": [{"game_mode": "1v1"}]});
        assert_eq!(mode_label(&stats), "1v1");

        assert_eq!(mode_label(&json!({})), "Unknown");
    }

    #[test]
    fn player_round_stat_finds_player_in_either_team() {
        let stats = json!({
            "rounds": [{
                "teams": [
                    {"players": [{"player_id": "a", "player_stats": {"Kills": "21"}}]},
                    {"players": [{"player_id": "b", "player_stats": {"Kills": "14"}}]}
                ]
            }]
        });

        assert_eq!(player_round_stat(&stats, "b", "Kills"), 14);
        assert_eq!(player_round_stat(&stats, "missing", "Kills"), 0);
    }
}
