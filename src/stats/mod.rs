use serde_json::Value;

use crate::fields;

/// Lifetime stats pulled out of the upstream payload, still in native JSON
/// form. Coercion to the output types happens in the aggregation finishing
/// pass, after the match-history fallback averages are known.
#[derive(Debug, Clone, Default)]
pub struct RawLifetimeStats {
    pub win_rate_percent: Option<Value>,
    pub headshot_percent: Option<Value>,
    pub adr: Option<Value>,
    pub kd_ratio: Option<Value>,
    pub matches: Option<Value>,
    pub wins: Option<Value>,
    pub longest_win_streak: Option<Value>,
    pub current_win_streak: Option<Value>,
    pub average_kills: Option<Value>,
    pub average_deaths: Option<Value>,
    pub average_assists: Option<Value>,
    pub average_mvps: Option<Value>,
}

/// Candidate-key table per canonical field. Schema drift upstream becomes a
/// table edit here, not a code change.
const WIN_RATE: &[&str] = &["Win Rate %", "Win Rate", "win_rate"];
const HEADSHOTS: &[&str] = &["Average Headshots %", "Average Headshots", "headshot_percent"];
const ADR: &[&str] = &["ADR", "Average Damage per Round"];
const KD_RATIO: &[&str] = &["Average K/D Ratio", "K/D Ratio", "kd_ratio"];
const MATCHES: &[&str] = &["Matches", "Total Matches", "matches"];
const WINS: &[&str] = &["Wins", "Total Wins", "wins"];
const LONGEST_STREAK: &[&str] = &["Longest Win Streak", "longest_win_streak"];
const CURRENT_STREAK: &[&str] = &["Current Win Streak", "current_win_streak"];
const AVG_KILLS: &[&str] = &["Average Kills", "Kills", "average_kills", "Avg Kills"];
const AVG_DEATHS: &[&str] = &["Average Deaths", "Deaths", "average_deaths", "Avg Deaths"];
const AVG_ASSISTS: &[&str] = &["Average Assists", "Assists", "average_assists", "Avg Assists"];
const AVG_MVPS: &[&str] = &["Average MVPs", "MVPs", "average_mvps", "Avg MVPs"];

/// Map the lifetime-stats payload into the canonical field set. A payload
/// without a `lifetime` section yields the empty default.
pub fn normalize(stats: Option<&Value>) -> RawLifetimeStats {
    let Some(lifetime) = stats.and_then(|s| s.get("lifetime")).filter(|v| v.is_object()) else {
        return RawLifetimeStats::default();
    };

    let pick = |keys: &[&str]| fields::resolve(Some(lifetime), keys).cloned();

    RawLifetimeStats {
        win_rate_percent: pick(WIN_RATE),
        headshot_percent: pick(HEADSHOTS),
        adr: pick(ADR),
        kd_ratio: pick(KD_RATIO),
        matches: pick(MATCHES),
        wins: pick(WINS),
        longest_win_streak: pick(LONGEST_STREAK),
        current_win_streak: pick(CURRENT_STREAK),
        average_kills: pick(AVG_KILLS),
        average_deaths: pick(AVG_DEATHS),
        average_assists: pick(AVG_ASSISTS),
        average_mvps: pick(AVG_MVPS),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn normalizes_current_key_generation() {
        let payload = json!({
            "lifetime": {
                "Win Rate %": "55",
                "Average Headshots %": "48",
                "ADR": "81.3",
                "Average K/D Ratio": "1.12",
                "Matches": "812",
                "Wins": "449",
                "Longest Win Streak": "11",
                "Current Win Streak": "2",
                "Average Kills": "17.4"
            }
        });

        let stats = normalize(Some(&payload));
        assert_eq!(stats.win_rate_percent, Some(json!("55")));
        assert_eq!(stats.kd_ratio, Some(json!("1.12")));
        assert_eq!(stats.average_kills, Some(json!("17.4")));
        assert_eq!(stats.average_mvps, None);
    }

    #[test]
    fn normalizes_legacy_snake_case_keys() {
        let payload = json!({
            "lifetime": {
                "win_rate": 61,
                "kd_ratio": 1.3,
                "average_kills": 19
            }
        });

        let stats = normalize(Some(&payload));
        assert_eq!(stats.win_rate_percent, Some(json!(61)));
        assert_eq!(stats.kd_ratio, Some(json!(1.3)));
        assert_eq!(stats.average_kills, Some(json!(19)));
    }

    #[test]
    fn missing_lifetime_section_yields_defaults() {
        let stats = normalize(Some(&json!({"game_id": "cs2"})));
        assert!(stats.win_rate_percent.is_none());
        assert!(stats.matches.is_none());

        let stats = normalize(None);
        assert!(stats.average_kills.is_none());
    }
}
