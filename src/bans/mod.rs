use chrono::{DateTime, NaiveDateTime};
use log::debug;
use serde::Serialize;
use serde_json::Value;

/// A ban that is still in force, formatted for the profile output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActiveBan {
    pub reason: Option<String>,
    pub start_date: Option<String>,
    pub end_date: String,
}

const DATE_FORMAT: &str = "%d.%m.%Y";

/// Keep only bans that are still active at `now` and format them.
///
/// A ban without a parseable `ends_at` is permanent and therefore active; a
/// ban ending exactly at `now` has already expired.
pub fn filter_active(raw: &[Value], now: NaiveDateTime) -> Vec<ActiveBan> {
    raw.iter()
        .filter_map(|ban| {
            let starts_at = parse_timestamp(ban.get("starts_at"));
            let ends_at = parse_timestamp(ban.get("ends_at"));

            let is_active = match ends_at {
                Some(end) => end > now,
                None => true,
            };
            if !is_active {
                debug!("skipping expired ban: {:?}", ban.get("reason"));
                return None;
            }

            Some(ActiveBan {
                reason: ban
                    .get("reason")
                    .and_then(Value::as_str)
                    .map(str::to_owned),
                start_date: starts_at.map(|d| d.format(DATE_FORMAT).to_string()),
                end_date: ends_at
                    .map(|d| d.format(DATE_FORMAT).to_string())
                    .unwrap_or_else(|| "permanent".to_string()),
            })
        })
        .collect()
}

/// Ban timestamps arrive as ISO-8601 strings (with or without an offset) or
/// as Unix seconds. Unparseable values count as absent, not as errors.
fn parse_timestamp(value: Option<&Value>) -> Option<NaiveDateTime> {
    match value? {
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.naive_local())
            .ok()
            .or_else(|| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f").ok()),
        Value::Number(n) => n
            .as_i64()
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
            .map(|dt| dt.naive_utc()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn ban_ending_in_the_future_is_kept() {
        let raw = vec![json!({
            "reason": "smurfing",
            "starts_at": "2024-01-10T08:30:00Z",
            "ends_at": "2024-03-01T08:30:00Z"
        })];

        let active = filter_active(&raw, at(2024, 2, 1));
        assert_eq!(
            active,
            vec![ActiveBan {
                reason: Some("smurfing".to_string()),
                start_date: Some("10.01.2024".to_string()),
                end_date: "01.03.2024".to_string(),
            }]
        );
    }

    #[test]
    fn expired_ban_is_dropped() {
        let raw = vec![json!({
            "reason": "afk",
            "starts_at": "2023-01-01T00:00:00Z",
            "ends_at": "2023-01-03T00:00:00Z"
        })];
        assert!(filter_active(&raw, at(2024, 2, 1)).is_empty());
    }

    #[test]
    fn ban_ending_exactly_now_is_excluded() {
        let now = at(2024, 2, 1);
        let raw = vec![json!({"ends_at": "2024-02-01T12:00:00Z"})];
        assert!(filter_active(&raw, now).is_empty());
    }

    #[test]
    fn permanent_ban_has_no_end_date() {
        let raw = vec![json!({"reason": "cheating", "starts_at": "2024-01-01T00:00:00Z"})];
        let active = filter_active(&raw, at(2024, 2, 1));
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].end_date, "permanent");
        assert_eq!(active[0].start_date.as_deref(), Some("01.01.2024"));
    }

    #[test]
    fn unix_timestamps_are_accepted() {
        // 2033-05-18T03:33:20Z
        let raw = vec![json!({"ends_at": 2_000_000_000i64})];
        let active = filter_active(&raw, at(2024, 2, 1));
        assert_eq!(active[0].end_date, "18.05.2033");
    }

    #[test]
    fn unparseable_dates_count_as_absent() {
        let raw = vec![json!({
            "reason": "griefing",
            "starts_at": "not-a-date",
            "ends_at": "also-not-a-date"
        })];

        // An unreadable end date means the ban never expires on record.
        let active = filter_active(&raw, at(2024, 2, 1));
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].start_date, None);
        assert_eq!(active[0].end_date, "permanent");
    }

    #[test]
    fn offset_free_iso_strings_parse() {
        let raw = vec![json!({"ends_at": "2030-06-15T10:00:00"})];
        let active = filter_active(&raw, at(2024, 2, 1));
        assert_eq!(active[0].end_date, "15.06.2030");
    }
}
