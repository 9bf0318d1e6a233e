use serde_json::Value;

/// Schema-tolerant field lookup over raw FACEIT payloads.
///
/// The upstream API has shipped at least two key naming generations for most
/// lifetime-stat fields, so every lookup goes through an ordered candidate
/// list instead of a single hardcoded key.
pub fn resolve<'a>(container: Option<&'a Value>, keys: &[&str]) -> Option<&'a Value> {
    let object = container?.as_object()?;

    for key in keys {
        match object.get(*key) {
            Some(Value::Null) | None => continue,
            Some(value) => return Some(value),
        }
    }

    None
}

/// Walk a nested path of object keys, returning None if any hop is missing.
pub fn resolve_path<'a>(container: Option<&'a Value>, path: &[&str]) -> Option<&'a Value> {
    let mut current = container?;
    for key in path {
        current = current.get(*key)?;
    }
    if current.is_null() { None } else { Some(current) }
}

/// Coerce a JSON value to f64, accepting numbers and numeric strings.
/// Lifetime stats arrive as strings ("55.2"), match stats as numbers.
pub fn coerce_opt_f64(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

pub fn coerce_opt_i64(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.round() as i64)),
        Value::String(s) => {
            let trimmed = s.trim();
            trimmed
                .parse::<i64>()
                .ok()
                .or_else(|| trimmed.parse::<f64>().ok().map(|f| f.round() as i64))
        }
        _ => None,
    }
}

/// Defensive coercion with a 0.0 fallback, mirroring the output contract:
/// a malformed upstream value must never surface as a type error.
pub fn coerce_f64(value: Option<&Value>) -> f64 {
    coerce_opt_f64(value).unwrap_or(0.0)
}

pub fn coerce_i64(value: Option<&Value>) -> i64 {
    coerce_opt_i64(value).unwrap_or(0)
}

/// Two representations of the same id (string vs number) must compare equal.
pub fn id_matches(value: Option<&Value>, id: &str) -> bool {
    match value {
        Some(Value::String(s)) => s == id,
        Some(Value::Number(n)) => n.to_string() == id,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn resolve_returns_first_present_candidate() {
        let payload = json!({"Win Rate %": 55});
        let value = resolve(Some(&payload), &["Win Rate %", "Win Rate", "win_rate"]);
        assert_eq!(value, Some(&json!(55)));
    }

    #[test]
    fn resolve_skips_null_values() {
        let payload = json!({"Win Rate %": null, "win_rate": 42});
        let value = resolve(Some(&payload), &["Win Rate %", "Win Rate", "win_rate"]);
        assert_eq!(value, Some(&json!(42)));
    }

    #[test]
    fn resolve_missing_container_yields_none() {
        assert_eq!(resolve(None, &["Win Rate %"]), None);
        assert_eq!(coerce_i64(resolve(None, &["Win Rate %"])), 0);
    }

    #[test]
    fn resolve_path_walks_nested_objects() {
        let payload = json!({"games": {"cs2": {"faceit_elo": 2100}}});
        let value = resolve_path(Some(&payload), &["games", "cs2", "faceit_elo"]);
        assert_eq!(value, Some(&json!(2100)));
        assert_eq!(resolve_path(Some(&payload), &["games", "csgo", "elo"]), None);
    }

    #[test]
    fn coercion_accepts_numeric_strings() {
        assert_eq!(coerce_f64(Some(&json!("1.23"))), 1.23);
        assert_eq!(coerce_i64(Some(&json!("17"))), 17);
        assert_eq!(coerce_i64(Some(&json!("17.6"))), 18);
        assert_eq!(coerce_i64(Some(&json!(9.4))), 9);
    }

    #[test]
    fn coercion_falls_back_to_zero_on_garbage() {
        assert_eq!(coerce_f64(Some(&json!("n/a"))), 0.0);
        assert_eq!(coerce_i64(Some(&json!({"nested": true}))), 0);
    }

    #[test]
    fn id_comparison_is_string_normalized() {
        assert!(id_matches(Some(&json!("123")), "123"));
        assert!(id_matches(Some(&json!(123)), "123"));
        assert!(!id_matches(Some(&json!(124)), "123"));
        assert!(!id_matches(None, "123"));
    }
}
