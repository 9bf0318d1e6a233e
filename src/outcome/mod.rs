use serde::Serialize;
use serde_json::Value;

use crate::fields::{self, id_matches};

/// Match result from the perspective of one player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MatchOutcome {
    Win,
    Lose,
    Draw,
    Unknown,
}

/// Which of the two canonical match slots a player occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

fn side_for_slot(key: &str) -> Option<Side> {
    match key {
        "faction1" | "team1" | "1" | "left" => Some(Side::Left),
        "faction2" | "team2" | "2" | "right" => Some(Side::Right),
        _ => None,
    }
}

fn is_faction_token(value: &str) -> bool {
    matches!(value, "faction1" | "faction2" | "team1" | "team2")
}

fn value_as_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Union of the `players` and `roster` lists; match payloads use either name
/// depending on the endpoint generation.
fn roster_contains(team: &Value, player_id: &str) -> bool {
    ["players", "roster"].iter().any(|list_key| {
        team.get(*list_key)
            .and_then(Value::as_array)
            .map(|players| {
                players
                    .iter()
                    .any(|p| id_matches(p.get("player_id"), player_id))
            })
            .unwrap_or(false)
    })
}

/// Where the player was found in the match metadata: the team identifier,
/// plus the faction key when the teams block is keyed by slot name.
struct Membership {
    team_id: Option<String>,
    faction_key: Option<String>,
}

fn find_membership(details: &Value, player_id: &str) -> Option<Membership> {
    let teams = details.get("teams")?;

    if let Some(map) = teams.as_object() {
        for (key, team) in map {
            if roster_contains(team, player_id) {
                return Some(Membership {
                    team_id: team_identifier(team),
                    faction_key: Some(key.clone()),
                });
            }
        }
    } else if let Some(list) = teams.as_array() {
        for team in list {
            if roster_contains(team, player_id) {
                return Some(Membership {
                    team_id: team_identifier(team),
                    faction_key: None,
                });
            }
        }
    }

    None
}

fn team_identifier(team: &Value) -> Option<String> {
    fields::resolve(Some(team), &["team_id", "faction_id", "id"]).and_then(value_as_id)
}

/// Determine Win/Lose/Draw/Unknown for `player_id`.
///
/// Layered fallback: explicit winner declaration first, then the round score
/// paired with whichever team listing still reveals the player's side. Any
/// malformed nesting degrades to the next layer instead of erroring.
pub fn determine(details: &Value, stats: Option<&Value>, player_id: &str) -> MatchOutcome {
    let results = details.get("results").filter(|v| v.is_object());
    let membership = find_membership(details, player_id);

    // Layer 1: declared winner.
    let winner = fields::resolve(results, &["winner", "winner_id", "winner_faction"])
        .and_then(value_as_id);
    if let Some(winner) = winner {
        if is_faction_token(&winner) {
            if let Some(key) = membership.as_ref().and_then(|m| m.faction_key.as_deref()) {
                return if key == winner {
                    MatchOutcome::Win
                } else {
                    MatchOutcome::Lose
                };
            }
        }
        if let Some(team_id) = membership.as_ref().and_then(|m| m.team_id.as_deref()) {
            return if team_id == winner {
                MatchOutcome::Win
            } else {
                MatchOutcome::Lose
            };
        }
    }

    // Layer 2: round counts.
    score_outcome(details, stats, player_id, results)
}

fn score_outcome(
    details: &Value,
    stats: Option<&Value>,
    player_id: &str,
    results: Option<&Value>,
) -> MatchOutcome {
    let score = fields::resolve(results, &["score", "score_str"])
        .and_then(Value::as_str)
        .map(str::to_owned)
        .or_else(|| score_from_stats(stats));

    let Some(score) = score else {
        return MatchOutcome::Unknown;
    };

    // "16 - 14", "13:11" and "12/12" all normalize to the same shape.
    let normalized = score.replace(' ', "").replace(['-', ':'], "/");
    let Some((left, right)) = normalized.split_once('/') else {
        return MatchOutcome::Unknown;
    };
    let (Ok(left), Ok(right)) = (left.trim().parse::<i64>(), right.trim().parse::<i64>()) else {
        return MatchOutcome::Unknown;
    };

    match find_side(details, stats, player_id) {
        Some(Side::Left) => compare_rounds(left, right),
        Some(Side::Right) => compare_rounds(right, left),
        // A tie is objectively a draw no matter which side the player is on.
        None if left == right => MatchOutcome::Draw,
        None => MatchOutcome::Unknown,
    }
}

fn compare_rounds(own: i64, other: i64) -> MatchOutcome {
    match own.cmp(&other) {
        std::cmp::Ordering::Greater => MatchOutcome::Win,
        std::cmp::Ordering::Less => MatchOutcome::Lose,
        std::cmp::Ordering::Equal => MatchOutcome::Draw,
    }
}

fn score_from_stats(stats: Option<&Value>) -> Option<String> {
    stats?
        .get("rounds")?
        .as_array()?
        .first()?
        .get("round_stats")?
        .get("Score")?
        .as_str()
        .map(str::to_owned)
}

/// Locate the player's side, scanning in order: faction map in the match
/// metadata, list-style teams in the metadata, then every round's team
/// listings in the statistics payload.
fn find_side(details: &Value, stats: Option<&Value>, player_id: &str) -> Option<Side> {
    let factions = details
        .get("factions")
        .or_else(|| details.get("teams").filter(|t| t.is_object()));
    if let Some(map) = factions.and_then(Value::as_object) {
        for (key, team) in map {
            if roster_contains(team, player_id) {
                if let Some(side) = side_for_slot(key) {
                    return Some(side);
                }
            }
        }
    }

    if let Some(list) = details.get("teams").and_then(Value::as_array) {
        for (idx, team) in list.iter().enumerate().take(2) {
            if roster_contains(team, player_id) {
                return Some(if idx == 0 { Side::Left } else { Side::Right });
            }
        }
    }

    let rounds = stats?.get("rounds")?.as_array()?;
    for round in rounds {
        match round.get("teams") {
            Some(Value::Array(teams)) => {
                for (idx, team) in teams.iter().enumerate().take(2) {
                    if team_players_contain(team, player_id) {
                        return Some(if idx == 0 { Side::Left } else { Side::Right });
                    }
                }
            }
            Some(Value::Object(teams)) => {
                for (key, team) in teams {
                    if team_players_contain(team, player_id) {
                        if let Some(side) = side_for_slot(key) {
                            return Some(side);
                        }
                    }
                }
            }
            _ => {}
        }
    }

    None
}

fn team_players_contain(team: &Value, player_id: &str) -> bool {
    team.get("players")
        .and_then(Value::as_array)
        .map(|players| {
            players
                .iter()
                .any(|p| id_matches(p.get("player_id"), player_id))
        })
        .unwrap_or(false)
}
