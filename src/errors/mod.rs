/// Caller-visible outcomes of a profile lookup.
///
/// Only the initial identifier resolution can fail the aggregation; every
/// downstream sub-fetch degrades to empty data instead of raising.
#[derive(thiserror::Error, Debug)]
pub enum LookupError {
    /// The supplied reference is not a recognizable Steam URL or SteamID64.
    /// No network call was attempted.
    #[error("invalid Steam profile reference: {0}")]
    InvalidInput(String),

    /// The identifier resolved but no FACEIT player record matches it.
    #[error("player not found on FACEIT")]
    NotFound,

    /// A required upstream call failed in a retryable way.
    #[error("upstream request failed: {0}")]
    Upstream(String),
}

pub type Result<T> = std::result::Result<T, LookupError>;
