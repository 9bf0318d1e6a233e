use log::{debug, info};
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use crate::api::models::PlayerProfile;

pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

/// In-memory cache of aggregated profiles, keyed by SteamID64.
///
/// Entries expire a fixed duration after insertion and are evicted lazily on
/// lookup. Replacement is wholesale per key; concurrent readers may briefly
/// see a slightly stale profile, which is acceptable for this data.
pub struct ProfileCache {
    ttl: Duration,
    entries: Mutex<HashMap<String, (Instant, PlayerProfile)>>,
}

impl ProfileCache {
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_TTL)
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Fetch a cached profile, treating expired entries as absent.
    pub fn get(&self, steam_id: &str) -> Option<PlayerProfile> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);

        match entries.get(steam_id) {
            Some((inserted_at, profile)) if inserted_at.elapsed() < self.ttl => {
                info!("Using cached profile for Steam ID {steam_id}");
                Some(profile.clone())
            }
            Some(_) => {
                debug!("Evicting expired cache entry for Steam ID {steam_id}");
                entries.remove(steam_id);
                None
            }
            None => None,
        }
    }

    pub fn put(&self, steam_id: &str, profile: PlayerProfile) {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(steam_id.to_string(), (Instant::now(), profile));
        info!("Cached profile for Steam ID {steam_id}");
    }
}

impl Default for ProfileCache {
    fn default() -> Self {
        Self::new()
    }
}
