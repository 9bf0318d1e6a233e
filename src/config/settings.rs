pub struct FaceitSettings {
    pub api_base_url: &'static str,
    pub game: &'static str,
    pub timeout_secs: u64,
    pub banner_probe_timeout_secs: u64,
    /// Matches fetched and processed for the statistical sample.
    pub history_limit: usize,
    /// Matches surfaced in the output history (a slice of the sample).
    pub displayed_matches: usize,
}

impl Default for FaceitSettings {
    fn default() -> Self {
        Self {
            api_base_url: "https://open.faceit.com/data/v4",
            game: "cs2",
            timeout_secs: 10,
            banner_probe_timeout_secs: 5,
            history_limit: 30,
            displayed_matches: 5,
        }
    }
}

pub struct SteamSettings {
    pub api_base_url: &'static str,
    pub timeout_secs: u64,
}

impl Default for SteamSettings {
    fn default() -> Self {
        Self {
            api_base_url: "https://api.steampowered.com",
            timeout_secs: 10,
        }
    }
}

pub struct CacheSettings {
    pub ttl_secs: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self { ttl_secs: 300 }
    }
}

pub struct HttpSettings {
    pub user_agent: &'static str,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            user_agent: "FaceitFinder/1.0",
        }
    }
}

pub struct AppConfig {
    pub faceit: FaceitSettings,
    pub steam: SteamSettings,
    pub cache: CacheSettings,
    pub http: HttpSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self {
            faceit: FaceitSettings::default(),
            steam: SteamSettings::default(),
            cache: CacheSettings::default(),
            http: HttpSettings::default(),
        }
    }
}
