pub mod settings;

pub use settings::{AppConfig, CacheSettings, FaceitSettings, HttpSettings, SteamSettings};
