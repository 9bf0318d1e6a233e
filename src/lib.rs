pub mod api;
pub mod bans;
pub mod cache;
pub mod cli;
pub mod config;
pub mod errors;
pub mod fields;
pub mod http;
pub mod outcome;
pub mod recent;
pub mod services;
pub mod stats;
pub mod steam;

use anyhow::{Context, Result};
use clap::Parser;
use std::time::Duration;

use crate::api::FaceitClient;
use crate::cache::ProfileCache;
use crate::cli::{Cli, Command};
use crate::config::AppConfig;
use crate::http::HttpTransport;
use crate::recent::LogSink;
use crate::services::{ProfileService, SearchChannel};

pub fn interpret() -> Command {
    let cli = Cli::parse();
    cli.command
}

pub fn handle_lookup(steam_url: &str, extension: bool, pretty: bool) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let config = AppConfig::new();

        let api_key = std::env::var("FACEIT_API_KEY")
            .context("FACEIT_API_KEY is required. Please set it in the environment")?;
        let steam_api_key = std::env::var("STEAM_API_KEY").ok();

        let transport = HttpTransport::new(config.http.user_agent, config.faceit.timeout_secs)?;
        let client = FaceitClient::new(transport.clone(), api_key, config.faceit);
        let cache = ProfileCache::with_ttl(Duration::from_secs(config.cache.ttl_secs));

        let service = ProfileService::new(
            transport,
            client,
            cache,
            LogSink,
            config.steam,
            steam_api_key,
        );

        let channel = if extension {
            SearchChannel::Extension
        } else {
            SearchChannel::Web
        };

        let profile = service.find_by_steam_url(steam_url, channel).await?;

        let output = if pretty {
            serde_json::to_string_pretty(&profile)?
        } else {
            serde_json::to_string(&profile)?
        };
        println!("{output}");

        Ok(())
    })
}
