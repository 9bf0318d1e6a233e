use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(author, version, about = "faceit-finder: aggregated FACEIT profiles from Steam IDs")]
pub struct Cli {
    /// Command
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
#[clap(rename_all = "lower_case")]
pub enum Command {
    /// Look up the aggregated FACEIT profile for a Steam profile URL or SteamID64
    Lookup {
        /// Steam profile URL (profiles/ or id/ form) or a bare SteamID64
        steam_url: String,
        /// Tag the lookup as a browser-extension request (skips the recent-search feed)
        #[arg(long)]
        extension: bool,
        /// Pretty-print the JSON output
        #[arg(short, long)]
        pretty: bool,
    },
}
