use anyhow::Result;
use colored::Colorize;

use faceit_finder::cli::Command;
use faceit_finder::{handle_lookup, interpret};

fn main() {
    setup_logging();
    parse_and_execute().unwrap_or_else(|e| {
        eprintln!("{} {e:#}", "Error:".red());
        std::process::exit(1);
    });
}

fn setup_logging() {
    sensible_env_logger::init!();
}

fn parse_and_execute() -> Result<()> {
    let command = interpret();
    execute_command(&command)
}

fn execute_command(command: &Command) -> Result<()> {
    match command {
        Command::Lookup {
            steam_url,
            extension,
            pretty,
        } => handle_lookup(steam_url, *extension, *pretty),
    }
}
