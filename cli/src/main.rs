#![deny(missing_docs)]

//! # Entigen CLI
//!
//! Command Line Interface for the GameMaker entity generator.
//!
//! Supported Commands:
//! - `entity`: Regenerates entity scripts and the entity registry.
//! - `overrides`: Lists scripts protected by `///@override`.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::config::SETTINGS_FILE;
use crate::error::CliResult;

mod config;
mod entity;
mod error;
mod overrides;

#[derive(Parser, Debug)]
#[clap(author, version, about = "GameMaker entity generator")]
struct Cli {
    /// Path to the project settings file.
    #[clap(long, global = true, default_value = SETTINGS_FILE)]
    settings: PathBuf,

    /// Enable debug logging.
    #[clap(long, short, global = true)]
    verbose: bool,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate entity code and inject it into the project.
    #[clap(alias = "e")]
    Entity(entity::EntityArgs),
    /// List scripts protected from regeneration.
    Overrides(overrides::OverridesArgs),
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

fn main() -> CliResult<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match &cli.command {
        Commands::Entity(args) => entity::execute(args, &cli.settings)?,
        Commands::Overrides(args) => overrides::execute(args, &cli.settings)?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli_structure() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_entity_classes() {
        let cli = Cli::parse_from(["entigen", "entity", "Coin", "Hero", "--no-stamp"]);
        match cli.command {
            Commands::Entity(args) => {
                assert_eq!(args.classes, vec!["Coin".to_string(), "Hero".to_string()]);
                assert!(args.no_stamp);
            }
            other => panic!("unexpected command {:?}", other),
        }
        assert_eq!(cli.settings, PathBuf::from(SETTINGS_FILE));
    }
}
