//! mapnote - command-line editor for campus map documents.
//!
//! Every invocation opens the store in `--dir`, applies at most one change,
//! and saves it.

mod commands;
mod config;

use anyhow::Context;
use clap::{Parser, Subcommand};
use commands::{AccountCommands, BuildingCommands, PoiCommands};
use config::Config;
use mapnote_history::{ErrorKind, Store, StoreError};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;

/// Exit code when the store directory or database file cannot be accessed.
const EXIT_IO: u8 = 2;
/// Exit code when the database file exists but is not a valid document.
const EXIT_INVALID_DATABASE: u8 = 3;

#[derive(Parser)]
#[command(name = "mapnote")]
#[command(author, version, about = "Edit campus map documents", long_about = None)]
struct Cli {
    /// Store directory holding database.json
    #[arg(short, long, default_value = ".")]
    dir: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the current document
    Show {
        /// Only list POIs this account may see
        #[arg(long = "as", value_name = "USERNAME")]
        viewer: Option<String>,
        /// Only list POIs in this layer
        #[arg(long)]
        layer: Option<String>,
    },
    /// Check that the database loads and is consistent
    Check,
    /// Print where the map of a floor lives
    MapPath {
        /// Building name
        building: String,
        /// Floor short name
        floor: String,
    },
    /// Show the merged configuration
    Config,
    /// Manage accounts
    Account {
        #[command(subcommand)]
        command: AccountCommands,
    },
    /// Manage buildings and floors
    Building {
        #[command(subcommand)]
        command: BuildingCommands,
    },
    /// Manage points of interest
    Poi {
        #[command(subcommand)]
        command: PoiCommands,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::from(exit_code(&err))
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let (config, sources) = Config::load(&cli.dir)?;
    mapnote_util::log::init(&config.log_config(cli.verbose)?);
    debug!(?sources, "Loaded configuration");

    if let Commands::Config = cli.command {
        return commands::show_config(&config, &sources);
    }

    let mut store = Store::open_with_config(&cli.dir, config.store_config())
        .with_context(|| format!("Failed to open store in {}", cli.dir.display()))?;

    match cli.command {
        Commands::Show { viewer, layer } => {
            commands::show(&store, viewer.as_deref(), layer.as_deref())
        }
        Commands::Check => commands::check(&store),
        Commands::MapPath { building, floor } => commands::map_path(&store, &building, &floor),
        Commands::Config => Ok(()),
        Commands::Account { command } => commands::handle_account(command, &mut store),
        Commands::Building { command } => commands::handle_building(command, &mut store),
        Commands::Poi { command } => commands::handle_poi(command, &mut store),
    }
}

fn exit_code(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<StoreError>().map(StoreError::kind) {
        Some(ErrorKind::Io) => EXIT_IO,
        Some(ErrorKind::Parse | ErrorKind::Identity | ErrorKind::Consistency) => {
            EXIT_INVALID_DATABASE
        }
        None => 1,
    }
}
