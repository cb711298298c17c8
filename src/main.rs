mod config;
mod predict;
mod web;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

use crate::config::Config;
use crate::predict::Catalog;
use crate::web::AppState;

#[derive(Parser)]
#[command(name = "overhead")]
#[command(about = "Satellite visibility service")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the satellite catalog and serve the HTTP API
    Serve {
        /// YAML configuration file; built-in defaults when omitted
        #[arg(short, long)]
        config: Option<String>,
    },
    /// Load the satellite catalog, list it and exit
    Check {
        #[arg(short, long)]
        config: Option<String>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { config } => serve(config.as_deref()).await,
        Commands::Check { config } => check(config.as_deref()).await,
    }
}

async fn serve(path: Option<&str>) -> ExitCode {
    let Some((config, catalog)) = startup(path).await else {
        return ExitCode::FAILURE;
    };

    let state = AppState::new(config, catalog);
    match web::run_server(state).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("Server error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn check(path: Option<&str>) -> ExitCode {
    let Some((_, catalog)) = startup(path).await else {
        return ExitCode::FAILURE;
    };

    println!("Catalog is valid ({} satellites)", catalog.len());
    for (i, name) in catalog.names().enumerate() {
        println!("  {}: {}", i + 1, name);
    }
    ExitCode::SUCCESS
}

/// Config first, then the catalog. Nothing is served unless both succeed.
async fn startup(path: Option<&str>) -> Option<(Config, Catalog)> {
    let config = match path {
        Some(path) => match Config::from_file(path) {
            Ok(c) => c,
            Err(e) => {
                log::error!("Error reading config {}: {}", path, e);
                return None;
            }
        },
        None => Config::default(),
    };

    match predict::load_catalog(&config.catalog).await {
        Ok(catalog) => Some((config, catalog)),
        Err(e) => {
            log::error!("Could not start: satellite data unavailable: {}", e);
            None
        }
    }
}
