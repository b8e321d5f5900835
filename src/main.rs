use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context as _, Result};
use chrono::{Local, Timelike};
use clap::{Parser, Subcommand};
use tracing::info;

use travel_companion::{
    CompanionConfig, CompanionError, RecommendationRequest, Recommender, catalog, context,
    logging, parse_preferences,
};

/// Context-aware place recommendations from weather, time of day and preferences
#[derive(Debug, Parser)]
#[command(name = "travel-companion", version, about)]
struct Cli {
    /// Configuration file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show the context tags for a weather description and hour
    Classify {
        #[arg(long)]
        weather: String,
        #[arg(long, value_parser = clap::value_parser!(u32).range(0..24))]
        hour: Option<u32>,
    },
    /// Print the search keywords for the current context
    Recommend {
        #[arg(long)]
        weather: String,
        /// Hour of day (0-23), defaults to the current local hour
        #[arg(long, value_parser = clap::value_parser!(u32).range(0..24))]
        hour: Option<u32>,
        /// Comma-separated preferences, e.g. "Italian, Museum"
        #[arg(long, default_value = "")]
        prefs: String,
        /// Place catalog file, overrides the configured path
        #[arg(long)]
        catalog: Option<PathBuf>,
        /// Print the full recommendation as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {}", describe(&err));
            ExitCode::FAILURE
        }
    }
}

/// Friendly message of the first companion error in the chain, with the details after it
fn describe(err: &anyhow::Error) -> String {
    match err
        .chain()
        .find_map(|cause| cause.downcast_ref::<CompanionError>())
    {
        Some(companion) => format!("{} ({err:#})", companion.user_message()),
        None => format!("{err:#}"),
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = CompanionConfig::load_from_path(cli.config.clone())
        .context("Failed to load configuration")?;
    logging::init(&config.logging, cli.verbose);

    match cli.command {
        Command::Classify { weather, hour } => {
            let hour = hour.unwrap_or_else(current_hour);
            let context = context::classify(&weather, hour);
            println!("weather: {}", context.weather);
            println!("time: {}", context.time);
        }
        Command::Recommend {
            weather,
            hour,
            prefs,
            catalog: catalog_path,
            json,
        } => {
            let path = catalog_path.unwrap_or_else(|| PathBuf::from(&config.catalog.path));
            let recommender = Recommender::from_load(catalog::init(&path), config.policy());
            if let Some(loaded) = recommender.catalog() {
                info!("Using {} places from {}", loaded.len(), path.display());
            }

            let hour = hour.unwrap_or_else(current_hour);
            let request = RecommendationRequest::new(weather, hour, parse_preferences(&prefs));
            let recommendation = recommender.recommend(&request);

            if json {
                println!("{}", serde_json::to_string_pretty(&recommendation)?);
            } else {
                for keyword in &recommendation.keywords {
                    println!("{keyword}");
                }
            }
        }
    }

    Ok(())
}

fn current_hour() -> u32 {
    Local::now().hour()
}
