//! TravelGuide - custom itineraries for your next journey
//!
//! CLI entry point: interactive form, one-shot planning, and model listing.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use tracing::{debug, info};

use travelguide::cli::{Cli, Command};
use travelguide::config::Config;
use travelguide::error::GuideError;
use travelguide::form;
use travelguide::llm::GenerationClient;
use travelguide::planner::Planner;
use travelguide::prompts::PromptLoader;
use travelguide::trip::TripRequest;

fn parse_level(level_str: Option<&str>) -> tracing::Level {
    match level_str.map(|s| s.to_uppercase()) {
        Some(s) => match s.as_str() {
            "TRACE" => tracing::Level::TRACE,
            "DEBUG" => tracing::Level::DEBUG,
            "INFO" => tracing::Level::INFO,
            "WARN" | "WARNING" => tracing::Level::WARN,
            "ERROR" => tracing::Level::ERROR,
            _ => {
                eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", s);
                tracing::Level::INFO
            }
        },
        None => tracing::Level::INFO,
    }
}

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("travelguide")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    // Priority: CLI --log-level > config file > default (INFO)
    let level = parse_level(cli_log_level.or(config_log_level));

    let log_file = fs::File::create(log_dir.join("travelguide.log")).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_log_level = Config::load_log_level(cli.config.as_ref());
    setup_logging(cli.log_level.as_deref(), config_log_level.as_deref()).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    info!("TravelGuide loaded config: model={}", config.llm.model);

    debug!(command = ?cli.command, "main: dispatching command");
    match cli.command {
        None => cmd_form(&config, None).await,
        Some(Command::Form { output_dir }) => cmd_form(&config, output_dir).await,
        Some(Command::Plan {
            destination,
            days,
            nights,
            interests,
            save,
            output_dir,
            dry_run,
        }) => {
            let request = TripRequest::new(&destination, days, nights, interests.as_deref())?;
            let save_dir = match (save, output_dir) {
                (_, Some(dir)) => Some(dir),
                (true, None) => Some(config.output.dir.clone()),
                (false, None) => None,
            };
            cmd_plan(&config, &request, save_dir.as_deref(), dry_run).await
        }
        Some(Command::Models) => cmd_models(&config).await,
    }
}

/// Load prompt templates from the working directory and make sure they render
fn load_prompts() -> Result<PromptLoader> {
    let root = std::env::current_dir().context("Failed to get current directory")?;
    let loader = PromptLoader::new(root);
    let sample = TripRequest::new("Lisbon", 3, 2, Some("food"))?;
    loader
        .render_itinerary(&sample)
        .map_err(|e| GuideError::ConfigInvalid(e.to_string()))?;
    Ok(loader)
}

async fn connect(config: &Config) -> Result<GenerationClient> {
    let generation = config.resolve()?;
    Ok(GenerationClient::initialize(generation).await?)
}

async fn cmd_form(config: &Config, output_dir: Option<PathBuf>) -> Result<()> {
    debug!(?output_dir, "cmd_form: called");
    let prompts = load_prompts()?;
    let client = connect(config).await?;
    let planner = Planner::new(client, prompts);
    let output_dir = output_dir.unwrap_or_else(|| config.output.dir.clone());
    form::run(&planner, &output_dir).await
}

async fn cmd_plan(config: &Config, request: &TripRequest, save_dir: Option<&Path>, dry_run: bool) -> Result<()> {
    debug!(?request, ?save_dir, %dry_run, "cmd_plan: called");
    let prompts = load_prompts()?;

    if dry_run {
        println!("{}", prompts.render_itinerary(request)?);
        return Ok(());
    }

    let client = connect(config).await?;
    let planner = Planner::new(client, prompts);
    let itinerary = planner.plan(request).await?;
    form::print_itinerary(&itinerary);

    if let Some(dir) = save_dir {
        let path = itinerary.save(dir)?;
        println!("{} Saved {}", "✓".green(), path.display());
    }
    Ok(())
}

async fn cmd_models(config: &Config) -> Result<()> {
    debug!("cmd_models: called");
    // a wrong model id is what this command diagnoses, so the probe would only get in the way
    let mut generation = config.resolve()?;
    generation.probe_on_start = false;
    let client = GenerationClient::initialize(generation).await?;

    let models = client.list_models().await?;
    if models.is_empty() {
        println!("No models found");
    } else {
        println!("Available models:");
        for name in models {
            println!("- {}", name.cyan());
        }
    }
    Ok(())
}
