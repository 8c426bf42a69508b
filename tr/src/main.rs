//! TravelRAD - AI travel itinerary planner
//!
//! CLI entry point: the interactive planner plus one-shot commands for
//! scripting and inspecting what gets sent to the model.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Parser;
use eyre::{Context, Result};
use tracing::{debug, info, warn};

use travelrad::cli::{Cli, Command};
use travelrad::config::Config;
use travelrad::domain::TripPreferences;
use travelrad::domain::options::CITIES;
use travelrad::form::{Action, PlanningSession, preference_actions, suggest_cities};
use travelrad::llm::create_client;
use travelrad::planner::{ItineraryPlanner, PromptLoader, itinerary_schema};
use travelrad::render::{OutputFormat, render};
use travelrad::tui;

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("travelrad")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    // Priority: CLI --log-level > config file > INFO
    let level = match cli_log_level.or(config_log_level) {
        Some(s) => match s.to_uppercase().as_str() {
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
    };

    let log_file = fs::File::create(log_dir.join("travelrad.log")).context("Failed to create log file")?;

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

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    setup_logging(cli.log_level.as_deref(), config.log_level.as_deref()).context("Failed to setup logging")?;
    info!(provider = %config.llm.provider, model = %config.llm.model, "TravelRAD loaded config");

    match cli.command {
        None | Some(Command::Tui) => {
            debug!("main: matched Tui command");
            cmd_tui(&config).await
        }
        Some(Command::Plan {
            prefs_file,
            agree_terms,
            format,
            output,
        }) => {
            debug!(?prefs_file, %agree_terms, ?format, "main: matched Plan command");
            cmd_plan(&config, &prefs_file, agree_terms, format, output.as_deref()).await
        }
        Some(Command::Prompt { prefs_file }) => {
            debug!(?prefs_file, "main: matched Prompt command");
            cmd_prompt(&prefs_file)
        }
        Some(Command::Schema) => {
            debug!("main: matched Schema command");
            cmd_schema()
        }
        Some(Command::Cities { prefix }) => {
            debug!(%prefix, "main: matched Cities command");
            cmd_cities(&prefix)
        }
    }
}

fn today() -> chrono::NaiveDate {
    chrono::Local::now().date_naive()
}

/// Build the planner from config, failing fast on a missing key
fn build_planner(config: &Config) -> Result<Arc<ItineraryPlanner>> {
    config.validate()?;
    let client = create_client(&config.llm).context("Failed to create LLM client")?;
    let project_root = std::env::current_dir().context("Failed to get current directory")?;
    Ok(Arc::new(ItineraryPlanner::new(
        client,
        PromptLoader::new(project_root),
        config.llm.max_tokens,
    )))
}

fn load_preferences(path: &Path) -> Result<TripPreferences> {
    let content = fs::read_to_string(path).context(format!("Failed to read {}", path.display()))?;
    let prefs = TripPreferences::from_yaml_str(&content)
        .context(format!("Failed to parse preferences in {}", path.display()))?;

    let unknown = prefs.unknown_options();
    if !unknown.is_empty() {
        warn!(?unknown, "load_preferences: values outside the form's options");
        eyre::bail!("Unknown options in {}: {}", path.display(), unknown.join(", "));
    }
    Ok(prefs)
}

async fn cmd_tui(config: &Config) -> Result<()> {
    let planner = build_planner(config)?;
    tui::run(planner, config.export_dir.clone(), today()).await
}

async fn cmd_plan(
    config: &Config,
    prefs_file: &Path,
    agree_terms: bool,
    format: OutputFormat,
    output: Option<&Path>,
) -> Result<()> {
    let prefs = load_preferences(prefs_file)?;
    let planner = build_planner(config)?;

    let mut session = PlanningSession::new(planner, today());
    let mut actions = preference_actions(&prefs);
    if agree_terms {
        actions.push(Action::ToggleTerms);
    }
    actions.push(Action::Submit);
    let state = session.dispatch_all(actions).await;

    let Some(itinerary) = state.itinerary.as_ref() else {
        let message = state.error.clone().unwrap_or_else(|| "No itinerary was produced".to_string());
        return Err(eyre::eyre!(message));
    };

    match output {
        Some(path) => {
            if format == OutputFormat::Text {
                colored::control::set_override(false);
            }
            let content = render(itinerary, Some(&state.prefs), format)?;
            fs::write(path, content).context(format!("Failed to write {}", path.display()))?;
            println!("Itinerary written to {}", path.display());
        }
        None => println!("{}", render(itinerary, Some(&state.prefs), format)?),
    }
    Ok(())
}

fn cmd_prompt(prefs_file: &Path) -> Result<()> {
    let prefs = load_preferences(prefs_file)?;
    let project_root = std::env::current_dir().context("Failed to get current directory")?;
    let prompts = PromptLoader::new(project_root);
    println!("{}\n", prompts.system_instruction(&prefs)?);
    println!("{}", prompts.itinerary_prompt(&prefs)?);
    Ok(())
}

fn cmd_schema() -> Result<()> {
    let schema = serde_json::to_string_pretty(&itinerary_schema()).context("Failed to serialize schema")?;
    println!("{}", schema);
    Ok(())
}

fn cmd_cities(prefix: &str) -> Result<()> {
    for city in suggest_cities(prefix, CITIES) {
        println!("{}", city);
    }
    Ok(())
}
