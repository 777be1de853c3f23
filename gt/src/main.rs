//! Goal Tracker - CLI entry point
//!
//! Launches the TUI by default; `gt interpret` runs a single interpretation.

use std::fs;
use std::path::PathBuf;

use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use tracing::{debug, info, warn};

use goaltracker::cli::{Cli, Command, OutputFormat};
use goaltracker::config::Config;
use goaltracker::interpret::{EMPTY_INPUT_MESSAGE, GoalSpec, Interpreter};
use goaltracker::llm::create_client;
use goaltracker::tui;

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("goaltracker")
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

    let log_file = fs::File::create(log_dir.join("goaltracker.log")).context("Failed to create log file")?;

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

    // Log level from config first, before the full load
    let config_log_level = Config::load_log_level(cli.config.as_ref());
    setup_logging(cli.log_level.as_deref(), config_log_level.as_deref()).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    info!(provider = %config.llm.provider, model = %config.llm.model, "Goal tracker loaded config");

    debug!(command = ?cli.command, "main: dispatching command");
    match cli.command {
        Some(Command::Interpret { text, format }) => {
            debug!(words = text.len(), %format, "main: matched Interpret command");
            cmd_interpret(&config, &text.join(" "), format).await
        }
        Some(Command::Tui) | None => {
            debug!("main: launching TUI");
            cmd_tui(&config).await
        }
    }
}

/// Run the interactive tracker
async fn cmd_tui(config: &Config) -> Result<()> {
    let interpreter = match create_client(&config.llm) {
        Ok(client) => Some(Interpreter::new(client).with_max_tokens(config.llm.max_tokens)),
        Err(e) => {
            warn!(error = %e, "No LLM client; goals cannot be interpreted this session");
            None
        }
    };

    tui::run(interpreter, &config.tracker).await
}

/// Interpret one goal description and print the result
async fn cmd_interpret(config: &Config, text: &str, format: OutputFormat) -> Result<()> {
    debug!(text_len = text.len(), "cmd_interpret: called");
    if text.trim().is_empty() {
        eyre::bail!(EMPTY_INPUT_MESSAGE);
    }

    config.validate().context("Invalid LLM configuration")?;
    let client = create_client(&config.llm).context("Failed to create LLM client")?;
    let interpreter = Interpreter::new(client).with_max_tokens(config.llm.max_tokens);

    let spec = interpreter
        .interpret(text)
        .await
        .map_err(|e| eyre::eyre!(e.user_message()))?;

    print_spec(&spec, format)
}

fn print_spec(spec: &GoalSpec, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let json = serde_json::json!({
                "goal_name": spec.name,
                "duration_minutes": spec.minutes(),
            });
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        OutputFormat::Text => {
            println!("{} {}", "✓".green(), spec.name.bold());
            println!("  Duration: {} minutes", spec.minutes_display().cyan());
        }
    }
    Ok(())
}
