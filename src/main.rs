//! gammon-toolbar - terminal toolbar front end for a backgammon match
//!
//! The toolbar core lives in `core` and never touches the terminal; the
//! ratatui frontend draws it and feeds input back.

mod app;
mod config;
mod core;
mod frontend;
mod priority;

use anyhow::{Context, Result};
use clap::{Parser as ClapParser, Subcommand};
use config::keybind_validator::{self, ValidationSeverity};
use core::host::ToolbarStyle;
use priority::PriorityLevel;
use std::path::PathBuf;

#[derive(ClapParser)]
#[command(name = "gammon-toolbar")]
#[command(about = "Terminal toolbar front end for a backgammon match", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Custom data directory (default: ~/.gammon-toolbar)
    /// Can also be set via GAMMON_TOOLBAR_DIR environment variable
    #[arg(long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Toolbar style for this run (icons, text, both)
    #[arg(long)]
    style: Option<ToolbarStyle>,

    /// Process priority for this run (see `priorities`)
    #[arg(long)]
    priority: Option<PriorityLevel>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the priority levels and their command tokens
    Priorities,
    /// Validate the configuration file and its keybinds
    CheckConfig {
        /// Config file to validate (default: the one in the data directory)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set custom data directory before anything resolves a path from it
    if let Some(data_dir) = &cli.data_dir {
        std::env::set_var(config::DATA_DIR_ENV, data_dir);
    }

    // TUI apps can't log to stdout, so we write to a file in the data directory
    // (use RUST_LOG env var to control level, e.g. RUST_LOG=debug)
    let log_path = config::Config::log_path()?;
    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create data directory: {:?}", parent))?;
    }
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file: {:?}", log_path))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::sync::Mutex::new(log_file))
        .with_ansi(false) // No color codes in log file
        .init();

    if let Some(data_dir) = &cli.data_dir {
        tracing::info!("Using custom data directory: {:?}", data_dir);
    } else if let Ok(env_dir) = std::env::var(config::DATA_DIR_ENV) {
        tracing::info!("Using data directory from {}: {}", config::DATA_DIR_ENV, env_dir);
    }

    if let Some(command) = cli.command {
        match command {
            Commands::Priorities => print_priorities(),
            Commands::CheckConfig { file } => check_config(file.or(cli.config))?,
        }
        return Ok(());
    }

    let mut config = match &cli.config {
        Some(path) => config::Config::load_from_path(path)?,
        None => config::Config::load()?,
    };

    // Command-line overrides apply to this run only; `save settings` persists them
    if let Some(style) = cli.style {
        config.toolbar.style = style;
    }
    if let Some(priority) = cli.priority {
        config.system.priority = priority;
    }

    run_tui(config)
}

fn print_priorities() {
    for level in PriorityLevel::ALL {
        let marker = if level == PriorityLevel::default() {
            " (default)"
        } else {
            ""
        };
        println!(
            "{:<12} {}{}",
            level.command_token(),
            level.display_name(),
            marker
        );
    }
}

fn check_config(file: Option<PathBuf>) -> Result<()> {
    let path = match file {
        Some(path) => path,
        None => config::Config::config_path()?,
    };
    println!("Validating config file: {:?}", path);

    let contents = match std::fs::read_to_string(&path) {
        Ok(contents) => contents,
        Err(e) => {
            eprintln!("✗ Failed to read config: {}", e);
            std::process::exit(1);
        }
    };
    let config: config::Config = match toml::from_str(&contents) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("✗ Failed to parse config: {}", e);
            std::process::exit(1);
        }
    };

    println!("✓ Config parsed successfully");
    println!("  {} keybinds defined", config.keybinds.len());

    let result = keybind_validator::validate_keybinds(&config.keybinds);
    for issue in &result.issues {
        match issue.severity() {
            ValidationSeverity::Error => eprintln!("✗ Error: {}", issue.message()),
            ValidationSeverity::Warning => println!("⚠ Warning: {}", issue.message()),
        }
    }

    let errors = result.errors().len();
    let warnings = result.warnings().len();
    if errors == 0 && warnings == 0 {
        println!("✓ Config is valid with no issues");
    } else {
        if errors > 0 {
            eprintln!("\n✗ Found {} error(s)", errors);
        }
        if warnings > 0 {
            println!("⚠ Found {} warning(s)", warnings);
        }
    }

    if errors > 0 {
        std::process::exit(1);
    }
    Ok(())
}

/// Run the TUI until the user quits
fn run_tui(config: config::Config) -> Result<()> {
    use frontend::TuiFrontend;

    tracing::info!(
        "Starting with style={} clockwise={} priority={}",
        config.toolbar.style,
        config.toolbar.clockwise,
        config.system.priority.command_token()
    );

    let mut frontend = TuiFrontend::new()?;
    let mut app = app::App::new(config);
    app.run(&mut frontend)
}
