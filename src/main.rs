use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::{LevelFilter, info, warn};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

mod cli;

use cli::Cli;
use ur5e_pilot::Dispatcher;
use ur5e_pilot::config::{PilotConfig, load_config};
use ur5e_pilot::runner::SystemRunner;
use ur5e_pilot::tools::PathLocator;

fn setup_logging() -> Result<PathBuf> {
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ur5e-pilot")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("ur5e-pilot.log");

    // Setup env_logger with file output so the menu stays clean
    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    // Without RUST_LOG everything passes the filter; apply_log_level narrows it
    let env = env_logger::Env::default().default_filter_or("trace");
    env_logger::Builder::from_env(env)
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(log_file)
}

/// Narrow logging to the config's log-level unless RUST_LOG is set.
fn apply_log_level(config: &PilotConfig) {
    if std::env::var_os("RUST_LOG").is_some() {
        return;
    }
    let level = match config.log_level.as_deref() {
        None => LevelFilter::Info,
        Some(name) => LevelFilter::from_str(name).unwrap_or_else(|_| {
            warn!("Unknown log-level '{}', using info", name);
            LevelFilter::Info
        }),
    };
    log::set_max_level(level);
}

fn run_application(cli: &Cli, config: PilotConfig, log_file: &Path) -> Result<i32> {
    info!("Starting application");

    if cli.is_verbose() {
        println!("{} {}", "Logging to".yellow(), log_file.display());
    }

    let mut dispatcher = Dispatcher::new(config, SystemRunner::new(), PathLocator);
    let stdin = io::stdin();
    let code = dispatcher
        .run(&mut stdin.lock(), &mut io::stdout(), &mut io::stderr())
        .context("Menu I/O failed")?;
    Ok(code)
}

fn main() -> Result<()> {
    // Setup logging first
    let log_file = setup_logging().context("Failed to setup logging")?;

    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration
    let config = load_config(cli.config.as_ref()).context("Failed to load configuration")?;
    apply_log_level(&config);

    info!("Starting with config from: {:?}", cli.config);

    let code = run_application(&cli, config, &log_file).context("Application failed")?;
    std::process::exit(code);
}
