use clap::Parser;
use eyre::{Context, Result};
use log::info;
use std::fs;
use std::path::PathBuf;

mod agent;
mod cli;
mod commands;
mod config;
mod inference;
mod knowledge;
mod pipeline;
#[cfg(test)]
mod test_http;

use cli::{Cli, Commands, OutputFormat};
use commands::create::CreateOptions;
use config::{Config, LogLevel};

fn setup_logging(log_level: &LogLevel) -> Result<()> {
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("persona")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("persona.log");

    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    // RUST_LOG env var takes precedence, otherwise use config log_level
    let mut builder = env_logger::Builder::new();

    if std::env::var("RUST_LOG").is_ok() {
        builder.parse_default_env();
    } else {
        builder.parse_filters(log_level.as_filter());
    }

    builder.target(env_logger::Target::Pipe(target)).init();

    info!("Logging initialized, writing to: {}", log_file.display());
    info!(
        "Log level: {} (from {})",
        log_level.as_filter(),
        if std::env::var("RUST_LOG").is_ok() { "RUST_LOG env" } else { "config" }
    );
    Ok(())
}

fn run(cli: Cli, config: Config) -> Result<()> {
    match cli.command {
        Commands::Create {
            name,
            seed,
            voice,
            color,
            keep_current,
            format,
        } => {
            let options = CreateOptions {
                name: name.join(" "),
                seed,
                voice,
                color,
                keep_current,
                quiet: cli.quiet,
            };
            commands::create::run(options, OutputFormat::resolve(format), &config)
        }
        Commands::Lookup { term, format } => commands::lookup::run(&term.join(" "), OutputFormat::resolve(format), &config),
        Commands::Infer { text, file } => commands::infer::run(text, file, &config),
        Commands::Agent { action } => commands::agent::run(action, &config),
        Commands::Config { action } => commands::config::run(action, &config),
        Commands::Completions { shell } => commands::completions::run(shell),
    }
}

fn main() -> Result<()> {
    // Parse CLI arguments first
    let cli = Cli::parse();

    // Load configuration (before logging, so log messages in Config::load are silent)
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    let log_level = if cli.verbose { LogLevel::Debug } else { config.log_level };
    setup_logging(&log_level).context("Failed to setup logging")?;

    info!("Starting persona with config from: {:?}", cli.config);

    run(cli, config).context("Command failed")?;

    Ok(())
}
