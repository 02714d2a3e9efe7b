use colored::*;
use eyre::{Context, Result};
use std::fs;

use crate::cli::{ConfigAction, OutputFormat};
use crate::config::Config;

pub fn run(action: ConfigAction, config: &Config) -> Result<()> {
    match action {
        ConfigAction::Show { format } => show(OutputFormat::resolve(format), config),
        ConfigAction::Get { key } => get(&key, config),
        ConfigAction::Set { key, value } => set(&key, &value, config),
    }
}

fn show(format: OutputFormat, config: &Config) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(config)?);
        }
        OutputFormat::Yaml => {
            println!("{}", serde_yaml::to_string(config)?);
        }
        OutputFormat::Text => {
            println!("{}", "Persona Configuration".bold());
            println!();

            println!("log_level: {}", config.log_level.as_filter());
            println!();

            println!("{}:", "knowledge".cyan());
            println!("  base_url: {}", config.knowledge.base_url);
            println!("  min_extract_chars: {}", config.knowledge.min_extract_chars);
            println!("  thumbnail_size: {}", config.knowledge.thumbnail_size);
            println!("  timeout_secs: {}", config.knowledge.timeout_secs);
            println!();

            println!("{}:", "inference".cyan());
            println!("  base_url: {}", config.inference.base_url);
            println!("  model: {}", config.inference.model);
            println!("  api_key_env: {}", config.inference.api_key_env);
            println!("  excerpt_chars: {}", config.inference.excerpt_chars);
            println!("  timeout_secs: {}", config.inference.timeout_secs);
            println!();

            println!("{}:", "user".cyan());
            println!("  name: {}", config.user.name.as_deref().unwrap_or("(unset)"));
            println!("  info: {}", config.user.info.as_deref().unwrap_or("(unset)"));
        }
    }

    Ok(())
}

fn value_of(key: &str, config: &Config) -> Option<String> {
    let value = match key {
        "log_level" | "log-level" => config.log_level.as_filter().to_string(),
        "knowledge.base_url" => config.knowledge.base_url.clone(),
        "knowledge.min_extract_chars" => config.knowledge.min_extract_chars.to_string(),
        "knowledge.thumbnail_size" => config.knowledge.thumbnail_size.to_string(),
        "knowledge.timeout_secs" => config.knowledge.timeout_secs.to_string(),
        "inference.base_url" => config.inference.base_url.clone(),
        "inference.model" => config.inference.model.clone(),
        "inference.api_key_env" => config.inference.api_key_env.clone(),
        "inference.excerpt_chars" => config.inference.excerpt_chars.to_string(),
        "inference.timeout_secs" => config.inference.timeout_secs.to_string(),
        "user.name" => config.user.name.clone().unwrap_or_default(),
        "user.info" => config.user.info.clone().unwrap_or_default(),
        _ => return None,
    };
    Some(value)
}

fn get(key: &str, config: &Config) -> Result<()> {
    match value_of(key, config) {
        Some(v) => println!("{}", v),
        None => {
            eprintln!("{} Unknown config key: {}", "✗".red(), key);
            std::process::exit(1);
        }
    }

    Ok(())
}

/// Return a copy of `config` with `key` set to `value`
fn apply(config: &Config, key: &str, value: &str) -> Result<Config> {
    let mut new_config = config.clone();
    let optional = |v: &str| if v.trim().is_empty() { None } else { Some(v.to_string()) };

    match key {
        "log_level" | "log-level" => new_config.log_level = value.parse()?,
        "knowledge.base_url" => new_config.knowledge.base_url = value.to_string(),
        "knowledge.min_extract_chars" => {
            new_config.knowledge.min_extract_chars = value.parse().context("Invalid number")?;
        }
        "knowledge.thumbnail_size" => {
            new_config.knowledge.thumbnail_size = value.parse().context("Invalid number")?;
        }
        "knowledge.timeout_secs" => {
            new_config.knowledge.timeout_secs = value.parse().context("Invalid number")?;
        }
        "inference.base_url" => new_config.inference.base_url = value.to_string(),
        "inference.model" => new_config.inference.model = value.to_string(),
        "inference.api_key_env" => new_config.inference.api_key_env = value.to_string(),
        "inference.excerpt_chars" => {
            new_config.inference.excerpt_chars = value.parse().context("Invalid number")?;
        }
        "inference.timeout_secs" => {
            new_config.inference.timeout_secs = value.parse().context("Invalid number")?;
        }
        "user.name" => new_config.user.name = optional(value),
        "user.info" => new_config.user.info = optional(value),
        _ => {
            eyre::bail!("Unknown config key: {}", key);
        }
    }

    Ok(new_config)
}

fn set(key: &str, value: &str, config: &Config) -> Result<()> {
    println!("{} Setting {} = {}", "→".blue(), key.cyan(), value.green());

    let new_config = apply(config, key, value)?;

    let config_path = Config::persona_dir().join("persona.yaml");
    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let yaml_str = serde_yaml::to_string(&new_config).context("Failed to serialize config")?;
    fs::write(&config_path, yaml_str).context("Failed to write config file")?;

    println!("  {} Saved to {}", "✓".green(), config_path.display());

    Ok(())
}
