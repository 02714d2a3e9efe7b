use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::agent::prompt::UserProfile;

/// Main persona configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub log_level: LogLevel,
    pub knowledge: KnowledgeConfig,
    pub inference: InferenceConfig,
    pub user: UserProfile,
}

/// Log verbosity when RUST_LOG is not set
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
    Off,
}

impl LogLevel {
    pub fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
            LogLevel::Off => "off",
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = eyre::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            "off" => Ok(LogLevel::Off),
            _ => eyre::bail!("Unknown log level: {}", s),
        }
    }
}

/// Encyclopedia lookup settings
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct KnowledgeConfig {
    /// MediaWiki `api.php` endpoint
    pub base_url: String,
    /// Extracts shorter than this (in characters) are rejected
    pub min_extract_chars: usize,
    /// Requested thumbnail width in pixels
    pub thumbnail_size: u32,
    pub timeout_secs: u64,
}

/// Generative text service settings
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct InferenceConfig {
    pub base_url: String,
    pub model: String,
    /// Environment variable holding the API key
    pub api_key_env: String,
    /// Excerpt sent for inference is cut to this many characters
    pub excerpt_chars: usize,
    pub timeout_secs: u64,
}

impl Default for KnowledgeConfig {
    fn default() -> Self {
        Self {
            base_url: "https://pt.wikipedia.org/w/api.php".to_string(),
            min_extract_chars: 300,
            thumbnail_size: 500,
            timeout_secs: 10,
        }
    }
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: "gemini-2.5-flash".to_string(),
            api_key_env: "GOOGLE_API_KEY".to_string(),
            excerpt_chars: 1500,
            timeout_secs: 10,
        }
    }
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        if let Ok(env_path) = std::env::var("PERSONA_CONFIG") {
            let path = PathBuf::from(env_path);
            if path.exists() {
                match Self::load_from_file(&path) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        log::warn!("Failed to load config from PERSONA_CONFIG: {}", e);
                    }
                }
            }
        }

        if let Ok(persona_dir) = std::env::var("PERSONA_DIR") {
            let path = PathBuf::from(persona_dir).join("persona.yaml");
            if path.exists() {
                match Self::load_from_file(&path) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        log::warn!("Failed to load config from PERSONA_DIR: {}", e);
                    }
                }
            }
        }

        if let Some(config_dir) = dirs::config_dir() {
            let path = config_dir.join("persona").join("persona.yaml");
            if path.exists() {
                match Self::load_from_file(&path) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        log::warn!("Failed to load config from {}: {}", path.display(), e);
                    }
                }
            }
        }

        // Try ./persona.yaml (for development)
        let local_config = PathBuf::from("persona.yaml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    log::warn!("Failed to load local config: {}", e);
                }
            }
        }

        log::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        log::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }

    /// Directory holding persona.yaml and .env
    pub fn persona_dir() -> PathBuf {
        std::env::var("PERSONA_DIR")
            .map(|dir| Self::expand_path(Path::new(&dir)))
            .unwrap_or_else(|_| dirs::config_dir().unwrap_or_else(|| PathBuf::from(".")).join("persona"))
    }

    /// Expand a path that may contain ~ or env vars
    pub fn expand_path(path: &Path) -> PathBuf {
        let path_str = path.to_string_lossy();
        let expanded = shellexpand::full(&path_str).unwrap_or_else(|_| path_str.clone());
        PathBuf::from(expanded.as_ref())
    }

    /// Resolve the inference API key: configured env var, then `API_KEY`,
    /// then `<persona_dir>/.env`
    pub fn inference_api_key(&self) -> Result<String> {
        self.inference_api_key_in(&Self::persona_dir())
    }

    fn inference_api_key_in(&self, persona_dir: &Path) -> Result<String> {
        let env_var = self.inference.api_key_env.as_str();
        let names = [env_var, "API_KEY"];

        for name in names {
            if let Ok(key) = std::env::var(name)
                && !key.trim().is_empty()
            {
                return Ok(key.trim().to_string());
            }
        }

        let env_file = persona_dir.join(".env");
        if env_file.exists() {
            let content = fs::read_to_string(&env_file).context("Failed to read .env file")?;
            if let Some(value) = names.iter().find_map(|name| find_env_value(&content, name)) {
                return Ok(value);
            }
        }

        eyre::bail!(
            "Missing API key: {} not found in environment or {}",
            env_var,
            env_file.display()
        )
    }
}

/// Value of `key` in `.env`-style content; comments and quotes tolerated
fn find_env_value(content: &str, key: &str) -> Option<String> {
    for line in content.lines() {
        let line = line.trim();
        if line.starts_with('#') || line.is_empty() {
            continue;
        }
        let line = line.strip_prefix("export ").unwrap_or(line);
        if let Some((k, value)) = line.split_once('=')
            && k.trim() == key
        {
            let value = value.trim().trim_matches('"').trim_matches('\'');
            if !value.is_empty() {
                return Some(value.to_string());
            }
        }
    }
    None
}
