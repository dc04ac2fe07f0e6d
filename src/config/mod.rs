pub mod init;
mod schema;

pub use init::write_default_config;
pub use schema::Config;

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::scoring::validate_scoring;

/// Get the config directory path (~/.config/buffett-score/)
pub fn get_config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("buffett-score")
}

/// Get the default config file path (~/.config/buffett-score/config.yaml)
pub fn get_config_path() -> PathBuf {
    get_config_dir().join("config.yaml")
}

/// Load configuration from a YAML file
///
/// # Arguments
///
/// * `path` - Optional path to config file. If None, uses the default path,
///   and a missing default file means built-in defaults.
///
/// # Errors
///
/// Returns an error if:
/// - An explicitly given config file does not exist
/// - The config file cannot be read
/// - The YAML cannot be parsed
pub fn load_config(path: Option<PathBuf>) -> Result<Config> {
    match path {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("Config file not found at {}", path.display());
            }
            read_config(&path)
        }
        None => {
            let path = get_config_path();
            if path.exists() {
                read_config(&path)
            } else {
                Ok(Config::default())
            }
        }
    }
}

fn read_config(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file at {}", path.display()))?;

    // An empty file is a valid "all defaults" config
    if content.trim().is_empty() {
        return Ok(Config::default());
    }

    serde_saphyr::from_str(&content)
        .with_context(|| format!("Failed to parse config: invalid YAML in {}", path.display()))
}

/// Validate the whole config at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_config(config: &Config) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if let Err(e) = config.request_interval() {
        errors.push(format!("request_interval: {:#}", e));
    }
    if let Err(e) = config.request_timeout() {
        errors.push(format!("request_timeout: {:#}", e));
    }
    for (key, url) in [
        ("yahoo_base_url", &config.yahoo_base_url),
        ("alpha_vantage_base_url", &config.alpha_vantage_base_url),
    ] {
        if let Err(e) = reqwest::Url::parse(url) {
            errors.push(format!("{}: invalid URL '{}' - {}", key, url, e));
        }
    }
    if let Err(scoring_errors) = validate_scoring(&config.scoring) {
        errors.extend(scoring_errors);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
