use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use super::{get_config_path, Config};

const HEADER: &str = "\
# buffett-score configuration
#
# ticker_suffix: appended to bare symbols of up to 5 characters (null disables)
# request_interval: minimum spacing between Alpha Vantage requests
# scoring: pass condition per metric, one of <N, <=N, >N, >=N
";

/// Write a config file holding the built-in defaults.
///
/// Uses the default path when `path` is None. Refuses to replace an existing
/// file unless `force` is set. Returns the path written.
pub fn write_default_config(path: Option<PathBuf>, force: bool) -> Result<PathBuf> {
    let config_path = path.unwrap_or_else(get_config_path);

    if config_path.exists() && !force {
        anyhow::bail!(
            "Config already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    let yaml = render_config(&Config::default())?;
    write_file(&config_path, &yaml)?;
    Ok(config_path)
}

fn render_config(config: &Config) -> Result<String> {
    let yaml = serde_saphyr::to_string(config)
        .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;
    Ok(format!("{}\n{}", HEADER, yaml))
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    std::fs::write(path, contents)
        .with_context(|| format!("Failed to write config to {}", path.display()))
}
