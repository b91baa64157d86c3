// Configuration loader
// Layers built-in defaults, one optional TOML file and environment overrides

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use super::constants::{BASE_URL_ENV, REPO_CONFIG_FILE};
use super::settings::Config;

/// Load configuration for the repository at `repo_root`.
///
/// File lookup order (first hit wins):
/// 1. `explicit` (`--config <path>`), which must exist
/// 2. `<repo_root>/.opencode/config.toml`
/// 3. `~/.patchbay/config.toml`
///
/// `OPENROUTER_BASE_URL` overrides whatever the file says.
pub fn load_config(repo_root: &Path, explicit: Option<&Path>) -> Result<Config> {
    load_config_with_env(repo_root, explicit, |key| std::env::var(key).ok())
}

/// Same as [`load_config`] with an injectable environment lookup.
pub fn load_config_with_env<F>(repo_root: &Path, explicit: Option<&Path>, env: F) -> Result<Config>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match config_file_path(repo_root, explicit)? {
        Some(path) => {
            tracing::debug!("Loading configuration from {}", path.display());
            load_from_file(&path)?
        }
        None => {
            tracing::debug!("No configuration file found, using defaults");
            Config::default()
        }
    };

    if let Some(base_url) = env(BASE_URL_ENV).filter(|v| !v.trim().is_empty()) {
        tracing::debug!("Inference base URL overridden by {}", BASE_URL_ENV);
        config.base_url = base_url;
    }

    config
        .validate()
        .context("Configuration validation failed")?;

    Ok(config)
}

fn config_file_path(repo_root: &Path, explicit: Option<&Path>) -> Result<Option<PathBuf>> {
    if let Some(path) = explicit {
        if !path.exists() {
            anyhow::bail!("Configuration file not found: {}", path.display());
        }
        return Ok(Some(path.to_path_buf()));
    }

    let repo_config = repo_root.join(REPO_CONFIG_FILE);
    if repo_config.exists() {
        return Ok(Some(repo_config));
    }

    let user_config = dirs::home_dir().map(|home| home.join(".patchbay/config.toml"));
    Ok(user_config.filter(|p| p.exists()))
}

fn load_from_file(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;

    toml::from_str(&contents)
        .with_context(|| format!("Failed to parse configuration file: {}", path.display()))
}
