//! Application configuration handling.

use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

/// Directory name under the user config dir.
pub const APP_DIR: &str = "raildoor";
const CONFIG_FILE: &str = "config.toml";
const DATASET_FILE: &str = "doors.json";

/// User-tunable settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to the station/door dataset document.
    pub dataset_path: PathBuf,
}

impl AppConfig {
    /// Load settings from the config file, environment (`RAILDOOR_*`), and
    /// defaults, in increasing priority.
    pub fn load() -> Result<Self> {
        let mut builder = Config::builder().set_default(
            "dataset_path",
            default_dataset_path().to_string_lossy().to_string(),
        )?;

        let file = config_file_path();
        if file.is_file() {
            builder = builder.add_source(File::from(file));
        }

        builder
            .add_source(Environment::with_prefix("RAILDOOR"))
            .build()
            .context("failed to assemble configuration")?
            .try_deserialize()
            .context("failed to deserialize configuration")
    }
}

/// Per-user configuration directory.
pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

fn config_file_path() -> PathBuf {
    config_dir().join(CONFIG_FILE)
}

/// Default location of the dataset document.
pub fn default_dataset_path() -> PathBuf {
    config_dir().join(DATASET_FILE)
}

/// Create the config directory and write a commented default config file on
/// first run. Existing files are left untouched.
pub fn ensure_default_config() -> Result<()> {
    let dir = config_dir();
    fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create config directory {}", dir.display()))?;

    let path = dir.join(CONFIG_FILE);
    if path.exists() {
        return Ok(());
    }

    let contents = format!(
        "# raildoor configuration\n\
         #\n\
         # Path to the station/door dataset document.\n\
         # dataset_path = \"{}\"\n",
        default_dataset_path().display()
    );
    fs::write(&path, contents)
        .with_context(|| format!("failed to write default config {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_the_app_directory() {
        assert!(default_dataset_path().ends_with("raildoor/doors.json"));
        assert!(config_dir().ends_with(APP_DIR));
    }
}
