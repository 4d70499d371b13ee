use anyhow::bail;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::models::ShowRef;
use crate::render::style::ChartStyle;

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    tmdb_api_key: Option<String>,
    #[serde(default)]
    style: ChartStyle,
}

#[derive(Debug, Deserialize)]
struct TrackedSeriesFile {
    #[serde(default)]
    series: Vec<ShowRef>,
}

#[derive(Debug, Default)]
pub struct Settings {
    api_key: Option<String>,
    pub style: ChartStyle,
}

impl Settings {
    /// Reads the config file if there is one; a missing file means defaults.
    pub fn load() -> Result<Self> {
        Self::load_from(&get_config_path())
    }

    fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let config_content = fs::read_to_string(path)?;
        let config: ConfigFile = toml::from_str(&config_content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        Ok(Self {
            api_key: config.tmdb_api_key,
            style: config.style,
        })
    }

    pub fn tmdb_api_key(&self) -> Result<String> {
        // Environment wins over the config file
        if let Ok(key) = env::var("TMDB_API_KEY") {
            return Ok(key);
        }
        if let Some(key) = &self.api_key {
            return Ok(key.clone());
        }

        bail!(
            "TMDB API key not found. Set TMDB_API_KEY environment variable or add tmdb_api_key = \"your-key\" to {}",
            get_config_path().display()
        )
    }
}

/// Reads the `[[series]]` list of shows to summarize.
pub fn load_tracked_series(path: &Path) -> Result<Vec<ShowRef>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Could not read tracked series file {}", path.display()))?;
    let file: TrackedSeriesFile = toml::from_str(&content)
        .with_context(|| format!("Invalid tracked series file {}", path.display()))?;
    Ok(file.series)
}

fn get_config_dir_path() -> PathBuf {
    xdir::config()
        .map(|path| path.join("series-ratings"))
        // If the standard path could not be found (e.g.`$HOME` is not set),
        // default to the current directory.
        .unwrap_or_default()
}

fn get_config_path() -> PathBuf {
    get_config_dir_path().join("config.toml")
}
