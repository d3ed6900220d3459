use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_LOCALITY: &str = "Ragusa";
pub const DEFAULT_ZOOM: u8 = 13;
pub const DEFAULT_BIND: &str = "127.0.0.1:8501";

fn default_zoom() -> u8 {
    DEFAULT_ZOOM
}
fn default_verbose() -> bool {
    false
}

#[derive(Debug, Deserialize, Default)]
pub struct FileConfig {
    #[serde(default)]
    pub locality: Option<String>,
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
    #[serde(default)]
    pub bind: Option<String>,
    #[serde(default = "default_zoom")]
    pub zoom: u8,
    #[serde(default = "default_verbose")]
    pub verbose: bool,
    #[serde(default)]
    pub overpass: Option<OverpassConfig>,
}

fn default_overpass_url() -> String {
    "https://overpass-api.de/api/interpreter".to_string()
}

/// Server side limit written into the query itself
fn default_query_timeout_secs() -> u64 {
    25
}

fn default_client_timeout_secs() -> u64 {
    200
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct OverpassConfig {
    #[serde(default = "default_overpass_url")]
    pub url: String,
    #[serde(default = "default_query_timeout_secs")]
    pub query_timeout_secs: u64,
    #[serde(default = "default_client_timeout_secs")]
    pub client_timeout_secs: u64,
}

impl Default for OverpassConfig {
    fn default() -> Self {
        Self {
            url: default_overpass_url(),
            query_timeout_secs: default_query_timeout_secs(),
            client_timeout_secs: default_client_timeout_secs(),
        }
    }
}

impl FileConfig {
    /// Load the first config file found in the default locations
    pub fn load() -> Option<Self> {
        for path in get_config_paths() {
            if path.exists()
                && let Ok(contents) = std::fs::read_to_string(&path)
            {
                match toml::from_str(&contents) {
                    Ok(config) => return Some(config),
                    Err(e) => {
                        // logging is not set up yet, the config decides verbosity
                        eprintln!("Warning: Failed to parse config file {:?}: {}", path, e);
                    }
                }
            }
        }
        None
    }

    /// Load an explicitly requested config file
    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            bail!("Config file not found: {:?}", path);
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&contents).context("Failed to parse config file")
    }
}

fn get_config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    paths.push(PathBuf::from("poimap.toml"));
    paths.push(PathBuf::from(".poimap.toml"));

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("poimap").join("config.toml"));
        paths.push(config_dir.join("poimap.toml"));
    }

    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".poimap.toml"));
    }

    paths
}
