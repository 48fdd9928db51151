//! Node configuration.
//!
//! Everything the components need arrives through this one object,
//! constructed at startup from the TOML file plus environment overrides.
//! Nothing reads ambient configuration at call sites.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use rehoboam_sync::GatewayConfig;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub node: NodeConfig,

    /// Sync gateway settings; absent means local-only operation.
    #[serde(default)]
    pub gateway: Option<GatewayConfig>,

    #[serde(default)]
    pub narrative: NarrativeConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Data directory holding the local database.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(".rehoboam")
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NarrativeConfig {
    /// Chat-completions base URL; absent means offline summaries only.
    #[serde(default)]
    pub base_url: Option<String>,

    #[serde(default = "default_model")]
    pub model: String,
}

impl Default for NarrativeConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            model: default_model(),
        }
    }
}

fn default_model() -> String {
    "gpt-4o".to_string()
}

impl Config {
    /// Load the config file, or fall back to defaults when it does not
    /// exist. Gateway settings missing from the file are picked up from
    /// the environment so a config file is never mandatory for sync.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let mut config: Config = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            toml::from_str(&content)?
        } else {
            Config::default()
        };

        if config.gateway.is_none() {
            config.gateway = GatewayConfig::from_env();
        }

        Ok(config)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            node: NodeConfig::default(),
            gateway: None,
            narrative: NarrativeConfig::default(),
        }
    }
}
