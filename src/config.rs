use std::path::PathBuf;
use serde::{Deserialize, Serialize};
use anyhow::{Result, Context};
use tracing::warn;

use crate::core::{Lexicon, ScoringWeights};
use crate::symbol::RenderSettings;

pub const PORT_ENV: &str = "DREAM_INTERPRETER_PORT";
pub const LOG_ENV: &str = "DREAM_INTERPRETER_LOG";

/// Texts shorter than this (in characters) are rejected before scoring
pub const MIN_DREAM_LENGTH: usize = 10;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(skip)]
    pub data_dir: PathBuf,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub render: RenderSettings,
    /// Replaces the built-in keyword sets when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lexicon: Option<Lexicon>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            log_level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub min_dream_length: usize,
    #[serde(flatten)]
    pub weights: ScoringWeights,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            min_dream_length: MIN_DREAM_LENGTH,
            weights: ScoringWeights::default(),
        }
    }
}

impl Config {
    pub fn new(data_dir: Option<PathBuf>) -> Result<Self> {
        let data_dir = data_dir.unwrap_or_else(default_data_dir);

        std::fs::create_dir_all(&data_dir)
            .context("Failed to create data directory")?;

        let config_path = data_dir.join("config.json");

        let mut config = if config_path.exists() {
            let config_str = std::fs::read_to_string(&config_path)
                .context("Failed to read config.json")?;

            if config_str.trim().is_empty() {
                warn!(path = %config_path.display(), "config file is empty, using defaults");
                Self::default_config(data_dir.clone())
            } else {
                match serde_json::from_str::<Config>(&config_str) {
                    Ok(mut config) => {
                        config.data_dir = data_dir.clone();
                        config
                    }
                    Err(e) => {
                        warn!(path = %config_path.display(), error = %e, "failed to parse config.json, using defaults");
                        Self::default_config(data_dir.clone())
                    }
                }
            }
        } else {
            let config = Self::default_config(data_dir.clone());
            config.save()?;
            config
        };

        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let json_str = serde_json::to_string_pretty(self)
            .context("Failed to serialize config")?;
        std::fs::write(self.config_file(), json_str)
            .context("Failed to write config.json")?;
        Ok(())
    }

    pub fn default_config(data_dir: PathBuf) -> Self {
        Config {
            data_dir,
            server: ServerConfig::default(),
            scoring: ScoringConfig::default(),
            render: RenderSettings::default(),
            lexicon: None,
        }
    }

    /// Environment overrides applied on top of the file
    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(port) = lookup(PORT_ENV) {
            match port.parse::<u16>() {
                Ok(port) => self.server.port = port,
                Err(_) => warn!(value = %port, "ignoring invalid {}", PORT_ENV),
            }
        }
        if let Some(level) = lookup(LOG_ENV).filter(|l| !l.trim().is_empty()) {
            self.server.log_level = level;
        }
    }

    pub fn config_file(&self) -> PathBuf {
        self.data_dir.join("config.json")
    }

    /// The configured lexicon, or the built-in one
    pub fn lexicon(&self) -> Lexicon {
        self.lexicon
            .clone()
            .map(Lexicon::normalized)
            .unwrap_or_default()
    }
}

fn default_data_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("dream-interpreter")
}
