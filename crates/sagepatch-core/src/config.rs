use crate::error::{PatchError, Result};
use crate::types::MatchMode;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const DEFAULT_CONFIG_FILE: &str = "sagepatch.toml";
pub const DEFAULT_EXCERPT_CHARS: usize = 500;

/// Compute capabilities for Ampere, Ada and Hopper (RTX 30/40 series, A100, H100).
pub const DEFAULT_CAPABILITIES: [&str; 4] = ["8.0", "8.6", "8.9", "9.0"];

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct PatchConfig {
    #[serde(alias = "compute_capabilities")]
    pub capabilities: Vec<String>,
    pub match_mode: MatchMode,
    pub excerpt_chars: usize,
}

impl Default for PatchConfig {
    fn default() -> Self {
        Self {
            capabilities: DEFAULT_CAPABILITIES.iter().map(|c| c.to_string()).collect(),
            match_mode: MatchMode::Tolerant,
            excerpt_chars: DEFAULT_EXCERPT_CHARS,
        }
    }
}

impl PatchConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| PatchError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_toml(&content).map_err(|e| match e {
            PatchError::InvalidConfig(message) => PatchError::Config {
                path: path.to_path_buf(),
                message,
            },
            other => other,
        })
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| PatchError::InvalidConfig(e.to_string()))
    }
}
