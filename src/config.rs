//! Configuration handling for the form runner

use anyhow::{Context, Result};
use directories::ProjectDirs;
use formbind::forms::FormDefinition;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// User configuration for the TUI
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TuiConfig {
    /// JSON form definition to open instead of the built-in sample
    pub definition_path: Option<PathBuf>,
    /// Tracing filter used when `RUST_LOG` is unset
    pub log_filter: Option<String>,
}

impl TuiConfig {
    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("io", "formbind", "formbind")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Load configuration from file
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config = serde_json::from_str(&content)
            .with_context(|| format!("invalid config file {}", path.display()))?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        if let Some(path) = Self::config_path() {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            let content = serde_json::to_string_pretty(self)?;
            fs::write(&path, content)?;
        }
        Ok(())
    }

    /// The configured form definition, or the sample when none is set
    pub fn load_definition(&self) -> Result<FormDefinition> {
        let Some(path) = &self.definition_path else {
            return Ok(FormDefinition::sample());
        };
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read form definition {}", path.display()))?;
        let definition = FormDefinition::from_json(&content)
            .with_context(|| format!("invalid form definition {}", path.display()))?;
        tracing::info!(path = %path.display(), form = %definition.name, "loaded form definition");
        Ok(definition)
    }
}
