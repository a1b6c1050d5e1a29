use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ApiConfig {
    pub base_url: String,
}

/// How the all-funds table derives its category columns.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum HeaderStrategy {
    /// Categories of the first fund only.
    #[default]
    FirstRow,
    /// Categories of all funds in first-seen order.
    Union,
}

/// What happens to non-numeric values typed into an edit session on save.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EditValidation {
    /// Invalid values are sent as null.
    #[default]
    Permissive,
    /// Saving is refused while any value is invalid.
    Strict,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct TableConfig {
    #[serde(default)]
    pub headers: HeaderStrategy,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct EditConfig {
    #[serde(default)]
    pub validation: EditValidation,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct ExportConfig {
    pub directory: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    pub api: ApiConfig,
    #[serde(default)]
    pub table: TableConfig,
    #[serde(default)]
    pub edit: EditConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("dev", "fontakip", "fontakip")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    /// Directory for exports: the configured one, or the working directory.
    pub fn export_directory(&self) -> PathBuf {
        self.export
            .directory
            .as_ref()
            .map_or_else(|| PathBuf::from("."), PathBuf::from)
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }
}
