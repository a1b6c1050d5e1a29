use super::ui;
use crate::core::config::AppConfig;
use anyhow::{Context, Result};
use std::path::Path;

const EXAMPLE_CONFIG: &str = include_str!("../../docs/example_config.yaml");

/// Writes the example configuration to the default location.
pub fn setup() -> Result<()> {
    let path = AppConfig::default_config_path()?;
    setup_at_path(path)
}

/// Writes the example configuration to `path`; an existing file is left untouched.
pub fn setup_at_path<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();

    if path.exists() {
        anyhow::bail!("Configuration file already exists at {}", path.display());
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    std::fs::write(path, EXAMPLE_CONFIG)
        .with_context(|| format!("Failed to write config file to {}", path.display()))?;

    let config = AppConfig::load_from_path(path)?;
    tracing::info!(
        base_url = %config.api.base_url,
        "Created default configuration at {}",
        path.display()
    );
    println!(
        "{} {}",
        ui::style_text("Yapılandırma oluşturuldu:", ui::StyleType::Success),
        path.display()
    );
    println!(
        "{}",
        ui::style_text(
            &format!("Fon servisi: {}", config.api.base_url),
            ui::StyleType::Subtle
        )
    );
    Ok(())
}
