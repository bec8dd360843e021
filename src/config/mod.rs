pub mod types;

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use std::path::Path;
pub use types::*;

/// Prefix for structured environment overrides, e.g. `NEEDLE_MCP__LOGGING__LEVEL`
pub const ENV_PREFIX: &str = "NEEDLE_MCP";

/// Load configuration from an optional TOML file layered under the environment.
///
/// A missing file is not an error: the server is normally launched by a
/// desktop host that only injects environment variables.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    let mut builder = Config::builder();

    if let Some(path) = path {
        builder = builder.add_source(File::from(path).required(false));
    }

    let config = builder
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__"),
        )
        .build()
        .context("Failed to build configuration")?;

    let app_config: AppConfig = config
        .try_deserialize()
        .context("Failed to deserialize configuration")?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// Validate the loaded configuration
pub fn validate_config(config: &AppConfig) -> Result<()> {
    let base_url = reqwest::Url::parse(&config.needle.base_url)
        .with_context(|| format!("Invalid Needle base URL '{}'", config.needle.base_url))?;
    if !matches!(base_url.scheme(), "http" | "https") {
        anyhow::bail!(
            "Needle base URL '{}' must use http or https",
            config.needle.base_url
        );
    }

    if config.needle.timeout_secs == 0 {
        anyhow::bail!("Needle request timeout must be greater than zero");
    }

    if config.needle.rate_limit_calls == 0 || config.needle.rate_limit_period_ms == 0 {
        anyhow::bail!("Needle rate limit calls and period must be greater than zero");
    }

    // Validate log level
    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.logging.level.as_str()) {
        anyhow::bail!(
            "Invalid log level '{}'. Valid levels: {}",
            config.logging.level,
            valid_levels.join(", ")
        );
    }

    // Validate log format
    let valid_formats = ["pretty", "json"];
    if !valid_formats.contains(&config.logging.format.as_str()) {
        anyhow::bail!(
            "Invalid log format '{}'. Valid formats: {}",
            config.logging.format,
            valid_formats.join(", ")
        );
    }

    Ok(())
}
