//! Configuration loader for Pulumi Copilot.
//!
//! Reads `config.toml` from the data directory (`~/.pulumi-copilot/` in
//! production) and deserializes it into [`CopilotConfig`]. Falls back to
//! defaults when the file is missing or malformed.

use std::path::{Path, PathBuf};

use copilot_types::config::CopilotConfig;

/// Environment variable that relocates the data directory.
pub const DATA_DIR_ENV: &str = "PULUMI_COPILOT_DATA_DIR";

/// Resolve the data directory.
///
/// `PULUMI_COPILOT_DATA_DIR` wins, then `~/.pulumi-copilot`, then a relative
/// `.pulumi-copilot` when no home directory is known.
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".pulumi-copilot");
    }

    PathBuf::from(".pulumi-copilot")
}

/// Load configuration from `{data_dir}/config.toml`.
///
/// - Missing file: [`CopilotConfig::default()`].
/// - Unreadable or unparsable file: logs a warning and returns the default.
pub async fn load_config(data_dir: &Path) -> CopilotConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return CopilotConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return CopilotConfig::default();
        }
    };

    match toml::from_str::<CopilotConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            CopilotConfig::default()
        }
    }
}

/// Apply `PULUMI_API_URL` and `PULUMI_CONSOLE_URL` from the process
/// environment.
pub fn apply_env_overrides(config: CopilotConfig) -> CopilotConfig {
    apply_overrides_from(config, |key| std::env::var(key).ok())
}

fn apply_overrides_from(
    mut config: CopilotConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> CopilotConfig {
    if let Some(url) = lookup("PULUMI_API_URL").filter(|v| !v.trim().is_empty()) {
        config.api_url = url;
    }
    if let Some(url) = lookup("PULUMI_CONSOLE_URL") {
        config.console_url = url;
    }
    config
}

/// `User-Agent` sent on every REST call.
pub fn user_agent() -> String {
    format!("pulumi-copilot-cli/{}", env!("CARGO_PKG_VERSION"))
}
