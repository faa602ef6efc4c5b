//! Configuration loader for chatgate.
//!
//! Reads `chatgate.toml` (or the path given with `--config`) and deserializes
//! it into [`GatewayConfig`]. Falls back to defaults when the file is missing
//! or malformed; the result is always validated.

use std::path::Path;

use chatgate_types::config::GatewayConfig;
use chatgate_types::error::ConfigError;

/// Default config file name, resolved against the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "chatgate.toml";

/// Load configuration from `path`.
///
/// - If the file does not exist, uses [`GatewayConfig::default()`].
/// - If the file exists but fails to read or parse, logs a warning and uses the default.
/// - The resulting config is validated; out-of-range values are an error.
pub async fn load_config(path: &Path) -> Result<GatewayConfig, ConfigError> {
    let config = read_config(path).await;
    config.validate()?;
    Ok(config)
}

async fn read_config(path: &Path) -> GatewayConfig {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config found at {}, using defaults", path.display());
            return GatewayConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", path.display());
            return GatewayConfig::default();
        }
    };

    match toml::from_str::<GatewayConfig>(&content) {
        Ok(config) => {
            tracing::debug!("Loaded config from {}", path.display());
            config
        }
        Err(err) => {
            tracing::warn!("Failed to parse {}: {err}, using defaults", path.display());
            GatewayConfig::default()
        }
    }
}

/// Render a config back to TOML, for `chatgate config`.
pub fn to_toml(config: &GatewayConfig) -> Result<String, toml::ser::Error> {
    toml::to_string_pretty(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn load_config_missing_file_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(&tmp.path().join(DEFAULT_CONFIG_FILE)).await.unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.completion.model, "liquid/lfm-40b");
    }

    #[tokio::test]
    async fn load_config_valid_toml_returns_parsed() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join(DEFAULT_CONFIG_FILE);
        tokio::fs::write(
            &config_path,
            r#"
[server]
host = "0.0.0.0"
port = 8088

[completion]
model = "mistralai/mistral-7b-instruct"
timeout_secs = 15

[conversation]
session_idle_ttl_secs = 600
max_sessions = 0
"#,
        )
        .await
        .unwrap();

        let config = load_config(&config_path).await.unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8088);
        assert_eq!(config.completion.model, "mistralai/mistral-7b-instruct");
        assert_eq!(config.completion.timeout_secs, 15);
        assert_eq!(config.conversation.session_idle_ttl_secs, 600);
        assert_eq!(config.conversation.max_sessions, 0);
        assert_eq!(config.conversation.keep_recent, 5);
    }

    #[tokio::test]
    async fn load_config_invalid_toml_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join(DEFAULT_CONFIG_FILE);
        tokio::fs::write(&config_path, "this is not { valid toml !!!")
            .await
            .unwrap();

        let config = load_config(&config_path).await.unwrap();
        assert_eq!(config.server.port, 3000);
    }

    #[tokio::test]
    async fn load_config_out_of_range_is_error() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join(DEFAULT_CONFIG_FILE);
        tokio::fs::write(&config_path, "[completion]\ntemperature = 3.5\n")
            .await
            .unwrap();

        let err = load_config(&config_path).await.unwrap_err();
        assert!(matches!(
            err,
            ConfigError::OutOfRange {
                field: "completion.temperature",
                ..
            }
        ));
    }

    #[test]
    fn to_toml_roundtrips_defaults() {
        let rendered = to_toml(&GatewayConfig::default()).unwrap();
        assert!(rendered.contains("[completion]"));
        let parsed: GatewayConfig = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed.completion.max_tokens, 1000);
    }
}
