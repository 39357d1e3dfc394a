//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use crate::config::schema::GatewayConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<GatewayConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: GatewayConfig = toml::from_str(&content).map_err(ConfigError::Parse)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

impl GatewayConfig {
    /// Load and validate a configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        load_config(path.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_round_trip() {
        let path = std::env::temp_dir().join("eth-gateway-loader-test.toml");
        fs::write(
            &path,
            r#"
            rpc_url = "wss://mainnet.example.org/ws"
            chain_id = 1
            rpc_timeout_secs = 5
            "#,
        )
        .unwrap();

        let config = GatewayConfig::from_file(&path).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(config.rpc_url, "wss://mainnet.example.org/ws");
        assert_eq!(config.chain_id, Some(1));
        assert_eq!(config.rpc_timeout_secs, 5);
    }

    #[test]
    fn test_load_rejects_invalid() {
        let path = std::env::temp_dir().join("eth-gateway-loader-invalid.toml");
        fs::write(&path, r#"rpc_url = "ftp://example.org""#).unwrap();

        let result = GatewayConfig::from_file(&path);
        fs::remove_file(&path).ok();

        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_load_missing_file() {
        let result = load_config(Path::new("/nonexistent/eth-gateway.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
