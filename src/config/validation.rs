//! Configuration validation.
//!
//! Semantic checks on top of serde's syntactic ones. All violations are
//! collected and reported together, not just the first.

use url::Url;

use crate::config::schema::GatewayConfig;

/// Floor for a plain value transfer carrying the payload tag.
const MIN_TRANSFER_GAS: u64 = 21_000 + 16 * 32;

/// A single validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a configuration, returning every violation found.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let mut fail = |field, message: String| errors.push(ValidationError { field, message });

    if config.rpc_url.is_empty() {
        fail("rpc_url", "must not be empty".to_string());
    } else {
        match Url::parse(&config.rpc_url) {
            Ok(url) if matches!(url.scheme(), "http" | "https" | "ws" | "wss") => {}
            Ok(url) => fail("rpc_url", format!("unsupported scheme '{}'", url.scheme())),
            Err(e) => fail("rpc_url", format!("not a valid URL: {e}")),
        }
    }

    if config.rpc_timeout_secs == 0 {
        fail("rpc_timeout_secs", "must be greater than zero".to_string());
    }

    if config.gas_limit < MIN_TRANSFER_GAS {
        fail(
            "gas_limit",
            format!("must be at least {MIN_TRANSFER_GAS} to cover a plain transfer"),
        );
    }

    if config.head_buffer == 0 {
        fail("head_buffer", "must be at least 1".to_string());
    }

    for (address, key) in &config.accounts {
        if !address.starts_with("0x") || address.len() != 42 {
            fail(
                "accounts",
                format!("'{address}' is not a 0x-prefixed 20-byte hex address"),
            );
        }
        if key.is_empty() {
            fail("accounts", format!("account '{address}' has an empty key"));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
