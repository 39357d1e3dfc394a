//! Configuration schema definitions.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Gateway configuration.
///
/// Immutable once loaded. Every field has a default so a minimal file (or
/// `GatewayConfig::default()`) works against a local development node.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Node RPC endpoint (http, https, ws or wss). Head subscriptions need a
    /// ws/wss endpoint.
    pub rpc_url: String,

    /// Expected chain id, verified against the node at connect when set.
    pub chain_id: Option<u64>,

    /// Per-call RPC timeout in seconds.
    pub rpc_timeout_secs: u64,

    /// Fixed gas limit applied to every value transfer; not estimated.
    pub gas_limit: u64,

    /// Capacity of a head subscription's outward channels.
    pub head_buffer: usize,

    /// Account address → private key (hex). Loaded once, never mutated.
    pub accounts: HashMap<String, String>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            rpc_url: "http://localhost:8545".to_string(),
            chain_id: None,
            rpc_timeout_secs: 10,
            gas_limit: 6_721_975,
            head_buffer: 1,
            accounts: HashMap::new(),
        }
    }
}
