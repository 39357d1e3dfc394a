//! Ethereum node gateway.
//!
//! A thin facade over a remote Ethereum-compatible node's RPC interface:
//! wei ↔ gwei/ether unit conversion, signed value transfers from locally
//! held account keys, ordered historical block retrieval, and a live
//! new-heads subscription relayed over channels.
//!
//! # Architecture Overview
//!
//! ```text
//!              ┌───────────────────────────────────────────────┐
//!              │                 ETH GATEWAY                   │
//!              │                                               │
//!   caller ───▶│  accounts ──▶ wallet ──▶ transfer ──┐         │
//!              │                                     │         │
//!              │  blocks (range reads) ──────────────┼──▶ node │───▶ remote
//!              │                                     │  (RPC)  │     node
//!              │  relay (head subscription) ◀────────┘         │
//!              │                                               │
//!              │  units (wei ↔ gwei/ether), config, lifecycle  │
//!              └───────────────────────────────────────────────┘
//! ```
//!
//! Every operation returns a typed [`GatewayError`]; nothing here terminates
//! the process. Transfers are fail-fast with no internal retries, and
//! concurrent transfers from one source address must be serialized by the
//! caller (see [`EthGateway::transfer`]).

pub mod accounts;
pub mod blocks;
pub mod config;
pub mod lifecycle;
pub mod node;
pub mod relay;
pub mod transfer;
pub mod types;
pub mod units;
pub mod wallet;

use std::sync::Arc;
use std::time::Duration;

use alloy::primitives::{Address, U256};

use crate::accounts::Accounts;
use crate::config::validation::validate_config;
use crate::node::RpcNode;

pub use crate::config::GatewayConfig;
pub use crate::lifecycle::StopSignal;
pub use crate::node::NodeApi;
pub use crate::relay::HeadSession;
pub use crate::types::{ChainId, GatewayError, GatewayResult, NodeError};
pub use crate::units::{units_to_wei, wei_to_units, Denom};

/// Facade over a remote node plus locally held account credentials.
#[derive(Clone)]
pub struct EthGateway {
    pub(crate) node: Arc<dyn NodeApi>,
    pub(crate) accounts: Accounts,
    pub(crate) config: GatewayConfig,
}

impl EthGateway {
    /// Connect to the node named by `config`, verifying its chain id when
    /// the configuration pins one.
    pub async fn connect(config: GatewayConfig) -> GatewayResult<Self> {
        validate_config(&config).map_err(|errors| {
            let joined = errors
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            GatewayError::Config(joined)
        })?;

        let node = RpcNode::connect(
            &config.rpc_url,
            Duration::from_secs(config.rpc_timeout_secs),
        )
        .await
        .map_err(GatewayError::Connect)?;

        let gateway = Self::with_node(Arc::new(node), config);

        if let Some(expected) = gateway.config.chain_id {
            let actual = gateway
                .node
                .chain_id()
                .await
                .map_err(GatewayError::ChainIdQuery)?;
            if actual.0 != expected {
                return Err(GatewayError::ChainMismatch {
                    expected,
                    actual: actual.0,
                });
            }
            tracing::info!(chain_id = expected, "chain id verified");
        }

        Ok(gateway)
    }

    /// Build a gateway over an already constructed node implementation.
    pub fn with_node(node: Arc<dyn NodeApi>, config: GatewayConfig) -> Self {
        let accounts = Accounts::new(config.accounts.clone());

        tracing::info!(
            rpc_url = %config.rpc_url,
            accounts = accounts.len(),
            "gateway initialized"
        );

        Self {
            node,
            accounts,
            config,
        }
    }

    /// The account credentials held by this gateway.
    pub fn accounts(&self) -> &Accounts {
        &self.accounts
    }

    /// The configuration this gateway was built with.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Balance of `address` in wei.
    pub async fn balance(&self, cancel: &StopSignal, address: &str) -> GatewayResult<U256> {
        let addr: Address = address
            .parse()
            .map_err(|_| GatewayError::InvalidAddress(address.to_string()))?;

        cancel
            .guard(self.node.balance_at(addr))
            .await?
            .map_err(GatewayError::BalanceQuery)
    }
}

impl std::fmt::Debug for EthGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EthGateway")
            .field("rpc_url", &self.config.rpc_url)
            .field("accounts", &self.accounts.len())
            .finish()
    }
}
