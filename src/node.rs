//! The collaborator seam: the remote node's RPC surface.
//!
//! [`NodeApi`] mirrors the handful of node calls this crate consumes; every
//! method is a single network round-trip with no internal retry. [`RpcNode`]
//! is the production implementation over an alloy provider, with a per-call
//! timeout.

use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;

use alloy::eips::BlockNumberOrTag;
use alloy::primitives::{Address, U256};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::rpc::types::{Block, Header};
use alloy::transports::TransportResult;
use async_trait::async_trait;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::mpsc;
use tokio::time::timeout;

use crate::types::{ChainId, NodeError};

/// Upstream feed handed out by [`NodeApi::subscribe_new_heads`].
///
/// The node side owns the sending halves; the receivers are read exclusively
/// by the relay task of the session that requested them.
#[derive(Debug)]
pub struct HeadFeed {
    pub headers: mpsc::Receiver<Header>,
    pub errors: mpsc::Receiver<NodeError>,
}

/// Node RPC operations consumed by the gateway.
#[async_trait]
pub trait NodeApi: Send + Sync {
    async fn chain_id(&self) -> Result<ChainId, NodeError>;

    async fn pending_nonce(&self, address: Address) -> Result<u64, NodeError>;

    async fn gas_price(&self) -> Result<u128, NodeError>;

    /// Full block at `number`, transactions included.
    async fn block_by_number(&self, number: u64) -> Result<Block, NodeError>;

    async fn send_raw_transaction(&self, raw: &[u8]) -> Result<(), NodeError>;

    /// Establish a new-heads subscription. Requires a pubsub transport.
    async fn subscribe_new_heads(&self) -> Result<HeadFeed, NodeError>;

    async fn balance_at(&self, address: Address) -> Result<U256, NodeError>;
}

/// Production [`NodeApi`] over an alloy provider.
pub struct RpcNode {
    provider: Arc<dyn Provider + Send + Sync>,
    timeout_duration: Duration,
}

impl RpcNode {
    /// Connect to `rpc_url` (http, https, ws or wss).
    ///
    /// Http connections are lazy; ws connections perform their handshake
    /// here and fail eagerly.
    pub async fn connect(rpc_url: &str, timeout_duration: Duration) -> Result<Self, NodeError> {
        let provider = ProviderBuilder::new()
            .connect(rpc_url)
            .await
            .map_err(|e| NodeError::new(format!("connecting to '{rpc_url}': {e}")))?;

        tracing::info!(rpc_url = %rpc_url, "node connection established");

        Ok(Self {
            provider: Arc::new(provider),
            timeout_duration,
        })
    }

    async fn call<T>(
        &self,
        what: &str,
        fut: impl IntoFuture<Output = TransportResult<T>, IntoFuture: Send> + Send,
    ) -> Result<T, NodeError> {
        match timeout(self.timeout_duration, fut.into_future()).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => {
                tracing::warn!(call = what, error = %e, "RPC error");
                Err(NodeError::new(format!("{what}: {e}")))
            }
            Err(_) => {
                tracing::warn!(call = what, "RPC timeout");
                Err(NodeError::new(format!(
                    "{what}: timed out after {:?}",
                    self.timeout_duration
                )))
            }
        }
    }
}

#[async_trait]
impl NodeApi for RpcNode {
    async fn chain_id(&self) -> Result<ChainId, NodeError> {
        self.call("chain id", self.provider.get_chain_id())
            .await
            .map(ChainId)
    }

    async fn pending_nonce(&self, address: Address) -> Result<u64, NodeError> {
        self.call(
            "pending nonce",
            self.provider.get_transaction_count(address).pending(),
        )
        .await
    }

    async fn gas_price(&self) -> Result<u128, NodeError> {
        self.call("gas price", self.provider.get_gas_price()).await
    }

    async fn block_by_number(&self, number: u64) -> Result<Block, NodeError> {
        let block = self
            .call(
                "block by number",
                self.provider
                    .get_block_by_number(BlockNumberOrTag::Number(number))
                    .full(),
            )
            .await?;
        block.ok_or_else(|| NodeError::new(format!("block {number} not found")))
    }

    async fn send_raw_transaction(&self, raw: &[u8]) -> Result<(), NodeError> {
        self.call("send raw transaction", self.provider.send_raw_transaction(raw))
            .await
            .map(|_pending| ())
    }

    async fn subscribe_new_heads(&self) -> Result<HeadFeed, NodeError> {
        let mut subscription = self
            .provider
            .subscribe_blocks()
            .await
            .map_err(|e| NodeError::new(format!("subscribe new heads: {e}")))?;

        let (head_tx, head_rx) = mpsc::channel(1);
        let (err_tx, err_rx) = mpsc::channel(1);

        // Adapter task: drains the provider subscription into the feed.
        // Dropping both feed receivers ends it, which drops the subscription
        // and unsubscribes upstream.
        tokio::spawn(async move {
            loop {
                match subscription.recv().await {
                    Ok(header) => {
                        if head_tx.send(header).await.is_err() {
                            break;
                        }
                    }
                    Err(RecvError::Lagged(missed)) => {
                        let report =
                            NodeError::new(format!("head subscription lagged, {missed} missed"));
                        if err_tx.send(report).await.is_err() {
                            break;
                        }
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        });

        Ok(HeadFeed {
            headers: head_rx,
            errors: err_rx,
        })
    }

    async fn balance_at(&self, address: Address) -> Result<U256, NodeError> {
        self.call("balance", self.provider.get_balance(address)).await
    }
}

impl std::fmt::Debug for RpcNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcNode")
            .field("timeout", &self.timeout_duration)
            .finish()
    }
}
