//! Shared scriptable node double for integration tests.
#![allow(dead_code)]

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use alloy::primitives::{Address, U256};
use alloy::rpc::types::{Block, Header};
use async_trait::async_trait;
use tokio::sync::mpsc;

use eth_gateway::node::{HeadFeed, NodeApi};
use eth_gateway::{ChainId, EthGateway, GatewayConfig, NodeError};

// Anvil's first two dev accounts.
pub const ALICE: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";
pub const ALICE_KEY: &str =
    "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
pub const BOB: &str = "0x70997970C51812dc3A010C7d01b50e0d17dc79C8";
pub const BOB_KEY: &str =
    "0x59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d";

/// Scriptable node double: per-call failure switches, call counters, and a
/// record of accepted transactions.
#[derive(Default)]
pub struct MockNode {
    pub chain_id: u64,
    pub nonce: u64,
    pub gas_price: u128,
    pub balance: U256,

    pub fail_chain_id: bool,
    pub fail_nonce: bool,
    pub fail_gas_price: bool,
    pub fail_submit: bool,
    pub fail_block_at: Option<u64>,

    /// Total collaborator calls of any kind.
    pub calls: AtomicU32,
    /// Block numbers in fetch order.
    pub fetched: Mutex<Vec<u64>>,
    /// Raw transactions the node accepted.
    pub submitted: Mutex<Vec<Vec<u8>>>,
    /// Feed handed out on subscribe; `None` means the node rejects it.
    pub feed: Mutex<Option<HeadFeed>>,
}

impl MockNode {
    pub fn new() -> Self {
        Self {
            chain_id: 31337,
            nonce: 7,
            gas_price: 1_000_000_000,
            ..Self::default()
        }
    }

    pub fn total_calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    /// Script a head feed, returning the upstream sending halves.
    pub fn with_feed(self) -> (Self, mpsc::Sender<Header>, mpsc::Sender<NodeError>) {
        let (head_tx, head_rx) = mpsc::channel(16);
        let (err_tx, err_rx) = mpsc::channel(16);
        *self.feed.lock().unwrap() = Some(HeadFeed {
            headers: head_rx,
            errors: err_rx,
        });
        (self, head_tx, err_tx)
    }

    fn bump(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl NodeApi for MockNode {
    async fn chain_id(&self) -> Result<ChainId, NodeError> {
        self.bump();
        if self.fail_chain_id {
            return Err(NodeError::new("chain id unavailable"));
        }
        Ok(ChainId(self.chain_id))
    }

    async fn pending_nonce(&self, _address: Address) -> Result<u64, NodeError> {
        self.bump();
        if self.fail_nonce {
            return Err(NodeError::new("nonce unavailable"));
        }
        // Every caller observes the same pending nonce, like a real node
        // does for concurrent queries before either transaction lands.
        Ok(self.nonce)
    }

    async fn gas_price(&self) -> Result<u128, NodeError> {
        self.bump();
        if self.fail_gas_price {
            return Err(NodeError::new("gas price unavailable"));
        }
        Ok(self.gas_price)
    }

    async fn block_by_number(&self, number: u64) -> Result<Block, NodeError> {
        self.bump();
        self.fetched.lock().unwrap().push(number);
        if self.fail_block_at == Some(number) {
            return Err(NodeError::new("block unavailable"));
        }
        Ok(block_at(number))
    }

    async fn send_raw_transaction(&self, raw: &[u8]) -> Result<(), NodeError> {
        self.bump();
        if self.fail_submit {
            return Err(NodeError::new("transaction rejected"));
        }
        self.submitted.lock().unwrap().push(raw.to_vec());
        Ok(())
    }

    async fn subscribe_new_heads(&self) -> Result<HeadFeed, NodeError> {
        self.bump();
        self.feed
            .lock()
            .unwrap()
            .take()
            .ok_or_else(|| NodeError::new("subscriptions not supported"))
    }

    async fn balance_at(&self, _address: Address) -> Result<U256, NodeError> {
        self.bump();
        Ok(self.balance)
    }
}

/// Install the test log subscriber once; later calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Gateway over a mock node, with Alice's key loaded.
pub fn gateway(node: Arc<MockNode>) -> EthGateway {
    init_tracing();
    let mut config = GatewayConfig::default();
    config
        .accounts
        .insert(ALICE.to_string(), ALICE_KEY.to_string());
    EthGateway::with_node(node, config)
}

pub fn header_at(number: u64) -> Header {
    let mut header: Header = Header::default();
    header.inner.number = number;
    header
}

pub fn block_at(number: u64) -> Block {
    let mut block: Block = Block::default();
    block.header.inner.number = number;
    block
}
