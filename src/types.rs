//! Gateway-wide types and error definitions.

use thiserror::Error;

/// Chain ID type for strong typing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChainId(pub u64);

impl From<u64> for ChainId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<ChainId> for u64 {
    fn from(id: ChainId) -> Self {
        id.0
    }
}

impl std::fmt::Display for ChainId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Transport-level failure reported by the node collaborator.
///
/// Carries the failing call's context; the gateway wraps it into the
/// step-specific [`GatewayError`] variant.
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct NodeError(pub String);

impl NodeError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Errors that can occur during gateway operations.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Source address has no key in the account store.
    #[error("unknown account: {0}")]
    UnknownAccount(String),

    /// The stored key derives a different address than the requested source.
    #[error("key stored for {requested} derives address {derived}")]
    AddressMismatch { requested: String, derived: String },

    /// Address string is not valid hex-encoded address form.
    #[error("invalid address '{0}'")]
    InvalidAddress(String),

    /// Numeric parse failure or unrepresentable result in unit conversion.
    #[error("unit conversion failed: {0}")]
    Conversion(String),

    /// Pending nonce query failed.
    #[error("pending nonce query failed: {0}")]
    NonceQuery(NodeError),

    /// Gas price query failed.
    #[error("gas price query failed: {0}")]
    GasPriceQuery(NodeError),

    /// Chain id query failed.
    #[error("chain id query failed: {0}")]
    ChainIdQuery(NodeError),

    /// Balance query failed.
    #[error("balance query failed: {0}")]
    BalanceQuery(NodeError),

    /// Malformed private key or signer failure.
    #[error("signing failed: {0}")]
    Signing(String),

    /// The node rejected the signed transaction.
    #[error("transaction submission rejected: {0}")]
    Submission(NodeError),

    /// A block fetch failed; the whole range read is discarded.
    #[error("fetching block {number} failed: {source}")]
    BlockFetch { number: u64, source: NodeError },

    /// The upstream head subscription could not be established.
    #[error("subscription setup failed: {0}")]
    SubscriptionSetup(NodeError),

    /// Initial connection to the node failed.
    #[error("node connection failed: {0}")]
    Connect(NodeError),

    /// Connected node reports a different chain than configured.
    #[error("chain id mismatch: expected {expected}, got {actual}")]
    ChainMismatch { expected: u64, actual: u64 },

    /// Configuration rejected by validation.
    #[error("configuration error: {0}")]
    Config(String),

    /// Operation aborted by its cancellation signal.
    #[error("operation cancelled")]
    Cancelled,
}

/// Result type for gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;
