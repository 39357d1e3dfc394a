//! Value transfer pipeline: resolve, build, sign, submit.

use alloy::consensus::transaction::SignerRecoverable;
use alloy::consensus::{TxEnvelope, TxLegacy};
use alloy::primitives::{Address, Bytes, TxHash, TxKind, U256};

use crate::lifecycle::StopSignal;
use crate::types::{GatewayError, GatewayResult};
use crate::wallet::Wallet;
use crate::EthGateway;

/// Opaque marker carried in the transfer payload. Audit aid only, not
/// protocol-required.
pub const PAYLOAD_TAG: &[u8] = b"eth-gateway";

impl EthGateway {
    /// Transfer `amount` wei from `from` to `to`, returning the transaction
    /// hash once the node has accepted the submission.
    ///
    /// The pipeline is fail-fast and non-resumable: any step's failure aborts
    /// the whole call, no partial transaction survives, and nothing is
    /// retried here. A returned hash means the node accepted the transaction;
    /// any error means it was never submitted (or the submission itself was
    /// rejected, reported as [`GatewayError::Submission`]).
    ///
    /// Concurrent transfers from one source address can observe the same
    /// pending nonce. Callers must serialize per source, e.g. with a
    /// per-address mutex or a single-writer queue.
    pub async fn transfer(
        &self,
        cancel: &StopSignal,
        from: &str,
        to: &str,
        amount: U256,
    ) -> GatewayResult<TxHash> {
        let key = self.accounts.lookup(from)?;
        let wallet = Wallet::from_private_key(key)?;

        // The stored key must actually derive the requested source address;
        // signing with a mismatched key would debit the wrong account.
        let requested: Address = from
            .parse()
            .map_err(|_| GatewayError::InvalidAddress(from.to_string()))?;
        if wallet.address() != requested {
            return Err(GatewayError::AddressMismatch {
                requested: from.to_string(),
                derived: wallet.address().to_string(),
            });
        }

        let destination: Address = to
            .parse()
            .map_err(|_| GatewayError::InvalidAddress(to.to_string()))?;

        let nonce = cancel
            .guard(self.node.pending_nonce(requested))
            .await?
            .map_err(GatewayError::NonceQuery)?;

        let gas_price = cancel
            .guard(self.node.gas_price())
            .await?
            .map_err(GatewayError::GasPriceQuery)?;

        let mut record = TxLegacy {
            chain_id: None,
            nonce,
            gas_price,
            gas_limit: self.config.gas_limit,
            to: TxKind::Call(destination),
            value: amount,
            input: Bytes::from_static(PAYLOAD_TAG),
        };

        let chain_id = cancel
            .guard(self.node.chain_id())
            .await?
            .map_err(GatewayError::ChainIdQuery)?;
        record.chain_id = Some(chain_id.0);

        let signed = wallet.sign_transfer(record)?;

        cancel
            .guard(self.node.send_raw_transaction(&signed.raw))
            .await?
            .map_err(GatewayError::Submission)?;

        tracing::info!(
            tx_hash = %signed.hash,
            from = %requested,
            to = %destination,
            nonce = nonce,
            "transfer submitted"
        );

        Ok(signed.hash)
    }

    /// Recover the sender address of a signed transaction from its signature.
    pub fn transaction_sender(&self, tx: &TxEnvelope) -> GatewayResult<Address> {
        tx.recover_signer()
            .map_err(|e| GatewayError::Signing(format!("sender recovery: {e}")))
    }
}
