//! Account key handling and transaction signing.

use alloy::consensus::{SignableTransaction, TxEnvelope, TxLegacy};
use alloy::eips::eip2718::Encodable2718;
use alloy::primitives::{Address, TxHash};
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::SignerSync;

use crate::types::{GatewayError, GatewayResult};

/// Signing wallet for a single account key.
///
/// Keys are parsed per transfer from the account store and dropped with the
/// call; the wallet holds no nonce state (nonces come from the node each
/// time, see the transfer pipeline's serialization caveat).
pub struct Wallet {
    signer: PrivateKeySigner,
}

impl Wallet {
    /// Parse a hex-encoded private key (with or without 0x prefix).
    pub fn from_private_key(private_key_hex: &str) -> GatewayResult<Self> {
        let key_hex = private_key_hex
            .strip_prefix("0x")
            .unwrap_or(private_key_hex);

        let signer: PrivateKeySigner = key_hex
            .parse()
            .map_err(|e| GatewayError::Signing(format!("invalid private key: {e}")))?;

        Ok(Self { signer })
    }

    /// Address derived from the key.
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// Sign a transfer record, binding the signature to the record's chain id.
    ///
    /// Returns the content-derived hash and the raw encoding for submission;
    /// the signed transaction itself is not retained.
    pub fn sign_transfer(&self, record: TxLegacy) -> GatewayResult<SignedTransfer> {
        // signature_hash covers the chain id when the record carries one, so
        // the signature is invalid on any other chain.
        let signature = self
            .signer
            .sign_hash_sync(&record.signature_hash())
            .map_err(|e| GatewayError::Signing(e.to_string()))?;

        let signed = record.into_signed(signature);
        let hash = *signed.hash();
        let raw = TxEnvelope::Legacy(signed).encoded_2718();

        Ok(SignedTransfer { hash, raw })
    }
}

/// A signed transfer ready for submission.
pub struct SignedTransfer {
    pub hash: TxHash,
    pub raw: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::consensus::transaction::SignerRecoverable;
    use alloy::eips::eip2718::Decodable2718;
    use alloy::primitives::{Bytes, TxKind, U256};

    // Well-known test private key (Anvil's first account)
    const TEST_PRIVATE_KEY: &str =
        "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
    const TEST_ADDRESS: &str = "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266";

    fn record() -> TxLegacy {
        TxLegacy {
            chain_id: Some(31337),
            nonce: 0,
            gas_price: 1_000_000_000,
            gas_limit: 21_000,
            to: TxKind::Call(Address::ZERO),
            value: U256::from(1u64),
            input: Bytes::new(),
        }
    }

    #[test]
    fn test_wallet_from_private_key() {
        let wallet = Wallet::from_private_key(TEST_PRIVATE_KEY).unwrap();
        assert_eq!(wallet.address().to_string().to_lowercase(), TEST_ADDRESS);
    }

    #[test]
    fn test_wallet_with_0x_prefix() {
        let wallet = Wallet::from_private_key(&format!("0x{TEST_PRIVATE_KEY}")).unwrap();
        assert_eq!(wallet.address().to_string().to_lowercase(), TEST_ADDRESS);
    }

    #[test]
    fn test_invalid_private_key() {
        let result = Wallet::from_private_key("not_a_key");
        assert!(matches!(result, Err(GatewayError::Signing(_))));
    }

    #[test]
    fn test_sign_transfer_is_deterministic() {
        let wallet = Wallet::from_private_key(TEST_PRIVATE_KEY).unwrap();
        let first = wallet.sign_transfer(record()).unwrap();
        let second = wallet.sign_transfer(record()).unwrap();
        assert_eq!(first.hash, second.hash);
        assert_eq!(first.raw, second.raw);
        assert!(!first.raw.is_empty());
    }

    #[test]
    fn test_signature_recovers_signer() {
        let wallet = Wallet::from_private_key(TEST_PRIVATE_KEY).unwrap();
        let signed = wallet.sign_transfer(record()).unwrap();

        let envelope = TxEnvelope::decode_2718(&mut signed.raw.as_slice()).unwrap();
        let sender = envelope.recover_signer().unwrap();
        assert_eq!(sender, wallet.address());
    }
}
