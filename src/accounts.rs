//! Locally held account credentials.

use std::collections::HashMap;

use crate::types::{GatewayError, GatewayResult};

/// Mapping of account address to account private key.
///
/// Populated once at gateway construction and read-only afterwards, so
/// concurrent lookups need no synchronization. Addresses are matched exactly
/// as stored: lookups are case-sensitive and perform no checksum
/// normalization (a store keyed by checksummed addresses will not answer
/// lowercase queries).
#[derive(Debug, Clone, Default)]
pub struct Accounts {
    keys: HashMap<String, String>,
}

impl Accounts {
    pub fn new(keys: HashMap<String, String>) -> Self {
        Self { keys }
    }

    /// Private key stored for `address`.
    pub fn lookup(&self, address: &str) -> GatewayResult<&str> {
        self.keys
            .get(address)
            .map(String::as_str)
            .ok_or_else(|| GatewayError::UnknownAccount(address.to_string()))
    }

    pub fn contains(&self, address: &str) -> bool {
        self.keys.contains_key(address)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Addresses held by this store, in arbitrary order.
    pub fn addresses(&self) -> impl Iterator<Item = &str> {
        self.keys.keys().map(String::as_str)
    }
}

impl FromIterator<(String, String)> for Accounts {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            keys: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> Accounts {
        [(
            "0xe840A468E935C38892f7ddcefE5184b943cA56f0".to_string(),
            "0xc4d1862347ae81d6508a4d91568a707955e403ad4b8b4ee2355f3b6163fd9b8c".to_string(),
        )]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_lookup_known() {
        let accounts = store();
        let key = accounts
            .lookup("0xe840A468E935C38892f7ddcefE5184b943cA56f0")
            .unwrap();
        assert!(key.starts_with("0xc4d18623"));
    }

    #[test]
    fn test_lookup_unknown() {
        let accounts = store();
        let err = accounts.lookup("0x0000000000000000000000000000000000000000");
        assert!(matches!(err, Err(GatewayError::UnknownAccount(_))));
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        let accounts = store();
        let lowered = "0xe840A468E935C38892f7ddcefE5184b943cA56f0".to_lowercase();
        assert!(accounts.lookup(&lowered).is_err());
    }
}
