//! Deterministic key pairs for tests. **Never use in production.**

use ed25519_dalek::SigningKey;

use crate::hash::Hash;
use crate::{Address, TxSignature};

/// A signing key and its address.
#[derive(Debug, Clone)]
pub struct TestAccount {
    pub key: SigningKey,
    pub address: Address,
}

impl TestAccount {
    /// Account derived from a fixed seed byte.
    #[must_use]
    pub fn from_seed(seed: u8) -> Self {
        Self::from_secret([seed; 32])
    }

    /// Account with a random secret.
    #[must_use]
    pub fn random() -> Self {
        Self::from_secret(rand::random::<[u8; 32]>())
    }

    fn from_secret(secret: [u8; 32]) -> Self {
        let key = SigningKey::from_bytes(&secret);
        let address = Address::from(&key.verifying_key());
        Self { key, address }
    }

    /// Sign a digest.
    #[must_use]
    pub fn sign(&self, digest: &Hash) -> TxSignature {
        TxSignature::sign(&self.key, digest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::sha256;

    #[test]
    fn seeded_accounts_are_stable() {
        assert_eq!(TestAccount::from_seed(1).address, TestAccount::from_seed(1).address);
        assert_ne!(TestAccount::from_seed(1).address, TestAccount::from_seed(2).address);
    }

    #[test]
    fn random_accounts_sign() {
        let acct = TestAccount::random();
        let digest = sha256(b"hello");
        assert_eq!(acct.sign(&digest).recover(&digest).unwrap(), acct.address);
    }
}
