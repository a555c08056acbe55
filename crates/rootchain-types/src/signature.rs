//! Signature primitive: "recover the signer of a digest, or fail".
//!
//! ed25519 cannot recover a public key from a signature alone, so every
//! [`TxSignature`] names its claimed signer. Recovery verifies the signature
//! under that key and yields the signer's [`Address`]. A forged or mismatched
//! claim fails exactly like a failed recovery would.

use ed25519_dalek::{Signature, Signer, SigningKey};
use serde::{Deserialize, Serialize};

use crate::constants::{SIGNATURE_LEN, TX_INPUTS};
use crate::hash::{sha256, Hash};
use crate::{Address, Result, RootChainError};

/// A signature over a 32-byte digest together with its claimed signer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxSignature {
    /// Claimed signer (ed25519 verifying key).
    pub signer: Address,
    /// Raw 64-byte ed25519 signature.
    pub signature: Vec<u8>,
}

impl TxSignature {
    /// Sign a digest with the given key.
    #[must_use]
    pub fn sign(key: &SigningKey, digest: &Hash) -> Self {
        Self {
            signer: Address::from(&key.verifying_key()),
            signature: key.sign(digest).to_bytes().to_vec(),
        }
    }

    /// Recover the signer of `digest`.
    ///
    /// # Errors
    /// [`RootChainError::SignatureInvalid`] if the signer is null, the
    /// signature is malformed, or it does not verify.
    pub fn recover(&self, digest: &Hash) -> Result<Address> {
        if self.signer.is_zero() {
            return Err(RootChainError::SignatureInvalid {
                reason: "null signer".into(),
            });
        }
        let bytes: [u8; SIGNATURE_LEN] =
            self.signature
                .as_slice()
                .try_into()
                .map_err(|_| RootChainError::SignatureInvalid {
                    reason: format!(
                        "expected {SIGNATURE_LEN} signature bytes, got {}",
                        self.signature.len()
                    ),
                })?;
        let key = self.signer.verifying_key()?;
        key.verify_strict(digest, &Signature::from_bytes(&bytes))
            .map_err(|e| RootChainError::SignatureInvalid {
                reason: format!("signature by {} does not verify: {e}", self.signer),
            })?;
        Ok(self.signer)
    }

    /// Canonical byte encoding: `signer || signature`.
    #[must_use]
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(32 + self.signature.len());
        out.extend_from_slice(self.signer.as_bytes());
        out.extend_from_slice(&self.signature);
        out
    }
}

/// Spend signatures of a transaction, one optional slot per input.
///
/// The set is bound into the committed Merkle leaf, so a transaction cannot
/// be included in a block before its signatures are fixed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureSet {
    pub inputs: [Option<TxSignature>; TX_INPUTS],
}

impl SignatureSet {
    /// Signature set for a transaction with a single input.
    #[must_use]
    pub fn single(sig: TxSignature) -> Self {
        Self {
            inputs: [Some(sig), None],
        }
    }

    /// The signature for input slot `index`, if present.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&TxSignature> {
        self.inputs.get(index).and_then(Option::as_ref)
    }

    /// Canonical encoding: per slot a presence byte, then the signature.
    #[must_use]
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(TX_INPUTS * (1 + 32 + SIGNATURE_LEN));
        for slot in &self.inputs {
            match slot {
                Some(sig) => {
                    out.push(1);
                    out.extend_from_slice(&sig.canonical_bytes());
                }
                None => out.push(0),
            }
        }
        out
    }

    /// SHA-256 over [`Self::canonical_bytes`].
    #[must_use]
    pub fn digest(&self) -> Hash {
        sha256(&self.canonical_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(seed: u8) -> SigningKey {
        SigningKey::from_bytes(&[seed; 32])
    }

    #[test]
    fn sign_then_recover() {
        let k = key(1);
        let digest = sha256(b"tx");
        let sig = TxSignature::sign(&k, &digest);
        assert_eq!(
            sig.recover(&digest).unwrap(),
            Address::from(&k.verifying_key())
        );
    }

    #[test]
    fn recover_fails_on_other_digest() {
        let sig = TxSignature::sign(&key(1), &sha256(b"tx"));
        let err = sig.recover(&sha256(b"other")).unwrap_err();
        assert!(matches!(err, RootChainError::SignatureInvalid { .. }));
    }

    #[test]
    fn recover_fails_on_substituted_signer() {
        let digest = sha256(b"tx");
        let mut sig = TxSignature::sign(&key(1), &digest);
        sig.signer = Address::from(&key(2).verifying_key());
        assert!(sig.recover(&digest).is_err());
    }

    #[test]
    fn recover_fails_on_truncated_signature() {
        let digest = sha256(b"tx");
        let mut sig = TxSignature::sign(&key(1), &digest);
        sig.signature.pop();
        assert!(sig.recover(&digest).is_err());
    }

    #[test]
    fn recover_fails_on_null_signer() {
        let sig = TxSignature {
            signer: Address::ZERO,
            signature: vec![0u8; SIGNATURE_LEN],
        };
        assert!(sig.recover(&sha256(b"tx")).is_err());
    }

    #[test]
    fn set_digest_depends_on_slots() {
        let digest = sha256(b"tx");
        let sig = TxSignature::sign(&key(1), &digest);
        let first = SignatureSet::single(sig.clone());
        let second = SignatureSet {
            inputs: [None, Some(sig)],
        };
        assert_ne!(first.digest(), second.digest());
        assert_ne!(first.digest(), SignatureSet::default().digest());
    }

    #[test]
    fn serde_roundtrip() {
        let set = SignatureSet::single(TxSignature::sign(&key(3), &sha256(b"x")));
        let json = serde_json::to_string(&set).unwrap();
        let back: SignatureSet = serde_json::from_str(&json).unwrap();
        assert_eq!(set, back);
    }
}
