//! SHA-256 helpers shared by every commitment in the root chain.

use sha2::{Digest, Sha256};

/// A 32-byte digest (block roots, transaction hashes, tree nodes).
pub type Hash = [u8; 32];

/// SHA-256 of arbitrary bytes.
#[must_use]
pub fn sha256(data: &[u8]) -> Hash {
    Sha256::digest(data).into()
}

/// Hash of two concatenated digests: `SHA-256(left || right)`.
#[must_use]
pub fn hash_pair(left: &Hash, right: &Hash) -> Hash {
    let mut hasher = Sha256::new();
    hasher.update(left);
    hasher.update(right);
    hasher.finalize().into()
}
