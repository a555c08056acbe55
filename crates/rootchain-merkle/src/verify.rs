//! Membership checks against a fixed-depth root.
//!
//! A proof is the concatenation of the 16 sibling hashes on the path from a
//! leaf to the root, leaf level first. Bit `k` of the leaf index selects the
//! side at level `k`: 0 puts the running hash on the left, 1 on the right.

use rootchain_types::constants::{HASH_LEN, MERKLE_DEPTH, PROOF_LEN};
use rootchain_types::hash::{hash_pair, Hash};

/// Root implied by `leaf` sitting at `index` under `proof`.
///
/// Returns `None` if the proof has the wrong length or the index does not
/// fit a tree of depth [`MERKLE_DEPTH`].
#[must_use]
pub fn compute_root(leaf: &Hash, index: u64, proof: &[u8]) -> Option<Hash> {
    if proof.len() != PROOF_LEN || index >> MERKLE_DEPTH != 0 {
        return None;
    }
    let mut computed = *leaf;
    let mut path = index;
    for chunk in proof.chunks_exact(HASH_LEN) {
        let mut sibling = [0u8; HASH_LEN];
        sibling.copy_from_slice(chunk);
        computed = if path & 1 == 0 {
            hash_pair(&computed, &sibling)
        } else {
            hash_pair(&sibling, &computed)
        };
        path >>= 1;
    }
    Some(computed)
}

/// Whether `leaf` is committed at `index` under `root`.
///
/// A malformed proof is never a member.
#[must_use]
pub fn check_membership(leaf: &Hash, index: u64, root: &Hash, proof: &[u8]) -> bool {
    compute_root(leaf, index, proof).is_some_and(|computed| computed == *root)
}
