//! Fixed-depth tree builder.
//!
//! Operators build this over a block's leaves to obtain the root they
//! submit and the proofs exiters present. Unoccupied positions hold
//! [`EMPTY_LEAF`], so only the occupied prefix of each level is stored;
//! everything to the right of it is the level's zero hash.

use rootchain_types::constants::MERKLE_DEPTH;
use rootchain_types::hash::{hash_pair, Hash};
use rootchain_types::{Result, RootChainError};

use crate::zero::{zero_hashes, EMPTY_LEAF};

/// Maximum number of leaves a tree of depth [`MERKLE_DEPTH`] holds.
pub const MAX_LEAVES: usize = 1 << MERKLE_DEPTH;

/// A depth-16 Merkle tree over an ordered list of leaves.
#[derive(Debug, Clone)]
pub struct FixedMerkle {
    /// `levels[0]` are the leaves, `levels[MERKLE_DEPTH]` holds only the root.
    levels: Vec<Vec<Hash>>,
}

impl FixedMerkle {
    /// Build a tree whose leaf `i` is `leaves[i]`.
    ///
    /// # Errors
    /// `InvalidTransaction` if more than [`MAX_LEAVES`] leaves are given.
    pub fn new(leaves: Vec<Hash>) -> Result<Self> {
        if leaves.len() > MAX_LEAVES {
            return Err(RootChainError::InvalidTransaction {
                reason: format!("{} leaves, a block holds at most {MAX_LEAVES}", leaves.len()),
            });
        }

        let mut levels = Vec::with_capacity(MERKLE_DEPTH + 1);
        let mut level = if leaves.is_empty() {
            vec![EMPTY_LEAF]
        } else {
            leaves
        };
        for zero in zero_hashes() {
            let next = level
                .chunks(2)
                .map(|pair| hash_pair(&pair[0], pair.get(1).unwrap_or(zero)))
                .collect();
            levels.push(level);
            level = next;
        }
        levels.push(level);

        Ok(Self { levels })
    }

    /// The committed root.
    #[must_use]
    pub fn root(&self) -> Hash {
        self.levels[MERKLE_DEPTH][0]
    }

    /// Number of leaves supplied at construction (at least one slot is
    /// always materialized, so an empty tree reports 1).
    #[must_use]
    pub fn leaf_count(&self) -> usize {
        self.levels[0].len()
    }

    /// Leaf at `index`, [`EMPTY_LEAF`] past the occupied prefix.
    #[must_use]
    pub fn leaf(&self, index: usize) -> Option<Hash> {
        (index < MAX_LEAVES).then(|| self.levels[0].get(index).copied().unwrap_or(EMPTY_LEAF))
    }

    /// Sibling path for the leaf at `index`, in the byte layout
    /// [`crate::check_membership`] accepts.
    ///
    /// Returns `None` if `index` is outside the tree.
    #[must_use]
    pub fn proof(&self, index: usize) -> Option<Vec<u8>> {
        if index >= MAX_LEAVES {
            return None;
        }
        let mut proof = Vec::with_capacity(rootchain_types::constants::PROOF_LEN);
        let mut position = index;
        for (level, zero) in self.levels.iter().zip(zero_hashes()) {
            let sibling = level.get(position ^ 1).unwrap_or(zero);
            proof.extend_from_slice(sibling);
            position >>= 1;
        }
        Some(proof)
    }
}
