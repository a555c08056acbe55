//! Precomputed roots of all-empty subtrees.
//!
//! `zero_hashes()[0]` is the empty leaf (32 zero bytes) and
//! `zero_hashes()[i + 1] = H(zero_hashes()[i], zero_hashes()[i])`. A tree with
//! a single occupied leaf at index 0 therefore has root
//! `fold(leaf, |acc, z| H(acc, z))` over the table, which is how deposit
//! blocks are committed without building a tree.

use std::sync::LazyLock;

use rootchain_types::constants::MERKLE_DEPTH;
use rootchain_types::hash::{hash_pair, Hash};

/// An unoccupied leaf.
pub const EMPTY_LEAF: Hash = [0u8; 32];

static ZERO_HASHES: LazyLock<[Hash; MERKLE_DEPTH]> = LazyLock::new(|| {
    let mut table = [EMPTY_LEAF; MERKLE_DEPTH];
    for level in 1..MERKLE_DEPTH {
        table[level] = hash_pair(&table[level - 1], &table[level - 1]);
    }
    table
});

/// One empty-subtree hash per tree level, leaves first.
#[must_use]
pub fn zero_hashes() -> &'static [Hash; MERKLE_DEPTH] {
    &ZERO_HASHES
}

/// Root of a completely empty tree.
#[must_use]
pub fn empty_root() -> Hash {
    let top = zero_hashes()[MERKLE_DEPTH - 1];
    hash_pair(&top, &top)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_has_one_entry_per_level() {
        assert_eq!(zero_hashes().len(), MERKLE_DEPTH);
        assert_eq!(zero_hashes()[0], EMPTY_LEAF);
    }

    #[test]
    fn each_level_hashes_the_previous() {
        let z = zero_hashes();
        for level in 1..MERKLE_DEPTH {
            assert_eq!(z[level], hash_pair(&z[level - 1], &z[level - 1]));
        }
    }

    #[test]
    fn levels_are_distinct() {
        let z = zero_hashes();
        let unique: std::collections::HashSet<_> = z.iter().collect();
        assert_eq!(unique.len(), MERKLE_DEPTH);
        assert!(!unique.contains(&empty_root()));
    }
}
