//! # rootchain-merkle
//!
//! **Pure fixed-depth Merkle commitments for the root chain.**
//!
//! Everything here is a pure function of its inputs:
//!
//! - **Verifier**: [`check_membership`] over 16-level sibling proofs
//! - **Zero hashes**: roots of empty subtrees, one per level
//! - **Deposit roots**: [`calculate_deposit_root`] in 16 hash operations
//! - **Tree builder**: [`FixedMerkle`] for operators and exiters who need
//!   roots and proofs for a whole block

pub mod deposit;
pub mod tree;
pub mod verify;
pub mod zero;

pub use deposit::{calculate_deposit_root, deposit_leaf, root_from_first_leaf};
pub use tree::{FixedMerkle, MAX_LEAVES};
pub use verify::{check_membership, compute_root};
pub use zero::{empty_root, zero_hashes, EMPTY_LEAF};
