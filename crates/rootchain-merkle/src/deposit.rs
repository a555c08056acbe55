//! Deposit-block commitments.
//!
//! A deposit block holds exactly one transaction at index 0, so its root is
//! the deposit transaction's hash folded with the zero-hash table. No tree
//! is built and no signatures are committed.

use rootchain_types::hash::{hash_pair, Hash};
use rootchain_types::{tx_hash, Address, Result, Transaction};
use rust_decimal::Decimal;

use crate::zero::zero_hashes;

/// Root of a depth-16 tree whose only leaf, at index 0, is `leaf`.
#[must_use]
pub fn root_from_first_leaf(leaf: &Hash) -> Hash {
    zero_hashes()
        .iter()
        .fold(*leaf, |acc, zero| hash_pair(&acc, zero))
}

/// Leaf committed for a deposit of `amount` of `asset` to `owner`.
///
/// # Errors
/// `Serialization` if the deposit transaction cannot be encoded.
pub fn deposit_leaf(owner: Address, asset: &str, amount: Decimal) -> Result<Hash> {
    let bytes = Transaction::deposit(owner, asset, amount).encode()?;
    Ok(tx_hash(&bytes))
}

/// Root of the deposit block for `(owner, asset, amount)`.
///
/// Pure: equal inputs always give equal roots, and the result equals
/// `FixedMerkle::new(vec![deposit_leaf(..)])?.root()`.
///
/// # Errors
/// `Serialization` if the deposit transaction cannot be encoded.
pub fn calculate_deposit_root(owner: Address, asset: &str, amount: Decimal) -> Result<Hash> {
    Ok(root_from_first_leaf(&deposit_leaf(owner, asset, amount)?))
}
