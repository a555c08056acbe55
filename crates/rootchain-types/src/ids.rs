//! Identifiers used throughout the root chain.
//!
//! Outputs are addressed by a packed [`UtxoPos`] so that identifiers sort by
//! block, then transaction, then output. Participants are identified by their
//! raw ed25519 verifying key ([`Address`]).

use std::fmt;

use ed25519_dalek::VerifyingKey;
use serde::{Deserialize, Serialize};

use crate::constants::{BLOCK_INTERVAL, BLOCK_OFFSET, TX_OFFSET};
use crate::{Result, RootChainError};

// ---------------------------------------------------------------------------
// UtxoPos
// ---------------------------------------------------------------------------

/// Position of a transaction output: `(block number, tx index, output index)`.
///
/// Packed as `blknum * 1_000_000_000 + txindex * 10_000 + oindex`. The raw
/// integer order is the position order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct UtxoPos(pub u64);

impl UtxoPos {
    /// The empty input slot.
    pub const NULL: Self = Self(0);

    /// Pack a position, rejecting components that would overlap.
    pub fn new(blknum: u64, txindex: u64, oindex: u64) -> Result<Self> {
        if txindex >= BLOCK_OFFSET / TX_OFFSET {
            return Err(RootChainError::InvalidUtxoPos {
                reason: format!("tx index {txindex} out of range"),
            });
        }
        if oindex >= TX_OFFSET {
            return Err(RootChainError::InvalidUtxoPos {
                reason: format!("output index {oindex} out of range"),
            });
        }
        blknum
            .checked_mul(BLOCK_OFFSET)
            .and_then(|b| b.checked_add(txindex * TX_OFFSET + oindex))
            .map(Self)
            .ok_or_else(|| RootChainError::InvalidUtxoPos {
                reason: format!("block number {blknum} overflows"),
            })
    }

    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }

    #[must_use]
    pub const fn blknum(self) -> u64 {
        self.0 / BLOCK_OFFSET
    }

    #[must_use]
    pub const fn txindex(self) -> u64 {
        (self.0 % BLOCK_OFFSET) / TX_OFFSET
    }

    #[must_use]
    pub const fn oindex(self) -> u64 {
        self.0 % TX_OFFSET
    }

    #[must_use]
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }

    /// Whether the position lives in a deposit block.
    #[must_use]
    pub const fn is_deposit(self) -> bool {
        self.blknum() % BLOCK_INTERVAL != 0
    }
}

impl fmt::Display for UtxoPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "utxo:{}/{}/{}",
            self.blknum(),
            self.txindex(),
            self.oindex()
        )
    }
}

// ---------------------------------------------------------------------------
// Address
// ---------------------------------------------------------------------------

/// Identity of a participant: the raw ed25519 verifying key (32 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Default, Serialize, Deserialize)]
pub struct Address(pub [u8; 32]);

impl Address {
    /// The null identity. Owns null outputs; never a valid signer.
    pub const ZERO: Self = Self([0u8; 32]);

    #[must_use]
    pub fn from_verifying_key(key: &VerifyingKey) -> Self {
        Self(key.to_bytes())
    }

    /// Parse the address back into a verifying key.
    pub fn verifying_key(&self) -> Result<VerifyingKey> {
        VerifyingKey::from_bytes(&self.0).map_err(|e| RootChainError::SignatureInvalid {
            reason: format!("{self} is not a valid ed25519 key: {e}"),
        })
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }

    #[must_use]
    pub fn short(&self) -> String {
        hex::encode(&self.0[..4])
    }
}

impl From<&VerifyingKey> for Address {
    fn from(key: &VerifyingKey) -> Self {
        Self::from_verifying_key(key)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(&self.0[..8]))
    }
}

// ---------------------------------------------------------------------------
// Asset
// ---------------------------------------------------------------------------

/// Asset tag (e.g., "ETH", or a token contract name). Each registered asset
/// has its own exit queue.
pub type Asset = String;

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
