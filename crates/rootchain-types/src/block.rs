//! Child-chain block commitments as anchored on the root chain.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::BLOCK_INTERVAL;
use crate::hash::Hash;

/// Where a block came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlockKind {
    /// Submitted by the operator; root of a full transaction tree.
    Operator,
    /// Synthesized on-chain for a single deposit.
    Deposit,
}

impl BlockKind {
    /// Classify a block number: operator blocks sit on interval multiples.
    #[must_use]
    pub fn of(blknum: u64) -> Self {
        if blknum % BLOCK_INTERVAL == 0 {
            Self::Operator
        } else {
            Self::Deposit
        }
    }
}

impl std::fmt::Display for BlockKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Operator => write!(f, "OPERATOR"),
            Self::Deposit => write!(f, "DEPOSIT"),
        }
    }
}

/// A committed block: Merkle root plus the ledger time it was recorded.
/// Immutable once written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildBlock {
    pub root: Hash,
    pub timestamp: DateTime<Utc>,
}
