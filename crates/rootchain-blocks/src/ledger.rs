//! Block ledger — block number → (root, timestamp).
//!
//! Blocks are written once and never modified. Only the operator may append
//! operator blocks; deposit blocks are appended by the exit game on behalf
//! of depositors.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rootchain_types::constants::BLOCK_INTERVAL;
use rootchain_types::hash::Hash;
use rootchain_types::{Address, BlockKind, ChildBlock, Result, RootChainError};
use serde::{Deserialize, Serialize};

/// Append-only store of child-chain block commitments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockLedger {
    /// Sole identity allowed to submit operator blocks.
    operator: Address,
    /// All recorded blocks, keyed by block number.
    blocks: BTreeMap<u64, ChildBlock>,
    /// Number the next operator block will receive.
    current_child_block: u64,
    /// Offset of the next deposit block within the current interval.
    deposit_counter: u64,
}

impl BlockLedger {
    /// Create an empty ledger. The first operator block is `BLOCK_INTERVAL`.
    #[must_use]
    pub fn new(operator: Address) -> Self {
        Self {
            operator,
            blocks: BTreeMap::new(),
            current_child_block: BLOCK_INTERVAL,
            deposit_counter: 1,
        }
    }

    /// Record an operator block at the current child-block number.
    ///
    /// Returns the number the block was stored at.
    ///
    /// # Errors
    /// `Unauthorized` if `caller` is not the operator.
    pub fn submit_block(&mut self, caller: Address, root: Hash, now: DateTime<Utc>) -> Result<u64> {
        if caller != self.operator {
            tracing::warn!(caller = %caller, "Rejected block submission from non-operator");
            return Err(RootChainError::Unauthorized { caller });
        }

        let blknum = self.current_child_block;
        let next = blknum
            .checked_add(BLOCK_INTERVAL)
            .ok_or_else(|| RootChainError::InvalidUtxoPos {
                reason: format!("block number overflow after {blknum}"),
            })?;

        self.blocks.insert(
            blknum,
            ChildBlock {
                root,
                timestamp: now,
            },
        );
        self.current_child_block = next;
        self.deposit_counter = 1;

        tracing::info!(blknum, root = %hex::encode(root), "Operator block submitted");
        Ok(blknum)
    }

    /// Record a deposit block inside the current interval.
    ///
    /// Returns the number the block was stored at.
    ///
    /// # Errors
    /// `DepositLimitReached` once `BLOCK_INTERVAL - 1` deposits have been
    /// recorded since the last operator block.
    pub fn record_deposit(&mut self, root: Hash, now: DateTime<Utc>) -> Result<u64> {
        if self.deposit_counter >= BLOCK_INTERVAL {
            tracing::warn!(
                current_child_block = self.current_child_block,
                "Deposit limit reached for interval"
            );
            return Err(RootChainError::DepositLimitReached);
        }

        let blknum = self.current_deposit_block();
        self.blocks.insert(
            blknum,
            ChildBlock {
                root,
                timestamp: now,
            },
        );
        self.deposit_counter += 1;

        tracing::debug!(blknum, root = %hex::encode(root), "Deposit block recorded");
        Ok(blknum)
    }

    /// Block stored at `blknum`.
    ///
    /// # Errors
    /// `BlockNotFound` if nothing was recorded there.
    pub fn get_block(&self, blknum: u64) -> Result<&ChildBlock> {
        self.blocks
            .get(&blknum)
            .ok_or(RootChainError::BlockNotFound(blknum))
    }

    /// Number the next operator block will receive.
    #[must_use]
    pub fn current_child_block(&self) -> u64 {
        self.current_child_block
    }

    /// Number the next deposit block will receive.
    #[must_use]
    pub fn current_deposit_block(&self) -> u64 {
        self.current_child_block - BLOCK_INTERVAL + self.deposit_counter
    }

    /// The operator identity.
    #[must_use]
    pub fn operator(&self) -> Address {
        self.operator
    }

    /// Number of blocks recorded so far (operator and deposit).
    #[must_use]
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Whether no block has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Recorded blocks of one kind, in block-number order.
    pub fn blocks_of(&self, kind: BlockKind) -> impl Iterator<Item = (u64, &ChildBlock)> + '_ {
        self.blocks
            .iter()
            .filter(move |(n, _)| BlockKind::of(**n) == kind)
            .map(|(n, b)| (*n, b))
    }
}
