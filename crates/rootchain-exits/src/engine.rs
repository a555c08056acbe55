//! The exit game state machine.
//!
//! [`RootChain`] owns every piece of root-chain state: the block ledger,
//! the exit registry, one exit queue per asset, custody totals and the
//! event log. Each operation validates all of its preconditions before it
//! mutates anything, so a rejected call leaves no trace.
//!
//! ```text
//!   deposit ──▶ deposit block ──start_deposit_exit──┐
//!                                                  ├──▶ EXITING ──▶ queue
//!   submit_block ──▶ operator block ──start_exit───┘        │
//!                                                           ├─ challenge_exit ─▶ CHALLENGED
//!                                                           └─ process_exits ──▶ FINALIZED
//! ```

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use rootchain_blocks::BlockLedger;
use rootchain_merkle::{calculate_deposit_root, check_membership};
use rootchain_types::constants::BLOCK_OFFSET;
use rootchain_types::hash::Hash;
use rootchain_types::{
    merkle_leaf, tx_hash, Address, Asset, BlockKind, CallContext, ChildBlock, Exit,
    ExitState, Result, RootChainConfig, RootChainError, RootChainEvent,
    SignatureSet, Transaction, UtxoPos,
};
use rust_decimal::Decimal;

use crate::custody::Custody;
use crate::priority_queue::ExitQueue;
use crate::registry::ExitRegistry;

/// A single root-chain instance.
#[derive(Debug, Clone)]
pub struct RootChain {
    pub(crate) config: RootChainConfig,
    /// `config.min_exit_period` as a ledger-time offset.
    pub(crate) min_exit_period: Duration,
    pub(crate) blocks: BlockLedger,
    pub(crate) exits: ExitRegistry,
    pub(crate) queues: BTreeMap<Asset, ExitQueue>,
    pub(crate) custody: Custody,
    /// Position the next fee exit is recorded under.
    pub(crate) fee_exit_counter: u64,
    pub(crate) events: Vec<RootChainEvent>,
}

impl RootChain {
    /// Create a root chain with an empty block ledger and a queue for the
    /// native asset.
    ///
    /// # Errors
    /// `Configuration` if the configuration is invalid.
    pub fn new(config: RootChainConfig) -> Result<Self> {
        config.validate()?;
        let min_exit_period = config.min_exit_period_delta()?;

        let mut queues = BTreeMap::new();
        queues.insert(config.native_asset.clone(), ExitQueue::new());

        tracing::info!(
            operator = %config.operator,
            min_exit_period_secs = min_exit_period.num_seconds(),
            exit_bond = %config.exit_bond,
            native_asset = %config.native_asset,
            "Root chain created"
        );

        Ok(Self {
            blocks: BlockLedger::new(config.operator),
            config,
            min_exit_period,
            exits: ExitRegistry::new(),
            queues,
            custody: Custody::new(),
            fee_exit_counter: 1,
            events: Vec::new(),
        })
    }

    // =================================================================
    // Operator
    // =================================================================

    /// Anchor an operator block. Returns its block number.
    ///
    /// # Errors
    /// `Unauthorized` if the caller is not the operator.
    pub fn submit_block(&mut self, ctx: &CallContext, root: Hash) -> Result<u64> {
        let blknum = self.blocks.submit_block(ctx.caller, root, ctx.now)?;
        self.events
            .push(RootChainEvent::BlockSubmitted { blknum, root });
        Ok(blknum)
    }

    /// Register an exit queue for a new asset.
    ///
    /// # Errors
    /// - `Unauthorized` if the caller is not the operator
    /// - `AssetAlreadyRegistered` if the asset already has a queue
    /// - `UnknownAsset` for an empty asset tag
    pub fn add_token(&mut self, ctx: &CallContext, asset: &str) -> Result<()> {
        self.require_operator(ctx)?;
        if asset.is_empty() {
            return Err(RootChainError::UnknownAsset(asset.to_string()));
        }
        if self.queues.contains_key(asset) {
            return Err(RootChainError::AssetAlreadyRegistered(asset.to_string()));
        }

        self.queues.insert(asset.to_string(), ExitQueue::new());
        self.events.push(RootChainEvent::TokenAdded {
            asset: asset.to_string(),
        });
        tracing::info!(asset, "Exit queue registered");
        Ok(())
    }

    // =================================================================
    // Deposits
    // =================================================================

    /// Lock the attached value and record a deposit block for it.
    /// Returns the deposit block number.
    ///
    /// # Errors
    /// - `UnknownAsset` if the asset has no queue
    /// - `ZeroAmount` if `amount` is zero
    /// - `InvalidValue` if the attached value differs from `amount`
    /// - `DepositLimitReached` if the current interval is full
    pub fn deposit(&mut self, ctx: &CallContext, asset: &str, amount: Decimal) -> Result<u64> {
        self.require_asset(asset)?;
        Self::require_positive(amount)?;
        Self::require_value(ctx, amount)?;

        let root = calculate_deposit_root(ctx.caller, asset, amount)?;
        let blknum = self.blocks.record_deposit(root, ctx.now)?;
        self.custody.record_inflow(asset, amount);

        self.events.push(RootChainEvent::Deposit {
            depositor: ctx.caller,
            blknum,
            asset: asset.to_string(),
            amount,
        });
        tracing::info!(
            depositor = %ctx.caller,
            blknum,
            asset,
            amount = %amount,
            "Deposit recorded"
        );
        Ok(blknum)
    }

    // =================================================================
    // Exit initiation
    // =================================================================

    /// Start an exit of a deposit. The caller proves ownership by being the
    /// depositor: the stored deposit root must equal the root recomputed
    /// from `(caller, asset, amount)`.
    ///
    /// # Errors
    /// - `InvalidUtxoPos` unless `deposit_pos` is output 0 of tx 0 of a deposit block
    /// - `UnknownAsset`, `ZeroAmount`
    /// - `InvalidValue` unless exactly the exit bond is attached
    /// - `BlockNotFound` if no such deposit block exists
    /// - `InclusionProofInvalid` if the recomputed root differs
    /// - `ExitAlreadyExists` if the deposit was already exited
    /// - `InvalidTimestamp` if the exit time overflows
    pub fn start_deposit_exit(
        &mut self,
        ctx: &CallContext,
        deposit_pos: UtxoPos,
        asset: &str,
        amount: Decimal,
    ) -> Result<()> {
        if !deposit_pos.is_deposit() || deposit_pos.txindex() != 0 || deposit_pos.oindex() != 0 {
            return Err(RootChainError::InvalidUtxoPos {
                reason: format!("{deposit_pos} is not the output of a deposit block"),
            });
        }
        self.require_asset(asset)?;
        Self::require_positive(amount)?;
        self.require_bond(ctx)?;

        let block = *self.blocks.get_block(deposit_pos.blknum())?;
        let expected = calculate_deposit_root(ctx.caller, asset, amount)?;
        if expected != block.root {
            tracing::warn!(
                caller = %ctx.caller,
                utxo_pos = %deposit_pos,
                "Deposit exit does not match recorded deposit"
            );
            return Err(RootChainError::InclusionProofInvalid(deposit_pos));
        }

        let exitable_at = self.after_period(ctx.now)?;
        self.open_exit(ctx, deposit_pos, ctx.caller, asset, amount, exitable_at)
    }

    /// Start an exit of an output of a transaction in an operator block.
    ///
    /// `proof` is the 16-level sibling path of the leaf
    /// `H(H(tx_bytes), signatures.digest())` at the transaction's index.
    ///
    /// # Errors
    /// - `InvalidUtxoPos` if the position names a deposit block or a
    ///   missing output slot
    /// - `InvalidTransaction` / `Serialization` if `tx_bytes` does not decode
    /// - `InvalidValue` unless exactly the exit bond is attached
    /// - `BlockNotFound` if the block was never submitted
    /// - `SignatureInvalid` if an input lacks a verifying spend signature
    /// - `InclusionProofInvalid` if the leaf is not in the block
    /// - `NotOutputOwner`, `ZeroAmount`, `UnknownAsset`, `ExitAlreadyExists`
    /// - `InvalidTimestamp` if the exit time overflows
    pub fn start_exit(
        &mut self,
        ctx: &CallContext,
        utxo_pos: UtxoPos,
        tx_bytes: &[u8],
        proof: &[u8],
        signatures: &SignatureSet,
    ) -> Result<()> {
        if BlockKind::of(utxo_pos.blknum()) == BlockKind::Deposit {
            return Err(RootChainError::InvalidUtxoPos {
                reason: format!("{utxo_pos} is in a deposit block; use a deposit exit"),
            });
        }
        let tx = Transaction::decode(tx_bytes)?;
        self.require_bond(ctx)?;

        let block = *self.blocks.get_block(utxo_pos.blknum())?;
        self.verify_included(&block, utxo_pos, &tx, tx_bytes, proof, signatures)?;

        let output = tx.output(utxo_pos.oindex())?;
        if output.owner != ctx.caller {
            tracing::warn!(caller = %ctx.caller, utxo_pos = %utxo_pos, "Exit by non-owner");
            return Err(RootChainError::NotOutputOwner {
                caller: ctx.caller,
                utxo_pos,
            });
        }
        Self::require_positive(output.amount)?;
        self.require_asset(&output.asset)?;

        let exitable_at = self.exitable_at(block.timestamp, ctx.now)?;
        self.open_exit(
            ctx,
            utxo_pos,
            output.owner,
            &output.asset,
            output.amount,
            exitable_at,
        )
    }

    /// Start an exit of fees collected by the operator. Fee exits live at
    /// positions below the first block, which no transaction can occupy.
    /// Returns the position assigned.
    ///
    /// # Errors
    /// - `Unauthorized` if the caller is not the operator
    /// - `UnknownAsset`, `ZeroAmount`
    /// - `InvalidValue` unless exactly the exit bond is attached
    /// - `CustodyViolation` if the root chain holds less than `amount` of the asset
    /// - `InvalidUtxoPos` once the fee position space is exhausted
    /// - `InvalidTimestamp` if the exit time overflows
    pub fn start_fee_exit(
        &mut self,
        ctx: &CallContext,
        asset: &str,
        amount: Decimal,
    ) -> Result<UtxoPos> {
        self.require_operator(ctx)?;
        self.require_asset(asset)?;
        Self::require_positive(amount)?;
        self.require_bond(ctx)?;
        if let Err(e) = self.custody.ensure_covers(&[(asset, amount)]) {
            tracing::warn!(asset, amount = %amount, error = %e, "Fee exit exceeds custody");
            return Err(e);
        }
        if self.fee_exit_counter >= BLOCK_OFFSET {
            return Err(RootChainError::InvalidUtxoPos {
                reason: "fee exit positions exhausted".into(),
            });
        }

        let utxo_pos = UtxoPos::from_raw(self.fee_exit_counter);
        let created_at = ctx
            .now
            .checked_add_signed(Duration::seconds(1))
            .ok_or_else(|| {
                RootChainError::InvalidTimestamp(format!("{} + 1s overflows", ctx.now))
            })?;
        let exitable_at = self.exitable_at(created_at, ctx.now)?;
        self.open_exit(ctx, utxo_pos, ctx.caller, asset, amount, exitable_at)?;
        self.fee_exit_counter += 1;
        Ok(utxo_pos)
    }

    // =================================================================
    // Queries
    // =================================================================

    /// Exit record for a position, in any state.
    ///
    /// # Errors
    /// `ExitNotFound` if no exit was started for it.
    pub fn get_exit(&self, utxo_pos: UtxoPos) -> Result<&Exit> {
        self.exits.get(utxo_pos)
    }

    /// Committed block.
    ///
    /// # Errors
    /// `BlockNotFound` if nothing is stored at `blknum`.
    pub fn get_block(&self, blknum: u64) -> Result<&ChildBlock> {
        self.blocks.get_block(blknum)
    }

    /// Head of an asset's exit queue: `(utxo_pos, exitable_at)`.
    ///
    /// # Errors
    /// `UnknownAsset` or `EmptyQueue`.
    pub fn get_next_exit(&self, asset: &str) -> Result<(UtxoPos, DateTime<Utc>)> {
        let head = self.queue(asset)?.min()?;
        Ok((head.utxo_pos, head.exitable_at))
    }

    /// Number of entries in an asset's exit queue.
    ///
    /// # Errors
    /// `UnknownAsset` if the asset has no queue.
    pub fn queue_len(&self, asset: &str) -> Result<usize> {
        Ok(self.queue(asset)?.len())
    }

    #[must_use]
    pub fn current_child_block(&self) -> u64 {
        self.blocks.current_child_block()
    }

    #[must_use]
    pub fn current_deposit_block(&self) -> u64 {
        self.blocks.current_deposit_block()
    }

    #[must_use]
    pub fn has_token(&self, asset: &str) -> bool {
        self.queues.contains_key(asset)
    }

    /// Value of `asset` currently held by the root chain.
    #[must_use]
    pub fn custody_of(&self, asset: &str) -> Decimal {
        self.custody.held(asset)
    }

    /// Number of exit records in `state`.
    #[must_use]
    pub fn exits_in(&self, state: ExitState) -> usize {
        self.exits.count_in(state)
    }

    #[must_use]
    pub fn config(&self) -> &RootChainConfig {
        &self.config
    }

    /// Take every event emitted since the last drain, oldest first.
    pub fn drain_events(&mut self) -> Vec<RootChainEvent> {
        std::mem::take(&mut self.events)
    }

    // =================================================================
    // Internals
    // =================================================================

    /// `max(created_at + 2·period, now + period)`: outputs of old blocks
    /// still wait one full period after the exit starts, and outputs of
    /// fresh blocks wait until two periods after their block.
    pub(crate) fn exitable_at(
        &self,
        created_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<DateTime<Utc>> {
        let from_block = self.after_period(self.after_period(created_at)?)?;
        let from_now = self.after_period(now)?;
        Ok(from_block.max(from_now))
    }

    /// `at + period`.
    ///
    /// # Errors
    /// `InvalidTimestamp` if the result does not fit ledger time.
    pub(crate) fn after_period(&self, at: DateTime<Utc>) -> Result<DateTime<Utc>> {
        at.checked_add_signed(self.min_exit_period).ok_or_else(|| {
            RootChainError::InvalidTimestamp(format!(
                "{at} + {}s overflows",
                self.min_exit_period.num_seconds()
            ))
        })
    }

    /// Check that `tx` is committed at `utxo_pos.txindex()` of `block` with
    /// exactly `signatures`, and that every spent input carries a spend
    /// signature that verifies over the transaction hash.
    ///
    /// Only the signature itself is checked. Which address owns each input
    /// is not known here; an exit built on someone else's input is caught
    /// by the challenge game, not by this check.
    pub(crate) fn verify_included(
        &self,
        block: &ChildBlock,
        utxo_pos: UtxoPos,
        tx: &Transaction,
        tx_bytes: &[u8],
        proof: &[u8],
        signatures: &SignatureSet,
    ) -> Result<()> {
        let hash = tx_hash(tx_bytes);
        for (slot, input) in tx.active_inputs() {
            let sig = signatures
                .get(slot)
                .ok_or_else(|| RootChainError::SignatureInvalid {
                    reason: format!("no spend signature for input {slot} ({input})"),
                })?;
            sig.recover(&hash)?;
        }

        let leaf = merkle_leaf(tx_bytes, signatures);
        if !check_membership(&leaf, utxo_pos.txindex(), &block.root, proof) {
            tracing::warn!(utxo_pos = %utxo_pos, "Inclusion proof rejected");
            return Err(RootChainError::InclusionProofInvalid(utxo_pos));
        }
        Ok(())
    }

    fn open_exit(
        &mut self,
        ctx: &CallContext,
        utxo_pos: UtxoPos,
        owner: Address,
        asset: &str,
        amount: Decimal,
        exitable_at: DateTime<Utc>,
    ) -> Result<()> {
        self.exits.ensure_vacant(utxo_pos)?;
        let queue = self
            .queues
            .get_mut(asset)
            .ok_or_else(|| RootChainError::UnknownAsset(asset.to_string()))?;

        let exit = Exit {
            utxo_pos,
            owner,
            asset: asset.to_string(),
            amount,
            bond: ctx.value,
            exitable_at,
            state: ExitState::Exiting,
        };
        let priority = exit.priority();
        self.exits.insert(exit)?;
        queue.insert(priority);
        self.custody
            .record_inflow(&self.config.native_asset, ctx.value);

        self.events.push(RootChainEvent::ExitStarted {
            owner,
            utxo_pos,
            asset: asset.to_string(),
            amount,
            exitable_at,
        });
        tracing::info!(
            owner = %owner,
            utxo_pos = %utxo_pos,
            asset,
            amount = %amount,
            exitable_at = %exitable_at.to_rfc3339(),
            "Exit started"
        );
        Ok(())
    }

    pub(crate) fn queue(&self, asset: &str) -> Result<&ExitQueue> {
        self.queues
            .get(asset)
            .ok_or_else(|| RootChainError::UnknownAsset(asset.to_string()))
    }

    fn require_operator(&self, ctx: &CallContext) -> Result<()> {
        if ctx.caller != self.config.operator {
            tracing::warn!(caller = %ctx.caller, "Operator-only call rejected");
            return Err(RootChainError::Unauthorized { caller: ctx.caller });
        }
        Ok(())
    }

    fn require_asset(&self, asset: &str) -> Result<()> {
        self.queue(asset).map(|_| ())
    }

    fn require_bond(&self, ctx: &CallContext) -> Result<()> {
        Self::require_value(ctx, self.config.exit_bond)
    }

    fn require_value(ctx: &CallContext, expected: Decimal) -> Result<()> {
        if ctx.value != expected {
            return Err(RootChainError::InvalidValue {
                expected,
                attached: ctx.value,
            });
        }
        Ok(())
    }

    fn require_positive(amount: Decimal) -> Result<()> {
        if amount <= Decimal::ZERO {
            return Err(RootChainError::ZeroAmount);
        }
        Ok(())
    }
}
