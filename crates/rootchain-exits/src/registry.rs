//! Exit registry — output position → exit record.
//!
//! Records are never removed. A challenged or finalized exit stays as a
//! tombstone so its position can never be exited again.
//!
//! ```text
//!   (absent) ──insert──▶ EXITING ──challenge──▶ CHALLENGED
//!                           │
//!                           └────finalize────▶ FINALIZED
//! ```

use std::collections::HashMap;

use rootchain_types::{Exit, ExitState, Result, RootChainError, UtxoPos};

/// All exits ever started, keyed by output position.
#[derive(Debug, Clone, Default)]
pub struct ExitRegistry {
    exits: HashMap<UtxoPos, Exit>,
}

impl ExitRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject a position that already has a record, in any state.
    ///
    /// # Errors
    /// `ExitAlreadyExists` if a record exists.
    pub fn ensure_vacant(&self, utxo_pos: UtxoPos) -> Result<()> {
        if self.exits.contains_key(&utxo_pos) {
            return Err(RootChainError::ExitAlreadyExists(utxo_pos));
        }
        Ok(())
    }

    /// Store a new exit record.
    ///
    /// # Errors
    /// `ExitAlreadyExists` if the position already has a record.
    pub fn insert(&mut self, exit: Exit) -> Result<()> {
        self.ensure_vacant(exit.utxo_pos)?;
        self.exits.insert(exit.utxo_pos, exit);
        Ok(())
    }

    /// Look up a record.
    ///
    /// # Errors
    /// `ExitNotFound` if no exit was ever started for the position.
    pub fn get(&self, utxo_pos: UtxoPos) -> Result<&Exit> {
        self.exits
            .get(&utxo_pos)
            .ok_or(RootChainError::ExitNotFound(utxo_pos))
    }

    /// Mutable lookup.
    ///
    /// # Errors
    /// `ExitNotFound` if no exit was ever started for the position.
    pub fn get_mut(&mut self, utxo_pos: UtxoPos) -> Result<&mut Exit> {
        self.exits
            .get_mut(&utxo_pos)
            .ok_or(RootChainError::ExitNotFound(utxo_pos))
    }

    /// Look up a record that must still be EXITING.
    ///
    /// # Errors
    /// `ExitNotFound` or `ExitNotActive`.
    pub fn get_active(&self, utxo_pos: UtxoPos) -> Result<&Exit> {
        let exit = self.get(utxo_pos)?;
        if !exit.is_exiting() {
            return Err(RootChainError::ExitNotActive {
                utxo_pos,
                state: exit.state,
            });
        }
        Ok(exit)
    }

    /// Number of records (including tombstones).
    #[must_use]
    pub fn len(&self) -> usize {
        self.exits.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.exits.is_empty()
    }

    /// Number of records in `state`.
    #[must_use]
    pub fn count_in(&self, state: ExitState) -> usize {
        self.exits.values().filter(|e| e.state == state).count()
    }
}
