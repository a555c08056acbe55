//! # Exit — a claim to withdraw one output back to the root chain
//!
//! ## State Machine
//!
//! ```text
//!   (none) ── start ──▶ ┌─────────┐  process_exits  ┌───────────┐
//!                       │ EXITING ├────────────────▶│ FINALIZED │
//!                       └────┬────┘                 └───────────┘
//!                            │ challenge
//!                            ▼
//!                      ┌────────────┐
//!                      │ CHALLENGED │
//!                      └────────────┘
//! ```
//!
//! Both end states are tombstones: the record stays in the registry forever
//! so its output position can never be exited again.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{Address, Asset, UtxoPos};

/// Lifecycle state of an exit.
///
/// Transitions are **monotonic**:
/// - `Exiting → Finalized` (matured and paid)
/// - `Exiting → Challenged` (proven spent; bond paid to the challenger)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExitState {
    /// In flight, waiting for maturity. Challengeable.
    Exiting,
    /// Revoked by a successful challenge. Never paid.
    Challenged,
    /// Paid out to the owner.
    Finalized,
}

impl ExitState {
    /// Can an exit move from this state to `target`?
    #[must_use]
    pub fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Exiting, Self::Challenged | Self::Finalized)
        )
    }
}

impl std::fmt::Display for ExitState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Exiting => write!(f, "EXITING"),
            Self::Challenged => write!(f, "CHALLENGED"),
            Self::Finalized => write!(f, "FINALIZED"),
        }
    }
}

/// Queue ordering key: earliest `exitable_at` first, ties broken by the
/// output position. Positions are unique, so the order is total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ExitPriority {
    pub exitable_at: DateTime<Utc>,
    pub utxo_pos: UtxoPos,
}

impl ExitPriority {
    #[must_use]
    pub fn new(exitable_at: DateTime<Utc>, utxo_pos: UtxoPos) -> Self {
        Self {
            exitable_at,
            utxo_pos,
        }
    }

    /// Packed integer form `exitable_at_secs << 64 | utxo_pos`. Same order as
    /// the struct for timestamps after the UNIX epoch.
    #[must_use]
    pub fn packed(&self) -> u128 {
        let secs = u64::try_from(self.exitable_at.timestamp()).unwrap_or(0);
        (u128::from(secs) << 64) | u128::from(self.utxo_pos.raw())
    }
}

impl std::fmt::Display for ExitPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.utxo_pos, self.exitable_at.to_rfc3339())
    }
}

/// An exit record, keyed by output position in the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exit {
    /// The output being withdrawn.
    pub utxo_pos: UtxoPos,
    /// Who receives the payout.
    pub owner: Address,
    /// Asset of the exited value; selects the exit queue.
    pub asset: Asset,
    /// Exited amount. Always non-zero.
    pub amount: Decimal,
    /// Bond locked by the owner, in the native asset.
    pub bond: Decimal,
    /// Earliest ledger time at which the exit can be paid.
    pub exitable_at: DateTime<Utc>,
    /// Current lifecycle state.
    pub state: ExitState,
}

impl Exit {
    #[must_use]
    pub fn priority(&self) -> ExitPriority {
        ExitPriority::new(self.exitable_at, self.utxo_pos)
    }

    #[must_use]
    pub fn is_exiting(&self) -> bool {
        self.state == ExitState::Exiting
    }

    /// Transition to CHALLENGED.
    ///
    /// # Errors
    /// `ExitNotActive` unless the exit is still EXITING.
    pub fn mark_challenged(&mut self) -> crate::Result<()> {
        self.transition(ExitState::Challenged)
    }

    /// Transition to FINALIZED.
    ///
    /// # Errors
    /// `ExitNotActive` unless the exit is still EXITING.
    pub fn mark_finalized(&mut self) -> crate::Result<()> {
        self.transition(ExitState::Finalized)
    }

    fn transition(&mut self, target: ExitState) -> crate::Result<()> {
        if !self.state.can_transition_to(target) {
            return Err(crate::RootChainError::ExitNotActive {
                utxo_pos: self.utxo_pos,
                state: self.state,
            });
        }
        self.state = target;
        Ok(())
    }
}
