//! # rootchain-types
//!
//! Shared types, errors, and configuration for the **root-chain exit game**.
//!
//! This crate is the leaf dependency of the workspace — every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`UtxoPos`], [`Address`], [`Asset`]
//! - **Blocks**: [`ChildBlock`], [`BlockKind`]
//! - **Exits**: [`Exit`], [`ExitState`], [`ExitPriority`]
//! - **Transactions**: [`Transaction`], [`TxOutput`] and the commitment helpers
//! - **Signatures**: [`TxSignature`], [`SignatureSet`]
//! - **Ledger boundary**: [`CallContext`], [`Payout`], [`ValueTransfer`]
//! - **Events**: [`RootChainEvent`]
//! - **Configuration**: [`RootChainConfig`]
//! - **Errors**: [`RootChainError`] with `RC_ERR_` prefix codes
//! - **Constants**: system-wide limits and defaults

pub mod block;
pub mod config;
pub mod constants;
pub mod context;
pub mod error;
pub mod event;
pub mod exit;
pub mod hash;
pub mod ids;
pub mod signature;
pub mod transaction;

#[cfg(any(test, feature = "test-helpers"))]
pub mod accounts;

// Re-export all primary types at crate root for ergonomic imports:
//   use rootchain_types::{UtxoPos, Exit, Transaction, ...};

pub use block::*;
pub use config::*;
pub use context::*;
pub use error::*;
pub use event::*;
pub use exit::*;
pub use hash::Hash;
pub use ids::*;
pub use signature::*;
pub use transaction::*;

#[cfg(any(test, feature = "test-helpers"))]
pub use accounts::TestAccount;

// Constants are accessed via `rootchain_types::constants::FOO`
// (not re-exported to avoid name collisions).
