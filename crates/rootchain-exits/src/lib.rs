//! # rootchain-exits
//!
//! **Exit game**: deposits, exit initiation, challenges and finalization.
//!
//! ## Architecture
//!
//! [`RootChain`] is the single state machine. It composes:
//! 1. **BlockLedger** (`rootchain-blocks`): operator and deposit blocks
//! 2. **ExitRegistry**: one record per exited output, never deleted
//! 3. **ExitQueue**: per-asset min-heap ordered by `(exitable_at, utxo_pos)`
//! 4. **Custody**: per-asset totals; no payout exceeds what is held
//!
//! ## Exit Flow
//!
//! ```text
//! deposit / submit_block → start_(deposit_)exit → EXITING
//!     → challenge_exit → CHALLENGED (bond to challenger)
//!     → process_exits  → FINALIZED  (amount + bond to owner)
//! ```
//!
//! Value leaves the root chain only through [`ValueTransfer`], and only
//! after the calling operation has committed all of its state changes.
//!
//! [`ValueTransfer`]: rootchain_types::ValueTransfer

pub mod challenge;
pub mod custody;
pub mod engine;
pub mod finalization;
pub mod ledger;
pub mod priority_queue;
pub mod registry;

pub use challenge::ChallengeEvidence;
pub use custody::Custody;
pub use engine::RootChain;
pub use ledger::InMemoryLedger;
pub use priority_queue::ExitQueue;
pub use registry::ExitRegistry;
