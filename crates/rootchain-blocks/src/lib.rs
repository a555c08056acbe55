//! # rootchain-blocks
//!
//! **Append-only block ledger** for the root chain.
//!
//! Block numbers are split into intervals of `BLOCK_INTERVAL`:
//!
//! ```text
//!   0 ........ 999 | 1000 ........ 1999 | 2000 ...
//!   ^deposits^  op   ^deposits^     op
//! ```
//!
//! The operator submits a root at every interval multiple. Deposits made
//! while the next operator block is `N` are stored at
//! `N - BLOCK_INTERVAL + 1`, `+ 2`, ... up to `N - 1`, so the two kinds never
//! collide and deposit blocks stay ordered before the operator block that
//! follows them.

pub mod ledger;

pub use ledger::BlockLedger;
