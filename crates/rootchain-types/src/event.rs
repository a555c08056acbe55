//! Events emitted by the root chain.
//!
//! Every state-changing operation appends one [`RootChainEvent`] to an
//! append-only log that watchers (operators, challengers, wallets) consume.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::hash::Hash;
use crate::{Address, Asset, UtxoPos};

/// Something observable that happened on the root chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RootChainEvent {
    /// The operator anchored a new child block.
    BlockSubmitted { blknum: u64, root: Hash },
    /// A deposit block was synthesized.
    Deposit {
        depositor: Address,
        blknum: u64,
        asset: Asset,
        amount: Decimal,
    },
    /// A new exit queue was registered.
    TokenAdded { asset: Asset },
    /// An exit entered the queue.
    ExitStarted {
        owner: Address,
        utxo_pos: UtxoPos,
        asset: Asset,
        amount: Decimal,
        exitable_at: DateTime<Utc>,
    },
    /// An exit was proven spent and revoked.
    ExitChallenged {
        utxo_pos: UtxoPos,
        challenger: Address,
    },
    /// An exit matured and was paid.
    ExitFinalized {
        utxo_pos: UtxoPos,
        owner: Address,
        asset: Asset,
        amount: Decimal,
    },
}

impl RootChainEvent {
    /// Short, stable name of the event kind.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::BlockSubmitted { .. } => "BLOCK_SUBMITTED",
            Self::Deposit { .. } => "DEPOSIT",
            Self::TokenAdded { .. } => "TOKEN_ADDED",
            Self::ExitStarted { .. } => "EXIT_STARTED",
            Self::ExitChallenged { .. } => "EXIT_CHALLENGED",
            Self::ExitFinalized { .. } => "EXIT_FINALIZED",
        }
    }
}

impl std::fmt::Display for RootChainEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlockSubmitted { blknum, .. } => write!(f, "{} #{blknum}", self.kind()),
            Self::Deposit { blknum, amount, .. } => {
                write!(f, "{} #{blknum} {amount}", self.kind())
            }
            Self::TokenAdded { asset } => write!(f, "{} {asset}", self.kind()),
            Self::ExitStarted { utxo_pos, .. }
            | Self::ExitChallenged { utxo_pos, .. }
            | Self::ExitFinalized { utxo_pos, .. } => write!(f, "{} {utxo_pos}", self.kind()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_display() {
        let ev = RootChainEvent::BlockSubmitted {
            blknum: 1000,
            root: [0u8; 32],
        };
        assert_eq!(format!("{ev}"), "BLOCK_SUBMITTED #1000");

        let ev = RootChainEvent::ExitChallenged {
            utxo_pos: UtxoPos::from_raw(1_000_000_000),
            challenger: Address::ZERO,
        };
        assert_eq!(format!("{ev}"), "EXIT_CHALLENGED utxo:1/0/0");
    }

    #[test]
    fn event_serde_roundtrip() {
        let ev = RootChainEvent::Deposit {
            depositor: Address([3u8; 32]),
            blknum: 1,
            asset: "ETH".into(),
            amount: Decimal::new(50, 0),
        };
        let json = serde_json::to_string(&ev).unwrap();
        let back: RootChainEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(ev, back);
    }
}
