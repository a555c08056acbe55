//! The boundary to the base ledger.
//!
//! The base ledger authenticates callers, carries attached value, provides a
//! monotonic clock, and moves value. The root chain never reads any of this
//! from ambient state: each call receives a [`CallContext`], and outgoing
//! value goes through a [`ValueTransfer`] implementation.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{Address, Asset};

/// Per-call facts attested by the base ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallContext {
    /// Authenticated caller identity.
    pub caller: Address,
    /// Value attached to the call, denominated in the asset the operation
    /// expects (the deposit asset for deposits, the native asset for bonds).
    pub value: Decimal,
    /// Ledger time at the moment of the call.
    pub now: DateTime<Utc>,
}

impl CallContext {
    /// A call with no attached value.
    #[must_use]
    pub fn new(caller: Address, now: DateTime<Utc>) -> Self {
        Self {
            caller,
            value: Decimal::ZERO,
            now,
        }
    }

    /// The same call with `value` attached.
    #[must_use]
    pub fn with_value(mut self, value: Decimal) -> Self {
        self.value = value;
        self
    }
}

/// A single outgoing value transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payout {
    pub to: Address,
    pub asset: Asset,
    pub amount: Decimal,
}

/// The base ledger's value-transfer primitive.
///
/// The root chain calls this only after every state change of the current
/// operation is committed, so an implementation that re-enters the root
/// chain observes consistent state.
pub trait ValueTransfer {
    fn transfer(&mut self, payout: &Payout);
}

impl ValueTransfer for Vec<Payout> {
    fn transfer(&mut self, payout: &Payout) {
        self.push(payout.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_value_keeps_caller_and_time() {
        let now = Utc::now();
        let ctx = CallContext::new(Address([1u8; 32]), now).with_value(Decimal::TEN);
        assert_eq!(ctx.caller, Address([1u8; 32]));
        assert_eq!(ctx.now, now);
        assert_eq!(ctx.value, Decimal::TEN);
    }

    #[test]
    fn vec_collects_transfers() {
        let mut sink: Vec<Payout> = Vec::new();
        let payout = Payout {
            to: Address([2u8; 32]),
            asset: "ETH".into(),
            amount: Decimal::ONE,
        };
        sink.transfer(&payout);
        assert_eq!(sink, vec![payout]);
    }
}
