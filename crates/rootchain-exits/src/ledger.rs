//! In-memory base ledger.
//!
//! Stands in for the chain the root chain is deployed on: it holds
//! per-(address, asset) balances, debits callers for the value they attach,
//! and receives payouts through [`ValueTransfer`].

use std::collections::HashMap;

use rootchain_types::{Address, Asset, Payout, Result, RootChainError, ValueTransfer};
use rust_decimal::Decimal;

/// Balances of every account on the base ledger.
#[derive(Debug, Clone, Default)]
pub struct InMemoryLedger {
    balances: HashMap<(Address, Asset), Decimal>,
    /// Every payout received, in order.
    payouts: Vec<Payout>,
}

impl InMemoryLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit an account from outside the system.
    pub fn fund(&mut self, owner: Address, asset: &str, amount: Decimal) {
        *self
            .balances
            .entry((owner, asset.to_string()))
            .or_insert(Decimal::ZERO) += amount;
    }

    /// Debit `amount` from `owner` so it can be attached to a call.
    ///
    /// # Errors
    /// `InsufficientBalance` if the account cannot cover it.
    pub fn attach(&mut self, owner: Address, asset: &str, amount: Decimal) -> Result<Decimal> {
        let available = self.balance(owner, asset);
        if available < amount {
            return Err(RootChainError::InsufficientBalance {
                needed: amount,
                available,
            });
        }
        self.balances
            .insert((owner, asset.to_string()), available - amount);
        Ok(amount)
    }

    /// Return attached value to its owner after a rejected call.
    pub fn refund(&mut self, owner: Address, asset: &str, amount: Decimal) {
        self.fund(owner, asset, amount);
    }

    #[must_use]
    pub fn balance(&self, owner: Address, asset: &str) -> Decimal {
        self.balances
            .get(&(owner, asset.to_string()))
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    /// Payouts received so far.
    #[must_use]
    pub fn payouts(&self) -> &[Payout] {
        &self.payouts
    }

    /// Sum of all account balances in one asset.
    #[must_use]
    pub fn total(&self, asset: &str) -> Decimal {
        self.balances
            .iter()
            .filter(|((_, a), _)| a == asset)
            .map(|(_, amount)| *amount)
            .sum()
    }
}

impl ValueTransfer for InMemoryLedger {
    fn transfer(&mut self, payout: &Payout) {
        self.fund(payout.to, &payout.asset, payout.amount);
        self.payouts.push(payout.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> Address {
        Address([1u8; 32])
    }

    #[test]
    fn fund_and_attach() {
        let mut ledger = InMemoryLedger::new();
        ledger.fund(alice(), "ETH", Decimal::new(100, 0));
        let attached = ledger.attach(alice(), "ETH", Decimal::new(40, 0)).unwrap();
        assert_eq!(attached, Decimal::new(40, 0));
        assert_eq!(ledger.balance(alice(), "ETH"), Decimal::new(60, 0));
    }

    #[test]
    fn attach_more_than_available() {
        let mut ledger = InMemoryLedger::new();
        ledger.fund(alice(), "ETH", Decimal::new(10, 0));
        let err = ledger.attach(alice(), "ETH", Decimal::new(11, 0)).unwrap_err();
        assert!(matches!(err, RootChainError::InsufficientBalance { .. }));
        assert_eq!(ledger.balance(alice(), "ETH"), Decimal::new(10, 0));
    }

    #[test]
    fn transfers_credit_and_log() {
        let mut ledger = InMemoryLedger::new();
        let payout = Payout {
            to: alice(),
            asset: "OMG".into(),
            amount: Decimal::new(7, 0),
        };
        ledger.transfer(&payout);
        assert_eq!(ledger.balance(alice(), "OMG"), Decimal::new(7, 0));
        assert_eq!(ledger.payouts(), &[payout]);
        assert_eq!(ledger.total("OMG"), Decimal::new(7, 0));
    }

    #[test]
    fn refund_restores_balance() {
        let mut ledger = InMemoryLedger::new();
        ledger.fund(alice(), "ETH", Decimal::new(10, 0));
        let v = ledger.attach(alice(), "ETH", Decimal::new(10, 0)).unwrap();
        ledger.refund(alice(), "ETH", v);
        assert_eq!(ledger.balance(alice(), "ETH"), Decimal::new(10, 0));
    }
}
