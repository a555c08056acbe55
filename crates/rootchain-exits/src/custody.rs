//! Custody accounting for value held by the root chain.
//!
//! Invariant enforced on every payout:
//! ```text
//! ∀ asset: Σ(payouts) ≤ Σ(deposits) + Σ(bonds)
//! ```
//!
//! A payout that would break it is refused before any state changes.

use std::collections::HashMap;

use rootchain_types::{Asset, Result, RootChainError};
use rust_decimal::Decimal;

/// Per-asset totals of value received and paid out.
#[derive(Debug, Clone, Default)]
pub struct Custody {
    /// Value received per asset (deposits and bonds).
    inflows: HashMap<Asset, Decimal>,
    /// Value paid out per asset (finalizations and challenge rewards).
    outflows: HashMap<Asset, Decimal>,
}

impl Custody {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record value received.
    pub fn record_inflow(&mut self, asset: &str, amount: Decimal) {
        *self
            .inflows
            .entry(asset.to_string())
            .or_insert(Decimal::ZERO) += amount;
    }

    /// Record value paid out.
    ///
    /// # Errors
    /// `CustodyViolation` if the payout exceeds what is held.
    pub fn record_outflow(&mut self, asset: &str, amount: Decimal) -> Result<()> {
        self.ensure_covers(&[(asset, amount)])?;
        *self
            .outflows
            .entry(asset.to_string())
            .or_insert(Decimal::ZERO) += amount;
        Ok(())
    }

    /// Value currently held for an asset.
    #[must_use]
    pub fn held(&self, asset: &str) -> Decimal {
        self.total_inflow(asset) - self.total_outflow(asset)
    }

    /// Check that a set of payouts, possibly several in one asset, fits
    /// within what is held.
    ///
    /// # Errors
    /// `CustodyViolation` naming an asset that would go negative.
    pub fn ensure_covers(&self, payouts: &[(&str, Decimal)]) -> Result<()> {
        let mut needed: HashMap<&str, Decimal> = HashMap::new();
        for (asset, amount) in payouts {
            *needed.entry(*asset).or_insert(Decimal::ZERO) += *amount;
        }
        for (asset, amount) in needed {
            let held = self.held(asset);
            if amount > held {
                return Err(RootChainError::CustodyViolation {
                    reason: format!(
                        "Asset {asset}: payout {amount} exceeds held {held} \
                         (in={}, out={})",
                        self.total_inflow(asset),
                        self.total_outflow(asset),
                    ),
                });
            }
        }
        Ok(())
    }

    /// Total received for an asset.
    #[must_use]
    pub fn total_inflow(&self, asset: &str) -> Decimal {
        self.inflows.get(asset).copied().unwrap_or(Decimal::ZERO)
    }

    /// Total paid out for an asset.
    #[must_use]
    pub fn total_outflow(&self, asset: &str) -> Decimal {
        self.outflows.get(asset).copied().unwrap_or(Decimal::ZERO)
    }
}
