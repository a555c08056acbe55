//! Configuration for a root-chain instance.

use std::time::Duration;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{constants, Address, Result, RootChainError};

/// Configuration for a single root chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RootChainConfig {
    /// The only identity allowed to submit blocks, add tokens and start fee exits.
    pub operator: Address,
    /// Minimum challenge period. Exits from operator blocks wait at least
    /// this long after they start, and twice this long after their block.
    pub min_exit_period: Duration,
    /// Bond attached to every exit, in the native asset.
    pub exit_bond: Decimal,
    /// Tag of the native asset; its exit queue exists from construction.
    pub native_asset: String,
}

impl RootChainConfig {
    /// Default configuration for the given operator.
    #[must_use]
    pub fn new(operator: Address) -> Self {
        Self {
            operator,
            min_exit_period: Duration::from_secs(constants::MIN_EXIT_PERIOD_SECS),
            exit_bond: Decimal::new(
                constants::DEFAULT_EXIT_BOND_UNITS,
                constants::DEFAULT_EXIT_BOND_SCALE,
            ),
            native_asset: constants::NATIVE_ASSET.to_string(),
        }
    }

    /// The challenge period as a ledger-time offset.
    ///
    /// # Errors
    /// `Configuration` if the period does not fit a ledger-time offset.
    pub fn min_exit_period_delta(&self) -> Result<chrono::Duration> {
        chrono::Duration::from_std(self.min_exit_period).map_err(|e| {
            RootChainError::Configuration(format!(
                "min_exit_period {:?} out of range: {e}",
                self.min_exit_period
            ))
        })
    }

    /// Reject configurations the exit game cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.operator.is_zero() {
            return Err(RootChainError::Configuration(
                "operator must not be the null address".into(),
            ));
        }
        if self.min_exit_period.is_zero() {
            return Err(RootChainError::Configuration(
                "min_exit_period must be non-zero".into(),
            ));
        }
        if self.min_exit_period.as_secs() > constants::MAX_EXIT_PERIOD_SECS {
            return Err(RootChainError::Configuration(format!(
                "min_exit_period {:?} exceeds {}s",
                self.min_exit_period,
                constants::MAX_EXIT_PERIOD_SECS
            )));
        }
        self.min_exit_period_delta()?;
        if self.exit_bond.is_sign_negative() && !self.exit_bond.is_zero() {
            return Err(RootChainError::Configuration(format!(
                "exit_bond must not be negative, got {}",
                self.exit_bond
            )));
        }
        if self.native_asset.is_empty() {
            return Err(RootChainError::Configuration(
                "native_asset must not be empty".into(),
            ));
        }
        Ok(())
    }
}
