//! Error types for the root-chain exit game.
//!
//! All errors use the `RC_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Block ledger errors
//! - 2xx: Deposit / attached value errors
//! - 3xx: Exit initiation errors
//! - 4xx: Challenge errors
//! - 5xx: Queue / asset registry errors
//! - 9xx: General / internal errors
//!
//! Every variant is a precondition failure: the rejected operation leaves
//! no state behind.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::{Address, ExitState, UtxoPos};

/// Central error enum for all root-chain operations.
#[derive(Debug, Error)]
pub enum RootChainError {
    // =================================================================
    // Block Ledger Errors (1xx)
    // =================================================================
    /// A caller other than the operator attempted an operator-only action.
    #[error("RC_ERR_100: Unauthorized: {caller} is not the operator")]
    Unauthorized { caller: Address },

    /// No block is stored under this number.
    #[error("RC_ERR_101: Block not found: {0}")]
    BlockNotFound(u64),

    // =================================================================
    // Deposit / Value Errors (2xx)
    // =================================================================
    /// Attached value does not match the declared amount or the exit bond.
    #[error("RC_ERR_200: Invalid attached value: expected {expected}, got {attached}")]
    InvalidValue { expected: Decimal, attached: Decimal },

    /// All deposit slots between two operator blocks are taken.
    #[error("RC_ERR_201: Deposit limit reached for the current block interval")]
    DepositLimitReached,

    /// Deposits and exits must carry a strictly positive amount.
    #[error("RC_ERR_202: Amount must be non-zero")]
    ZeroAmount,

    /// A base-ledger account cannot cover the value it tries to attach.
    #[error("RC_ERR_203: Insufficient balance: need {needed}, have {available}")]
    InsufficientBalance { needed: Decimal, available: Decimal },

    // =================================================================
    // Exit Errors (3xx)
    // =================================================================
    /// The Merkle (or deposit-root) inclusion check failed.
    #[error("RC_ERR_300: Inclusion proof invalid for {0}")]
    InclusionProofInvalid(UtxoPos),

    /// A required signature is missing or does not verify.
    #[error("RC_ERR_301: Signature invalid: {reason}")]
    SignatureInvalid { reason: String },

    /// The caller does not own the output being exited.
    #[error("RC_ERR_302: {caller} does not own output {utxo_pos}")]
    NotOutputOwner { caller: Address, utxo_pos: UtxoPos },

    /// An exit was already started for this output. Identifiers are never reused.
    #[error("RC_ERR_303: Exit already exists for {0}")]
    ExitAlreadyExists(UtxoPos),

    /// No exit has ever been started for this output.
    #[error("RC_ERR_304: Exit not found: {0}")]
    ExitNotFound(UtxoPos),

    /// The exit is no longer in flight.
    #[error("RC_ERR_305: Exit {utxo_pos} is {state}, not EXITING")]
    ExitNotActive { utxo_pos: UtxoPos, state: ExitState },

    /// The output position cannot be packed or does not name a usable output.
    #[error("RC_ERR_306: Invalid output position: {reason}")]
    InvalidUtxoPos { reason: String },

    /// The transaction decoded but is structurally unusable.
    #[error("RC_ERR_307: Invalid transaction: {reason}")]
    InvalidTransaction { reason: String },

    // =================================================================
    // Challenge Errors (4xx)
    // =================================================================
    /// Confirmation signature or input linkage does not match the exit.
    #[error("RC_ERR_400: Challenge mismatch: {reason}")]
    ChallengeMismatch { reason: String },

    // =================================================================
    // Queue / Asset Errors (5xx)
    // =================================================================
    /// No exit queue exists for this asset.
    #[error("RC_ERR_500: Unknown asset: {0}")]
    UnknownAsset(String),

    /// The exit queue has no entries.
    #[error("RC_ERR_501: Exit queue is empty")]
    EmptyQueue,

    /// The asset already has an exit queue.
    #[error("RC_ERR_502: Asset already registered: {0}")]
    AssetAlreadyRegistered(String),

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// Paying out would take more value than the root chain holds.
    #[error("RC_ERR_900: Custody violation: {reason}")]
    CustodyViolation { reason: String },

    /// Serialization / deserialization error.
    #[error("RC_ERR_901: Serialization error: {0}")]
    Serialization(String),

    /// Configuration error (invalid values, missing fields, etc.).
    #[error("RC_ERR_902: Configuration error: {0}")]
    Configuration(String),

    /// A computed ledger time does not fit the timestamp range.
    #[error("RC_ERR_903: Invalid timestamp: {0}")]
    InvalidTimestamp(String),
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, RootChainError>;

impl From<serde_json::Error> for RootChainError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_contains_prefix() {
        let err = RootChainError::ExitAlreadyExists(UtxoPos::from_raw(1_000_000_000));
        let msg = format!("{err}");
        assert!(msg.starts_with("RC_ERR_303"), "Got: {msg}");
        assert!(msg.contains("1000"), "Got: {msg}");
    }

    #[test]
    fn invalid_value_display() {
        let err = RootChainError::InvalidValue {
            expected: Decimal::new(50, 0),
            attached: Decimal::new(49, 0),
        };
        let msg = format!("{err}");
        assert!(msg.contains("RC_ERR_200"));
        assert!(msg.contains("50"));
        assert!(msg.contains("49"));
    }

    #[test]
    fn exit_not_active_names_state() {
        let err = RootChainError::ExitNotActive {
            utxo_pos: UtxoPos::from_raw(1),
            state: ExitState::Challenged,
        };
        assert!(format!("{err}").contains("CHALLENGED"));
    }

    #[test]
    fn serde_json_error_converts() {
        let parse: std::result::Result<u64, _> = serde_json::from_str("not json");
        let err: RootChainError = parse.unwrap_err().into();
        assert!(matches!(err, RootChainError::Serialization(_)));
    }

    #[test]
    fn all_errors_have_rc_err_prefix() {
        let errors: Vec<Box<dyn std::error::Error>> = vec![
            Box::new(RootChainError::Unauthorized {
                caller: Address::ZERO,
            }),
            Box::new(RootChainError::DepositLimitReached),
            Box::new(RootChainError::ZeroAmount),
            Box::new(RootChainError::EmptyQueue),
            Box::new(RootChainError::UnknownAsset("DAI".into())),
            Box::new(RootChainError::ChallengeMismatch {
                reason: "test".into(),
            }),
            Box::new(RootChainError::Configuration("test".into())),
            Box::new(RootChainError::InvalidTimestamp("test".into())),
        ];
        for err in errors {
            let msg = format!("{err}");
            assert!(
                msg.starts_with("RC_ERR_"),
                "Error missing RC_ERR_ prefix: {msg}"
            );
        }
    }
}
