//! Child-chain transaction model and codec.
//!
//! A transaction has two input slots (prior output positions, [`UtxoPos::NULL`]
//! when unused) and four output slots (owner, asset, amount; null outputs
//! have a zero owner and a zero amount). The root chain only ever decodes
//! transactions; building them is client-side work.
//!
//! ## Commitments
//!
//! ```text
//! tx_hash            = SHA-256(tx_bytes)
//! merkle leaf        = H(tx_hash, SHA-256(signatures))     operator blocks
//! deposit leaf       = tx_hash                             deposit blocks
//! confirmation hash  = H(tx_hash, block_root)
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::{TX_INPUTS, TX_OUTPUTS};
use crate::hash::{hash_pair, sha256, Hash};
use crate::{Address, Asset, Result, RootChainError, SignatureSet, UtxoPos};

/// One output slot of a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxOutput {
    /// Who may spend (or exit) this output.
    pub owner: Address,
    /// Asset tag of the value held.
    pub asset: Asset,
    /// Amount held. Zero for null outputs.
    pub amount: Decimal,
}

impl TxOutput {
    #[must_use]
    pub fn new(owner: Address, asset: impl Into<Asset>, amount: Decimal) -> Self {
        Self {
            owner,
            asset: asset.into(),
            amount: amount.normalize(),
        }
    }

    /// An unused output slot.
    #[must_use]
    pub fn null() -> Self {
        Self {
            owner: Address::ZERO,
            asset: Asset::new(),
            amount: Decimal::ZERO,
        }
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        self.owner.is_zero() && self.amount.is_zero()
    }
}

/// A decoded child-chain transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub inputs: [UtxoPos; TX_INPUTS],
    pub outputs: [TxOutput; TX_OUTPUTS],
}

impl Transaction {
    /// Build a transaction, padding unused output slots with null outputs.
    ///
    /// # Errors
    /// `InvalidTransaction` if more than four outputs are given or the result
    /// fails [`Self::validate`].
    pub fn new(inputs: [UtxoPos; TX_INPUTS], outputs: Vec<TxOutput>) -> Result<Self> {
        if outputs.len() > TX_OUTPUTS {
            return Err(RootChainError::InvalidTransaction {
                reason: format!("{} outputs, at most {TX_OUTPUTS} allowed", outputs.len()),
            });
        }
        let mut given = outputs.into_iter();
        let outputs = std::array::from_fn(|_| given.next().unwrap_or_else(TxOutput::null));
        let tx = Self { inputs, outputs };
        tx.validate()?;
        Ok(tx)
    }

    /// The canonical deposit transaction: no inputs, a single non-null
    /// output owned by the depositor.
    #[must_use]
    pub fn deposit(owner: Address, asset: &str, amount: Decimal) -> Self {
        let mut outputs: [TxOutput; TX_OUTPUTS] = std::array::from_fn(|_| TxOutput::null());
        outputs[0] = TxOutput::new(owner, asset, amount);
        Self {
            inputs: [UtxoPos::NULL; TX_INPUTS],
            outputs,
        }
    }

    /// Structural checks: no negative amounts, no value owned by the null
    /// identity, no duplicate inputs.
    pub fn validate(&self) -> Result<()> {
        for (i, out) in self.outputs.iter().enumerate() {
            if out.amount.is_sign_negative() && !out.amount.is_zero() {
                return Err(RootChainError::InvalidTransaction {
                    reason: format!("output {i} has negative amount {}", out.amount),
                });
            }
            if out.owner.is_zero() && !out.amount.is_zero() {
                return Err(RootChainError::InvalidTransaction {
                    reason: format!("output {i} assigns value to the null owner"),
                });
            }
        }
        let [a, b] = self.inputs;
        if !a.is_null() && a == b {
            return Err(RootChainError::InvalidTransaction {
                reason: format!("input {a} spent twice"),
            });
        }
        Ok(())
    }

    /// Encode to the wire form whose hash is committed in blocks.
    pub fn encode(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Decode and validate wire bytes.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let tx: Self = serde_json::from_slice(bytes)?;
        tx.validate()?;
        Ok(tx)
    }

    /// Output at `oindex`.
    ///
    /// # Errors
    /// `InvalidUtxoPos` if the index is outside the four output slots.
    pub fn output(&self, oindex: u64) -> Result<&TxOutput> {
        usize::try_from(oindex)
            .ok()
            .and_then(|i| self.outputs.get(i))
            .ok_or_else(|| RootChainError::InvalidUtxoPos {
                reason: format!("output index {oindex} exceeds {TX_OUTPUTS} outputs"),
            })
    }

    /// Input at `index`, or `None` past the input slots.
    #[must_use]
    pub fn input(&self, index: usize) -> Option<UtxoPos> {
        self.inputs.get(index).copied()
    }

    /// Indices of non-null inputs.
    pub fn active_inputs(&self) -> impl Iterator<Item = (usize, UtxoPos)> + '_ {
        self.inputs
            .iter()
            .copied()
            .enumerate()
            .filter(|(_, pos)| !pos.is_null())
    }

    /// Whether this is shaped like a deposit: no inputs, exactly one
    /// non-null output, in slot 0.
    #[must_use]
    pub fn is_deposit_shaped(&self) -> bool {
        self.active_inputs().next().is_none()
            && !self.outputs[0].is_null()
            && self.outputs[1..].iter().all(TxOutput::is_null)
    }
}

/// `SHA-256(tx_bytes)`.
#[must_use]
pub fn tx_hash(tx_bytes: &[u8]) -> Hash {
    sha256(tx_bytes)
}

/// The leaf committed in operator blocks: `H(tx_hash, SHA-256(signatures))`.
#[must_use]
pub fn merkle_leaf(tx_bytes: &[u8], signatures: &SignatureSet) -> Hash {
    hash_pair(&tx_hash(tx_bytes), &signatures.digest())
}

/// Digest an owner signs to confirm a spend once the block root is known.
#[must_use]
pub fn confirmation_digest(tx_hash: &Hash, block_root: &Hash) -> Hash {
    hash_pair(tx_hash, block_root)
}
