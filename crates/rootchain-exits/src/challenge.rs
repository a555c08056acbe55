//! Exit challenges.
//!
//! An exit is invalid if the output it withdraws was spent later. Anyone
//! holding the spending transaction, its inclusion proof and the exit
//! owner's confirmation signature can revoke the exit and collect its bond.

use rootchain_types::{
    confirmation_digest, tx_hash, CallContext, Payout, Result, RootChainError, RootChainEvent,
    SignatureSet, Transaction, TxSignature, UtxoPos, ValueTransfer,
};
use serde::{Deserialize, Serialize};

use crate::engine::RootChain;

/// Proof that an exiting output was spent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeEvidence {
    /// Encoded spending transaction.
    pub tx_bytes: Vec<u8>,
    /// Where the spending transaction is committed. Only the block number
    /// and transaction index are used.
    pub spending_pos: UtxoPos,
    /// Input slot of the spending transaction that consumes the exiting output.
    pub input_index: usize,
    /// Sibling path of the spending transaction's leaf.
    pub proof: Vec<u8>,
    /// Spend signatures committed with the spending transaction.
    pub signatures: SignatureSet,
    /// Exit owner's signature over `H(H(tx_bytes), block_root)`.
    pub confirmation_sig: TxSignature,
}

impl RootChain {
    /// Revoke an exit by proving its output was spent. On success the exit
    /// is tombstoned as CHALLENGED and its bond is paid to the caller.
    ///
    /// # Errors
    /// - `ExitNotFound` / `ExitNotActive` if there is no EXITING record
    /// - `InvalidTransaction` / `Serialization` if the spending tx does not decode
    /// - `ChallengeMismatch` if the named input is not the exiting output, or
    ///   the confirmation signature is not the exit owner's
    /// - `BlockNotFound`, `SignatureInvalid`, `InclusionProofInvalid` if the
    ///   spending transaction is not committed where claimed
    /// - `CustodyViolation` if the bond is not held
    pub fn challenge_exit<T: ValueTransfer>(
        &mut self,
        ctx: &CallContext,
        utxo_pos: UtxoPos,
        evidence: &ChallengeEvidence,
        transfer: &mut T,
    ) -> Result<()> {
        let exit = self.exits.get_active(utxo_pos)?;
        let owner = exit.owner;
        let bond = exit.bond;

        let tx = Transaction::decode(&evidence.tx_bytes)?;
        if tx.input(evidence.input_index) != Some(utxo_pos) {
            return Err(RootChainError::ChallengeMismatch {
                reason: format!(
                    "input {} of the spending transaction is not {utxo_pos}",
                    evidence.input_index
                ),
            });
        }

        let block = *self.blocks.get_block(evidence.spending_pos.blknum())?;
        self.verify_included(
            &block,
            evidence.spending_pos,
            &tx,
            &evidence.tx_bytes,
            &evidence.proof,
            &evidence.signatures,
        )?;

        let digest = confirmation_digest(&tx_hash(&evidence.tx_bytes), &block.root);
        let signer = evidence.confirmation_sig.recover(&digest).map_err(|e| {
            RootChainError::ChallengeMismatch {
                reason: format!("confirmation signature rejected: {e}"),
            }
        })?;
        if signer != owner {
            return Err(RootChainError::ChallengeMismatch {
                reason: format!("confirmation signed by {signer}, exit owned by {owner}"),
            });
        }

        let native = self.config.native_asset.clone();
        self.custody.ensure_covers(&[(native.as_str(), bond)])?;

        // All checks passed: commit, then pay.
        self.exits.get_mut(utxo_pos)?.mark_challenged()?;
        self.custody.record_outflow(&native, bond)?;
        self.events.push(RootChainEvent::ExitChallenged {
            utxo_pos,
            challenger: ctx.caller,
        });
        tracing::info!(
            utxo_pos = %utxo_pos,
            owner = %owner,
            challenger = %ctx.caller,
            bond = %bond,
            "Exit challenged"
        );

        if !bond.is_zero() {
            transfer.transfer(&Payout {
                to: ctx.caller,
                asset: native,
                amount: bond,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rootchain_types::hash::sha256;
    use rootchain_types::TestAccount;

    use super::*;

    #[test]
    fn evidence_serde_roundtrip() {
        let signer = TestAccount::from_seed(5);
        let evidence = ChallengeEvidence {
            tx_bytes: b"{}".to_vec(),
            spending_pos: UtxoPos::new(1000, 2, 0).unwrap(),
            input_index: 1,
            proof: vec![7u8; rootchain_types::constants::PROOF_LEN],
            signatures: SignatureSet::single(signer.sign(&sha256(b"tx"))),
            confirmation_sig: signer.sign(&sha256(b"confirm")),
        };
        let json = serde_json::to_string(&evidence).unwrap();
        let back: ChallengeEvidence = serde_json::from_str(&json).unwrap();
        assert_eq!(evidence, back);
    }
}
