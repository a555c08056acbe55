//! Finalization — paying out matured exits.
//!
//! Walks an asset's queue from the head while the head has matured:
//! EXITING entries are finalized and paid, CHALLENGED entries are dropped
//! without payment. An entry the root chain cannot currently cover is set
//! aside for the call and returned to the queue afterwards, so it never
//! holds up the exits behind it. Stops at the first immature entry or when
//! the queue is empty, so it is safe to call at any time.

use rootchain_types::{CallContext, Payout, Result, RootChainError, RootChainEvent, ValueTransfer};

use crate::engine::RootChain;

impl RootChain {
    /// Finalize every matured exit of `asset`. Returns how many were paid.
    ///
    /// Payouts are made only after every state change of the call is done.
    /// An exit that custody cannot cover stays EXITING and queued, and is
    /// retried on the next call.
    ///
    /// # Errors
    /// `UnknownAsset` if the asset has no queue.
    pub fn process_exits<T: ValueTransfer>(
        &mut self,
        ctx: &CallContext,
        asset: &str,
        transfer: &mut T,
    ) -> Result<usize> {
        let queue = self
            .queues
            .get_mut(asset)
            .ok_or_else(|| RootChainError::UnknownAsset(asset.to_string()))?;
        let native = self.config.native_asset.as_str();
        let mut payouts: Vec<Payout> = Vec::new();
        let mut deferred = Vec::new();
        let mut finalized = 0usize;

        while let Ok(head) = queue.min() {
            if head.exitable_at > ctx.now {
                break;
            }

            let Ok(exit) = self.exits.get_mut(head.utxo_pos) else {
                tracing::warn!(utxo_pos = %head.utxo_pos, "Queued exit has no record; dropping");
                queue.delete_min()?;
                continue;
            };

            if !exit.is_exiting() {
                tracing::debug!(
                    utxo_pos = %head.utxo_pos,
                    state = %exit.state,
                    "Skipping inactive exit"
                );
                queue.delete_min()?;
                continue;
            }

            let owed = [(exit.asset.as_str(), exit.amount), (native, exit.bond)];
            if let Err(e) = self.custody.ensure_covers(&owed) {
                tracing::warn!(utxo_pos = %head.utxo_pos, error = %e, "Exit deferred");
                deferred.push(queue.delete_min()?);
                continue;
            }

            queue.delete_min()?;
            exit.mark_finalized()?;
            self.custody.record_outflow(&exit.asset, exit.amount)?;
            self.custody.record_outflow(native, exit.bond)?;

            self.events.push(RootChainEvent::ExitFinalized {
                utxo_pos: exit.utxo_pos,
                owner: exit.owner,
                asset: exit.asset.clone(),
                amount: exit.amount,
            });
            tracing::info!(
                utxo_pos = %exit.utxo_pos,
                owner = %exit.owner,
                asset = %exit.asset,
                amount = %exit.amount,
                "Exit finalized"
            );

            payouts.push(Payout {
                to: exit.owner,
                asset: exit.asset.clone(),
                amount: exit.amount,
            });
            if !exit.bond.is_zero() {
                payouts.push(Payout {
                    to: exit.owner,
                    asset: native.to_string(),
                    amount: exit.bond,
                });
            }
            finalized += 1;
        }
        for entry in deferred {
            queue.insert(entry);
        }

        for payout in &payouts {
            transfer.transfer(payout);
        }
        Ok(finalized)
    }
}
