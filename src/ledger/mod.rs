//! Append-only transfer ledger
//!
//! Owns every [`Transfer`] record keyed by its [`TransferId`] and an ordered
//! per-address index of the transfers each address sent or received. Committed
//! records are never removed; the only mutation after insertion is the single
//! move of a record's status to a terminal state. [`TransferLedger::discard`]
//! takes back an insertion whose operation is being rolled back.

mod id;
mod transfer;

pub use id::derive_transfer_id;
pub use transfer::{Transfer, TransferId, TransferStatus};

use alloy_primitives::Address;
use std::collections::HashMap;
use tracing::debug;

use crate::error::LedgerError;

#[derive(Debug, Clone, Default)]
pub struct TransferLedger {
    transfers: HashMap<TransferId, Transfer>,
    user_index: HashMap<Address, Vec<TransferId>>,
}

impl TransferLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a new transfer and indexes it under its sender and recipient.
    ///
    /// When the sender is also the recipient the ID occupies two slots of
    /// that address's index.
    pub fn insert(&mut self, transfer: Transfer) -> Result<(), LedgerError> {
        if self.transfers.contains_key(&transfer.id) {
            return Err(LedgerError::DuplicateId(transfer.id));
        }

        let id = transfer.id;
        let sender = transfer.sender;
        let recipient = transfer.recipient;
        self.transfers.insert(id, transfer);
        self.user_index.entry(sender).or_default().push(id);
        self.user_index.entry(recipient).or_default().push(id);

        debug!(
            transfer_id = %id,
            sender = %sender,
            recipient = %recipient,
            event = "transfer_recorded"
        );
        Ok(())
    }

    /// Moves a transfer to a terminal status.
    pub fn update_status(
        &mut self,
        id: TransferId,
        status: TransferStatus,
    ) -> Result<&Transfer, LedgerError> {
        let transfer = self
            .transfers
            .get_mut(&id)
            .ok_or(LedgerError::NotFound(id))?;

        if !transfer.status.can_transition_to(status) {
            return Err(LedgerError::IllegalTransition {
                id,
                from: transfer.status,
                to: status,
            });
        }

        transfer.status = status;
        Ok(transfer)
    }

    /// Removes a transfer and its two index entries.
    ///
    /// Only for undoing an [`insert`](Self::insert) that is being rolled
    /// back. Index entries are taken from the back, where the insert put them.
    pub fn discard(&mut self, id: TransferId) -> Option<Transfer> {
        let transfer = self.transfers.remove(&id)?;
        for user in [transfer.sender, transfer.recipient] {
            if let Some(ids) = self.user_index.get_mut(&user) {
                if let Some(slot) = ids.iter().rposition(|entry| *entry == id) {
                    ids.remove(slot);
                }
                if ids.is_empty() {
                    self.user_index.remove(&user);
                }
            }
        }

        debug!(transfer_id = %id, event = "transfer_discarded");
        Some(transfer)
    }

    pub fn get(&self, id: TransferId) -> Result<&Transfer, LedgerError> {
        match self.transfers.get(&id) {
            Some(transfer) if !transfer.is_sentinel() => Ok(transfer),
            _ => Err(LedgerError::NotFound(id)),
        }
    }

    pub fn contains(&self, id: TransferId) -> bool {
        self.get(id).is_ok()
    }

    /// Returns up to `limit` of the user's transfer IDs, most recent first.
    ///
    /// A `limit` of zero, or one larger than the number of entries, returns
    /// the whole index.
    pub fn list_for_user(&self, user: Address, limit: usize) -> Vec<TransferId> {
        let Some(ids) = self.user_index.get(&user) else {
            return Vec::new();
        };

        let take = if limit == 0 { ids.len() } else { limit.min(ids.len()) };
        ids.iter().rev().take(take).copied().collect()
    }

    pub fn len(&self) -> usize {
        self.transfers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transfers.is_empty()
    }
}
