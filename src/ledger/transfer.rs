use alloy_primitives::{Address, B256, U256};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Content-derived identifier of a transfer.
pub type TransferId = B256;

/// Lifecycle status of a transfer.
///
/// Transitions are one-way: `Initiated` moves to exactly one of the terminal
/// states and never changes again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransferStatus {
    Initiated,
    Completed,
    Failed,
}

impl TransferStatus {
    #[inline]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    /// Returns true if moving from `self` to `next` is permitted.
    #[inline]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Initiated, Self::Completed) | (Self::Initiated, Self::Failed)
        )
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Initiated => "INITIATED",
            Self::Completed => "COMPLETED",
            Self::Failed => "FAILED",
        }
    }
}

impl fmt::Display for TransferStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single cross-chain transfer as recorded in the ledger.
///
/// `amount` is the gross amount escrowed from the sender; `bridged_amount`
/// is what was handed to the router after the protocol `fee` was retained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transfer {
    pub id: TransferId,
    pub sender: Address,
    pub recipient: Address,
    pub token: Address,
    pub amount: U256,
    pub fee: U256,
    pub bridged_amount: U256,
    pub source_chain_id: u64,
    pub destination_chain_id: u64,
    pub timestamp: u64,
    pub status: TransferStatus,
}

impl Transfer {
    /// The zero-valued record, equivalent to an unwritten storage slot.
    pub fn sentinel() -> Self {
        Self {
            id: B256::ZERO,
            sender: Address::ZERO,
            recipient: Address::ZERO,
            token: Address::ZERO,
            amount: U256::ZERO,
            fee: U256::ZERO,
            bridged_amount: U256::ZERO,
            source_chain_id: 0,
            destination_chain_id: 0,
            timestamp: 0,
            status: TransferStatus::Initiated,
        }
    }

    pub fn is_sentinel(&self) -> bool {
        self.sender.is_zero() && self.amount.is_zero() && self.timestamp == 0
    }
}
