//! Signals emitted by the bridge.
//!
//! Indexers consume these to follow transfer lifecycles and liquidity moves.
//! Every committed operation appends its signals to the contract's event log.

use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};

use crate::ledger::{Transfer, TransferId, TransferStatus};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum BridgeEvent {
    /// Full metadata of a newly recorded transfer.
    TransferInitiated(Transfer),
    TransferStatusUpdated {
        id: TransferId,
        status: TransferStatus,
        reason: String,
    },
    LiquidityAdded {
        provider: Address,
        token: Address,
        amount: U256,
    },
    LiquidityRemoved {
        provider: Address,
        token: Address,
        amount: U256,
    },
    FeeUpdated {
        old_bps: u16,
        new_bps: u16,
    },
    ProviderAdded {
        provider: Address,
    },
    ProviderRemoved {
        provider: Address,
    },
    ProtocolAddressesUpdated {
        router: Address,
        spoke_pool: Address,
        hub_pool: Address,
    },
    OwnershipTransferred {
        previous_owner: Address,
        new_owner: Address,
    },
    FeesCollected {
        token: Address,
        to: Address,
        amount: U256,
    },
}

impl BridgeEvent {
    /// Static name used in logs.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::TransferInitiated(_) => "transfer_initiated",
            Self::TransferStatusUpdated { .. } => "transfer_status_updated",
            Self::LiquidityAdded { .. } => "liquidity_added",
            Self::LiquidityRemoved { .. } => "liquidity_removed",
            Self::FeeUpdated { .. } => "fee_updated",
            Self::ProviderAdded { .. } => "provider_added",
            Self::ProviderRemoved { .. } => "provider_removed",
            Self::ProtocolAddressesUpdated { .. } => "protocol_addresses_updated",
            Self::OwnershipTransferred { .. } => "ownership_transferred",
            Self::FeesCollected { .. } => "fees_collected",
        }
    }
}
