use alloy_primitives::{Address, Bytes, U256};
use alloy_sol_types::SolValue;
use serde::{Deserialize, Serialize};

use crate::ledger::TransferId;

/// A deposit request submitted to the router's `depositV3` entry point.
///
/// `message` carries the ABI-encoded transfer ID so the destination side can
/// correlate the relay with the originating ledger record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepositV3 {
    /// The user on whose behalf the deposit is made.
    pub depositor: Address,
    pub recipient: Address,
    pub token: Address,
    /// Amount the router pulls from the caller, net of protocol fees.
    pub amount: U256,
    pub destination_chain_id: u64,
    pub message: Bytes,
    /// Relay fee quoted by the router for this amount and route.
    pub fee_hint: U256,
    /// Native currency forwarded to advance destination-side fees.
    pub native_value: U256,
}

impl DepositV3 {
    /// Returns the transfer ID carried in the message, if it decodes.
    pub fn transfer_id(&self) -> Option<TransferId> {
        decode_transfer_message(&self.message).ok()
    }
}

/// ABI-encodes a transfer ID as a single `bytes32` word.
pub fn encode_transfer_message(id: TransferId) -> Bytes {
    Bytes::from(id.abi_encode())
}

pub fn decode_transfer_message(message: &[u8]) -> Result<TransferId, alloy_sol_types::Error> {
    TransferId::abi_decode(message)
}
