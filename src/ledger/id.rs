//! Transfer ID derivation.
//!
//! Formula: keccak256(sender || recipient || token || amount || destination_chain_id || timestamp)
//!
//! Addresses are packed as 20 raw bytes; `amount`, `destination_chain_id` and
//! `timestamp` are packed as 32-byte big-endian words, matching Solidity's
//! `abi.encodePacked(address, address, address, uint256, uint256, uint256)`.
//!
//! The destination chain is part of the preimage so that two otherwise
//! identical transfers to different chains within one block never collide.

use alloy_primitives::{keccak256, Address, U256};
use alloy_sol_types::SolValue;

use super::TransferId;

/// Derive the transfer ID for the given request fields.
pub fn derive_transfer_id(
    sender: Address,
    recipient: Address,
    token: Address,
    amount: U256,
    destination_chain_id: u64,
    timestamp: u64,
) -> TransferId {
    let preimage = (
        sender,
        recipient,
        token,
        amount,
        U256::from(destination_chain_id),
        U256::from(timestamp),
    )
        .abi_encode_packed();
    keccak256(preimage)
}
