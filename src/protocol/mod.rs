//! Router wire types
//!
//! This module contains the request shape handed to the external router and
//! the encoding of the correlation message that ties a relayed deposit back
//! to its ledger record.

mod deposit;

pub use deposit::{decode_transfer_message, encode_transfer_message, DepositV3};
