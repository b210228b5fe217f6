//! Capability traits for the contract's external collaborators.
//!
//! The bridge never talks to a token, a router or a clock directly. Each is
//! injected at construction behind one of the traits below, so tests can
//! substitute fakes that succeed, reject, fault, or call back into the
//! contract mid-operation.
//!
//! Every call is synchronous: it either returns or fails, and a failure
//! aborts the enclosing contract operation.

use alloy_primitives::{Address, U256};

use crate::error::{RouterError, TokenError};
use crate::protocol::DepositV3;

/// Fungible token operations, keyed by token address.
///
/// Implementations may be hostile. A token can take a cut in transit,
/// refuse a movement, or re-enter the caller before it returns.
///
/// # Test Scenarios
///
/// Implementing this trait with fakes enables testing:
/// - Insufficient balance or allowance
/// - Fee-on-transfer tokens delivering less than requested
/// - Tokens that refuse transfers
/// - Reentrant callbacks during `transfer_from`
pub trait TokenProvider: Send + Sync {
    /// Returns true if `token` has executable code.
    fn has_code(&self, token: Address) -> bool;

    fn balance_of(&self, token: Address, account: Address) -> U256;

    fn allowance(&self, token: Address, owner: Address, spender: Address) -> U256;

    /// Moves `amount` from `from` to `to`, spending `spender`'s allowance.
    ///
    /// # Errors
    ///
    /// Returns an error if the token refuses the movement.
    fn transfer_from(
        &self,
        token: Address,
        spender: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<(), TokenError>;

    /// Moves `amount` from `from`'s own balance to `to`.
    ///
    /// # Errors
    ///
    /// Returns an error if the token refuses the movement.
    fn transfer(
        &self,
        token: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<(), TokenError>;

    /// Sets `spender`'s allowance over `owner`'s balance to exactly `amount`.
    ///
    /// # Errors
    ///
    /// Returns an error if the token refuses the approval.
    fn approve(
        &self,
        token: Address,
        owner: Address,
        spender: Address,
        amount: U256,
    ) -> Result<(), TokenError>;
}

/// The external cross-chain router.
///
/// Only its call/return contract is modeled: a deposit either returns, is
/// rejected with a reason, or faults.
///
/// # Test Scenarios
///
/// - Accepted deposits that pull the approved funds
/// - Explicit rejections with a reason
/// - Unexpected faults
/// - Deposits that return success without taking the funds
/// - Reentrant callbacks into the bridge
pub trait RouterProvider: Send + Sync {
    /// Submits a deposit for relay. `caller` is the account the router pulls
    /// the deposit amount from.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::Rejected`] for an explicit refusal and
    /// [`RouterError::Fault`] for anything else.
    fn deposit_v3(&self, caller: Address, deposit: &DepositV3) -> Result<(), RouterError>;

    /// Quotes the relay fee for moving `amount` of `token` to the destination.
    ///
    /// The quote is a point-in-time estimate with no validity window.
    fn calculate_deposit_v3_fee(
        &self,
        token: Address,
        amount: U256,
        destination_chain_id: u64,
    ) -> Result<U256, RouterError>;
}

/// Source of the current block timestamp, in unix seconds.
pub trait Clock: Send + Sync {
    fn timestamp(&self) -> u64;
}
