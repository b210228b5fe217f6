// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! Token custody adapter
//!
//! Wraps a [`TokenProvider`] with the checks the bridge needs around every
//! movement of user funds: balance and allowance preflight before pulling,
//! a received-amount check after pulling, and zero-then-exact approvals for
//! downstream spenders.

use alloy_primitives::{Address, U256};
use tracing::{debug, info, warn};

use crate::error::CustodyError;
use crate::traits::TokenProvider;

/// Moves tokens in and out of the custody of `holder`.
///
/// # Example
///
/// ```rust
/// use bridge_ledger::custody::Custody;
/// use bridge_ledger::testing::FakeToken;
/// use alloy_primitives::{Address, U256};
///
/// let tokens = FakeToken::new();
/// let (token, user, bridge) = (
///     Address::repeat_byte(0x70),
///     Address::repeat_byte(0x01),
///     Address::repeat_byte(0xb1),
/// );
/// tokens.deploy(token);
/// tokens.mint(token, user, U256::from(500));
/// tokens.set_allowance(token, user, bridge, U256::from(500));
///
/// let custody = Custody::new(&tokens, bridge);
/// custody.escrow(user, U256::from(500), token).unwrap();
/// assert_eq!(custody.held(token), U256::from(500));
/// ```
pub struct Custody<'a, T: TokenProvider> {
    tokens: &'a T,
    holder: Address,
}

impl<'a, T: TokenProvider> Custody<'a, T> {
    pub fn new(tokens: &'a T, holder: Address) -> Self {
        Self { tokens, holder }
    }

    /// Balance of `token` currently held in custody.
    pub fn held(&self, token: Address) -> U256 {
        self.tokens.balance_of(token, self.holder)
    }

    /// Pulls `amount` of `token` from `payer` into custody.
    ///
    /// # Errors
    ///
    /// - [`CustodyError::InsufficientBalance`] / [`CustodyError::InsufficientAllowance`]
    ///   if the payer cannot cover the pull
    /// - [`CustodyError::TransferRejected`] if the token refuses the movement
    /// - [`CustodyError::ShortTransfer`] if custody grew by less than `amount`
    pub fn escrow(&self, payer: Address, amount: U256, token: Address) -> Result<(), CustodyError> {
        let available = self.tokens.balance_of(token, payer);
        if available < amount {
            return Err(CustodyError::InsufficientBalance {
                token,
                account: payer,
                available,
                required: amount,
            });
        }

        let allowance = self.tokens.allowance(token, payer, self.holder);
        if allowance < amount {
            return Err(CustodyError::InsufficientAllowance {
                token,
                account: payer,
                available: allowance,
                required: amount,
            });
        }

        let before = self.held(token);
        debug!(
            payer = %payer,
            token = %token,
            amount = %amount,
            held_before = %before,
            event = "escrow_started"
        );

        self.tokens
            .transfer_from(token, self.holder, payer, self.holder, amount)
            .map_err(|e| CustodyError::TransferRejected {
                token,
                reason: e.reason,
            })?;

        let after = self.held(token);
        let received = after.saturating_sub(before);
        if received < amount {
            warn!(
                token = %token,
                expected = %amount,
                received = %received,
                event = "escrow_short_transfer"
            );
            return Err(CustodyError::ShortTransfer {
                token,
                expected: amount,
                received,
            });
        }

        info!(
            payer = %payer,
            token = %token,
            amount = %amount,
            event = "escrow_completed"
        );
        Ok(())
    }

    /// Pays `amount` of `token` out of custody to `payee`.
    ///
    /// # Errors
    ///
    /// - [`CustodyError::InsufficientBalance`] if custody holds less than `amount`
    /// - [`CustodyError::TransferRejected`] if the token refuses the movement
    pub fn release(&self, payee: Address, amount: U256, token: Address) -> Result<(), CustodyError> {
        let held = self.held(token);
        if held < amount {
            return Err(CustodyError::InsufficientBalance {
                token,
                account: self.holder,
                available: held,
                required: amount,
            });
        }

        self.tokens
            .transfer(token, self.holder, payee, amount)
            .map_err(|e| CustodyError::TransferRejected {
                token,
                reason: e.reason,
            })?;

        info!(
            payee = %payee,
            token = %token,
            amount = %amount,
            event = "custody_released"
        );
        Ok(())
    }

    /// Grants `spender` an allowance of exactly `amount`.
    ///
    /// A non-zero existing allowance is first reset to zero; the allowance
    /// is never raised additively.
    pub fn approve_exact(
        &self,
        spender: Address,
        amount: U256,
        token: Address,
    ) -> Result<(), CustodyError> {
        let current = self.tokens.allowance(token, self.holder, spender);
        if !current.is_zero() {
            debug!(
                spender = %spender,
                token = %token,
                stale_allowance = %current,
                event = "allowance_reset"
            );
            self.approve(spender, U256::ZERO, token)?;
        }

        if !amount.is_zero() {
            self.approve(spender, amount, token)?;
        }

        debug!(
            spender = %spender,
            token = %token,
            amount = %amount,
            event = "allowance_granted"
        );
        Ok(())
    }

    fn approve(&self, spender: Address, amount: U256, token: Address) -> Result<(), CustodyError> {
        self.tokens
            .approve(token, self.holder, spender, amount)
            .map_err(|e| CustodyError::ApprovalRejected {
                token,
                spender,
                reason: e.reason,
            })
    }
}
