//! Liquidity positions of authorized providers.
//!
//! Pure bookkeeping: token movements for deposits and withdrawals are done by
//! the bridge through [`crate::custody::Custody`]. For every token the sum of
//! all positions equals the pooled total.

use alloy_primitives::{Address, U256};
use std::collections::{HashMap, HashSet};

use crate::error::{BridgeError, LiquidityError, Result};

#[derive(Debug, Clone, Default)]
pub struct LiquidityLedger {
    providers: HashSet<Address>,
    positions: HashMap<(Address, Address), U256>,
    totals: HashMap<Address, U256>,
}

impl LiquidityLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn authorize(&mut self, provider: Address) -> std::result::Result<(), LiquidityError> {
        if !self.providers.insert(provider) {
            return Err(LiquidityError::AlreadyAuthorized { provider });
        }
        Ok(())
    }

    pub fn revoke(&mut self, provider: Address) -> std::result::Result<(), LiquidityError> {
        if !self.providers.remove(&provider) {
            return Err(LiquidityError::NotAuthorized { provider });
        }
        Ok(())
    }

    pub fn is_authorized(&self, provider: Address) -> bool {
        self.providers.contains(&provider)
    }

    pub fn ensure_authorized(&self, provider: Address) -> std::result::Result<(), LiquidityError> {
        if !self.is_authorized(provider) {
            return Err(LiquidityError::NotAuthorized { provider });
        }
        Ok(())
    }

    pub fn position(&self, provider: Address, token: Address) -> U256 {
        self.positions
            .get(&(provider, token))
            .copied()
            .unwrap_or_default()
    }

    pub fn total(&self, token: Address) -> U256 {
        self.totals.get(&token).copied().unwrap_or_default()
    }

    /// Checks that `amount` can be credited without overflowing.
    pub fn check_credit(&self, provider: Address, token: Address, amount: U256) -> Result<()> {
        self.position(provider, token)
            .checked_add(amount)
            .and_then(|_| self.total(token).checked_add(amount))
            .map(|_| ())
            .ok_or(BridgeError::Overflow {
                context: "liquidity credit",
            })
    }

    /// Adds `amount` to the provider's position and the pool total.
    pub fn credit(&mut self, provider: Address, token: Address, amount: U256) -> Result<U256> {
        self.ensure_authorized(provider)?;
        self.check_credit(provider, token, amount)?;

        let position = self.positions.entry((provider, token)).or_default();
        *position += amount;
        let updated = *position;
        *self.totals.entry(token).or_default() += amount;
        Ok(updated)
    }

    /// Removes `amount` from the provider's position and the pool total.
    pub fn debit(
        &mut self,
        provider: Address,
        token: Address,
        amount: U256,
    ) -> std::result::Result<U256, LiquidityError> {
        self.ensure_authorized(provider)?;

        let available = self.position(provider, token);
        if available < amount {
            return Err(LiquidityError::InsufficientPosition {
                provider,
                token,
                available,
                requested: amount,
            });
        }

        let remaining = available - amount;
        if remaining.is_zero() {
            self.positions.remove(&(provider, token));
        } else {
            self.positions.insert((provider, token), remaining);
        }
        let total = self.totals.entry(token).or_default();
        *total = total.saturating_sub(amount);
        Ok(remaining)
    }

    /// Takes back a [`credit`](Self::credit). Authorization is not checked,
    /// so a provider revoked in the meantime is still unwound.
    pub(crate) fn undo_credit(&mut self, provider: Address, token: Address, amount: U256) {
        let remaining = self.position(provider, token).saturating_sub(amount);
        if remaining.is_zero() {
            self.positions.remove(&(provider, token));
        } else {
            self.positions.insert((provider, token), remaining);
        }
        let total = self.totals.entry(token).or_default();
        *total = total.saturating_sub(amount);
    }

    /// Takes back a [`debit`](Self::debit). Authorization is not checked.
    pub(crate) fn undo_debit(&mut self, provider: Address, token: Address, amount: U256) {
        let position = self.positions.entry((provider, token)).or_default();
        *position = position.saturating_add(amount);
        let total = self.totals.entry(token).or_default();
        *total = total.saturating_add(amount);
    }
}
