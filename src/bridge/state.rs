use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

use crate::error::{BridgeError, Result};
use crate::events::BridgeEvent;
use crate::fee::FeeSchedule;
use crate::ledger::{TransferId, TransferLedger};
use crate::liquidity::LiquidityLedger;

/// Router-side contracts the bridge forwards deposits to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProtocolAddresses {
    pub router: Address,
    pub spoke_pool: Address,
    pub hub_pool: Address,
}

/// Everything a contract operation may mutate.
#[derive(Debug)]
pub(crate) struct ContractState {
    pub owner: Address,
    pub addresses: ProtocolAddresses,
    pub fees: FeeSchedule,
    pub transfers: TransferLedger,
    pub liquidity: LiquidityLedger,
    pub accrued_fees: HashMap<Address, U256>,
    pub events: Vec<BridgeEvent>,
}

impl ContractState {
    pub fn new(owner: Address, addresses: ProtocolAddresses, fees: FeeSchedule) -> Self {
        Self {
            owner,
            addresses,
            fees,
            transfers: TransferLedger::new(),
            liquidity: LiquidityLedger::new(),
            accrued_fees: HashMap::new(),
            events: Vec::new(),
        }
    }

    /// Appends a signal and returns its position in the log.
    pub fn emit(&mut self, event: BridgeEvent) -> usize {
        debug!(signal = event.name(), event = "signal_emitted");
        self.events.push(event);
        self.events.len() - 1
    }

    pub fn accrued(&self, token: Address) -> U256 {
        self.accrued_fees.get(&token).copied().unwrap_or_default()
    }

    pub fn accrue_fee(&mut self, token: Address, fee: U256) -> Result<()> {
        if fee.is_zero() {
            return Ok(());
        }
        let accrued = self
            .accrued(token)
            .checked_add(fee)
            .ok_or(BridgeError::Overflow {
                context: "fee accrual",
            })?;
        self.accrued_fees.insert(token, accrued);
        Ok(())
    }

    /// Zeroes and returns the fees accrued in `token`.
    pub fn take_fees(&mut self, token: Address) -> U256 {
        self.accrued_fees.remove(&token).unwrap_or_default()
    }

    fn unaccrue_fee(&mut self, token: Address, fee: U256) {
        let remaining = self.accrued(token).saturating_sub(fee);
        if remaining.is_zero() {
            self.accrued_fees.remove(&token);
        } else {
            self.accrued_fees.insert(token, remaining);
        }
    }

    /// Takes back the changes in `journal`, newest first.
    ///
    /// Only the journaled changes are touched; whatever other callers
    /// committed in the meantime stays.
    pub fn revert(&mut self, journal: Journal) {
        for change in journal.changes.into_iter().rev() {
            match change {
                Change::Recorded(id) => {
                    self.transfers.discard(id);
                }
                Change::Accrued { token, fee } => self.unaccrue_fee(token, fee),
                Change::Collected { token, amount } => {
                    let restored = self.accrued(token).saturating_add(amount);
                    self.accrued_fees.insert(token, restored);
                }
                Change::Credited {
                    provider,
                    token,
                    amount,
                } => self.liquidity.undo_credit(provider, token, amount),
                Change::Debited {
                    provider,
                    token,
                    amount,
                } => self.liquidity.undo_debit(provider, token, amount),
                Change::Emitted(index) => {
                    if index < self.events.len() {
                        self.events.remove(index);
                    }
                }
            }
        }
    }
}

/// A single state change made by a guarded operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Change {
    Recorded(TransferId),
    Accrued {
        token: Address,
        fee: U256,
    },
    Collected {
        token: Address,
        amount: U256,
    },
    Credited {
        provider: Address,
        token: Address,
        amount: U256,
    },
    Debited {
        provider: Address,
        token: Address,
        amount: U256,
    },
    /// Position of an appended signal.
    Emitted(usize),
}

/// Undo log of one guarded operation.
///
/// Guarded operations never overlap, so the signal positions recorded here
/// are only ever shifted by appends after them, never by removals before.
#[derive(Debug, Default)]
pub(crate) struct Journal {
    changes: Vec<Change>,
}

impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, change: Change) {
        self.changes.push(change);
    }

    /// Signal positions recorded so far, oldest first.
    pub fn emitted(&self) -> impl Iterator<Item = usize> + '_ {
        self.changes.iter().filter_map(|change| match change {
            Change::Emitted(index) => Some(*index),
            _ => None,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}
