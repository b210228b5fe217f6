//! Test utilities and fake implementations of the capability traits
//!
//! These fakes let tests drive the bridge through success, rejection, fault
//! and reentrancy scenarios without a chain. All of them are cheap to clone
//! and share state between clones, so a test can hand one clone to the
//! contract and keep another to configure behavior and inspect effects.

use alloy_primitives::{Address, U256};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use crate::error::{RouterError, TokenError};
use crate::fee::BPS_DENOMINATOR;
use crate::protocol::DepositV3;
use crate::traits::{Clock, RouterProvider, TokenProvider};

/// One-shot callback run from inside a fake's capability call.
pub type Callback = Box<dyn FnOnce() + Send>;

// ============================================================================
// Fake Token
// ============================================================================

#[derive(Default)]
struct TokenState {
    contracts: HashSet<Address>,
    balances: HashMap<(Address, Address), U256>,
    allowances: HashMap<(Address, Address, Address), U256>,
    transfer_fee_bps: HashMap<Address, u16>,
    rejections: HashMap<Address, String>,
    approvals: Vec<(Address, Address, Address, U256)>,
    on_transfer_from: Option<Callback>,
}

/// An in-memory multi-token ledger.
///
/// This allows testing scenarios like:
/// - Missing balance or allowance
/// - Fee-on-transfer tokens (a cut of every movement is burned)
/// - Tokens refusing movements
/// - A callback that runs before a `transfer_from` is applied
#[derive(Clone, Default)]
pub struct FakeToken {
    state: Arc<Mutex<TokenState>>,
}

impl std::fmt::Debug for FakeToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FakeToken").finish_non_exhaustive()
    }
}

impl FakeToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `token` as a deployed contract.
    pub fn deploy(&self, token: Address) {
        self.state.lock().unwrap().contracts.insert(token);
    }

    pub fn mint(&self, token: Address, account: Address, amount: U256) {
        *self
            .state
            .lock()
            .unwrap()
            .balances
            .entry((token, account))
            .or_default() += amount;
    }

    /// Sets an allowance directly, as if `owner` had approved `spender`.
    pub fn set_allowance(&self, token: Address, owner: Address, spender: Address, amount: U256) {
        self.state
            .lock()
            .unwrap()
            .allowances
            .insert((token, owner, spender), amount);
    }

    /// Burns `bps` of every movement of `token` in transit.
    pub fn set_transfer_fee_bps(&self, token: Address, bps: u16) {
        self.state
            .lock()
            .unwrap()
            .transfer_fee_bps
            .insert(token, bps);
    }

    /// Makes every movement of `token` fail with `reason`.
    pub fn reject_transfers(&self, token: Address, reason: &str) {
        self.state
            .lock()
            .unwrap()
            .rejections
            .insert(token, reason.to_string());
    }

    pub fn allow_transfers(&self, token: Address) {
        self.state.lock().unwrap().rejections.remove(&token);
    }

    /// Runs `callback` during the next `transfer_from`, before it is applied.
    pub fn on_transfer_from(&self, callback: impl FnOnce() + Send + 'static) {
        self.state.lock().unwrap().on_transfer_from = Some(Box::new(callback));
    }

    /// Every `approve` call made through the trait, in order.
    pub fn approvals(&self) -> Vec<(Address, Address, Address, U256)> {
        self.state.lock().unwrap().approvals.clone()
    }

    fn apply_transfer(
        state: &mut TokenState,
        token: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<(), TokenError> {
        if let Some(reason) = state.rejections.get(&token) {
            return Err(TokenError::new(reason.clone()));
        }

        let from_balance = state
            .balances
            .get(&(token, from))
            .copied()
            .unwrap_or_default();
        if from_balance < amount {
            return Err(TokenError::new("transfer amount exceeds balance"));
        }

        let bps = state.transfer_fee_bps.get(&token).copied().unwrap_or(0);
        let burned = amount * U256::from(bps) / U256::from(BPS_DENOMINATOR);

        state.balances.insert((token, from), from_balance - amount);
        *state.balances.entry((token, to)).or_default() += amount - burned;
        Ok(())
    }
}

impl TokenProvider for FakeToken {
    fn has_code(&self, token: Address) -> bool {
        self.state.lock().unwrap().contracts.contains(&token)
    }

    fn balance_of(&self, token: Address, account: Address) -> U256 {
        self.state
            .lock()
            .unwrap()
            .balances
            .get(&(token, account))
            .copied()
            .unwrap_or_default()
    }

    fn allowance(&self, token: Address, owner: Address, spender: Address) -> U256 {
        self.state
            .lock()
            .unwrap()
            .allowances
            .get(&(token, owner, spender))
            .copied()
            .unwrap_or_default()
    }

    fn transfer_from(
        &self,
        token: Address,
        spender: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<(), TokenError> {
        let callback = self.state.lock().unwrap().on_transfer_from.take();
        if let Some(callback) = callback {
            callback();
        }

        let mut state = self.state.lock().unwrap();
        let allowance = state
            .allowances
            .get(&(token, from, spender))
            .copied()
            .unwrap_or_default();
        if allowance < amount {
            return Err(TokenError::new("insufficient allowance"));
        }

        Self::apply_transfer(&mut state, token, from, to, amount)?;
        state
            .allowances
            .insert((token, from, spender), allowance - amount);
        Ok(())
    }

    fn transfer(
        &self,
        token: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<(), TokenError> {
        let mut state = self.state.lock().unwrap();
        Self::apply_transfer(&mut state, token, from, to, amount)
    }

    fn approve(
        &self,
        token: Address,
        owner: Address,
        spender: Address,
        amount: U256,
    ) -> Result<(), TokenError> {
        let mut state = self.state.lock().unwrap();
        if let Some(reason) = state.rejections.get(&token) {
            return Err(TokenError::new(reason.clone()));
        }
        state.allowances.insert((token, owner, spender), amount);
        state.approvals.push((token, owner, spender, amount));
        Ok(())
    }
}

// ============================================================================
// Fake Router
// ============================================================================

/// How the fake router answers `deposit_v3`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouterMode {
    /// Pull the deposit amount from the caller and accept.
    Accept,
    /// Return success without pulling any funds.
    AcceptWithoutPull,
    Reject(String),
    Fault(String),
}

struct RouterState {
    mode: RouterMode,
    fee_quote: U256,
    quote_failure: Option<String>,
    quotes: usize,
    deposits: Vec<(Address, DepositV3)>,
    on_deposit: Option<Callback>,
}

/// A fake router acting as its own spoke pool.
///
/// Accepted deposits pull the deposit amount from the caller using the
/// allowance granted to [`FakeRouter::address`].
///
/// This allows testing scenarios like:
/// - Immediate success
/// - Explicit rejection with a reason
/// - Unexpected faults
/// - Success reported without the funds being taken
/// - A callback that re-enters the bridge mid-deposit
#[derive(Clone)]
pub struct FakeRouter {
    address: Address,
    tokens: Option<FakeToken>,
    state: Arc<Mutex<RouterState>>,
}

impl std::fmt::Debug for FakeRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FakeRouter")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

impl FakeRouter {
    /// A router that records deposits but holds no token ledger to pull from.
    pub fn new(address: Address) -> Self {
        Self {
            address,
            tokens: None,
            state: Arc::new(Mutex::new(RouterState {
                mode: RouterMode::Accept,
                fee_quote: U256::ZERO,
                quote_failure: None,
                quotes: 0,
                deposits: Vec::new(),
                on_deposit: None,
            })),
        }
    }

    /// A router that pulls accepted deposits out of `tokens`.
    pub fn with_tokens(address: Address, tokens: FakeToken) -> Self {
        Self {
            tokens: Some(tokens),
            ..Self::new(address)
        }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn set_mode(&self, mode: RouterMode) {
        self.state.lock().unwrap().mode = mode;
    }

    pub fn reject(&self, reason: &str) {
        self.set_mode(RouterMode::Reject(reason.to_string()));
    }

    pub fn fault(&self, reason: &str) {
        self.set_mode(RouterMode::Fault(reason.to_string()));
    }

    pub fn set_fee_quote(&self, fee: U256) {
        self.state.lock().unwrap().fee_quote = fee;
    }

    pub fn fail_quotes(&self, reason: &str) {
        self.state.lock().unwrap().quote_failure = Some(reason.to_string());
    }

    /// Runs `callback` during the next `deposit_v3`, before it is handled.
    pub fn on_deposit(&self, callback: impl FnOnce() + Send + 'static) {
        self.state.lock().unwrap().on_deposit = Some(Box::new(callback));
    }

    /// Accepted deposits with the account they were pulled from.
    pub fn deposits(&self) -> Vec<(Address, DepositV3)> {
        self.state.lock().unwrap().deposits.clone()
    }

    pub fn quote_count(&self) -> usize {
        self.state.lock().unwrap().quotes
    }
}

impl RouterProvider for FakeRouter {
    fn deposit_v3(&self, caller: Address, deposit: &DepositV3) -> Result<(), RouterError> {
        let callback = self.state.lock().unwrap().on_deposit.take();
        if let Some(callback) = callback {
            callback();
        }

        let mode = self.state.lock().unwrap().mode.clone();
        match mode {
            RouterMode::Accept => {
                if let Some(tokens) = &self.tokens {
                    tokens
                        .transfer_from(
                            deposit.token,
                            self.address,
                            caller,
                            self.address,
                            deposit.amount,
                        )
                        .map_err(|e| RouterError::Fault(e.reason))?;
                }
            }
            RouterMode::AcceptWithoutPull => {}
            RouterMode::Reject(reason) => return Err(RouterError::Rejected(reason)),
            RouterMode::Fault(reason) => return Err(RouterError::Fault(reason)),
        }

        self.state
            .lock()
            .unwrap()
            .deposits
            .push((caller, deposit.clone()));
        Ok(())
    }

    fn calculate_deposit_v3_fee(
        &self,
        _token: Address,
        _amount: U256,
        _destination_chain_id: u64,
    ) -> Result<U256, RouterError> {
        let mut state = self.state.lock().unwrap();
        state.quotes += 1;
        match &state.quote_failure {
            Some(reason) => Err(RouterError::Rejected(reason.clone())),
            None => Ok(state.fee_quote),
        }
    }
}

// ============================================================================
// Fake Clock
// ============================================================================

/// A settable block clock.
#[derive(Clone, Debug, Default)]
pub struct FakeClock {
    timestamp: Arc<AtomicU64>,
}

impl FakeClock {
    pub fn new(timestamp: u64) -> Self {
        Self {
            timestamp: Arc::new(AtomicU64::new(timestamp)),
        }
    }

    pub fn set(&self, timestamp: u64) {
        self.timestamp.store(timestamp, Ordering::SeqCst);
    }

    /// Moves the clock forward by `seconds`.
    pub fn advance(&self, seconds: u64) {
        self.timestamp.fetch_add(seconds, Ordering::SeqCst);
    }
}

impl Clock for FakeClock {
    fn timestamp(&self) -> u64 {
        self.timestamp.load(Ordering::SeqCst)
    }
}
