// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! The bridge contract: transfer orchestration, liquidity and administration.

use alloy_primitives::{Address, U256};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, error, info, warn};

use super::config::BridgeConfig;
use super::params::BridgeRequest;
use super::state::{Change, ContractState, Journal, ProtocolAddresses};
use super::trace::{RevertTrace, RouterOutcome};
use crate::custody::Custody;
use crate::error::{
    AccessError, BridgeError, CustodyError, LedgerError, Result, ValidationError,
};
use crate::events::BridgeEvent;
use crate::fee::{FeeEstimator, FeeMode, FeeSchedule, FeeSplit};
use crate::guard::ReentrancyGuard;
use crate::ledger::{derive_transfer_id, Transfer, TransferId, TransferStatus};
use crate::protocol::{encode_transfer_message, DepositV3};
use crate::spans;
use crate::traits::{Clock, RouterProvider, TokenProvider};

/// What has to be undone when an operation fails after touching funds.
struct Rollback {
    journal: Journal,
    payer: Address,
    token: Address,
    /// Amount to return to `payer` out of custody.
    refund: U256,
    /// Spender whose allowance must be reset to zero.
    spender: Option<Address>,
}

/// A bridge contract instance on one source chain.
///
/// Every state-mutating operation is all-or-nothing: on failure the changes
/// it made are taken back and any escrowed funds are returned. Changes other
/// callers committed in the meantime, such as an owner update from another
/// thread, are kept. `bridge`, `add_liquidity`, `remove_liquidity` and
/// `collect_fees` share a single-entry reentrancy guard: a nested call from
/// a callback gets [`BridgeError::Reentrancy`], a call from another thread
/// while one is in flight gets [`BridgeError::Busy`]. Queries and owner
/// configuration calls never take it and are safe to call from inside a
/// token or router callback.
///
/// # Example
///
/// ```rust
/// use bridge_ledger::testing::{FakeClock, FakeRouter, FakeToken};
/// use bridge_ledger::{BridgeConfig, BridgeContract, BridgeRequest, TransferStatus};
/// use alloy_primitives::{Address, U256};
///
/// let (token, user, bridge) = (
///     Address::repeat_byte(0x70),
///     Address::repeat_byte(0x01),
///     Address::repeat_byte(0xb1),
/// );
/// let tokens = FakeToken::new();
/// tokens.deploy(token);
/// tokens.mint(token, user, U256::from(1000));
/// tokens.set_allowance(token, user, bridge, U256::from(1000));
///
/// let router = FakeRouter::with_tokens(Address::repeat_byte(0x5b), tokens.clone());
/// let config = BridgeConfig::builder()
///     .owner(Address::repeat_byte(0x0a))
///     .contract_address(bridge)
///     .source_chain_id(1)
///     .router(router.address())
///     .spoke_pool(router.address())
///     .hub_pool(Address::repeat_byte(0x4b))
///     .fee_bps(250)
///     .build();
/// let contract = BridgeContract::new(config, tokens, router, FakeClock::new(1_700_000_000))?;
///
/// let request = BridgeRequest::builder()
///     .token(token)
///     .amount(U256::from(1000))
///     .recipient(Address::repeat_byte(0x02))
///     .destination_chain_id(137)
///     .build();
/// let id = contract.bridge(user, &request)?;
///
/// let transfer = contract.get_transfer_details(id)?;
/// assert_eq!(transfer.status, TransferStatus::Completed);
/// assert_eq!(transfer.bridged_amount, U256::from(975));
/// # Ok::<(), bridge_ledger::BridgeError>(())
/// ```
pub struct BridgeContract<T: TokenProvider, R: RouterProvider, C: Clock> {
    address: Address,
    source_chain_id: u64,
    tokens: T,
    router: R,
    clock: C,
    guard: ReentrancyGuard,
    state: Mutex<ContractState>,
    last_revert: Mutex<Option<RevertTrace>>,
}

impl<T: TokenProvider, R: RouterProvider, C: Clock> BridgeContract<T, R, C> {
    /// Deploys a contract instance.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::InvalidConfig`] if the configuration does not
    /// validate.
    pub fn new(config: BridgeConfig, tokens: T, router: R, clock: C) -> Result<Self> {
        config.validate()?;
        let fees = FeeSchedule::new(config.fee_bps, config.fee_mode)?;
        let addresses = ProtocolAddresses {
            router: config.router,
            spoke_pool: config.spoke_pool,
            hub_pool: config.hub_pool,
        };

        info!(
            contract = %config.contract_address,
            owner = %config.owner,
            source_chain_id = config.source_chain_id,
            fee_bps = config.fee_bps,
            fee_mode = ?config.fee_mode,
            event = "bridge_contract_deployed"
        );

        Ok(Self {
            address: config.contract_address,
            source_chain_id: config.source_chain_id,
            tokens,
            router,
            clock,
            guard: ReentrancyGuard::new(),
            state: Mutex::new(ContractState::new(config.owner, addresses, fees)),
            last_revert: Mutex::new(None),
        })
    }

    fn state(&self) -> MutexGuard<'_, ContractState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn custody(&self) -> Custody<'_, T> {
        Custody::new(&self.tokens, self.address)
    }

    // ------------------------------------------------------------------
    // Bridging
    // ------------------------------------------------------------------

    /// Escrows `request.amount` from `caller` and hands it to the router.
    ///
    /// Returns the ID of the COMPLETED transfer. On any failure nothing is
    /// committed and the caller's funds are returned; if the router was the
    /// cause, the FAILED record is available from [`Self::last_revert`].
    ///
    /// # Errors
    ///
    /// - [`BridgeError::Validation`] for a zero amount, zero recipient,
    ///   non-contract token or same-chain destination
    /// - [`BridgeError::FeeQuote`] if the router cannot quote the route
    /// - [`BridgeError::Custody`] if the escrow cannot be taken in full
    /// - [`BridgeError::Ledger`] for an identical transfer in the same block
    /// - [`BridgeError::Router`] if the router rejects or faults
    /// - [`BridgeError::Reentrancy`] if called from inside a guarded operation
    /// - [`BridgeError::Busy`] if another thread is inside a guarded operation
    pub fn bridge(&self, caller: Address, request: &BridgeRequest) -> Result<TransferId> {
        let span = spans::bridge(
            &caller,
            &request.recipient(),
            &request.token(),
            &request.amount(),
            self.source_chain_id,
            request.destination_chain_id(),
        );
        let _enter = span.enter();

        let result = self.bridge_guarded(caller, request);
        match &result {
            Ok(id) => {
                span.record("transfer_id", tracing::field::display(id));
            }
            Err(e) => spans::record_error(e),
        }
        result
    }

    fn bridge_guarded(&self, caller: Address, request: &BridgeRequest) -> Result<TransferId> {
        let _guard = self.guard.enter()?;

        let token = request.token();
        let amount = request.amount();
        let recipient = request.recipient();
        let destination_chain_id = request.destination_chain_id();
        self.validate_request(request)?;

        let (split, spoke_pool) = {
            let state = self.state();
            (state.fees.split(amount)?, state.addresses.spoke_pool)
        };
        let fee_hint = FeeEstimator::new(&self.router).estimate_fee(
            token,
            split.forwarded,
            destination_chain_id,
        )?;

        let timestamp = self.clock.timestamp();
        let id = derive_transfer_id(
            caller,
            recipient,
            token,
            amount,
            destination_chain_id,
            timestamp,
        );
        if self.state().transfers.contains(id) {
            return Err(LedgerError::DuplicateId(id).into());
        }

        // Idle -> Escrowed
        {
            let _span = spans::escrow(&caller, &token, &amount).entered();
            if let Err(e) = self.custody().escrow(caller, amount, token) {
                let refund = short_transfer_received(&e);
                return Err(self.unwind(
                    Rollback {
                        journal: Journal::new(),
                        payer: caller,
                        token,
                        refund,
                        spender: None,
                    },
                    e.into(),
                ));
            }
        }

        // Escrowed -> RouterPending
        let transfer = Transfer {
            id,
            sender: caller,
            recipient,
            token,
            amount,
            fee: split.fee,
            bridged_amount: split.forwarded,
            source_chain_id: self.source_chain_id,
            destination_chain_id,
            timestamp,
            status: TransferStatus::Initiated,
        };
        let mut rollback = Rollback {
            journal: Journal::new(),
            payer: caller,
            token,
            refund: amount,
            spender: None,
        };
        if let Err(e) = self.record_initiated(transfer, split, &mut rollback.journal) {
            return Err(self.unwind(rollback, e));
        }

        rollback.spender = Some(spoke_pool);
        if let Err(e) = self
            .custody()
            .approve_exact(spoke_pool, split.forwarded, token)
        {
            return Err(self.unwind(rollback, e.into()));
        }

        let deposit = DepositV3 {
            depositor: caller,
            recipient,
            token,
            amount: split.forwarded,
            destination_chain_id,
            message: encode_transfer_message(id),
            fee_hint,
            native_value: request.native_fee_budget(),
        };
        let (outcome, pulled) = self.submit_deposit(id, &deposit);

        // RouterPending -> Completed | Failed
        match outcome.into_fault(id) {
            None => {
                {
                    let mut state = self.state();
                    state.transfers.update_status(id, TransferStatus::Completed)?;
                    state.emit(BridgeEvent::TransferStatusUpdated {
                        id,
                        status: TransferStatus::Completed,
                        reason: String::new(),
                    });
                }
                info!(
                    transfer_id = %id,
                    sender = %caller,
                    amount = %amount,
                    bridged_amount = %split.forwarded,
                    fee = %split.fee,
                    event = "transfer_completed"
                );
                Ok(id)
            }
            Some(fault) => {
                warn!(
                    transfer_id = %id,
                    reason = %fault.reason(),
                    event = "transfer_failed"
                );
                self.record_revert(id, fault.reason(), &mut rollback.journal);
                if !pulled.is_zero() {
                    error!(
                        transfer_id = %id,
                        pulled = %pulled,
                        event = "router_kept_funds_on_failure"
                    );
                }
                rollback.refund = amount.saturating_sub(pulled);
                Err(self.unwind(rollback, fault.into()))
            }
        }
    }

    fn validate_request(&self, request: &BridgeRequest) -> Result<()> {
        if request.amount().is_zero() {
            return Err(ValidationError::ZeroAmount.into());
        }
        if request.recipient().is_zero() {
            return Err(ValidationError::ZeroRecipient.into());
        }
        if request.destination_chain_id() == self.source_chain_id {
            return Err(ValidationError::SameChain {
                chain_id: self.source_chain_id,
            }
            .into());
        }
        if !self.tokens.has_code(request.token()) {
            return Err(ValidationError::NotAContract {
                token: request.token(),
            }
            .into());
        }
        Ok(())
    }

    fn record_initiated(
        &self,
        transfer: Transfer,
        split: FeeSplit,
        journal: &mut Journal,
    ) -> Result<()> {
        let mut state = self.state();
        state.transfers.insert(transfer.clone())?;
        journal.push(Change::Recorded(transfer.id));
        if state.fees.mode() == FeeMode::Protocol {
            state.accrue_fee(transfer.token, split.fee)?;
            journal.push(Change::Accrued {
                token: transfer.token,
                fee: split.fee,
            });
        }
        info!(
            transfer_id = %transfer.id,
            sender = %transfer.sender,
            recipient = %transfer.recipient,
            amount = %transfer.amount,
            destination_chain_id = transfer.destination_chain_id,
            event = "transfer_initiated"
        );
        journal.push(Change::Emitted(
            state.emit(BridgeEvent::TransferInitiated(transfer)),
        ));
        Ok(())
    }

    /// Calls the router and checks it actually took the forwarded funds.
    ///
    /// Returns the outcome together with the amount that left custody.
    fn submit_deposit(&self, id: TransferId, deposit: &DepositV3) -> (RouterOutcome, U256) {
        let router = self.state().addresses.router;
        let _span = spans::router_deposit(
            &id,
            &router,
            &deposit.amount,
            deposit.destination_chain_id,
        )
        .entered();

        let custody = self.custody();
        let held_before = custody.held(deposit.token);
        let outcome = RouterOutcome::from(self.router.deposit_v3(self.address, deposit));
        let pulled = held_before.saturating_sub(custody.held(deposit.token));

        let outcome = if outcome.is_completed() && pulled < deposit.amount {
            warn!(
                transfer_id = %id,
                expected = %deposit.amount,
                pulled = %pulled,
                event = "router_pull_missing"
            );
            RouterOutcome::Fault("router did not pull forwarded funds".to_string())
        } else {
            outcome
        };

        match &outcome {
            RouterOutcome::Completed => {
                debug!(transfer_id = %id, pulled = %pulled, event = "router_returned");
            }
            RouterOutcome::Failed(reason) => {
                spans::record_error_with_context("RouterRejected", reason, None);
            }
            RouterOutcome::Fault(reason) => {
                let pulled = format!("pulled {pulled} of {}", deposit.amount);
                spans::record_error_with_context("RouterFault", reason, Some(pulled.as_str()));
            }
        }
        (outcome, pulled)
    }

    /// Marks the staged transfer FAILED and keeps the signals this attempt
    /// emitted as the revert trace.
    fn record_revert(&self, id: TransferId, reason: &str, journal: &mut Journal) {
        let trace = {
            let mut state = self.state();
            let transfer = match state.transfers.update_status(id, TransferStatus::Failed) {
                Ok(transfer) => transfer.clone(),
                Err(e) => {
                    error!(transfer_id = %id, error = %e, event = "revert_trace_unavailable");
                    return;
                }
            };
            journal.push(Change::Emitted(state.emit(
                BridgeEvent::TransferStatusUpdated {
                    id,
                    status: TransferStatus::Failed,
                    reason: reason.to_string(),
                },
            )));
            RevertTrace {
                transfer,
                events: journal
                    .emitted()
                    .filter_map(|index| state.events.get(index).cloned())
                    .collect(),
                reason: reason.to_string(),
            }
        };
        *self
            .last_revert
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(trace);
    }

    /// Takes back the journaled changes, clears the allowance and refunds
    /// the payer.
    fn unwind(&self, rollback: Rollback, cause: BridgeError) -> BridgeError {
        if !rollback.journal.is_empty() {
            self.state().revert(rollback.journal);
        }
        let custody = self.custody();

        if let Some(spender) = rollback.spender {
            if let Err(e) = custody.approve_exact(spender, U256::ZERO, rollback.token) {
                warn!(
                    spender = %spender,
                    token = %rollback.token,
                    error = %e,
                    event = "allowance_reset_failed"
                );
            }
        }

        if rollback.refund.is_zero() {
            return cause;
        }
        match custody.release(rollback.payer, rollback.refund, rollback.token) {
            Ok(()) => {
                info!(
                    payer = %rollback.payer,
                    token = %rollback.token,
                    amount = %rollback.refund,
                    cause = %cause,
                    event = "escrow_refunded"
                );
                cause
            }
            Err(refund) => {
                error!(
                    payer = %rollback.payer,
                    token = %rollback.token,
                    amount = %rollback.refund,
                    cause = %cause,
                    error = %refund,
                    event = "escrow_refund_failed"
                );
                BridgeError::RefundFailed {
                    original: Box::new(cause),
                    refund,
                }
            }
        }
    }

    // ------------------------------------------------------------------
    // Liquidity
    // ------------------------------------------------------------------

    /// Deposits `amount` of `token` from an authorized provider into the pool.
    pub fn add_liquidity(&self, provider: Address, token: Address, amount: U256) -> Result<()> {
        let span = spans::add_liquidity(&provider, &token, &amount);
        let _enter = span.enter();

        let result = self.add_liquidity_guarded(provider, token, amount);
        if let Err(e) = &result {
            spans::record_error(e);
        }
        result
    }

    fn add_liquidity_guarded(&self, provider: Address, token: Address, amount: U256) -> Result<()> {
        let _guard = self.guard.enter()?;
        if amount.is_zero() {
            return Err(ValidationError::ZeroAmount.into());
        }

        {
            let state = self.state();
            state.liquidity.ensure_authorized(provider)?;
            state.liquidity.check_credit(provider, token, amount)?;
        }

        {
            let _span = spans::escrow(&provider, &token, &amount).entered();
            if let Err(e) = self.custody().escrow(provider, amount, token) {
                let refund = short_transfer_received(&e);
                return Err(self.unwind(
                    Rollback {
                        journal: Journal::new(),
                        payer: provider,
                        token,
                        refund,
                        spender: None,
                    },
                    e.into(),
                ));
            }
        }

        let credited = {
            let mut state = self.state();
            state.liquidity.credit(provider, token, amount).map(|position| {
                state.emit(BridgeEvent::LiquidityAdded {
                    provider,
                    token,
                    amount,
                });
                position
            })
        };
        match credited {
            Ok(position) => {
                info!(
                    provider = %provider,
                    token = %token,
                    amount = %amount,
                    position = %position,
                    event = "liquidity_added"
                );
                Ok(())
            }
            Err(e) => Err(self.unwind(
                Rollback {
                    journal: Journal::new(),
                    payer: provider,
                    token,
                    refund: amount,
                    spender: None,
                },
                e,
            )),
        }
    }

    /// Withdraws `amount` of `token` from the provider's position.
    ///
    /// The position is debited before the funds leave custody.
    pub fn remove_liquidity(&self, provider: Address, token: Address, amount: U256) -> Result<()> {
        let span = spans::remove_liquidity(&provider, &token, &amount);
        let _enter = span.enter();

        let result = self.remove_liquidity_guarded(provider, token, amount);
        if let Err(e) = &result {
            spans::record_error(e);
        }
        result
    }

    fn remove_liquidity_guarded(
        &self,
        provider: Address,
        token: Address,
        amount: U256,
    ) -> Result<()> {
        let _guard = self.guard.enter()?;
        if amount.is_zero() {
            return Err(ValidationError::ZeroAmount.into());
        }

        let mut journal = Journal::new();
        let position = {
            let mut state = self.state();
            let position = state.liquidity.debit(provider, token, amount)?;
            journal.push(Change::Debited {
                provider,
                token,
                amount,
            });
            journal.push(Change::Emitted(state.emit(BridgeEvent::LiquidityRemoved {
                provider,
                token,
                amount,
            })));
            position
        };

        if let Err(e) = self.custody().release(provider, amount, token) {
            self.state().revert(journal);
            warn!(
                provider = %provider,
                token = %token,
                error = %e,
                event = "liquidity_release_failed"
            );
            return Err(e.into());
        }

        info!(
            provider = %provider,
            token = %token,
            amount = %amount,
            position = %position,
            event = "liquidity_removed"
        );
        Ok(())
    }

    // ------------------------------------------------------------------
    // Administration
    // ------------------------------------------------------------------

    fn ensure_owner(&self, state: &ContractState, caller: Address) -> Result<()> {
        if state.owner != caller {
            warn!(caller = %caller, event = "unauthorized_call");
            return Err(AccessError::NotOwner { caller }.into());
        }
        Ok(())
    }

    pub fn update_protocol_addresses(
        &self,
        caller: Address,
        router: Address,
        spoke_pool: Address,
        hub_pool: Address,
    ) -> Result<()> {
        let mut state = self.state();
        self.ensure_owner(&state, caller)?;
        for (field, address) in [
            ("router", router),
            ("spoke_pool", spoke_pool),
            ("hub_pool", hub_pool),
        ] {
            if address.is_zero() {
                return Err(AccessError::ZeroAddress { field }.into());
            }
        }

        state.addresses = ProtocolAddresses {
            router,
            spoke_pool,
            hub_pool,
        };
        state.emit(BridgeEvent::ProtocolAddressesUpdated {
            router,
            spoke_pool,
            hub_pool,
        });
        info!(
            router = %router,
            spoke_pool = %spoke_pool,
            hub_pool = %hub_pool,
            event = "protocol_addresses_updated"
        );
        Ok(())
    }

    /// Sets the protocol fee; applies to the next transfer.
    pub fn update_bridge_fee(&self, caller: Address, bps: u16) -> Result<()> {
        let mut state = self.state();
        self.ensure_owner(&state, caller)?;
        let old_bps = state.fees.set_bps(bps)?;

        state.emit(BridgeEvent::FeeUpdated {
            old_bps,
            new_bps: bps,
        });
        info!(old_bps, new_bps = bps, event = "bridge_fee_updated");
        Ok(())
    }

    pub fn add_liquidity_provider(&self, caller: Address, provider: Address) -> Result<()> {
        let mut state = self.state();
        self.ensure_owner(&state, caller)?;
        if provider.is_zero() {
            return Err(AccessError::ZeroAddress { field: "provider" }.into());
        }
        state.liquidity.authorize(provider)?;

        state.emit(BridgeEvent::ProviderAdded { provider });
        info!(provider = %provider, event = "liquidity_provider_added");
        Ok(())
    }

    /// Revokes a provider. Existing positions stay on the books.
    pub fn remove_liquidity_provider(&self, caller: Address, provider: Address) -> Result<()> {
        let mut state = self.state();
        self.ensure_owner(&state, caller)?;
        state.liquidity.revoke(provider)?;

        state.emit(BridgeEvent::ProviderRemoved { provider });
        info!(provider = %provider, event = "liquidity_provider_removed");
        Ok(())
    }

    pub fn transfer_ownership(&self, caller: Address, new_owner: Address) -> Result<()> {
        let mut state = self.state();
        self.ensure_owner(&state, caller)?;
        if new_owner.is_zero() {
            return Err(AccessError::ZeroAddress { field: "new_owner" }.into());
        }

        let previous_owner = std::mem::replace(&mut state.owner, new_owner);
        state.emit(BridgeEvent::OwnershipTransferred {
            previous_owner,
            new_owner,
        });
        info!(
            previous_owner = %previous_owner,
            new_owner = %new_owner,
            event = "ownership_transferred"
        );
        Ok(())
    }

    /// Pays out the protocol fees retained in `token` and returns the amount.
    pub fn collect_fees(&self, caller: Address, token: Address, to: Address) -> Result<U256> {
        let span = spans::collect_fees(&caller, &token, &to);
        let _enter = span.enter();

        let result = self.collect_fees_guarded(caller, token, to);
        match &result {
            Ok(amount) => {
                span.record("amount", tracing::field::display(amount));
            }
            Err(e) => spans::record_error(e),
        }
        result
    }

    fn collect_fees_guarded(&self, caller: Address, token: Address, to: Address) -> Result<U256> {
        let _guard = self.guard.enter()?;

        let mut journal = Journal::new();
        let amount = {
            let mut state = self.state();
            self.ensure_owner(&state, caller)?;
            if to.is_zero() {
                return Err(AccessError::ZeroAddress { field: "to" }.into());
            }
            let amount = state.take_fees(token);
            if amount.is_zero() {
                return Ok(U256::ZERO);
            }
            journal.push(Change::Collected { token, amount });
            journal.push(Change::Emitted(state.emit(BridgeEvent::FeesCollected {
                token,
                to,
                amount,
            })));
            amount
        };

        if let Err(e) = self.custody().release(to, amount, token) {
            self.state().revert(journal);
            warn!(token = %token, to = %to, error = %e, event = "fee_collection_failed");
            return Err(e.into());
        }

        info!(token = %token, to = %to, amount = %amount, event = "fees_collected");
        Ok(amount)
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Up to `limit` transfer IDs sent or received by `user`, most recent
    /// first. Zero returns all of them.
    pub fn get_user_transfers(&self, user: Address, limit: usize) -> Vec<TransferId> {
        self.state().transfers.list_for_user(user, limit)
    }

    pub fn get_transfer_details(&self, id: TransferId) -> Result<Transfer> {
        Ok(self.state().transfers.get(id)?.clone())
    }

    pub fn get_total_transfers(&self) -> usize {
        self.state().transfers.len()
    }

    /// Router quote for relaying `amount` of `token` to the destination.
    pub fn get_estimated_bridge_fee(
        &self,
        token: Address,
        amount: U256,
        destination_chain_id: u64,
    ) -> Result<U256> {
        FeeEstimator::new(&self.router).estimate_fee(token, amount, destination_chain_id)
    }

    pub fn liquidity_of(&self, provider: Address, token: Address) -> U256 {
        self.state().liquidity.position(provider, token)
    }

    pub fn total_liquidity(&self, token: Address) -> U256 {
        self.state().liquidity.total(token)
    }

    pub fn is_liquidity_provider(&self, provider: Address) -> bool {
        self.state().liquidity.is_authorized(provider)
    }

    pub fn bridge_fee_bps(&self) -> u16 {
        self.state().fees.bps()
    }

    pub fn fee_mode(&self) -> FeeMode {
        self.state().fees.mode()
    }

    pub fn owner(&self) -> Address {
        self.state().owner
    }

    pub fn protocol_addresses(&self) -> ProtocolAddresses {
        self.state().addresses
    }

    /// Protocol fees retained in `token` and not yet collected.
    pub fn accrued_fees(&self, token: Address) -> U256 {
        self.state().accrued(token)
    }

    /// Every committed signal, oldest first.
    pub fn events(&self) -> Vec<BridgeEvent> {
        self.state().events.clone()
    }

    /// The most recent bridge attempt rolled back because of the router.
    pub fn last_revert(&self) -> Option<RevertTrace> {
        self.last_revert
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The address funds are held under.
    pub fn address(&self) -> Address {
        self.address
    }

    pub fn source_chain_id(&self) -> u64 {
        self.source_chain_id
    }
}

/// Amount that did reach custody when an escrow came up short.
fn short_transfer_received(error: &CustodyError) -> U256 {
    match error {
        CustodyError::ShortTransfer { received, .. } => *received,
        _ => U256::ZERO,
    }
}
