//! Integration tests for the bridge contract using fake implementations
//!
//! Every scenario runs the real orchestrator against `FakeToken`,
//! `FakeRouter` and `FakeClock`, including hostile tokens and routers that
//! call back into the contract.

use alloy_primitives::{Address, U256};
use bridge_ledger::testing::{FakeClock, FakeRouter, FakeToken, RouterMode};
use bridge_ledger::traits::TokenProvider;
use bridge_ledger::{
    AccessError, BridgeConfig, BridgeContract, BridgeError, BridgeEvent, BridgeRequest,
    CustodyError, FeeError, FeeMode, LedgerError, LiquidityError, RouterFault, Transfer,
    TransferId, TransferStatus, ValidationError,
};
use rstest::rstest;
use std::sync::{Arc, Mutex};

const OWNER: Address = Address::repeat_byte(0x0a);
const BRIDGE: Address = Address::repeat_byte(0xb1);
const SPOKE_POOL: Address = Address::repeat_byte(0x5b);
const HUB_POOL: Address = Address::repeat_byte(0x4b);
const TOKEN: Address = Address::repeat_byte(0x70);
const USER: Address = Address::repeat_byte(0x01);
const RECIPIENT: Address = Address::repeat_byte(0x02);
const PROVIDER: Address = Address::repeat_byte(0xa1);

const SOURCE_CHAIN: u64 = 1;
const POLYGON: u64 = 137;
const START: u64 = 1_700_000_000;
const USER_FUNDS: u64 = 10_000;

type Contract = BridgeContract<FakeToken, FakeRouter, FakeClock>;

struct Env {
    contract: Arc<Contract>,
    tokens: FakeToken,
    router: FakeRouter,
    clock: FakeClock,
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Helper function to deploy a contract with a funded user
fn setup_with(fee_bps: u16, fee_mode: FeeMode) -> Env {
    init_tracing();

    let tokens = FakeToken::new();
    tokens.deploy(TOKEN);
    tokens.mint(TOKEN, USER, U256::from(USER_FUNDS));
    tokens.set_allowance(TOKEN, USER, BRIDGE, U256::MAX);

    let router = FakeRouter::with_tokens(SPOKE_POOL, tokens.clone());
    let clock = FakeClock::new(START);

    let config = BridgeConfig::builder()
        .owner(OWNER)
        .contract_address(BRIDGE)
        .source_chain_id(SOURCE_CHAIN)
        .router(SPOKE_POOL)
        .spoke_pool(SPOKE_POOL)
        .hub_pool(HUB_POOL)
        .fee_bps(fee_bps)
        .fee_mode(fee_mode)
        .build();
    let contract = BridgeContract::new(config, tokens.clone(), router.clone(), clock.clone())
        .expect("valid config");

    Env {
        contract: Arc::new(contract),
        tokens,
        router,
        clock,
    }
}

fn setup() -> Env {
    setup_with(250, FeeMode::Protocol)
}

fn request(amount: u64) -> BridgeRequest {
    BridgeRequest::builder()
        .token(TOKEN)
        .amount(U256::from(amount))
        .recipient(RECIPIENT)
        .destination_chain_id(POLYGON)
        .build()
}

fn user_balance(env: &Env) -> U256 {
    env.tokens.balance_of(TOKEN, USER)
}

/// Authorizes PROVIDER and deposits `amount` of liquidity.
fn fund_provider(env: &Env, amount: u64) {
    env.tokens.mint(TOKEN, PROVIDER, U256::from(amount));
    env.tokens
        .set_allowance(TOKEN, PROVIDER, BRIDGE, U256::from(amount));
    env.contract
        .add_liquidity_provider(OWNER, PROVIDER)
        .unwrap();
    env.contract
        .add_liquidity(PROVIDER, TOKEN, U256::from(amount))
        .unwrap();
}

// ============================================================================
// Happy path
// ============================================================================

#[test]
fn test_bridge_1000_at_250_bps_to_polygon() {
    let env = setup();
    env.router.set_fee_quote(U256::from(7));

    let id = env.contract.bridge(USER, &request(1000)).unwrap();

    assert_eq!(user_balance(&env), U256::from(USER_FUNDS - 1000));
    assert_eq!(env.tokens.balance_of(TOKEN, SPOKE_POOL), U256::from(975));
    assert_eq!(env.tokens.balance_of(TOKEN, BRIDGE), U256::from(25));
    assert_eq!(env.contract.get_total_transfers(), 1);

    let transfer = env.contract.get_transfer_details(id).unwrap();
    assert_eq!(
        transfer,
        Transfer {
            id,
            sender: USER,
            recipient: RECIPIENT,
            token: TOKEN,
            amount: U256::from(1000),
            fee: U256::from(25),
            bridged_amount: U256::from(975),
            source_chain_id: SOURCE_CHAIN,
            destination_chain_id: POLYGON,
            timestamp: START,
            status: TransferStatus::Completed,
        }
    );

    let deposits = env.router.deposits();
    assert_eq!(deposits.len(), 1);
    let (caller, deposit) = &deposits[0];
    assert_eq!(*caller, BRIDGE);
    assert_eq!(deposit.depositor, USER);
    assert_eq!(deposit.amount, U256::from(975));
    assert_eq!(deposit.fee_hint, U256::from(7));
    assert_eq!(deposit.destination_chain_id, POLYGON);
    assert_eq!(deposit.transfer_id(), Some(id));
}

#[test]
fn test_success_emits_initiated_then_completed() {
    let env = setup();
    let id = env.contract.bridge(USER, &request(1000)).unwrap();

    let events = env.contract.events();
    assert_eq!(events.len(), 2);

    let BridgeEvent::TransferInitiated(initiated) = &events[0] else {
        panic!("expected transferInitiated, got {:?}", events[0]);
    };
    assert_eq!(initiated.status, TransferStatus::Initiated);
    assert_eq!(initiated.amount, U256::from(1000));
    assert_eq!(initiated.bridged_amount, U256::from(975));

    let details = env.contract.get_transfer_details(id).unwrap();
    assert_eq!(
        Transfer {
            status: TransferStatus::Initiated,
            ..details
        },
        *initiated
    );

    assert_eq!(
        events[1],
        BridgeEvent::TransferStatusUpdated {
            id,
            status: TransferStatus::Completed,
            reason: String::new(),
        }
    );
}

#[test]
fn test_native_fee_budget_forwarded() {
    let env = setup();
    let request = BridgeRequest::builder()
        .token(TOKEN)
        .amount(U256::from(1000))
        .recipient(RECIPIENT)
        .destination_chain_id(POLYGON)
        .native_fee_budget(U256::from(42))
        .build();

    env.contract.bridge(USER, &request).unwrap();

    assert_eq!(env.router.deposits()[0].1.native_value, U256::from(42));
}

#[test]
fn test_router_fee_mode_forwards_everything() {
    let env = setup_with(250, FeeMode::Router);
    let id = env.contract.bridge(USER, &request(1000)).unwrap();

    let transfer = env.contract.get_transfer_details(id).unwrap();
    assert_eq!(transfer.fee, U256::ZERO);
    assert_eq!(transfer.bridged_amount, U256::from(1000));
    assert_eq!(env.contract.accrued_fees(TOKEN), U256::ZERO);
    assert_eq!(env.tokens.balance_of(TOKEN, BRIDGE), U256::ZERO);
}

// ============================================================================
// Router failure
// ============================================================================

#[rstest]
#[case::rejected(RouterMode::Reject("insufficient relayer liquidity".into()))]
#[case::fault(RouterMode::Fault("execution reverted".into()))]
fn test_router_failure_rolls_back(#[case] mode: RouterMode) {
    let env = setup();
    env.router.set_mode(mode.clone());

    let err = env.contract.bridge(USER, &request(1000)).unwrap_err();

    let expected_reason = match &mode {
        RouterMode::Reject(reason) | RouterMode::Fault(reason) => reason.clone(),
        _ => unreachable!(),
    };
    match (&mode, &err) {
        (RouterMode::Reject(_), BridgeError::Router(RouterFault::Rejected { reason, .. }))
        | (RouterMode::Fault(_), BridgeError::Router(RouterFault::Fault { reason, .. })) => {
            assert_eq!(reason, &expected_reason);
        }
        _ => panic!("unexpected error: {err}"),
    }

    assert_eq!(user_balance(&env), U256::from(USER_FUNDS));
    assert_eq!(env.tokens.balance_of(TOKEN, BRIDGE), U256::ZERO);
    assert_eq!(env.tokens.allowance(TOKEN, BRIDGE, SPOKE_POOL), U256::ZERO);
    assert_eq!(env.contract.get_total_transfers(), 0);
    assert!(env.contract.get_user_transfers(USER, 0).is_empty());
    assert!(env.contract.events().is_empty());
    assert_eq!(env.contract.accrued_fees(TOKEN), U256::ZERO);
}

#[test]
fn test_router_failure_leaves_revert_trace() {
    let env = setup();
    env.router.reject("destination paused");

    let err = env.contract.bridge(USER, &request(1000)).unwrap_err();
    let BridgeError::Router(fault) = err else {
        panic!("expected router fault, got {err}");
    };

    let trace = env.contract.last_revert().expect("revert trace");
    assert_eq!(trace.transfer_id(), fault.transfer_id());
    assert_eq!(trace.transfer.status, TransferStatus::Failed);
    assert_eq!(trace.reason, "destination paused");
    assert_eq!(trace.events.len(), 2);
    assert!(matches!(trace.events[0], BridgeEvent::TransferInitiated(_)));
    assert_eq!(
        trace.events[1],
        BridgeEvent::TransferStatusUpdated {
            id: fault.transfer_id(),
            status: TransferStatus::Failed,
            reason: "destination paused".to_string(),
        }
    );

    // Not part of the committed ledger.
    assert!(matches!(
        env.contract.get_transfer_details(fault.transfer_id()),
        Err(BridgeError::Ledger(LedgerError::NotFound(_)))
    ));
}

#[test]
fn test_router_success_without_pull_is_fault() {
    let env = setup();
    env.router.set_mode(RouterMode::AcceptWithoutPull);

    let err = env.contract.bridge(USER, &request(1000)).unwrap_err();

    assert!(matches!(
        &err,
        BridgeError::Router(RouterFault::Fault { reason, .. })
            if reason == "router did not pull forwarded funds"
    ));
    assert_eq!(user_balance(&env), U256::from(USER_FUNDS));
    assert_eq!(env.contract.get_total_transfers(), 0);
}

#[test]
fn test_retry_after_router_failure_succeeds() {
    let env = setup();
    env.router.reject("paused");
    assert!(env.contract.bridge(USER, &request(1000)).is_err());

    env.router.set_mode(RouterMode::Accept);
    let id = env.contract.bridge(USER, &request(1000)).unwrap();

    assert_eq!(env.contract.get_total_transfers(), 1);
    assert_eq!(
        env.contract.get_transfer_details(id).unwrap().status,
        TransferStatus::Completed
    );
}

// ============================================================================
// Identity and indexing
// ============================================================================

#[test]
fn test_identical_transfer_in_same_timestamp_is_duplicate() {
    let env = setup();
    let id = env.contract.bridge(USER, &request(1000)).unwrap();

    let err = env.contract.bridge(USER, &request(1000)).unwrap_err();
    assert!(matches!(
        err,
        BridgeError::Ledger(LedgerError::DuplicateId(dup)) if dup == id
    ));
    assert_eq!(user_balance(&env), U256::from(USER_FUNDS - 1000));

    env.clock.advance(12);
    let next = env.contract.bridge(USER, &request(1000)).unwrap();
    assert_ne!(next, id);
}

#[test]
fn test_different_destination_in_same_timestamp_is_distinct() {
    let env = setup();
    let to_polygon = env.contract.bridge(USER, &request(1000)).unwrap();

    let to_optimism = BridgeRequest::builder()
        .token(TOKEN)
        .amount(U256::from(1000))
        .recipient(RECIPIENT)
        .destination_chain_id(10)
        .build();
    let other = env.contract.bridge(USER, &to_optimism).unwrap();

    assert_ne!(to_polygon, other);
    assert_eq!(env.contract.get_total_transfers(), 2);
}

#[test]
fn test_user_transfers_most_recent_first() {
    let env = setup();
    let ids: Vec<TransferId> = (0..5)
        .map(|i| {
            env.clock.advance(12);
            env.contract.bridge(USER, &request(100 + i)).unwrap()
        })
        .collect();

    assert_eq!(
        env.contract.get_user_transfers(USER, 2),
        vec![ids[4], ids[3]]
    );

    let all: Vec<TransferId> = ids.iter().rev().copied().collect();
    assert_eq!(env.contract.get_user_transfers(USER, 0), all);
    assert_eq!(env.contract.get_user_transfers(USER, 50), all);
    assert_eq!(env.contract.get_user_transfers(RECIPIENT, 0), all);
    assert!(env.contract.get_user_transfers(OWNER, 0).is_empty());
}

#[test]
fn test_self_transfer_indexed_twice() {
    let env = setup();
    let request = BridgeRequest::builder()
        .token(TOKEN)
        .amount(U256::from(1000))
        .recipient(USER)
        .destination_chain_id(POLYGON)
        .build();

    let id = env.contract.bridge(USER, &request).unwrap();

    assert_eq!(env.contract.get_user_transfers(USER, 0), vec![id, id]);
    assert_eq!(env.contract.get_total_transfers(), 1);
}

#[test]
fn test_unknown_transfer_not_found() {
    let env = setup();
    let unknown = TransferId::repeat_byte(0xee);

    assert!(matches!(
        env.contract.get_transfer_details(unknown),
        Err(BridgeError::Ledger(LedgerError::NotFound(id))) if id == unknown
    ));
    assert!(matches!(
        env.contract.get_transfer_details(TransferId::ZERO),
        Err(BridgeError::Ledger(LedgerError::NotFound(_)))
    ));
}

// ============================================================================
// Validation and custody failures
// ============================================================================

#[rstest]
#[case::zero_amount(TOKEN, 0, RECIPIENT, POLYGON, ValidationError::ZeroAmount)]
#[case::zero_recipient(TOKEN, 1000, Address::ZERO, POLYGON, ValidationError::ZeroRecipient)]
#[case::not_a_contract(
    Address::repeat_byte(0xde),
    1000,
    RECIPIENT,
    POLYGON,
    ValidationError::NotAContract { token: Address::repeat_byte(0xde) }
)]
#[case::same_chain(
    TOKEN,
    1000,
    RECIPIENT,
    SOURCE_CHAIN,
    ValidationError::SameChain { chain_id: SOURCE_CHAIN }
)]
fn test_validation_rejects_before_any_mutation(
    #[case] token: Address,
    #[case] amount: u64,
    #[case] recipient: Address,
    #[case] destination_chain_id: u64,
    #[case] expected: ValidationError,
) {
    let env = setup();
    let request = BridgeRequest::builder()
        .token(token)
        .amount(U256::from(amount))
        .recipient(recipient)
        .destination_chain_id(destination_chain_id)
        .build();

    let err = env.contract.bridge(USER, &request).unwrap_err();

    assert!(matches!(err, BridgeError::Validation(ref e) if *e == expected));
    assert_eq!(user_balance(&env), U256::from(USER_FUNDS));
    assert_eq!(env.router.quote_count(), 0);
    assert!(env.contract.events().is_empty());
}

#[test]
fn test_insufficient_balance_aborts_before_ledger() {
    let env = setup();

    let err = env.contract.bridge(USER, &request(USER_FUNDS + 1)).unwrap_err();

    assert!(matches!(
        err,
        BridgeError::Custody(CustodyError::InsufficientBalance { .. })
    ));
    assert_eq!(env.contract.get_total_transfers(), 0);
}

#[test]
fn test_insufficient_allowance_aborts_before_ledger() {
    let env = setup();
    env.tokens
        .set_allowance(TOKEN, USER, BRIDGE, U256::from(999));

    let err = env.contract.bridge(USER, &request(1000)).unwrap_err();

    assert!(matches!(
        err,
        BridgeError::Custody(CustodyError::InsufficientAllowance { .. })
    ));
    assert_eq!(user_balance(&env), U256::from(USER_FUNDS));
    assert!(env.contract.events().is_empty());
}

#[test]
fn test_fee_on_transfer_token_rejected() {
    let env = setup();
    env.tokens.set_transfer_fee_bps(TOKEN, 100);

    let err = env.contract.bridge(USER, &request(1000)).unwrap_err();

    assert!(matches!(
        err,
        BridgeError::Custody(CustodyError::ShortTransfer { .. })
    ));
    assert_eq!(env.contract.get_total_transfers(), 0);
    assert!(env.router.deposits().is_empty());
}

#[test]
fn test_fee_quote_failure_aborts_before_escrow() {
    let env = setup();
    env.router.fail_quotes("route not enabled");

    let err = env.contract.bridge(USER, &request(1000)).unwrap_err();

    assert!(matches!(
        err,
        BridgeError::FeeQuote { ref reason } if reason == "route not enabled"
    ));
    assert_eq!(user_balance(&env), U256::from(USER_FUNDS));
}

// ============================================================================
// Reentrancy
// ============================================================================

#[test]
fn test_reentrant_bridge_from_router_callback() {
    let env = setup();
    let nested = Arc::new(Mutex::new(None));

    let contract = env.contract.clone();
    let slot = nested.clone();
    env.router.on_deposit(move || {
        *slot.lock().unwrap() = Some(contract.bridge(USER, &request(500)));
    });

    env.contract.bridge(USER, &request(1000)).unwrap();

    let nested = nested.lock().unwrap().take().expect("callback ran");
    assert!(matches!(nested, Err(BridgeError::Reentrancy)));
    assert_eq!(user_balance(&env), U256::from(USER_FUNDS - 1000));
    assert_eq!(env.router.deposits().len(), 1);
    assert_eq!(env.contract.get_total_transfers(), 1);
}

#[test]
fn test_reentrant_bridge_from_token_callback() {
    let env = setup();
    let nested = Arc::new(Mutex::new(None));

    let contract = env.contract.clone();
    let slot = nested.clone();
    env.tokens.on_transfer_from(move || {
        *slot.lock().unwrap() = Some(contract.bridge(USER, &request(500)));
    });

    env.contract.bridge(USER, &request(1000)).unwrap();

    let nested = nested.lock().unwrap().take().expect("callback ran");
    assert!(matches!(nested, Err(BridgeError::Reentrancy)));
    assert_eq!(user_balance(&env), U256::from(USER_FUNDS - 1000));
    assert_eq!(env.contract.get_total_transfers(), 1);
}

#[test]
fn test_reentrant_remove_liquidity_from_router_callback() {
    let env = setup();
    fund_provider(&env, 3000);

    let nested = Arc::new(Mutex::new(None));
    let contract = env.contract.clone();
    let slot = nested.clone();
    env.router.on_deposit(move || {
        *slot.lock().unwrap() =
            Some(contract.remove_liquidity(PROVIDER, TOKEN, U256::from(3000)));
    });

    env.contract.bridge(USER, &request(1000)).unwrap();

    let nested = nested.lock().unwrap().take().expect("callback ran");
    assert!(matches!(nested, Err(BridgeError::Reentrancy)));
    assert_eq!(env.contract.liquidity_of(PROVIDER, TOKEN), U256::from(3000));
    assert_eq!(env.tokens.balance_of(TOKEN, PROVIDER), U256::ZERO);
}

#[test]
fn test_reentrant_remove_liquidity_during_deposit() {
    let env = setup();
    fund_provider(&env, 3000);
    env.tokens.mint(TOKEN, PROVIDER, U256::from(500));
    env.tokens
        .set_allowance(TOKEN, PROVIDER, BRIDGE, U256::from(500));

    let nested = Arc::new(Mutex::new(None));
    let contract = env.contract.clone();
    let slot = nested.clone();
    env.tokens.on_transfer_from(move || {
        *slot.lock().unwrap() =
            Some(contract.remove_liquidity(PROVIDER, TOKEN, U256::from(3000)));
    });

    env.contract
        .add_liquidity(PROVIDER, TOKEN, U256::from(500))
        .unwrap();

    let nested = nested.lock().unwrap().take().expect("callback ran");
    assert!(matches!(nested, Err(BridgeError::Reentrancy)));
    assert_eq!(env.contract.liquidity_of(PROVIDER, TOKEN), U256::from(3500));
    assert_eq!(env.contract.total_liquidity(TOKEN), U256::from(3500));
}

#[test]
fn test_queries_allowed_inside_callback() {
    let env = setup();
    let observed = Arc::new(Mutex::new(None));

    let contract = env.contract.clone();
    let slot = observed.clone();
    env.router.on_deposit(move || {
        *slot.lock().unwrap() = Some((contract.bridge_fee_bps(), contract.owner()));
    });

    env.contract.bridge(USER, &request(1000)).unwrap();

    assert_eq!(*observed.lock().unwrap(), Some((250, OWNER)));
}

#[test]
fn test_concurrent_bridge_reports_busy() {
    let env = setup();
    let concurrent = Arc::new(Mutex::new(None));

    let contract = env.contract.clone();
    let slot = concurrent.clone();
    env.router.on_deposit(move || {
        let other = std::thread::spawn(move || contract.bridge(USER, &request(500)));
        *slot.lock().unwrap() = Some(other.join().unwrap());
    });

    env.contract.bridge(USER, &request(1000)).unwrap();

    let concurrent = concurrent.lock().unwrap().take().expect("callback ran");
    assert!(matches!(concurrent, Err(BridgeError::Busy)));
    assert_eq!(env.contract.get_total_transfers(), 1);
}

#[test]
fn test_owner_updates_from_other_thread_survive_failed_bridge() {
    let env = setup();
    env.router.fault("relayer offline");
    let new_provider = Address::repeat_byte(0x99);

    let contract = env.contract.clone();
    env.router.on_deposit(move || {
        std::thread::spawn(move || {
            contract.update_bridge_fee(OWNER, 500).unwrap();
            contract.add_liquidity_provider(OWNER, new_provider).unwrap();
        })
        .join()
        .unwrap();
    });

    let err = env.contract.bridge(USER, &request(1000)).unwrap_err();
    assert!(matches!(err, BridgeError::Router(RouterFault::Fault { .. })));

    assert_eq!(env.contract.bridge_fee_bps(), 500);
    assert!(env.contract.is_liquidity_provider(new_provider));
    assert_eq!(
        env.contract.events(),
        vec![
            BridgeEvent::FeeUpdated {
                old_bps: 250,
                new_bps: 500,
            },
            BridgeEvent::ProviderAdded {
                provider: new_provider,
            },
        ]
    );
    assert_eq!(env.contract.get_total_transfers(), 0);
    assert_eq!(env.contract.accrued_fees(TOKEN), U256::ZERO);
    assert_eq!(user_balance(&env), U256::from(USER_FUNDS));

    let trace = env.contract.last_revert().expect("revert trace");
    assert!(matches!(
        trace.events.as_slice(),
        [
            BridgeEvent::TransferInitiated(_),
            BridgeEvent::TransferStatusUpdated {
                status: TransferStatus::Failed,
                ..
            },
        ]
    ));
}

// ============================================================================
// Fees and administration
// ============================================================================

#[rstest]
#[case(0, true)]
#[case(1000, true)]
#[case(1001, false)]
#[case(u16::MAX, false)]
fn test_update_bridge_fee_bound(#[case] bps: u16, #[case] accepted: bool) {
    let env = setup();

    let result = env.contract.update_bridge_fee(OWNER, bps);

    assert_eq!(result.is_ok(), accepted);
    if accepted {
        assert_eq!(env.contract.bridge_fee_bps(), bps);
    } else {
        assert!(matches!(
            result,
            Err(BridgeError::Fee(FeeError::AboveMaximum { max: 1000, .. }))
        ));
        assert_eq!(env.contract.bridge_fee_bps(), 250);
    }
}

#[test]
fn test_fee_update_applies_to_next_transfer() {
    let env = setup();
    env.contract.update_bridge_fee(OWNER, 1000).unwrap();

    let id = env.contract.bridge(USER, &request(1000)).unwrap();

    let transfer = env.contract.get_transfer_details(id).unwrap();
    assert_eq!(transfer.fee, U256::from(100));
    assert_eq!(transfer.bridged_amount, U256::from(900));
    assert_eq!(
        env.contract.events()[0],
        BridgeEvent::FeeUpdated {
            old_bps: 250,
            new_bps: 1000,
        }
    );
}

#[test]
fn test_privileged_operations_require_owner() {
    let env = setup();

    let denied = |result: bridge_ledger::Result<()>| {
        matches!(
            result,
            Err(BridgeError::Access(AccessError::NotOwner { caller })) if caller == USER
        )
    };

    assert!(denied(env.contract.update_bridge_fee(USER, 10)));
    assert!(denied(env.contract.add_liquidity_provider(USER, PROVIDER)));
    assert!(denied(env.contract.remove_liquidity_provider(USER, PROVIDER)));
    assert!(denied(env.contract.transfer_ownership(USER, USER)));
    assert!(denied(env.contract.update_protocol_addresses(
        USER, SPOKE_POOL, SPOKE_POOL, HUB_POOL
    )));
    assert!(env.contract.events().is_empty());
}

#[test]
fn test_estimated_fee_is_router_quote() {
    let env = setup();
    env.router.set_fee_quote(U256::from(31));

    let fee = env
        .contract
        .get_estimated_bridge_fee(TOKEN, U256::from(1000), POLYGON)
        .unwrap();

    assert_eq!(fee, U256::from(31));
}

// ============================================================================
// Liquidity
// ============================================================================

#[test]
fn test_liquidity_round_trip() {
    let env = setup();
    fund_provider(&env, 3000);

    assert!(env.contract.is_liquidity_provider(PROVIDER));
    assert_eq!(env.contract.liquidity_of(PROVIDER, TOKEN), U256::from(3000));
    assert_eq!(env.contract.total_liquidity(TOKEN), U256::from(3000));
    assert_eq!(env.tokens.balance_of(TOKEN, BRIDGE), U256::from(3000));

    env.contract
        .remove_liquidity(PROVIDER, TOKEN, U256::from(1200))
        .unwrap();

    assert_eq!(env.contract.liquidity_of(PROVIDER, TOKEN), U256::from(1800));
    assert_eq!(env.contract.total_liquidity(TOKEN), U256::from(1800));
    assert_eq!(env.tokens.balance_of(TOKEN, PROVIDER), U256::from(1200));

    let events = env.contract.events();
    assert_eq!(
        events,
        vec![
            BridgeEvent::ProviderAdded { provider: PROVIDER },
            BridgeEvent::LiquidityAdded {
                provider: PROVIDER,
                token: TOKEN,
                amount: U256::from(3000),
            },
            BridgeEvent::LiquidityRemoved {
                provider: PROVIDER,
                token: TOKEN,
                amount: U256::from(1200),
            },
        ]
    );
}

#[test]
fn test_unauthorized_provider_cannot_deposit() {
    let env = setup();
    env.tokens.mint(TOKEN, PROVIDER, U256::from(100));
    env.tokens
        .set_allowance(TOKEN, PROVIDER, BRIDGE, U256::from(100));

    let err = env
        .contract
        .add_liquidity(PROVIDER, TOKEN, U256::from(100))
        .unwrap_err();

    assert!(matches!(
        err,
        BridgeError::Liquidity(LiquidityError::NotAuthorized { .. })
    ));
    assert_eq!(env.tokens.balance_of(TOKEN, PROVIDER), U256::from(100));
}

#[test]
fn test_remove_beyond_position_fails() {
    let env = setup();
    fund_provider(&env, 100);

    let err = env
        .contract
        .remove_liquidity(PROVIDER, TOKEN, U256::from(101))
        .unwrap_err();

    assert!(matches!(
        err,
        BridgeError::Liquidity(LiquidityError::InsufficientPosition { .. })
    ));
    assert_eq!(env.contract.liquidity_of(PROVIDER, TOKEN), U256::from(100));
}

#[test]
fn test_failed_release_restores_position() {
    let env = setup();
    fund_provider(&env, 100);
    env.tokens.reject_transfers(TOKEN, "paused");

    let err = env
        .contract
        .remove_liquidity(PROVIDER, TOKEN, U256::from(100))
        .unwrap_err();

    assert!(matches!(
        err,
        BridgeError::Custody(CustodyError::TransferRejected { .. })
    ));
    assert_eq!(env.contract.liquidity_of(PROVIDER, TOKEN), U256::from(100));
    assert_eq!(env.contract.total_liquidity(TOKEN), U256::from(100));
    assert_eq!(env.contract.events().len(), 2);
}

#[test]
fn test_provider_authorization_is_state_checked() {
    let env = setup();
    env.contract
        .add_liquidity_provider(OWNER, PROVIDER)
        .unwrap();

    assert!(matches!(
        env.contract.add_liquidity_provider(OWNER, PROVIDER),
        Err(BridgeError::Liquidity(LiquidityError::AlreadyAuthorized { .. }))
    ));

    env.contract
        .remove_liquidity_provider(OWNER, PROVIDER)
        .unwrap();
    assert!(!env.contract.is_liquidity_provider(PROVIDER));
    assert!(matches!(
        env.contract.remove_liquidity_provider(OWNER, PROVIDER),
        Err(BridgeError::Liquidity(LiquidityError::NotAuthorized { .. }))
    ));
}
