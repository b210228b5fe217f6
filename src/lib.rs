//! # bridge-ledger
//!
//! Transfer ledger and custody state machine for cross-chain token transfers
//! relayed by an external router.
//!
//! A [`BridgeContract`] escrows user funds, records each transfer under a
//! content-derived ID, hands the net amount to the router and settles the
//! record as COMPLETED, or rolls everything back when the router refuses.
//! Tokens, the router and the block clock are injected through the
//! capability traits in [`traits`], so the whole flow runs against the fakes
//! in [`testing`] as easily as against a real environment.
//!
//! ## Quick Start
//!
//! ```rust
//! use bridge_ledger::testing::{FakeClock, FakeRouter, FakeToken};
//! use bridge_ledger::traits::TokenProvider;
//! use bridge_ledger::{BridgeConfig, BridgeContract, BridgeEvent, BridgeRequest};
//! use alloy_primitives::{Address, U256};
//!
//! # fn main() -> bridge_ledger::Result<()> {
//! let (usdc, alice, bridge) = (
//!     Address::repeat_byte(0x70),
//!     Address::repeat_byte(0x01),
//!     Address::repeat_byte(0xb1),
//! );
//!
//! let tokens = FakeToken::new();
//! tokens.deploy(usdc);
//! tokens.mint(usdc, alice, U256::from(5_000));
//! tokens.set_allowance(usdc, alice, bridge, U256::from(5_000));
//! let router = FakeRouter::with_tokens(Address::repeat_byte(0x5b), tokens.clone());
//!
//! let config = BridgeConfig::builder()
//!     .owner(Address::repeat_byte(0x0a))
//!     .contract_address(bridge)
//!     .source_chain_id(1)
//!     .router(router.address())
//!     .spoke_pool(router.address())
//!     .hub_pool(Address::repeat_byte(0x4b))
//!     .fee_bps(100)
//!     .build();
//! let contract = BridgeContract::new(config, tokens.clone(), router, FakeClock::new(1_700_000_000))?;
//!
//! let request = BridgeRequest::builder()
//!     .token(usdc)
//!     .amount(U256::from(2_000))
//!     .recipient(alice)
//!     .destination_chain_id(10)
//!     .build();
//! let id = contract.bridge(alice, &request)?;
//!
//! assert_eq!(tokens.balance_of(usdc, alice), U256::from(3_000));
//! assert_eq!(contract.get_user_transfers(alice, 1), vec![id]);
//! assert!(matches!(contract.events()[0], BridgeEvent::TransferInitiated(_)));
//! # Ok(())
//! # }
//! ```
//!
//! ## Public API
//!
//! - [`BridgeContract`] - the orchestrator: bridging, liquidity, administration and queries
//! - [`BridgeConfig`] and [`BridgeRequest`] - deployment configuration and request parameters
//! - [`Transfer`], [`TransferId`] and [`TransferStatus`] - ledger records
//! - [`BridgeEvent`] - emitted signals
//! - [`RevertTrace`] - the FAILED record of a rolled-back attempt
//! - [`BridgeError`] and [`Result`] - error types
//! - [`traits`] - capability seams for tokens, router and clock

mod bridge;
mod error;
mod guard;

pub mod custody;
pub mod events;
pub mod fee;
pub mod ledger;
pub mod liquidity;
pub mod protocol;
pub mod providers;
pub mod testing;
pub mod traits;

// Public module for advanced users who need custom instrumentation
pub mod spans;

pub use bridge::{
    BridgeConfig, BridgeContract, BridgeRequest, ProtocolAddresses, RevertTrace, RouterOutcome,
    ENV_PREFIX,
};
pub use error::{
    AccessError, BridgeError, CustodyError, FeeError, LedgerError, LiquidityError, Result,
    RouterError, RouterFault, TokenError, ValidationError,
};
pub use events::BridgeEvent;
pub use fee::{FeeMode, BPS_DENOMINATOR, MAX_BRIDGE_FEE_BPS};
pub use guard::{GuardToken, ReentrancyGuard};
pub use ledger::{derive_transfer_id, Transfer, TransferId, TransferStatus};
pub use protocol::DepositV3;
