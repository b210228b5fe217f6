//! Tracing span helpers for bridge operations
//!
//! Static span names with structured attributes, kept apart from the business
//! logic. The contract uses these internally; they are public for callers who
//! want to nest their own instrumentation under the same names.
//!
//! # Example
//!
//! ```rust
//! use bridge_ledger::spans;
//! use alloy_primitives::{Address, U256};
//!
//! let span = spans::remove_liquidity(&Address::ZERO, &Address::ZERO, &U256::from(10));
//! let _guard = span.enter();
//! ```

use alloy_chains::Chain;
use alloy_primitives::{Address, U256};
use tracing::Span;

use crate::ledger::TransferId;

/// Span for one end-to-end `bridge` call.
///
/// Children: bridge_ledger.escrow, bridge_ledger.router_deposit
#[inline]
pub fn bridge(
    sender: &Address,
    recipient: &Address,
    token: &Address,
    amount: &U256,
    source_chain_id: u64,
    destination_chain_id: u64,
) -> Span {
    tracing::info_span!(
        "bridge_ledger.bridge",
        sender = %sender,
        recipient = %recipient,
        token = %token,
        amount = %amount,
        source_chain = %Chain::from_id(source_chain_id),
        destination_chain = %Chain::from_id(destination_chain_id),
        transfer_id = tracing::field::Empty,
        error.type = tracing::field::Empty,
        error.message = tracing::field::Empty,
        error.source = tracing::field::Empty,
        error.context = tracing::field::Empty,
        otel.status_code = "OK",
    )
}

/// Span for pulling user funds into custody.
///
/// Parent: bridge_ledger.bridge or bridge_ledger.add_liquidity
#[inline]
pub fn escrow(payer: &Address, token: &Address, amount: &U256) -> Span {
    tracing::debug_span!(
        "bridge_ledger.escrow",
        payer = %payer,
        token = %token,
        amount = %amount,
    )
}

/// Span for the router `depositV3` call.
///
/// Parent: bridge_ledger.bridge
#[inline]
pub fn router_deposit(
    transfer_id: &TransferId,
    router: &Address,
    amount: &U256,
    destination_chain_id: u64,
) -> Span {
    tracing::info_span!(
        "bridge_ledger.router_deposit",
        transfer_id = %transfer_id,
        router = %router,
        amount = %amount,
        destination_chain = %Chain::from_id(destination_chain_id),
        error.type = tracing::field::Empty,
        error.message = tracing::field::Empty,
        error.context = tracing::field::Empty,
        otel.status_code = "OK",
    )
}

#[inline]
pub fn add_liquidity(provider: &Address, token: &Address, amount: &U256) -> Span {
    tracing::info_span!(
        "bridge_ledger.add_liquidity",
        provider = %provider,
        token = %token,
        amount = %amount,
        error.type = tracing::field::Empty,
        error.message = tracing::field::Empty,
        error.source = tracing::field::Empty,
        otel.status_code = "OK",
    )
}

#[inline]
pub fn remove_liquidity(provider: &Address, token: &Address, amount: &U256) -> Span {
    tracing::info_span!(
        "bridge_ledger.remove_liquidity",
        provider = %provider,
        token = %token,
        amount = %amount,
        error.type = tracing::field::Empty,
        error.message = tracing::field::Empty,
        error.source = tracing::field::Empty,
        otel.status_code = "OK",
    )
}

/// Span for the owner paying out accrued protocol fees.
#[inline]
pub fn collect_fees(owner: &Address, token: &Address, to: &Address) -> Span {
    tracing::info_span!(
        "bridge_ledger.collect_fees",
        owner = %owner,
        token = %token,
        to = %to,
        amount = tracing::field::Empty,
        error.type = tracing::field::Empty,
        error.message = tracing::field::Empty,
        error.source = tracing::field::Empty,
        otel.status_code = "OK",
    )
}

/// Marks the current span failed with `error`.
///
/// `error.type` is the message up to its first colon, `error.source` the
/// wrapped cause when there is one.
pub fn record_error<E: std::error::Error>(error: &E) {
    let current_span = tracing::Span::current();
    let message = error.to_string();
    current_span.record(
        "error.type",
        message.split(':').next().unwrap_or("Unknown"),
    );
    current_span.record("error.message", message.as_str());
    current_span.record("otel.status_code", "ERROR");

    if let Some(source) = error.source() {
        current_span.record("error.source", source.to_string());
    }
}

/// Marks the current span failed with an error that has no error value,
/// such as a router outcome.
pub fn record_error_with_context(
    error_type: &str,
    error_message: &str,
    additional_context: Option<&str>,
) {
    let current_span = tracing::Span::current();
    current_span.record("error.type", error_type);
    current_span.record("error.message", error_message);
    current_span.record("otel.status_code", "ERROR");

    if let Some(context) = additional_context {
        current_span.record("error.context", context);
    }
}
