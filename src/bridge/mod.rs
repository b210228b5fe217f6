// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! Bridge orchestration
//!
//! This module provides the contract that ties custody, the transfer ledger,
//! the liquidity ledger and the router together, along with its deployment
//! configuration and request parameters.

mod config;
mod contract;
mod params;
mod state;
mod trace;

pub use config::{BridgeConfig, ENV_PREFIX};
pub use contract::BridgeContract;
pub use params::BridgeRequest;
pub use state::ProtocolAddresses;
pub use trace::{RevertTrace, RouterOutcome};
