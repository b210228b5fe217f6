//! Bridge fee configuration and estimation
//!
//! The protocol fee is a basis-point cut taken from the escrowed amount when
//! a transfer is initiated. In [`FeeMode::Router`] the protocol takes nothing
//! and the router's own quote is the only fee.

use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{BridgeError, FeeError, Result};
use crate::traits::RouterProvider;

/// Basis points denominator (10000 = 100%)
pub const BPS_DENOMINATOR: u16 = 10_000;

/// Maximum bridge fee in basis points (1000 = 10%)
pub const MAX_BRIDGE_FEE_BPS: u16 = 1_000;

/// Where the fee charged on a transfer comes from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeeMode {
    /// A protocol fee of `bps` is retained from every transfer.
    #[default]
    Protocol,
    /// No protocol fee; the router's dynamic quote supersedes it.
    Router,
}

/// How an escrowed amount divides between the protocol and the router.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeSplit {
    pub fee: U256,
    pub forwarded: U256,
}

/// Owner-mutable fee parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeSchedule {
    bps: u16,
    mode: FeeMode,
}

impl FeeSchedule {
    pub fn new(bps: u16, mode: FeeMode) -> std::result::Result<Self, FeeError> {
        validate_bps(bps)?;
        Ok(Self { bps, mode })
    }

    pub fn bps(&self) -> u16 {
        self.bps
    }

    pub fn mode(&self) -> FeeMode {
        self.mode
    }

    /// Replaces the fee rate, returning the previous one.
    pub fn set_bps(&mut self, bps: u16) -> std::result::Result<u16, FeeError> {
        validate_bps(bps)?;
        Ok(std::mem::replace(&mut self.bps, bps))
    }

    /// Splits `amount` into the retained protocol fee and the forwarded rest.
    pub fn split(&self, amount: U256) -> Result<FeeSplit> {
        let fee = match self.mode {
            FeeMode::Protocol => bps_of(amount, self.bps)?,
            FeeMode::Router => U256::ZERO,
        };
        Ok(FeeSplit {
            fee,
            forwarded: amount - fee,
        })
    }
}

fn validate_bps(bps: u16) -> std::result::Result<(), FeeError> {
    if bps > MAX_BRIDGE_FEE_BPS {
        return Err(FeeError::AboveMaximum {
            bps,
            max: MAX_BRIDGE_FEE_BPS,
        });
    }
    Ok(())
}

/// `amount * bps / 10000`, rounded down.
pub fn bps_of(amount: U256, bps: u16) -> Result<U256> {
    amount
        .checked_mul(U256::from(bps))
        .map(|scaled| scaled / U256::from(BPS_DENOMINATOR))
        .ok_or(BridgeError::Overflow {
            context: "fee calculation",
        })
}

/// Read-only view over the router's fee quotes.
pub struct FeeEstimator<'a, R: RouterProvider> {
    router: &'a R,
}

impl<'a, R: RouterProvider> FeeEstimator<'a, R> {
    pub fn new(router: &'a R) -> Self {
        Self { router }
    }

    /// Asks the router what relaying `amount` of `token` would cost.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::FeeQuote`] carrying the router's reason if the
    /// quote fails.
    pub fn estimate_fee(
        &self,
        token: Address,
        amount: U256,
        destination_chain_id: u64,
    ) -> Result<U256> {
        match self
            .router
            .calculate_deposit_v3_fee(token, amount, destination_chain_id)
        {
            Ok(fee) => {
                debug!(
                    token = %token,
                    amount = %amount,
                    destination_chain_id = destination_chain_id,
                    fee = %fee,
                    event = "fee_quoted"
                );
                Ok(fee)
            }
            Err(e) => {
                warn!(
                    token = %token,
                    destination_chain_id = destination_chain_id,
                    error = %e,
                    event = "fee_quote_failed"
                );
                Err(BridgeError::FeeQuote {
                    reason: e.reason().to_string(),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeRouter;
    use rstest::rstest;

    #[rstest]
    #[case(1000, 250, 25)]
    #[case(1000, 0, 0)]
    #[case(1000, 1000, 100)]
    #[case(999, 1, 0)]
    #[case(10_000, 1, 1)]
    fn test_bps_of(#[case] amount: u64, #[case] bps: u16, #[case] expected: u64) {
        assert_eq!(bps_of(U256::from(amount), bps).unwrap(), U256::from(expected));
    }

    #[test]
    fn test_bps_of_overflow() {
        assert!(matches!(
            bps_of(U256::MAX, 2),
            Err(BridgeError::Overflow { .. })
        ));
    }

    #[test]
    fn test_protocol_split() {
        let schedule = FeeSchedule::new(250, FeeMode::Protocol).unwrap();
        let split = schedule.split(U256::from(1000)).unwrap();

        assert_eq!(split.fee, U256::from(25));
        assert_eq!(split.forwarded, U256::from(975));
    }

    #[test]
    fn test_router_mode_takes_no_protocol_fee() {
        let schedule = FeeSchedule::new(250, FeeMode::Router).unwrap();
        let split = schedule.split(U256::from(1000)).unwrap();

        assert_eq!(split.fee, U256::ZERO);
        assert_eq!(split.forwarded, U256::from(1000));
    }

    #[rstest]
    #[case(0, true)]
    #[case(999, true)]
    #[case(1000, true)]
    #[case(1001, false)]
    #[case(10_000, false)]
    fn test_fee_bound(#[case] bps: u16, #[case] accepted: bool) {
        assert_eq!(FeeSchedule::new(bps, FeeMode::Protocol).is_ok(), accepted);
    }

    #[test]
    fn test_set_bps_applies_immediately() {
        let mut schedule = FeeSchedule::new(250, FeeMode::Protocol).unwrap();

        assert_eq!(schedule.set_bps(500).unwrap(), 250);
        assert_eq!(schedule.split(U256::from(1000)).unwrap().fee, U256::from(50));

        assert_eq!(
            schedule.set_bps(1500).unwrap_err(),
            FeeError::AboveMaximum { bps: 1500, max: 1000 }
        );
        assert_eq!(schedule.bps(), 500);
    }

    #[test]
    fn test_estimator_delegates_to_router() {
        let router = FakeRouter::new(Address::repeat_byte(0x5b));
        router.set_fee_quote(U256::from(12));
        let estimator = FeeEstimator::new(&router);

        let fee = estimator
            .estimate_fee(Address::repeat_byte(0x70), U256::from(1000), 137)
            .unwrap();
        assert_eq!(fee, U256::from(12));
        assert_eq!(router.quote_count(), 1);
    }

    #[test]
    fn test_estimator_surfaces_router_reason() {
        let router = FakeRouter::new(Address::repeat_byte(0x5b));
        router.fail_quotes("route not enabled");
        let estimator = FeeEstimator::new(&router);

        let err = estimator
            .estimate_fee(Address::repeat_byte(0x70), U256::from(1000), 56)
            .unwrap_err();
        assert!(matches!(
            err,
            BridgeError::FeeQuote { reason } if reason == "route not enabled"
        ));
    }
}
