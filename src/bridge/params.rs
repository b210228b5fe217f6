use alloy_primitives::{Address, U256};
use bon::Builder;

/// Parameters of a single bridge request.
#[derive(Builder, Debug, Clone)]
pub struct BridgeRequest {
    token: Address,
    amount: U256,
    recipient: Address,
    destination_chain_id: u64,
    /// Native currency forwarded to the router for destination-side fees.
    #[builder(default)]
    native_fee_budget: U256,
}

impl BridgeRequest {
    pub fn token(&self) -> Address {
        self.token
    }

    pub fn amount(&self) -> U256 {
        self.amount
    }

    pub fn recipient(&self) -> Address {
        self.recipient
    }

    pub fn destination_chain_id(&self) -> u64 {
        self.destination_chain_id
    }

    pub fn native_fee_budget(&self) -> U256 {
        self.native_fee_budget
    }
}
