use alloy_primitives::Address;
use bon::Builder;
use serde::{Deserialize, Serialize};

use crate::error::{BridgeError, Result};
use crate::fee::{FeeMode, MAX_BRIDGE_FEE_BPS};

/// Environment variable prefix read by [`BridgeConfig::from_env`].
pub const ENV_PREFIX: &str = "BRIDGE_";

/// Deployment parameters of a bridge contract instance.
///
/// # Examples
///
/// ```rust
/// use bridge_ledger::BridgeConfig;
/// use alloy_primitives::Address;
///
/// let config = BridgeConfig::builder()
///     .owner(Address::repeat_byte(0x0a))
///     .contract_address(Address::repeat_byte(0xb1))
///     .source_chain_id(1)
///     .router(Address::repeat_byte(0x40))
///     .spoke_pool(Address::repeat_byte(0x5b))
///     .hub_pool(Address::repeat_byte(0x4b))
///     .fee_bps(250)
///     .build();
///
/// assert!(config.validate().is_ok());
/// ```
#[derive(Builder, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeConfig {
    /// The single privileged controller account.
    pub owner: Address,
    /// Address the contract holds custody under.
    pub contract_address: Address,
    pub source_chain_id: u64,
    pub router: Address,
    /// Router-side contract that pulls forwarded funds; the approved spender.
    pub spoke_pool: Address,
    pub hub_pool: Address,
    #[builder(default)]
    #[serde(default)]
    pub fee_bps: u16,
    #[builder(default)]
    #[serde(default)]
    pub fee_mode: FeeMode,
}

impl BridgeConfig {
    /// Checks addresses are set and the fee is within bounds.
    pub fn validate(&self) -> Result<()> {
        for (field, address) in [
            ("owner", self.owner),
            ("contractAddress", self.contract_address),
            ("router", self.router),
            ("spokePool", self.spoke_pool),
            ("hubPool", self.hub_pool),
        ] {
            if address.is_zero() {
                return Err(BridgeError::InvalidConfig(format!(
                    "{field} cannot be the zero address"
                )));
            }
        }

        if self.fee_bps > MAX_BRIDGE_FEE_BPS {
            return Err(BridgeError::InvalidConfig(format!(
                "feeBps {} exceeds maximum {}",
                self.fee_bps, MAX_BRIDGE_FEE_BPS
            )));
        }
        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads `BRIDGE_*` variables, reading a `.env` file first if present.
    ///
    /// | Variable | Required |
    /// |---|---|
    /// | `BRIDGE_OWNER` | yes |
    /// | `BRIDGE_CONTRACT_ADDRESS` | yes |
    /// | `BRIDGE_SOURCE_CHAIN_ID` | yes |
    /// | `BRIDGE_ROUTER` | yes |
    /// | `BRIDGE_SPOKE_POOL` | yes |
    /// | `BRIDGE_HUB_POOL` | yes |
    /// | `BRIDGE_FEE_BPS` | no, defaults to 0 |
    /// | `BRIDGE_FEE_MODE` | no, `protocol` or `router` |
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any key-value source using the `BRIDGE_*` names.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let required = |name: &str| -> Result<String> {
            let key = format!("{ENV_PREFIX}{name}");
            lookup(&key).ok_or_else(|| BridgeError::InvalidConfig(format!("{key} is not set")))
        };
        let address = |name: &str| -> Result<Address> {
            let raw = required(name)?;
            raw.trim().parse().map_err(|e| {
                BridgeError::InvalidConfig(format!("{ENV_PREFIX}{name} is not an address: {e}"))
            })
        };

        let source_chain_id = required("SOURCE_CHAIN_ID")?
            .trim()
            .parse::<u64>()
            .map_err(|e| {
                BridgeError::InvalidConfig(format!("{ENV_PREFIX}SOURCE_CHAIN_ID: {e}"))
            })?;

        let fee_bps = match lookup(&format!("{ENV_PREFIX}FEE_BPS")) {
            Some(raw) => raw.trim().parse::<u16>().map_err(|e| {
                BridgeError::InvalidConfig(format!("{ENV_PREFIX}FEE_BPS: {e}"))
            })?,
            None => 0,
        };

        let fee_mode = match lookup(&format!("{ENV_PREFIX}FEE_MODE")).as_deref().map(str::trim) {
            None | Some("protocol") => FeeMode::Protocol,
            Some("router") => FeeMode::Router,
            Some(other) => {
                return Err(BridgeError::InvalidConfig(format!(
                    "{ENV_PREFIX}FEE_MODE must be `protocol` or `router`, got `{other}`"
                )))
            }
        };

        let config = Self {
            owner: address("OWNER")?,
            contract_address: address("CONTRACT_ADDRESS")?,
            source_chain_id,
            router: address("ROUTER")?,
            spoke_pool: address("SPOKE_POOL")?,
            hub_pool: address("HUB_POOL")?,
            fee_bps,
            fee_mode,
        };
        config.validate()?;
        Ok(config)
    }
}
