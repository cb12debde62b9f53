// Configuration management module
// This file handles loading the router's construction parameters
// from environment variables and an optional config file
//
// Numan Thabit 2025 Nov

use alloy_primitives::Address;
use anyhow::{ensure, Context, Result};
use serde::Deserialize;
use std::path::Path;

use crate::constants::{BPS_DENOMINATOR, DEFAULT_FEE_TIERS, MAX_FEE_BPS};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RouterConfig {
    /// Initial owner of the router contract
    pub owner: Address,
    /// Address the router contract is deployed at
    #[serde(default = "default_router_address")]
    pub router_address: Address,
    /// Reference tokens seeding the two-hop search (e.g. WETH, USDC); zero entries are ignored
    #[serde(default)]
    pub seed_tokens: Vec<Address>,
    /// Protocol fee withheld from every swap output, in basis points
    #[serde(default)]
    pub fee_percent_bps: u32,
    /// Fee tiers allowed for concentrated-liquidity venues
    #[serde(default = "default_fee_tiers")]
    pub fee_tiers: Vec<u32>,
}

fn default_router_address() -> Address {
    Address::repeat_byte(0xd0)
}

fn default_fee_tiers() -> Vec<u32> {
    DEFAULT_FEE_TIERS.to_vec()
}

impl RouterConfig {
    /// Load from `ROUTER_*` environment variables, e.g. `ROUTER_OWNER=0x…`,
    /// `ROUTER_SEED_TOKENS=0x…,0x…`, `ROUTER_FEE_TIERS=1,5,30,100`.
    pub fn load() -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(Self::environment())
            .build()
            .context("build router configuration")?;
        let parsed: Self = cfg.try_deserialize().context("deserialize router configuration")?;
        parsed.validate()?;
        Ok(parsed)
    }

    /// Load from a config file, with environment variables taking precedence.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let cfg = config::Config::builder()
            .add_source(config::File::from(path))
            .add_source(Self::environment())
            .build()
            .with_context(|| format!("read router configuration from {}", path.display()))?;
        let parsed: Self = cfg.try_deserialize().context("deserialize router configuration")?;
        parsed.validate()?;
        Ok(parsed)
    }

    fn environment() -> config::Environment {
        config::Environment::with_prefix("ROUTER")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
            .list_separator(",")
            .with_list_parse_key("seed_tokens")
            .with_list_parse_key("fee_tiers")
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(!self.owner.is_zero(), "owner must not be the zero address");
        ensure!(
            !self.router_address.is_zero(),
            "router address must not be the zero address"
        );
        ensure!(
            self.fee_percent_bps <= MAX_FEE_BPS,
            "fee {}bps exceeds cap of {}bps",
            self.fee_percent_bps,
            MAX_FEE_BPS
        );
        for tier in &self.fee_tiers {
            ensure!(
                *tier > 0 && *tier < BPS_DENOMINATOR,
                "fee tier {tier} must be between 1 and {}",
                BPS_DENOMINATOR - 1
            );
        }
        Ok(())
    }

    /// Defaults for everything but the owner.
    pub fn for_owner(owner: Address) -> Self {
        Self {
            owner,
            router_address: default_router_address(),
            seed_tokens: Vec::new(),
            fee_percent_bps: 0,
            fee_tiers: default_fee_tiers(),
        }
    }

    pub fn with_router_address(mut self, address: Address) -> Self {
        self.router_address = address;
        self
    }

    pub fn with_seed_tokens(mut self, tokens: impl IntoIterator<Item = Address>) -> Self {
        self.seed_tokens = tokens.into_iter().collect();
        self
    }

    pub fn with_fee_percent(mut self, bps: u32) -> Self {
        self.fee_percent_bps = bps;
        self
    }

    pub fn with_fee_tiers(mut self, tiers: impl IntoIterator<Item = u32>) -> Self {
        self.fee_tiers = tiers.into_iter().collect();
        self
    }
}
