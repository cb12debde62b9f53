// Router contract storage
//
// Everything the router persists between transactions: owner and pause
// state, the venue whitelist, fee tiers, fee accounting and the set of
// intermediate tokens searched for two-hop paths. The whole struct is
// cloned into a checkpoint at the start of every transaction.
//
// Numan Thabit 2025 Nov

use alloy_primitives::Address;

use crate::config::RouterConfig;
use crate::constants::MAX_INTERMEDIATES;
use crate::control::{AccessControl, OwnerCap};
use crate::errors::RouterError;
use crate::fee_tiers::FeeTierCatalog;
use crate::fees::FeeState;
use crate::registry::RouterRegistry;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouterStorage {
    pub control: AccessControl,
    pub registry: RouterRegistry,
    pub fee_tiers: FeeTierCatalog,
    pub fees: FeeState,
    pub intermediates: IntermediateSet,
}

impl RouterStorage {
    pub fn from_config(config: &RouterConfig) -> Result<Self, RouterError> {
        Ok(Self {
            control: AccessControl::new(config.owner)?,
            registry: RouterRegistry::new(),
            fee_tiers: FeeTierCatalog::with_tiers(config.fee_tiers.iter().copied())?,
            fees: FeeState::new(config.fee_percent_bps)?,
            intermediates: IntermediateSet::seeded(config.seed_tokens.iter().copied())?,
        })
    }
}

/// Tokens tried as the middle of a two-hop path, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntermediateSet {
    tokens: Vec<Address>,
}

impl IntermediateSet {
    /// Zero addresses are skipped and duplicates collapsed.
    pub fn seeded(tokens: impl IntoIterator<Item = Address>) -> Result<Self, RouterError> {
        let mut set = Self::default();
        for token in tokens {
            if !token.is_zero() {
                set.insert(token)?;
            }
        }
        Ok(set)
    }

    /// Returns `false` when the token was already present.
    pub fn add(&mut self, _cap: &OwnerCap, token: Address) -> Result<bool, RouterError> {
        if token.is_zero() {
            return Err(RouterError::ZeroAddress);
        }
        self.insert(token)
    }

    pub fn remove(&mut self, _cap: &OwnerCap, token: Address) -> Result<(), RouterError> {
        let idx = self
            .tokens
            .iter()
            .position(|t| *t == token)
            .ok_or(RouterError::UnknownToken(token))?;
        self.tokens.remove(idx);
        Ok(())
    }

    pub fn contains(&self, token: Address) -> bool {
        self.tokens.contains(&token)
    }

    pub fn as_slice(&self) -> &[Address] {
        &self.tokens
    }

    fn insert(&mut self, token: Address) -> Result<bool, RouterError> {
        if self.contains(token) {
            return Ok(false);
        }
        if self.tokens.len() >= MAX_INTERMEDIATES {
            return Err(RouterError::CapacityExceeded {
                what: "intermediate token",
                max: MAX_INTERMEDIATES,
            });
        }
        self.tokens.push(token);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeding_skips_zero_and_duplicates() {
        let weth = Address::repeat_byte(0x3b);
        let set = IntermediateSet::seeded([weth, Address::ZERO, weth]).unwrap();
        assert_eq!(set.as_slice(), &[weth]);
    }

    #[test]
    fn add_and_remove() {
        let cap = OwnerCap::for_tests();
        let mut set = IntermediateSet::default();
        let usdc = Address::repeat_byte(0x75);
        assert!(set.add(&cap, usdc).unwrap());
        assert!(!set.add(&cap, usdc).unwrap());
        assert_eq!(set.add(&cap, Address::ZERO), Err(RouterError::ZeroAddress));
        set.remove(&cap, usdc).unwrap();
        assert_eq!(set.remove(&cap, usdc), Err(RouterError::UnknownToken(usdc)));
    }

    #[test]
    fn storage_from_config_seeds_everything() {
        let config = RouterConfig::for_owner(Address::repeat_byte(0x01))
            .with_seed_tokens([Address::repeat_byte(0x3b), Address::repeat_byte(0x75)]);
        let storage = RouterStorage::from_config(&config).unwrap();
        assert_eq!(storage.control.owner(), Address::repeat_byte(0x01));
        assert_eq!(storage.intermediates.as_slice().len(), 2);
        assert_eq!(storage.fee_tiers.list().len(), 4);
        assert_eq!(storage.fees.fee_percent_bps(), 0);
    }
}
