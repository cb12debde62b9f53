// Fee tier catalog
// Owner-curated set of tiers usable with concentrated-liquidity venues.
// Membership is checked when a hop is used, never when it is built
//
// Numan Thabit 2025 Nov

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::constants::{BPS_DENOMINATOR, MAX_FEE_TIERS};
use crate::control::OwnerCap;
use crate::errors::RouterError;

/// A concentrated-liquidity pool fee, in basis points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeeTier(u32);

impl FeeTier {
    pub const fn new(bps: u32) -> Self {
        Self(bps)
    }

    pub const fn get(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for FeeTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}bps", self.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeeTierCatalog {
    tiers: BTreeSet<FeeTier>,
}

impl FeeTierCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the catalog at construction time.
    pub fn with_tiers(tiers: impl IntoIterator<Item = u32>) -> Result<Self, RouterError> {
        let mut catalog = Self::new();
        for value in tiers {
            catalog.insert(value)?;
        }
        Ok(catalog)
    }

    /// Returns `false` when the tier was already present.
    pub fn add(&mut self, _cap: &OwnerCap, value: u32) -> Result<bool, RouterError> {
        self.insert(value)
    }

    pub fn remove(&mut self, _cap: &OwnerCap, value: u32) -> Result<FeeTier, RouterError> {
        let tier = FeeTier::new(value);
        if !self.tiers.remove(&tier) {
            return Err(RouterError::UnsupportedFeeTier(tier));
        }
        Ok(tier)
    }

    pub fn contains(&self, tier: FeeTier) -> bool {
        self.tiers.contains(&tier)
    }

    pub fn ensure_supported(&self, tier: FeeTier) -> Result<(), RouterError> {
        if self.contains(tier) {
            Ok(())
        } else {
            Err(RouterError::UnsupportedFeeTier(tier))
        }
    }

    /// Tiers in ascending order.
    pub fn list(&self) -> Vec<FeeTier> {
        self.tiers.iter().copied().collect()
    }

    fn insert(&mut self, value: u32) -> Result<bool, RouterError> {
        if value == 0 || value >= BPS_DENOMINATOR {
            return Err(RouterError::InvalidFeeTier(value));
        }
        let tier = FeeTier::new(value);
        if self.tiers.contains(&tier) {
            return Ok(false);
        }
        if self.tiers.len() >= MAX_FEE_TIERS {
            return Err(RouterError::CapacityExceeded {
                what: "fee tier",
                max: MAX_FEE_TIERS,
            });
        }
        self.tiers.insert(tier);
        Ok(true)
    }
}
