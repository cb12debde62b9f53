// Concentrated-liquidity venue: fee-tiered (V3-style) router
// One pool per (pair, fee tier); every call must name the tier.
// The quoter is the venue's own read-only estimate for a single pool
//
// Numan Thabit 2025 Nov

use alloy_primitives::{Address, U256};
use std::collections::BTreeMap;
use tracing::debug;

use crate::errors::VenueError;
use crate::fee_tiers::FeeTier;
use crate::quant::fee_tiered_out;
use crate::registry::RouterKind;
use crate::venues::adapter::{LegReq, Venue, VenueEnv};
use crate::venues::amm::{pair_key, Reserves};

type PoolKey = (Address, Address, FeeTier);

#[derive(Debug, Clone, Default)]
pub struct ConcentratedVenue {
    pools: BTreeMap<PoolKey, Reserves>,
}

impl ConcentratedVenue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create or replace the pool for `(token_a, token_b, tier)`.
    pub fn with_pool(
        mut self,
        token_a: Address,
        token_b: Address,
        tier: FeeTier,
        reserve_a: U256,
        reserve_b: U256,
    ) -> Self {
        self.set_pool(token_a, token_b, tier, reserve_a, reserve_b);
        self
    }

    pub fn set_pool(
        &mut self,
        token_a: Address,
        token_b: Address,
        tier: FeeTier,
        reserve_a: U256,
        reserve_b: U256,
    ) {
        let (t0, t1) = pair_key(token_a, token_b);
        self.pools.insert(
            (t0, t1, tier),
            Reserves::new(token_a, token_b, reserve_a, reserve_b),
        );
    }

    pub fn pool(&self, token_a: Address, token_b: Address, tier: FeeTier) -> Option<&Reserves> {
        let (t0, t1) = pair_key(token_a, token_b);
        self.pools.get(&(t0, t1, tier))
    }

    fn key(leg: &LegReq) -> Result<PoolKey, VenueError> {
        let tier = leg
            .fee_tier
            .ok_or(VenueError::Unsupported("concentrated venue call without fee tier"))?;
        let (t0, t1) = pair_key(leg.token_in, leg.token_out);
        Ok((t0, t1, tier))
    }

    fn estimate(&self, leg: &LegReq) -> Result<(PoolKey, U256), VenueError> {
        let key = Self::key(leg)?;
        let reserves = self.pools.get(&key).ok_or(VenueError::NoPool {
            token_in: leg.token_in,
            token_out: leg.token_out,
        })?;
        let (rin, rout) = reserves.oriented(leg.token_in);
        let out = fee_tiered_out(leg.amount_in, rin, rout, key.2)?;
        Ok((key, out))
    }
}

impl Venue for ConcentratedVenue {
    fn kind(&self) -> RouterKind {
        RouterKind::ConcentratedLiquidity
    }

    fn quote(&self, leg: &LegReq) -> Result<U256, VenueError> {
        self.estimate(leg).map(|(_, out)| out)
    }

    fn swap(&mut self, env: &mut VenueEnv<'_>, leg: &LegReq) -> Result<U256, VenueError> {
        let (key, amount_out) = self.estimate(leg)?;
        if amount_out.is_zero() {
            return Err(VenueError::InsufficientLiquidity);
        }
        env.pull_input(leg.token_in, leg.amount_in)?;
        env.push_output(leg.token_out, amount_out)?;
        if let Some(pool) = self.pools.get_mut(&key) {
            pool.apply(leg.token_in, leg.amount_in, amount_out)?;
        }
        debug!(
            venue = %env.venue,
            tier = %key.2,
            amount_in = %leg.amount_in,
            amount_out = %amount_out,
            "concentrated swap"
        );
        Ok(amount_out)
    }

    fn box_clone(&self) -> Box<dyn Venue> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn a() -> Address {
        Address::repeat_byte(0xa1)
    }
    fn b() -> Address {
        Address::repeat_byte(0xb2)
    }

    fn leg(tier: Option<u32>) -> LegReq {
        LegReq {
            token_in: a(),
            token_out: b(),
            amount_in: U256::from(1_000u64),
            fee_tier: tier.map(FeeTier::new),
        }
    }

    #[test]
    fn pools_are_keyed_by_tier() {
        let venue = ConcentratedVenue::new()
            .with_pool(a(), b(), FeeTier::new(5), U256::from(100_000u64), U256::from(100_000u64))
            .with_pool(a(), b(), FeeTier::new(30), U256::from(500_000u64), U256::from(500_000u64));
        let cheap = venue.quote(&leg(Some(5))).unwrap();
        let deep = venue.quote(&leg(Some(30))).unwrap();
        // the deeper pool wins despite the higher fee
        assert!(deep > cheap);
        assert!(matches!(
            venue.quote(&leg(Some(100))),
            Err(VenueError::NoPool { .. })
        ));
    }

    #[test]
    fn tier_is_required() {
        let venue = ConcentratedVenue::new().with_pool(
            a(),
            b(),
            FeeTier::new(5),
            U256::from(1_000u64),
            U256::from(1_000u64),
        );
        assert!(matches!(venue.quote(&leg(None)), Err(VenueError::Unsupported(_))));
    }

    #[test]
    fn quote_matches_formula() {
        let venue = ConcentratedVenue::new().with_pool(
            a(),
            b(),
            FeeTier::new(30),
            U256::from(1_000_000u64),
            U256::from(2_000_000u64),
        );
        // net_in = 1000 * 9970 / 10000 = 997; out = 997 * 2e6 / (1e6 + 997) = 1992.0…
        assert_eq!(venue.quote(&leg(Some(30))).unwrap(), U256::from(1_992u64));
    }
}
