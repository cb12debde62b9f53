// AMM venue: constant-product (V2-style) router
// Pairs priced by x*y=k with the fixed 0.3% LP fee; quoting is the
// getAmountsOut analogue, swapping moves tokens through the ledger
//
// Numan Thabit 2025 Nov

use alloy_primitives::{Address, U256};
use std::collections::BTreeMap;
use tracing::debug;

use crate::errors::VenueError;
use crate::quant::{checked_add, checked_sub, constant_product_out};
use crate::registry::RouterKind;
use crate::venues::adapter::{LegReq, Venue, VenueEnv};

/// Reserves of one pool, stored in sorted token order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reserves {
    pub token0: Address,
    pub token1: Address,
    pub reserve0: U256,
    pub reserve1: U256,
}

impl Reserves {
    pub fn new(token_a: Address, token_b: Address, reserve_a: U256, reserve_b: U256) -> Self {
        if token_a <= token_b {
            Self {
                token0: token_a,
                token1: token_b,
                reserve0: reserve_a,
                reserve1: reserve_b,
            }
        } else {
            Self {
                token0: token_b,
                token1: token_a,
                reserve0: reserve_b,
                reserve1: reserve_a,
            }
        }
    }

    /// `(reserve_in, reserve_out)` for a trade starting at `token_in`.
    pub fn oriented(&self, token_in: Address) -> (U256, U256) {
        if token_in == self.token0 {
            (self.reserve0, self.reserve1)
        } else {
            (self.reserve1, self.reserve0)
        }
    }

    /// Book a trade of `amount_in` for `amount_out` starting at `token_in`.
    pub fn apply(
        &mut self,
        token_in: Address,
        amount_in: U256,
        amount_out: U256,
    ) -> Result<(), VenueError> {
        let (rin, rout) = if token_in == self.token0 {
            (&mut self.reserve0, &mut self.reserve1)
        } else {
            (&mut self.reserve1, &mut self.reserve0)
        };
        *rin = checked_add(*rin, amount_in)?;
        *rout = checked_sub(*rout, amount_out).map_err(|_| VenueError::InsufficientLiquidity)?;
        Ok(())
    }
}

pub fn pair_key(a: Address, b: Address) -> (Address, Address) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ConstantProductVenue {
    pairs: BTreeMap<(Address, Address), Reserves>,
}

impl ConstantProductVenue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create or replace a pair. The caller is responsible for funding the
    /// venue's ledger balance with the same reserves.
    pub fn with_pair(
        mut self,
        token_a: Address,
        token_b: Address,
        reserve_a: U256,
        reserve_b: U256,
    ) -> Self {
        self.set_pair(token_a, token_b, reserve_a, reserve_b);
        self
    }

    pub fn set_pair(&mut self, token_a: Address, token_b: Address, reserve_a: U256, reserve_b: U256) {
        self.pairs.insert(
            pair_key(token_a, token_b),
            Reserves::new(token_a, token_b, reserve_a, reserve_b),
        );
    }

    pub fn reserves(&self, token_a: Address, token_b: Address) -> Option<&Reserves> {
        self.pairs.get(&pair_key(token_a, token_b))
    }

    fn pair(&self, leg: &LegReq) -> Result<&Reserves, VenueError> {
        self.reserves(leg.token_in, leg.token_out)
            .ok_or(VenueError::NoPool {
                token_in: leg.token_in,
                token_out: leg.token_out,
            })
    }
}

impl Venue for ConstantProductVenue {
    fn kind(&self) -> RouterKind {
        RouterKind::ConstantProduct
    }

    fn quote(&self, leg: &LegReq) -> Result<U256, VenueError> {
        if leg.fee_tier.is_some() {
            return Err(VenueError::Unsupported("fee tier on constant-product venue"));
        }
        let (rin, rout) = self.pair(leg)?.oriented(leg.token_in);
        Ok(constant_product_out(leg.amount_in, rin, rout)?)
    }

    fn swap(&mut self, env: &mut VenueEnv<'_>, leg: &LegReq) -> Result<U256, VenueError> {
        let amount_out = self.quote(leg)?;
        if amount_out.is_zero() {
            return Err(VenueError::InsufficientLiquidity);
        }
        env.pull_input(leg.token_in, leg.amount_in)?;
        env.push_output(leg.token_out, amount_out)?;
        let key = pair_key(leg.token_in, leg.token_out);
        if let Some(reserves) = self.pairs.get_mut(&key) {
            reserves.apply(leg.token_in, leg.amount_in, amount_out)?;
        }
        debug!(
            venue = %env.venue,
            token_in = %leg.token_in,
            amount_in = %leg.amount_in,
            amount_out = %amount_out,
            "constant-product swap"
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
    use crate::control::ReentrancyLock;
    use crate::fee_tiers::FeeTier;
    use crate::ledger::{Ledger, Token};

    fn a() -> Address {
        Address::repeat_byte(0xa1)
    }
    fn b() -> Address {
        Address::repeat_byte(0xb2)
    }
    fn u(v: u64) -> U256 {
        U256::from(v)
    }

    fn leg(amount: u64) -> LegReq {
        LegReq {
            token_in: a(),
            token_out: b(),
            amount_in: u(amount),
            fee_tier: None,
        }
    }

    #[test]
    fn quote_is_orientation_aware() {
        let venue = ConstantProductVenue::new().with_pair(b(), a(), u(1100), u(1000));
        assert_eq!(venue.quote(&leg(10)).unwrap(), u(10));
        let back = LegReq {
            token_in: b(),
            token_out: a(),
            ..leg(10)
        };
        // 10 * 997 * 1000 / (1100 * 1000 + 9970) = 8.98…
        assert_eq!(venue.quote(&back).unwrap(), u(8));
    }

    #[test]
    fn unknown_pair_and_fee_tier_rejected() {
        let venue = ConstantProductVenue::new();
        assert!(matches!(venue.quote(&leg(10)), Err(VenueError::NoPool { .. })));
        let venue = venue.with_pair(a(), b(), u(1000), u(1000));
        let tiered = LegReq {
            fee_tier: Some(FeeTier::new(30)),
            ..leg(10)
        };
        assert!(matches!(venue.quote(&tiered), Err(VenueError::Unsupported(_))));
    }

    #[test]
    fn swap_moves_tokens_and_reserves() {
        let venue_addr = Address::repeat_byte(0x77);
        let router = Address::repeat_byte(0x55);
        let mut ledger = Ledger::new();
        ledger.register(Token::new(a(), "A", 18)).unwrap();
        ledger.register(Token::new(b(), "B", 18)).unwrap();
        ledger.mint(a(), venue_addr, u(1000)).unwrap();
        ledger.mint(b(), venue_addr, u(1000)).unwrap();
        ledger.mint(a(), router, u(10)).unwrap();

        let mut venue = ConstantProductVenue::new().with_pair(a(), b(), u(1000), u(1000));
        let lock = ReentrancyLock::new();
        let mut env = VenueEnv::new(&mut ledger, venue_addr, router, &leg(10), &lock);
        let out = venue.swap(&mut env, &leg(10)).unwrap();

        assert_eq!(out, u(9));
        assert_eq!(ledger.balance_of(b(), router), u(9));
        assert_eq!(ledger.balance_of(a(), router), U256::ZERO);
        let r = venue.reserves(a(), b()).unwrap();
        assert_eq!(r.oriented(a()), (u(1010), u(991)));
    }
}
