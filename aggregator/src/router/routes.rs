// Route types
// Hops, validated paths and quotes produced by the quote engine
// and consumed by the swap executor
//
// Numan Thabit 2025 Nov

use alloy_primitives::{Address, U256};
use serde::Serialize;

use crate::errors::RouterError;
use crate::fee_tiers::FeeTier;
use crate::registry::RouterKind;
use crate::router::validation::check_structure;
use crate::venues::adapter::LegReq;

/// One swap through one venue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Hop {
    pub router: Address,
    pub kind: RouterKind,
    pub token_in: Address,
    pub token_out: Address,
    /// Present iff `kind` is concentrated liquidity
    pub fee_tier: Option<FeeTier>,
}

impl Hop {
    pub fn constant_product(router: Address, token_in: Address, token_out: Address) -> Self {
        Self {
            router,
            kind: RouterKind::ConstantProduct,
            token_in,
            token_out,
            fee_tier: None,
        }
    }

    pub fn concentrated(
        router: Address,
        token_in: Address,
        token_out: Address,
        tier: FeeTier,
    ) -> Self {
        Self {
            router,
            kind: RouterKind::ConcentratedLiquidity,
            token_in,
            token_out,
            fee_tier: Some(tier),
        }
    }

    pub fn leg(&self, amount_in: U256) -> LegReq {
        LegReq {
            token_in: self.token_in,
            token_out: self.token_out,
            amount_in,
            fee_tier: self.fee_tier,
        }
    }
}

/// A structurally valid sequence of 1..=MAX_HOPS chained hops.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Path {
    hops: Vec<Hop>,
    token_in: Address,
    token_out: Address,
}

impl Path {
    /// Fails with `InvalidPath` listing every structural problem found.
    pub fn try_new(hops: Vec<Hop>) -> Result<Self, RouterError> {
        check_structure(&hops).into_result()?;
        let (token_in, token_out) = match (hops.first(), hops.last()) {
            (Some(first), Some(last)) => (first.token_in, last.token_out),
            _ => return Err(RouterError::InvalidPath("empty path".into())),
        };
        Ok(Self {
            hops,
            token_in,
            token_out,
        })
    }

    pub fn hops(&self) -> &[Hop] {
        &self.hops
    }

    pub fn token_in(&self) -> Address {
        self.token_in
    }

    pub fn token_out(&self) -> Address {
        self.token_out
    }

    pub fn len(&self) -> usize {
        self.hops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hops.is_empty()
    }

    pub fn routers(&self) -> Vec<Address> {
        self.hops.iter().map(|h| h.router).collect()
    }

    pub fn fee_tiers(&self) -> Vec<Option<FeeTier>> {
        self.hops.iter().map(|h| h.fee_tier).collect()
    }
}

/// Best path found for a request; derived, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub path: Path,
    pub amount_in: U256,
    pub estimated_amount_out: U256,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(b: u8) -> Address {
        Address::repeat_byte(b)
    }

    #[test]
    fn path_exposes_endpoints() {
        let path = Path::try_new(vec![
            Hop::constant_product(t(0x10), t(1), t(2)),
            Hop::concentrated(t(0x20), t(2), t(3), FeeTier::new(30)),
        ])
        .unwrap();
        assert_eq!(path.token_in(), t(1));
        assert_eq!(path.token_out(), t(3));
        assert_eq!(path.routers(), vec![t(0x10), t(0x20)]);
        assert_eq!(path.fee_tiers(), vec![None, Some(FeeTier::new(30))]);
    }

    #[test]
    fn empty_path_rejected() {
        let Err(RouterError::InvalidPath(msg)) = Path::try_new(Vec::new()) else {
            panic!("expected InvalidPath");
        };
        assert!(msg.contains("empty"));
    }
}
