// Shared fixtures for the integration and property tests
//
// Numan Thabit 2025 Nov

#![allow(dead_code)]

use alloy_primitives::{Address, U256};
use swap_aggr::chain::Chain;
use swap_aggr::config::RouterConfig;
use swap_aggr::fee_tiers::FeeTier;
use swap_aggr::ledger::Token;
use swap_aggr::registry::RouterKind;
use swap_aggr::venues::{ConcentratedVenue, ConstantProductVenue};

pub const GENESIS: u64 = 1_700_000_000;

pub fn addr(b: u8) -> Address {
    Address::repeat_byte(b)
}

pub fn u(v: u64) -> U256 {
    U256::from(v)
}

pub fn owner() -> Address {
    addr(0xee)
}
pub fn trader() -> Address {
    addr(0x42)
}
pub fn token_a() -> Address {
    addr(0x0a)
}
pub fn token_b() -> Address {
    addr(0x0b)
}
pub fn weth() -> Address {
    addr(0x3b)
}
pub fn usdc() -> Address {
    addr(0x75)
}

/// Chain with tokens A, B, WETH, USDC registered (WETH and USDC seeding the
/// intermediate set) and 1000 A minted to the trader.
pub fn chain_with_fee(fee_bps: u32) -> Chain {
    let config = RouterConfig::for_owner(owner())
        .with_fee_percent(fee_bps)
        .with_seed_tokens([weth(), usdc()]);
    let mut chain = Chain::new(&config, GENESIS).unwrap();
    for (token, symbol) in [
        (token_a(), "A"),
        (token_b(), "B"),
        (weth(), "WETH"),
        (usdc(), "USDC"),
    ] {
        chain.register_token(Token::new(token, symbol, 18)).unwrap();
    }
    chain.mint(token_a(), trader(), u(1_000)).unwrap();
    chain
}

/// Deploy a constant-product venue holding `pairs`, fund it, whitelist it.
pub fn add_v2(chain: &mut Chain, router: Address, pairs: &[(Address, Address, u64, u64)]) {
    let mut venue = ConstantProductVenue::new();
    for &(ta, tb, ra, rb) in pairs {
        venue.set_pair(ta, tb, u(ra), u(rb));
        chain.mint(ta, router, u(ra)).unwrap();
        chain.mint(tb, router, u(rb)).unwrap();
    }
    chain.deploy_venue(router, venue).unwrap();
    chain
        .add_router(owner(), router, RouterKind::ConstantProduct)
        .unwrap();
}

/// Deploy a concentrated-liquidity venue holding `pools`, fund it, whitelist it.
pub fn add_v3(
    chain: &mut Chain,
    router: Address,
    pools: &[(Address, Address, u32, u64, u64)],
) {
    let mut venue = ConcentratedVenue::new();
    for &(ta, tb, tier, ra, rb) in pools {
        venue.set_pool(ta, tb, FeeTier::new(tier), u(ra), u(rb));
        chain.mint(ta, router, u(ra)).unwrap();
        chain.mint(tb, router, u(rb)).unwrap();
    }
    chain.deploy_venue(router, venue).unwrap();
    chain
        .add_router(owner(), router, RouterKind::ConcentratedLiquidity)
        .unwrap();
}
