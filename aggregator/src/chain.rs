// Simulated chain
// Holds the world state (token ledger, deployed venues, the router
// contract), a block clock and the committed event log. Every entry point
// runs as a transaction over a snapshot that is restored on any error
//
// Numan Thabit 2025 Nov

use alloy_primitives::{Address, U256};
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::RouterConfig;
use crate::control::AdminContext;
use crate::errors::RouterError;
use crate::events::{LoggedEvent, RouterEvent};
use crate::fee_tiers::FeeTier;
use crate::ledger::{Ledger, Token};
use crate::metrics::{REVERTS_TOTAL, SWAPS_TOTAL};
use crate::registry::{RouterEntry, RouterKind};
use crate::router::{Hop, Quote, SwapOutcome, SwapRouter, TxContext};
use crate::venues::adapter::{Venue, VenueBook};

/// Everything a transaction can change.
#[derive(Debug, Clone)]
pub struct World {
    pub ledger: Ledger,
    pub venues: VenueBook,
    pub router: SwapRouter,
}

/// A committed transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Receipt<T> {
    pub value: T,
    pub tx_hash: String,
    pub block: u64,
    pub events: Vec<RouterEvent>,
}

#[derive(Debug)]
pub struct Chain {
    world: World,
    /// Block timestamp, seconds
    timestamp: u64,
    block: u64,
    log: Vec<LoggedEvent>,
}

impl Chain {
    pub fn new(config: &RouterConfig, genesis_time: u64) -> Result<Self, RouterError> {
        Ok(Self {
            world: World {
                ledger: Ledger::new(),
                venues: VenueBook::new(),
                router: SwapRouter::new(config)?,
            },
            timestamp: genesis_time,
            block: 0,
            log: Vec::new(),
        })
    }

    pub fn now(&self) -> u64 {
        self.timestamp
    }

    pub fn advance_time(&mut self, seconds: u64) {
        self.timestamp = self.timestamp.saturating_add(seconds);
    }

    pub fn block(&self) -> u64 {
        self.block
    }

    pub fn log(&self) -> &[LoggedEvent] {
        &self.log
    }

    pub fn events(&self) -> impl Iterator<Item = &RouterEvent> {
        self.log.iter().map(|l| &l.event)
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn router(&self) -> &SwapRouter {
        &self.world.router
    }

    pub fn ledger(&self) -> &Ledger {
        &self.world.ledger
    }

    pub fn venues(&self) -> &VenueBook {
        &self.world.venues
    }

    pub fn balance_of(&self, token: Address, holder: Address) -> U256 {
        self.world.ledger.balance_of(token, holder)
    }

    // ---- genesis setup, outside any transaction ----

    pub fn register_token(&mut self, token: Token) -> Result<(), RouterError> {
        self.world.ledger.register(token)
    }

    pub fn mint(&mut self, token: Address, to: Address, amount: U256) -> Result<(), RouterError> {
        self.world.ledger.mint(token, to, amount)
    }

    /// The venue's ledger balances must be minted separately. An address
    /// holds at most one contract for the life of the chain.
    pub fn deploy_venue(
        &mut self,
        address: Address,
        venue: impl Venue + 'static,
    ) -> Result<(), RouterError> {
        if address.is_zero() {
            return Err(RouterError::ZeroAddress);
        }
        if self.world.venues.get(address).is_some() {
            return Err(RouterError::AddressInUse(address));
        }
        debug!(venue = %address, kind = ?venue.kind(), "venue deployed");
        self.world.venues.deploy(address, Box::new(venue));
        Ok(())
    }

    /// Run `f` against the world. On success the router's pending events are
    /// committed under a new block; on failure the world is restored.
    pub fn transact<T>(
        &mut self,
        entry: &'static str,
        f: impl FnOnce(&mut World, u64) -> Result<T, RouterError>,
    ) -> Result<Receipt<T>, RouterError> {
        let snapshot = self.world.clone();
        match f(&mut self.world, self.timestamp) {
            Ok(value) => {
                let events = self.world.router.take_events();
                self.block += 1;
                let tx_hash = compute_digest(self.block, entry, &events);
                self.log.extend(events.iter().cloned().map(|event| LoggedEvent {
                    block: self.block,
                    tx_hash: tx_hash.clone(),
                    event,
                }));
                debug!(entry, block = self.block, tx_hash = %tx_hash, events = events.len(), "transaction committed");
                Ok(Receipt {
                    value,
                    tx_hash,
                    block: self.block,
                    events,
                })
            }
            Err(e) => {
                self.world = snapshot;
                REVERTS_TOTAL.with_label_values(&[e.code()]).inc();
                warn!(entry, code = e.code(), error = %e, "transaction reverted");
                Err(e)
            }
        }
    }

    fn admin<T>(
        &mut self,
        entry: &'static str,
        caller: Address,
        f: impl FnOnce(&mut SwapRouter, &AdminContext) -> Result<T, RouterError>,
    ) -> Result<Receipt<T>, RouterError> {
        let ctx = AdminContext::new(caller);
        self.transact(entry, |world, _| f(&mut world.router, &ctx))
    }

    // ---- administration ----

    pub fn add_router(
        &mut self,
        caller: Address,
        router: Address,
        kind: RouterKind,
    ) -> Result<Receipt<RouterEntry>, RouterError> {
        self.admin("add_router", caller, |r, ctx| r.add_router(ctx, router, kind))
    }

    pub fn remove_router(
        &mut self,
        caller: Address,
        router: Address,
    ) -> Result<Receipt<RouterEntry>, RouterError> {
        self.admin("remove_router", caller, |r, ctx| r.remove_router(ctx, router))
    }

    pub fn set_router_active(
        &mut self,
        caller: Address,
        router: Address,
        active: bool,
    ) -> Result<Receipt<bool>, RouterError> {
        self.admin("set_router_active", caller, |r, ctx| {
            r.set_router_active(ctx, router, active)
        })
    }

    pub fn add_fee_tier(&mut self, caller: Address, tier: u32) -> Result<Receipt<bool>, RouterError> {
        self.admin("add_fee_tier", caller, |r, ctx| r.add_fee_tier(ctx, tier))
    }

    pub fn remove_fee_tier(
        &mut self,
        caller: Address,
        tier: u32,
    ) -> Result<Receipt<FeeTier>, RouterError> {
        self.admin("remove_fee_tier", caller, |r, ctx| r.remove_fee_tier(ctx, tier))
    }

    pub fn add_intermediate(
        &mut self,
        caller: Address,
        token: Address,
    ) -> Result<Receipt<bool>, RouterError> {
        self.admin("add_intermediate", caller, |r, ctx| r.add_intermediate(ctx, token))
    }

    pub fn remove_intermediate(
        &mut self,
        caller: Address,
        token: Address,
    ) -> Result<Receipt<()>, RouterError> {
        self.admin("remove_intermediate", caller, |r, ctx| {
            r.remove_intermediate(ctx, token)
        })
    }

    pub fn set_fee_percent(&mut self, caller: Address, bps: u32) -> Result<Receipt<u32>, RouterError> {
        self.admin("set_fee_percent", caller, |r, ctx| r.set_fee_percent(ctx, bps))
    }

    pub fn pause(&mut self, caller: Address) -> Result<Receipt<bool>, RouterError> {
        self.admin("pause", caller, |r, ctx| r.pause(ctx))
    }

    pub fn unpause(&mut self, caller: Address) -> Result<Receipt<bool>, RouterError> {
        self.admin("unpause", caller, |r, ctx| r.unpause(ctx))
    }

    pub fn transfer_ownership(
        &mut self,
        caller: Address,
        new_owner: Address,
    ) -> Result<Receipt<Address>, RouterError> {
        self.admin("transfer_ownership", caller, |r, ctx| {
            r.transfer_ownership(ctx, new_owner)
        })
    }

    pub fn withdraw_fees(
        &mut self,
        caller: Address,
        token: Address,
        to: Address,
    ) -> Result<Receipt<U256>, RouterError> {
        let ctx = AdminContext::new(caller);
        self.transact("withdraw_fees", |world, _| {
            world
                .router
                .withdraw_fees(&ctx, &mut world.ledger, token, to)
        })
    }

    // ---- trading ----

    /// Read-only; runs against current state without a transaction.
    pub fn quote(
        &self,
        token_in: Address,
        token_out: Address,
        amount_in: U256,
    ) -> Result<Quote, RouterError> {
        self.world
            .router
            .quote(&self.world.venues, token_in, token_out, amount_in)
    }

    pub fn quote_path(&self, hops: &[Hop], amount_in: U256) -> Result<U256, RouterError> {
        self.world
            .router
            .quote_path(&self.world.venues, hops, amount_in)
    }

    pub fn execute_swap(
        &mut self,
        caller: Address,
        hops: &[Hop],
        amount_in: U256,
        min_amount_out: U256,
        deadline: u64,
    ) -> Result<Receipt<SwapOutcome>, RouterError> {
        let receipt = self.transact("execute_swap", |world, now| {
            let World {
                ledger,
                venues,
                router,
            } = world;
            let mut tx = TxContext {
                ledger,
                venues,
                caller,
                now,
            };
            router.execute_swap(&mut tx, hops, amount_in, min_amount_out, deadline)
        })?;
        SWAPS_TOTAL.with_label_values(&["execute_swap"]).inc();
        Ok(receipt)
    }

    pub fn execute_best_swap(
        &mut self,
        caller: Address,
        token_in: Address,
        token_out: Address,
        amount_in: U256,
        min_amount_out: U256,
        deadline: u64,
    ) -> Result<Receipt<SwapOutcome>, RouterError> {
        let receipt = self.transact("execute_best_swap", |world, now| {
            let World {
                ledger,
                venues,
                router,
            } = world;
            let mut tx = TxContext {
                ledger,
                venues,
                caller,
                now,
            };
            router.execute_best_swap(&mut tx, token_in, token_out, amount_in, min_amount_out, deadline)
        })?;
        SWAPS_TOTAL.with_label_values(&["execute_best_swap"]).inc();
        Ok(receipt)
    }
}

/// Blake2b over block, entry point and events; hex of the first 32 bytes.
pub fn compute_digest(block: u64, entry: &str, events: &[RouterEvent]) -> String {
    use blake2::{Blake2b512, Digest};
    let payload = serde_json::to_vec(&(block, entry, events)).unwrap_or_default();
    let mut hasher = Blake2b512::new();
    hasher.update(&payload);
    let hash = hasher.finalize();
    hex::encode(&hash[..32])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::venues::adapter::LegReq;
    use crate::venues::ConstantProductVenue;

    fn t(b: u8) -> Address {
        Address::repeat_byte(b)
    }

    fn chain() -> Chain {
        Chain::new(&RouterConfig::for_owner(t(0xee)), 1_700_000_000).unwrap()
    }

    #[test]
    fn committed_events_land_in_the_log() {
        let mut chain = chain();
        let receipt = chain
            .add_router(t(0xee), t(0x11), RouterKind::ConstantProduct)
            .unwrap();
        assert_eq!(receipt.block, 1);
        assert_eq!(receipt.tx_hash.len(), 64);
        assert_eq!(chain.log().len(), 1);
        assert_eq!(chain.log()[0].tx_hash, receipt.tx_hash);
    }

    #[test]
    fn failed_transaction_restores_world() {
        let mut chain = chain();
        chain
            .add_router(t(0xee), t(0x11), RouterKind::ConstantProduct)
            .unwrap();
        let err = chain
            .transact("add_two_routers", |world, _| {
                let ctx = AdminContext::new(t(0xee));
                world.router.add_router(&ctx, t(0x12), RouterKind::ConstantProduct)?;
                world.router.add_router(&ctx, t(0x11), RouterKind::ConstantProduct)
            })
            .unwrap_err();
        assert_eq!(err, RouterError::DuplicateRouter(t(0x11)));
        assert_eq!(chain.router().router_count(RouterKind::ConstantProduct), 1);
        assert_eq!(chain.block(), 1);
        assert_eq!(chain.log().len(), 1);
    }

    #[test]
    fn digest_changes_with_block() {
        assert_ne!(compute_digest(1, "pause", &[]), compute_digest(2, "pause", &[]));
    }

    #[test]
    fn deploy_rejects_zero_address() {
        let mut chain = chain();
        assert_eq!(
            chain.deploy_venue(Address::ZERO, ConstantProductVenue::new()),
            Err(RouterError::ZeroAddress)
        );
        assert!(chain.venues().is_empty());
    }

    #[test]
    fn deploy_rejects_occupied_address() {
        let mut chain = chain();
        let pool = ConstantProductVenue::new().with_pair(
            t(0x0a),
            t(0x0b),
            U256::from(1000u64),
            U256::from(1000u64),
        );
        chain.deploy_venue(t(0x11), pool).unwrap();
        assert_eq!(
            chain.deploy_venue(t(0x11), ConstantProductVenue::new()),
            Err(RouterError::AddressInUse(t(0x11)))
        );

        let leg = LegReq {
            token_in: t(0x0a),
            token_out: t(0x0b),
            amount_in: U256::from(10u64),
            fee_tier: None,
        };
        let kept = chain.venues().get(t(0x11)).unwrap();
        assert_eq!(kept.quote(&leg), Ok(U256::from(9u64)));
        assert_eq!(chain.venues().len(), 1);
    }
}
