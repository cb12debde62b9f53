// Router contract
// The deployed swap-aggregation contract: storage, reentrancy lock and the
// events raised by the current transaction. Every administrative entry
// point authorizes its AdminContext first; trading entry points delegate
// to the quote engine and swap executor
//
// Numan Thabit 2025 Nov

use alloy_primitives::{Address, U256};
use tracing::info;

use crate::config::RouterConfig;
use crate::control::{AdminContext, ReentrancyLock};
use crate::errors::RouterError;
use crate::events::RouterEvent;
use crate::fee_tiers::FeeTier;
use crate::ledger::Ledger;
use crate::registry::{RouterEntry, RouterKind};
use crate::router::execution::{SwapExecutor, SwapOutcome, TxContext};
use crate::router::routes::{Hop, Quote};
use crate::router::selector::QuoteEngine;
use crate::state::RouterStorage;
use crate::venues::adapter::VenueBook;

#[derive(Debug, Clone)]
pub struct SwapRouter {
    address: Address,
    storage: RouterStorage,
    lock: ReentrancyLock,
    pending: Vec<RouterEvent>,
}

impl SwapRouter {
    pub fn new(config: &RouterConfig) -> Result<Self, RouterError> {
        if config.router_address.is_zero() {
            return Err(RouterError::ZeroAddress);
        }
        Ok(Self {
            address: config.router_address,
            storage: RouterStorage::from_config(config)?,
            lock: ReentrancyLock::new(),
            pending: Vec::new(),
        })
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn storage(&self) -> &RouterStorage {
        &self.storage
    }

    pub fn lock(&self) -> &ReentrancyLock {
        &self.lock
    }

    /// Drain the events raised since the last call.
    pub fn take_events(&mut self) -> Vec<RouterEvent> {
        std::mem::take(&mut self.pending)
    }

    // ---- reads ----

    pub fn owner(&self) -> Address {
        self.storage.control.owner()
    }

    pub fn is_paused(&self) -> bool {
        self.storage.control.is_paused()
    }

    pub fn router_count(&self, kind: RouterKind) -> usize {
        self.storage.registry.count(kind)
    }

    pub fn routers(&self, kind: RouterKind) -> Vec<RouterEntry> {
        self.storage.registry.list(kind)
    }

    pub fn is_router_active(&self, router: Address) -> bool {
        self.storage.registry.is_active(router)
    }

    pub fn fee_tiers(&self) -> Vec<FeeTier> {
        self.storage.fee_tiers.list()
    }

    pub fn fee_percent_bps(&self) -> u32 {
        self.storage.fees.fee_percent_bps()
    }

    pub fn accrued_balance(&self, token: Address) -> U256 {
        self.storage.fees.accrued_balance(token)
    }

    pub fn intermediates(&self) -> &[Address] {
        self.storage.intermediates.as_slice()
    }

    // ---- administration ----

    pub fn add_router(
        &mut self,
        ctx: &AdminContext,
        router: Address,
        kind: RouterKind,
    ) -> Result<RouterEntry, RouterError> {
        let cap = self.storage.control.authorize(ctx)?;
        let entry = self.storage.registry.add(&cap, router, kind)?;
        info!(router = %router, kind = ?kind, "router added");
        self.pending.push(RouterEvent::RouterAdded { router, kind });
        Ok(entry)
    }

    pub fn remove_router(
        &mut self,
        ctx: &AdminContext,
        router: Address,
    ) -> Result<RouterEntry, RouterError> {
        let cap = self.storage.control.authorize(ctx)?;
        let entry = self.storage.registry.remove(&cap, router)?;
        info!(router = %router, kind = ?entry.kind, "router removed");
        self.pending.push(RouterEvent::RouterRemoved {
            router,
            kind: entry.kind,
        });
        Ok(entry)
    }

    /// No event when the flag already had the requested value.
    pub fn set_router_active(
        &mut self,
        ctx: &AdminContext,
        router: Address,
        active: bool,
    ) -> Result<bool, RouterError> {
        let cap = self.storage.control.authorize(ctx)?;
        let changed = self.storage.registry.set_active(&cap, router, active)?;
        if changed {
            info!(router = %router, active, "router status changed");
            self.pending
                .push(RouterEvent::RouterStatusChanged { router, active });
        }
        Ok(changed)
    }

    pub fn add_fee_tier(&mut self, ctx: &AdminContext, tier: u32) -> Result<bool, RouterError> {
        let cap = self.storage.control.authorize(ctx)?;
        let added = self.storage.fee_tiers.add(&cap, tier)?;
        if added {
            info!(tier, "fee tier added");
            self.pending.push(RouterEvent::FeeTierAdded {
                tier: FeeTier::new(tier),
            });
        }
        Ok(added)
    }

    pub fn remove_fee_tier(
        &mut self,
        ctx: &AdminContext,
        tier: u32,
    ) -> Result<FeeTier, RouterError> {
        let cap = self.storage.control.authorize(ctx)?;
        let removed = self.storage.fee_tiers.remove(&cap, tier)?;
        info!(tier, "fee tier removed");
        self.pending
            .push(RouterEvent::FeeTierRemoved { tier: removed });
        Ok(removed)
    }

    pub fn add_intermediate(
        &mut self,
        ctx: &AdminContext,
        token: Address,
    ) -> Result<bool, RouterError> {
        let cap = self.storage.control.authorize(ctx)?;
        let added = self.storage.intermediates.add(&cap, token)?;
        if added {
            info!(token = %token, "intermediate token added");
            self.pending.push(RouterEvent::IntermediateAdded { token });
        }
        Ok(added)
    }

    pub fn remove_intermediate(
        &mut self,
        ctx: &AdminContext,
        token: Address,
    ) -> Result<(), RouterError> {
        let cap = self.storage.control.authorize(ctx)?;
        self.storage.intermediates.remove(&cap, token)?;
        info!(token = %token, "intermediate token removed");
        self.pending.push(RouterEvent::IntermediateRemoved { token });
        Ok(())
    }

    /// Returns the previous rate.
    pub fn set_fee_percent(&mut self, ctx: &AdminContext, bps: u32) -> Result<u32, RouterError> {
        let cap = self.storage.control.authorize(ctx)?;
        let old_bps = self.storage.fees.set_fee_percent(&cap, bps)?;
        info!(old_bps, new_bps = bps, "fee percent updated");
        self.pending.push(RouterEvent::FeePercentUpdated {
            old_bps,
            new_bps: bps,
        });
        Ok(old_bps)
    }

    pub fn pause(&mut self, ctx: &AdminContext) -> Result<bool, RouterError> {
        let cap = self.storage.control.authorize(ctx)?;
        let changed = self.storage.control.pause(&cap);
        if changed {
            info!(by = %ctx.caller, "router paused");
            self.pending.push(RouterEvent::Paused { by: ctx.caller });
        }
        Ok(changed)
    }

    pub fn unpause(&mut self, ctx: &AdminContext) -> Result<bool, RouterError> {
        let cap = self.storage.control.authorize(ctx)?;
        let changed = self.storage.control.unpause(&cap);
        if changed {
            info!(by = %ctx.caller, "router unpaused");
            self.pending.push(RouterEvent::Unpaused { by: ctx.caller });
        }
        Ok(changed)
    }

    pub fn transfer_ownership(
        &mut self,
        ctx: &AdminContext,
        new_owner: Address,
    ) -> Result<Address, RouterError> {
        let cap = self.storage.control.authorize(ctx)?;
        let previous = self.storage.control.transfer_ownership(&cap, new_owner)?;
        info!(previous = %previous, new_owner = %new_owner, "ownership transferred");
        self.pending.push(RouterEvent::OwnershipTransferred {
            previous,
            new_owner,
        });
        Ok(previous)
    }

    /// Sends everything accrued in `token` to `to`.
    pub fn withdraw_fees(
        &mut self,
        ctx: &AdminContext,
        ledger: &mut Ledger,
        token: Address,
        to: Address,
    ) -> Result<U256, RouterError> {
        let cap = self.storage.control.authorize(ctx)?;
        if to.is_zero() {
            return Err(RouterError::ZeroAddress);
        }
        let amount = self.storage.fees.take_accrued(&cap, token)?;
        ledger.transfer(token, self.address, to, amount)?;
        info!(token = %token, to = %to, amount = %amount, "fees withdrawn");
        self.pending
            .push(RouterEvent::FeesWithdrawn { token, to, amount });
        Ok(amount)
    }

    // ---- trading ----

    pub fn quote(
        &self,
        venues: &VenueBook,
        token_in: Address,
        token_out: Address,
        amount_in: U256,
    ) -> Result<Quote, RouterError> {
        QuoteEngine::new(&self.storage, venues).best_quote(token_in, token_out, amount_in)
    }

    pub fn quote_path(
        &self,
        venues: &VenueBook,
        hops: &[Hop],
        amount_in: U256,
    ) -> Result<U256, RouterError> {
        QuoteEngine::new(&self.storage, venues).quote_path(hops, amount_in)
    }

    pub fn execute_swap(
        &mut self,
        tx: &mut TxContext<'_>,
        hops: &[Hop],
        amount_in: U256,
        min_amount_out: U256,
        deadline: u64,
    ) -> Result<SwapOutcome, RouterError> {
        let outcome = SwapExecutor::new(self.address, &mut self.storage, &self.lock)
            .execute(tx, hops, amount_in, min_amount_out, deadline)?;
        self.record_swap(tx.caller, &outcome);
        Ok(outcome)
    }

    pub fn execute_best_swap(
        &mut self,
        tx: &mut TxContext<'_>,
        token_in: Address,
        token_out: Address,
        amount_in: U256,
        min_amount_out: U256,
        deadline: u64,
    ) -> Result<SwapOutcome, RouterError> {
        let outcome = SwapExecutor::new(self.address, &mut self.storage, &self.lock)
            .execute_best(tx, token_in, token_out, amount_in, min_amount_out, deadline)?;
        self.record_swap(tx.caller, &outcome);
        Ok(outcome)
    }

    fn record_swap(&mut self, caller: Address, outcome: &SwapOutcome) {
        self.pending.push(RouterEvent::SwapExecuted {
            caller,
            token_in: outcome.path.token_in(),
            token_out: outcome.path.token_out(),
            amount_in: outcome.amount_in,
            gross_amount_out: outcome.gross_amount_out,
            fee: outcome.fee,
            amount_out: outcome.amount_out,
            routers: outcome.path.routers(),
        });
    }
}
