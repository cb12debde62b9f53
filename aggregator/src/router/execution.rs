// Swap executor - runs a path hop by hop against the deployed venues
// Enforces pause, deadline, path validity and the reentrancy lock, measures
// every hop by the router's own balance, withholds the protocol fee and
// applies the slippage guard. Rollback on error is the caller's job
//
// Numan Thabit 2025 Nov

use alloy_primitives::{Address, U256};
use serde::Serialize;
use tracing::{debug, info};

use crate::control::ReentrancyLock;
use crate::errors::RouterError;
use crate::ledger::Ledger;
use crate::quant::checked_sub;
use crate::router::routes::{Hop, Path};
use crate::router::selector::{venue_failure, QuoteEngine};
use crate::router::validation::validate_path;
use crate::state::RouterStorage;
use crate::venues::adapter::{VenueBook, VenueEnv};

/// World state a swap may touch, plus who is calling and when.
pub struct TxContext<'a> {
    pub ledger: &'a mut Ledger,
    pub venues: &'a mut VenueBook,
    pub caller: Address,
    /// Block timestamp, seconds
    pub now: u64,
}

/// Result of a committed swap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapOutcome {
    pub path: Path,
    pub amount_in: U256,
    /// Output of the last hop, before the protocol fee
    pub gross_amount_out: U256,
    pub fee: U256,
    /// Paid to the caller
    pub amount_out: U256,
}

pub struct SwapExecutor<'a> {
    router: Address,
    storage: &'a mut RouterStorage,
    lock: &'a ReentrancyLock,
}

impl<'a> SwapExecutor<'a> {
    pub fn new(router: Address, storage: &'a mut RouterStorage, lock: &'a ReentrancyLock) -> Self {
        Self {
            router,
            storage,
            lock,
        }
    }

    /// Checks shared by both swap entry points, in this order:
    /// pause, deadline, amount.
    pub fn preflight(
        storage: &RouterStorage,
        now: u64,
        deadline: u64,
        amount_in: U256,
    ) -> Result<(), RouterError> {
        storage.control.ensure_active()?;
        if deadline < now {
            return Err(RouterError::Expired { deadline, now });
        }
        if amount_in.is_zero() {
            return Err(RouterError::ZeroAmount);
        }
        Ok(())
    }

    /// Swap along a caller-chosen path.
    #[tracing::instrument(skip_all, fields(caller = %tx.caller, hops = hops.len(), amount_in = %amount_in))]
    pub fn execute(
        &mut self,
        tx: &mut TxContext<'_>,
        hops: &[Hop],
        amount_in: U256,
        min_amount_out: U256,
        deadline: u64,
    ) -> Result<SwapOutcome, RouterError> {
        Self::preflight(self.storage, tx.now, deadline, amount_in)?;
        let path = validate_path(self.storage, hops)?;
        self.run(tx, path, amount_in, min_amount_out)
    }

    /// Swap along whatever path the quote engine picks right now.
    #[tracing::instrument(skip_all, fields(caller = %tx.caller, token_in = %token_in, token_out = %token_out, amount_in = %amount_in))]
    pub fn execute_best(
        &mut self,
        tx: &mut TxContext<'_>,
        token_in: Address,
        token_out: Address,
        amount_in: U256,
        min_amount_out: U256,
        deadline: u64,
    ) -> Result<SwapOutcome, RouterError> {
        Self::preflight(self.storage, tx.now, deadline, amount_in)?;
        let quote = QuoteEngine::new(self.storage, tx.venues).best_quote(token_in, token_out, amount_in)?;
        self.run(tx, quote.path, amount_in, min_amount_out)
    }

    fn run(
        &mut self,
        tx: &mut TxContext<'_>,
        path: Path,
        amount_in: U256,
        min_amount_out: U256,
    ) -> Result<SwapOutcome, RouterError> {
        let _guard = self.lock.acquire()?;

        tx.ledger
            .transfer(path.token_in(), tx.caller, self.router, amount_in)?;

        let mut amount = amount_in;
        for hop in path.hops() {
            amount = self.run_hop(tx, hop, amount)?;
        }

        let gross_amount_out = amount;
        let fee = self.storage.fees.fee_for(gross_amount_out)?;
        let amount_out = checked_sub(gross_amount_out, fee)?;
        if amount_out < min_amount_out {
            return Err(RouterError::InsufficientOutputAmount {
                amount_out,
                min_amount_out,
            });
        }

        self.storage.fees.credit(path.token_out(), fee)?;
        tx.ledger
            .transfer(path.token_out(), self.router, tx.caller, amount_out)?;

        info!(
            gross = %gross_amount_out,
            fee = %fee,
            amount_out = %amount_out,
            "swap executed"
        );

        Ok(SwapOutcome {
            path,
            amount_in,
            gross_amount_out,
            fee,
            amount_out,
        })
    }

    /// Output is the router's balance delta, not what the venue reports.
    /// The input side may drop by at most `amount_in`.
    fn run_hop(
        &self,
        tx: &mut TxContext<'_>,
        hop: &Hop,
        amount_in: U256,
    ) -> Result<U256, RouterError> {
        let input_before = tx.ledger.balance_of(hop.token_in, self.router);
        let before = tx.ledger.balance_of(hop.token_out, self.router);

        let venue = tx
            .venues
            .get_mut(hop.router)
            .ok_or_else(|| RouterError::VenueCallFailed {
                router: hop.router,
                reason: "no contract at router address".into(),
            })?;
        let leg = hop.leg(amount_in);
        let mut env = VenueEnv::new(tx.ledger, hop.router, self.router, &leg, self.lock);
        let reported = venue
            .swap(&mut env, &leg)
            .map_err(|e| venue_failure(hop.router, e))?;

        let spent = input_before.saturating_sub(tx.ledger.balance_of(hop.token_in, self.router));
        if spent > amount_in {
            return Err(RouterError::VenueCallFailed {
                router: hop.router,
                reason: format!("venue took {spent} input, allowed {amount_in}"),
            });
        }

        let after = tx.ledger.balance_of(hop.token_out, self.router);
        let received = after.saturating_sub(before);
        if received.is_zero() {
            return Err(RouterError::VenueCallFailed {
                router: hop.router,
                reason: "no output received".into(),
            });
        }
        if received != reported {
            debug!(
                router = %hop.router,
                reported = %reported,
                received = %received,
                "venue reported a different output than it paid"
            );
        }
        Ok(received)
    }
}
