// Quote engine - chooses the best path across whitelisted venues
// Enumerates direct and one-intermediate candidates over every active
// router and fee tier, prices each with the venue's own read-only quote,
// and keeps the one with the greatest output
//
// Numan Thabit 2025 Nov

use alloy_primitives::{Address, U256};
use std::cmp::Ordering;
use tracing::{debug, info};

use crate::errors::{RouterError, VenueError};
use crate::metrics::QUOTE_CANDIDATES;
use crate::registry::RouterKind;
use crate::router::routes::{Hop, Path, Quote};
use crate::router::validation::validate_path;
use crate::state::RouterStorage;
use crate::venues::adapter::VenueBook;

/// Read-only view over router storage and deployed venues.
pub struct QuoteEngine<'a> {
    storage: &'a RouterStorage,
    venues: &'a VenueBook,
}

#[derive(Debug, Clone)]
struct Candidate {
    path: Path,
    amount_out: U256,
}

impl<'a> QuoteEngine<'a> {
    pub fn new(storage: &'a RouterStorage, venues: &'a VenueBook) -> Self {
        Self { storage, venues }
    }

    /// Best single path for `amount_in` of `token_in`.
    #[tracing::instrument(skip_all, fields(token_in = %token_in, token_out = %token_out, amount_in = %amount_in))]
    pub fn best_quote(
        &self,
        token_in: Address,
        token_out: Address,
        amount_in: U256,
    ) -> Result<Quote, RouterError> {
        if amount_in.is_zero() {
            return Err(RouterError::ZeroAmount);
        }
        if token_in == token_out {
            return Err(RouterError::InvalidPath(
                "token in equals token out".into(),
            ));
        }

        let paths = self.candidate_paths(token_in, token_out)?;
        QUOTE_CANDIDATES.observe(paths.len() as f64);

        let mut viable = Vec::with_capacity(paths.len());
        let mut overflowed = false;
        for path in paths {
            match self.estimate(&path, amount_in) {
                Ok(amount_out) if !amount_out.is_zero() => {
                    debug!(
                        routers = ?path.routers(),
                        tiers = ?path.fee_tiers(),
                        amount_out = %amount_out,
                        "evaluated candidate"
                    );
                    viable.push(Candidate { path, amount_out });
                }
                Ok(_) => {
                    debug!(routers = ?path.routers(), "candidate yields nothing");
                }
                Err(e) => {
                    overflowed |= e == VenueError::Router(RouterError::ArithmeticOverflow);
                    debug!(error = %e, routers = ?path.routers(), "candidate quote failed");
                }
            }
        }

        if viable.is_empty() && overflowed {
            return Err(RouterError::ArithmeticOverflow);
        }
        if viable.is_empty() {
            return Err(RouterError::PathNotFound {
                token_in,
                token_out,
            });
        }

        viable.sort_by(rank);
        let best = viable.remove(0);
        info!(
            amount_out = %best.amount_out,
            hops = best.path.len(),
            alternatives = viable.len(),
            "selected best path"
        );

        Ok(Quote {
            path: best.path,
            amount_in,
            estimated_amount_out: best.amount_out,
        })
    }

    /// Estimate for an explicit path, validated the same way execution
    /// validates it. A venue refusing to quote surfaces as `VenueCallFailed`,
    /// checked-math failures as `ArithmeticOverflow`.
    #[tracing::instrument(skip_all, fields(hops = hops.len(), amount_in = %amount_in))]
    pub fn quote_path(&self, hops: &[Hop], amount_in: U256) -> Result<U256, RouterError> {
        if amount_in.is_zero() {
            return Err(RouterError::ZeroAmount);
        }
        let path = validate_path(self.storage, hops)?;
        let mut amount = amount_in;
        for hop in path.hops() {
            amount = self
                .quote_hop(hop, amount)
                .map_err(|e| venue_failure(hop.router, e))?;
            if amount.is_zero() {
                break;
            }
        }
        Ok(amount)
    }

    /// Every direct and two-hop path the current storage allows.
    pub fn candidate_paths(
        &self,
        token_in: Address,
        token_out: Address,
    ) -> Result<Vec<Path>, RouterError> {
        let mut paths = Vec::new();
        for hop in self.hop_options(token_in, token_out) {
            paths.push(Path::try_new(vec![hop])?);
        }

        for &mid in self.storage.intermediates.as_slice() {
            if mid == token_in || mid == token_out {
                continue;
            }
            let first_legs = self.hop_options(token_in, mid);
            if first_legs.is_empty() {
                continue;
            }
            let second_legs = self.hop_options(mid, token_out);
            for first in &first_legs {
                for second in &second_legs {
                    paths.push(Path::try_new(vec![*first, *second])?);
                }
            }
        }
        Ok(paths)
    }

    /// One hop per active constant-product router, one per
    /// (active concentrated router, catalog tier).
    fn hop_options(&self, token_in: Address, token_out: Address) -> Vec<Hop> {
        let tiers = self.storage.fee_tiers.list();
        let mut hops = Vec::new();
        for entry in self.storage.registry.active() {
            match entry.kind {
                RouterKind::ConstantProduct => {
                    hops.push(Hop::constant_product(entry.address, token_in, token_out))
                }
                RouterKind::ConcentratedLiquidity => {
                    for tier in &tiers {
                        hops.push(Hop::concentrated(entry.address, token_in, token_out, *tier));
                    }
                }
            }
        }
        hops
    }

    fn estimate(&self, path: &Path, amount_in: U256) -> Result<U256, VenueError> {
        let mut amount = amount_in;
        for hop in path.hops() {
            amount = self.quote_hop(hop, amount)?;
            if amount.is_zero() {
                break;
            }
        }
        Ok(amount)
    }

    fn quote_hop(&self, hop: &Hop, amount_in: U256) -> Result<U256, VenueError> {
        let venue = self
            .venues
            .get(hop.router)
            .ok_or_else(|| VenueError::Reverted("no contract at router address".into()))?;
        venue.quote(&hop.leg(amount_in))
    }
}

/// Greatest output first; ties go to fewer hops, then the lowest router
/// sequence, then the lowest tier sequence.
fn rank(a: &Candidate, b: &Candidate) -> Ordering {
    b.amount_out
        .cmp(&a.amount_out)
        .then_with(|| a.path.len().cmp(&b.path.len()))
        .then_with(|| a.path.routers().cmp(&b.path.routers()))
        .then_with(|| a.path.fee_tiers().cmp(&b.path.fee_tiers()))
}

pub(crate) fn venue_failure(router: Address, err: VenueError) -> RouterError {
    match err {
        VenueError::Router(RouterError::ReentrantCall) => RouterError::ReentrantCall,
        VenueError::Router(RouterError::ArithmeticOverflow) => RouterError::ArithmeticOverflow,
        other => RouterError::VenueCallFailed {
            router,
            reason: other.to_string(),
        },
    }
}
