// Venue adapter module
// This file defines the call interface the router uses to talk to external
// venue contracts, and the book of venues deployed on the simulated chain
//
// Numan Thabit 2025 Nov

use alloy_primitives::{Address, U256};
use std::collections::BTreeMap;
use std::fmt;

use crate::control::{LockGuard, ReentrancyLock};
use crate::errors::{RouterError, VenueError};
use crate::fee_tiers::FeeTier;
use crate::ledger::Ledger;
use crate::registry::RouterKind;

/// One leg as presented to a venue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LegReq {
    pub token_in: Address,
    pub token_out: Address,
    pub amount_in: U256,
    /// Required by concentrated-liquidity venues, ignored otherwise.
    pub fee_tier: Option<FeeTier>,
}

/// What a venue may touch while executing a swap.
///
/// The venue may pull at most the leg's `amount_in` of the leg's input token
/// from the caller, like an ERC-20 allowance scoped to one call.
pub struct VenueEnv<'a> {
    ledger: &'a mut Ledger,
    /// Address of the venue being called.
    pub venue: Address,
    /// The router contract: pays the input, receives the output.
    pub caller: Address,
    allowance_token: Address,
    remaining_allowance: U256,
    router_lock: &'a ReentrancyLock,
}

impl<'a> VenueEnv<'a> {
    pub fn new(
        ledger: &'a mut Ledger,
        venue: Address,
        caller: Address,
        leg: &LegReq,
        router_lock: &'a ReentrancyLock,
    ) -> Self {
        Self {
            ledger,
            venue,
            caller,
            allowance_token: leg.token_in,
            remaining_allowance: leg.amount_in,
            router_lock,
        }
    }

    pub fn balance_of(&self, token: Address, holder: Address) -> U256 {
        self.ledger.balance_of(token, holder)
    }

    /// Entry into one of the router's swap functions from inside a venue call.
    /// Goes through the same lock as a top-level swap.
    pub fn reenter_router(&self) -> Result<LockGuard, RouterError> {
        self.router_lock.acquire()
    }

    /// Pull `amount` of the input token from the caller into the venue,
    /// spending the allowance.
    pub fn pull_input(&mut self, token: Address, amount: U256) -> Result<(), VenueError> {
        let remaining = if token == self.allowance_token {
            self.remaining_allowance
        } else {
            U256::ZERO
        };
        if amount > remaining {
            return Err(VenueError::AllowanceExceeded {
                token,
                requested: amount,
                remaining,
            });
        }
        self.ledger.transfer(token, self.caller, self.venue, amount)?;
        if token == self.allowance_token {
            self.remaining_allowance = remaining - amount;
        }
        Ok(())
    }

    /// Push `amount` of the output token from the venue to the caller.
    pub fn push_output(&mut self, token: Address, amount: U256) -> Result<(), VenueError> {
        self.ledger
            .transfer(token, self.venue, self.caller, amount)
            .map_err(VenueError::from)
    }
}

/// An external venue contract. Implementations are untrusted.
pub trait Venue: fmt::Debug + Send + Sync {
    fn kind(&self) -> RouterKind;

    /// Read-only output estimate (staticcall semantics).
    fn quote(&self, leg: &LegReq) -> Result<U256, VenueError>;

    /// Perform the swap; returns the output amount the venue claims to have sent.
    fn swap(&mut self, env: &mut VenueEnv<'_>, leg: &LegReq) -> Result<U256, VenueError>;

    /// Copy of the venue's state, used for transaction snapshots.
    fn box_clone(&self) -> Box<dyn Venue>;
}

impl Clone for Box<dyn Venue> {
    fn clone(&self) -> Self {
        self.box_clone()
    }
}

/// Venue contracts deployed on the simulated chain, by address.
#[derive(Debug, Clone, Default)]
pub struct VenueBook {
    venues: BTreeMap<Address, Box<dyn Venue>>,
}

impl VenueBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the previously deployed venue at `address`, if any.
    pub fn deploy(&mut self, address: Address, venue: Box<dyn Venue>) -> Option<Box<dyn Venue>> {
        self.venues.insert(address, venue)
    }

    pub fn get(&self, address: Address) -> Option<&dyn Venue> {
        self.venues.get(&address).map(|v| &**v)
    }

    pub fn get_mut(&mut self, address: Address) -> Option<&mut Box<dyn Venue>> {
        self.venues.get_mut(&address)
    }

    pub fn len(&self) -> usize {
        self.venues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.venues.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::Token;

    fn t(b: u8) -> Address {
        Address::repeat_byte(b)
    }

    fn u(v: u64) -> U256 {
        U256::from(v)
    }

    fn funded() -> Ledger {
        let mut ledger = Ledger::new();
        ledger.register(Token::new(t(0x0a), "A", 18)).unwrap();
        ledger.register(Token::new(t(0x0b), "B", 18)).unwrap();
        ledger.mint(t(0x0a), t(0xd0), u(500)).unwrap();
        ledger.mint(t(0x0b), t(0xd0), u(500)).unwrap();
        ledger
    }

    fn leg(amount: u64) -> LegReq {
        LegReq {
            token_in: t(0x0a),
            token_out: t(0x0b),
            amount_in: u(amount),
            fee_tier: None,
        }
    }

    #[test]
    fn pulls_are_capped_by_the_leg_amount() {
        let mut ledger = funded();
        let lock = ReentrancyLock::new();
        let mut env = VenueEnv::new(&mut ledger, t(0x77), t(0xd0), &leg(10), &lock);

        env.pull_input(t(0x0a), u(6)).unwrap();
        assert_eq!(env.remaining_allowance, u(4));
        let Err(VenueError::AllowanceExceeded { requested, remaining, .. }) =
            env.pull_input(t(0x0a), u(5))
        else {
            panic!("pull past the allowance went through");
        };
        assert_eq!((requested, remaining), (u(5), u(4)));
        env.pull_input(t(0x0a), u(4)).unwrap();

        assert_eq!(ledger.balance_of(t(0x0a), t(0xd0)), u(490));
        assert_eq!(ledger.balance_of(t(0x0a), t(0x77)), u(10));
    }

    #[test]
    fn other_tokens_cannot_be_pulled() {
        let mut ledger = funded();
        let lock = ReentrancyLock::new();
        let mut env = VenueEnv::new(&mut ledger, t(0x77), t(0xd0), &leg(10), &lock);

        assert!(matches!(
            env.pull_input(t(0x0b), u(1)),
            Err(VenueError::AllowanceExceeded { .. })
        ));
        assert_eq!(env.balance_of(t(0x0b), t(0xd0)), u(500));
    }
}
