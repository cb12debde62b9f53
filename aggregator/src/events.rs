// Router events
// One event per state mutation, kept in the chain's log for off-chain
// observability and for replaying fee accruals
//
// Numan Thabit 2025 Nov

use alloy_primitives::{Address, U256};
use serde::Serialize;

use crate::fee_tiers::FeeTier;
use crate::registry::RouterKind;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum RouterEvent {
    RouterAdded {
        router: Address,
        kind: RouterKind,
    },
    RouterRemoved {
        router: Address,
        kind: RouterKind,
    },
    RouterStatusChanged {
        router: Address,
        active: bool,
    },
    FeeTierAdded {
        tier: FeeTier,
    },
    FeeTierRemoved {
        tier: FeeTier,
    },
    IntermediateAdded {
        token: Address,
    },
    IntermediateRemoved {
        token: Address,
    },
    FeePercentUpdated {
        old_bps: u32,
        new_bps: u32,
    },
    Paused {
        by: Address,
    },
    Unpaused {
        by: Address,
    },
    OwnershipTransferred {
        previous: Address,
        new_owner: Address,
    },
    SwapExecuted {
        caller: Address,
        token_in: Address,
        token_out: Address,
        amount_in: U256,
        gross_amount_out: U256,
        fee: U256,
        amount_out: U256,
        routers: Vec<Address>,
    },
    FeesWithdrawn {
        token: Address,
        to: Address,
        amount: U256,
    },
}

/// An event as committed to the log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoggedEvent {
    pub block: u64,
    pub tx_hash: String,
    pub event: RouterEvent,
}
