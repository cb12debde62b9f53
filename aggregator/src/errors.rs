// Error types and error handling module
// This file defines the router's revert reasons and the error classes
// used to tell slippage failures from configuration or authorization failures
//
// Numan Thabit 2025 Nov

use alloy_primitives::{Address, U256};
use thiserror::Error;

use crate::fee_tiers::FeeTier;

/// Coarse grouping of revert reasons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    Access,
    Validation,
    Liveness,
    Arithmetic,
    Economic,
    External,
}

/// Every reason a router transaction can revert.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouterError {
    #[error("unauthorized caller {caller}")]
    Unauthorized { caller: Address },
    #[error("reentrant call rejected")]
    ReentrantCall,
    #[error("invalid path: {0}")]
    InvalidPath(String),
    #[error("router {0} already registered")]
    DuplicateRouter(Address),
    #[error("router {0} is not registered or not active")]
    UnknownRouter(Address),
    #[error("fee tier {0} is not supported")]
    UnsupportedFeeTier(FeeTier),
    #[error("fee tier {0} is outside the allowed range")]
    InvalidFeeTier(u32),
    #[error("fee {requested}bps exceeds cap of {cap}bps")]
    FeeTooHigh { requested: u32, cap: u32 },
    #[error("zero address not allowed")]
    ZeroAddress,
    #[error("address {0} already holds a contract")]
    AddressInUse(Address),
    #[error("amount must be non-zero")]
    ZeroAmount,
    #[error("unknown token {0}")]
    UnknownToken(Address),
    #[error("{what} capacity of {max} exceeded")]
    CapacityExceeded { what: &'static str, max: usize },
    #[error("deadline {deadline} expired at {now}")]
    Expired { deadline: u64, now: u64 },
    #[error("contract is paused")]
    ContractPaused,
    #[error("arithmetic overflow")]
    ArithmeticOverflow,
    #[error("insufficient output amount: got {amount_out}, minimum {min_amount_out}")]
    InsufficientOutputAmount {
        amount_out: U256,
        min_amount_out: U256,
    },
    #[error("no path found from {token_in} to {token_out}")]
    PathNotFound { token_in: Address, token_out: Address },
    #[error("no accrued fees for token {0}")]
    NothingToWithdraw(Address),
    #[error("insufficient balance of {token} for {holder}: need {needed}, have {available}")]
    InsufficientBalance {
        token: Address,
        holder: Address,
        needed: U256,
        available: U256,
    },
    #[error("venue call to {router} failed: {reason}")]
    VenueCallFailed { router: Address, reason: String },
}

impl RouterError {
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::Unauthorized { .. } | Self::ReentrantCall => ErrorClass::Access,
            Self::InvalidPath(_)
            | Self::DuplicateRouter(_)
            | Self::UnknownRouter(_)
            | Self::UnsupportedFeeTier(_)
            | Self::InvalidFeeTier(_)
            | Self::FeeTooHigh { .. }
            | Self::ZeroAddress
            | Self::AddressInUse(_)
            | Self::ZeroAmount
            | Self::UnknownToken(_)
            | Self::CapacityExceeded { .. } => ErrorClass::Validation,
            Self::Expired { .. } | Self::ContractPaused => ErrorClass::Liveness,
            Self::ArithmeticOverflow => ErrorClass::Arithmetic,
            Self::InsufficientOutputAmount { .. }
            | Self::PathNotFound { .. }
            | Self::NothingToWithdraw(_)
            | Self::InsufficientBalance { .. } => ErrorClass::Economic,
            Self::VenueCallFailed { .. } => ErrorClass::External,
        }
    }

    /// Stable identifier, used as a metrics label and in logs.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Unauthorized { .. } => "Unauthorized",
            Self::ReentrantCall => "ReentrantCall",
            Self::InvalidPath(_) => "InvalidPath",
            Self::DuplicateRouter(_) => "DuplicateRouter",
            Self::UnknownRouter(_) => "UnknownRouter",
            Self::UnsupportedFeeTier(_) => "UnsupportedFeeTier",
            Self::InvalidFeeTier(_) => "InvalidFeeTier",
            Self::FeeTooHigh { .. } => "FeeTooHigh",
            Self::ZeroAddress => "ZeroAddress",
            Self::AddressInUse(_) => "AddressInUse",
            Self::ZeroAmount => "ZeroAmount",
            Self::UnknownToken(_) => "UnknownToken",
            Self::CapacityExceeded { .. } => "CapacityExceeded",
            Self::Expired { .. } => "Expired",
            Self::ContractPaused => "ContractPaused",
            Self::ArithmeticOverflow => "ArithmeticOverflow",
            Self::InsufficientOutputAmount { .. } => "InsufficientOutputAmount",
            Self::PathNotFound { .. } => "PathNotFound",
            Self::NothingToWithdraw(_) => "NothingToWithdraw",
            Self::InsufficientBalance { .. } => "InsufficientBalance",
            Self::VenueCallFailed { .. } => "VenueCallFailed",
        }
    }
}

/// Failure reported by an external venue contract.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VenueError {
    #[error("no pool for {token_in} -> {token_out}")]
    NoPool { token_in: Address, token_out: Address },
    #[error("insufficient liquidity")]
    InsufficientLiquidity,
    #[error("venue does not support this call: {0}")]
    Unsupported(&'static str),
    #[error("pull of {requested} {token} exceeds remaining allowance {remaining}")]
    AllowanceExceeded {
        token: Address,
        requested: U256,
        remaining: U256,
    },
    #[error("reverted: {0}")]
    Reverted(String),
    #[error(transparent)]
    Router(#[from] RouterError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classes_follow_taxonomy() {
        assert_eq!(
            RouterError::Unauthorized { caller: Address::ZERO }.class(),
            ErrorClass::Access
        );
        assert_eq!(RouterError::ContractPaused.class(), ErrorClass::Liveness);
        assert_eq!(RouterError::ArithmeticOverflow.class(), ErrorClass::Arithmetic);
        assert_eq!(
            RouterError::NothingToWithdraw(Address::ZERO).class(),
            ErrorClass::Economic
        );
        assert_eq!(
            RouterError::UnsupportedFeeTier(FeeTier::new(30)).class(),
            ErrorClass::Validation
        );
    }

    #[test]
    fn slippage_message_carries_amounts() {
        let err = RouterError::InsufficientOutputAmount {
            amount_out: U256::from(8u64),
            min_amount_out: U256::from(9u64),
        };
        assert_eq!(err.code(), "InsufficientOutputAmount");
        assert!(err.to_string().contains("got 8, minimum 9"));
    }
}
