// Protocol fee accounting
// Fee rate in basis points (capped), per-token accrued balances and the
// event-log replay used to audit them
//
// Numan Thabit 2025 Nov

use alloy_primitives::{Address, U256};
use std::collections::BTreeMap;

use crate::constants::MAX_FEE_BPS;
use crate::control::OwnerCap;
use crate::errors::RouterError;
use crate::events::RouterEvent;
use crate::quant::{apply_bps, checked_add, checked_sub};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeeState {
    fee_percent_bps: u32,
    accrued: BTreeMap<Address, U256>,
}

impl FeeState {
    pub fn new(fee_percent_bps: u32) -> Result<Self, RouterError> {
        check_cap(fee_percent_bps)?;
        Ok(Self {
            fee_percent_bps,
            accrued: BTreeMap::new(),
        })
    }

    pub fn fee_percent_bps(&self) -> u32 {
        self.fee_percent_bps
    }

    /// Returns the previous rate.
    pub fn set_fee_percent(&mut self, _cap: &OwnerCap, bps: u32) -> Result<u32, RouterError> {
        check_cap(bps)?;
        Ok(std::mem::replace(&mut self.fee_percent_bps, bps))
    }

    /// `floor(amount * feePercentBps / 10_000)`.
    pub fn fee_for(&self, amount: U256) -> Result<U256, RouterError> {
        apply_bps(amount, self.fee_percent_bps)
    }

    pub fn credit(&mut self, token: Address, fee: U256) -> Result<(), RouterError> {
        if fee.is_zero() {
            return Ok(());
        }
        let slot = self.accrued.entry(token).or_insert(U256::ZERO);
        *slot = checked_add(*slot, fee)?;
        Ok(())
    }

    pub fn accrued_balance(&self, token: Address) -> U256 {
        self.accrued.get(&token).copied().unwrap_or(U256::ZERO)
    }

    /// Zero the accrued balance of `token` and return what was there.
    pub fn take_accrued(&mut self, _cap: &OwnerCap, token: Address) -> Result<U256, RouterError> {
        match self.accrued.remove(&token) {
            Some(amount) if !amount.is_zero() => Ok(amount),
            _ => Err(RouterError::NothingToWithdraw(token)),
        }
    }

    pub fn accrued(&self) -> &BTreeMap<Address, U256> {
        &self.accrued
    }
}

fn check_cap(bps: u32) -> Result<(), RouterError> {
    if bps > MAX_FEE_BPS {
        return Err(RouterError::FeeTooHigh {
            requested: bps,
            cap: MAX_FEE_BPS,
        });
    }
    Ok(())
}

/// Rebuild accrued balances from the event log: credited minus withdrawn.
pub fn replay_accruals<'a>(
    events: impl IntoIterator<Item = &'a RouterEvent>,
) -> Result<BTreeMap<Address, U256>, RouterError> {
    let mut balances: BTreeMap<Address, U256> = BTreeMap::new();
    for event in events {
        match event {
            RouterEvent::SwapExecuted { token_out, fee, .. } if !fee.is_zero() => {
                let slot = balances.entry(*token_out).or_insert(U256::ZERO);
                *slot = checked_add(*slot, *fee)?;
            }
            RouterEvent::FeesWithdrawn { token, amount, .. } => {
                let slot = balances.entry(*token).or_insert(U256::ZERO);
                *slot = checked_sub(*slot, *amount)?;
            }
            _ => {}
        }
    }
    balances.retain(|_, v| !v.is_zero());
    Ok(balances)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token() -> Address {
        Address::repeat_byte(0x11)
    }

    #[test]
    fn cap_is_enforced() {
        assert!(FeeState::new(MAX_FEE_BPS).is_ok());
        assert_eq!(
            FeeState::new(MAX_FEE_BPS + 1),
            Err(RouterError::FeeTooHigh {
                requested: MAX_FEE_BPS + 1,
                cap: MAX_FEE_BPS
            })
        );
        let cap = OwnerCap::for_tests();
        let mut fees = FeeState::new(10).unwrap();
        assert!(fees.set_fee_percent(&cap, 5_000).is_err());
        assert_eq!(fees.fee_percent_bps(), 10);
        assert_eq!(fees.set_fee_percent(&cap, 30).unwrap(), 10);
    }

    #[test]
    fn fee_truncates_per_swap() {
        let fees = FeeState::new(30).unwrap();
        assert_eq!(fees.fee_for(U256::from(333u64)).unwrap(), U256::ZERO);
        assert_eq!(fees.fee_for(U256::from(1_000_000u64)).unwrap(), U256::from(3_000u64));
    }

    #[test]
    fn withdrawal_drains_balance() {
        let cap = OwnerCap::for_tests();
        let mut fees = FeeState::new(30).unwrap();
        assert_eq!(
            fees.take_accrued(&cap, token()),
            Err(RouterError::NothingToWithdraw(token()))
        );
        fees.credit(token(), U256::from(7u64)).unwrap();
        fees.credit(token(), U256::from(5u64)).unwrap();
        assert_eq!(fees.accrued_balance(token()), U256::from(12u64));
        assert_eq!(fees.take_accrued(&cap, token()).unwrap(), U256::from(12u64));
        assert_eq!(fees.accrued_balance(token()), U256::ZERO);
    }

    #[test]
    fn zero_credit_leaves_no_entry() {
        let mut fees = FeeState::new(30).unwrap();
        fees.credit(token(), U256::ZERO).unwrap();
        assert!(fees.accrued().is_empty());
    }
}
