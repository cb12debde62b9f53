// Integer math for output estimation and fee withholding
// All amounts are U256 in the token's smallest unit; every intermediate
// product is checked and surfaces ArithmeticOverflow instead of wrapping
//
// Numan Thabit 2025 Nov

use alloy_primitives::U256;

use crate::constants::{BPS_DENOMINATOR, V2_FEE_DENOMINATOR, V2_FEE_NUMERATOR};
use crate::errors::RouterError;
use crate::fee_tiers::FeeTier;

pub fn checked_mul(a: U256, b: U256) -> Result<U256, RouterError> {
    a.checked_mul(b).ok_or(RouterError::ArithmeticOverflow)
}

pub fn checked_add(a: U256, b: U256) -> Result<U256, RouterError> {
    a.checked_add(b).ok_or(RouterError::ArithmeticOverflow)
}

pub fn checked_sub(a: U256, b: U256) -> Result<U256, RouterError> {
    a.checked_sub(b).ok_or(RouterError::ArithmeticOverflow)
}

/// `a * b / denominator`, rounded down.
pub fn mul_div(a: U256, b: U256, denominator: U256) -> Result<U256, RouterError> {
    let product = checked_mul(a, b)?;
    product
        .checked_div(denominator)
        .ok_or(RouterError::ArithmeticOverflow)
}

/// `floor(amount * bps / 10_000)`.
pub fn apply_bps(amount: U256, bps: u32) -> Result<U256, RouterError> {
    mul_div(
        amount,
        U256::from(bps),
        U256::from(BPS_DENOMINATOR),
    )
}

/// Constant-product output with the 0.3% LP fee:
/// `in * 997 * rOut / (rIn * 1000 + in * 997)`.
///
/// Returns zero when either reserve is empty.
pub fn constant_product_out(
    amount_in: U256,
    reserve_in: U256,
    reserve_out: U256,
) -> Result<U256, RouterError> {
    if amount_in.is_zero() || reserve_in.is_zero() || reserve_out.is_zero() {
        return Ok(U256::ZERO);
    }
    let in_with_fee = checked_mul(amount_in, U256::from(V2_FEE_NUMERATOR))?;
    let numerator = checked_mul(in_with_fee, reserve_out)?;
    let denominator = checked_add(
        checked_mul(reserve_in, U256::from(V2_FEE_DENOMINATOR))?,
        in_with_fee,
    )?;
    Ok(numerator / denominator)
}

/// Fee-tiered output: the tier is taken off the input before the curve.
pub fn fee_tiered_out(
    amount_in: U256,
    reserve_in: U256,
    reserve_out: U256,
    tier: FeeTier,
) -> Result<U256, RouterError> {
    if amount_in.is_zero() || reserve_in.is_zero() || reserve_out.is_zero() {
        return Ok(U256::ZERO);
    }
    let keep = BPS_DENOMINATOR
        .checked_sub(tier.get())
        .ok_or(RouterError::InvalidFeeTier(tier.get()))?;
    let net_in = apply_bps(amount_in, keep)?;
    let numerator = checked_mul(net_in, reserve_out)?;
    let denominator = checked_add(reserve_in, net_in)?;
    Ok(numerator / denominator)
}
