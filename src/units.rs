//! Denomination conversion between wei and human-scaled display units.
//!
//! Wei amounts are `U256`; display amounts are arbitrary-precision decimals,
//! so conversion never loses range. Wei → display is an exact scale shift;
//! display → wei truncates fractional wei toward zero rather than rounding.

use std::str::FromStr;

use alloy::primitives::U256;
use bigdecimal::num_bigint::{BigInt, Sign};
use bigdecimal::{BigDecimal, RoundingMode};

use crate::types::{GatewayError, GatewayResult};

/// Denomination scales supported for display amounts.
///
/// Each scale is a fixed power-of-ten divisor of wei, selected explicitly per
/// conversion. There is no implicit unit inference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Denom {
    /// 10^9 wei.
    Gwei,
    /// 10^18 wei.
    Ether,
}

impl Denom {
    /// Decimal digits between wei and this denomination.
    pub const fn decimals(self) -> i64 {
        match self {
            Denom::Gwei => 9,
            Denom::Ether => 18,
        }
    }
}

/// Convert a wei amount into the given denomination. Exact.
pub fn wei_to_units(amount: U256, denom: Denom) -> GatewayResult<BigDecimal> {
    let digits = BigInt::from_str(&amount.to_string())
        .map_err(|e| GatewayError::Conversion(format!("wei amount: {e}")))?;
    Ok(BigDecimal::new(digits, denom.decimals()))
}

/// Convert a display amount into wei, dropping fractional wei.
///
/// Negative amounts are rejected; non-finite values are not representable by
/// `BigDecimal` and are rejected wherever the caller parses them.
pub fn units_to_wei(amount: &BigDecimal, denom: Denom) -> GatewayResult<U256> {
    if amount.sign() == Sign::Minus {
        return Err(GatewayError::Conversion(format!(
            "negative amount {amount}"
        )));
    }

    let multiplier = BigDecimal::new(BigInt::from(1), -denom.decimals());
    let (wei, _) = (amount * multiplier)
        .with_scale_round(0, RoundingMode::Down)
        .into_bigint_and_exponent();

    U256::from_str(&wei.to_string())
        .map_err(|_| GatewayError::Conversion(format!("{wei} wei exceeds 256 bits")))
}
