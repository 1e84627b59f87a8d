//! Shared constructors for unit tests.

use num_bigint::{BigInt, BigUint};

use crate::context::{PrecisionContext, Rounding};
use crate::math::RadixMath;
use crate::number::{BinaryHelper, DecimalHelper, ExtendedDecimal, ExtendedFloat};
use crate::signals::NumberFlags;

/// `mantissa * 10^exponent`, non-negative.
pub fn dec(mantissa: u64, exponent: i64) -> ExtendedDecimal {
    ExtendedDecimal::from_parts(
        BigUint::from(mantissa),
        BigInt::from(exponent),
        NumberFlags::finite(false),
    )
}

/// `-(mantissa * 10^exponent)`; `dec_neg(0, e)` is a negative zero.
pub fn dec_neg(mantissa: u64, exponent: i64) -> ExtendedDecimal {
    ExtendedDecimal::from_parts(
        BigUint::from(mantissa),
        BigInt::from(exponent),
        NumberFlags::finite(true),
    )
}

/// `mantissa * 2^exponent`, non-negative.
pub fn flt(mantissa: u64, exponent: i64) -> ExtendedFloat {
    ExtendedFloat::from_parts(
        BigUint::from(mantissa),
        BigInt::from(exponent),
        NumberFlags::finite(false),
    )
}

pub fn decimal_math() -> RadixMath<DecimalHelper> {
    RadixMath::new(DecimalHelper)
}

pub fn binary_math() -> RadixMath<BinaryHelper> {
    RadixMath::new(BinaryHelper)
}

/// HalfEven at `digits` of precision, no exponent range.
pub fn precision(digits: u64) -> PrecisionContext {
    PrecisionContext::for_precision_and_rounding(digits, Rounding::HalfEven)
}
