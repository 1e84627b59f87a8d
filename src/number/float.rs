//! Radix-2 numbers.

use num_bigint::{BigInt, BigUint};
use num_integer::Integer;
use num_traits::{Float, One, Zero};

use crate::math::RadixHelper;
use crate::shift::{bit_length, shift_left_chunked, BitShiftAccumulator, SHIFT_CHUNK};
use crate::signals::NumberFlags;

use super::ExtendedNumber;

/// Arbitrary-precision binary floating point.
pub type ExtendedFloat = ExtendedNumber<BinaryHelper>;

/// [`RadixHelper`] for [`ExtendedFloat`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct BinaryHelper;

impl RadixHelper for BinaryHelper {
    type Value = ExtendedFloat;
    type Accumulator = BitShiftAccumulator;

    fn radix(&self) -> u32 {
        2
    }

    fn significand<'a>(&self, value: &'a ExtendedFloat) -> &'a BigUint {
        value.significand()
    }

    fn exponent<'a>(&self, value: &'a ExtendedFloat) -> &'a BigInt {
        value.exponent()
    }

    fn flags(&self, value: &ExtendedFloat) -> NumberFlags {
        value.flags()
    }

    fn multiply_by_radix_power(&self, mantissa: &BigUint, power: &BigUint) -> BigUint {
        shift_left_chunked(mantissa, power, SHIFT_CHUNK)
    }

    fn create_shift_accumulator_with(
        &self,
        magnitude: BigUint,
        last_discarded: u8,
        older_discarded: bool,
    ) -> BitShiftAccumulator {
        BitShiftAccumulator::with_discarded(magnitude, last_discarded, older_discarded)
    }

    fn has_terminating_expansion(&self, numerator: &BigUint, denominator: &BigUint) -> bool {
        if denominator.is_zero() {
            return false;
        }
        let reduced = denominator / numerator.gcd(denominator);
        let twos = reduced.trailing_zeros().unwrap_or(0);
        (reduced >> twos).is_one()
    }

    fn create_value(
        &self,
        mantissa: BigUint,
        exponent: BigInt,
        flags: NumberFlags,
    ) -> ExtendedFloat {
        ExtendedFloat::from_parts(mantissa, exponent, flags)
    }

    fn digit_length(&self, mantissa: &BigUint) -> u64 {
        bit_length(mantissa)
    }
}

impl ExtendedNumber<BinaryHelper> {
    /// Exact value of an `f64`, including signed zeros and infinities. Every
    /// NaN maps to the quiet NaN without payload.
    pub fn from_f64(value: f64) -> Self {
        if value.is_nan() {
            return Self::nan();
        }
        if value.is_infinite() {
            return Self::infinity(value.is_sign_negative());
        }
        if value == 0.0 {
            return if value.is_sign_negative() {
                Self::negative_zero()
            } else {
                Self::zero()
            };
        }
        let (mantissa, exponent, sign) = value.integer_decode();
        Self::from_parts(
            BigUint::from(mantissa),
            BigInt::from(exponent),
            NumberFlags::finite(sign < 0),
        )
    }
}
