//! Radix-10 numbers.

use num_bigint::{BigInt, BigUint};
use num_integer::Integer;
use num_traits::{One, Zero};

use crate::math::RadixHelper;
use crate::shift::{decimal_digit_length, multiply_by_power_of_ten, DigitShiftAccumulator};
use crate::signals::NumberFlags;

use super::ExtendedNumber;

/// Arbitrary-precision decimal floating point.
pub type ExtendedDecimal = ExtendedNumber<DecimalHelper>;

/// [`RadixHelper`] for [`ExtendedDecimal`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct DecimalHelper;

impl RadixHelper for DecimalHelper {
    type Value = ExtendedDecimal;
    type Accumulator = DigitShiftAccumulator;

    fn radix(&self) -> u32 {
        10
    }

    fn significand<'a>(&self, value: &'a ExtendedDecimal) -> &'a BigUint {
        value.significand()
    }

    fn exponent<'a>(&self, value: &'a ExtendedDecimal) -> &'a BigInt {
        value.exponent()
    }

    fn flags(&self, value: &ExtendedDecimal) -> NumberFlags {
        value.flags()
    }

    fn multiply_by_radix_power(&self, mantissa: &BigUint, power: &BigUint) -> BigUint {
        multiply_by_power_of_ten(mantissa, power)
    }

    fn create_shift_accumulator_with(
        &self,
        magnitude: BigUint,
        last_discarded: u8,
        older_discarded: bool,
    ) -> DigitShiftAccumulator {
        DigitShiftAccumulator::with_discarded(magnitude, last_discarded, older_discarded)
    }

    fn has_terminating_expansion(&self, numerator: &BigUint, denominator: &BigUint) -> bool {
        if denominator.is_zero() {
            return false;
        }
        let reduced = denominator / numerator.gcd(denominator);
        let twos = reduced.trailing_zeros().unwrap_or(0);
        remove_factor(reduced >> twos, 5).is_one()
    }

    fn create_value(
        &self,
        mantissa: BigUint,
        exponent: BigInt,
        flags: NumberFlags,
    ) -> ExtendedDecimal {
        ExtendedDecimal::from_parts(mantissa, exponent, flags)
    }

    fn digit_length(&self, mantissa: &BigUint) -> u64 {
        decimal_digit_length(mantissa)
    }
}

/// Divides out every factor of `prime` from a nonzero `value`.
fn remove_factor(mut value: BigUint, prime: u32) -> BigUint {
    let factor = BigUint::from(prime);
    while !value.is_zero() {
        let (quotient, remainder) = value.div_rem(&factor);
        if !remainder.is_zero() {
            break;
        }
        value = quotient;
    }
    value
}
