//! The per-radix plug-in contract.

use std::fmt;

use num_bigint::{BigInt, BigUint};
use num_traits::{One, Zero};

use crate::context::PrecisionContext;
use crate::shift::ShiftAccumulator;
use crate::signals::NumberFlags;

/// Everything the generic engine needs to know about one concrete numeric
/// type: its radix, how to take a value apart and put one together, and how
/// to scale and truncate magnitudes in that radix.
pub trait RadixHelper {
    type Value: Clone + fmt::Debug;
    type Accumulator: ShiftAccumulator;

    fn radix(&self) -> u32;

    fn significand<'a>(&self, value: &'a Self::Value) -> &'a BigUint;

    fn exponent<'a>(&self, value: &'a Self::Value) -> &'a BigInt;

    fn flags(&self, value: &Self::Value) -> NumberFlags;

    /// Multiplies `mantissa` by `radix^|exp1 - exp2|`, aligning a value at
    /// `exp1` to the lower exponent `exp2`.
    fn rescale(&self, mantissa: &BigUint, exp1: &BigInt, exp2: &BigInt) -> BigUint {
        let difference = exp1 - exp2;
        self.multiply_by_radix_power(mantissa, difference.magnitude())
    }

    fn multiply_by_radix_power(&self, mantissa: &BigUint, power: &BigUint) -> BigUint;

    fn create_shift_accumulator(&self, magnitude: BigUint) -> Self::Accumulator {
        self.create_shift_accumulator_with(magnitude, 0, false)
    }

    /// Accumulator that continues from an earlier truncation's round digit
    /// and sticky flag.
    fn create_shift_accumulator_with(
        &self,
        magnitude: BigUint,
        last_discarded: u8,
        older_discarded: bool,
    ) -> Self::Accumulator;

    /// True if `numerator / denominator` has a finite expansion in this radix,
    /// i.e. once reduced, the denominator has no prime factor the radix lacks.
    fn has_terminating_expansion(&self, numerator: &BigUint, denominator: &BigUint) -> bool;

    fn create_value(&self, mantissa: BigUint, exponent: BigInt, flags: NumberFlags)
        -> Self::Value;

    fn value_of(&self, value: i64) -> Self::Value {
        self.create_value(
            BigUint::from(value.unsigned_abs()),
            BigInt::zero(),
            NumberFlags::finite(value < 0),
        )
    }

    /// Number of digits of `mantissa` in this radix; zero has length 1.
    fn digit_length(&self, mantissa: &BigUint) -> u64 {
        self.create_shift_accumulator(mantissa.clone()).digit_length()
    }

    /// `radix^power`.
    fn radix_power(&self, power: u64) -> BigUint {
        self.multiply_by_radix_power(&BigUint::one(), &BigUint::from(power))
    }
}

/// Quiet NaN with the sign and payload of `value`, the payload cut to the
/// context's precision.
pub(crate) fn fit_quiet_nan<H: RadixHelper>(
    helper: &H,
    value: &H::Value,
    ctx: &PrecisionContext,
) -> H::Value {
    let flags = helper.flags(value);
    let mut payload = helper.significand(value).clone();
    if ctx.has_max_precision() && helper.digit_length(&payload) > ctx.precision() {
        payload %= helper.radix_power(ctx.precision());
    }
    let quiet = NumberFlags::QUIET_NAN.with_sign(flags.is_negative());
    helper.create_value(payload, BigInt::zero(), quiet)
}
