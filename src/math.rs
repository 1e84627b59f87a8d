//! Radix-generic arithmetic.
//!
//! [`RadixMath`] implements every operation once, over the [`RadixHelper`]
//! contract and a [`ShiftAccumulator`](crate::ShiftAccumulator), so the same
//! code path serves decimal and binary values. Decorators layer behavior on
//! top of it through the shared [`RadixArithmetic`] trait:
//!
//! - [`TrappableRadixMath`]: escalates trapped signals into errors
//! - [`SimpleRadixMath`]: simple-arithmetic NaN and exponent handling
//! - [`ExtendedOrSimpleRadixMath`]: picks one of the above per context
//!
//! Operations never write to the context they are given. They return the
//! value together with the signals it raised as a [`Signaled`]; callers
//! merge those into their own context with [`Signaled::record`] or
//! [`settle`].

mod dispatch;
mod division;
mod exponent;
mod helper;
mod radix_math;
mod rounding;
mod simple;
mod trappable;

use std::cmp::Ordering;

use num_bigint::BigInt;

use crate::context::PrecisionContext;
use crate::error::ArithmeticError;
use crate::signals::Signals;

pub use dispatch::ExtendedOrSimpleRadixMath;
pub use helper::RadixHelper;
pub use radix_math::RadixMath;
pub use simple::SimpleRadixMath;
pub use trappable::TrappableRadixMath;

/// A result plus the signals raised while computing it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Signaled<V> {
    pub value: V,
    pub signals: Signals,
}

impl<V> Signaled<V> {
    pub fn new(value: V, signals: Signals) -> Self {
        Self { value, signals }
    }

    /// A result that raised no signals.
    pub fn exact(value: V) -> Self {
        Self::new(value, Signals::empty())
    }

    /// Merges the signals into `ctx` and returns the value.
    pub fn record(self, ctx: &mut PrecisionContext) -> V {
        ctx.merge_signals(self.signals);
        self.value
    }
}

/// What every arithmetic operation returns.
pub type Outcome<V> = Result<Signaled<V>, ArithmeticError<V>>;

/// Records an outcome's signals into `ctx` and unwraps its value.
///
/// A trapped error still records the signals that led to it.
pub fn settle<V>(outcome: Outcome<V>, ctx: &mut PrecisionContext) -> Result<V, ArithmeticError<V>> {
    match outcome {
        Ok(signaled) => Ok(signaled.record(ctx)),
        Err(error) => {
            if let ArithmeticError::Trapped { signals, .. } = &error {
                ctx.merge_signals(*signals);
            }
            Err(error)
        }
    }
}

/// The arithmetic operation set shared by the engine and its decorators.
pub trait RadixArithmetic {
    type Value: Clone + std::fmt::Debug;
    type Helper: RadixHelper<Value = Self::Value>;

    fn helper(&self) -> &Self::Helper;

    fn round_to_precision(&self, value: &Self::Value, ctx: &PrecisionContext)
        -> Outcome<Self::Value>;

    /// `0 + value`, rounded.
    fn plus(&self, value: &Self::Value, ctx: &PrecisionContext) -> Outcome<Self::Value>;

    fn abs(&self, value: &Self::Value, ctx: &PrecisionContext) -> Outcome<Self::Value>;

    fn negate(&self, value: &Self::Value, ctx: &PrecisionContext) -> Outcome<Self::Value>;

    fn add(
        &self,
        lhs: &Self::Value,
        rhs: &Self::Value,
        ctx: &PrecisionContext,
    ) -> Outcome<Self::Value>;

    fn subtract(
        &self,
        lhs: &Self::Value,
        rhs: &Self::Value,
        ctx: &PrecisionContext,
    ) -> Outcome<Self::Value>;

    fn multiply(
        &self,
        lhs: &Self::Value,
        rhs: &Self::Value,
        ctx: &PrecisionContext,
    ) -> Outcome<Self::Value>;

    /// `lhs * rhs + addend` with a single rounding.
    fn multiply_and_add(
        &self,
        lhs: &Self::Value,
        rhs: &Self::Value,
        addend: &Self::Value,
        ctx: &PrecisionContext,
    ) -> Outcome<Self::Value>;

    fn divide(
        &self,
        dividend: &Self::Value,
        divisor: &Self::Value,
        ctx: &PrecisionContext,
    ) -> Outcome<Self::Value>;

    /// Quotient rounded to exactly `exponent`.
    fn divide_to_exponent(
        &self,
        dividend: &Self::Value,
        divisor: &Self::Value,
        exponent: &BigInt,
        ctx: &PrecisionContext,
    ) -> Outcome<Self::Value>;

    /// Truncated integer quotient at the exponent closest to the ideal
    /// `dividend.exponent - divisor.exponent`.
    fn divide_to_integer_natural_scale(
        &self,
        dividend: &Self::Value,
        divisor: &Self::Value,
        ctx: &PrecisionContext,
    ) -> Outcome<Self::Value>;

    /// Truncated integer quotient at exponent 0.
    fn divide_to_integer_zero_scale(
        &self,
        dividend: &Self::Value,
        divisor: &Self::Value,
        ctx: &PrecisionContext,
    ) -> Outcome<Self::Value>;

    /// `dividend - divisor * trunc(dividend / divisor)`.
    fn remainder(
        &self,
        dividend: &Self::Value,
        divisor: &Self::Value,
        ctx: &PrecisionContext,
    ) -> Outcome<Self::Value>;

    /// `dividend - divisor * n` with `n` the quotient rounded half-even.
    fn remainder_near(
        &self,
        dividend: &Self::Value,
        divisor: &Self::Value,
        ctx: &PrecisionContext,
    ) -> Outcome<Self::Value>;

    /// Rounds, then strips trailing zeros.
    fn reduce(&self, value: &Self::Value, ctx: &PrecisionContext) -> Outcome<Self::Value>;

    /// `value` rounded to the exponent of `exponent_source`.
    fn quantize(
        &self,
        value: &Self::Value,
        exponent_source: &Self::Value,
        ctx: &PrecisionContext,
    ) -> Outcome<Self::Value>;

    fn round_to_exponent_exact(
        &self,
        value: &Self::Value,
        exponent: &BigInt,
        ctx: &PrecisionContext,
    ) -> Outcome<Self::Value>;

    fn round_to_exponent_simple(
        &self,
        value: &Self::Value,
        exponent: &BigInt,
        ctx: &PrecisionContext,
    ) -> Outcome<Self::Value>;

    fn round_to_exponent_no_rounded_flag(
        &self,
        value: &Self::Value,
        exponent: &BigInt,
        ctx: &PrecisionContext,
    ) -> Outcome<Self::Value>;

    fn next_plus(&self, value: &Self::Value, ctx: &PrecisionContext) -> Outcome<Self::Value>;

    fn next_minus(&self, value: &Self::Value, ctx: &PrecisionContext) -> Outcome<Self::Value>;

    fn next_toward(
        &self,
        value: &Self::Value,
        target: &Self::Value,
        ctx: &PrecisionContext,
    ) -> Outcome<Self::Value>;

    fn min(
        &self,
        lhs: &Self::Value,
        rhs: &Self::Value,
        ctx: &PrecisionContext,
    ) -> Outcome<Self::Value>;

    fn max(
        &self,
        lhs: &Self::Value,
        rhs: &Self::Value,
        ctx: &PrecisionContext,
    ) -> Outcome<Self::Value>;

    fn min_magnitude(
        &self,
        lhs: &Self::Value,
        rhs: &Self::Value,
        ctx: &PrecisionContext,
    ) -> Outcome<Self::Value>;

    fn max_magnitude(
        &self,
        lhs: &Self::Value,
        rhs: &Self::Value,
        ctx: &PrecisionContext,
    ) -> Outcome<Self::Value>;

    /// Total comparison by value. NaN compares above everything, and two NaNs
    /// compare equal.
    fn compare_to(&self, lhs: &Self::Value, rhs: &Self::Value) -> Ordering;

    /// Comparison as a value: -1, 0 or 1, or NaN if either operand is NaN.
    fn compare_to_with_context(
        &self,
        lhs: &Self::Value,
        rhs: &Self::Value,
        ctx: &PrecisionContext,
    ) -> Outcome<Self::Value>;
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use super::*;

    #[test]
    fn record_merges_into_flag_recording_context() {
        let mut ctx = PrecisionContext::decimal64().with_blank_flags();
        let value = Signaled::new(5, Signals::INEXACT).record(&mut ctx);
        assert_eq!(value, 5);
        assert_eq!(ctx.flags(), Signals::INEXACT);
    }

    #[test]
    fn settle_records_trapped_signals() {
        let mut ctx = PrecisionContext::decimal64().with_blank_flags();
        let outcome: Outcome<i32> = Err(ArithmeticError::Trapped {
            signal: Signals::OVERFLOW,
            signals: Signals::OVERFLOW | Signals::INEXACT,
            result: 0,
        });
        assert!(settle(outcome, &mut ctx).is_err());
        assert_eq!(ctx.flags(), Signals::OVERFLOW | Signals::INEXACT);

        let ok: Outcome<i32> = Ok(Signaled::exact(3));
        assert_eq!(settle(ok, &mut ctx).expect("exact result"), 3);
    }
}
