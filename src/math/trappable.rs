//! Escalates trapped signals into errors.

use std::cmp::Ordering;

use num_bigint::BigInt;

use crate::context::PrecisionContext;
use crate::error::ArithmeticError;

use super::{Outcome, RadixArithmetic};

/// Wraps another implementation and turns any signal enabled in the
/// context's traps into [`ArithmeticError::Trapped`].
///
/// The wrapped implementation always runs against a copy of the context
/// without traps, so every operation completes and the trapped error still
/// carries the full result and signal set.
#[derive(Clone, Copy, Debug, Default)]
pub struct TrappableRadixMath<M> {
    inner: M,
}

impl<M: RadixArithmetic> TrappableRadixMath<M> {
    pub fn new(inner: M) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &M {
        &self.inner
    }

    fn guard<F>(&self, ctx: &PrecisionContext, operation: F) -> Outcome<M::Value>
    where
        F: FnOnce(&M, &PrecisionContext) -> Outcome<M::Value>,
    {
        if ctx.traps().is_empty() {
            return operation(&self.inner, ctx);
        }
        let untrapped = ctx.without_traps_and_flags();
        let signaled = operation(&self.inner, &untrapped)?;
        match signaled.signals.first_trapped(ctx.traps()) {
            Some(signal) => {
                tracing::debug!(signal = signal.name(), signals = ?signaled.signals, "trapped");
                Err(ArithmeticError::Trapped {
                    signal,
                    signals: signaled.signals,
                    result: signaled.value,
                })
            }
            None => Ok(signaled),
        }
    }
}

impl<M: RadixArithmetic> RadixArithmetic for TrappableRadixMath<M> {
    type Value = M::Value;
    type Helper = M::Helper;

    fn helper(&self) -> &M::Helper {
        self.inner.helper()
    }

    fn round_to_precision(&self, value: &M::Value, ctx: &PrecisionContext) -> Outcome<M::Value> {
        self.guard(ctx, |math, scoped| math.round_to_precision(value, scoped))
    }

    fn plus(&self, value: &M::Value, ctx: &PrecisionContext) -> Outcome<M::Value> {
        self.guard(ctx, |math, scoped| math.plus(value, scoped))
    }

    fn abs(&self, value: &M::Value, ctx: &PrecisionContext) -> Outcome<M::Value> {
        self.guard(ctx, |math, scoped| math.abs(value, scoped))
    }

    fn negate(&self, value: &M::Value, ctx: &PrecisionContext) -> Outcome<M::Value> {
        self.guard(ctx, |math, scoped| math.negate(value, scoped))
    }

    fn add(&self, lhs: &M::Value, rhs: &M::Value, ctx: &PrecisionContext) -> Outcome<M::Value> {
        self.guard(ctx, |math, scoped| math.add(lhs, rhs, scoped))
    }

    fn subtract(
        &self,
        lhs: &M::Value,
        rhs: &M::Value,
        ctx: &PrecisionContext,
    ) -> Outcome<M::Value> {
        self.guard(ctx, |math, scoped| math.subtract(lhs, rhs, scoped))
    }

    fn multiply(
        &self,
        lhs: &M::Value,
        rhs: &M::Value,
        ctx: &PrecisionContext,
    ) -> Outcome<M::Value> {
        self.guard(ctx, |math, scoped| math.multiply(lhs, rhs, scoped))
    }

    fn multiply_and_add(
        &self,
        lhs: &M::Value,
        rhs: &M::Value,
        addend: &M::Value,
        ctx: &PrecisionContext,
    ) -> Outcome<M::Value> {
        self.guard(ctx, |math, scoped| math.multiply_and_add(lhs, rhs, addend, scoped))
    }

    fn divide(
        &self,
        dividend: &M::Value,
        divisor: &M::Value,
        ctx: &PrecisionContext,
    ) -> Outcome<M::Value> {
        self.guard(ctx, |math, scoped| math.divide(dividend, divisor, scoped))
    }

    fn divide_to_exponent(
        &self,
        dividend: &M::Value,
        divisor: &M::Value,
        exponent: &BigInt,
        ctx: &PrecisionContext,
    ) -> Outcome<M::Value> {
        self.guard(ctx, |math, scoped| {
            math.divide_to_exponent(dividend, divisor, exponent, scoped)
        })
    }

    fn divide_to_integer_natural_scale(
        &self,
        dividend: &M::Value,
        divisor: &M::Value,
        ctx: &PrecisionContext,
    ) -> Outcome<M::Value> {
        self.guard(ctx, |math, scoped| {
            math.divide_to_integer_natural_scale(dividend, divisor, scoped)
        })
    }

    fn divide_to_integer_zero_scale(
        &self,
        dividend: &M::Value,
        divisor: &M::Value,
        ctx: &PrecisionContext,
    ) -> Outcome<M::Value> {
        self.guard(ctx, |math, scoped| {
            math.divide_to_integer_zero_scale(dividend, divisor, scoped)
        })
    }

    fn remainder(
        &self,
        dividend: &M::Value,
        divisor: &M::Value,
        ctx: &PrecisionContext,
    ) -> Outcome<M::Value> {
        self.guard(ctx, |math, scoped| math.remainder(dividend, divisor, scoped))
    }

    fn remainder_near(
        &self,
        dividend: &M::Value,
        divisor: &M::Value,
        ctx: &PrecisionContext,
    ) -> Outcome<M::Value> {
        self.guard(ctx, |math, scoped| math.remainder_near(dividend, divisor, scoped))
    }

    fn reduce(&self, value: &M::Value, ctx: &PrecisionContext) -> Outcome<M::Value> {
        self.guard(ctx, |math, scoped| math.reduce(value, scoped))
    }

    fn quantize(
        &self,
        value: &M::Value,
        exponent_source: &M::Value,
        ctx: &PrecisionContext,
    ) -> Outcome<M::Value> {
        self.guard(ctx, |math, scoped| math.quantize(value, exponent_source, scoped))
    }

    fn round_to_exponent_exact(
        &self,
        value: &M::Value,
        exponent: &BigInt,
        ctx: &PrecisionContext,
    ) -> Outcome<M::Value> {
        self.guard(ctx, |math, scoped| {
            math.round_to_exponent_exact(value, exponent, scoped)
        })
    }

    fn round_to_exponent_simple(
        &self,
        value: &M::Value,
        exponent: &BigInt,
        ctx: &PrecisionContext,
    ) -> Outcome<M::Value> {
        self.guard(ctx, |math, scoped| {
            math.round_to_exponent_simple(value, exponent, scoped)
        })
    }

    fn round_to_exponent_no_rounded_flag(
        &self,
        value: &M::Value,
        exponent: &BigInt,
        ctx: &PrecisionContext,
    ) -> Outcome<M::Value> {
        self.guard(ctx, |math, scoped| {
            math.round_to_exponent_no_rounded_flag(value, exponent, scoped)
        })
    }

    fn next_plus(&self, value: &M::Value, ctx: &PrecisionContext) -> Outcome<M::Value> {
        self.guard(ctx, |math, scoped| math.next_plus(value, scoped))
    }

    fn next_minus(&self, value: &M::Value, ctx: &PrecisionContext) -> Outcome<M::Value> {
        self.guard(ctx, |math, scoped| math.next_minus(value, scoped))
    }

    fn next_toward(
        &self,
        value: &M::Value,
        target: &M::Value,
        ctx: &PrecisionContext,
    ) -> Outcome<M::Value> {
        self.guard(ctx, |math, scoped| math.next_toward(value, target, scoped))
    }

    fn min(&self, lhs: &M::Value, rhs: &M::Value, ctx: &PrecisionContext) -> Outcome<M::Value> {
        self.guard(ctx, |math, scoped| math.min(lhs, rhs, scoped))
    }

    fn max(&self, lhs: &M::Value, rhs: &M::Value, ctx: &PrecisionContext) -> Outcome<M::Value> {
        self.guard(ctx, |math, scoped| math.max(lhs, rhs, scoped))
    }

    fn min_magnitude(
        &self,
        lhs: &M::Value,
        rhs: &M::Value,
        ctx: &PrecisionContext,
    ) -> Outcome<M::Value> {
        self.guard(ctx, |math, scoped| math.min_magnitude(lhs, rhs, scoped))
    }

    fn max_magnitude(
        &self,
        lhs: &M::Value,
        rhs: &M::Value,
        ctx: &PrecisionContext,
    ) -> Outcome<M::Value> {
        self.guard(ctx, |math, scoped| math.max_magnitude(lhs, rhs, scoped))
    }

    fn compare_to(&self, lhs: &M::Value, rhs: &M::Value) -> Ordering {
        self.inner.compare_to(lhs, rhs)
    }

    fn compare_to_with_context(
        &self,
        lhs: &M::Value,
        rhs: &M::Value,
        ctx: &PrecisionContext,
    ) -> Outcome<M::Value> {
        self.guard(ctx, |math, scoped| math.compare_to_with_context(lhs, rhs, scoped))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use super::*;
    use crate::math::RadixMath;
    use crate::number::DecimalHelper;
    use crate::signals::Signals;
    use crate::test_utils::{dec, precision};

    fn trappable() -> TrappableRadixMath<RadixMath<DecimalHelper>> {
        TrappableRadixMath::new(RadixMath::new(DecimalHelper))
    }

    #[test]
    fn untrapped_signals_pass_through() {
        let ctx = precision(2).with_traps(Signals::OVERFLOW);
        let result = trappable().add(&dec(125, 0), &dec(0, 0), &ctx).expect("no trap");
        assert_eq!(result.value, dec(12, 1));
        assert_eq!(result.signals, Signals::INEXACT | Signals::ROUNDED);
    }

    #[test]
    fn trapped_signal_carries_result() {
        let ctx = precision(2).with_traps(Signals::INEXACT);
        let error = trappable()
            .add(&dec(125, 0), &dec(0, 0), &ctx)
            .expect_err("inexact is trapped");
        assert_eq!(error.signal(), Some(Signals::INEXACT));
        assert_eq!(error.result(), Some(&dec(12, 1)));
    }

    #[test]
    fn rounded_only_result_escapes_inexact_trap() {
        let ctx = precision(2).with_traps(Signals::INEXACT);
        let result = trappable()
            .add(&dec(120, 0), &dec(0, 0), &ctx)
            .expect("exact rounding");
        assert_eq!(result.value, dec(12, 1));
        assert_eq!(result.signals, Signals::ROUNDED);
    }

    #[test]
    fn precedence_picks_invalid_first() {
        let ctx = precision(5).with_traps(Signals::all());
        let error = trappable()
            .divide(&dec(0, 0), &dec(0, 0), &ctx)
            .expect_err("invalid is trapped");
        assert_eq!(error.signal(), Some(Signals::INVALID));
    }
}
