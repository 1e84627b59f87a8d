//! Simple-arithmetic decorator.

use std::cmp::Ordering;

use num_bigint::{BigInt, BigUint};
use num_traits::{Signed, Zero};

use crate::context::PrecisionContext;
use crate::signals::Signals;

use super::helper::{fit_quiet_nan, RadixHelper};
use super::{Outcome, RadixArithmetic, Signaled};

/// Wraps another implementation with simple-arithmetic conventions: NaN
/// operands short-circuit before the operation runs, and finite results
/// with a positive exponent are rewritten at exponent 0 whenever the digits
/// fit the precision there.
#[derive(Clone, Copy, Debug, Default)]
pub struct SimpleRadixMath<M> {
    inner: M,
}

impl<M: RadixArithmetic> SimpleRadixMath<M> {
    pub fn new(inner: M) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &M {
        &self.inner
    }

    fn nan_operand(
        &self,
        operands: &[&M::Value],
        ctx: &PrecisionContext,
    ) -> Option<Signaled<M::Value>> {
        let helper = self.inner.helper();
        if let Some(signaling) = operands
            .iter()
            .find(|value| helper.flags(value).is_signaling_nan())
        {
            return Some(Signaled::new(
                fit_quiet_nan(helper, signaling, ctx),
                Signals::INVALID,
            ));
        }
        operands
            .iter()
            .find(|value| helper.flags(value).is_quiet_nan())
            .map(|quiet| Signaled::exact(fit_quiet_nan(helper, quiet, ctx)))
    }

    fn simplify<F>(
        &self,
        operands: &[&M::Value],
        ctx: &PrecisionContext,
        operation: F,
    ) -> Outcome<M::Value>
    where
        F: FnOnce(&M, &PrecisionContext) -> Outcome<M::Value>,
    {
        if let Some(nan) = self.nan_operand(operands, ctx) {
            return Ok(nan);
        }
        let signaled = operation(&self.inner, ctx)?;
        Ok(Signaled::new(
            self.at_exponent_zero(signaled.value, ctx),
            signaled.signals,
        ))
    }

    fn at_exponent_zero(&self, value: M::Value, ctx: &PrecisionContext) -> M::Value {
        let helper = self.inner.helper();
        let flags = helper.flags(&value);
        if !flags.is_finite() || !helper.exponent(&value).is_positive() {
            return value;
        }
        let significand = helper.significand(&value);
        if significand.is_zero() {
            return helper.create_value(BigUint::zero(), BigInt::zero(), flags);
        }
        if !ctx.has_max_precision() {
            return value;
        }
        let exponent = helper.exponent(&value);
        let room = BigInt::from(ctx.precision()) - BigInt::from(helper.digit_length(significand));
        if exponent > &room {
            return value;
        }
        let scaled = helper.rescale(significand, exponent, &BigInt::zero());
        helper.create_value(scaled, BigInt::zero(), flags)
    }
}

impl<M: RadixArithmetic> RadixArithmetic for SimpleRadixMath<M> {
    type Value = M::Value;
    type Helper = M::Helper;

    fn helper(&self) -> &M::Helper {
        self.inner.helper()
    }

    fn round_to_precision(&self, value: &M::Value, ctx: &PrecisionContext) -> Outcome<M::Value> {
        self.simplify(&[value], ctx, |math, scoped| math.round_to_precision(value, scoped))
    }

    fn plus(&self, value: &M::Value, ctx: &PrecisionContext) -> Outcome<M::Value> {
        self.simplify(&[value], ctx, |math, scoped| math.plus(value, scoped))
    }

    fn abs(&self, value: &M::Value, ctx: &PrecisionContext) -> Outcome<M::Value> {
        self.simplify(&[value], ctx, |math, scoped| math.abs(value, scoped))
    }

    fn negate(&self, value: &M::Value, ctx: &PrecisionContext) -> Outcome<M::Value> {
        self.simplify(&[value], ctx, |math, scoped| math.negate(value, scoped))
    }

    fn add(&self, lhs: &M::Value, rhs: &M::Value, ctx: &PrecisionContext) -> Outcome<M::Value> {
        self.simplify(&[lhs, rhs], ctx, |math, scoped| math.add(lhs, rhs, scoped))
    }

    fn subtract(
        &self,
        lhs: &M::Value,
        rhs: &M::Value,
        ctx: &PrecisionContext,
    ) -> Outcome<M::Value> {
        self.simplify(&[lhs, rhs], ctx, |math, scoped| math.subtract(lhs, rhs, scoped))
    }

    fn multiply(
        &self,
        lhs: &M::Value,
        rhs: &M::Value,
        ctx: &PrecisionContext,
    ) -> Outcome<M::Value> {
        self.simplify(&[lhs, rhs], ctx, |math, scoped| math.multiply(lhs, rhs, scoped))
    }

    fn multiply_and_add(
        &self,
        lhs: &M::Value,
        rhs: &M::Value,
        addend: &M::Value,
        ctx: &PrecisionContext,
    ) -> Outcome<M::Value> {
        self.simplify(&[lhs, rhs, addend], ctx, |math, scoped| {
            math.multiply_and_add(lhs, rhs, addend, scoped)
        })
    }

    fn divide(
        &self,
        dividend: &M::Value,
        divisor: &M::Value,
        ctx: &PrecisionContext,
    ) -> Outcome<M::Value> {
        self.simplify(&[dividend, divisor], ctx, |math, scoped| {
            math.divide(dividend, divisor, scoped)
        })
    }

    fn divide_to_exponent(
        &self,
        dividend: &M::Value,
        divisor: &M::Value,
        exponent: &BigInt,
        ctx: &PrecisionContext,
    ) -> Outcome<M::Value> {
        self.simplify(&[dividend, divisor], ctx, |math, scoped| {
            math.divide_to_exponent(dividend, divisor, exponent, scoped)
        })
    }

    fn divide_to_integer_natural_scale(
        &self,
        dividend: &M::Value,
        divisor: &M::Value,
        ctx: &PrecisionContext,
    ) -> Outcome<M::Value> {
        self.simplify(&[dividend, divisor], ctx, |math, scoped| {
            math.divide_to_integer_natural_scale(dividend, divisor, scoped)
        })
    }

    fn divide_to_integer_zero_scale(
        &self,
        dividend: &M::Value,
        divisor: &M::Value,
        ctx: &PrecisionContext,
    ) -> Outcome<M::Value> {
        self.simplify(&[dividend, divisor], ctx, |math, scoped| {
            math.divide_to_integer_zero_scale(dividend, divisor, scoped)
        })
    }

    fn remainder(
        &self,
        dividend: &M::Value,
        divisor: &M::Value,
        ctx: &PrecisionContext,
    ) -> Outcome<M::Value> {
        self.simplify(&[dividend, divisor], ctx, |math, scoped| {
            math.remainder(dividend, divisor, scoped)
        })
    }

    fn remainder_near(
        &self,
        dividend: &M::Value,
        divisor: &M::Value,
        ctx: &PrecisionContext,
    ) -> Outcome<M::Value> {
        self.simplify(&[dividend, divisor], ctx, |math, scoped| {
            math.remainder_near(dividend, divisor, scoped)
        })
    }

    fn reduce(&self, value: &M::Value, ctx: &PrecisionContext) -> Outcome<M::Value> {
        self.simplify(&[value], ctx, |math, scoped| math.reduce(value, scoped))
    }

    fn quantize(
        &self,
        value: &M::Value,
        exponent_source: &M::Value,
        ctx: &PrecisionContext,
    ) -> Outcome<M::Value> {
        self.simplify(&[value, exponent_source], ctx, |math, scoped| {
            math.quantize(value, exponent_source, scoped)
        })
    }

    fn round_to_exponent_exact(
        &self,
        value: &M::Value,
        exponent: &BigInt,
        ctx: &PrecisionContext,
    ) -> Outcome<M::Value> {
        self.simplify(&[value], ctx, |math, scoped| {
            math.round_to_exponent_exact(value, exponent, scoped)
        })
    }

    fn round_to_exponent_simple(
        &self,
        value: &M::Value,
        exponent: &BigInt,
        ctx: &PrecisionContext,
    ) -> Outcome<M::Value> {
        self.simplify(&[value], ctx, |math, scoped| {
            math.round_to_exponent_simple(value, exponent, scoped)
        })
    }

    fn round_to_exponent_no_rounded_flag(
        &self,
        value: &M::Value,
        exponent: &BigInt,
        ctx: &PrecisionContext,
    ) -> Outcome<M::Value> {
        self.simplify(&[value], ctx, |math, scoped| {
            math.round_to_exponent_no_rounded_flag(value, exponent, scoped)
        })
    }

    fn next_plus(&self, value: &M::Value, ctx: &PrecisionContext) -> Outcome<M::Value> {
        self.simplify(&[value], ctx, |math, scoped| math.next_plus(value, scoped))
    }

    fn next_minus(&self, value: &M::Value, ctx: &PrecisionContext) -> Outcome<M::Value> {
        self.simplify(&[value], ctx, |math, scoped| math.next_minus(value, scoped))
    }

    fn next_toward(
        &self,
        value: &M::Value,
        target: &M::Value,
        ctx: &PrecisionContext,
    ) -> Outcome<M::Value> {
        self.simplify(&[value, target], ctx, |math, scoped| {
            math.next_toward(value, target, scoped)
        })
    }

    fn min(&self, lhs: &M::Value, rhs: &M::Value, ctx: &PrecisionContext) -> Outcome<M::Value> {
        self.simplify(&[lhs, rhs], ctx, |math, scoped| math.min(lhs, rhs, scoped))
    }

    fn max(&self, lhs: &M::Value, rhs: &M::Value, ctx: &PrecisionContext) -> Outcome<M::Value> {
        self.simplify(&[lhs, rhs], ctx, |math, scoped| math.max(lhs, rhs, scoped))
    }

    fn min_magnitude(
        &self,
        lhs: &M::Value,
        rhs: &M::Value,
        ctx: &PrecisionContext,
    ) -> Outcome<M::Value> {
        self.simplify(&[lhs, rhs], ctx, |math, scoped| math.min_magnitude(lhs, rhs, scoped))
    }

    fn max_magnitude(
        &self,
        lhs: &M::Value,
        rhs: &M::Value,
        ctx: &PrecisionContext,
    ) -> Outcome<M::Value> {
        self.simplify(&[lhs, rhs], ctx, |math, scoped| math.max_magnitude(lhs, rhs, scoped))
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
        self.simplify(&[lhs, rhs], ctx, |math, scoped| {
            math.compare_to_with_context(lhs, rhs, scoped)
        })
    }
}
