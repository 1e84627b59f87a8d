//! Per-context choice between the extended engine and simple arithmetic.

use std::cmp::Ordering;

use num_bigint::BigInt;

use crate::context::PrecisionContext;

use super::helper::RadixHelper;
use super::{Outcome, RadixArithmetic, RadixMath, SimpleRadixMath};

/// Runs [`SimpleRadixMath`] for contexts marked simplified and the plain
/// engine otherwise.
#[derive(Clone, Debug, Default)]
pub struct ExtendedOrSimpleRadixMath<H> {
    extended: RadixMath<H>,
    simple: SimpleRadixMath<RadixMath<H>>,
}

impl<H: RadixHelper + Clone> ExtendedOrSimpleRadixMath<H> {
    pub fn new(helper: H) -> Self {
        Self {
            extended: RadixMath::new(helper.clone()),
            simple: SimpleRadixMath::new(RadixMath::new(helper)),
        }
    }

    fn select(
        &self,
        ctx: &PrecisionContext,
    ) -> &dyn RadixArithmetic<Value = H::Value, Helper = H> {
        if ctx.is_simplified() {
            &self.simple
        } else {
            &self.extended
        }
    }
}

impl<H: RadixHelper + Clone> RadixArithmetic for ExtendedOrSimpleRadixMath<H> {
    type Value = H::Value;
    type Helper = H;

    fn helper(&self) -> &H {
        self.extended.helper()
    }

    fn round_to_precision(&self, value: &H::Value, ctx: &PrecisionContext) -> Outcome<H::Value> {
        self.select(ctx).round_to_precision(value, ctx)
    }

    fn plus(&self, value: &H::Value, ctx: &PrecisionContext) -> Outcome<H::Value> {
        self.select(ctx).plus(value, ctx)
    }

    fn abs(&self, value: &H::Value, ctx: &PrecisionContext) -> Outcome<H::Value> {
        self.select(ctx).abs(value, ctx)
    }

    fn negate(&self, value: &H::Value, ctx: &PrecisionContext) -> Outcome<H::Value> {
        self.select(ctx).negate(value, ctx)
    }

    fn add(&self, lhs: &H::Value, rhs: &H::Value, ctx: &PrecisionContext) -> Outcome<H::Value> {
        self.select(ctx).add(lhs, rhs, ctx)
    }

    fn subtract(
        &self,
        lhs: &H::Value,
        rhs: &H::Value,
        ctx: &PrecisionContext,
    ) -> Outcome<H::Value> {
        self.select(ctx).subtract(lhs, rhs, ctx)
    }

    fn multiply(
        &self,
        lhs: &H::Value,
        rhs: &H::Value,
        ctx: &PrecisionContext,
    ) -> Outcome<H::Value> {
        self.select(ctx).multiply(lhs, rhs, ctx)
    }

    fn multiply_and_add(
        &self,
        lhs: &H::Value,
        rhs: &H::Value,
        addend: &H::Value,
        ctx: &PrecisionContext,
    ) -> Outcome<H::Value> {
        self.select(ctx).multiply_and_add(lhs, rhs, addend, ctx)
    }

    fn divide(
        &self,
        dividend: &H::Value,
        divisor: &H::Value,
        ctx: &PrecisionContext,
    ) -> Outcome<H::Value> {
        self.select(ctx).divide(dividend, divisor, ctx)
    }

    fn divide_to_exponent(
        &self,
        dividend: &H::Value,
        divisor: &H::Value,
        exponent: &BigInt,
        ctx: &PrecisionContext,
    ) -> Outcome<H::Value> {
        self.select(ctx)
            .divide_to_exponent(dividend, divisor, exponent, ctx)
    }

    fn divide_to_integer_natural_scale(
        &self,
        dividend: &H::Value,
        divisor: &H::Value,
        ctx: &PrecisionContext,
    ) -> Outcome<H::Value> {
        self.select(ctx)
            .divide_to_integer_natural_scale(dividend, divisor, ctx)
    }

    fn divide_to_integer_zero_scale(
        &self,
        dividend: &H::Value,
        divisor: &H::Value,
        ctx: &PrecisionContext,
    ) -> Outcome<H::Value> {
        self.select(ctx)
            .divide_to_integer_zero_scale(dividend, divisor, ctx)
    }

    fn remainder(
        &self,
        dividend: &H::Value,
        divisor: &H::Value,
        ctx: &PrecisionContext,
    ) -> Outcome<H::Value> {
        self.select(ctx).remainder(dividend, divisor, ctx)
    }

    fn remainder_near(
        &self,
        dividend: &H::Value,
        divisor: &H::Value,
        ctx: &PrecisionContext,
    ) -> Outcome<H::Value> {
        self.select(ctx).remainder_near(dividend, divisor, ctx)
    }

    fn reduce(&self, value: &H::Value, ctx: &PrecisionContext) -> Outcome<H::Value> {
        self.select(ctx).reduce(value, ctx)
    }

    fn quantize(
        &self,
        value: &H::Value,
        exponent_source: &H::Value,
        ctx: &PrecisionContext,
    ) -> Outcome<H::Value> {
        self.select(ctx).quantize(value, exponent_source, ctx)
    }

    fn round_to_exponent_exact(
        &self,
        value: &H::Value,
        exponent: &BigInt,
        ctx: &PrecisionContext,
    ) -> Outcome<H::Value> {
        self.select(ctx).round_to_exponent_exact(value, exponent, ctx)
    }

    fn round_to_exponent_simple(
        &self,
        value: &H::Value,
        exponent: &BigInt,
        ctx: &PrecisionContext,
    ) -> Outcome<H::Value> {
        self.select(ctx).round_to_exponent_simple(value, exponent, ctx)
    }

    fn round_to_exponent_no_rounded_flag(
        &self,
        value: &H::Value,
        exponent: &BigInt,
        ctx: &PrecisionContext,
    ) -> Outcome<H::Value> {
        self.select(ctx)
            .round_to_exponent_no_rounded_flag(value, exponent, ctx)
    }

    fn next_plus(&self, value: &H::Value, ctx: &PrecisionContext) -> Outcome<H::Value> {
        self.select(ctx).next_plus(value, ctx)
    }

    fn next_minus(&self, value: &H::Value, ctx: &PrecisionContext) -> Outcome<H::Value> {
        self.select(ctx).next_minus(value, ctx)
    }

    fn next_toward(
        &self,
        value: &H::Value,
        target: &H::Value,
        ctx: &PrecisionContext,
    ) -> Outcome<H::Value> {
        self.select(ctx).next_toward(value, target, ctx)
    }

    fn min(&self, lhs: &H::Value, rhs: &H::Value, ctx: &PrecisionContext) -> Outcome<H::Value> {
        self.select(ctx).min(lhs, rhs, ctx)
    }

    fn max(&self, lhs: &H::Value, rhs: &H::Value, ctx: &PrecisionContext) -> Outcome<H::Value> {
        self.select(ctx).max(lhs, rhs, ctx)
    }

    fn min_magnitude(
        &self,
        lhs: &H::Value,
        rhs: &H::Value,
        ctx: &PrecisionContext,
    ) -> Outcome<H::Value> {
        self.select(ctx).min_magnitude(lhs, rhs, ctx)
    }

    fn max_magnitude(
        &self,
        lhs: &H::Value,
        rhs: &H::Value,
        ctx: &PrecisionContext,
    ) -> Outcome<H::Value> {
        self.select(ctx).max_magnitude(lhs, rhs, ctx)
    }

    fn compare_to(&self, lhs: &H::Value, rhs: &H::Value) -> Ordering {
        self.extended.compare_to(lhs, rhs)
    }

    fn compare_to_with_context(
        &self,
        lhs: &H::Value,
        rhs: &H::Value,
        ctx: &PrecisionContext,
    ) -> Outcome<H::Value> {
        self.select(ctx).compare_to_with_context(lhs, rhs, ctx)
    }
}
