//! Operations that target a particular exponent.

use std::cmp::max;

use num_bigint::{BigInt, BigUint};
use num_traits::Zero;

use crate::context::{PrecisionContext, Rounding};
use crate::error::ArithmeticError;
use crate::shift::ShiftAccumulator;
use crate::signals::Signals;

use super::helper::RadixHelper;
use super::radix_math::{Fallible, Finite, RadixMath};
use super::rounding::Discarded;
use super::{Outcome, RadixArithmetic, Signaled};

impl<H: RadixHelper> RadixMath<H> {
    /// Completes a result whose exponent is fixed: applies the rounding
    /// increment and rejects results that do not fit the context at that
    /// exponent. `dropped_digits` reports whether any digits, zero or not,
    /// were cut to reach it.
    #[allow(clippy::too_many_arguments)]
    pub(super) fn finish_at_exponent(
        &self,
        significand: BigUint,
        exponent: BigInt,
        negative: bool,
        discarded: Discarded,
        dropped_digits: bool,
        ctx: &PrecisionContext,
        signals: &mut Signals,
    ) -> Fallible<H::Value> {
        let mut raised = Signals::empty();
        let inexact = !discarded.is_exact();
        if inexact {
            if ctx.rounding() == Rounding::Unnecessary {
                return Err(ArithmeticError::RoundingRequired);
            }
            raised |= Signals::INEXACT | Signals::ROUNDED;
        }
        if dropped_digits {
            raised |= Signals::ROUNDED;
        }
        let mut kept = significand;
        if self.increments(ctx.rounding(), discarded, &kept, negative) {
            kept += 1u32;
        }
        if !self.fits_at_exponent(&kept, &exponent, ctx) {
            tracing::debug!(%exponent, "result does not fit at the requested exponent");
            return Ok(self.invalid(signals));
        }
        if ctx.has_exponent_range() && !kept.is_zero() {
            let adjusted = &exponent + BigInt::from(self.digit_length(&kept) - 1);
            if &adjusted < ctx.e_min() {
                raised |= Signals::SUBNORMAL;
                if inexact {
                    raised |= Signals::UNDERFLOW;
                }
            }
        }
        *signals |= raised;
        Ok(self.create(kept, exponent, negative))
    }

    fn fits_at_exponent(
        &self,
        significand: &BigUint,
        exponent: &BigInt,
        ctx: &PrecisionContext,
    ) -> bool {
        let length = self.digit_length(significand);
        if ctx.has_max_precision() && length > ctx.precision() {
            return false;
        }
        if !ctx.has_exponent_range() {
            return true;
        }
        if exponent < &ctx.e_tiny() {
            return false;
        }
        let adjusted = exponent + BigInt::from(length - 1);
        if &adjusted > ctx.e_max() {
            return false;
        }
        !(ctx.clamp_normal_exponents() && ctx.has_max_precision() && exponent > &ctx.e_top())
    }

    /// The significand of `parts` expressed at `target`, padded or truncated.
    fn align_to_exponent(&self, parts: &Finite, target: &BigInt) -> (BigUint, Discarded, bool) {
        if target <= &parts.exponent {
            let padded = self
                .helper()
                .rescale(&parts.significand, &parts.exponent, target);
            return (padded, Discarded::EXACT, false);
        }
        let mut accumulator = self
            .helper()
            .create_shift_accumulator(parts.significand.clone());
        let distance = target - &parts.exponent;
        accumulator.shift_right(distance.magnitude());
        let discarded = Discarded::of(&accumulator);
        (accumulator.shifted_value(), discarded, true)
    }

    fn quantize_finite(
        &self,
        parts: &Finite,
        target: &BigInt,
        ctx: &PrecisionContext,
    ) -> Outcome<H::Value> {
        let mut signals = Signals::empty();
        if target < &parts.exponent && ctx.has_max_precision() && !parts.significand.is_zero() {
            // refuse padding that cannot fit before allocating it
            let needed =
                BigInt::from(self.digit_length(&parts.significand)) + (&parts.exponent - target);
            if needed > BigInt::from(ctx.precision()) {
                return Ok(Signaled::new(self.invalid(&mut signals), signals));
            }
        }
        let (significand, discarded, dropped) = self.align_to_exponent(parts, target);
        let value = self.finish_at_exponent(
            significand,
            target.clone(),
            parts.negative,
            discarded,
            dropped,
            ctx,
            &mut signals,
        )?;
        Ok(Signaled::new(value, signals))
    }

    pub(super) fn quantized(
        &self,
        value: &H::Value,
        exponent_source: &H::Value,
        ctx: &PrecisionContext,
    ) -> Outcome<H::Value> {
        let mut signals = Signals::empty();
        if let Some(nan) = self.propagate_nan(&[value, exponent_source], ctx, &mut signals) {
            return Ok(Signaled::new(nan, signals));
        }
        let value_infinite = self.helper().flags(value).is_infinite();
        let source_infinite = self.helper().flags(exponent_source).is_infinite();
        if value_infinite || source_infinite {
            let result = if value_infinite && source_infinite {
                value.clone()
            } else {
                self.invalid(&mut signals)
            };
            return Ok(Signaled::new(result, signals));
        }
        let target = self.helper().exponent(exponent_source).clone();
        self.quantize_finite(&self.finite(value), &target, ctx)
    }

    pub(super) fn rounded_to_exponent_exact(
        &self,
        value: &H::Value,
        exponent: &BigInt,
        ctx: &PrecisionContext,
    ) -> Outcome<H::Value> {
        let mut signals = Signals::empty();
        if let Some(nan) = self.propagate_nan(&[value], ctx, &mut signals) {
            return Ok(Signaled::new(nan, signals));
        }
        if self.helper().flags(value).is_infinite() {
            return Ok(Signaled::new(value.clone(), signals));
        }
        let parts = self.finite(value);
        if &parts.exponent >= exponent {
            return self.round_to_precision(value, ctx);
        }
        self.quantize_finite(&parts, exponent, ctx)
    }

    /// Rounds to `exponent` when the result fits the precision there, and
    /// otherwise falls back to ordinary rounding to precision.
    pub(super) fn rounded_to_exponent(
        &self,
        value: &H::Value,
        exponent: &BigInt,
        ctx: &PrecisionContext,
    ) -> Outcome<H::Value> {
        let mut signals = Signals::empty();
        if let Some(nan) = self.propagate_nan(&[value], ctx, &mut signals) {
            return Ok(Signaled::new(nan, signals));
        }
        if self.helper().flags(value).is_infinite() {
            return Ok(Signaled::new(value.clone(), signals));
        }
        let parts = self.finite(value);
        // below e_tiny the subnormal rounding is the coarser cut
        let target = if ctx.has_exponent_range() {
            max(exponent.clone(), ctx.e_tiny())
        } else {
            exponent.clone()
        };
        if parts.exponent >= target {
            return self.round_to_precision(value, ctx);
        }
        let mut accumulator = self
            .helper()
            .create_shift_accumulator(parts.significand.clone());
        let distance = &target - &parts.exponent;
        accumulator.shift_right(distance.magnitude());
        if ctx.has_max_precision() && accumulator.digit_length() > ctx.precision() {
            return self.round_to_precision(value, ctx);
        }
        let discarded = Discarded::of(&accumulator);
        let mut kept = accumulator.shifted_value();
        if !discarded.is_exact() {
            if ctx.rounding() == Rounding::Unnecessary {
                return Err(ArithmeticError::RoundingRequired);
            }
            signals |= Signals::INEXACT;
        }
        signals |= Signals::ROUNDED;
        if self.increments(ctx.rounding(), discarded, &kept, parts.negative) {
            kept += 1u32;
        }
        let rounded = self.round_finite(
            kept,
            target,
            parts.negative,
            ctx,
            Discarded::EXACT,
            &mut signals,
        )?;
        Ok(Signaled::new(rounded, signals))
    }

    pub(super) fn reduced(&self, value: &H::Value, ctx: &PrecisionContext) -> Outcome<H::Value> {
        let mut signals = Signals::empty();
        if let Some(nan) = self.propagate_nan(&[value], ctx, &mut signals) {
            return Ok(Signaled::new(nan, signals));
        }
        if self.helper().flags(value).is_infinite() {
            return Ok(Signaled::new(value.clone(), signals));
        }
        let rounded = self.round_to_precision(value, ctx)?;
        signals |= rounded.signals;
        if !self.helper().flags(&rounded.value).is_finite() {
            return Ok(Signaled::new(rounded.value, signals));
        }
        let parts = self.finite(&rounded.value);
        if parts.significand.is_zero() {
            let zero = self.create(BigUint::zero(), BigInt::zero(), parts.negative);
            return Ok(Signaled::new(zero, signals));
        }
        let limit = (ctx.has_exponent_range()
            && ctx.clamp_normal_exponents()
            && ctx.has_max_precision())
        .then(|| ctx.e_top());
        let (significand, exponent) =
            self.strip_trailing_zeros(parts.significand, parts.exponent, limit.as_ref());
        Ok(Signaled::new(
            self.create(significand, exponent, parts.negative),
            signals,
        ))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use super::*;
    use crate::test_utils::{dec, dec_neg, decimal_math, precision};
    use crate::ExtendedDecimal;

    #[test]
    fn quantize_pads_and_rounds() {
        let math = decimal_math();
        let ctx = precision(9);
        let padded = math.quantize(&dec(217, -2), &dec(1, -3), &ctx).expect("quantize");
        assert_eq!(padded.value, dec(2170, -3));
        assert!(padded.signals.is_empty());

        let rounded = math.quantize(&dec(217, -2), &dec(1, -1), &ctx).expect("quantize");
        assert_eq!(rounded.value, dec(22, -1));
        assert_eq!(rounded.signals, Signals::INEXACT | Signals::ROUNDED);

        let zeros = math.quantize(&dec(2100, -3), &dec(1, -1), &ctx).expect("quantize");
        assert_eq!(zeros.value, dec(21, -1));
        assert_eq!(zeros.signals, Signals::ROUNDED);
    }

    #[test]
    fn quantize_beyond_precision_is_invalid() {
        let result = decimal_math()
            .quantize(&dec(12345, 0), &dec(1, -2), &precision(5))
            .expect("quantize");
        assert!(result.value.is_nan());
        assert_eq!(result.signals, Signals::INVALID);
    }

    #[test]
    fn quantize_infinities() {
        let math = decimal_math();
        let ctx = precision(5);
        let inf = ExtendedDecimal::infinity(false);
        let both = math.quantize(&inf, &ExtendedDecimal::infinity(true), &ctx).expect("quantize");
        assert!(both.value.is_infinite());
        assert!(both.signals.is_empty());

        let one = math.quantize(&inf, &dec(1, 0), &ctx).expect("quantize");
        assert!(one.value.is_nan());
        assert_eq!(one.signals, Signals::INVALID);
    }

    #[test]
    fn round_to_exponent_exact_and_simple() {
        let math = decimal_math();
        let ctx = precision(9);
        let exact = math
            .round_to_exponent_exact(&dec(2567, -3), &BigInt::zero(), &ctx)
            .expect("round");
        assert_eq!(exact.value, dec(3, 0));
        assert_eq!(exact.signals, Signals::INEXACT | Signals::ROUNDED);

        let untouched = math
            .round_to_exponent_exact(&dec(25, 2), &BigInt::zero(), &ctx)
            .expect("round");
        assert_eq!(untouched.value, dec(25, 2));

        let simple = math
            .round_to_exponent_simple(&dec(2567, -3), &BigInt::from(-1), &ctx)
            .expect("round");
        assert_eq!(simple.value, dec(26, -1));

        let quiet = math
            .round_to_exponent_no_rounded_flag(&dec(2000, -3), &BigInt::zero(), &ctx)
            .expect("round");
        assert_eq!(quiet.value, dec(2, 0));
        assert!(quiet.signals.is_empty());
    }

    #[test]
    fn round_to_exponent_simple_falls_back_to_precision() {
        let result = decimal_math()
            .round_to_exponent_simple(&dec(123_456_789, -3), &BigInt::from(-1), &precision(4))
            .expect("round");
        assert_eq!(result.value, dec(1235, 2));
    }

    #[test]
    fn reduce_strips_zeros() {
        let math = decimal_math();
        let ctx = precision(9);
        assert_eq!(math.reduce(&dec(1200, -2), &ctx).expect("reduce").value, dec(12, 0));
        assert_eq!(math.reduce(&dec(0, 5), &ctx).expect("reduce").value, dec(0, 0));
        assert_eq!(
            math.reduce(&dec_neg(1000, 0), &ctx).expect("reduce").value,
            dec_neg(1, 3)
        );
    }

    #[test]
    fn reduce_respects_clamp() {
        let ctx = PrecisionContext::for_precision_and_rounding(3, Rounding::HalfEven)
            .with_exponent_range(BigInt::from(-10), BigInt::from(5))
            .expect("range")
            .with_exponent_clamp(true);
        let result = decimal_math().reduce(&dec(100, 2), &ctx).expect("reduce");
        assert_eq!(result.value, dec(10, 3));
    }
}
