//! Division, integer division and remainders.

use num_bigint::{BigInt, BigUint};
use num_integer::Integer;
use num_traits::{One, Signed, Zero};

use crate::context::PrecisionContext;
use crate::signals::Signals;

use super::helper::RadixHelper;
use super::radix_math::{Fallible, Finite, RadixMath};
use super::rounding::Discarded;
use super::{Outcome, RadixArithmetic, Signaled};

/// How the special operands of a division resolved.
enum Operands<V> {
    Resolved(V),
    Finite(Finite, Finite),
}

impl<H: RadixHelper> RadixMath<H> {
    /// Settles NaN and infinite dividends and zero divisors, the cases every
    /// division shares. An infinite divisor is left to the caller.
    fn division_operands(
        &self,
        dividend: &H::Value,
        divisor: &H::Value,
        ctx: &PrecisionContext,
        signals: &mut Signals,
    ) -> Option<Operands<H::Value>> {
        if let Some(nan) = self.propagate_nan(&[dividend, divisor], ctx, signals) {
            return Some(Operands::Resolved(nan));
        }
        let helper = self.helper();
        let dividend_flags = helper.flags(dividend);
        let divisor_flags = helper.flags(divisor);
        let negative = dividend_flags.is_negative() != divisor_flags.is_negative();
        if dividend_flags.is_infinite() {
            let value = if divisor_flags.is_infinite() {
                self.invalid(signals)
            } else {
                self.infinity(negative)
            };
            return Some(Operands::Resolved(value));
        }
        if divisor_flags.is_infinite() {
            return None;
        }
        let lhs = self.finite(dividend);
        let rhs = self.finite(divisor);
        if rhs.significand.is_zero() {
            let value = if lhs.significand.is_zero() {
                self.invalid(signals)
            } else {
                *signals |= Signals::DIVISION_BY_ZERO;
                self.infinity(negative)
            };
            return Some(Operands::Resolved(value));
        }
        Some(Operands::Finite(lhs, rhs))
    }

    pub(super) fn quotient(
        &self,
        dividend: &H::Value,
        divisor: &H::Value,
        ctx: &PrecisionContext,
    ) -> Outcome<H::Value> {
        let mut signals = Signals::empty();
        let negative = self.quotient_sign(dividend, divisor);
        let (lhs, rhs) = match self.division_operands(dividend, divisor, ctx, &mut signals) {
            Some(Operands::Resolved(value)) => return Ok(Signaled::new(value, signals)),
            Some(Operands::Finite(lhs, rhs)) => (lhs, rhs),
            None => {
                // finite / infinity
                let exponent = if ctx.has_exponent_range() {
                    signals |= Signals::CLAMPED;
                    ctx.e_tiny()
                } else {
                    BigInt::zero()
                };
                return Ok(Signaled::new(self.create(BigUint::zero(), exponent, negative), signals));
            }
        };
        let ideal = &lhs.exponent - &rhs.exponent;
        if lhs.significand.is_zero() {
            let value = self.round_finite(
                BigUint::zero(),
                ideal,
                negative,
                ctx,
                Discarded::EXACT,
                &mut signals,
            )?;
            return Ok(Signaled::new(value, signals));
        }
        let value = if ctx.has_max_precision() {
            self.rounded_quotient(lhs, rhs, ideal, negative, ctx, &mut signals)?
        } else {
            self.exact_quotient(lhs, rhs, ideal, negative, ctx, &mut signals)?
        };
        Ok(Signaled::new(value, signals))
    }

    fn quotient_sign(&self, dividend: &H::Value, divisor: &H::Value) -> bool {
        self.helper().flags(dividend).is_negative() != self.helper().flags(divisor).is_negative()
    }

    /// Long division to one digit past the precision, with the remainder
    /// folded into the round/sticky state.
    fn rounded_quotient(
        &self,
        lhs: Finite,
        rhs: Finite,
        ideal: BigInt,
        negative: bool,
        ctx: &PrecisionContext,
        signals: &mut Signals,
    ) -> Fallible<H::Value> {
        let dividend_length = self.digit_length(&lhs.significand);
        let divisor_length = self.digit_length(&rhs.significand);
        let scale = (ctx.precision() + divisor_length + 1).saturating_sub(dividend_length);
        let scaled = self
            .helper()
            .multiply_by_radix_power(&lhs.significand, &BigUint::from(scale));
        let (quotient, remainder) = scaled.div_rem(&rhs.significand);
        let exponent = &ideal - BigInt::from(scale);
        let discarded =
            Discarded::of_remainder(&remainder, &rhs.significand, self.helper().radix());
        let (quotient, exponent) = if remainder.is_zero() {
            self.strip_trailing_zeros(quotient, exponent, Some(&ideal))
        } else {
            (quotient, exponent)
        };
        self.round_finite(quotient, exponent, negative, ctx, discarded, signals)
    }

    /// Division without a precision limit, defined only when the quotient
    /// terminates in this radix.
    fn exact_quotient(
        &self,
        lhs: Finite,
        rhs: Finite,
        ideal: BigInt,
        negative: bool,
        ctx: &PrecisionContext,
        signals: &mut Signals,
    ) -> Fallible<H::Value> {
        if !self
            .helper()
            .has_terminating_expansion(&lhs.significand, &rhs.significand)
        {
            tracing::debug!("quotient has no terminating expansion at unlimited precision");
            return Ok(self.invalid(signals));
        }
        // enough digits to absorb every prime factor of the reduced denominator
        let reduced = &rhs.significand / lhs.significand.gcd(&rhs.significand);
        let scale = reduced.bits();
        let scaled = self
            .helper()
            .multiply_by_radix_power(&lhs.significand, &BigUint::from(scale));
        let quotient = scaled / &rhs.significand;
        let exponent = &ideal - BigInt::from(scale);
        let (quotient, exponent) = self.strip_trailing_zeros(quotient, exponent, Some(&ideal));
        self.round_finite(quotient, exponent, negative, ctx, Discarded::EXACT, signals)
    }

    pub(super) fn quotient_to_exponent(
        &self,
        dividend: &H::Value,
        divisor: &H::Value,
        exponent: &BigInt,
        ctx: &PrecisionContext,
    ) -> Outcome<H::Value> {
        let mut signals = Signals::empty();
        let negative = self.quotient_sign(dividend, divisor);
        let (lhs, rhs) = match self.division_operands(dividend, divisor, ctx, &mut signals) {
            Some(Operands::Resolved(value)) => return Ok(Signaled::new(value, signals)),
            Some(Operands::Finite(lhs, rhs)) => (lhs, rhs),
            None => {
                let value = self.finish_at_exponent(
                    BigUint::zero(),
                    exponent.clone(),
                    negative,
                    Discarded::EXACT,
                    false,
                    ctx,
                    &mut signals,
                )?;
                return Ok(Signaled::new(value, signals));
            }
        };
        if lhs.significand.is_zero() {
            let value = self.finish_at_exponent(
                BigUint::zero(),
                exponent.clone(),
                negative,
                Discarded::EXACT,
                false,
                ctx,
                &mut signals,
            )?;
            return Ok(Signaled::new(value, signals));
        }
        let spread = self.adjusted_exponent(&lhs) - self.adjusted_exponent(&rhs);
        // the quotient has at least spread - exponent digits
        if ctx.has_max_precision() && &spread - exponent > BigInt::from(ctx.precision()) {
            return Ok(Signaled::new(self.invalid(&mut signals), signals));
        }
        let (quotient, discarded) = if spread < exponent - BigInt::one() {
            // |quotient| < radix^(exponent - 1): nothing but a nonzero tail below half
            (
                BigUint::zero(),
                Discarded {
                    last: 0,
                    older: true,
                },
            )
        } else {
            self.scaled_quotient(lhs, rhs, exponent)
        };
        let value = self.finish_at_exponent(
            quotient,
            exponent.clone(),
            negative,
            discarded,
            false,
            ctx,
            &mut signals,
        )?;
        Ok(Signaled::new(value, signals))
    }

    /// `|lhs| / |rhs|` truncated to a multiple of `radix^exponent`, with the
    /// discard state of the cut-off tail.
    fn scaled_quotient(&self, lhs: Finite, rhs: Finite, exponent: &BigInt) -> (BigUint, Discarded) {
        let shift = &lhs.exponent - &rhs.exponent - exponent;
        let helper = self.helper();
        let (dividend, divisor) = if shift.is_negative() {
            (
                lhs.significand,
                helper.multiply_by_radix_power(&rhs.significand, shift.magnitude()),
            )
        } else {
            (
                helper.multiply_by_radix_power(&lhs.significand, shift.magnitude()),
                rhs.significand,
            )
        };
        let (quotient, remainder) = dividend.div_rem(&divisor);
        let discarded = Discarded::of_remainder(&remainder, &divisor, helper.radix());
        (quotient, discarded)
    }

    /// `trunc(|lhs| / |rhs|)`, or `None` when it needs more digits than the
    /// precision allows.
    fn truncated_quotient(
        &self,
        lhs: &Finite,
        rhs: &Finite,
        ctx: &PrecisionContext,
    ) -> Option<BigUint> {
        if lhs.significand.is_zero() {
            return Some(BigUint::zero());
        }
        let spread = self.adjusted_exponent(lhs) - self.adjusted_exponent(rhs);
        if spread.is_negative() {
            return Some(BigUint::zero());
        }
        if ctx.has_max_precision() && spread > BigInt::from(ctx.precision()) {
            return None;
        }
        let (dividend, divisor) = self.aligned(lhs, rhs);
        let quotient = dividend / divisor;
        if ctx.has_max_precision() && self.digit_length(&quotient) > ctx.precision() {
            return None;
        }
        Some(quotient)
    }

    /// Both significands rescaled to the smaller exponent.
    fn aligned(&self, lhs: &Finite, rhs: &Finite) -> (BigUint, BigUint) {
        let exponent = std::cmp::min(&lhs.exponent, &rhs.exponent);
        (
            self.helper()
                .rescale(&lhs.significand, &lhs.exponent, exponent),
            self.helper()
                .rescale(&rhs.significand, &rhs.exponent, exponent),
        )
    }

    pub(super) fn integer_quotient(
        &self,
        dividend: &H::Value,
        divisor: &H::Value,
        ctx: &PrecisionContext,
        natural_scale: bool,
    ) -> Outcome<H::Value> {
        let mut signals = Signals::empty();
        let negative = self.quotient_sign(dividend, divisor);
        let (lhs, rhs) = match self.division_operands(dividend, divisor, ctx, &mut signals) {
            Some(Operands::Resolved(value)) => return Ok(Signaled::new(value, signals)),
            Some(Operands::Finite(lhs, rhs)) => (lhs, rhs),
            None => {
                return Ok(Signaled::new(
                    self.create(BigUint::zero(), BigInt::zero(), negative),
                    signals,
                ))
            }
        };
        let Some(quotient) = self.truncated_quotient(&lhs, &rhs, ctx) else {
            tracing::debug!("integer quotient exceeds precision");
            return Ok(Signaled::new(self.invalid(&mut signals), signals));
        };
        let (quotient, exponent) = if natural_scale {
            self.toward_ideal_exponent(quotient, &lhs.exponent - &rhs.exponent, ctx)
        } else {
            (quotient, BigInt::zero())
        };
        let value = self.round_finite(
            quotient,
            exponent,
            negative,
            ctx,
            Discarded::EXACT,
            &mut signals,
        )?;
        Ok(Signaled::new(value, signals))
    }

    /// Moves an integer at exponent 0 as close to `ideal` as its digits and
    /// the precision allow, without changing its value.
    fn toward_ideal_exponent(
        &self,
        quotient: BigUint,
        ideal: BigInt,
        ctx: &PrecisionContext,
    ) -> (BigUint, BigInt) {
        if quotient.is_zero() {
            return (quotient, ideal);
        }
        if ideal.is_positive() {
            return self.strip_trailing_zeros(quotient, BigInt::zero(), Some(&ideal));
        }
        if ideal.is_zero() {
            return (quotient, ideal);
        }
        let wanted = ideal.magnitude().clone();
        let room = if ctx.has_max_precision() {
            let spare = ctx.precision().saturating_sub(self.digit_length(&quotient));
            std::cmp::min(wanted, BigUint::from(spare))
        } else {
            wanted
        };
        let padded = self.helper().multiply_by_radix_power(&quotient, &room);
        (padded, -BigInt::from(room))
    }

    pub(super) fn division_remainder(
        &self,
        dividend: &H::Value,
        divisor: &H::Value,
        ctx: &PrecisionContext,
        near: bool,
    ) -> Outcome<H::Value> {
        let mut signals = Signals::empty();
        if let Some(nan) = self.propagate_nan(&[dividend, divisor], ctx, &mut signals) {
            return Ok(Signaled::new(nan, signals));
        }
        let helper = self.helper();
        if helper.flags(dividend).is_infinite() {
            return Ok(Signaled::new(self.invalid(&mut signals), signals));
        }
        if helper.flags(divisor).is_infinite() {
            return self.round_to_precision(dividend, ctx);
        }
        let lhs = self.finite(dividend);
        let rhs = self.finite(divisor);
        if rhs.significand.is_zero() {
            return Ok(Signaled::new(self.invalid(&mut signals), signals));
        }
        let exponent = std::cmp::min(&lhs.exponent, &rhs.exponent).clone();
        if lhs.significand.is_zero() {
            let value = self.round_finite(
                BigUint::zero(),
                exponent,
                lhs.negative,
                ctx,
                Discarded::EXACT,
                &mut signals,
            )?;
            return Ok(Signaled::new(value, signals));
        }
        let spread = self.adjusted_exponent(&lhs) - self.adjusted_exponent(&rhs);
        if spread < BigInt::from(-1) {
            // |dividend| < |divisor| / radix: quotient 0, and never rounds to 1
            let padded = self
                .helper()
                .rescale(&lhs.significand, &lhs.exponent, &exponent);
            let value = self.round_finite(
                padded,
                exponent,
                lhs.negative,
                ctx,
                Discarded::EXACT,
                &mut signals,
            )?;
            return Ok(Signaled::new(value, signals));
        }
        if ctx.has_max_precision() && spread > BigInt::from(ctx.precision()) {
            return Ok(Signaled::new(self.invalid(&mut signals), signals));
        }
        let (dividend_digits, divisor_digits) = self.aligned(&lhs, &rhs);
        let (mut quotient, mut remainder) = dividend_digits.div_rem(&divisor_digits);
        let mut negative = lhs.negative;
        if near {
            let twice: BigUint = &remainder << 1usize;
            if twice > divisor_digits || (twice == divisor_digits && quotient.is_odd()) {
                remainder = &divisor_digits - &remainder;
                quotient += 1u32;
                negative = !negative;
            }
        }
        if ctx.has_max_precision() && self.digit_length(&quotient) > ctx.precision() {
            return Ok(Signaled::new(self.invalid(&mut signals), signals));
        }
        let value = self.round_finite(
            remainder,
            exponent,
            negative,
            ctx,
            Discarded::EXACT,
            &mut signals,
        )?;
        Ok(Signaled::new(value, signals))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use super::*;
    use crate::context::Rounding;
    use crate::test_utils::{dec, dec_neg, decimal_math, precision};
    use crate::ExtendedDecimal;

    fn divide(
        a: &ExtendedDecimal,
        b: &ExtendedDecimal,
        ctx: &PrecisionContext,
    ) -> Signaled<ExtendedDecimal> {
        decimal_math().divide(a, b, ctx).expect("divide")
    }

    #[test]
    fn one_third_rounds_half_even() {
        let result = divide(&dec(1, 0), &dec(3, 0), &precision(5));
        assert_eq!(result.value, dec(33333, -5));
        assert_eq!(result.signals, Signals::INEXACT | Signals::ROUNDED);
    }

    #[test]
    fn two_thirds_rounds_up() {
        let result = divide(&dec(2, 0), &dec(3, 0), &precision(3));
        assert_eq!(result.value, dec(667, -3));
    }

    #[test]
    fn exact_quotient_keeps_ideal_exponent() {
        let result = divide(&dec(100, 0), &dec(4, 0), &precision(9));
        assert_eq!(result.value, dec(25, 0));
        assert!(result.signals.is_empty());

        let result = divide(&dec(1, 0), &dec(8, 0), &precision(9));
        assert_eq!(result.value, dec(125, -3));
        assert!(result.signals.is_empty());
    }

    #[test]
    fn unlimited_division_requires_termination() {
        let ctx = PrecisionContext::unlimited();
        let result = divide(&dec(1, 0), &dec(3, 0), &ctx);
        assert!(result.value.is_nan());
        assert_eq!(result.signals, Signals::INVALID);

        let result = divide(&dec(1, 0), &dec(40, 0), &ctx);
        assert_eq!(result.value, dec(25, -3));
        assert!(result.signals.is_empty());
    }

    #[test]
    fn division_by_zero_and_indeterminate() {
        let ctx = precision(5);
        let result = divide(&dec_neg(5, 0), &dec(0, 0), &ctx);
        assert!(result.value.is_infinite());
        assert!(result.value.is_negative());
        assert_eq!(result.signals, Signals::DIVISION_BY_ZERO);

        let result = divide(&dec(0, 0), &dec(0, 0), &ctx);
        assert!(result.value.is_nan());
        assert_eq!(result.signals, Signals::INVALID);
    }

    #[test]
    fn finite_over_infinity_is_clamped_zero() {
        let ctx = PrecisionContext::decimal64();
        let result = divide(&dec(7, 0), &ExtendedDecimal::infinity(false), &ctx);
        assert!(result.value.is_zero());
        assert_eq!(result.value.exponent(), &ctx.e_tiny());
        assert_eq!(result.signals, Signals::CLAMPED);
    }

    #[test]
    fn divide_to_exponent_rounds_at_target() {
        let ctx = precision(9);
        let result = decimal_math()
            .divide_to_exponent(&dec(2, 0), &dec(3, 0), &BigInt::from(-2), &ctx)
            .expect("divide");
        assert_eq!(result.value, dec(67, -2));
        assert_eq!(result.signals, Signals::INEXACT | Signals::ROUNDED);
    }

    #[test]
    fn divide_to_exponent_rejects_oversized_quotient() {
        let result = decimal_math()
            .divide_to_exponent(&dec(1, 10), &dec(3, 0), &BigInt::zero(), &precision(5))
            .expect("divide");
        assert!(result.value.is_nan());
        assert_eq!(result.signals, Signals::INVALID);
    }

    #[test]
    fn divide_to_exponent_far_below_target() {
        let math = decimal_math();
        let result = math
            .divide_to_exponent(&dec(1, -1_000_000_000), &dec(3, 0), &BigInt::zero(), &precision(9))
            .expect("divide");
        assert_eq!(result.value, dec(0, 0));
        assert_eq!(result.signals, Signals::INEXACT | Signals::ROUNDED);

        let ceiling = PrecisionContext::for_precision_and_rounding(9, Rounding::Ceiling);
        let result = math
            .divide_to_exponent(&dec(1, -1_000_000_000), &dec(3, 0), &BigInt::zero(), &ceiling)
            .expect("divide");
        assert_eq!(result.value, dec(1, 0));

        let result = math
            .divide_to_exponent(&dec(0, -1_000_000_000), &dec(3, 0), &BigInt::zero(), &precision(9))
            .expect("divide");
        assert_eq!(result.value, dec(0, 0));
        assert!(result.signals.is_empty());
    }

    #[test]
    fn integer_division_scales() {
        let ctx = precision(9);
        let math = decimal_math();
        let zero_scale = math
            .divide_to_integer_zero_scale(&dec(25, -1), &dec(2, -1), &ctx)
            .expect("divide");
        assert_eq!(zero_scale.value, dec(12, 0));

        let natural = math
            .divide_to_integer_natural_scale(&dec(1000, 0), &dec(1, -1), &ctx)
            .expect("divide");
        assert_eq!(natural.value, dec(1000, 1));

        let padded = math
            .divide_to_integer_natural_scale(&dec(1000, 0), &dec(1, 1), &ctx)
            .expect("divide");
        assert_eq!(padded.value, dec(1000, -1));

        let small = math
            .divide_to_integer_zero_scale(&dec(1, 0), &dec(3, 0), &ctx)
            .expect("divide");
        assert!(small.value.is_zero());
    }

    #[test]
    fn integer_division_too_large_is_invalid() {
        let result = decimal_math()
            .divide_to_integer_zero_scale(&dec(1, 20), &dec(3, 0), &precision(9))
            .expect("divide");
        assert!(result.value.is_nan());
        assert_eq!(result.signals, Signals::INVALID);
    }

    #[test]
    fn remainder_takes_dividend_sign() {
        let ctx = precision(9);
        let math = decimal_math();
        let result = math.remainder(&dec_neg(7, 0), &dec(3, 0), &ctx).expect("rem");
        assert_eq!(result.value, dec_neg(1, 0));

        let result = math.remainder(&dec(21, -1), &dec(3, 0), &ctx).expect("rem");
        assert_eq!(result.value, dec(21, -1));
    }

    #[test]
    fn remainder_of_small_dividend_uses_smaller_exponent() {
        let ctx = precision(9);
        let math = decimal_math();
        // 1 rem 30.00
        let near = math.remainder(&dec(1, 0), &dec(3000, -2), &ctx).expect("rem");
        assert_eq!(near.value, dec(100, -2));
        // 1 rem 300.000
        let far = math.remainder(&dec(1, 0), &dec(300_000, -3), &ctx).expect("rem");
        assert_eq!(far.value, dec(1000, -3));
        assert!(far.signals.is_empty());

        let result = math
            .remainder_near(&dec_neg(1, 0), &dec(300_000, -3), &ctx)
            .expect("rem");
        assert_eq!(result.value, dec_neg(1000, -3));
    }

    #[test]
    fn remainder_padding_past_precision_rounds() {
        // 1 rem 300.000000000 pads the dividend to ten digits
        let result = decimal_math()
            .remainder(&dec(1, 0), &dec(300_000_000_000, -9), &precision(5))
            .expect("rem");
        assert_eq!(result.value, dec(10000, -4));
        assert_eq!(result.signals, Signals::ROUNDED);
    }

    #[test]
    fn remainder_near_rounds_quotient_half_even() {
        let ctx = precision(9);
        let math = decimal_math();
        let result = math.remainder_near(&dec(10, 0), &dec(6, 0), &ctx).expect("rem");
        assert_eq!(result.value, dec_neg(2, 0));

        let result = math.remainder_near(&dec(10, 0), &dec(3, 0), &ctx).expect("rem");
        assert_eq!(result.value, dec(1, 0));

        // 3 / 2 = 1.5 ties to quotient 2
        let result = math.remainder_near(&dec(3, 0), &dec(2, 0), &ctx).expect("rem");
        assert_eq!(result.value, dec_neg(1, 0));
    }

    #[test]
    fn remainder_special_operands() {
        let ctx = precision(9);
        let math = decimal_math();
        let result = math
            .remainder(&ExtendedDecimal::infinity(false), &dec(3, 0), &ctx)
            .expect("rem");
        assert_eq!(result.signals, Signals::INVALID);

        let result = math.remainder(&dec(3, 0), &dec(0, 0), &ctx).expect("rem");
        assert_eq!(result.signals, Signals::INVALID);

        let result = math
            .remainder(&dec(3, 0), &ExtendedDecimal::infinity(true), &ctx)
            .expect("rem");
        assert_eq!(result.value, dec(3, 0));
    }
}
