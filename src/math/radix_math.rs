//! The radix-generic engine.

use std::cmp::{min, Ordering};

use num_bigint::{BigInt, BigUint};
use num_integer::Integer;
use num_traits::{One, ToPrimitive, Zero};

use crate::context::{PrecisionContext, Rounding};
use crate::error::ArithmeticError;
use crate::shift::ShiftAccumulator;
use crate::signals::{NumberFlags, Signals};

use super::helper::{fit_quiet_nan, RadixHelper};
use super::rounding::{rounding_increments, Discarded};
use super::{Outcome, RadixArithmetic, Signaled};

pub(super) type Fallible<V> = Result<V, ArithmeticError<V>>;

/// A finite operand taken apart.
#[derive(Clone, Debug)]
pub(super) struct Finite {
    pub(super) significand: BigUint,
    pub(super) exponent: BigInt,
    pub(super) negative: bool,
}

/// Arithmetic for any radix, parameterized by a [`RadixHelper`].
#[derive(Clone, Copy, Debug, Default)]
pub struct RadixMath<H> {
    helper: H,
}

impl<H: RadixHelper> RadixMath<H> {
    pub fn new(helper: H) -> Self {
        Self { helper }
    }

    pub(super) fn finite(&self, value: &H::Value) -> Finite {
        Finite {
            significand: self.helper.significand(value).clone(),
            exponent: self.helper.exponent(value).clone(),
            negative: self.helper.flags(value).is_negative(),
        }
    }

    pub(super) fn create(
        &self,
        significand: BigUint,
        exponent: BigInt,
        negative: bool,
    ) -> H::Value {
        self.helper
            .create_value(significand, exponent, NumberFlags::finite(negative))
    }

    pub(super) fn infinity(&self, negative: bool) -> H::Value {
        self.helper.create_value(
            BigUint::zero(),
            BigInt::zero(),
            NumberFlags::INFINITY.with_sign(negative),
        )
    }

    /// Signals Invalid and returns the default quiet NaN.
    pub(super) fn invalid(&self, signals: &mut Signals) -> H::Value {
        *signals |= Signals::INVALID;
        self.helper
            .create_value(BigUint::zero(), BigInt::zero(), NumberFlags::QUIET_NAN)
    }

    pub(super) fn digit_length(&self, significand: &BigUint) -> u64 {
        self.helper.digit_length(significand)
    }

    pub(super) fn adjusted_exponent(&self, value: &Finite) -> BigInt {
        &value.exponent + BigInt::from(self.digit_length(&value.significand) - 1)
    }

    /// The first signaling NaN among `operands` raises Invalid and comes back
    /// quiet; otherwise the first quiet NaN propagates.
    pub(super) fn propagate_nan(
        &self,
        operands: &[&H::Value],
        ctx: &PrecisionContext,
        signals: &mut Signals,
    ) -> Option<H::Value> {
        if let Some(signaling) = operands
            .iter()
            .find(|value| self.helper.flags(value).is_signaling_nan())
        {
            *signals |= Signals::INVALID;
            return Some(fit_quiet_nan(&self.helper, signaling, ctx));
        }
        operands
            .iter()
            .find(|value| self.helper.flags(value).is_quiet_nan())
            .map(|quiet| fit_quiet_nan(&self.helper, quiet, ctx))
    }

    pub(super) fn increments(
        &self,
        rounding: Rounding,
        discarded: Discarded,
        kept: &BigUint,
        negative: bool,
    ) -> bool {
        if discarded.is_exact() {
            return false;
        }
        let radix = self.helper.radix();
        let last_digit = (kept % radix).to_u32().unwrap_or(0);
        rounding_increments(rounding, radix, discarded, last_digit, negative)
    }

    /// Rounds `(-1)^negative * significand * radix^exponent` to the context.
    ///
    /// `prior` carries round/sticky state from an earlier truncation, such as
    /// a division remainder, that lies below the significand's last digit.
    pub(super) fn round_finite(
        &self,
        significand: BigUint,
        exponent: BigInt,
        negative: bool,
        ctx: &PrecisionContext,
        prior: Discarded,
        signals: &mut Signals,
    ) -> Fallible<H::Value> {
        let precision = ctx.precision();
        let was_zero = significand.is_zero() && prior.is_exact();
        let mut accumulator = self.helper.create_shift_accumulator_with(
            significand.clone(),
            prior.last,
            prior.older,
        );
        let length = accumulator.digit_length();
        if prior.is_exact()
            && (precision == 0 || length <= precision)
            && self.in_normal_range(&exponent, length, ctx)
        {
            return Ok(self.create(significand, exponent, negative));
        }

        if precision > 0 {
            accumulator.shift_to_digits(precision);
        }
        let dropped_digits = !accumulator.discarded_count().is_zero();
        let mut rounded_exponent = &exponent + BigInt::from(accumulator.discarded_count().clone());
        let kept_length = accumulator.digit_length();
        let discarded = Discarded::of(&accumulator);
        let mut kept = accumulator.shifted_value();

        if ctx.has_exponent_range() {
            let adjusted = &rounded_exponent + BigInt::from(kept_length - 1);
            if &adjusted > ctx.e_max() {
                if was_zero {
                    return Ok(self.clamp_zero_overflow(negative, ctx, signals));
                }
                return self.overflow(negative, ctx, signals);
            }
            if &adjusted < ctx.e_min() {
                return self.round_subnormal(significand, exponent, negative, ctx, prior, signals);
            }
        }

        let inexact = !discarded.is_exact();
        if inexact && ctx.rounding() == Rounding::Unnecessary {
            return Err(ArithmeticError::RoundingRequired);
        }
        if self.increments(ctx.rounding(), discarded, &kept, negative) {
            kept += 1u32;
            if precision > 0 && self.digit_length(&kept) > precision {
                // kept is now radix^precision; the digit shifted out is zero
                let mut carried = self.helper.create_shift_accumulator(kept);
                carried.shift_right_small(1);
                kept = carried.shifted_value();
                rounded_exponent += 1;
                if ctx.has_exponent_range() {
                    let adjusted = &rounded_exponent + BigInt::from(precision - 1);
                    if &adjusted > ctx.e_max() {
                        return self.overflow(negative, ctx, signals);
                    }
                }
            }
        }
        if inexact {
            *signals |= Signals::INEXACT | Signals::ROUNDED;
        }
        if dropped_digits {
            *signals |= Signals::ROUNDED;
        }
        let (kept, rounded_exponent) = self.clamp_exponent(kept, rounded_exponent, ctx, signals);
        Ok(self.create(kept, rounded_exponent, negative))
    }

    fn in_normal_range(&self, exponent: &BigInt, length: u64, ctx: &PrecisionContext) -> bool {
        if !ctx.has_exponent_range() {
            return true;
        }
        let adjusted = exponent + BigInt::from(length - 1);
        if &adjusted > ctx.e_max() || &adjusted < ctx.e_min() {
            return false;
        }
        !(ctx.clamp_normal_exponents() && ctx.has_max_precision() && exponent > &ctx.e_top())
    }

    /// Lowers an exponent above `e_max + 1 - precision` by padding the
    /// significand with zeros.
    fn clamp_exponent(
        &self,
        significand: BigUint,
        exponent: BigInt,
        ctx: &PrecisionContext,
        signals: &mut Signals,
    ) -> (BigUint, BigInt) {
        if !(ctx.has_exponent_range() && ctx.clamp_normal_exponents() && ctx.has_max_precision())
        {
            return (significand, exponent);
        }
        let top = ctx.e_top();
        if exponent <= top {
            return (significand, exponent);
        }
        *signals |= Signals::CLAMPED;
        let gap = &exponent - &top;
        (
            self.helper.multiply_by_radix_power(&significand, gap.magnitude()),
            top,
        )
    }

    fn clamp_zero_overflow(
        &self,
        negative: bool,
        ctx: &PrecisionContext,
        signals: &mut Signals,
    ) -> H::Value {
        *signals |= Signals::CLAMPED;
        let (significand, exponent) =
            self.clamp_exponent(BigUint::zero(), ctx.e_max().clone(), ctx, signals);
        self.create(significand, exponent, negative)
    }

    fn overflow(
        &self,
        negative: bool,
        ctx: &PrecisionContext,
        signals: &mut Signals,
    ) -> Fallible<H::Value> {
        if ctx.rounding() == Rounding::Unnecessary {
            return Err(ArithmeticError::RoundingRequired);
        }
        *signals |= Signals::OVERFLOW | Signals::INEXACT | Signals::ROUNDED;
        tracing::trace!(negative, rounding = ?ctx.rounding(), "result overflows exponent range");
        if ctx.has_max_precision() && ctx.rounding().overflows_to_finite(negative) {
            return Ok(self.largest_finite(negative, ctx));
        }
        Ok(self.infinity(negative))
    }

    /// `radix^precision - 1` at exponent `e_max + 1 - precision`.
    pub(super) fn largest_finite(&self, negative: bool, ctx: &PrecisionContext) -> H::Value {
        let significand = self.helper.radix_power(ctx.precision()) - 1u32;
        self.create(significand, ctx.e_top(), negative)
    }

    /// Rounds a value whose adjusted exponent is below `e_min`. Digits are cut
    /// at `e_tiny` rather than at the precision, so the truncation restarts
    /// from the unrounded significand.
    fn round_subnormal(
        &self,
        significand: BigUint,
        exponent: BigInt,
        negative: bool,
        ctx: &PrecisionContext,
        prior: Discarded,
        signals: &mut Signals,
    ) -> Fallible<H::Value> {
        let e_tiny = ctx.e_tiny();
        let was_zero = significand.is_zero() && prior.is_exact();
        let mut raised = Signals::empty();
        if !was_zero {
            raised |= Signals::SUBNORMAL;
        }
        let mut accumulator =
            self.helper
                .create_shift_accumulator_with(significand, prior.last, prior.older);
        let shifted = exponent < e_tiny;
        let result_exponent = if shifted {
            let distance = &e_tiny - &exponent;
            accumulator.shift_right(distance.magnitude());
            e_tiny
        } else {
            exponent
        };
        let discarded = Discarded::of(&accumulator);
        let mut kept = accumulator.shifted_value();
        let inexact = !discarded.is_exact();
        if inexact {
            if ctx.rounding() == Rounding::Unnecessary {
                return Err(ArithmeticError::RoundingRequired);
            }
            raised |= Signals::INEXACT | Signals::ROUNDED;
        }
        if shifted && !was_zero {
            raised |= Signals::ROUNDED;
        }
        if self.increments(ctx.rounding(), discarded, &kept, negative) {
            kept += 1u32;
        }
        if kept.is_zero() && (shifted || !was_zero) {
            raised |= Signals::CLAMPED;
        }
        if raised.contains(Signals::SUBNORMAL | Signals::INEXACT) {
            raised |= Signals::UNDERFLOW | Signals::ROUNDED;
        }
        tracing::trace!(?raised, "subnormal result");
        *signals |= raised;
        Ok(self.create(kept, result_exponent, negative))
    }

    /// Strips trailing zero digits, raising the exponent no higher than `limit`.
    pub(super) fn strip_trailing_zeros(
        &self,
        mut significand: BigUint,
        mut exponent: BigInt,
        limit: Option<&BigInt>,
    ) -> (BigUint, BigInt) {
        if significand.is_zero() {
            return (significand, exponent);
        }
        let radix = BigUint::from(self.helper.radix());
        while limit.map_or(true, |limit| &exponent < limit) {
            let (quotient, remainder) = significand.div_rem(&radix);
            if !remainder.is_zero() {
                break;
            }
            significand = quotient;
            exponent += 1;
        }
        (significand, exponent)
    }

    fn round_with_sign(
        &self,
        value: &H::Value,
        negative: bool,
        ctx: &PrecisionContext,
    ) -> Outcome<H::Value> {
        let mut signals = Signals::empty();
        if let Some(nan) = self.propagate_nan(&[value], ctx, &mut signals) {
            return Ok(Signaled::new(nan, signals));
        }
        if self.helper.flags(value).is_infinite() {
            return Ok(Signaled::new(self.infinity(negative), signals));
        }
        let parts = self.finite(value);
        let rounded = self.round_finite(
            parts.significand,
            parts.exponent,
            negative,
            ctx,
            Discarded::EXACT,
            &mut signals,
        )?;
        Ok(Signaled::new(rounded, signals))
    }

    fn add_signed(
        &self,
        lhs: &H::Value,
        rhs: &H::Value,
        negate_rhs: bool,
        ctx: &PrecisionContext,
    ) -> Outcome<H::Value> {
        let mut signals = Signals::empty();
        if let Some(nan) = self.propagate_nan(&[lhs, rhs], ctx, &mut signals) {
            return Ok(Signaled::new(nan, signals));
        }
        let lhs_flags = self.helper.flags(lhs);
        let mut rhs_flags = self.helper.flags(rhs);
        if negate_rhs {
            rhs_flags = rhs_flags.negated();
        }
        if lhs_flags.is_infinite() || rhs_flags.is_infinite() {
            let value = if lhs_flags.is_infinite()
                && rhs_flags.is_infinite()
                && lhs_flags.is_negative() != rhs_flags.is_negative()
            {
                self.invalid(&mut signals)
            } else if lhs_flags.is_infinite() {
                self.infinity(lhs_flags.is_negative())
            } else {
                self.infinity(rhs_flags.is_negative())
            };
            return Ok(Signaled::new(value, signals));
        }
        let mut right = self.finite(rhs);
        right.negative = rhs_flags.is_negative();
        let sum = self.add_finite(self.finite(lhs), right, ctx, &mut signals)?;
        Ok(Signaled::new(sum, signals))
    }

    pub(super) fn add_finite(
        &self,
        lhs: Finite,
        rhs: Finite,
        ctx: &PrecisionContext,
        signals: &mut Signals,
    ) -> Fallible<H::Value> {
        let (lhs, rhs) = self.condense_far_operand(lhs, rhs, ctx);
        let exponent = min(&lhs.exponent, &rhs.exponent).clone();
        let left = self
            .helper
            .rescale(&lhs.significand, &lhs.exponent, &exponent);
        let right = self
            .helper
            .rescale(&rhs.significand, &rhs.exponent, &exponent);
        let (significand, negative) = if lhs.negative == rhs.negative {
            (left + right, lhs.negative)
        } else {
            match left.cmp(&right) {
                Ordering::Greater => (left - right, lhs.negative),
                Ordering::Less => (right - left, rhs.negative),
                Ordering::Equal => (BigUint::zero(), ctx.rounding() == Rounding::Floor),
            }
        };
        self.round_finite(
            significand,
            exponent,
            negative,
            ctx,
            Discarded::EXACT,
            signals,
        )
    }

    /// With limited precision, an operand lying entirely below the last digit
    /// the sum could keep only contributes to the sticky bit. It is replaced
    /// by a single unit just under that position, which rounds identically
    /// and avoids rescaling across a huge exponent gap.
    fn condense_far_operand(
        &self,
        lhs: Finite,
        rhs: Finite,
        ctx: &PrecisionContext,
    ) -> (Finite, Finite) {
        if !ctx.has_max_precision() || lhs.significand.is_zero() || rhs.significand.is_zero() {
            return (lhs, rhs);
        }
        let lhs_is_big = lhs.exponent >= rhs.exponent;
        let (big, small) = if lhs_is_big { (&lhs, &rhs) } else { (&rhs, &lhs) };
        let bound = min(
            &big.exponent - 1,
            self.adjusted_exponent(big) - BigInt::from(ctx.precision()) - 2,
        );
        if self.adjusted_exponent(small) >= bound {
            return (lhs, rhs);
        }
        let stand_in = Finite {
            significand: BigUint::one(),
            exponent: bound,
            negative: small.negative,
        };
        if lhs_is_big {
            (lhs, stand_in)
        } else {
            (stand_in, rhs)
        }
    }

    fn product(
        &self,
        lhs: &H::Value,
        rhs: &H::Value,
        ctx: &PrecisionContext,
    ) -> Outcome<H::Value> {
        let mut signals = Signals::empty();
        if let Some(nan) = self.propagate_nan(&[lhs, rhs], ctx, &mut signals) {
            return Ok(Signaled::new(nan, signals));
        }
        let lhs_flags = self.helper.flags(lhs);
        let rhs_flags = self.helper.flags(rhs);
        let negative = lhs_flags.is_negative() != rhs_flags.is_negative();
        if lhs_flags.is_infinite() || rhs_flags.is_infinite() {
            let finite_zero = |value: &H::Value, flags: NumberFlags| {
                !flags.is_infinite() && self.helper.significand(value).is_zero()
            };
            let value = if finite_zero(lhs, lhs_flags) || finite_zero(rhs, rhs_flags) {
                self.invalid(&mut signals)
            } else {
                self.infinity(negative)
            };
            return Ok(Signaled::new(value, signals));
        }
        let left = self.finite(lhs);
        let right = self.finite(rhs);
        let value = self.round_finite(
            left.significand * right.significand,
            left.exponent + right.exponent,
            negative,
            ctx,
            Discarded::EXACT,
            &mut signals,
        )?;
        Ok(Signaled::new(value, signals))
    }

    pub(super) fn compare_values(&self, lhs: &H::Value, rhs: &H::Value) -> Ordering {
        let lhs_flags = self.helper.flags(lhs);
        let rhs_flags = self.helper.flags(rhs);
        match (lhs_flags.is_nan(), rhs_flags.is_nan()) {
            (true, true) => return Ordering::Equal,
            (true, false) => return Ordering::Greater,
            (false, true) => return Ordering::Less,
            (false, false) => {}
        }
        if lhs_flags.is_infinite() || rhs_flags.is_infinite() {
            let rank = |flags: NumberFlags| match (flags.is_infinite(), flags.is_negative()) {
                (false, _) => 0,
                (true, true) => -1,
                (true, false) => 1,
            };
            return rank(lhs_flags).cmp(&rank(rhs_flags));
        }
        self.compare_finite(&self.finite(lhs), &self.finite(rhs))
    }

    fn compare_finite(&self, lhs: &Finite, rhs: &Finite) -> Ordering {
        let sign = |value: &Finite| {
            if value.significand.is_zero() {
                0
            } else if value.negative {
                -1
            } else {
                1
            }
        };
        let (lhs_sign, rhs_sign) = (sign(lhs), sign(rhs));
        if lhs_sign != rhs_sign || lhs_sign == 0 {
            return lhs_sign.cmp(&rhs_sign);
        }
        let magnitude = self.compare_magnitudes(lhs, rhs);
        if lhs_sign < 0 {
            magnitude.reverse()
        } else {
            magnitude
        }
    }

    /// Compares absolute values, rescaling only when the exponents and
    /// adjusted exponents leave the order undecided.
    pub(super) fn compare_magnitudes(&self, lhs: &Finite, rhs: &Finite) -> Ordering {
        match (lhs.significand.is_zero(), rhs.significand.is_zero()) {
            (true, true) => return Ordering::Equal,
            (true, false) => return Ordering::Less,
            (false, true) => return Ordering::Greater,
            (false, false) => {}
        }
        if lhs.exponent == rhs.exponent {
            return lhs.significand.cmp(&rhs.significand);
        }
        let by_adjusted = self
            .adjusted_exponent(lhs)
            .cmp(&self.adjusted_exponent(rhs));
        if by_adjusted != Ordering::Equal {
            return by_adjusted;
        }
        if lhs.exponent > rhs.exponent {
            self.helper
                .rescale(&lhs.significand, &lhs.exponent, &rhs.exponent)
                .cmp(&rhs.significand)
        } else {
            lhs.significand.cmp(
                &self
                    .helper
                    .rescale(&rhs.significand, &rhs.exponent, &lhs.exponent),
            )
        }
    }

    fn compare_abs(&self, lhs: &H::Value, rhs: &H::Value) -> Ordering {
        let lhs_infinite = self.helper.flags(lhs).is_infinite();
        let rhs_infinite = self.helper.flags(rhs).is_infinite();
        match (lhs_infinite, rhs_infinite) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => self.compare_magnitudes(&self.finite(lhs), &self.finite(rhs)),
        }
    }

    /// Orders two numerically equal values: positive above negative, then
    /// for positives the larger exponent above, for negatives the smaller.
    fn tie_break(&self, lhs: &H::Value, rhs: &H::Value) -> Ordering {
        let lhs_negative = self.helper.flags(lhs).is_negative();
        let rhs_negative = self.helper.flags(rhs).is_negative();
        if lhs_negative != rhs_negative {
            return if lhs_negative {
                Ordering::Less
            } else {
                Ordering::Greater
            };
        }
        let by_exponent = self.helper.exponent(lhs).cmp(self.helper.exponent(rhs));
        if lhs_negative {
            by_exponent.reverse()
        } else {
            by_exponent
        }
    }

    fn select_extreme(
        &self,
        lhs: &H::Value,
        rhs: &H::Value,
        ctx: &PrecisionContext,
        want_max: bool,
        by_magnitude: bool,
    ) -> Outcome<H::Value> {
        let lhs_flags = self.helper.flags(lhs);
        let rhs_flags = self.helper.flags(rhs);
        if lhs_flags.is_signaling_nan() || rhs_flags.is_signaling_nan() {
            let mut signals = Signals::empty();
            if let Some(nan) = self.propagate_nan(&[lhs, rhs], ctx, &mut signals) {
                return Ok(Signaled::new(nan, signals));
            }
        }
        match (lhs_flags.is_quiet_nan(), rhs_flags.is_quiet_nan()) {
            (true, true) => return Ok(Signaled::exact(fit_quiet_nan(&self.helper, lhs, ctx))),
            (true, false) => return self.round_to_precision(rhs, ctx),
            (false, true) => return self.round_to_precision(lhs, ctx),
            (false, false) => {}
        }
        let mut ordering = if by_magnitude {
            self.compare_abs(lhs, rhs)
        } else {
            Ordering::Equal
        };
        if ordering == Ordering::Equal {
            ordering = self.compare_values(lhs, rhs);
        }
        if ordering == Ordering::Equal {
            ordering = self.tie_break(lhs, rhs);
        }
        let lhs_wins = (ordering == Ordering::Greater) == want_max;
        self.round_to_precision(if lhs_wins { lhs } else { rhs }, ctx)
    }

    fn next_value(
        &self,
        value: &H::Value,
        ctx: &PrecisionContext,
        upward: bool,
    ) -> Outcome<H::Value> {
        let mut signals = Signals::empty();
        if let Some(nan) = self.propagate_nan(&[value], ctx, &mut signals) {
            return Ok(Signaled::new(nan, signals));
        }
        if !ctx.has_max_precision() || !ctx.has_exponent_range() {
            return Ok(Signaled::new(self.invalid(&mut signals), signals));
        }
        let flags = self.helper.flags(value);
        if flags.is_infinite() {
            let result = if flags.is_negative() == upward {
                self.largest_finite(flags.is_negative(), ctx)
            } else {
                value.clone()
            };
            return Ok(Signaled::new(result, signals));
        }
        let parts = self.finite(value);
        // one unit below both the smallest subnormal and the value's own last digit
        let floor = min(
            ctx.e_tiny(),
            self.adjusted_exponent(&parts) - BigInt::from(ctx.precision()),
        );
        let epsilon = Finite {
            significand: BigUint::one(),
            exponent: floor - 1,
            negative: !upward,
        };
        let directed = ctx.without_traps_and_flags().with_rounding(if upward {
            Rounding::Ceiling
        } else {
            Rounding::Floor
        });
        let mut ignored = Signals::empty();
        let result = self.add_finite(parts, epsilon, &directed, &mut ignored)?;
        Ok(Signaled::new(result, signals))
    }

    fn next_toward_value(
        &self,
        value: &H::Value,
        target: &H::Value,
        ctx: &PrecisionContext,
    ) -> Outcome<H::Value> {
        let mut signals = Signals::empty();
        if let Some(nan) = self.propagate_nan(&[value, target], ctx, &mut signals) {
            return Ok(Signaled::new(nan, signals));
        }
        if !ctx.has_max_precision() || !ctx.has_exponent_range() {
            return Ok(Signaled::new(self.invalid(&mut signals), signals));
        }
        let stepped = match self.compare_values(value, target) {
            Ordering::Equal => {
                let flags = self
                    .helper
                    .flags(value)
                    .with_sign(self.helper.flags(target).is_negative());
                let copy = self.helper.create_value(
                    self.helper.significand(value).clone(),
                    self.helper.exponent(value).clone(),
                    flags,
                );
                return Ok(Signaled::new(copy, signals));
            }
            Ordering::Less => self.next_value(value, ctx, true)?.value,
            Ordering::Greater => self.next_value(value, ctx, false)?.value,
        };
        let flags = self.helper.flags(&stepped);
        if flags.is_infinite() {
            signals |= Signals::OVERFLOW | Signals::INEXACT | Signals::ROUNDED;
        } else {
            let parts = self.finite(&stepped);
            if parts.significand.is_zero() {
                signals |= Signals::SUBNORMAL
                    | Signals::UNDERFLOW
                    | Signals::INEXACT
                    | Signals::ROUNDED
                    | Signals::CLAMPED;
            } else if &self.adjusted_exponent(&parts) < ctx.e_min() {
                signals |=
                    Signals::SUBNORMAL | Signals::UNDERFLOW | Signals::INEXACT | Signals::ROUNDED;
            }
        }
        Ok(Signaled::new(stepped, signals))
    }

    fn multiply_then_add(
        &self,
        lhs: &H::Value,
        rhs: &H::Value,
        addend: &H::Value,
        ctx: &PrecisionContext,
    ) -> Outcome<H::Value> {
        let mut signals = Signals::empty();
        if let Some(nan) = self.propagate_nan(&[lhs, rhs, addend], ctx, &mut signals) {
            return Ok(Signaled::new(nan, signals));
        }
        let product = self.product(lhs, rhs, &PrecisionContext::unlimited())?;
        signals |= product.signals;
        if self.helper.flags(&product.value).is_nan() {
            return Ok(Signaled::new(product.value, signals));
        }
        let sum = self.add(&product.value, addend, ctx)?;
        Ok(Signaled::new(sum.value, signals | sum.signals))
    }

    fn comparison_value(
        &self,
        lhs: &H::Value,
        rhs: &H::Value,
        ctx: &PrecisionContext,
    ) -> Outcome<H::Value> {
        let mut signals = Signals::empty();
        if let Some(nan) = self.propagate_nan(&[lhs, rhs], ctx, &mut signals) {
            return Ok(Signaled::new(nan, signals));
        }
        let value = match self.compare_values(lhs, rhs) {
            Ordering::Less => -1,
            Ordering::Equal => 0,
            Ordering::Greater => 1,
        };
        Ok(Signaled::new(self.helper.value_of(value), signals))
    }
}

impl<H: RadixHelper> RadixArithmetic for RadixMath<H> {
    type Value = H::Value;
    type Helper = H;

    fn helper(&self) -> &H {
        &self.helper
    }

    fn round_to_precision(&self, value: &H::Value, ctx: &PrecisionContext) -> Outcome<H::Value> {
        self.round_with_sign(value, self.helper.flags(value).is_negative(), ctx)
    }

    fn plus(&self, value: &H::Value, ctx: &PrecisionContext) -> Outcome<H::Value> {
        let flags = self.helper.flags(value);
        let negative_zero = flags.is_finite()
            && flags.is_negative()
            && self.helper.significand(value).is_zero();
        let negative = if negative_zero {
            ctx.rounding() == Rounding::Floor
        } else {
            flags.is_negative()
        };
        self.round_with_sign(value, negative, ctx)
    }

    fn abs(&self, value: &H::Value, ctx: &PrecisionContext) -> Outcome<H::Value> {
        self.round_with_sign(value, false, ctx)
    }

    fn negate(&self, value: &H::Value, ctx: &PrecisionContext) -> Outcome<H::Value> {
        self.round_with_sign(value, !self.helper.flags(value).is_negative(), ctx)
    }

    fn add(&self, lhs: &H::Value, rhs: &H::Value, ctx: &PrecisionContext) -> Outcome<H::Value> {
        self.add_signed(lhs, rhs, false, ctx)
    }

    fn subtract(
        &self,
        lhs: &H::Value,
        rhs: &H::Value,
        ctx: &PrecisionContext,
    ) -> Outcome<H::Value> {
        self.add_signed(lhs, rhs, true, ctx)
    }

    fn multiply(
        &self,
        lhs: &H::Value,
        rhs: &H::Value,
        ctx: &PrecisionContext,
    ) -> Outcome<H::Value> {
        self.product(lhs, rhs, ctx)
    }

    fn multiply_and_add(
        &self,
        lhs: &H::Value,
        rhs: &H::Value,
        addend: &H::Value,
        ctx: &PrecisionContext,
    ) -> Outcome<H::Value> {
        self.multiply_then_add(lhs, rhs, addend, ctx)
    }

    fn divide(
        &self,
        dividend: &H::Value,
        divisor: &H::Value,
        ctx: &PrecisionContext,
    ) -> Outcome<H::Value> {
        self.quotient(dividend, divisor, ctx)
    }

    fn divide_to_exponent(
        &self,
        dividend: &H::Value,
        divisor: &H::Value,
        exponent: &BigInt,
        ctx: &PrecisionContext,
    ) -> Outcome<H::Value> {
        self.quotient_to_exponent(dividend, divisor, exponent, ctx)
    }

    fn divide_to_integer_natural_scale(
        &self,
        dividend: &H::Value,
        divisor: &H::Value,
        ctx: &PrecisionContext,
    ) -> Outcome<H::Value> {
        self.integer_quotient(dividend, divisor, ctx, true)
    }

    fn divide_to_integer_zero_scale(
        &self,
        dividend: &H::Value,
        divisor: &H::Value,
        ctx: &PrecisionContext,
    ) -> Outcome<H::Value> {
        self.integer_quotient(dividend, divisor, ctx, false)
    }

    fn remainder(
        &self,
        dividend: &H::Value,
        divisor: &H::Value,
        ctx: &PrecisionContext,
    ) -> Outcome<H::Value> {
        self.division_remainder(dividend, divisor, ctx, false)
    }

    fn remainder_near(
        &self,
        dividend: &H::Value,
        divisor: &H::Value,
        ctx: &PrecisionContext,
    ) -> Outcome<H::Value> {
        self.division_remainder(dividend, divisor, ctx, true)
    }

    fn reduce(&self, value: &H::Value, ctx: &PrecisionContext) -> Outcome<H::Value> {
        self.reduced(value, ctx)
    }

    fn quantize(
        &self,
        value: &H::Value,
        exponent_source: &H::Value,
        ctx: &PrecisionContext,
    ) -> Outcome<H::Value> {
        self.quantized(value, exponent_source, ctx)
    }

    fn round_to_exponent_exact(
        &self,
        value: &H::Value,
        exponent: &BigInt,
        ctx: &PrecisionContext,
    ) -> Outcome<H::Value> {
        self.rounded_to_exponent_exact(value, exponent, ctx)
    }

    fn round_to_exponent_simple(
        &self,
        value: &H::Value,
        exponent: &BigInt,
        ctx: &PrecisionContext,
    ) -> Outcome<H::Value> {
        self.rounded_to_exponent(value, exponent, ctx)
    }

    fn round_to_exponent_no_rounded_flag(
        &self,
        value: &H::Value,
        exponent: &BigInt,
        ctx: &PrecisionContext,
    ) -> Outcome<H::Value> {
        let mut rounded = self.rounded_to_exponent(value, exponent, ctx)?;
        rounded.signals.remove(Signals::ROUNDED);
        Ok(rounded)
    }

    fn next_plus(&self, value: &H::Value, ctx: &PrecisionContext) -> Outcome<H::Value> {
        self.next_value(value, ctx, true)
    }

    fn next_minus(&self, value: &H::Value, ctx: &PrecisionContext) -> Outcome<H::Value> {
        self.next_value(value, ctx, false)
    }

    fn next_toward(
        &self,
        value: &H::Value,
        target: &H::Value,
        ctx: &PrecisionContext,
    ) -> Outcome<H::Value> {
        self.next_toward_value(value, target, ctx)
    }

    fn min(&self, lhs: &H::Value, rhs: &H::Value, ctx: &PrecisionContext) -> Outcome<H::Value> {
        self.select_extreme(lhs, rhs, ctx, false, false)
    }

    fn max(&self, lhs: &H::Value, rhs: &H::Value, ctx: &PrecisionContext) -> Outcome<H::Value> {
        self.select_extreme(lhs, rhs, ctx, true, false)
    }

    fn min_magnitude(
        &self,
        lhs: &H::Value,
        rhs: &H::Value,
        ctx: &PrecisionContext,
    ) -> Outcome<H::Value> {
        self.select_extreme(lhs, rhs, ctx, false, true)
    }

    fn max_magnitude(
        &self,
        lhs: &H::Value,
        rhs: &H::Value,
        ctx: &PrecisionContext,
    ) -> Outcome<H::Value> {
        self.select_extreme(lhs, rhs, ctx, true, true)
    }

    fn compare_to(&self, lhs: &H::Value, rhs: &H::Value) -> Ordering {
        self.compare_values(lhs, rhs)
    }

    fn compare_to_with_context(
        &self,
        lhs: &H::Value,
        rhs: &H::Value,
        ctx: &PrecisionContext,
    ) -> Outcome<H::Value> {
        self.comparison_value(lhs, rhs, ctx)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use super::*;
    use crate::test_utils::{binary_math, dec, decimal_math, flt, precision};

    fn parts(significand: u64, exponent: i64) -> Finite {
        Finite {
            significand: BigUint::from(significand),
            exponent: BigInt::from(exponent),
            negative: false,
        }
    }

    #[test]
    fn strip_trailing_zeros_respects_limit() {
        let math = decimal_math();
        let (significand, exponent) =
            math.strip_trailing_zeros(BigUint::from(12_000u32), BigInt::from(-5), None);
        assert_eq!((significand, exponent), (BigUint::from(12u32), BigInt::from(-2)));

        let limit = BigInt::from(-4);
        let (significand, exponent) =
            math.strip_trailing_zeros(BigUint::from(12_000u32), BigInt::from(-5), Some(&limit));
        assert_eq!((significand, exponent), (BigUint::from(1_200u32), BigInt::from(-4)));

        let (significand, exponent) =
            binary_math().strip_trailing_zeros(BigUint::from(40u32), BigInt::zero(), None);
        assert_eq!((significand, exponent), (BigUint::from(5u32), BigInt::from(3)));
    }

    #[test]
    fn far_operand_becomes_sticky_unit() {
        let math = decimal_math();
        let (big, small) = math.condense_far_operand(parts(1, 0), parts(7, -50), &precision(5));
        assert_eq!(big.exponent, BigInt::zero());
        assert_eq!(small.significand, BigUint::one());
        assert_eq!(small.exponent, BigInt::from(-7));

        // within reach of the precision window: untouched
        let (_, near) = math.condense_far_operand(parts(1, 0), parts(7, -3), &precision(5));
        assert_eq!(near.significand, BigUint::from(7u32));
        assert_eq!(near.exponent, BigInt::from(-3));
    }

    #[test]
    fn magnitude_order_across_exponents() {
        let math = decimal_math();
        assert_eq!(math.compare_magnitudes(&parts(10, 0), &parts(1, 1)), Ordering::Equal);
        assert_eq!(math.compare_magnitudes(&parts(11, 0), &parts(1, 1)), Ordering::Greater);
        assert_eq!(math.compare_magnitudes(&parts(9, 1), &parts(100, 0)), Ordering::Less);
        assert_eq!(math.compare_magnitudes(&parts(0, 9), &parts(1, -9)), Ordering::Less);
    }

    #[test]
    fn largest_finite_fills_precision() {
        let ctx = PrecisionContext::decimal32();
        assert_eq!(decimal_math().largest_finite(false, &ctx), dec(9_999_999, 90));
        let ctx = PrecisionContext::binary16();
        // (2^11 - 1) * 2^(15 + 1 - 11)
        assert_eq!(binary_math().largest_finite(false, &ctx), flt(2_047, 5));
    }

    #[test]
    fn half_down_and_zero_five_up() {
        let math = decimal_math();
        let half_down = PrecisionContext::for_precision_and_rounding(2, Rounding::HalfDown);
        let result = math.round_to_precision(&dec(125, 0), &half_down).expect("round");
        assert_eq!(result.value, dec(12, 1));
        let result = math.round_to_precision(&dec(1251, -1), &half_down).expect("round");
        assert_eq!(result.value, dec(13, 1));

        let zero_five_up = PrecisionContext::for_precision_and_rounding(2, Rounding::ZeroFiveUp);
        let result = math.round_to_precision(&dec(101, 0), &zero_five_up).expect("round");
        assert_eq!(result.value, dec(11, 1));
        let result = math.round_to_precision(&dec(151, 0), &zero_five_up).expect("round");
        assert_eq!(result.value, dec(16, 1));
        let result = math.round_to_precision(&dec(129, 0), &zero_five_up).expect("round");
        assert_eq!(result.value, dec(12, 1));
    }

    #[test]
    fn abs_and_negate_round() {
        let math = decimal_math();
        let result = math.negate(&dec(12_345, 0), &precision(3)).expect("negate");
        assert!(result.value.is_negative());
        assert_eq!(result.value.significand(), &BigUint::from(123u32));
        let result = math.abs(&result.value, &precision(3)).expect("abs");
        assert_eq!(result.value, dec(123, 2));
    }
}
