//! Concrete extended numbers.
//!
//! [`ExtendedNumber`] is plain data: a non-negative significand, an exponent
//! and [`NumberFlags`]. The type parameter is the [`RadixHelper`] that gives
//! the number its radix, so [`ExtendedDecimal`] and [`ExtendedFloat`] share
//! one representation and one set of context-aware operations.
//!
//! Every operation taking a `&mut PrecisionContext` runs the trap-aware
//! engine and records the raised signals into that context.

mod decimal;
mod display;
mod float;

use std::cmp::Ordering;
use std::marker::PhantomData;

use num_bigint::{BigInt, BigUint, Sign};
use num_traits::Zero;

use crate::context::PrecisionContext;
use crate::error::ArithmeticError;
use crate::math::{
    settle, ExtendedOrSimpleRadixMath, Outcome, RadixArithmetic, RadixHelper, TrappableRadixMath,
};
use crate::signals::{Kind, NumberFlags};

pub use decimal::{DecimalHelper, ExtendedDecimal};
pub use float::{BinaryHelper, ExtendedFloat};

/// `(-1)^negative * significand * radix^exponent`, or a special value.
///
/// Equality is representational: `1.0` and `1.00` differ, as do `0` and
/// `-0`. Use [`ExtendedNumber::compare_to`] for numeric order.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ExtendedNumber<H> {
    significand: BigUint,
    exponent: BigInt,
    flags: NumberFlags,
    radix: PhantomData<H>,
}

type Math<H> = TrappableRadixMath<ExtendedOrSimpleRadixMath<H>>;

impl<H> ExtendedNumber<H> {
    pub fn from_parts(significand: BigUint, exponent: BigInt, flags: NumberFlags) -> Self {
        Self {
            significand,
            exponent,
            flags,
            radix: PhantomData,
        }
    }

    /// Finite value `mantissa * radix^exponent`.
    pub fn new(mantissa: BigInt, exponent: BigInt) -> Self {
        let (sign, significand) = mantissa.into_parts();
        Self::from_parts(significand, exponent, NumberFlags::finite(sign == Sign::Minus))
    }

    pub fn from_i64(value: i64) -> Self {
        Self::new(BigInt::from(value), BigInt::zero())
    }

    pub fn zero() -> Self {
        Self::from_parts(BigUint::zero(), BigInt::zero(), NumberFlags::empty())
    }

    pub fn negative_zero() -> Self {
        Self::from_parts(BigUint::zero(), BigInt::zero(), NumberFlags::NEGATIVE)
    }

    pub fn infinity(negative: bool) -> Self {
        Self::from_parts(
            BigUint::zero(),
            BigInt::zero(),
            NumberFlags::INFINITY.with_sign(negative),
        )
    }

    pub fn nan() -> Self {
        Self::from_parts(BigUint::zero(), BigInt::zero(), NumberFlags::QUIET_NAN)
    }

    pub fn signaling_nan() -> Self {
        Self::from_parts(BigUint::zero(), BigInt::zero(), NumberFlags::SIGNALING_NAN)
    }

    /// NaN carrying `payload` as diagnostic information.
    pub fn nan_with_payload(payload: BigUint, signaling: bool) -> Self {
        let flags = if signaling {
            NumberFlags::SIGNALING_NAN
        } else {
            NumberFlags::QUIET_NAN
        };
        Self::from_parts(payload, BigInt::zero(), flags)
    }

    pub fn significand(&self) -> &BigUint {
        &self.significand
    }

    pub fn exponent(&self) -> &BigInt {
        &self.exponent
    }

    pub fn flags(&self) -> NumberFlags {
        self.flags
    }

    pub fn kind(&self) -> Kind {
        Kind::from(self.flags)
    }

    /// The signed significand.
    pub fn mantissa(&self) -> BigInt {
        let sign = if self.flags.is_negative() {
            Sign::Minus
        } else {
            Sign::Plus
        };
        BigInt::from_biguint(sign, self.significand.clone())
    }

    pub fn is_negative(&self) -> bool {
        self.flags.is_negative()
    }

    pub fn is_finite(&self) -> bool {
        self.flags.is_finite()
    }

    pub fn is_infinite(&self) -> bool {
        self.flags.is_infinite()
    }

    pub fn is_nan(&self) -> bool {
        self.flags.is_nan()
    }

    pub fn is_quiet_nan(&self) -> bool {
        self.flags.is_quiet_nan()
    }

    pub fn is_signaling_nan(&self) -> bool {
        self.flags.is_signaling_nan()
    }

    /// True for finite zeros of either sign and any exponent.
    pub fn is_zero(&self) -> bool {
        self.flags.is_finite() && self.significand.is_zero()
    }

    /// Same digits with the sign flipped; never rounds.
    pub fn negated(&self) -> Self {
        Self::from_parts(
            self.significand.clone(),
            self.exponent.clone(),
            self.flags.negated(),
        )
    }
}

impl<H> From<i64> for ExtendedNumber<H> {
    fn from(value: i64) -> Self {
        Self::from_i64(value)
    }
}

impl<H> From<BigInt> for ExtendedNumber<H> {
    fn from(value: BigInt) -> Self {
        Self::new(value, BigInt::zero())
    }
}

impl<H> ExtendedNumber<H>
where
    H: RadixHelper<Value = ExtendedNumber<H>> + Clone + Default,
{
    fn settled<F>(ctx: &mut PrecisionContext, operation: F) -> Result<Self, ArithmeticError<Self>>
    where
        F: FnOnce(&Math<H>, &PrecisionContext) -> Outcome<Self>,
    {
        let math = Math::new(ExtendedOrSimpleRadixMath::new(H::default()));
        let outcome = operation(&math, ctx);
        settle(outcome, ctx)
    }

    /// This value rounded to the context.
    pub fn round_to_precision(
        &self,
        ctx: &mut PrecisionContext,
    ) -> Result<Self, ArithmeticError<Self>> {
        Self::settled(ctx, |math, scoped| math.round_to_precision(self, scoped))
    }

    pub fn plus(&self, ctx: &mut PrecisionContext) -> Result<Self, ArithmeticError<Self>> {
        Self::settled(ctx, |math, scoped| math.plus(self, scoped))
    }

    pub fn abs(&self, ctx: &mut PrecisionContext) -> Result<Self, ArithmeticError<Self>> {
        Self::settled(ctx, |math, scoped| math.abs(self, scoped))
    }

    pub fn negate(&self, ctx: &mut PrecisionContext) -> Result<Self, ArithmeticError<Self>> {
        Self::settled(ctx, |math, scoped| math.negate(self, scoped))
    }

    pub fn add(
        &self,
        other: &Self,
        ctx: &mut PrecisionContext,
    ) -> Result<Self, ArithmeticError<Self>> {
        Self::settled(ctx, |math, scoped| math.add(self, other, scoped))
    }

    pub fn subtract(
        &self,
        other: &Self,
        ctx: &mut PrecisionContext,
    ) -> Result<Self, ArithmeticError<Self>> {
        Self::settled(ctx, |math, scoped| math.subtract(self, other, scoped))
    }

    pub fn multiply(
        &self,
        other: &Self,
        ctx: &mut PrecisionContext,
    ) -> Result<Self, ArithmeticError<Self>> {
        Self::settled(ctx, |math, scoped| math.multiply(self, other, scoped))
    }

    /// `self * multiplicand + addend`, rounded once.
    pub fn multiply_and_add(
        &self,
        multiplicand: &Self,
        addend: &Self,
        ctx: &mut PrecisionContext,
    ) -> Result<Self, ArithmeticError<Self>> {
        Self::settled(ctx, |math, scoped| {
            math.multiply_and_add(self, multiplicand, addend, scoped)
        })
    }

    pub fn divide(
        &self,
        divisor: &Self,
        ctx: &mut PrecisionContext,
    ) -> Result<Self, ArithmeticError<Self>> {
        Self::settled(ctx, |math, scoped| math.divide(self, divisor, scoped))
    }

    pub fn divide_to_exponent(
        &self,
        divisor: &Self,
        exponent: &BigInt,
        ctx: &mut PrecisionContext,
    ) -> Result<Self, ArithmeticError<Self>> {
        Self::settled(ctx, |math, scoped| {
            math.divide_to_exponent(self, divisor, exponent, scoped)
        })
    }

    pub fn divide_to_integer_natural_scale(
        &self,
        divisor: &Self,
        ctx: &mut PrecisionContext,
    ) -> Result<Self, ArithmeticError<Self>> {
        Self::settled(ctx, |math, scoped| {
            math.divide_to_integer_natural_scale(self, divisor, scoped)
        })
    }

    pub fn divide_to_integer_zero_scale(
        &self,
        divisor: &Self,
        ctx: &mut PrecisionContext,
    ) -> Result<Self, ArithmeticError<Self>> {
        Self::settled(ctx, |math, scoped| {
            math.divide_to_integer_zero_scale(self, divisor, scoped)
        })
    }

    pub fn remainder(
        &self,
        divisor: &Self,
        ctx: &mut PrecisionContext,
    ) -> Result<Self, ArithmeticError<Self>> {
        Self::settled(ctx, |math, scoped| math.remainder(self, divisor, scoped))
    }

    pub fn remainder_near(
        &self,
        divisor: &Self,
        ctx: &mut PrecisionContext,
    ) -> Result<Self, ArithmeticError<Self>> {
        Self::settled(ctx, |math, scoped| math.remainder_near(self, divisor, scoped))
    }

    pub fn reduce(&self, ctx: &mut PrecisionContext) -> Result<Self, ArithmeticError<Self>> {
        Self::settled(ctx, |math, scoped| math.reduce(self, scoped))
    }

    /// This value at the exponent of `exponent_source`.
    pub fn quantize(
        &self,
        exponent_source: &Self,
        ctx: &mut PrecisionContext,
    ) -> Result<Self, ArithmeticError<Self>> {
        Self::settled(ctx, |math, scoped| math.quantize(self, exponent_source, scoped))
    }

    pub fn round_to_exponent_exact(
        &self,
        exponent: &BigInt,
        ctx: &mut PrecisionContext,
    ) -> Result<Self, ArithmeticError<Self>> {
        Self::settled(ctx, |math, scoped| {
            math.round_to_exponent_exact(self, exponent, scoped)
        })
    }

    pub fn round_to_exponent(
        &self,
        exponent: &BigInt,
        ctx: &mut PrecisionContext,
    ) -> Result<Self, ArithmeticError<Self>> {
        Self::settled(ctx, |math, scoped| {
            math.round_to_exponent_simple(self, exponent, scoped)
        })
    }

    /// Rounds to an integer without raising Rounded for dropped zeros.
    pub fn round_to_integral(
        &self,
        ctx: &mut PrecisionContext,
    ) -> Result<Self, ArithmeticError<Self>> {
        let zero = BigInt::zero();
        Self::settled(ctx, |math, scoped| {
            math.round_to_exponent_no_rounded_flag(self, &zero, scoped)
        })
    }

    pub fn next_plus(&self, ctx: &mut PrecisionContext) -> Result<Self, ArithmeticError<Self>> {
        Self::settled(ctx, |math, scoped| math.next_plus(self, scoped))
    }

    pub fn next_minus(&self, ctx: &mut PrecisionContext) -> Result<Self, ArithmeticError<Self>> {
        Self::settled(ctx, |math, scoped| math.next_minus(self, scoped))
    }

    pub fn next_toward(
        &self,
        target: &Self,
        ctx: &mut PrecisionContext,
    ) -> Result<Self, ArithmeticError<Self>> {
        Self::settled(ctx, |math, scoped| math.next_toward(self, target, scoped))
    }

    pub fn min(
        &self,
        other: &Self,
        ctx: &mut PrecisionContext,
    ) -> Result<Self, ArithmeticError<Self>> {
        Self::settled(ctx, |math, scoped| math.min(self, other, scoped))
    }

    pub fn max(
        &self,
        other: &Self,
        ctx: &mut PrecisionContext,
    ) -> Result<Self, ArithmeticError<Self>> {
        Self::settled(ctx, |math, scoped| math.max(self, other, scoped))
    }

    pub fn min_magnitude(
        &self,
        other: &Self,
        ctx: &mut PrecisionContext,
    ) -> Result<Self, ArithmeticError<Self>> {
        Self::settled(ctx, |math, scoped| math.min_magnitude(self, other, scoped))
    }

    pub fn max_magnitude(
        &self,
        other: &Self,
        ctx: &mut PrecisionContext,
    ) -> Result<Self, ArithmeticError<Self>> {
        Self::settled(ctx, |math, scoped| math.max_magnitude(self, other, scoped))
    }

    /// Numeric order; NaN sorts above everything and equal to NaN.
    pub fn compare_to(&self, other: &Self) -> Ordering {
        ExtendedOrSimpleRadixMath::new(H::default()).compare_to(self, other)
    }

    /// -1, 0 or 1 as a value, or NaN if either side is NaN.
    pub fn compare_to_with_context(
        &self,
        other: &Self,
        ctx: &mut PrecisionContext,
    ) -> Result<Self, ArithmeticError<Self>> {
        Self::settled(ctx, |math, scoped| math.compare_to_with_context(self, other, scoped))
    }
}
