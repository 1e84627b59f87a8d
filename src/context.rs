//! Precision, rounding and exponent-range configuration.

use num_bigint::BigInt;

use crate::error::ContextError;
use crate::signals::Signals;

/// How a result that cannot be represented exactly is brought into range.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Rounding {
    /// Toward zero.
    Down,
    /// Away from zero.
    Up,
    /// Toward zero, unless the kept last digit would be 0 (or 5 in radix 10),
    /// in which case away from zero.
    ZeroFiveUp,
    /// Toward positive infinity.
    Ceiling,
    /// Toward negative infinity.
    Floor,
    /// To nearest, ties away from zero.
    HalfUp,
    /// To nearest, ties toward zero.
    HalfDown,
    /// To nearest, ties to an even last digit.
    #[default]
    HalfEven,
    /// Rounding is forbidden; an inexact result is an error.
    Unnecessary,
}

impl Rounding {
    /// True if an overflowing result of the given sign rounds to the largest
    /// finite value rather than to infinity.
    pub fn overflows_to_finite(self, negative: bool) -> bool {
        match self {
            Rounding::Down | Rounding::ZeroFiveUp => true,
            Rounding::Ceiling => negative,
            Rounding::Floor => !negative,
            _ => false,
        }
    }
}

/// Arithmetic configuration: precision, rounding and exponent limits, plus
/// the set of signals that trap and the signals recorded so far.
///
/// `e_min` and `e_max` bound the *adjusted* exponent, the exponent of the
/// most significant digit when the value is written in scientific form.
/// Precision is counted in the radix of the value being rounded: bits for
/// binary values, decimal digits for decimal values.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrecisionContext {
    precision: u64,
    rounding: Rounding,
    e_min: BigInt,
    e_max: BigInt,
    has_exponent_range: bool,
    clamp_normal_exponents: bool,
    traps: Signals,
    flags: Signals,
    has_flags: bool,
    simplified: bool,
}

impl PrecisionContext {
    /// Context with the given precision, HalfUp rounding and no exponent range.
    pub fn for_precision(precision: u64) -> Self {
        Self::for_precision_and_rounding(precision, Rounding::HalfUp)
    }

    pub fn for_precision_and_rounding(precision: u64, rounding: Rounding) -> Self {
        Self {
            precision,
            rounding,
            e_min: BigInt::from(0),
            e_max: BigInt::from(0),
            has_exponent_range: false,
            clamp_normal_exponents: false,
            traps: Signals::empty(),
            flags: Signals::empty(),
            has_flags: false,
            simplified: false,
        }
    }

    /// Unlimited precision with the given rounding mode.
    pub fn for_rounding(rounding: Rounding) -> Self {
        Self::for_precision_and_rounding(0, rounding)
    }

    /// Unlimited precision, no exponent range, HalfUp rounding.
    pub fn unlimited() -> Self {
        Self::for_precision(0)
    }

    /// Nine digits, HalfUp, adjusted exponents in `-999999999..=999999999`.
    pub fn basic() -> Self {
        Self::for_precision_and_rounding(9, Rounding::HalfUp)
            .bounded(BigInt::from(-999_999_999), BigInt::from(999_999_999))
    }

    /// IEEE 754-2008 decimal32 parameters.
    pub fn decimal32() -> Self {
        Self::ieee(7, -95, 96)
    }

    /// IEEE 754-2008 decimal64 parameters.
    pub fn decimal64() -> Self {
        Self::ieee(16, -383, 384)
    }

    /// IEEE 754-2008 decimal128 parameters.
    pub fn decimal128() -> Self {
        Self::ieee(34, -6143, 6144)
    }

    /// IEEE 754-2008 binary16 parameters, precision in bits.
    pub fn binary16() -> Self {
        Self::ieee(11, -14, 15)
    }

    /// IEEE 754-2008 binary32 parameters, precision in bits.
    pub fn binary32() -> Self {
        Self::ieee(24, -126, 127)
    }

    /// IEEE 754-2008 binary64 parameters, precision in bits.
    pub fn binary64() -> Self {
        Self::ieee(53, -1022, 1023)
    }

    /// IEEE 754-2008 binary128 parameters, precision in bits.
    pub fn binary128() -> Self {
        Self::ieee(113, -16382, 16383)
    }

    fn ieee(precision: u64, e_min: i64, e_max: i64) -> Self {
        Self::for_precision_and_rounding(precision, Rounding::HalfEven)
            .bounded(BigInt::from(e_min), BigInt::from(e_max))
            .with_exponent_clamp(true)
    }

    pub fn with_precision(mut self, precision: u64) -> Self {
        self.precision = precision;
        self
    }

    pub fn with_rounding(mut self, rounding: Rounding) -> Self {
        self.rounding = rounding;
        self
    }

    /// Bounds the adjusted exponent to `e_min..=e_max`.
    pub fn with_exponent_range(self, e_min: BigInt, e_max: BigInt) -> Result<Self, ContextError> {
        if e_min > e_max {
            return Err(ContextError::InvalidExponentRange);
        }
        Ok(self.bounded(e_min, e_max))
    }

    fn bounded(mut self, e_min: BigInt, e_max: BigInt) -> Self {
        self.e_min = e_min;
        self.e_max = e_max;
        self.has_exponent_range = true;
        self
    }

    pub fn with_unlimited_exponents(mut self) -> Self {
        self.has_exponent_range = false;
        self
    }

    pub fn with_exponent_clamp(mut self, clamp: bool) -> Self {
        self.clamp_normal_exponents = clamp;
        self
    }

    pub fn with_traps(mut self, traps: Signals) -> Self {
        self.traps = traps;
        self
    }

    /// Copy that records flags, starting from none.
    pub fn with_blank_flags(mut self) -> Self {
        self.flags = Signals::empty();
        self.has_flags = true;
        self
    }

    /// Copy that does not record flags.
    pub fn with_no_flags(mut self) -> Self {
        self.flags = Signals::empty();
        self.has_flags = false;
        self
    }

    pub fn with_simplified(mut self, simplified: bool) -> Self {
        self.simplified = simplified;
        self
    }

    /// Copy with blank flags and no traps, for inner calls whose signals the
    /// caller inspects before anything reaches this context.
    pub fn without_traps_and_flags(&self) -> Self {
        let mut inner = self.clone();
        inner.traps = Signals::empty();
        inner.flags = Signals::empty();
        inner.has_flags = true;
        inner
    }

    pub fn precision(&self) -> u64 {
        self.precision
    }

    pub fn has_max_precision(&self) -> bool {
        self.precision > 0
    }

    pub fn rounding(&self) -> Rounding {
        self.rounding
    }

    pub fn e_min(&self) -> &BigInt {
        &self.e_min
    }

    pub fn e_max(&self) -> &BigInt {
        &self.e_max
    }

    pub fn has_exponent_range(&self) -> bool {
        self.has_exponent_range
    }

    pub fn clamp_normal_exponents(&self) -> bool {
        self.clamp_normal_exponents
    }

    pub fn traps(&self) -> Signals {
        self.traps
    }

    pub fn flags(&self) -> Signals {
        self.flags
    }

    pub fn has_flags(&self) -> bool {
        self.has_flags
    }

    pub fn is_simplified(&self) -> bool {
        self.simplified
    }

    /// Smallest exponent a subnormal result may carry.
    ///
    /// With unlimited precision there is no subnormal range below `e_min`.
    pub fn e_tiny(&self) -> BigInt {
        if self.precision == 0 {
            return self.e_min.clone();
        }
        &self.e_min - BigInt::from(self.precision) + 1
    }

    /// Largest exponent a normal result may carry when exponents are clamped,
    /// `e_max + 1 - precision`.
    pub fn e_top(&self) -> BigInt {
        &self.e_max + 1 - BigInt::from(self.precision)
    }

    /// Replaces the recorded flags.
    pub fn set_flags(&mut self, flags: Signals) -> Result<(), ContextError> {
        if !self.has_flags {
            return Err(ContextError::FlagsNotRecorded);
        }
        self.flags = flags;
        Ok(())
    }

    /// Adds `signals` to the recorded flags. Dropped if the context does not
    /// record flags.
    pub fn merge_signals(&mut self, signals: Signals) {
        if self.has_flags {
            self.flags |= signals;
        }
    }
}

impl Default for PrecisionContext {
    fn default() -> Self {
        Self::unlimited()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use super::*;

    #[test]
    fn set_flags_requires_flag_recording() {
        let mut ctx = PrecisionContext::decimal64();
        assert_eq!(
            ctx.set_flags(Signals::INEXACT),
            Err(ContextError::FlagsNotRecorded)
        );

        let mut recording = PrecisionContext::decimal64().with_blank_flags();
        recording
            .set_flags(Signals::INEXACT)
            .expect("flags should be recorded");
        assert_eq!(recording.flags(), Signals::INEXACT);
    }

    #[test]
    fn merge_signals_is_dropped_without_flags() {
        let mut ctx = PrecisionContext::decimal32();
        ctx.merge_signals(Signals::OVERFLOW);
        assert!(ctx.flags().is_empty());

        let mut recording = ctx.with_blank_flags();
        recording.merge_signals(Signals::OVERFLOW);
        recording.merge_signals(Signals::INEXACT);
        assert_eq!(recording.flags(), Signals::OVERFLOW | Signals::INEXACT);
    }

    #[test]
    fn without_traps_and_flags_clears_both() {
        let mut ctx = PrecisionContext::decimal64()
            .with_traps(Signals::INEXACT)
            .with_blank_flags();
        ctx.merge_signals(Signals::ROUNDED);
        let inner = ctx.without_traps_and_flags();
        assert!(inner.traps().is_empty());
        assert!(inner.flags().is_empty());
        assert!(inner.has_flags());
        assert_eq!(inner.precision(), 16);
    }

    #[test]
    fn decimal_presets() {
        let ctx = PrecisionContext::decimal64();
        assert_eq!(ctx.precision(), 16);
        assert_eq!(ctx.e_min(), &BigInt::from(-383));
        assert_eq!(ctx.e_max(), &BigInt::from(384));
        assert!(ctx.clamp_normal_exponents());
        assert_eq!(ctx.e_tiny(), BigInt::from(-398));
        assert_eq!(ctx.e_top(), BigInt::from(369));
        assert_eq!(PrecisionContext::decimal32().e_tiny(), BigInt::from(-101));
        assert_eq!(PrecisionContext::decimal128().e_top(), BigInt::from(6111));
    }

    #[test]
    fn binary64_preset_matches_ieee_limits() {
        let ctx = PrecisionContext::binary64();
        assert_eq!(ctx.e_tiny(), BigInt::from(-1074));
        assert_eq!(ctx.e_top(), BigInt::from(971));
    }

    #[test]
    fn exponent_range_must_be_ordered() {
        let reversed = PrecisionContext::for_precision(3)
            .with_exponent_range(BigInt::from(10), BigInt::from(-10));
        assert_eq!(reversed, Err(ContextError::InvalidExponentRange));

        let ctx = PrecisionContext::for_precision(3)
            .with_exponent_range(BigInt::from(-10), BigInt::from(10))
            .expect("ordered range");
        assert!(ctx.has_exponent_range());
        assert_eq!(ctx.e_min(), &BigInt::from(-10));
        assert_eq!(ctx.e_max(), &BigInt::from(10));

        let single = PrecisionContext::for_precision(3)
            .with_exponent_range(BigInt::from(4), BigInt::from(4))
            .expect("single exponent");
        assert_eq!(single.e_min(), single.e_max());
    }

    #[test]
    fn overflow_direction_by_rounding() {
        assert!(Rounding::Down.overflows_to_finite(false));
        assert!(Rounding::ZeroFiveUp.overflows_to_finite(true));
        assert!(Rounding::Floor.overflows_to_finite(false));
        assert!(!Rounding::Floor.overflows_to_finite(true));
        assert!(Rounding::Ceiling.overflows_to_finite(true));
        assert!(!Rounding::Ceiling.overflows_to_finite(false));
        assert!(!Rounding::HalfEven.overflows_to_finite(false));
    }

    #[test]
    fn unlimited_context_has_no_range() {
        let ctx = PrecisionContext::unlimited();
        assert!(!ctx.has_max_precision());
        assert!(!ctx.has_exponent_range());
        assert_eq!(ctx, PrecisionContext::default());
    }
}
