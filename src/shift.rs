//! Round/sticky tracking while truncating a non-negative magnitude.
//!
//! A shift accumulator discards low-order digits of a magnitude and remembers
//! just enough about them to round correctly:
//!
//! - the **last discarded digit**, the most significant digit removed so far;
//! - the **older discarded digits** flag (sticky), set if any digit below the
//!   last discarded one was nonzero.
//!
//! Two implementations share the [`ShiftAccumulator`] contract:
//! - [`BitShiftAccumulator`]: radix 2, digits are bits
//! - [`DigitShiftAccumulator`]: radix 10, digits are decimal digits
//!
//! Shift distances may be arbitrary-precision. Distances within the
//! magnitude's length are consumed in chunks of at most [`SHIFT_CHUNK`]
//! positions; distances beyond it collapse the magnitude to zero directly.

mod bit;
mod chunked;
mod digit;

use num_bigint::BigUint;
use num_traits::{ToPrimitive, Zero};

pub use bit::BitShiftAccumulator;
pub use digit::DigitShiftAccumulator;

pub(crate) use bit::bit_length;
pub(crate) use chunked::{for_each_chunk, shift_left_chunked, SHIFT_CHUNK};
pub(crate) use digit::{decimal_digit_length, multiply_by_power_of_ten};

/// Contract shared by the radix-specific accumulators.
pub trait ShiftAccumulator {
    /// Discards the `count` least significant digits.
    fn shift_right(&mut self, count: &BigUint);

    /// Discards the `count` least significant digits.
    fn shift_right_small(&mut self, count: u64);

    /// Discards low digits until at most `digits` remain. No-op if the
    /// magnitude is already short enough.
    fn shift_to_digits(&mut self, digits: u64) {
        let length = self.digit_length();
        if length > digits {
            self.shift_right_small(length - digits);
        }
    }

    /// Number of digits left in the magnitude; zero has length 1.
    fn digit_length(&mut self) -> u64;

    /// The remaining magnitude.
    fn shifted_value(&self) -> BigUint;

    /// Total number of digits discarded so far.
    fn discarded_count(&self) -> &BigUint;

    /// Most significant digit discarded so far.
    fn last_discarded_digit(&self) -> u8;

    /// Whether any digit below the last discarded one was nonzero.
    fn older_discarded_digits(&self) -> bool;

    /// True if nothing nonzero has been discarded.
    fn is_exact(&self) -> bool {
        self.last_discarded_digit() == 0 && !self.older_discarded_digits()
    }
}

/// Magnitude with a machine-word fast path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Magnitude {
    Small(u64),
    Big(BigUint),
}

impl Magnitude {
    pub(crate) fn new(value: BigUint) -> Self {
        match value.to_u64() {
            Some(small) => Self::Small(small),
            None => Self::Big(value),
        }
    }

    pub(crate) fn to_biguint(&self) -> BigUint {
        match self {
            Self::Small(value) => BigUint::from(*value),
            Self::Big(value) => value.clone(),
        }
    }

    pub(crate) fn is_zero(&self) -> bool {
        match self {
            Self::Small(value) => *value == 0,
            Self::Big(value) => value.is_zero(),
        }
    }
}

/// Discard bookkeeping common to both radixes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Discards {
    count: BigUint,
    last: u8,
    older: bool,
}

impl Discards {
    pub(crate) fn new(last: u8, older: bool) -> Self {
        Self {
            count: BigUint::zero(),
            last,
            older,
        }
    }

    /// Records a shift of `amount` digits whose most significant removed digit
    /// is `digit`, with `lower_nonzero` set if any digit below it was nonzero.
    pub(crate) fn record(&mut self, amount: u64, digit: u8, lower_nonzero: bool) {
        self.older |= self.last != 0 || lower_nonzero;
        self.last = digit;
        self.count += amount;
    }

    /// Records a shift past every remaining digit of a magnitude.
    pub(crate) fn record_through(&mut self, amount: &BigUint, magnitude_nonzero: bool) {
        self.older |= self.last != 0 || magnitude_nonzero;
        self.last = 0;
        self.count += amount;
    }

    pub(crate) fn count(&self) -> &BigUint {
        &self.count
    }

    pub(crate) fn last(&self) -> u8 {
        self.last
    }

    pub(crate) fn older(&self) -> bool {
        self.older
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn state<A: ShiftAccumulator>(acc: &mut A) -> (BigUint, u8, bool, BigUint) {
        (
            acc.shifted_value(),
            acc.last_discarded_digit(),
            acc.older_discarded_digits(),
            acc.discarded_count().clone(),
        )
    }

    #[test]
    fn discards_fold_previous_digit_into_sticky() {
        let mut discards = Discards::new(0, false);
        discards.record(1, 5, false);
        assert_eq!((discards.last(), discards.older()), (5, false));
        discards.record(1, 0, false);
        assert_eq!((discards.last(), discards.older()), (0, true));
        assert_eq!(discards.count(), &BigUint::from(2u32));
    }

    #[test]
    fn magnitude_switches_representation() {
        assert_eq!(Magnitude::new(BigUint::from(7u32)), Magnitude::Small(7));
        let big = BigUint::from(u64::MAX) + 1u32;
        assert_eq!(Magnitude::new(big.clone()), Magnitude::Big(big.clone()));
        assert_eq!(Magnitude::new(big.clone()).to_biguint(), big);
        assert!(Magnitude::Small(0).is_zero());
    }

    proptest! {
        #[test]
        fn bit_shifts_compose(value in any::<u128>(), first in 0u64..140, second in 0u64..140) {
            let magnitude = BigUint::from(value);
            let mut split = BitShiftAccumulator::new(magnitude.clone());
            split.shift_right_small(first);
            split.shift_right_small(second);
            let mut whole = BitShiftAccumulator::new(magnitude);
            whole.shift_right(&BigUint::from(first + second));
            prop_assert_eq!(state(&mut split), state(&mut whole));
        }

        #[test]
        fn digit_shifts_compose(value in any::<u128>(), first in 0u64..45, second in 0u64..45) {
            let magnitude = BigUint::from(value);
            let mut split = DigitShiftAccumulator::new(magnitude.clone());
            split.shift_right_small(first);
            split.shift_right_small(second);
            let mut whole = DigitShiftAccumulator::new(magnitude);
            whole.shift_right(&BigUint::from(first + second));
            prop_assert_eq!(state(&mut split), state(&mut whole));
        }

        #[test]
        fn sticky_never_clears(
            value in any::<u128>(),
            steps in proptest::collection::vec(0u64..12, 1..8),
        ) {
            let mut acc = DigitShiftAccumulator::new(BigUint::from(value));
            let mut sticky = false;
            for step in steps {
                acc.shift_right_small(step);
                prop_assert!(!sticky || acc.older_discarded_digits());
                sticky = acc.older_discarded_digits();
            }
        }

        #[test]
        fn digit_shift_matches_division(value in any::<u64>(), count in 1u64..22) {
            let mut acc = DigitShiftAccumulator::new(BigUint::from(value));
            acc.shift_right_small(count);
            let divisor = 10u128.pow(count as u32);
            let value = u128::from(value);
            prop_assert_eq!(acc.shifted_value(), BigUint::from(value / divisor));
            let remainder = value % divisor;
            let top = remainder / (divisor / 10);
            prop_assert_eq!(u128::from(acc.last_discarded_digit()), top);
            prop_assert_eq!(acc.older_discarded_digits(), remainder % (divisor / 10) != 0);
        }
    }
}
