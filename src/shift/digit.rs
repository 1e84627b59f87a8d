//! Radix-10 shift accumulator and decimal digit utilities.

use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::{One, ToPrimitive, Zero};

use super::{for_each_chunk, Discards, Magnitude, ShiftAccumulator, SHIFT_CHUNK};

/// log10(2), used to estimate decimal length from bit length.
const LOG10_2: f64 = 0.301_029_995_663_981_2;

/// Largest power of ten that fits in a `u64`.
const MAX_U64_POW10_EXPONENT: u32 = 19;

/// Shift accumulator over the decimal digits of a magnitude.
#[derive(Clone, Debug)]
pub struct DigitShiftAccumulator {
    magnitude: Magnitude,
    length: Option<u64>,
    discards: Discards,
}

impl DigitShiftAccumulator {
    pub fn new(magnitude: BigUint) -> Self {
        Self::with_discarded(magnitude, 0, false)
    }

    /// Accumulator whose round/sticky state continues an earlier truncation.
    /// `last_discarded` is a decimal digit.
    pub fn with_discarded(magnitude: BigUint, last_discarded: u8, older_discarded: bool) -> Self {
        Self {
            magnitude: Magnitude::new(magnitude),
            length: None,
            discards: Discards::new(last_discarded.min(9), older_discarded),
        }
    }

    /// Shifts by `count` with `1 <= count <= self.digit_length()`.
    fn shift_within(&mut self, count: u64) {
        let length = self.digit_length();
        let (shifted, digit, lower_nonzero) = match &self.magnitude {
            Magnitude::Small(value) => shift_small(*value, count),
            Magnitude::Big(value) => shift_big(value, count),
        };
        self.magnitude = shifted;
        self.discards.record(count, digit, lower_nonzero);
        self.length = Some(if count >= length { 1 } else { length - count });
    }

    fn shift_through(&mut self, count: &BigUint) {
        let nonzero = !self.magnitude.is_zero();
        self.discards.record_through(count, nonzero);
        self.magnitude = Magnitude::Small(0);
        self.length = Some(1);
    }
}

impl ShiftAccumulator for DigitShiftAccumulator {
    fn shift_right(&mut self, count: &BigUint) {
        if count > &BigUint::from(self.digit_length()) {
            self.shift_through(count);
            return;
        }
        for_each_chunk(count, SHIFT_CHUNK, |chunk| self.shift_within(chunk));
    }

    fn shift_right_small(&mut self, count: u64) {
        if count == 0 {
            return;
        }
        if count > self.digit_length() {
            self.shift_through(&BigUint::from(count));
            return;
        }
        for_each_chunk(&BigUint::from(count), SHIFT_CHUNK, |chunk| {
            self.shift_within(chunk)
        });
    }

    fn digit_length(&mut self) -> u64 {
        if let Some(length) = self.length {
            return length;
        }
        let length = match &self.magnitude {
            Magnitude::Small(value) => small_digit_length(*value),
            Magnitude::Big(value) => decimal_digit_length(value),
        };
        self.length = Some(length);
        length
    }

    fn shifted_value(&self) -> BigUint {
        self.magnitude.to_biguint()
    }

    fn discarded_count(&self) -> &BigUint {
        self.discards.count()
    }

    fn last_discarded_digit(&self) -> u8 {
        self.discards.last()
    }

    fn older_discarded_digits(&self) -> bool {
        self.discards.older()
    }
}

fn shift_small(value: u64, count: u64) -> (Magnitude, u8, bool) {
    // A u64 has at most 20 digits; the 20th digit is below 10^19's multiplier.
    let below = (count - 1) as u32;
    if below >= MAX_U64_POW10_EXPONENT + 1 {
        return (Magnitude::Small(0), 0, value != 0);
    }
    let lower_divisor = 10u64.pow(below);
    let upper = value / lower_divisor;
    let lower_nonzero = value % lower_divisor != 0;
    let digit = (upper % 10) as u8;
    (Magnitude::Small(upper / 10), digit, lower_nonzero)
}

fn shift_big(value: &BigUint, count: u64) -> (Magnitude, u8, bool) {
    // count is bounded by SHIFT_CHUNK, far below u32::MAX
    let lower_divisor = power_of_ten((count - 1) as u32);
    let (upper, lower) = value.div_rem(&lower_divisor);
    let (shifted, digit) = upper.div_rem(&BigUint::from(10u32));
    let digit = digit.to_u8().unwrap_or(0);
    (Magnitude::new(shifted), digit, !lower.is_zero())
}

fn small_digit_length(mut value: u64) -> u64 {
    let mut length = 1;
    while value >= 10 {
        value /= 10;
        length += 1;
    }
    length
}

/// `10^exponent`.
pub(crate) fn power_of_ten(exponent: u32) -> BigUint {
    BigUint::from(10u32).pow(exponent)
}

/// Number of decimal digits in `value`; zero has length 1.
pub(crate) fn decimal_digit_length(value: &BigUint) -> u64 {
    if let Some(small) = value.to_u64() {
        return small_digit_length(small);
    }
    let bits = value.bits();
    // 2^(bits-1) <= value < 2^bits, so the estimate is within one of the answer.
    let mut estimate = ((bits - 1) as f64 * LOG10_2).floor() as u64 + 1;
    while estimate > 1 && value < &ten_to(estimate - 1) {
        estimate -= 1;
    }
    while value >= &ten_to(estimate) {
        estimate += 1;
    }
    estimate
}

fn ten_to(exponent: u64) -> BigUint {
    let mut result = BigUint::one();
    for_each_chunk(&BigUint::from(exponent), SHIFT_CHUNK, |chunk| {
        result *= power_of_ten(chunk as u32);
    });
    result
}

/// Multiplies `value` by `10^power`, one chunk at a time.
pub(crate) fn multiply_by_power_of_ten(value: &BigUint, power: &BigUint) -> BigUint {
    if value.is_zero() {
        return BigUint::zero();
    }
    let mut result = value.clone();
    for_each_chunk(power, SHIFT_CHUNK, |chunk| {
        result *= power_of_ten(chunk as u32);
    });
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shift_records_round_digit_and_sticky() {
        let mut acc = DigitShiftAccumulator::new(BigUint::from(123_456u32));
        acc.shift_right_small(2);
        assert_eq!(acc.shifted_value(), BigUint::from(1234u32));
        assert_eq!(acc.last_discarded_digit(), 5);
        assert!(acc.older_discarded_digits());
        assert_eq!(acc.digit_length(), 4);
        assert_eq!(acc.discarded_count(), &BigUint::from(2u32));
    }

    #[test]
    fn exact_half_has_no_sticky() {
        let mut acc = DigitShiftAccumulator::new(BigUint::from(125u32));
        acc.shift_to_digits(2);
        assert_eq!(acc.shifted_value(), BigUint::from(12u32));
        assert_eq!(acc.last_discarded_digit(), 5);
        assert!(!acc.older_discarded_digits());
    }

    #[test]
    fn shift_through_value_keeps_sticky() {
        let mut acc = DigitShiftAccumulator::new(BigUint::from(42u32));
        acc.shift_right(&BigUint::from(10u32).pow(30));
        assert_eq!(acc.shifted_value(), BigUint::zero());
        assert_eq!(acc.last_discarded_digit(), 0);
        assert!(acc.older_discarded_digits());
        assert_eq!(acc.digit_length(), 1);
        assert_eq!(acc.discarded_count(), &BigUint::from(10u32).pow(30));
    }

    #[test]
    fn shift_of_zero_stays_exact() {
        let mut acc = DigitShiftAccumulator::new(BigUint::zero());
        acc.shift_right_small(5);
        assert!(acc.is_exact());
        assert_eq!(acc.discarded_count(), &BigUint::from(5u32));
    }

    #[test]
    fn twenty_digit_small_value() {
        let value = 18_446_744_073_709_551_615u64;
        let mut acc = DigitShiftAccumulator::new(BigUint::from(value));
        assert_eq!(acc.digit_length(), 20);
        acc.shift_right_small(20);
        assert_eq!(acc.shifted_value(), BigUint::zero());
        assert_eq!(acc.last_discarded_digit(), 1);
        assert!(acc.older_discarded_digits());
    }

    #[test]
    fn big_value_shift_and_length() {
        let value = power_of_ten(40) + BigUint::from(7u32);
        let mut acc = DigitShiftAccumulator::new(value);
        assert_eq!(acc.digit_length(), 41);
        acc.shift_to_digits(3);
        assert_eq!(acc.shifted_value(), BigUint::from(100u32));
        assert_eq!(acc.last_discarded_digit(), 0);
        assert!(acc.older_discarded_digits());
    }

    #[test]
    fn decimal_digit_length_at_boundaries() {
        for exponent in [19u32, 20, 21, 50, 100, 308] {
            let power = power_of_ten(exponent);
            assert_eq!(decimal_digit_length(&power), u64::from(exponent) + 1);
            assert_eq!(
                decimal_digit_length(&(&power - BigUint::one())),
                u64::from(exponent)
            );
        }
        assert_eq!(decimal_digit_length(&BigUint::zero()), 1);
    }

    #[test]
    fn multiply_by_power_of_ten_chunks() {
        let result = multiply_by_power_of_ten(&BigUint::from(3u32), &BigUint::from(25u32));
        assert_eq!(result, BigUint::from(3u32) * power_of_ten(25));
    }
}
