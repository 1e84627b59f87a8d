//! Radix-2 shift accumulator.

use num_bigint::BigUint;

use super::{for_each_chunk, Discards, Magnitude, ShiftAccumulator, SHIFT_CHUNK};

/// Shift accumulator over the bits of a magnitude.
#[derive(Clone, Debug)]
pub struct BitShiftAccumulator {
    magnitude: Magnitude,
    length: u64,
    discards: Discards,
}

impl BitShiftAccumulator {
    pub fn new(magnitude: BigUint) -> Self {
        Self::with_discarded(magnitude, 0, false)
    }

    /// Accumulator whose round/sticky state continues an earlier truncation.
    /// `last_discarded` is 0 or 1.
    pub fn with_discarded(magnitude: BigUint, last_discarded: u8, older_discarded: bool) -> Self {
        let length = bit_length(&magnitude);
        Self {
            magnitude: Magnitude::new(magnitude),
            length,
            discards: Discards::new(last_discarded.min(1), older_discarded),
        }
    }

    /// Shifts by `count` with `1 <= count <= self.length`.
    fn shift_within(&mut self, count: u64) {
        let below = count - 1;
        let (shifted, digit, lower_nonzero) = match &self.magnitude {
            Magnitude::Small(value) => {
                let digit = ((value >> below) & 1) as u8;
                let lower_nonzero = value & low_mask(below) != 0;
                let shifted = if count >= 64 { 0 } else { value >> count };
                (Magnitude::Small(shifted), digit, lower_nonzero)
            }
            Magnitude::Big(value) => {
                let digit = u8::from(value.bit(below));
                let lower_nonzero = value.trailing_zeros().is_some_and(|zeros| zeros < below);
                (Magnitude::new(value >> count), digit, lower_nonzero)
            }
        };
        self.magnitude = shifted;
        self.discards.record(count, digit, lower_nonzero);
        self.length = if count >= self.length {
            1
        } else {
            self.length - count
        };
    }

    fn shift_through(&mut self, count: &BigUint) {
        let nonzero = !self.magnitude.is_zero();
        self.discards.record_through(count, nonzero);
        self.magnitude = Magnitude::Small(0);
        self.length = 1;
    }
}

impl ShiftAccumulator for BitShiftAccumulator {
    fn shift_right(&mut self, count: &BigUint) {
        if count > &BigUint::from(self.length) {
            self.shift_through(count);
            return;
        }
        for_each_chunk(count, SHIFT_CHUNK, |chunk| self.shift_within(chunk));
    }

    fn shift_right_small(&mut self, count: u64) {
        if count == 0 {
            return;
        }
        if count > self.length {
            self.shift_through(&BigUint::from(count));
            return;
        }
        for_each_chunk(&BigUint::from(count), SHIFT_CHUNK, |chunk| {
            self.shift_within(chunk)
        });
    }

    fn digit_length(&mut self) -> u64 {
        self.length
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

/// Number of bits in `value`; zero has length 1.
pub(crate) fn bit_length(value: &BigUint) -> u64 {
    value.bits().max(1)
}

fn low_mask(bits: u64) -> u64 {
    if bits >= 64 {
        u64::MAX
    } else {
        (1u64 << bits) - 1
    }
}
