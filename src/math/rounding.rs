//! The rounding decision table.

use num_bigint::BigUint;
use num_traits::Zero;

use crate::context::Rounding;
use crate::shift::ShiftAccumulator;

/// Round digit and sticky flag describing what was cut off a significand.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Discarded {
    pub(crate) last: u8,
    pub(crate) older: bool,
}

impl Discarded {
    pub(crate) const EXACT: Discarded = Discarded {
        last: 0,
        older: false,
    };

    pub(crate) fn of<A: ShiftAccumulator>(accumulator: &A) -> Self {
        Self {
            last: accumulator.last_discarded_digit(),
            older: accumulator.older_discarded_digits(),
        }
    }

    /// Discard state for a division remainder `remainder / divisor`, which is
    /// less than one unit of the quotient's last digit.
    pub(crate) fn of_remainder(remainder: &BigUint, divisor: &BigUint, radix: u32) -> Self {
        if remainder.is_zero() {
            return Self::EXACT;
        }
        let half = (radix / 2) as u8;
        let twice: BigUint = remainder << 1usize;
        match twice.cmp(divisor) {
            std::cmp::Ordering::Less => Self {
                last: 0,
                older: true,
            },
            std::cmp::Ordering::Equal => Self {
                last: half,
                older: false,
            },
            std::cmp::Ordering::Greater => Self {
                last: half,
                older: true,
            },
        }
    }

    pub(crate) fn is_exact(self) -> bool {
        self.last == 0 && !self.older
    }
}

/// Whether a significand whose last kept digit is `kept_last_digit` must be
/// incremented by one unit. `Unnecessary` never increments; callers reject
/// inexact results under it before asking.
pub(crate) fn rounding_increments(
    rounding: Rounding,
    radix: u32,
    discarded: Discarded,
    kept_last_digit: u32,
    negative: bool,
) -> bool {
    if discarded.is_exact() {
        return false;
    }
    let half = (radix / 2) as u8;
    let last = discarded.last;
    match rounding {
        Rounding::Down | Rounding::Unnecessary => false,
        Rounding::Up => true,
        Rounding::ZeroFiveUp => kept_last_digit == 0 || (radix == 10 && kept_last_digit == 5),
        Rounding::Ceiling => !negative,
        Rounding::Floor => negative,
        Rounding::HalfUp => last >= half,
        Rounding::HalfDown => last > half || (last == half && discarded.older),
        Rounding::HalfEven => {
            last > half || (last == half && (discarded.older || kept_last_digit % 2 == 1))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn discarded(last: u8, older: bool) -> Discarded {
        Discarded { last, older }
    }

    #[test]
    fn exact_never_increments() {
        for rounding in [
            Rounding::Up,
            Rounding::Ceiling,
            Rounding::HalfUp,
            Rounding::ZeroFiveUp,
        ] {
            assert!(!rounding_increments(rounding, 10, Discarded::EXACT, 1, false));
        }
    }

    #[test]
    fn decimal_half_modes() {
        let half = discarded(5, false);
        let above = discarded(5, true);
        let big = discarded(7, false);
        let below = discarded(4, true);

        assert!(rounding_increments(Rounding::HalfUp, 10, half, 2, false));
        assert!(!rounding_increments(Rounding::HalfUp, 10, below, 2, false));

        assert!(!rounding_increments(Rounding::HalfDown, 10, half, 3, false));
        assert!(rounding_increments(Rounding::HalfDown, 10, above, 3, false));
        assert!(rounding_increments(Rounding::HalfDown, 10, big, 3, false));

        assert!(!rounding_increments(Rounding::HalfEven, 10, half, 2, false));
        assert!(rounding_increments(Rounding::HalfEven, 10, half, 3, false));
        assert!(rounding_increments(Rounding::HalfEven, 10, above, 2, false));
    }

    #[test]
    fn binary_half_modes() {
        let half = discarded(1, false);
        let above = discarded(1, true);
        let below = discarded(0, true);

        assert!(rounding_increments(Rounding::HalfUp, 2, half, 0, false));
        assert!(!rounding_increments(Rounding::HalfUp, 2, below, 0, false));
        assert!(!rounding_increments(Rounding::HalfEven, 2, half, 0, false));
        assert!(rounding_increments(Rounding::HalfEven, 2, half, 1, false));
        assert!(rounding_increments(Rounding::HalfEven, 2, above, 0, false));
        assert!(!rounding_increments(Rounding::HalfDown, 2, half, 1, false));
    }

    #[test]
    fn directed_modes_follow_sign() {
        let any = discarded(1, false);
        assert!(rounding_increments(Rounding::Ceiling, 10, any, 0, false));
        assert!(!rounding_increments(Rounding::Ceiling, 10, any, 0, true));
        assert!(rounding_increments(Rounding::Floor, 10, any, 0, true));
        assert!(!rounding_increments(Rounding::Floor, 10, any, 0, false));
        assert!(rounding_increments(Rounding::Up, 10, any, 0, true));
        assert!(!rounding_increments(Rounding::Down, 10, any, 0, true));
    }

    #[test]
    fn zero_five_up_checks_kept_digit() {
        let any = discarded(3, false);
        assert!(rounding_increments(Rounding::ZeroFiveUp, 10, any, 0, false));
        assert!(rounding_increments(Rounding::ZeroFiveUp, 10, any, 5, false));
        assert!(!rounding_increments(Rounding::ZeroFiveUp, 10, any, 4, false));
        assert!(rounding_increments(Rounding::ZeroFiveUp, 2, discarded(1, false), 0, false));
        assert!(!rounding_increments(Rounding::ZeroFiveUp, 2, discarded(1, false), 1, false));
    }

    #[test]
    fn remainder_classification() {
        let divisor = BigUint::from(8u32);
        assert_eq!(
            Discarded::of_remainder(&BigUint::from(0u32), &divisor, 10),
            Discarded::EXACT
        );
        assert_eq!(
            Discarded::of_remainder(&BigUint::from(3u32), &divisor, 10),
            discarded(0, true)
        );
        assert_eq!(
            Discarded::of_remainder(&BigUint::from(4u32), &divisor, 10),
            discarded(5, false)
        );
        assert_eq!(
            Discarded::of_remainder(&BigUint::from(5u32), &divisor, 2),
            discarded(1, true)
        );
    }
}
