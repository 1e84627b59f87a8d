//! Signal and value flag sets.

use bitflags::bitflags;

bitflags! {
    /// Exceptional conditions raised by an operation.
    ///
    /// Any subset may be raised by a single operation. Signals are returned
    /// alongside results and merged into a context by the caller; the trap
    /// decorator turns the ones named in a context's trap mask into errors.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Signals: u32 {
        /// Rounding changed the value.
        const INEXACT = 1;
        /// Rounding changed the representation, possibly without changing the value.
        const ROUNDED = 1 << 1;
        /// The result is nonzero and below the normal exponent range.
        const SUBNORMAL = 1 << 2;
        /// The result is both subnormal and inexact.
        const UNDERFLOW = 1 << 3;
        /// The result's exponent exceeds the exponent range.
        const OVERFLOW = 1 << 4;
        /// The exponent was forced into range without changing the value.
        const CLAMPED = 1 << 5;
        /// The operation is undefined for its operands.
        const INVALID = 1 << 6;
        /// A nonzero finite value was divided by zero.
        const DIVISION_BY_ZERO = 1 << 7;
    }
}

/// Order in which trapped signals are escalated. The hard conditions come
/// first since at most one of them describes an operation's failure.
pub(crate) const TRAP_PRECEDENCE: [Signals; 8] = [
    Signals::INVALID,
    Signals::DIVISION_BY_ZERO,
    Signals::OVERFLOW,
    Signals::UNDERFLOW,
    Signals::SUBNORMAL,
    Signals::INEXACT,
    Signals::ROUNDED,
    Signals::CLAMPED,
];

impl Signals {
    /// Lowercase name of a single signal, or `"multiple"` for composite sets.
    pub fn name(self) -> &'static str {
        const NAMES: [(Signals, &str); 8] = [
            (Signals::INEXACT, "inexact"),
            (Signals::ROUNDED, "rounded"),
            (Signals::SUBNORMAL, "subnormal"),
            (Signals::UNDERFLOW, "underflow"),
            (Signals::OVERFLOW, "overflow"),
            (Signals::CLAMPED, "clamped"),
            (Signals::INVALID, "invalid"),
            (Signals::DIVISION_BY_ZERO, "division by zero"),
        ];
        if self.is_empty() {
            return "none";
        }
        NAMES
            .into_iter()
            .find(|(signal, _)| *signal == self)
            .map_or("multiple", |(_, name)| name)
    }

    /// Returns the highest-precedence signal present in both `self` and `traps`.
    pub(crate) fn first_trapped(self, traps: Signals) -> Option<Signals> {
        let trapped = self & traps;
        TRAP_PRECEDENCE
            .into_iter()
            .find(|signal| trapped.contains(*signal))
    }
}

bitflags! {
    /// Sign and special-value bits of a number.
    ///
    /// A value with none of the special bits is finite.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct NumberFlags: u8 {
        const NEGATIVE = 1;
        const INFINITY = 1 << 1;
        const QUIET_NAN = 1 << 2;
        const SIGNALING_NAN = 1 << 3;

        const NAN = Self::QUIET_NAN.bits() | Self::SIGNALING_NAN.bits();
        const SPECIAL = Self::INFINITY.bits() | Self::NAN.bits();
    }
}

impl NumberFlags {
    /// Flags for a finite value with the given sign.
    pub fn finite(negative: bool) -> Self {
        if negative {
            Self::NEGATIVE
        } else {
            Self::empty()
        }
    }

    pub fn is_negative(self) -> bool {
        self.contains(Self::NEGATIVE)
    }

    pub fn is_finite(self) -> bool {
        !self.intersects(Self::SPECIAL)
    }

    pub fn is_infinite(self) -> bool {
        self.contains(Self::INFINITY)
    }

    pub fn is_nan(self) -> bool {
        self.intersects(Self::NAN)
    }

    pub fn is_signaling_nan(self) -> bool {
        self.contains(Self::SIGNALING_NAN)
    }

    pub fn is_quiet_nan(self) -> bool {
        self.contains(Self::QUIET_NAN)
    }

    /// Same special bits with the sign inverted.
    pub fn negated(self) -> Self {
        self ^ Self::NEGATIVE
    }

    /// Same special bits with the given sign.
    pub fn with_sign(self, negative: bool) -> Self {
        let mut flags = self;
        flags.set(Self::NEGATIVE, negative);
        flags
    }
}

/// Tagged view of a value's flags.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Kind {
    Finite,
    Infinity,
    QuietNan,
    SignalingNan,
}

impl From<NumberFlags> for Kind {
    fn from(flags: NumberFlags) -> Self {
        if flags.is_signaling_nan() {
            Kind::SignalingNan
        } else if flags.is_quiet_nan() {
            Kind::QuietNan
        } else if flags.is_infinite() {
            Kind::Infinity
        } else {
            Kind::Finite
        }
    }
}
