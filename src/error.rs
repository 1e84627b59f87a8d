//! Error types for radix arithmetic.
//!
//! # Signals versus errors
//!
//! Exceptional conditions raised by an operation (overflow, inexact results,
//! invalid operands and so on) are reported as [`Signals`] alongside the
//! result, never as errors. Only two paths produce an `Err`:
//!
//! - **Traps**: the trap decorator escalates a signal that the context's trap
//!   mask names into [`ArithmeticError::Trapped`]. The computed result travels
//!   with the error so callers can still inspect it.
//! - **Forbidden rounding**: [`Rounding::Unnecessary`](crate::Rounding::Unnecessary)
//!   used on a value that needs rounding is a caller bug, reported as
//!   [`ArithmeticError::RoundingRequired`] regardless of traps.

use std::fmt;

use crate::signals::Signals;

/// Errors produced by arithmetic operations over values of type `V`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArithmeticError<V> {
    /// A signal named in the context's trap mask was raised.
    Trapped {
        /// The single signal that triggered the trap.
        signal: Signals,
        /// Every signal the operation raised.
        signals: Signals,
        /// The result computed before the trap fired.
        result: V,
    },
    /// Rounding mode `Unnecessary` was requested but the result is inexact.
    RoundingRequired,
}

impl<V> ArithmeticError<V> {
    /// Returns the trapped signal, if this is a trap.
    pub fn signal(&self) -> Option<Signals> {
        match self {
            Self::Trapped { signal, .. } => Some(*signal),
            Self::RoundingRequired => None,
        }
    }

    /// Returns the pre-trap result, if this is a trap.
    pub fn result(&self) -> Option<&V> {
        match self {
            Self::Trapped { result, .. } => Some(result),
            Self::RoundingRequired => None,
        }
    }
}

impl<V> fmt::Display for ArithmeticError<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Trapped { signal, .. } => write!(f, "trapped signal: {}", signal.name()),
            Self::RoundingRequired => {
                write!(f, "rounding was required but the rounding mode forbids it")
            }
        }
    }
}

impl<V: fmt::Debug> std::error::Error for ArithmeticError<V> {}

/// Errors from mutating a [`PrecisionContext`](crate::PrecisionContext).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContextError {
    /// The context was built without flag recording.
    FlagsNotRecorded,
    /// `e_min` was greater than `e_max`.
    InvalidExponentRange,
}

impl fmt::Display for ContextError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FlagsNotRecorded => write!(f, "context does not record flags"),
            Self::InvalidExponentRange => write!(f, "minimum exponent exceeds maximum exponent"),
        }
    }
}

impl std::error::Error for ContextError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arithmetic_error_display() {
        let trapped: ArithmeticError<u8> = ArithmeticError::Trapped {
            signal: Signals::INEXACT,
            signals: Signals::INEXACT | Signals::ROUNDED,
            result: 7,
        };
        assert_eq!(trapped.to_string(), "trapped signal: inexact");
        assert_eq!(
            ArithmeticError::<u8>::RoundingRequired.to_string(),
            "rounding was required but the rounding mode forbids it"
        );
    }

    #[test]
    fn trapped_error_exposes_result() {
        let trapped = ArithmeticError::Trapped {
            signal: Signals::OVERFLOW,
            signals: Signals::OVERFLOW | Signals::INEXACT,
            result: "inf",
        };
        assert_eq!(trapped.signal(), Some(Signals::OVERFLOW));
        assert_eq!(trapped.result(), Some(&"inf"));
        assert_eq!(ArithmeticError::<&str>::RoundingRequired.result(), None);
    }

    #[test]
    fn context_error_display() {
        assert_eq!(
            ContextError::FlagsNotRecorded.to_string(),
            "context does not record flags"
        );
        assert_eq!(
            ContextError::InvalidExponentRange.to_string(),
            "minimum exponent exceeds maximum exponent"
        );
    }
}
