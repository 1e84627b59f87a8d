//! Radix-generic arbitrary-precision rounding and arithmetic.
//!
//! One engine, [`RadixMath`], implements the General Decimal Arithmetic
//! operations over any radix described by a [`RadixHelper`].
//! [`ExtendedDecimal`] and [`ExtendedFloat`] are the radix-10 and radix-2
//! numbers built on it; both carry signed zeros, infinities and quiet or
//! signaling NaNs with payloads.
//!
//! A [`PrecisionContext`] fixes precision, rounding and the exponent range.
//! Exceptional conditions are reported as [`Signals`]; any signal listed in
//! the context's traps turns the operation into an [`ArithmeticError`].

#![warn(
    clippy::shadow_reuse,
    clippy::shadow_same,
    clippy::shadow_unrelated,
    clippy::dbg_macro,
    clippy::expect_used,
    clippy::panic,
    clippy::print_stderr,
    clippy::print_stdout,
    clippy::todo,
    clippy::unimplemented,
    clippy::unwrap_used
)]

mod context;
mod error;
mod math;
mod number;
mod shift;
mod signals;

#[cfg(test)]
mod test_utils;

pub use context::{PrecisionContext, Rounding};
pub use error::{ArithmeticError, ContextError};
pub use math::{
    settle, ExtendedOrSimpleRadixMath, Outcome, RadixArithmetic, RadixHelper, RadixMath, Signaled,
    SimpleRadixMath, TrappableRadixMath,
};
pub use number::{BinaryHelper, DecimalHelper, ExtendedDecimal, ExtendedFloat, ExtendedNumber};
pub use shift::{BitShiftAccumulator, DigitShiftAccumulator, ShiftAccumulator};
pub use signals::{Kind, NumberFlags, Signals};
