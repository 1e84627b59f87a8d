//! Text forms.
//!
//! Decimals print in the General Decimal Arithmetic scientific form
//! ("1.23E+5", "0.00123"). Binary values print their significand in binary
//! with a point after the leading bit, as in "1.1101 * 2^5".

use std::fmt;

use num_bigint::{BigInt, BigUint};
use num_traits::Zero;

use super::{BinaryHelper, DecimalHelper, ExtendedNumber};

/// Writes the sign and the name of a non-finite value. Returns `false` for
/// finite values, leaving the formatter untouched.
fn write_special<H>(
    f: &mut fmt::Formatter<'_>,
    value: &ExtendedNumber<H>,
) -> Result<bool, fmt::Error> {
    if value.is_finite() {
        return Ok(false);
    }
    if value.is_negative() {
        write!(f, "-")?;
    }
    if value.is_infinite() {
        write!(f, "Infinity")?;
        return Ok(true);
    }
    if value.is_signaling_nan() {
        write!(f, "s")?;
    }
    write!(f, "NaN")?;
    if !value.significand().is_zero() {
        write!(f, "{}", value.significand())?;
    }
    Ok(true)
}

impl fmt::Display for ExtendedNumber<DecimalHelper> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if write_special(f, self)? {
            return Ok(());
        }
        if self.is_negative() {
            write!(f, "-")?;
        }
        let digits = self.significand().to_string();
        let adjusted = self.exponent() + BigInt::from(digits.len() - 1);
        if self.exponent() <= &BigInt::zero() && adjusted >= BigInt::from(-6) {
            return write!(f, "{}", with_decimal_point(&digits, self.exponent()));
        }
        let (lead, rest) = digits.split_at(1);
        write!(f, "{lead}")?;
        if !rest.is_empty() {
            write!(f, ".{rest}")?;
        }
        if adjusted >= BigInt::zero() {
            write!(f, "E+{adjusted}")
        } else {
            write!(f, "E{adjusted}")
        }
    }
}

/// `digits * 10^exponent` in plain notation, for `exponent <= 0`.
fn with_decimal_point(digits: &str, exponent: &BigInt) -> String {
    let fraction_digits = usize::try_from(exponent.magnitude()).unwrap_or(usize::MAX);
    if fraction_digits == 0 {
        return digits.to_string();
    }
    if fraction_digits < digits.len() {
        let (whole, fraction) = digits.split_at(digits.len() - fraction_digits);
        return format!("{whole}.{fraction}");
    }
    let zeros = "0".repeat(fraction_digits - digits.len());
    format!("0.{zeros}{digits}")
}

impl fmt::Display for ExtendedNumber<BinaryHelper> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if write_special(f, self)? {
            return Ok(());
        }
        if self.is_negative() {
            write!(f, "-")?;
        }
        if self.significand().is_zero() {
            return write!(f, "0.0");
        }
        let (mantissa, exponent) = format_mantissa_with_point(self.significand(), self.exponent());
        write!(f, "{mantissa} * 2^{exponent}")
    }
}

/// The significand in binary as `X.XXXX` and the exponent of its leading bit.
fn format_mantissa_with_point(significand: &BigUint, exponent: &BigInt) -> (String, BigInt) {
    let bits = format!("{significand:b}");
    let formatted = if bits.len() == 1 {
        format!("{bits}.0")
    } else {
        format!("{}.{}", &bits[0..1], &bits[1..])
    };
    (formatted, exponent + BigInt::from(bits.len() - 1))
}
