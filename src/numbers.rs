/* Calc-rs (c) 2025 Nathaniel Clark
 *
 * This source code is subject to the terms of the GPL v2. See LICENCE file.
 */

//! Exact decimal numbers.
//!
//! A [`Number`] is `mantissa × 10^exponent` with an arbitrary size integer
//! mantissa.  Every constructor and every operation rounds the mantissa to
//! the number's precision (significant digits, half away from zero) and
//! strips trailing zeros, so two equal values always have the same
//! representation.

use crate::error::{CalcError, Result};
use num_traits::ToPrimitive;
use rug::{
    ops::{Pow, RemRounding},
    Integer,
};
use std::cmp::Ordering;

pub mod sci;
pub mod word;

/// Largest decimal exponent a result may carry before it is an `Overflow`
pub const MAX_EXPONENT: i64 = 9999;

/// Factorials above this are far beyond `MAX_EXPONENT`
const MAX_FACTORIAL: u32 = 3248;

/// Integer exponents up to this are computed exactly
const MAX_EXACT_POWER: u32 = 1024;

#[derive(
    clap::ValueEnum,
    Debug,
    Default,
    Copy,
    Clone,
    PartialEq,
    Eq,
    strum_macros::Display,
    strum_macros::EnumIter,
)]
#[clap(rename_all = "lower")]
#[strum(serialize_all = "lowercase")]
pub enum Mode {
    #[default]
    Standard,
    Scientific,
    Programmer,
}

impl Mode {
    /// Significant digits a number carries in this mode
    pub fn precision(self) -> u32 {
        match self {
            Mode::Standard => 16,
            Mode::Scientific => 32,
            Mode::Programmer => 64,
        }
    }
}

#[derive(
    clap::ValueEnum,
    Debug,
    Default,
    Copy,
    Clone,
    PartialEq,
    Eq,
    strum_macros::Display,
    strum_macros::EnumIter,
)]
#[clap(rename_all = "lower")]
#[strum(serialize_all = "lowercase")]
pub enum Radix {
    #[default]
    Decimal,
    Hex,
    Binary,
    Octal,
}

impl From<Radix> for i32 {
    fn from(r: Radix) -> Self {
        match r {
            Radix::Decimal => 10,
            Radix::Hex => 16,
            Radix::Binary => 2,
            Radix::Octal => 8,
        }
    }
}

impl From<Radix> for u32 {
    fn from(r: Radix) -> Self {
        i32::from(r) as u32
    }
}

#[derive(
    clap::ValueEnum,
    Debug,
    Default,
    Copy,
    Clone,
    PartialEq,
    Eq,
    strum_macros::Display,
    strum_macros::EnumIter,
)]
#[clap(rename_all = "lower")]
#[strum(serialize_all = "lowercase")]
pub enum AngleUnit {
    #[default]
    #[clap(alias = "deg")]
    Degrees,
    #[clap(alias = "rad")]
    Radians,
    #[clap(alias = "grad")]
    Gradians,
}

impl AngleUnit {
    /// Size of a full turn, `None` for radians
    fn full_turn(self) -> Option<i64> {
        match self {
            AngleUnit::Degrees => Some(360),
            AngleUnit::Gradians => Some(400),
            AngleUnit::Radians => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Number {
    mantissa: Integer,
    exponent: i32,
    precision: u32,
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        self.mantissa == other.mantissa && self.exponent == other.exponent
    }
}

impl Eq for Number {}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Number {
    fn cmp(&self, other: &Self) -> Ordering {
        let (a, b, _) = align(self, other);
        a.cmp(&b)
    }
}

fn ten_pow(n: u32) -> Integer {
    Integer::from(Integer::u_pow_u(10, n))
}

/// Count of decimal digits in `m`, 1 for zero
fn digit_count(m: &Integer) -> u32 {
    if *m == 0 {
        return 1;
    }
    // bits * log10(2) is exact to within one digit
    let estimate = ((m.significant_bits() as f64) * std::f64::consts::LOG10_2) as u32;
    let estimate = estimate.max(1);
    let abs = Integer::from(m.abs_ref());
    if abs >= ten_pow(estimate) {
        estimate + 1
    } else {
        estimate
    }
}

/// Bring both mantissas to the smaller exponent
fn align(a: &Number, b: &Number) -> (Integer, Integer, i64) {
    let e = a.exponent.min(b.exponent) as i64;
    let ma = Integer::from(&a.mantissa * &ten_pow((a.exponent as i64 - e) as u32));
    let mb = Integer::from(&b.mantissa * &ten_pow((b.exponent as i64 - e) as u32));
    (ma, mb, e)
}

impl Number {
    pub fn zero(precision: u32) -> Self {
        Self {
            mantissa: Integer::new(),
            exponent: 0,
            precision,
        }
    }

    pub fn one(precision: u32) -> Self {
        Self::from_integer(1, precision)
    }

    /// Integers are exact as long as they fit the precision
    pub fn from_integer<T: Into<Integer>>(value: T, precision: u32) -> Self {
        let (mantissa, exponent) = Self::round(value.into(), 0, precision);
        Self {
            mantissa,
            exponent: exponent as i32,
            precision,
        }
    }

    /// `mantissa × 10^exponent`, rounded to `precision`
    pub fn from_parts(mantissa: Integer, exponent: i64, precision: u32) -> Result<Self> {
        let (mantissa, exponent) = Self::round(mantissa, exponent, precision);
        let n = Self {
            mantissa,
            exponent: exponent.clamp(i32::MIN as i64, i32::MAX as i64) as i32,
            precision,
        };
        if !n.is_zero() && n.magnitude().abs() > MAX_EXPONENT {
            return Err(CalcError::Overflow);
        }
        Ok(n)
    }

    /// Round half away from zero to `precision` significant digits, then
    /// strip trailing zeros.
    fn round(mut mantissa: Integer, mut exponent: i64, precision: u32) -> (Integer, i64) {
        if mantissa == 0 {
            return (mantissa, 0);
        }
        let digits = digit_count(&mantissa);
        if digits > precision {
            let drop = digits - precision;
            let (q, _) = mantissa.div_rem_round(ten_pow(drop));
            mantissa = q;
            exponent += drop as i64;
        }
        while mantissa.is_divisible_u(10) {
            mantissa.div_exact_u_mut(10);
            exponent += 1;
        }
        (mantissa, exponent)
    }

    pub fn precision(&self) -> u32 {
        self.precision
    }

    /// Same value carried at a different precision
    pub fn with_precision(&self, precision: u32) -> Result<Self> {
        Self::from_parts(self.mantissa.clone(), self.exponent as i64, precision)
    }

    pub fn mantissa(&self) -> &Integer {
        &self.mantissa
    }

    pub fn exponent(&self) -> i32 {
        self.exponent
    }

    /// Significant digits, most significant first, without sign
    pub fn digits(&self) -> String {
        Integer::from(self.mantissa.abs_ref()).to_string_radix(10)
    }

    /// Decimal exponent of the leading digit (`d.ddd × 10^magnitude`)
    pub fn magnitude(&self) -> i64 {
        self.exponent as i64 + digit_count(&self.mantissa) as i64 - 1
    }

    pub fn is_zero(&self) -> bool {
        self.mantissa == 0
    }

    pub fn is_negative(&self) -> bool {
        self.mantissa < 0
    }

    pub fn is_integer(&self) -> bool {
        self.exponent >= 0
    }

    /// Integer part, truncated toward zero
    pub fn to_integer(&self) -> Integer {
        if self.exponent >= 0 {
            Integer::from(&self.mantissa * &ten_pow(self.exponent as u32))
        } else if -(self.exponent as i64) > digit_count(&self.mantissa) as i64 {
            Integer::new()
        } else {
            let (q, _) = self.mantissa.clone().div_rem(ten_pow((-self.exponent) as u32));
            q
        }
    }

    pub fn trunc(&self) -> Self {
        Self::from_integer(self.to_integer(), self.precision)
    }

    pub fn floor(&self) -> Self {
        let int = self.to_integer();
        if self.is_negative() && !self.is_integer() {
            Self::from_integer(int - 1, self.precision)
        } else {
            Self::from_integer(int, self.precision)
        }
    }

    pub fn ceil(&self) -> Self {
        let int = self.to_integer();
        if !self.is_negative() && !self.is_integer() {
            Self::from_integer(int + 1, self.precision)
        } else {
            Self::from_integer(int, self.precision)
        }
    }

    /// Round to `places` digits after the decimal point
    pub fn round_places(&self, places: u32) -> Self {
        if self.exponent >= -(places as i32) {
            return self.clone();
        }
        let drop = (-(self.exponent as i64) - places as i64) as u32;
        let (q, _) = self.mantissa.clone().div_rem_round(ten_pow(drop));
        let (mantissa, exponent) = Self::round(q, -(places as i64), self.precision);
        Self {
            mantissa,
            exponent: exponent as i32,
            precision: self.precision,
        }
    }

    pub fn negate(&self) -> Self {
        Self {
            mantissa: Integer::from(-&self.mantissa),
            exponent: self.exponent,
            precision: self.precision,
        }
    }

    pub fn abs(&self) -> Self {
        Self {
            mantissa: Integer::from(self.mantissa.abs_ref()),
            exponent: self.exponent,
            precision: self.precision,
        }
    }

    pub fn add(&self, other: &Self) -> Result<Self> {
        if other.is_zero() {
            return self.with_precision(self.precision);
        }
        if self.is_zero() {
            return other.with_precision(self.precision);
        }
        // Too far apart for the smaller to reach the rounding digit
        let gap = self.magnitude() - other.magnitude();
        if gap > self.precision as i64 + 2 {
            return Ok(self.clone());
        }
        if -gap > self.precision as i64 + 2 {
            return other.with_precision(self.precision);
        }
        let (a, b, e) = align(self, other);
        Self::from_parts(a + b, e, self.precision)
    }

    pub fn subtract(&self, other: &Self) -> Result<Self> {
        self.add(&other.negate())
    }

    pub fn multiply(&self, other: &Self) -> Result<Self> {
        Self::from_parts(
            Integer::from(&self.mantissa * &other.mantissa),
            self.exponent as i64 + other.exponent as i64,
            self.precision,
        )
    }

    pub fn divide(&self, other: &Self) -> Result<Self> {
        if other.is_zero() {
            return Err(if self.is_zero() {
                CalcError::Undefined
            } else {
                CalcError::DivisionByZero
            });
        }
        if self.is_zero() {
            return Ok(Self::zero(self.precision));
        }
        // Two guard digits past the precision
        let shift = (self.precision as i64 + 2 + digit_count(&other.mantissa) as i64
            - digit_count(&self.mantissa) as i64)
            .max(0) as u32;
        let numerator = Integer::from(&self.mantissa * &ten_pow(shift));
        let (q, r) = numerator.div_rem(other.mantissa.clone());
        // Sticky digit so an inexact quotient never looks like a tie
        let q = if r == 0 {
            q
        } else {
            let sticky = if q < 0 { -1 } else { 1 };
            q * 10 + sticky
        };
        let extra = if r == 0 { 0 } else { 1 };
        Self::from_parts(
            q,
            self.exponent as i64 - other.exponent as i64 - shift as i64 - extra,
            self.precision,
        )
    }

    /// Modulus after division, the sign of the result follows the divisor
    pub fn modulo(&self, other: &Self) -> Result<Self> {
        if other.is_zero() {
            return Err(if self.is_zero() {
                CalcError::Undefined
            } else {
                CalcError::DivisionByZero
            });
        }
        let (a, b, e) = align(self, other);
        Self::from_parts(a.rem_floor(b), e, self.precision)
    }

    pub fn reciprocal(&self) -> Result<Self> {
        Self::one(self.precision).divide(self)
    }

    pub fn square(&self) -> Result<Self> {
        self.multiply(self)
    }

    pub fn cube(&self) -> Result<Self> {
        self.multiply(self)?.multiply(self)
    }

    /// `x / 100`
    pub fn percent(&self) -> Result<Self> {
        Self::from_parts(
            self.mantissa.clone(),
            self.exponent as i64 - 2,
            self.precision,
        )
    }

    /// `10^x`, exact for integer `x`
    pub fn pow10(&self) -> Result<Self> {
        if self.is_integer() {
            let e = self.to_i64().ok_or(CalcError::Overflow)?;
            return Self::from_parts(Integer::from(1), e, self.precision);
        }
        sci::pow10(self)
    }

    pub fn pow(&self, exponent: &Self) -> Result<Self> {
        if exponent.is_zero() {
            // 0 ^ 0 is 1 as well
            return Ok(Self::one(self.precision));
        }
        if self.is_zero() {
            return if exponent.is_negative() {
                Err(CalcError::DivisionByZero)
            } else {
                Ok(Self::zero(self.precision))
            };
        }
        if exponent.is_integer() {
            let e = exponent.to_integer();
            if let Some(n) = Integer::from(e.abs_ref()).to_u32() {
                if n <= MAX_EXACT_POWER {
                    return self.pow_exact(n, e < 0);
                }
            }
            let positive = sci::pow(&self.abs(), exponent)?;
            return Ok(if self.is_negative() && e.is_odd() {
                positive.negate()
            } else {
                positive
            });
        }
        if self.is_negative() {
            return Err(CalcError::InvalidInput);
        }
        sci::pow(self, exponent)
    }

    fn pow_exact(&self, n: u32, negative: bool) -> Result<Self> {
        // Rough guard before building an enormous mantissa
        if (self.magnitude().abs() + 1) * n as i64 > 2 * MAX_EXPONENT {
            return Err(CalcError::Overflow);
        }
        let mantissa = self.mantissa.clone().pow(n);
        // The exact power is rounded once, an exact reciprocal later
        let wide = self.precision.max(digit_count(&mantissa));
        let value = Self::from_parts(mantissa, self.exponent as i64 * n as i64, wide)?;
        if negative {
            Self::one(self.precision).divide(&value)
        } else {
            value.with_precision(self.precision)
        }
    }

    /// `y`-th root of `self`; odd roots of negatives stay real
    pub fn root(&self, degree: &Self) -> Result<Self> {
        if degree.is_zero() {
            return Err(CalcError::InvalidInput);
        }
        if self.is_zero() {
            return if degree.is_negative() {
                Err(CalcError::DivisionByZero)
            } else {
                Ok(Self::zero(self.precision))
            };
        }
        if self.is_negative() {
            if degree.is_integer() && degree.to_integer().is_odd() {
                return Ok(sci::root(&self.abs(), degree)?.negate());
            }
            return Err(CalcError::InvalidInput);
        }
        sci::root(self, degree)
    }

    pub fn factorial(&self) -> Result<Self> {
        if self.is_negative() {
            return Err(CalcError::InvalidInput);
        }
        if !self.is_integer() {
            return Err(CalcError::Overflow);
        }
        let n = self
            .to_u32()
            .filter(|n| *n <= MAX_FACTORIAL)
            .ok_or(CalcError::Overflow)?;
        Self::from_parts(Integer::from(Integer::factorial(n)), 0, self.precision)
    }

    /// `log_base(self)`
    pub fn log_base(&self, base: &Self) -> Result<Self> {
        sci::log_base(self, base)
    }

    pub fn pow2(&self) -> Result<Self> {
        Self::from_integer(2, self.precision).pow(self)
    }

    /// Decimal degrees as `d.mmss`: 1.5 becomes 1.3
    pub fn to_dms(&self) -> Result<Self> {
        self.shift_sexagesimal(60, 100)
    }

    /// `d.mmss` back to decimal degrees
    pub fn dms_to_degrees(&self) -> Result<Self> {
        self.shift_sexagesimal(100, 60)
    }

    /// Scale the fraction by `up` twice (minutes, then seconds) and place
    /// each part back as a fraction of `down`
    fn shift_sexagesimal(&self, up: i32, down: i32) -> Result<Self> {
        let up = Self::from_integer(up, self.precision);
        let down = Self::from_integer(down, self.precision);
        let degrees = self.trunc();
        let minutes = self.subtract(&degrees)?.multiply(&up)?;
        let whole_minutes = minutes.trunc();
        let seconds = minutes.subtract(&whole_minutes)?.multiply(&up)?;
        let tail = whole_minutes.add(&seconds.divide(&down)?)?.divide(&down)?;
        degrees.add(&tail)
    }
}

impl ToPrimitive for Number {
    fn to_i64(&self) -> Option<i64> {
        self.is_integer().then(|| self.to_integer().to_i64()).flatten()
    }

    fn to_u64(&self) -> Option<u64> {
        self.is_integer().then(|| self.to_integer().to_u64()).flatten()
    }

    fn to_f64(&self) -> Option<f64> {
        format!("{}e{}", self.mantissa, self.exponent).parse().ok()
    }
}

impl std::fmt::Display for Number {
    /// Plain scientific form, `-1.25e3`; front-ends use `display::format`
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let digits = self.digits();
        let sign = if self.is_negative() { "-" } else { "" };
        let (head, tail) = digits.split_at(1);
        if tail.is_empty() {
            write!(f, "{sign}{head}e{}", self.magnitude())
        } else {
            write!(f, "{sign}{head}.{tail}e{}", self.magnitude())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn n(s: &str) -> Number {
        Number::parse_plain(s, 16)
    }

    impl Number {
        /// Test helper: "12.5", "-0.003", "4e7"
        pub(crate) fn parse_plain(s: &str, precision: u32) -> Number {
            let (body, exp) = match s.split_once('e') {
                Some((b, e)) => (b, e.parse::<i64>().unwrap()),
                None => (s, 0),
            };
            let (int, frac) = body.split_once('.').unwrap_or((body, ""));
            let m: Integer = format!("{int}{frac}").parse().unwrap();
            Number::from_parts(m, exp - frac.len() as i64, precision).unwrap()
        }
    }

    #[test]
    fn floor_ceil_and_angle_notation() {
        assert_eq!(n("2.5").floor(), n("2"));
        assert_eq!(n("-2.5").floor(), n("-3"));
        assert_eq!(n("-2").floor(), n("-2"));
        assert_eq!(n("2.1").ceil(), n("3"));
        assert_eq!(n("-2.9").ceil(), n("-2"));
        assert_eq!(n("0.25").ceil(), n("1"));
        assert_eq!(n("1.5").to_dms().unwrap(), n("1.3"));
        assert_eq!(n("-10.25").to_dms().unwrap(), n("-10.15"));
        assert_eq!(n("1.303").dms_to_degrees().unwrap(), n("1.5083333333333333"));
        assert_eq!(n("3").pow2().unwrap(), n("8"));
        assert_eq!(n("-1").pow2().unwrap(), n("0.5"));
    }

    #[test]
    fn normalizes_trailing_zeros() {
        let a = Number::from_integer(1200, 16);
        assert_eq!(a.mantissa(), &Integer::from(12));
        assert_eq!(a.exponent(), 2);
        assert_eq!(a, n("1.2e3"));
        assert_eq!(Number::zero(16).magnitude(), 0);
    }

    #[test]
    fn rounds_half_away_from_zero() {
        let a = Number::from_parts(Integer::from(125), -2, 2).unwrap();
        assert_eq!(a, Number::from_parts(Integer::from(13), -1, 2).unwrap());
        let b = Number::from_parts(Integer::from(-125), -2, 2).unwrap();
        assert_eq!(b, Number::from_parts(Integer::from(-13), -1, 2).unwrap());
        let c = Number::from_parts(Integer::from(9999), 0, 3).unwrap();
        assert_eq!(c, Number::from_integer(10000, 3));
    }

    #[test]
    fn exact_decimal_arithmetic() {
        assert_eq!(n("0.1").add(&n("0.2")).unwrap(), n("0.3"));
        assert_eq!(n("1.1").multiply(&n("1.1")).unwrap(), n("1.21"));
        assert_eq!(n("3").subtract(&n("6")).unwrap(), n("-3"));
        assert_eq!(n("1").divide(&n("8")).unwrap(), n("0.125"));
        assert_eq!(n("1").divide(&n("3")).unwrap(), n("0.3333333333333333"));
        assert_eq!(n("2").divide(&n("3")).unwrap(), n("0.6666666666666667"));
        assert_eq!(n("-2").divide(&n("3")).unwrap(), n("-0.6666666666666667"));
    }

    #[test]
    fn far_apart_addition_keeps_larger() {
        let big = n("1e20");
        assert_eq!(big.add(&n("1")).unwrap(), big);
        assert_eq!(n("1").add(&big).unwrap(), big);
    }

    #[test]
    fn division_errors() {
        assert_eq!(n("9").divide(&n("0")), Err(CalcError::DivisionByZero));
        assert_eq!(n("0").divide(&n("0")), Err(CalcError::Undefined));
        assert_eq!(n("0").reciprocal(), Err(CalcError::DivisionByZero));
    }

    #[test]
    fn modulo_follows_divisor_sign() {
        assert_eq!(n("7").modulo(&n("3")).unwrap(), n("1"));
        assert_eq!(n("-7").modulo(&n("3")).unwrap(), n("2"));
        assert_eq!(n("7").modulo(&n("-3")).unwrap(), n("-2"));
        assert_eq!(n("5.5").modulo(&n("2")).unwrap(), n("1.5"));
    }

    #[test]
    fn exponent_window() {
        let tiny = n("1e-9999");
        assert_eq!(tiny.divide(&n("10")), Err(CalcError::Overflow));
        let huge = n("1e9999");
        assert_eq!(huge.multiply(&n("10")), Err(CalcError::Overflow));
    }

    #[test]
    fn powers() {
        assert_eq!(n("5").pow(&n("2")).unwrap(), n("25"));
        assert_eq!(n("5").pow(&n("0")).unwrap(), n("1"));
        assert_eq!(n("0").pow(&n("0")).unwrap(), n("1"));
        assert_eq!(n("2").pow(&n("-2")).unwrap(), n("0.25"));
        assert_eq!(n("-2").pow(&n("3")).unwrap(), n("-8"));
        assert_eq!(n("0").pow(&n("-1")), Err(CalcError::DivisionByZero));
        assert_eq!(n("-8").pow(&n("0.5")), Err(CalcError::InvalidInput));
        assert_eq!(n("5").pow10().unwrap(), n("100000"));
    }

    #[test]
    fn roots() {
        assert_eq!(n("8").root(&n("3")).unwrap(), n("2"));
        assert_eq!(n("-27").root(&n("3")).unwrap(), n("-3"));
        assert_eq!(n("-16").root(&n("2")), Err(CalcError::InvalidInput));
        assert_eq!(n("4").root(&n("0")), Err(CalcError::InvalidInput));
    }

    #[test]
    fn factorials() {
        assert_eq!(n("5").factorial().unwrap(), n("120"));
        assert_eq!(n("0").factorial().unwrap(), n("1"));
        assert_eq!(n("2.5").factorial(), Err(CalcError::Overflow));
        assert_eq!(n("-1").factorial(), Err(CalcError::InvalidInput));
        assert_eq!(n("100000").factorial(), Err(CalcError::Overflow));
        // 20! has 19 digits, rounded to 16
        assert_eq!(n("20").factorial().unwrap(), n("2.432902008176640e18"));
    }

    #[test]
    fn truncation_and_places() {
        assert_eq!(n("-7.9").to_integer(), Integer::from(-7));
        assert_eq!(n("0.001").to_integer(), Integer::from(0));
        assert_eq!(n("12.345").round_places(2), n("12.35"));
        assert_eq!(n("1e-40").round_places(32), Number::zero(16));
        assert_eq!(n("42").to_u64(), Some(42));
        assert_eq!(n("4.2").to_u64(), None);
    }

    #[test]
    fn ordering() {
        assert!(n("0.5") < n("1"));
        assert!(n("-3") < n("-2.5"));
        assert_eq!(n("10").cmp(&n("1e1")), Ordering::Equal);
    }

    #[test]
    fn display_is_plain_scientific() {
        assert_eq!(n("-1250").to_string(), "-1.25e3");
        assert_eq!(n("7").to_string(), "7e0");
    }
}
