/* Calc-rs (c) 2025 Nathaniel Clark
 *
 * This source code is subject to the terms of the GPL v2. See LICENCE file.
 */

//! Transcendental functions.
//!
//! Values are lifted into an MPFR float a little over four bits per decimal
//! digit wide, evaluated there and rounded back to the caller's precision.

use super::{AngleUnit, Number};
use crate::error::{CalcError, Result};
use rug::{float::Constant, ops::Pow, Float, Integer};

const GUARD_BITS: u32 = 64;

fn bits(precision: u32) -> u32 {
    precision * 4 + GUARD_BITS
}

pub(crate) fn to_float(n: &Number) -> Float {
    let prec = bits(n.precision());
    let m = Float::with_val(prec, n.mantissa());
    if n.exponent() >= 0 {
        m * Float::with_val(prec, Integer::from(Integer::u_pow_u(10, n.exponent() as u32)))
    } else {
        m / Float::with_val(prec, Integer::from(Integer::u_pow_u(10, (-n.exponent()) as u32)))
    }
}

pub(crate) fn from_float(f: &Float, precision: u32) -> Result<Number> {
    if f.is_nan() {
        return Err(CalcError::InvalidInput);
    }
    if f.is_infinite() {
        return Err(CalcError::Overflow);
    }
    let Some(exp2) = f.get_exp() else {
        return Ok(Number::zero(precision));
    };
    // |f| >= 2^(exp2 - 1); two spare digits for the final rounding
    let magnitude = ((exp2 as f64 - 1.0) * std::f64::consts::LOG10_2).floor() as i64;
    let shift = precision as i64 + 2 - magnitude;
    let shift = i32::try_from(shift).map_err(|_| CalcError::Overflow)?;
    let scale = Float::with_val(f.prec(), 10).pow(shift);
    let scaled = Float::with_val(f.prec(), f * &scale);
    let mantissa = scaled.to_integer().ok_or(CalcError::Overflow)?;
    Number::from_parts(mantissa, -(shift as i64), precision)
}

fn pi(prec: u32) -> Float {
    Float::with_val(prec, Constant::Pi)
}

pub fn pi_number(precision: u32) -> Result<Number> {
    from_float(&pi(bits(precision)), precision)
}

pub fn e_number(precision: u32) -> Result<Number> {
    from_float(&Float::with_val(bits(precision), 1).exp(), precision)
}

/// Angle in radians, whole turns removed exactly beforehand
fn radians(n: &Number, unit: AngleUnit) -> Result<Float> {
    let Some(turn) = unit.full_turn() else {
        return Ok(to_float(n));
    };
    let reduced = n.modulo(&Number::from_integer(turn, n.precision()))?;
    let prec = bits(n.precision());
    let f = to_float(&reduced);
    Ok(f * pi(prec) * 2 / turn as i32)
}

fn from_radians(f: Float, unit: AngleUnit) -> Float {
    match unit.full_turn() {
        None => f,
        Some(turn) => {
            let prec = f.prec();
            f * turn as i32 / (pi(prec) * 2)
        }
    }
}

/// Trig results are bounded, round them to absolute digits so sin(π) is 0
fn trig_result(f: &Float, precision: u32) -> Result<Number> {
    Ok(from_float(f, precision)?.round_places(precision))
}

pub fn sin(n: &Number, unit: AngleUnit) -> Result<Number> {
    trig_result(&radians(n, unit)?.sin(), n.precision())
}

pub fn cos(n: &Number, unit: AngleUnit) -> Result<Number> {
    trig_result(&radians(n, unit)?.cos(), n.precision())
}

pub fn tan(n: &Number, unit: AngleUnit) -> Result<Number> {
    if let Some(turn) = unit.full_turn() {
        // Odd multiples of a quarter turn
        let half = Number::from_integer(turn / 2, n.precision());
        let quarter = Number::from_integer(turn / 4, n.precision());
        if n.modulo(&half)? == quarter {
            return Err(CalcError::InvalidInput);
        }
    }
    let angle = radians(n, unit)?;
    let cos = trig_result(&angle.clone().cos(), n.precision())?;
    if cos.is_zero() {
        return Err(CalcError::InvalidInput);
    }
    let value = from_float(&angle.tan(), n.precision())?;
    Ok(if value.magnitude() < 0 {
        value.round_places(n.precision())
    } else {
        value
    })
}

fn unit_interval(n: &Number) -> Result<Float> {
    let f = to_float(n);
    if f > 1 || f < -1 {
        return Err(CalcError::InvalidInput);
    }
    Ok(f)
}

pub fn asin(n: &Number, unit: AngleUnit) -> Result<Number> {
    let f = from_radians(unit_interval(n)?.asin(), unit);
    trig_result(&f, n.precision())
}

pub fn acos(n: &Number, unit: AngleUnit) -> Result<Number> {
    let f = from_radians(unit_interval(n)?.acos(), unit);
    trig_result(&f, n.precision())
}

pub fn atan(n: &Number, unit: AngleUnit) -> Result<Number> {
    let f = from_radians(to_float(n).atan(), unit);
    trig_result(&f, n.precision())
}

pub fn sinh(n: &Number) -> Result<Number> {
    from_float(&to_float(n).sinh(), n.precision())
}

pub fn cosh(n: &Number) -> Result<Number> {
    from_float(&to_float(n).cosh(), n.precision())
}

pub fn tanh(n: &Number) -> Result<Number> {
    from_float(&to_float(n).tanh(), n.precision())
}

pub fn asinh(n: &Number) -> Result<Number> {
    from_float(&to_float(n).asinh(), n.precision())
}

pub fn acosh(n: &Number) -> Result<Number> {
    let f = to_float(n);
    if f < 1 {
        return Err(CalcError::InvalidInput);
    }
    from_float(&f.acosh(), n.precision())
}

pub fn atanh(n: &Number) -> Result<Number> {
    let f = to_float(n);
    if f >= 1 || f <= -1 {
        return Err(CalcError::InvalidInput);
    }
    from_float(&f.atanh(), n.precision())
}

/// `1/x`, with zero outside the domain rather than a division by zero
fn inverted(n: &Number) -> Result<Number> {
    if n.is_zero() {
        return Err(CalcError::InvalidInput);
    }
    n.reciprocal()
}

pub fn sec(n: &Number, unit: AngleUnit) -> Result<Number> {
    inverted(&cos(n, unit)?)
}

pub fn csc(n: &Number, unit: AngleUnit) -> Result<Number> {
    inverted(&sin(n, unit)?)
}

/// cos / sin, so a quarter turn gives 0 instead of failing in tan
pub fn cot(n: &Number, unit: AngleUnit) -> Result<Number> {
    let sin = sin(n, unit)?;
    if sin.is_zero() {
        return Err(CalcError::InvalidInput);
    }
    cos(n, unit)?.divide(&sin)
}

pub fn asec(n: &Number, unit: AngleUnit) -> Result<Number> {
    acos(&inverted(n)?, unit)
}

pub fn acsc(n: &Number, unit: AngleUnit) -> Result<Number> {
    asin(&inverted(n)?, unit)
}

pub fn acot(n: &Number, unit: AngleUnit) -> Result<Number> {
    if n.is_zero() {
        let quarter = from_radians(pi(bits(n.precision())) / 2, unit);
        return trig_result(&quarter, n.precision());
    }
    atan(&n.reciprocal()?, unit)
}

pub fn sech(n: &Number) -> Result<Number> {
    inverted(&cosh(n)?)
}

pub fn csch(n: &Number) -> Result<Number> {
    inverted(&sinh(n)?)
}

pub fn coth(n: &Number) -> Result<Number> {
    inverted(&tanh(n)?)
}

pub fn asech(n: &Number) -> Result<Number> {
    acosh(&inverted(n)?)
}

pub fn acsch(n: &Number) -> Result<Number> {
    asinh(&inverted(n)?)
}

pub fn acoth(n: &Number) -> Result<Number> {
    atanh(&inverted(n)?)
}

pub fn sqrt(n: &Number) -> Result<Number> {
    if n.is_negative() {
        return Err(CalcError::InvalidInput);
    }
    from_float(&to_float(n).sqrt(), n.precision())
}

pub fn cbrt(n: &Number) -> Result<Number> {
    from_float(&to_float(n).cbrt(), n.precision())
}

pub fn ln(n: &Number) -> Result<Number> {
    if n.is_negative() || n.is_zero() {
        return Err(CalcError::InvalidInput);
    }
    from_float(&to_float(n).ln(), n.precision())
}

pub fn log10(n: &Number) -> Result<Number> {
    if n.is_negative() || n.is_zero() {
        return Err(CalcError::InvalidInput);
    }
    // Exact powers of ten stay exact
    if n.digits() == "1" {
        return Ok(Number::from_integer(n.magnitude(), n.precision()));
    }
    from_float(&to_float(n).log10(), n.precision())
}

pub(crate) fn log_base(x: &Number, base: &Number) -> Result<Number> {
    if x.is_negative() || x.is_zero() || base.is_negative() || base.is_zero() {
        return Err(CalcError::InvalidInput);
    }
    if *base == Number::one(base.precision()) {
        return Err(CalcError::InvalidInput);
    }
    from_float(&(to_float(x).ln() / to_float(base).ln()), x.precision())
}

pub fn exp(n: &Number) -> Result<Number> {
    from_float(&to_float(n).exp(), n.precision())
}

pub(crate) fn pow10(n: &Number) -> Result<Number> {
    from_float(&to_float(n).exp10(), n.precision())
}

/// `x^y` for positive `x`
pub(crate) fn pow(x: &Number, y: &Number) -> Result<Number> {
    let f = (to_float(x).ln() * to_float(y)).exp();
    from_float(&f, x.precision())
}

/// `x^(1/y)` for positive `x`
pub(crate) fn root(x: &Number, y: &Number) -> Result<Number> {
    let degree = y.to_integer();
    if y.is_integer() && degree > 0 {
        if let Some(k) = degree.to_u32() {
            return from_float(&to_float(x).root(k), x.precision());
        }
    }
    let f = (to_float(x).ln() / to_float(y)).exp();
    from_float(&f, x.precision())
}
