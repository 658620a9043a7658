/* Calc-rs (c) 2025 Nathaniel Clark
 *
 * This source code is subject to the terms of the GPL v2. See LICENCE file.
 */

//! Turning numbers into display text and typed digits back into numbers.

use crate::{
    error::{CalcError, Result},
    numbers::{word::Word, Number, Radix},
};
use itertools::Itertools;
use regex::Regex;
use rug::Integer;

/// Maximum digits in a typed exponent
pub const MAX_EXPONENT_DIGITS: usize = 4;

/// Numeral conventions, the only locale dependent part of the output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatOptions {
    pub decimal: char,
    pub group: char,
    /// Group sizes from the decimal point outwards; a trailing 0 repeats
    /// the previous size, e.g. `[3, 0]` or `[3, 2, 0]`
    pub grouping: Vec<u32>,
    pub show_grouping: bool,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            decimal: '.',
            group: ',',
            grouping: vec![3, 0],
            show_grouping: true,
        }
    }
}

impl FormatOptions {
    /// Parse a `3;2;0` style grouping list
    pub fn parse_grouping(s: &str) -> Result<Vec<u32>> {
        s.split(';')
            .map(|g| g.trim().parse::<u32>().map_err(|_| CalcError::InvalidInput))
            .collect()
    }
}

fn digit_grouping(radix: Radix) -> (usize, char) {
    match radix {
        Radix::Octal => (3, ' '),
        _ => (4, ' '),
    }
}

/// Insert `sep` into a string of integer digits following `pattern`
pub fn group_digits(digits: &str, pattern: &[u32], sep: char) -> String {
    let mut groups = Vec::new();
    let mut rest = digits;
    let mut last = 0;
    let mut i = 0;
    loop {
        let size = match pattern.get(i) {
            Some(0) => last,
            Some(n) => {
                last = *n as usize;
                i += 1;
                last
            }
            None => 0,
        };
        if size == 0 || rest.len() <= size {
            groups.push(rest);
            break;
        }
        let (head, tail) = rest.split_at(rest.len() - size);
        groups.push(tail);
        rest = head;
    }
    groups.iter().rev().join(&sep.to_string())
}

fn group_integer(digits: &str, radix: Radix, opts: &FormatOptions) -> String {
    if !opts.show_grouping {
        return digits.to_string();
    }
    match radix {
        Radix::Decimal => group_digits(digits, &opts.grouping, opts.group),
        r => {
            let (size, sep) = digit_grouping(r);
            group_digits(digits, &[size as u32, 0], sep)
        }
    }
}

fn scientific(n: &Number, opts: &FormatOptions) -> String {
    let digits = n.digits();
    let (head, tail) = digits.split_at(1);
    let e = n.magnitude();
    format!(
        "{}{head}{}{tail}e{}{}",
        if n.is_negative() { "-" } else { "" },
        opts.decimal,
        if e < 0 { '-' } else { '+' },
        e.abs()
    )
}

fn fixed(n: &Number, opts: &FormatOptions) -> String {
    let digits = n.digits();
    let exponent = n.exponent() as i64;
    let magnitude = n.magnitude();
    let (int, frac) = if exponent >= 0 {
        (format!("{digits}{}", "0".repeat(exponent as usize)), String::new())
    } else if magnitude >= 0 {
        let (i, f) = digits.split_at(magnitude as usize + 1);
        (i.to_string(), f.to_string())
    } else {
        (
            "0".to_string(),
            format!("{}{digits}", "0".repeat((-magnitude - 1) as usize)),
        )
    };
    let sign = if n.is_negative() { "-" } else { "" };
    let int = group_integer(&int, Radix::Decimal, opts);
    if frac.is_empty() {
        format!("{sign}{int}")
    } else {
        format!("{sign}{int}{}{frac}", opts.decimal)
    }
}

/// Display text for a decimal value.
///
/// Scientific notation is used when `exponential` is set, when the
/// integer part needs more than `precision` digits, or when a small value
/// would lose digits in fixed notation (below 0.001).
pub fn format(n: &Number, precision: u32, exponential: bool, opts: &FormatOptions) -> String {
    if n.is_zero() {
        return if exponential {
            format!("0{}e+0", opts.decimal)
        } else {
            "0".to_string()
        };
    }
    let magnitude = n.magnitude();
    if exponential || magnitude >= precision as i64 {
        return scientific(n, opts);
    }
    if n.exponent() >= 0 || -(n.exponent() as i64) <= precision as i64 {
        return fixed(n, opts);
    }
    if magnitude >= -3 {
        return fixed(&n.round_places(precision), opts);
    }
    scientific(n, opts)
}

/// Programmer mode text: signed in decimal, the word's unsigned bit
/// pattern in every other radix
pub fn format_word(value: &Integer, word: &Word, radix: Radix, opts: &FormatOptions) -> String {
    if radix == Radix::Decimal {
        let sign = if *value < 0 { "-" } else { "" };
        let digits = Integer::from(value.abs_ref()).to_string();
        return format!("{sign}{}", group_integer(&digits, radix, opts));
    }
    let digits = word
        .to_pattern(value)
        .to_string_radix(radix.into())
        .to_uppercase();
    group_integer(&digits, radix, opts)
}

/// Read display text back into a number.  Group separators are ignored;
/// non-decimal text is read as an integer (a bit pattern in programmer
/// mode).
pub fn parse(text: &str, radix: Radix, precision: u32, opts: &FormatOptions) -> Result<Number> {
    let cleaned: String = text
        .trim()
        .chars()
        .filter(|c| *c != opts.group && !c.is_whitespace())
        .collect();
    if radix != Radix::Decimal {
        let v = Integer::from_str_radix(&cleaned, radix.into())
            .map_err(|_| CalcError::InvalidInput)?;
        return Ok(Number::from_integer(v, precision));
    }
    let pattern = format!(
        r"^(?P<sign>-?)(?P<int>\d*)(?:{}(?P<frac>\d*))?(?:[eE](?P<exp>[+-]?\d+))?$",
        regex::escape(&opts.decimal.to_string())
    );
    let re = Regex::new(&pattern).map_err(|_| CalcError::InvalidInput)?;
    let caps = re.captures(&cleaned).ok_or(CalcError::InvalidInput)?;
    let int = caps.name("int").map_or("", |m| m.as_str());
    let frac = caps.name("frac").map_or("", |m| m.as_str());
    if int.is_empty() && frac.is_empty() {
        return Err(CalcError::InvalidInput);
    }
    let exp: i64 = match caps.name("exp") {
        Some(m) => m.as_str().parse().map_err(|_| CalcError::Overflow)?,
        None => 0,
    };
    let mut mantissa: Integer = format!("{int}{frac}")
        .parse()
        .map_err(|_| CalcError::InvalidInput)?;
    if &caps["sign"] == "-" {
        mantissa = -mantissa;
    }
    Number::from_parts(mantissa, exp - frac.len() as i64, precision)
}

/// The operand being typed, kept as text so trailing zeros and a bare
/// decimal point show up while typing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryBuffer {
    radix: Radix,
    max_digits: usize,
    negative: bool,
    /// Integer digits without leading zeros
    int: String,
    /// `Some` once the decimal point is typed
    frac: Option<String>,
    /// Sign and digits once an exponent is started
    exp: Option<(bool, String)>,
}

impl EntryBuffer {
    pub fn new(radix: Radix, max_digits: usize) -> Self {
        Self {
            radix,
            max_digits,
            negative: false,
            int: String::new(),
            frac: None,
            exp: None,
        }
    }

    pub fn radix(&self) -> Radix {
        self.radix
    }

    /// Nothing but a zero has been typed
    pub fn is_empty(&self) -> bool {
        self.int.is_empty() && self.frac.is_none() && self.exp.is_none() && !self.negative
    }

    fn digit_count(&self) -> usize {
        self.int.len() + self.frac.as_ref().map_or(0, String::len)
    }

    /// Append a digit.  `Ok(false)` when it was ignored (digit limit or a
    /// leading zero), `ModeMismatch` when the digit is not valid in the
    /// radix.
    pub fn try_add_digit(&mut self, c: char) -> Result<bool> {
        let radix: u32 = self.radix.into();
        let Some(value) = c.to_digit(radix) else {
            return Err(CalcError::ModeMismatch);
        };
        let c = std::char::from_digit(value, radix)
            .map(|c| c.to_ascii_uppercase())
            .ok_or(CalcError::ModeMismatch)?;
        if let Some((_, digits)) = self.exp.as_mut() {
            if digits.len() >= MAX_EXPONENT_DIGITS || (digits.is_empty() && c == '0') {
                return Ok(false);
            }
            digits.push(c);
            return Ok(true);
        }
        if self.digit_count() >= self.max_digits {
            return Ok(false);
        }
        match self.frac.as_mut() {
            Some(frac) => frac.push(c),
            None if self.int.is_empty() && c == '0' => return Ok(false),
            None => self.int.push(c),
        }
        Ok(true)
    }

    /// `false` when a point is already there, or it makes no sense
    pub fn add_point(&mut self) -> bool {
        if self.radix != Radix::Decimal || self.frac.is_some() || self.exp.is_some() {
            return false;
        }
        self.frac = Some(String::new());
        true
    }

    pub fn begin_exponent(&mut self) -> bool {
        if self.radix != Radix::Decimal || self.exp.is_some() {
            return false;
        }
        if self.int.is_empty() && self.frac.as_ref().map_or(true, |f| f.is_empty()) {
            self.int.push('1');
        }
        self.exp = Some((false, String::new()));
        true
    }

    /// Flips the exponent's sign while one is being typed, otherwise the
    /// mantissa's
    pub fn toggle_sign(&mut self) {
        match self.exp.as_mut() {
            Some((negative, _)) => *negative = !*negative,
            None => self.negative = !self.negative,
        }
    }

    pub fn backspace(&mut self) {
        if let Some((_, digits)) = self.exp.as_mut() {
            if digits.pop().is_none() {
                self.exp = None;
            }
            return;
        }
        if let Some(frac) = self.frac.as_mut() {
            if frac.pop().is_none() {
                self.frac = None;
            }
            return;
        }
        self.int.pop();
        if self.int.is_empty() {
            self.negative = false;
        }
    }

    /// Typed value in a decimal radix
    pub fn to_number(&self, precision: u32) -> Result<Number> {
        if self.radix != Radix::Decimal {
            return Ok(Number::from_integer(self.to_integer(), precision));
        }
        let frac = self.frac.as_deref().unwrap_or("");
        let digits = format!("{}{frac}", self.int);
        let mut mantissa = if digits.is_empty() {
            Integer::new()
        } else {
            digits.parse().map_err(|_| CalcError::InvalidInput)?
        };
        if self.negative {
            mantissa = -mantissa;
        }
        let exp = match &self.exp {
            Some((_, d)) if d.is_empty() => 0,
            Some((negative, d)) => {
                let e: i64 = d.parse().map_err(|_| CalcError::InvalidInput)?;
                if *negative {
                    -e
                } else {
                    e
                }
            }
            None => 0,
        };
        Number::from_parts(mantissa, exp - frac.len() as i64, precision)
    }

    /// Typed digits as an integer (the raw pattern outside decimal)
    pub fn to_integer(&self) -> Integer {
        let v = if self.int.is_empty() {
            Integer::new()
        } else {
            Integer::from_str_radix(&self.int, self.radix.into()).unwrap_or_default()
        };
        if self.negative {
            -v
        } else {
            v
        }
    }

    /// What the display shows while typing
    pub fn text(&self, opts: &FormatOptions) -> String {
        let int = if self.int.is_empty() { "0" } else { &self.int };
        let mut out = String::new();
        if self.negative {
            out.push('-');
        }
        out.push_str(&group_integer(int, self.radix, opts));
        if let Some(frac) = &self.frac {
            out.push(opts.decimal);
            out.push_str(frac);
        }
        if let Some((negative, digits)) = &self.exp {
            if self.frac.is_none() {
                out.push(opts.decimal);
            }
            let digits = if digits.is_empty() { "0" } else { digits };
            out.push_str(&format!("e{}{digits}", if *negative { '-' } else { '+' }));
        }
        out
    }

    /// Plain text of the typed characters
    pub fn raw(&self) -> String {
        self.text(&FormatOptions {
            show_grouping: false,
            ..FormatOptions::default()
        })
    }
}

/// Append `digit` (or a `.`) to typed text, as the entry buffer would
pub fn parse_digits(buffer: &str, digit: char, radix: Radix, max_digits: usize) -> Result<String> {
    let mut entry = EntryBuffer::new(radix, max_digits);
    for c in buffer.chars().chain(std::iter::once(digit)) {
        match c {
            '.' if !entry.add_point() => return Err(CalcError::InvalidInput),
            '.' => {}
            '-' => entry.toggle_sign(),
            c => {
                entry.try_add_digit(c)?;
            }
        }
    }
    Ok(entry.raw())
}
