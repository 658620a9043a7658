/* Calc-rs (c) 2025 Nathaniel Clark
 *
 * This source code is subject to the terms of the GPL v2. See LICENCE file.
 */

//! Fixed width integers for programmer mode.
//!
//! Values are kept as plain signed integers; a [`Word`] knows how to wrap
//! them into its range and how to move between a value and the unsigned
//! bit pattern shown in hex, octal and binary.

use crate::error::{CalcError, Result};
use rug::{ops::RemRounding, Integer};

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
#[strum(serialize_all = "UPPERCASE")]
pub enum WordSize {
    Byte,
    Word,
    DWord,
    #[default]
    QWord,
}

impl WordSize {
    pub fn bits(self) -> u32 {
        match self {
            WordSize::Byte => 8,
            WordSize::Word => 16,
            WordSize::DWord => 32,
            WordSize::QWord => 64,
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
#[clap(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Signedness {
    Unsigned,
    OnesComplement,
    #[default]
    TwosComplement,
}

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct Word {
    pub size: WordSize,
    pub signedness: Signedness,
}

fn pow2(n: u32) -> Integer {
    Integer::from(Integer::u_pow_u(2, n))
}

impl Word {
    pub fn new(size: WordSize, signedness: Signedness) -> Self {
        Self { size, signedness }
    }

    pub fn bits(&self) -> u32 {
        self.size.bits()
    }

    /// All `bits()` set
    pub fn mask(&self) -> Integer {
        pow2(self.bits()) - 1
    }

    pub fn min(&self) -> Integer {
        let half = pow2(self.bits() - 1);
        match self.signedness {
            Signedness::Unsigned => Integer::new(),
            Signedness::OnesComplement => -Integer::from(half - 1),
            Signedness::TwosComplement => -half,
        }
    }

    pub fn max(&self) -> Integer {
        match self.signedness {
            Signedness::Unsigned => self.mask(),
            _ => pow2(self.bits() - 1) - 1,
        }
    }

    pub fn contains(&self, v: &Integer) -> bool {
        *v >= self.min() && *v <= self.max()
    }

    /// Bring any integer into range the way the hardware would
    pub fn wrap(&self, v: Integer) -> Integer {
        let w = self.bits();
        match self.signedness {
            Signedness::Unsigned => v.keep_bits(w),
            Signedness::TwosComplement => v.keep_signed_bits(w),
            Signedness::OnesComplement => {
                // End-around carry: arithmetic modulo 2^w - 1
                let h = pow2(w - 1) - 1;
                Integer::from(v + &h).rem_euc(self.mask()) - h
            }
        }
    }

    /// Unsigned bit pattern of an in-range value
    pub fn to_pattern(&self, v: &Integer) -> Integer {
        if *v >= 0 {
            return v.clone();
        }
        match self.signedness {
            Signedness::OnesComplement => self.mask() ^ Integer::from(v.abs_ref()),
            _ => Integer::from(v + pow2(self.bits())),
        }
    }

    /// Value of a bit pattern, inverse of [`Word::to_pattern`]
    pub fn from_pattern(&self, p: Integer) -> Integer {
        let p = p.keep_bits(self.bits());
        if self.signedness == Signedness::Unsigned || !p.get_bit(self.bits() - 1) {
            return p;
        }
        match self.signedness {
            Signedness::OnesComplement => -(self.mask() ^ p),
            _ => p - pow2(self.bits()),
        }
    }

    fn bitwise(&self, a: &Integer, b: &Integer, f: impl Fn(Integer, Integer) -> Integer) -> Integer {
        let p = f(self.to_pattern(a), self.to_pattern(b)) & self.mask();
        self.from_pattern(p)
    }

    pub fn add(&self, a: &Integer, b: &Integer) -> Integer {
        self.wrap(Integer::from(a + b))
    }

    pub fn sub(&self, a: &Integer, b: &Integer) -> Integer {
        self.wrap(Integer::from(a - b))
    }

    pub fn mul(&self, a: &Integer, b: &Integer) -> Integer {
        self.wrap(Integer::from(a * b))
    }

    /// Truncating division
    pub fn div(&self, a: &Integer, b: &Integer) -> Result<Integer> {
        if *b == 0 {
            return Err(if *a == 0 {
                CalcError::Undefined
            } else {
                CalcError::DivisionByZero
            });
        }
        Ok(self.wrap(Integer::from(a / b)))
    }

    /// Remainder of truncating division, sign of the dividend
    pub fn rem(&self, a: &Integer, b: &Integer) -> Result<Integer> {
        if *b == 0 {
            return Err(if *a == 0 {
                CalcError::Undefined
            } else {
                CalcError::DivisionByZero
            });
        }
        Ok(self.wrap(Integer::from(a % b)))
    }

    pub fn and(&self, a: &Integer, b: &Integer) -> Integer {
        self.bitwise(a, b, |x, y| x & y)
    }

    pub fn or(&self, a: &Integer, b: &Integer) -> Integer {
        self.bitwise(a, b, |x, y| x | y)
    }

    pub fn xor(&self, a: &Integer, b: &Integer) -> Integer {
        self.bitwise(a, b, |x, y| x ^ y)
    }

    pub fn nand(&self, a: &Integer, b: &Integer) -> Integer {
        self.not(&self.and(a, b))
    }

    pub fn nor(&self, a: &Integer, b: &Integer) -> Integer {
        self.not(&self.or(a, b))
    }

    pub fn not(&self, a: &Integer) -> Integer {
        self.from_pattern(self.to_pattern(a) ^ self.mask())
    }

    fn count(&self, n: &Integer) -> Result<Option<u32>> {
        if *n < 0 {
            return Err(CalcError::InvalidInput);
        }
        Ok(n.to_u32().filter(|n| *n < self.bits()))
    }

    pub fn shl(&self, a: &Integer, n: &Integer) -> Result<Integer> {
        Ok(match self.count(n)? {
            Some(n) => self.from_pattern(self.to_pattern(a) << n),
            None => Integer::new(),
        })
    }

    /// Arithmetic shift, the sign bit is copied in for signed words
    pub fn shr(&self, a: &Integer, n: &Integer) -> Result<Integer> {
        if self.signedness == Signedness::Unsigned {
            return self.shr_logical(a, n);
        }
        let fill = || if *a < 0 { Integer::from(-1) } else { Integer::new() };
        Ok(match self.count(n)? {
            // Floor shift of the signed value copies the sign
            Some(n) if self.signedness == Signedness::TwosComplement => Integer::from(a >> n),
            Some(n) => {
                let p = self.to_pattern(a);
                let spill = if *a < 0 {
                    self.mask() ^ (self.mask() >> n)
                } else {
                    Integer::new()
                };
                self.from_pattern((p >> n) | spill)
            }
            None if self.signedness == Signedness::TwosComplement => fill(),
            // All ones is zero in one's complement
            None => Integer::new(),
        })
    }

    /// Zero-filling shift of the bit pattern
    pub fn shr_logical(&self, a: &Integer, n: &Integer) -> Result<Integer> {
        Ok(match self.count(n)? {
            Some(n) => self.from_pattern(self.to_pattern(a) >> n),
            None => Integer::new(),
        })
    }

    fn rotation(&self, n: &Integer) -> Result<u32> {
        if *n < 0 {
            return Err(CalcError::InvalidInput);
        }
        let r = Integer::from(n % self.bits());
        Ok(r.to_u32().unwrap_or(0))
    }

    pub fn rol(&self, a: &Integer, n: &Integer) -> Result<Integer> {
        let r = self.rotation(n)?;
        let p = self.to_pattern(a);
        let w = self.bits();
        let rotated = (Integer::from(&p << r) | (p >> (w - r))) & self.mask();
        Ok(self.from_pattern(rotated))
    }

    pub fn ror(&self, a: &Integer, n: &Integer) -> Result<Integer> {
        let r = self.rotation(n)?;
        let w = self.bits();
        self.rol(a, &Integer::from((w - r) % w))
    }
}
