/* Calc-rs (c) 2025 Nathaniel Clark
 *
 * This source code is subject to the terms of the GPL v2. See LICENCE file.
 */

//! Operator table.
//!
//! Every operator the engine knows is a row in one of two static tables:
//! its display symbol, precedence, the modes it may be used in and the
//! numeric function it performs.  The engine never matches on an operator
//! to compute something; it looks the row up.

use crate::{
    error::{CalcError, Result},
    numbers::{sci, word::Word, AngleUnit, Mode, Number},
};
use rug::Integer;

/// What an operator needs to know besides its operands
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct Context {
    pub mode: Mode,
    pub angle: AngleUnit,
    pub word: Word,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, strum_macros::Display, strum_macros::EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Power,
    Root,
    LogBase,
    And,
    Or,
    Xor,
    Nand,
    Nor,
    ShiftLeft,
    ShiftRight,
    ShiftRightLogical,
    RotateLeft,
    RotateRight,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, strum_macros::Display, strum_macros::EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum UnaryOp {
    Negate,
    Reciprocal,
    Square,
    Cube,
    Sqrt,
    CubeRoot,
    Percent,
    Pow10,
    Exp,
    Ln,
    Log,
    Abs,
    Factorial,
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Sinh,
    Cosh,
    Tanh,
    Asinh,
    Acosh,
    Atanh,
    Not,
    Sec,
    Csc,
    Cot,
    Asec,
    Acsc,
    Acot,
    Sech,
    Csch,
    Coth,
    Asech,
    Acsch,
    Acoth,
    Floor,
    Ceil,
    Chop,
    Dms,
    Degrees,
    Pow2,
}

pub type BinaryFn = fn(&Number, &Number, &Context) -> Result<Number>;
pub type UnaryFn = fn(&Number, &Context) -> Result<Number>;

pub struct BinaryEntry {
    pub op: BinaryOp,
    pub symbol: &'static str,
    /// Higher binds tighter
    pub precedence: u8,
    pub modes: &'static [Mode],
    pub apply: BinaryFn,
}

pub struct UnaryEntry {
    pub op: UnaryOp,
    /// Function name wrapped around the operand in the expression
    pub label: &'static str,
    pub modes: &'static [Mode],
    pub apply: UnaryFn,
}

const ALL: &[Mode] = &[Mode::Standard, Mode::Scientific, Mode::Programmer];
const DECIMAL: &[Mode] = &[Mode::Standard, Mode::Scientific];
const SCIENTIFIC: &[Mode] = &[Mode::Scientific];
const PROGRAMMER: &[Mode] = &[Mode::Programmer];

fn word_result(v: Integer) -> Number {
    Number::from_integer(v, Mode::Programmer.precision())
}

/// Integer operation for programmer mode, decimal operation otherwise
fn either(
    a: &Number,
    b: &Number,
    ctx: &Context,
    int: fn(&Word, &Integer, &Integer) -> Integer,
    dec: fn(&Number, &Number) -> Result<Number>,
) -> Result<Number> {
    match ctx.mode {
        Mode::Programmer => Ok(word_result(int(&ctx.word, &a.to_integer(), &b.to_integer()))),
        _ => dec(a, b),
    }
}

fn bits(
    a: &Number,
    b: &Number,
    ctx: &Context,
    f: fn(&Word, &Integer, &Integer) -> Integer,
) -> Result<Number> {
    Ok(word_result(f(&ctx.word, &a.to_integer(), &b.to_integer())))
}

fn try_bits(
    a: &Number,
    b: &Number,
    ctx: &Context,
    f: fn(&Word, &Integer, &Integer) -> Result<Integer>,
) -> Result<Number> {
    Ok(word_result(f(&ctx.word, &a.to_integer(), &b.to_integer())?))
}

static BINARY: [BinaryEntry; 18] = [
    BinaryEntry {
        op: BinaryOp::Add,
        symbol: "+",
        precedence: 2,
        modes: ALL,
        apply: |a, b, ctx| either(a, b, ctx, Word::add, Number::add),
    },
    BinaryEntry {
        op: BinaryOp::Subtract,
        symbol: "−",
        precedence: 2,
        modes: ALL,
        apply: |a, b, ctx| either(a, b, ctx, Word::sub, Number::subtract),
    },
    BinaryEntry {
        op: BinaryOp::Multiply,
        symbol: "×",
        precedence: 4,
        modes: ALL,
        apply: |a, b, ctx| either(a, b, ctx, Word::mul, Number::multiply),
    },
    BinaryEntry {
        op: BinaryOp::Divide,
        symbol: "÷",
        precedence: 4,
        modes: ALL,
        apply: |a, b, ctx| match ctx.mode {
            Mode::Programmer => try_bits(a, b, ctx, Word::div),
            _ => a.divide(b),
        },
    },
    BinaryEntry {
        op: BinaryOp::Modulo,
        symbol: "Mod",
        precedence: 4,
        modes: &[Mode::Scientific, Mode::Programmer],
        apply: |a, b, ctx| match ctx.mode {
            Mode::Programmer => try_bits(a, b, ctx, Word::rem),
            _ => a.modulo(b),
        },
    },
    BinaryEntry {
        op: BinaryOp::Power,
        symbol: "^",
        precedence: 5,
        modes: SCIENTIFIC,
        apply: |a, b, _| a.pow(b),
    },
    BinaryEntry {
        op: BinaryOp::Root,
        symbol: "yroot",
        precedence: 5,
        modes: SCIENTIFIC,
        apply: |a, b, _| a.root(b),
    },
    BinaryEntry {
        op: BinaryOp::LogBase,
        symbol: "log base",
        precedence: 5,
        modes: SCIENTIFIC,
        apply: |a, b, _| a.log_base(b),
    },
    BinaryEntry {
        op: BinaryOp::And,
        symbol: "AND",
        precedence: 1,
        modes: PROGRAMMER,
        apply: |a, b, ctx| bits(a, b, ctx, Word::and),
    },
    BinaryEntry {
        op: BinaryOp::Or,
        symbol: "OR",
        precedence: 0,
        modes: PROGRAMMER,
        apply: |a, b, ctx| bits(a, b, ctx, Word::or),
    },
    BinaryEntry {
        op: BinaryOp::Xor,
        symbol: "XOR",
        precedence: 0,
        modes: PROGRAMMER,
        apply: |a, b, ctx| bits(a, b, ctx, Word::xor),
    },
    BinaryEntry {
        op: BinaryOp::Nand,
        symbol: "NAND",
        precedence: 1,
        modes: PROGRAMMER,
        apply: |a, b, ctx| bits(a, b, ctx, Word::nand),
    },
    BinaryEntry {
        op: BinaryOp::Nor,
        symbol: "NOR",
        precedence: 0,
        modes: PROGRAMMER,
        apply: |a, b, ctx| bits(a, b, ctx, Word::nor),
    },
    BinaryEntry {
        op: BinaryOp::ShiftLeft,
        symbol: "Lsh",
        precedence: 3,
        modes: PROGRAMMER,
        apply: |a, b, ctx| try_bits(a, b, ctx, Word::shl),
    },
    BinaryEntry {
        op: BinaryOp::ShiftRight,
        symbol: "Rsh",
        precedence: 3,
        modes: PROGRAMMER,
        apply: |a, b, ctx| try_bits(a, b, ctx, Word::shr),
    },
    BinaryEntry {
        op: BinaryOp::ShiftRightLogical,
        symbol: "RshL",
        precedence: 3,
        modes: PROGRAMMER,
        apply: |a, b, ctx| try_bits(a, b, ctx, Word::shr_logical),
    },
    BinaryEntry {
        op: BinaryOp::RotateLeft,
        symbol: "RoL",
        precedence: 3,
        modes: PROGRAMMER,
        apply: |a, b, ctx| try_bits(a, b, ctx, Word::rol),
    },
    BinaryEntry {
        op: BinaryOp::RotateRight,
        symbol: "RoR",
        precedence: 3,
        modes: PROGRAMMER,
        apply: |a, b, ctx| try_bits(a, b, ctx, Word::ror),
    },
];

static UNARY: [UnaryEntry; 44] = [
    UnaryEntry {
        op: UnaryOp::Negate,
        label: "negate",
        modes: ALL,
        apply: |a, ctx| match ctx.mode {
            Mode::Programmer => Ok(word_result(ctx.word.wrap(-a.to_integer()))),
            _ => Ok(a.negate()),
        },
    },
    UnaryEntry {
        op: UnaryOp::Reciprocal,
        label: "1/",
        modes: DECIMAL,
        apply: |a, _| a.reciprocal(),
    },
    UnaryEntry {
        op: UnaryOp::Square,
        label: "sqr",
        modes: DECIMAL,
        apply: |a, _| a.square(),
    },
    UnaryEntry {
        op: UnaryOp::Cube,
        label: "cube",
        modes: SCIENTIFIC,
        apply: |a, _| a.cube(),
    },
    UnaryEntry {
        op: UnaryOp::Sqrt,
        label: "√",
        modes: DECIMAL,
        apply: |a, _| sci::sqrt(a),
    },
    UnaryEntry {
        op: UnaryOp::CubeRoot,
        label: "cuberoot",
        modes: SCIENTIFIC,
        apply: |a, _| sci::cbrt(a),
    },
    UnaryEntry {
        op: UnaryOp::Percent,
        label: "",
        modes: DECIMAL,
        apply: |a, _| a.percent(),
    },
    UnaryEntry {
        op: UnaryOp::Pow10,
        label: "10^",
        modes: SCIENTIFIC,
        apply: |a, _| a.pow10(),
    },
    UnaryEntry {
        op: UnaryOp::Exp,
        label: "e^",
        modes: SCIENTIFIC,
        apply: |a, _| sci::exp(a),
    },
    UnaryEntry {
        op: UnaryOp::Ln,
        label: "ln",
        modes: SCIENTIFIC,
        apply: |a, _| sci::ln(a),
    },
    UnaryEntry {
        op: UnaryOp::Log,
        label: "log",
        modes: SCIENTIFIC,
        apply: |a, _| sci::log10(a),
    },
    UnaryEntry {
        op: UnaryOp::Abs,
        label: "abs",
        modes: SCIENTIFIC,
        apply: |a, _| Ok(a.abs()),
    },
    UnaryEntry {
        op: UnaryOp::Factorial,
        label: "fact",
        modes: SCIENTIFIC,
        apply: |a, _| a.factorial(),
    },
    UnaryEntry {
        op: UnaryOp::Sin,
        label: "sin",
        modes: SCIENTIFIC,
        apply: |a, ctx| sci::sin(a, ctx.angle),
    },
    UnaryEntry {
        op: UnaryOp::Cos,
        label: "cos",
        modes: SCIENTIFIC,
        apply: |a, ctx| sci::cos(a, ctx.angle),
    },
    UnaryEntry {
        op: UnaryOp::Tan,
        label: "tan",
        modes: SCIENTIFIC,
        apply: |a, ctx| sci::tan(a, ctx.angle),
    },
    UnaryEntry {
        op: UnaryOp::Asin,
        label: "sin",
        modes: SCIENTIFIC,
        apply: |a, ctx| sci::asin(a, ctx.angle),
    },
    UnaryEntry {
        op: UnaryOp::Acos,
        label: "cos",
        modes: SCIENTIFIC,
        apply: |a, ctx| sci::acos(a, ctx.angle),
    },
    UnaryEntry {
        op: UnaryOp::Atan,
        label: "tan",
        modes: SCIENTIFIC,
        apply: |a, ctx| sci::atan(a, ctx.angle),
    },
    UnaryEntry {
        op: UnaryOp::Sinh,
        label: "sinh",
        modes: SCIENTIFIC,
        apply: |a, _| sci::sinh(a),
    },
    UnaryEntry {
        op: UnaryOp::Cosh,
        label: "cosh",
        modes: SCIENTIFIC,
        apply: |a, _| sci::cosh(a),
    },
    UnaryEntry {
        op: UnaryOp::Tanh,
        label: "tanh",
        modes: SCIENTIFIC,
        apply: |a, _| sci::tanh(a),
    },
    UnaryEntry {
        op: UnaryOp::Asinh,
        label: "sinh",
        modes: SCIENTIFIC,
        apply: |a, _| sci::asinh(a),
    },
    UnaryEntry {
        op: UnaryOp::Acosh,
        label: "cosh",
        modes: SCIENTIFIC,
        apply: |a, _| sci::acosh(a),
    },
    UnaryEntry {
        op: UnaryOp::Atanh,
        label: "tanh",
        modes: SCIENTIFIC,
        apply: |a, _| sci::atanh(a),
    },
    UnaryEntry {
        op: UnaryOp::Not,
        label: "NOT",
        modes: PROGRAMMER,
        apply: |a, ctx| Ok(word_result(ctx.word.not(&a.to_integer()))),
    },
    UnaryEntry {
        op: UnaryOp::Sec,
        label: "sec",
        modes: SCIENTIFIC,
        apply: |a, ctx| sci::sec(a, ctx.angle),
    },
    UnaryEntry {
        op: UnaryOp::Csc,
        label: "csc",
        modes: SCIENTIFIC,
        apply: |a, ctx| sci::csc(a, ctx.angle),
    },
    UnaryEntry {
        op: UnaryOp::Cot,
        label: "cot",
        modes: SCIENTIFIC,
        apply: |a, ctx| sci::cot(a, ctx.angle),
    },
    UnaryEntry {
        op: UnaryOp::Asec,
        label: "sec",
        modes: SCIENTIFIC,
        apply: |a, ctx| sci::asec(a, ctx.angle),
    },
    UnaryEntry {
        op: UnaryOp::Acsc,
        label: "csc",
        modes: SCIENTIFIC,
        apply: |a, ctx| sci::acsc(a, ctx.angle),
    },
    UnaryEntry {
        op: UnaryOp::Acot,
        label: "cot",
        modes: SCIENTIFIC,
        apply: |a, ctx| sci::acot(a, ctx.angle),
    },
    UnaryEntry {
        op: UnaryOp::Sech,
        label: "sech",
        modes: SCIENTIFIC,
        apply: |a, _| sci::sech(a),
    },
    UnaryEntry {
        op: UnaryOp::Csch,
        label: "csch",
        modes: SCIENTIFIC,
        apply: |a, _| sci::csch(a),
    },
    UnaryEntry {
        op: UnaryOp::Coth,
        label: "coth",
        modes: SCIENTIFIC,
        apply: |a, _| sci::coth(a),
    },
    UnaryEntry {
        op: UnaryOp::Asech,
        label: "sech",
        modes: SCIENTIFIC,
        apply: |a, _| sci::asech(a),
    },
    UnaryEntry {
        op: UnaryOp::Acsch,
        label: "csch",
        modes: SCIENTIFIC,
        apply: |a, _| sci::acsch(a),
    },
    UnaryEntry {
        op: UnaryOp::Acoth,
        label: "coth",
        modes: SCIENTIFIC,
        apply: |a, _| sci::acoth(a),
    },
    UnaryEntry {
        op: UnaryOp::Floor,
        label: "floor",
        modes: SCIENTIFIC,
        apply: |a, _| Ok(a.floor()),
    },
    UnaryEntry {
        op: UnaryOp::Ceil,
        label: "ceil",
        modes: SCIENTIFIC,
        apply: |a, _| Ok(a.ceil()),
    },
    UnaryEntry {
        op: UnaryOp::Chop,
        label: "int",
        modes: SCIENTIFIC,
        apply: |a, _| Ok(a.trunc()),
    },
    UnaryEntry {
        op: UnaryOp::Dms,
        label: "dms",
        modes: SCIENTIFIC,
        apply: |a, _| a.to_dms(),
    },
    UnaryEntry {
        op: UnaryOp::Degrees,
        label: "degrees",
        modes: SCIENTIFIC,
        apply: |a, _| a.dms_to_degrees(),
    },
    UnaryEntry {
        op: UnaryOp::Pow2,
        label: "2^",
        modes: SCIENTIFIC,
        apply: |a, _| a.pow2(),
    },
];

impl BinaryOp {
    pub fn entry(self) -> &'static BinaryEntry {
        &BINARY[self as usize]
    }

    pub fn symbol(self) -> &'static str {
        self.entry().symbol
    }

    pub fn precedence(self) -> u8 {
        self.entry().precedence
    }

    /// `ModeMismatch` unless usable in `mode`
    pub fn check(self, mode: Mode) -> Result<()> {
        if self.entry().modes.contains(&mode) {
            Ok(())
        } else {
            Err(CalcError::ModeMismatch)
        }
    }

    pub fn apply(self, a: &Number, b: &Number, ctx: &Context) -> Result<Number> {
        self.check(ctx.mode)?;
        (self.entry().apply)(a, b, ctx)
    }
}

impl UnaryOp {
    pub fn entry(self) -> &'static UnaryEntry {
        &UNARY[self as usize]
    }

    pub fn check(self, mode: Mode) -> Result<()> {
        if self.entry().modes.contains(&mode) {
            Ok(())
        } else {
            Err(CalcError::ModeMismatch)
        }
    }

    pub fn apply(self, a: &Number, ctx: &Context) -> Result<Number> {
        self.check(ctx.mode)?;
        (self.entry().apply)(a, ctx)
    }

    fn is_inverse(self) -> bool {
        matches!(
            self,
            UnaryOp::Asin
                | UnaryOp::Acos
                | UnaryOp::Atan
                | UnaryOp::Asinh
                | UnaryOp::Acosh
                | UnaryOp::Atanh
                | UnaryOp::Asec
                | UnaryOp::Acsc
                | UnaryOp::Acot
                | UnaryOp::Asech
                | UnaryOp::Acsch
                | UnaryOp::Acoth
        )
    }

    fn is_angular(self) -> bool {
        matches!(
            self,
            UnaryOp::Sin
                | UnaryOp::Cos
                | UnaryOp::Tan
                | UnaryOp::Asin
                | UnaryOp::Acos
                | UnaryOp::Atan
                | UnaryOp::Sec
                | UnaryOp::Csc
                | UnaryOp::Cot
                | UnaryOp::Asec
                | UnaryOp::Acsc
                | UnaryOp::Acot
        )
    }

    /// Expression text for this function applied to `operand`, e.g.
    /// `sin₀(30)`, `√(4)`, `1/(-100)`
    pub fn wrap(self, operand: &str, angle: AngleUnit) -> String {
        let mut label = self.entry().label.to_string();
        if self.is_angular() {
            label.push(match angle {
                AngleUnit::Degrees => '₀',
                AngleUnit::Radians => 'ᵣ',
                AngleUnit::Gradians => 'ᵍ',
            });
        }
        if self.is_inverse() {
            label.push_str("⁻¹");
        }
        format!("{label}({operand})")
    }
}
