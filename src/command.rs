/* Calc-rs (c) 2025 Nathaniel Clark
 *
 * This source code is subject to the terms of the GPL v2. See LICENCE file.
 */

//! Commands fed to the engine, and a small key language for typing them.
//!
//! Keys are separated by whitespace or simply run together: `7+3==`,
//! `4 * 5 + 2 =`, `hex FF not`, `ms:3`.  Hex digits are upper case, names
//! are lower case.

use crate::{
    numbers::{
        word::{Signedness, WordSize},
        AngleUnit, Mode, Radix,
    },
    ops::{BinaryOp, UnaryOp},
};
use regex::Regex;
use std::{str::FromStr, sync::OnceLock};

#[derive(Debug, Copy, Clone, PartialEq, Eq, strum_macros::Display, strum_macros::EnumIter)]
pub enum MemoryOp {
    Store,
    Recall,
    Add,
    Subtract,
    Clear,
    ClearAll,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, strum_macros::Display)]
pub enum Constant {
    Pi,
    E,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Command {
    /// 0-9, A-F
    Digit(char),
    DecimalPoint,
    /// Start typing an exponent (`1.e+5`)
    Exponent,
    Unary(UnaryOp),
    Binary(BinaryOp),
    Equals,
    Clear,
    ClearEntry,
    Backspace,
    Memory(MemoryOp, usize),
    Constant(Constant),
    ModeChange(Mode),
    RadixChange(Radix),
    AngleUnitChange(AngleUnit),
    WordSizeChange(WordSize),
    SignednessChange(Signedness),
    OpenParen,
    CloseParen,
    /// Force scientific notation on and off
    ToggleExponential,
}

fn key_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?x)
            (?P<mem>m(?:ca|s|r|c|\+|-)(?::(?P<slot>\d+))?)
            | (?P<name>[a-z][a-z0-9]*)
            | (?P<digit>[0-9A-F])
            | (?P<sym><<|>>|[-−+*/×÷%^=.!~√()])
            | (?P<ws>\s+)
            | (?P<bad>.)",
        )
        .expect("key pattern")
    })
}

impl FromStr for Command {
    type Err = String;

    /// A single key name or symbol
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        use Command::*;
        let cmd = match s {
            "=" | "equals" => Equals,
            "(" => OpenParen,
            ")" => CloseParen,
            "." | "point" => DecimalPoint,
            "ee" => Exponent,
            "c" | "clear" => Clear,
            "ce" => ClearEntry,
            "bs" | "back" => Backspace,
            "fe" => ToggleExponential,
            "pi" => Constant(self::Constant::Pi),
            "e" => Constant(self::Constant::E),

            "+" => Binary(BinaryOp::Add),
            "-" | "−" => Binary(BinaryOp::Subtract),
            "*" | "×" => Binary(BinaryOp::Multiply),
            "/" | "÷" => Binary(BinaryOp::Divide),
            "mod" => Binary(BinaryOp::Modulo),
            "^" | "pow" => Binary(BinaryOp::Power),
            "yroot" => Binary(BinaryOp::Root),
            "logbase" => Binary(BinaryOp::LogBase),
            "and" => Binary(BinaryOp::And),
            "or" => Binary(BinaryOp::Or),
            "xor" => Binary(BinaryOp::Xor),
            "nand" => Binary(BinaryOp::Nand),
            "nor" => Binary(BinaryOp::Nor),
            "<<" | "lsh" => Binary(BinaryOp::ShiftLeft),
            ">>" | "rsh" => Binary(BinaryOp::ShiftRight),
            "rshl" => Binary(BinaryOp::ShiftRightLogical),
            "rol" => Binary(BinaryOp::RotateLeft),
            "ror" => Binary(BinaryOp::RotateRight),

            "neg" | "negate" => Unary(UnaryOp::Negate),
            "inv" | "recip" => Unary(UnaryOp::Reciprocal),
            "sqr" => Unary(UnaryOp::Square),
            "cube" => Unary(UnaryOp::Cube),
            "√" | "sqrt" => Unary(UnaryOp::Sqrt),
            "cbrt" => Unary(UnaryOp::CubeRoot),
            "%" | "pct" => Unary(UnaryOp::Percent),
            "pow10" => Unary(UnaryOp::Pow10),
            "exp" => Unary(UnaryOp::Exp),
            "ln" => Unary(UnaryOp::Ln),
            "log" => Unary(UnaryOp::Log),
            "abs" => Unary(UnaryOp::Abs),
            "!" | "fact" => Unary(UnaryOp::Factorial),
            "sin" => Unary(UnaryOp::Sin),
            "cos" => Unary(UnaryOp::Cos),
            "tan" => Unary(UnaryOp::Tan),
            "asin" => Unary(UnaryOp::Asin),
            "acos" => Unary(UnaryOp::Acos),
            "atan" => Unary(UnaryOp::Atan),
            "sinh" => Unary(UnaryOp::Sinh),
            "cosh" => Unary(UnaryOp::Cosh),
            "tanh" => Unary(UnaryOp::Tanh),
            "asinh" => Unary(UnaryOp::Asinh),
            "acosh" => Unary(UnaryOp::Acosh),
            "atanh" => Unary(UnaryOp::Atanh),
            "~" | "not" => Unary(UnaryOp::Not),
            "sec" => Unary(UnaryOp::Sec),
            "csc" => Unary(UnaryOp::Csc),
            "cot" => Unary(UnaryOp::Cot),
            "asec" => Unary(UnaryOp::Asec),
            "acsc" => Unary(UnaryOp::Acsc),
            "acot" => Unary(UnaryOp::Acot),
            "sech" => Unary(UnaryOp::Sech),
            "csch" => Unary(UnaryOp::Csch),
            "coth" => Unary(UnaryOp::Coth),
            "asech" => Unary(UnaryOp::Asech),
            "acsch" => Unary(UnaryOp::Acsch),
            "acoth" => Unary(UnaryOp::Acoth),
            "floor" => Unary(UnaryOp::Floor),
            "ceil" => Unary(UnaryOp::Ceil),
            "int" | "chop" => Unary(UnaryOp::Chop),
            "dms" => Unary(UnaryOp::Dms),
            "degrees" => Unary(UnaryOp::Degrees),
            "pow2" => Unary(UnaryOp::Pow2),

            "std" | "standard" => ModeChange(Mode::Standard),
            "sci" | "scientific" => ModeChange(Mode::Scientific),
            "prog" | "programmer" => ModeChange(Mode::Programmer),
            "dec" => RadixChange(Radix::Decimal),
            "hex" => RadixChange(Radix::Hex),
            "bin" => RadixChange(Radix::Binary),
            "oct" => RadixChange(Radix::Octal),
            "deg" => AngleUnitChange(AngleUnit::Degrees),
            "rad" => AngleUnitChange(AngleUnit::Radians),
            "grad" => AngleUnitChange(AngleUnit::Gradians),
            "byte" => WordSizeChange(WordSize::Byte),
            "word" => WordSizeChange(WordSize::Word),
            "dword" => WordSizeChange(WordSize::DWord),
            "qword" => WordSizeChange(WordSize::QWord),
            "unsigned" => SignednessChange(Signedness::Unsigned),
            "ones" => SignednessChange(Signedness::OnesComplement),
            "twos" => SignednessChange(Signedness::TwosComplement),

            "mca" => Memory(MemoryOp::ClearAll, 0),
            "ms" => Memory(MemoryOp::Store, 0),
            "mr" => Memory(MemoryOp::Recall, 0),
            "mc" => Memory(MemoryOp::Clear, 0),
            "m+" => Memory(MemoryOp::Add, 0),
            "m-" => Memory(MemoryOp::Subtract, 0),

            d if d.len() == 1 && d.chars().all(|c| c.is_ascii_hexdigit()) => {
                Digit(d.chars().next().unwrap_or('0').to_ascii_uppercase())
            }
            v => return Err(format!("Unknown key: {v}")),
        };
        Ok(cmd)
    }
}

/// Split a line of keys into commands
pub fn parse_keys(line: &str) -> Result<Vec<Command>, String> {
    let mut out = vec![];
    for caps in key_regex().captures_iter(line) {
        if caps.name("ws").is_some() {
            continue;
        }
        if let Some(bad) = caps.name("bad") {
            return Err(format!("Unknown key: {}", bad.as_str()));
        }
        if let Some(mem) = caps.name("mem") {
            let name = mem.as_str().split(':').next().unwrap_or_default();
            let slot = match caps.name("slot") {
                Some(s) => s
                    .as_str()
                    .parse::<usize>()
                    .map_err(|e| format!("Bad memory slot: {e}"))?,
                None => 0,
            };
            match name.parse::<Command>()? {
                Command::Memory(op, _) => out.push(Command::Memory(op, slot)),
                c => out.push(c),
            }
            continue;
        }
        out.push(caps[0].parse()?);
    }
    Ok(out)
}
