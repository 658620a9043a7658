/* Calc-rs (c) 2025 Nathaniel Clark
 *
 * This source code is subject to the terms of the GPL v2. See LICENCE file.
 */

use calc_rs::{
    command::Command,
    numbers::{word::Word, AngleUnit, Mode, Radix},
    Calculator, Output,
};
use itertools::Itertools;
use std::error::Error;

pub mod readline;
pub mod tui;

#[derive(clap::ValueEnum, Default, Debug, Copy, Clone, strum_macros::Display, PartialEq)]
#[clap(rename_all = "lower")]
#[strum(serialize_all = "lowercase")]
pub enum Flavor {
    /// Line oriented prompt
    #[default]
    Cli,
    /// Full screen Text User Interface
    Tui,
}

pub fn get_ui(flavor: Flavor) -> Result<Box<dyn CalcDisplay>, Box<dyn Error + Send + Sync>> {
    match flavor {
        Flavor::Cli => Ok(Box::new(readline::ReadlineCalcUI::init()?)),
        Flavor::Tui => Ok(Box::new(tui::TuiCalcUI::init()?)),
    }
}

#[derive(Debug, Clone)]
pub enum Message {
    /// A line of keys
    Input(String),
    /// A single command from a hotkey
    Command(Command),
    Help,
    Log,
    Quit,
}

impl Message {
    /// Words understood by every front-end, anything else is keys
    pub fn from_line(line: String) -> Self {
        match line.trim() {
            "q" | "quit" | "exit" => Message::Quit,
            "help" | "?" => Message::Help,
            "log" => Message::Log,
            _ => Message::Input(line),
        }
    }
}

/// What a front-end shows after each command
#[derive(Debug, Clone, Default)]
pub struct Screen {
    pub display: String,
    pub expression: String,
    pub mode: Mode,
    pub radix: Radix,
    pub angle: AngleUnit,
    pub word: Word,
    /// Occupied memory slots, formatted
    pub memory: Vec<(usize, String)>,
}

impl Screen {
    pub fn new(calc: &Calculator, out: &Output) -> Self {
        let state = calc.snapshot();
        let memory = state
            .memory
            .iter()
            .enumerate()
            .filter_map(|(i, m)| m.as_ref().map(|n| (i, calc.format_value(n))))
            .collect();
        Self {
            display: out.display.clone(),
            expression: out.expression.clone(),
            mode: state.mode,
            radix: state.radix,
            angle: state.angle,
            word: state.word,
            memory,
        }
    }

    /// `scientific degrees` or `programmer hex QWORD two-complement`
    pub fn mode_line(&self) -> String {
        match self.mode {
            Mode::Programmer => format!(
                "{} {} {} {}",
                self.mode, self.radix, self.word.size, self.word.signedness
            ),
            Mode::Scientific => format!("{} {}", self.mode, self.angle),
            Mode::Standard => self.mode.to_string(),
        }
    }

    pub fn memory_line(&self) -> String {
        self.memory
            .iter()
            .map(|(i, v)| format!("M{i}={v}"))
            .join("  ")
    }
}

pub fn help_text() -> String {
    [
        "Keys may be typed together (7+3==) or separated by spaces.",
        "",
        "Digits      0-9, A-F (hex)   .  decimal point   ee  exponent",
        "Operators   + - * / mod ^ yroot logbase",
        "            and or xor nand nor << >> rshl rol ror",
        "Functions   neg inv sqr cube sqrt cbrt % pow10 exp ln log abs !",
        "            sin cos tan asin acos atan sinh cosh tanh asinh acosh atanh not",
        "            sec csc cot asec acsc acot sech csch coth asech acsch acoth",
        "            floor ceil int dms degrees pow2",
        "Constants   pi e",
        "Editing     =  ( )  c (clear)  ce (clear entry)  bs (backspace)  fe",
        "Memory      ms mr m+ m- mc mca, slot with ms:3",
        "Modes       std sci prog   dec hex bin oct   deg rad grad",
        "            byte word dword qword   unsigned ones twos",
        "",
        "Empty line repeats =.  help, log, quit",
    ]
    .join("\n")
}

pub trait CalcDisplay {
    /// Initialize Display driver
    fn init() -> Result<Self, Box<dyn Error + Send + Sync>>
    where
        Self: Sized;

    /// Wait on next Message for event loop
    fn next(&mut self) -> Option<Message>;

    /// Set/Clear error message
    fn set_error(&mut self, msg: Option<String>);

    /// Display Dialog with text
    fn dialog(&mut self, msg: String);

    fn update(&mut self, screen: Screen);

    /// Show Help Text
    fn help(&mut self);

    /// Cleanup and quit
    fn quit(&mut self);
}
