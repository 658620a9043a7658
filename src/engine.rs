/* Calc-rs (c) 2025 Nathaniel Clark
 *
 * This source code is subject to the terms of the GPL v2. See LICENCE file.
 */

//! The calculator state machine.
//!
//! [`Calculator::submit`] takes one [`Command`] at a time and answers with
//! the display text, the expression trail and the error (if any) the
//! command produced.  A command either commits completely or leaves the
//! state exactly as it was.

use crate::{
    command::{Command, Constant, MemoryOp},
    display::{self, EntryBuffer, FormatOptions},
    error::{CalcError, Result},
    numbers::{
        sci,
        word::{Signedness, Word, WordSize},
        AngleUnit, Mode, Number, Radix,
    },
    ops::{BinaryOp, Context, UnaryOp},
    stack::{History, Pending, StackOps, EQUALS},
};
use log::{debug, info, warn};

pub const MEMORY_SLOTS: usize = 10;

/// Digits accepted for a decimal operand in programmer mode
const PROGRAMMER_DECIMAL_DIGITS: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub format: FormatOptions,
    /// Completed calculations kept in the log
    pub log_capacity: usize,
    /// Reduce by operator precedence instead of strictly left to right
    pub precedence: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            format: FormatOptions::default(),
            log_capacity: 20,
            precedence: false,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, strum_macros::Display)]
pub enum State {
    Ready,
    OperandEntry,
    OperatorPending,
    Error,
}

/// Answer to every command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Output {
    pub display: String,
    pub expression: String,
    pub error: Option<CalcError>,
}

/// One completed calculation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub expression: String,
    pub result: String,
}

/// Everything the calculator knows; see [`Calculator::snapshot`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineState {
    pub mode: Mode,
    pub radix: Radix,
    pub angle: AngleUnit,
    pub word: Word,
    pub exponential: bool,
    /// The displayed value
    pub value: Number,
    /// Expression text of `value` when a function produced it
    pub value_text: Option<String>,
    /// Digits being typed, `None` once the operand is complete
    pub entry: Option<EntryBuffer>,
    /// Last command was a binary operator
    pub operator_pending: bool,
    pub pending: Vec<Pending>,
    /// Operators waiting outside each open parenthesis, innermost last
    pub groups: Vec<Vec<Pending>>,
    pub history: History,
    pub memory: Vec<Option<Number>>,
    /// Operator and right operand replayed by a bare Equals
    pub last_op: Option<(BinaryOp, Number)>,
    pub error: Option<CalcError>,
}

impl Default for EngineState {
    fn default() -> Self {
        let mode = Mode::default();
        Self {
            mode,
            radix: Radix::default(),
            angle: AngleUnit::default(),
            word: Word::default(),
            exponential: false,
            value: Number::zero(mode.precision()),
            value_text: None,
            entry: None,
            operator_pending: false,
            pending: vec![],
            groups: vec![],
            history: History::default(),
            memory: vec![None; MEMORY_SLOTS],
            last_op: None,
            error: None,
        }
    }
}

impl EngineState {
    pub fn precision(&self) -> u32 {
        self.mode.precision()
    }

    pub fn state(&self) -> State {
        if self.error.is_some() {
            State::Error
        } else if self.entry.is_some() {
            State::OperandEntry
        } else if self.operator_pending {
            State::OperatorPending
        } else {
            State::Ready
        }
    }

    fn context(&self) -> Context {
        Context {
            mode: self.mode,
            angle: self.angle,
            word: self.word,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Calculator {
    config: EngineConfig,
    state: EngineState,
    log: Vec<LogEntry>,
}

impl Calculator {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            state: EngineState::default(),
            log: vec![],
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn state(&self) -> State {
        self.state.state()
    }

    pub fn snapshot(&self) -> EngineState {
        self.state.clone()
    }

    pub fn restore(&mut self, state: EngineState) {
        debug!("restore: {} {}", state.mode, state.state());
        self.state = state;
    }

    pub fn log(&self) -> &[LogEntry] {
        &self.log
    }

    pub fn clear_log(&mut self) {
        self.log.clear();
    }

    pub fn memory_slots(&self) -> &[Option<Number>] {
        &self.state.memory
    }

    pub fn set_mode(&mut self, mode: Mode) -> Output {
        self.submit(Command::ModeChange(mode))
    }

    pub fn set_radix(&mut self, radix: Radix) -> Output {
        self.submit(Command::RadixChange(radix))
    }

    pub fn set_angle_unit(&mut self, angle: AngleUnit) -> Output {
        self.submit(Command::AngleUnitChange(angle))
    }

    pub fn set_word_size(&mut self, size: WordSize) -> Output {
        self.submit(Command::WordSizeChange(size))
    }

    pub fn set_signedness(&mut self, signedness: Signedness) -> Output {
        self.submit(Command::SignednessChange(signedness))
    }

    pub fn memory(&mut self, op: MemoryOp, slot: usize) -> Output {
        self.submit(Command::Memory(op, slot))
    }

    /// Process one command
    pub fn submit(&mut self, cmd: Command) -> Output {
        debug!("{cmd:?} in {}", self.state.state());
        if self.state.error.is_some()
            && !matches!(
                cmd,
                Command::Clear | Command::ClearEntry | Command::ModeChange(_)
            )
        {
            debug!("ignored while in error");
            return self.output(self.state.error);
        }
        let saved = self.state.clone();
        let notice = match self.dispatch(cmd) {
            Ok(notice) => notice,
            Err(e) if Self::is_rejection(cmd, e) => {
                warn!("{cmd:?} rejected: {e}");
                self.state = saved;
                return self.output(Some(e));
            }
            Err(e) => {
                warn!("{cmd:?} failed: {e}");
                self.state = saved;
                self.state.error = Some(e);
                self.state.entry = None;
                None
            }
        };
        if let Some(e) = notice {
            warn!("{cmd:?}: {e}");
        }
        debug!("now {}", self.state.state());
        self.output(notice.or(self.state.error))
    }

    /// Refused commands leave no trace and no error state
    fn is_rejection(cmd: Command, e: CalcError) -> bool {
        !e.is_fatal() || matches!((cmd, e), (Command::Memory(..), CalcError::InvalidInput))
    }

    /// `Ok(Some(_))` when the command went through but has something to
    /// report
    fn dispatch(&mut self, cmd: Command) -> Result<Option<CalcError>> {
        match cmd {
            Command::Digit(c) => self.digit(c)?,
            Command::DecimalPoint => self.decimal_point()?,
            Command::Exponent => self.exponent()?,
            Command::Unary(op) => self.unary(op)?,
            Command::Binary(op) => self.binary(op)?,
            Command::Equals => self.equals()?,
            Command::Clear => self.clear(),
            Command::ClearEntry => self.clear_entry(),
            Command::Backspace => self.backspace()?,
            Command::Memory(op, slot) => self.memory_op(op, slot)?,
            Command::Constant(c) => self.constant(c)?,
            Command::ModeChange(mode) => return self.change_mode(mode),
            Command::RadixChange(radix) => self.change_radix(radix)?,
            Command::AngleUnitChange(angle) => {
                info!("angle unit: {angle}");
                self.state.angle = angle;
                self.reset_calculation();
            }
            Command::WordSizeChange(size) => self.change_word_size(size)?,
            Command::SignednessChange(signedness) => self.change_signedness(signedness)?,
            Command::OpenParen => self.open_paren()?,
            Command::CloseParen => self.close_paren()?,
            Command::ToggleExponential => {
                if self.state.mode == Mode::Programmer {
                    return Err(CalcError::ModeMismatch);
                }
                self.state.exponential = !self.state.exponential;
            }
        }
        Ok(None)
    }

    fn output(&self, error: Option<CalcError>) -> Output {
        let mut expression = self.state.history.render();
        if let Some(text) = &self.state.value_text {
            if !self.state.history.is_complete() {
                expression.push_str(text);
            }
        }
        Output {
            display: self.display_text(),
            expression,
            error,
        }
    }

    fn display_text(&self) -> String {
        if let Some(entry) = &self.state.entry {
            return entry.text(&self.config.format);
        }
        self.format_value(&self.state.value)
    }

    /// `n` as the display would show it
    pub fn format_value(&self, n: &Number) -> String {
        let s = &self.state;
        if s.mode == Mode::Programmer {
            display::format_word(&n.to_integer(), &s.word, s.radix, &self.config.format)
        } else {
            display::format(n, s.precision(), s.exponential, &self.config.format)
        }
    }

    /// Text the current operand contributes to the trail
    fn operand_text(&self) -> String {
        self.state
            .value_text
            .clone()
            .unwrap_or_else(|| self.format_value(&self.state.value))
    }

    /// A new operand replaces the value; a finished trail is dropped
    fn begin_operand(&mut self) {
        if self.state.history.is_complete() {
            self.state.history.clear();
        }
        self.state.entry = None;
        self.state.value_text = None;
        self.state.operator_pending = false;
    }

    fn reset_calculation(&mut self) {
        let s = &mut self.state;
        s.pending.clear();
        s.groups.clear();
        s.history.clear();
        s.last_op = None;
        s.entry = None;
        s.value_text = None;
        s.operator_pending = false;
    }

    fn set_value(&mut self, value: Number) {
        self.state.value = value;
    }

    fn entry_limit(&self) -> usize {
        let s = &self.state;
        match (s.mode, s.radix) {
            (Mode::Programmer, Radix::Decimal) => PROGRAMMER_DECIMAL_DIGITS,
            (Mode::Programmer, Radix::Octal) => s.word.bits().div_ceil(3) as usize,
            (Mode::Programmer, Radix::Hex) => (s.word.bits() / 4) as usize,
            (Mode::Programmer, Radix::Binary) => s.word.bits() as usize,
            (mode, _) => mode.precision() as usize,
        }
    }

    fn entry_mut(&mut self) -> &mut EntryBuffer {
        if self.state.entry.is_none() {
            self.begin_operand();
            self.state.entry = Some(EntryBuffer::new(self.state.radix, self.entry_limit()));
        }
        self.state
            .entry
            .get_or_insert_with(|| EntryBuffer::new(Radix::Decimal, 0))
    }

    /// Value of the typed digits; `None` when they do not fit the word or
    /// the representable range
    fn entry_value(&self, entry: &EntryBuffer) -> Result<Option<Number>> {
        let s = &self.state;
        if s.mode != Mode::Programmer {
            return match entry.to_number(s.precision()) {
                Ok(n) => Ok(Some(n)),
                // An exponent digit past the representable range is dropped
                Err(CalcError::Overflow) => Ok(None),
                Err(e) => Err(e),
            };
        }
        let typed = entry.to_integer();
        let value = if entry.radix() == Radix::Decimal {
            let magnitude = rug::Integer::from(typed.abs_ref());
            let limit = if typed < 0 {
                rug::Integer::from(-s.word.min())
            } else {
                s.word.max()
            };
            if magnitude > limit {
                return Ok(None);
            }
            typed
        } else {
            if typed.significant_bits() > s.word.bits() {
                return Ok(None);
            }
            s.word.from_pattern(typed)
        };
        Ok(Some(Number::from_integer(value, s.precision())))
    }

    fn sync_entry(&mut self) -> Result<()> {
        let Some(entry) = self.state.entry.clone() else {
            return Ok(());
        };
        match self.entry_value(&entry)? {
            Some(v) => self.set_value(v),
            None => {
                debug!("digit does not fit");
                if let Some(e) = self.state.entry.as_mut() {
                    e.backspace();
                }
            }
        }
        Ok(())
    }

    fn digit(&mut self, c: char) -> Result<()> {
        if !self.entry_mut().try_add_digit(c)? {
            debug!("digit {c} ignored");
        }
        self.sync_entry()
    }

    fn decimal_point(&mut self) -> Result<()> {
        if self.state.mode == Mode::Programmer {
            return Err(CalcError::ModeMismatch);
        }
        self.entry_mut().add_point();
        self.sync_entry()
    }

    fn exponent(&mut self) -> Result<()> {
        if self.state.mode != Mode::Scientific {
            return Err(CalcError::ModeMismatch);
        }
        self.entry_mut().begin_exponent();
        self.sync_entry()
    }

    fn backspace(&mut self) -> Result<()> {
        match self.state.entry.as_mut() {
            Some(entry) => entry.backspace(),
            None => return Ok(()),
        }
        self.sync_entry()
    }

    fn unary(&mut self, op: UnaryOp) -> Result<()> {
        op.check(self.state.mode)?;
        if op == UnaryOp::Negate {
            if let Some(entry) = self.state.entry.as_ref() {
                if entry.radix() == Radix::Decimal {
                    let mut toggled = entry.clone();
                    toggled.toggle_sign();
                    if let Some(v) = self.entry_value(&toggled)? {
                        self.state.entry = Some(toggled);
                        self.set_value(v);
                        return Ok(());
                    }
                    // Out of the word's range: finish the operand and wrap
                    debug!("negated entry does not fit {}", self.state.word.size);
                }
            }
        }
        let ctx = self.state.context();
        let operand = self.state.value.clone();
        let (value, text) = if op == UnaryOp::Percent {
            let value = match self.state.pending.top() {
                Some(p) if matches!(p.op, BinaryOp::Add | BinaryOp::Subtract) => {
                    p.value.multiply(&operand)?.percent()?
                }
                _ => operand.percent()?,
            };
            let text = self.format_value(&value);
            (value, text)
        } else {
            let value = op.apply(&operand, &ctx)?;
            (value, op.wrap(&self.operand_text(), self.state.angle))
        };
        self.begin_operand();
        self.set_value(value);
        self.state.value_text = Some(text);
        Ok(())
    }

    fn binary(&mut self, op: BinaryOp) -> Result<()> {
        op.check(self.state.mode)?;
        let ctx = self.state.context();
        if self.state.operator_pending {
            let replaced = self.state.pending.replace_operator(op, &ctx, self.config.precedence)?;
            if let Some(reduced) = replaced {
                self.state.history.replace_symbol(op.symbol());
                self.set_value(reduced);
                return Ok(());
            }
        }
        let text = self.operand_text();
        if self.state.history.is_complete() {
            self.state.history.clear();
        }
        let operand = self.state.value.clone();
        let reduced = self.state.pending.push_operator(
            operand.clone(),
            op,
            &ctx,
            self.config.precedence,
        )?;
        self.state.history.push(op.symbol(), operand, text);
        self.set_value(reduced);
        self.state.entry = None;
        self.state.value_text = None;
        self.state.operator_pending = true;
        self.state.last_op = None;
        Ok(())
    }

    fn open_paren(&mut self) -> Result<()> {
        if self.state.mode == Mode::Standard {
            return Err(CalcError::ModeMismatch);
        }
        if self.state.history.is_complete() {
            self.state.history.clear();
        }
        let outer = std::mem::take(&mut self.state.pending);
        self.state.groups.push(outer);
        self.state.history.open();
        self.state.entry = None;
        self.state.value_text = None;
        self.state.operator_pending = false;
        self.state.last_op = None;
        Ok(())
    }

    /// Evaluate the innermost group; it becomes one operand of the
    /// enclosing expression
    fn close_paren(&mut self) -> Result<()> {
        if self.state.mode == Mode::Standard {
            return Err(CalcError::ModeMismatch);
        }
        let Some(outer) = self.state.groups.pop() else {
            debug!("no open parenthesis");
            return Ok(());
        };
        let ctx = self.state.context();
        let right = self.state.value.clone();
        let text = self.operand_text();
        let result = self.state.pending.try_fold(right, &ctx)?;
        let group = self.state.history.close(&text);
        self.state.pending = outer;
        self.set_value(result);
        self.state.entry = None;
        self.state.value_text = Some(group);
        self.state.operator_pending = false;
        Ok(())
    }

    fn equals(&mut self) -> Result<()> {
        while !self.state.groups.is_empty() {
            self.close_paren()?;
        }
        let ctx = self.state.context();
        let right = self.state.value.clone();
        let text = self.operand_text();
        let result = if let Some(top) = self.state.pending.top() {
            let replay = (top.op, right.clone());
            let result = self.state.pending.try_fold(right.clone(), &ctx)?;
            self.state.history.push(EQUALS, right, text);
            self.state.last_op = Some(replay);
            result
        } else if let Some((op, operand)) = self.state.last_op.clone() {
            let result = op.apply(&right, &operand, &ctx)?;
            self.state.history.clear();
            self.state.history.push(op.symbol(), right, text);
            let operand_text = self.format_value(&operand);
            self.state.history.push(EQUALS, operand, operand_text);
            result
        } else {
            self.state.history.clear();
            self.state.history.push(EQUALS, right.clone(), text);
            right
        };
        self.record(&result);
        self.set_value(result);
        self.state.entry = None;
        self.state.value_text = None;
        self.state.operator_pending = false;
        Ok(())
    }

    fn record(&mut self, result: &Number) {
        if self.config.log_capacity == 0 {
            return;
        }
        let entry = LogEntry {
            expression: self.state.history.render(),
            result: self.format_value(result),
        };
        debug!("log: {} {}", entry.expression, entry.result);
        if self.log.len() >= self.config.log_capacity {
            self.log.remove(0);
        }
        self.log.push(entry);
    }

    fn clear(&mut self) {
        self.reset_calculation();
        self.state.error = None;
        self.state.value = Number::zero(self.state.precision());
    }

    fn clear_entry(&mut self) {
        if self.state.error.is_some() {
            return self.clear();
        }
        self.state.entry = None;
        self.state.value_text = None;
        self.state.operator_pending = false;
        self.state.value = Number::zero(self.state.precision());
    }

    fn memory_op(&mut self, op: MemoryOp, slot: usize) -> Result<()> {
        if slot >= self.state.memory.len() {
            return Err(CalcError::InvalidInput);
        }
        let ctx = self.state.context();
        let precision = self.state.precision();
        let value = self.state.value.clone();
        match op {
            MemoryOp::Store => self.state.memory[slot] = Some(value),
            MemoryOp::Recall => {
                let recalled = match &self.state.memory[slot] {
                    Some(m) => self.fit(m)?,
                    None => Number::zero(precision),
                };
                self.begin_operand();
                self.set_value(recalled);
                return Ok(());
            }
            MemoryOp::Add | MemoryOp::Subtract => {
                let current = match &self.state.memory[slot] {
                    Some(m) => m.with_precision(precision)?,
                    None => Number::zero(precision),
                };
                let op = if op == MemoryOp::Add {
                    BinaryOp::Add
                } else {
                    BinaryOp::Subtract
                };
                self.state.memory[slot] = Some(op.apply(&current, &value, &ctx)?);
            }
            MemoryOp::Clear => self.state.memory[slot] = None,
            MemoryOp::ClearAll => self.state.memory.iter_mut().for_each(|m| *m = None),
        }
        // The displayed value is complete once it has been used
        self.state.entry = None;
        Ok(())
    }

    /// `n` as a value of the current mode
    fn fit(&self, n: &Number) -> Result<Number> {
        let s = &self.state;
        if s.mode == Mode::Programmer {
            Ok(Number::from_integer(
                s.word.wrap(n.to_integer()),
                s.precision(),
            ))
        } else {
            n.with_precision(s.precision())
        }
    }

    fn constant(&mut self, c: Constant) -> Result<()> {
        if self.state.mode != Mode::Scientific {
            return Err(CalcError::ModeMismatch);
        }
        let precision = self.state.precision();
        let value = match c {
            Constant::Pi => sci::pi_number(precision)?,
            Constant::E => sci::e_number(precision)?,
        };
        self.begin_operand();
        self.set_value(value);
        Ok(())
    }

    fn change_mode(&mut self, mode: Mode) -> Result<Option<CalcError>> {
        info!("mode: {} -> {mode}", self.state.mode);
        self.reset_calculation();
        self.state.error = None;
        self.state.mode = mode;
        if mode != Mode::Programmer {
            self.state.radix = Radix::Decimal;
        }
        let precision = mode.precision();
        let value = self.state.value.clone();
        let converted = if mode == Mode::Programmer {
            let int = value.to_integer();
            if self.state.word.contains(&int) {
                Ok(Number::from_integer(int, precision))
            } else {
                Err(CalcError::Overflow)
            }
        } else {
            value.with_precision(precision)
        };
        match converted {
            Ok(v) => {
                self.set_value(v);
                Ok(None)
            }
            Err(e) => {
                self.set_value(Number::zero(precision));
                Ok(Some(e))
            }
        }
    }

    fn change_radix(&mut self, radix: Radix) -> Result<()> {
        if radix != Radix::Decimal && self.state.mode != Mode::Programmer {
            return Err(CalcError::ModeMismatch);
        }
        info!("radix: {radix}");
        self.reset_calculation();
        self.state.radix = radix;
        Ok(())
    }

    fn change_word_size(&mut self, size: WordSize) -> Result<()> {
        if self.state.mode != Mode::Programmer {
            return Err(CalcError::ModeMismatch);
        }
        info!("word size: {size}");
        self.reset_calculation();
        self.state.word.size = size;
        let wrapped = self.fit(&self.state.value.clone())?;
        self.set_value(wrapped);
        Ok(())
    }

    fn change_signedness(&mut self, signedness: Signedness) -> Result<()> {
        if self.state.mode != Mode::Programmer {
            return Err(CalcError::ModeMismatch);
        }
        info!("signedness: {signedness}");
        self.reset_calculation();
        self.state.word.signedness = signedness;
        let wrapped = self.fit(&self.state.value.clone())?;
        self.set_value(wrapped);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::parse_keys;

    fn run(calc: &mut Calculator, keys: &str) -> Output {
        let mut out = calc.submit(Command::Clear);
        for cmd in parse_keys(keys).unwrap() {
            out = calc.submit(cmd);
        }
        out
    }

    fn eval(keys: &str) -> Output {
        run(&mut Calculator::default(), keys)
    }

    #[test]
    fn starts_ready_at_zero() {
        let mut calc = Calculator::default();
        assert_eq!(calc.state(), State::Ready);
        let out = calc.submit(Command::ClearEntry);
        assert_eq!(out.display, "0");
        assert_eq!(out.expression, "");
    }

    #[test]
    fn states_follow_commands() {
        let mut calc = Calculator::default();
        calc.submit(Command::Digit('4'));
        assert_eq!(calc.state(), State::OperandEntry);
        calc.submit(Command::Binary(BinaryOp::Add));
        assert_eq!(calc.state(), State::OperatorPending);
        calc.submit(Command::Digit('1'));
        calc.submit(Command::Equals);
        assert_eq!(calc.state(), State::Ready);
        calc.submit(Command::Binary(BinaryOp::Divide));
        calc.submit(Command::Digit('0'));
        calc.submit(Command::Equals);
        assert_eq!(calc.state(), State::Error);
    }

    #[test]
    fn chained_left_to_right() {
        let out = eval("4*5+2=");
        assert_eq!(out.display, "22");
        assert_eq!(out.expression, "4 × 5 + 2 =");
        assert_eq!(eval("2+3*4=").display, "20");
    }

    #[test]
    fn precedence_when_configured() {
        let mut calc = Calculator::new(EngineConfig {
            precedence: true,
            ..EngineConfig::default()
        });
        let out = run(&mut calc, "2+3*4=");
        assert_eq!(out.display, "14");
        assert_eq!(out.expression, "2 + 3 × 4 =");
        // A replaced operator reduces what it does not bind tighter than
        let out = run(&mut calc, "2-3*+");
        assert_eq!(out.display, "-1");
        assert_eq!(out.expression, "2 − 3 + ");
        let out = calc.submit(Command::Digit('4'));
        assert_eq!(out.display, "4");
        assert_eq!(calc.submit(Command::Equals).display, "3");
        assert_eq!(run(&mut calc, "2+3-*4=").display, "20");
    }

    #[test]
    fn pending_display() {
        let out = eval("4*5+");
        assert_eq!(out.display, "20");
        assert_eq!(out.expression, "4 × 5 + ");
        let out = eval("4*5+6");
        assert_eq!(out.display, "6");
        assert_eq!(out.expression, "4 × 5 + ");
    }

    #[test]
    fn repeated_equals() {
        let mut calc = Calculator::default();
        assert_eq!(run(&mut calc, "7+3=").display, "10");
        let out = calc.submit(Command::Equals);
        assert_eq!(out.display, "13");
        assert_eq!(out.expression, "10 + 3 =");
        assert_eq!(calc.submit(Command::Equals).display, "16");
        // New operand, same operation
        calc.submit(Command::Digit('2'));
        assert_eq!(calc.submit(Command::Equals).display, "5");
    }

    #[test]
    fn equals_uses_display_as_right_operand() {
        let out = eval("4+=");
        assert_eq!(out.display, "8");
        assert_eq!(out.expression, "4 + 4 =");
    }

    #[test]
    fn operator_replacement() {
        let out = eval("5+*");
        assert_eq!(out.expression, "5 × ");
        assert_eq!(eval("5+*3=").display, "15");
    }

    #[test]
    fn division_by_zero_and_recovery() {
        let mut calc = Calculator::default();
        let out = run(&mut calc, "9/0=");
        assert_eq!(out.error, Some(CalcError::DivisionByZero));
        assert_eq!(calc.state(), State::Error);
        // Only clearing gets out
        let out = calc.submit(Command::Digit('5'));
        assert_eq!(out.error, Some(CalcError::DivisionByZero));
        let out = calc.submit(Command::Clear);
        assert_eq!(out.display, "0");
        assert_eq!(out.error, None);
        assert_eq!(out.expression, "");
        assert_eq!(eval("0/0=").error, Some(CalcError::Undefined));
    }

    #[test]
    fn error_rolls_back_state() {
        let mut calc = Calculator::default();
        run(&mut calc, "9/0");
        let before = calc.snapshot();
        calc.submit(Command::Equals);
        let mut after = calc.snapshot();
        assert_eq!(after.error, Some(CalcError::DivisionByZero));
        after.error = None;
        after.entry = before.entry.clone();
        assert_eq!(after, before);
    }

    #[test]
    fn backspace_edits_only_the_operand() {
        let mut calc = Calculator::default();
        run(&mut calc, "5+123");
        let mut shown = vec![];
        for _ in 0..4 {
            let out = calc.submit(Command::Backspace);
            assert_eq!(out.expression, "5 + ");
            shown.push(out.display);
        }
        assert_eq!(shown, vec!["12", "1", "0", "0"]);
        // Results cannot be edited
        let out = run(&mut calc, "2+2=");
        assert_eq!(calc.submit(Command::Backspace), out);
    }

    #[test]
    fn unary_wraps_operand_text() {
        let out = eval("4 sqrt");
        assert_eq!(out.display, "2");
        assert_eq!(out.expression, "√(4)");
        let out = eval("3+4 sqrt");
        assert_eq!(out.expression, "3 + √(4)");
        let out = eval("3+4 sqrt sqr =");
        assert_eq!(out.expression, "3 + sqr(√(4)) =");
        assert_eq!(out.display, "7");
        let out = eval("100 neg inv");
        assert_eq!(out.expression, "1/(-100)");
        assert_eq!(out.display, "-0.01");
    }

    #[test]
    fn negate_during_entry_edits_the_entry() {
        let out = eval("12 neg 3");
        assert_eq!(out.display, "-123");
        assert_eq!(out.expression, "");
        let out = eval("2+3= neg");
        assert_eq!(out.expression, "negate(5)");
        assert_eq!(out.display, "-5");
    }

    #[test]
    fn percent() {
        assert_eq!(eval("200+10%").display, "20");
        assert_eq!(eval("200+10%=").display, "220");
        assert_eq!(eval("200*10%").display, "0.1");
        assert_eq!(eval("50%").display, "0.5");
    }

    #[test]
    fn decimal_entry() {
        assert_eq!(eval("1.5.2").display, "1.52");
        assert_eq!(eval(".").display, "0.");
        assert_eq!(eval("1000000").display, "1,000,000");
        assert_eq!(eval("0.1+0.2=").display, "0.3");
        // Seventeenth digit is dropped in standard mode
        assert_eq!(eval("12345678901234567").display, "1,234,567,890,123,456");
    }

    #[test]
    fn mode_mismatch_is_a_noop() {
        let mut calc = Calculator::default();
        run(&mut calc, "5+3");
        let before = calc.snapshot();
        let out = calc.submit(Command::Unary(UnaryOp::Sin));
        assert_eq!(out.error, Some(CalcError::ModeMismatch));
        assert_eq!(out.display, "3");
        assert_eq!(calc.snapshot(), before);
        assert_ne!(calc.state(), State::Error);
        let out = calc.submit(Command::Digit('A'));
        assert_eq!(out.error, Some(CalcError::ModeMismatch));
        let out = calc.set_radix(Radix::Hex);
        assert_eq!(out.error, Some(CalcError::ModeMismatch));
    }

    #[test]
    fn memory() {
        let mut calc = Calculator::default();
        run(&mut calc, "5");
        calc.memory(MemoryOp::Store, 0);
        run(&mut calc, "3");
        calc.memory(MemoryOp::Add, 0);
        calc.memory(MemoryOp::Subtract, 1);
        // Clear keeps memory
        calc.submit(Command::Clear);
        assert_eq!(calc.memory(MemoryOp::Recall, 0).display, "8");
        assert_eq!(calc.memory(MemoryOp::Recall, 1).display, "-3");
        assert_eq!(calc.memory(MemoryOp::Recall, 2).display, "0");
        let out = calc.memory(MemoryOp::Store, 10);
        assert_eq!(out.error, Some(CalcError::InvalidInput));
        assert_ne!(calc.state(), State::Error);
        calc.memory(MemoryOp::ClearAll, 0);
        assert!(calc.memory_slots().iter().all(Option::is_none));
    }

    #[test]
    fn recall_starts_a_new_operand() {
        let mut calc = Calculator::default();
        run(&mut calc, "7 ms");
        let out = run(&mut calc, "2+ mr =");
        assert_eq!(out.display, "9");
    }

    #[test]
    fn calculation_log() {
        let mut calc = Calculator::new(EngineConfig {
            log_capacity: 2,
            ..EngineConfig::default()
        });
        run(&mut calc, "1+1=");
        run(&mut calc, "2+2=");
        run(&mut calc, "3+3=");
        let log = calc.log();
        assert_eq!(log.len(), 2);
        assert_eq!(log[0].expression, "2 + 2 =");
        assert_eq!(log[1].result, "6");
        calc.clear_log();
        assert!(calc.log().is_empty());
    }

    #[test]
    fn mode_change_resets_calculation() {
        let mut calc = Calculator::default();
        run(&mut calc, "1/3=");
        let out = calc.set_mode(Mode::Scientific);
        assert_eq!(out.display, "0.3333333333333333");
        assert_eq!(out.expression, "");
        let out = run(&mut calc, "1/3=");
        assert_eq!(out.display, "0.33333333333333333333333333333333");
        let out = calc.set_mode(Mode::Standard);
        assert_eq!(out.display, "0.3333333333333333");
    }

    #[test]
    fn scientific_functions() {
        let mut calc = Calculator::default();
        calc.set_mode(Mode::Scientific);
        let out = run(&mut calc, "30 sin");
        assert_eq!(out.display, "0.5");
        assert_eq!(out.expression, "sin₀(30)");
        assert_eq!(run(&mut calc, "2^10=").display, "1,024");
        assert_eq!(run(&mut calc, "5!").display, "120");
        assert_eq!(run(&mut calc, "90 tan").error, Some(CalcError::InvalidInput));
        calc.submit(Command::Clear);
        calc.set_angle_unit(AngleUnit::Radians);
        assert_eq!(run(&mut calc, "pi cos").display, "-1");
    }

    #[test]
    fn exponent_entry() {
        let mut calc = Calculator::default();
        calc.set_mode(Mode::Scientific);
        let out = run(&mut calc, "1 ee neg 9999");
        assert_eq!(out.display, "1.e-9999");
        let out = calc.submit(Command::Binary(BinaryOp::Divide));
        assert_eq!(out.display, "1.e-9999");
        calc.submit(Command::Digit('1'));
        calc.submit(Command::Digit('0'));
        let out = calc.submit(Command::Equals);
        assert_eq!(out.error, Some(CalcError::Overflow));
        assert_eq!(eval("1 ee").error, Some(CalcError::ModeMismatch));
    }

    #[test]
    fn exponent_digit_out_of_range_is_dropped() {
        let mut calc = Calculator::default();
        calc.set_mode(Mode::Scientific);
        let out = run(&mut calc, "12 ee 9999");
        assert_eq!(out.error, None);
        assert_eq!(out.display, "12.e+999");
        assert_eq!(calc.state(), State::OperandEntry);
        let out = run(&mut calc, "1 ee 9999 =");
        assert_eq!(out.error, None);
        assert_eq!(out.display, "1.e+9999");
    }

    #[test]
    fn parentheses() {
        let mut calc = Calculator::default();
        calc.set_mode(Mode::Scientific);
        let out = run(&mut calc, "2*(3+4");
        assert_eq!(out.display, "4");
        assert_eq!(out.expression, "2 × (3 + ");
        let out = calc.submit(Command::CloseParen);
        assert_eq!(out.display, "7");
        assert_eq!(out.expression, "2 × (3 + 4)");
        let out = calc.submit(Command::Equals);
        assert_eq!(out.display, "14");
        assert_eq!(out.expression, "2 × (3 + 4) =");
        // Unclosed groups close at =
        let out = run(&mut calc, "((1+2)*3");
        assert_eq!(out.expression, "((1 + 2) × ");
        let out = calc.submit(Command::Equals);
        assert_eq!(out.display, "9");
        assert_eq!(out.expression, "((1 + 2) × 3) =");
        // A stray ) does nothing
        let out = run(&mut calc, "5)");
        assert_eq!(out.display, "5");
        assert_eq!(out.error, None);
        calc.set_mode(Mode::Standard);
        assert_eq!(run(&mut calc, "(").error, Some(CalcError::ModeMismatch));
    }

    #[test]
    fn parentheses_fail_like_any_reduction() {
        let mut calc = Calculator::default();
        calc.set_mode(Mode::Scientific);
        let out = run(&mut calc, "1+(2/0)");
        assert_eq!(out.error, Some(CalcError::DivisionByZero));
        assert_eq!(calc.state(), State::Error);
        let out = calc.submit(Command::Clear);
        assert_eq!(out.expression, "");
        assert!(calc.snapshot().groups.is_empty());
    }

    #[test]
    fn overflow_window() {
        let mut calc = Calculator::default();
        calc.set_mode(Mode::Scientific);
        let out = run(&mut calc, "10 ee 5000 sqr");
        assert_eq!(out.error, Some(CalcError::Overflow));
    }

    #[test]
    fn programmer_not_in_unsigned_byte() {
        let mut calc = Calculator::default();
        calc.set_mode(Mode::Programmer);
        calc.set_word_size(WordSize::Byte);
        calc.set_signedness(Signedness::Unsigned);
        calc.set_radix(Radix::Hex);
        calc.submit(Command::Digit('F'));
        let out = calc.submit(Command::Digit('F'));
        assert_eq!(out.display, "FF");
        let out = calc.submit(Command::Unary(UnaryOp::Not));
        assert_eq!(out.display, "0");
        assert_eq!(out.expression, "NOT(FF)");
    }

    #[test]
    fn negate_entry_outside_unsigned_word_wraps() {
        let mut calc = Calculator::default();
        calc.set_mode(Mode::Programmer);
        calc.set_word_size(WordSize::Byte);
        calc.set_signedness(Signedness::Unsigned);
        let out = run(&mut calc, "12 neg");
        assert_eq!(out.display, "244");
        assert_eq!(out.expression, "negate(12)");
        assert_eq!(calc.state(), State::Ready);
        assert_eq!(calc.submit(Command::Equals).display, "244");
        // Fits once signed: stays an entry
        calc.set_signedness(Signedness::TwosComplement);
        let out = run(&mut calc, "12 neg 1");
        assert_eq!(out.display, "-121");
        assert_eq!(calc.state(), State::OperandEntry);
    }

    #[test]
    fn signedness_change() {
        let mut calc = Calculator::default();
        let out = calc.set_signedness(Signedness::Unsigned);
        assert_eq!(out.error, Some(CalcError::ModeMismatch));
        assert_eq!(calc.snapshot().word.signedness, Signedness::TwosComplement);
        calc.set_mode(Mode::Programmer);
        calc.set_word_size(WordSize::Byte);
        run(&mut calc, "0-1=");
        let out = calc.set_signedness(Signedness::Unsigned);
        assert_eq!(out.display, "255");
        assert_eq!(out.expression, "");
        assert_eq!(calc.state(), State::Ready);
        let out = calc.set_signedness(Signedness::TwosComplement);
        assert_eq!(out.display, "-1");
        let out = run(&mut calc, "unsigned 200 ones");
        assert_eq!(out.display, "-55");
    }

    #[test]
    fn programmer_truncates() {
        let mut calc = Calculator::default();
        calc.set_mode(Mode::Programmer);
        assert_eq!(run(&mut calc, "5/2*2=").display, "4");
        assert_eq!(run(&mut calc, "0-7/2=").display, "-3");
        run(&mut calc, "1");
        let out = calc.submit(Command::DecimalPoint);
        assert_eq!(out.error, Some(CalcError::ModeMismatch));
        assert_eq!(out.display, "1");
    }

    #[test]
    fn programmer_entry_limits() {
        let mut calc = Calculator::default();
        calc.set_mode(Mode::Programmer);
        calc.set_word_size(WordSize::Byte);
        assert_eq!(run(&mut calc, "127").display, "127");
        assert_eq!(run(&mut calc, "128").display, "12");
        calc.set_radix(Radix::Hex);
        assert_eq!(run(&mut calc, "FFF").display, "FF");
        calc.set_radix(Radix::Binary);
        assert_eq!(run(&mut calc, "11111111").display, "1111 1111");
    }

    #[test]
    fn word_size_change_wraps() {
        let mut calc = Calculator::default();
        calc.set_mode(Mode::Programmer);
        run(&mut calc, "300");
        let out = calc.set_word_size(WordSize::Byte);
        assert_eq!(out.display, "44");
        assert_eq!(out.error, None);
    }

    #[test]
    fn entering_programmer_truncates_or_resets() {
        let mut calc = Calculator::default();
        run(&mut calc, "7.9");
        assert_eq!(calc.set_mode(Mode::Programmer).display, "7");
        calc.set_mode(Mode::Scientific);
        run(&mut calc, "10 ee 30");
        let out = calc.set_mode(Mode::Programmer);
        assert_eq!(out.display, "0");
        assert_eq!(out.error, Some(CalcError::Overflow));
        assert_eq!(calc.state(), State::Ready);
    }

    #[test]
    fn mode_change_leaves_error_state() {
        let mut calc = Calculator::default();
        run(&mut calc, "1/0=");
        let out = calc.set_mode(Mode::Scientific);
        assert_eq!(out.error, None);
        assert_eq!(calc.state(), State::Ready);
    }

    #[test]
    fn snapshot_restore() {
        let mut calc = Calculator::default();
        run(&mut calc, "6*7");
        let saved = calc.snapshot();
        calc.submit(Command::Equals);
        calc.restore(saved);
        let out = calc.submit(Command::Equals);
        assert_eq!(out.display, "42");
        assert_eq!(out.expression, "6 × 7 =");
    }
}
