/* Calc-rs (c) 2025 Nathaniel Clark
 *
 * This source code is subject to the terms of the GPL v2. See LICENCE file.
 */

use calc_rs::{
    command::MemoryOp,
    numbers::{
        word::{Signedness, WordSize},
        AngleUnit, Mode, Radix,
    },
    parse_keys, CalcError, Calculator, Command, EngineConfig, Output, State,
};

/// One key sequence and what the calculator shows afterwards
struct Fixture {
    keys: &'static str,
    display: &'static str,
    expression: &'static str,
}

const fn fx(keys: &'static str, display: &'static str, expression: &'static str) -> Fixture {
    Fixture {
        keys,
        display,
        expression,
    }
}

fn run(calc: &mut Calculator, keys: &str) -> Output {
    let mut out = calc.submit(Command::Clear);
    for cmd in parse_keys(keys).unwrap() {
        out = calc.submit(cmd);
    }
    out
}

fn check(calc: &mut Calculator, fixtures: &[Fixture]) {
    for f in fixtures {
        let out = run(calc, f.keys);
        assert_eq!(out.error, None, "keys: {}", f.keys);
        assert_eq!(out.display, f.display, "keys: {}", f.keys);
        assert_eq!(out.expression, f.expression, "keys: {}", f.keys);
    }
}

#[test]
fn standard_sequences() {
    let mut calc = Calculator::default();
    check(
        &mut calc,
        &[
            fx("1+2=", "3", "1 + 2 ="),
            fx("7-10=", "-3", "7 − 10 ="),
            fx("1/3=", "0.3333333333333333", "1 ÷ 3 ="),
            fx("2/3=", "0.6666666666666667", "2 ÷ 3 ="),
            fx("0.1+0.2=", "0.3", "0.1 + 0.2 ="),
            fx("1.50", "1.50", ""),
            fx("1.50+1=", "2.5", "1.5 + 1 ="),
            fx("999999*999999=", "999,998,000,001", "999,999 × 999,999 ="),
            fx("9999999999999999+1=", "1.e+16", "9,999,999,999,999,999 + 1 ="),
            fx("3+4+", "7", "3 + 4 + "),
            fx("9 sqrt", "3", "√(9)"),
            fx("2 inv", "0.5", "1/(2)"),
        ],
    );
}

#[test]
fn scientific_sequences() {
    let mut calc = Calculator::default();
    calc.set_mode(Mode::Scientific);
    check(
        &mut calc,
        &[
            fx("2^10=", "1,024", "2 ^ 10 ="),
            fx("27 cbrt", "3", "cuberoot(27)"),
            fx("8 yroot 3=", "2", "8 yroot 3 ="),
            fx("100 log", "2", "log(100)"),
            fx("3 pow10", "1,000", "10^(3)"),
            fx("1 ee 20", "1.e+20", ""),
            fx("90 sin", "1", "sin₀(90)"),
            fx("0.5 asin", "30", "sin₀⁻¹(0.5)"),
            fx("60 sec", "2", "sec₀(60)"),
            fx("2 acsc", "30", "csc₀⁻¹(2)"),
            fx("0 sech", "1", "sech(0)"),
            fx("2.5 neg floor", "-3", "floor(-2.5)"),
            fx("2.5 neg ceil", "-2", "ceil(-2.5)"),
            fx("7.9 int", "7", "int(7.9)"),
            fx("1.5 dms", "1.3", "dms(1.5)"),
            fx("1.3 degrees", "1.5", "degrees(1.3)"),
            fx("3 pow2", "8", "2^(3)"),
            fx("2*(3+4)=", "14", "2 × (3 + 4) ="),
            fx("(1+2)*(3+4)=", "21", "(1 + 2) × (3 + 4) ="),
            fx("2*(3+4=", "14", "2 × (3 + 4) ="),
            fx("10−(2^3)=", "2", "10 − (2 ^ 3) ="),
        ],
    );
    calc.set_angle_unit(AngleUnit::Gradians);
    check(&mut calc, &[fx("100 sin", "1", "sinᵍ(100)")]);
}

#[test]
fn programmer_sequences() {
    let mut calc = Calculator::default();
    calc.set_mode(Mode::Programmer);
    check(
        &mut calc,
        &[
            fx("12 and 10=", "8", "12 AND 10 ="),
            fx("12 or 3=", "15", "12 OR 3 ="),
            fx("1 << 4=", "16", "1 Lsh 4 ="),
            fx("7 mod 3=", "1", "7 Mod 3 ="),
        ],
    );
    calc.set_radix(Radix::Hex);
    check(&mut calc, &[fx("FF+1=", "100", "FF + 1 =")]);
    calc.set_word_size(WordSize::Byte);
    check(&mut calc, &[fx("7F+1=", "80", "7F + 1 =")]);
    calc.set_radix(Radix::Decimal);
    check(&mut calc, &[fx("127+1=", "-128", "127 + 1 =")]);
}

#[test]
fn unsigned_byte_wraps() {
    let mut calc = Calculator::default();
    calc.set_mode(Mode::Programmer);
    calc.set_word_size(WordSize::Byte);
    calc.set_signedness(Signedness::Unsigned);
    check(
        &mut calc,
        &[
            fx("255+1=", "0", "255 + 1 ="),
            fx("0-1=", "255", "0 − 1 ="),
            fx("12 neg", "244", "negate(12)"),
            fx("12 neg +1=", "245", "negate(12) + 1 ="),
            fx("(1+2)*3=", "9", "(1 + 2) × 3 ="),
        ],
    );
}

#[test]
fn errors_and_recovery() {
    let mut calc = Calculator::default();
    let cases = [
        ("5/0=", CalcError::DivisionByZero),
        ("0/0=", CalcError::Undefined),
        ("0 inv", CalcError::DivisionByZero),
        ("4 neg sqrt", CalcError::InvalidInput),
    ];
    for (keys, err) in cases {
        let out = run(&mut calc, keys);
        assert_eq!(out.error, Some(err), "keys: {keys}");
        assert_eq!(calc.state(), State::Error);
        let out = calc.submit(Command::ClearEntry);
        assert_eq!(out.error, None);
        assert_eq!(out.display, "0");
        assert_eq!(calc.state(), State::Ready);
    }
}

#[test]
fn rejected_commands_keep_state() {
    let mut calc = Calculator::default();
    run(&mut calc, "6*7");
    let before = calc.snapshot();
    for cmd in [
        Command::Unary(calc_rs::ops::UnaryOp::Sin),
        Command::Digit('F'),
        Command::Memory(MemoryOp::Store, 42),
        Command::RadixChange(Radix::Binary),
    ] {
        let out = calc.submit(cmd);
        assert!(out.error.is_some(), "{cmd:?}");
        assert_eq!(calc.snapshot(), before, "{cmd:?}");
    }
    assert_eq!(calc.submit(Command::Equals).display, "42");
}

#[test]
fn memory_survives_mode_change() {
    let mut calc = Calculator::default();
    run(&mut calc, "12 ms");
    calc.set_mode(Mode::Programmer);
    let out = calc.submit(Command::Memory(MemoryOp::Recall, 0));
    assert_eq!(out.display, "12");
    calc.set_mode(Mode::Scientific);
    let out = calc.submit(Command::Memory(MemoryOp::Recall, 0));
    assert_eq!(out.display, "12");
}

#[test]
fn european_separators() {
    let mut calc = Calculator::new(EngineConfig {
        format: calc_rs::display::FormatOptions {
            decimal: ',',
            group: '.',
            ..Default::default()
        },
        ..EngineConfig::default()
    });
    let out = run(&mut calc, "1234.5*2=");
    assert_eq!(out.display, "2.469");
    assert_eq!(out.expression, "1.234,5 × 2 =");
}
