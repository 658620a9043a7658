/* Calc-rs (c) 2025 Nathaniel Clark
 *
 * This source code is subject to the terms of the GPL v2. See LICENCE file.
 */

use calc_rs::{
    command::{parse_keys, Command},
    numbers::Mode,
    Calculator, Output,
};
use clap::Parser;
use std::error::Error;
use tracing_subscriber::EnvFilter;

mod config;
mod ui;

use config::Args;
use ui::{CalcDisplay, Message, Screen};

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    // Also captures the engine's `log` records
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn setup(args: &Args) -> Result<Calculator, String> {
    let mut calc = Calculator::new(args.engine_config()?);
    // The word can only be set up from programmer mode
    calc.set_mode(Mode::Programmer);
    calc.set_word_size(args.word);
    calc.set_signedness(args.signedness);
    calc.set_mode(args.mode);
    calc.set_angle_unit(args.angle);
    if let Some(e) = calc.set_radix(args.radix).error {
        return Err(format!("--radix {}: {e}", args.radix));
    }
    Ok(calc)
}

/// Run a line of keys, stopping at the first error
fn run_keys(calc: &mut Calculator, line: &str) -> Result<Output, String> {
    let mut out = calc.submit(Command::ClearEntry);
    for cmd in parse_keys(line)? {
        out = calc.submit(cmd);
        if out.error.is_some() {
            break;
        }
    }
    Ok(out)
}

fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let args = Args::parse();
    init_logging(&args.log_level);

    let mut calc = setup(&args)?;

    if let Some(keys) = &args.eval {
        let out = run_keys(&mut calc, keys)?;
        if !out.expression.is_empty() {
            println!("{}", out.expression);
        }
        match out.error {
            Some(e) => {
                println!("{e}");
                std::process::exit(1);
            }
            None => println!("{}", out.display),
        }
        return Ok(());
    }

    let mut ui = ui::get_ui(args.ui)?;
    let mut out = calc.submit(Command::ClearEntry);
    ui.update(Screen::new(&calc, &out));

    while let Some(msg) = ui.next() {
        match msg {
            Message::Quit => break,
            Message::Help => {
                ui.help();
                continue;
            }
            Message::Log => {
                let text = calc
                    .log()
                    .iter()
                    .map(|e| format!("{}\n{:>40}", e.expression, e.result))
                    .collect::<Vec<_>>()
                    .join("\n");
                ui.dialog(if text.is_empty() {
                    "No calculations yet".to_string()
                } else {
                    text
                });
                continue;
            }
            Message::Command(cmd) => out = calc.submit(cmd),
            Message::Input(line) if line.trim().is_empty() => out = calc.submit(Command::Equals),
            Message::Input(line) => match parse_keys(&line) {
                Ok(cmds) => {
                    for cmd in cmds {
                        out = calc.submit(cmd);
                    }
                }
                Err(e) => {
                    ui.set_error(Some(e));
                    continue;
                }
            },
        }
        ui.set_error(out.error.map(|e| e.to_string()));
        ui.update(Screen::new(&calc, &out));
    }

    ui.quit();
    Ok(())
}
