/* Calc-rs (c) 2025 Nathaniel Clark
 *
 * This source code is subject to the terms of the GPL v2. See LICENCE file.
 */

use crate::ui::Flavor;
use calc_rs::{
    display::FormatOptions,
    numbers::{
        word::{Signedness, WordSize},
        AngleUnit, Mode, Radix,
    },
    EngineConfig,
};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Args {
    /// Front-end to run
    #[arg(long, value_enum, default_value_t)]
    pub ui: Flavor,

    #[arg(long, value_enum, default_value_t)]
    pub mode: Mode,

    /// Display radix (programmer mode only)
    #[arg(long, value_enum, default_value_t)]
    pub radix: Radix,

    #[arg(long, value_enum, default_value_t)]
    pub angle: AngleUnit,

    /// Programmer mode word size
    #[arg(long, value_enum, default_value_t)]
    pub word: WordSize,

    /// Programmer mode interpretation of the top bit
    #[arg(long, value_enum, default_value_t)]
    pub signedness: Signedness,

    /// Decimal separator
    #[arg(long, default_value_t = '.')]
    pub decimal: char,

    /// Digit group separator
    #[arg(long, default_value_t = ',')]
    pub separator: char,

    /// Digit grouping, e.g. "3;0" or "3;2;0"
    #[arg(long, default_value = "3;0")]
    pub group: String,

    #[arg(long)]
    pub no_grouping: bool,

    /// Evaluate by operator precedence instead of left to right
    #[arg(long)]
    pub precedence: bool,

    /// Completed calculations to remember
    #[arg(long, default_value_t = 20)]
    pub log_size: usize,

    /// Used when RUST_LOG is not set
    #[arg(long, default_value = "error")]
    pub log_level: String,

    /// Run a key sequence, print the result and exit
    #[arg(long, value_name = "KEYS")]
    pub eval: Option<String>,
}

impl Args {
    pub fn engine_config(&self) -> Result<EngineConfig, String> {
        let grouping = FormatOptions::parse_grouping(&self.group)
            .map_err(|_| format!("Bad grouping: {}", self.group))?;
        if self.decimal == self.separator {
            return Err(format!(
                "Decimal and group separator are both '{}'",
                self.decimal
            ));
        }
        Ok(EngineConfig {
            format: FormatOptions {
                decimal: self.decimal,
                group: self.separator,
                grouping,
                show_grouping: !self.no_grouping,
            },
            log_capacity: self.log_size,
            precedence: self.precedence,
        })
    }
}
