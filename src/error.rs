/* Calc-rs (c) 2025 Nathaniel Clark
 *
 * This source code is subject to the terms of the GPL v2. See LICENCE file.
 */

use thiserror::Error;

/// Every way a command can fail.  The `Display` text is what a front-end
/// shows in place of the number.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalcError {
    #[error("Cannot divide by zero")]
    DivisionByZero,
    /// 0 ÷ 0
    #[error("Result is undefined")]
    Undefined,
    #[error("Invalid input")]
    InvalidInput,
    #[error("Overflow")]
    Overflow,
    #[error("Not available in this mode")]
    ModeMismatch,
}

impl CalcError {
    /// Errors that leave the calculator in the `Error` state, as opposed to
    /// a rejected command that leaves everything untouched.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, CalcError::ModeMismatch)
    }
}

pub type Result<T> = std::result::Result<T, CalcError>;
