/* Calc-rs (c) 2025 Nathaniel Clark
 *
 * This source code is subject to the terms of the GPL v2. See LICENCE file.
 */

//! Exact decimal calculator engine.
//!
//! Feed [`Command`]s to a [`Calculator`] one at a time; every command
//! answers with the display text, the expression trail and the error it
//! produced, if any.

pub mod command;
pub mod display;
pub mod engine;
pub mod error;
pub mod numbers;
pub mod ops;
pub mod stack;

pub use command::{parse_keys, Command};
pub use engine::{Calculator, EngineConfig, EngineState, Output, State};
pub use error::CalcError;
