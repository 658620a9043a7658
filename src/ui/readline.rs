/* Calc-rs (c) 2025 Nathaniel Clark
 *
 * This source code is subject to the terms of the GPL v2. See LICENCE file.
 */

use crate::ui::{help_text, CalcDisplay, Message, Screen};

use rustyline::{error::ReadlineError, DefaultEditor};
use std::error::Error;

const PROMPT: &str = ">> ";
const WIDTH: usize = 40;

pub struct ReadlineCalcUI {
    editor: DefaultEditor,
    screen: Screen,
    error: Option<String>,
}

impl CalcDisplay for ReadlineCalcUI {
    fn init() -> Result<Self, Box<dyn Error + Send + Sync>> {
        let editor = DefaultEditor::new()?;

        Ok(Self {
            editor,
            screen: Screen::default(),
            error: None,
        })
    }

    /// Wait on next Message for event loop
    fn next(&mut self) -> Option<Message> {
        loop {
            println!();
            println!("[{}]  {}", self.screen.mode_line(), self.screen.memory_line());
            println!("{:>WIDTH$}", self.screen.expression);
            match self.error.as_ref() {
                Some(err) => println!("{:>WIDTH$}", format!("{err} ({})", self.screen.display)),
                None => println!("{:>WIDTH$}", self.screen.display),
            }

            match self.editor.readline(PROMPT) {
                Ok(line) => {
                    let _ = self.editor.add_history_entry(line.as_str());
                    return Some(Message::from_line(line));
                }
                Err(ReadlineError::Eof) | Err(ReadlineError::Interrupted) => break,
                Err(e) => {
                    self.set_error(Some(e.to_string()));
                    continue;
                }
            }
        }
        None
    }

    /// Set/Clear error message
    fn set_error(&mut self, msg: Option<String>) {
        self.error = msg;
    }

    /// Display Dialog with text
    fn dialog(&mut self, msg: String) {
        println!("{msg}");
    }

    fn update(&mut self, screen: Screen) {
        self.screen = screen;
    }

    /// Show Help Text
    fn help(&mut self) {
        println!("{}", help_text());
    }

    /// Cleanup and quit
    fn quit(&mut self) {}
}
