/* Calc-rs (c) 2025 Nathaniel Clark
 *
 * This source code is subject to the terms of the GPL v2. See LICENCE file.
 */

use crate::ui::{help_text, CalcDisplay, Message, Screen};
use calc_rs::{
    command::{Command, MemoryOp},
    numbers::{word::Signedness, Mode, Radix},
};

use crossterm::{
    event::{self, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame, Terminal,
};
use std::{error::Error, io::Stdout};

#[derive(Debug, Clone, Default)]
struct CalcInfo {
    screen: Screen,
    error: Option<String>,
    input: String,
    popup: Option<(String, String)>,
    // location of scroll in popup text
    popup_scroll: u16,
    // Maximum scroll value
    popup_max_scroll: u16,
    // Height of popup
    popup_height: u16,
}

enum Scroll {
    Top,
    Bottom,
    Up(u16),
    Down(u16),
}

pub(crate) struct TuiCalcUI {
    info: CalcInfo,
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

/// helper function to create a centered rectangle using up certain percentage of the available rectangle `r`
// From tui-rs/examples/popup.rs
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

fn ui(info: &mut CalcInfo, f: &mut Frame) {
    let chunks = Layout::default()
        .constraints([
            Constraint::Length(1),
            Constraint::Min(2),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .margin(0)
        .split(f.area());

    let title = Line::from(vec![
        Span::styled(
            format!("{}  ", info.screen.mode_line()),
            Modifier::BOLD,
        ),
        Span::styled(
            info.error.clone().unwrap_or_default(),
            Style::default().fg(Color::Red),
        ),
    ]);
    f.render_widget(Paragraph::new(title), chunks[0]);

    let body = vec![
        Line::from(info.screen.expression.as_str()),
        Line::from(Span::styled(
            info.screen.display.as_str(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
    ];
    let display = Paragraph::new(body)
        .alignment(Alignment::Right)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::TOP | Borders::BOTTOM));
    f.render_widget(display, chunks[1]);

    f.render_widget(Paragraph::new(info.screen.memory_line()), chunks[2]);
    f.render_widget(Paragraph::new(info.input.as_str()), chunks[3]);

    if let Some((title, text)) = info.popup.as_ref() {
        let block = Block::default().title(title.as_str()).borders(Borders::ALL);
        let area = centered_rect(80, 80, f.area());
        let inner = block.inner(area);
        info.popup_height = inner.height;
        info.popup_max_scroll = text
            .lines()
            .count()
            .checked_sub(inner.height.into())
            .unwrap_or_default() as u16;
        let p = Paragraph::new(text.as_str()).scroll((info.popup_scroll, 0));
        f.render_widget(Clear, area);
        f.render_widget(block, area);
        f.render_widget(p, inner);
    } else {
        f.set_cursor_position(Position::new(
            chunks[3].x + info.input.len() as u16,
            chunks[3].y,
        ));
    }
}

impl TuiCalcUI {
    fn show_popup(&mut self, title: &str, text: String) {
        self.info.popup = Some((title.to_string(), text));
        self.info.popup_scroll = 0;
    }

    /// Keys follow less(1)
    fn popup_key(&mut self, kcode: KeyCode) {
        let page = self.info.popup_height;
        let scroll = match kcode {
            KeyCode::Esc | KeyCode::Char('q' | 'Q') => {
                self.info.popup = None;
                return;
            }
            KeyCode::Home | KeyCode::Char('g' | 'p') => Scroll::Top,
            KeyCode::End | KeyCode::Char('G' | 'F') => Scroll::Bottom,
            KeyCode::Down | KeyCode::Enter | KeyCode::Char('e' | 'j' | 'J') => Scroll::Down(1),
            KeyCode::Up | KeyCode::Char('k' | 'y') => Scroll::Up(1),
            KeyCode::Char('d') => Scroll::Down(page / 2),
            KeyCode::Char('u') => Scroll::Up(page / 2),
            KeyCode::PageDown | KeyCode::Char(' ' | 'f' | 'z') => Scroll::Down(page),
            KeyCode::PageUp | KeyCode::Char('b' | 'w') => Scroll::Up(page),
            _ => return,
        };
        let info = &mut self.info;
        info.popup_scroll = match scroll {
            Scroll::Top => 0,
            Scroll::Bottom => info.popup_max_scroll,
            Scroll::Down(n) => info.popup_scroll.saturating_add(n).min(info.popup_max_scroll),
            Scroll::Up(n) => info.popup_scroll.saturating_sub(n),
        };
    }

    /// Control key shortcuts
    fn hotkey(&mut self, c: char) -> Option<Message> {
        let cmd = match c {
            'l' => {
                self.info.input.clear();
                Command::Clear
            }
            'q' => return Some(Message::Quit),
            'h' => return Some(Message::Help),
            'g' => return Some(Message::Log),
            'e' => Command::ToggleExponential,
            'r' => Command::Memory(MemoryOp::Recall, 0),
            'd' => Command::RadixChange(Radix::Decimal),
            'x' => Command::RadixChange(Radix::Hex),
            'b' => Command::RadixChange(Radix::Binary),
            'o' => Command::RadixChange(Radix::Octal),
            's' => Command::ModeChange(Mode::Standard),
            'n' => Command::ModeChange(Mode::Scientific),
            'p' => Command::ModeChange(Mode::Programmer),
            'u' => Command::SignednessChange(match self.info.screen.word.signedness {
                Signedness::Unsigned => Signedness::OnesComplement,
                Signedness::OnesComplement => Signedness::TwosComplement,
                Signedness::TwosComplement => Signedness::Unsigned,
            }),
            c => {
                self.info.error = Some(format!("Unknown hotkey: ^{c}"));
                return None;
            }
        };
        Some(Message::Command(cmd))
    }
}

impl CalcDisplay for TuiCalcUI {
    fn init() -> Result<Self, Box<dyn Error + Send + Sync>> {
        let stdout = std::io::stdout();

        enable_raw_mode()?;
        execute!(&stdout, EnterAlternateScreen)?;

        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;

        Ok(Self {
            info: CalcInfo::default(),
            terminal,
        })
    }

    /// Cleanup and quit
    fn quit(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }

    /// Wait on next Message for event loop
    fn next(&mut self) -> Option<Message> {
        loop {
            if let Err(e) = self.terminal.draw(|f| ui(&mut self.info, f)) {
                log::error!("draw failed: {e}");
                break;
            }

            match event::read() {
                Err(e) => {
                    log::error!("event read failed: {e}");
                    break;
                }
                Ok(Event::Key(k)) => {
                    let kcode = match k.code {
                        KeyCode::Char(c) if k.modifiers.contains(KeyModifiers::SHIFT) => {
                            KeyCode::Char(c.to_ascii_uppercase())
                        }
                        _ => k.code,
                    };
                    if self.info.popup.is_some() {
                        self.popup_key(kcode);
                        continue;
                    }
                    match kcode {
                        KeyCode::Char(c) if k.modifiers.contains(KeyModifiers::CONTROL) => {
                            if let Some(msg) = self.hotkey(c) {
                                return Some(msg);
                            }
                        }
                        KeyCode::Char(c) => self.info.input.push(c),
                        KeyCode::Enter => {
                            let line = std::mem::take(&mut self.info.input);
                            return Some(Message::from_line(line));
                        }
                        KeyCode::Backspace => {
                            let _ = self.info.input.pop();
                        }
                        KeyCode::Esc if self.info.input.is_empty() => {
                            return Some(Message::Command(Command::ClearEntry))
                        }
                        KeyCode::Esc => self.info.input.clear(),
                        _ => {}
                    }
                }
                Ok(Event::Paste(val)) => self.info.input.push_str(&val),
                Ok(Event::Resize(_, _)) => {}
                Ok(e) => log::debug!("ignored event: {e:?}"),
            }
        }
        None
    }

    /// Set/Clear error message
    fn set_error(&mut self, msg: Option<String>) {
        self.info.error = msg;
    }

    /// Display Dialog with text
    fn dialog(&mut self, msg: String) {
        self.show_popup("Log", msg);
    }

    fn update(&mut self, screen: Screen) {
        self.info.screen = screen;
    }

    /// Show Help Text
    fn help(&mut self) {
        let mut text = help_text();
        text.push_str(
            "\n\nHotkeys     ^l clear  ^e exponential  ^r recall M0  ^g log  ^h help  ^q quit\n\
             \x20           ^d ^x ^b ^o radix   ^s ^n ^p mode   ^u signedness",
        );
        self.show_popup("Help", text);
    }
}
