//! A minimal raw-mode line editor for the interactive front end.
//!
//! Used only by the command-line binary when stdin is a real terminal;
//! the library core never touches the terminal directly (see
//! [`crate::internals::terminal`]).

use super::terminal::{disable_raw, enable_raw, get_raw_mode};
use crossterm::event::{self, Event, KeyCode, KeyModifiers};
use std::io::{self, stdout, Write};

#[derive(Debug)]
pub struct LineEditor {
    buffer: Vec<char>,
    cursor: usize,
    previous_line: Option<String>,
}

impl LineEditor {
    pub fn new() -> Self {
        Self { buffer: Vec::new(), cursor: 0, previous_line: None }
    }

    pub fn run(&mut self, prompt: &str) -> Option<String> {
        self.buffer.clear();
        self.cursor = 0;

        let was_raw = get_raw_mode().unwrap_or(false);
        if !was_raw {
            enable_raw().ok()?;
        }
        print!("{prompt}");
        stdout().flush().ok()?;

        let result = loop {
            if let Ok(Event::Key(key)) = event::read() {
                match key.code {
                    KeyCode::Char(c) if key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT => {
                        self.buffer.insert(self.cursor, c);
                        self.cursor += 1;
                        print!("{c}");
                        stdout().flush().ok()?;
                    }
                    KeyCode::Backspace => {
                        if self.cursor > 0 {
                            self.cursor -= 1;
                            self.buffer.remove(self.cursor);
                            print!("\x08 \x08");
                            stdout().flush().ok()?;
                        }
                    }
                    KeyCode::Left => {
                        if self.cursor > 0 {
                            self.cursor -= 1;
                            print!("\x1b[D");
                            stdout().flush().ok()?;
                        }
                    }
                    KeyCode::Right => {
                        if self.cursor < self.buffer.len() {
                            self.cursor += 1;
                            print!("\x1b[C");
                            stdout().flush().ok()?;
                        }
                    }
                    KeyCode::Up => {
                        if let Some(prev) = &self.previous_line {
                            print!("\r\x1b[K");
                            self.buffer = prev.chars().collect();
                            self.cursor = self.buffer.len();
                            print!("{prompt}{prev}");
                            stdout().flush().ok()?;
                        }
                    }
                    KeyCode::Char('a') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        while self.cursor > 0 {
                            self.cursor -= 1;
                            print!("\x1b[D");
                        }
                        stdout().flush().ok()?;
                    }
                    KeyCode::Char('e') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        while self.cursor < self.buffer.len() {
                            self.cursor += 1;
                            print!("\x1b[C");
                        }
                        stdout().flush().ok()?;
                    }
                    KeyCode::Char('k') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        print!("\x1b[K");
                        self.buffer.truncate(self.cursor);
                        stdout().flush().ok()?;
                    }
                    KeyCode::Enter => {
                        let line: String = self.buffer.iter().collect();
                        self.previous_line = Some(line.clone());
                        print!("\r\n");
                        stdout().flush().ok()?;
                        break Some(line);
                    }
                    KeyCode::Esc => {
                        print!("\r\n");
                        stdout().flush().ok()?;
                        break None;
                    }
                    _ => {}
                }
            }
        };

        if !was_raw {
            disable_raw().ok()?;
        }
        result
    }
}

impl Default for LineEditor {
    fn default() -> Self {
        LineEditor::new()
    }
}

#[derive(Debug)]
pub struct RawConsole {
    editor: LineEditor,
}

impl RawConsole {
    pub fn new() -> Result<Self, io::Error> {
        Ok(Self { editor: LineEditor::new() })
    }

    pub fn read_line(&mut self, prompt: &str) -> Option<String> {
        self.editor.run(prompt)
    }

    pub fn cleanup(&mut self) -> Result<(), io::Error> {
        disable_raw()
    }
}
