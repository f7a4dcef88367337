//! Thin wrappers around the platform raw-mode switch, kept separate from
//! [`super::tui`] so the line editor doesn't talk to crossterm directly.

use crossterm::terminal::{disable_raw_mode, enable_raw_mode, is_raw_mode_enabled};
use std::io;

pub fn enable_raw() -> io::Result<()> {
    enable_raw_mode()
}

pub fn disable_raw() -> io::Result<()> {
    disable_raw_mode()
}

pub fn get_raw_mode() -> io::Result<bool> {
    is_raw_mode_enabled()
}
