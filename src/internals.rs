//! Host-side terminal plumbing for the interactive front end. Nothing
//! under here is reachable from the library crate; scripts never touch
//! the terminal directly.

pub mod terminal;
pub mod tui;
