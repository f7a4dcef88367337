//! A small leveled diagnostic facility used by the command-line front end
//! and by VM-internal warnings (redefinition notices, tracer output).
//!
//! This is intentionally not a `tracing` subscriber: the engine is a small
//! single-threaded embeddable library, not a service, and call sites want a
//! direct `msg.error(caller, text, context)` rather than structured spans.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DebugLevel {
    Error,
    Warning,
    Info,
    Debug,
}

impl fmt::Display for DebugLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DebugLevel::Error => "error",
            DebugLevel::Warning => "warning",
            DebugLevel::Info => "info",
            DebugLevel::Debug => "debug",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for DebugLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "error" => Ok(DebugLevel::Error),
            "warning" => Ok(DebugLevel::Warning),
            "info" => Ok(DebugLevel::Info),
            "debug" => Ok(DebugLevel::Debug),
            other => Err(format!("unknown debug level: {other}")),
        }
    }
}

/// Leveled message sink. Clone is cheap; it carries no buffered state,
/// only the current threshold.
#[derive(Debug, Clone)]
pub struct Msg {
    level: DebugLevel,
}

impl Msg {
    pub fn new() -> Self {
        Msg { level: DebugLevel::Warning }
    }

    pub fn set_level(&mut self, level: DebugLevel) {
        self.level = level;
    }

    pub fn get_level(&self) -> DebugLevel {
        self.level
    }

    fn emit(&self, level: DebugLevel, caller: &str, text: &str, context: Option<String>) {
        if level > self.level {
            return;
        }
        match context {
            Some(ctx) => eprintln!("[{level}] {caller}: {text} ({ctx})"),
            None => eprintln!("[{level}] {caller}: {text}"),
        }
    }

    pub fn error(&self, caller: &str, text: &str, context: Option<impl fmt::Display>) {
        self.emit(DebugLevel::Error, caller, text, context.map(|c| c.to_string()));
    }

    pub fn warning(&self, caller: &str, text: &str, context: Option<impl fmt::Display>) {
        self.emit(DebugLevel::Warning, caller, text, context.map(|c| c.to_string()));
    }

    pub fn info(&self, caller: &str, text: &str, context: Option<impl fmt::Display>) {
        self.emit(DebugLevel::Info, caller, text, context.map(|c| c.to_string()));
    }

    pub fn debug(&self, caller: &str, text: &str, context: Option<impl fmt::Display>) {
        self.emit(DebugLevel::Debug, caller, text, context.map(|c| c.to_string()));
    }
}

impl Default for Msg {
    fn default() -> Self {
        Msg::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_ordering_gates_output() {
        let mut m = Msg::new();
        assert_eq!(m.get_level(), DebugLevel::Warning);
        m.set_level(DebugLevel::Debug);
        assert_eq!(m.get_level(), DebugLevel::Debug);
    }

    #[test]
    fn parses_from_str() {
        assert_eq!("debug".parse::<DebugLevel>().unwrap(), DebugLevel::Debug);
        assert!("bogus".parse::<DebugLevel>().is_err());
    }
}
