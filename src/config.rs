// system configuration and command line processing

use ::clap::{arg, Command};
use wedge::messages::DebugLevel;

pub const VERSION: &str = "0.1.0";
pub const DEFAULT_CORE: [&str; 3] = ["./corelib.ts", "~/.wedge/corelib.ts", "src/forth/corelib.ts"];

pub struct Config {
    pub debug_level: DebugLevel,
    pub loaded_file: String,
    pub core_file: String,
    pub no_core: bool,
    pub inline_sources: Vec<String>,
}

impl Config {
    pub fn new() -> Config {
        Config {
            debug_level: DebugLevel::Warning,
            loaded_file: "".to_owned(),
            core_file: DEFAULT_CORE[0].to_owned(),
            no_core: false,
            inline_sources: Vec::new(),
        }
    }

    /// process_args handles command line argument processing using the clap library
    ///
    pub fn process_args(&mut self) -> &Config {
        let arguments = Command::new("wedge")
            .version(VERSION)
            .about("A small embeddable concatenative scripting engine")
            .arg(
                arg!(--debuglevel <VALUE>)
                    .required(false)
                    .value_parser(["error", "warning", "info", "debug"]),
            )
            .arg(arg!(-l --library <VALUE>).required(false))
            .arg(arg!(-f --file <VALUE>).required(false))
            .arg(arg!(-n --nocore).required(false))
            .arg(arg!([sources] ... "inline source fragments"))
            .get_matches();

        let debuglevel = arguments.get_one::<String>("debuglevel");
        if let Some(debuglevel) = debuglevel {
            match debuglevel.as_str() {
                "debug" => self.debug_level = DebugLevel::Debug,
                "info" => self.debug_level = DebugLevel::Info,
                "error" => self.debug_level = DebugLevel::Error,
                _ => self.debug_level = DebugLevel::Warning,
            }
        }

        let library = arguments.get_one::<String>("library");
        if let Some(lib) = library {
            self.core_file = lib.to_string();
        }

        self.no_core = arguments.get_flag("nocore");

        let file = arguments.get_one::<String>("file");
        if let Some(file) = file {
            self.loaded_file = file.clone();
        }

        if let Some(sources) = arguments.get_many::<String>("sources") {
            self.inline_sources = sources.cloned().collect();
        }
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Config::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_the_first_core_candidate() {
        let c = Config::new();
        assert_eq!(c.core_file, DEFAULT_CORE[0]);
        assert!(!c.no_core);
    }
}
