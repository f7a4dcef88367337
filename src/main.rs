// wedge CLI entry point

mod config;
mod internals;

use config::Config;
use internals::tui::RawConsole;
use std::io::IsTerminal;
use wedge::dispatcher::{interactive_loop, loading_loop, mode_char};
use wedge::primitives::{install_standard_words, install_unsafe_words};
use wedge::stream::Stream;
use wedge::vm::Vm;

/// Drive the interactive loop with raw-mode line editing when stdin is a
/// real terminal. Each submitted line is fed through the tokenizer and
/// dispatcher one line at a time; a multi-line colon definition simply
/// spans several prompts, same as the cooked loop.
fn raw_interactive_loop(vm: &mut Vm) -> wedge::VmResult<()> {
    let mut console = match RawConsole::new() {
        Ok(c) => c,
        Err(_) => return interactive_loop(vm),
    };

    loop {
        let prompt = if vm.stack.is_empty() {
            format!("{} ", mode_char(vm.mode))
        } else {
            format!("{} <{}> ", mode_char(vm.mode), vm.stack.len())
        };

        let line = match console.read_line(&prompt) {
            Some(l) => l,
            None => {
                let _ = console.cleanup();
                return Ok(());
            }
        };

        vm.input = Stream::from_string(&line);
        if let Err(e) = loading_loop(vm) {
            let text = vm.report(&e);
            println!("{text}");
        }
    }
}

/// Try each candidate core-library path in order, loading the first one
/// that opens. A missing or unreadable file is not fatal; the interpreter
/// starts with no core library rather than aborting.
fn load_first_existing_core(vm: &mut Vm, explicit: &str) {
    let mut candidates = vec![explicit.to_string()];
    candidates.extend(config::DEFAULT_CORE.iter().map(|s| s.to_string()));

    for path in candidates {
        match std::fs::File::open(&path) {
            Ok(file) => {
                vm.input = Stream::from_reader(file, Some(std::rc::Rc::from(path.as_str())));
                if let Err(e) = loading_loop(vm) {
                    let report = vm.report(&e);
                    vm.msg.warning("load_core", "error loading core library", Some(report));
                }
                return;
            }
            Err(_) => continue,
        }
    }
    vm.msg.info("load_core", "no core library found; starting bare", None::<String>);
}

fn main() {
    let mut config = Config::new();
    config.process_args();

    let mut vm = Vm::new().expect("failed to allocate virtual machine");
    vm.msg.set_level(config.debug_level);
    install_standard_words(&mut vm).expect("failed to install standard words");
    install_unsafe_words(&mut vm).expect("failed to install unsafe words");

    if !config.no_core {
        load_first_existing_core(&mut vm, &config.core_file);
    }

    if !config.loaded_file.is_empty() {
        match std::fs::File::open(&config.loaded_file) {
            Ok(file) => {
                vm.input = Stream::from_reader(file, Some(std::rc::Rc::from(config.loaded_file.as_str())));
                if let Err(e) = loading_loop(&mut vm) {
                    eprintln!("{}", vm.report(&e));
                    std::process::exit(1);
                }
            }
            Err(e) => {
                eprintln!("{}: {}", config.loaded_file, e);
                std::process::exit(1);
            }
        }
        return;
    }

    if !config.inline_sources.is_empty() {
        for src in &config.inline_sources {
            vm.input = Stream::from_string(src);
            if let Err(e) = loading_loop(&mut vm) {
                eprintln!("{}", vm.report(&e));
            }
        }
        return;
    }

    vm.output = Stream::from_writer(std::io::stdout(), None);

    let result = if std::io::stdin().is_terminal() {
        raw_interactive_loop(&mut vm)
    } else {
        vm.input = Stream::from_reader(std::io::stdin(), None);
        interactive_loop(&mut vm)
    };
    if let Err(e) = result {
        eprintln!("{}", vm.report(&e));
    }
}
