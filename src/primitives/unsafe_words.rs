//! The unsafe surface: raw pointer access, file loading, and REPL entry.
//! A host embeds these explicitly via [`crate::primitives::install_unsafe_words`]
//! when it trusts the scripts it runs; they are never installed by
//! [`crate::primitives::install_standard_words`] alone.

use crate::dictionary::Action;
use crate::errors::{VmError, VmResult};
use crate::stream::Stream;
use crate::vm::Vm;
use std::fs::File;

pub fn install(vm: &mut Vm) -> VmResult<()> {
    vm.install_builtin(">data", |vm| {
        let idx = vm.stack.pop()? as usize;
        let datum = vm.dict.get(idx)?.datum;
        vm.stack.push(datum)
    })?;
    vm.install_builtin("@u", |vm| {
        let addr = vm.stack.pop()? as usize;
        vm.stack.push(vm.arena.cell(addr)?)
    })?;
    vm.install_builtin("!u", |vm| {
        let addr = vm.stack.pop()? as usize;
        let v = vm.stack.pop()?;
        vm.arena.set_cell(addr, v)
    })?;
    vm.install_builtin("c@u", |vm| {
        let addr = vm.stack.pop()? as usize;
        vm.stack.push(vm.arena.byte(addr)? as i64)
    })?;
    vm.install_builtin("c!u", |vm| {
        let addr = vm.stack.pop()? as usize;
        let v = vm.stack.pop()?;
        vm.arena.set_byte(addr, v as u8)
    })?;
    vm.install_builtin("+!u", |vm| {
        let addr = vm.stack.pop()? as usize;
        let delta = vm.stack.pop()?;
        let old = vm.arena.cell(addr)?;
        vm.arena.set_cell(addr, old + delta)
    })?;

    vm.install_builtin("load", |vm| {
        let name_offset = vm.stack.pop()? as usize;
        let bytes = vm.arena.read_counted(name_offset)?.to_vec();
        let filename = String::from_utf8_lossy(&bytes).into_owned();
        load_file(vm, &filename)
    })?;

    vm.install_builtin("with-io-on-file", |vm| {
        let word = vm.stack.pop()? as usize;
        let mode_code = vm.stack.pop()?;
        let name_offset = vm.stack.pop()? as usize;
        let bytes = vm.arena.read_counted(name_offset)?.to_vec();
        let filename = String::from_utf8_lossy(&bytes).into_owned();
        with_io_on_file(vm, &filename, mode_code, word)
    })?;

    vm.install_builtin("repl", |vm| crate::dispatcher::interactive_loop(vm))?;

    Ok(())
}

fn load_file(vm: &mut Vm, filename: &str) -> VmResult<()> {
    let file = File::open(filename).map_err(|e| VmError::OpenError(format!("{filename}: {e}")))?;
    let saved_input = std::mem::replace(
        &mut vm.input,
        Stream::from_reader(file, Some(std::rc::Rc::from(filename))),
    );
    let result = crate::dispatcher::loading_loop(vm);
    vm.input = saved_input;
    vm.mode = crate::vm::Mode::Interpret;
    result
}

/// `mode_code`: -1 read-write, 0 read-only, 1 write-only.
fn with_io_on_file(vm: &mut Vm, filename: &str, mode_code: i64, word: usize) -> VmResult<()> {
    use std::fs::OpenOptions;

    let write_only = mode_code == 1;
    let read_write = mode_code == -1;

    let input = if write_only {
        Stream::closed()
    } else {
        let file = File::open(filename).map_err(|e| VmError::OpenError(format!("{filename}: {e}")))?;
        Stream::from_reader(file, Some(std::rc::Rc::from(filename)))
    };
    let output = if write_only || read_write {
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(!read_write)
            .open(filename)
            .map_err(|e| VmError::OpenError(format!("{filename}: {e}")))?;
        Stream::from_writer(file, Some(std::rc::Rc::from(filename)))
    } else {
        Stream::closed()
    };

    vm.with_io(input, output, |vm| vm.run(word))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_pointer_reads_a_words_datum() {
        let mut vm = Vm::new().unwrap();
        install(&mut vm).unwrap();
        let idx = vm.install("thing", Action::Variable, 999).unwrap();
        let to_data = vm.dict.lookup(">data").unwrap();
        vm.stack.push(idx as i64).unwrap();
        vm.run(to_data).unwrap();
        assert_eq!(vm.stack.pop().unwrap(), 999);
    }

    #[test]
    fn unsafe_fetch_store_round_trip() {
        let mut vm = Vm::new().unwrap();
        install(&mut vm).unwrap();
        let addr = vm.arena.allot(crate::arena::CELL_SIZE).unwrap();
        let store = vm.dict.lookup("!u").unwrap();
        let fetch = vm.dict.lookup("@u").unwrap();
        vm.stack.push(77).unwrap();
        vm.stack.push(addr as i64).unwrap();
        vm.run(store).unwrap();
        vm.stack.push(addr as i64).unwrap();
        vm.run(fetch).unwrap();
        assert_eq!(vm.stack.pop().unwrap(), 77);
    }

    #[test]
    fn load_missing_file_reports_open_error() {
        let mut vm = Vm::new().unwrap();
        install(&mut vm).unwrap();
        let load = vm.dict.lookup("load").unwrap();
        let name = vm.arena.intern(b"/nonexistent/path/for/sure.ts").unwrap();
        vm.stack.push(name as i64).unwrap();
        assert!(matches!(vm.run(load), Err(VmError::OpenError(_))));
    }
}
