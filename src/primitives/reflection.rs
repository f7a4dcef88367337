//! Reflection words: toggling the default step tracer.
//!
//! `start-tracing`/`stop-tracing` flip a tracer that prints the word
//! about to be fetched and the current stack on every inner-interpreter
//! step, built on top of the host-pluggable tracer hook on [`Vm`].

use crate::errors::VmResult;
use crate::vm::Vm;

fn default_tracer(vm: &Vm, word: usize) -> bool {
    let name = vm.dict.get(word).map(|w| w.name.clone()).unwrap_or_else(|_| "?".into());
    eprintln!("trace: {name} <{}> {:?}", vm.stack.len(), vm.stack.as_slice());
    false
}

pub fn install(vm: &mut Vm) -> VmResult<()> {
    vm.install_builtin("start-tracing", |vm| {
        vm.tracing = true;
        vm.set_tracer(Box::new(default_tracer));
        Ok(())
    })?;
    vm.install_builtin("stop-tracing", |vm| {
        vm.tracing = false;
        vm.clear_tracer();
        Ok(())
    })?;
    Ok(())
}
