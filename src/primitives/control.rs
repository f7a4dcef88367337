//! Execution, exception-handling, and number-parsing words:
//! `execute catch throw error parse-number`.

use crate::errors::VmResult;
use crate::number::parse_number;
use crate::vm::Vm;

pub fn install(vm: &mut Vm) -> VmResult<()> {
    vm.install_builtin("execute", |vm| {
        let idx = vm.stack.pop()? as usize;
        vm.run(idx)
    })?;
    vm.install_builtin("catch", |vm| {
        let idx = vm.stack.pop()? as usize;
        vm.catch(idx)
    })?;
    vm.install_builtin("throw", |vm| {
        let offset = vm.stack.pop()? as usize;
        vm.throw(offset)
    })?;
    vm.install_builtin("error", |vm| {
        let offset = vm.stack.pop()? as usize;
        let bytes = vm.arena.read_counted(offset)?.to_vec();
        vm.error(String::from_utf8_lossy(&bytes).into_owned())
    })?;
    vm.install_builtin("parse-number", |vm| {
        let offset = vm.stack.pop()? as usize;
        let bytes = vm.arena.read_counted(offset)?.to_vec();
        let text = String::from_utf8_lossy(&bytes).into_owned();
        match parse_number(&text) {
            Some(n) => {
                vm.stack.push(n)?;
                vm.stack.push(-1)
            }
            None => {
                vm.stack.push(offset as i64)?;
                vm.stack.push(0)
            }
        }
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::Action;

    #[test]
    fn execute_runs_a_word_by_index() {
        let mut vm = Vm::new().unwrap();
        install(&mut vm).unwrap();
        let answer = vm.install("answer", Action::Constant, 7).unwrap();
        let execute = vm.dict.lookup("execute").unwrap();
        vm.stack.push(answer as i64).unwrap();
        vm.run(execute).unwrap();
        assert_eq!(vm.stack.pop().unwrap(), 7);
    }

    #[test]
    fn catch_word_intercepts_a_failing_execute() {
        let mut vm = Vm::new().unwrap();
        install(&mut vm).unwrap();
        let boom = vm.install_builtin("boom", |vm| vm.error("kaboom".into())).unwrap();
        let catch = vm.dict.lookup("catch").unwrap();
        vm.stack.push(boom as i64).unwrap();
        vm.run(catch).unwrap();
        assert_ne!(vm.stack.pop().unwrap(), 0);
    }

    #[test]
    fn parse_number_reports_success_with_a_flag() {
        let mut vm = Vm::new().unwrap();
        install(&mut vm).unwrap();
        let parse = vm.dict.lookup("parse-number").unwrap();
        let offset = vm.arena.intern(b"42").unwrap();
        vm.stack.push(offset as i64).unwrap();
        vm.run(parse).unwrap();
        assert_eq!(vm.stack.pop().unwrap(), -1);
        assert_eq!(vm.stack.pop().unwrap(), 42);
    }

    #[test]
    fn parse_number_reports_failure_for_non_numeric_text() {
        let mut vm = Vm::new().unwrap();
        install(&mut vm).unwrap();
        let parse = vm.dict.lookup("parse-number").unwrap();
        let offset = vm.arena.intern(b"nope").unwrap();
        vm.stack.push(offset as i64).unwrap();
        vm.run(parse).unwrap();
        assert_eq!(vm.stack.pop().unwrap(), 0);
    }
}
