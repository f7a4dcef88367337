//! Arena and dictionary access words: `@ ! c@ c! +! here there where allot
//! align! constant create find string,` and friends.

use crate::dictionary::Action;
use crate::errors::VmResult;
use crate::vm::Vm;

pub fn install(vm: &mut Vm) -> VmResult<()> {
    vm.install_builtin("@", |vm| {
        let addr = vm.stack.pop()? as usize;
        vm.stack.push(vm.arena.cell(addr)?)
    })?;
    vm.install_builtin("!", |vm| {
        let addr = vm.stack.pop()? as usize;
        let v = vm.stack.pop()?;
        vm.arena.set_cell(addr, v)
    })?;
    vm.install_builtin("c@", |vm| {
        let addr = vm.stack.pop()? as usize;
        vm.stack.push(vm.arena.byte(addr)? as i64)
    })?;
    vm.install_builtin("c!", |vm| {
        let addr = vm.stack.pop()? as usize;
        let v = vm.stack.pop()?;
        vm.arena.set_byte(addr, v as u8)
    })?;
    vm.install_builtin("+!", |vm| {
        let addr = vm.stack.pop()? as usize;
        let delta = vm.stack.pop()?;
        let old = vm.arena.cell(addr)?;
        vm.arena.set_cell(addr, old + delta)
    })?;

    vm.install_builtin("here", |vm| vm.stack.push(vm.arena.here() as i64))?;
    vm.install_builtin("there", |vm| vm.stack.push(vm.arena.there() as i64))?;
    vm.install_builtin("where", |vm| vm.stack.push(vm.dict.len() as i64))?;
    vm.install_builtin("allot", |vm| {
        let n = vm.stack.pop()?;
        vm.arena.allot(n as usize)?;
        Ok(())
    })?;
    vm.install_builtin("align!", |vm| vm.arena.align())?;
    vm.install_builtin(",", |vm| {
        let v = vm.stack.pop()?;
        vm.arena.comma(v)?;
        Ok(())
    })?;
    vm.install_builtin("string,", |vm| {
        let offset = vm.stack.pop()? as usize;
        let len = vm.stack.pop()? as usize;
        let bytes: Vec<u8> = (0..len).map(|i| vm.arena.byte(offset + i)).collect::<VmResult<_>>()?;
        let at = vm.arena.intern(&bytes)?;
        vm.stack.push(at as i64)
    })?;

    vm.install_builtin("constant", |vm| {
        let v = vm.stack.pop()?;
        let idx = vm.dict.last_index()?;
        let word = vm.dict.get_mut(idx)?;
        word.action = Action::Constant;
        word.datum = v;
        Ok(())
    })?;
    vm.install_builtin("create", |vm| {
        let offset = vm.stack.pop()? as usize;
        let bytes = vm.arena.read_counted(offset)?.to_vec();
        let name = String::from_utf8_lossy(&bytes).into_owned();
        vm.arena.align()?;
        let here = vm.arena.here() as i64;
        vm.install(&name, Action::Sequence, here)?;
        Ok(())
    })?;

    vm.install_builtin("create-local", |vm| {
        let offset = vm.stack.pop()? as usize;
        let bytes = vm.arena.read_counted(offset)?.to_vec();
        let name = String::from_utf8_lossy(&bytes).into_owned();
        vm.dict.declare_local(&name)?;
        Ok(())
    })?;
    vm.install_builtin("reset-locals", |vm| {
        vm.dict.reset_locals();
        Ok(())
    })?;
    vm.install_builtin("compile-grab", |vm| {
        let arity = vm.dict.local_count();
        if arity > 0 {
            let grab = crate::dictionary::Dictionary::grab_for(arity)?;
            vm.arena.comma(grab as i64)?;
        }
        Ok(())
    })?;

    vm.install_builtin("find", |vm| {
        let offset = vm.stack.pop()? as usize;
        let bytes = vm.arena.read_counted(offset)?.to_vec();
        let name = String::from_utf8_lossy(&bytes).into_owned();
        match vm.dict.lookup(&name) {
            Some(idx) => {
                vm.stack.push(idx as i64)?;
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

    #[test]
    fn fetch_store_round_trip() {
        let mut vm = Vm::new().unwrap();
        install(&mut vm).unwrap();
        let addr = vm.arena.allot(crate::arena::CELL_SIZE).unwrap();
        let store = vm.dict.lookup("!").unwrap();
        let fetch = vm.dict.lookup("@").unwrap();
        vm.stack.push(123).unwrap();
        vm.stack.push(addr as i64).unwrap();
        vm.run(store).unwrap();
        vm.stack.push(addr as i64).unwrap();
        vm.run(fetch).unwrap();
        assert_eq!(vm.stack.pop().unwrap(), 123);
    }

    #[test]
    fn allot_advances_here_by_requested_amount() {
        let mut vm = Vm::new().unwrap();
        install(&mut vm).unwrap();
        let allot = vm.dict.lookup("allot").unwrap();
        let before = vm.arena.here();
        vm.stack.push(16).unwrap();
        vm.run(allot).unwrap();
        assert_eq!(vm.arena.here(), before + 16);
    }

    #[test]
    fn create_installs_a_new_word_at_here() {
        let mut vm = Vm::new().unwrap();
        install(&mut vm).unwrap();
        let create = vm.dict.lookup("create").unwrap();
        let name = vm.arena.intern(b"buf").unwrap();
        let expected_here = vm.arena.here() as i64;
        vm.stack.push(name as i64).unwrap();
        vm.run(create).unwrap();
        let idx = vm.dict.lookup("buf").unwrap();
        let word = vm.dict.get(idx).unwrap();
        assert!(matches!(word.action, Action::Sequence));
        assert_eq!(word.datum, expected_here);
    }

    #[test]
    fn create_local_then_reset_locals_round_trips() {
        let mut vm = Vm::new().unwrap();
        install(&mut vm).unwrap();
        let create_local = vm.dict.lookup("create-local").unwrap();
        let reset = vm.dict.lookup("reset-locals").unwrap();
        let name = vm.arena.intern(b"n").unwrap();
        vm.stack.push(name as i64).unwrap();
        vm.run(create_local).unwrap();
        assert_eq!(vm.dict.local_count(), 1);
        vm.run(reset).unwrap();
        assert_eq!(vm.dict.local_count(), 0);
    }

    #[test]
    fn compile_grab_emits_nothing_with_no_locals() {
        let mut vm = Vm::new().unwrap();
        install(&mut vm).unwrap();
        let compile_grab = vm.dict.lookup("compile-grab").unwrap();
        let before = vm.arena.here();
        vm.run(compile_grab).unwrap();
        assert_eq!(vm.arena.here(), before);
    }

    #[test]
    fn find_reports_presence_with_a_flag() {
        let mut vm = Vm::new().unwrap();
        install(&mut vm).unwrap();
        let find = vm.dict.lookup("find").unwrap();
        let name_offset = vm.arena.intern(b"here").unwrap();
        vm.stack.push(name_offset as i64).unwrap();
        vm.run(find).unwrap();
        assert_eq!(vm.stack.pop().unwrap(), -1);
        assert_eq!(vm.stack.pop().unwrap(), vm.dict.lookup("here").unwrap() as i64);
    }
}
