//! The inner interpreter: walks a compiled sequence of cells, dispatching
//! each to its meaning.
//!
//! A tail call — a word reference immediately followed by `EXIT` in the
//! calling sequence — replaces the program counter in place instead of
//! recursing, so deeply (tail-)recursive colon definitions never grow the
//! native call stack.

use crate::arena::CELL_SIZE;
use crate::dictionary::{Action, SpecialWord};
use crate::errors::{VmError, VmResult};
use crate::vm::Vm;

pub fn run_sequence(vm: &mut Vm, start: usize) -> VmResult<()> {
    let mut pc = start;
    let mut locals = [0i64; 5];

    loop {
        let w = vm.arena.cell(pc)?;
        pc += CELL_SIZE;
        vm.trace_fetch(w.max(0) as usize)?;

        if let Some(sw) = SpecialWord::from_index(w) {
            match sw {
                SpecialWord::Exit => return Ok(()),
                SpecialWord::Literal => {
                    let v = vm.arena.cell(pc)?;
                    pc += CELL_SIZE;
                    vm.stack.push(v)?;
                }
                SpecialWord::Branch => {
                    let target = vm.arena.cell(pc)? as usize;
                    pc += CELL_SIZE;
                    if vm.stack.pop()? == 0 {
                        pc = target;
                    }
                }
                SpecialWord::DoWill => unreachable!("installed as a word's action, not dispatched here"),
                SpecialWord::Will => {
                    let last = vm.dict.last_index()?;
                    let word = vm.dict.get_mut(last)?;
                    word.action = Action::DoWill { script_offset: pc };
                    return Ok(());
                }
                other if other.local_slot().is_some() => {
                    vm.stack.push(locals[other.local_slot().unwrap()])?;
                }
                other if other.grab_arity().is_some() => {
                    let k = other.grab_arity().unwrap();
                    for slot in locals.iter_mut().take(k) {
                        *slot = vm.stack.pop()?;
                    }
                }
                SpecialWord::Local0
                | SpecialWord::Local1
                | SpecialWord::Local2
                | SpecialWord::Local3
                | SpecialWord::Local4
                | SpecialWord::Grab1
                | SpecialWord::Grab2
                | SpecialWord::Grab3
                | SpecialWord::Grab4
                | SpecialWord::Grab5 => unreachable!("handled by guard arms above"),
            }
            continue;
        }

        let idx: usize = w.try_into().map_err(|_| VmError::InvalidWordIndex)?;
        let action = vm.dict.get(idx)?.action.clone();
        match action {
            Action::Sequence => {
                let callee_start = vm.dict.get(idx)?.datum as usize;
                if vm.arena.cell(pc)? == SpecialWord::Exit as i64 {
                    // Tail position: reuse this frame instead of recursing.
                    pc = callee_start;
                } else {
                    vm.run(idx)?;
                }
            }
            _ => vm.run(idx)?,
        }
    }
}
