//! Signed/unsigned arithmetic, comparison, bitwise, and stack-shuffling
//! words: `+ - * / mod u* u/ umod = < u< and or xor << >> u>>` plus the
//! usual stack-shuffle vocabulary.

use crate::errors::VmError;
use crate::host::{install_int_1, install_int_2};
use crate::errors::VmResult;
use crate::vm::Vm;

pub fn install(vm: &mut Vm) -> VmResult<()> {
    install_int_2(vm, "+", |a, b| a.wrapping_add(b))?;
    install_int_2(vm, "-", |a, b| a.wrapping_sub(b))?;
    install_int_2(vm, "*", |a, b| a.wrapping_mul(b))?;

    vm.install_builtin("/", |vm| {
        let b = vm.stack.pop()?;
        let a = vm.stack.pop()?;
        if b == 0 {
            return Err(VmError::DivisionByZero);
        }
        vm.stack.push(a.wrapping_div(b))
    })?;
    vm.install_builtin("mod", |vm| {
        let b = vm.stack.pop()?;
        let a = vm.stack.pop()?;
        if b == 0 {
            return Err(VmError::DivisionByZero);
        }
        vm.stack.push(a.wrapping_rem(b))
    })?;
    vm.install_builtin("u*", |vm| {
        let b = vm.stack.pop()? as u64;
        let a = vm.stack.pop()? as u64;
        vm.stack.push(a.wrapping_mul(b) as i64)
    })?;
    vm.install_builtin("u/", |vm| {
        let b = vm.stack.pop()? as u64;
        let a = vm.stack.pop()? as u64;
        if b == 0 {
            return Err(VmError::DivisionByZero);
        }
        vm.stack.push((a / b) as i64)
    })?;
    vm.install_builtin("umod", |vm| {
        let b = vm.stack.pop()? as u64;
        let a = vm.stack.pop()? as u64;
        if b == 0 {
            return Err(VmError::DivisionByZero);
        }
        vm.stack.push((a % b) as i64)
    })?;

    install_int_2(vm, "=", |a, b| bool_to_flag(a == b))?;
    install_int_2(vm, "<", |a, b| bool_to_flag(a < b))?;
    install_int_2(vm, "u<", |a, b| bool_to_flag((a as u64) < (b as u64)))?;

    install_int_2(vm, "and", |a, b| a & b)?;
    install_int_2(vm, "or", |a, b| a | b)?;
    install_int_2(vm, "xor", |a, b| a ^ b)?;
    install_int_2(vm, "<<", |a, b| a.wrapping_shl(b as u32))?;
    install_int_2(vm, ">>", |a, b| a.wrapping_shr(b as u32))?;
    install_int_2(vm, "u>>", |a, b| ((a as u64).wrapping_shr(b as u32)) as i64)?;

    install_int_1(vm, "0<", |a| bool_to_flag(a < 0))?;
    install_int_1(vm, "0=", |a| bool_to_flag(a == 0))?;
    install_int_1(vm, "1+", |a| a + 1)?;
    install_int_1(vm, "1-", |a| a - 1)?;
    install_int_1(vm, "2+", |a| a + 2)?;
    install_int_1(vm, "2-", |a| a - 2)?;
    install_int_1(vm, "2*", |a| a * 2)?;
    install_int_1(vm, "4*", |a| a * 4)?;
    install_int_1(vm, "2/", |a| a / 2)?;
    install_int_1(vm, "4/", |a| a / 4)?;
    install_int_1(vm, "cells", |a| a * crate::arena::CELL_SIZE as i64)?;

    vm.install_builtin("clear-stack", |vm| {
        vm.stack.clear();
        Ok(())
    })?;
    vm.install_builtin(".s", |vm| {
        let rendered: Vec<String> = vm.stack.as_slice().iter().map(|v| v.to_string()).collect();
        let line = rendered.join(" ") + "\n";
        vm.put_string(line.as_bytes())
    })?;
    Ok(())
}

fn bool_to_flag(b: bool) -> i64 {
    if b {
        -1
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vm_with_arith() -> Vm {
        let mut vm = Vm::new().unwrap();
        install(&mut vm).unwrap();
        vm
    }

    #[test]
    fn addition_word_works() {
        let mut vm = vm_with_arith();
        let plus = vm.dict.lookup("+").unwrap();
        vm.stack.push(2).unwrap();
        vm.stack.push(3).unwrap();
        vm.run(plus).unwrap();
        assert_eq!(vm.stack.pop().unwrap(), 5);
    }

    #[test]
    fn division_by_zero_errors() {
        let mut vm = vm_with_arith();
        let slash = vm.dict.lookup("/").unwrap();
        vm.stack.push(1).unwrap();
        vm.stack.push(0).unwrap();
        assert!(matches!(vm.run(slash), Err(VmError::DivisionByZero)));
    }

    #[test]
    fn equality_uses_forth_booleans() {
        let mut vm = vm_with_arith();
        let eq = vm.dict.lookup("=").unwrap();
        vm.stack.push(4).unwrap();
        vm.stack.push(4).unwrap();
        vm.run(eq).unwrap();
        assert_eq!(vm.stack.pop().unwrap(), -1);
    }

    #[test]
    fn unsigned_division_treats_operands_as_u64() {
        let mut vm = vm_with_arith();
        let uslash = vm.dict.lookup("u/").unwrap();
        vm.stack.push(-1).unwrap(); // all-ones bit pattern, huge as u64
        vm.stack.push(2).unwrap();
        vm.run(uslash).unwrap();
        assert_eq!(vm.stack.pop().unwrap(), (u64::MAX / 2) as i64);
    }
}
