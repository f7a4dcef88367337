//! Float words: `f+ f- f* f/ f.`, operating on `i64` cells whose low 32
//! bits hold an `f32`'s bit pattern (see [`crate::number`]).

use crate::errors::VmError;
use crate::errors::VmResult;
use crate::vm::Vm;

fn to_f32(bits: i64) -> f32 {
    f32::from_bits(bits as u32)
}

fn from_f32(f: f32) -> i64 {
    f.to_bits() as i32 as i64
}

pub fn install(vm: &mut Vm) -> VmResult<()> {
    vm.install_builtin("f+", |vm| {
        let b = vm.stack.pop()?;
        let a = vm.stack.pop()?;
        vm.stack.push(from_f32(to_f32(a) + to_f32(b)))
    })?;
    vm.install_builtin("f-", |vm| {
        let b = vm.stack.pop()?;
        let a = vm.stack.pop()?;
        vm.stack.push(from_f32(to_f32(a) - to_f32(b)))
    })?;
    vm.install_builtin("f*", |vm| {
        let b = vm.stack.pop()?;
        let a = vm.stack.pop()?;
        vm.stack.push(from_f32(to_f32(a) * to_f32(b)))
    })?;
    vm.install_builtin("f/", |vm| {
        let b = vm.stack.pop()?;
        let a = vm.stack.pop()?;
        if to_f32(b) == 0.0 {
            return Err(VmError::DivisionByZero);
        }
        vm.stack.push(from_f32(to_f32(a) / to_f32(b)))
    })?;
    vm.install_builtin("f.", |vm| {
        let a = vm.stack.pop()?;
        vm.put_string(format!("{} ", to_f32(a)).as_bytes())
    })?;
    Ok(())
}
