//! Host binding helpers.
//!
//! Each arity is a generic wrapper that captures a native closure and
//! installs it as an ordinary [`crate::dictionary::Action::Builtin`].
//! The stack's topmost value is always the rightmost argument.

use crate::errors::VmResult;
use crate::vm::Vm;

pub fn install_void_0(vm: &mut Vm, name: &str, f: impl Fn() + 'static) -> VmResult<usize> {
    vm.install_builtin(name, move |_vm| {
        f();
        Ok(())
    })
}

pub fn install_void_1(vm: &mut Vm, name: &str, f: impl Fn(i64) + 'static) -> VmResult<usize> {
    vm.install_builtin(name, move |vm| {
        let a = vm.stack.pop()?;
        f(a);
        Ok(())
    })
}

pub fn install_void_2(vm: &mut Vm, name: &str, f: impl Fn(i64, i64) + 'static) -> VmResult<usize> {
    vm.install_builtin(name, move |vm| {
        let b = vm.stack.pop()?;
        let a = vm.stack.pop()?;
        f(a, b);
        Ok(())
    })
}

pub fn install_int_0(vm: &mut Vm, name: &str, f: impl Fn() -> i64 + 'static) -> VmResult<usize> {
    vm.install_builtin(name, move |vm| vm.stack.push(f()))
}

pub fn install_int_1(vm: &mut Vm, name: &str, f: impl Fn(i64) -> i64 + 'static) -> VmResult<usize> {
    vm.install_builtin(name, move |vm| {
        let a = vm.stack.pop()?;
        vm.stack.push(f(a))
    })
}

pub fn install_int_2(vm: &mut Vm, name: &str, f: impl Fn(i64, i64) -> i64 + 'static) -> VmResult<usize> {
    vm.install_builtin(name, move |vm| {
        let b = vm.stack.pop()?;
        let a = vm.stack.pop()?;
        vm.stack.push(f(a, b))
    })
}

pub fn install_void_3(vm: &mut Vm, name: &str, f: impl Fn(i64, i64, i64) + 'static) -> VmResult<usize> {
    vm.install_builtin(name, move |vm| {
        let c = vm.stack.pop()?;
        let b = vm.stack.pop()?;
        let a = vm.stack.pop()?;
        f(a, b, c);
        Ok(())
    })
}

pub fn install_void_4(vm: &mut Vm, name: &str, f: impl Fn(i64, i64, i64, i64) + 'static) -> VmResult<usize> {
    vm.install_builtin(name, move |vm| {
        let d = vm.stack.pop()?;
        let c = vm.stack.pop()?;
        let b = vm.stack.pop()?;
        let a = vm.stack.pop()?;
        f(a, b, c, d);
        Ok(())
    })
}

pub fn install_void_5(
    vm: &mut Vm,
    name: &str,
    f: impl Fn(i64, i64, i64, i64, i64) + 'static,
) -> VmResult<usize> {
    vm.install_builtin(name, move |vm| {
        let e = vm.stack.pop()?;
        let d = vm.stack.pop()?;
        let c = vm.stack.pop()?;
        let b = vm.stack.pop()?;
        let a = vm.stack.pop()?;
        f(a, b, c, d, e);
        Ok(())
    })
}

pub fn install_int_3(vm: &mut Vm, name: &str, f: impl Fn(i64, i64, i64) -> i64 + 'static) -> VmResult<usize> {
    vm.install_builtin(name, move |vm| {
        let c = vm.stack.pop()?;
        let b = vm.stack.pop()?;
        let a = vm.stack.pop()?;
        vm.stack.push(f(a, b, c))
    })
}

pub fn install_int_4(
    vm: &mut Vm,
    name: &str,
    f: impl Fn(i64, i64, i64, i64) -> i64 + 'static,
) -> VmResult<usize> {
    vm.install_builtin(name, move |vm| {
        let d = vm.stack.pop()?;
        let c = vm.stack.pop()?;
        let b = vm.stack.pop()?;
        let a = vm.stack.pop()?;
        vm.stack.push(f(a, b, c, d))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_2_binds_topmost_as_rightmost_argument() {
        let mut vm = Vm::new().unwrap();
        let sub = install_int_2(&mut vm, "sub", |a, b| a - b).unwrap();
        vm.stack.push(10).unwrap();
        vm.stack.push(3).unwrap();
        vm.run(sub).unwrap();
        assert_eq!(vm.stack.pop().unwrap(), 7);
    }

    #[test]
    fn void_1_consumes_its_argument() {
        let mut vm = Vm::new().unwrap();
        let seen = std::rc::Rc::new(std::cell::Cell::new(0i64));
        let seen2 = seen.clone();
        let w = install_void_1(&mut vm, "note", move |a| seen2.set(a)).unwrap();
        vm.stack.push(42).unwrap();
        vm.run(w).unwrap();
        assert_eq!(seen.get(), 42);
        assert_eq!(vm.stack.len(), 0);
    }
}
