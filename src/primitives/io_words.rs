//! Output words: `emit . absorb`.

use crate::errors::VmResult;
use crate::vm::Vm;

pub fn install(vm: &mut Vm) -> VmResult<()> {
    vm.install_builtin("emit", |vm| {
        let c = vm.stack.pop()?;
        vm.put_char(c as u8)
    })?;
    vm.install_builtin(".", |vm| {
        let v = vm.stack.pop()?;
        vm.put_string(format!("{v} ").as_bytes())
    })?;
    vm.install_builtin("absorb", |vm| {
        let c = vm.input.get_char()?;
        vm.stack.push(c.map(|b| b as i64).unwrap_or(-1))
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::Stream;

    #[test]
    fn dot_prints_value_with_trailing_space() {
        use std::cell::RefCell;
        use std::io::Write;
        use std::rc::Rc;

        struct SharedBuf(Rc<RefCell<Vec<u8>>>);
        impl Write for SharedBuf {
            fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
                self.0.borrow_mut().extend_from_slice(buf);
                Ok(buf.len())
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let mut vm = Vm::new().unwrap();
        install(&mut vm).unwrap();
        let out = Rc::new(RefCell::new(Vec::new()));
        vm.output = Stream::from_writer(SharedBuf(out.clone()), None);
        let dot = vm.dict.lookup(".").unwrap();
        vm.stack.push(5).unwrap();
        vm.run(dot).unwrap();
        vm.flush_output().unwrap();
        assert_eq!(&*out.borrow(), b"5 ");
    }

    #[test]
    fn absorb_reads_one_byte_then_reports_eof() {
        let mut vm = Vm::new().unwrap();
        install(&mut vm).unwrap();
        vm.input = Stream::from_string("a");
        let absorb = vm.dict.lookup("absorb").unwrap();
        vm.run(absorb).unwrap();
        assert_eq!(vm.stack.pop().unwrap(), b'a' as i64);
        vm.run(absorb).unwrap();
        assert_eq!(vm.stack.pop().unwrap(), -1);
    }
}
