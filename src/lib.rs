//! A small, embeddable concatenative scripting engine.
//!
//! The [`vm::Vm`] owns a data stack, a bump-allocated data arena, an
//! append-only dictionary, and a pair of buffered streams. Source text is
//! tokenized, mode-dispatched into compiled sequences or immediate
//! execution, and run by the inner interpreter in [`interpreter`].

pub mod arena;
pub mod dictionary;
pub mod dispatcher;
pub mod errors;
pub mod handler;
pub mod host;
pub mod interpreter;
pub mod messages;
pub mod number;
pub mod primitives;
pub mod stack;
pub mod stream;
pub mod tokenizer;
pub mod vm;

pub use errors::{Diagnostic, VmError, VmResult};
pub use vm::Vm;

#[cfg(test)]
mod integration_tests {
    use crate::dispatcher::loading_loop;
    use crate::primitives::install_standard_words;
    use crate::stream::Stream;
    use crate::vm::Vm;

    fn new_vm_with_output() -> (Vm, std::rc::Rc<std::cell::RefCell<Vec<u8>>>) {
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
        install_standard_words(&mut vm).unwrap();
        let out = Rc::new(RefCell::new(Vec::new()));
        vm.output = Stream::from_writer(SharedBuf(out.clone()), None);
        (vm, out)
    }

    fn run(src: &str) -> (Vm, String) {
        let (mut vm, out) = new_vm_with_output();
        vm.input = Stream::from_string(src);
        loading_loop(&mut vm).unwrap();
        vm.flush_output().unwrap();
        let text = String::from_utf8(out.borrow().clone()).unwrap();
        (vm, text)
    }

    #[test]
    fn add_and_print() {
        let (_, out) = run("2 3 + .");
        assert_eq!(out, "5 ");
    }

    #[test]
    fn colon_definition_with_a_local() {
        let (_, out) = run(": sq { n } n n * ; 7 sq .");
        assert_eq!(out, "49 ");
    }

    #[test]
    fn zero_equal_reports_forth_booleans() {
        let (_, out) = run(": f 0 = ; 0 f . 1 f .");
        assert_eq!(out, "-1 0 ");
    }

    #[test]
    fn string_round_trip_through_c_fetch() {
        let (_, out) = run("\"hi\" dup c@ emit");
        assert_eq!(out, "h");
    }

    #[test]
    fn catch_intercepts_division_by_zero() {
        let (mut vm, _) = new_vm_with_output();
        vm.input = Stream::from_string(": bang 1 0 / ; ' bang catch");
        loading_loop(&mut vm).unwrap();
        assert_ne!(vm.stack.pop().unwrap(), 0);
    }

    #[test]
    fn nested_definitions_compose() {
        let (_, out) = run(": double 2 * ; : quad double double ; 5 quad .");
        assert_eq!(out, "20 ");
    }
}
