//! The virtual machine: ties together the stack, arena, dictionary,
//! streams, and handler chain, and exposes the run/load/catch surface.

use crate::arena::Arena;
use crate::dictionary::{Action, Dictionary, SpecialWord};
use crate::errors::{Diagnostic, VmError, VmResult};
use crate::handler::HandlerChain;
use crate::messages::Msg;
use crate::stack::Stack;
use crate::stream::Stream;

/// How the dispatcher should treat the next token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// `(` — execute each word as it is read.
    Interpret,
    /// `:` — the next token names a new definition.
    AwaitDefinitionName,
    /// `)` — compile each word into the definition's body.
    Compile,
    /// `{` — the next tokens name locals, until `}`.
    AwaitLocalName,
}

pub type Tracer = Box<dyn FnMut(&Vm, usize) -> bool>;
pub type ColonTracer = Box<dyn FnMut(&Vm, usize) -> bool>;

pub struct Vm {
    pub stack: Stack,
    pub arena: Arena,
    pub dict: Dictionary,
    pub mode: Mode,
    pub input: Stream,
    pub output: Stream,
    pub handlers: HandlerChain,
    pub msg: Msg,
    pub tracing: bool,
    tracer: Option<Tracer>,
    colon_tracer: Option<ColonTracer>,
    saved_streams: Vec<(Stream, Stream)>,
}

impl Vm {
    pub fn new() -> VmResult<Self> {
        let mut dict = Dictionary::new();
        dict.install_specials()?;
        Ok(Vm {
            stack: Stack::new(),
            arena: Arena::new(),
            dict,
            mode: Mode::Interpret,
            input: Stream::closed(),
            output: Stream::closed(),
            handlers: HandlerChain::new(),
            msg: Msg::new(),
            tracing: false,
            tracer: None,
            colon_tracer: None,
            saved_streams: Vec::new(),
        })
    }

    pub fn set_tracer(&mut self, f: Tracer) {
        self.tracer = Some(f);
    }

    pub fn clear_tracer(&mut self) {
        self.tracer = None;
    }

    pub fn set_colon_tracer(&mut self, f: ColonTracer) {
        self.colon_tracer = Some(f);
    }

    pub fn clear_colon_tracer(&mut self) {
        self.colon_tracer = None;
    }

    fn trace_step(&mut self, word: usize) -> VmResult<()> {
        if !self.tracing {
            return Ok(());
        }
        if let Some(mut f) = self.tracer.take() {
            let stop = f(self, word);
            self.tracer = Some(f);
            if stop {
                self.tracing = false;
            }
        }
        Ok(())
    }

    fn trace_call(&mut self, word: usize) {
        if let Some(mut f) = self.colon_tracer.take() {
            f(self, word);
            self.colon_tracer = Some(f);
        }
    }

    pub fn diagnostic(&self, error: VmError) -> Diagnostic {
        Diagnostic { place: self.input.place.clone(), error }
    }

    /// Record the error message into the arena's reserved region and
    /// return it, so the message is always retrievable even once the
    /// stack has failed.
    pub fn report(&mut self, error: &VmError) -> String {
        let text = format!("{}", self.diagnostic(error.clone()));
        self.arena.write_message(&text);
        text
    }

    pub fn install(&mut self, name: &str, action: Action, datum: i64) -> VmResult<usize> {
        self.dict.install(name, action, datum)
    }

    pub fn install_builtin<F>(&mut self, name: &str, f: F) -> VmResult<usize>
    where
        F: Fn(&mut Vm) -> VmResult<()> + 'static,
    {
        self.dict.install(name, Action::Builtin(std::rc::Rc::new(f)), 0)
    }

    /// Run a single word by dictionary index. Sequential-only words
    /// (special primitives) cannot be entered directly.
    pub fn run(&mut self, word: usize) -> VmResult<()> {
        let action = self.dict.get(word)?.action.clone();
        match action {
            Action::Special(_) => Err(VmError::SequentialOnly),
            Action::Constant => {
                let d = self.dict.get(word)?.datum;
                self.stack.push(d)
            }
            Action::Variable => {
                let d = self.dict.get(word)?.datum;
                self.stack.push(d)
            }
            Action::Builtin(f) => f(self),
            Action::Sequence => {
                let start = self.dict.get(word)?.datum as usize;
                self.trace_call(word);
                crate::interpreter::run_sequence(self, start)
            }
            Action::DoWill { script_offset } => {
                let datum = self.dict.get(word)?.datum;
                self.stack.push(datum + crate::arena::CELL_SIZE as i64)?;
                self.trace_call(word);
                crate::interpreter::run_sequence(self, script_offset)
            }
        }
    }

    pub(crate) fn trace_fetch(&mut self, word: usize) -> VmResult<()> {
        self.trace_step(word)
    }

    /// `catch`: run `word`, restoring the data-stack pointer on failure
    /// and pushing `0`/offset instead of propagating.
    pub fn catch(&mut self, word: usize) -> VmResult<()> {
        let depth = self.stack.len();
        self.handlers.push(depth);
        let result = self.run(word);
        self.handlers.pop();
        match result {
            Ok(()) => self.stack.push(0),
            Err(e) => {
                self.stack.truncate_to(depth);
                let text = self.report(&e);
                let offset = self.arena.intern(text.as_bytes())?;
                self.stack.push(offset as i64)
            }
        }
    }

    /// `throw`: escape with the message found at the given arena offset.
    pub fn throw(&mut self, message_offset: usize) -> VmResult<()> {
        let bytes = self.arena.read_counted(message_offset)?.to_vec();
        Err(VmError::Thrown(String::from_utf8_lossy(&bytes).into_owned()))
    }

    pub fn error(&mut self, message: String) -> VmResult<()> {
        Err(VmError::Other(message))
    }

    /// Temporarily redirect both streams around running `f`, restoring
    /// them on every exit path.
    pub fn with_io<T>(
        &mut self,
        input: Stream,
        output: Stream,
        f: impl FnOnce(&mut Vm) -> VmResult<T>,
    ) -> VmResult<T> {
        let old_input = std::mem::replace(&mut self.input, input);
        let old_output = std::mem::replace(&mut self.output, output);
        self.saved_streams.push((Stream::closed(), Stream::closed()));
        let result = f(self);
        let (_, _) = self.saved_streams.pop().unwrap();
        let _ = std::mem::replace(&mut self.input, old_input);
        let _ = std::mem::replace(&mut self.output, old_output);
        result
    }

    pub fn put_char(&mut self, c: u8) -> VmResult<()> {
        self.output.put_char(c)
    }

    pub fn put_string(&mut self, bytes: &[u8]) -> VmResult<()> {
        self.output.put_string(bytes)
    }

    pub fn flush_output(&mut self) -> VmResult<()> {
        self.output.flush()
    }

    pub fn lookup_special(&self, index: usize) -> Option<SpecialWord> {
        SpecialWord::from_index(index as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_vm_has_reserved_words_installed() {
        let vm = Vm::new().unwrap();
        assert_eq!(vm.dict.lookup(";"), Some(0));
        assert_eq!(vm.mode, Mode::Interpret);
    }

    #[test]
    fn running_a_special_word_is_rejected() {
        let mut vm = Vm::new().unwrap();
        let exit_idx = vm.dict.lookup(";").unwrap();
        assert!(matches!(vm.run(exit_idx), Err(VmError::SequentialOnly)));
    }

    #[test]
    fn catch_restores_stack_on_failure() {
        let mut vm = Vm::new().unwrap();
        let bad = vm.install_builtin("bad", |_vm| Err(VmError::DivisionByZero)).unwrap();
        vm.stack.push(42).unwrap();
        let depth_before = vm.stack.len();
        vm.catch(bad).unwrap();
        assert_eq!(vm.stack.len(), depth_before + 1);
        assert_ne!(vm.stack.pop().unwrap(), 0);
        assert_eq!(vm.stack.len(), depth_before - 1);
    }

    #[test]
    fn catch_pushes_zero_on_success() {
        let mut vm = Vm::new().unwrap();
        let ok = vm.install_builtin("ok", |vm| vm.stack.push(5)).unwrap();
        vm.catch(ok).unwrap();
        assert_eq!(vm.stack.pop().unwrap(), 0);
    }

    #[test]
    fn constant_pushes_its_datum() {
        let mut vm = Vm::new().unwrap();
        let c = vm.install("answer", Action::Constant, 42).unwrap();
        vm.run(c).unwrap();
        assert_eq!(vm.stack.pop().unwrap(), 42);
    }
}
