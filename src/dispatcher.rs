//! Mode-driven dispatch: consumes one token at a time and either executes
//! it immediately or compiles it into the definition under construction,
//! according to the VM's current [`Mode`].

use crate::dictionary::{Action, Dictionary, SpecialWord};
use crate::errors::{VmError, VmResult};
use crate::number::parse_number;
use crate::tokenizer::{get_token, Token};
use crate::vm::{Mode, Vm};

/// Push a literal value in interpret mode; in compile mode, emit the
/// `LITERAL` marker cell followed by the value, so the inner interpreter
/// can tell a plain data cell apart from a word-index cell.
fn emit(vm: &mut Vm, value: i64) -> VmResult<()> {
    match vm.mode {
        Mode::Interpret => vm.stack.push(value),
        Mode::Compile => {
            vm.arena.comma(SpecialWord::Literal as i64)?;
            vm.arena.comma(value)?;
            Ok(())
        }
        _ => Err(VmError::Other("cannot emit a value in this mode".into())),
    }
}

fn emit_call(vm: &mut Vm, index: usize) -> VmResult<()> {
    match vm.mode {
        Mode::Interpret => vm.run(index),
        Mode::Compile => {
            vm.arena.comma(index as i64)?;
            Ok(())
        }
        _ => Err(VmError::Other("cannot call a word in this mode".into())),
    }
}

/// Run the full comment-skip, mode-switch, default-token table over a
/// single token already read from the input stream.
pub fn dispatch(vm: &mut Vm, token: Token) -> VmResult<()> {
    match token {
        Token::Newline => Ok(()),
        Token::Str(s) => {
            let offset = vm.arena.intern(s.as_bytes())?;
            emit(vm, offset as i64)
        }
        Token::Text(t) => dispatch_text(vm, &t),
    }
}

fn dispatch_text(vm: &mut Vm, t: &str) -> VmResult<()> {
    match t {
        "\\" => skip_comment(vm),
        ":" => {
            vm.mode = Mode::AwaitDefinitionName;
            Ok(())
        }
        "(" => {
            vm.mode = Mode::Interpret;
            Ok(())
        }
        ")" => {
            vm.mode = Mode::Compile;
            Ok(())
        }
        "{" => {
            vm.dict.reset_locals();
            vm.mode = Mode::AwaitLocalName;
            Ok(())
        }
        "}" => finish_locals(vm),
        "if" => compile_if(vm),
        "else" => compile_else(vm),
        "then" => compile_then(vm),
        _ if t.starts_with('$') && t.len() == 2 => {
            let byte = t.as_bytes()[1];
            emit(vm, byte as i64)
        }
        _ if t.starts_with('\'') && t.len() > 1 => {
            let name = &t[1..];
            let idx = vm.dict.lookup(name).ok_or_else(|| VmError::UndefinedWord(name.to_string()))?;
            emit(vm, idx as i64)
        }
        _ => default_token(vm, t),
    }
}

fn skip_comment(vm: &mut Vm) -> VmResult<()> {
    loop {
        match vm.input.get_char()? {
            None => return Ok(()),
            Some(b'\n') => return Ok(()),
            Some(_) => {}
        }
    }
}

/// `if` ... `else` ... `then` compile `BRANCH` cells, threading the
/// not-yet-patched operand address through the data stack the way classic
/// colon-compiling control words do: the address is only ever seen at
/// compile time, never by the running word. `BRANCH` only jumps when the
/// value it pops is zero, so `if` compiles a conditional branch straight
/// off the tested flag, while `else` needs an unconditional skip over the
/// then-clause and gets one by compiling a `LITERAL 0` ahead of its own
/// `BRANCH` cell, forcing the pop to always read zero.
fn compile_if(vm: &mut Vm) -> VmResult<()> {
    if vm.mode != Mode::Compile {
        return Err(VmError::Other("if used outside compilation".into()));
    }
    vm.arena.comma(SpecialWord::Branch as i64)?;
    let operand = vm.arena.here();
    vm.arena.comma(0)?;
    vm.stack.push(operand as i64)
}

fn compile_else(vm: &mut Vm) -> VmResult<()> {
    if vm.mode != Mode::Compile {
        return Err(VmError::Other("else used outside compilation".into()));
    }
    let if_operand = vm.stack.pop()? as usize;
    vm.arena.comma(SpecialWord::Literal as i64)?;
    vm.arena.comma(0)?;
    vm.arena.comma(SpecialWord::Branch as i64)?;
    let else_operand = vm.arena.here();
    vm.arena.comma(0)?;
    vm.arena.set_cell(if_operand, vm.arena.here() as i64)?;
    vm.stack.push(else_operand as i64)
}

fn compile_then(vm: &mut Vm) -> VmResult<()> {
    if vm.mode != Mode::Compile {
        return Err(VmError::Other("then used outside compilation".into()));
    }
    let operand = vm.stack.pop()? as usize;
    vm.arena.set_cell(operand, vm.arena.here() as i64)
}

fn finish_locals(vm: &mut Vm) -> VmResult<()> {
    let arity = vm.dict.local_count();
    if arity == 0 {
        vm.mode = Mode::Compile;
        return Ok(());
    }
    let grab = Dictionary::grab_for(arity)?;
    vm.arena.comma(grab as i64)?;
    vm.mode = Mode::Compile;
    Ok(())
}

fn default_token(vm: &mut Vm, t: &str) -> VmResult<()> {
    match vm.mode {
        Mode::AwaitDefinitionName => {
            vm.arena.align()?;
            let body_start = vm.arena.here();
            vm.dict.install(t, Action::Sequence, body_start as i64)?;
            vm.dict.reset_locals();
            vm.mode = Mode::Compile;
            Ok(())
        }
        Mode::AwaitLocalName => {
            vm.dict.declare_local(t)?;
            Ok(())
        }
        Mode::Interpret | Mode::Compile => {
            if let Some(idx) = vm.dict.lookup(t) {
                emit_call(vm, idx)
            } else if let Some(n) = parse_number(t) {
                emit(vm, n)
            } else {
                Err(VmError::UndefinedWord(t.to_string()))
            }
        }
    }
}

/// Read and dispatch tokens until end of input.
pub fn loading_loop(vm: &mut Vm) -> VmResult<()> {
    loop {
        let token = get_token(&mut vm.input)?;
        match token {
            None => return Ok(()),
            Some(t) => dispatch(vm, t)?,
        }
    }
}

pub fn mode_char(mode: Mode) -> char {
    match mode {
        Mode::Interpret => '(',
        Mode::AwaitDefinitionName => ':',
        Mode::Compile => ')',
        Mode::AwaitLocalName => '{',
    }
}

/// Prompt, read, and dispatch one token at a time, recovering from errors
/// by discarding the rest of the buffered line and reprompting.
pub fn interactive_loop(vm: &mut Vm) -> VmResult<()> {
    loop {
        let prompt = if vm.stack.is_empty() {
            format!("{} ", mode_char(vm.mode))
        } else {
            format!("{} <{}> ", mode_char(vm.mode), vm.stack.len())
        };
        vm.put_string(prompt.as_bytes())?;
        vm.flush_output()?;

        let token = get_token(&mut vm.input);
        match token {
            Ok(None) => return Ok(()),
            Ok(Some(t)) => {
                if let Err(e) = dispatch(vm, t) {
                    let text = vm.report(&e);
                    vm.put_string(text.as_bytes())?;
                    vm.put_char(b'\n')?;
                    vm.input.discard_buffered();
                }
            }
            Err(e) => {
                let text = vm.report(&e);
                vm.put_string(text.as_bytes())?;
                vm.put_char(b'\n')?;
                vm.input.discard_buffered();
            }
        }
    }
}
