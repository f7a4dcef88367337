//! The dictionary: an append-only table of named words, plus a small tail
//! region reserved for the locals of the definition currently compiling.
//!
//! Indices 1..=14 are reserved for special primitives with hard-coded
//! dispatch semantics in the inner interpreter (see [`SpecialWord`]).
//! Index 0 is the sentinel that ends every colon definition.

use crate::errors::{VmError, VmResult};

pub const DICTIONARY_SIZE: usize = 2048;
pub const MAX_LOCALS: usize = 5;
pub const LOCAL_NAMES_SIZE: usize = 256;

/// Reserved dictionary indices, fixed so that a compiled cell means the
/// same thing everywhere it appears.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecialWord {
    Exit = 0,
    Literal = 1,
    /// Pops a value and jumps to the operand cell only if it is zero. An
    /// unconditional jump is synthesized by compiling a `Literal 0` cell
    /// pair immediately ahead of the `Branch` cell.
    Branch = 2,
    Local0 = 3,
    Local1 = 4,
    Local2 = 5,
    Local3 = 6,
    Local4 = 7,
    Grab1 = 8,
    Grab2 = 9,
    Grab3 = 10,
    Grab4 = 11,
    Grab5 = 12,
    Will = 13,
    /// Installed in a word's action slot by `will`; never reached through
    /// the numeric dispatch in `run_sequence` itself.
    DoWill = 14,
}

pub const FIRST_USER_WORD: usize = 15;

impl SpecialWord {
    pub fn from_index(i: i64) -> Option<SpecialWord> {
        use SpecialWord::*;
        Some(match i {
            0 => Exit,
            1 => Literal,
            2 => Branch,
            3 => Local0,
            4 => Local1,
            5 => Local2,
            6 => Local3,
            7 => Local4,
            8 => Grab1,
            9 => Grab2,
            10 => Grab3,
            11 => Grab4,
            12 => Grab5,
            13 => Will,
            14 => DoWill,
            _ => return None,
        })
    }

    pub fn local_slot(self) -> Option<usize> {
        use SpecialWord::*;
        match self {
            Local0 => Some(0),
            Local1 => Some(1),
            Local2 => Some(2),
            Local3 => Some(3),
            Local4 => Some(4),
            _ => None,
        }
    }

    pub fn grab_arity(self) -> Option<usize> {
        use SpecialWord::*;
        match self {
            Grab1 => Some(1),
            Grab2 => Some(2),
            Grab3 => Some(3),
            Grab4 => Some(4),
            Grab5 => Some(5),
            _ => None,
        }
    }
}

/// What happens when a word is invoked.
#[derive(Clone)]
pub enum Action {
    /// Reserved primitive; dispatched entirely inside the inner interpreter.
    Special(SpecialWord),
    /// A colon definition: run the compiled sequence starting at `datum`.
    Sequence,
    /// Push `datum` (a `constant`).
    Constant,
    /// Push the arena address `datum` (a `variable`).
    Variable,
    /// A word given a deferred body via `will`; pushes `datum + cell_size`
    /// then enters the sequence recorded at `script_offset`.
    DoWill { script_offset: usize },
    /// A host-registered primitive.
    Builtin(std::rc::Rc<dyn Fn(&mut crate::vm::Vm) -> VmResult<()>>),
}

#[derive(Clone)]
pub struct Word {
    pub name: String,
    pub action: Action,
    pub datum: i64,
}

pub struct Dictionary {
    words: Vec<Word>,
    local_words: usize,
    local_names: [u8; LOCAL_NAMES_SIZE],
    local_names_ptr: usize,
    local_name_offsets: [usize; MAX_LOCALS],
}

impl Dictionary {
    pub fn new() -> Self {
        let mut d = Dictionary {
            words: Vec::with_capacity(DICTIONARY_SIZE),
            local_words: 0,
            local_names: [0u8; LOCAL_NAMES_SIZE],
            local_names_ptr: 0,
            local_name_offsets: [0; MAX_LOCALS],
        };
        d.install_reserved();
        d
    }

    fn install_reserved(&mut self) {}

    fn push_word(&mut self, w: Word) -> VmResult<usize> {
        if self.words.len() >= DICTIONARY_SIZE {
            return Err(VmError::DictionaryFull);
        }
        let idx = self.words.len();
        self.words.push(w);
        Ok(idx)
    }

    /// Install the fourteen hard-coded primitives at indices 0..=14 in
    /// their fixed order, plus the `EXIT` sentinel at 0.
    pub fn install_specials(&mut self) -> VmResult<()> {
        use SpecialWord::*;
        let specials = [
            (";", Exit),
            ("literal", Literal),
            ("branch", Branch),
            ("local0", Local0),
            ("local1", Local1),
            ("local2", Local2),
            ("local3", Local3),
            ("local4", Local4),
            ("grab1", Grab1),
            ("grab2", Grab2),
            ("grab3", Grab3),
            ("grab4", Grab4),
            ("grab5", Grab5),
            ("will", Will),
            ("<<will>>", DoWill),
        ];
        for (name, sw) in specials {
            self.push_word(Word { name: name.to_string(), action: Action::Special(sw), datum: 0 })?;
        }
        Ok(())
    }

    pub fn install(&mut self, name: &str, action: Action, datum: i64) -> VmResult<usize> {
        self.push_word(Word { name: name.to_string(), action, datum })
    }

    pub fn lookup(&self, name: &str) -> Option<usize> {
        for slot in (0..self.local_words).rev() {
            if self.local_name(slot) == name {
                // The local declared last (rightmost in `{a b c}`) is the
                // one popped first at runtime, so it binds to LOCAL0.
                let local_index = self.local_words - slot - 1;
                return SpecialWord::from_index(SpecialWord::Local0 as i64 + local_index as i64)
                    .map(|sw| sw as usize);
            }
        }
        self.words.iter().enumerate().rev().find(|(_, w)| w.name == name).map(|(i, _)| i)
    }

    fn local_name(&self, slot: usize) -> &str {
        let start = self.local_name_offsets[slot];
        let end = self.local_names[start..]
            .iter()
            .position(|&b| b == 0)
            .map(|p| start + p)
            .unwrap_or(self.local_names_ptr);
        std::str::from_utf8(&self.local_names[start..end]).unwrap_or("")
    }

    /// Reset locals for a new definition.
    pub fn reset_locals(&mut self) {
        self.local_words = 0;
        self.local_names_ptr = 0;
    }

    /// Declare one local name, returning its slot index (0-based, in
    /// declaration order).
    pub fn declare_local(&mut self, name: &str) -> VmResult<usize> {
        if self.local_words >= MAX_LOCALS {
            return Err(VmError::TooManyLocals);
        }
        let bytes = name.as_bytes();
        if self.local_names_ptr + bytes.len() + 1 > LOCAL_NAMES_SIZE {
            return Err(VmError::LocalNameSpaceFull);
        }
        let start = self.local_names_ptr;
        self.local_names[start..start + bytes.len()].copy_from_slice(bytes);
        self.local_names[start + bytes.len()] = 0;
        self.local_names_ptr += bytes.len() + 1;
        self.local_name_offsets[self.local_words] = start;
        let slot = self.local_words;
        self.local_words += 1;
        Ok(slot)
    }

    pub fn local_count(&self) -> usize {
        self.local_words
    }

    pub fn grab_for(arity: usize) -> VmResult<SpecialWord> {
        use SpecialWord::*;
        Ok(match arity {
            1 => Grab1,
            2 => Grab2,
            3 => Grab3,
            4 => Grab4,
            5 => Grab5,
            _ => return Err(VmError::TooManyLocals),
        })
    }

    pub fn get(&self, index: usize) -> VmResult<&Word> {
        self.words.get(index).ok_or(VmError::InvalidWordIndex)
    }

    pub fn get_mut(&mut self, index: usize) -> VmResult<&mut Word> {
        self.words.get_mut(index).ok_or(VmError::InvalidWordIndex)
    }

    pub fn last_index(&self) -> VmResult<usize> {
        if self.words.is_empty() {
            Err(VmError::InvalidWordIndex)
        } else {
            Ok(self.words.len() - 1)
        }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl Default for Dictionary {
    fn default() -> Self {
        Dictionary::new()
    }
}
