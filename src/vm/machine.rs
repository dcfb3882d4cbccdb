//! # Machine State
//!
//! A [`Machine`] owns everything a running program can touch: the register
//! file, the program itself (which `tgl` rewrites), the instruction pointer,
//! and a bounded output buffer.
//!
//! A machine is built once from a parsed program, optionally seeded or
//! patched by the caller, run by the [`Interpreter`](super::Interpreter),
//! and then inspected.
use super::{Error, Instruction, Operand, Register, Word, REGISTER_COUNT};
use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Machine {
    /// The register file, indexed by `Register::index`.
    registers: [Word; REGISTER_COUNT],
    /// The program. Its length never changes.
    program: Vec<Instruction>,
    /// The instruction pointer. Anything outside of `0..program.len()` halts the machine.
    pointer: isize,
    /// Every value written with `out`, oldest first.
    output: Vec<Word>,
    /// The most values `output` will ever hold.
    capacity: usize,
}

impl Machine {
    /// Create a machine with zeroed registers, the instruction pointer at
    /// the start of `program`, and room for `capacity` output values.
    pub fn new(program: Vec<Instruction>, capacity: usize) -> Self {
        Self {
            registers: [0; REGISTER_COUNT],
            program,
            pointer: 0,
            output: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Seed a register before running.
    pub fn with_register(mut self, register: Register, value: Word) -> Self {
        self.set_register(register, value);
        self
    }

    pub fn registers(&self) -> &[Word; REGISTER_COUNT] {
        &self.registers
    }

    pub fn registers_mut(&mut self) -> &mut [Word; REGISTER_COUNT] {
        &mut self.registers
    }

    pub fn register(&self, register: Register) -> Word {
        self.registers[register.index()]
    }

    pub fn register_mut(&mut self, register: Register) -> &mut Word {
        &mut self.registers[register.index()]
    }

    pub fn set_register(&mut self, register: Register, value: Word) {
        *self.register_mut(register) = value
    }

    pub fn pointer(&self) -> isize {
        self.pointer
    }

    pub fn set_pointer(&mut self, pointer: isize) {
        self.pointer = pointer
    }

    /// Move the instruction pointer by `offset` instructions.
    pub(crate) fn advance(&mut self, offset: isize) {
        self.pointer = self.pointer.wrapping_add(offset)
    }

    /// Get the value of an operand right now.
    pub fn resolve(&self, operand: Operand) -> Word {
        match operand {
            Operand::Literal(n) => n,
            Operand::Register(r) => self.register(r),
        }
    }

    pub fn program(&self) -> &[Instruction] {
        &self.program
    }

    /// The number of instructions in the program.
    pub fn len(&self) -> usize {
        self.program.len()
    }

    pub fn is_empty(&self) -> bool {
        self.program.is_empty()
    }

    /// Get the instruction at `index`, if there is one.
    pub fn instruction(&self, index: usize) -> Option<&Instruction> {
        self.program.get(index)
    }

    /// Get the index of the instruction at `offset` from the instruction
    /// pointer, if that lands inside of the program.
    pub fn index_from_pointer(&self, offset: isize) -> Option<usize> {
        usize::try_from(self.pointer.checked_add(offset)?)
            .ok()
            .filter(|&index| index < self.program.len())
    }

    /// Fetch the instruction under the instruction pointer.
    pub fn fetch(&self) -> Option<Instruction> {
        self.index_from_pointer(0).map(|index| self.program[index])
    }

    /// Replace the instruction at `index`, returning the old one.
    ///
    /// This is the only way the program ever changes: callers use it to
    /// patch a program before running it, and `tgl` uses it while running.
    pub fn replace(&mut self, index: usize, instruction: Instruction) -> Result<Instruction, Error> {
        let len = self.program.len();
        match self.program.get_mut(index) {
            Some(slot) => Ok(std::mem::replace(slot, instruction)),
            None => Err(Error::IndexOutOfRange { index, len }),
        }
    }

    /// The values written by `out` so far.
    pub fn output(&self) -> &[Word] {
        &self.output
    }

    /// How many values have been written by `out` so far.
    pub fn output_count(&self) -> usize {
        self.output.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_output_full(&self) -> bool {
        self.output.len() >= self.capacity
    }

    /// Append a value to the output buffer. Returns `false` (and drops the
    /// value) if the buffer was already full.
    pub(crate) fn push_output(&mut self, value: Word) -> bool {
        if self.is_output_full() {
            return false;
        }
        self.output.push(value);
        true
    }
}

/// Print the program as a listing.
///
/// The alternate form (`{:#}`) numbers every line and marks the
/// instruction under the instruction pointer.
impl fmt::Display for Machine {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, instruction) in self.program.iter().enumerate() {
            if f.alternate() {
                let marker = if self.index_from_pointer(0) == Some(i) { ">" } else { " " };
                write!(f, "{marker} {i:04}: ")?;
            }
            writeln!(f, "{instruction}")?;
        }
        Ok(())
    }
}
