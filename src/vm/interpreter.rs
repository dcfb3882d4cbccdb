//! # Interpreter Module
//!
//! This module implements the fetch-decode-execute loop of the virtual
//! machine. The interpreter itself holds no data: everything it reads and
//! writes lives in the [`Machine`] it is given.
//!
//! ## When does a program stop?
//!
//! There are only two ways out of the loop:
//!
//! 1. The instruction pointer leaves the program (in either direction).
//! 2. An `out` instruction fills the output buffer.
//!
//! Nothing else stops the machine. In particular, an instruction whose
//! operands do not fit its opcode (which `tgl` can produce, like `cpy 1 2`
//! or `inc 4`) is skipped, and the pointer moves on to the next instruction.
use super::{Instruction, Machine, Opcode, Operand};
use log::{debug, trace};
use std::fmt;

/// Why the interpreter stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Halt {
    /// The instruction pointer left the program.
    PointerOutOfRange,
    /// An `out` instruction filled the output buffer.
    OutputFull,
}

impl fmt::Display for Halt {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Halt::PointerOutOfRange => write!(f, "instruction pointer left the program"),
            Halt::OutputFull => write!(f, "output buffer is full"),
        }
    }
}

/// The interpreter which runs a machine's program.
#[derive(Clone, Copy, Debug, Default)]
pub struct Interpreter;

impl Interpreter {
    /// Run the machine until it halts.
    ///
    /// This never fails, and never returns until the machine halts. Programs
    /// that loop forever without writing output will hang; use [`Interpreter::step`]
    /// to bound the number of instructions executed.
    pub fn run(&self, machine: &mut Machine) -> Halt {
        loop {
            if let Some(halt) = self.step(machine) {
                debug!("halted at #{}: {halt}", machine.pointer());
                return halt;
            }
        }
    }

    /// Run a single instruction.
    ///
    /// Returns `Some` if the machine is halted, in which case nothing was
    /// executed unless the instruction was the `out` that filled the buffer.
    pub fn step(&self, machine: &mut Machine) -> Option<Halt> {
        let instruction = match machine.fetch() {
            Some(instruction) => instruction,
            None => return Some(Halt::PointerOutOfRange),
        };
        trace!("#{}: {instruction}", machine.pointer());

        match (instruction.opcode(), instruction.operands()) {
            (Opcode::Cpy, &[src, Operand::Register(dst)]) => {
                let value = machine.resolve(src);
                machine.set_register(dst, value)
            }
            (Opcode::Inc, &[Operand::Register(dst)]) => {
                let value = machine.register_mut(dst);
                *value = value.wrapping_add(1)
            }
            (Opcode::Dec, &[Operand::Register(dst)]) => {
                let value = machine.register_mut(dst);
                *value = value.wrapping_sub(1)
            }
            (Opcode::Jnz, &[cond, offset]) => {
                if machine.resolve(cond) != 0 {
                    let offset = machine.resolve(offset) as isize;
                    machine.advance(offset);
                    return None;
                }
            }
            (Opcode::Tgl, &[offset]) => {
                let offset = machine.resolve(offset) as isize;
                self.toggle(machine, offset)
            }
            (Opcode::Out, &[src]) => {
                let value = machine.resolve(src);
                if !machine.push_output(value) || machine.is_output_full() {
                    // The pointer stays on the `out` that filled the buffer.
                    return Some(Halt::OutputFull);
                }
            }
            (Opcode::Mul, &[x, y, Operand::Register(dst)]) => {
                let value = machine.resolve(x).wrapping_mul(machine.resolve(y));
                machine.set_register(dst, value)
            }
            (Opcode::Nop, _) => {}
            // `tgl` only keeps the number of operands right, not their kinds.
            // Whatever it produced that can't be executed is skipped.
            _ => debug!("skipping nonsense instruction #{}: {instruction}", machine.pointer()),
        }

        machine.advance(1);
        None
    }

    /// Rewrite the opcode of the instruction at `offset` from the pointer.
    /// Targets outside of the program are ignored.
    fn toggle(&self, machine: &mut Machine, offset: isize) {
        let index = match machine.index_from_pointer(offset) {
            Some(index) => index,
            None => {
                debug!("#{} toggles nothing at offset {offset}", machine.pointer());
                return;
            }
        };

        let toggled = machine.instruction(index).map(Instruction::toggled);
        if let Some(toggled) = toggled {
            if let Ok(old) = machine.replace(index, toggled) {
                debug!("#{} toggled #{index}: `{old}` became `{toggled}`", machine.pointer());
            }
        }
    }
}
