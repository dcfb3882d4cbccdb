//! # Virtual Machine Module
//!
//! This module contains all things related to the virtual machine.
//!
//! ### What is this machine?
//!
//! This virtual machine is a tiny register machine. There are four
//! registers (`a`, `b`, `c` and `d`), a fixed length program, an
//! instruction pointer, and a bounded output buffer.
//!
//! The interesting part is the `tgl` instruction: it rewrites the opcode
//! of another instruction *while the program is running*. Since `tgl`
//! only looks at the arity of the instruction it rewrites, it can produce
//! instructions that make no sense (like `inc 4`). The interpreter does not
//! treat those as errors; they are skipped like a `nop`.
//!
//! ### What data can it use?
//!
//! Every register and every literal is a 32 bit signed integer ([`Word`]).
//! Arithmetic wraps on overflow.
//!
//! ### How do I run a program?
//!
//! ```
//! use assembunny::{parse::parse_program, vm::*};
//!
//! let program = parse_program("cpy 41 a\ninc a").unwrap();
//! let mut machine = Machine::new(program, 16);
//! Interpreter.run(&mut machine);
//! assert_eq!(machine.register(Register::A), 42);
//! ```
use std::fmt;

mod core;
pub use self::core::*;

mod machine;
pub use self::machine::*;

mod interpreter;
pub use self::interpreter::*;

mod patch;
pub use self::patch::*;

/// The value stored in a register, a literal, or the output buffer.
pub type Word = i32;

/// The number of registers in the register file.
pub const REGISTER_COUNT: usize = 4;

/// An error raised while *building* a machine.
///
/// Running a machine never fails: every odd situation during execution
/// is either a no-op or a clean halt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// A register name other than `a` through `d`.
    InvalidRegister(String),
    /// An instruction built with the wrong number of operands for its opcode.
    ArityMismatch {
        opcode: Opcode,
        expected: usize,
        found: usize,
    },
    /// A patch addressed an instruction outside of the program.
    IndexOutOfRange { index: usize, len: usize },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::InvalidRegister(name) => write!(f, "invalid register `{name}` (expected one of a, b, c, d)"),
            Self::ArityMismatch {
                opcode,
                expected,
                found,
            } => write!(f, "`{opcode}` takes {expected} operand(s), but {found} were given"),
            Self::IndexOutOfRange { index, len } => {
                write!(f, "instruction #{index} is outside of the program (length {len})")
            }
        }
    }
}

impl std::error::Error for Error {}
