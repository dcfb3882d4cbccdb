//! The instruction encoding of the virtual machine is defined here.
//!
//! An [`Instruction`] is an [`Opcode`] plus up to three [`Operand`]s.
//! The number of operands is checked against the opcode when the
//! instruction is built, and never again: `tgl` may later swap the opcode
//! for another one of the same arity, but the operands stay the same.
use super::{Error, Word};
use core::{fmt, str::FromStr};

/// One of the four registers of the machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Register {
    A,
    B,
    C,
    D,
}

impl Register {
    /// All of the registers, in register file order.
    pub const ALL: [Register; 4] = [Register::A, Register::B, Register::C, Register::D];

    /// The slot of this register in the register file.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// The single letter name of this register.
    pub const fn name(self) -> char {
        match self {
            Register::A => 'a',
            Register::B => 'b',
            Register::C => 'c',
            Register::D => 'd',
        }
    }
}

impl TryFrom<char> for Register {
    type Error = Error;

    fn try_from(name: char) -> Result<Self, Self::Error> {
        match name {
            'a' => Ok(Register::A),
            'b' => Ok(Register::B),
            'c' => Ok(Register::C),
            'd' => Ok(Register::D),
            _ => Err(Error::InvalidRegister(name.to_string())),
        }
    }
}

impl FromStr for Register {
    type Err = Error;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let mut chars = name.chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) => Register::try_from(ch),
            _ => Err(Error::InvalidRegister(name.to_string())),
        }
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// An operand is either a literal or a register. Registers are only
/// read when the instruction using them executes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operand {
    Literal(Word),
    Register(Register),
}

impl From<Word> for Operand {
    fn from(n: Word) -> Self {
        Operand::Literal(n)
    }
}

impl From<Register> for Operand {
    fn from(r: Register) -> Self {
        Operand::Register(r)
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Operand::Literal(n) => write!(f, "{n}"),
            Operand::Register(r) => write!(f, "{r}"),
        }
    }
}

/// The operation an instruction performs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Opcode {
    /// Copy the first operand into the register named by the second.
    Cpy,
    /// Increment a register.
    Inc,
    /// Decrement a register.
    Dec,
    /// If the first operand is non-zero, jump by the second operand.
    Jnz,
    /// Toggle the opcode of the instruction at an offset from this one.
    Tgl,
    /// Append a value to the output buffer.
    Out,
    /// Do nothing.
    Nop,
    /// Multiply the first two operands into the register named by the third.
    ///
    /// This is never produced by the parser or by `tgl`; it only exists so
    /// that slow loops can be patched out before a program runs.
    Mul,
}

impl Opcode {
    /// The number of operands this opcode takes.
    pub const fn arity(self) -> usize {
        match self {
            Opcode::Nop => 0,
            Opcode::Inc | Opcode::Dec | Opcode::Tgl | Opcode::Out => 1,
            Opcode::Cpy | Opcode::Jnz => 2,
            Opcode::Mul => 3,
        }
    }

    /// The mnemonic used in the textual program format.
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Opcode::Cpy => "cpy",
            Opcode::Inc => "inc",
            Opcode::Dec => "dec",
            Opcode::Jnz => "jnz",
            Opcode::Tgl => "tgl",
            Opcode::Out => "out",
            Opcode::Nop => "nop",
            Opcode::Mul => "mul",
        }
    }

    /// Look up an opcode by its mnemonic.
    pub fn from_mnemonic(name: &str) -> Option<Self> {
        Some(match name {
            "cpy" => Opcode::Cpy,
            "inc" => Opcode::Inc,
            "dec" => Opcode::Dec,
            "jnz" => Opcode::Jnz,
            "tgl" => Opcode::Tgl,
            "out" => Opcode::Out,
            "nop" => Opcode::Nop,
            "mul" => Opcode::Mul,
            _ => return None,
        })
    }

    /// The opcode `tgl` turns this one into.
    ///
    /// One operand opcodes become `inc`, except `inc` itself which becomes
    /// `dec`. Two operand opcodes swap between `jnz` and `cpy`. `out`, `nop`
    /// and `mul` are left alone.
    pub const fn toggled(self) -> Self {
        match self {
            Opcode::Inc => Opcode::Dec,
            Opcode::Dec | Opcode::Tgl => Opcode::Inc,
            Opcode::Jnz => Opcode::Cpy,
            Opcode::Cpy => Opcode::Jnz,
            Opcode::Out | Opcode::Nop | Opcode::Mul => self,
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.mnemonic())
    }
}

/// The largest number of operands any opcode takes.
const MAX_OPERANDS: usize = 3;

/// An individual virtual machine instruction.
///
/// Instructions are small and `Copy`, so the interpreter can fetch one out
/// of the program before it mutates the machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Instruction {
    opcode: Opcode,
    /// Unused trailing slots are always `Literal(0)`.
    operands: [Operand; MAX_OPERANDS],
}

impl Instruction {
    /// Build an instruction, checking that the number of operands matches
    /// the opcode.
    pub fn new(opcode: Opcode, operands: &[Operand]) -> Result<Self, Error> {
        if operands.len() != opcode.arity() {
            return Err(Error::ArityMismatch {
                opcode,
                expected: opcode.arity(),
                found: operands.len(),
            });
        }

        let mut slots = [Operand::Literal(0); MAX_OPERANDS];
        slots[..operands.len()].copy_from_slice(operands);
        Ok(Self {
            opcode,
            operands: slots,
        })
    }

    pub fn cpy(src: impl Into<Operand>, dst: impl Into<Operand>) -> Self {
        Self::with(Opcode::Cpy, [src.into(), dst.into(), Operand::Literal(0)])
    }

    pub fn inc(dst: impl Into<Operand>) -> Self {
        Self::with(Opcode::Inc, [dst.into(), Operand::Literal(0), Operand::Literal(0)])
    }

    pub fn dec(dst: impl Into<Operand>) -> Self {
        Self::with(Opcode::Dec, [dst.into(), Operand::Literal(0), Operand::Literal(0)])
    }

    pub fn jnz(cond: impl Into<Operand>, offset: impl Into<Operand>) -> Self {
        Self::with(Opcode::Jnz, [cond.into(), offset.into(), Operand::Literal(0)])
    }

    pub fn tgl(offset: impl Into<Operand>) -> Self {
        Self::with(Opcode::Tgl, [offset.into(), Operand::Literal(0), Operand::Literal(0)])
    }

    pub fn out(src: impl Into<Operand>) -> Self {
        Self::with(Opcode::Out, [src.into(), Operand::Literal(0), Operand::Literal(0)])
    }

    pub fn nop() -> Self {
        Self::with(Opcode::Nop, [Operand::Literal(0); MAX_OPERANDS])
    }

    pub fn mul(x: impl Into<Operand>, y: impl Into<Operand>, dst: impl Into<Operand>) -> Self {
        Self::with(Opcode::Mul, [x.into(), y.into(), dst.into()])
    }

    const fn with(opcode: Opcode, operands: [Operand; MAX_OPERANDS]) -> Self {
        Self { opcode, operands }
    }

    /// The current opcode of this instruction.
    pub fn opcode(&self) -> Opcode {
        self.opcode
    }

    /// The operands of this instruction.
    pub fn operands(&self) -> &[Operand] {
        &self.operands[..self.opcode.arity()]
    }

    /// The same operands under the opcode `tgl` would switch to.
    ///
    /// The arity never changes, so the operands always line up with the new
    /// opcode, even when their *kinds* do not (`jnz 1 2` toggles to `cpy 1 2`).
    pub fn toggled(&self) -> Self {
        Self {
            opcode: self.opcode.toggled(),
            operands: self.operands,
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.opcode)?;
        for operand in self.operands() {
            write!(f, " {operand}")?;
        }
        Ok(())
    }
}
