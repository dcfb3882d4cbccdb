//! # Assembunny
//!
//! This crate implements a tiny register machine, and the tools to load
//! and run programs on it.
//!
//! ## What is Assembunny?
//!
//! Assembunny is a four register machine with a handful of instructions:
//!
//! |             | Instructions                     |
//! |-------------|----------------------------------|
//! | Data        | `cpy x y`, `inc x`, `dec x`      |
//! | Control     | `jnz x y`, `nop`                 |
//! | Self-modify | `tgl x`                          |
//! | Output      | `out x`                          |
//! | Patched in  | `mul x y z`                      |
//!
//! The `tgl` instruction rewrites *another* instruction of the running
//! program, which makes the machine a small lab for self-modifying code.
//! Instructions that `tgl` mangles beyond sense are skipped instead of
//! crashing the machine.
//!
//! ## Index
//!
//! 1. [The Virtual Machine](./vm/index.html)
//! 2. [The Program Parser](./parse/index.html)
//! 3. [Parallel Seed Search](./search/index.html)
//!
//! ## Stages
//!
//! 1. Program text is parsed into [`vm::Instruction`]s by [`parse::parse_program`].
//! 2. The instructions are loaded into a [`vm::Machine`], which the caller may seed
//!    or patch (see [`vm::patch_multiply_loops`]).
//! 3. The [`vm::Interpreter`] runs the machine until it halts, and the caller reads the
//!    registers and output back out of the machine.
pub mod parse;
pub mod search;
pub mod vm;
