//! # Seed Search
//!
//! Some programs are only interesting for the right starting register
//! value. This module tries many seeds at once, each on its own copy of a
//! prepared machine, and reports the smallest seed that produces an accepted
//! result. No machine is shared between workers.
use crate::vm::{Halt, Interpreter, Machine, Register, Word};
use log::{debug, trace};
use rayon::prelude::*;
use std::ops::Range;

/// Is this output a clock signal (`0, 1, 0, 1, ...`)?
pub fn is_clock_signal(output: &[Word]) -> bool {
    !output.is_empty()
        && output
            .iter()
            .enumerate()
            .all(|(i, &value)| value == (i % 2) as Word)
}

/// Run the machine for at most `max_steps` instructions.
///
/// Returns `None` if the machine was still running when it ran out of steps.
pub fn run_bounded(machine: &mut Machine, max_steps: usize) -> Option<Halt> {
    for _ in 0..max_steps {
        if let Some(halt) = Interpreter.step(machine) {
            return Some(halt);
        }
    }
    None
}

/// Find the smallest seed in `seeds` for which `base`, started with
/// `register` set to that seed, halts within `max_steps` instructions and
/// satisfies `accept`.
///
/// Each seed runs on its own copy of `base`, so registers seeded and
/// instructions patched before the search apply to every candidate. The
/// seeds are tried in parallel.
pub fn find_seed<F>(base: &Machine, register: Register, seeds: Range<Word>, max_steps: usize, accept: F) -> Option<Word>
where
    F: Fn(&Machine, Halt) -> bool + Sync,
{
    seeds.into_par_iter().find_first(|&seed| {
        let mut machine = base.clone().with_register(register, seed);
        match run_bounded(&mut machine, max_steps) {
            Some(halt) => {
                let accepted = accept(&machine, halt);
                trace!("seed {seed} halted ({halt}) with output {:?}: accepted={accepted}", machine.output());
                accepted
            }
            None => {
                debug!("seed {seed} still running after {max_steps} steps");
                false
            }
        }
    })
}

/// Find the smallest seed that makes the program write a clock signal
/// until its output buffer is full.
pub fn find_clock_seed(base: &Machine, register: Register, seeds: Range<Word>, max_steps: usize) -> Option<Word> {
    find_seed(base, register, seeds, max_steps, |machine, halt| {
        halt == Halt::OutputFull && is_clock_signal(machine.output())
    })
}
