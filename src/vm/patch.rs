//! # Program Patching
//!
//! Programs written for this machine have no multiply instruction, so they
//! multiply with two nested counting loops. For big numbers this takes
//! billions of instructions. This module finds that idiom and replaces it
//! with the synthetic `mul` instruction before the program runs:
//!
//! ```text
//! cpy 0 T          mul X D T
//! cpy X C          cpy 0 C
//! inc T            cpy 0 D
//! dec C     ==>    nop
//! jnz C -2         nop
//! dec D            nop
//! jnz D -5         nop
//! ```
//!
//! The patched code has the same length, so every other jump in the
//! program still lands where it did before. Jumps *into* the middle of the
//! idiom are not checked for.
use super::{Error, Instruction, Machine, Opcode, Operand, Register};
use log::info;

/// The number of instructions in the multiply idiom.
const IDIOM_LEN: usize = 7;

/// Replace every multiply loop in the machine's program with a `mul`.
/// Returns the number of loops replaced.
pub fn patch_multiply_loops(machine: &mut Machine) -> Result<usize, Error> {
    let mut patched = 0;
    let mut i = 0;
    while i + IDIOM_LEN <= machine.len() {
        match match_multiply(&machine.program()[i..i + IDIOM_LEN]) {
            Some(replacement) => {
                for (j, instruction) in replacement.into_iter().enumerate() {
                    machine.replace(i + j, instruction)?;
                }
                patched += 1;
                i += IDIOM_LEN;
            }
            None => i += 1,
        }
    }

    if patched > 0 {
        info!("replaced {patched} multiply loop(s) with `mul`");
    }
    Ok(patched)
}

/// Check if `window` is the multiply idiom, and build its replacement if so.
fn match_multiply(window: &[Instruction]) -> Option<[Instruction; IDIOM_LEN]> {
    use Opcode::*;
    let [zero, load, _, _, _, outer, _] = window else {
        return None;
    };

    let total = match (zero.opcode(), zero.operands()) {
        (Cpy, &[Operand::Literal(0), Operand::Register(t)]) => t,
        _ => return None,
    };
    let (x, counter) = match (load.opcode(), load.operands()) {
        (Cpy, &[x, Operand::Register(c)]) => (x, c),
        _ => return None,
    };
    let times = match (outer.opcode(), outer.operands()) {
        (Dec, &[Operand::Register(d)]) => d,
        _ => return None,
    };

    let expected = [
        Instruction::inc(total),
        Instruction::dec(counter),
        Instruction::jnz(counter, -2),
        Instruction::dec(times),
        Instruction::jnz(times, -5),
    ];
    if window[2..] != expected[..] || !distinct(total, counter, times) {
        return None;
    }
    // The factor must not be one of the registers the loop clobbers.
    if let Operand::Register(r) = x {
        if r == total || r == counter || r == times {
            return None;
        }
    }

    Some([
        Instruction::mul(x, times, total),
        Instruction::cpy(0, counter),
        Instruction::cpy(0, times),
        Instruction::nop(),
        Instruction::nop(),
        Instruction::nop(),
        Instruction::nop(),
    ])
}

fn distinct(a: Register, b: Register, c: Register) -> bool {
    a != b && b != c && a != c
}

#[cfg(test)]
mod tests {
    use super::*;
    use Register::*;

    fn idiom() -> Vec<Instruction> {
        vec![
            Instruction::cpy(0, A),
            Instruction::cpy(B, C),
            Instruction::inc(A),
            Instruction::dec(C),
            Instruction::jnz(C, -2),
            Instruction::dec(D),
            Instruction::jnz(D, -5),
        ]
    }

    #[test]
    fn test_match_idiom() {
        let replacement = match_multiply(&idiom()).unwrap();
        assert_eq!(replacement[0], Instruction::mul(B, D, A));
        assert_eq!(replacement[1], Instruction::cpy(0, C));
        assert_eq!(replacement[2], Instruction::cpy(0, D));
        assert!(replacement[3..].iter().all(|i| *i == Instruction::nop()));
    }

    #[test]
    fn test_reject_clobbered_factor() {
        let mut code = idiom();
        code[1] = Instruction::cpy(D, C);
        assert!(match_multiply(&code).is_none());
    }

    #[test]
    fn test_reject_wrong_jump() {
        let mut code = idiom();
        code[4] = Instruction::jnz(C, -3);
        assert!(match_multiply(&code).is_none());
    }

    #[test]
    fn test_reject_short_window() {
        assert!(match_multiply(&idiom()[..IDIOM_LEN - 1]).is_none());
    }

    #[test]
    fn test_reject_nonzero_start() {
        let mut code = idiom();
        code[0] = Instruction::cpy(1, A);
        assert!(match_multiply(&code).is_none());
    }
}
