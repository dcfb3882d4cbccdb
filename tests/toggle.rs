use assembunny::vm::*;
use Register::*;

/// A `tgl` at the start of the program aimed at `target`.
fn toggle_once(target: Instruction) -> Instruction {
    let mut machine = Machine::new(vec![Instruction::tgl(1), target], 0);
    assert_eq!(Interpreter.step(&mut machine), None);
    assert_eq!(machine.pointer(), 1);
    *machine.instruction(1).unwrap()
}

#[test]
fn test_one_operand_toggles() {
    assert_eq!(Opcode::Inc.toggled(), Opcode::Dec);
    assert_eq!(Opcode::Dec.toggled(), Opcode::Inc);
    assert_eq!(Opcode::Tgl.toggled(), Opcode::Inc);

    assert_eq!(toggle_once(Instruction::inc(A)), Instruction::dec(A));
    assert_eq!(toggle_once(Instruction::dec(B)), Instruction::inc(B));
    assert_eq!(toggle_once(Instruction::tgl(C)), Instruction::inc(C));
}

#[test]
fn test_two_operand_toggles() {
    assert_eq!(Opcode::Jnz.toggled(), Opcode::Cpy);
    assert_eq!(Opcode::Cpy.toggled(), Opcode::Jnz);

    assert_eq!(toggle_once(Instruction::cpy(1, A)), Instruction::jnz(1, A));
    assert_eq!(toggle_once(Instruction::jnz(B, -2)), Instruction::cpy(B, -2));
}

#[test]
fn test_toggle_twice() {
    for instruction in [
        Instruction::inc(A),
        Instruction::dec(A),
        Instruction::cpy(3, B),
        Instruction::jnz(C, 4),
    ] {
        assert_eq!(toggle_once(toggle_once(instruction)), instruction);
    }

    // `tgl` becomes `inc`, and `inc` goes on to `dec`, never back to `tgl`.
    let twice = toggle_once(toggle_once(Instruction::tgl(D)));
    assert_eq!(twice, Instruction::dec(D));
}

#[test]
fn test_untoggleable_opcodes() {
    for instruction in [Instruction::out(A), Instruction::nop(), Instruction::mul(A, B, C)] {
        assert_eq!(toggle_once(instruction), instruction);
    }
}

#[test]
fn test_toggle_keeps_operands() {
    let toggled = Instruction::jnz(1, 2).toggled();
    assert_eq!(toggled.opcode(), Opcode::Cpy);
    assert_eq!(toggled.operands(), &[Operand::Literal(1), Operand::Literal(2)]);
}

#[test]
fn test_toggle_out_of_range() {
    for offset in [-2, 2, 3, 100, Word::MIN, Word::MAX] {
        let program = vec![Instruction::inc(A), Instruction::tgl(offset), Instruction::dec(B)];

        let mut machine = Machine::new(program.clone(), 0);
        machine.set_pointer(1);
        assert_eq!(Interpreter.step(&mut machine), None);

        assert_eq!(machine.program(), &program[..], "tgl {offset} changed the program");
        assert_eq!(machine.pointer(), 2);
        assert_eq!(machine.registers(), &[0; 4]);
    }
}

#[test]
fn test_toggle_self() {
    // `tgl 0` turns itself into `inc 0`, which is nonsense and does nothing.
    let program = vec![Instruction::tgl(0), Instruction::jnz(1, -1)];

    let mut machine = Machine::new(program, 0);
    assert_eq!(Interpreter.step(&mut machine), None);
    assert_eq!(machine.instruction(0), Some(&Instruction::inc(0)));

    // Jumping back executes the nonsense `inc 0`.
    assert_eq!(Interpreter.step(&mut machine), None);
    assert_eq!(machine.pointer(), 0);
    assert_eq!(Interpreter.step(&mut machine), None);
    assert_eq!(machine.pointer(), 1);
    assert_eq!(machine.registers(), &[0; 4]);
}

#[test]
fn test_toggle_program() {
    let program = vec![
        Instruction::cpy(2, A),
        Instruction::tgl(A),
        Instruction::tgl(A),
        Instruction::tgl(A),
        Instruction::cpy(1, A),
        Instruction::dec(A),
        Instruction::dec(A),
    ];

    let mut machine = Machine::new(program, 0);
    assert_eq!(Interpreter.run(&mut machine), Halt::PointerOutOfRange);
    assert_eq!(machine.register(A), 3);

    // The third `tgl` is now an `inc`, and the first `cpy 1 a` is now a jump.
    assert_eq!(machine.instruction(3), Some(&Instruction::inc(A)));
    assert_eq!(machine.instruction(4), Some(&Instruction::jnz(1, A)));
}

#[test]
fn test_toggle_program_four_toggles() {
    // The second `tgl a` hits the fourth one, so `cpy 1 a` is never toggled.
    let program = vec![
        Instruction::cpy(2, A),
        Instruction::tgl(A),
        Instruction::tgl(A),
        Instruction::tgl(A),
        Instruction::tgl(A),
        Instruction::cpy(1, A),
        Instruction::dec(A),
        Instruction::dec(A),
    ];

    let mut machine = Machine::new(program, 0);
    assert_eq!(Interpreter.run(&mut machine), Halt::PointerOutOfRange);
    assert_eq!(machine.register(A), -1);

    assert_eq!(machine.instruction(3), Some(&Instruction::inc(A)));
    assert_eq!(machine.instruction(4), Some(&Instruction::inc(A)));
    assert_eq!(machine.instruction(5), Some(&Instruction::cpy(1, A)));
}

#[test]
fn test_nonsense_instructions_do_nothing() {
    // Each of these needs a register where there is a literal.
    for nonsense in [
        Instruction::cpy(1, 2),
        Instruction::inc(4),
        Instruction::dec(-4),
        Instruction::mul(A, B, 3),
    ] {
        let mut machine = Machine::new(vec![nonsense], 4)
            .with_register(A, 5)
            .with_register(B, 6);
        assert_eq!(Interpreter.step(&mut machine), None, "{nonsense} halted");

        assert_eq!(machine.registers(), &[5, 6, 0, 0], "{nonsense} changed a register");
        assert!(machine.output().is_empty(), "{nonsense} wrote output");
        assert_eq!(machine.pointer(), 1, "{nonsense} did not move on");
    }
}

#[test]
fn test_toggled_into_nonsense() {
    // `jnz 1 3` becomes `cpy 1 3`, which can't copy into a literal.
    let program = vec![
        Instruction::tgl(1),
        Instruction::jnz(1, 3),
        Instruction::inc(A),
        Instruction::inc(B),
    ];

    let mut machine = Machine::new(program, 0);
    Interpreter.run(&mut machine);

    assert_eq!(machine.instruction(1), Some(&Instruction::cpy(1, 3)));
    assert_eq!(machine.registers(), &[1, 1, 0, 0]);
}

#[test]
fn test_toggle_by_register() {
    // Toggle the instruction `b` steps back from the `tgl`.
    let program = vec![
        Instruction::inc(A),
        Instruction::cpy(-1, B),
        Instruction::tgl(B),
    ];

    let mut machine = Machine::new(program, 0);
    Interpreter.run(&mut machine);
    assert_eq!(machine.instruction(1), Some(&Instruction::jnz(-1, B)));
    assert_eq!(machine.instruction(0), Some(&Instruction::inc(A)));
    assert_eq!(machine.len(), 3);
}
