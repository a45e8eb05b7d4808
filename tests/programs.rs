//! Whole programs driven through the public machine API.

mod common;

use common::{at, c, first_row_program, machine_with, max_program, multiply_program};
use hack::{parse_hack, Machine, MachineConfig, MachineError, MemoryError, RunState, UnmappedPolicy, Word16};
use rstest::rstest;

fn ram(machine: &Machine, address: u16) -> i16 {
    machine.peek(address).expect("RAM address").to_i16()
}

#[test]
fn test_load_constant_into_d() {
    let mut machine = machine_with(&[at(21), c("D", "A", "")]);

    machine.step().unwrap();
    machine.step().unwrap();

    assert_eq!(machine.cpu.d().to_i16(), 21);
    assert_eq!(machine.cpu.a().to_i16(), 21);
    assert_eq!(machine.cpu.pc(), 2);
    assert_eq!(machine.cycles, 2);
}

#[test]
fn test_unconditional_jump_targets_a() {
    let mut machine = machine_with(&[at(7), c("", "0", "JMP")]);

    machine.step().unwrap();
    let info = machine.step().unwrap();

    assert_eq!(info.pc, 1);
    assert_eq!(machine.cpu.pc(), 7);
}

#[rstest]
#[case::small(3, 4, 12)]
#[case::zero_multiplier(0, 9, 0)]
#[case::zero_multiplicand(5, 0, 0)]
#[case::negative(4, -6, -24)]
fn test_multiply(#[case] r0: i16, #[case] r1: i16, #[case] expected: i16) {
    let mut machine = machine_with(&multiply_program());
    machine.poke(0, Word16::from_i16(r0)).unwrap();
    machine.poke(1, Word16::from_i16(r1)).unwrap();
    machine.poke(2, Word16::from_i16(1234)).unwrap();

    machine.run(10_000).unwrap();

    assert_eq!(machine.state, RunState::Halted);
    assert_eq!(ram(&machine, 2), expected);
    assert_eq!(machine.cpu.pc(), 14);
}

#[rstest]
#[case::second_bigger(3, 7, 7)]
#[case::first_bigger(9, -2, 9)]
#[case::equal(-5, -5, -5)]
fn test_max(#[case] r0: i16, #[case] r1: i16, #[case] expected: i16) {
    let mut machine = machine_with(&max_program());
    machine.poke(0, Word16::from_i16(r0)).unwrap();
    machine.poke(1, Word16::from_i16(r1)).unwrap();

    machine.run(100).unwrap();

    assert!(machine.is_halted());
    assert_eq!(ram(&machine, 2), expected);
    assert_eq!(ram(&machine, 0), r0);
    assert_eq!(ram(&machine, 1), r1);
}

#[test]
fn test_keyboard_driven_fill() {
    let mut machine = machine_with(&first_row_program());
    machine.set_keyboard(Word16::new(75));

    machine.run(10_000).unwrap();

    assert!(machine.is_halted());
    let screen = machine.screen();
    for offset in 0..32 {
        assert_eq!(screen.read(offset), Word16::ONES, "word {}", offset);
    }
    assert_eq!(screen.read(32), Word16::ZERO);
    assert!(screen.pixel(0, 0));
    assert!(screen.pixel(511, 0));
    assert!(!screen.pixel(0, 1));
    assert_eq!(ram(&machine, 16), 0x4000 + 32);
}

#[test]
fn test_no_key_leaves_screen_blank() {
    let mut machine = machine_with(&first_row_program());

    machine.run(10_000).unwrap();

    assert!(machine.is_halted());
    assert!(machine.screen().as_slice().iter().all(|w| w.is_zero()));
    assert_eq!(machine.cpu.pc(), 17);
}

#[test]
fn test_reset_line_restarts_without_touching_state() {
    let program = [
        at(3),
        c("", "0", "JMP"),
        Word16::ZERO,
        c("D", "D+1", ""),
        at(3),
        c("", "0", "JMP"),
    ];
    let mut machine = machine_with(&program);
    machine.poke(100, Word16::from_i16(-9)).unwrap();

    // 0, 1, then the 3-4-5 loop twice.
    machine.run(8).unwrap();
    assert_eq!(machine.cpu.pc(), 3);
    assert_eq!(machine.cpu.d().to_i16(), 2);

    machine.run(2).unwrap();
    assert_eq!(machine.cpu.pc(), 5);

    machine.set_reset(true);
    machine.step().unwrap();
    machine.set_reset(false);

    assert_eq!(machine.cpu.pc(), 0);
    assert_eq!(machine.cpu.d().to_i16(), 3);
    assert_eq!(ram(&machine, 100), -9);
    assert!(machine.is_running());
}

#[test]
fn test_screen_and_keyboard_do_not_alias_ram() {
    let program = [
        at(0x4000),
        c("M", "-1", ""),
        at(0x6000),
        c("D", "M", ""),
        at(0),
        c("M", "D", ""),
        at(6),
        c("", "0", "JMP"),
    ];
    let mut machine = machine_with(&program);
    machine.set_keyboard(Word16::new(130));

    machine.run(100).unwrap();

    assert_eq!(machine.peek(0x4000).unwrap(), Word16::ONES);
    assert_eq!(ram(&machine, 0), 130);
    assert_eq!(machine.mem.ram.as_slice().iter().filter(|w| !w.is_zero()).count(), 1);
}

#[test]
fn test_unmapped_write_faults_when_configured() {
    let config = MachineConfig { unmapped: UnmappedPolicy::Fault, ..MachineConfig::default() };
    let mut machine = Machine::with_config(config);
    machine.load_program(&[at(0x6001), c("M", "1", "")]).unwrap();

    machine.step().unwrap();
    let err = machine.step().unwrap_err();

    assert_eq!(err, MachineError::MemoryError(MemoryError::UnmappedAccess(0x6001)));
    assert_eq!(machine.cpu.pc(), 1);
}

#[test]
fn test_hack_text_end_to_end() {
    let source = "\
// R0 = 2 + 3
0000000000000010
1110110000010000
0000000000000011
1110000010010000
0000000000000000
1110001100001000
0000000000000110
1110101010000111
";
    let image = parse_hack(source).unwrap();
    let mut machine = machine_with(&image.instructions);

    let cycles = machine.run(1_000).unwrap();

    assert!(machine.is_halted());
    assert_eq!(ram(&machine, 0), 5);
    assert!(cycles <= 8);
}
