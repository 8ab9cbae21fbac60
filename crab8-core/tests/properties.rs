use crab8_core::{Chip8State, StepOutcome, DISPLAY_HEIGHT, DISPLAY_WIDTH};
use proptest::prelude::*;

fn machine(program: &[u16]) -> Chip8State {
    let bytes: Vec<u8> = program.iter().flat_map(|op| op.to_be_bytes()).collect();
    let mut state = Chip8State::with_seed(0x5eed);
    state.load_program(&bytes).unwrap();
    state
}

fn run(state: &mut Chip8State, steps: usize) -> Result<(), TestCaseError> {
    for _ in 0..steps {
        prop_assert_eq!(state.step(), Ok(StepOutcome::Executed));
    }
    Ok(())
}

/// Opcodes that neither fault nor wait, whatever the register contents.
fn plain_opcode() -> impl Strategy<Value = u16> {
    prop_oneof![
        (0x3000u16..0x5000),
        (0x6000u16..0x8000),
        (
            0u16..0x100,
            prop::sample::select(vec![0x0u16, 0x1, 0x2, 0x3, 0x4, 0x5, 0x6, 0x7, 0xE])
        )
            .prop_map(|(xy, operation)| 0x8000 | xy << 4 | operation),
        (0u16..0x100).prop_map(|xy| 0x5000 | xy << 4),
        (0u16..0x100).prop_map(|xy| 0x9000 | xy << 4),
        (0xA000u16..0xB000),
        (0xC000u16..0xD000),
    ]
}

proptest! {
    #[test]
    fn add_matches_wide_arithmetic(a in any::<u8>(), b in any::<u8>()) {
        let mut state = machine(&[0x8124]);
        state.data_registers[1] = a;
        state.data_registers[2] = b;
        run(&mut state, 1)?;
        prop_assert_eq!(state.register(0x1) as u16, (a as u16 + b as u16) % 256);
        prop_assert_eq!(state.register(0xF), (a as u16 + b as u16 > 255) as u8);
    }

    #[test]
    fn subtract_matches_wide_arithmetic(a in any::<u8>(), b in any::<u8>()) {
        let mut state = machine(&[0x8125, 0x8347]);
        state.data_registers[1] = a;
        state.data_registers[2] = b;
        state.data_registers[3] = a;
        state.data_registers[4] = b;
        run(&mut state, 1)?;
        prop_assert_eq!(state.register(0x1) as i16, (a as i16 - b as i16).rem_euclid(256));
        prop_assert_eq!(state.register(0xF), (a >= b) as u8);

        run(&mut state, 1)?;
        prop_assert_eq!(state.register(0x3) as i16, (b as i16 - a as i16).rem_euclid(256));
        prop_assert_eq!(state.register(0xF), (b >= a) as u8);
    }

    #[test]
    fn shifts_report_shifted_out_bit(a in any::<u8>()) {
        let mut state = machine(&[0x8106, 0x820E]);
        state.data_registers[1] = a;
        state.data_registers[2] = a;
        run(&mut state, 1)?;
        prop_assert_eq!(state.register(0x1), a >> 1);
        prop_assert_eq!(state.register(0xF), a & 1);
        run(&mut state, 1)?;
        prop_assert_eq!(state.register(0x2), a << 1);
        prop_assert_eq!(state.register(0xF), a >> 7);
    }

    #[test]
    fn plain_instructions_move_forward(opcode in plain_opcode(), registers in any::<[u8; 16]>()) {
        let mut state = machine(&[opcode]);
        state.data_registers = registers;
        run(&mut state, 1)?;
        prop_assert!(state.program_counter == 0x202 || state.program_counter == 0x204);
    }

    #[test]
    fn jumps_land_on_target(target in 0u16..0x1000) {
        let mut state = machine(&[0x1000 | target]);
        run(&mut state, 1)?;
        prop_assert_eq!(state.program_counter, target);
    }

    #[test]
    fn drawing_twice_restores_framebuffer(
        x in any::<u8>(),
        y in any::<u8>(),
        sprite in prop::collection::vec(any::<u8>(), 1..16),
        background in prop::collection::vec(any::<bool>(), DISPLAY_WIDTH * DISPLAY_HEIGHT),
    ) {
        let height = sprite.len() as u16;
        let mut state = machine(&[0xA300, 0xD010 | height, 0xD010 | height]);
        state.ram[0x300..0x300 + sprite.len()].copy_from_slice(&sprite);
        state.data_registers[0] = x;
        state.data_registers[1] = y;
        state.display.copy_from_slice(&background);
        let before = state.display;

        run(&mut state, 2)?;
        let drawn = state.display;
        let cleared_first = state.register(0xF);
        let lost = before.iter().zip(drawn.iter()).any(|(&old, &new)| old && !new);
        prop_assert_eq!(cleared_first, lost as u8);

        run(&mut state, 1)?;
        prop_assert_eq!(state.display, before);
        let lost = drawn.iter().zip(before.iter()).any(|(&old, &new)| old && !new);
        prop_assert_eq!(state.register(0xF), lost as u8);
        prop_assert!(state.draw_flag);
    }

    #[test]
    fn timers_count_down_once_per_step(delay in 1u8..=255, sound in 1u8..=255) {
        // spin in place
        let mut state = machine(&[0x1200]);
        state.delay_timer = delay;
        state.sound_timer = sound;
        for step in 1..=delay.max(sound) as u16 + 3 {
            run(&mut state, 1)?;
            prop_assert_eq!(state.delay_timer as u16, (delay as u16).saturating_sub(step));
            prop_assert_eq!(state.sound_timer as u16, (sound as u16).saturating_sub(step));
        }
    }

    #[test]
    fn store_then_load_restores_registers(
        x in 0u16..16,
        registers in any::<[u8; 16]>(),
        index in 0x300u16..0xFF0,
    ) {
        let mut state = machine(&[0xF055 | x << 8, 0xF065 | x << 8]);
        state.data_registers = registers;
        state.index_register = index;
        run(&mut state, 1)?;
        state.data_registers = [0; 16];
        run(&mut state, 1)?;
        let count = x as usize + 1;
        prop_assert_eq!(&state.data_registers[..count], &registers[..count]);
        prop_assert_eq!(state.index_register, index);
    }

    #[test]
    fn bcd_digits_recompose(value in any::<u8>()) {
        let mut state = machine(&[0xA400, 0xF533]);
        state.data_registers[5] = value;
        run(&mut state, 2)?;
        let digits = &state.ram[0x400..0x403];
        let recomposed = digits[0] as u16 * 100 + digits[1] as u16 * 10 + digits[2] as u16;
        prop_assert_eq!(recomposed, value as u16);
    }

    #[test]
    fn failed_steps_change_nothing(
        opcode in prop_oneof![Just(0x00EEu16), 0x0000u16..0x00E0, Just(0xF0FFu16)],
    ) {
        let mut state = machine(&[opcode]);
        state.delay_timer = 9;
        let before = format!("{state:?}");
        prop_assert!(state.step().is_err());
        prop_assert_eq!(format!("{state:?}"), before);
    }
}

#[test]
fn waiting_for_key_keeps_program_counter() {
    let mut state = machine(&[0xF30A]);
    state.sound_timer = 2;
    for _ in 0..5 {
        assert_eq!(state.step(), Ok(StepOutcome::AwaitingKey));
        assert_eq!(state.program_counter, 0x200);
    }
    assert_eq!(state.sound_timer, 0);

    state.set_key(0xF, true);
    assert_eq!(state.step(), Ok(StepOutcome::Executed));
    assert_eq!(state.register(0x3), 0xF);
}
