use chip8_vm::constants::MAX_PROGRAM_SIZE;
use chip8_vm::state::State;
use chip8_vm::{Chip8, Chip8Error, Clock, Config, CycleStatus, Quirks};

fn machine(program: &[u8]) -> Chip8 {
    let mut chip8 = Chip8::with_config(Config {
        rng_seed: Some(1),
        ..Config::default()
    });
    chip8.load_program(program).expect("program fits");
    chip8
}

fn step(chip8: &mut Chip8, cycles: usize) {
    for _ in 0..cycles {
        chip8.advance_cpu().expect("cycle succeeds");
    }
}

#[test]
fn loaded_image_reads_back_byte_for_byte() {
    for len in [0, 1, 2, 255, 1024, MAX_PROGRAM_SIZE].iter() {
        let image: Vec<u8> = (0..*len).map(|b| (b * 7 % 256) as u8).collect();
        let chip8 = machine(&image);
        assert_eq!(&chip8.state().memory[0x200..0x200 + len], &image[..]);
    }
}

#[test]
fn oversized_image_is_rejected_without_changes() {
    let mut chip8 = machine(&[0x60, 0x2A]);
    step(&mut chip8, 1);
    let before = *chip8.state();
    let image = vec![0xAB; MAX_PROGRAM_SIZE + 1];
    assert!(matches!(
        chip8.load_program(&image),
        Err(Chip8Error::CapacityExceeded { .. })
    ));
    assert_eq!(*chip8.state(), before);
}

#[test]
fn jump_only_moves_the_program_counter() {
    let mut chip8 = machine(&[0x13, 0x00]);
    let before = *chip8.state();
    step(&mut chip8, 1);
    assert_eq!(*chip8.state(), State { pc: 0x300, ..before });
}

#[test]
fn sixteen_nested_calls_unwind_in_order() {
    // 0x200: call 0x300, then spin at 0x202
    // 0x300 + k * 0x10: call the next subroutine, then return
    // the sixteenth subroutine returns straight away
    let mut image = vec![0; 0x200];
    image[0x000..0x004].copy_from_slice(&[0x23, 0x00, 0x12, 0x02]);
    for level in 0..16u16 {
        let at = 0x100 + level as usize * 0x10;
        if level < 15 {
            let target = 0x300 + (level + 1) * 0x10;
            image[at..at + 2].copy_from_slice(&[0x20 | (target >> 8) as u8, target as u8]);
            image[at + 2..at + 4].copy_from_slice(&[0x00, 0xEE]);
        } else {
            image[at..at + 2].copy_from_slice(&[0x00, 0xEE]);
        }
    }
    let mut chip8 = machine(&image);

    let mut return_addresses = Vec::new();
    for depth in 0..16 {
        return_addresses.push(chip8.state().pc + 2);
        assert_eq!(chip8.advance_cpu().unwrap(), CycleStatus::Continue);
        assert_eq!(chip8.state().sp, depth + 1);
    }
    assert_eq!(chip8.state().pc, 0x3F0);

    while let Some(expected) = return_addresses.pop() {
        chip8.advance_cpu().unwrap();
        assert_eq!(chip8.state().pc, expected);
        assert_eq!(chip8.state().sp as usize, return_addresses.len());
    }
    assert_eq!(chip8.state().pc, 0x202);
}

#[test]
fn seventeenth_call_overflows() {
    // 0x200: call 0x200 forever
    let mut chip8 = machine(&[0x22, 0x00]);
    step(&mut chip8, 16);
    assert_eq!(chip8.state().sp, 16);
    let before = *chip8.state();
    match chip8.advance_cpu() {
        Err(Chip8Error::StackOverflow { address }) => assert_eq!(address, 0x200),
        other => panic!("expected StackOverflow but got {:?}", other),
    }
    assert_eq!(*chip8.state(), before);
}

#[test]
fn return_with_empty_stack_underflows() {
    let mut chip8 = machine(&[0x00, 0xEE]);
    assert!(matches!(
        chip8.advance_cpu(),
        Err(Chip8Error::StackUnderflow { address: 0x200 })
    ));
}

#[test]
fn add_sets_carry_flag() {
    // v0 = 0xF0, v1 = 0x20, v0 += v1, v2 = 0x01, v3 = 0x02, v2 += v3
    let mut chip8 = machine(&[
        0x60, 0xF0, 0x61, 0x20, 0x80, 0x14, 0x62, 0x01, 0x63, 0x02,
    ]);
    step(&mut chip8, 3);
    assert_eq!(chip8.state().v[0x0], 0x10);
    assert_eq!(chip8.state().v[0xF], 1);
    chip8 = machine(&[0x62, 0x01, 0x63, 0x02, 0x82, 0x34]);
    step(&mut chip8, 3);
    assert_eq!(chip8.state().v[0x2], 0x03);
    assert_eq!(chip8.state().v[0xF], 0);
}

#[test]
fn sprite_draws_then_erases_with_collision() {
    // I = 0x300 (one 0xFF row), v0 = 10, v1 = 5, draw twice
    let mut image = vec![0xA3, 0x00, 0x60, 0x0A, 0x61, 0x05, 0xD0, 0x11, 0xD0, 0x11];
    image.resize(0x101, 0);
    image[0x100] = 0xFF;
    let mut chip8 = machine(&image);

    step(&mut chip8, 3);
    assert_eq!(chip8.advance_cpu().unwrap(), CycleStatus::Redraw);
    let lit: Vec<(usize, usize)> = lit_pixels(&chip8);
    assert_eq!(lit, (10..18).map(|x| (x, 5)).collect::<Vec<_>>());
    assert_eq!(chip8.state().v[0xF], 0);

    chip8.advance_cpu().unwrap();
    assert!(lit_pixels(&chip8).is_empty());
    assert_eq!(chip8.state().v[0xF], 1);
}

#[test]
fn sprite_wraps_past_right_edge() {
    let mut image = vec![0xA3, 0x00, 0x60, 60, 0x61, 0x03, 0xD0, 0x11];
    image.resize(0x101, 0);
    image[0x100] = 0xFF;
    let mut chip8 = machine(&image);
    step(&mut chip8, 4);

    let row = &chip8.frame_buffer()[3];
    assert!(row[60..64].iter().all(|&p| p));
    assert!(row[0..4].iter().all(|&p| p));
    assert!(row[4..60].iter().all(|&p| !p));
}

#[test]
fn sprite_clips_past_right_edge_with_quirk() {
    let mut image = vec![0xA3, 0x00, 0x60, 60, 0x61, 0x03, 0xD0, 0x11];
    image.resize(0x101, 0);
    image[0x100] = 0xFF;
    let mut chip8 = Chip8::with_config(Config {
        quirks: Quirks {
            clip_sprites: true,
            ..Quirks::default()
        },
        ..Config::default()
    });
    chip8.load_program(&image).unwrap();
    step(&mut chip8, 4);

    let row = &chip8.frame_buffer()[3];
    assert!(row[60..64].iter().all(|&p| p));
    assert!(row[0..4].iter().all(|&p| !p));
}

#[test]
fn delay_timer_counts_down_to_zero_and_stays() {
    // v0 = 10, DT = v0
    let mut chip8 = machine(&[0x60, 0x0A, 0xF0, 0x15]);
    step(&mut chip8, 2);
    assert_eq!(chip8.state().delay_timer, 10);
    for _ in 0..60 {
        chip8.advance_timers();
    }
    assert_eq!(chip8.state().delay_timer, 0);
    for _ in 0..100 {
        chip8.advance_timers();
    }
    assert_eq!(chip8.state().delay_timer, 0);
}

#[test]
fn wait_for_key_holds_until_a_key_is_down() {
    // v3 = 0x33, wait for key into v5, v6 = 0x66
    let mut chip8 = machine(&[0x63, 0x33, 0xF5, 0x0A, 0x66, 0x66]);
    step(&mut chip8, 1);
    assert_eq!(chip8.advance_cpu().unwrap(), CycleStatus::Waiting);
    let waiting = *chip8.state();
    for _ in 0..10 {
        assert_eq!(chip8.advance_cpu().unwrap(), CycleStatus::Waiting);
        assert_eq!(chip8.state().pc, 0x202);
        assert_eq!(chip8.state().v, waiting.v);
    }

    chip8.key_press(0x9);
    assert_eq!(chip8.advance_cpu().unwrap(), CycleStatus::Continue);
    assert_eq!(chip8.state().v[0x5], 0x9);
    assert_eq!(chip8.state().v[0x3], 0x33);
    assert_eq!(chip8.state().pc, 0x204);

    chip8.advance_cpu().unwrap();
    assert_eq!(chip8.state().v[0x6], 0x66);
}

#[test]
fn timers_keep_running_while_waiting_for_a_key() {
    let mut chip8 = machine(&[0x60, 0x03, 0xF0, 0x15, 0xF1, 0x0A]);
    step(&mut chip8, 3);
    chip8.advance_timers();
    chip8.advance_cpu().unwrap();
    assert_eq!(chip8.state().delay_timer, 2);
}

#[test]
fn clock_drives_a_second_of_emulation() {
    // loop: v0 += 1; jump back
    let mut chip8 = machine(&[0x70, 0x01, 0x12, 0x00, 0x60, 0xFF, 0xF0, 0x15]);
    chip8.advance_cpu().unwrap();
    let mut clock = Clock::new(chip8.config().cycles_per_second);
    let mut timer_ticks = 0;
    let mut cycles = 0;
    for _ in 0..60 {
        let ticks = clock.advance(std::time::Duration::from_nanos(16_666_667));
        for _ in 0..ticks.cycles {
            chip8.advance_cpu().unwrap();
        }
        for _ in 0..ticks.timer_ticks {
            chip8.advance_timers();
        }
        cycles += ticks.cycles;
        timer_ticks += ticks.timer_ticks;
    }
    assert_eq!(timer_ticks, 60);
    assert_eq!(cycles, 500);
}

fn lit_pixels(chip8: &Chip8) -> Vec<(usize, usize)> {
    let mut lit = Vec::new();
    for (y, row) in chip8.frame_buffer().iter().enumerate() {
        for (x, &pixel) in row.iter().enumerate() {
            if pixel {
                lit.push((x, y));
            }
        }
    }
    lit
}
