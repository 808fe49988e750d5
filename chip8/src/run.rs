use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Instant;

use anyhow::{anyhow, Context};
use log::{info, warn};
use sdl2::event::Event;
use sdl2::keyboard::Keycode;

use chip8_vm::{Chip8, Clock, Config, Ticks};
use display::{Beeper, Display};

use crate::keymap::keymap;

/// How many times faster than real time fast-forward runs
const FAST_FORWARD: u32 = 8;

/// Scales due work up for fast-forward, saturating at `u32::MAX`
fn fast_forwarded(ticks: Ticks) -> Ticks {
    Ticks {
        cycles: ticks.cycles.saturating_mul(FAST_FORWARD),
        timer_ticks: ticks.timer_ticks.saturating_mul(FAST_FORWARD),
    }
}

pub fn run(rom: &Path, config: Config, scale: u32) -> anyhow::Result<()> {
    let mut clock = Clock::new(config.cycles_per_second);
    let mut chip8 = Chip8::with_config(config);

    // Load ROM
    let file = File::open(rom).with_context(|| format!("unable to open {}", rom.display()))?;
    let mut reader = BufReader::new(file);
    chip8
        .load_rom(&mut reader)
        .with_context(|| format!("unable to load {}", rom.display()))?;
    info!("loaded {}", rom.display());

    // Get SDL2 context
    let sdl = sdl2::init().map_err(|e| anyhow!(e)).context("unable to start SDL2")?;
    let mut display = Display::new(&sdl, scale)
        .map_err(|e| anyhow!(e))
        .context("unable to open a window")?;
    let mut beeper = match Beeper::new(&sdl) {
        Ok(beeper) => Some(beeper),
        Err(e) => {
            warn!("running without sound: {}", e);
            None
        }
    };
    let mut events = sdl.event_pump().map_err(|e| anyhow!(e))?;

    // Whether or not the clock speed should be respected
    let mut fast_forward = false;
    // Whether the game's state should be cycled forwards or backwards
    let mut rewind = false;

    let mut last_advance = Instant::now();

    'event: loop {
        // Handle input
        for event in events.poll_iter() {
            match event {
                Event::Quit { .. } => break 'event,
                Event::KeyDown {
                    keycode: Some(key), ..
                } => match (key, keymap(key)) {
                    (_, Some(kc)) => chip8.key_press(kc),
                    (Keycode::Space, _) => fast_forward = true,
                    (Keycode::Backspace, _) => rewind = true,
                    (Keycode::Escape, _) => break 'event,
                    _ => continue,
                },
                Event::KeyUp {
                    keycode: Some(key), ..
                } => match (key, keymap(key)) {
                    (_, Some(kc)) => chip8.key_release(kc),
                    (Keycode::Space, _) => fast_forward = false,
                    (Keycode::Backspace, _) => rewind = false,
                    _ => continue,
                },
                _ => continue,
            };
        }

        // Handle timing
        let now = Instant::now();
        let mut ticks = clock.advance(now - last_advance);
        last_advance = now;
        if fast_forward {
            ticks = fast_forwarded(ticks);
        }

        // Update state
        if rewind {
            for _ in 0..ticks.cycles {
                if !chip8.reverse_cpu() {
                    break;
                }
            }
        } else {
            for _ in 0..ticks.cycles {
                chip8.advance_cpu().context("the program stopped")?;
            }
            for _ in 0..ticks.timer_ticks {
                chip8.advance_timers();
            }
        }

        // If the draw flag is set, unset it and render the current frame
        if let Some(frame) = chip8.take_frame() {
            display.render(frame).map_err(|e| anyhow!(e))?;
        }
        if let Some(beeper) = beeper.as_mut() {
            beeper.set_active(!rewind && chip8.sound_active());
        }

        if !fast_forward {
            std::thread::sleep(clock.cycle_period());
        }
    }

    Ok(())
}
