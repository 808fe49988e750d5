use log::debug;
use sdl2::audio::{AudioCallback, AudioDevice, AudioSpecDesired};

const SAMPLE_RATE: i32 = 44_100;
const TONE_HZ: f32 = 440.0;
const VOLUME: f32 = 0.15;

/// A plain square wave, generated on SDL2's audio thread
struct SquareWave {
    phase_inc: f32,
    phase: f32,
    volume: f32,
}

impl AudioCallback for SquareWave {
    type Channel = f32;

    fn callback(&mut self, out: &mut [f32]) {
        for sample in out.iter_mut() {
            *sample = if self.phase <= 0.5 {
                self.volume
            } else {
                -self.volume
            };
            self.phase = (self.phase + self.phase_inc) % 1.0;
        }
    }
}

/// # Beeper
/// The Chip-8 has a single tone which sounds for as long as the sound timer is non-zero.
/// The device starts paused and only resumes while `set_active(true)` holds.
pub struct Beeper {
    device: AudioDevice<SquareWave>,
    playing: bool,
}

impl Beeper {
    pub fn new(sdl: &sdl2::Sdl) -> Result<Self, String> {
        let audio_subsystem = sdl.audio()?;
        let desired = AudioSpecDesired {
            freq: Some(SAMPLE_RATE),
            channels: Some(1),
            samples: None,
        };
        let device = audio_subsystem.open_playback(None, &desired, |spec| {
            debug!("opened audio device at {}Hz", spec.freq);
            SquareWave {
                phase_inc: TONE_HZ / spec.freq as f32,
                phase: 0.0,
                volume: VOLUME,
            }
        })?;

        Ok(Beeper {
            device,
            playing: false,
        })
    }

    /// Start or stop the tone, doing nothing if it's already in that state
    pub fn set_active(&mut self, active: bool) {
        if active == self.playing {
            return;
        }
        if active {
            self.device.resume();
        } else {
            self.device.pause();
        }
        self.playing = active;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_square_wave_alternates() {
        let mut wave = SquareWave {
            phase_inc: 0.25,
            phase: 0.0,
            volume: 0.5,
        };
        let mut out = [0.0; 8];
        wave.callback(&mut out);
        assert_eq!(out, [0.5, 0.5, 0.5, -0.5, 0.5, 0.5, 0.5, -0.5]);
    }
}
