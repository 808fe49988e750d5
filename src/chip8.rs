use std::collections::VecDeque;
use std::io::Read;

use log::{debug, trace, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::{Config, UnknownOpcodePolicy};
use crate::constants::{KEY_COUNT, MAX_PROGRAM_SIZE, MAX_SAVED_STATES};
use crate::error::Chip8Error;
use crate::instruction::Instruction;
use crate::loader::load_image;
use crate::opcode::Opcode;
use crate::operations::keyd;
use crate::state::{FrameBuffer, State};

/// What a single cycle did
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CycleStatus {
    /// An instruction ran
    Continue,
    /// An instruction ran and changed the frame buffer
    Redraw,
    /// Execution is held until a key is pressed
    Waiting,
}

/// # Chip-8
/// Chip-8 is a virtual machine and corresponding interpreted language.
///
/// Tracks:
///  - current `state`
///  - `previous_states` for rewinding
///  - the random number generator behind CXKK
///
/// Supplies interfaces for:
/// - loading roms
/// - pressing and releasing keys
/// - advancing and reversing the CPU
/// - advancing its timers
/// - inspecting its frame buffer for rendering by some display
pub struct Chip8 {
    state: State,
    previous_states: VecDeque<State>,
    config: Config,
    rng: StdRng,
}

impl Chip8 {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        let rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Chip8 {
            state: State::new(),
            // deeper histories grow on demand
            previous_states: VecDeque::with_capacity(config.history_depth.min(MAX_SAVED_STATES)),
            config,
            rng,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    /// Load a rom from a source file
    ///
    /// # Arguments
    /// * `reader` a reader that yields a raw program image
    ///
    /// Reading stops one byte past the largest program that fits.
    pub fn load_rom(&mut self, reader: &mut dyn Read) -> Result<(), Chip8Error> {
        let mut image = Vec::new();
        reader
            .take(MAX_PROGRAM_SIZE as u64 + 1)
            .read_to_end(&mut image)?;
        self.load_program(&image)
    }

    /// Reset the machine and load a program image at 0x200.
    /// Held keys survive the reset; on failure nothing changes.
    pub fn load_program(&mut self, image: &[u8]) -> Result<(), Chip8Error> {
        let mut state = State::new();
        state.pressed_keys = self.state.pressed_keys;
        load_image(&mut state, image)?;
        self.state = state;
        self.previous_states.clear();
        debug!("machine reset with a {} byte program", image.len());
        Ok(())
    }

    /// Returns the FrameBuffer if it changed since it was last taken
    pub fn take_frame(&mut self) -> Option<&FrameBuffer> {
        if self.state.draw_flag {
            self.state.draw_flag = false;
            Some(&self.state.frame_buffer)
        } else {
            None
        }
    }

    pub fn frame_buffer(&self) -> &FrameBuffer {
        &self.state.frame_buffer
    }

    pub fn sound_timer(&self) -> u8 {
        self.state.sound_timer
    }

    /// Whether a tone should currently be playing
    pub fn sound_active(&self) -> bool {
        self.state.sound_active()
    }

    pub fn pressed_keys(&self) -> &[bool; KEY_COUNT] {
        &self.state.pressed_keys
    }

    /// Set the pressed status of key
    ///
    /// # Arguments
    /// * `key` the 8-bit representation of the key that was pressed
    pub fn key_press(&mut self, key: u8) {
        self.set_key(key, true);
    }

    /// Unset the pressed status of key
    ///
    /// # Arguments
    /// * `key` the 8-bit representation of the key that was released
    pub fn key_release(&mut self, key: u8) {
        self.set_key(key, false);
    }

    fn set_key(&mut self, key: u8, pressed: bool) {
        match self.state.pressed_keys.get_mut(key as usize) {
            Some(slot) => *slot = pressed,
            None => warn!("ignoring key {:#04X} outside the keypad", key),
        }
    }

    /// Advances the CPU by a single cycle
    /// - if awaiting a keypress, checks the keypad and stops there
    /// - otherwise gets, decodes and executes the next opcode
    ///
    /// A failed cycle leaves the state untouched.
    pub fn advance_cpu(&mut self) -> Result<CycleStatus, Chip8Error> {
        if let Some(register) = self.state.register_needing_key {
            let next = keyd(&self.state, register);
            if next.register_needing_key.is_some() {
                return Ok(CycleStatus::Waiting);
            }
            trace!("key {:X} stored in v{:X}", next.v[register as usize], register);
            self.commit(next);
            return Ok(CycleStatus::Continue);
        }

        let op = self.get_op();
        trace!(
            "{} v{:02X?} i{:04X} pc{:04X}",
            op,
            self.state.v,
            self.state.i,
            self.state.pc
        );

        let instruction = match Instruction::decode(op) {
            Some(instruction) => instruction,
            None => return self.unknown_opcode(op),
        };

        let next = instruction.execute(&self.state, &self.config.quirks, &mut self.rng)?;
        let waiting = next.register_needing_key.is_some();
        self.commit(next);

        Ok(if waiting {
            CycleStatus::Waiting
        } else if instruction.redraws() {
            CycleStatus::Redraw
        } else {
            CycleStatus::Continue
        })
    }

    fn unknown_opcode(&mut self, op: Opcode) -> Result<CycleStatus, Chip8Error> {
        let error = Chip8Error::UnknownOpcode {
            opcode: op.0,
            address: self.state.pc,
        };
        match self.config.on_unknown_opcode {
            UnknownOpcodePolicy::Halt => Err(error),
            UnknownOpcodePolicy::Skip => {
                warn!("{}; skipping", error);
                let next = State {
                    pc: self.state.next_pc(),
                    ..self.state
                };
                self.commit(next);
                Ok(CycleStatus::Continue)
            }
        }
    }

    /// Replaces the current state, remembering the old one for rewinding
    fn commit(&mut self, next: State) {
        self.save_state();
        self.state = next;
    }

    /// Reverses the CPU by a single cycle if possible
    /// - if there are previous_states, pops the last one and restores it
    /// - the keypad belongs to the input device so it isn't rewound
    pub fn reverse_cpu(&mut self) -> bool {
        match self.previous_states.pop_front() {
            Some(state) => {
                let pressed_keys = self.state.pressed_keys;
                self.state = State {
                    pressed_keys,
                    draw_flag: true,
                    ..state
                };
                true
            }
            None => false,
        }
    }

    /// Puts the current state in previous_states
    /// - if there are already `history_depth` saved then the oldest is dropped
    fn save_state(&mut self) {
        if self.config.history_depth == 0 {
            return;
        }
        if self.previous_states.len() >= self.config.history_depth {
            self.previous_states.pop_back();
        }
        self.previous_states.push_front(self.state);
    }

    /// Decrements both timers once, stopping at zero.
    /// Call this at 60Hz regardless of how fast the CPU is advanced.
    pub fn advance_timers(&mut self) {
        self.state.delay_timer = self.state.delay_timer.saturating_sub(1);
        self.state.sound_timer = self.state.sound_timer.saturating_sub(1);
    }

    /// Gets the opcode currently pointed at by the pc.
    /// Memory is stored as bytes, but opcodes are 16 bits so we combine two subsequent bytes.
    fn get_op(&self) -> Opcode {
        let pc = self.state.pc;
        Opcode::from_bytes(self.state.read(pc), self.state.read(pc.wrapping_add(1)))
    }
}

impl Default for Chip8 {
    fn default() -> Self {
        Self::new()
    }
}
