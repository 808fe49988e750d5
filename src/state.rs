use crate::constants::{
    ADDRESS_MASK, DISPLAY_HEIGHT, DISPLAY_WIDTH, FONT_START, KEY_COUNT, MEMORY_SIZE, OPCODE_SIZE,
    PROGRAM_START, REGISTER_COUNT, SPRITE_SHEET, STACK_DEPTH,
};

/// The FrameBuffer is indexed as [y][x]; `true` is a lit pixel
pub type FrameBuffer = [[bool; DISPLAY_WIDTH]; DISPLAY_HEIGHT];

/// A snapshot of the Chip8 internal state
///
/// ## CPU
/// Registers
/// - (v) 16 primary 8-bit registers (V0..VF)
///     - the first 15 (V0..VE) are general purpose registers
///     - the 16th (VF) is the carry/borrow/collision flag
/// - (i) a 16-bit memory address register, only the low 12 bits are used
///
/// Counter
/// - (pc) a 16-bit program counter
///
/// Pointer
/// - (sp) the number of return addresses on the stack
///
/// Timers
/// - 2 8-bit timers (delay & sound)
/// - A tone plays while the sound timer is non-zero
///
/// ## Memory
/// - 16 slot stack of return addresses
/// - 4096 bytes of addressable memory
///     - 0x000..0x200 is reserved for the interpreter and holds the sprite sheet
///     - programs are loaded at 0x200
/// - 32x64 frame buffer
///
/// ## Input
/// - 16 key states for keys 0..F
/// - Emulation halts while `register_needing_key` is set
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct State {
    pub v: [u8; REGISTER_COUNT],
    pub i: u16,
    pub pc: u16,
    pub sp: u8,
    pub delay_timer: u8,
    pub sound_timer: u8,
    pub stack: [u16; STACK_DEPTH],
    pub memory: [u8; MEMORY_SIZE],
    pub frame_buffer: FrameBuffer,
    pub draw_flag: bool,
    pub pressed_keys: [bool; KEY_COUNT],
    pub register_needing_key: Option<u8>,
}

impl State {
    pub fn new() -> Self {
        let mut memory = [0; MEMORY_SIZE];
        let font = FONT_START as usize;
        memory[font..font + SPRITE_SHEET.len()].copy_from_slice(&SPRITE_SHEET);

        State {
            v: [0; REGISTER_COUNT],
            i: 0,
            pc: PROGRAM_START,
            sp: 0,
            delay_timer: 0,
            sound_timer: 0,
            stack: [0; STACK_DEPTH],
            memory,
            frame_buffer: [[false; DISPLAY_WIDTH]; DISPLAY_HEIGHT],
            draw_flag: false,
            pressed_keys: [false; KEY_COUNT],
            register_needing_key: None,
        }
    }

    /// Address of the instruction after the current one
    pub fn next_pc(&self) -> u16 {
        self.pc.wrapping_add(OPCODE_SIZE) & ADDRESS_MASK
    }

    /// Address of the instruction after the next one, for taken skips
    pub fn skip_pc(&self) -> u16 {
        self.pc.wrapping_add(OPCODE_SIZE * 2) & ADDRESS_MASK
    }

    /// Reads a byte, wrapping the address into the 12-bit address space
    pub fn read(&self, address: u16) -> u8 {
        self.memory[(address & ADDRESS_MASK) as usize]
    }

    /// The lowest-numbered key currently held, if any
    pub fn first_pressed_key(&self) -> Option<u8> {
        self.pressed_keys
            .iter()
            .position(|&pressed| pressed)
            .map(|key| key as u8)
    }

    pub fn sound_active(&self) -> bool {
        self.sound_timer > 0
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_holds_sprite_sheet() {
        let state = State::new();
        assert_eq!(state.memory[0..5], [0xF0, 0x90, 0x90, 0x90, 0xF0]);
        assert_eq!(state.memory[75..80], [0xF0, 0x80, 0xF0, 0x80, 0x80]);
        assert!(state.memory[80..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_new_state_starts_at_program() {
        let state = State::new();
        assert_eq!(state.pc, 0x200);
        assert_eq!(state.sp, 0);
        assert_eq!(state.i, 0);
        assert_eq!(state.v, [0; 16]);
        assert_eq!(state.register_needing_key, None);
    }

    #[test]
    fn test_pc_advances_wrap_address_space() {
        let mut state = State::new();
        state.pc = 0xFFE;
        assert_eq!(state.next_pc(), 0x000);
        assert_eq!(state.skip_pc(), 0x002);
    }

    #[test]
    fn test_read_wraps_address() {
        let mut state = State::new();
        state.memory[0x001] = 0xAB;
        assert_eq!(state.read(0x1001), 0xAB);
    }

    #[test]
    fn test_first_pressed_key() {
        let mut state = State::new();
        assert_eq!(state.first_pressed_key(), None);
        state.pressed_keys[0xC] = true;
        state.pressed_keys[0x3] = true;
        assert_eq!(state.first_pressed_key(), Some(0x3));
    }

    #[test]
    fn test_sound_active() {
        let mut state = State::new();
        assert!(!state.sound_active());
        state.sound_timer = 1;
        assert!(state.sound_active());
    }
}
