use std::time::Duration;

/// Bytes of addressable memory
pub const MEMORY_SIZE: usize = 4096;

/// Where program images are loaded and where execution starts
pub const PROGRAM_START: u16 = 0x200;

/// The largest program image that fits between `PROGRAM_START` and the end of memory
pub const MAX_PROGRAM_SIZE: usize = MEMORY_SIZE - PROGRAM_START as usize;

/// Mask applied to addresses; the address space is 12 bits wide
pub const ADDRESS_MASK: u16 = 0x0FFF;

/// Every instruction is two bytes long
pub const OPCODE_SIZE: u16 = 0x2;

pub const REGISTER_COUNT: usize = 16;
pub const STACK_DEPTH: usize = 16;
pub const KEY_COUNT: usize = 16;

pub const DISPLAY_WIDTH: usize = 64;
pub const DISPLAY_HEIGHT: usize = 32;

/// Where the hexadecimal glyphs live in interpreter memory
pub const FONT_START: u16 = 0x000;

/// Every glyph in the sprite sheet is 5 rows tall
pub const GLYPH_SIZE: u16 = 5;

/// # Sprite sheet
/// A 4x5 glyph for each hexadecimal digit, one byte per row with the
/// glyph in the high nibble.
///
/// ```text
/// 0xF0 ****
/// 0x90 *  *
/// 0x90 *  *
/// 0x90 *  *
/// 0xF0 ****
/// ```
pub const SPRITE_SHEET: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];

/// Timers count down at 60Hz no matter how fast instructions run
pub const TIMER_HZ: u32 = 60;

/// Instructions per second when nothing else is configured
pub const DEFAULT_CYCLES_PER_SECOND: u32 = 500;

/// The most catch-up work the clock hands out in one go
pub const MAX_CATCH_UP: Duration = Duration::from_millis(250);

/// How many previous states are kept around for rewinding
/// 600 cycles is a little over a second at the default clock speed
pub const MAX_SAVED_STATES: usize = 600;
