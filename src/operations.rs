//! One function per instruction.
//!
//! Each takes the state as it was when the instruction was fetched (pc still
//! pointing at the instruction) and returns the state after it ran, so a
//! failing instruction never leaves a half-applied change behind.

use crate::config::Quirks;
use crate::constants::{
    ADDRESS_MASK, DISPLAY_HEIGHT, DISPLAY_WIDTH, FONT_START, GLYPH_SIZE, MEMORY_SIZE,
    PROGRAM_START, STACK_DEPTH,
};
use crate::error::Chip8Error;
use crate::state::{FrameBuffer, State};

/// Checks that `address` may be written by a program
fn writable(address: usize) -> Result<usize, Chip8Error> {
    if address < PROGRAM_START as usize || address >= MEMORY_SIZE {
        Err(Chip8Error::IllegalWrite { address })
    } else {
        Ok(address)
    }
}

/// Vx = value; VF = flag
/// The flag is written last so it wins when x is VF
fn with_flag(state: &State, x: u8, value: u8, flag: bool) -> State {
    let mut v = state.v;
    v[x as usize] = value;
    v[0xF] = flag as u8;
    State {
        pc: state.next_pc(),
        v,
        ..*state
    }
}

/// pc += 2 if the condition holds
fn skip_if(state: &State, condition: bool) -> State {
    let pc = if condition {
        state.skip_pc()
    } else {
        state.next_pc()
    };
    State { pc, ..*state }
}

/// Machine code routines can't run here; carry on
pub fn sys(state: &State, _addr: u16) -> State {
    State {
        pc: state.next_pc(),
        ..*state
    }
}

/// clear
pub fn clr(state: &State) -> State {
    State {
        pc: state.next_pc(),
        frame_buffer: [[false; DISPLAY_WIDTH]; DISPLAY_HEIGHT],
        draw_flag: true,
        ..*state
    }
}

/// PC = STACK.pop()
pub fn rts(state: &State) -> Result<State, Chip8Error> {
    if state.sp == 0 {
        return Err(Chip8Error::StackUnderflow { address: state.pc });
    }
    let sp = state.sp - 0x1;
    Ok(State {
        pc: state.stack[sp as usize],
        sp,
        ..*state
    })
}

/// PC = addr
pub fn jump(state: &State, addr: u16) -> State {
    State {
        pc: addr,
        ..*state
    }
}

/// STACK.push(PC + 2); PC = addr
pub fn call(state: &State, addr: u16) -> Result<State, Chip8Error> {
    if state.sp as usize >= STACK_DEPTH {
        return Err(Chip8Error::StackOverflow { address: state.pc });
    }
    let mut stack = state.stack;
    stack[state.sp as usize] = state.next_pc();
    Ok(State {
        pc: addr,
        sp: state.sp + 0x1,
        stack,
        ..*state
    })
}

/// if Vx == kk then pc += 2
pub fn ske(state: &State, x: u8, kk: u8) -> State {
    skip_if(state, state.v[x as usize] == kk)
}

/// if Vx != kk then pc += 2
pub fn skne(state: &State, x: u8, kk: u8) -> State {
    skip_if(state, state.v[x as usize] != kk)
}

/// if Vx == Vy then pc += 2
pub fn skre(state: &State, x: u8, y: u8) -> State {
    skip_if(state, state.v[x as usize] == state.v[y as usize])
}

/// Vx = kk
pub fn load(state: &State, x: u8, kk: u8) -> State {
    let mut v = state.v;
    v[x as usize] = kk;
    State {
        pc: state.next_pc(),
        v,
        ..*state
    }
}

/// Vx += kk
/// Add kk to Vx; allow for overflow but implicitly drop it
pub fn add(state: &State, x: u8, kk: u8) -> State {
    let mut v = state.v;
    v[x as usize] = v[x as usize].wrapping_add(kk);
    State {
        pc: state.next_pc(),
        v,
        ..*state
    }
}

/// Vx = Vy
pub fn mv(state: &State, x: u8, y: u8) -> State {
    let mut v = state.v;
    v[x as usize] = v[y as usize];
    State {
        pc: state.next_pc(),
        v,
        ..*state
    }
}

fn logic(state: &State, x: u8, value: u8, quirks: &Quirks) -> State {
    if quirks.logic_resets_vf {
        return with_flag(state, x, value, false);
    }
    let mut v = state.v;
    v[x as usize] = value;
    State {
        pc: state.next_pc(),
        v,
        ..*state
    }
}

/// Vx |= Vy
pub fn or(state: &State, x: u8, y: u8, quirks: &Quirks) -> State {
    logic(state, x, state.v[x as usize] | state.v[y as usize], quirks)
}

/// Vx &= Vy
pub fn and(state: &State, x: u8, y: u8, quirks: &Quirks) -> State {
    logic(state, x, state.v[x as usize] & state.v[y as usize], quirks)
}

/// Vx ^= Vy
pub fn xor(state: &State, x: u8, y: u8, quirks: &Quirks) -> State {
    logic(state, x, state.v[x as usize] ^ state.v[y as usize], quirks)
}

/// Vx += Vy; VF = overflow
pub fn addr(state: &State, x: u8, y: u8) -> State {
    let (res, over) = state.v[x as usize].overflowing_add(state.v[y as usize]);
    with_flag(state, x, res, over)
}

/// Vx -= Vy; VF = !underflow
pub fn sub(state: &State, x: u8, y: u8) -> State {
    let (res, under) = state.v[x as usize].overflowing_sub(state.v[y as usize]);
    with_flag(state, x, res, !under)
}

/// Vx = Vy - Vx; VF = !underflow
pub fn subn(state: &State, x: u8, y: u8) -> State {
    let (res, under) = state.v[y as usize].overflowing_sub(state.v[x as usize]);
    with_flag(state, x, res, !under)
}

/// Vx = src >> 1; VF = the bit shifted out
pub fn shr(state: &State, x: u8, y: u8, quirks: &Quirks) -> State {
    let src = if quirks.shift_uses_vy {
        state.v[y as usize]
    } else {
        state.v[x as usize]
    };
    with_flag(state, x, src >> 1, src & 0x1 == 0x1)
}

/// Vx = src << 1; VF = the bit shifted out
pub fn shl(state: &State, x: u8, y: u8, quirks: &Quirks) -> State {
    let src = if quirks.shift_uses_vy {
        state.v[y as usize]
    } else {
        state.v[x as usize]
    };
    with_flag(state, x, src << 1, src & 0x80 == 0x80)
}

/// if Vx != Vy then pc += 2
pub fn skrne(state: &State, x: u8, y: u8) -> State {
    skip_if(state, state.v[x as usize] != state.v[y as usize])
}

/// I = addr
pub fn loadi(state: &State, addr: u16) -> State {
    State {
        pc: state.next_pc(),
        i: addr,
        ..*state
    }
}

/// PC = V0 + addr
/// With `jump_uses_vx` the high nibble of addr also names the register
pub fn jumpi(state: &State, x: u8, addr: u16, quirks: &Quirks) -> State {
    let offset = if quirks.jump_uses_vx {
        state.v[x as usize]
    } else {
        state.v[0x0]
    };
    State {
        pc: (addr + u16::from(offset)) & ADDRESS_MASK,
        ..*state
    }
}

/// Vx = rand_byte & kk
pub fn rand(state: &State, x: u8, kk: u8, rand_byte: u8) -> State {
    let mut v = state.v;
    v[x as usize] = rand_byte & kk;
    State {
        pc: state.next_pc(),
        v,
        ..*state
    }
}

/// draw_sprite(x=Vx y=Vy size=n)
/// XORs a sprite from memory i..i+n at position x, y on the FrameBuffer.
/// The starting position always wraps; pixels running off an edge wrap to
/// the opposite edge unless `clip_sprites` is set.
/// Sets VF if any pixels are erased.
pub fn draw(state: &State, x: u8, y: u8, n: u8, quirks: &Quirks) -> State {
    let origin_x = state.v[x as usize] as usize % DISPLAY_WIDTH;
    let origin_y = state.v[y as usize] as usize % DISPLAY_HEIGHT;
    let mut frame_buffer: FrameBuffer = state.frame_buffer;
    let mut collision = false;

    for row in 0..n as usize {
        let py = origin_y + row;
        if quirks.clip_sprites && py >= DISPLAY_HEIGHT {
            break;
        }
        let py = py % DISPLAY_HEIGHT;
        let sprite_byte = state.read(state.i.wrapping_add(row as u16));

        for bit in 0..8 {
            if (sprite_byte >> (7 - bit)) & 0x1 == 0 {
                continue;
            }
            let px = origin_x + bit;
            if quirks.clip_sprites && px >= DISPLAY_WIDTH {
                break;
            }
            let pixel = &mut frame_buffer[py][px % DISPLAY_WIDTH];
            collision |= *pixel;
            *pixel = !*pixel;
        }
    }

    let mut v = state.v;
    v[0xF] = collision as u8;
    State {
        pc: state.next_pc(),
        draw_flag: true,
        v,
        frame_buffer,
        ..*state
    }
}

/// if Vx.pressed then pc += 2
pub fn skpr(state: &State, x: u8) -> State {
    let key = state.v[x as usize] & 0xF;
    skip_if(state, state.pressed_keys[key as usize])
}

/// if !Vx.pressed then pc += 2
pub fn skup(state: &State, x: u8) -> State {
    let key = state.v[x as usize] & 0xF;
    skip_if(state, !state.pressed_keys[key as usize])
}

/// Vx = DT
pub fn moved(state: &State, x: u8) -> State {
    let mut v = state.v;
    v[x as usize] = state.delay_timer;
    State {
        pc: state.next_pc(),
        v,
        ..*state
    }
}

/// await keypress for Vx
/// If a key is already held it's stored right away; otherwise pc stays put
/// and `register_needing_key` holds execution until one is.
pub fn keyd(state: &State, x: u8) -> State {
    match state.first_pressed_key() {
        Some(key) => {
            let mut v = state.v;
            v[x as usize] = key;
            State {
                pc: state.next_pc(),
                v,
                register_needing_key: None,
                ..*state
            }
        }
        None => State {
            register_needing_key: Some(x),
            ..*state
        },
    }
}

/// DT = Vx
pub fn loads(state: &State, x: u8) -> State {
    State {
        pc: state.next_pc(),
        delay_timer: state.v[x as usize],
        ..*state
    }
}

/// ST = Vx
pub fn ld(state: &State, x: u8) -> State {
    State {
        pc: state.next_pc(),
        sound_timer: state.v[x as usize],
        ..*state
    }
}

/// I += Vx
pub fn addi(state: &State, x: u8) -> State {
    State {
        pc: state.next_pc(),
        i: state.i.wrapping_add(u16::from(state.v[x as usize])) & ADDRESS_MASK,
        ..*state
    }
}

/// I = address of the glyph for the low nibble of Vx
/// See constants::SPRITE_SHEET for more details
pub fn ldspr(state: &State, x: u8) -> State {
    let digit = u16::from(state.v[x as usize] & 0xF);
    State {
        pc: state.next_pc(),
        i: FONT_START + digit * GLYPH_SIZE,
        ..*state
    }
}

/// mem[I..I+3] = bcd(Vx)
/// Store BCD repr of Vx in memory starting at address i
pub fn bcd(state: &State, x: u8) -> Result<State, Chip8Error> {
    let value = state.v[x as usize];
    let digits = [value / 100, value / 10 % 10, value % 10];
    let mut memory = state.memory;
    for (offset, digit) in digits.iter().enumerate() {
        memory[writable(state.i as usize + offset)?] = *digit;
    }
    Ok(State {
        pc: state.next_pc(),
        memory,
        ..*state
    })
}

fn advance_index(state: &State, x: u8, quirks: &Quirks) -> u16 {
    if quirks.load_store_increments_i {
        state.i.wrapping_add(u16::from(x) + 1) & ADDRESS_MASK
    } else {
        state.i
    }
}

/// mem[I..=I+x] = V0..=Vx
pub fn stor(state: &State, x: u8, quirks: &Quirks) -> Result<State, Chip8Error> {
    let mut memory = state.memory;
    for register in 0..=x as usize {
        memory[writable(state.i as usize + register)?] = state.v[register];
    }
    Ok(State {
        pc: state.next_pc(),
        i: advance_index(state, x, quirks),
        memory,
        ..*state
    })
}

/// V0..=Vx = mem[I..=I+x]
pub fn read(state: &State, x: u8, quirks: &Quirks) -> State {
    let mut v = state.v;
    for register in 0..=x as usize {
        v[register] = state.read(state.i.wrapping_add(register as u16));
    }
    State {
        pc: state.next_pc(),
        i: advance_index(state, x, quirks),
        v,
        ..*state
    }
}
