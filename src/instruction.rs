use rand::RngCore;

use crate::config::Quirks;
use crate::error::Chip8Error;
use crate::opcode::Opcode;
use crate::operations::*;
use crate::state::State;

/// A decoded Chip-8 instruction.
///
/// Register operands are register indices (0x0..=0xF), `kk` is an immediate
/// byte and `addr` a 12-bit address.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Instruction {
    /// 0NNN: call a machine code routine; not supported, treated as a no-op
    Sys { addr: u16 },
    /// 00E0
    Clr,
    /// 00EE
    Rts,
    /// 1NNN
    Jump { addr: u16 },
    /// 2NNN
    Call { addr: u16 },
    /// 3XKK
    Ske { x: u8, kk: u8 },
    /// 4XKK
    Skne { x: u8, kk: u8 },
    /// 5XY0
    Skre { x: u8, y: u8 },
    /// 6XKK
    Load { x: u8, kk: u8 },
    /// 7XKK
    Add { x: u8, kk: u8 },
    /// 8XY0
    Mv { x: u8, y: u8 },
    /// 8XY1
    Or { x: u8, y: u8 },
    /// 8XY2
    And { x: u8, y: u8 },
    /// 8XY3
    Xor { x: u8, y: u8 },
    /// 8XY4
    Addr { x: u8, y: u8 },
    /// 8XY5
    Sub { x: u8, y: u8 },
    /// 8XY6
    Shr { x: u8, y: u8 },
    /// 8XY7
    Subn { x: u8, y: u8 },
    /// 8XYE
    Shl { x: u8, y: u8 },
    /// 9XY0
    Skrne { x: u8, y: u8 },
    /// ANNN
    Loadi { addr: u16 },
    /// BNNN
    Jumpi { x: u8, addr: u16 },
    /// CXKK
    Rand { x: u8, kk: u8 },
    /// DXYN
    Draw { x: u8, y: u8, n: u8 },
    /// EX9E
    Skpr { x: u8 },
    /// EXA1
    Skup { x: u8 },
    /// FX07
    Moved { x: u8 },
    /// FX0A
    Keyd { x: u8 },
    /// FX15
    Loads { x: u8 },
    /// FX18
    Ld { x: u8 },
    /// FX1E
    Addi { x: u8 },
    /// FX29
    Ldspr { x: u8 },
    /// FX33
    Bcd { x: u8 },
    /// FX55
    Stor { x: u8 },
    /// FX65
    Read { x: u8 },
}

impl Instruction {
    /// Selects the Instruction for a given Opcode.
    /// Returns `None` for words that aren't part of the instruction set.
    pub fn decode(op: Opcode) -> Option<Self> {
        let (x, y, n, kk, addr) = (op.x(), op.y(), op.n(), op.kk(), op.addr());
        let instruction = match op.nibbles() {
            (0x0, 0x0, 0xE, 0x0) => Instruction::Clr,
            (0x0, 0x0, 0xE, 0xE) => Instruction::Rts,
            (0x0, ..) => Instruction::Sys { addr },
            (0x1, ..) => Instruction::Jump { addr },
            (0x2, ..) => Instruction::Call { addr },
            (0x3, ..) => Instruction::Ske { x, kk },
            (0x4, ..) => Instruction::Skne { x, kk },
            (0x5, .., 0x0) => Instruction::Skre { x, y },
            (0x6, ..) => Instruction::Load { x, kk },
            (0x7, ..) => Instruction::Add { x, kk },
            (0x8, .., 0x0) => Instruction::Mv { x, y },
            (0x8, .., 0x1) => Instruction::Or { x, y },
            (0x8, .., 0x2) => Instruction::And { x, y },
            (0x8, .., 0x3) => Instruction::Xor { x, y },
            (0x8, .., 0x4) => Instruction::Addr { x, y },
            (0x8, .., 0x5) => Instruction::Sub { x, y },
            (0x8, .., 0x6) => Instruction::Shr { x, y },
            (0x8, .., 0x7) => Instruction::Subn { x, y },
            (0x8, .., 0xE) => Instruction::Shl { x, y },
            (0x9, .., 0x0) => Instruction::Skrne { x, y },
            (0xA, ..) => Instruction::Loadi { addr },
            (0xB, ..) => Instruction::Jumpi { x, addr },
            (0xC, ..) => Instruction::Rand { x, kk },
            (0xD, ..) => Instruction::Draw { x, y, n },
            (0xE, _, 0x9, 0xE) => Instruction::Skpr { x },
            (0xE, _, 0xA, 0x1) => Instruction::Skup { x },
            (0xF, _, 0x0, 0x7) => Instruction::Moved { x },
            (0xF, _, 0x0, 0xA) => Instruction::Keyd { x },
            (0xF, _, 0x1, 0x5) => Instruction::Loads { x },
            (0xF, _, 0x1, 0x8) => Instruction::Ld { x },
            (0xF, _, 0x1, 0xE) => Instruction::Addi { x },
            (0xF, _, 0x2, 0x9) => Instruction::Ldspr { x },
            (0xF, _, 0x3, 0x3) => Instruction::Bcd { x },
            (0xF, _, 0x5, 0x5) => Instruction::Stor { x },
            (0xF, _, 0x6, 0x5) => Instruction::Read { x },
            _ => return None,
        };
        Some(instruction)
    }

    /// Whether executing this instruction changes the frame buffer
    pub fn redraws(self) -> bool {
        matches!(self, Instruction::Clr | Instruction::Draw { .. })
    }

    /// Applies the instruction to `state`, which must have its pc pointing
    /// at this instruction, and returns the resulting state.
    pub fn execute(
        self,
        state: &State,
        quirks: &Quirks,
        rng: &mut dyn RngCore,
    ) -> Result<State, Chip8Error> {
        let next = match self {
            Instruction::Sys { addr } => sys(state, addr),
            Instruction::Clr => clr(state),
            Instruction::Rts => rts(state)?,
            Instruction::Jump { addr } => jump(state, addr),
            Instruction::Call { addr } => call(state, addr)?,
            Instruction::Ske { x, kk } => ske(state, x, kk),
            Instruction::Skne { x, kk } => skne(state, x, kk),
            Instruction::Skre { x, y } => skre(state, x, y),
            Instruction::Load { x, kk } => load(state, x, kk),
            Instruction::Add { x, kk } => add(state, x, kk),
            Instruction::Mv { x, y } => mv(state, x, y),
            Instruction::Or { x, y } => or(state, x, y, quirks),
            Instruction::And { x, y } => and(state, x, y, quirks),
            Instruction::Xor { x, y } => xor(state, x, y, quirks),
            Instruction::Addr { x, y } => addr(state, x, y),
            Instruction::Sub { x, y } => sub(state, x, y),
            Instruction::Shr { x, y } => shr(state, x, y, quirks),
            Instruction::Subn { x, y } => subn(state, x, y),
            Instruction::Shl { x, y } => shl(state, x, y, quirks),
            Instruction::Skrne { x, y } => skrne(state, x, y),
            Instruction::Loadi { addr } => loadi(state, addr),
            Instruction::Jumpi { x, addr } => jumpi(state, x, addr, quirks),
            Instruction::Rand { x, kk } => rand(state, x, kk, rng.next_u32() as u8),
            Instruction::Draw { x, y, n } => draw(state, x, y, n, quirks),
            Instruction::Skpr { x } => skpr(state, x),
            Instruction::Skup { x } => skup(state, x),
            Instruction::Moved { x } => moved(state, x),
            Instruction::Keyd { x } => keyd(state, x),
            Instruction::Loads { x } => loads(state, x),
            Instruction::Ld { x } => ld(state, x),
            Instruction::Addi { x } => addi(state, x),
            Instruction::Ldspr { x } => ldspr(state, x),
            Instruction::Bcd { x } => bcd(state, x)?,
            Instruction::Stor { x } => stor(state, x, quirks)?,
            Instruction::Read { x } => read(state, x, quirks),
        };
        Ok(next)
    }
}
