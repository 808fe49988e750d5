use std::fmt;
use std::str::FromStr;

use crate::constants::{DEFAULT_CYCLES_PER_SECOND, MAX_SAVED_STATES};

/// What to do with a word that doesn't decode to any instruction
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum UnknownOpcodePolicy {
    /// Stop: the cycle fails with `UnknownOpcode` and nothing changes
    Halt,
    /// Treat the word as a no-op and move on to the next instruction
    Skip,
}

impl Default for UnknownOpcodePolicy {
    fn default() -> Self {
        UnknownOpcodePolicy::Halt
    }
}

impl FromStr for UnknownOpcodePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "halt" => Ok(UnknownOpcodePolicy::Halt),
            "skip" => Ok(UnknownOpcodePolicy::Skip),
            other => Err(format!("expected `halt` or `skip` but got `{}`", other)),
        }
    }
}

impl fmt::Display for UnknownOpcodePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnknownOpcodePolicy::Halt => write!(f, "halt"),
            UnknownOpcodePolicy::Skip => write!(f, "skip"),
        }
    }
}

/// # Quirks
/// Interpreters disagree on a handful of instructions. Each flag picks one
/// side of a known disagreement; the defaults match the behavior most
/// programs are written against.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Quirks {
    /// 8XY6/8XYE shift Vy into Vx instead of shifting Vx in place
    pub shift_uses_vy: bool,
    /// BNNN jumps to XNN + Vx instead of NNN + V0
    pub jump_uses_vx: bool,
    /// FX55/FX65 leave I pointing just past the last register transferred
    pub load_store_increments_i: bool,
    /// 8XY1/8XY2/8XY3 reset VF to 0
    pub logic_resets_vf: bool,
    /// Sprites are cut off at the display edges instead of wrapping around
    pub clip_sprites: bool,
}

impl Default for Quirks {
    fn default() -> Self {
        Quirks {
            shift_uses_vy: false,
            jump_uses_vx: false,
            load_store_increments_i: true,
            logic_resets_vf: false,
            clip_sprites: false,
        }
    }
}

/// Runtime configuration of a `Chip8`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub quirks: Quirks,
    pub on_unknown_opcode: UnknownOpcodePolicy,
    /// Instruction throughput used to build a `Clock`
    pub cycles_per_second: u32,
    /// Number of previous states kept for rewinding; 0 disables rewinding
    pub history_depth: usize,
    /// Fixed seed for CXKK; `None` seeds from entropy
    pub rng_seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            quirks: Quirks::default(),
            on_unknown_opcode: UnknownOpcodePolicy::default(),
            cycles_per_second: DEFAULT_CYCLES_PER_SECOND,
            history_depth: MAX_SAVED_STATES,
            rng_seed: None,
        }
    }
}
