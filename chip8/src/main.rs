//! Chip-8 emulator frontend
//!
//! ```text
//! |1|2|3|C|      |1|2|3|4|
//! |4|5|6|D|  ->  |Q|W|E|R|
//! |7|8|9|E|  ->  |A|S|D|F|
//! |A|0|B|F|      |Z|X|C|V|
//! ```
//!
//! Hold `Space` to fast-forward and `Backspace` to rewind. `Escape` quits.
//! Set `RUST_LOG=chip8_vm=trace` to see every executed opcode.

use std::path::PathBuf;

use clap::Parser;

use chip8_vm::constants::{DEFAULT_CYCLES_PER_SECOND, MAX_SAVED_STATES};
use chip8_vm::{Config, Quirks, UnknownOpcodePolicy};

mod keymap;
mod run;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the ROM file to run
    rom: PathBuf,

    /// Instructions per second
    #[arg(long, default_value_t = DEFAULT_CYCLES_PER_SECOND)]
    ips: u32,

    /// Size of each Chip-8 pixel on screen
    #[arg(long, default_value_t = 10)]
    scale: u32,

    /// What to do on an opcode with no meaning (halt or skip)
    #[arg(long, default_value_t = UnknownOpcodePolicy::Halt)]
    unknown_opcodes: UnknownOpcodePolicy,

    /// 8XY6/8XYE shift Vy into Vx
    #[arg(long)]
    shift_uses_vy: bool,

    /// BNNN jumps to NNN + Vx rather than NNN + V0
    #[arg(long)]
    jump_uses_vx: bool,

    /// FX55/FX65 leave I unchanged
    #[arg(long)]
    no_index_increment: bool,

    /// 8XY1/8XY2/8XY3 reset VF to 0
    #[arg(long)]
    logic_resets_vf: bool,

    /// Sprites are clipped at the screen edge instead of wrapping
    #[arg(long)]
    clip_sprites: bool,

    /// Seed for CXKK so runs can be replayed
    #[arg(long)]
    seed: Option<u64>,

    /// Number of cycles that can be rewound
    #[arg(long, default_value_t = MAX_SAVED_STATES)]
    history: usize,
}

impl Args {
    fn config(&self) -> Config {
        Config {
            quirks: Quirks {
                shift_uses_vy: self.shift_uses_vy,
                jump_uses_vx: self.jump_uses_vx,
                load_store_increments_i: !self.no_index_increment,
                logic_resets_vf: self.logic_resets_vf,
                clip_sprites: self.clip_sprites,
            },
            on_unknown_opcode: self.unknown_opcodes,
            cycles_per_second: self.ips,
            history_depth: self.history,
            rng_seed: self.seed,
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();
    run::run(&args.rom, args.config(), args.scale)
}
