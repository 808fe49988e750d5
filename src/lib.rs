pub use chip8::{Chip8, CycleStatus};
pub use clock::{Clock, Ticks};
pub use config::{Config, Quirks, UnknownOpcodePolicy};
pub use error::Chip8Error;
pub use instruction::Instruction;
pub use opcode::Opcode;

mod chip8;
mod clock;
mod config;
pub mod constants;
mod error;
mod instruction;
pub mod loader;
mod opcode;
mod operations;
pub mod state;
