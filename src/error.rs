use thiserror::Error;

/// Everything that can go wrong while loading or running a program.
///
/// Errors are local to the call that produced them; the machine state is
/// left as it was before that call.
#[derive(Debug, Error)]
pub enum Chip8Error {
    #[error("program is {size} bytes but only {capacity} bytes are available")]
    CapacityExceeded { size: usize, capacity: usize },

    #[error("call at {address:#05X} exceeds the 16 level call stack")]
    StackOverflow { address: u16 },

    #[error("return at {address:#05X} with an empty call stack")]
    StackUnderflow { address: u16 },

    #[error("unknown opcode {opcode:#06X} at {address:#05X}")]
    UnknownOpcode { opcode: u16, address: u16 },

    #[error("write to protected or out of range address {address:#06X}")]
    IllegalWrite { address: usize },

    #[error("unable to read program image")]
    Io(#[from] std::io::Error),
}
