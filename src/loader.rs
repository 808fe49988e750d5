use log::debug;

use crate::constants::{MAX_PROGRAM_SIZE, PROGRAM_START};
use crate::error::Chip8Error;
use crate::state::State;

/// Copies a program image into memory starting at `PROGRAM_START`.
///
/// Only memory is touched, and only when the whole image fits. The image is
/// not inspected; bad opcodes are the interpreter's problem.
pub fn load_image(state: &mut State, image: &[u8]) -> Result<(), Chip8Error> {
    if image.len() > MAX_PROGRAM_SIZE {
        return Err(Chip8Error::CapacityExceeded {
            size: image.len(),
            capacity: MAX_PROGRAM_SIZE,
        });
    }

    let start = PROGRAM_START as usize;
    state.memory[start..start + image.len()].copy_from_slice(image);
    debug!("loaded {} byte program at {:#05X}", image.len(), PROGRAM_START);
    Ok(())
}
