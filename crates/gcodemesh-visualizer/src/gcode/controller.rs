//! Callback interface between a G-code interpreter and its consumer

use super::block::MotionBlock;
use gcodemesh_core::{MachineStatusSnapshot, TessellationError};

/// Receives the block sequence of one program traversal
///
/// Calls arrive strictly in program order: `start_block` / `end_block`
/// for each block, then a single `end_program`. Implementations own their
/// state exclusively and are driven from one thread.
pub trait MachineController {
    /// Called before a block is executed, with the status at block start
    fn start_block(&mut self, status: &MachineStatusSnapshot) -> Result<(), TessellationError>;

    /// Called after a block, with its words and the status at block end
    fn end_block(&mut self, block: &MotionBlock) -> Result<(), TessellationError>;

    /// Called once when the program ends
    fn end_program(&mut self) -> Result<(), TessellationError>;
}
