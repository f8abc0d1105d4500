//! G-code side of the engine
//!
//! Block values handed over by an interpreter, the callback trait the
//! tessellator implements, and a small interpreter to drive it from text.

pub mod block;
pub mod controller;
pub mod interpreter;

pub use block::{FieldMap, MotionBlock, DEFAULT_TURN_COUNT};
pub use controller::MachineController;
pub use interpreter::ProgramInterpreter;
