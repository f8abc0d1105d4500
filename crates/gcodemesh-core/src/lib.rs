//! # gcodemesh Core
//!
//! Core types shared by the gcodemesh crates.
//! Provides the machine state model handed to the tessellator on every
//! block, unit handling, and the error types for all layers.

pub mod data;
pub mod error;
pub mod units;

pub use data::{AxisPosition, MachineStatusSnapshot, MotionMode, OriginOffset};

pub use error::{Error, GcodeError, Result, TessellationError};

pub use units::{Units, MM_PER_INCH};
