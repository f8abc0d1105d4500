//! # gcodemesh Visualizer
//!
//! Converts a stream of G-code motion blocks into a flat buffer of colored
//! line vertices for toolpath rendering.
//! Includes the tessellation engine, the block callback interface and a
//! minimal G-code interpreter to drive it.

pub mod backend;
pub mod gcode;
pub mod tessellation;

pub use backend::{GeometryBackend, COLOR_OFFSET_BYTES};

pub use gcode::{FieldMap, MachineController, MotionBlock, ProgramInterpreter, DEFAULT_TURN_COUNT};

pub use tessellation::{
    project, rotate_about_axis, ArcPlan, ArcSegmentEmitter, ColorCoder, GeometryHandle,
    LinearSegmentEmitter, MotionTessellator, RotaryAxisInterpolator, SegmentSummary,
    SessionState, TessellationStats, VertexBuffer, VertexRecord, STRIDE_IN_FLOATS,
};
