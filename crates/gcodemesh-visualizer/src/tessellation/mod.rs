//! Motion-to-geometry tessellation
//!
//! This module provides:
//! - Rotary axis interpolation (rotary)
//! - Motion mode coloring and boundary vertices (color)
//! - Straight and arc move emitters (linear, arc)
//! - Vertex records, buffer and finalized geometry (vertex_buffer)
//! - The per-session orchestrator (tessellator)

pub mod arc;
pub mod color;
pub mod linear;
pub mod rotary;
pub mod tessellator;
pub mod vertex_buffer;

pub use arc::{ArcPlan, ArcSegmentEmitter};
pub use color::ColorCoder;
pub use linear::LinearSegmentEmitter;
pub use rotary::{project, rotate_about_axis, RotaryAxisInterpolator};
pub use tessellator::{MotionTessellator, SessionState, TessellationStats};
pub use vertex_buffer::{GeometryHandle, VertexBuffer, VertexRecord, STRIDE_IN_FLOATS};

/// What an emitter appended for one block
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SegmentSummary {
    /// Vertex records appended
    pub vertices: usize,
    /// Of those, intermediate rotary points
    pub rotary_subdivisions: usize,
    /// Arc chords (zero for straight moves)
    pub chords: usize,
    /// The block did not move the rotary axis
    pub degenerate_rotary: bool,
}
