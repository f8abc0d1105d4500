//! Straight moves (G0/G1)

use super::color::ColorCoder;
use super::rotary::{project, RotaryAxisInterpolator};
use super::vertex_buffer::VertexBuffer;
use super::SegmentSummary;
use gcodemesh_core::{AxisPosition, MachineStatusSnapshot};
use tracing::trace;

/// Emits vertices for straight-line blocks
#[derive(Debug, Clone, Copy)]
pub struct LinearSegmentEmitter {
    rotary: RotaryAxisInterpolator,
    colors: ColorCoder,
}

impl LinearSegmentEmitter {
    pub fn new(rotary: RotaryAxisInterpolator, colors: ColorCoder) -> Self {
        Self { rotary, colors }
    }

    /// Append the move from `from` to the block end position
    ///
    /// Rotary subdivisions come first, then the exact end vertex. Every
    /// vertex carries the block's motion mode color.
    pub fn emit(
        &self,
        from: &AxisPosition,
        status: &MachineStatusSnapshot,
        buffer: &mut VertexBuffer,
    ) -> SegmentSummary {
        let color = self.colors.color(status.motion_mode);
        let offset = status.origin_offset.as_vec();
        let to = &status.position;

        let mut summary = SegmentSummary {
            degenerate_rotary: to.a == from.a,
            ..Default::default()
        };
        for point in self.rotary.subdivide(from, to, offset) {
            buffer.push_point(point, color);
            summary.rotary_subdivisions += 1;
        }
        buffer.push_point(project(to, offset), color);
        summary.vertices = summary.rotary_subdivisions + 1;

        trace!(
            "{} to {}: {} rotary subdivisions",
            status.motion_mode,
            to,
            summary.rotary_subdivisions
        );
        summary
    }
}
