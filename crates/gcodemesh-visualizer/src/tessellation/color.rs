//! Motion mode coloring

use super::vertex_buffer::VertexRecord;
use gcodemesh_core::MotionMode;
use gcodemesh_settings::ColorPalette;
use glam::DVec3;

/// Maps motion modes to line colors
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorCoder {
    rapid: [f32; 4],
    cutting: [f32; 4],
}

impl ColorCoder {
    pub fn new(palette: &ColorPalette) -> Self {
        Self {
            rapid: palette.rapid_rgba(),
            cutting: palette.cutting_rgba(),
        }
    }

    /// RGBA for a motion mode; G0 uses the rapid palette, everything else
    /// the cutting palette
    pub fn color(&self, mode: MotionMode) -> [f32; 4] {
        if mode.is_rapid() {
            self.rapid
        } else {
            self.cutting
        }
    }

    /// A boundary pair is needed whenever the motion mode changes between
    /// consecutive blocks, even if both modes share a color.
    pub fn needs_boundary(previous: MotionMode, current: MotionMode) -> bool {
        previous != current
    }

    /// Duplicate-position pair closing the old color and opening the new
    /// one, so the line renderer never blends colors across the junction.
    pub fn boundary_pair(
        &self,
        point: DVec3,
        previous: MotionMode,
        current: MotionMode,
    ) -> Option<[VertexRecord; 2]> {
        Self::needs_boundary(previous, current).then(|| {
            [
                VertexRecord::new(point, self.color(previous)),
                VertexRecord::new(point, self.color(current)),
            ]
        })
    }
}

impl Default for ColorCoder {
    fn default() -> Self {
        Self::new(&ColorPalette::default())
    }
}
