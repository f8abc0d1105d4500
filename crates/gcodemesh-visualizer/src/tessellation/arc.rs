//! Circular and helical moves (G2/G3)
//!
//! Arcs lie in the XY plane with the center given as I/J offsets from the
//! arc start. Z (and the rotary axis) change linearly over the sweep, which
//! makes helices out of arcs with a Z delta.

use super::color::ColorCoder;
use super::rotary::{project, RotaryAxisInterpolator};
use super::vertex_buffer::VertexBuffer;
use super::SegmentSummary;
use crate::gcode::MotionBlock;
use gcodemesh_core::{AxisPosition, TessellationError, Units};
use gcodemesh_settings::TessellationSettings;
use glam::DVec2;
use std::f64::consts::TAU;
use tracing::{debug, trace, warn};

/// Chord count floor per radian of sweep
const MIN_CHORDS_PER_RADIAN: f64 = 2.4;
/// Minimum ratio between the start and end radius
const RADIUS_RATIO_TOLERANCE: f64 = 0.999;

/// Geometry of one arc block
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcPlan {
    pub center: DVec2,
    /// Radius at the arc start
    pub radius: f64,
    /// Radius at the commanded end point
    pub end_radius: f64,
    /// Lower of the two atan2 angles after direction handling; the walk
    /// starts here for G3 and ends here for G2
    pub base_angle: f64,
    /// Total angle traversed, always positive
    pub sweep: f64,
    pub steps: usize,
    pub clockwise: bool,
}

impl ArcPlan {
    pub fn arc_length(&self) -> f64 {
        self.radius * self.sweep
    }

    /// XY point on the arc for chord `s` of `steps`, walking from the
    /// start towards the end
    pub fn chord_point(&self, s: usize) -> DVec2 {
        let step = if self.clockwise { self.steps - s } else { s };
        let angle = self.base_angle + self.sweep * (step as f64 / self.steps as f64);
        self.center + self.radius * DVec2::new(angle.cos(), angle.sin())
    }
}

/// Emits vertices for arc blocks
#[derive(Debug, Clone, Copy)]
pub struct ArcSegmentEmitter {
    rotary: RotaryAxisInterpolator,
    colors: ColorCoder,
    chord_tolerance_mm: f64,
    chord_tolerance_inch: f64,
    max_chords: u32,
}

impl ArcSegmentEmitter {
    pub fn new(
        rotary: RotaryAxisInterpolator,
        colors: ColorCoder,
        settings: &TessellationSettings,
    ) -> Self {
        Self {
            rotary,
            colors,
            chord_tolerance_mm: settings.chord_tolerance(Units::MM),
            chord_tolerance_inch: settings.chord_tolerance(Units::INCH),
            max_chords: settings.arc_max_chords,
        }
    }

    fn chord_tolerance(&self, unit: Units) -> f64 {
        match unit {
            Units::MM => self.chord_tolerance_mm,
            Units::INCH => self.chord_tolerance_inch,
        }
    }

    /// Compute center, sweep and chord count, rejecting inconsistent arcs
    ///
    /// The chord count is clamped to the configured maximum.
    pub fn plan(
        &self,
        from: &AxisPosition,
        block: &MotionBlock,
    ) -> Result<ArcPlan, TessellationError> {
        let status = &block.status;
        let turns = block.fields.p();
        if !turns.is_finite() || turns <= 0.0 {
            return Err(TessellationError::InvalidTurnCount { p: turns });
        }

        let start = DVec2::new(from.x, from.y);
        let end = DVec2::new(status.position.x, status.position.y);
        let center = start
            + DVec2::new(
                block.fields.i().unwrap_or(0.0),
                block.fields.j().unwrap_or(0.0),
            );
        let to_start = start - center;
        let to_end = end - center;

        let clockwise = status.motion_mode.is_clockwise();
        let start_angle = to_start.y.atan2(to_start.x);
        let end_angle = to_end.y.atan2(to_end.x);
        let (base_angle, mut far_angle) = if clockwise {
            (end_angle, start_angle)
        } else {
            (start_angle, end_angle)
        };
        // Equal angles mean a full circle, P of them.
        if far_angle <= base_angle {
            far_angle += TAU * turns;
        }
        let sweep = far_angle - base_angle;

        let radius = to_start.length();
        let end_radius = to_end.length();
        let (small, large) = if radius < end_radius {
            (radius, end_radius)
        } else {
            (end_radius, radius)
        };
        if large > 0.0 && small / large < RADIUS_RATIO_TOLERANCE {
            warn!(
                "Arc rejected: r1={:.6}, r2={:.6}, center=({:.4}, {:.4})",
                radius, end_radius, center.x, center.y
            );
            return Err(TessellationError::ArcGeometry {
                r1: radius,
                r2: end_radius,
            });
        }

        let arc_length = radius * sweep;
        let chords = (sweep * MIN_CHORDS_PER_RADIAN)
            .max(arc_length / self.chord_tolerance(status.active_unit))
            .ceil();
        let max_chords = f64::from(self.max_chords.max(1));
        if chords > max_chords {
            debug!(
                "Arc chords clamped from {} to {} (sweep={:.4}, P={})",
                chords, max_chords, sweep, turns
            );
        }
        let steps = if chords.is_nan() || chords < 1.0 {
            1
        } else {
            chords.min(max_chords) as usize
        };

        Ok(ArcPlan {
            center,
            radius,
            end_radius,
            base_angle,
            sweep,
            steps,
            clockwise,
        })
    }

    /// Append the arc from `from` to the block end position
    ///
    /// Each chord point is blended against the chord point before it, so a
    /// rotary move spread over the arc is subdivided chord by chord. The
    /// last chord lands exactly on the commanded end.
    pub fn emit(
        &self,
        from: &AxisPosition,
        block: &MotionBlock,
        buffer: &mut VertexBuffer,
    ) -> Result<SegmentSummary, TessellationError> {
        let plan = self.plan(from, block)?;
        let status = &block.status;
        let to = &status.position;
        let color = self.colors.color(status.motion_mode);
        let offset = status.origin_offset.as_vec();

        trace!(
            "Arc {}: center=({:.4}, {:.4}) radius={:.4} sweep={:.4} steps={}",
            status.motion_mode,
            plan.center.x,
            plan.center.y,
            plan.radius,
            plan.sweep,
            plan.steps
        );

        let mut summary = SegmentSummary {
            chords: plan.steps,
            degenerate_rotary: to.a == from.a,
            ..Default::default()
        };
        let mut previous = *from;
        for s in 1..=plan.steps {
            let point = if s == plan.steps {
                *to
            } else {
                let t = s as f64 / plan.steps as f64;
                let xy = plan.chord_point(s);
                AxisPosition {
                    x: xy.x,
                    y: xy.y,
                    z: from.z + (to.z - from.z) * t,
                    a: from.a + (to.a - from.a) * t,
                }
            };

            for rotated in self.rotary.subdivide(&previous, &point, offset) {
                buffer.push_point(rotated, color);
                summary.rotary_subdivisions += 1;
            }
            buffer.push_point(project(&point, offset), color);
            previous = point;
        }
        summary.vertices = plan.steps + summary.rotary_subdivisions;

        Ok(summary)
    }
}
