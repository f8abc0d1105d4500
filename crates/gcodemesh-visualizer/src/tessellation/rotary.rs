//! Rotary axis interpolation
//!
//! A move that changes the A axis is drawn by rotating the tessellated
//! points around the machine X axis. The rotary axis is fixed: the active
//! working plane never changes which axis the geometry turns around.

use gcodemesh_core::AxisPosition;
use gcodemesh_settings::TessellationSettings;
use glam::DVec3;

/// Rotate `point` about the machine X axis by `angle_degrees`
/// (right-hand rule).
pub fn rotate_about_axis(point: DVec3, angle_degrees: f64) -> DVec3 {
    let (sin, cos) = angle_degrees.to_radians().sin_cos();
    DVec3::new(
        point.x,
        point.y * cos - point.z * sin,
        point.y * sin + point.z * cos,
    )
}

/// Map a machine position to display space: rotate by its A angle, then
/// translate by the origin offset.
pub fn project(position: &AxisPosition, offset: DVec3) -> DVec3 {
    rotate_about_axis(position.xyz(), position.a) + offset
}

/// Subdivides sub-moves that turn the rotary axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotaryAxisInterpolator {
    step_degrees: f64,
    max_steps: u32,
}

impl RotaryAxisInterpolator {
    /// Create an interpolator; `step_degrees` must be positive (checked
    /// by settings validation)
    pub fn new(step_degrees: f64, max_steps: u32) -> Self {
        debug_assert!(step_degrees > 0.0, "rotary step must be positive");
        Self {
            step_degrees,
            max_steps,
        }
    }

    pub fn from_settings(settings: &TessellationSettings) -> Self {
        Self::new(settings.rotary_step_degrees, settings.rotary_max_steps)
    }

    pub fn step_degrees(&self) -> f64 {
        self.step_degrees
    }

    pub fn max_steps(&self) -> u32 {
        self.max_steps
    }

    /// Number of intermediate points for a rotary change from `start_a`
    /// to `end_a`: `min(max_steps, floor(|Δa| / step))`
    pub fn subdivision_count(&self, start_a: f64, end_a: f64) -> usize {
        let steps = ((end_a - start_a).abs() / self.step_degrees).floor();
        if !steps.is_finite() || steps <= 0.0 {
            return 0;
        }
        steps.min(self.max_steps as f64) as usize
    }

    /// Intermediate display points between `start` and `end`
    ///
    /// Point `i` (for `i` in `0..N`) sits at fraction `i / N` of the move on
    /// every axis, so the first point is the start itself. The end point is
    /// not included; emitters add it with their own color.
    pub fn subdivide<'a>(
        &self,
        start: &'a AxisPosition,
        end: &'a AxisPosition,
        offset: DVec3,
    ) -> impl Iterator<Item = DVec3> + 'a {
        let count = self.subdivision_count(start.a, end.a);
        (0..count).map(move |i| {
            let t = i as f64 / count as f64;
            project(&start.lerp(end, t), offset)
        })
    }
}

impl Default for RotaryAxisInterpolator {
    fn default() -> Self {
        Self::from_settings(&TessellationSettings::default())
    }
}
