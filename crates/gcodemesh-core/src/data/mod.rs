//! Data models for machine position and status
//!
//! This module provides:
//! - Four-axis positions (X, Y, Z and the rotary A axis)
//! - Motion mode classification (G0-G3)
//! - The immutable machine status snapshot passed with every block

use crate::units::Units;
use glam::DVec3;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Motion mode of a commanded move (modal group 1)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MotionMode {
    /// Rapid linear positioning
    G0,
    /// Linear interpolation at feed rate
    G1,
    /// Clockwise arc
    G2,
    /// Counter-clockwise arc
    G3,
}

impl MotionMode {
    /// Map a motion G word (0-3) to a mode
    pub fn from_gcode(code: u32) -> Option<Self> {
        match code {
            0 => Some(Self::G0),
            1 => Some(Self::G1),
            2 => Some(Self::G2),
            3 => Some(Self::G3),
            _ => None,
        }
    }

    /// True for G2/G3
    pub fn is_arc(&self) -> bool {
        matches!(self, Self::G2 | Self::G3)
    }

    /// True for G0 (rapid/traverse)
    pub fn is_rapid(&self) -> bool {
        matches!(self, Self::G0)
    }

    /// True for G2
    pub fn is_clockwise(&self) -> bool {
        matches!(self, Self::G2)
    }
}

impl Default for MotionMode {
    fn default() -> Self {
        Self::G0
    }
}

impl fmt::Display for MotionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::G0 => write!(f, "G0"),
            Self::G1 => write!(f, "G1"),
            Self::G2 => write!(f, "G2"),
            Self::G3 => write!(f, "G3"),
        }
    }
}

/// Four-axis machine position; `a` is the rotary axis angle in degrees
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AxisPosition {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub a: f64,
}

impl AxisPosition {
    /// Create a position with the rotary axis at zero
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z, a: 0.0 }
    }

    /// Create a position including the rotary axis angle
    pub fn with_a(x: f64, y: f64, z: f64, a: f64) -> Self {
        debug_assert!(
            x.is_finite() && y.is_finite() && z.is_finite() && a.is_finite(),
            "AxisPosition axes must be finite: x={x}, y={y}, z={z}, a={a}"
        );
        Self { x, y, z, a }
    }

    /// Linear axes as a vector
    pub fn xyz(&self) -> DVec3 {
        DVec3::new(self.x, self.y, self.z)
    }

    /// Interpolate every axis at fraction `t` towards `other`
    pub fn lerp(&self, other: &AxisPosition, t: f64) -> Self {
        Self {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
            z: self.z + (other.z - self.z) * t,
            a: self.a + (other.a - self.a) * t,
        }
    }
}

impl fmt::Display for AxisPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "X:{:.3} Y:{:.3} Z:{:.3} A:{:.3}",
            self.x, self.y, self.z, self.a
        )
    }
}

/// Work origin offset added to every emitted point
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct OriginOffset {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl OriginOffset {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn as_vec(&self) -> DVec3 {
        DVec3::new(self.x, self.y, self.z)
    }
}

/// Machine status at the end of a block
///
/// An immutable value handed to the tessellator with each block. Nothing
/// in the engine reads machine state from anywhere else, so a session is
/// fully reproducible from its block sequence.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MachineStatusSnapshot {
    /// Commanded position in machine units
    pub position: AxisPosition,
    /// Active motion mode
    pub motion_mode: MotionMode,
    /// Active unit (G20/G21)
    pub active_unit: Units,
    /// Work origin offset
    pub origin_offset: OriginOffset,
}

impl MachineStatusSnapshot {
    /// Snapshot at `position` in `mode`, millimeters, no origin offset
    pub fn new(position: AxisPosition, motion_mode: MotionMode) -> Self {
        Self {
            position,
            motion_mode,
            active_unit: Units::MM,
            origin_offset: OriginOffset::default(),
        }
    }

    pub fn with_unit(mut self, unit: Units) -> Self {
        self.active_unit = unit;
        self
    }

    pub fn with_origin_offset(mut self, offset: OriginOffset) -> Self {
        self.origin_offset = offset;
        self
    }
}

impl fmt::Display for MachineStatusSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} ({})",
            self.motion_mode, self.position, self.active_unit
        )
    }
}
