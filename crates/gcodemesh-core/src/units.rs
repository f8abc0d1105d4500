//! Unit handling
//!
//! Programs are written either in millimeters (G21) or inches (G20).
//! The tessellator never converts coordinates; it only needs to know the
//! active unit to pick the matching chord tolerance.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Millimeters per inch
pub const MM_PER_INCH: f64 = 25.4;

/// Machine coordinate units (millimeters or inches)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    /// Millimeters (G21)
    MM,
    /// Inches (G20)
    INCH,
}

impl Units {
    /// Map a units-group G word (20 or 21) to a unit
    pub fn from_gcode(code: u32) -> Option<Self> {
        match code {
            20 => Some(Self::INCH),
            21 => Some(Self::MM),
            _ => None,
        }
    }
}

impl Default for Units {
    fn default() -> Self {
        Self::MM
    }
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Units::MM => write!(f, "mm"),
            Units::INCH => write!(f, "in"),
        }
    }
}
