//! Error handling for gcodemesh
//!
//! Provides error types for each layer:
//! - Tessellation errors (arc geometry, session lifecycle)
//! - G-Code errors (feeding programs into the tessellator)
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Tessellation error type
///
/// Raised while turning motion blocks into vertices. Arc and turn-count
/// errors mean the input block is malformed; they abort the running
/// session and are never retried.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TessellationError {
    /// Start and end radius of an arc disagree by more than 0.1%
    #[error("Radius to end of arc differs from radius to start: r1={r1}, r2={r2}")]
    ArcGeometry {
        /// Radius from the arc center to the start point.
        r1: f64,
        /// Radius from the arc center to the commanded end point.
        r2: f64,
    },

    /// Arc turn count (P word) is not a positive number
    #[error("Invalid arc turn count P={p}")]
    InvalidTurnCount {
        /// The rejected turn count.
        p: f64,
    },

    /// Block or program callback arrived outside an active session
    #[error("No active tessellation session (state: {state})")]
    SessionNotActive {
        /// The session state at the time of the call.
        state: String,
    },

    /// More vertices than a geometry handle can describe
    #[error("Vertex count {count} exceeds geometry handle capacity")]
    VertexCountOverflow {
        /// The number of vertex records in the buffer.
        count: usize,
    },
}

impl TessellationError {
    /// True when the error was caused by malformed input rather than misuse
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::ArcGeometry { .. } | Self::InvalidTurnCount { .. }
        )
    }
}

/// G-Code error type
///
/// Represents errors found while interpreting program text into blocks.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GcodeError {
    /// Invalid G-Code syntax
    #[error("Invalid syntax at line {line_number}: {reason}")]
    InvalidSyntax {
        /// The line number where the syntax error occurred.
        line_number: u32,
        /// The reason for the syntax error.
        reason: String,
    },

    /// Invalid parameter value
    #[error("Invalid parameter '{param}' at line {line_number}: {reason}")]
    InvalidParameter {
        /// The line number where the invalid parameter was found.
        line_number: u32,
        /// The parameter name.
        param: String,
        /// The reason the parameter is invalid.
        reason: String,
    },
}

/// Main error type for gcodemesh
///
/// A unified error type that can represent any error from all layers.
#[derive(Error, Debug)]
pub enum Error {
    /// Tessellation error
    #[error(transparent)]
    Tessellation(#[from] TessellationError),

    /// G-Code error
    #[error(transparent)]
    Gcode(#[from] GcodeError),
}

impl Error {
    /// Check if this is a tessellation error
    pub fn is_tessellation_error(&self) -> bool {
        matches!(self, Error::Tessellation(_))
    }

    /// Check if this is a G-Code error
    pub fn is_gcode_error(&self) -> bool {
        matches!(self, Error::Gcode(_))
    }

    /// Check if this is an arc geometry error
    pub fn is_arc_geometry_error(&self) -> bool {
        matches!(
            self,
            Error::Tessellation(TessellationError::ArcGeometry { .. })
        )
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
