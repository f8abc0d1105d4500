//! Session orchestrator
//!
//! A [`MotionTessellator`] receives the block sequence of one program,
//! dispatches each block to the linear or arc emitter, and keeps the last
//! committed position and motion mode. One session runs at a time; the
//! caller serializes sessions and owns the tessellator exclusively.

use super::arc::ArcSegmentEmitter;
use super::color::ColorCoder;
use super::linear::LinearSegmentEmitter;
use super::rotary::{project, RotaryAxisInterpolator};
use super::vertex_buffer::{GeometryHandle, VertexBuffer, VertexRecord};
use super::SegmentSummary;
use crate::gcode::{MachineController, MotionBlock};
use gcodemesh_core::{AxisPosition, MachineStatusSnapshot, MotionMode, TessellationError};
use gcodemesh_settings::{ConfigResult, TessellationSettings};
use serde::Serialize;
use std::fmt;
use tracing::{debug, trace, warn};

/// Lifecycle state of the current session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SessionState {
    /// No session; the next callback starts one
    Idle,
    /// Accepting blocks
    Active,
    /// A block was rejected; the partial geometry was discarded
    Aborted,
    /// Program ended; geometry is ready to finalize
    Finished,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::Active => write!(f, "Active"),
            Self::Aborted => write!(f, "Aborted"),
            Self::Finished => write!(f, "Finished"),
        }
    }
}

/// Counters for one session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TessellationStats {
    pub blocks: usize,
    pub linear_blocks: usize,
    pub arc_blocks: usize,
    pub vertices: usize,
    pub boundary_pairs: usize,
    pub rotary_subdivisions: usize,
    /// Blocks that left the rotary axis where it was
    pub degenerate_rotary_moves: usize,
    pub arc_chords: usize,
}

impl TessellationStats {
    fn record(&mut self, summary: &SegmentSummary, arc: bool) {
        self.blocks += 1;
        if arc {
            self.arc_blocks += 1;
        } else {
            self.linear_blocks += 1;
        }
        self.vertices += summary.vertices;
        self.rotary_subdivisions += summary.rotary_subdivisions;
        self.arc_chords += summary.chords;
        if summary.degenerate_rotary {
            self.degenerate_rotary_moves += 1;
        }
    }
}

/// Converts motion blocks into colored line vertices
#[derive(Debug, Clone)]
pub struct MotionTessellator {
    settings: TessellationSettings,
    colors: ColorCoder,
    linear: LinearSegmentEmitter,
    arc: ArcSegmentEmitter,
    buffer: VertexBuffer,
    last_position: AxisPosition,
    previous_mode: MotionMode,
    block_start: Option<MachineStatusSnapshot>,
    state: SessionState,
    stats: TessellationStats,
}

impl MotionTessellator {
    /// Create a tessellator, failing fast on invalid settings
    pub fn new(settings: TessellationSettings) -> ConfigResult<Self> {
        settings.validate()?;

        let rotary = RotaryAxisInterpolator::from_settings(&settings);
        let colors = ColorCoder::new(&settings.palette);
        Ok(Self {
            linear: LinearSegmentEmitter::new(rotary, colors),
            arc: ArcSegmentEmitter::new(rotary, colors, &settings),
            colors,
            settings,
            buffer: VertexBuffer::new(),
            last_position: AxisPosition::default(),
            previous_mode: MotionMode::G0,
            block_start: None,
            state: SessionState::Idle,
            stats: TessellationStats::default(),
        })
    }

    pub fn settings(&self) -> &TessellationSettings {
        &self.settings
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn stats(&self) -> &TessellationStats {
        &self.stats
    }

    /// Last committed machine position
    pub fn last_position(&self) -> AxisPosition {
        self.last_position
    }

    /// Motion mode of the last committed block
    pub fn previous_mode(&self) -> MotionMode {
        self.previous_mode
    }

    /// Status reported by the most recent `start_block`
    pub fn block_start(&self) -> Option<&MachineStatusSnapshot> {
        self.block_start.as_ref()
    }

    pub fn vertex_count(&self) -> usize {
        self.buffer.record_count()
    }

    /// Records appended so far in the current session
    pub fn records(&self) -> &[VertexRecord] {
        self.buffer.records()
    }

    /// Start a new session at the machine origin in G0
    pub fn begin_session(&mut self) {
        self.buffer.clear();
        self.last_position = AxisPosition::default();
        self.previous_mode = MotionMode::G0;
        self.block_start = None;
        self.stats = TessellationStats::default();
        self.state = SessionState::Active;
        debug!("Tessellation session started");
    }

    /// Discard the session and any unfinalized geometry
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.block_start = None;
        self.stats = TessellationStats::default();
        self.state = SessionState::Idle;
    }

    fn ensure_active(&mut self) -> Result<(), TessellationError> {
        match self.state {
            SessionState::Active => Ok(()),
            SessionState::Idle => {
                self.begin_session();
                Ok(())
            }
            state => Err(TessellationError::SessionNotActive {
                state: state.to_string(),
            }),
        }
    }

    /// Record the status at the start of a block
    ///
    /// The reported position is the authoritative current point. When it
    /// differs from the last committed position (G92 re-expressed the
    /// coordinates, possibly including A) the next block starts from it.
    pub fn start_block(&mut self, status: &MachineStatusSnapshot) -> Result<(), TessellationError> {
        self.ensure_active()?;
        if status.position != self.last_position {
            trace!(
                "Re-basing current point from {} to {}",
                self.last_position,
                status.position
            );
            self.last_position = status.position;
        }
        self.block_start = Some(*status);
        Ok(())
    }

    /// Tessellate and commit one block
    ///
    /// A rejected block aborts the session: its partial geometry is
    /// dropped and further blocks are refused until `reset` or
    /// `begin_session`.
    pub fn end_block(&mut self, block: &MotionBlock) -> Result<(), TessellationError> {
        self.ensure_active()?;
        match self.commit(block) {
            Ok(()) => Ok(()),
            Err(err) => {
                warn!(
                    "Aborting tessellation session after {} blocks: {}",
                    self.stats.blocks, err
                );
                self.buffer.clear();
                self.state = SessionState::Aborted;
                Err(err)
            }
        }
    }

    fn commit(&mut self, block: &MotionBlock) -> Result<(), TessellationError> {
        let status = &block.status;
        let mode = status.motion_mode;

        // Validate arcs before anything is appended for this block.
        let arc_plan = if mode.is_arc() {
            Some(self.arc.plan(&self.last_position, block)?)
        } else {
            None
        };

        let junction = project(&self.last_position, status.origin_offset.as_vec());
        if let Some(pair) = self.colors.boundary_pair(junction, self.previous_mode, mode) {
            trace!("Mode boundary {} -> {}", self.previous_mode, mode);
            for record in pair {
                self.buffer.append(record);
            }
            self.stats.boundary_pairs += 1;
        }

        let summary = match arc_plan {
            Some(_) => self.arc.emit(&self.last_position, block, &mut self.buffer)?,
            None => self
                .linear
                .emit(&self.last_position, status, &mut self.buffer),
        };
        self.stats.record(&summary, mode.is_arc());
        if summary.degenerate_rotary {
            trace!("Degenerate rotary move to {}", status.position);
        }

        self.previous_mode = mode;
        self.last_position = status.position;
        Ok(())
    }

    /// Close the session; geometry can now be finalized
    pub fn end_program(&mut self) -> Result<(), TessellationError> {
        self.ensure_active()?;
        self.state = SessionState::Finished;
        debug!(
            "Tessellation finished: {} blocks ({} linear, {} arcs), {} vertices, {} boundary pairs, {} rotary subdivisions",
            self.stats.blocks,
            self.stats.linear_blocks,
            self.stats.arc_blocks,
            self.buffer.record_count(),
            self.stats.boundary_pairs,
            self.stats.rotary_subdivisions
        );
        Ok(())
    }

    /// Move the finished geometry out to the caller
    ///
    /// The handle is a one-shot transfer: the tessellator keeps no
    /// reference to it and returns to `Idle`.
    pub fn finalize(&mut self) -> Result<GeometryHandle, TessellationError> {
        if self.state != SessionState::Finished {
            return Err(TessellationError::SessionNotActive {
                state: self.state.to_string(),
            });
        }
        let buffer = std::mem::take(&mut self.buffer);
        self.state = SessionState::Idle;
        buffer.finalize()
    }

    /// Run a complete session over `blocks` and finalize it
    pub fn tessellate<'a, I>(&mut self, blocks: I) -> Result<GeometryHandle, TessellationError>
    where
        I: IntoIterator<Item = &'a MotionBlock>,
    {
        self.begin_session();
        for block in blocks {
            self.end_block(block)?;
        }
        self.end_program()?;
        self.finalize()
    }
}

impl MachineController for MotionTessellator {
    fn start_block(&mut self, status: &MachineStatusSnapshot) -> Result<(), TessellationError> {
        MotionTessellator::start_block(self, status)
    }

    fn end_block(&mut self, block: &MotionBlock) -> Result<(), TessellationError> {
        MotionTessellator::end_block(self, block)
    }

    fn end_program(&mut self) -> Result<(), TessellationError> {
        MotionTessellator::end_program(self)
    }
}
