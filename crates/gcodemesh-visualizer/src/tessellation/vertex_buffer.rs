//! Vertex records and the growable buffer they are collected in
//!
//! Geometry is computed in double precision and truncated to `f32` only
//! when a record is created. Finalizing a buffer moves its records into a
//! [`GeometryHandle`] laid out as interleaved `[x, y, z, r, g, b, a]`
//! floats, ready for upload by a rendering backend.

use bytemuck::{Pod, Zeroable};
use gcodemesh_core::TessellationError;
use glam::{DVec3, Vec3};
use uuid::Uuid;

/// Floats per vertex record (position3 + colorRGBA)
pub const STRIDE_IN_FLOATS: usize = 7;

/// One interleaved vertex
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
pub struct VertexRecord {
    pub position: [f32; 3],
    pub color: [f32; 4],
}

impl VertexRecord {
    /// Build a record from a double precision point
    pub fn new(point: DVec3, color: [f32; 4]) -> Self {
        Self {
            position: point.as_vec3().to_array(),
            color,
        }
    }

    pub fn position_vec(&self) -> Vec3 {
        Vec3::from_array(self.position)
    }
}

/// Growable sequence of vertex records owned by one session
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VertexBuffer {
    records: Vec<VertexRecord>,
}

impl VertexBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: Vec::with_capacity(capacity),
        }
    }

    pub fn append(&mut self, record: VertexRecord) {
        self.records.push(record);
    }

    /// Append a point with a color
    pub fn push_point(&mut self, point: DVec3, color: [f32; 4]) {
        self.append(VertexRecord::new(point, color));
    }

    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[VertexRecord] {
        &self.records
    }

    pub fn last(&self) -> Option<&VertexRecord> {
        self.records.last()
    }

    /// Interleaved float view of the records appended so far
    pub fn as_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.records)
    }

    /// Discard all records; the buffer can start a new session
    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Hand the records over as an immutable geometry handle
    pub fn finalize(self) -> Result<GeometryHandle, TessellationError> {
        let count = self.records.len();
        let vertex_count = u32::try_from(count)
            .map_err(|_| TessellationError::VertexCountOverflow { count })?;
        Ok(GeometryHandle {
            id: Uuid::new_v4(),
            vertex_count,
            data: bytemuck::cast_slice(&self.records).to_vec(),
        })
    }
}

/// Finalized, immutable vertex data for a rendering backend
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryHandle {
    id: Uuid,
    vertex_count: u32,
    data: Vec<f32>,
}

impl GeometryHandle {
    /// Unique id for backend bookkeeping
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    pub fn stride_in_floats(&self) -> usize {
        STRIDE_IN_FLOATS
    }

    /// Interleaved floats, `vertex_count * 7` long
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Raw native-endian bytes for buffer upload
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.data)
    }

    /// Typed view of the records
    pub fn vertices(&self) -> &[VertexRecord] {
        bytemuck::cast_slice(&self.data)
    }

    pub fn is_empty(&self) -> bool {
        self.vertex_count == 0
    }

    /// Axis-aligned bounds of all vertex positions
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let mut vertices = self.vertices().iter().map(VertexRecord::position_vec);
        let first = vertices.next()?;
        Some(vertices.fold((first, first), |(min, max), p| (min.min(p), max.max(p))))
    }
}
