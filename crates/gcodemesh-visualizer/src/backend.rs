//! Rendering backend seam
//!
//! The engine stops at a finalized [`GeometryHandle`]. A backend takes the
//! handle over, uploads it as a line strip with 7-float interleaved
//! vertices (position at offset 0, color at offset 12 bytes), and draws it
//! until destroyed.

use crate::tessellation::GeometryHandle;

/// Byte offset of the color attribute within one vertex
pub const COLOR_OFFSET_BYTES: usize = 3 * std::mem::size_of::<f32>();

/// A consumer of finalized geometry
///
/// Implementations own the uploaded geometry; the tessellator never sees a
/// handle again after passing it on.
pub trait GeometryBackend {
    /// Backend specific failure
    type Error: std::error::Error;

    /// Take ownership of `geometry` and prepare it for drawing
    ///
    /// Uploading replaces any geometry uploaded before.
    fn upload(&mut self, geometry: GeometryHandle) -> Result<(), Self::Error>;

    /// Draw the uploaded geometry as one line strip
    fn draw(&mut self) -> Result<(), Self::Error>;

    /// Release the uploaded geometry
    fn destroy(&mut self);

    /// Number of vertices currently uploaded
    fn uploaded_vertices(&self) -> u32 {
        0
    }
}
