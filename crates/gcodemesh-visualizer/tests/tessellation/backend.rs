//! Handing finalized geometry to a rendering backend

use gcodemesh_core::{AxisPosition, MachineStatusSnapshot, MotionMode};
use gcodemesh_settings::TessellationSettings;
use gcodemesh_visualizer::{
    GeometryBackend, GeometryHandle, MotionBlock, MotionTessellator, COLOR_OFFSET_BYTES,
    STRIDE_IN_FLOATS,
};

#[derive(Debug, thiserror::Error)]
#[error("nothing uploaded")]
struct NothingUploaded;

/// Keeps the uploaded geometry and counts draw calls
#[derive(Default)]
struct RecordingBackend {
    geometry: Option<GeometryHandle>,
    draws: usize,
    destroyed: usize,
}

impl GeometryBackend for RecordingBackend {
    type Error = NothingUploaded;

    fn upload(&mut self, geometry: GeometryHandle) -> Result<(), Self::Error> {
        self.geometry = Some(geometry);
        Ok(())
    }

    fn draw(&mut self) -> Result<(), Self::Error> {
        if self.geometry.is_none() {
            return Err(NothingUploaded);
        }
        self.draws += 1;
        Ok(())
    }

    fn destroy(&mut self) {
        self.geometry = None;
        self.destroyed += 1;
    }

    fn uploaded_vertices(&self) -> u32 {
        self.geometry.as_ref().map_or(0, GeometryHandle::vertex_count)
    }
}

fn square() -> Vec<MotionBlock> {
    [(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0), (0.0, 0.0)]
        .into_iter()
        .map(|(x, y)| {
            MotionBlock::new(MachineStatusSnapshot::new(
                AxisPosition::new(x, y, 0.0),
                MotionMode::G1,
            ))
        })
        .collect()
}

#[test]
fn test_upload_draw_destroy() {
    let mut tess = MotionTessellator::new(TessellationSettings::default()).unwrap();
    let handle = tess.tessellate(&square()).unwrap();
    let vertex_count = handle.vertex_count();

    let mut backend = RecordingBackend::default();
    assert!(backend.draw().is_err());

    backend.upload(handle).unwrap();
    assert_eq!(backend.uploaded_vertices(), vertex_count);
    backend.draw().unwrap();
    backend.draw().unwrap();
    assert_eq!(backend.draws, 2);

    backend.destroy();
    assert_eq!(backend.uploaded_vertices(), 0);
    assert_eq!(backend.destroyed, 1);
}

#[test]
fn test_tessellator_reusable_while_backend_holds_geometry() {
    let mut tess = MotionTessellator::new(TessellationSettings::default()).unwrap();
    let mut backend = RecordingBackend::default();

    backend.upload(tess.tessellate(&square()).unwrap()).unwrap();
    let uploaded = backend.geometry.as_ref().unwrap().data().to_vec();

    // A second session must not touch what the backend owns
    tess.tessellate(&square()[..2]).unwrap();
    assert_eq!(backend.geometry.as_ref().unwrap().data(), &uploaded[..]);
}

#[test]
fn test_handle_layout_for_upload() {
    let mut tess = MotionTessellator::new(TessellationSettings::default()).unwrap();
    let handle = tess.tessellate(&square()).unwrap();

    assert_eq!(handle.stride_in_floats(), STRIDE_IN_FLOATS);
    assert_eq!(COLOR_OFFSET_BYTES, 12);
    assert_eq!(
        handle.as_bytes().len(),
        handle.vertex_count() as usize * STRIDE_IN_FLOATS * 4
    );

    let first = &handle.data()[..STRIDE_IN_FLOATS];
    let vertex = handle.vertices()[0];
    assert_eq!(&first[..3], &vertex.position);
    assert_eq!(&first[3..], &vertex.color);
}
