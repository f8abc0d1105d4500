//! End-to-end behavior of the tessellation engine on small block sequences

use gcodemesh_core::{AxisPosition, MachineStatusSnapshot, MotionMode, TessellationError};
use gcodemesh_settings::TessellationSettings;
use gcodemesh_visualizer::{
    ArcSegmentEmitter, ColorCoder, MotionBlock, MotionTessellator, RotaryAxisInterpolator,
    STRIDE_IN_FLOATS,
};
use std::f64::consts::PI;

fn block(position: AxisPosition, mode: MotionMode) -> MotionBlock {
    MotionBlock::new(MachineStatusSnapshot::new(position, mode))
}

fn arc_emitter() -> ArcSegmentEmitter {
    let settings = TessellationSettings::default();
    ArcSegmentEmitter::new(
        RotaryAxisInterpolator::from_settings(&settings),
        ColorCoder::new(&settings.palette),
        &settings,
    )
}

fn full_circle(turns: f64) -> MotionBlock {
    MotionBlock::arc(
        MachineStatusSnapshot::new(AxisPosition::new(0.0, 0.0, 0.0), MotionMode::G2),
        5.0,
        0.0,
    )
    .with_turns(turns)
}

fn sample_program() -> Vec<MotionBlock> {
    vec![
        block(AxisPosition::new(5.0, 0.0, 2.0), MotionMode::G0),
        block(AxisPosition::new(5.0, 0.0, -1.0), MotionMode::G1),
        MotionBlock::arc(
            MachineStatusSnapshot::new(AxisPosition::new(-5.0, 0.0, -1.0), MotionMode::G3),
            -5.0,
            0.0,
        ),
        block(AxisPosition::with_a(-5.0, 0.0, -1.0, 45.0), MotionMode::G1),
        block(AxisPosition::with_a(0.0, 0.0, 5.0, 45.0), MotionMode::G0),
    ]
}

#[test]
fn test_determinism_across_sessions() {
    let blocks = sample_program();
    let mut first = MotionTessellator::new(TessellationSettings::default()).unwrap();
    let mut second = MotionTessellator::new(TessellationSettings::default()).unwrap();

    let a = first.tessellate(&blocks).unwrap();
    let b = second.tessellate(&blocks).unwrap();
    assert_eq!(a.as_bytes(), b.as_bytes());

    // Reusing the same instance gives the same bytes as well
    let c = first.tessellate(&blocks).unwrap();
    assert_eq!(a.as_bytes(), c.as_bytes());
}

#[test]
fn test_pure_linear_move() {
    let mut tess = MotionTessellator::new(TessellationSettings::default()).unwrap();
    tess.begin_session();
    // Enter G1 first so the move itself carries no boundary pair
    let entry = block(AxisPosition::default(), MotionMode::G1);
    tess.end_block(&entry).unwrap();
    let before = tess.vertex_count();

    let feed = block(AxisPosition::new(10.0, 0.0, 0.0), MotionMode::G1);
    tess.end_block(&feed).unwrap();
    assert_eq!(tess.vertex_count() - before, 1);
    assert_eq!(tess.records().last().unwrap().position, [10.0, 0.0, 0.0]);
    assert_eq!(tess.stats().rotary_subdivisions, 0);
}

#[test]
fn test_full_circle_arc() {
    let plan = arc_emitter()
        .plan(&AxisPosition::default(), &full_circle(1.0))
        .unwrap();
    assert!((plan.sweep - 2.0 * PI).abs() < 1e-12);
    assert!(plan.steps >= 16);
    assert!((plan.radius - 5.0).abs() < 1e-12);
}

#[test]
fn test_multi_turn_arc_scales_steps() {
    let one = arc_emitter()
        .plan(&AxisPosition::default(), &full_circle(1.0))
        .unwrap();
    let three = arc_emitter()
        .plan(&AxisPosition::default(), &full_circle(3.0))
        .unwrap();

    assert!((three.sweep - 6.0 * PI).abs() < 1e-9);
    let ratio = three.steps as f64 / one.steps as f64;
    assert!((ratio - 3.0).abs() < 0.1, "ratio was {ratio}");
}

#[test]
fn test_malformed_arc_reports_both_radii() {
    let mut tess = MotionTessellator::new(TessellationSettings::default()).unwrap();
    let bad = MotionBlock::arc(
        MachineStatusSnapshot::new(AxisPosition::new(10.0, 10.0, 0.0), MotionMode::G2),
        5.0,
        0.0,
    );

    match tess.end_block(&bad) {
        Err(TessellationError::ArcGeometry { r1, r2 }) => {
            assert!((r1 - 5.0).abs() < 1e-9);
            // end (10,10) against center (5,0)
            assert!((r2 - 125f64.sqrt()).abs() < 1e-9);
        }
        other => panic!("expected ArcGeometry, got {other:?}"),
    }
}

#[test]
fn test_rotary_clamp() {
    let mut tess = MotionTessellator::new(TessellationSettings::default()).unwrap();
    tess.begin_session();
    let spin = block(AxisPosition::with_a(0.0, 1.0, 0.0, 100_000.0), MotionMode::G0);
    tess.end_block(&spin).unwrap();

    assert_eq!(tess.stats().rotary_subdivisions, 5000);
    assert_eq!(tess.vertex_count(), 5001);
}

#[test]
fn test_mode_boundary_coloring() {
    let colors = ColorCoder::default();
    let mut tess = MotionTessellator::new(TessellationSettings::default()).unwrap();
    let handle = tess
        .tessellate(&[
            block(AxisPosition::new(1.0, 2.0, 3.0), MotionMode::G0),
            block(AxisPosition::new(4.0, 2.0, 3.0), MotionMode::G1),
        ])
        .unwrap();

    let vertices = handle.vertices();
    assert_eq!(vertices.len(), 4);
    assert_eq!(vertices[1].position, [1.0, 2.0, 3.0]);
    assert_eq!(vertices[2].position, [1.0, 2.0, 3.0]);
    assert_eq!(vertices[1].color, colors.color(MotionMode::G0));
    assert_eq!(vertices[2].color, colors.color(MotionMode::G1));
    assert_eq!(vertices[3].color, colors.color(MotionMode::G1));
}

#[test]
fn test_arc_to_arc_mode_change_gets_boundary() {
    let mut tess = MotionTessellator::new(TessellationSettings::default()).unwrap();
    tess.tessellate(&[
        block(AxisPosition::new(5.0, 0.0, 0.0), MotionMode::G1),
        MotionBlock::arc(
            MachineStatusSnapshot::new(AxisPosition::new(-5.0, 0.0, 0.0), MotionMode::G2),
            -5.0,
            0.0,
        ),
        MotionBlock::arc(
            MachineStatusSnapshot::new(AxisPosition::new(5.0, 0.0, 0.0), MotionMode::G3),
            5.0,
            0.0,
        ),
    ])
    .unwrap();

    // G0 -> G1, G1 -> G2, G2 -> G3; equal colors still get a pair
    assert_eq!(tess.stats().boundary_pairs, 3);
    assert_eq!(tess.stats().arc_blocks, 2);
}

#[test]
fn test_every_block_appends_and_commits_end_position() {
    let mut tess = MotionTessellator::new(TessellationSettings::default()).unwrap();
    tess.begin_session();

    for b in sample_program() {
        let before = tess.vertex_count();
        tess.end_block(&b).unwrap();
        assert!(tess.vertex_count() > before);
        assert_eq!(tess.last_position(), b.status.position);
        assert_eq!(tess.previous_mode(), b.status.motion_mode);
    }

    tess.end_program().unwrap();
    let handle = tess.finalize().unwrap();
    assert_eq!(handle.data().len() % STRIDE_IN_FLOATS, 0);
    assert_eq!(handle.data().len(), handle.vertex_count() as usize * STRIDE_IN_FLOATS);
}

#[test]
fn test_arc_ends_exactly_on_commanded_point() {
    let mut tess = MotionTessellator::new(TessellationSettings::default()).unwrap();
    let handle = tess
        .tessellate(&[
            block(AxisPosition::new(3.0, 0.0, 0.0), MotionMode::G1),
            MotionBlock::arc(
                MachineStatusSnapshot::new(AxisPosition::new(0.0, 3.0, -2.0), MotionMode::G3),
                -3.0,
                0.0,
            ),
        ])
        .unwrap();

    assert_eq!(handle.vertices().last().unwrap().position, [0.0, 3.0, -2.0]);
}

#[test]
fn test_rotary_arc_blends_per_chord() {
    let mut tess = MotionTessellator::new(TessellationSettings::default()).unwrap();
    tess.begin_session();
    let entry = block(AxisPosition::new(5.0, 0.0, 0.0), MotionMode::G1);
    tess.end_block(&entry).unwrap();
    let start = tess.stats().rotary_subdivisions;

    // Half circle while turning A by 90 degrees
    let half = MotionBlock::arc(
        MachineStatusSnapshot::new(AxisPosition::with_a(-5.0, 0.0, 0.0, 90.0), MotionMode::G2),
        -5.0,
        0.0,
    );
    tess.end_block(&half).unwrap();

    let stats = tess.stats();
    let chords = stats.arc_chords;
    // Each chord turns A by 90/chords degrees, so per-chord subdivision
    // never adds up to more than the gross 90 points
    assert!(stats.rotary_subdivisions - start <= 90);
    assert!(chords >= 16);
    assert_eq!(stats.degenerate_rotary_moves, 1);
}
