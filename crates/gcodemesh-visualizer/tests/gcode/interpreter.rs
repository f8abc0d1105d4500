//! Driving the tessellator from G-code text

use gcodemesh_core::{GcodeError, MotionMode, Units};
use gcodemesh_settings::TessellationSettings;
use gcodemesh_visualizer::{ColorCoder, MotionTessellator, ProgramInterpreter, SessionState};

const POCKET: &str = "\
%
(simple pocket with a helix entry)
G21 G90
G0 Z5
G0 X10 Y0
G1 Z0 F300
G3 X10 Y0 I-10 J0 Z-2 P2 ; helix down
G1 X20
G0 Z5
M30
";

fn tessellator() -> MotionTessellator {
    MotionTessellator::new(TessellationSettings::default()).unwrap()
}

#[test]
fn test_program_tessellates_end_to_end() {
    let mut tess = tessellator();
    let blocks = ProgramInterpreter::new().run(POCKET, &mut tess).unwrap();

    assert_eq!(blocks, 6);
    assert_eq!(tess.state(), SessionState::Finished);
    let stats = *tess.stats();
    assert_eq!(stats.arc_blocks, 1);
    assert_eq!(stats.linear_blocks, 5);
    // G0 -> G1, G1 -> G3, G3 -> G1, G1 -> G0
    assert_eq!(stats.boundary_pairs, 4);

    let handle = tess.finalize().unwrap();
    let last = handle.vertices().last().unwrap();
    assert_eq!(last.position, [20.0, 0.0, 5.0]);
    assert_eq!(last.color, ColorCoder::default().color(MotionMode::G0));

    let (min, max) = handle.bounds().unwrap();
    // the circle's far side falls between two chord points
    assert!((min.x + 10.0).abs() < 0.05);
    assert_eq!(min.z, -2.0);
    assert_eq!(max.x, 20.0);
}

#[test]
fn test_helix_turn_count_from_p_word() {
    let mut one = tessellator();
    ProgramInterpreter::new()
        .run("G0 X10\nG3 X10 Y0 I-10 J0\n", &mut one)
        .unwrap();
    let mut two = tessellator();
    ProgramInterpreter::new()
        .run("G0 X10\nG3 X10 Y0 I-10 J0 P2\n", &mut two)
        .unwrap();

    let ratio = two.stats().arc_chords as f64 / one.stats().arc_chords as f64;
    assert!((ratio - 2.0).abs() < 0.05, "ratio was {ratio}");
}

#[test]
fn test_inch_program_uses_inch_tolerance() {
    let mut mm = tessellator();
    ProgramInterpreter::new()
        .run("G21\nG0 X1\nG2 X-1 Y0 I-1 J0\n", &mut mm)
        .unwrap();
    let mut inch = tessellator();
    ProgramInterpreter::new()
        .run("G20\nG0 X1\nG2 X-1 Y0 I-1 J0\n", &mut inch)
        .unwrap();

    assert!(inch.stats().arc_chords > mm.stats().arc_chords);
}

#[test]
fn test_runaway_turn_count_is_capped() {
    let settings = TessellationSettings::default().with_arc_max_chords(1_000);
    let mut tess = MotionTessellator::new(settings).unwrap();
    ProgramInterpreter::new()
        .run("G2 X0 Y0 I5 J0 P1000000000000\n", &mut tess)
        .unwrap();

    assert_eq!(tess.stats().arc_chords, 1_000);
    // boundary pair from G0 plus the chords
    assert_eq!(tess.vertex_count(), 1_002);
}

#[test]
fn test_malformed_arc_in_program_aborts() {
    let mut tess = tessellator();
    let err = ProgramInterpreter::new()
        .run("G1 X1\nG2 X10 Y10 I5 J0\nG1 X0\n", &mut tess)
        .unwrap_err();

    assert!(err.is_arc_geometry_error());
    assert_eq!(tess.state(), SessionState::Aborted);
    assert_eq!(tess.vertex_count(), 0);
}

#[test]
fn test_syntax_error_reports_line() {
    let mut tess = tessellator();
    let err = ProgramInterpreter::new()
        .run("G0 X1\nG1 X2 #3\n", &mut tess)
        .unwrap_err();

    match err {
        gcodemesh_core::Error::Gcode(GcodeError::InvalidSyntax { line_number, .. }) => {
            assert_eq!(line_number, 2)
        }
        other => panic!("expected syntax error, got {other:?}"),
    }
}

#[test]
fn test_rotary_program_subdivides() {
    let mut tess = tessellator();
    let mut interpreter = ProgramInterpreter::new();
    interpreter
        .run("G0 Y10\nG1 A90\nG1 A45\n", &mut tess)
        .unwrap();

    assert_eq!(tess.stats().rotary_subdivisions, 135);
    assert_eq!(tess.stats().degenerate_rotary_moves, 1);
    assert_eq!(interpreter.unit(), Units::MM);

    let handle = tess.finalize().unwrap();
    let last = handle.vertices().last().unwrap().position;
    let angle = 45f32.to_radians();
    assert!((last[1] - 10.0 * angle.cos()).abs() < 1e-4);
    assert!((last[2] - 10.0 * angle.sin()).abs() < 1e-4);
}
