//! # gcodemesh
//!
//! Turns G-code toolpaths, including synchronized rotary axis motion, into
//! a flat buffer of colored line vertices for real-time rendering.
//!
//! ## Architecture
//!
//! gcodemesh is organized as a workspace with multiple crates:
//!
//! 1. **gcodemesh-core** - Machine status types, units, errors
//! 2. **gcodemesh-settings** - Tessellation settings and config files
//! 3. **gcodemesh-visualizer** - Tessellation engine, block callbacks, G-code feed
//! 4. **gcodemesh** - Command line binary that integrates all crates

use std::io::Write;

pub use gcodemesh_core::{
    AxisPosition, Error, GcodeError, MachineStatusSnapshot, MotionMode, OriginOffset, Result,
    TessellationError, Units,
};

pub use gcodemesh_settings::{
    ColorPalette, Config, ConfigError, SettingsError, TessellationSettings,
};

pub use gcodemesh_visualizer::{
    GeometryBackend, GeometryHandle, MachineController, MotionBlock, MotionTessellator,
    ProgramInterpreter, SessionState, TessellationStats, VertexRecord, STRIDE_IN_FLOATS,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// Human readable, multi-line
    #[default]
    Pretty,
    /// One JSON object per event
    Json,
}

/// Initialize logging
///
/// Sets up structured logging with:
/// - Output on stderr, so stdout stays free for results
/// - RUST_LOG environment variable support
/// - Pretty or JSON formatting
pub fn init_logging(format: LogFormat) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());

    match format {
        LogFormat::Pretty => {
            let fmt_layer = fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_level(true)
                .with_line_number(true)
                .pretty();
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt_layer)
                .try_init()?;
        }
        LogFormat::Json => {
            let fmt_layer = fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_level(true)
                .json();
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt_layer)
                .try_init()?;
        }
    }

    Ok(())
}

/// Result of tessellating one program
#[derive(Debug)]
pub struct TessellationReport {
    pub geometry: GeometryHandle,
    pub stats: TessellationStats,
    /// Blocks delivered by the interpreter
    pub blocks: usize,
}

/// Interpret `program` and tessellate it in a fresh session
pub fn tessellate_program(
    program: &str,
    settings: TessellationSettings,
) -> anyhow::Result<TessellationReport> {
    let mut tessellator = MotionTessellator::new(settings)?;
    let mut interpreter = ProgramInterpreter::new();

    tessellator.begin_session();
    let blocks = interpreter.run(program, &mut tessellator)?;
    let stats = *tessellator.stats();
    let geometry = tessellator.finalize()?;

    tracing::info!(
        "Tessellated {} blocks into {} vertices",
        blocks,
        geometry.vertex_count()
    );
    Ok(TessellationReport {
        geometry,
        stats,
        blocks,
    })
}

/// Write the interleaved vertex floats as little-endian `f32`
pub fn write_vertices<W: Write>(geometry: &GeometryHandle, mut writer: W) -> std::io::Result<()> {
    for value in geometry.data() {
        writer.write_all(&value.to_le_bytes())?;
    }
    writer.flush()
}
