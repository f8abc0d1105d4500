use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use gcodemesh::{init_logging, tessellate_program, write_vertices, Config, LogFormat};

/// Tessellate a G-code program into colored line vertices
#[derive(Debug, Parser)]
#[command(name = "gcodemesh", version, about)]
struct Cli {
    /// G-code program to tessellate
    file: PathBuf,

    /// Settings file (.toml or .json); defaults to the user config if present
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the raw little-endian f32 vertex buffer to this file
    #[arg(long)]
    output: Option<PathBuf>,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.log_format)?;
    tracing::debug!("gcodemesh {} (built {})", gcodemesh::VERSION, gcodemesh::BUILD_DATE);

    let config = Config::load_or_default(cli.config.as_deref())?;
    let program = std::fs::read_to_string(&cli.file)
        .with_context(|| format!("reading {}", cli.file.display()))?;

    let report = tessellate_program(&program, config.tessellation)
        .with_context(|| format!("tessellating {}", cli.file.display()))?;

    println!("blocks:    {}", report.blocks);
    println!("vertices:  {}", report.geometry.vertex_count());
    if let Some((min, max)) = report.geometry.bounds() {
        println!(
            "bounds:    ({:.3}, {:.3}, {:.3}) .. ({:.3}, {:.3}, {:.3})",
            min.x, min.y, min.z, max.x, max.y, max.z
        );
    }
    println!("stats:     {}", serde_json::to_string(&report.stats)?);

    if let Some(path) = cli.output {
        let file =
            File::create(&path).with_context(|| format!("creating {}", path.display()))?;
        write_vertices(&report.geometry, BufWriter::new(file))?;
        tracing::info!("Wrote vertex buffer to {}", path.display());
    }

    Ok(())
}
