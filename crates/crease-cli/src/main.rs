//! crease CLI - fold sheets from the command line
//!
//! Creates and edits design snapshots, prints folded segments and
//! projections, and writes flat-pattern DXF files.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crease::{
    load_spec, save_spec, snap_to_edge, Design, EngineConfig, FoldDirection, FoldGeometry,
    FoldSpec, Point2D, Sheet, ViewState,
};

#[derive(Parser)]
#[command(name = "crease")]
#[command(about = "Fold a flat sheet along crease lines", long_about = None)]
struct Cli {
    /// Engine configuration file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Raise log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write an empty design snapshot
    New {
        /// Output snapshot (.json)
        out: PathBuf,
        /// Sheet width (mm)
        #[arg(long, default_value_t = 300.0)]
        width: f64,
        /// Sheet length (mm)
        #[arg(long, default_value_t = 200.0)]
        length: f64,
        /// Design name
        #[arg(short, long)]
        name: Option<String>,
    },
    /// Append a full-width fold line
    AddFold {
        /// Design snapshot to edit in place
        design: PathBuf,
        /// Distance from the y = 0 edge (default: middle of the sheet)
        #[arg(long)]
        position: Option<f64>,
        /// Fold away from the viewer
        #[arg(long)]
        down: bool,
    },
    /// Print dimensions, fold lines and a segment summary
    Info {
        /// Design snapshot
        design: PathBuf,
    },
    /// List folded segments with their 3D corners
    Fold {
        /// Design snapshot
        design: PathBuf,
        /// Fold angle per crease in degrees (overrides the config)
        #[arg(long)]
        angle: Option<f64>,
    },
    /// Print the projected polygons as JSON
    Project {
        /// Design snapshot
        design: PathBuf,
        /// Yaw in degrees
        #[arg(long, default_value_t = 0.0)]
        rotation: f64,
        /// Zoom factor on top of the auto-fit scale (> 0)
        #[arg(long, default_value_t = 1.0, allow_hyphen_values = true)]
        zoom: f64,
        /// Viewport width (px)
        #[arg(long, default_value_t = 400.0)]
        width: f64,
        /// Viewport height (px)
        #[arg(long, default_value_t = 300.0)]
        height: f64,
    },
    /// Snap a point onto the nearest sheet edge
    Snap {
        /// Design snapshot
        design: PathBuf,
        #[arg(long, allow_hyphen_values = true)]
        x: f64,
        #[arg(long, allow_hyphen_values = true)]
        y: f64,
    },
    /// Write the flat-pattern DXF
    Dxf {
        /// Design snapshot
        design: PathBuf,
        /// Output file (.dxf)
        out: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match &cli.config {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => EngineConfig::default(),
    };

    let output = run(cli.command, config)?;
    print!("{output}");
    Ok(())
}

fn init_logging(verbose: u8) {
    let fallback = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Execute one command and return what it prints.
fn run(command: Commands, config: EngineConfig) -> Result<String> {
    match command {
        Commands::New {
            out,
            width,
            length,
            name,
        } => new_design(&out, width, length, name),
        Commands::AddFold {
            design,
            position,
            down,
        } => add_fold(&design, position, down),
        Commands::Info { design } => show_info(&design, config),
        Commands::Fold { design, angle } => show_segments(&design, config, angle),
        Commands::Project {
            design,
            rotation,
            zoom,
            width,
            height,
        } => {
            if !zoom.is_finite() || zoom <= 0.0 {
                bail!("--zoom must be a positive number, got {zoom}");
            }
            let view = ViewState {
                rotation_y: rotation.to_radians(),
                zoom,
                ..ViewState::default()
            };
            let design = open(&design, config)?;
            let projected = design.project(&view, Point2D::new(width / 2.0, height / 2.0));
            Ok(serde_json::to_string_pretty(&projected)? + "\n")
        }
        Commands::Snap { design, x, y } => {
            let spec = read(&design)?;
            let p = snap_to_edge(Point2D::new(x, y), spec.sheet());
            Ok(format!("{} {}\n", p.x, p.y))
        }
        Commands::Dxf { design, out } => {
            open(&design, config)?
                .export_dxf(&out)
                .with_context(|| format!("writing {}", out.display()))?;
            Ok(format!("Exported DXF to {}\n", out.display()))
        }
    }
}

fn read(path: &Path) -> Result<FoldSpec> {
    load_spec(path).with_context(|| format!("reading design {}", path.display()))
}

fn open(path: &Path, config: EngineConfig) -> Result<Design> {
    Ok(Design::with_config(read(path)?, config))
}

fn new_design(out: &Path, width: f64, length: f64, name: Option<String>) -> Result<String> {
    if out.exists() {
        bail!("{} already exists", out.display());
    }
    let mut spec = FoldSpec::new(Sheet::new(width, length)?);
    if let Some(name) = name {
        spec.name = name;
    }
    save_spec(&spec, out)?;
    info!(path = %out.display(), width, length, "created design");
    Ok(format!("Created {} ({} x {} mm)\n", out.display(), width, length))
}

fn add_fold(path: &Path, position: Option<f64>, down: bool) -> Result<String> {
    let mut spec = read(path)?;
    let id = spec.add_fold_line()?;
    if let Some(position) = position {
        spec.set_position(&id, position);
    }
    if down {
        spec.set_direction(&id, FoldDirection::Down);
    }
    save_spec(&spec, path)?;
    Ok(format!("{id}\n"))
}

fn show_info(path: &Path, config: EngineConfig) -> Result<String> {
    let design = open(path, config)?;
    let spec = design.spec();

    let mut out = String::new();
    writeln!(out, "crease design: {}", path.display())?;
    writeln!(out, "  Name: {}", spec.name)?;
    if let Some(id) = &spec.id {
        writeln!(out, "  Id: {id}")?;
    }
    writeln!(out, "  Sheet: {} x {} mm", spec.width(), spec.length())?;
    writeln!(out, "  Fold lines: {}", spec.fold_lines().len())?;

    for (i, line) in spec.fold_lines().iter().enumerate() {
        let geometry = match line.geometry {
            FoldGeometry::FullWidth { position } => format!("at y = {position}"),
            FoldGeometry::Segment { start, end } => {
                format!("({}, {}) -> ({}, {})", start.x, start.y, end.x, end.y)
            }
        };
        writeln!(
            out,
            "    {}: {} {} {}",
            i + 1,
            line.id,
            line.direction,
            geometry
        )?;
    }

    let segments = design.segments();
    writeln!(out, "  Segments: {}", segments.len())?;
    Ok(out)
}

fn show_segments(path: &Path, mut config: EngineConfig, angle: Option<f64>) -> Result<String> {
    if let Some(angle) = angle {
        config.fold.angle_degrees = angle;
        config.validate()?;
    }
    let design = open(path, config)?;

    let mut out = String::new();
    for segment in design.segments() {
        writeln!(
            out,
            "segment {}: span {:.3} mm, angle {:.2} deg",
            segment.index,
            segment.span(),
            segment.cumulative_angle.to_degrees()
        )?;
        for p in segment.vertices_3d() {
            writeln!(out, "  ({:.3}, {:.3}, {:.3})", p.x, p.y, p.z)?;
        }
    }
    Ok(out)
}
