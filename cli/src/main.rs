//! draft CLI - replays part plans
//!
//! Reads a JSON part plan, rebuilds the profile step by step and reports
//! the resulting solid, optionally writing it out as STEP.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use draft_core::plan::PartPlan;
use draft_core::{BuildLine, GeometryKernel, Material, TruckKernel};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "draft")]
#[command(about = "Build solids from line-builder part plans", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a plan and build its solid
    Build {
        /// Path to the plan (.json)
        plan: PathBuf,
        /// Write the solid to this STEP file
        #[arg(long)]
        step: Option<PathBuf>,
        /// Report the mass for a stock material (abs, aluminum, steel)
        #[arg(short, long, value_parser = parse_material)]
        material: Option<Material>,
        /// Tessellate the solid and report the mesh volume as well
        #[arg(long)]
        mesh: bool,
    },
    /// Replay a plan and list its segments without building a solid
    Inspect {
        /// Path to the plan (.json)
        plan: PathBuf,
    },
}

fn parse_material(s: &str) -> Result<Material, String> {
    serde_json::from_value(serde_json::Value::String(s.to_lowercase()))
        .map_err(|_| format!("unknown material `{s}`, expected abs, aluminum or steel"))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Build { plan, step, material, mesh } => {
            build(&plan, step.as_deref(), material, mesh)?;
        }
        Commands::Inspect { plan } => {
            inspect(&plan)?;
        }
    }

    Ok(())
}

fn load(path: &Path) -> Result<PartPlan> {
    let json = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let plan = PartPlan::from_json(&json).with_context(|| format!("parsing {}", path.display()))?;
    debug!(steps = plan.steps.len(), "loaded plan");
    Ok(plan)
}

fn build(path: &Path, step: Option<&Path>, material: Option<Material>, mesh: bool) -> Result<()> {
    let plan = load(path)?;
    let lb = plan.line()?;
    let Some(part) = plan.finish(&lb)? else {
        anyhow::bail!("{} has no finish; use `inspect` for open plans", path.display());
    };

    println!("Volume: {:.3} {}³", part.volume, part.unit);
    if let Some(material) = material {
        println!("Mass ({material}): {:.3} g", part.mass(material));
    }

    let kernel = TruckKernel::with_tolerance(plan.config.kernel_tolerance);
    if mesh {
        let tris = kernel.tessellate(&part.solid)?;
        println!(
            "Mesh: {} faces, {} triangles, volume {:.3}",
            tris.face_count(),
            tris.triangles.len(),
            tris.volume().abs()
        );
    }
    if let Some(out) = step {
        let text = kernel.export_step(&part.solid)?;
        fs::write(out, text).with_context(|| format!("writing {}", out.display()))?;
        info!(path = %out.display(), "exported STEP");
        println!("Exported STEP to {}", out.display());
    }

    Ok(())
}

fn inspect(path: &Path) -> Result<()> {
    let plan = load(path)?;
    let lb = plan.line()?;
    print_segments(&lb);

    match lb.face() {
        Ok(profile) => {
            let c = profile.centroid();
            println!("Closed profile: area {:.3}, centroid ({:.3}, {:.3}, {:.3})", profile.area(), c.x, c.y, c.z);
        }
        Err(e) => println!("No closed profile: {e}"),
    }
    Ok(())
}

fn print_segments(lb: &BuildLine) {
    println!("{} segments in {} chain(s)", lb.len(), lb.chains().len());
    for (i, seg) in lb.shapes().iter().enumerate() {
        let (s, e) = (seg.start(), seg.end());
        let name = seg.name.as_deref().map(|n| format!(" [{n}]")).unwrap_or_default();
        println!(
            "  {i:>3}: ({:.3}, {:.3}, {:.3}) -> ({:.3}, {:.3}, {:.3}), {} edge(s){name}",
            s.x,
            s.y,
            s.z,
            e.x,
            e.y,
            e.z,
            seg.edges.len()
        );
    }
}
