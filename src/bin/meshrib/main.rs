//! Meshrib CLI - curve-ribbon mesh editing tool.
//!
//! Usage: meshrib <COMMAND> [OPTIONS] <INPUT> ...
//!
//! Run `meshrib --help` for available commands.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use clap::{Parser, Subcommand, ValueEnum};

use meshrib::algo::{holes, CancelToken, Progress};
use meshrib::io;
use meshrib::mesh::TriMesh;
use meshrib::ribbon::{apply_ribbon_with_progress, MeshServices, Profile, RibbonCurves, RibbonOptions};

#[derive(Parser)]
#[command(name = "meshrib")]
#[command(author, version, about = "Curve-ribbon mesh editing CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display mesh information
    Info {
        /// Input mesh file
        input: PathBuf,
    },

    /// Replace the band between two curves with a profiled strip
    Ribbon {
        /// Input mesh file
        input: PathBuf,

        /// Curve-set file naming the center, top and down curves
        curves: PathBuf,

        /// Output mesh file
        output: PathBuf,

        /// Strip profile
        #[arg(short, long, value_enum, default_value = "chamfer")]
        profile: ProfileArg,

        /// Segments per control polyline segment
        #[arg(short, long, default_value = "3")]
        subdivisions: usize,

        /// Scale of the bevel handles
        #[arg(long, default_value = "0.33")]
        handle_scale: f64,

        /// Use single-threaded execution (for benchmarking)
        #[arg(long)]
        sequential: bool,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum ProfileArg {
    /// Flat bevel
    Chamfer,
    /// Rounded bevel with smoothed boundary curves
    Blend,
    /// Single ridge
    Sharp,
}

impl From<ProfileArg> for Profile {
    fn from(arg: ProfileArg) -> Self {
        match arg {
            ProfileArg::Chamfer => Profile::Chamfer,
            ProfileArg::Blend => Profile::Blend,
            ProfileArg::Sharp => Profile::Sharp,
        }
    }
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Info { input } => {
            cmd_info(&input)?;
        }

        Commands::Ribbon {
            input,
            curves,
            output,
            profile,
            subdivisions,
            handle_scale,
            sequential,
        } => {
            let options = RibbonOptions::default()
                .with_subdivisions(subdivisions)
                .with_handle_scale(handle_scale)
                .with_parallel(!sequential);
            cmd_ribbon(&input, &curves, &output, profile.into(), &options)?;
        }
    }

    Ok(())
}

/// Create a progress reporter that displays a progress bar on the terminal.
fn create_progress() -> Progress {
    let max_percent = Arc::new(AtomicUsize::new(0));

    Progress::new(move |current, total, message| {
        if total == 0 {
            return;
        }

        let raw_percent = if current >= total {
            100
        } else {
            ((current * 100) + (total / 2)) / total
        };

        // Never move backwards.
        let (percent, increased) = loop {
            let old_max = max_percent.load(Ordering::Relaxed);
            let new_max = old_max.max(raw_percent);
            if new_max == old_max {
                break (old_max, false);
            }
            match max_percent.compare_exchange_weak(old_max, new_max, Ordering::Relaxed, Ordering::Relaxed) {
                Ok(_) => break (new_max, true),
                Err(_) => continue,
            }
        };

        if !increased && percent != 100 {
            return;
        }

        let bar_width = 30;
        let filled = (percent * bar_width) / 100;
        eprint!(
            "\r[{}{}] {:3}% {:<28}",
            "=".repeat(filled),
            " ".repeat(bar_width - filled),
            percent,
            message
        );
        let _ = std::io::stderr().flush();

        if current >= total {
            eprintln!();
        }
    })
}

fn cmd_info(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let mesh: TriMesh = io::load(input)?;

    println!("File: {}", input.display());
    println!("Vertices: {}", mesh.num_vertices());
    println!("Faces: {}", mesh.num_faces());

    let mut min_area = f64::MAX;
    let mut max_area = 0.0_f64;
    for fid in mesh.face_ids() {
        let area = mesh.face_area(fid);
        min_area = min_area.min(area);
        max_area = max_area.max(area);
    }

    println!("Surface area: {:.6}", mesh.surface_area());
    println!("Face area range: [{:.6}, {:.6}]", min_area, max_area);

    if let Some((min, max)) = mesh.bounding_box() {
        println!(
            "Bounding box: ({:.3}, {:.3}, {:.3}) to ({:.3}, {:.3}, {:.3})",
            min.x, min.y, min.z, max.x, max.y, max.z
        );
        let diag = max - min;
        println!("Dimensions: {:.3} x {:.3} x {:.3}", diag.x, diag.y, diag.z);
    }

    let boundary_edges = mesh.boundary_edges().len();
    if boundary_edges == 0 {
        println!("Topology: Closed (no boundary)");
    } else {
        match holes::boundary_loops(&mesh) {
            Ok(loops) => println!("Topology: Open ({} boundary edges in {} loops)", boundary_edges, loops.len()),
            Err(e) => println!("Topology: Open ({} boundary edges, {})", boundary_edges, e),
        }
    }

    Ok(())
}

fn cmd_ribbon(
    input: &Path,
    curves_path: &Path,
    output: &Path,
    profile: Profile,
    options: &RibbonOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut mesh: TriMesh = io::load(input)?;
    println!("Loaded: {} vertices, {} faces", mesh.num_vertices(), mesh.num_faces());

    let curves: RibbonCurves = io::load_curves(curves_path)?;
    println!(
        "Curves: {} cross-sections ({}), center length {}",
        curves.string_size(),
        if curves.closed { "closed" } else { "open" },
        curves.center.len()
    );

    let mode = if options.parallel { "parallel" } else { "sequential" };
    println!(
        "Applying {} ribbon ({} subdivisions, {})...",
        profile, options.subdivision_count, mode
    );

    let start = Instant::now();
    let report = apply_ribbon_with_progress(
        &mut mesh,
        &curves,
        profile,
        options,
        &MeshServices::new(),
        &create_progress(),
        &CancelToken::new(),
    )?;
    let elapsed = start.elapsed();

    println!(
        "Removed {} triangles, added {} strip triangles and {} cap triangles ({} rows)",
        report.deleted_triangles, report.strip_triangles, report.hole_fill_triangles, report.rows
    );
    println!("Result: {} vertices, {} faces", mesh.num_vertices(), mesh.num_faces());

    io::save(&mesh, output)?;
    println!("Saved: {} ({:.2?})", output.display(), elapsed);

    Ok(())
}
