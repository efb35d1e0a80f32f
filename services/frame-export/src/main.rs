//! Frame export service.
//!
//! Turns lattice frame archives into preview images and grid files:
//! - `info`: experiment counts of an archive
//! - `render` / `export`: one experiment to PNGs or grid files
//! - `render-json`: a JSON frame sequence to PNGs
//! - `render-grid`: an existing grid file to a PNG
//! - `pack`: a JSON frame sequence into a Zarr archive

mod commands;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use frame_pipeline::{BatchReport, ExportConfig, FailurePolicy};
use grid_file::GridFileFormat;
use renderer::ColorRange;
use serde::Serialize;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "frame-export")]
#[command(about = "Export lattice frame archives to images and grid files")]
struct Args {
    /// YAML configuration file (default: FRAME_* environment variables)
    #[arg(long, global = true, env = "FRAME_CONFIG")]
    config: Option<PathBuf>,

    /// Name of the frame dataset inside the archive
    #[arg(long, global = true)]
    dataset: Option<String>,

    /// Experiment length (default: parsed from the `len_<digits>` path marker)
    #[arg(long, global = true)]
    experiments_length: Option<usize>,

    /// Pixels per lattice cell in rendered images
    #[arg(long, global = true)]
    cell_pixels: Option<usize>,

    /// Fixed colour range as `min:max` (default: per-frame range)
    #[arg(long, global = true)]
    color_range: Option<String>,

    /// Grid file encoding: vti or vtk
    #[arg(long, global = true)]
    grid_format: Option<String>,

    /// Failure policy for batches: continue or abort
    #[arg(long, global = true)]
    failure_policy: Option<String>,

    /// Log level
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print experiment counts of an archive
    Info {
        /// Archive path (.zarr directory or .h5/.nc file)
        archive: PathBuf,
    },

    /// Render one experiment to PNG images
    Render {
        archive: PathBuf,

        /// Experiment index
        #[arg(short, long, default_value = "0")]
        experiment: usize,

        /// Output directory
        #[arg(short, long, default_value = "output")]
        output_dir: PathBuf,

        /// Image name prefix; images are written as `<name>_<i>.png`
        #[arg(short, long, default_value = "frame")]
        name: String,

        /// Stack the experiment along depth and write one `<name>.png`
        #[arg(long)]
        volume: bool,
    },

    /// Write one experiment as grid files
    Export {
        archive: PathBuf,

        /// Experiment index
        #[arg(short, long, default_value = "0")]
        experiment: usize,

        /// Output directory
        #[arg(short, long, default_value = "output")]
        output_dir: PathBuf,

        /// File name prefix; files are written as `<name>.<i>.<ext>`
        #[arg(short, long, default_value = "frame")]
        name: String,

        /// Stack the experiment along depth and write one `<name>.<ext>`
        #[arg(long)]
        volume: bool,
    },

    /// Render a JSON array of 2D arrays to PNG images
    RenderJson {
        /// JSON file holding the frame sequence
        input: PathBuf,

        /// Output directory
        #[arg(short, long, default_value = "output")]
        output_dir: PathBuf,

        /// Image name prefix
        #[arg(short, long, default_value = "frame")]
        name: String,
    },

    /// Render an existing grid file to a PNG image
    RenderGrid {
        /// Grid file (.vti or .vtk)
        input: PathBuf,

        /// Output PNG path
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Pack a JSON array of 2D arrays into a Zarr frame archive
    Pack {
        /// JSON file holding the frame sequence
        input: PathBuf,

        /// Output archive directory
        #[arg(short, long)]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    // Load environment from .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();
    init_tracing(&args.log_level, args.json_logs)?;

    let config = load_config(&args)?;
    info!(
        dataset = %config.dataset,
        experiments_length = ?config.experiments_length,
        grid_format = config.grid_format.extension(),
        failure_policy = %config.failure_policy,
        "Starting frame export"
    );

    match &args.command {
        Command::Info { archive } => print_json(&commands::info(archive, &config)?),
        Command::Render {
            archive,
            experiment,
            output_dir,
            name,
            volume: true,
        } => print_json(&commands::render_volume(archive, *experiment, output_dir, name, &config)?),
        Command::Render {
            archive,
            experiment,
            output_dir,
            name,
            volume: false,
        } => finish(commands::render(archive, *experiment, output_dir, name, &config)?),
        Command::Export {
            archive,
            experiment,
            output_dir,
            name,
            volume: true,
        } => print_json(&commands::export_volume(archive, *experiment, output_dir, name, &config)?),
        Command::Export {
            archive,
            experiment,
            output_dir,
            name,
            volume: false,
        } => finish(commands::export(archive, *experiment, output_dir, name, &config)?),
        Command::RenderJson {
            input,
            output_dir,
            name,
        } => finish(commands::render_json(input, output_dir, name, &config)?),
        Command::RenderGrid { input, output } => {
            let image = commands::render_grid(input, output, &config)?;
            println!("{}", image.path.display());
            Ok(())
        }
        Command::Pack { input, output } => {
            print_json(&commands::pack(input, output, &config)?)
        }
    }
}

fn init_tracing(log_level: &str, json: bool) -> Result<()> {
    let level = match log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_thread_ids(true)
        .with_writer(std::io::stderr);

    if json {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }
    Ok(())
}

/// YAML file or environment first, then command-line overrides.
fn load_config(args: &Args) -> Result<ExportConfig> {
    let mut config = match &args.config {
        Some(path) => ExportConfig::from_yaml(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => ExportConfig::from_env(),
    };

    if let Some(dataset) = &args.dataset {
        config.dataset = dataset.clone();
    }
    if let Some(length) = args.experiments_length {
        config.experiments_length = Some(length);
    }
    if let Some(px) = args.cell_pixels {
        config.render.cell_pixels = px;
    }
    if let Some(range) = &args.color_range {
        config.render.color_range = parse_color_range(range)?;
    }
    if let Some(name) = &args.grid_format {
        config.grid_format = GridFileFormat::from_name(name)
            .with_context(|| format!("Unknown grid format: {}", name))?;
    }
    if let Some(name) = &args.failure_policy {
        config.failure_policy = FailurePolicy::from_name(name)
            .with_context(|| format!("Unknown failure policy: {}", name))?;
    }

    config.validate()?;
    Ok(config)
}

fn parse_color_range(s: &str) -> Result<ColorRange> {
    if s.eq_ignore_ascii_case("auto") {
        return Ok(ColorRange::Auto);
    }
    let (min, max) = s
        .split_once(':')
        .with_context(|| format!("Colour range must be 'min:max' or 'auto', got {}", s))?;
    Ok(ColorRange::Fixed {
        min: min.trim().parse().context("Invalid colour range minimum")?,
        max: max.trim().parse().context("Invalid colour range maximum")?,
    })
}

/// Print the batch report and fail if any entry failed.
fn finish(report: BatchReport) -> Result<()> {
    print_json(&report)?;
    if !report.is_success() {
        anyhow::bail!("{} of {} entries failed", report.failed.len(), report.total());
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
