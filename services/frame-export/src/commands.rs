//! Command implementations.
//!
//! Each command takes a validated [`ExportConfig`] and plain paths so it can
//! be driven from tests without going through argument parsing.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use frame_archive::ZarrFrameWriter;
use frame_common::Frame;
use frame_pipeline::{
    load_experiment_entries, normalize_json_sequence, open_indexer, BatchReport, ExportConfig,
    FrameEntry, SequenceDriver,
};
use grid_file::read_grid_file;
use renderer::{RenderedImage, Renderer};
use serde::Serialize;
use tracing::{info, warn};

/// Experiment counts for one archive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArchiveSummary {
    pub path: PathBuf,
    pub dataset: String,
    pub experiments_length: usize,
    pub total_frames: usize,
    pub total_experiments: usize,
    pub remainder_frames: usize,
}

/// Result of packing a JSON sequence into an archive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackSummary {
    pub path: PathBuf,
    pub frames: usize,
    pub skipped: Vec<usize>,
    pub bytes_written: u64,
}

pub fn info(archive: &Path, config: &ExportConfig) -> Result<ArchiveSummary> {
    let indexer = open_indexer(archive, config)
        .with_context(|| format!("Failed to open archive {}", archive.display()))?;

    let summary = ArchiveSummary {
        path: archive.to_path_buf(),
        dataset: config.dataset.clone(),
        experiments_length: indexer.experiments_length(),
        total_frames: indexer.total_frames()?,
        total_experiments: indexer.total_experiments()?,
        remainder_frames: indexer.remainder_frames()?,
    };
    info!(
        path = %archive.display(),
        frames = summary.total_frames,
        experiments = summary.total_experiments,
        "Inspected archive"
    );
    Ok(summary)
}

/// Render experiment `experiment` to `{output_dir}/{name}_{i}.png`.
pub fn render(
    archive: &Path,
    experiment: usize,
    output_dir: &Path,
    name: &str,
    config: &ExportConfig,
) -> Result<BatchReport> {
    let entries = load_entries(archive, experiment, config)?;
    let prefix = output_prefix(output_dir, name)?;
    Ok(SequenceDriver::new(config).render_sequence(&entries, &prefix)?)
}

/// Write experiment `experiment` as grid files `{output_dir}/{name}.{i}.{ext}`.
pub fn export(
    archive: &Path,
    experiment: usize,
    output_dir: &Path,
    name: &str,
    config: &ExportConfig,
) -> Result<BatchReport> {
    let entries = load_entries(archive, experiment, config)?;
    let prefix = output_prefix(output_dir, name)?;
    Ok(SequenceDriver::new(config).export_sequence(&entries, &prefix)?)
}

/// Render experiment `experiment` as one volume image `{output_dir}/{name}.png`.
pub fn render_volume(
    archive: &Path,
    experiment: usize,
    output_dir: &Path,
    name: &str,
    config: &ExportConfig,
) -> Result<PathBuf> {
    let entries = load_entries(archive, experiment, config)?;
    let prefix = output_prefix(output_dir, name)?;
    SequenceDriver::new(config)
        .render_volume(&entries, &prefix)
        .with_context(|| format!("Failed to render experiment {} as a volume", experiment))
}

/// Write experiment `experiment` as one volume grid file `{output_dir}/{name}.{ext}`.
pub fn export_volume(
    archive: &Path,
    experiment: usize,
    output_dir: &Path,
    name: &str,
    config: &ExportConfig,
) -> Result<PathBuf> {
    let entries = load_entries(archive, experiment, config)?;
    let prefix = output_prefix(output_dir, name)?;
    SequenceDriver::new(config)
        .export_volume(&entries, &prefix)
        .with_context(|| format!("Failed to export experiment {} as a volume", experiment))
}

/// Render a JSON sequence of 2D arrays. Non-array elements are skipped
/// without shifting the indices of later images.
pub fn render_json(
    input: &Path,
    output_dir: &Path,
    name: &str,
    config: &ExportConfig,
) -> Result<BatchReport> {
    let entries = read_json_entries(input)?;
    let prefix = output_prefix(output_dir, name)?;
    Ok(SequenceDriver::new(config).render_sequence(&entries, &prefix)?)
}

/// Render the active cell channel of an existing grid file.
pub fn render_grid(input: &Path, output: &Path, config: &ExportConfig) -> Result<RenderedImage> {
    let grid = read_grid_file(input)
        .with_context(|| format!("Failed to read grid file {}", input.display()))?;
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    let renderer = Renderer::with_conventions(config.conventions.clone(), config.render.clone());
    let mut ctx = renderer.context();
    let image = renderer
        .render_grid(&mut ctx, &grid, output)
        .with_context(|| format!("Failed to render {}", input.display()))?;
    info!(
        input = %input.display(),
        output = %image.path.display(),
        width = image.width,
        height = image.height,
        "Rendered grid file"
    );
    Ok(image)
}

/// Pack the well-formed frames of a JSON sequence into a Zarr archive.
pub fn pack(
    input: &Path,
    output: &Path,
    config: &ExportConfig,
) -> Result<PackSummary> {
    let entries = read_json_entries(input)?;

    let mut frames: Vec<Frame> = Vec::with_capacity(entries.len());
    let mut skipped = Vec::new();
    for (index, entry) in entries.into_iter().enumerate() {
        match entry {
            FrameEntry::Frame(frame) => frames.push(frame),
            FrameEntry::Malformed { reason } => {
                warn!(index, reason = %reason, "Skipping malformed entry");
                skipped.push(index);
            }
        }
    }
    if frames.is_empty() {
        bail!("{} contains no well-formed frames", input.display());
    }

    let mut writer = ZarrFrameWriter::new(config.dataset.clone());
    if let Some(length) = config.experiments_length {
        writer = writer.with_experiments_length(length);
    }
    let result = writer
        .write(output, &frames)
        .with_context(|| format!("Failed to write archive {}", output.display()))?;

    info!(
        path = %output.display(),
        frames = result.metadata.frames,
        bytes = result.bytes_written,
        "Packed archive"
    );
    Ok(PackSummary {
        path: output.to_path_buf(),
        frames: result.metadata.frames,
        skipped,
        bytes_written: result.bytes_written,
    })
}

fn load_entries(archive: &Path, experiment: usize, config: &ExportConfig) -> Result<Vec<FrameEntry>> {
    let indexer = open_indexer(archive, config)
        .with_context(|| format!("Failed to open archive {}", archive.display()))?;
    let entries = load_experiment_entries(&indexer, experiment)
        .with_context(|| format!("Failed to load experiment {}", experiment))?;
    if entries.is_empty() {
        warn!(experiment, "Experiment is past the end of the archive");
    }
    Ok(entries)
}

fn read_json_entries(input: &Path) -> Result<Vec<FrameEntry>> {
    let content = std::fs::read_to_string(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;
    normalize_json_sequence(&content)
        .with_context(|| format!("Failed to parse frame sequence {}", input.display()))
}

/// Create `output_dir` and join `name` onto it as an output prefix.
fn output_prefix(output_dir: &Path, name: &str) -> Result<String> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create {}", output_dir.display()))?;
    let prefix = output_dir.join(name);
    match prefix.to_str() {
        Some(prefix) => Ok(prefix.to_string()),
        None => bail!("Output path is not valid UTF-8: {}", prefix.display()),
    }
}
