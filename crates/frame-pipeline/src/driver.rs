//! Sequence driver: one output file per well-formed entry.
//!
//! Output index always equals input position. Malformed entries are
//! skipped with a warning and never shift later indices.
//!
//! The volume operations stack a whole sequence into one `[rows, cols, n]`
//! volume and write a single output.

use std::path::{Path, PathBuf};

use frame_common::{Frame, FrameError, FrameResult, Volume};
use grid_file::{GridFileFormat, GridWriter};
use renderer::{RenderContext, Renderer};
use tracing::{error, info, warn};

use crate::config::ExportConfig;
use crate::entry::FrameEntry;
use crate::report::{BatchReport, FailurePolicy};

/// Drives rendering and grid export over frame sequences.
#[derive(Debug, Clone, Default)]
pub struct SequenceDriver {
    renderer: Renderer,
    grid_writer: GridWriter,
    grid_format: GridFileFormat,
    policy: FailurePolicy,
}

impl SequenceDriver {
    pub fn new(config: &ExportConfig) -> Self {
        Self {
            renderer: Renderer::with_conventions(config.conventions.clone(), config.render.clone()),
            grid_writer: GridWriter::new(config.conventions.clone()),
            grid_format: config.grid_format,
            policy: config.failure_policy,
        }
    }

    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_grid_format(mut self, format: GridFileFormat) -> Self {
        self.grid_format = format;
        self
    }

    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    /// Path of the image for entry `index`: `{prefix}_{index}.png`.
    pub fn image_path(prefix: &str, index: usize) -> PathBuf {
        PathBuf::from(format!("{}_{}.png", prefix, index))
    }

    /// Path of the grid file for entry `index`: `{prefix}.{index}.{ext}`.
    pub fn grid_path(&self, prefix: &str, index: usize) -> PathBuf {
        PathBuf::from(format!("{}.{}.{}", prefix, index, self.grid_format.extension()))
    }

    /// Render every frame entry to `{prefix}_{i}.png`.
    ///
    /// One render context is held for the whole batch.
    pub fn render_sequence(&self, entries: &[FrameEntry], name_prefix: &str) -> FrameResult<BatchReport> {
        info!(entries = entries.len(), prefix = name_prefix, "Rendering sequence");
        let mut ctx = self.renderer.context();
        let report = self.drive(entries, "render", |index, frame| {
            let path = Self::image_path(name_prefix, index);
            self.render_one(&mut ctx, frame, &path)?;
            Ok(path)
        })?;
        info!(
            written = report.written.len(),
            skipped = report.skipped.len(),
            failed = report.failed.len(),
            "Rendered sequence"
        );
        Ok(report)
    }

    /// Write every frame entry as a grid file `{prefix}.{i}.{ext}`.
    pub fn export_sequence(&self, entries: &[FrameEntry], prefix: &str) -> FrameResult<BatchReport> {
        info!(
            entries = entries.len(),
            prefix,
            format = self.grid_format.extension(),
            "Exporting sequence"
        );
        let report = self.drive(entries, "export", |index, frame| {
            let path = self.grid_path(prefix, index);
            self.grid_writer.write_frame(frame, &path)?;
            Ok(path)
        })?;
        info!(
            written = report.written.len(),
            skipped = report.skipped.len(),
            failed = report.failed.len(),
            "Exported sequence"
        );
        Ok(report)
    }

    /// Stack the well-formed entries along depth. Malformed entries are
    /// skipped with a warning.
    pub fn stack_volume(entries: &[FrameEntry]) -> FrameResult<Volume> {
        let mut frames = Vec::with_capacity(entries.len());
        for (index, entry) in entries.iter().enumerate() {
            match entry {
                FrameEntry::Frame(frame) => frames.push(frame.clone()),
                FrameEntry::Malformed { reason } => {
                    warn!(index, op = "stack", reason = %reason, "Skipping malformed entry");
                }
            }
        }
        if frames.is_empty() {
            return Err(FrameError::GridFormat(
                "no well-formed frames to stack".to_string(),
            ));
        }
        Volume::from_frames_as_depth(&frames)
    }

    /// Render the sequence as one volume image `{prefix}.png`, checked
    /// against the expected 3D extent.
    pub fn render_volume(&self, entries: &[FrameEntry], prefix: &str) -> FrameResult<PathBuf> {
        let volume = Self::stack_volume(entries)?;
        let path = PathBuf::from(format!("{}.png", prefix));
        let mut ctx = self.renderer.context();
        self.renderer.render_volume_to_image(&mut ctx, &volume, &path)?;
        info!(shape = ?volume.shape(), path = %path.display(), "Rendered volume");
        Ok(path)
    }

    /// Write the sequence as one volume grid file `{prefix}.{ext}`.
    pub fn export_volume(&self, entries: &[FrameEntry], prefix: &str) -> FrameResult<PathBuf> {
        let volume = Self::stack_volume(entries)?;
        let path = PathBuf::from(format!("{}.{}", prefix, self.grid_format.extension()));
        self.grid_writer.write_volume(&volume, &path)?;
        info!(shape = ?volume.shape(), path = %path.display(), "Exported volume");
        Ok(path)
    }

    fn render_one(&self, ctx: &mut RenderContext, frame: &Frame, path: &Path) -> FrameResult<()> {
        self.renderer.render_to_image(ctx, frame, path)?;
        Ok(())
    }

    fn drive<F>(&self, entries: &[FrameEntry], op: &str, mut write: F) -> FrameResult<BatchReport>
    where
        F: FnMut(usize, &Frame) -> FrameResult<PathBuf>,
    {
        let mut report = BatchReport::default();
        for (index, entry) in entries.iter().enumerate() {
            match entry {
                FrameEntry::Malformed { reason } => {
                    warn!(index, op, reason = %reason, "Skipping malformed entry");
                    report.record_skipped(index, reason.clone());
                }
                FrameEntry::Frame(frame) => match write(index, frame) {
                    Ok(path) => report.record_written(path),
                    Err(e) => {
                        error!(index, op, error = %e, "Failed to write entry");
                        if self.policy == FailurePolicy::Abort {
                            return Err(e);
                        }
                        report.record_failed(index, &e);
                    }
                },
            }
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths() {
        let driver = SequenceDriver::default();
        assert_eq!(SequenceDriver::image_path("out/name", 2), PathBuf::from("out/name_2.png"));
        assert_eq!(driver.grid_path("out/frame", 0), PathBuf::from("out/frame.0.vti"));
        let legacy = driver.with_grid_format(GridFileFormat::LegacyStructuredPoints);
        assert_eq!(legacy.grid_path("frame", 3), PathBuf::from("frame.3.vtk"));
    }

    #[test]
    fn test_drive_continue_records_failures() {
        let driver = SequenceDriver::default();
        let entries = vec![
            FrameEntry::from(Frame::filled(1, 1, 0)),
            FrameEntry::malformed("string"),
            FrameEntry::from(Frame::filled(1, 1, 2)),
        ];
        let report = driver
            .drive(&entries, "test", |index, _| {
                if index == 2 {
                    Err(FrameError::Render("boom".into()))
                } else {
                    Ok(PathBuf::from(format!("f_{}", index)))
                }
            })
            .unwrap();
        assert_eq!(report.written, vec![PathBuf::from("f_0")]);
        assert_eq!(report.skipped_indices(), vec![1]);
        assert_eq!(report.failed_indices(), vec![2]);
    }

    #[test]
    fn test_drive_abort_stops() {
        let driver = SequenceDriver::default().with_policy(FailurePolicy::Abort);
        let entries = vec![
            FrameEntry::from(Frame::filled(1, 1, 0)),
            FrameEntry::from(Frame::filled(1, 1, 1)),
        ];
        let mut calls = 0;
        let result = driver.drive(&entries, "test", |_, _| {
            calls += 1;
            Err(FrameError::Render("boom".into()))
        });
        assert!(matches!(result, Err(FrameError::Render(_))));
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_stack_volume_skips_malformed() {
        let entries = vec![
            FrameEntry::from(Frame::filled(2, 3, 0)),
            FrameEntry::malformed("string"),
            FrameEntry::from(Frame::filled(2, 3, 1)),
        ];
        let volume = SequenceDriver::stack_volume(&entries).unwrap();
        assert_eq!(volume.shape(), [2, 3, 2]);

        let none = vec![FrameEntry::malformed("null")];
        assert!(matches!(
            SequenceDriver::stack_volume(&none),
            Err(FrameError::GridFormat(_))
        ));
    }
}
