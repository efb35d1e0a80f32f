//! Zarr V3 writer for packing frame sequences into an archive.
//!
//! Frames are stored as a single `(frames, rows, cols)` int32 array with one
//! frame per chunk, so reading an experiment touches exactly its own chunks.

use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use frame_common::Frame;
use serde::{Deserialize, Serialize};
use tracing::info;
use zarrs::array::{ArrayBuilder, DataType, FillValue};
use zarrs::array_subset::ArraySubset;
use zarrs_filesystem::FilesystemStore;

use crate::error::{ArchiveError, Result};

/// Metadata recorded alongside a written archive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchiveMetadata {
    /// Name of the frame dataset.
    pub dataset: String,
    /// Number of frames.
    pub frames: usize,
    /// Frame shape `[rows, cols]`.
    pub frame_shape: [usize; 2],
    /// Experiment length, if the writer was told one.
    pub experiments_length: Option<usize>,
}

/// Result of writing an archive.
#[derive(Debug)]
pub struct ArchiveWriteResult {
    pub metadata: ArchiveMetadata,
    /// Total bytes of frame data written (uncompressed).
    pub bytes_written: u64,
}

fn write_err<E: std::fmt::Display>(err: E) -> ArchiveError {
    ArchiveError::write_failed(err.to_string())
}

/// Writer for Zarr frame archives.
#[derive(Debug, Clone)]
pub struct ZarrFrameWriter {
    dataset: String,
    experiments_length: Option<usize>,
}

impl ZarrFrameWriter {
    pub fn new(dataset: impl Into<String>) -> Self {
        Self {
            dataset: dataset.into(),
            experiments_length: None,
        }
    }

    /// Record the experiment length in the array attributes.
    pub fn with_experiments_length(mut self, length: usize) -> Self {
        self.experiments_length = Some(length);
        self
    }

    /// Write all frames to a new Zarr store at `path`.
    ///
    /// All frames must share one non-empty shape.
    pub fn write(&self, path: &Path, frames: &[Frame]) -> Result<ArchiveWriteResult> {
        let [rows, cols] = frames
            .first()
            .map(Frame::shape)
            .ok_or_else(|| ArchiveError::write_failed("no frames to write"))?;
        if rows == 0 || cols == 0 {
            return Err(ArchiveError::write_failed("frames must not be empty"));
        }
        if let Some((i, frame)) = frames
            .iter()
            .enumerate()
            .find(|(_, f)| f.shape() != [rows, cols])
        {
            return Err(ArchiveError::write_failed(format!(
                "frame {} has shape {:?}, expected {:?}",
                i,
                frame.shape(),
                [rows, cols]
            )));
        }

        std::fs::create_dir_all(path)?;
        let store = Arc::new(FilesystemStore::new(path).map_err(write_err)?);

        let mut attrs = serde_json::Map::new();
        attrs.insert("dataset".to_string(), serde_json::json!(self.dataset));
        attrs.insert("frame_shape".to_string(), serde_json::json!([rows, cols]));
        attrs.insert("created_at".to_string(), serde_json::json!(Utc::now().to_rfc3339()));
        if let Some(length) = self.experiments_length {
            attrs.insert("experiments_length".to_string(), serde_json::json!(length));
        }

        let array_path = format!("/{}", self.dataset.trim_start_matches('/'));
        let array = ArrayBuilder::new(
            vec![frames.len() as u64, rows as u64, cols as u64],
            DataType::Int32,
            vec![1u64, rows as u64, cols as u64].try_into().map_err(write_err)?,
            FillValue::from(0i32),
        )
        .attributes(attrs)
        .build(store, &array_path)
        .map_err(write_err)?;

        array.store_metadata().map_err(write_err)?;

        let data: Vec<i32> = frames
            .iter()
            .flat_map(|f| f.values().iter().copied())
            .collect();
        let subset = ArraySubset::new_with_start_shape(
            vec![0, 0, 0],
            vec![frames.len() as u64, rows as u64, cols as u64],
        )
        .map_err(write_err)?;

        array
            .store_array_subset_elements(&subset, &data)
            .map_err(write_err)?;

        let bytes_written = (data.len() * std::mem::size_of::<i32>()) as u64;
        info!(
            path = %path.display(),
            frames = frames.len(),
            rows,
            cols,
            bytes = bytes_written,
            "Wrote frame archive"
        );

        Ok(ArchiveWriteResult {
            metadata: ArchiveMetadata {
                dataset: self.dataset.clone(),
                frames: frames.len(),
                frame_shape: [rows, cols],
                experiments_length: self.experiments_length,
            },
            bytes_written,
        })
    }
}
