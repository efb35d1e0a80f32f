//! Zarr V3 frame store.

use std::fmt::Display;
use std::ops::Range;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use frame_common::Frame;
use tracing::debug;
use zarrs::array::{Array, DataType};
use zarrs::array_subset::ArraySubset;
use zarrs_filesystem::FilesystemStore;

use super::{clamp_range, FrameStore};
use crate::error::{ArchiveError, Result};

/// Frame store over a `(frames, rows, cols)` Zarr array on the filesystem.
///
/// The array lives at `/<dataset>` inside the store directory.
#[derive(Debug, Clone)]
pub struct ZarrFrameStore {
    path: PathBuf,
    dataset: String,
}

impl ZarrFrameStore {
    pub fn new(path: impl Into<PathBuf>, dataset: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            dataset: dataset.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of the frame array inside the store.
    pub fn array_path(&self) -> String {
        format!("/{}", self.dataset.trim_start_matches('/'))
    }

    fn open(&self) -> Result<Array<FilesystemStore>> {
        if !self.path.exists() {
            return Err(ArchiveError::open_failed(format!(
                "{}: no such store",
                self.path.display()
            )));
        }
        let store = FilesystemStore::new(&self.path)
            .map_err(|e| ArchiveError::open_failed(format!("{}: {}", self.path.display(), e)))?;
        Array::open(Arc::new(store), &self.array_path()).map_err(|e| {
            ArchiveError::MissingDataset(format!("{} ({})", self.dataset, e))
        })
    }

    fn layout(&self, array: &Array<FilesystemStore>) -> Result<[usize; 3]> {
        let shape: Vec<usize> = array.shape().iter().map(|&d| d as usize).collect();
        match shape.as_slice() {
            [n, rows, cols] => Ok([*n, *rows, *cols]),
            _ => Err(ArchiveError::InvalidLayout {
                name: self.dataset.clone(),
                shape,
            }),
        }
    }
}

/// Narrow stored integers to the frame value type.
fn narrow<T>(values: Vec<T>) -> Result<Vec<i32>>
where
    T: Copy + Display + TryInto<i32>,
{
    values
        .into_iter()
        .map(|v| v.try_into().map_err(|_| ArchiveError::ValueOutOfRange(v.to_string())))
        .collect()
}

impl FrameStore for ZarrFrameStore {
    fn frame_count(&self) -> Result<usize> {
        let array = self.open()?;
        let [n, _, _] = self.layout(&array)?;
        Ok(n)
    }

    fn read_frames(&self, range: Range<usize>) -> Result<Vec<Frame>> {
        let array = self.open()?;
        let [n, rows, cols] = self.layout(&array)?;

        let range = clamp_range(range, n);
        if range.is_empty() {
            return Ok(Vec::new());
        }
        if rows * cols == 0 {
            return Ok(range.map(|_| Frame::filled(rows, cols, 0)).collect());
        }

        debug!(
            path = %self.path.display(),
            start = range.start,
            end = range.end,
            "Reading frames"
        );

        let subset = ArraySubset::new_with_start_shape(
            vec![range.start as u64, 0, 0],
            vec![range.len() as u64, rows as u64, cols as u64],
        )
        .map_err(|e| ArchiveError::read_failed(e.to_string()))?;

        let read_err = |e: zarrs::array::ArrayError| ArchiveError::read_failed(e.to_string());
        let values: Vec<i32> = match array.data_type() {
            DataType::Int32 => array
                .retrieve_array_subset_elements::<i32>(&subset)
                .map_err(read_err)?,
            DataType::Int64 => narrow(
                array
                    .retrieve_array_subset_elements::<i64>(&subset)
                    .map_err(read_err)?,
            )?,
            DataType::Int16 => narrow(
                array
                    .retrieve_array_subset_elements::<i16>(&subset)
                    .map_err(read_err)?,
            )?,
            DataType::Int8 => narrow(
                array
                    .retrieve_array_subset_elements::<i8>(&subset)
                    .map_err(read_err)?,
            )?,
            DataType::UInt8 => narrow(
                array
                    .retrieve_array_subset_elements::<u8>(&subset)
                    .map_err(read_err)?,
            )?,
            DataType::UInt16 => narrow(
                array
                    .retrieve_array_subset_elements::<u16>(&subset)
                    .map_err(read_err)?,
            )?,
            DataType::UInt32 => narrow(
                array
                    .retrieve_array_subset_elements::<u32>(&subset)
                    .map_err(read_err)?,
            )?,
            other => {
                return Err(ArchiveError::read_failed(format!(
                    "unsupported frame data type {:?}",
                    other
                )))
            }
        };

        values
            .chunks_exact(rows * cols)
            .map(|chunk| Frame::new(rows, cols, chunk.to_vec()))
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| ArchiveError::read_failed(e.to_string()))
    }

    fn describe(&self) -> String {
        format!("zarr:{}#{}", self.path.display(), self.array_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_array_path_normalizes_leading_slash() {
        assert_eq!(ZarrFrameStore::new("a.zarr", "images").array_path(), "/images");
        assert_eq!(ZarrFrameStore::new("a.zarr", "/images").array_path(), "/images");
    }

    #[test]
    fn test_narrow() {
        assert_eq!(narrow(vec![1i64, -2, 3]).unwrap(), vec![1, -2, 3]);
        assert!(narrow(vec![i64::MAX]).is_err());
    }

    #[test]
    fn test_missing_store_is_open_failure() {
        let store = ZarrFrameStore::new("/nonexistent/frames.zarr", "images");
        assert!(matches!(store.frame_count(), Err(ArchiveError::OpenFailed(_))));
    }
}
