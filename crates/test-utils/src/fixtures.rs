//! Common test fixtures for frame export tests.
//!
//! Archive fixtures are written directly with `zarrs` rather than through
//! the archive crate's own writer, so reader tests do not depend on the
//! code they are checking.

use std::path::Path;
use std::sync::Arc;

use frame_common::Frame;
use zarrs::array::{ArrayBuilder, DataType, FillValue};
use zarrs::array_subset::ArraySubset;
use zarrs_filesystem::FilesystemStore;

/// Common frame shapes for testing.
pub mod shapes {
    /// Shape admitted by the default 2D render extent (101 x 101 points).
    pub const RENDERABLE: (usize, usize) = (100, 100);

    /// Small square shape for fast tests.
    pub const SMALL: (usize, usize) = (8, 8);

    /// Non-square shape, exposes axis-order mistakes.
    pub const RECT: (usize, usize) = (3, 5);
}

/// Write `frames` into a Zarr V3 store at `path` as a `(N, rows, cols)`
/// int32 array named `dataset` (no sharding, no compression).
pub fn write_zarr_archive(
    path: &Path,
    dataset: &str,
    frames: &[Frame],
) -> Result<(), Box<dyn std::error::Error>> {
    let [rows, cols] = frames.first().map(Frame::shape).unwrap_or([1, 1]);
    let values: Vec<i32> = frames
        .iter()
        .flat_map(|f| f.values().iter().copied())
        .collect();
    write_zarr_values(path, dataset, [frames.len(), rows, cols], &values)
}

/// Write a raw int32 array of any shape, for layout-error tests.
pub fn write_zarr_values(
    path: &Path,
    dataset: &str,
    shape: [usize; 3],
    values: &[i32],
) -> Result<(), Box<dyn std::error::Error>> {
    std::fs::create_dir_all(path)?;
    let store = Arc::new(FilesystemStore::new(path)?);

    let shape: Vec<u64> = shape.iter().map(|&d| d as u64).collect();
    let chunk: Vec<u64> = shape.iter().map(|&d| d.max(1)).collect();

    let array = ArrayBuilder::new(
        shape.clone(),
        DataType::Int32,
        chunk.try_into()?,
        FillValue::from(0i32),
    )
    .build(store, &format!("/{}", dataset))?;

    array.store_metadata()?;

    let subset = ArraySubset::new_with_start_shape(vec![0; shape.len()], shape)?;
    array.store_array_subset_elements(&subset, values)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::create_frame_sequence;

    #[test]
    fn test_write_zarr_archive_creates_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frames_len_2.zarr");
        write_zarr_archive(&path, "images", &create_frame_sequence(4, 3, 3)).unwrap();
        assert!(path.join("images").join("zarr.json").exists());
    }
}
