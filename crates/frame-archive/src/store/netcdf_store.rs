//! netCDF-4 / HDF5 frame store using the native netcdf library.
//!
//! netCDF-4 files are HDF5 files, and libnetcdf opens plain HDF5 archives
//! such as `exp_1_len_90_2D.h5` as long as they avoid HDF5 features netCDF
//! does not model. Dimensions without dimension scales show up as phony
//! dimensions, which is all the frame dataset needs.

use std::ops::Range;
use std::path::{Path, PathBuf};
use std::sync::Once;

use frame_common::Frame;
use tracing::debug;

use super::{clamp_range, FrameStore};
use crate::error::{ArchiveError, Result};

/// Silence HDF5's automatic error printing to stderr.
///
/// The HDF5 C library prints diagnostic stacks even for errors that are
/// handled on the Rust side (a missing dataset, for instance). Only needs to
/// run once per process; later calls are no-ops.
pub fn silence_hdf5_errors() {
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        // SAFETY: H5Eset_auto2 is thread-safe and passing a null handler is
        // the documented way to disable automatic error printing.
        unsafe {
            hdf5_metno_sys::h5e::H5Eset_auto2(
                hdf5_metno_sys::h5e::H5E_DEFAULT,
                None,
                std::ptr::null_mut(),
            );
        }
    });
}

/// Frame store over a 3D `(frames, rows, cols)` variable in a netCDF-4/HDF5 file.
#[derive(Debug, Clone)]
pub struct NetCdfFrameStore {
    path: PathBuf,
    dataset: String,
}

impl NetCdfFrameStore {
    pub fn new(path: impl Into<PathBuf>, dataset: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            dataset: dataset.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn open(&self) -> Result<netcdf::File> {
        silence_hdf5_errors();
        netcdf::open(&self.path).map_err(|e| {
            ArchiveError::open_failed(format!("{}: {}", self.path.display(), e))
        })
    }

    /// Dataset shape as `[frames, rows, cols]`.
    fn layout(&self, var: &netcdf::Variable) -> Result<[usize; 3]> {
        let shape: Vec<usize> = var.dimensions().iter().map(|d| d.len()).collect();
        match shape.as_slice() {
            [n, rows, cols] => Ok([*n, *rows, *cols]),
            _ => Err(ArchiveError::InvalidLayout {
                name: self.dataset.clone(),
                shape,
            }),
        }
    }
}

impl FrameStore for NetCdfFrameStore {
    fn frame_count(&self) -> Result<usize> {
        let file = self.open()?;
        let var = file
            .variable(&self.dataset)
            .ok_or_else(|| ArchiveError::MissingDataset(self.dataset.clone()))?;
        let [n, _, _] = self.layout(&var)?;
        Ok(n)
    }

    fn read_frames(&self, range: Range<usize>) -> Result<Vec<Frame>> {
        let file = self.open()?;
        let var = file
            .variable(&self.dataset)
            .ok_or_else(|| ArchiveError::MissingDataset(self.dataset.clone()))?;
        let [n, rows, cols] = self.layout(&var)?;

        let range = clamp_range(range, n);
        if range.is_empty() {
            return Ok(Vec::new());
        }

        debug!(
            path = %self.path.display(),
            start = range.start,
            end = range.end,
            "Reading frames"
        );

        // libnetcdf converts integer types on read
        let values: Vec<i32> = var
            .get_values((range.clone(), .., ..))
            .map_err(|e| ArchiveError::read_failed(format!("{}: {}", self.dataset, e)))?;

        let frame_len = rows * cols;
        if frame_len == 0 {
            return Ok(range.map(|_| Frame::filled(rows, cols, 0)).collect());
        }
        let frames = values
            .chunks_exact(frame_len)
            .take(range.len())
            .map(|chunk| Frame::new(rows, cols, chunk.to_vec()))
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| ArchiveError::read_failed(e.to_string()))?;

        Ok(frames)
    }

    fn describe(&self) -> String {
        format!("netcdf:{}#{}", self.path.display(), self.dataset)
    }
}
