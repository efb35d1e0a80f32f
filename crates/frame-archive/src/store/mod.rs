//! Frame store abstraction.
//!
//! A frame store is a random-access stack of equally shaped 2D arrays,
//! addressed by half-open row ranges. Every call opens the underlying
//! container, reads, and releases it before returning; no handle outlives
//! a call.

mod memory;
mod netcdf_store;
mod zarr_store;

use std::ops::Range;
use std::path::Path;

use frame_common::Frame;

use crate::error::Result;

pub use self::memory::MemoryFrameStore;
pub use self::netcdf_store::{silence_hdf5_errors, NetCdfFrameStore};
pub use self::zarr_store::ZarrFrameStore;

/// Random-access store of frames.
pub trait FrameStore {
    /// Number of frames (rows of the frame dataset).
    fn frame_count(&self) -> Result<usize>;

    /// Read frames `range.start..range.end`.
    ///
    /// Follows half-open slice semantics: both bounds are clamped to the
    /// frame count, so a range past the end yields a partial or empty
    /// result rather than an error.
    fn read_frames(&self, range: Range<usize>) -> Result<Vec<Frame>>;

    /// Human-readable description for logs.
    fn describe(&self) -> String;
}

/// Boxed store selected at runtime.
pub type DynFrameStore = Box<dyn FrameStore + Send + Sync>;

impl<T: FrameStore + ?Sized> FrameStore for Box<T> {
    fn frame_count(&self) -> Result<usize> {
        (**self).frame_count()
    }

    fn read_frames(&self, range: Range<usize>) -> Result<Vec<Frame>> {
        (**self).read_frames(range)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

/// Clamp a requested range to `0..len` with slice semantics.
pub fn clamp_range(range: Range<usize>, len: usize) -> Range<usize> {
    let start = range.start.min(len);
    let end = range.end.min(len).max(start);
    start..end
}

/// True if a path should be opened as a Zarr store.
pub fn is_zarr_path(path: &Path) -> bool {
    path.is_dir()
        || path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("zarr"))
            .unwrap_or(false)
}

/// Open the store matching a path: Zarr for directories and `.zarr`,
/// netCDF-4/HDF5 for everything else.
pub fn open_store(path: impl AsRef<Path>, dataset: &str) -> DynFrameStore {
    let path = path.as_ref();
    if is_zarr_path(path) {
        Box::new(ZarrFrameStore::new(path, dataset))
    } else {
        Box::new(NetCdfFrameStore::new(path, dataset))
    }
}
