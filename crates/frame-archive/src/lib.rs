//! Frame archive access and experiment indexing.
//!
//! A frame archive is a flat stack of 2D lattice snapshots stored under one
//! named dataset (`images`). This crate partitions that stack into
//! fixed-length experiments and reads them back through interchangeable
//! stores:
//!
//! - **Zarr V3** directory stores (`zarrs`)
//! - **netCDF-4 / HDF5** files (`netcdf`)
//! - **In-memory** frame vectors
//!
//! # Architecture
//!
//! ```text
//! ArchiveIndexer::load_experiment(k)
//!      │
//!      ├─► experiment_range(k) = [k*L, (k+1)*L)
//!      │
//!      └─► FrameStore::read_frames(range)
//!               │
//!               ├─► open container
//!               ├─► slice rows (clamped, half-open)
//!               └─► close container
//! ```
//!
//! # Example
//!
//! ```ignore
//! use frame_archive::ArchiveIndexer;
//!
//! let indexer = ArchiveIndexer::from_path("exp_1_len_90_2D.h5", "images")?;
//! let frames = indexer.load_experiment(1)?; // rows 90..180
//! ```

pub mod error;
pub mod indexer;
pub mod marker;
pub mod store;
pub mod writer;

pub use error::{ArchiveError, Result};
pub use indexer::ArchiveIndexer;
pub use marker::{parse_length_marker, LENGTH_MARKER};
pub use store::{
    clamp_range, is_zarr_path, open_store, silence_hdf5_errors, DynFrameStore, FrameStore,
    MemoryFrameStore, NetCdfFrameStore, ZarrFrameStore,
};
pub use writer::{ArchiveMetadata, ArchiveWriteResult, ZarrFrameWriter};
