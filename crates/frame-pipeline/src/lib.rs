//! Frame sequence processing.
//!
//! Turns experiments (or any frame sequence) into preview images and grid
//! files, one output per input position:
//!
//! ```text
//! ArchiveIndexer::load_experiment(k) ──► Vec<Frame>
//! normalize_json_sequence(json)       ──► Vec<FrameEntry>
//!                                             │
//!                        SequenceDriver ◄─────┘
//!                          ├─► render_sequence: {prefix}_{i}.png
//!                          └─► export_sequence: {prefix}.{i}.vti|vtk
//! ```

pub mod config;
pub mod driver;
pub mod entry;
pub mod report;

pub use config::{ConfigError, ExportConfig};
pub use driver::SequenceDriver;
pub use entry::{frames_to_entries, normalize_json_sequence, FrameEntry};
pub use report::{BatchReport, FailedEntry, FailurePolicy, SkippedEntry};

use frame_archive::{ArchiveIndexer, DynFrameStore};
use frame_common::FrameResult;
use std::path::Path;

/// Open the archive at `path` with the configured dataset and experiment
/// length, falling back to the `len_<digits>` marker in the path.
pub fn open_indexer(path: &Path, config: &ExportConfig) -> FrameResult<ArchiveIndexer<DynFrameStore>> {
    match config.experiments_length {
        Some(length) => ArchiveIndexer::open(path, &config.dataset, length),
        None => ArchiveIndexer::from_path(path, &config.dataset),
    }
}

/// Load experiment `index` as driver entries.
pub fn load_experiment_entries(
    indexer: &ArchiveIndexer<DynFrameStore>,
    index: usize,
) -> FrameResult<Vec<FrameEntry>> {
    Ok(frames_to_entries(indexer.load_experiment(index)?))
}
