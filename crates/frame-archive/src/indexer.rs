//! Fixed-length experiment indexing over a frame store.
//!
//! An archive is a flat stack of `N` frames. Experiment `k` of length `L`
//! occupies rows `[k * L, (k + 1) * L)`. When `N` is not a multiple of `L`
//! the trailing `N % L` frames belong to no experiment; this is reported by
//! [`ArchiveIndexer::remainder_frames`] but never treated as an error.

use std::ops::Range;
use std::path::Path;

use frame_common::{Frame, FrameError, FrameResult};
use tracing::{debug, warn};

use crate::marker::parse_length_marker;
use crate::store::{open_store, DynFrameStore, FrameStore};

/// Maps experiment indices to frame ranges of a store.
#[derive(Debug, Clone)]
pub struct ArchiveIndexer<S> {
    store: S,
    experiments_length: usize,
}

impl<S: FrameStore> ArchiveIndexer<S> {
    /// Create an indexer with an explicit experiment length.
    ///
    /// A length of zero can address nothing and fails with
    /// `UndeterminedLength`.
    pub fn new(store: S, experiments_length: usize) -> FrameResult<Self> {
        if experiments_length == 0 {
            return Err(FrameError::UndeterminedLength(format!(
                "experiment length must be positive ({})",
                store.describe()
            )));
        }
        Ok(Self {
            store,
            experiments_length,
        })
    }

    pub fn experiments_length(&self) -> usize {
        self.experiments_length
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Frame range of experiment `index`: `[index * L, index * L + L)`.
    pub fn experiment_range(&self, index: usize) -> FrameResult<Range<usize>> {
        let overflow = || FrameError::IndexOverflow {
            index,
            length: self.experiments_length,
        };
        let start = index
            .checked_mul(self.experiments_length)
            .ok_or_else(overflow)?;
        let end = start
            .checked_add(self.experiments_length)
            .ok_or_else(overflow)?;
        Ok(start..end)
    }

    /// Load the frames of experiment `index`.
    ///
    /// The range is not checked against the archive size. An index past the
    /// end returns whatever the store's clamped slice holds: fewer than `L`
    /// frames for a trailing partial experiment, none at all beyond it.
    pub fn load_experiment(&self, index: usize) -> FrameResult<Vec<Frame>> {
        let range = self.experiment_range(index)?;
        debug!(
            store = %self.store.describe(),
            experiment = index,
            start = range.start,
            end = range.end,
            "Loading experiment"
        );
        Ok(self.store.read_frames(range)?)
    }

    /// Number of frames in the archive.
    pub fn total_frames(&self) -> FrameResult<usize> {
        Ok(self.store.frame_count()?)
    }

    /// Number of complete experiments: `total_frames / L`, truncating.
    pub fn total_experiments(&self) -> FrameResult<usize> {
        let frames = self.total_frames()?;
        let remainder = frames % self.experiments_length;
        if remainder != 0 {
            warn!(
                store = %self.store.describe(),
                frames,
                experiments_length = self.experiments_length,
                unreachable = remainder,
                "Archive length is not a multiple of the experiment length"
            );
        }
        Ok(frames / self.experiments_length)
    }

    /// Frames after the last complete experiment.
    pub fn remainder_frames(&self) -> FrameResult<usize> {
        Ok(self.total_frames()? % self.experiments_length)
    }
}

impl ArchiveIndexer<DynFrameStore> {
    /// Open an archive whose experiment length is embedded in its path
    /// (`..._len_<digits>...`).
    ///
    /// Fails with `UndeterminedLength` when the marker is missing. The file
    /// itself is not touched until the first query.
    pub fn from_path(path: impl AsRef<Path>, dataset: &str) -> FrameResult<Self> {
        let path = path.as_ref();
        let length = parse_length_marker(path).ok_or_else(|| {
            FrameError::UndeterminedLength(format!(
                "no 'len_<digits>' marker in {}",
                path.display()
            ))
        })?;
        Self::open(path, dataset, length)
    }

    /// Open an archive with an explicit experiment length.
    pub fn open(
        path: impl AsRef<Path>,
        dataset: &str,
        experiments_length: usize,
    ) -> FrameResult<Self> {
        Self::new(open_store(path, dataset), experiments_length)
    }
}
