//! Failure policy and per-batch outcome.

use std::path::PathBuf;

use frame_common::FrameError;
use serde::{Deserialize, Serialize};

/// What a batch does when writing one entry fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Record the failure and go on with the next entry.
    #[default]
    Continue,
    /// Stop at the first failure and return its error.
    Abort,
}

impl FailurePolicy {
    /// Parse from string (case-insensitive).
    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "continue" => Some(Self::Continue),
            "abort" | "fail_fast" => Some(Self::Abort),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Continue => "continue",
            Self::Abort => "abort",
        }
    }
}

impl std::fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An entry that was not a frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedEntry {
    pub index: usize,
    pub reason: String,
}

/// A frame whose output could not be produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedEntry {
    pub index: usize,
    pub kind: String,
    pub error: String,
}

/// Outcome of one batch. Every input index appears in exactly one list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchReport {
    pub written: Vec<PathBuf>,
    pub skipped: Vec<SkippedEntry>,
    pub failed: Vec<FailedEntry>,
}

impl BatchReport {
    pub fn record_written(&mut self, path: PathBuf) {
        self.written.push(path);
    }

    pub fn record_skipped(&mut self, index: usize, reason: impl Into<String>) {
        self.skipped.push(SkippedEntry {
            index,
            reason: reason.into(),
        });
    }

    pub fn record_failed(&mut self, index: usize, error: &FrameError) {
        self.failed.push(FailedEntry {
            index,
            kind: error.kind().to_string(),
            error: error.to_string(),
        });
    }

    pub fn skipped_indices(&self) -> Vec<usize> {
        self.skipped.iter().map(|s| s.index).collect()
    }

    pub fn failed_indices(&self) -> Vec<usize> {
        self.failed.iter().map(|f| f.index).collect()
    }

    /// Entries looked at.
    pub fn total(&self) -> usize {
        self.written.len() + self.skipped.len() + self.failed.len()
    }

    /// True when nothing failed. Skips do not count as failures.
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}
