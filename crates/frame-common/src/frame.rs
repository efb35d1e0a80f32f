//! Frame and volume containers for lattice scalar fields.

use serde::{Deserialize, Serialize};

use crate::error::{FrameError, FrameResult};

/// A single 2D snapshot of a lattice scalar field.
///
/// Values are stored in row-major order: `values[row * cols + col]`.
/// A frame is immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
    rows: usize,
    cols: usize,
    values: Vec<i32>,
}

impl Frame {
    /// Create a frame from a row-major buffer.
    ///
    /// Fails with `ShapeMismatch` when `values.len() != rows * cols`.
    pub fn new(rows: usize, cols: usize, values: Vec<i32>) -> FrameResult<Self> {
        if values.len() != rows * cols {
            return Err(FrameError::shape_mismatch(
                vec![values.len()],
                vec![rows * cols],
            ));
        }
        Ok(Self { rows, cols, values })
    }

    /// Build a frame from a list of equally long rows.
    pub fn from_rows(rows: Vec<Vec<i32>>) -> FrameResult<Self> {
        let height = rows.len();
        let width = rows.first().map(|r| r.len()).unwrap_or(0);
        let mut values = Vec::with_capacity(height * width);
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != width {
                return Err(FrameError::shape_mismatch(
                    vec![i, row.len()],
                    vec![i, width],
                ));
            }
            values.extend(row);
        }
        Self::new(height, width, values)
    }

    /// Frame filled with a single value.
    pub fn filled(rows: usize, cols: usize, value: i32) -> Self {
        Self {
            rows,
            cols,
            values: vec![value; rows * cols],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Shape as `[rows, cols]`.
    pub fn shape(&self) -> [usize; 2] {
        [self.rows, self.cols]
    }

    /// Row-major values.
    pub fn values(&self) -> &[i32] {
        &self.values
    }

    pub fn into_values(self) -> Vec<i32> {
        self.values
    }

    /// Value at `(row, col)`, or `None` when out of range.
    pub fn get(&self, row: usize, col: usize) -> Option<i32> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.values.get(row * self.cols + col).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Minimum and maximum value, or `None` for an empty frame.
    pub fn value_range(&self) -> Option<(i32, i32)> {
        value_range(&self.values)
    }
}

/// A 3D lattice scalar field, row-major over `[d0, d1, d2]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Volume {
    shape: [usize; 3],
    values: Vec<i32>,
}

impl Volume {
    pub fn new(shape: [usize; 3], values: Vec<i32>) -> FrameResult<Self> {
        let expected: usize = shape.iter().product();
        if values.len() != expected {
            return Err(FrameError::shape_mismatch(vec![values.len()], vec![expected]));
        }
        Ok(Self { shape, values })
    }

    /// Stack equally shaped frames along a new leading axis.
    pub fn from_frames(frames: &[Frame]) -> FrameResult<Self> {
        let [rows, cols] = frames.first().map(Frame::shape).unwrap_or([0, 0]);
        let mut values = Vec::with_capacity(frames.len() * rows * cols);
        for frame in frames {
            if frame.shape() != [rows, cols] {
                return Err(FrameError::shape_mismatch(
                    frame.shape().to_vec(),
                    vec![rows, cols],
                ));
            }
            values.extend_from_slice(frame.values());
        }
        Self::new([frames.len(), rows, cols], values)
    }

    /// Stack equally shaped frames along a new trailing axis, so frame `k`
    /// becomes the slice `[.., .., k]` of a `[rows, cols, frames]` volume.
    pub fn from_frames_as_depth(frames: &[Frame]) -> FrameResult<Self> {
        let stacked = Self::from_frames(frames)?;
        let [depth, rows, cols] = stacked.shape;
        let plane = rows * cols;
        let mut values = vec![0; stacked.values.len()];
        if plane > 0 {
            for (k, frame) in stacked.values.chunks_exact(plane).enumerate() {
                for (cell, &v) in frame.iter().enumerate() {
                    values[cell * depth + k] = v;
                }
            }
        }
        Self::new([rows, cols, depth], values)
    }

    pub fn shape(&self) -> [usize; 3] {
        self.shape
    }

    pub fn values(&self) -> &[i32] {
        &self.values
    }

    pub fn value_range(&self) -> Option<(i32, i32)> {
        value_range(&self.values)
    }
}

fn value_range(values: &[i32]) -> Option<(i32, i32)> {
    let first = *values.first()?;
    Some(
        values
            .iter()
            .fold((first, first), |(lo, hi), &v| (lo.min(v), hi.max(v))),
    )
}
