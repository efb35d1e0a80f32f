//! Frame generators for creating synthetic lattice data.
//!
//! These generators create predictable, verifiable patterns that can be used
//! across the test suite.

use frame_common::Frame;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Creates a frame with predictable values.
///
/// Each cell value is calculated as: `row * 1000 + col`
///
/// This makes it easy to verify that data is being read/written in the
/// right order by checking `frame[row][col] == row * 1000 + col`.
///
/// # Example
///
/// ```
/// use test_utils::create_label_frame;
///
/// let frame = create_label_frame(3, 4);
/// assert_eq!(frame.len(), 12);
/// assert_eq!(frame.values()[1], 1);    // row=0, col=1
/// assert_eq!(frame.values()[4], 1000); // row=1, col=0
/// ```
pub fn create_label_frame(rows: usize, cols: usize) -> Frame {
    let mut data = Vec::with_capacity(rows * cols);
    for row in 0..rows {
        for col in 0..cols {
            data.push((row * 1000 + col) as i32);
        }
    }
    Frame::new(rows, cols, data).expect("generated buffer matches shape")
}

/// Creates a frame whose every cell carries `marker`, used to tell frames
/// of an archive apart after slicing.
pub fn create_marked_frame(rows: usize, cols: usize, marker: i32) -> Frame {
    Frame::filled(rows, cols, marker)
}

/// Creates a two-valued checkerboard with square blocks of `block` cells.
pub fn create_checkerboard_frame(rows: usize, cols: usize, block: usize) -> Frame {
    let block = block.max(1);
    let mut data = Vec::with_capacity(rows * cols);
    for row in 0..rows {
        for col in 0..cols {
            data.push((((row / block) + (col / block)) % 2) as i32);
        }
    }
    Frame::new(rows, cols, data).expect("generated buffer matches shape")
}

/// Creates a Potts-like microstructure with `states` spin labels.
///
/// Seeded, so the same arguments always produce the same frame.
pub fn create_random_spin_frame(rows: usize, cols: usize, states: i32, seed: u64) -> Frame {
    let mut rng = StdRng::seed_from_u64(seed);
    let data = (0..rows * cols)
        .map(|_| rng.gen_range(0..states.max(1)))
        .collect();
    Frame::new(rows, cols, data).expect("generated buffer matches shape")
}

/// Creates `count` frames where frame `i` is filled with `i`.
pub fn create_frame_sequence(count: usize, rows: usize, cols: usize) -> Vec<Frame> {
    (0..count)
        .map(|i| create_marked_frame(rows, cols, i as i32))
        .collect()
}
