//! Test helpers shared by the frame export crates.
//!
//! - [`generators`]: deterministic frames (labels, checkerboards, spins)
//! - [`fixtures`]: Zarr archives written directly through `zarrs`, so reader
//!   tests do not depend on the writer under test
//! - [`paths`]: locating optional real simulation archives
//!
//! ```ignore
//! use test_utils::{create_frame_sequence, write_zarr_archive};
//!
//! write_zarr_archive(&dir.join("exp_len_3.zarr"), "images", &create_frame_sequence(7, 3, 5))?;
//! ```

pub mod fixtures;
pub mod generators;
pub mod paths;

pub use fixtures::*;
pub use generators::*;
pub use paths::*;

/// Resolve a test archive by name or return early from the test.
///
/// Real simulation archives are large and usually absent in CI; tests that
/// need one are skipped with a note on stderr.
///
/// ```ignore
/// let path = require_test_file!("exp_1_len_90_2D.h5");
/// ```
#[macro_export]
macro_rules! require_test_file {
    ($name:expr) => {{
        match $crate::find_test_file($name) {
            Some(path) => path,
            None => {
                eprintln!("SKIPPED: archive '{}' not found (set TEST_DATA_DIR)", $name);
                return;
            }
        }
    }};
}

/// Assert two numbers differ by at most `epsilon`.
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr, $epsilon:expr) => {{
        let (left, right, epsilon) = ($left as f64, $right as f64, $epsilon as f64);
        assert!(
            (left - right).abs() <= epsilon,
            "assertion failed: {} is not within {} of {}",
            left,
            epsilon,
            right
        );
    }};
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_assert_approx_eq_within_epsilon() {
        assert_approx_eq!(0.25, 0.2500001, 1e-6);
        assert_approx_eq!(3, 3.0, 0.0);
    }

    #[test]
    #[should_panic(expected = "is not within")]
    fn test_assert_approx_eq_outside_epsilon() {
        assert_approx_eq!(1.1, 1.0, 0.001);
    }
}
