//! Experiment-length discovery from archive file names.
//!
//! Archives produced by the simulation runs embed the experiment length in
//! their name, e.g. `exp_1_len_90_2D.h5`. This is only a convenience for
//! callers that do not know the length up front; the indexer itself always
//! takes the length as an explicit parameter.

use std::path::Path;

/// Literal token preceding the decimal length.
pub const LENGTH_MARKER: &str = "len_";

/// Parse the experiment length embedded in a path.
///
/// The file name is searched first, then the whole path. The first
/// `len_` token followed by at least one decimal digit wins; the digit run
/// ends at the first non-digit. Returns `None` if no such marker exists or
/// the number does not fit in `usize`.
pub fn parse_length_marker(path: impl AsRef<Path>) -> Option<usize> {
    let path = path.as_ref();
    path.file_name()
        .and_then(|name| name.to_str())
        .and_then(find_marker)
        .or_else(|| path.to_str().and_then(find_marker))
}

fn find_marker(text: &str) -> Option<usize> {
    text.match_indices(LENGTH_MARKER).find_map(|(pos, token)| {
        let rest = &text[pos + token.len()..];
        let digits_end = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        if digits_end == 0 {
            return None;
        }
        rest[..digits_end].parse().ok()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_from_file_name() {
        assert_eq!(parse_length_marker("exp_1_len_90_2D.h5"), Some(90));
        assert_eq!(parse_length_marker("/data/runs/exp_2_len_15.h5"), Some(15));
        assert_eq!(parse_length_marker("len_7"), Some(7));
    }

    #[test]
    fn test_missing_marker() {
        assert_eq!(parse_length_marker("exp_1_2D.h5"), None);
        assert_eq!(parse_length_marker("exp_len_.h5"), None);
        assert_eq!(parse_length_marker(""), None);
    }

    #[test]
    fn test_first_marker_with_digits_wins() {
        assert_eq!(parse_length_marker("len_x_len_12_len_30.h5"), Some(12));
    }

    #[test]
    fn test_marker_in_directory_is_a_fallback() {
        assert_eq!(parse_length_marker("/runs/len_40/frames.zarr"), Some(40));
        assert_eq!(parse_length_marker("/runs/len_40/frames_len_8.zarr"), Some(8));
    }

    #[test]
    fn test_overflowing_marker() {
        assert_eq!(
            parse_length_marker("exp_len_99999999999999999999999999.h5"),
            None
        );
    }
}
