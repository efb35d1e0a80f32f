//! Integration tests: frame sequences rendered and exported end to end.

use std::path::PathBuf;

use frame_common::{Frame, FrameError, CELL_DATA};
use frame_pipeline::{
    load_experiment_entries, normalize_json_sequence, open_indexer, ExportConfig, FailurePolicy,
    FrameEntry, SequenceDriver,
};
use grid_file::{read_grid_file, GridFileFormat};
use test_utils::{create_frame_sequence, create_label_frame, shapes, write_zarr_archive};

fn frame_json(frame: &Frame) -> serde_json::Value {
    let rows: Vec<Vec<i32>> = frame
        .values()
        .chunks(frame.cols())
        .map(|row| row.to_vec())
        .collect();
    serde_json::to_value(rows).unwrap()
}

#[test]
fn test_malformed_entry_keeps_indices() {
    let temp_dir = tempfile::tempdir().unwrap();
    let (rows, cols) = shapes::RENDERABLE;
    let a = create_label_frame(rows, cols);
    let b = Frame::filled(rows, cols, 5);
    let json = serde_json::Value::Array(vec![
        frame_json(&a),
        serde_json::Value::String("not-an-array".to_string()),
        frame_json(&b),
    ]);

    let entries = normalize_json_sequence(&json.to_string()).unwrap();
    let prefix = temp_dir.path().join("name");
    let report = SequenceDriver::default()
        .render_sequence(&entries, prefix.to_str().unwrap())
        .unwrap();

    assert!(temp_dir.path().join("name_0.png").exists());
    assert!(!temp_dir.path().join("name_1.png").exists());
    assert!(temp_dir.path().join("name_2.png").exists());
    assert_eq!(report.written.len(), 2);
    assert_eq!(report.skipped_indices(), vec![1]);
    assert!(report.is_success());
}

#[test]
fn test_output_count_never_exceeds_input() {
    let temp_dir = tempfile::tempdir().unwrap();
    let (rows, cols) = shapes::RENDERABLE;
    let entries = vec![
        FrameEntry::malformed("null"),
        FrameEntry::from(Frame::filled(rows, cols, 1)),
        FrameEntry::malformed("number"),
    ];
    let prefix = temp_dir.path().join("only");
    let report = SequenceDriver::default()
        .render_sequence(&entries, prefix.to_str().unwrap())
        .unwrap();

    assert_eq!(report.written, vec![PathBuf::from(format!("{}_1.png", prefix.display()))]);
    assert_eq!(report.total(), entries.len());
}

#[test]
fn test_continue_records_shape_mismatch() {
    let temp_dir = tempfile::tempdir().unwrap();
    let (rows, cols) = shapes::RENDERABLE;
    let entries = vec![
        FrameEntry::from(Frame::filled(rows, cols, 0)),
        FrameEntry::from(create_label_frame(4, 4)),
        FrameEntry::from(Frame::filled(rows, cols, 2)),
    ];
    let prefix = temp_dir.path().join("mixed");
    let report = SequenceDriver::default()
        .render_sequence(&entries, prefix.to_str().unwrap())
        .unwrap();

    assert_eq!(report.written.len(), 2);
    assert_eq!(report.failed_indices(), vec![1]);
    assert_eq!(report.failed[0].kind, "ShapeMismatch");
    assert!(!temp_dir.path().join("mixed_1.png").exists());
}

#[test]
fn test_abort_returns_first_error() {
    let temp_dir = tempfile::tempdir().unwrap();
    let entries = vec![
        FrameEntry::from(create_label_frame(4, 4)),
        FrameEntry::from(Frame::filled(100, 100, 2)),
    ];
    let prefix = temp_dir.path().join("abort");
    let err = SequenceDriver::default()
        .with_policy(FailurePolicy::Abort)
        .render_sequence(&entries, prefix.to_str().unwrap())
        .unwrap_err();

    assert!(matches!(err, FrameError::ShapeMismatch { .. }));
    assert!(!temp_dir.path().join("abort_1.png").exists());
}

#[test]
fn test_export_experiment_from_archive() {
    let temp_dir = tempfile::tempdir().unwrap();
    let archive = temp_dir.path().join("exp_1_len_3_2D.zarr");
    write_zarr_archive(&archive, "images", &create_frame_sequence(7, 3, 5)).unwrap();

    let config = ExportConfig {
        grid_format: GridFileFormat::LegacyStructuredPoints,
        ..Default::default()
    };
    let indexer = open_indexer(&archive, &config).unwrap();
    assert_eq!(indexer.total_experiments().unwrap(), 2);

    let entries = load_experiment_entries(&indexer, 1).unwrap();
    let prefix = temp_dir.path().join("exp1");
    let report = SequenceDriver::new(&config)
        .export_sequence(&entries, prefix.to_str().unwrap())
        .unwrap();
    assert_eq!(report.written.len(), 3);

    // Experiment 1 holds archive rows 3..6, whose frames are filled with their row index
    for i in 0..3 {
        let grid = read_grid_file(temp_dir.path().join(format!("exp1.{}.vtk", i))).unwrap();
        assert_eq!(grid.geometry.dimensions, [4, 6, 1]);
        assert!(grid.point_data.is_empty());
        let frame = grid.to_frame(CELL_DATA).unwrap();
        assert_eq!(frame, Frame::filled(3, 5, 3 + i as i32));
    }
}

#[test]
fn test_export_skips_malformed() {
    let temp_dir = tempfile::tempdir().unwrap();
    let entries =
        normalize_json_sequence(r#"[[[1, 2], [3, 4]], {"bad": true}, [[5, 6, 7]]]"#).unwrap();
    let prefix = temp_dir.path().join("frame");
    let report = SequenceDriver::default()
        .export_sequence(&entries, prefix.to_str().unwrap())
        .unwrap();

    assert_eq!(report.skipped_indices(), vec![1]);
    assert!(temp_dir.path().join("frame.0.vti").exists());
    assert!(!temp_dir.path().join("frame.1.vti").exists());
    let grid = read_grid_file(temp_dir.path().join("frame.2.vti")).unwrap();
    assert_eq!(grid.geometry.dimensions, [2, 4, 1]);
}

#[test]
fn test_explicit_length_overrides_marker() {
    let temp_dir = tempfile::tempdir().unwrap();
    let archive = temp_dir.path().join("no_marker.zarr");
    write_zarr_archive(&archive, "images", &create_frame_sequence(10, 2, 2)).unwrap();

    let config = ExportConfig::default();
    assert!(matches!(
        open_indexer(&archive, &config),
        Err(FrameError::UndeterminedLength(_))
    ));

    let config = ExportConfig {
        experiments_length: Some(4),
        ..Default::default()
    };
    let indexer = open_indexer(&archive, &config).unwrap();
    assert_eq!(indexer.total_experiments().unwrap(), 2);
    assert_eq!(indexer.remainder_frames().unwrap(), 2);
}

#[test]
fn test_experiment_as_volume() {
    let temp_dir = tempfile::tempdir().unwrap();
    let archive = temp_dir.path().join("exp_len_4_3D.zarr");
    write_zarr_archive(&archive, "images", &create_frame_sequence(4, 3, 5)).unwrap();

    let mut config = ExportConfig {
        grid_format: GridFileFormat::LegacyStructuredPoints,
        ..Default::default()
    };
    config.conventions.expected_extent_3d = [4, 6, 5];
    let indexer = open_indexer(&archive, &config).unwrap();
    let entries = load_experiment_entries(&indexer, 0).unwrap();
    let driver = SequenceDriver::new(&config);

    let grid_path = driver
        .export_volume(&entries, temp_dir.path().join("exp0").to_str().unwrap())
        .unwrap();
    assert_eq!(grid_path, temp_dir.path().join("exp0.vtk"));
    let grid = read_grid_file(&grid_path).unwrap();
    assert_eq!(grid.geometry.dimensions, [4, 6, 5]);
    assert!(grid.to_frame(CELL_DATA).is_err());

    let png = driver
        .render_volume(&entries, temp_dir.path().join("exp0").to_str().unwrap())
        .unwrap();
    let image = image_size(&png);
    assert_eq!(image, (12, 20));
}

#[test]
fn test_volume_render_checks_3d_extent() {
    let temp_dir = tempfile::tempdir().unwrap();
    let entries: Vec<FrameEntry> = create_frame_sequence(3, 4, 4)
        .into_iter()
        .map(FrameEntry::from)
        .collect();
    let prefix = temp_dir.path().join("vol");
    let err = SequenceDriver::default()
        .render_volume(&entries, prefix.to_str().unwrap())
        .unwrap_err();
    assert!(matches!(err, FrameError::ShapeMismatch { .. }));
    assert!(!temp_dir.path().join("vol.png").exists());
}

/// Width and height from a PNG's IHDR chunk.
fn image_size(path: &std::path::Path) -> (u32, u32) {
    let bytes = std::fs::read(path).unwrap();
    let width = u32::from_be_bytes(bytes[16..20].try_into().unwrap());
    let height = u32::from_be_bytes(bytes[20..24].try_into().unwrap());
    (width, height)
}
