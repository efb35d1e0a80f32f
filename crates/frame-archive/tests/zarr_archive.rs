//! Integration test: write a Zarr frame archive and index it by experiment.
//!
//! 1. Create frames with known markers
//! 2. Write them as a `(N, rows, cols)` Zarr array
//! 3. Read experiments back through ArchiveIndexer
//! 4. Verify ranges, counts and values

use frame_archive::{ArchiveIndexer, FrameStore, ZarrFrameStore, ZarrFrameWriter};
use frame_common::FrameError;
use test_utils::{create_frame_sequence, create_label_frame, write_zarr_archive};

fn markers(frames: &[frame_common::Frame]) -> Vec<i32> {
    frames.iter().map(|f| f.values()[0]).collect()
}

#[test]
fn test_experiment_scenario_len_90() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = temp_dir.path().join("exp_1_len_90_2D.zarr");
    write_zarr_archive(&path, "images", &create_frame_sequence(200, 2, 3))
        .expect("Failed to write archive");

    let indexer = ArchiveIndexer::from_path(&path, "images").expect("Failed to open archive");
    assert_eq!(indexer.experiments_length(), 90);

    let first = indexer.load_experiment(0).unwrap();
    assert_eq!(first.len(), 90);
    assert_eq!(markers(&first), (0..90).collect::<Vec<_>>());

    let second = indexer.load_experiment(1).unwrap();
    assert_eq!(second.len(), 90);
    assert_eq!(markers(&second), (90..180).collect::<Vec<_>>());

    // 200 frames: two complete experiments, 20 unreachable frames
    assert_eq!(indexer.total_frames().unwrap(), 200);
    assert_eq!(indexer.total_experiments().unwrap(), 2);
    assert_eq!(indexer.remainder_frames().unwrap(), 20);

    // Weak contract: the trailing partial experiment is returned as-is
    assert_eq!(indexer.load_experiment(2).unwrap().len(), 20);
    assert!(indexer.load_experiment(3).unwrap().is_empty());
}

#[test]
fn test_full_experiments_have_exact_length() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("frames.zarr");
    write_zarr_archive(&path, "images", &create_frame_sequence(24, 4, 4)).unwrap();

    for length in [1usize, 3, 5, 8, 24] {
        let indexer = ArchiveIndexer::open(&path, "images", length).unwrap();
        let total = indexer.total_frames().unwrap();
        assert_eq!(indexer.total_experiments().unwrap(), total / length);
        for k in 0..total / length {
            let frames = indexer.load_experiment(k).unwrap();
            assert_eq!(frames.len(), length, "length {} experiment {}", length, k);
            assert_eq!(frames[0].values()[0], (k * length) as i32);
        }
    }
}

#[test]
fn test_frame_values_survive_archive() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("labels_len_2.zarr");
    let frame = create_label_frame(3, 5);
    write_zarr_archive(&path, "images", &[frame.clone(), frame.clone()]).unwrap();

    let indexer = ArchiveIndexer::from_path(&path, "images").unwrap();
    let frames = indexer.load_experiment(0).unwrap();
    assert_eq!(frames, vec![frame.clone(), frame]);
}

#[test]
fn test_writer_output_is_readable() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("packed_len_3.zarr");
    let frames = create_frame_sequence(7, 5, 4);

    let result = ZarrFrameWriter::new("images")
        .with_experiments_length(3)
        .write(&path, &frames)
        .expect("Failed to write archive");
    assert_eq!(result.metadata.frames, 7);
    assert_eq!(result.metadata.frame_shape, [5, 4]);
    assert_eq!(result.bytes_written, 7 * 5 * 4 * 4);

    let store = ZarrFrameStore::new(&path, "images");
    assert_eq!(store.frame_count().unwrap(), 7);
    assert_eq!(store.read_frames(2..4).unwrap(), frames[2..4].to_vec());
}

#[test]
fn test_writer_rejects_mixed_shapes() {
    let temp_dir = tempfile::tempdir().unwrap();
    let frames = vec![create_label_frame(2, 2), create_label_frame(3, 2)];
    assert!(ZarrFrameWriter::new("images")
        .write(&temp_dir.path().join("bad.zarr"), &frames)
        .is_err());
}

#[test]
fn test_missing_dataset_is_archive_access_failure() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("frames_len_2.zarr");
    write_zarr_archive(&path, "images", &create_frame_sequence(4, 2, 2)).unwrap();

    let indexer = ArchiveIndexer::from_path(&path, "snapshots").unwrap();
    match indexer.total_frames() {
        Err(FrameError::ArchiveAccess(msg)) => assert!(msg.contains("snapshots")),
        other => panic!("expected ArchiveAccess, got {:?}", other),
    }
}

#[test]
fn test_missing_archive_propagates() {
    let indexer = ArchiveIndexer::from_path("/nonexistent/exp_len_5.zarr", "images").unwrap();
    assert!(matches!(
        indexer.load_experiment(0),
        Err(FrameError::ArchiveAccess(_))
    ));
}
