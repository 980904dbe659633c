//! Integration tests for capture and export.
//!
//! Tests cover:
//! - Capture preconditions and label selection
//! - Capture order and independence of captured copies
//! - Export artifact shape, record order and coordinates
//! - Delivery through a directory sink and re-loading the file

mod common;

use signsight::core::{CaptureError, Dataset, DatasetArtifact, DirectorySink, EXPORT_FILE_NAME, ExportError, ExportSink};
use signsight::SessionState;

use common::*;

/// Sink that remembers what it was given.
#[derive(Default)]
struct RecordingSink {
    delivered: Vec<DatasetArtifact>,
}

impl ExportSink for RecordingSink {
    fn deliver(&mut self, artifact: &DatasetArtifact) -> Result<(), ExportError> {
        self.delivered.push(artifact.clone());
        Ok(())
    }
}

fn pipeline() -> FramePipeline {
    FramePipeline::rule_only()
}

#[test]
fn test_capture_without_hand_is_noop() {
    let mut pipeline = pipeline();
    assert!(!pipeline.state().can_capture());
    assert!(pipeline.state_mut().capture().is_none());

    // A frame with no hands leaves nothing to capture either.
    pipeline.process_frame(&Frame::single(fist()));
    pipeline.process_frame(&Frame::empty());
    assert!(!pipeline.state().can_capture());
    assert!(pipeline.state_mut().capture().is_none());
    assert!(pipeline.state().dataset().is_empty());
}

#[test]
fn test_capture_keeps_order_labels_and_own_copies() -> anyhow::Result<()> {
    let mut pipeline = pipeline();
    let hand_a = fist();
    let hand_b = open_palm();

    pipeline.process_frame(&Frame::single(hand_a.clone()));
    pipeline.state_mut().select_label(SignLabel::Fist)?;
    assert!(pipeline.state_mut().capture().is_some());

    pipeline.process_frame(&Frame::single(hand_b.clone()));
    pipeline.state_mut().select_label(SignLabel::OpenPalm)?;
    assert!(pipeline.state_mut().capture().is_some());

    // Later frames replace the latest hand but must not reach into the dataset.
    pipeline.process_frame(&Frame::single(peace()));

    let samples = pipeline.state().dataset().samples();
    assert_eq!(samples.len(), 2);
    assert_eq!(samples[0].label, SignLabel::Fist);
    assert_eq!(samples[0].landmarks, set(&hand_a));
    assert_eq!(samples[1].label, SignLabel::OpenPalm);
    assert_eq!(samples[1].landmarks, set(&hand_b));
    assert_ne!(samples[0].landmarks, samples[1].landmarks);
    Ok(())
}

#[test]
fn test_label_selection() {
    let mut state = SessionState::new();
    assert_eq!(state.selected_label(), SignLabel::Fist);

    state.select_label(SignLabel::Lshape).unwrap();
    assert_eq!(state.selected_label(), SignLabel::Lshape);

    let err = state.select_label(SignLabel::Unknown).unwrap_err();
    assert_eq!(err, CaptureError::NotCapturable(SignLabel::Unknown));
    assert_eq!(state.selected_label(), SignLabel::Lshape);
}

#[test]
fn test_export_empty_dataset_is_noop() -> anyhow::Result<()> {
    let state = SessionState::new();
    assert!(!state.can_export());
    assert!(state.export()?.is_none());

    let mut sink = RecordingSink::default();
    assert!(!state.export_to(&mut sink)?);
    assert!(sink.delivered.is_empty());
    Ok(())
}

#[test]
fn test_export_matches_captures() -> anyhow::Result<()> {
    let mut pipeline = pipeline();
    let hands = [fist(), c_shape(), l_shape()];
    let labels = [SignLabel::Fist, SignLabel::Cshape, SignLabel::Lshape];

    for (hand, label) in hands.iter().zip(labels) {
        pipeline.process_frame(&Frame::single(hand.clone()));
        pipeline.state_mut().select_label(label)?;
        pipeline.state_mut().capture();
    }

    let artifact = pipeline.state().export()?.expect("dataset is not empty");
    assert_eq!(artifact.file_name, "sign_language_dataset.json");
    assert_eq!(artifact.record_count, 3);

    let records: Vec<serde_json::Value> = serde_json::from_str(&artifact.contents)?;
    assert_eq!(records.len(), 3);
    for (k, record) in records.iter().enumerate() {
        assert_eq!(record["label"], labels[k].as_str());
        let points = record["landmarks"].as_array().expect("landmarks array");
        assert_eq!(points.len(), 21);
        for (point, expected) in points.iter().zip(&hands[k]) {
            let x = point["x"].as_f64().expect("x");
            let y = point["y"].as_f64().expect("y");
            let z = point["z"].as_f64().expect("z");
            assert!((x - expected.x).abs() < 1e-9);
            assert!((y - expected.y).abs() < 1e-9);
            assert!((z - expected.z).abs() < 1e-9);
        }
    }
    Ok(())
}

#[test]
fn test_repeated_exports_do_not_mutate_dataset() -> anyhow::Result<()> {
    let mut pipeline = pipeline();
    pipeline.process_frame(&Frame::single(peace()));
    pipeline.state_mut().select_label(SignLabel::Peace)?;
    pipeline.state_mut().capture();

    let mut sink = RecordingSink::default();
    assert!(pipeline.state().export_to(&mut sink)?);
    assert!(pipeline.state().export_to(&mut sink)?);
    assert_eq!(sink.delivered[0], sink.delivered[1]);
    assert_eq!(pipeline.state().dataset().len(), 1);

    // The dataset keeps growing after an export.
    pipeline.state_mut().capture();
    assert!(pipeline.state().export_to(&mut sink)?);
    assert_eq!(sink.delivered[2].record_count, 2);
    Ok(())
}

#[test]
fn test_directory_sink_writes_loadable_file() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    let mut pipeline = pipeline();
    pipeline.process_frame(&Frame::single(open_palm()));
    pipeline.state_mut().select_label(SignLabel::OpenPalm)?;
    pipeline.state_mut().capture();

    let mut sink = DirectorySink::new(dir.path().join("exports"));
    assert!(pipeline.state().export_to(&mut sink)?);

    let path = dir.path().join("exports").join(EXPORT_FILE_NAME);
    assert_eq!(sink.target_path(), path);
    let loaded = Dataset::load(&path)?;
    assert_eq!(&loaded, pipeline.state().dataset());
    Ok(())
}

#[test]
fn test_loading_rejects_short_hands() {
    let json = r#"[{"label": "A (Fist)", "landmarks": [{"x": 0.1, "y": 0.2, "z": 0.0}]}]"#;
    assert!(Dataset::from_json(json).is_err());
}

#[test]
fn test_reloaded_coordinates_are_exact() -> anyhow::Result<()> {
    let hand = hand_at(
        (0.225, 0.675),
        [(0.1, 0.3), (0.013, 0.29), (-0.047, 0.331), (0.07, 0.1), (0.2, -0.15)],
    );
    let mut dataset = Dataset::new();
    dataset.push(signsight::CapturedSample {
        label: SignLabel::Lshape,
        landmarks: set(&hand),
    });

    let reloaded = Dataset::from_json(&dataset.to_json()?)?;
    for (a, b) in reloaded.samples()[0].landmarks.points().iter().zip(&hand) {
        assert_eq!(a.x.to_bits(), b.x.to_bits());
        assert_eq!(a.y.to_bits(), b.y.to_bits());
        assert_eq!(a.z.to_bits(), b.z.to_bits());
    }
    Ok(())
}
