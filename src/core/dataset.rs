use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::models::{CapturedSample, SignLabel};

/// File name the export artifact is offered under.
pub const EXPORT_FILE_NAME: &str = "sign_language_dataset.json";

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("Failed to serialize dataset: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("Failed to write dataset to {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Append-only, in-memory collection of labeled samples, in capture order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dataset {
    samples: Vec<CapturedSample>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[CapturedSample] {
        &self.samples
    }

    pub fn iter(&self) -> impl Iterator<Item = &CapturedSample> {
        self.samples.iter()
    }

    /// Append a sample and return a reference to the stored copy.
    pub fn push(&mut self, sample: CapturedSample) -> &CapturedSample {
        self.samples.push(sample);
        &self.samples[self.samples.len() - 1]
    }

    /// Pretty-printed JSON array of `{label, landmarks}` records.
    pub fn to_json(&self) -> Result<String, ExportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        serde_json::from_str(json).context("Failed to parse dataset JSON")
    }

    /// Read a previously exported dataset file.
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read dataset {:?}", path))?;
        Self::from_json(&json).with_context(|| format!("Invalid dataset file {:?}", path))
    }

    /// Per-label sample counts, in the order labels first appear.
    pub fn class_distribution(&self) -> Vec<(SignLabel, usize)> {
        let mut counts: Vec<(SignLabel, usize)> = Vec::new();
        for sample in &self.samples {
            match counts.iter_mut().find(|(label, _)| *label == sample.label) {
                Some((_, count)) => *count += 1,
                None => counts.push((sample.label, 1)),
            }
        }
        counts
    }

    pub fn count_of(&self, label: SignLabel) -> usize {
        self.samples.iter().filter(|s| s.label == label).count()
    }
}

/// Serialized dataset, ready to hand to whoever delivers it.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetArtifact {
    pub file_name: &'static str,
    pub contents: String,
    pub record_count: usize,
}

impl DatasetArtifact {
    pub fn from_dataset(dataset: &Dataset) -> Result<Self, ExportError> {
        Ok(Self {
            file_name: EXPORT_FILE_NAME,
            contents: dataset.to_json()?,
            record_count: dataset.len(),
        })
    }
}

/// Collaborator responsible for persisting or offering an export.
pub trait ExportSink {
    fn deliver(&mut self, artifact: &DatasetArtifact) -> Result<(), ExportError>;
}

/// Writes exports into a directory, overwriting the previous file.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn target_path(&self) -> PathBuf {
        self.dir.join(EXPORT_FILE_NAME)
    }
}

impl ExportSink for DirectorySink {
    fn deliver(&mut self, artifact: &DatasetArtifact) -> Result<(), ExportError> {
        let path = self.dir.join(artifact.file_name);
        std::fs::create_dir_all(&self.dir)
            .and_then(|_| std::fs::write(&path, artifact.contents.as_bytes()))
            .map_err(|source| ExportError::Write {
                path: path.clone(),
                source,
            })?;
        tracing::info!(
            "Exported {} samples to {}",
            artifact.record_count,
            path.display()
        );
        Ok(())
    }
}
