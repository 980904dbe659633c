//! User-triggered capture and export over a [`SessionState`].
//!
//! Both actions are synchronous. Their preconditions are exposed as
//! `can_capture` / `can_export` so a front-end can disable the action; calling
//! them anyway is a no-op.

use crate::core::dataset::{DatasetArtifact, ExportError, ExportSink};
use crate::core::state::SessionState;
use crate::models::{CapturedSample, SignLabel};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CaptureError {
    #[error("{0} cannot be used as a capture label")]
    NotCapturable(SignLabel),
}

impl SessionState {
    /// Choose the label attached to subsequent captures.
    pub fn select_label(&mut self, label: SignLabel) -> Result<(), CaptureError> {
        if !label.is_capturable() {
            return Err(CaptureError::NotCapturable(label));
        }
        self.selected_label = label;
        Ok(())
    }

    pub fn can_capture(&self) -> bool {
        self.latest.is_some()
    }

    /// Append the selected label and a copy of the latest hand to the dataset.
    ///
    /// Returns `None` without touching the dataset when no hand is available.
    pub fn capture(&mut self) -> Option<&CapturedSample> {
        let landmarks = self.latest.clone()?;
        let sample = CapturedSample {
            label: self.selected_label,
            landmarks,
        };
        tracing::info!(
            session = %self.id,
            "Captured {} sample ({} total)",
            sample.label,
            self.dataset.len() + 1
        );
        Some(self.dataset.push(sample))
    }

    pub fn can_export(&self) -> bool {
        !self.dataset.is_empty()
    }

    /// Serialize the whole dataset. `Ok(None)` when there is nothing to export.
    pub fn export(&self) -> Result<Option<DatasetArtifact>, ExportError> {
        if !self.can_export() {
            return Ok(None);
        }
        DatasetArtifact::from_dataset(&self.dataset).map(Some)
    }

    /// Export and hand the artifact to `sink`. Returns whether anything was
    /// delivered.
    pub fn export_to<S: ExportSink>(&self, sink: &mut S) -> Result<bool, ExportError> {
        match self.export()? {
            Some(artifact) => {
                sink.deliver(&artifact)?;
                Ok(true)
            }
            None => {
                tracing::debug!(session = %self.id, "Export skipped: dataset is empty");
                Ok(false)
            }
        }
    }
}
