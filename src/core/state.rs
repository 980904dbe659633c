use uuid::Uuid;

use crate::core::dataset::Dataset;
use crate::models::{ClassificationResult, LandmarkSet, SignLabel};

/// Everything one interactive session knows.
///
/// Written by the frame callback (`latest`, `displayed`) and by user actions
/// (`selected_label`, `dataset`). The owner serializes access; nothing in
/// here is shared across threads.
#[derive(Debug, Clone)]
pub struct SessionState {
    pub(super) id: Uuid,
    pub(super) latest: Option<LandmarkSet>,
    pub(super) displayed: ClassificationResult,
    pub(super) selected_label: SignLabel,
    pub(super) dataset: Dataset,
}

impl SessionState {
    pub fn new() -> Self {
        let id = Uuid::new_v4();
        tracing::debug!(session = %id, "Session created");
        Self {
            id,
            latest: None,
            displayed: ClassificationResult::cleared(),
            selected_label: SignLabel::CAPTURABLE[0],
            dataset: Dataset::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Hand from the most recently processed frame, if that frame had a
    /// well-formed one.
    pub fn latest(&self) -> Option<&LandmarkSet> {
        self.latest.as_ref()
    }

    pub fn displayed(&self) -> ClassificationResult {
        self.displayed
    }

    pub fn selected_label(&self) -> SignLabel {
        self.selected_label
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Replace the per-frame view. The previous frame's hand is discarded.
    pub fn record_frame(&mut self, latest: Option<LandmarkSet>, displayed: ClassificationResult) {
        self.latest = latest;
        self.displayed = displayed;
    }

    /// Overwrite only the displayed result (used by async completions).
    pub fn show(&mut self, displayed: ClassificationResult) {
        self.displayed = displayed;
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}
