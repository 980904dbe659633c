pub mod augment;
pub mod capture;
pub mod dataset;
pub mod state;

pub use augment::{AugmentOptions, AugmentReport, augment};
pub use capture::CaptureError;
pub use dataset::{Dataset, DatasetArtifact, DirectorySink, EXPORT_FILE_NAME, ExportError, ExportSink};
pub use state::SessionState;
