pub mod core;
pub mod detection;
pub mod logging;
pub mod models;
pub mod pipeline;
pub mod source;

pub use models::{
    CapturedSample, ClassificationResult, ClassificationSource, Frame, Landmark, LandmarkSet,
    SignLabel,
};
pub use detection::{RuleClassifier, classify_landmarks};
pub use detection::features::FeatureVector;
pub use detection::remote::{HttpPredictionClient, PredictionClient, RemoteError};
pub use crate::core::{Dataset, DatasetArtifact, DirectorySink, ExportSink, SessionState};
pub use pipeline::{FramePipeline, PipelineConfig, PipelineEvent, PipelineMode, RemoteOutcome};
pub use source::{LandmarkSource, ReplaySource};
