#![allow(dead_code)]

mod fixtures;
pub use fixtures::*;

// Re-export commonly used types from signsight for tests
pub use signsight::{
    ClassificationResult, ClassificationSource, Frame, FramePipeline, Landmark, LandmarkSet,
    PipelineConfig, PipelineEvent, PipelineMode, SignLabel,
};
