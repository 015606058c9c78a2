//! Serializable diagnostics describing a pipeline run.
//!
//! `DetectionReport` is the entry point: the compact `DetectionResult` plus a
//! `PipelineTrace` with input description, per-stage timings, the
//! segmentation trace and the analysis scores.

pub mod pipeline;
pub mod segmentation;
pub mod timing;

pub use pipeline::{DetectionReport, InputDescriptor, PipelineTrace};
pub use segmentation::{ComponentReport, SegmentationStage};
pub use timing::{StageTiming, TimingBreakdown};
