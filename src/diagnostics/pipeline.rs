use crate::analysis::Analysis;
use crate::diagnostics::{SegmentationStage, TimingBreakdown};
use crate::loader::SourceFormat;
use crate::DetectionResult;
use serde::Serialize;

/// Result produced by [`LesionDetector::detect_with_diagnostics`](crate::LesionDetector).
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionReport {
    pub result: DetectionResult,
    pub trace: PipelineTrace,
}

/// End-to-end trace describing one pipeline execution.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineTrace {
    pub input: InputDescriptor,
    pub timings: TimingBreakdown,
    pub segmentation: SegmentationStage,
    pub analysis: Analysis,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InputDescriptor {
    /// Source path, or `None` for volumes handed over in memory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<SourceFormat>,
    pub shape: Vec<usize>,
}
