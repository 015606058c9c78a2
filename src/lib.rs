#![doc = include_str!("../README.md")]

// Public modules (stable-ish surface)
pub mod analysis;
pub mod config;
pub mod detector;
pub mod diagnostics;
pub mod error;
pub mod image;
pub mod loader;
pub mod render;
pub mod service;
pub mod types;

// Stage internals – public for tools and experiments.
pub mod preprocess;
pub mod segment;

// --- High-level re-exports -------------------------------------------------

// Main entry points: detector + results.
pub use crate::detector::{DetectorParams, LesionDetector, PipelineOutput};
pub use crate::error::{ErrorKind, PipelineError, PipelineResult};
pub use crate::types::DetectionResult;

// Visualization.
pub use crate::render::{ArtifactKind, VisualizationRenderer, VisualizationSet};

// High-level diagnostics returned by the detector.
pub use crate::diagnostics::{DetectionReport, PipelineTrace};

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```no_run
/// use lesion_detector::prelude::*;
/// use std::path::Path;
///
/// # fn main() -> Result<(), PipelineError> {
/// let detector = LesionDetector::default();
/// let result = detector.detect(Path::new("scan.png"))?;
/// println!("has_tumor={} shape={:?}", result.has_tumor, result.image_shape);
/// # Ok(())
/// # }
/// ```
pub mod prelude {
    pub use crate::image::{IntensityVolume, RawVolume, Volume};
    pub use crate::{DetectionResult, DetectorParams, LesionDetector, PipelineError};
}

// --- Stage-level API (for tools & advanced users) --------------------------

pub mod stages {
    // Stage runners.
    pub use crate::analysis::{Analysis, AnalysisParams, Analyzer};
    pub use crate::loader::{ImageLoader, SourceFormat};
    pub use crate::preprocess::{PreprocessParams, Preprocessor};
    pub use crate::segment::{BinaryMask, SegmentParams, Segmentation, Segmenter};

    // Structured diagnostics types.
    pub use crate::diagnostics::{
        ComponentReport, InputDescriptor, SegmentationStage, StageTiming, TimingBreakdown,
    };
}
