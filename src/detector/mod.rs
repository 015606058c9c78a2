//! Lesion detector wiring the four processing stages end-to-end.
//!
//! Overview
//! - [`ImageLoader`](crate::loader::ImageLoader) decodes the file into a raw
//!   volume (one slice for rasters, one per frame for DICOM).
//! - [`Preprocessor`](crate::preprocess::Preprocessor) rescales, denoises and
//!   equalizes every slice.
//! - [`Segmenter`](crate::segment::Segmenter) picks the brightest slice and
//!   produces a filtered binary mask for it.
//! - [`Analyzer`](crate::analysis::Analyzer) scores the mask and takes the
//!   final decision.
//!
//! Each run happens exactly once; [`PipelineOutput`] keeps every intermediate
//! needed by the renderer so visualization never recomputes the pipeline.
//!
//! Modules
//! - [`params`] – tunable constants for all stages.
//! - `pipeline` – the [`LesionDetector`] implementation.

pub mod params;
mod pipeline;

pub use params::DetectorParams;
pub use pipeline::{LesionDetector, PipelineOutput};
