//! Detector pipeline driving lesion detection end-to-end.
//!
//! Typical usage:
//! ```no_run
//! use lesion_detector::{DetectorParams, LesionDetector};
//! use std::path::Path;
//!
//! # fn example() -> Result<(), lesion_detector::PipelineError> {
//! let detector = LesionDetector::new(DetectorParams::default());
//! let report = detector.detect_with_diagnostics(Path::new("scan.png"))?;
//! if report.result.has_tumor {
//!     println!("ratio: {:.4}", report.trace.analysis.tumor_ratio);
//! }
//! # Ok(())
//! # }
//! ```
use super::params::DetectorParams;
use crate::analysis::{Analysis, Analyzer};
use crate::diagnostics::{DetectionReport, InputDescriptor, PipelineTrace, TimingBreakdown};
use crate::error::{PipelineError, PipelineResult};
use crate::image::{IntensityVolume, RawVolume};
use crate::loader::{ImageLoader, SourceFormat};
use crate::preprocess::Preprocessor;
use crate::render::{VisualizationRenderer, VisualizationSet};
use crate::segment::{BinaryMask, Segmenter};
use crate::types::DetectionResult;
use image::GrayImage;
use log::{debug, info};
use std::path::Path;

/// Everything one pipeline run produced.
#[derive(Clone, Debug)]
pub struct PipelineOutput {
    /// Preprocessed 8-bit volume, same shape as the decoded input.
    pub volume: IntensityVolume,
    pub mask: BinaryMask,
    pub analysis: Analysis,
    pub result: DetectionResult,
    pub trace: PipelineTrace,
}

impl PipelineOutput {
    /// Preprocessed slice the mask and the analysis refer to.
    pub fn analyzed_slice(&self) -> PipelineResult<&GrayImage> {
        self.volume.slice(self.mask.slice_index()).ok_or_else(|| {
            PipelineError::processing(
                "render",
                format!(
                    "mask refers to slice {} but volume has {}",
                    self.mask.slice_index(),
                    self.volume.depth()
                ),
            )
        })
    }

    pub fn report(&self) -> DetectionReport {
        DetectionReport {
            result: self.result.clone(),
            trace: self.trace.clone(),
        }
    }
}

/// Stateless detector; one instance can serve concurrent requests.
#[derive(Clone, Debug, Default)]
pub struct LesionDetector {
    params: DetectorParams,
    loader: ImageLoader,
    preprocessor: Preprocessor,
    segmenter: Segmenter,
    analyzer: Analyzer,
}

impl LesionDetector {
    /// Create a detector with the supplied parameters.
    pub fn new(params: DetectorParams) -> Self {
        Self {
            loader: ImageLoader::new(),
            preprocessor: Preprocessor::new(params.preprocess.clone()),
            segmenter: Segmenter::new(params.segment.clone()),
            analyzer: Analyzer::new(params.analysis),
            params,
        }
    }

    pub fn params(&self) -> &DetectorParams {
        &self.params
    }

    /// Decode `path` and run every stage once.
    pub fn run(&self, path: &Path) -> PipelineResult<PipelineOutput> {
        let mut timings = TimingBreakdown::default();
        let raw = timings.measure("load", || self.loader.load(path))?;
        let input = InputDescriptor {
            path: Some(path.display().to_string()),
            format: Some(SourceFormat::from_path(path)),
            shape: raw.shape(),
        };
        let output = self.run_stages(&raw, input, timings)?;
        info!(
            "LesionDetector::run {} has_tumor={} shape={:?} total_ms={:.3}",
            path.display(),
            output.result.has_tumor,
            output.result.image_shape,
            output.trace.timings.total_ms
        );
        Ok(output)
    }

    /// Run the stages after loading on a volume that is already in memory.
    pub fn run_volume(&self, raw: &RawVolume) -> PipelineResult<PipelineOutput> {
        let input = InputDescriptor {
            path: None,
            format: None,
            shape: raw.shape(),
        };
        self.run_stages(raw, input, TimingBreakdown::default())
    }

    /// Binary decision plus the shape of the decoded volume.
    pub fn detect(&self, path: &Path) -> PipelineResult<DetectionResult> {
        self.run(path).map(|output| output.result)
    }

    /// Decision together with the full stage trace.
    pub fn detect_with_diagnostics(&self, path: &Path) -> PipelineResult<DetectionReport> {
        self.run(path).map(|output| output.report())
    }

    /// Detect and write the four inspection artifacts from the same run.
    pub fn visualize(
        &self,
        path: &Path,
        output_dir: &Path,
        base_name: &str,
    ) -> PipelineResult<(DetectionResult, VisualizationSet)> {
        let output = self.run(path)?;
        let renderer = VisualizationRenderer::new(self.params.render.clone());
        let set = renderer.render_output(&output, output_dir, base_name)?;
        Ok((output.result, set))
    }

    fn run_stages(
        &self,
        raw: &RawVolume,
        input: InputDescriptor,
        mut timings: TimingBreakdown,
    ) -> PipelineResult<PipelineOutput> {
        let volume = timings.measure("preprocess", || self.preprocessor.process(raw));
        let segmentation = timings.measure("segment", || {
            self.segmenter.segment_with_diagnostics(&volume)
        })?;
        let analysis = timings.measure("analyze", || {
            self.analyzer.analyze(&volume, &segmentation.mask)
        })?;
        debug!(
            "LesionDetector stages slice={} mask_pixels={} ratio={:.5} std={:.3}",
            segmentation.stage.slice_index,
            segmentation.stage.mask_pixels,
            analysis.tumor_ratio,
            analysis.std_intensity
        );

        let result = DetectionResult {
            has_tumor: analysis.has_tumor,
            image_shape: raw.shape(),
        };
        let trace = PipelineTrace {
            input,
            timings,
            segmentation: segmentation.stage,
            analysis,
        };
        Ok(PipelineOutput {
            volume,
            mask: segmentation.mask,
            analysis,
            result,
            trace,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::{ImageF32, Volume};

    fn raw_disk(size: usize, cx: f32, cy: f32, radius: f32) -> RawVolume {
        let mut img = ImageF32::new(size, size);
        for y in 0..size {
            for x in 0..size {
                let d = ((x as f32 - cx).powi(2) + (y as f32 - cy).powi(2)).sqrt();
                let v = if d <= radius { 255.0 - 150.0 * d / radius } else { 10.0 };
                img.set(x, y, v);
            }
        }
        Volume::Slice(img)
    }

    #[test]
    fn uniform_volume_is_negative() {
        let mut img = ImageF32::new(64, 64);
        img.data.iter_mut().for_each(|v| *v = 128.0);
        let out = LesionDetector::default()
            .run_volume(&Volume::Slice(img))
            .unwrap();
        assert!(!out.result.has_tumor);
        assert_eq!(out.result.image_shape, vec![64, 64]);
        assert!(out.mask.is_empty());
    }

    #[test]
    fn trace_records_every_stage_after_loading() {
        let out = LesionDetector::default()
            .run_volume(&raw_disk(128, 64.0, 64.0, 10.0))
            .unwrap();
        let labels: Vec<_> = out.trace.timings.stages.iter().map(|s| s.label).collect();
        assert_eq!(labels, vec!["preprocess", "segment", "analyze"]);
        assert!(out.trace.input.path.is_none());
        assert_eq!(out.trace.analysis, out.analysis);
        assert_eq!(out.analysis.has_tumor, out.result.has_tumor);
    }

    #[test]
    fn analyzed_slice_matches_mask_slice() {
        let out = LesionDetector::default()
            .run_volume(&raw_disk(96, 48.0, 48.0, 8.0))
            .unwrap();
        let slice = out.analyzed_slice().unwrap();
        assert_eq!(
            (slice.width() as usize, slice.height() as usize),
            (out.mask.width(), out.mask.height())
        );
    }

    #[test]
    fn missing_file_is_an_error_not_a_negative() {
        let err = LesionDetector::default()
            .detect(Path::new("/definitely/not/here.png"))
            .unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Decode);
    }
}
