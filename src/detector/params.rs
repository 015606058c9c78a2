//! Tunable constants of the whole pipeline.
//!
//! Every threshold lives here with its empirical default so runs can be tuned
//! or pinned from a JSON file without code changes. All sections accept
//! partial JSON; missing fields keep their defaults.

use crate::analysis::AnalysisParams;
use crate::preprocess::PreprocessParams;
use crate::render::RenderParams;
use crate::segment::SegmentParams;
use serde::Deserialize;

/// Detector-wide parameters, grouped per stage.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DetectorParams {
    /// Volume normalization, non-local means and CLAHE (clip 3.0).
    pub preprocess: PreprocessParams,
    /// Second CLAHE (clip 2.0), percentile threshold, opening, component filter.
    pub segment: SegmentParams,
    /// Coverage ratio and intensity-variability gates.
    pub analysis: AnalysisParams,
    /// Overlay colour and panel layout.
    pub render: RenderParams,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_constants() {
        let p = DetectorParams::default();
        assert_eq!(p.preprocess.denoise.strength, 10.0);
        assert_eq!(p.preprocess.clahe.clip_limit, 3.0);
        assert_eq!(p.segment.clahe.clip_limit, 2.0);
        assert_eq!((p.segment.clahe.tiles_x, p.segment.clahe.tiles_y), (8, 8));
        assert_eq!(p.segment.threshold_percentile, 85.0);
        assert_eq!(p.segment.morphology.radius, 2);
        assert_eq!(p.segment.morphology.iterations, 2);
        assert_eq!(p.segment.filter.min_area_fraction, 0.001);
        assert_eq!(p.segment.filter.max_area_fraction, 0.05);
        assert_eq!(p.segment.filter.band_x, (0.25, 0.80));
        assert_eq!(p.analysis.min_ratio, 0.01);
        assert_eq!(p.analysis.min_std_intensity, 20.0);
        assert_eq!(p.render.highlight, [255, 0, 0]);
    }

    #[test]
    fn partial_json_keeps_other_defaults() {
        let json = r#"{ "segment": { "threshold_percentile": 90.0 }, "analysis": { "min_ratio": 0.02 } }"#;
        let p: DetectorParams = serde_json::from_str(json).unwrap();
        assert_eq!(p.segment.threshold_percentile, 90.0);
        assert_eq!(p.segment.clahe.clip_limit, 2.0);
        assert_eq!(p.analysis.min_ratio, 0.02);
        assert_eq!(p.analysis.min_std_intensity, 20.0);
        assert_eq!(p.preprocess, PreprocessParams::default());
    }
}
