//! Mask/image scoring and the final abnormality decision.
//!
//! `tumor_ratio = |mask| / N` and `std_intensity` = population standard
//! deviation of the slice intensities under the mask (0 for an empty mask).
//! The decision is `tumor_ratio > min_ratio && std_intensity > min_std`.
//!
//! The intensity reference is the slice the mask was computed from
//! ([`BinaryMask::slice_index`]), not blindly slice 0.
use crate::error::{PipelineError, PipelineResult};
use crate::image::{ImageView, IntensityVolume};
use crate::segment::BinaryMask;
use log::debug;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct AnalysisParams {
    /// Masked fraction of the slice that must be exceeded.
    pub min_ratio: f64,
    /// Intensity standard deviation under the mask that must be exceeded.
    pub min_std_intensity: f64,
}

impl Default for AnalysisParams {
    fn default() -> Self {
        Self {
            min_ratio: 0.01,
            min_std_intensity: 20.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    pub tumor_ratio: f64,
    pub std_intensity: f64,
    pub has_tumor: bool,
}

#[derive(Clone, Debug, Default)]
pub struct Analyzer {
    params: AnalysisParams,
}

impl Analyzer {
    pub fn new(params: AnalysisParams) -> Self {
        Self { params }
    }

    /// Score `mask` against the matching slice of `volume`.
    pub fn analyze(&self, volume: &IntensityVolume, mask: &BinaryMask) -> PipelineResult<Analysis> {
        let slice = volume.slice(mask.slice_index()).ok_or_else(|| {
            PipelineError::processing(
                "analyze",
                format!(
                    "mask refers to slice {} but volume has {}",
                    mask.slice_index(),
                    volume.depth()
                ),
            )
        })?;
        if slice.dims() != (mask.width(), mask.height()) {
            return Err(PipelineError::processing(
                "analyze",
                format!(
                    "mask is {}x{}, slice is {}x{}",
                    mask.width(),
                    mask.height(),
                    slice.width(),
                    slice.height()
                ),
            ));
        }

        let total = mask.as_slice().len();
        let masked: Vec<f64> = slice
            .as_raw()
            .iter()
            .zip(mask.as_slice())
            .filter(|(_, &m)| m == 1)
            .map(|(&v, _)| v as f64)
            .collect();
        let tumor_ratio = if total > 0 {
            masked.len() as f64 / total as f64
        } else {
            0.0
        };
        let std_intensity = population_std(&masked);
        let analysis = Analysis {
            tumor_ratio,
            std_intensity,
            has_tumor: self.decide(tumor_ratio, std_intensity),
        };
        debug!(
            "Analyzer::analyze slice={} ratio={:.5} std={:.3} has_tumor={}",
            mask.slice_index(),
            analysis.tumor_ratio,
            analysis.std_intensity,
            analysis.has_tumor
        );
        Ok(analysis)
    }

    /// Pure threshold decision on the two scores.
    pub fn decide(&self, tumor_ratio: f64, std_intensity: f64) -> bool {
        tumor_ratio > self.params.min_ratio && std_intensity > self.params.min_std_intensity
    }
}

fn population_std(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;
    var.sqrt()
}
