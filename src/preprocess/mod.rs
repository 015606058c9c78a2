//! Intensity normalization, denoising and local contrast enhancement.
//!
//! Order matters:
//! 1. the whole volume is rescaled to 0..=255 using volume-wide min/max;
//! 2. every slice is denoised with non-local means;
//! 3. every slice is equalized with CLAHE.
//!
//! Steps 2–3 run per slice and slices are processed in parallel; results are
//! collected in slice order so the output is deterministic.

pub mod clahe;
pub mod nlmeans;
pub mod normalize;

pub use clahe::{clahe, ClaheParams};
pub use nlmeans::{denoise, NlMeansParams};
pub use normalize::{normalize_gray, normalize_volume};

use crate::image::{IntensityVolume, RawVolume};
use log::debug;
use rayon::prelude::*;
use serde::Deserialize;
use std::time::Instant;

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct PreprocessParams {
    pub denoise: NlMeansParams,
    pub clahe: ClaheParams,
}

impl Default for PreprocessParams {
    fn default() -> Self {
        Self {
            denoise: NlMeansParams::default(),
            clahe: ClaheParams::new(3.0),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct Preprocessor {
    params: PreprocessParams,
}

impl Preprocessor {
    pub fn new(params: PreprocessParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &PreprocessParams {
        &self.params
    }

    /// Produce a same-shaped 8-bit volume ready for segmentation.
    pub fn process(&self, volume: &RawVolume) -> IntensityVolume {
        let start = Instant::now();
        let normalized = normalize_volume(volume);
        let enhanced: Vec<_> = normalized
            .slices()
            .par_iter()
            .map(|slice| {
                let smooth = denoise(slice, &self.params.denoise);
                clahe(&smooth, &self.params.clahe)
            })
            .collect();
        let out = normalized.with_slices(enhanced);
        debug!(
            "Preprocessor::process shape={:?} elapsed_ms={:.3}",
            out.shape(),
            start.elapsed().as_secs_f64() * 1000.0
        );
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::{ImageF32, Volume};

    #[test]
    fn output_keeps_shape_and_tag() {
        let planes = vec![ImageF32::new(20, 10), ImageF32::new(20, 10)];
        let vol = Volume::from_slices(planes).unwrap();
        let out = Preprocessor::default().process(&vol);
        assert!(out.is_stack());
        assert_eq!(out.shape(), vec![20, 10, 2]);
    }

    #[test]
    fn constant_input_does_not_panic() {
        let plane = ImageF32::from_vec(16, 16, vec![128.0; 256]).unwrap();
        let vol = Volume::from_slices(vec![plane]).unwrap();
        let out = Preprocessor::default().process(&vol);
        let first = out.slices()[0].as_raw()[0];
        assert!(out.slices()[0].as_raw().iter().all(|&v| v == first));
    }
}
