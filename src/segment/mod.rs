//! Region-of-interest segmentation on a single slice.
//!
//! Stages
//! 1. Slice selection: for stacks, the slice with the largest intensity sum
//!    (first one on ties).
//! 2. Local re-enhancement: min–max stretch, then a second CLAHE pass with
//!    its own parameters.
//! 3. Adaptive threshold at a percentile of the enhanced slice.
//! 4. Morphological opening with an elliptical element.
//! 5. 8-connected labelling.
//! 6. Area / centroid-band filter; surviving components form the mask.
//!
//! The resulting [`BinaryMask`] covers only the selected slice and records
//! its index so later stages read the same slice.

pub mod components;
pub mod morphology;
pub mod threshold;

#[cfg(test)]
mod tests;

pub use components::{label_components, ComponentFilter, ConnectedComponent, Rejection};
pub use morphology::{MorphologyParams, StructuringElement};
pub use threshold::{binarize, percentile};

use crate::diagnostics::{ComponentReport, SegmentationStage};
use crate::error::{PipelineError, PipelineResult};
use crate::image::{ImageView, IntensityVolume};
use crate::preprocess::{clahe, normalize_gray, ClaheParams};
use image::GrayImage;
use log::debug;
use serde::Deserialize;

/// Binary region-of-interest mask for one slice; values are 0 or 1.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BinaryMask {
    width: usize,
    height: usize,
    slice_index: usize,
    data: Vec<u8>,
}

impl BinaryMask {
    /// All-background mask.
    pub fn empty(width: usize, height: usize, slice_index: usize) -> Self {
        Self {
            width,
            height,
            slice_index,
            data: vec![0; width * height],
        }
    }

    /// Build from raw values; any non-zero becomes 1.
    pub fn from_raw(width: usize, height: usize, slice_index: usize, data: Vec<u8>) -> Option<Self> {
        if data.len() != width * height {
            return None;
        }
        let data = data.into_iter().map(|v| u8::from(v != 0)).collect();
        Some(Self {
            width,
            height,
            slice_index,
            data,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Index of the slice this mask was computed from.
    pub fn slice_index(&self) -> usize {
        self.slice_index
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.data[y * self.width + x]
    }

    pub fn foreground_count(&self) -> usize {
        self.data.iter().filter(|&&v| v == 1).count()
    }

    pub fn is_empty(&self) -> bool {
        self.data.iter().all(|&v| v == 0)
    }

    /// Foreground mapped to 255, background to 0.
    pub fn to_gray(&self) -> GrayImage {
        let data = self.data.iter().map(|&v| v * 255).collect();
        GrayImage::from_raw(self.width as u32, self.height as u32, data)
            .unwrap_or_else(|| GrayImage::new(self.width as u32, self.height as u32))
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct SegmentParams {
    /// Second, segmentation-local CLAHE pass.
    pub clahe: ClaheParams,
    /// Percentile (0..=100) used as the binarization threshold.
    pub threshold_percentile: f32,
    pub morphology: MorphologyParams,
    pub filter: ComponentFilter,
}

impl Default for SegmentParams {
    fn default() -> Self {
        Self {
            clahe: ClaheParams::new(2.0),
            threshold_percentile: 85.0,
            morphology: MorphologyParams::default(),
            filter: ComponentFilter::default(),
        }
    }
}

/// Mask plus the stage diagnostics gathered while producing it.
#[derive(Clone, Debug)]
pub struct Segmentation {
    pub mask: BinaryMask,
    pub stage: SegmentationStage,
}

#[derive(Clone, Debug, Default)]
pub struct Segmenter {
    params: SegmentParams,
}

impl Segmenter {
    pub fn new(params: SegmentParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &SegmentParams {
        &self.params
    }

    /// Compute the mask for the most informative slice of `volume`.
    pub fn segment(&self, volume: &IntensityVolume) -> PipelineResult<BinaryMask> {
        self.segment_with_diagnostics(volume).map(|s| s.mask)
    }

    pub fn segment_with_diagnostics(&self, volume: &IntensityVolume) -> PipelineResult<Segmentation> {
        let slice_index = select_slice(volume);
        let slice = volume
            .slice(slice_index)
            .ok_or_else(|| PipelineError::processing("segment", "volume has no slices"))?;
        let (width, height) = slice.dims();
        if width == 0 || height == 0 {
            return Err(PipelineError::processing(
                "segment",
                format!("empty slice {width}x{height}"),
            ));
        }

        let enhanced = clahe(&normalize_gray(slice), &self.params.clahe);
        let threshold = percentile(&enhanced, self.params.threshold_percentile);
        let binary = binarize(&enhanced, threshold);
        let foreground_raw = count_foreground(&binary);

        let se = StructuringElement::disk(self.params.morphology.radius);
        let opened = morphology::open(&binary, &se, self.params.morphology.iterations);
        let foreground_opened = count_foreground(&opened);

        let (labels, found) = label_components(&opened);
        let mut keep = vec![false; found.len() + 1];
        let mut reports = Vec::with_capacity(found.len());
        for component in &found {
            let verdict = self.params.filter.check(component, width, height);
            if verdict.is_ok() {
                keep[component.label as usize] = true;
            }
            reports.push(ComponentReport::new(component, verdict.err()));
        }

        let data = labels
            .as_raw()
            .iter()
            .map(|&label| u8::from(label != 0 && keep.get(label as usize).copied().unwrap_or(false)))
            .collect();
        let mask = BinaryMask::from_raw(width, height, slice_index, data).ok_or_else(|| {
            PipelineError::processing("segment", "label image does not match slice size")
        })?;

        let kept = reports.iter().filter(|r| r.kept).count();
        debug!(
            "Segmenter::segment slice={} threshold={:.2} fg_raw={} fg_opened={} components={} kept={}",
            slice_index,
            threshold,
            foreground_raw,
            foreground_opened,
            reports.len(),
            kept
        );

        let (min_area, max_area) = self.params.filter.area_bounds(width, height);
        let stage = SegmentationStage {
            slice_index,
            threshold,
            foreground_before_opening: foreground_raw,
            foreground_after_opening: foreground_opened,
            min_area,
            max_area,
            mask_pixels: mask.foreground_count(),
            components: reports,
        };
        Ok(Segmentation { mask, stage })
    }
}

/// Index of the slice with the largest intensity sum; first wins on ties.
pub fn select_slice(volume: &IntensityVolume) -> usize {
    let mut best = (0usize, 0u64);
    for (idx, slice) in volume.slices().iter().enumerate() {
        let sum: u64 = slice.as_raw().iter().map(|&v| v as u64).sum();
        if idx == 0 || sum > best.1 {
            best = (idx, sum);
        }
    }
    best.0
}

fn count_foreground(mask: &GrayImage) -> usize {
    mask.as_raw().iter().filter(|&&v| v != 0).count()
}
