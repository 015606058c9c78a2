//! Tagged single-slice / multi-slice container.
//!
//! Downstream stages consume a uniform slice list instead of branching on
//! array rank. A stack always holds at least two slices of identical size.
use super::{ImageF32, ImageView};
use crate::error::{PipelineError, PipelineResult};
use image::GrayImage;

#[derive(Clone, Debug, PartialEq)]
pub enum Volume<P> {
    /// A plain 2-D image.
    Slice(P),
    /// An ordered stack of same-shaped slices (volumetric input).
    Stack(Vec<P>),
}

/// Decoded samples at their original precision.
pub type RawVolume = Volume<ImageF32>;
/// Normalized 8-bit volume produced by the preprocessor.
pub type IntensityVolume = Volume<GrayImage>;

impl<P: ImageView> Volume<P> {
    /// Build a volume from decoded slices, checking that all share one shape.
    ///
    /// A single slice collapses to [`Volume::Slice`].
    pub fn from_slices(mut slices: Vec<P>) -> PipelineResult<Self> {
        let Some(first) = slices.first() else {
            return Err(PipelineError::processing("volume", "no slices"));
        };
        let dims = first.dims();
        if dims.0 == 0 || dims.1 == 0 {
            return Err(PipelineError::processing(
                "volume",
                format!("empty slice {}x{}", dims.0, dims.1),
            ));
        }
        if let Some((idx, bad)) = slices.iter().enumerate().find(|(_, s)| s.dims() != dims) {
            let (bw, bh) = bad.dims();
            return Err(PipelineError::processing(
                "volume",
                format!(
                    "slice {idx} is {bw}x{bh}, expected {}x{}",
                    dims.0, dims.1
                ),
            ));
        }
        if slices.len() == 1 {
            return Ok(Volume::Slice(slices.remove(0)));
        }
        Ok(Volume::Stack(slices))
    }

    pub fn slices(&self) -> &[P] {
        match self {
            Volume::Slice(slice) => std::slice::from_ref(slice),
            Volume::Stack(slices) => slices,
        }
    }

    pub fn slice(&self, index: usize) -> Option<&P> {
        self.slices().get(index)
    }

    pub fn depth(&self) -> usize {
        self.slices().len()
    }

    pub fn width(&self) -> usize {
        self.slices().first().map_or(0, |s| s.width())
    }

    pub fn height(&self) -> usize {
        self.slices().first().map_or(0, |s| s.height())
    }

    pub fn is_stack(&self) -> bool {
        matches!(self, Volume::Stack(_))
    }

    /// `[width, height]` for a slice, `[width, height, depth]` for a stack.
    pub fn shape(&self) -> Vec<usize> {
        match self {
            Volume::Slice(_) => vec![self.width(), self.height()],
            Volume::Stack(slices) => vec![self.width(), self.height(), slices.len()],
        }
    }

    /// Apply `f` to every slice, keeping the tag.
    pub fn map<Q>(&self, mut f: impl FnMut(&P) -> Q) -> Volume<Q> {
        match self {
            Volume::Slice(slice) => Volume::Slice(f(slice)),
            Volume::Stack(slices) => Volume::Stack(slices.iter().map(f).collect()),
        }
    }

    /// Rebuild a volume of the same tag from already-processed slices.
    ///
    /// Used by stages that process slices out of line (e.g. in parallel)
    /// and collect them back in order.
    pub fn with_slices<Q>(&self, mut slices: Vec<Q>) -> Volume<Q> {
        match self {
            Volume::Slice(_) if slices.len() == 1 => Volume::Slice(slices.remove(0)),
            _ => Volume::Stack(slices),
        }
    }
}
