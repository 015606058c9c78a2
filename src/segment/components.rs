//! 8-connected component extraction and size/position filtering.
use image::{GrayImage, ImageBuffer, Luma};
use imageproc::region_labelling::{connected_components, Connectivity};
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Per-pixel component labels; 0 is background.
pub type LabelImage = ImageBuffer<Luma<u32>, Vec<u32>>;

/// Foreground region found in a binary mask. Only lives during filtering.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectedComponent {
    pub label: u32,
    /// Pixel count.
    pub area: usize,
    /// Mean pixel coordinate (x, y).
    pub centroid: Point2<f32>,
}

/// Why a component was dropped by [`ComponentFilter`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Rejection {
    TooSmall,
    TooLarge,
    OffCentre,
}

/// Area and centroid-band gate applied to each component.
///
/// Area bounds are fractions of the slice pixel count, truncated to whole
/// pixels and inclusive. Band limits are fractions of width/height and
/// exclusive.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ComponentFilter {
    pub min_area_fraction: f64,
    pub max_area_fraction: f64,
    pub band_x: (f64, f64),
    pub band_y: (f64, f64),
}

impl Default for ComponentFilter {
    fn default() -> Self {
        Self {
            min_area_fraction: 0.001,
            max_area_fraction: 0.05,
            band_x: (0.25, 0.80),
            band_y: (0.25, 0.80),
        }
    }
}

impl ComponentFilter {
    /// Inclusive `[min, max]` pixel area for a `width × height` slice.
    pub fn area_bounds(&self, width: usize, height: usize) -> (usize, usize) {
        let total = (width * height) as f64;
        (
            (total * self.min_area_fraction) as usize,
            (total * self.max_area_fraction) as usize,
        )
    }

    pub fn check(
        &self,
        component: &ConnectedComponent,
        width: usize,
        height: usize,
    ) -> Result<(), Rejection> {
        let (min_area, max_area) = self.area_bounds(width, height);
        if component.area < min_area {
            return Err(Rejection::TooSmall);
        }
        if component.area > max_area {
            return Err(Rejection::TooLarge);
        }
        let (w, h) = (width as f64, height as f64);
        let (cx, cy) = (component.centroid.x as f64, component.centroid.y as f64);
        let inside_x = self.band_x.0 * w < cx && cx < self.band_x.1 * w;
        let inside_y = self.band_y.0 * h < cy && cy < self.band_y.1 * h;
        if inside_x && inside_y {
            Ok(())
        } else {
            Err(Rejection::OffCentre)
        }
    }
}

/// Label 8-connected foreground regions of `mask` (non-zero = foreground).
///
/// Returns the label image and one record per label, ordered by label.
pub fn label_components(mask: &GrayImage) -> (LabelImage, Vec<ConnectedComponent>) {
    let labels = connected_components(mask, Connectivity::Eight, Luma([0u8]));
    let count = labels.as_raw().iter().copied().max().unwrap_or(0) as usize;

    let mut area = vec![0usize; count + 1];
    let mut sum_x = vec![0f64; count + 1];
    let mut sum_y = vec![0f64; count + 1];
    for (x, y, px) in labels.enumerate_pixels() {
        let label = px.0[0] as usize;
        if label == 0 {
            continue;
        }
        area[label] += 1;
        sum_x[label] += x as f64;
        sum_y[label] += y as f64;
    }

    let components = (1..=count)
        .filter(|&label| area[label] > 0)
        .map(|label| {
            let n = area[label] as f64;
            ConnectedComponent {
                label: label as u32,
                area: area[label],
                centroid: Point2::new((sum_x[label] / n) as f32, (sum_y[label] / n) as f32),
            }
        })
        .collect();
    (labels, components)
}
