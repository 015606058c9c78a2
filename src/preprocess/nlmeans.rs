//! Non-local means denoising for 8-bit slices.
//!
//! Every pixel becomes a weighted mean of the pixels inside a square search
//! window; the weight of a candidate depends on how similar the template
//! patches around both pixels are, not on spatial distance.
//!
//! Implementation
//! - Iterates over search offsets instead of pixels: for each offset the
//!   squared-difference image is summed over template windows with an
//!   integral image, so the cost is O(search² · W · H) independent of the
//!   template size.
//! - Patch distance is the mean squared difference over the template;
//!   weight = `exp(-d / h²)`, weights under [`MIN_WEIGHT`] are dropped.
//! - Borders replicate (clamped indices).
use image::GrayImage;
use serde::Deserialize;

/// Weights below this value contribute nothing.
pub const MIN_WEIGHT: f32 = 1e-3;

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct NlMeansParams {
    /// Filter strength `h`; larger removes more noise and more detail.
    pub strength: f32,
    /// Side of the square patch compared between pixels (odd).
    pub template_window: usize,
    /// Side of the square neighbourhood searched for similar patches (odd).
    pub search_window: usize,
}

impl Default for NlMeansParams {
    fn default() -> Self {
        Self {
            strength: 10.0,
            template_window: 7,
            search_window: 21,
        }
    }
}

pub fn denoise(src: &GrayImage, params: &NlMeansParams) -> GrayImage {
    let (w32, h32) = src.dimensions();
    let (w, h) = (w32 as usize, h32 as usize);
    if w == 0 || h == 0 || params.strength <= 0.0 {
        return src.clone();
    }
    let tr = (params.template_window / 2) as isize;
    let sr = (params.search_window / 2) as isize;
    let template_area = ((2 * tr + 1) * (2 * tr + 1)) as f32;
    let inv_h2 = 1.0 / (params.strength * params.strength);
    let data = src.as_raw();

    let clamp_x = |x: isize| x.clamp(0, w as isize - 1) as usize;
    let clamp_y = |y: isize| y.clamp(0, h as isize - 1) as usize;
    let px = |x: isize, y: isize| data[clamp_y(y) * w + clamp_x(x)] as i64;

    // Integral image over the padded domain [-tr, w+tr) x [-tr, h+tr).
    let pw = w + 2 * tr as usize;
    let ph = h + 2 * tr as usize;
    let iw = pw + 1;
    let mut integral = vec![0i64; iw * (ph + 1)];
    let mut weight_sum = vec![0f32; w * h];
    let mut value_sum = vec![0f32; w * h];

    for dy in -sr..=sr {
        for dx in -sr..=sr {
            for py in 0..ph {
                let y = py as isize - tr;
                let mut row_acc = 0i64;
                for pxi in 0..pw {
                    let x = pxi as isize - tr;
                    let d = px(x, y) - px(x + dx, y + dy);
                    row_acc += d * d;
                    integral[(py + 1) * iw + pxi + 1] = integral[py * iw + pxi + 1] + row_acc;
                }
            }

            let span = (2 * tr + 1) as usize;
            for y in 0..h {
                for x in 0..w {
                    // Window [x-tr, x+tr] maps to padded [x, x+span).
                    let (x0, y0, x1, y1) = (x, y, x + span, y + span);
                    let ssd = integral[y1 * iw + x1] - integral[y0 * iw + x1]
                        - integral[y1 * iw + x0]
                        + integral[y0 * iw + x0];
                    let dist = ssd as f32 / template_area;
                    let weight = (-dist * inv_h2).exp();
                    if weight < MIN_WEIGHT {
                        continue;
                    }
                    let idx = y * w + x;
                    weight_sum[idx] += weight;
                    value_sum[idx] += weight * px(x as isize + dx, y as isize + dy) as f32;
                }
            }
        }
    }

    let out = data
        .iter()
        .zip(weight_sum.iter().zip(value_sum.iter()))
        .map(|(&orig, (&ws, &vs))| {
            if ws > 0.0 {
                (vs / ws).round().clamp(0.0, 255.0) as u8
            } else {
                orig
            }
        })
        .collect();
    GrayImage::from_raw(w32, h32, out).unwrap_or_else(|| src.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn constant_slice_is_unchanged() {
        let src = GrayImage::from_pixel(24, 24, Luma([90]));
        let out = denoise(&src, &NlMeansParams::default());
        assert_eq!(out, src);
    }

    #[test]
    fn isolated_noise_is_suppressed() {
        let mut src = GrayImage::from_pixel(32, 32, Luma([50]));
        src.put_pixel(16, 16, Luma([60]));
        let out = denoise(&src, &NlMeansParams::default());
        let centre = out.get_pixel(16, 16).0[0];
        assert!(centre < 60, "centre should move toward background, got {centre}");
        assert!(centre >= 50);
    }

    #[test]
    fn strong_edges_survive() {
        let src = GrayImage::from_fn(32, 32, |x, _| Luma([if x < 16 { 0 } else { 255 }]));
        let out = denoise(&src, &NlMeansParams::default());
        assert_eq!(out.get_pixel(4, 10).0[0], 0);
        assert_eq!(out.get_pixel(28, 10).0[0], 255);
    }
}
