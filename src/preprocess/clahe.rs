//! Contrast-limited adaptive histogram equalization (CLAHE).
//!
//! The slice is split into a `tiles_x × tiles_y` grid. Each tile gets a
//! clipped, redistributed histogram turned into a lookup table; output pixels
//! blend the four nearest tile LUTs bilinearly.
//!
//! Details
//! - Slices whose size is not a multiple of the grid are padded on the
//!   right/bottom with reflect-101 borders before tile histograms are taken.
//! - Clip count per bin is `max(⌊clip_limit · tile_area / 256⌋, 1)`.
//! - Clipped mass is spread evenly over all bins; the remainder goes one
//!   count at a time at stride `max(256 / remainder, 1)` from bin 0.
use image::GrayImage;
use serde::Deserialize;

const BINS: usize = 256;

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ClaheParams {
    pub clip_limit: f32,
    pub tiles_x: usize,
    pub tiles_y: usize,
}

impl ClaheParams {
    pub fn new(clip_limit: f32) -> Self {
        Self {
            clip_limit,
            ..Self::default()
        }
    }
}

impl Default for ClaheParams {
    fn default() -> Self {
        Self {
            clip_limit: 3.0,
            tiles_x: 8,
            tiles_y: 8,
        }
    }
}

pub fn clahe(src: &GrayImage, params: &ClaheParams) -> GrayImage {
    let (w32, h32) = src.dimensions();
    let (w, h) = (w32 as usize, h32 as usize);
    if w == 0 || h == 0 {
        return src.clone();
    }
    let tiles_x = params.tiles_x.max(1);
    let tiles_y = params.tiles_y.max(1);
    let tile_w = w.div_ceil(tiles_x);
    let tile_h = h.div_ceil(tiles_y);
    let tile_area = tile_w * tile_h;
    let clip = if params.clip_limit > 0.0 {
        ((params.clip_limit * tile_area as f32 / BINS as f32) as usize).max(1)
    } else {
        0
    };
    let lut_scale = (BINS - 1) as f32 / tile_area as f32;
    let data = src.as_raw();

    let mut luts = vec![[0u8; BINS]; tiles_x * tiles_y];
    for ty in 0..tiles_y {
        for tx in 0..tiles_x {
            let mut hist = [0usize; BINS];
            for y in ty * tile_h..(ty + 1) * tile_h {
                let sy = reflect101(y, h);
                let row = &data[sy * w..(sy + 1) * w];
                for x in tx * tile_w..(tx + 1) * tile_w {
                    hist[row[reflect101(x, w)] as usize] += 1;
                }
            }
            if clip > 0 {
                clip_histogram(&mut hist, clip);
            }
            let lut = &mut luts[ty * tiles_x + tx];
            let mut sum = 0usize;
            for (bin, value) in lut.iter_mut().enumerate() {
                sum += hist[bin];
                *value = (sum as f32 * lut_scale).round().clamp(0.0, 255.0) as u8;
            }
        }
    }

    let inv_tw = 1.0 / tile_w as f32;
    let inv_th = 1.0 / tile_h as f32;
    let mut out = vec![0u8; w * h];
    for y in 0..h {
        let tyf = y as f32 * inv_th - 0.5;
        let ty1 = tyf.floor() as isize;
        let ya = tyf - ty1 as f32;
        let ty2 = ((ty1 + 1) as usize).min(tiles_y - 1);
        let ty1 = ty1.max(0) as usize;
        for x in 0..w {
            let txf = x as f32 * inv_tw - 0.5;
            let tx1 = txf.floor() as isize;
            let xa = txf - tx1 as f32;
            let tx2 = ((tx1 + 1) as usize).min(tiles_x - 1);
            let tx1 = tx1.max(0) as usize;

            let v = data[y * w + x] as usize;
            let top = luts[ty1 * tiles_x + tx1][v] as f32 * (1.0 - xa)
                + luts[ty1 * tiles_x + tx2][v] as f32 * xa;
            let bottom = luts[ty2 * tiles_x + tx1][v] as f32 * (1.0 - xa)
                + luts[ty2 * tiles_x + tx2][v] as f32 * xa;
            let res = top * (1.0 - ya) + bottom * ya;
            out[y * w + x] = res.round().clamp(0.0, 255.0) as u8;
        }
    }
    GrayImage::from_raw(w32, h32, out).unwrap_or_else(|| src.clone())
}

fn clip_histogram(hist: &mut [usize; BINS], clip: usize) {
    let mut clipped = 0usize;
    for count in hist.iter_mut() {
        if *count > clip {
            clipped += *count - clip;
            *count = clip;
        }
    }
    let batch = clipped / BINS;
    let mut residual = clipped - batch * BINS;
    for count in hist.iter_mut() {
        *count += batch;
    }
    if residual > 0 {
        let step = (BINS / residual).max(1);
        let mut i = 0;
        while i < BINS && residual > 0 {
            hist[i] += 1;
            residual -= 1;
            i += step;
        }
    }
}

/// Reflect-101 index mapping (`dcb|abcd|cba`) for padding past the edge.
#[inline]
fn reflect101(i: usize, n: usize) -> usize {
    if n == 1 {
        return 0;
    }
    let period = 2 * (n - 1);
    let m = i % period;
    if m < n {
        m
    } else {
        period - m
    }
}
