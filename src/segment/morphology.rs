//! Binary morphology on 0/1 masks.
//!
//! Out-of-image neighbours are ignored: they never erode a pixel and never
//! dilate into one.
use image::GrayImage;
use serde::Deserialize;

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct MorphologyParams {
    /// Radius of the elliptical structuring element (size `2r+1`).
    pub radius: usize,
    /// Erosions (then as many dilations) applied by the opening.
    pub iterations: usize,
}

impl Default for MorphologyParams {
    fn default() -> Self {
        Self {
            radius: 2,
            iterations: 2,
        }
    }
}

/// Set of active offsets relative to the anchor at the element centre.
#[derive(Clone, Debug, PartialEq)]
pub struct StructuringElement {
    width: usize,
    height: usize,
    offsets: Vec<(isize, isize)>,
}

impl StructuringElement {
    /// Elliptical element inscribed in a `(2rx+1) × (2ry+1)` box.
    ///
    /// For r = 2 the rows are `00100 / 11111 / 11111 / 11111 / 00100`.
    pub fn ellipse(rx: usize, ry: usize) -> Self {
        let (width, height) = (2 * rx + 1, 2 * ry + 1);
        let mut offsets = Vec::new();
        let inv_r2 = if ry > 0 { 1.0 / (ry * ry) as f64 } else { 0.0 };
        for row in 0..height {
            let dy = row as isize - ry as isize;
            let dx = if ry > 0 {
                let rem = (ry * ry) as f64 - (dy * dy) as f64;
                (rx as f64 * (rem * inv_r2).max(0.0).sqrt()).round() as isize
            } else {
                rx as isize
            };
            for col in -dx..=dx {
                offsets.push((col, dy));
            }
        }
        Self {
            width,
            height,
            offsets,
        }
    }

    pub fn disk(radius: usize) -> Self {
        Self::ellipse(radius, radius)
    }

    pub fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn contains(&self, dx: isize, dy: isize) -> bool {
        self.offsets.contains(&(dx, dy))
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }
}

pub fn erode(mask: &GrayImage, se: &StructuringElement) -> GrayImage {
    apply(mask, se, true)
}

pub fn dilate(mask: &GrayImage, se: &StructuringElement) -> GrayImage {
    apply(mask, se, false)
}

/// `iterations` erosions followed by `iterations` dilations.
pub fn open(mask: &GrayImage, se: &StructuringElement, iterations: usize) -> GrayImage {
    let mut out = mask.clone();
    for _ in 0..iterations {
        out = erode(&out, se);
    }
    for _ in 0..iterations {
        out = dilate(&out, se);
    }
    out
}

fn apply(mask: &GrayImage, se: &StructuringElement, erosion: bool) -> GrayImage {
    let (w32, h32) = mask.dimensions();
    let (w, h) = (w32 as isize, h32 as isize);
    let src = mask.as_raw();
    let mut out = vec![0u8; src.len()];
    for y in 0..h {
        for x in 0..w {
            let mut hit = erosion;
            for &(dx, dy) in &se.offsets {
                let (nx, ny) = (x + dx, y + dy);
                if nx < 0 || ny < 0 || nx >= w || ny >= h {
                    continue;
                }
                let on = src[(ny * w + nx) as usize] != 0;
                if erosion && !on {
                    hit = false;
                    break;
                }
                if !erosion && on {
                    hit = true;
                    break;
                }
            }
            out[(y * w + x) as usize] = u8::from(hit);
        }
    }
    GrayImage::from_raw(w32, h32, out).unwrap_or_else(|| GrayImage::new(w32, h32))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn ellipse_radius_two_matches_reference_layout() {
        let se = StructuringElement::disk(2);
        assert_eq!(se.size(), (5, 5));
        assert_eq!(se.len(), 17);
        assert!(se.contains(0, -2) && se.contains(0, 2));
        assert!(!se.contains(-1, -2) && !se.contains(1, 2));
        assert!(se.contains(-2, -1) && se.contains(2, 1));
    }

    #[test]
    fn opening_removes_specks_and_keeps_blobs() {
        let mut mask = GrayImage::new(40, 40);
        mask.put_pixel(3, 3, Luma([1]));
        mask.put_pixel(4, 3, Luma([1]));
        for y in 15..30 {
            for x in 15..30 {
                mask.put_pixel(x, y, Luma([1]));
            }
        }
        let opened = open(&mask, &StructuringElement::disk(2), 2);
        assert_eq!(opened.get_pixel(3, 3).0[0], 0);
        assert_eq!(opened.get_pixel(22, 22).0[0], 1);
        assert!(opened.as_raw().iter().all(|&v| v <= 1));
    }

    #[test]
    fn full_mask_survives_opening() {
        let mask = GrayImage::from_pixel(12, 12, Luma([1]));
        let opened = open(&mask, &StructuringElement::disk(2), 2);
        assert_eq!(opened, mask);
    }
}
