use image::GrayImage;
use std::path::{Path, PathBuf};

/// Background level of the disk phantoms.
pub const BACKGROUND: u8 = 30;

/// Constant-intensity slice.
pub fn uniform_u8(width: usize, height: usize, value: u8) -> Vec<u8> {
    assert!(width > 0 && height > 0, "image dimensions must be positive");
    vec![value; width * height]
}

/// Bright disk on a flat background with a radial falloff from 255 at the
/// centre to 80 at the rim, so the region has real internal texture.
pub fn disk_u8(width: usize, height: usize, cx: f32, cy: f32, radius: f32) -> Vec<u8> {
    assert!(width > 0 && height > 0, "image dimensions must be positive");
    assert!(radius > 0.0, "radius must be positive");

    let mut img = vec![BACKGROUND; width * height];
    for y in 0..height {
        for x in 0..width {
            let dx = x as f32 - cx;
            let dy = y as f32 - cy;
            let d = (dx * dx + dy * dy).sqrt();
            if d <= radius {
                let v = 255.0 - 175.0 * d / radius;
                img[y * width + x] = v.round().clamp(0.0, 255.0) as u8;
            }
        }
    }
    img
}

/// Disk of constant `value` on the flat background.
pub fn flat_disk_u8(width: usize, height: usize, cx: f32, cy: f32, radius: f32, value: u8) -> Vec<u8> {
    assert!(width > 0 && height > 0, "image dimensions must be positive");
    let mut img = vec![BACKGROUND; width * height];
    for y in 0..height {
        for x in 0..width {
            let d = ((x as f32 - cx).powi(2) + (y as f32 - cy).powi(2)).sqrt();
            if d <= radius {
                img[y * width + x] = value;
            }
        }
    }
    img
}

/// Radius of a disk covering `fraction` of a `width`×`height` slice.
pub fn radius_for_fraction(width: usize, height: usize, fraction: f32) -> f32 {
    ((width * height) as f32 * fraction / std::f32::consts::PI).sqrt()
}

/// Save a buffer as an 8-bit grayscale PNG under `dir`.
pub fn write_png(dir: &Path, name: &str, width: usize, height: usize, data: Vec<u8>) -> PathBuf {
    let img = GrayImage::from_raw(width as u32, height as u32, data).expect("buffer size");
    let path = dir.join(name);
    img.save(&path).expect("write png");
    path
}
