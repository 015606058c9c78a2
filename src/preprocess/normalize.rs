//! Min–max rescaling to the full 8-bit range.
use crate::image::{ImageF32, ImageView, IntensityVolume, RawVolume};
use image::GrayImage;
use log::warn;

/// Rescale the whole volume so its global min/max map to 0/255.
///
/// Statistics are taken over every slice at once. A zero-range (constant)
/// volume maps to all zeros.
pub fn normalize_volume(volume: &RawVolume) -> IntensityVolume {
    let range = volume
        .slices()
        .iter()
        .filter_map(ImageF32::min_max)
        .reduce(|(lo_a, hi_a), (lo_b, hi_b)| (lo_a.min(lo_b), hi_a.max(hi_b)));
    let (lo, hi) = range.unwrap_or((0.0, 0.0));
    if hi <= lo {
        warn!("normalize_volume: zero intensity range ({lo}), output is constant");
    }
    volume.map(|plane| rescale_plane(plane, lo, hi))
}

/// Rescale one 8-bit slice to span 0..=255.
pub fn normalize_gray(gray: &GrayImage) -> GrayImage {
    let (lo, hi) = gray
        .as_raw()
        .iter()
        .fold((u8::MAX, u8::MIN), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    let (w, h) = gray.dimensions();
    if gray.as_raw().is_empty() || hi <= lo {
        return GrayImage::new(w, h);
    }
    let scale = 255.0 / (hi - lo) as f32;
    let data = gray
        .as_raw()
        .iter()
        .map(|&v| ((v - lo) as f32 * scale).round().clamp(0.0, 255.0) as u8)
        .collect();
    GrayImage::from_raw(w, h, data).unwrap_or_else(|| GrayImage::new(w, h))
}

fn rescale_plane(plane: &ImageF32, lo: f32, hi: f32) -> GrayImage {
    let (w, h) = (plane.width() as u32, plane.height() as u32);
    if hi <= lo {
        return GrayImage::new(w, h);
    }
    let scale = 255.0 / (hi - lo);
    let data = plane
        .data
        .iter()
        .map(|&v| {
            if v.is_nan() {
                0
            } else {
                ((v - lo) * scale).round().clamp(0.0, 255.0) as u8
            }
        })
        .collect();
    GrayImage::from_raw(w, h, data).unwrap_or_else(|| GrayImage::new(w, h))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::Volume;

    #[test]
    fn volume_uses_global_statistics() {
        let a = ImageF32::from_vec(2, 1, vec![100.0, 200.0]).unwrap();
        let b = ImageF32::from_vec(2, 1, vec![300.0, 500.0]).unwrap();
        let vol = Volume::from_slices(vec![a, b]).unwrap();
        let out = normalize_volume(&vol);
        assert_eq!(out.slices()[0].as_raw(), &vec![0u8, 64]);
        assert_eq!(out.slices()[1].as_raw(), &vec![128u8, 255]);
    }

    #[test]
    fn constant_volume_maps_to_zero() {
        let plane = ImageF32::from_vec(3, 3, vec![128.0; 9]).unwrap();
        let vol = Volume::from_slices(vec![plane]).unwrap();
        let out = normalize_volume(&vol);
        assert!(out.slices()[0].as_raw().iter().all(|&v| v == 0));
    }

    #[test]
    fn gray_slice_is_stretched() {
        let gray = GrayImage::from_raw(3, 1, vec![10, 20, 30]).unwrap();
        assert_eq!(normalize_gray(&gray).as_raw(), &vec![0u8, 128, 255]);
    }
}
