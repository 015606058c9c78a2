//! Percentile-based adaptive binarization.
use image::GrayImage;

/// Intensity at percentile `p` (0..=100), linearly interpolated between the
/// two nearest order statistics. Returns 0 for an empty slice.
pub fn percentile(gray: &GrayImage, p: f32) -> f32 {
    let data = gray.as_raw();
    if data.is_empty() {
        return 0.0;
    }
    let mut hist = [0usize; 256];
    for &v in data {
        hist[v as usize] += 1;
    }
    let rank = (p.clamp(0.0, 100.0) / 100.0) as f64 * (data.len() - 1) as f64;
    let lo_rank = rank.floor() as usize;
    let frac = (rank - lo_rank as f64) as f32;
    let lo = nth_value(&hist, lo_rank);
    if frac == 0.0 {
        return lo as f32;
    }
    let hi = nth_value(&hist, lo_rank + 1);
    lo as f32 + (hi as f32 - lo as f32) * frac
}

/// Value of the `n`-th smallest sample (0-based) described by `hist`.
fn nth_value(hist: &[usize; 256], n: usize) -> u8 {
    let mut seen = 0usize;
    for (value, &count) in hist.iter().enumerate() {
        seen += count;
        if seen > n {
            return value as u8;
        }
    }
    255
}

/// Foreground (1) where the sample is strictly above `threshold`, else 0.
pub fn binarize(gray: &GrayImage, threshold: f32) -> GrayImage {
    let (w, h) = gray.dimensions();
    let data = gray
        .as_raw()
        .iter()
        .map(|&v| u8::from(v as f32 > threshold))
        .collect();
    GrayImage::from_raw(w, h, data).unwrap_or_else(|| GrayImage::new(w, h))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentile_interpolates_between_ranks() {
        let gray = GrayImage::from_raw(4, 1, vec![0, 10, 20, 30]).unwrap();
        assert_eq!(percentile(&gray, 0.0), 0.0);
        assert_eq!(percentile(&gray, 100.0), 30.0);
        assert!((percentile(&gray, 50.0) - 15.0).abs() < 1e-4);
        // rank 0.85 * 3 = 2.55 -> 20 + 0.55 * 10
        assert!((percentile(&gray, 85.0) - 25.5).abs() < 1e-3);
    }

    #[test]
    fn ties_at_threshold_stay_background() {
        let gray = GrayImage::from_raw(5, 1, vec![3, 3, 3, 3, 200]).unwrap();
        let thr = percentile(&gray, 50.0);
        assert_eq!(binarize(&gray, thr).as_raw(), &vec![0u8, 0, 0, 0, 1]);
    }
}
