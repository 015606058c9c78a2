use super::*;
use crate::image::Volume;
use image::Luma;

fn disk_slice(size: u32, cx: f32, cy: f32, radius: f32) -> GrayImage {
    GrayImage::from_fn(size, size, |x, y| {
        let d = ((x as f32 - cx).powi(2) + (y as f32 - cy).powi(2)).sqrt();
        Luma([if d <= radius { 230 } else { 20 }])
    })
}

#[test]
fn brightest_slice_is_selected_first_on_ties() {
    let dim = GrayImage::from_pixel(8, 8, Luma([10]));
    let bright = GrayImage::from_pixel(8, 8, Luma([50]));
    let vol = Volume::from_slices(vec![dim.clone(), bright.clone(), bright, dim]).unwrap();
    assert_eq!(select_slice(&vol), 1);

    let flat = Volume::from_slices(vec![GrayImage::new(4, 4), GrayImage::new(4, 4)]).unwrap();
    assert_eq!(select_slice(&flat), 0);
}

#[test]
fn centred_disk_survives_segmentation() {
    let slice = disk_slice(128, 64.0, 64.0, 9.0);
    let vol = Volume::Slice(slice);
    let seg = Segmenter::default().segment_with_diagnostics(&vol).unwrap();
    assert!(!seg.mask.is_empty());
    assert_eq!(seg.mask.slice_index(), 0);
    assert!(seg.mask.get(64, 64) == 1);
    assert!(seg.stage.components.iter().any(|c| c.kept));
}

#[test]
fn corner_disk_is_filtered_out() {
    let slice = disk_slice(128, 14.0, 14.0, 9.0);
    let mask = Segmenter::default().segment(&Volume::Slice(slice)).unwrap();
    assert!(mask.is_empty());
}

#[test]
fn uniform_slice_yields_empty_mask() {
    let slice = GrayImage::from_pixel(64, 64, Luma([128]));
    let mask = Segmenter::default().segment(&Volume::Slice(slice)).unwrap();
    assert!(mask.is_empty());
    assert_eq!((mask.width(), mask.height()), (64, 64));
}

#[test]
fn mask_follows_selected_slice_of_stack() {
    let empty = GrayImage::from_pixel(128, 128, Luma([20]));
    let target = disk_slice(128, 64.0, 64.0, 9.0);
    let vol = Volume::from_slices(vec![empty, target]).unwrap();
    let mask = Segmenter::default().segment(&vol).unwrap();
    assert_eq!(mask.slice_index(), 1);
    assert_eq!(mask.get(64, 64), 1);
}

#[test]
fn mask_values_are_binary() {
    let slice = disk_slice(96, 48.0, 48.0, 7.0);
    let mask = Segmenter::default().segment(&Volume::Slice(slice)).unwrap();
    assert!(mask.as_slice().iter().all(|&v| v <= 1));
    assert!(mask.to_gray().as_raw().iter().all(|&v| v == 0 || v == 255));
}
