mod common;

use common::synthetic_image::{disk_u8, radius_for_fraction, write_png};
use lesion_detector::{ArtifactKind, LesionDetector, VisualizationRenderer};

const SIZE: usize = 256;

#[test]
fn artifacts_agree_with_the_mask() {
    let _ = env_logger::builder().is_test(true).try_init();
    let dir = tempfile::tempdir().expect("tmpdir");
    let r = radius_for_fraction(SIZE, SIZE, 0.02);
    let data = disk_u8(SIZE, SIZE, SIZE as f32 * 0.5, SIZE as f32 * 0.5, r);
    let input = write_png(dir.path(), "case.png", SIZE, SIZE, data);
    let out_dir = dir.path().join("results");

    let (result, set) = LesionDetector::default()
        .visualize(&input, &out_dir, "case")
        .expect("visualize");
    assert!(result.has_tumor);
    for kind in ArtifactKind::ALL {
        let path = set.path(kind);
        assert!(path.exists(), "missing {}", path.display());
        assert_eq!(
            path.file_name().unwrap().to_string_lossy(),
            format!("case_{}.png", kind.suffix())
        );
    }

    let original = image::open(&set.original).expect("original").to_rgb8();
    let overlay = image::open(&set.overlay).expect("overlay").to_rgb8();
    let mask = image::open(&set.mask).expect("mask").to_luma8();
    let panel = image::open(&set.panel).expect("panel").to_rgb8();
    assert_eq!(original.dimensions(), (SIZE as u32, SIZE as u32));
    assert_eq!(mask.dimensions(), original.dimensions());
    assert!(panel.width() > 3 * original.width());
    assert!(panel.height() > original.height());

    let mut marked = 0usize;
    for (x, y, m) in mask.enumerate_pixels() {
        let on = m.0[0] == 255;
        assert!(on || m.0[0] == 0, "mask must be binary");
        let differs = original.get_pixel(x, y) != overlay.get_pixel(x, y);
        assert_eq!(on, differs, "overlay/mask disagree at ({x}, {y})");
        marked += usize::from(on);
    }
    assert!(marked > 0);
}

#[test]
fn rendering_reuses_a_finished_run() {
    let dir = tempfile::tempdir().expect("tmpdir");
    let data = common::synthetic_image::uniform_u8(64, 48, 100);
    let input = write_png(dir.path(), "flat.png", 64, 48, data);
    let detector = LesionDetector::default();
    let output = detector.run(&input).expect("run");

    let set = VisualizationRenderer::default()
        .render_output(&output, dir.path(), "flat")
        .expect("render");
    let mask = image::open(&set.mask).expect("mask").to_luma8();
    assert_eq!(mask.dimensions(), (64, 48));
    assert!(mask.as_raw().iter().all(|&v| v == 0));
}
