use lesion_detector::image::{ImageF32, Volume};
use lesion_detector::LesionDetector;

fn main() {
    // Demo stub: a synthetic slice with a bright central blob
    let (w, h) = (256usize, 256usize);
    let (cx, cy, r) = (w as f32 / 2.0, h as f32 / 2.0, 20.0f32);
    let mut slice = ImageF32::new(w, h);
    for y in 0..h {
        for x in 0..w {
            let d = ((x as f32 - cx).powi(2) + (y as f32 - cy).powi(2)).sqrt();
            let v = if d <= r { 255.0 - 175.0 * d / r } else { 30.0 };
            slice.set(x, y, v);
        }
    }

    let det = LesionDetector::default();
    match det.run_volume(&Volume::Slice(slice)) {
        Ok(out) => println!(
            "has_tumor={} ratio={:.4} std={:.2}",
            out.result.has_tumor, out.analysis.tumor_ratio, out.analysis.std_intensity
        ),
        Err(err) => {
            eprintln!("Error: {err}");
            std::process::exit(1);
        }
    }
}
