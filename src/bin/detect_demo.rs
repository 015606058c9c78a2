use lesion_detector::config::{self, DetectToolConfig};
use lesion_detector::image::io::write_json_file;
use lesion_detector::{LesionDetector, VisualizationRenderer};
use std::env;
use std::path::Path;

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let config_path = env::args().nth(1).ok_or_else(usage)?;
    let config: DetectToolConfig = config::load_json(Path::new(&config_path))?;

    let detector = LesionDetector::new(config.params.clone());
    let output = detector.run(&config.input).map_err(|e| e.to_string())?;

    let base = config.resolved_base_name();
    let renderer = VisualizationRenderer::new(config.params.render.clone());
    let artifacts = renderer
        .render_output(&output, &config.output_dir, &base)
        .map_err(|e| e.to_string())?;

    let report = output.report();
    println!("Detection summary");
    println!("  has_tumor: {}", report.result.has_tumor);
    println!("  image_shape: {:?}", report.result.image_shape);
    println!("  slice: {}", report.trace.segmentation.slice_index);
    println!("  tumor_ratio: {:.5}", report.trace.analysis.tumor_ratio);
    println!("  std_intensity: {:.3}", report.trace.analysis.std_intensity);
    println!("  total_ms: {:.3}", report.trace.timings.total_ms);
    for path in artifacts.paths() {
        println!("  artifact: {}", path.display());
    }

    match &config.report_json {
        Some(path) => {
            write_json_file(path, &report)?;
            println!("JSON report written to {}", path.display());
        }
        None => {
            let json = serde_json::to_string_pretty(&report)
                .map_err(|e| format!("Failed to serialize JSON: {e}"))?;
            println!("\nJSON report:\n{json}");
        }
    }
    Ok(())
}

fn usage() -> String {
    "Usage: detect_demo <config.json>".to_string()
}
