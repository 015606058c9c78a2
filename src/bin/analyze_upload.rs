use lesion_detector::config::{self, ServiceConfig};
use lesion_detector::service::analyze_upload;
use lesion_detector::LesionDetector;
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
    let mut args = env::args().skip(1);
    let (config_path, file) = match (args.next(), args.next()) {
        (Some(c), Some(f)) => (c, f),
        _ => return Err(usage()),
    };
    let config: ServiceConfig = config::load_json(Path::new(&config_path))?;
    let detector = LesionDetector::default();

    match analyze_upload(Path::new(&file), &config, &detector) {
        Ok(response) => {
            println!("{}", to_json(&response)?);
            Ok(())
        }
        Err(err) => {
            println!("{}", to_json(&err.to_response())?);
            Err(format!("status {}: {err}", err.status_code()))
        }
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|e| format!("Failed to serialize JSON: {e}"))
}

fn usage() -> String {
    "Usage: analyze_upload <service.json> <file>".to_string()
}
