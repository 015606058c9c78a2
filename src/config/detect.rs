use crate::detector::DetectorParams;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Configuration of the `detect_demo` tool.
#[derive(Clone, Debug, Deserialize)]
pub struct DetectToolConfig {
    pub input: PathBuf,
    /// Directory receiving the four visualization PNGs.
    pub output_dir: PathBuf,
    /// Artifact prefix; defaults to the input file stem.
    #[serde(default)]
    pub base_name: Option<String>,
    /// Where to write the `DetectionReport`; printed to stdout when absent.
    #[serde(default)]
    pub report_json: Option<PathBuf>,
    #[serde(default)]
    pub params: DetectorParams,
}

impl DetectToolConfig {
    pub fn resolved_base_name(&self) -> String {
        self.base_name
            .clone()
            .unwrap_or_else(|| file_stem(&self.input))
    }
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "image".to_string())
}
