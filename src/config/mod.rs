//! JSON configuration files for the command-line tools and the upload boundary.

pub mod detect;
pub mod service;

pub use detect::DetectToolConfig;
pub use service::ServiceConfig;

use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;

/// Read and deserialize a JSON configuration file.
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T, String> {
    let data = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    serde_json::from_str(&data)
        .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn reports_missing_and_malformed_files() {
        let err = load_json::<ServiceConfig>(Path::new("/no/such/config.json")).unwrap_err();
        assert!(err.starts_with("Failed to read config"));

        let mut file = tempfile::NamedTempFile::new().expect("tmpfile");
        write!(file, "{{ not json").unwrap();
        let err = load_json::<ServiceConfig>(file.path()).unwrap_err();
        assert!(err.starts_with("Failed to parse config"));
    }
}
