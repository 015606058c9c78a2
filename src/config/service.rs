use serde::Deserialize;
use std::path::PathBuf;

/// Folder and URL layout of the upload boundary, passed in at startup.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Uploaded files are stored here before processing.
    pub upload_dir: PathBuf,
    /// Visualization artifacts are written here.
    pub result_dir: PathBuf,
    /// Lower-case extensions accepted for upload.
    pub allowed_extensions: Vec<String>,
    /// Prefix of artifact URLs returned to clients.
    pub public_base_url: String,
    /// Append a uniqueness token to artifact names so uploads never collide.
    pub unique_names: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            upload_dir: PathBuf::from("static/uploads"),
            result_dir: PathBuf::from("static/results"),
            allowed_extensions: ["png", "jpg", "jpeg", "dcm"]
                .iter()
                .map(|e| e.to_string())
                .collect(),
            public_base_url: "http://localhost:5000/static".to_string(),
            unique_names: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_allow_list() {
        let cfg: ServiceConfig =
            serde_json::from_str(r#"{ "result_dir": "/tmp/results", "unique_names": true }"#).unwrap();
        assert_eq!(cfg.result_dir, PathBuf::from("/tmp/results"));
        assert!(cfg.unique_names);
        assert_eq!(cfg.allowed_extensions, vec!["png", "jpg", "jpeg", "dcm"]);
    }
}
