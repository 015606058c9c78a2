//! Boundary helpers for an upload-driven frontend.
//!
//! The HTTP layer itself is not part of this crate. These helpers cover what
//! it needs from the core: extension allow-listing, filename sanitizing,
//! artifact naming and the JSON contract of the analyze endpoint. A failed
//! run is answered with an [`ErrorResponse`], never with `hay_tumor: false`.

use crate::config::ServiceConfig;
use crate::error::{ErrorKind, PipelineError};
use crate::render::{ArtifactKind, VisualizationRenderer};
use crate::LesionDetector;
use log::{info, warn};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Success payload of the analyze endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AnalyzeResponse {
    /// Always `"procesado"`.
    pub resultado: String,
    pub hay_tumor: bool,
    /// Public URL of the first rendered artifact.
    pub imagen_marcada: String,
}

/// Payload returned for rejected or failed requests.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug)]
pub enum ServiceError {
    /// The upload was refused before any processing (name or extension).
    Rejected(String),
    /// Storing the upload failed.
    Storage { path: PathBuf, reason: String },
    /// The detection pipeline failed.
    Pipeline(PipelineError),
}

impl ServiceError {
    /// HTTP-style status a frontend should answer with.
    pub fn status_code(&self) -> u16 {
        match self {
            ServiceError::Rejected(_) => 400,
            ServiceError::Pipeline(err) if err.kind() == ErrorKind::Decode => 400,
            ServiceError::Storage { .. } | ServiceError::Pipeline(_) => 500,
        }
    }

    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            error: self.to_string(),
        }
    }
}

impl std::fmt::Display for ServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServiceError::Rejected(reason) => write!(f, "upload rejected: {reason}"),
            ServiceError::Storage { path, reason } => {
                write!(f, "failed to store upload {}: {reason}", path.display())
            }
            ServiceError::Pipeline(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for ServiceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ServiceError::Pipeline(err) => Some(err),
            _ => None,
        }
    }
}

impl From<PipelineError> for ServiceError {
    fn from(err: PipelineError) -> Self {
        ServiceError::Pipeline(err)
    }
}

/// True when `filename` has an extension from the allow-list (case-insensitive).
pub fn is_allowed(filename: &str, config: &ServiceConfig) -> bool {
    match filename.rsplit_once('.') {
        Some((_, ext)) => {
            let ext = ext.to_ascii_lowercase();
            config.allowed_extensions.iter().any(|a| a.eq_ignore_ascii_case(&ext))
        }
        None => false,
    }
}

/// Reduce an uploaded name to a safe, flat file name.
///
/// Path separators and whitespace become `_`, everything outside ASCII
/// alphanumerics, `.`, `-` and `_` is dropped, and leading or trailing dots
/// and underscores are stripped.
pub fn secure_filename(name: &str) -> Result<String, ServiceError> {
    let spaced: String = name
        .chars()
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();
    let joined = spaced.split_whitespace().collect::<Vec<_>>().join("_");
    let kept: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
        .collect();
    let trimmed = kept.trim_matches(|c| c == '.' || c == '_');
    if trimmed.is_empty() {
        return Err(ServiceError::Rejected(format!("unusable file name {name:?}")));
    }
    Ok(trimmed.to_string())
}

/// Artifact prefix for `filename`: its stem, optionally made unique.
pub fn base_name(filename: &str, unique: bool) -> String {
    let stem = match filename.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => filename,
    };
    if unique {
        format!("{stem}_{}", unique_token())
    } else {
        stem.to_string()
    }
}

fn unique_token() -> String {
    static COUNTER: AtomicU64 = AtomicU64::new(0);
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0);
    let seq = COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("{nanos:x}{:04x}", seq & 0xffff)
}

/// Store `source` in the upload folder, run detection once and render its
/// artifacts into the result folder.
pub fn analyze_upload(
    source: &Path,
    config: &ServiceConfig,
    detector: &LesionDetector,
) -> Result<AnalyzeResponse, ServiceError> {
    let original_name = source
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    if original_name.is_empty() {
        return Err(ServiceError::Rejected("empty file name".to_string()));
    }
    if !is_allowed(&original_name, config) {
        warn!("analyze_upload rejected {original_name}: extension not allowed");
        return Err(ServiceError::Rejected(format!(
            "file type not allowed: {original_name}"
        )));
    }
    let filename = secure_filename(&original_name)?;

    std::fs::create_dir_all(&config.upload_dir).map_err(|e| ServiceError::Storage {
        path: config.upload_dir.clone(),
        reason: e.to_string(),
    })?;
    let stored = config.upload_dir.join(&filename);
    if stored != source {
        std::fs::copy(source, &stored).map_err(|e| ServiceError::Storage {
            path: stored.clone(),
            reason: e.to_string(),
        })?;
    }

    let base = base_name(&filename, config.unique_names);
    let output = detector.run(&stored)?;
    let renderer = VisualizationRenderer::new(detector.params().render.clone());
    let set = renderer.render_output(&output, &config.result_dir, &base)?;

    let artifact = set
        .path(ArtifactKind::Original)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| ArtifactKind::Original.file_name(&base));
    let folder = config
        .result_dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let root = config.public_base_url.trim_end_matches('/');
    let imagen_marcada = if folder.is_empty() {
        format!("{root}/{artifact}")
    } else {
        format!("{root}/{folder}/{artifact}")
    };
    info!(
        "analyze_upload {} has_tumor={} artifact={}",
        filename, output.result.has_tumor, imagen_marcada
    );
    Ok(AnalyzeResponse {
        resultado: "procesado".to_string(),
        hay_tumor: output.result.has_tumor,
        imagen_marcada,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};

    fn config_in(root: &Path) -> ServiceConfig {
        ServiceConfig {
            upload_dir: root.join("uploads"),
            result_dir: root.join("results"),
            public_base_url: "http://host/static/".to_string(),
            ..ServiceConfig::default()
        }
    }

    #[test]
    fn allow_list_is_case_insensitive() {
        let cfg = ServiceConfig::default();
        assert!(is_allowed("scan.PNG", &cfg));
        assert!(is_allowed("a.b.dcm", &cfg));
        assert!(is_allowed("x.JpEg", &cfg));
        assert!(!is_allowed("scan.gif", &cfg));
        assert!(!is_allowed("png", &cfg));
    }

    #[test]
    fn secure_filename_flattens_and_strips() {
        assert_eq!(secure_filename("My cool scan.png").unwrap(), "My_cool_scan.png");
        assert_eq!(secure_filename("../../etc/passwd").unwrap(), "etc_passwd");
        assert_eq!(secure_filename("tümor(1).dcm").unwrap(), "tmor1.dcm");
        assert!(secure_filename("../..").is_err());
        assert!(secure_filename("").is_err());
    }

    #[test]
    fn base_name_uses_stem_and_optional_token() {
        assert_eq!(base_name("scan.final.png", false), "scan.final");
        assert_eq!(base_name("noext", false), "noext");
        let a = base_name("scan.png", true);
        let b = base_name("scan.png", true);
        assert!(a.starts_with("scan_"));
        assert_ne!(a, b);
    }

    #[test]
    fn rejected_extension_never_reaches_the_pipeline() {
        let dir = tempfile::tempdir().expect("tmpdir");
        let source = dir.path().join("scan.gif");
        std::fs::write(&source, b"GIF89a").unwrap();
        let err = analyze_upload(&source, &config_in(dir.path()), &LesionDetector::default())
            .unwrap_err();
        assert!(matches!(err, ServiceError::Rejected(_)));
        assert_eq!(err.status_code(), 400);
        assert!(!dir.path().join("uploads").exists());
    }

    #[test]
    fn undecodable_upload_is_an_error_response() {
        let dir = tempfile::tempdir().expect("tmpdir");
        let source = dir.path().join("broken.png");
        std::fs::write(&source, b"not a png").unwrap();
        let err = analyze_upload(&source, &config_in(dir.path()), &LesionDetector::default())
            .unwrap_err();
        assert!(matches!(err, ServiceError::Pipeline(_)));
        assert!(!err.to_response().error.is_empty());
    }

    #[test]
    fn successful_upload_points_at_first_artifact() {
        let dir = tempfile::tempdir().expect("tmpdir");
        let source = dir.path().join("flat scan.png");
        GrayImage::from_pixel(64, 64, Luma([128])).save(&source).unwrap();
        let cfg = config_in(dir.path());
        let resp = analyze_upload(&source, &cfg, &LesionDetector::default()).unwrap();
        assert_eq!(resp.resultado, "procesado");
        assert!(!resp.hay_tumor);
        assert_eq!(
            resp.imagen_marcada,
            "http://host/static/results/flat_scan_original.png"
        );
        assert!(cfg.upload_dir.join("flat_scan.png").exists());
        assert!(cfg.result_dir.join("flat_scan_panel.png").exists());
    }
}
