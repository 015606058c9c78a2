use serde::Serialize;

/// Compact outcome of one detection run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DetectionResult {
    pub has_tumor: bool,
    /// `[width, height]` or `[width, height, depth]` of the processed volume.
    pub image_shape: Vec<usize>,
}
