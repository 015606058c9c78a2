use crate::segment::{ConnectedComponent, Rejection};
use serde::Serialize;

/// Per-component outcome of the area/band filter.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentReport {
    pub label: u32,
    pub area: usize,
    pub centroid: [f32; 2],
    pub kept: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection: Option<Rejection>,
}

impl ComponentReport {
    pub fn new(component: &ConnectedComponent, rejection: Option<Rejection>) -> Self {
        Self {
            label: component.label,
            area: component.area,
            centroid: [component.centroid.x, component.centroid.y],
            kept: rejection.is_none(),
            rejection,
        }
    }
}

/// Trace of the segmentation stage.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentationStage {
    pub slice_index: usize,
    /// Percentile value used as the binarization threshold.
    pub threshold: f32,
    pub foreground_before_opening: usize,
    pub foreground_after_opening: usize,
    pub min_area: usize,
    pub max_area: usize,
    pub mask_pixels: usize,
    pub components: Vec<ComponentReport>,
}
