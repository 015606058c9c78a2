//! Diagnostic artifacts for human inspection.
//!
//! Four PNGs are written per run under fixed names:
//! `{base}_original.png`, `{base}_mask.png`, `{base}_overlay.png` and
//! `{base}_panel.png`. All four are pure functions of the processed slice
//! and its mask.

pub mod panel;

pub use panel::{compose_panel, PanelParams};

use crate::detector::{LesionDetector, PipelineOutput};
use crate::error::{PipelineError, PipelineResult};
use crate::image::io::{save_gray_png, save_rgb_png};
use crate::segment::BinaryMask;
use image::{GrayImage, Rgb, RgbImage};
use log::debug;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ArtifactKind {
    Original,
    Mask,
    Overlay,
    Panel,
}

impl ArtifactKind {
    /// All kinds in output order.
    pub const ALL: [ArtifactKind; 4] = [
        ArtifactKind::Original,
        ArtifactKind::Mask,
        ArtifactKind::Overlay,
        ArtifactKind::Panel,
    ];

    pub fn suffix(self) -> &'static str {
        match self {
            ArtifactKind::Original => "original",
            ArtifactKind::Mask => "mask",
            ArtifactKind::Overlay => "overlay",
            ArtifactKind::Panel => "panel",
        }
    }

    pub fn file_name(self, base_name: &str) -> String {
        format!("{base_name}_{}.png", self.suffix())
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct RenderParams {
    /// RGB colour painted over foreground mask pixels.
    pub highlight: [u8; 3],
    pub panel: PanelParams,
}

impl Default for RenderParams {
    fn default() -> Self {
        Self {
            highlight: [255, 0, 0],
            panel: PanelParams::default(),
        }
    }
}

/// In-memory artifacts before they are written.
#[derive(Clone, Debug)]
pub struct RenderedImages {
    pub original: RgbImage,
    pub mask: GrayImage,
    pub overlay: RgbImage,
    pub panel: RgbImage,
}

/// Paths of the four written artifacts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualizationSet {
    pub original: PathBuf,
    pub mask: PathBuf,
    pub overlay: PathBuf,
    pub panel: PathBuf,
}

impl VisualizationSet {
    /// Paths in the fixed order original, mask, overlay, panel.
    pub fn paths(&self) -> [&Path; 4] {
        [&self.original, &self.mask, &self.overlay, &self.panel]
    }

    pub fn path(&self, kind: ArtifactKind) -> &Path {
        match kind {
            ArtifactKind::Original => &self.original,
            ArtifactKind::Mask => &self.mask,
            ArtifactKind::Overlay => &self.overlay,
            ArtifactKind::Panel => &self.panel,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct VisualizationRenderer {
    params: RenderParams,
}

impl VisualizationRenderer {
    pub fn new(params: RenderParams) -> Self {
        Self { params }
    }

    /// Run `detector` on `path` and write the artifacts for its result.
    pub fn render(
        &self,
        detector: &LesionDetector,
        path: &Path,
        output_dir: &Path,
        base_name: &str,
    ) -> PipelineResult<VisualizationSet> {
        let output = detector.run(path)?;
        self.render_output(&output, output_dir, base_name)
    }

    /// Write the artifacts for an existing pipeline run without recomputing it.
    pub fn render_output(
        &self,
        output: &PipelineOutput,
        output_dir: &Path,
        base_name: &str,
    ) -> PipelineResult<VisualizationSet> {
        let slice = output.analyzed_slice()?;
        let images = self.render_images(slice, &output.mask)?;
        self.write(&images, output_dir, base_name)
    }

    /// Build the four images for `slice` and its mask.
    pub fn render_images(&self, slice: &GrayImage, mask: &BinaryMask) -> PipelineResult<RenderedImages> {
        let (w, h) = slice.dimensions();
        if (w as usize, h as usize) != (mask.width(), mask.height()) {
            return Err(PipelineError::processing(
                "render",
                format!(
                    "mask is {}x{}, slice is {w}x{h}",
                    mask.width(),
                    mask.height()
                ),
            ));
        }
        let original = gray_to_rgb(slice);
        let mut overlay = original.clone();
        let highlight = Rgb(self.params.highlight);
        for (x, y, px) in overlay.enumerate_pixels_mut() {
            if mask.get(x as usize, y as usize) == 1 {
                *px = highlight;
            }
        }
        let mask_img = mask.to_gray();
        let mask_rgb = gray_to_rgb(&mask_img);
        let panel = compose_panel(&[&original, &mask_rgb, &overlay], &self.params.panel);
        Ok(RenderedImages {
            original,
            mask: mask_img,
            overlay,
            panel,
        })
    }

    /// Write rendered images under `output_dir`; a failed write names its artifact.
    pub fn write(
        &self,
        images: &RenderedImages,
        output_dir: &Path,
        base_name: &str,
    ) -> PipelineResult<VisualizationSet> {
        std::fs::create_dir_all(output_dir)
            .map_err(|e| PipelineError::io(output_dir, format!("Failed to create directory: {e}")))?;
        let target = |kind: ArtifactKind| output_dir.join(kind.file_name(base_name));
        let set = VisualizationSet {
            original: target(ArtifactKind::Original),
            mask: target(ArtifactKind::Mask),
            overlay: target(ArtifactKind::Overlay),
            panel: target(ArtifactKind::Panel),
        };
        for kind in ArtifactKind::ALL {
            let path = set.path(kind);
            let written = match kind {
                ArtifactKind::Original => save_rgb_png(&images.original, path),
                ArtifactKind::Mask => save_gray_png(&images.mask, path),
                ArtifactKind::Overlay => save_rgb_png(&images.overlay, path),
                ArtifactKind::Panel => save_rgb_png(&images.panel, path),
            };
            written.map_err(|reason| PipelineError::Artifact {
                kind,
                path: path.to_path_buf(),
                reason,
            })?;
        }
        debug!(
            "VisualizationRenderer::write dir={} base={}",
            output_dir.display(),
            base_name
        );
        Ok(set)
    }
}

fn gray_to_rgb(gray: &GrayImage) -> RgbImage {
    RgbImage::from_fn(gray.width(), gray.height(), |x, y| {
        let v = gray.get_pixel(x, y).0[0];
        Rgb([v, v, v])
    })
}
