//! Decode an input file into a [`RawVolume`].
//!
//! Dispatch is by extension: `.dcm`/`.dicom` files are read through the
//! DICOM toolkit with every frame becoming one slice (modality LUT applied,
//! original precision kept as f32); anything else goes through the raster
//! decoder as a single grayscale slice. No resizing or cropping happens here.
use crate::error::{PipelineError, PipelineResult};
use crate::image::io::load_grayscale_image;
use crate::image::{ImageF32, RawVolume, Volume};
use dicom::object::open_file;
use dicom::pixeldata::{DecodedPixelData, PixelDecoder};
use log::debug;
use serde::Serialize;
use std::path::Path;

/// Extensions routed to the volumetric (DICOM) decoder.
pub const VOLUMETRIC_EXTENSIONS: &[&str] = &["dcm", "dicom"];

/// Source format chosen from the file extension.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SourceFormat {
    Dicom,
    Raster,
}

impl SourceFormat {
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext {
            Some(ext) if VOLUMETRIC_EXTENSIONS.contains(&ext.as_str()) => SourceFormat::Dicom,
            _ => SourceFormat::Raster,
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct ImageLoader;

impl ImageLoader {
    pub fn new() -> Self {
        Self
    }

    /// Read `path` into a raw volume.
    pub fn load(&self, path: &Path) -> PipelineResult<RawVolume> {
        let format = SourceFormat::from_path(path);
        let volume = match format {
            SourceFormat::Dicom => load_dicom(path)?,
            SourceFormat::Raster => {
                let gray =
                    load_grayscale_image(path).map_err(|reason| PipelineError::decode(path, reason))?;
                Volume::from_slices(vec![ImageF32::from_gray(&gray)])
                    .map_err(|e| PipelineError::decode(path, e.to_string()))?
            }
        };
        debug!(
            "ImageLoader::load {} format={:?} shape={:?}",
            path.display(),
            format,
            volume.shape()
        );
        Ok(volume)
    }
}

fn load_dicom(path: &Path) -> PipelineResult<RawVolume> {
    let object = open_file(path).map_err(|e| PipelineError::decode(path, e.to_string()))?;
    let decoded = object
        .decode_pixel_data()
        .map_err(|e| PipelineError::decode(path, format!("Failed to decode pixel data: {e}")))?;

    let frames = decoded.number_of_frames();
    if frames == 0 {
        return Err(PipelineError::decode(path, "DICOM object has no frames"));
    }
    let slices = (0..frames)
        .map(|frame| frame_to_plane(&decoded, frame))
        .collect::<Result<Vec<_>, String>>()
        .map_err(|reason| PipelineError::decode(path, reason))?;
    Volume::from_slices(slices).map_err(|e| PipelineError::decode(path, e.to_string()))
}

fn frame_to_plane(decoded: &DecodedPixelData<'_>, frame: u32) -> Result<ImageF32, String> {
    let width = decoded.columns() as usize;
    let height = decoded.rows() as usize;

    if decoded.samples_per_pixel() != 1 {
        // Colour DICOM: reduce to luminance like any other raster input.
        let gray = decoded
            .to_dynamic_image(frame)
            .map_err(|err| format!("Failed to convert frame {frame}: {err}"))?
            .into_luma8();
        return Ok(ImageF32::from_gray(&gray));
    }

    let samples = decoded
        .to_vec_frame::<f32>(frame)
        .map_err(|err| format!("Failed to materialize frame {frame}: {err}"))?;
    ImageF32::from_vec(width, height, samples).ok_or_else(|| {
        format!("Frame {frame} does not match {width}x{height} pixel grid")
    })
}
