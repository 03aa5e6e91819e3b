//! Native image backend, statically linked into the binary.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Identify | `image::image_dimensions` (header only) |
//! | Decode (JPEG) | `image` crate |
//! | Resize | `DynamicImage::resize_exact` with `Lanczos3` |
//! | Encode → JPEG | `jpeg-encoder` (quality, 4:2:0 subsampling, progressive) |

use super::backend::{BackendError, Dimensions, ImageBackend};
use super::params::{ChromaSampling, ConvertParams};
use image::imageops::FilterType;
use image::{DynamicImage, ImageReader};
use jpeg_encoder::{ColorType, Encoder, SamplingFactor};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

/// JPEG dimensions are stored as 16-bit values.
const MAX_JPEG_DIMENSION: u32 = u16::MAX as u32;

/// Backend built on the `image` and `jpeg-encoder` crates.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct NativeBackend;

impl NativeBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for NativeBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Load and decode an image from disk.
fn load_image(path: &Path) -> Result<DynamicImage, BackendError> {
    ImageReader::open(path)
        .map_err(BackendError::Io)?
        .decode()
        .map_err(|e| {
            BackendError::ProcessingFailed(format!("Failed to decode {}: {}", path.display(), e))
        })
}

fn sampling_factor(sampling: ChromaSampling) -> SamplingFactor {
    match sampling {
        ChromaSampling::Yuv420 => SamplingFactor::R_4_2_0,
    }
}

/// Encode RGB pixels as a baseline or progressive JPEG.
fn save_jpeg(img: &DynamicImage, params: &ConvertParams) -> Result<(), BackendError> {
    if img.width() > MAX_JPEG_DIMENSION || img.height() > MAX_JPEG_DIMENSION {
        return Err(BackendError::ProcessingFailed(format!(
            "{}x{} exceeds the JPEG size limit",
            img.width(),
            img.height()
        )));
    }

    let rgb = img.to_rgb8();
    let mut encoded = Vec::new();
    let mut encoder = Encoder::new(&mut encoded, params.quality.value() as u8);
    encoder.set_sampling_factor(sampling_factor(params.sampling));
    encoder.set_progressive(params.progressive);
    encoder
        .encode(
            rgb.as_raw(),
            rgb.width() as u16,
            rgb.height() as u16,
            ColorType::Rgb,
        )
        .map_err(|e| BackendError::ProcessingFailed(format!("JPEG encode failed: {}", e)))?;

    write_output(&params.output, &encoded)
}

/// Write an encoded image, removing the truncated file if the write fails.
///
/// Only regular files are removed; a device node given as output is left
/// in place.
fn write_output(path: &Path, bytes: &[u8]) -> Result<(), BackendError> {
    let mut file = File::create(path)?;
    if let Err(e) = file.write_all(bytes).and_then(|()| file.flush()) {
        drop(file);
        if fs::metadata(path).is_ok_and(|m| m.is_file()) {
            let _ = fs::remove_file(path);
        }
        return Err(BackendError::Io(e));
    }
    Ok(())
}

impl ImageBackend for NativeBackend {
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError> {
        let (width, height) = image::image_dimensions(path).map_err(|e| {
            BackendError::ProcessingFailed(format!("Failed to read dimensions: {}", e))
        })?;
        Ok(Dimensions { width, height })
    }

    fn convert(&self, params: &ConvertParams) -> Result<(), BackendError> {
        let img = load_image(&params.source)?;
        let resized = img.resize_exact(params.width, params.height, FilterType::Lanczos3);
        save_jpeg(&resized, params)
    }
}
