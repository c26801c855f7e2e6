//! Pixel codec: decode/encode abstraction over the `image` crate. Kept
//! as a thin wrapper rather than
//! calling `image::open`/`save` directly from the orchestrator so the
//! supported format list and the `original` passthrough policy live in one
//! place.

use std::path::Path;

use image::{ImageFormat, RgbImage};
use serde::{Deserialize, Serialize};

use crate::error::{ReleaseError, Result};

/// The pixel format a release's images are written in. `Original` keeps
/// whatever the source image decoded as rather than forcing a re-encode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Original,
    Jpeg,
    Png,
    Webp,
    Bmp,
    Tiff,
}

impl OutputFormat {
    fn image_format(self, source_format: ImageFormat) -> ImageFormat {
        match self {
            OutputFormat::Original => source_format,
            OutputFormat::Jpeg => ImageFormat::Jpeg,
            OutputFormat::Png => ImageFormat::Png,
            OutputFormat::Webp => ImageFormat::WebP,
            OutputFormat::Bmp => ImageFormat::Bmp,
            OutputFormat::Tiff => ImageFormat::Tiff,
        }
    }

    pub fn extension(self, source_format: ImageFormat) -> &'static str {
        match self.image_format(source_format) {
            ImageFormat::Jpeg => "jpg",
            ImageFormat::Png => "png",
            ImageFormat::WebP => "webp",
            ImageFormat::Bmp => "bmp",
            ImageFormat::Tiff => "tiff",
            _ => "bin",
        }
    }
}

/// Decodes an image file into an 8-bit RGB buffer, dropping any alpha
/// channel and color profile (neither is part of the data model).
/// Failures are `decode_failed`: the caller skips the image.
pub fn decode(path: &Path) -> Result<(RgbImage, ImageFormat)> {
    let bytes = std::fs::read(path)?;
    let format = ImageFormat::from_path(path).map_err(|e| ReleaseError::DecodeFailed {
        path: path.display().to_string(),
        source: e,
    })?;
    let img = image::load_from_memory_with_format(&bytes, format).map_err(|e| ReleaseError::DecodeFailed {
        path: path.display().to_string(),
        source: e,
    })?;
    Ok((img.to_rgb8(), format))
}

/// Encodes `img` to `bytes` in `format` (resolving `Original` against
/// `source_format`). Reuses `decode_failed` for the encode direction too —
/// the error taxonomy only distinguishes pixel-codec
/// failures from sink failures, not encode from decode.
pub fn encode(img: &RgbImage, format: OutputFormat, source_format: ImageFormat) -> Result<Vec<u8>> {
    let mut buf = std::io::Cursor::new(Vec::new());
    img.write_to(&mut buf, format.image_format(source_format))
        .map_err(|e| ReleaseError::DecodeFailed { path: "<in-memory>".to_string(), source: e })?;
    Ok(buf.into_inner())
}
