//! Image decoding and encoding at the edge of the layout engine.
//!
//! Operations never touch encoded bytes: callers decode into a
//! [`RasterImage`] here and encode the result on the way out.

use super::error::LayoutError;
use super::raster::{PixelFormat, RasterImage};
use image::{ExtendedColorType, ImageFormat, ImageReader};
use std::io::Cursor;
use tracing::debug;

pub const DEFAULT_JPEG_QUALITY: u8 = 85;

/// Encoding applied to an output image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Png,
    Jpeg { quality: u8 },
    WebP,
}

impl OutputFormat {
    pub fn content_type(&self) -> &'static str {
        match self {
            OutputFormat::Png => "image/png",
            OutputFormat::Jpeg { .. } => "image/jpeg",
            OutputFormat::WebP => "image/webp",
        }
    }

    pub fn validate(&self) -> Result<(), LayoutError> {
        match self {
            OutputFormat::Jpeg { quality } if !(1..=100).contains(quality) => Err(
                LayoutError::validation(format!("quality must be between 1 and 100, got {}", quality)),
            ),
            _ => Ok(()),
        }
    }
}

// Decode an encoded image, refusing anything larger than `max_pixels`
// before its pixel data is allocated.
pub fn decode_image(bytes: &[u8], max_pixels: u64) -> Result<RasterImage, LayoutError> {
    let reader = || {
        ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| LayoutError::Decode(format!("Failed to read image data: {}", e)))
    };

    let format = reader()?.format();
    let (width, height) = reader()?.into_dimensions().map_err(|e| {
        LayoutError::Decode(format!(
            "Failed to auto-detect and decode image (format: {:?}): {}",
            format, e
        ))
    })?;

    let pixel_count = u64::from(width) * u64::from(height);
    if pixel_count > max_pixels {
        return Err(LayoutError::validation(format!(
            "Image is {}x{} ({} pixels), exceeding the limit of {} pixels",
            width, height, pixel_count, max_pixels
        )));
    }

    let dyn_img = reader()?.decode().map_err(|e| {
        LayoutError::Decode(format!(
            "Failed to decode image (format: {:?}): {}",
            format, e
        ))
    })?;

    debug!(
        "Decoded {:?} image: {}x{}, color: {:?}",
        format,
        width,
        height,
        dyn_img.color()
    );

    RasterImage::from_dynamic(dyn_img)
}

pub fn encode_image(image: &RasterImage, output_format: OutputFormat) -> Result<Vec<u8>, LayoutError> {
    output_format.validate()?;

    let (width, height) = image.dimensions();
    let color_type = match image.format() {
        PixelFormat::Rgb8 => ExtendedColorType::Rgb8,
        PixelFormat::Rgba8 => ExtendedColorType::Rgba8,
    };
    let mut buffer = Cursor::new(Vec::new());

    match output_format {
        OutputFormat::Png => {
            debug!("Encoding output as PNG.");

            image::write_buffer_with_format(
                &mut buffer,
                image.pixels(),
                width,
                height,
                color_type,
                ImageFormat::Png,
            )
            .map_err(|e| LayoutError::Internal(format!("PNG encoding failed: {}", e)))?;
        }
        OutputFormat::Jpeg { quality } => {
            debug!("Encoding output as JPEG (quality {}).", quality);

            // JPEG has no alpha channel; it is dropped
            let rgb;
            let pixels = match image.format() {
                PixelFormat::Rgb8 => image.pixels(),
                PixelFormat::Rgba8 => {
                    rgb = image.to_dynamic()?.to_rgb8();
                    rgb.as_raw().as_slice()
                }
            };

            let mut encoder =
                image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buffer, quality);
            encoder
                .encode(pixels, width, height, ExtendedColorType::Rgb8)
                .map_err(|e| LayoutError::Internal(format!("JPEG encoding failed: {}", e)))?;
        }
        OutputFormat::WebP => {
            debug!("Encoding output as lossless WebP.");

            image::codecs::webp::WebPEncoder::new_lossless(&mut buffer)
                .encode(image.pixels(), width, height, color_type)
                .map_err(|e| LayoutError::Internal(format!("WebP encoding failed: {}", e)))?;
        }
    }

    Ok(buffer.into_inner())
}
