//! Aspect-ratio-preserving resize.
//!
//! The default policy never upscales: an image already inside the requested
//! bound is passed through untouched, so re-running a resize only re-encodes.

use super::codec::OutputFormat;
use super::error::LayoutError;
use super::geometry::{fit_height, fit_width, fit_within};
use super::raster::RasterImage;
use image::imageops::{self, FilterType};
use tracing::debug;

pub const MAX_DIMENSION: u32 = 4096;

/// How the output dimensions are derived from the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeTarget {
    /// Bound the longer edge, preserving aspect ratio.
    MaxDimension(u32),
    /// Fixed width, height follows the aspect ratio.
    Width(u32),
    /// Fixed height, width follows the aspect ratio.
    Height(u32),
    /// Exact output size; aspect ratio and upscale policy are ignored.
    Exact { width: u32, height: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeSpec {
    pub target: ResizeTarget,
    pub allow_upscale: bool,
    pub output_format: OutputFormat,
}

impl ResizeSpec {
    pub fn validate(&self) -> Result<(), LayoutError> {
        let dimensions = match self.target {
            ResizeTarget::MaxDimension(n) => vec![("max_dimension", n)],
            ResizeTarget::Width(n) => vec![("width", n)],
            ResizeTarget::Height(n) => vec![("height", n)],
            ResizeTarget::Exact { width, height } => vec![("width", width), ("height", height)],
        };

        for (name, value) in dimensions {
            if !(1..=MAX_DIMENSION).contains(&value) {
                return Err(LayoutError::validation(format!(
                    "{} must be between 1 and {}, got {}",
                    name, MAX_DIMENSION, value
                )));
            }
        }

        self.output_format.validate()
    }

    /// Output dimensions for a source of the given size.
    pub fn target_dimensions(&self, source: (u32, u32)) -> (u32, u32) {
        match self.target {
            ResizeTarget::MaxDimension(n) => fit_within(source, n, self.allow_upscale),
            ResizeTarget::Width(n) => fit_width(source, n, self.allow_upscale),
            ResizeTarget::Height(n) => fit_height(source, n, self.allow_upscale),
            ResizeTarget::Exact { width, height } => (width, height),
        }
    }
}

/// Resample `image` with Lanczos3 to the dimensions `spec` derives from it.
///
/// When the dimensions do not change the input is returned as is.
pub fn resize(image: &RasterImage, spec: &ResizeSpec) -> Result<RasterImage, LayoutError> {
    spec.validate()?;

    let source = image.dimensions();
    let (width, height) = spec.target_dimensions(source);
    if (width, height) == source {
        debug!("Resize is a passthrough at {}x{}", width, height);
        return Ok(image.clone());
    }

    debug!(
        "Resizing {}x{} to {}x{}",
        source.0, source.1, width, height
    );
    let resized = imageops::resize(&image.to_rgba()?, width, height, FilterType::Lanczos3);
    RasterImage::from_rgba(resized, image.format())
}

/// Scale `image` down so it is at most `max_width` wide, never upscaling.
pub(crate) fn shrink_to_width(image: &RasterImage, max_width: u32) -> Result<image::RgbaImage, LayoutError> {
    let (width, height) = fit_width(image.dimensions(), max_width, false);
    let rgba = image.to_rgba()?;
    if (width, height) == rgba.dimensions() {
        return Ok(rgba);
    }
    Ok(imageops::resize(&rgba, width, height, FilterType::Lanczos3))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::raster::PixelFormat;

    fn solid(width: u32, height: u32, format: PixelFormat) -> RasterImage {
        let pixels = match format {
            PixelFormat::Rgb8 => [200, 100, 50].repeat((width * height) as usize),
            PixelFormat::Rgba8 => [200, 100, 50, 255].repeat((width * height) as usize),
        };
        RasterImage::from_raw(width, height, format, pixels).unwrap()
    }

    fn max_spec(n: u32, output_format: OutputFormat) -> ResizeSpec {
        ResizeSpec {
            target: ResizeTarget::MaxDimension(n),
            allow_upscale: false,
            output_format,
        }
    }

    fn png_max(n: u32) -> ResizeSpec {
        max_spec(n, OutputFormat::Png)
    }

    #[test]
    fn shrinks_longer_edge_to_bound() {
        let output = resize(&solid(400, 200, PixelFormat::Rgb8), &png_max(100)).unwrap();
        assert_eq!(output.dimensions(), (100, 50));
        assert_eq!(output.format(), PixelFormat::Rgb8);
    }

    #[test]
    fn never_upscales_by_default() {
        let image = solid(120, 80, PixelFormat::Rgba8);
        let output = resize(&image, &png_max(1000)).unwrap();
        assert_eq!(output, image);
    }

    #[test]
    fn exact_bound_is_passthrough() {
        let image = solid(256, 128, PixelFormat::Rgb8);
        let output = resize(&image, &png_max(256)).unwrap();
        assert_eq!(output, image);
    }

    #[test]
    fn upscales_when_allowed() {
        let spec = ResizeSpec {
            allow_upscale: true,
            ..png_max(240)
        };
        let output = resize(&solid(120, 80, PixelFormat::Rgb8), &spec).unwrap();
        assert_eq!(output.dimensions(), (240, 160));
    }

    #[test]
    fn quality_change_only_keeps_dimensions() {
        let image = solid(64, 48, PixelFormat::Rgb8);
        let spec = max_spec(64, OutputFormat::Jpeg { quality: 40 });
        let output = resize(&image, &spec).unwrap();
        assert_eq!(output.dimensions(), (64, 48));
        assert_eq!(output.pixels(), image.pixels());
    }

    #[test]
    fn preserves_aspect_ratio() {
        for (w, h) in [(640, 480), (480, 640), (333, 101), (1000, 999)] {
            let output = resize(&solid(w, h, PixelFormat::Rgb8), &png_max(97)).unwrap();
            let (ow, oh) = output.dimensions();
            let input_ratio = w as f64 / h as f64;
            let output_ratio = ow as f64 / oh as f64;
            assert!(
                (input_ratio - output_ratio).abs() < 0.05 * input_ratio.max(1.0),
                "{w}x{h} → {ow}x{oh}"
            );
        }
    }

    #[test]
    fn resampling_keeps_solid_color() {
        let output = resize(&solid(50, 50, PixelFormat::Rgb8), &png_max(10)).unwrap();
        let expected = [200u8, 100, 50];
        for (got, want) in output.pixels()[..3].iter().zip(expected) {
            assert!(got.abs_diff(want) <= 1, "{got} vs {want}");
        }
    }

    #[test]
    fn width_and_height_targets() {
        let image = solid(400, 300, PixelFormat::Rgb8);

        let by_width = ResizeSpec {
            target: ResizeTarget::Width(200),
            ..png_max(1)
        };
        assert_eq!(resize(&image, &by_width).unwrap().dimensions(), (200, 150));

        let by_height = ResizeSpec {
            target: ResizeTarget::Height(60),
            ..png_max(1)
        };
        assert_eq!(resize(&image, &by_height).unwrap().dimensions(), (80, 60));
    }

    #[test]
    fn exact_target_ignores_aspect_and_upscale_policy() {
        let spec = ResizeSpec {
            target: ResizeTarget::Exact {
                width: 500,
                height: 20,
            },
            ..png_max(1)
        };
        let output = resize(&solid(100, 100, PixelFormat::Rgb8), &spec).unwrap();
        assert_eq!(output.dimensions(), (500, 20));
    }

    #[test]
    fn rejects_zero_and_oversized_dimensions() {
        let image = solid(10, 10, PixelFormat::Rgb8);
        for spec in [
            png_max(0),
            png_max(MAX_DIMENSION + 1),
            ResizeSpec {
                target: ResizeTarget::Exact {
                    width: 10,
                    height: 0,
                },
                ..png_max(1)
            },
        ] {
            let err = resize(&image, &spec).unwrap_err();
            assert!(matches!(err, LayoutError::Validation(_)), "{spec:?}");
        }
    }

    #[test]
    fn rejects_bad_jpeg_quality() {
        let spec = max_spec(100, OutputFormat::Jpeg { quality: 0 });
        assert!(matches!(spec.validate(), Err(LayoutError::Validation(_))));
    }

    #[test]
    fn shrink_to_width_never_upscales() {
        let image = solid(30, 20, PixelFormat::Rgb8);
        assert_eq!(shrink_to_width(&image, 100).unwrap().dimensions(), (30, 20));
        assert_eq!(shrink_to_width(&image, 15).unwrap().dimensions(), (15, 10));
    }
}
