//! In-memory raster image passed in and out of every layout operation.

use super::error::LayoutError;
use image::{DynamicImage, RgbImage, RgbaImage};

/// Channel layout of a [`RasterImage`] buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    Rgb8,
    Rgba8,
}

impl PixelFormat {
    pub fn channels(self) -> usize {
        match self {
            PixelFormat::Rgb8 => 3,
            PixelFormat::Rgba8 => 4,
        }
    }
}

/// Owned, tightly packed 8-bit pixel buffer.
///
/// Width and height are always positive and the buffer always holds exactly
/// `width * height * channels` bytes; the constructors enforce both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    width: u32,
    height: u32,
    format: PixelFormat,
    pixels: Vec<u8>,
}

impl RasterImage {
    pub fn from_raw(
        width: u32,
        height: u32,
        format: PixelFormat,
        pixels: Vec<u8>,
    ) -> Result<Self, LayoutError> {
        if width == 0 || height == 0 {
            return Err(LayoutError::Decode(format!(
                "Image dimensions must be positive, got {}x{}",
                width, height
            )));
        }

        let expected = width as usize * height as usize * format.channels();
        if pixels.len() != expected {
            return Err(LayoutError::Decode(format!(
                "Pixel buffer holds {} bytes, expected {} for {}x{} {:?}",
                pixels.len(),
                expected,
                width,
                height,
                format
            )));
        }

        Ok(Self {
            width,
            height,
            format,
            pixels,
        })
    }

    /// Converts a decoded image, keeping an alpha channel only when the
    /// source has one.
    pub fn from_dynamic(image: DynamicImage) -> Result<Self, LayoutError> {
        let (width, height) = (image.width(), image.height());
        if image.color().has_alpha() {
            Self::from_raw(width, height, PixelFormat::Rgba8, image.to_rgba8().into_raw())
        } else {
            Self::from_raw(width, height, PixelFormat::Rgb8, image.to_rgb8().into_raw())
        }
    }

    /// Converts a working RGBA buffer back into the requested layout.
    pub(crate) fn from_rgba(image: RgbaImage, format: PixelFormat) -> Result<Self, LayoutError> {
        let (width, height) = image.dimensions();
        match format {
            PixelFormat::Rgba8 => Self::from_raw(width, height, format, image.into_raw()),
            PixelFormat::Rgb8 => {
                let rgb = DynamicImage::ImageRgba8(image).to_rgb8();
                Self::from_raw(width, height, format, rgb.into_raw())
            }
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn to_dynamic(&self) -> Result<DynamicImage, LayoutError> {
        let image = match self.format {
            PixelFormat::Rgb8 => RgbImage::from_raw(self.width, self.height, self.pixels.clone())
                .map(DynamicImage::ImageRgb8),
            PixelFormat::Rgba8 => {
                RgbaImage::from_raw(self.width, self.height, self.pixels.clone())
                    .map(DynamicImage::ImageRgba8)
            }
        };

        image.ok_or_else(|| {
            LayoutError::Internal(format!(
                "Pixel buffer does not fit a {}x{} {:?} image",
                self.width, self.height, self.format
            ))
        })
    }

    /// Working copy in RGBA, the layout every drawing primitive operates on.
    pub(crate) fn to_rgba(&self) -> Result<RgbaImage, LayoutError> {
        match self.format {
            PixelFormat::Rgba8 => RgbaImage::from_raw(self.width, self.height, self.pixels.clone())
                .ok_or_else(|| {
                    LayoutError::Internal(format!(
                        "Pixel buffer does not fit a {}x{} RGBA image",
                        self.width, self.height
                    ))
                }),
            PixelFormat::Rgb8 => Ok(self.to_dynamic()?.to_rgba8()),
        }
    }
}
