//! Montage: several images arranged on one canvas in a grid.
//!
//! ## Cell policy
//!
//! Cells are uniform. Every image is first shrunk to fit `max_cell_width`
//! (never enlarged), then the cell size is the largest scaled width by the
//! largest scaled height across all inputs. Each image is centered in its
//! cell; unused space and trailing empty cells keep the white background.
//! Images are copied into their cells as they are, so translucent input
//! pixels stay translucent in an RGBA montage.
//!
//! With labels, every row gains a caption strip of [`label_height`] pixels
//! directly below its cells.
//!
//! Cell sizes follow the most extreme inputs, so a very wide image next to a
//! very tall one can ask for a canvas far larger than the inputs combined.
//! Canvases above [`MAX_CANVAS_PIXELS`] are rejected before allocation.

use super::draw::{self, GLYPH_SIZE};
use super::error::LayoutError;
use super::geometry::{montage_grid, span};
use super::raster::{PixelFormat, RasterImage};
use super::resize::{MAX_DIMENSION, shrink_to_width};
use image::{Rgba, RgbaImage};
use tracing::debug;

pub const MIN_IMAGES: usize = 2;
pub const MAX_IMAGES: usize = 25;
pub const MAX_SPACING: u32 = 256;
/// Largest canvas a montage may allocate, 256 MiB of RGBA.
pub const MAX_CANVAS_PIXELS: u64 = 64 * 1024 * 1024;

const BACKGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);
const LABEL_COLOR: Rgba<u8> = Rgba([0, 0, 0, 255]);
const LABEL_SCALE: u32 = 2;
const LABEL_PADDING: u32 = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MontageSpec {
    /// Fixed column count; derived from the image count when absent.
    pub columns: Option<u32>,
    /// Gap between neighbouring cells on both axes.
    pub spacing: u32,
    /// One caption per image, in input order.
    pub labels: Option<Vec<String>>,
    pub max_cell_width: u32,
}

impl Default for MontageSpec {
    fn default() -> Self {
        Self {
            columns: None,
            spacing: 10,
            labels: None,
            max_cell_width: 512,
        }
    }
}

impl MontageSpec {
    pub fn validate(&self, image_count: usize) -> Result<(), LayoutError> {
        if !(MIN_IMAGES..=MAX_IMAGES).contains(&image_count) {
            return Err(LayoutError::validation(format!(
                "A montage needs between {} and {} images, got {}",
                MIN_IMAGES, MAX_IMAGES, image_count
            )));
        }
        if self.columns == Some(0) {
            return Err(LayoutError::validation("columns must be a positive integer"));
        }
        if self.spacing > MAX_SPACING {
            return Err(LayoutError::validation(format!(
                "spacing must be at most {}, got {}",
                MAX_SPACING, self.spacing
            )));
        }
        if !(1..=MAX_DIMENSION).contains(&self.max_cell_width) {
            return Err(LayoutError::validation(format!(
                "max_cell_width must be between 1 and {}, got {}",
                MAX_DIMENSION, self.max_cell_width
            )));
        }
        if let Some(labels) = &self.labels {
            if labels.len() != image_count {
                return Err(LayoutError::validation(format!(
                    "Got {} labels for {} images; counts must match",
                    labels.len(),
                    image_count
                )));
            }
        }
        Ok(())
    }
}

/// A composed montage and the arrangement that produced it.
#[derive(Debug, Clone)]
pub struct LayoutResult {
    pub image: RasterImage,
    /// `"{columns}x{rows}"`.
    pub grid: String,
    pub columns: u32,
    pub rows: u32,
}

/// Height of the caption strip added below each row when labels are used.
pub fn label_height() -> u32 {
    GLYPH_SIZE * LABEL_SCALE + 2 * LABEL_PADDING
}

pub fn montage(images: &[RasterImage], spec: &MontageSpec) -> Result<LayoutResult, LayoutError> {
    spec.validate(images.len())?;

    let (columns, rows) = montage_grid(images.len() as u32, spec.columns);

    let cells = images
        .iter()
        .map(|image| shrink_to_width(image, spec.max_cell_width))
        .collect::<Result<Vec<_>, _>>()?;

    let cell_w = cells.iter().map(RgbaImage::width).max().unwrap_or(1);
    let cell_h = cells.iter().map(RgbaImage::height).max().unwrap_or(1);
    let caption_h = if spec.labels.is_some() { label_height() } else { 0 };
    let row_h = cell_h.saturating_add(caption_h);

    let (canvas_w, canvas_h) = canvas_size(
        span(columns, cell_w, spec.spacing),
        span(rows, row_h, spec.spacing),
    )?;
    debug!(
        "Montage of {} images: {}x{} grid, cell {}x{}, canvas {}x{}",
        images.len(),
        columns,
        rows,
        cell_w,
        cell_h,
        canvas_w,
        canvas_h
    );

    let mut canvas = RgbaImage::from_pixel(canvas_w, canvas_h, BACKGROUND);

    for (index, cell) in cells.iter().enumerate() {
        let index = index as u32;
        let cell_x = (index % columns) * (cell_w + spec.spacing);
        let cell_y = (index / columns) * (row_h + spec.spacing);

        let x = cell_x + (cell_w - cell.width()) / 2;
        let y = cell_y + (cell_h - cell.height()) / 2;
        draw::replace(&mut canvas, cell, i64::from(x), i64::from(y));

        if let Some(label) = spec.labels.as_ref().and_then(|l| l.get(index as usize)) {
            let text = draw::truncate_to_width(label, LABEL_SCALE, cell_w);
            let text_x = cell_x + (cell_w - draw::text_width(text, LABEL_SCALE)) / 2;
            let text_y = cell_y + cell_h + LABEL_PADDING;
            draw::draw_text(
                &mut canvas,
                i64::from(text_x),
                i64::from(text_y),
                text,
                LABEL_SCALE,
                LABEL_COLOR,
            );
        }
    }

    let format = if images.iter().any(|i| i.format() == PixelFormat::Rgba8) {
        PixelFormat::Rgba8
    } else {
        PixelFormat::Rgb8
    };

    Ok(LayoutResult {
        image: RasterImage::from_rgba(canvas, format)?,
        grid: format!("{}x{}", columns, rows),
        columns,
        rows,
    })
}

fn canvas_size(width: u64, height: u64) -> Result<(u32, u32), LayoutError> {
    let too_large = || {
        LayoutError::validation(format!(
            "Montage canvas of {}x{} exceeds the limit of {} pixels",
            width, height, MAX_CANVAS_PIXELS
        ))
    };
    if width.saturating_mul(height) > MAX_CANVAS_PIXELS {
        return Err(too_large());
    }
    Ok((
        u32::try_from(width).map_err(|_| too_large())?,
        u32::try_from(height).map_err(|_| too_large())?,
    ))
}
