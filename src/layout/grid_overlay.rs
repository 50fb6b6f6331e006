//! Labelled reference grid drawn over an image.
//!
//! The grid splits the image into `grid_size` columns (labelled A, B, C, …)
//! and `grid_size` rows (labelled 1, 2, 3, …), chess style, so a vision model
//! can refer to regions like "B3". Lines are black and blended at `alpha`.
//!
//! Without a margin the output keeps the input dimensions and labels sit on
//! small white plates just inside the top and left edges. With a margin the
//! image is placed on a white canvas grown by `margin` on every side; lines
//! run through the border and labels are drawn in it on all four sides.

use super::draw::{self, GLYPH_SIZE};
use super::error::LayoutError;
use super::geometry::{grid_boundaries, segment_centers};
use super::raster::RasterImage;
use image::{Rgb, Rgba, RgbaImage};

pub const MAX_GRID_SIZE: u32 = 26;
pub const MAX_MARGIN: u32 = 50;
/// Narrowest border that still holds a two-digit row label.
pub const MIN_MARGIN: u32 = 2 * GLYPH_SIZE;
pub const MAX_LINE_WIDTH: u32 = 10;

const LINE_COLOR: Rgb<u8> = Rgb([0, 0, 0]);
const LABEL_COLOR: Rgba<u8> = Rgba([80, 80, 80, 255]);
const BORDER_COLOR: Rgba<u8> = Rgba([255, 255, 255, 255]);
const LABEL_INSET: i64 = 2;
const PLATE_PADDING: u32 = 1;

#[derive(Debug, Clone, PartialEq)]
pub struct GridSpec {
    /// Cells per axis.
    pub grid_size: u32,
    /// Line opacity in `[0, 1]`.
    pub alpha: f32,
    /// Return the reading legend alongside the image.
    pub include_prompt: bool,
    /// White label border around the image, in pixels.
    pub margin: u32,
    pub line_width: u32,
}

impl Default for GridSpec {
    fn default() -> Self {
        Self {
            grid_size: 9,
            alpha: 0.3,
            include_prompt: false,
            margin: 0,
            line_width: 1,
        }
    }
}

impl GridSpec {
    pub fn validate(&self) -> Result<(), LayoutError> {
        if !(1..=MAX_GRID_SIZE).contains(&self.grid_size) {
            return Err(LayoutError::validation(format!(
                "grid_size must be between 1 and {}, got {}",
                MAX_GRID_SIZE, self.grid_size
            )));
        }
        if !(0.0..=1.0).contains(&self.alpha) {
            return Err(LayoutError::validation(format!(
                "alpha must be between 0 and 1, got {}",
                self.alpha
            )));
        }
        if self.margin != 0 && !(MIN_MARGIN..=MAX_MARGIN).contains(&self.margin) {
            return Err(LayoutError::validation(format!(
                "margin must be 0 or between {} and {}, got {}",
                MIN_MARGIN, MAX_MARGIN, self.margin
            )));
        }
        if !(1..=MAX_LINE_WIDTH).contains(&self.line_width) {
            return Err(LayoutError::validation(format!(
                "line_width must be between 1 and {}, got {}",
                MAX_LINE_WIDTH, self.line_width
            )));
        }
        Ok(())
    }
}

/// Reading legend for a grid, meant to be prepended to a vision-model prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridPrompt {
    pub prefix: String,
    pub ux_review: String,
}

const UX_FOCUS_AREAS: &[&str] = &[
    "Misaligned or inconsistently spaced elements",
    "Text truncation, overflow, or label issues",
    "Visual hierarchy problems",
    "Inconsistent padding or margins",
    "Accessibility concerns (contrast, touch target size)",
    "Broken or placeholder content",
];

impl GridPrompt {
    pub fn for_grid(grid_size: u32) -> Self {
        let last_column = column_label(grid_size.saturating_sub(1));
        let prefix = format!(
            "This screenshot has a reference grid overlay (NOT part of the UI).\n\
             The grid divides the image into a {n}x{n} matrix labeled A-{last_column} (columns) and 1-{n} (rows).\n\
             Use coordinates like \"A1\" or \"{last_column}{n}\" to reference specific locations.\n\
             Ignore the grid and white border when evaluating the UI design.\n\n",
            n = grid_size,
        );

        let checks = UX_FOCUS_AREAS
            .iter()
            .map(|area| format!("- {}", area))
            .collect::<Vec<_>>()
            .join("\n");

        let ux_review = format!(
            "{prefix}Review this app screenshot for UX issues. For each issue found:\n\
             1. State the grid coordinate (e.g., \"A1\")\n\
             2. Describe the problem\n\
             3. Suggest a fix\n\n\
             Check for:\n\
             {checks}\n\n\
             If no issues are found in a category, skip it. Be specific and actionable."
        );

        Self { prefix, ux_review }
    }
}

#[derive(Debug, Clone)]
pub struct GridOverlayOutput {
    pub image: RasterImage,
    pub prompt: Option<GridPrompt>,
}

/// Letter for a zero-based column index; only meaningful below 26.
pub fn column_label(index: u32) -> String {
    char::from(b'A' + (index % 26) as u8).to_string()
}

pub fn row_label(index: u32) -> String {
    (index + 1).to_string()
}

/// Draw the labelled grid over `image`. The output keeps the input's pixel
/// format.
pub fn grid_overlay(image: &RasterImage, spec: &GridSpec) -> Result<GridOverlayOutput, LayoutError> {
    spec.validate()?;

    let (width, height) = image.dimensions();
    let margin = spec.margin;
    let mut canvas = if margin > 0 {
        let mut canvas = RgbaImage::from_pixel(width + 2 * margin, height + 2 * margin, BORDER_COLOR);
        draw::replace(&mut canvas, &image.to_rgba()?, i64::from(margin), i64::from(margin));
        canvas
    } else {
        image.to_rgba()?
    };
    let (canvas_w, canvas_h) = canvas.dimensions();

    let xs = grid_boundaries(width, spec.grid_size);
    let ys = grid_boundaries(height, spec.grid_size);

    let mut mask = draw::new_mask(canvas_w, canvas_h);
    for &x in &xs {
        let x = line_start(margin + x, canvas_w, spec.line_width);
        draw::mark_rect(&mut mask, x, 0, spec.line_width, canvas_h);
    }
    for &y in &ys {
        let y = line_start(margin + y, canvas_h, spec.line_width);
        draw::mark_rect(&mut mask, 0, y, canvas_w, spec.line_width);
    }
    draw::blend_mask(&mut canvas, &mask, LINE_COLOR, spec.alpha);

    let column_centers: Vec<i64> = segment_centers(&xs)
        .into_iter()
        .map(|c| i64::from(margin + c))
        .collect();
    let row_centers: Vec<i64> = segment_centers(&ys)
        .into_iter()
        .map(|c| i64::from(margin + c))
        .collect();

    if margin > 0 {
        draw_border_labels(&mut canvas, &column_centers, &row_centers, margin, (width, height));
    } else {
        draw_inset_labels(&mut canvas, &column_centers, &row_centers);
    }

    Ok(GridOverlayOutput {
        image: RasterImage::from_rgba(canvas, image.format())?,
        prompt: spec
            .include_prompt
            .then(|| GridPrompt::for_grid(spec.grid_size)),
    })
}

// A boundary on the far edge still has to land on a visible pixel
fn line_start(position: u32, extent: u32, line_width: u32) -> i64 {
    i64::from(position.min(extent.saturating_sub(line_width)))
}

fn draw_border_labels(
    canvas: &mut RgbaImage,
    column_centers: &[i64],
    row_centers: &[i64],
    margin: u32,
    (width, height): (u32, u32),
) {
    let margin = i64::from(margin);
    let glyph = i64::from(GLYPH_SIZE);
    let band_offset = (margin - glyph) / 2;

    for (index, &center) in column_centers.iter().enumerate() {
        let label = column_label(index as u32);
        let x = center - i64::from(draw::text_width(&label, 1)) / 2;
        draw::draw_text(canvas, x, band_offset, &label, 1, LABEL_COLOR);
        draw::draw_text(canvas, x, margin + i64::from(height) + band_offset, &label, 1, LABEL_COLOR);
    }

    for (index, &center) in row_centers.iter().enumerate() {
        let label = row_label(index as u32);
        let label_w = i64::from(draw::text_width(&label, 1));
        let y = center - glyph / 2;
        draw::draw_text(canvas, (margin - label_w) / 2, y, &label, 1, LABEL_COLOR);
        draw::draw_text(
            canvas,
            margin + i64::from(width) + (margin - label_w) / 2,
            y,
            &label,
            1,
            LABEL_COLOR,
        );
    }
}

fn draw_inset_labels(canvas: &mut RgbaImage, column_centers: &[i64], row_centers: &[i64]) {
    let glyph = i64::from(GLYPH_SIZE);

    for (index, &center) in column_centers.iter().enumerate() {
        let label = column_label(index as u32);
        let x = center - i64::from(draw::text_width(&label, 1)) / 2;
        draw_plated_label(canvas, x, LABEL_INSET, &label);
    }

    for (index, &center) in row_centers.iter().enumerate() {
        let label = row_label(index as u32);
        draw_plated_label(canvas, LABEL_INSET, center - glyph / 2, &label);
    }
}

fn draw_plated_label(canvas: &mut RgbaImage, x: i64, y: i64, label: &str) {
    let padding = i64::from(PLATE_PADDING);
    draw::fill_rect(
        canvas,
        x - padding,
        y - padding,
        draw::text_width(label, 1) + 2 * PLATE_PADDING,
        GLYPH_SIZE + 2 * PLATE_PADDING,
        BORDER_COLOR,
    );
    draw::draw_text(canvas, x, y, label, 1, LABEL_COLOR);
}
