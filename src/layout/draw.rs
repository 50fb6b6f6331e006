//! Drawing primitives shared by the grid overlay and the montage.
//!
//! Everything operates on an RGBA working buffer. Rectangles go through
//! `imageproc`, text uses the `font8x8` bitmap glyphs so rendering is fully
//! deterministic and needs no font files at runtime.

use font8x8::{BASIC_FONTS, UnicodeFonts};
use image::{GrayImage, Luma, Rgb, Rgba, RgbaImage, imageops};
use imageproc::{drawing::draw_filled_rect_mut, rect::Rect};

/// Edge length of one unscaled glyph cell.
pub const GLYPH_SIZE: u32 = 8;

const MASK_ON: Luma<u8> = Luma([255]);

/// Fill a rectangle, clipped to the canvas. Empty rectangles are ignored.
pub fn fill_rect(canvas: &mut RgbaImage, x: i64, y: i64, width: u32, height: u32, color: Rgba<u8>) {
    if let Some(rect) = clipped_rect(canvas.dimensions(), x, y, width, height) {
        draw_filled_rect_mut(canvas, rect, color);
    }
}

/// Blank mask matching a canvas, for shapes that must be blended exactly once.
pub fn new_mask(width: u32, height: u32) -> GrayImage {
    GrayImage::new(width, height)
}

pub fn mark_rect(mask: &mut GrayImage, x: i64, y: i64, width: u32, height: u32) {
    if let Some(rect) = clipped_rect(mask.dimensions(), x, y, width, height) {
        draw_filled_rect_mut(mask, rect, MASK_ON);
    }
}

/// Blend `color` over every masked pixel: `out = alpha*color + (1-alpha)*in`.
///
/// Only the color channels are blended; the alpha channel is left as is.
pub fn blend_mask(canvas: &mut RgbaImage, mask: &GrayImage, color: Rgb<u8>, alpha: f32) {
    for (pixel, marked) in canvas.pixels_mut().zip(mask.pixels()) {
        if marked.0[0] == 0 {
            continue;
        }
        for channel in 0..3 {
            let blended =
                alpha * f32::from(color.0[channel]) + (1.0 - alpha) * f32::from(pixel.0[channel]);
            pixel.0[channel] = blended.round().clamp(0.0, 255.0) as u8;
        }
    }
}

/// Copy `image` onto `canvas` with its top-left corner at `(x, y)`.
///
/// Pixels are written as they are, alpha included; nothing is composited
/// with what lies underneath.
pub fn replace(canvas: &mut RgbaImage, image: &RgbaImage, x: i64, y: i64) {
    imageops::replace(canvas, image, x, y);
}

/// Rendered width of `text` at the given integer scale.
pub fn text_width(text: &str, scale: u32) -> u32 {
    text.chars().count() as u32 * GLYPH_SIZE * scale
}

/// Longest prefix of `text` that renders within `max_width` pixels.
pub fn truncate_to_width(text: &str, scale: u32, max_width: u32) -> &str {
    let max_chars = (max_width / (GLYPH_SIZE * scale).max(1)) as usize;
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

/// Draw `text` with its top-left corner at `(x, y)`, clipped to the canvas.
///
/// Characters without a glyph in the basic Latin table are drawn as `?`.
pub fn draw_text(canvas: &mut RgbaImage, x: i64, y: i64, text: &str, scale: u32, color: Rgba<u8>) {
    let scale = scale.max(1);
    let (canvas_w, canvas_h) = canvas.dimensions();
    let advance = i64::from(GLYPH_SIZE * scale);

    for (index, ch) in text.chars().enumerate() {
        let Some(glyph) = BASIC_FONTS.get(ch).or_else(|| BASIC_FONTS.get('?')) else {
            continue;
        };
        let origin_x = x + index as i64 * advance;

        for (row, &bits) in glyph.iter().enumerate() {
            for col in 0..GLYPH_SIZE {
                // Least significant bit is the leftmost pixel
                if (bits >> col) & 1 == 0 {
                    continue;
                }
                let px = origin_x + i64::from(col * scale);
                let py = y + row as i64 * i64::from(scale);
                for dy in 0..i64::from(scale) {
                    for dx in 0..i64::from(scale) {
                        let (tx, ty) = (px + dx, py + dy);
                        if tx >= 0 && ty >= 0 && tx < i64::from(canvas_w) && ty < i64::from(canvas_h) {
                            canvas.put_pixel(tx as u32, ty as u32, color);
                        }
                    }
                }
            }
        }
    }
}

fn clipped_rect(bounds: (u32, u32), x: i64, y: i64, width: u32, height: u32) -> Option<Rect> {
    let (bound_w, bound_h) = (i64::from(bounds.0), i64::from(bounds.1));
    let left = x.max(0);
    let top = y.max(0);
    let right = (x + i64::from(width)).min(bound_w);
    let bottom = (y + i64::from(height)).min(bound_h);

    if right <= left || bottom <= top {
        return None;
    }

    Some(Rect::at(left as i32, top as i32).of_size((right - left) as u32, (bottom - top) as u32))
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
    const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

    #[test]
    fn fill_rect_clips_to_canvas() {
        let mut canvas = RgbaImage::from_pixel(4, 4, WHITE);
        fill_rect(&mut canvas, -2, 2, 4, 10, BLACK);

        assert_eq!(canvas.get_pixel(0, 2), &BLACK);
        assert_eq!(canvas.get_pixel(1, 3), &BLACK);
        assert_eq!(canvas.get_pixel(2, 2), &WHITE);
        assert_eq!(canvas.get_pixel(0, 1), &WHITE);
    }

    #[test]
    fn fill_rect_outside_canvas_is_noop() {
        let mut canvas = RgbaImage::from_pixel(4, 4, WHITE);
        fill_rect(&mut canvas, 10, 10, 5, 5, BLACK);
        fill_rect(&mut canvas, 0, 0, 0, 5, BLACK);
        assert!(canvas.pixels().all(|p| *p == WHITE));
    }

    #[test]
    fn blend_mask_applies_once_per_pixel() {
        let mut canvas = RgbaImage::from_pixel(3, 3, Rgba([255, 255, 255, 200]));
        let mut mask = new_mask(3, 3);
        // Overlapping marks must not compound
        mark_rect(&mut mask, 1, 0, 1, 3);
        mark_rect(&mut mask, 0, 1, 3, 1);

        blend_mask(&mut canvas, &mask, Rgb([0, 0, 0]), 0.5);

        assert_eq!(canvas.get_pixel(1, 1), &Rgba([128, 128, 128, 200]));
        assert_eq!(canvas.get_pixel(1, 0), &Rgba([128, 128, 128, 200]));
        assert_eq!(canvas.get_pixel(0, 0), &Rgba([255, 255, 255, 200]));
    }

    #[test]
    fn blend_mask_full_alpha_replaces_color() {
        let mut canvas = RgbaImage::from_pixel(1, 1, Rgba([12, 34, 56, 255]));
        let mut mask = new_mask(1, 1);
        mark_rect(&mut mask, 0, 0, 1, 1);
        blend_mask(&mut canvas, &mask, Rgb([0, 0, 0]), 1.0);
        assert_eq!(canvas.get_pixel(0, 0), &BLACK);
    }

    #[test]
    fn text_width_counts_chars() {
        assert_eq!(text_width("A", 1), 8);
        assert_eq!(text_width("26", 2), 32);
        assert_eq!(text_width("", 3), 0);
    }

    #[test]
    fn truncate_keeps_whole_chars() {
        assert_eq!(truncate_to_width("montage", 1, 24), "mon");
        assert_eq!(truncate_to_width("ab", 1, 100), "ab");
        assert_eq!(truncate_to_width("äbc", 1, 8), "ä");
    }

    #[test]
    fn draw_text_marks_pixels_inside_glyph_cell() {
        let mut canvas = RgbaImage::from_pixel(20, 10, WHITE);
        draw_text(&mut canvas, 1, 1, "A", 1, BLACK);

        let inked: Vec<(u32, u32)> = canvas
            .enumerate_pixels()
            .filter(|(_, _, p)| **p == BLACK)
            .map(|(x, y, _)| (x, y))
            .collect();

        assert!(!inked.is_empty());
        assert!(inked.iter().all(|&(x, y)| (1..9).contains(&x) && (1..9).contains(&y)));
    }

    #[test]
    fn draw_text_scales_glyphs() {
        let mut small = RgbaImage::from_pixel(40, 40, WHITE);
        let mut large = RgbaImage::from_pixel(40, 40, WHITE);
        draw_text(&mut small, 0, 0, "1", 1, BLACK);
        draw_text(&mut large, 0, 0, "1", 2, BLACK);

        let count = |img: &RgbaImage| img.pixels().filter(|p| **p == BLACK).count();
        assert_eq!(count(&large), count(&small) * 4);
    }

    #[test]
    fn draw_text_clips_at_edges() {
        let mut canvas = RgbaImage::from_pixel(4, 4, WHITE);
        draw_text(&mut canvas, -3, -3, "WW", 1, BLACK);
        draw_text(&mut canvas, 2, 2, "WW", 1, BLACK);
    }

    #[test]
    fn replace_places_image_at_offset() {
        let mut canvas = RgbaImage::from_pixel(4, 4, WHITE);
        let dot = RgbaImage::from_pixel(1, 1, BLACK);
        replace(&mut canvas, &dot, 2, 3);
        assert_eq!(canvas.get_pixel(2, 3), &BLACK);
        assert_eq!(canvas.get_pixel(3, 3), &WHITE);
    }

    #[test]
    fn replace_copies_translucent_pixels_verbatim() {
        let mut canvas = RgbaImage::from_pixel(4, 4, WHITE);
        let translucent = RgbaImage::from_pixel(2, 2, Rgba([10, 20, 30, 77]));
        replace(&mut canvas, &translucent, 1, 1);
        assert_eq!(canvas.get_pixel(1, 1), &Rgba([10, 20, 30, 77]));
        assert_eq!(canvas.get_pixel(2, 2), &Rgba([10, 20, 30, 77]));
        assert_eq!(canvas.get_pixel(0, 0), &WHITE);
    }
}
