//! Pure calculation functions for layout geometry.
//!
//! Nothing here touches pixels; every function is a small piece of integer
//! or floating point arithmetic over dimensions, unit tested in isolation.

/// Segment boundaries when `extent` pixels are split into `divisions` parts.
///
/// Returns `divisions + 1` positions: the first is always 0 and the last is
/// always `extent`. Boundaries use floor division, so the positions are
/// monotonically increasing and the final segment absorbs any remainder.
///
/// # Examples
/// ```ignore
/// assert_eq!(grid_boundaries(900, 9), vec![0, 100, 200, 300, 400, 500, 600, 700, 800, 900]);
/// assert_eq!(grid_boundaries(10, 3), vec![0, 3, 6, 10]);
/// ```
pub fn grid_boundaries(extent: u32, divisions: u32) -> Vec<u32> {
    let divisions = u64::from(divisions.max(1));
    (0..=divisions)
        .map(|i| (u64::from(extent) * i / divisions) as u32)
        .collect()
}

/// Midpoint of every segment described by [`grid_boundaries`].
pub fn segment_centers(boundaries: &[u32]) -> Vec<u32> {
    boundaries
        .windows(2)
        .map(|pair| pair[0] + (pair[1] - pair[0]) / 2)
        .collect()
}

fn scale_dimension(value: u32, scale: f64) -> u32 {
    ((value as f64 * scale).round() as u32).max(1)
}

/// Scale `source` so its longer edge equals `max_dimension`.
///
/// Images already within the bound are returned unchanged unless
/// `allow_upscale` is set. Both output dimensions are at least 1.
pub fn fit_within(source: (u32, u32), max_dimension: u32, allow_upscale: bool) -> (u32, u32) {
    let (w, h) = source;
    let longer_edge = w.max(h);

    if longer_edge <= max_dimension && !allow_upscale {
        return source;
    }

    let scale = max_dimension as f64 / longer_edge as f64;
    (scale_dimension(w, scale), scale_dimension(h, scale))
}

/// Scale `source` to the given width, preserving aspect ratio.
pub fn fit_width(source: (u32, u32), width: u32, allow_upscale: bool) -> (u32, u32) {
    let (w, h) = source;
    if width >= w && !allow_upscale {
        return source;
    }

    let scale = width as f64 / w as f64;
    (width, scale_dimension(h, scale))
}

/// Scale `source` to the given height, preserving aspect ratio.
pub fn fit_height(source: (u32, u32), height: u32, allow_upscale: bool) -> (u32, u32) {
    let (w, h) = source;
    if height >= h && !allow_upscale {
        return source;
    }

    let scale = height as f64 / h as f64;
    (scale_dimension(w, scale), height)
}

/// Default montage column count: the smallest `c` with `c * c >= count`,
/// i.e. `ceil(sqrt(count))` without going through floating point.
pub fn default_columns(count: u32) -> u32 {
    let mut columns = 1;
    while columns * columns < count {
        columns += 1;
    }
    columns
}

/// Resolve the `(columns, rows)` arrangement for `count` montage cells.
///
/// An explicit column count is clamped to `count` so no column is ever
/// entirely empty; rows are always `ceil(count / columns)`.
pub fn montage_grid(count: u32, columns: Option<u32>) -> (u32, u32) {
    let columns = columns
        .map(|c| c.min(count))
        .unwrap_or_else(|| default_columns(count))
        .max(1);
    (columns, count.div_ceil(columns))
}

/// Total extent of `cells` cells of size `cell` separated by `spacing`.
pub fn span(cells: u32, cell: u32, spacing: u32) -> u64 {
    u64::from(cells) * u64::from(cell) + u64::from(cells.saturating_sub(1)) * u64::from(spacing)
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // grid_boundaries tests
    // =========================================================================

    #[test]
    fn boundaries_at_multiples_of_100() {
        assert_eq!(
            grid_boundaries(900, 9),
            vec![0, 100, 200, 300, 400, 500, 600, 700, 800, 900]
        );
    }

    #[test]
    fn boundaries_last_segment_absorbs_remainder() {
        // 10 / 3 → segments of 3, 3, 4
        assert_eq!(grid_boundaries(10, 3), vec![0, 3, 6, 10]);
    }

    #[test]
    fn boundaries_span_full_extent_and_increase() {
        for extent in [1, 7, 99, 640, 1023] {
            for divisions in 1..=26 {
                let b = grid_boundaries(extent, divisions);
                assert_eq!(b.len(), divisions as usize + 1);
                assert_eq!(b[0], 0);
                assert_eq!(*b.last().unwrap(), extent);
                assert!(b.windows(2).all(|pair| pair[0] <= pair[1]));
                if extent >= divisions {
                    assert!(b.windows(2).all(|pair| pair[0] < pair[1]));
                }
            }
        }
    }

    #[test]
    fn boundaries_single_division() {
        assert_eq!(grid_boundaries(250, 1), vec![0, 250]);
    }

    #[test]
    fn centers_of_even_segments() {
        assert_eq!(segment_centers(&[0, 100, 200]), vec![50, 150]);
    }

    // =========================================================================
    // fit_within / fit_width / fit_height tests
    // =========================================================================

    #[test]
    fn fit_within_landscape() {
        assert_eq!(fit_within((2000, 1500), 1000, false), (1000, 750));
    }

    #[test]
    fn fit_within_portrait() {
        assert_eq!(fit_within((1500, 2000), 1000, false), (750, 1000));
    }

    #[test]
    fn fit_within_never_upscales_by_default() {
        assert_eq!(fit_within((500, 400), 1000, false), (500, 400));
        assert_eq!(fit_within((1000, 1000), 1000, false), (1000, 1000));
    }

    #[test]
    fn fit_within_upscales_when_allowed() {
        assert_eq!(fit_within((500, 400), 1000, true), (1000, 800));
    }

    #[test]
    fn fit_within_clamps_to_one_pixel() {
        // 10000x10 down to 100 → height rounds to 0.1, clamped to 1
        assert_eq!(fit_within((10000, 10), 100, false), (100, 1));
    }

    #[test]
    fn fit_within_rounds() {
        // 1000 * (333 / 1001) = 332.67 → 333; 1001 → 333
        assert_eq!(fit_within((1001, 1000), 333, false), (333, 333));
    }

    #[test]
    fn fit_within_preserves_aspect() {
        for (w, h) in [(1920, 1080), (1080, 1920), (4000, 3000), (777, 333)] {
            for max in [64, 200, 512, 1024] {
                let (ow, oh) = fit_within((w, h), max, false);
                let input_ratio = w as f64 / h as f64;
                let output_ratio = ow as f64 / oh as f64;
                // One pixel of rounding on the shorter edge bounds the error
                let epsilon = input_ratio / oh.min(ow) as f64 + 1e-9;
                assert!(
                    (input_ratio - output_ratio).abs() <= epsilon,
                    "{}x{} → {}x{}",
                    w,
                    h,
                    ow,
                    oh
                );
            }
        }
    }

    #[test]
    fn fit_width_scales_height() {
        assert_eq!(fit_width((800, 600), 400, false), (400, 300));
        assert_eq!(fit_width((800, 600), 1600, false), (800, 600));
        assert_eq!(fit_width((800, 600), 1600, true), (1600, 1200));
    }

    #[test]
    fn fit_height_scales_width() {
        assert_eq!(fit_height((800, 600), 300, false), (400, 300));
        assert_eq!(fit_height((800, 600), 900, false), (800, 600));
    }

    // =========================================================================
    // montage_grid tests
    // =========================================================================

    #[test]
    fn default_columns_is_ceil_sqrt() {
        assert_eq!(default_columns(2), 2);
        assert_eq!(default_columns(4), 2);
        assert_eq!(default_columns(5), 3);
        assert_eq!(default_columns(9), 3);
        assert_eq!(default_columns(10), 4);
        assert_eq!(default_columns(25), 5);
    }

    #[test]
    fn five_images_default_to_three_by_two() {
        assert_eq!(montage_grid(5, None), (3, 2));
    }

    #[test]
    fn explicit_columns_derive_rows() {
        assert_eq!(montage_grid(7, Some(2)), (2, 4));
        assert_eq!(montage_grid(6, Some(3)), (3, 2));
        assert_eq!(montage_grid(6, Some(1)), (1, 6));
    }

    #[test]
    fn explicit_columns_clamped_to_count() {
        assert_eq!(montage_grid(3, Some(10)), (3, 1));
    }

    #[test]
    fn capacity_always_covers_count() {
        for count in 2..=25 {
            let (columns, rows) = montage_grid(count, None);
            assert!(columns * rows >= count);
            // Default heuristic never leaves a whole row empty
            assert!(columns * rows - count < columns);

            for requested in 1..=30 {
                let (columns, rows) = montage_grid(count, Some(requested));
                assert!(columns * rows >= count, "count={count} columns={requested}");
            }
        }
    }

    #[test]
    fn span_includes_gaps_between_cells() {
        assert_eq!(span(3, 100, 10), 320);
        assert_eq!(span(1, 100, 10), 100);
        assert_eq!(span(2, 50, 0), 100);
    }

    #[test]
    fn span_does_not_wrap() {
        assert_eq!(span(25, u32::MAX, 256), 25 * u64::from(u32::MAX) + 24 * 256);
    }
}
