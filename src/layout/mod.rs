//! Image layout engine: pure, stateless operations over in-memory rasters.
//!
//! | Operation | Entry point | Result |
//! |---|---|---|
//! | **Grid overlay** | [`grid_overlay`] | same-format image, optional prompt legend |
//! | **Aspect resize** | [`resize`] | resampled (or passthrough) image |
//! | **Montage** | [`montage`] | composed image + `"{columns}x{rows}"` |
//!
//! The module is split into:
//! - **Raster**: [`RasterImage`], the owned RGB/RGBA pixel buffer
//! - **Geometry**: pure dimension math (unit testable, no pixels)
//! - **Draw**: line masks, rectangles, bitmap text, image copy
//! - **Operations**: `grid_overlay`, `resize`, `montage`
//! - **Codec**: decoding into and encoding out of [`RasterImage`], used by
//!   callers at the transport boundary
//!
//! Every failure is a [`LayoutError`] whose [`ErrorKind`] separates bad
//! configuration from undecodable input and internal failures.

mod codec;
mod draw;
mod error;
mod geometry;
mod grid_overlay;
mod montage;
mod raster;
mod resize;

pub use codec::{DEFAULT_JPEG_QUALITY, OutputFormat, decode_image, encode_image};
pub use error::{ErrorKind, LayoutError};
pub use grid_overlay::{GridOverlayOutput, GridPrompt, GridSpec, grid_overlay};
pub use montage::{LayoutResult, MAX_IMAGES, MIN_IMAGES, MontageSpec, montage};
pub use raster::{PixelFormat, RasterImage};
pub use resize::{ResizeSpec, ResizeTarget, resize};
