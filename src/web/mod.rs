// Web server module
// Exposes the layout engine over JSON/Base64 HTTP endpoints

mod app;
mod error;
mod extract_request_data;
mod handlers;
mod listeners;
mod models;

pub use app::create_app;
pub use listeners::create_listener;

// Default maximum size for request bodies
pub const DEFAULT_MAX_BODY_BYTES: usize = 100 * 1024 * 1024; // 100MB

// Default maximum decoded image size, in pixels
pub const DEFAULT_MAX_IMAGE_PIXELS: u64 = 40_000_000;

/// Per-request limits shared with every handler
#[derive(Debug, Clone, Copy)]
pub struct AppState {
    pub max_image_pixels: u64,
}
