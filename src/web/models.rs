// API-specific data models for the web server

use crate::layout::{DEFAULT_JPEG_QUALITY, OutputFormat};
use serde::{Deserialize, Serialize};

use super::error::ApiError;

/// Output encoding as named in requests
#[derive(Deserialize, Serialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FormatName {
    #[default]
    Png,
    #[serde(alias = "jpg")]
    Jpeg,
    Webp,
}

impl FormatName {
    pub fn with_quality(self, quality: u32) -> Result<OutputFormat, ApiError> {
        Ok(match self {
            FormatName::Png => OutputFormat::Png,
            FormatName::Webp => OutputFormat::WebP,
            FormatName::Jpeg => {
                let quality = u8::try_from(quality)
                    .ok()
                    .filter(|q| (1..=100).contains(q))
                    .ok_or_else(|| {
                        ApiError::ValidationFailed(format!(
                            "quality must be between 1 and 100, got {}",
                            quality
                        ))
                    })?;
                OutputFormat::Jpeg { quality }
            }
        })
    }
}

fn default_grid_size() -> u32 {
    9
}

fn default_alpha() -> f32 {
    0.3
}

fn default_line_width() -> u32 {
    1
}

fn default_quality() -> u32 {
    u32::from(DEFAULT_JPEG_QUALITY)
}

fn default_spacing() -> u32 {
    10
}

fn default_max_cell_width() -> u32 {
    512
}

/// Request body for POST /image/grid-overlay
#[derive(Deserialize, Debug, Clone)]
pub struct GridOverlayRequest {
    pub image_base64: String,
    #[serde(default = "default_grid_size")]
    pub grid_size: u32,
    #[serde(default = "default_alpha")]
    pub alpha: f32,
    #[serde(default)]
    pub margin: u32,
    #[serde(default = "default_line_width")]
    pub line_width: u32,
    #[serde(default)]
    pub output_format: FormatName,
    #[serde(default = "default_quality")]
    pub quality: u32,
    #[serde(default)]
    pub include_prompt: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct GridOverlayResponse {
    pub image_base64: String,
    pub content_type: String,
    pub width: u32,
    pub height: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt_prefix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ux_review_prompt: Option<String>,
}

/// Request body for POST /image/resize
///
/// Target precedence: `max_dimension`, then `width` + `height` (exact),
/// then `width` alone, then `height` alone.
#[derive(Deserialize, Debug, Clone)]
pub struct ResizeRequest {
    pub image_base64: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub max_dimension: Option<u32>,
    #[serde(default)]
    pub allow_upscale: bool,
    #[serde(default)]
    pub output_format: FormatName,
    #[serde(default = "default_quality")]
    pub quality: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ResizeResponse {
    pub image_base64: String,
    pub content_type: String,
    pub width: u32,
    pub height: u32,
}

/// Request body for POST /image/montage
#[derive(Deserialize, Debug, Clone)]
pub struct MontageRequest {
    pub images_base64: Vec<String>,
    pub columns: Option<u32>,
    #[serde(default = "default_spacing")]
    pub spacing: u32,
    pub labels: Option<Vec<String>>,
    #[serde(default = "default_max_cell_width")]
    pub max_cell_width: u32,
    #[serde(default)]
    pub output_format: FormatName,
    #[serde(default = "default_quality")]
    pub quality: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct MontageResponse {
    pub image_base64: String,
    pub content_type: String,
    pub width: u32,
    pub height: u32,
    /// Arrangement used, `"{columns}x{rows}"`
    pub grid: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct HealthResponse {
    pub status: String,
}
