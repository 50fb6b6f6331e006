// API handlers for the web server

use super::{
    AppState,
    error::ApiError,
    extract_request_data::{ApiJson, encode_response_image, extract_request_image},
    models::*,
};
use crate::layout::{
    self, GridSpec, MAX_IMAGES, MIN_IMAGES, MontageSpec, ResizeSpec, ResizeTarget,
};
use axum::{Json, extract::State};
use serde_json::{Value, json};
use tracing::{debug, info};
use uuid::Uuid;

// Run CPU-bound pixel work off the async runtime
async fn run_blocking<T, F>(operation: &str, work: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, ApiError> + Send + 'static,
{
    tokio::task::spawn_blocking(work).await.map_err(|e| {
        ApiError::InternalServerError(format!("{} task failed: {}", operation, e))
    })?
}

// --- GET / ---
// Service description with the available endpoints
pub async fn index() -> Json<Value> {
    Json(json!({
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "status": "ok",
        "endpoints": {
            "health": "GET /health",
            "image": {
                "grid-overlay": "POST /image/grid-overlay",
                "resize": "POST /image/resize",
                "montage": "POST /image/montage",
            },
        },
        "limits": {
            "montage_images": { "min": MIN_IMAGES, "max": MAX_IMAGES },
        },
    }))
}

// --- GET /health ---
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

// --- POST /image/grid-overlay ---
// Draws a labelled reference grid over an image
pub async fn grid_overlay(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<GridOverlayRequest>,
) -> Result<Json<GridOverlayResponse>, ApiError> {
    let request_id = Uuid::new_v4();
    info!(
        "Grid overlay request: grid_size={}, alpha={}, margin={}, request_id={}",
        request.grid_size, request.alpha, request.margin, request_id
    );

    let spec = GridSpec {
        grid_size: request.grid_size,
        alpha: request.alpha,
        include_prompt: request.include_prompt,
        margin: request.margin,
        line_width: request.line_width,
    };
    spec.validate()?;
    let output_format = request.output_format.with_quality(request.quality)?;

    let response = run_blocking("Grid overlay", move || {
        let image =
            extract_request_image("image_base64", &request.image_base64, state.max_image_pixels)?;
        let output = layout::grid_overlay(&image, &spec)?;
        let (width, height) = output.image.dimensions();

        Ok(GridOverlayResponse {
            image_base64: encode_response_image(&output.image, output_format)?,
            content_type: output_format.content_type().to_string(),
            width,
            height,
            prompt_prefix: output.prompt.as_ref().map(|p| p.prefix.clone()),
            ux_review_prompt: output.prompt.map(|p| p.ux_review),
        })
    })
    .await?;

    debug!(
        "Grid overlay completed: {}x{}, request_id={}",
        response.width, response.height, request_id
    );

    Ok(Json(response))
}

// --- POST /image/resize ---
// Resizes an image, preserving aspect ratio unless exact dimensions are given
pub async fn resize(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<ResizeRequest>,
) -> Result<Json<ResizeResponse>, ApiError> {
    let request_id = Uuid::new_v4();
    info!(
        "Resize request: width={:?}, height={:?}, max_dimension={:?}, request_id={}",
        request.width, request.height, request.max_dimension, request_id
    );

    let target = match (request.max_dimension, request.width, request.height) {
        (Some(max_dimension), _, _) => ResizeTarget::MaxDimension(max_dimension),
        (None, Some(width), Some(height)) => ResizeTarget::Exact { width, height },
        (None, Some(width), None) => ResizeTarget::Width(width),
        (None, None, Some(height)) => ResizeTarget::Height(height),
        (None, None, None) => {
            return Err(ApiError::BadRequest(
                "Must provide width, height, or max_dimension".to_string(),
            ));
        }
    };

    let spec = ResizeSpec {
        target,
        allow_upscale: request.allow_upscale,
        output_format: request.output_format.with_quality(request.quality)?,
    };
    spec.validate()?;

    let response = run_blocking("Resize", move || {
        let image =
            extract_request_image("image_base64", &request.image_base64, state.max_image_pixels)?;
        let resized = layout::resize(&image, &spec)?;
        let (width, height) = resized.dimensions();

        debug!(
            "Resized {}x{} to {}x{}",
            image.width(),
            image.height(),
            width,
            height
        );

        Ok(ResizeResponse {
            image_base64: encode_response_image(&resized, spec.output_format)?,
            content_type: spec.output_format.content_type().to_string(),
            width,
            height,
        })
    })
    .await?;

    Ok(Json(response))
}

// --- POST /image/montage ---
// Composes several images into one grid
pub async fn montage(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<MontageRequest>,
) -> Result<Json<MontageResponse>, ApiError> {
    let request_id = Uuid::new_v4();
    info!(
        "Montage request: images={}, columns={:?}, spacing={}, request_id={}",
        request.images_base64.len(),
        request.columns,
        request.spacing,
        request_id
    );

    let spec = MontageSpec {
        columns: request.columns,
        spacing: request.spacing,
        labels: request.labels,
        max_cell_width: request.max_cell_width,
    };
    spec.validate(request.images_base64.len())?;
    let output_format = request.output_format.with_quality(request.quality)?;

    let response = run_blocking("Montage", move || {
        // Every image must decode before any composition starts
        let images = request
            .images_base64
            .iter()
            .enumerate()
            .map(|(index, value)| {
                extract_request_image(
                    &format!("images_base64[{}]", index),
                    value,
                    state.max_image_pixels,
                )
            })
            .collect::<Result<Vec<_>, _>>()?;

        let result = layout::montage(&images, &spec)?;
        let (width, height) = result.image.dimensions();
        debug!(
            "Montage arranged in {} columns x {} rows",
            result.columns, result.rows
        );

        Ok(MontageResponse {
            image_base64: encode_response_image(&result.image, output_format)?,
            content_type: output_format.content_type().to_string(),
            width,
            height,
            grid: result.grid,
        })
    })
    .await?;

    debug!(
        "Montage completed: {}x{} as {}, request_id={}",
        response.width, response.height, response.grid, request_id
    );

    Ok(Json(response))
}
