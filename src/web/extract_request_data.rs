use axum::{
    Json,
    extract::{FromRequest, Request},
};
use base64::prelude::{BASE64_STANDARD, Engine as _};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::error::ApiError;
use crate::layout::{OutputFormat, RasterImage, decode_image, encode_image};

/// JSON request body whose rejections are reported as [`ApiError`]s.
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(request, state).await?;
        Ok(Self(value))
    }
}

// Strip a `data:<mime>;base64,` prefix if the client sent a data URL
fn strip_data_url(value: &str) -> &str {
    let value = value.trim();
    match value.strip_prefix("data:").and_then(|rest| rest.split_once(',')) {
        Some((_, payload)) => payload,
        None => value,
    }
}

pub fn decode_base64(field: &str, value: &str) -> Result<Vec<u8>, ApiError> {
    let bytes = BASE64_STANDARD
        .decode(strip_data_url(value))
        .map_err(|e| ApiError::BadRequest(format!("Field '{}' is not valid Base64: {}", field, e)))?;

    if bytes.is_empty() {
        return Err(ApiError::BadRequest(format!("Field '{}' is empty.", field)));
    }

    Ok(bytes)
}

// Base64 payload -> raster, enforcing the decoded pixel limit
pub fn extract_request_image(
    field: &str,
    value: &str,
    max_image_pixels: u64,
) -> Result<RasterImage, ApiError> {
    let bytes = decode_base64(field, value)?;
    let image = decode_image(&bytes, max_image_pixels).map_err(|e| {
        let error = ApiError::from(e);
        match error {
            ApiError::UnprocessableEntity(msg) => {
                ApiError::UnprocessableEntity(format!("Field '{}': {}", field, msg))
            }
            other => other,
        }
    })?;

    debug!(
        "Field '{}' decoded: {}x{} {:?}",
        field,
        image.width(),
        image.height(),
        image.format()
    );

    Ok(image)
}

pub fn encode_response_image(
    image: &RasterImage,
    output_format: OutputFormat,
) -> Result<String, ApiError> {
    let bytes = encode_image(image, output_format)?;
    Ok(BASE64_STANDARD.encode(bytes))
}
