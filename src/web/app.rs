use super::{AppState, handlers};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{IntoMakeService, get, post},
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, TraceLayer},
};
use tracing::Level;

pub fn create_router(state: AppState, max_body_bytes: usize) -> Router {
    Router::new()
        // Service discovery and liveness
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health))
        // Image operations
        .route("/image/grid-overlay", post(handlers::grid_overlay))
        .route("/image/resize", post(handlers::resize))
        .route("/image/montage", post(handlers::montage))
        // Apply a layer to limit the maximum size of request bodies
        .layer(DefaultBodyLimit::max(max_body_bytes))
        // Workflow tools call from arbitrary origins
        .layer(CorsLayer::permissive())
        // Add tracing for HTTP requests and responses
        .layer(TraceLayer::new_for_http().make_span_with(DefaultMakeSpan::new().level(Level::INFO)))
        .with_state(state)
}

pub fn create_app(state: AppState, max_body_bytes: usize) -> IntoMakeService<Router> {
    create_router(state, max_body_bytes).into_make_service()
}
