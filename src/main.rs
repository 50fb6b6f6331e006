// Main entry point for the image-worker application.
// Parses configuration, sets up tracing, binds the listener and serves the
// image layout endpoints until a shutdown signal arrives.

mod layout;
mod shutdown_signal;
mod web;

use clap::Parser;
use shutdown_signal::shutdown_signal;
use tracing::Level;
use web::{AppState, DEFAULT_MAX_BODY_BYTES, DEFAULT_MAX_IMAGE_PIXELS};

/// HTTP worker exposing grid overlay, resize and montage image operations
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct AppConfig {
    /// Hostname/IP to bind the server to.
    /// If this option is specified without value, it will default to "*", meaning the server will listen on all interfaces.
    #[arg(long, env = "IMAGE_WORKER_HOST", default_value = "localhost", num_args = 0..=1, default_missing_value = "*")]
    host: String,

    /// Port number to listen on.
    #[arg(short, long, env = "IMAGE_WORKER_PORT", default_value_t = 8000)]
    port: u16,

    /// Maximum log level (error, warn, info, debug, trace).
    #[arg(long, env = "IMAGE_WORKER_LOG_LEVEL", default_value_t = Level::INFO)]
    log_level: Level,

    /// Maximum accepted request body size in bytes.
    #[arg(long, env = "IMAGE_WORKER_MAX_BODY_BYTES", default_value_t = DEFAULT_MAX_BODY_BYTES)]
    max_body_bytes: usize,

    /// Maximum decoded size of a single input image, in pixels.
    #[arg(long, env = "IMAGE_WORKER_MAX_IMAGE_PIXELS", default_value_t = DEFAULT_MAX_IMAGE_PIXELS)]
    max_image_pixels: u64,
}

#[tokio::main]
async fn main() {
    // Parse command line args and environment variables
    let config = AppConfig::parse();

    // Initialize tracing subscriber for structured logging.
    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .with_target(true) // Include module path in logs
        .with_file(true) // Include source file name
        .with_line_number(true) // Include line numbers
        .init();

    tracing::info!("Starting image-worker...");
    tracing::info!(
        "Limits: max_body_bytes={}, max_image_pixels={}",
        config.max_body_bytes,
        config.max_image_pixels
    );

    let state = AppState {
        max_image_pixels: config.max_image_pixels,
    };
    let app = web::create_app(state, config.max_body_bytes);

    let listener = match web::create_listener(&config.host, config.port).await {
        Ok((addr, listener)) => {
            tracing::info!("Server successfully bound. Listening on {}", addr);
            listener
        }
        Err(e) => {
            tracing::error!("FATAL: Failed to bind server: {}", e);
            eprintln!("FATAL: Could not bind server. Error: {}. Exiting.", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!("Server run error: {}", e);
        eprintln!("ERROR: Server shut down unexpectedly. Error: {}", e);
        std::process::exit(1);
    }

    tracing::info!("image-worker has shut down.");
}
