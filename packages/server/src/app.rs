//! Application setup: shared state, router, middleware, embedded web UI.

use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, Extension},
    http::{header, HeaderValue, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use rust_embed::RustEmbed;
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use extractly::{Pipeline, RecordStore, AI};

use crate::config::Config;
use crate::routes::{
    delete_record_handler, get_record_handler, health_handler, ingest_handler,
    list_records_handler,
};

/// Shared application state. Store and AI are injected at startup and
/// reach handlers through an `Extension`; there is no global handle.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RecordStore>,
    pub pipeline: Arc<Pipeline>,
    pub config: Arc<Config>,
}

// Embed the records browser at compile time.
#[derive(RustEmbed)]
#[folder = "web"]
struct WebAssets;

/// Serve the records browser from embedded assets, falling back to
/// index.html for unknown paths.
async fn serve_web(uri: Uri) -> Response {
    let path = uri.path().trim_start_matches('/');
    let path = if path.is_empty() { "index.html" } else { path };

    match WebAssets::get(path) {
        Some(content) => {
            let mime = mime_guess::from_path(path).first_or_octet_stream();
            ([(header::CONTENT_TYPE, mime.as_ref())], content.data).into_response()
        }
        None => match WebAssets::get("index.html") {
            Some(content) => {
                ([(header::CONTENT_TYPE, "text/html")], content.data).into_response()
            }
            None => (StatusCode::NOT_FOUND, "404 Not Found").into_response(),
        },
    }
}

/// Build the Axum application router.
pub fn build_app(store: Arc<dyn RecordStore>, ai: Arc<dyn AI>, config: Config) -> Router {
    let config = Arc::new(config);
    let pipeline = Arc::new(Pipeline::new(store.clone(), ai));

    let state = AppState {
        store,
        pipeline,
        config: config.clone(),
    };

    // CORS: a configured exact origin, or any origin (extension pages have
    // opaque origins).
    let cors = match config
        .cors_origin
        .as_deref()
        .and_then(|origin| origin.parse::<HeaderValue>().ok())
    {
        Some(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_methods([Method::GET, Method::POST, Method::DELETE])
            .allow_headers([header::CONTENT_TYPE]),
        None => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::DELETE])
            .allow_headers([header::CONTENT_TYPE]),
    };

    // Per-IP rate limiting over the configured window.
    let period_ms =
        (config.rate_limit_window_ms / u64::from(config.rate_limit_max_requests.max(1))).max(1);
    let rate_limit_config = Arc::new(
        GovernorConfigBuilder::default()
            .per_millisecond(period_ms)
            .burst_size(config.rate_limit_max_requests.max(1))
            .use_headers() // Extract IP from X-Forwarded-For when present
            .finish()
            .expect("rate limiter configuration is valid"),
    );
    let rate_limit_layer = GovernorLayer {
        config: rate_limit_config,
    };

    let api = Router::new()
        .route("/ingest", axum::routing::post(ingest_handler))
        .route("/records", get(list_records_handler))
        .route(
            "/records/:id",
            get(get_record_handler).delete(delete_record_handler),
        )
        .layer(rate_limit_layer);

    Router::new()
        .nest("/api", api)
        // Health check (no rate limit)
        .route("/health", get(health_handler))
        // Records browser
        .fallback(serve_web)
        .layer(DefaultBodyLimit::max(config.max_body_size))
        .layer(Extension(state))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
