//! HTTP API application wiring (Axum router + service wiring).
//!
//! This folder is structured like:
//! - `services.rs`: infrastructure wiring (document store, media, mail, tokens)
//! - `routes/`: HTTP routes + handlers (one file per resource)
//! - `dto.rs`: the response envelope
//! - `errors.rs`: the error type and its JSON body
//! - `upload.rs` / `session.rs`: multipart forms and the token cookie

use std::sync::Arc;

use axum::{
    Extension, Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method, header},
    middleware,
    routing::get,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use folio_infra::AppConfig;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;
pub mod session;
pub mod upload;

pub use services::AppServices;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(services: AppServices) -> Router {
    let auth_state = services.auth_state();
    let config = services.config.clone();
    let services = Arc::new(services);

    Router::new()
        .route("/", get(routes::system::welcome))
        .route("/health", get(routes::system::health))
        .nest("/api/v1", routes::router(auth_state))
        .nest_service("/uploads", ServeDir::new(&config.upload_dir))
        .fallback(routes::system::not_found)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(&config))
                .layer(middleware::map_response(
                    routes::system::method_not_allowed_as_not_found,
                ))
                .layer(DefaultBodyLimit::max(config.max_upload_bytes))
                .layer(Extension(services)),
        )
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allowed_origins()
        .into_iter()
        .filter_map(|origin| match HeaderValue::from_str(&origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}
