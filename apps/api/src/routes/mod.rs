pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::relay::handlers;
use crate::state::AppState;
use crate::upload::MAX_UPLOAD_BYTES;

/// Room for the text fields and multipart framing on top of the resume itself.
const FORM_OVERHEAD_BYTES: usize = 64 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/careers/apply", post(handlers::handle_careers_apply))
        .route("/api/contact", post(handlers::handle_contact))
        .layer(DefaultBodyLimit::max(
            MAX_UPLOAD_BYTES as usize + FORM_OVERHEAD_BYTES,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
