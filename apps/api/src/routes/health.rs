use axum::Json;
use serde_json::{json, Value};

/// Name reported by `/health` and the startup log.
pub const SERVICE_NAME: &str = "form-relay";

/// GET /health
/// Returns a simple status object with service version. Does not touch SMTP.
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": SERVICE_NAME
    }))
}
