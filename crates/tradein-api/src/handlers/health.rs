use axum::Json;
use serde_json::{json, Value};

/// Liveness probe, answering on both `/` and `/health`.
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "tradein-api",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
