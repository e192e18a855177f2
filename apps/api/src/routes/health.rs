use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns a simple status object with service version.
/// `completion` tells operators whether the API key was configured.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    let completion = if state.config.llm.api_key.is_some() {
        "configured"
    } else {
        "unconfigured"
    };
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "career-impact-api",
        "completion": completion
    }))
}
