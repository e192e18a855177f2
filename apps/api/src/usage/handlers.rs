//! Axum route handlers for usage tracking.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::HeaderMap,
    Json,
};
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::envelope::ApiResponse;
use crate::models::usage::UsageEvent;
use crate::state::AppState;
use crate::usage::{share_event_type, user_id_from};

/// Longest network name accepted in an event type.
pub const MAX_NETWORK_CHARS: usize = 32;

/// Body of a share click. Clients may also send the shared `text`; it is
/// ignored and never stored.
#[derive(Debug, Deserialize)]
pub struct ShareRequest {
    #[serde(default)]
    pub network: String,
}

/// Network names are short ASCII identifiers such as `linkedin` or `x`.
fn validate_network(network: &str) -> Result<(), AppError> {
    let network = network.trim();
    if network.is_empty() {
        return Err(AppError::Validation("Network is required.".to_string()));
    }
    if network.len() > MAX_NETWORK_CHARS || !network.bytes().all(|b| b.is_ascii_alphanumeric()) {
        return Err(AppError::Validation(format!(
            "Network must be at most {MAX_NETWORK_CHARS} letters or digits."
        )));
    }
    Ok(())
}

/// POST /api/v1/share
///
/// Records that the user shared their report on a social network.
pub async fn handle_share(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<ShareRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let Json(request) = body?;
    validate_network(&request.network)?;

    state.usage.record(UsageEvent::now(
        share_event_type(&request.network),
        user_id_from(&headers),
    ));

    Ok(ApiResponse::empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_network() {
        assert!(validate_network("LinkedIn").is_ok());
        assert!(validate_network(" x ").is_ok());
        assert!(validate_network(&"a".repeat(MAX_NETWORK_CHARS)).is_ok());

        let too_long = "a".repeat(MAX_NETWORK_CHARS + 1);
        for bad in ["", "   ", "linked in", "x'); DROP TABLE", "réseau", too_long.as_str()] {
            assert!(
                matches!(validate_network(bad), Err(AppError::Validation(_))),
                "{bad:?}"
            );
        }
    }

    #[test]
    fn test_share_request_ignores_text() {
        let request: ShareRequest =
            serde_json::from_value(serde_json::json!({"network": "x", "text": "My report"})).unwrap();
        assert_eq!(request.network, "x");
    }
}
