pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::analysis::handlers::handle_analyze;
use crate::state::AppState;
use crate::usage::handlers::handle_share;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Analysis API
        .route("/api/v1/analysis", post(handle_analyze))
        // Usage API
        .route("/api/v1/share", post(handle_share))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::analysis::fetcher::{tests::ScriptedCompletion, CompletionFetcher};
    use crate::config::{Config, LlmConfig};
    use crate::errors::INVALID_BODY_MESSAGE;
    use crate::usage::tests::RecordingSink;
    use crate::usage::UsageLogger;

    const COMPLETION: &str = "General Outlook: Steady.\n\
        Potential Benefits and Risks:\nBenefits: Speed.\nRisks: Drift.\n\
        Steps to Adapt: Practice.\n\
        Placard: Keep learning.";

    fn state(fetcher: Option<CompletionFetcher>, sink: Arc<RecordingSink>) -> AppState {
        AppState {
            fetcher: fetcher.map(Arc::new),
            usage: UsageLogger::new(sink),
            config: Config {
                database_url: "postgres://localhost/test".to_string(),
                llm: LlmConfig {
                    api_key: Some("test-key".to_string()),
                    api_base: "http://localhost".to_string(),
                    timeout: Duration::from_secs(25),
                },
                port: 8080,
                rust_log: "info".to_string(),
            },
        }
    }

    fn app(sink: Arc<RecordingSink>) -> Router {
        let fetcher = CompletionFetcher::new(
            Arc::new(ScriptedCompletion::replying(COMPLETION)),
            Duration::from_secs(25),
        );
        build_router(state(Some(fetcher), sink))
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .header("X-User-Id", "user-42")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    async fn recorded(sink: &RecordingSink) -> Vec<String> {
        for _ in 0..10 {
            if !sink.event_types().is_empty() {
                break;
            }
            tokio::task::yield_now().await;
        }
        sink.event_types()
    }

    fn nurse() -> Value {
        json!({
            "profession": "Nurse",
            "experienceYears": 8,
            "region": "Canada",
            "skillLevel": 6
        })
    }

    #[tokio::test]
    async fn test_health() {
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let (status, body) = send(app(Arc::default()), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "career-impact-api");
        assert_eq!(body["completion"], "configured");
    }

    #[tokio::test]
    async fn test_analysis_returns_report_in_envelope() {
        let sink = Arc::new(RecordingSink::default());
        let (status, body) = send(app(sink.clone()), post_json("/api/v1/analysis", nurse())).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        let data = &body["data"];
        assert_eq!(data["profession"], "Nurse");
        assert_eq!(data["outlook"], "Steady.");
        assert_eq!(data["benefits"], "Speed.");
        assert_eq!(data["risks"], "Drift.");
        assert_eq!(data["steps"], "Practice.");
        assert_eq!(data["placard"], "Keep learning.");

        assert_eq!(recorded(&sink).await, vec!["analysis_requested"]);
        let events = sink.events.lock().unwrap();
        assert_eq!(events[0].user_id.as_deref(), Some("user-42"));
    }

    #[tokio::test]
    async fn test_analysis_validation_error_envelope() {
        let mut request = nurse();
        request["skillLevel"] = json!(11);
        let (status, body) = send(app(Arc::default()), post_json("/api/v1/analysis", request)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            json!({
                "success": false,
                "error": {
                    "code": "VALIDATION_ERROR",
                    "message": "Skill level must be between 1 and 10."
                }
            })
        );
    }

    #[tokio::test]
    async fn test_malformed_body_is_reported_in_envelope() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/analysis")
            .header("content-type", "application/json")
            .body(Body::from("{\"profession\": "))
            .unwrap();
        let (status, body) = send(app(Arc::default()), request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(body["error"]["message"], INVALID_BODY_MESSAGE);
    }

    #[tokio::test]
    async fn test_missing_profession_gets_validator_message() {
        let mut request = nurse();
        request.as_object_mut().unwrap().remove("profession");
        request["region"] = json!("");
        let (status, body) = send(app(Arc::default()), post_json("/api/v1/analysis", request)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["message"], "Profession is required.");
    }

    #[tokio::test]
    async fn test_missing_region_gets_validator_message() {
        let mut request = nurse();
        request.as_object_mut().unwrap().remove("region");
        let (status, body) = send(app(Arc::default()), post_json("/api/v1/analysis", request)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["message"], "Region is required.");
    }

    #[tokio::test]
    async fn test_share_rejects_free_text_network() {
        let sink = Arc::new(RecordingSink::default());
        let (status, body) = send(
            app(sink.clone()),
            post_json("/api/v1/share", json!({"network": "my secret diary entry"})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert!(recorded(&sink).await.is_empty());
    }

    #[tokio::test]
    async fn test_missing_credential_is_service_unavailable() {
        let app = build_router(state(None, Arc::default()));
        let (status, body) = send(app, post_json("/api/v1/analysis", nurse())).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"]["code"], "SERVICE_UNAVAILABLE");
        assert_eq!(
            body["error"]["message"],
            "The analysis service is currently unavailable."
        );
    }

    #[tokio::test]
    async fn test_share_records_lowercased_network() {
        let sink = Arc::new(RecordingSink::default());
        let (status, body) = send(
            app(sink.clone()),
            post_json("/api/v1/share", json!({"network": "LinkedIn", "text": "My report"})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"success": true}));
        assert_eq!(recorded(&sink).await, vec!["share_linkedin"]);
    }

    #[tokio::test]
    async fn test_share_requires_network() {
        let sink = Arc::new(RecordingSink::default());
        let (status, body) =
            send(app(sink.clone()), post_json("/api/v1/share", json!({"network": " "}))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["message"], "Network is required.");
        assert!(recorded(&sink).await.is_empty());
    }
}
