use axum::Json;
use serde::Serialize;

/// Success half of the response envelope. Failures are rendered by `AppError`.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            data: Some(data),
        })
    }
}

impl ApiResponse<()> {
    /// Success with no payload.
    pub fn empty() -> Json<Self> {
        Json(Self {
            success: true,
            data: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_envelope_omits_data() {
        let Json(body) = ApiResponse::empty();
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value, serde_json::json!({ "success": true }));
    }

    #[test]
    fn test_ok_envelope_carries_payload() {
        let Json(body) = ApiResponse::ok(vec![1, 2]);
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["success"], true);
        assert_eq!(value["data"], serde_json::json!([1, 2]));
    }
}
