use serde::{Deserialize, Serialize};

/// One user submission. Never persisted.
///
/// The integer fields are signed so that a negative value reaches the
/// validator and gets a field-specific message instead of a decode error.
/// Missing text fields decode as empty for the same reason.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    #[serde(default)]
    pub profession: String,
    pub experience_years: i64,
    #[serde(default)]
    pub region: String,
    pub skill_level: i64,
    #[serde(default)]
    pub details: Option<String>,
}

/// Unprocessed text of the first completion choice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCompletion(pub String);

impl RawCompletion {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analysis_request_uses_camel_case() {
        let json = serde_json::json!({
            "profession": "Nurse",
            "experienceYears": 8,
            "region": "Canada",
            "skillLevel": 6
        });
        let request: AnalysisRequest = serde_json::from_value(json).unwrap();
        assert_eq!(request.profession, "Nurse");
        assert_eq!(request.experience_years, 8);
        assert_eq!(request.skill_level, 6);
        assert!(request.details.is_none());
    }

    #[test]
    fn test_negative_experience_still_deserializes() {
        let json = serde_json::json!({
            "profession": "Nurse",
            "experienceYears": -1,
            "region": "Canada",
            "skillLevel": 6,
            "details": null
        });
        let request: AnalysisRequest = serde_json::from_value(json).unwrap();
        assert_eq!(request.experience_years, -1);
    }

    #[test]
    fn test_missing_text_fields_decode_as_empty() {
        let json = serde_json::json!({ "experienceYears": 3, "skillLevel": 2 });
        let request: AnalysisRequest = serde_json::from_value(json).unwrap();
        assert_eq!(request.profession, "");
        assert_eq!(request.region, "");
    }
}
