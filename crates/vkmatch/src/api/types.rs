//! Request/response types for the backend endpoints.

use serde::{Deserialize, Serialize};

use crate::wizard::FactorWeights;

/// Body for `POST /auth/login`.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Body for `POST /auth/register`.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// Successful login response.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

/// Successful registration response.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterResponse {
    #[serde(default)]
    pub message: Option<String>,
}

/// The signed-in user's profile as served by the backend.
#[derive(Debug, Clone, Deserialize)]
pub struct UserProfile {
    pub name: String,
    pub email: String,
    #[serde(default, alias = "savedModules", alias = "recommendations")]
    pub saved_module_ids: Vec<String>,
    #[serde(default)]
    pub preferences: Option<PreferenceSnapshot>,
}

/// Body for `PUT /api/users/profile`; both fields optional.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

/// Stored wizard preferences, mirroring the wizard's fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferenceSnapshot {
    #[serde(default)]
    pub interests: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub min_credits: Option<u32>,
    #[serde(default)]
    pub max_difficulty: Option<u32>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub weights: Option<FactorWeights>,
}

/// Body for `POST /api/users/recommendations`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveRecommendation {
    pub module_id: String,
}

/// Body for the recommendation endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationRequest {
    pub interests: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_credits: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_difficulty: Option<u32>,
    pub tags: Vec<String>,
    pub weights: FactorWeights,
}

/// One ranked match from the recommendation endpoint. Read-only on the
/// client.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationResult {
    pub name: String,
    #[serde(default)]
    pub location: String,
    /// Final score in [0, 1]
    #[serde(default)]
    pub score: f64,
    /// Content-similarity component of the score
    #[serde(default, alias = "contentSimilarity")]
    pub similarity: f64,
    /// Keywords explaining the match
    #[serde(default, alias = "keywords")]
    pub explanation_keywords: Vec<String>,
    /// Reasons the match violates a hard preference, if any
    #[serde(default)]
    pub violations: Vec<ConstraintViolation>,
}

/// Constraint violations the backend can report on a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstraintViolation {
    #[serde(alias = "locationMismatch")]
    LocationMismatch,
    #[serde(alias = "tagMismatch")]
    TagMismatch,
}

/// The recommendation endpoint's response envelope.
///
/// The backend has served both a bare array and a wrapped object; the
/// wrapped form is canonical, the bare form is accepted defensively.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum RecommendResponse {
    Wrapped {
        recommendations: Vec<RecommendationResult>,
        #[serde(default, rename = "_debug")]
        debug: Option<serde_json::Value>,
    },
    Bare(Vec<RecommendationResult>),
}

impl RecommendResponse {
    /// Flattens either envelope shape into the ranked list.
    pub fn into_results(self) -> Vec<RecommendationResult> {
        match self {
            RecommendResponse::Wrapped {
                recommendations, ..
            } => recommendations,
            RecommendResponse::Bare(results) => results,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_and_wrapped_envelopes_both_decode() {
        let bare: RecommendResponse =
            serde_json::from_str(r#"[{"name": "AI Basics", "score": 0.9}]"#).unwrap();
        assert_eq!(bare.into_results()[0].name, "AI Basics");

        let wrapped: RecommendResponse = serde_json::from_str(
            r#"{"recommendations": [{"name": "AI Basics", "score": 0.9}], "_debug": {"took": 3}}"#,
        )
        .unwrap();
        assert_eq!(wrapped.into_results()[0].name, "AI Basics");
    }

    #[test]
    fn violations_decode_from_both_casings() {
        let result: RecommendationResult = serde_json::from_str(
            r#"{"name": "X", "violations": ["location_mismatch", "tagMismatch"]}"#,
        )
        .unwrap();
        assert_eq!(
            result.violations,
            vec![
                ConstraintViolation::LocationMismatch,
                ConstraintViolation::TagMismatch
            ]
        );
    }

    #[test]
    fn request_serializes_camel_case_and_skips_unset() {
        let request = RecommendationRequest {
            interests: "iets met data".to_string(),
            location: None,
            min_credits: Some(3),
            max_difficulty: None,
            tags: vec!["ai".to_string()],
            weights: FactorWeights::default(),
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["minCredits"], 3);
        assert!(value.get("location").is_none());
        assert!(value.get("maxDifficulty").is_none());
        assert_eq!(value["weights"]["text"], 0.7);
    }
}
