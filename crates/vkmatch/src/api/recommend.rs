//! The recommendation endpoint.

use reqwest::Method;
use tracing::{debug, info};

use super::types::{RecommendResponse, RecommendationRequest, RecommendationResult};
use super::ApiClient;
use crate::error::VkmError;

/// Client for the external recommendation service.
///
/// One POST per wizard run; the wizard itself guards against duplicate
/// in-flight submissions.
pub struct RecommendClient {
    api: ApiClient,
}

impl RecommendClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Posts the collected wizard input and returns the ranked matches.
    ///
    /// Accepts both response envelopes (bare array and wrapped object)
    /// and flattens them to one canonical list.
    pub async fn get_recommendations(
        &self,
        request: &RecommendationRequest,
    ) -> Result<Vec<RecommendationResult>, VkmError> {
        let url = self.api.config().recommend_url.clone();
        info!(interests_len = request.interests.len(), "Requesting recommendations");

        let response: RecommendResponse = self
            .api
            .execute_json(
                self.api.request_url(Method::POST, &url).json(request),
                "recommendations",
            )
            .await?;

        if let RecommendResponse::Wrapped {
            debug: Some(_), ..
        } = &response
        {
            debug!("Recommendation response carried a _debug payload");
        }

        Ok(response.into_results())
    }
}
