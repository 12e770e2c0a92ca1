//! REST clients for the external backend.
//!
//! All clients share one [`ApiClient`]: a configured `reqwest` client,
//! the endpoint configuration, and the session store the bearer token is
//! read from. A request carries the `Authorization` header only when a
//! token is stored; without one the request goes out bare and the server
//! is responsible for rejecting it.

pub mod auth;
pub mod modules;
pub mod profile;
pub mod recommend;
pub mod types;

use std::sync::Arc;

use rand::Rng;
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::ApiConfig;
use crate::error::VkmError;
use crate::session::SessionStore;

/// Shared HTTP plumbing for every backend client.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    config: ApiConfig,
    session: Arc<SessionStore>,
}

impl ApiClient {
    /// Builds the underlying HTTP client with the configured timeouts
    /// and user agent. Rejects an unparsable base URL up front.
    pub fn new(config: ApiConfig, session: Arc<SessionStore>) -> Result<Self, VkmError> {
        url::Url::parse(&config.base_url)?;
        url::Url::parse(&config.recommend_url)?;

        let http = Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| VkmError::Network {
                message: format!("Failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            http,
            config,
            session,
        })
    }

    pub(crate) fn config(&self) -> &ApiConfig {
        &self.config
    }

    pub(crate) fn session(&self) -> &SessionStore {
        &self.session
    }

    /// Builds a request against a backend path, attaching the bearer
    /// token when one is stored.
    pub(crate) fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.request_url(method, &self.config.endpoint(path))
    }

    /// Same as [`Self::request`] for an absolute URL (the recommendation
    /// endpoint can live on another deployment).
    pub(crate) fn request_url(&self, method: Method, url: &str) -> RequestBuilder {
        let builder = self.http.request(method, url);
        match self.session.token() {
            Ok(Some(token)) => builder.header(AUTHORIZATION, format!("Bearer {token}")),
            Ok(None) => builder,
            Err(e) => {
                warn!("Could not read session token ({e}), sending unauthenticated");
                builder
            }
        }
    }

    /// Sends a request and decodes a JSON body.
    pub(crate) async fn execute_json<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        resource: &str,
    ) -> Result<T, VkmError> {
        let response = self.execute(builder, resource).await?;
        Ok(response.json::<T>().await?)
    }

    /// Sends a request, checking only the status.
    pub(crate) async fn execute_unit(
        &self,
        builder: RequestBuilder,
        resource: &str,
    ) -> Result<(), VkmError> {
        self.execute(builder, resource).await.map(|_| ())
    }

    async fn execute(
        &self,
        builder: RequestBuilder,
        resource: &str,
    ) -> Result<reqwest::Response, VkmError> {
        let correlation_id = generate_correlation_id();
        debug!(correlation_id = %correlation_id, resource = %resource, "Sending request");

        let response = builder.send().await?;
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        debug!(
            correlation_id = %correlation_id,
            resource = %resource,
            status = %status,
            "Request failed"
        );

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(VkmError::Unauthorized),
            StatusCode::NOT_FOUND => Err(VkmError::NotFound {
                resource: resource.to_string(),
            }),
            _ => {
                let message = extract_api_message(response).await;
                Err(VkmError::Api {
                    status: status.as_u16(),
                    message,
                })
            }
        }
    }
}

/// Error body shape used by the backend: `{message}` or `{error}`.
#[derive(Debug, serde::Deserialize)]
struct ApiMessage {
    message: Option<String>,
    error: Option<String>,
}

async fn extract_api_message(response: reqwest::Response) -> String {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();

    serde_json::from_str::<ApiMessage>(&body)
        .ok()
        .and_then(|m| m.message.or(m.error))
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string()
        })
}

/// Generates a unique correlation ID for request tracing.
fn generate_correlation_id() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_micros();
    let random: u32 = rand::thread_rng().gen();
    format!("{:x}-{:08x}", timestamp & 0xFFFFFFFF, random)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn correlation_ids_are_unique_enough() {
        let a = generate_correlation_id();
        let b = generate_correlation_id();
        assert_ne!(a, b);
        assert!(a.contains('-'));
    }

    #[test]
    fn invalid_base_url_is_rejected_up_front() {
        let config = ApiConfig {
            base_url: "not a url".to_string(),
            ..ApiConfig::default()
        };
        let session = Arc::new(SessionStore::in_memory().unwrap());
        assert!(matches!(
            ApiClient::new(config, session),
            Err(VkmError::Url { .. })
        ));
    }

    #[test]
    fn api_message_prefers_message_over_error() {
        let parsed: ApiMessage =
            serde_json::from_str(r#"{"message": "Ongeldig wachtwoord", "error": "x"}"#).unwrap();
        assert_eq!(
            parsed.message.or(parsed.error),
            Some("Ongeldig wachtwoord".to_string())
        );

        let parsed: ApiMessage = serde_json::from_str(r#"{"error": "kapot"}"#).unwrap();
        assert_eq!(parsed.message.or(parsed.error), Some("kapot".to_string()));
    }
}
