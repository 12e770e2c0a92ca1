//! Configuration for the API clients.

use std::env;
use std::time::Duration;

use tracing::info;

/// Default backend base URL (development setup).
const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// Path of the recommendation endpoint, relative to the base URL.
const RECOMMEND_PATH: &str = "/api/recommendations/getrecommend";

/// Configuration shared by all API clients.
///
/// All endpoints are resolved against `base_url`; the recommendation
/// endpoint can point at a different deployment via `recommend_url`.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL of the module/auth/profile backend
    pub base_url: String,
    /// Absolute URL of the recommendation endpoint
    pub recommend_url: String,
    /// User agent sent with every request
    pub user_agent: String,
    /// TCP connect timeout
    pub connect_timeout: Duration,
    /// Whole-request timeout
    pub request_timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            recommend_url: format!("{DEFAULT_BASE_URL}{RECOMMEND_PATH}"),
            user_agent: format!("vkmatch/{}", env!("CARGO_PKG_VERSION")),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl ApiConfig {
    /// Loads configuration from the environment, falling back to defaults.
    ///
    /// Recognized variables: `VKM_API_BASE_URL`, `VKM_RECOMMEND_URL`.
    pub fn from_env() -> Self {
        let base_url = match env::var("VKM_API_BASE_URL") {
            Ok(value) => value.trim_end_matches('/').to_string(),
            Err(_) => {
                info!("VKM_API_BASE_URL not set, using default: {DEFAULT_BASE_URL}");
                DEFAULT_BASE_URL.to_string()
            }
        };

        let recommend_url = match env::var("VKM_RECOMMEND_URL") {
            Ok(value) => value,
            Err(_) => format!("{base_url}{RECOMMEND_PATH}"),
        };

        Self {
            base_url,
            recommend_url,
            ..Self::default()
        }
    }

    /// Builds an absolute URL for a backend path.
    pub fn endpoint(&self, path: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        if path.starts_with('/') {
            format!("{base}{path}")
        } else {
            format!("{base}/{path}")
        }
    }
}
