//! Module list and detail endpoints.

use reqwest::Method;
use serde::Serialize;
use tracing::debug;

use super::ApiClient;
use crate::cache::TtlCache;
use crate::catalog::{ModuleRecord, RawModule};
use crate::error::VkmError;

const MODULES_PATH: &str = "/api/keuzemodules";

/// Optional query parameters for the list endpoint. Filtering is
/// authoritative on the client, so these are rarely set.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ModuleQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

/// Client for the module endpoints, with a TTL cache on detail lookups.
pub struct ModuleApi {
    api: ApiClient,
    detail_cache: TtlCache<String, ModuleRecord>,
}

impl ModuleApi {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            detail_cache: TtlCache::with_default_ttl(),
        }
    }

    /// Fetches the full module list, normalized at the boundary.
    pub async fn list(&self) -> Result<Vec<ModuleRecord>, VkmError> {
        self.list_with_query(&ModuleQuery::default()).await
    }

    /// Fetches the module list with explicit query parameters.
    pub async fn list_with_query(
        &self,
        query: &ModuleQuery,
    ) -> Result<Vec<ModuleRecord>, VkmError> {
        let raw: Vec<RawModule> = self
            .api
            .execute_json(
                self.api.request(Method::GET, MODULES_PATH).query(query),
                MODULES_PATH,
            )
            .await?;

        Ok(raw.into_iter().map(ModuleRecord::from_raw).collect())
    }

    /// Fetches a single module by id.
    ///
    /// A 404 surfaces as [`VkmError::NotFound`], which callers render as
    /// a dedicated not-found view rather than a failure.
    pub async fn detail(&self, id: &str) -> Result<ModuleRecord, VkmError> {
        let key = id.to_string();
        if let Some(cached) = self.detail_cache.get(&key) {
            debug!(module_id = %id, "Module detail served from cache");
            return Ok(cached);
        }

        let path = format!("{MODULES_PATH}/{id}");
        let raw: RawModule = self
            .api
            .execute_json(self.api.request(Method::GET, &path), &path)
            .await?;

        let record = ModuleRecord::from_raw(raw);
        self.detail_cache.insert(key, record.clone());
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiConfig;
    use crate::session::SessionStore;
    use std::sync::Arc;

    #[test]
    fn empty_query_serializes_to_nothing() {
        let query = ModuleQuery::default();
        let value = serde_json::to_value(&query).unwrap();
        assert_eq!(value, serde_json::json!({}));
    }

    #[tokio::test]
    async fn unreachable_backend_is_a_network_error_not_a_panic() {
        let session = Arc::new(SessionStore::in_memory().unwrap());
        let config = ApiConfig {
            base_url: "http://127.0.0.1:1".to_string(),
            ..ApiConfig::default()
        };
        let api = ModuleApi::new(ApiClient::new(config, session).unwrap());

        assert!(matches!(
            api.list().await.unwrap_err(),
            VkmError::Network { .. }
        ));
        assert!(matches!(
            api.detail("42").await.unwrap_err(),
            VkmError::Network { .. }
        ));
    }
}
