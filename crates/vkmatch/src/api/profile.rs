//! Authenticated profile, preference, and saved-recommendation calls.

use reqwest::Method;
use tracing::info;

use super::types::{PreferenceSnapshot, ProfileUpdate, SaveRecommendation, UserProfile};
use super::ApiClient;
use crate::cache::{SessionKey, TtlCache};
use crate::error::VkmError;

const PROFILE_PATH: &str = "/api/users/profile";
const PREFERENCES_PATH: &str = "/api/users/preferences";
const RECOMMENDATIONS_PATH: &str = "/api/users/recommendations";

/// Client for everything under `/api/users`.
///
/// The fetched profile is cached per session so a page can read it more
/// than once without refetching; every mutation invalidates the entry.
pub struct UserProfileClient {
    api: ApiClient,
    cache: TtlCache<SessionKey, UserProfile>,
}

impl UserProfileClient {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            cache: TtlCache::with_default_ttl(),
        }
    }

    fn cache_key(&self) -> Option<SessionKey> {
        self.api
            .session()
            .token()
            .ok()
            .flatten()
            .map(|t| SessionKey::from_token(&t))
    }

    fn invalidate_cached_profile(&self) {
        if let Some(key) = self.cache_key() {
            self.cache.invalidate(&key);
        }
    }

    /// Fetches the signed-in user's profile, from cache when fresh.
    pub async fn fetch_profile(&self) -> Result<UserProfile, VkmError> {
        let key = self.cache_key();
        if let Some(cached) = key.as_ref().and_then(|k| self.cache.get(k)) {
            return Ok(cached);
        }

        let profile: UserProfile = self
            .api
            .execute_json(self.api.request(Method::GET, PROFILE_PATH), PROFILE_PATH)
            .await?;

        if let Some(key) = key {
            self.cache.insert(key, profile.clone());
        }
        Ok(profile)
    }

    /// Updates name and/or password.
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<(), VkmError> {
        self.api
            .execute_unit(
                self.api.request(Method::PUT, PROFILE_PATH).json(update),
                PROFILE_PATH,
            )
            .await?;
        self.invalidate_cached_profile();
        Ok(())
    }

    /// Stores the wizard preference snapshot on the profile.
    pub async fn save_preferences(
        &self,
        preferences: &PreferenceSnapshot,
    ) -> Result<(), VkmError> {
        self.api
            .execute_unit(
                self.api
                    .request(Method::PUT, PREFERENCES_PATH)
                    .json(preferences),
                PREFERENCES_PATH,
            )
            .await?;
        self.invalidate_cached_profile();
        Ok(())
    }

    /// Clears stored preferences; optionally the saved recommendations
    /// along with them.
    pub async fn clear_preferences(
        &self,
        clear_recommendations_also: bool,
    ) -> Result<(), VkmError> {
        let builder = self
            .api
            .request(Method::DELETE, PREFERENCES_PATH)
            .query(&[("clearRecommendationsAlso", clear_recommendations_also)]);
        self.api.execute_unit(builder, PREFERENCES_PATH).await?;
        self.invalidate_cached_profile();
        Ok(())
    }

    /// Adds one module to the saved-recommendation list.
    pub async fn add_recommendation(&self, module_id: &str) -> Result<(), VkmError> {
        let body = SaveRecommendation {
            module_id: module_id.to_string(),
        };
        self.api
            .execute_unit(
                self.api
                    .request(Method::POST, RECOMMENDATIONS_PATH)
                    .json(&body),
                RECOMMENDATIONS_PATH,
            )
            .await?;
        self.invalidate_cached_profile();
        info!(module_id = %module_id, "Saved recommendation");
        Ok(())
    }

    /// Removes one module from the saved-recommendation list.
    pub async fn remove_recommendation(&self, module_id: &str) -> Result<(), VkmError> {
        let path = format!("{RECOMMENDATIONS_PATH}/{module_id}");
        self.api
            .execute_unit(self.api.request(Method::DELETE, &path), &path)
            .await?;
        self.invalidate_cached_profile();
        Ok(())
    }

    /// Clears the whole saved-recommendation list.
    pub async fn clear_recommendations(&self) -> Result<(), VkmError> {
        self.api
            .execute_unit(
                self.api.request(Method::DELETE, RECOMMENDATIONS_PATH),
                RECOMMENDATIONS_PATH,
            )
            .await?;
        self.invalidate_cached_profile();
        Ok(())
    }
}
