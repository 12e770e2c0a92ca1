//! Recommendation wizard state machine.
//!
//! A fixed sequence of named steps collecting interests, location,
//! credit/difficulty constraints, and tags, ending in a single POST to
//! the recommendation endpoint. Steps are a closed enum so illegal
//! transitions are unrepresentable; each step validates its own field
//! before the wizard advances.

mod suggest;

pub use suggest::{suggest_tags, tokenize, TagSuggestion, MAX_SUGGESTIONS, MIN_SUGGEST_INPUT_LEN};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::api::recommend::RecommendClient;
use crate::api::types::{RecommendationRequest, RecommendationResult};
use crate::error::VkmError;

/// Minimum trimmed length of the interests text before the wizard may
/// leave the Interests step.
pub const MIN_INTEREST_LEN: usize = 10;

/// Per-factor weights sent with every recommendation request.
///
/// The defaults are used verbatim unless the user opens the advanced
/// panel and changes them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FactorWeights {
    pub text: f64,
    pub location: f64,
    pub tags: f64,
    pub difficulty: f64,
    pub popularity: f64,
}

impl Default for FactorWeights {
    fn default() -> Self {
        Self {
            text: 0.7,
            location: 0.4,
            tags: 0.3,
            difficulty: 0.2,
            popularity: 0.1,
        }
    }
}

impl FactorWeights {
    /// Checks that every weight is a finite value in [0, 1].
    pub fn validate(&self) -> Result<(), VkmError> {
        let all = [
            self.text,
            self.location,
            self.tags,
            self.difficulty,
            self.popularity,
        ];
        if all.iter().all(|w| w.is_finite() && (0.0..=1.0).contains(w)) {
            Ok(())
        } else {
            Err(VkmError::Validation {
                message: "Wegingen moeten tussen 0 en 1 liggen.".to_string(),
            })
        }
    }
}

/// The wizard's named steps, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WizardStep {
    #[default]
    Intro,
    Interests,
    Location,
    Filters,
    Tags,
    Results,
}

impl WizardStep {
    /// The step after this one, if advancing is a plain transition.
    /// Leaving Tags is not: that goes through [`WizardState::submit`].
    fn next(self) -> Option<WizardStep> {
        match self {
            WizardStep::Intro => Some(WizardStep::Interests),
            WizardStep::Interests => Some(WizardStep::Location),
            WizardStep::Location => Some(WizardStep::Filters),
            WizardStep::Filters => Some(WizardStep::Tags),
            WizardStep::Tags | WizardStep::Results => None,
        }
    }

    fn prev(self) -> Option<WizardStep> {
        match self {
            WizardStep::Intro => None,
            WizardStep::Interests => Some(WizardStep::Intro),
            WizardStep::Location => Some(WizardStep::Interests),
            WizardStep::Filters => Some(WizardStep::Location),
            WizardStep::Tags => Some(WizardStep::Filters),
            WizardStep::Results => Some(WizardStep::Tags),
        }
    }
}

/// Outcome of the single recommendation request.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ResultsState {
    /// No request issued yet
    #[default]
    Idle,
    Loading,
    Success(Vec<RecommendationResult>),
    /// The request succeeded but matched nothing
    Empty,
    /// The request failed; retry re-issues the identical payload
    Error(VkmError),
}

/// All wizard state. Created on mount, reset on restart.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WizardState {
    step: WizardStep,
    pub interests: String,
    pub location: Option<String>,
    /// 0 means no minimum
    pub min_credits: u32,
    /// None means no cap
    pub max_difficulty: Option<u32>,
    pub tags: Vec<String>,
    pub weights: FactorWeights,
    results: ResultsState,
    in_flight: bool,
}

impl WizardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn results(&self) -> &ResultsState {
        &self.results
    }

    /// True while the recommendation request is running; the triggering
    /// control must be disabled so duplicates cannot be submitted.
    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    /// Whether the current step's own field passes validation.
    pub fn can_advance(&self) -> bool {
        match self.step {
            WizardStep::Intro | WizardStep::Location | WizardStep::Filters => true,
            WizardStep::Interests => {
                self.interests.trim().chars().count() >= MIN_INTEREST_LEN
            }
            // Leaving Tags means submitting; Results is terminal
            WizardStep::Tags | WizardStep::Results => false,
        }
    }

    /// Moves forward one step after validating the current one.
    pub fn advance(&mut self) -> Result<(), VkmError> {
        if self.step == WizardStep::Interests && !self.can_advance() {
            return Err(VkmError::Validation {
                message: format!(
                    "Beschrijf je interesses in minstens {MIN_INTEREST_LEN} tekens."
                ),
            });
        }

        match self.step.next() {
            Some(next) => {
                self.step = next;
                Ok(())
            }
            None => Err(VkmError::Validation {
                message: "Deze stap heeft geen volgende stap.".to_string(),
            }),
        }
    }

    /// Moves back one step. Always permitted; clears nothing.
    pub fn back(&mut self) {
        if let Some(prev) = self.step.prev() {
            self.step = prev;
        }
    }

    /// Resets every field to its initial default and returns to Intro.
    pub fn restart(&mut self) {
        *self = Self::default();
    }

    /// The request payload derived from the current state.
    ///
    /// Pure: calling this twice on unchanged state yields an identical
    /// payload, which is what makes retry re-issue the same request.
    pub fn build_request(&self) -> RecommendationRequest {
        RecommendationRequest {
            interests: self.interests.trim().to_string(),
            location: self.location.clone(),
            min_credits: (self.min_credits > 0).then_some(self.min_credits),
            max_difficulty: self.max_difficulty,
            tags: self.tags.clone(),
            weights: self.weights.clone(),
        }
    }

    /// Leaves the Tags step: issues the single recommendation request
    /// and lands on Results with the outcome.
    pub async fn submit(&mut self, client: &RecommendClient) -> Result<(), VkmError> {
        if self.step != WizardStep::Tags {
            return Err(VkmError::Validation {
                message: "Rond eerst de eerdere stappen af.".to_string(),
            });
        }
        self.weights.validate()?;
        self.step = WizardStep::Results;
        self.send(client).await;
        Ok(())
    }

    /// Re-issues the identical request after a failure. Only meaningful
    /// on the Results step; never triggered automatically.
    pub async fn retry(&mut self, client: &RecommendClient) -> Result<(), VkmError> {
        if self.step != WizardStep::Results {
            return Err(VkmError::Validation {
                message: "Er is nog geen aanvraag om opnieuw te proberen.".to_string(),
            });
        }
        self.send(client).await;
        Ok(())
    }

    async fn send(&mut self, client: &RecommendClient) {
        if self.in_flight {
            debug!("Recommendation request already in flight, ignoring");
            return;
        }

        self.in_flight = true;
        self.results = ResultsState::Loading;

        let request = self.build_request();
        match client.get_recommendations(&request).await {
            Ok(matches) if matches.is_empty() => {
                info!("Recommendation request matched nothing");
                self.results = ResultsState::Empty;
            }
            Ok(matches) => {
                info!(count = matches.len(), "Received ranked recommendations");
                self.results = ResultsState::Success(matches);
            }
            Err(e) => {
                self.results = ResultsState::Error(e);
            }
        }

        self.in_flight = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiClient;
    use crate::config::ApiConfig;
    use crate::session::SessionStore;
    use std::sync::Arc;

    fn unreachable_client() -> RecommendClient {
        let config = ApiConfig {
            base_url: "http://127.0.0.1:1".to_string(),
            recommend_url: "http://127.0.0.1:1/api/recommendations/getrecommend".to_string(),
            ..ApiConfig::default()
        };
        let session = Arc::new(SessionStore::in_memory().unwrap());
        RecommendClient::new(ApiClient::new(config, session).unwrap())
    }

    fn filled_state() -> WizardState {
        let mut state = WizardState::new();
        state.interests = "robots en kunstmatige intelligentie".to_string();
        state.location = Some("Utrecht".to_string());
        state.min_credits = 3;
        state.max_difficulty = Some(4);
        state.tags = vec!["ai".to_string()];
        state
    }

    #[test]
    fn default_weights_match_fixed_constants() {
        let weights = FactorWeights::default();
        assert_eq!(weights.text, 0.7);
        assert_eq!(weights.location, 0.4);
        assert_eq!(weights.tags, 0.3);
        assert_eq!(weights.difficulty, 0.2);
        assert_eq!(weights.popularity, 0.1);
    }

    #[test]
    fn weights_outside_unit_interval_are_rejected() {
        let mut weights = FactorWeights::default();
        weights.tags = 1.5;
        assert!(weights.validate().is_err());

        weights.tags = f64::NAN;
        assert!(weights.validate().is_err());
    }

    #[test]
    fn short_interests_cannot_advance() {
        let mut state = WizardState::new();
        state.advance().unwrap(); // Intro -> Interests
        state.interests = "kunst".to_string(); // 5 characters
        assert!(!state.can_advance());
        assert!(state.advance().is_err());
        assert_eq!(state.step(), WizardStep::Interests);
    }

    #[test]
    fn full_forward_walk_reaches_tags() {
        let mut state = filled_state();
        for expected in [
            WizardStep::Interests,
            WizardStep::Location,
            WizardStep::Filters,
            WizardStep::Tags,
        ] {
            state.advance().unwrap();
            assert_eq!(state.step(), expected);
        }
        // Tags has no plain next step; leaving it goes through submit()
        assert!(state.advance().is_err());
    }

    #[test]
    fn back_is_always_permitted_and_clears_nothing() {
        let mut state = filled_state();
        state.advance().unwrap();
        state.advance().unwrap();
        state.back();
        assert_eq!(state.step(), WizardStep::Interests);
        assert_eq!(state.location, Some("Utrecht".to_string()));
        assert_eq!(state.tags, vec!["ai".to_string()]);

        state.back();
        state.back(); // already at Intro, stays there
        assert_eq!(state.step(), WizardStep::Intro);
    }

    #[test]
    fn restart_returns_to_defaults_from_any_state() {
        let mut state = filled_state();
        state.advance().unwrap();
        state.advance().unwrap();
        state.weights.text = 0.9;

        state.restart();
        assert_eq!(state, WizardState::default());
        assert_eq!(state.step(), WizardStep::Intro);
    }

    #[test]
    fn request_payload_omits_unset_constraints() {
        let mut state = WizardState::new();
        state.interests = "  iets met veel ruimte  ".to_string();
        let request = state.build_request();
        assert_eq!(request.interests, "iets met veel ruimte");
        assert_eq!(request.min_credits, None);
        assert_eq!(request.max_difficulty, None);
        assert!(request.location.is_none());
    }

    #[test]
    fn retry_payload_is_identical() {
        let state = filled_state();
        let first = serde_json::to_value(state.build_request()).unwrap();
        let second = serde_json::to_value(state.build_request()).unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn network_failure_surfaces_error_state_with_retry() {
        tracing_subscriber::fmt().with_test_writer().try_init().ok();

        let client = unreachable_client();
        let mut state = filled_state();
        for _ in 0..4 {
            state.advance().unwrap();
        }

        state.submit(&client).await.unwrap();
        assert_eq!(state.step(), WizardStep::Results);
        assert!(matches!(state.results(), ResultsState::Error(e) if e.is_retryable()));
        assert!(!state.is_in_flight());

        // Explicit retry re-issues the same request and fails the same way
        state.retry(&client).await.unwrap();
        assert!(matches!(state.results(), ResultsState::Error(_)));
    }

    #[tokio::test]
    async fn submit_requires_the_tags_step() {
        let client = unreachable_client();
        let mut state = filled_state();
        assert!(state.submit(&client).await.is_err());
        assert_eq!(state.step(), WizardStep::Intro);
        assert_eq!(*state.results(), ResultsState::Idle);
    }
}
