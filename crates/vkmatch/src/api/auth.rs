//! Login, registration, and the local password-strength hint.

use reqwest::Method;
use tracing::info;

use super::types::{LoginRequest, RegisterRequest, RegisterResponse, TokenResponse};
use super::ApiClient;
use crate::cache::SessionKey;
use crate::error::VkmError;
use crate::locale::Language;

const LOGIN_PATH: &str = "/auth/login";
const REGISTER_PATH: &str = "/auth/register";

/// Thin wrapper over the auth endpoints; on login the bearer token is
/// written to the session store.
pub struct AuthSessionClient {
    api: ApiClient,
}

impl AuthSessionClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Logs in and stores the session token under the fixed key.
    pub async fn login(&self, email: &str, password: &str) -> Result<(), VkmError> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };

        let response: TokenResponse = self
            .api
            .execute_json(
                self.api.request(Method::POST, LOGIN_PATH).json(&body),
                LOGIN_PATH,
            )
            .await?;

        self.api.session().set_token(&response.token)?;
        info!(
            session = %SessionKey::from_token(&response.token),
            "Login succeeded, session stored"
        );
        Ok(())
    }

    /// Registers a new account. Does not log in; the caller switches the
    /// form to login mode and shows the returned message.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        name: &str,
        role: Option<&str>,
    ) -> Result<String, VkmError> {
        let body = RegisterRequest {
            email: email.to_string(),
            password: password.to_string(),
            name: name.to_string(),
            role: role.map(|r| r.to_string()),
        };

        let response: RegisterResponse = self
            .api
            .execute_json(
                self.api.request(Method::POST, REGISTER_PATH).json(&body),
                REGISTER_PATH,
            )
            .await?;

        Ok(response
            .message
            .unwrap_or_else(|| "Account aangemaakt.".to_string()))
    }

    /// Drops the stored session token.
    pub fn logout(&self) -> Result<(), VkmError> {
        self.api.session().clear_token()
    }
}

/// Five-level password strength label.
///
/// Cosmetic client-side feedback only, not a security boundary; the
/// backend enforces the actual password policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PasswordStrength {
    VeryWeak,
    Weak,
    Fair,
    Strong,
    VeryStrong,
}

impl PasswordStrength {
    /// Scores a password: one point each for length >= 8, length >= 12,
    /// mixed case, a digit, and a symbol.
    pub fn score(password: &str) -> u8 {
        let mut score = 0u8;
        let len = password.chars().count();

        if len >= 8 {
            score += 1;
        }
        if len >= 12 {
            score += 1;
        }
        if password.chars().any(|c| c.is_lowercase())
            && password.chars().any(|c| c.is_uppercase())
        {
            score += 1;
        }
        if password.chars().any(|c| c.is_ascii_digit()) {
            score += 1;
        }
        if password.chars().any(|c| !c.is_alphanumeric()) {
            score += 1;
        }

        score
    }

    pub fn from_password(password: &str) -> Self {
        match Self::score(password) {
            0 | 1 => PasswordStrength::VeryWeak,
            2 => PasswordStrength::Weak,
            3 => PasswordStrength::Fair,
            4 => PasswordStrength::Strong,
            _ => PasswordStrength::VeryStrong,
        }
    }

    pub fn label(&self, lang: Language) -> &'static str {
        match lang {
            Language::Nl => match self {
                PasswordStrength::VeryWeak => "zeer zwak",
                PasswordStrength::Weak => "zwak",
                PasswordStrength::Fair => "redelijk",
                PasswordStrength::Strong => "sterk",
                PasswordStrength::VeryStrong => "zeer sterk",
            },
            Language::En => match self {
                PasswordStrength::VeryWeak => "very weak",
                PasswordStrength::Weak => "weak",
                PasswordStrength::Fair => "fair",
                PasswordStrength::Strong => "strong",
                PasswordStrength::VeryStrong => "very strong",
            },
        }
    }
}
