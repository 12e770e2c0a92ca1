//! Error types for the client.
//!
//! Every failure a component can surface is a [`VkmError`]. Errors are
//! never fatal to the application; callers convert them to a localized
//! message with [`VkmError::localized`] and scope them to the view that
//! triggered the request.

use thiserror::Error;

use crate::locale::Language;

/// Errors that can occur in the catalog, wizard, and API clients.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VkmError {
    /// Network/transport failure (request never got a usable response)
    #[error("Network error: {message}")]
    Network { message: String },

    /// Server rejected the credentials or the session token (401)
    #[error("Unauthorized")]
    Unauthorized,

    /// Requested resource does not exist (404)
    #[error("Not found: {resource}")]
    NotFound { resource: String },

    /// Server-side domain failure with a message body
    #[error("Server error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Response arrived but could not be decoded
    #[error("Decode error: {message}")]
    Decode { message: String },

    /// Client-side validation failure (too-short input, bad range)
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// Local session store failure
    #[error("Storage error: {message}")]
    Storage { message: String },

    /// URL construction failed
    #[error("URL error: {message}")]
    Url { message: String },
}

impl VkmError {
    /// Returns true if the user needs to sign in (again) before retrying.
    pub fn needs_reauth(&self) -> bool {
        matches!(self, VkmError::Unauthorized)
    }

    /// Returns true if an explicit user-triggered retry could succeed.
    ///
    /// Nothing is ever retried automatically; this only drives whether a
    /// "try again" control is offered.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            VkmError::Network { .. } | VkmError::Api { .. } | VkmError::Decode { .. }
        )
    }

    /// Human-readable message for the given interface language.
    pub fn localized(&self, lang: Language) -> String {
        match lang {
            Language::Nl => match self {
                VkmError::Network { .. } => {
                    "Er ging iets mis met de verbinding. Probeer het opnieuw.".to_string()
                }
                VkmError::Unauthorized => {
                    "Je bent niet (meer) ingelogd. Log opnieuw in.".to_string()
                }
                VkmError::NotFound { .. } => "Deze module bestaat niet (meer).".to_string(),
                VkmError::Api { message, .. } => {
                    format!("De server gaf een foutmelding: {message}")
                }
                VkmError::Decode { .. } => {
                    "Het antwoord van de server kon niet worden gelezen.".to_string()
                }
                VkmError::Validation { message } => message.clone(),
                VkmError::Storage { .. } => {
                    "Je voorkeuren konden niet lokaal worden opgeslagen.".to_string()
                }
                VkmError::Url { .. } => "Ongeldig serveradres.".to_string(),
            },
            Language::En => match self {
                VkmError::Network { .. } => {
                    "Something went wrong with the connection. Please try again.".to_string()
                }
                VkmError::Unauthorized => "You are not signed in. Please log in again.".to_string(),
                VkmError::NotFound { .. } => "This module does not exist (anymore).".to_string(),
                VkmError::Api { message, .. } => {
                    format!("The server reported an error: {message}")
                }
                VkmError::Decode { .. } => "The server response could not be read.".to_string(),
                VkmError::Validation { message } => message.clone(),
                VkmError::Storage { .. } => {
                    "Your preferences could not be stored locally.".to_string()
                }
                VkmError::Url { .. } => "Invalid server address.".to_string(),
            },
        }
    }
}

impl From<reqwest::Error> for VkmError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            VkmError::Decode {
                message: err.to_string(),
            }
        } else {
            VkmError::Network {
                message: err.to_string(),
            }
        }
    }
}

impl From<serde_json::Error> for VkmError {
    fn from(err: serde_json::Error) -> Self {
        VkmError::Decode {
            message: err.to_string(),
        }
    }
}

impl From<url::ParseError> for VkmError {
    fn from(err: url::ParseError) -> Self {
        VkmError::Url {
            message: err.to_string(),
        }
    }
}

impl From<rusqlite::Error> for VkmError {
    fn from(err: rusqlite::Error) -> Self {
        VkmError::Storage {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthorized_needs_reauth() {
        assert!(VkmError::Unauthorized.needs_reauth());
        assert!(!VkmError::Unauthorized.is_retryable());
    }

    #[test]
    fn network_errors_offer_retry() {
        let err = VkmError::Network {
            message: "connection refused".to_string(),
        };
        assert!(err.is_retryable());
        assert!(!err.needs_reauth());
    }

    #[test]
    fn localized_messages_exist_for_both_languages() {
        let err = VkmError::NotFound {
            resource: "/api/keuzemodules/42".to_string(),
        };
        assert!(err.localized(Language::Nl).contains("module"));
        assert!(err.localized(Language::En).contains("module"));
    }
}
