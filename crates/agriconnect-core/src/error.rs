// ── Core error types ──
//
// User-facing errors from agriconnect-core. The USSD controller never
// produces these: every handset input has a defined screen to land on.
// They come from dashboard commands, the dealer login and advisor setup.

use thiserror::Error;

use crate::model::EntityId;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Data errors ──────────────────────────────────────────────────
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    #[error("No market price listed for {crop}")]
    UnknownCrop { crop: String },

    // ── Operation errors ─────────────────────────────────────────────
    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    #[error("Invalid status change for {id}: {message}")]
    InvalidTransition { id: EntityId, message: String },

    // ── Access errors ────────────────────────────────────────────────
    #[error("Invalid credentials for {username}")]
    AuthenticationFailed { username: String },

    // ── Advisor errors ───────────────────────────────────────────────
    #[error("Advisor request failed: {message}")]
    Advisor { message: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    pub(crate) fn not_found(entity_type: &'static str, id: &EntityId) -> Self {
        Self::NotFound {
            entity_type,
            identifier: id.to_string(),
        }
    }

    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::ValidationFailed {
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for CoreError {
    fn from(err: reqwest::Error) -> Self {
        Self::Advisor {
            message: err.without_url().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_names_the_record() {
        let err = CoreError::not_found("Ticket", &EntityId::from("T-0001"));
        assert_eq!(err.to_string(), "Ticket not found: T-0001");
    }
}
