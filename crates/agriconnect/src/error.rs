//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use agriconnect_config::ConfigError;
use agriconnect_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONFLICT: i32 = 6;
    pub const CONFIG: i32 = 9;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Authentication ───────────────────────────────────────────────
    #[error("Dealer login failed for '{username}'")]
    #[diagnostic(
        code(agriconnect::auth_failed),
        help(
            "The demo dealer account is admin / password.\n\
             Change it under [dealer] in the config file or with AGRICONNECT_DEALER_PASSWORD."
        )
    )]
    AuthFailed { username: String },

    #[error("'{action}' needs a dealer login")]
    #[diagnostic(
        code(agriconnect::login_required),
        help("Run `login <username>` in the console first.")
    )]
    LoginRequired { action: String },

    // ── Records ──────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(agriconnect::not_found),
        help("Run `{list_command}` to see available {resource_type}s")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    #[error("Cannot change {id}: {reason}")]
    #[diagnostic(code(agriconnect::conflict))]
    Conflict { id: String, reason: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(agriconnect::validation))]
    Validation { field: String, reason: String },

    // ── Advisor ──────────────────────────────────────────────────────
    #[error("Advisor unavailable: {message}")]
    #[diagnostic(
        code(agriconnect::advisor),
        help("Check the [advisor] section, or unset the API key to use offline replies.")
    )]
    Advisor { message: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error(transparent)]
    #[diagnostic(
        code(agriconnect::config),
        help("Inspect the file with: agriconnect config show")
    )]
    Config(#[from] ConfigError),

    #[error("Internal error: {message}")]
    #[diagnostic(code(agriconnect::internal))]
    Internal { message: String },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Could not serialize output: {0}")]
    #[diagnostic(code(agriconnect::serialize))]
    Serialize(String),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::AuthFailed { .. } | Self::LoginRequired { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Conflict { .. } => exit_code::CONFLICT,
            Self::Validation { .. } => exit_code::USAGE,
            Self::Config(_) => exit_code::CONFIG,
            _ => exit_code::GENERAL,
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialize(err.to_string())
    }
}

impl From<serde_yaml::Error> for CliError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Serialize(err.to_string())
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NotFound {
                entity_type,
                identifier,
            } => CliError::NotFound {
                list_command: list_command_for(entity_type).into(),
                resource_type: entity_type.to_lowercase(),
                identifier,
            },

            CoreError::UnknownCrop { crop } => CliError::NotFound {
                resource_type: "crop".into(),
                identifier: crop,
                list_command: "prices".into(),
            },

            CoreError::ValidationFailed { message } => CliError::Validation {
                field: "input".into(),
                reason: message,
            },

            CoreError::InvalidTransition { id, message } => CliError::Conflict {
                id: id.to_string(),
                reason: message,
            },

            CoreError::AuthenticationFailed { username } => CliError::AuthFailed { username },

            CoreError::Advisor { message } => CliError::Advisor { message },

            CoreError::Config { message } => CliError::Config(ConfigError::Validation {
                field: "market".into(),
                reason: message,
            }),

            CoreError::Internal(message) => CliError::Internal { message },
        }
    }
}

fn list_command_for(entity_type: &str) -> &'static str {
    match entity_type {
        "Product" => "inventory",
        "Offer" => "offers",
        "Order" => "orders",
        "Ticket" => "tickets",
        _ => "help",
    }
}
