// ── Runtime market configuration ──
//
// These types describe how a `Market` is set up: who may log into the
// dealer dashboard and which advisor answers farmers. They carry secrets
// but never touch disk. The CLI builds a `MarketConfig` and hands it in.

use std::time::Duration;

use secrecy::SecretString;
use url::Url;

pub const DEFAULT_DEALER_USERNAME: &str = "admin";
pub const DEFAULT_DEALER_PASSWORD: &str = "password";
pub const DEFAULT_ADVISOR_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_ADVISOR_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Credentials checked by the dealer dashboard login.
#[derive(Debug, Clone)]
pub struct DealerCredentials {
    pub username: String,
    pub password: SecretString,
}

impl Default for DealerCredentials {
    fn default() -> Self {
        Self {
            username: DEFAULT_DEALER_USERNAME.into(),
            password: SecretString::from(DEFAULT_DEALER_PASSWORD.to_owned()),
        }
    }
}

/// Which advisor generates tips, SMS replies and ticket suggestions.
#[derive(Debug, Clone, Default)]
pub enum AdvisorSettings {
    /// Canned replies. Used whenever no API key resolves.
    #[default]
    Offline,
    /// Hosted `generateContent` model.
    Gemini {
        api_key: SecretString,
        model: String,
        base_url: Url,
        timeout: Duration,
    },
}

/// Configuration for one market instance.
#[derive(Debug, Clone)]
pub struct MarketConfig {
    pub dealer: DealerCredentials,
    pub advisor: AdvisorSettings,
    /// Start with the demo catalog and backlog instead of empty collections.
    pub demo_data: bool,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            dealer: DealerCredentials::default(),
            advisor: AdvisorSettings::Offline,
            demo_data: true,
        }
    }
}
