//! Configuration for the AgriConnect simulator.
//!
//! A TOML file in the platform config directory, overridden by
//! `AGRICONNECT_` environment variables, resolved into the
//! `agriconnect_core::MarketConfig` a market is built from. Secrets go
//! through a credential chain (env var, system keyring, plaintext) and
//! only ever live in `SecretString`s once resolved.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use agriconnect_core::config::{
    DEFAULT_ADVISOR_BASE_URL, DEFAULT_ADVISOR_MODEL, DEFAULT_DEALER_PASSWORD,
    DEFAULT_DEALER_USERNAME,
};
use agriconnect_core::{AdvisorSettings, DealerCredentials, DeviceSkin, Language, MarketConfig};

/// Keyring service name for stored secrets.
pub const KEYRING_SERVICE: &str = "agriconnect";
const ADVISOR_KEY_ENTRY: &str = "advisor/api-key";
const DEALER_PASSWORD_ENTRY: &str = "dealer/password";

/// Environment variables consulted when no `*_env` override is set.
pub const ADVISOR_KEY_ENV: &str = "GEMINI_API_KEY";
pub const DEALER_PASSWORD_ENV: &str = "AGRICONNECT_DEALER_PASSWORD";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub defaults: Defaults,

    #[serde(default)]
    pub dealer: DealerSection,

    #[serde(default)]
    pub advisor: AdvisorSection,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    /// Handset language at startup.
    #[serde(default)]
    pub language: Language,

    /// Handset frame drawn by the CLI.
    #[serde(default)]
    pub device: DeviceSkin,

    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    /// Standard network pause in milliseconds; 0 disables pauses.
    #[serde(default = "default_latency_ms")]
    pub latency_ms: u64,

    /// Seed the market with demo records.
    #[serde(default = "default_true")]
    pub demo_data: bool,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            language: Language::En,
            device: DeviceSkin::Touchscreen,
            output: default_output(),
            color: default_color(),
            latency_ms: default_latency_ms(),
            demo_data: true,
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_latency_ms() -> u64 {
    300
}
fn default_true() -> bool {
    true
}

/// Dealer dashboard login.
#[derive(Debug, Deserialize, Serialize)]
pub struct DealerSection {
    #[serde(default = "default_dealer_username")]
    pub username: String,

    /// Password (plaintext, prefer keyring or env var).
    pub password: Option<String>,

    /// Environment variable name containing the password.
    pub password_env: Option<String>,
}

impl Default for DealerSection {
    fn default() -> Self {
        Self {
            username: default_dealer_username(),
            password: None,
            password_env: None,
        }
    }
}

fn default_dealer_username() -> String {
    DEFAULT_DEALER_USERNAME.into()
}

/// Hosted advisor. Without a resolvable API key the offline advisor is used.
#[derive(Debug, Deserialize, Serialize)]
pub struct AdvisorSection {
    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// API key (plaintext, prefer keyring or env var).
    pub api_key: Option<String>,

    /// Environment variable name containing the API key.
    pub api_key_env: Option<String>,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for AdvisorSection {
    fn default() -> Self {
        Self {
            model: default_model(),
            base_url: default_base_url(),
            api_key: None,
            api_key_env: None,
            timeout: default_timeout(),
        }
    }
}

fn default_model() -> String {
    DEFAULT_ADVISOR_MODEL.into()
}
fn default_base_url() -> String {
    DEFAULT_ADVISOR_BASE_URL.into()
}
fn default_timeout() -> u64 {
    30
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("et", "agriconnect", "agriconnect").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("agriconnect");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit file. A missing file yields the defaults.
///
/// Environment keys nest with a double underscore, e.g.
/// `AGRICONNECT_DEFAULTS__LANGUAGE=am`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    debug!(path = %path.display(), "loading config");
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("AGRICONNECT_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if it can't be read.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(cfg, &path)?;
    Ok(path)
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Credential resolution ───────────────────────────────────────────

/// Walk the credential chain: named env var, system keyring, plaintext.
fn resolve_secret(
    env_name: &str,
    keyring_entry: &str,
    plaintext: Option<&str>,
) -> Option<SecretString> {
    // 1. Env var
    if let Ok(val) = std::env::var(env_name) {
        if !val.trim().is_empty() {
            return Some(SecretString::from(val));
        }
    }

    // 2. System keyring
    if let Ok(entry) = keyring::Entry::new(KEYRING_SERVICE, keyring_entry) {
        if let Ok(secret) = entry.get_password() {
            return Some(SecretString::from(secret));
        }
    }

    // 3. Plaintext in config
    plaintext
        .filter(|s| !s.trim().is_empty())
        .map(|s| SecretString::from(s.to_owned()))
}

/// The hosted advisor's API key, if any source provides one.
pub fn resolve_advisor_key(section: &AdvisorSection) -> Option<SecretString> {
    let env_name = section.api_key_env.as_deref().unwrap_or(ADVISOR_KEY_ENV);
    resolve_secret(env_name, ADVISOR_KEY_ENTRY, section.api_key.as_deref())
}

/// The dealer password, falling back to the built-in demo password.
pub fn resolve_dealer_password(section: &DealerSection) -> SecretString {
    let env_name = section.password_env.as_deref().unwrap_or(DEALER_PASSWORD_ENV);
    resolve_secret(env_name, DEALER_PASSWORD_ENTRY, section.password.as_deref())
        .unwrap_or_else(|| SecretString::from(DEFAULT_DEALER_PASSWORD.to_owned()))
}

/// Store the advisor API key in the system keyring.
pub fn store_advisor_key(key: &SecretString) -> Result<(), ConfigError> {
    let entry = keyring::Entry::new(KEYRING_SERVICE, ADVISOR_KEY_ENTRY)?;
    entry.set_password(key.expose_secret())?;
    Ok(())
}

// ── Translation to MarketConfig ─────────────────────────────────────

/// Advisor settings: hosted when a key resolves, offline otherwise.
pub fn advisor_settings(section: &AdvisorSection) -> Result<AdvisorSettings, ConfigError> {
    let Some(api_key) = resolve_advisor_key(section) else {
        return Ok(AdvisorSettings::Offline);
    };

    let base_url: url::Url = section
        .base_url
        .parse()
        .map_err(|_| ConfigError::Validation {
            field: "advisor.base_url".into(),
            reason: format!("invalid URL: {}", section.base_url),
        })?;

    if section.model.trim().is_empty() {
        return Err(ConfigError::Validation {
            field: "advisor.model".into(),
            reason: "must not be empty".into(),
        });
    }

    Ok(AdvisorSettings::Gemini {
        api_key,
        model: section.model.trim().to_owned(),
        base_url,
        timeout: Duration::from_secs(section.timeout),
    })
}

/// Build the `MarketConfig` a market starts from.
pub fn to_market_config(cfg: &Config) -> Result<MarketConfig, ConfigError> {
    if cfg.dealer.username.trim().is_empty() {
        return Err(ConfigError::Validation {
            field: "dealer.username".into(),
            reason: "must not be empty".into(),
        });
    }

    Ok(MarketConfig {
        dealer: DealerCredentials {
            username: cfg.dealer.username.trim().to_owned(),
            password: resolve_dealer_password(&cfg.dealer),
        },
        advisor: advisor_settings(&cfg.advisor)?,
        demo_data: cfg.defaults.demo_data,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::result_large_err)]
mod tests {
    use figment::Jail;

    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        Jail::expect_with(|jail| {
            let cfg = load_config_from(&jail.directory().join("absent.toml")).unwrap();
            assert_eq!(cfg.defaults.language, Language::En);
            assert_eq!(cfg.defaults.device, DeviceSkin::Touchscreen);
            assert_eq!(cfg.defaults.latency_ms, 300);
            assert_eq!(cfg.dealer.username, "admin");
            assert_eq!(cfg.advisor.model, DEFAULT_ADVISOR_MODEL);
            Ok(())
        });
    }

    #[test]
    fn file_then_env_override() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                r#"
                [defaults]
                language = "am"
                device = "feature-phone"
                latency_ms = 0

                [dealer]
                username = "dealer1"
                "#,
            )?;
            jail.set_env("AGRICONNECT_DEFAULTS__OUTPUT", "json");

            let cfg = load_config_from(&jail.directory().join("config.toml")).unwrap();
            assert_eq!(cfg.defaults.language, Language::Am);
            assert_eq!(cfg.defaults.device, DeviceSkin::FeaturePhone);
            assert_eq!(cfg.defaults.latency_ms, 0);
            assert_eq!(cfg.defaults.output, "json");
            assert_eq!(cfg.dealer.username, "dealer1");
            Ok(())
        });
    }

    #[test]
    fn bad_language_fails_to_load() {
        Jail::expect_with(|jail| {
            jail.create_file("config.toml", "[defaults]\nlanguage = \"fr\"\n")?;
            let result = load_config_from(&jail.directory().join("config.toml"));
            assert!(matches!(result, Err(ConfigError::Figment(_))));
            Ok(())
        });
    }

    #[test]
    fn save_then_load_keeps_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.defaults.language = Language::Am;
        cfg.advisor.api_key_env = Some("MY_KEY".into());
        save_config_to(&cfg, &path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("language = \"am\""));

        let loaded: Config = toml::from_str(&written).unwrap();
        assert_eq!(loaded.defaults.language, Language::Am);
        assert_eq!(loaded.advisor.api_key_env.as_deref(), Some("MY_KEY"));
    }

    #[test]
    fn env_key_selects_hosted_advisor() {
        Jail::expect_with(|jail| {
            jail.set_env("AGRI_TEST_ADVISOR_KEY", "from-env");
            let section = AdvisorSection {
                api_key_env: Some("AGRI_TEST_ADVISOR_KEY".into()),
                ..AdvisorSection::default()
            };

            let AdvisorSettings::Gemini { api_key, model, .. } =
                advisor_settings(&section).unwrap()
            else {
                panic!("expected the hosted advisor");
            };
            assert_eq!(api_key.expose_secret(), "from-env");
            assert_eq!(model, DEFAULT_ADVISOR_MODEL);
            Ok(())
        });
    }

    #[test]
    fn invalid_base_url_is_reported() {
        let section = AdvisorSection {
            base_url: "not a url".into(),
            api_key: Some("plain".into()),
            api_key_env: Some("AGRI_TEST_UNSET_KEY".into()),
            ..AdvisorSection::default()
        };
        let err = advisor_settings(&section).unwrap_err();
        assert!(err.to_string().contains("advisor.base_url"));
    }

    #[test]
    fn dealer_password_prefers_env() {
        Jail::expect_with(|jail| {
            jail.set_env("AGRI_TEST_DEALER_PW", "s3cret");
            let section = DealerSection {
                password: Some("plain".into()),
                password_env: Some("AGRI_TEST_DEALER_PW".into()),
                ..DealerSection::default()
            };
            assert_eq!(resolve_dealer_password(&section).expose_secret(), "s3cret");
            Ok(())
        });
    }

    #[test]
    fn blank_dealer_username_is_rejected() {
        let mut cfg = Config::default();
        cfg.dealer.username = "  ".into();
        let err = to_market_config(&cfg).unwrap_err();
        assert!(err.to_string().contains("dealer.username"));
    }
}
