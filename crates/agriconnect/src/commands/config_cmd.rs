//! Config subcommand handlers.

use dialoguer::{Confirm, Input, Select};
use secrecy::SecretString;

use agriconnect_core::{DeviceSkin, Language};

use crate::cli::{ConfigArgs, ConfigCommand};
use crate::config::{self, Config};
use crate::error::CliError;

// ── Helpers ─────────────────────────────────────────────────────────

/// Format config for display, masking secrets.
fn format_config_redacted(cfg: &Config) -> String {
    use std::fmt::Write;
    let mut out = String::new();

    let d = &cfg.defaults;
    let _ = writeln!(out, "[defaults]");
    let _ = writeln!(out, "language = \"{}\"", d.language);
    let _ = writeln!(out, "device = \"{}\"", d.device);
    let _ = writeln!(out, "output = \"{}\"", d.output);
    let _ = writeln!(out, "color = \"{}\"", d.color);
    let _ = writeln!(out, "latency_ms = {}", d.latency_ms);
    let _ = writeln!(out, "demo_data = {}", d.demo_data);

    let _ = writeln!(out);
    let _ = writeln!(out, "[dealer]");
    let _ = writeln!(out, "username = \"{}\"", cfg.dealer.username);
    if cfg.dealer.password.is_some() {
        let _ = writeln!(out, "password = \"****\"");
    }
    if let Some(ref env) = cfg.dealer.password_env {
        let _ = writeln!(out, "password_env = \"{env}\"");
    }

    let a = &cfg.advisor;
    let _ = writeln!(out);
    let _ = writeln!(out, "[advisor]");
    let _ = writeln!(out, "model = \"{}\"", a.model);
    let _ = writeln!(out, "base_url = \"{}\"", a.base_url);
    if a.api_key.is_some() {
        let _ = writeln!(out, "api_key = \"****\"");
    }
    if let Some(ref env) = a.api_key_env {
        let _ = writeln!(out, "api_key_env = \"{env}\"");
    }
    let _ = writeln!(out, "timeout = {}", a.timeout);

    out
}

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

/// Ask for the advisor key and where to keep it. Returns the key when it
/// belongs in the config file, `None` when skipped or kept in the keyring.
fn prompt_advisor_key() -> Result<Option<String>, CliError> {
    let wants_key = Confirm::new()
        .with_prompt("Use the hosted Gemini advisor? (otherwise offline replies)")
        .default(false)
        .interact()
        .map_err(prompt_err)?;
    if !wants_key {
        return Ok(None);
    }

    let key = rpassword::prompt_password("Gemini API key: ").map_err(prompt_err)?;
    if key.trim().is_empty() {
        return Err(CliError::Validation {
            field: "api_key".into(),
            reason: "API key cannot be empty".into(),
        });
    }

    let choices = &[
        "Store in system keyring (recommended)",
        "Save to config file (plaintext)",
    ];
    let selection = Select::new()
        .with_prompt("Where to store the API key?")
        .items(choices)
        .default(0)
        .interact()
        .map_err(prompt_err)?;

    if selection == 0 {
        config::store_advisor_key(&SecretString::from(key))?;
        eprintln!("   ✓ API key stored in system keyring");
        Ok(None)
    } else {
        Ok(Some(key))
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Init => {
            let config_path = config::config_path();
            eprintln!("🌾 AgriConnect configuration wizard");
            eprintln!("   Config path: {}\n", config_path.display());

            let mut cfg = config::load_config_or_default();

            let languages = ["English", "አማርኛ (Amharic)"];
            let language = Select::new()
                .with_prompt("Handset language")
                .items(&languages)
                .default(usize::from(cfg.defaults.language == Language::Am))
                .interact()
                .map_err(prompt_err)?;
            cfg.defaults.language = if language == 1 {
                Language::Am
            } else {
                Language::En
            };

            let devices = ["Touchscreen smartphone", "Feature phone"];
            let device = Select::new()
                .with_prompt("Handset frame")
                .items(&devices)
                .default(usize::from(cfg.defaults.device == DeviceSkin::FeaturePhone))
                .interact()
                .map_err(prompt_err)?;
            cfg.defaults.device = if device == 1 {
                DeviceSkin::FeaturePhone
            } else {
                DeviceSkin::Touchscreen
            };

            cfg.defaults.latency_ms = Input::new()
                .with_prompt("Network pause in ms (0 = instant)")
                .default(cfg.defaults.latency_ms)
                .interact_text()
                .map_err(prompt_err)?;

            cfg.dealer.username = Input::new()
                .with_prompt("Dealer username")
                .default(cfg.dealer.username.clone())
                .interact_text()
                .map_err(prompt_err)?;

            if let Some(key) = prompt_advisor_key()? {
                cfg.advisor.api_key = Some(key);
            }

            let path = config::save_config(&cfg)?;
            eprintln!("\n   ✓ Saved {}", path.display());
            Ok(())
        }

        ConfigCommand::Show => {
            let cfg = config::load_config()?;
            print!("{}", format_config_redacted(&cfg));
            Ok(())
        }

        ConfigCommand::Path => {
            println!("{}", config::config_path().display());
            Ok(())
        }

        ConfigCommand::SetAdvisorKey => {
            let key = rpassword::prompt_password("Gemini API key: ").map_err(prompt_err)?;
            if key.trim().is_empty() {
                return Err(CliError::Validation {
                    field: "api_key".into(),
                    reason: "API key cannot be empty".into(),
                });
            }
            config::store_advisor_key(&SecretString::from(key))?;
            eprintln!("✓ Advisor key stored in system keyring");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn show_masks_secrets() {
        let mut cfg = Config::default();
        cfg.advisor.api_key = Some("AIza-secret".into());
        cfg.dealer.password = Some("hunter2".into());

        let out = format_config_redacted(&cfg);
        assert!(!out.contains("AIza-secret"));
        assert!(!out.contains("hunter2"));
        assert!(out.contains("api_key = \"****\""));
        assert!(out.contains("username = \"admin\""));
        assert!(out.contains("language = \"en\""));
    }
}
