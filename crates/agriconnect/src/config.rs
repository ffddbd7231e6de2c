//! CLI configuration: a thin wrapper around `agriconnect_config`.
//!
//! Re-exports the shared types and layers `GlobalOpts` flag overrides
//! (--lang, --device, --instant, --output, --empty) on top of them.

use std::sync::Arc;

use clap::ValueEnum;

use agriconnect_core::ussd::{InstantLatency, Latency, LatencyProfile, TokioLatency};
use agriconnect_core::{Category, DeviceSkin, Handset, Language, Market};

use crate::cli::{CategoryArg, ColorMode, DeviceArg, GlobalOpts, LangArg, OutputFormat};
use crate::error::CliError;
use crate::output;

// ── Re-exports from shared crate ────────────────────────────────────

pub use agriconnect_config::{
    Config, config_path, load_config, load_config_or_default, save_config, store_advisor_key,
    to_market_config,
};

// ── Flag conversions ────────────────────────────────────────────────

impl From<LangArg> for Language {
    fn from(arg: LangArg) -> Self {
        match arg {
            LangArg::En => Language::En,
            LangArg::Am => Language::Am,
        }
    }
}

impl From<DeviceArg> for DeviceSkin {
    fn from(arg: DeviceArg) -> Self {
        match arg {
            DeviceArg::Touchscreen => DeviceSkin::Touchscreen,
            DeviceArg::FeaturePhone => DeviceSkin::FeaturePhone,
        }
    }
}

impl From<CategoryArg> for Category {
    fn from(arg: CategoryArg) -> Self {
        match arg {
            CategoryArg::Seeds => Category::Seeds,
            CategoryArg::Fertilizer => Category::Fertilizer,
            CategoryArg::Tools => Category::Tools,
            CategoryArg::Pesticide => Category::Pesticide,
        }
    }
}

// ── Resolved settings ───────────────────────────────────────────────

/// Everything a command handler needs besides the market itself.
#[derive(Debug, Clone)]
pub struct Ctx {
    pub output: OutputFormat,
    pub color: bool,
    pub quiet: bool,
    pub language: Language,
    pub device: DeviceSkin,
    pub instant: bool,
    pub latency_ms: u64,
}

impl Ctx {
    /// Resolve settings: CLI flag > config file > built-in default.
    pub fn resolve(global: &GlobalOpts, cfg: &Config) -> Result<Self, CliError> {
        let output = match global.output.clone() {
            Some(format) => format,
            None => OutputFormat::from_str(&cfg.defaults.output, true).map_err(|_| {
                CliError::Validation {
                    field: "defaults.output".into(),
                    reason: format!("unknown output format '{}'", cfg.defaults.output),
                }
            })?,
        };

        let color_mode = match global.color.clone() {
            Some(mode) => mode,
            None => ColorMode::from_str(&cfg.defaults.color, true).map_err(|_| {
                CliError::Validation {
                    field: "defaults.color".into(),
                    reason: format!("expected auto, always or never, got '{}'", cfg.defaults.color),
                }
            })?,
        };

        Ok(Self {
            output,
            color: output::should_color(&color_mode),
            quiet: global.quiet,
            language: global.lang.map_or(cfg.defaults.language, Language::from),
            device: global.device.map_or(cfg.defaults.device, DeviceSkin::from),
            instant: global.instant || cfg.defaults.latency_ms == 0,
            latency_ms: cfg.defaults.latency_ms,
        })
    }

    /// A handset on `market` with the configured language and pauses.
    pub fn handset(&self, market: Arc<Market>) -> Handset<Market> {
        let (latency, profile): (Arc<dyn Latency>, _) = if self.instant {
            (Arc::new(InstantLatency), LatencyProfile::INSTANT)
        } else {
            (Arc::new(TokioLatency), LatencyProfile::scaled(self.latency_ms))
        };
        Handset::new(market, latency)
            .with_profile(profile)
            .with_language(self.language)
    }
}

/// Build the market from config, honoring `--empty`.
pub fn build_market(global: &GlobalOpts, cfg: &Config) -> Result<Market, CliError> {
    let mut market_config = to_market_config(cfg)?;
    if global.empty {
        market_config.demo_data = false;
    }
    Ok(Market::new(market_config))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::cli::Cli;

    fn global(args: &[&str]) -> GlobalOpts {
        let mut argv = vec!["agriconnect"];
        argv.extend_from_slice(args);
        argv.push("prices");
        Cli::try_parse_from(argv).unwrap().global
    }

    #[test]
    fn flags_override_config() {
        let mut cfg = Config::default();
        cfg.defaults.language = Language::Am;
        cfg.defaults.output = "yaml".into();

        let ctx = Ctx::resolve(&global(&[]), &cfg).unwrap();
        assert_eq!(ctx.language, Language::Am);
        assert!(matches!(ctx.output, OutputFormat::Yaml));

        let ctx = Ctx::resolve(&global(&["--lang", "en", "-o", "json"]), &cfg).unwrap();
        assert_eq!(ctx.language, Language::En);
        assert!(matches!(ctx.output, OutputFormat::Json));
    }

    #[test]
    fn zero_latency_means_instant() {
        let mut cfg = Config::default();
        cfg.defaults.latency_ms = 0;
        assert!(Ctx::resolve(&global(&[]), &cfg).unwrap().instant);
    }

    #[test]
    fn unknown_output_in_config_is_reported() {
        let mut cfg = Config::default();
        cfg.defaults.output = "xml".into();
        let err = Ctx::resolve(&global(&[]), &cfg).unwrap_err();
        assert!(err.to_string().contains("defaults.output"));
    }
}
