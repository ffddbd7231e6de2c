//! Clap derive structures for the `agriconnect` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.
//! Kept free of workspace crates so `build.rs` can render man pages.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// agriconnect -- USSD, SMS and dashboard simulator for Ethiopian farmers
#[derive(Debug, Parser)]
#[command(
    name = "agriconnect",
    version,
    about = "Simulate AgriConnect USSD menus, SMS and dealer dashboards",
    long_about = "A terminal simulator of how smallholder farmers, input dealers and\n\
        call-center agents interact through *808# USSD menus, SMS and dashboards.\n\n\
        All state lives in memory for the lifetime of one invocation; use\n\
        `agriconnect console` to drive every role against a single market.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Handset and SMS language (overrides config)
    #[arg(long, short = 'l', env = "AGRICONNECT_LANG", global = true)]
    pub lang: Option<LangArg>,

    /// Handset frame to draw (overrides config)
    #[arg(long, short = 'd', env = "AGRICONNECT_DEVICE", global = true)]
    pub device: Option<DeviceArg>,

    /// Skip the simulated network pauses
    #[arg(long, global = true)]
    pub instant: bool,

    /// Start with an empty market instead of the demo records
    #[arg(long, global = true)]
    pub empty: bool,

    /// Output format [default: table]
    #[arg(long, short = 'o', env = "AGRICONNECT_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// When to use color output [default: auto]
    #[arg(long, global = true)]
    pub color: Option<ColorMode>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

// ── Shared Enums ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LangArg {
    /// English
    En,
    /// Amharic
    Am,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DeviceArg {
    /// Smartphone dialog
    Touchscreen,
    /// Keypad phone with an LCD
    FeaturePhone,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CategoryArg {
    Seeds,
    Fertilizer,
    Tools,
    Pesticide,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Dial into the *808# USSD service
    #[command(alias = "u")]
    Ussd(UssdArgs),

    /// Chat with the SMS service
    Sms(SmsArgs),

    /// List the dealer's input catalog
    #[command(alias = "inv")]
    Inventory(InventoryArgs),

    /// Show market prices per kg
    Prices,

    /// List crop offers from farmers
    Offers,

    /// List input orders from farmers
    Orders,

    /// List call-center support tickets
    Tickets(TicketsArgs),

    /// Interactive console sharing one market across all roles
    #[command(alias = "repl")]
    Console,

    /// Manage CLI configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── USSD ─────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct UssdArgs {
    /// Input to send, in order (e.g. --send '*808#' --send 1). Without
    /// any, an interactive handset starts.
    #[arg(long, short = 's', value_name = "INPUT")]
    pub send: Vec<String>,

    /// Print every frame of a scripted run, not just the last
    #[arg(long)]
    pub frames: bool,
}

// ── SMS ──────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct SmsArgs {
    /// Message to send as the farmer; repeat for a conversation
    #[arg(long, short = 's', value_name = "TEXT")]
    pub send: Vec<String>,

    /// Request a fresh daily farming tip first
    #[arg(long)]
    pub tip: bool,
}

// ── Dashboards ───────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct InventoryArgs {
    /// Only show one category
    #[arg(long, short = 'c')]
    pub category: Option<CategoryArg>,

    /// Case-insensitive name filter
    #[arg(long)]
    pub search: Option<String>,
}

#[derive(Debug, Args)]
pub struct TicketsArgs {
    /// Hide resolved tickets
    #[arg(long)]
    pub open: bool,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create initial config file with guided setup
    Init,

    /// Display current resolved configuration
    Show,

    /// Print the config file location
    Path,

    /// Store the advisor API key in the system keyring
    SetAdvisorKey,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
