//! Command handlers, one module per top-level subcommand.

pub mod config_cmd;
pub mod console;
pub mod dashboard;
pub mod sms;
pub mod ussd;

use std::sync::Arc;

use agriconnect_core::{Category, Market};

use crate::cli::Command;
use crate::config::Ctx;
use crate::error::CliError;
use crate::output;

/// Run a market-backed command. `config` and `completions` never reach
/// here; `main` handles them before a market exists.
pub async fn dispatch(cmd: Command, market: Arc<Market>, ctx: &Ctx) -> Result<(), CliError> {
    let rendered = match cmd {
        Command::Ussd(args) => return ussd::handle(market, args, ctx).await,
        Command::Sms(args) => return sms::handle(&market, args, ctx).await,
        Command::Console => return console::handle(market, ctx).await,

        Command::Inventory(args) => dashboard::inventory(
            &market,
            ctx,
            args.category.map(Category::from),
            args.search.as_deref(),
        )?,
        Command::Prices => dashboard::prices(&market, ctx)?,
        Command::Offers => dashboard::offers(&market, ctx)?,
        Command::Orders => dashboard::orders(&market, ctx)?,
        Command::Tickets(args) => dashboard::tickets(&market, ctx, args.open)?,

        Command::Config(_) | Command::Completions(_) => {
            return Err(CliError::Internal {
                message: "config and completions run without a market".into(),
            });
        }
    };

    output::print_output(&rendered, ctx.quiet);
    Ok(())
}
