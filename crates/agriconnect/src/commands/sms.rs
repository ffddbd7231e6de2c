//! SMS chat with the 8080 service.

use agriconnect_core::{Command as CoreCommand, Market};

use crate::cli::SmsArgs;
use crate::config::Ctx;
use crate::error::CliError;
use crate::output;

use super::dashboard;

pub async fn handle(market: &Market, args: SmsArgs, ctx: &Ctx) -> Result<(), CliError> {
    if args.tip {
        market
            .execute(CoreCommand::RefreshDailyTip {
                language: ctx.language,
            })
            .await?;
    }

    for text in args.send {
        market
            .execute(CoreCommand::SendSms {
                text,
                language: ctx.language,
            })
            .await?;
    }

    output::print_output(&dashboard::inbox(market, ctx)?, ctx.quiet);
    Ok(())
}
