//! USSD handset: scripted runs and the interactive phone.

use std::io::IsTerminal;
use std::sync::Arc;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tokio::io::{AsyncBufReadExt, BufReader};

use agriconnect_core::{Handset, Market, SessionView};

use crate::cli::UssdArgs;
use crate::config::Ctx;
use crate::error::CliError;
use crate::output;

/// Draw `view` in the configured format: the device frame for tables,
/// the bare screen text for plain.
pub fn render_view(view: &SessionView, ctx: &Ctx) -> Result<String, CliError> {
    let clock = chrono::Local::now().format("%H:%M").to_string();
    output::render_single(
        &ctx.output,
        view,
        |v| ctx.device.draw(v, &clock),
        |v| v.text.clone(),
    )
}

/// Send `input` with a spinner covering the gateway pause.
pub async fn send_with_spinner(
    handset: &mut Handset<Market>,
    input: &str,
    ctx: &Ctx,
) -> SessionView {
    let spinner = (!ctx.instant && !ctx.quiet && std::io::stderr().is_terminal()).then(|| {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::with_template("{spinner} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message(ctx.language.pick("USSD code running...", "USSD ኮድ በመስራት ላይ..."));
        pb.enable_steady_tick(Duration::from_millis(80));
        pb
    });

    let view = handset.enter(input).await;
    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }
    view
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(market: Arc<Market>, args: UssdArgs, ctx: &Ctx) -> Result<(), CliError> {
    let mut handset = ctx.handset(market);
    if args.send.is_empty() {
        return interactive(&mut handset, ctx).await;
    }

    for input in &args.send {
        let view = send_with_spinner(&mut handset, input, ctx).await;
        if args.frames {
            output::print_output(&render_view(&view, ctx)?, ctx.quiet);
        }
    }
    if !args.frames {
        output::print_output(&render_view(&handset.view(), ctx)?, ctx.quiet);
    }
    Ok(())
}

const INTERACTIVE_HELP: &str = "Type USSD input and press Enter (start with *808#).\n\
     :lang toggles the language, :del deletes a character, :end hangs up, :quit exits.";

async fn interactive(handset: &mut Handset<Market>, ctx: &Ctx) -> Result<(), CliError> {
    if !ctx.quiet {
        eprintln!("{INTERACTIVE_HELP}");
    }
    output::print_output(&render_view(&handset.view(), ctx)?, ctx.quiet);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let view = match line.trim() {
            ":quit" | ":q" => break,
            ":end" => {
                handset.end_call();
                handset.view()
            }
            ":lang" => {
                let next = handset.session().language().toggled();
                handset.set_language(next);
                handset.view()
            }
            ":del" => {
                handset.backspace();
                handset.view()
            }
            input => send_with_spinner(handset, input, ctx).await,
        };
        output::print_output(&render_view(&view, ctx)?, ctx.quiet);
    }
    Ok(())
}
