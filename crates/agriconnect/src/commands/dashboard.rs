//! Dealer and call-center listings.
//!
//! Each function renders a store snapshot in the selected output format
//! and returns the text, so the one-shot commands and the console share
//! the same views.

use std::sync::Arc;

use tabled::Tabled;

use agriconnect_core::{
    ActivityEntry, Category, CropOffer, InputOrder, Market, MarketPrice, Product, SmsMessage,
    SmsSender, SupportTicket, format_amount,
};

use crate::config::Ctx;
use crate::error::CliError;
use crate::output::{self, Tone};

/// Longest issue excerpt shown in the ticket table.
const ISSUE_WIDTH: usize = 40;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct ProductRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Price (ETB)")]
    price: String,
    #[tabled(rename = "Stock")]
    stock: String,
    #[tabled(rename = "Unit")]
    unit: String,
}

impl ProductRow {
    fn new(p: &Arc<Product>, color: bool) -> Self {
        let stock = if p.stock == 0 {
            output::paint("out of stock", Tone::Bad, color)
        } else {
            p.stock.to_string()
        };
        Self {
            id: p.id.to_string(),
            name: p.name.clone(),
            category: p.category.to_string(),
            price: format_amount(p.price),
            stock,
            unit: p.unit.clone(),
        }
    }
}

#[derive(Tabled)]
struct PriceRow {
    #[tabled(rename = "Crop")]
    crop: String,
    #[tabled(rename = "ETB / kg")]
    price: String,
    #[tabled(rename = "Trend")]
    trend: String,
    #[tabled(rename = "Updated")]
    updated: String,
}

#[derive(Tabled)]
struct OfferRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Farmer")]
    farmer: String,
    #[tabled(rename = "Crop")]
    crop: String,
    #[tabled(rename = "Qtl")]
    quantity: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Received")]
    received: String,
}

#[derive(Tabled)]
struct OrderRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Farmer")]
    farmer: String,
    #[tabled(rename = "Product")]
    product: String,
    #[tabled(rename = "Qty")]
    quantity: String,
    #[tabled(rename = "Total (ETB)")]
    total: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Placed")]
    placed: String,
}

#[derive(Tabled)]
struct TicketRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Farmer")]
    farmer: String,
    #[tabled(rename = "Phone")]
    phone: String,
    #[tabled(rename = "Issue")]
    issue: String,
    #[tabled(rename = "Priority")]
    priority: String,
    #[tabled(rename = "Status")]
    status: String,
}

#[derive(Tabled)]
struct ActivityRow {
    #[tabled(rename = "When")]
    when: String,
    #[tabled(rename = "Action")]
    action: String,
    #[tabled(rename = "Details")]
    details: String,
}

fn excerpt(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_owned()
    } else {
        let cut: String = text.chars().take(width.saturating_sub(1)).collect();
        format!("{cut}…")
    }
}

// ── Views ───────────────────────────────────────────────────────────

pub fn inventory(
    market: &Market,
    ctx: &Ctx,
    category: Option<Category>,
    search: Option<&str>,
) -> Result<String, CliError> {
    let needle = search.map(str::to_lowercase);
    let products: Vec<Arc<Product>> = market
        .products_snapshot()
        .iter()
        .filter(|p| category.is_none_or(|c| p.category == c))
        .filter(|p| {
            needle
                .as_deref()
                .is_none_or(|n| p.name.to_lowercase().contains(n))
        })
        .cloned()
        .collect();

    output::render_list(
        &ctx.output,
        &products,
        |p| ProductRow::new(p, ctx.color),
        |p| format!("{}\t{}\t{}", p.id, p.stock, p.name),
    )
}

pub fn prices(market: &Market, ctx: &Ctx) -> Result<String, CliError> {
    let prices = market.prices_snapshot();
    output::render_list(
        &ctx.output,
        prices.as_slice(),
        |p: &Arc<MarketPrice>| PriceRow {
            crop: p.crop.clone(),
            price: format_amount(p.price_per_kg),
            trend: output::trend_marker(p.trend, ctx.color),
            updated: output::time(p.last_updated),
        },
        |p| format!("{}\t{}", p.crop, p.price_per_kg),
    )
}

pub fn offers(market: &Market, ctx: &Ctx) -> Result<String, CliError> {
    let offers = market.offers_snapshot();
    output::render_list(
        &ctx.output,
        offers.as_slice(),
        |o: &Arc<CropOffer>| OfferRow {
            id: o.id.to_string(),
            farmer: o.farmer_name.clone(),
            crop: o.crop.clone(),
            quantity: o.quantity.to_string(),
            status: output::paint(&o.status.to_string(), output::offer_tone(o.status), ctx.color),
            received: output::time(o.timestamp),
        },
        |o| format!("{}\t{}", o.id, o.status),
    )
}

pub fn orders(market: &Market, ctx: &Ctx) -> Result<String, CliError> {
    let orders = market.orders_snapshot();
    output::render_list(
        &ctx.output,
        orders.as_slice(),
        |o: &Arc<InputOrder>| OrderRow {
            id: o.id.to_string(),
            farmer: o.farmer_name.clone(),
            product: o.product_name.clone(),
            quantity: o.quantity.to_string(),
            total: format_amount(o.total_price),
            status: output::paint(&o.status.to_string(), output::order_tone(o.status), ctx.color),
            placed: output::time(o.timestamp),
        },
        |o| format!("{}\t{}", o.id, o.status),
    )
}

pub fn tickets(market: &Market, ctx: &Ctx, open_only: bool) -> Result<String, CliError> {
    let tickets: Vec<Arc<SupportTicket>> = market
        .tickets_snapshot()
        .iter()
        .filter(|t| !open_only || t.is_active())
        .cloned()
        .collect();

    output::render_list(
        &ctx.output,
        &tickets,
        |t| TicketRow {
            id: t.id.to_string(),
            farmer: t.farmer_name.clone(),
            phone: t.phone_number.clone(),
            issue: excerpt(&t.issue, ISSUE_WIDTH),
            priority: output::paint(
                &t.priority.to_string(),
                output::priority_tone(t.priority),
                ctx.color,
            ),
            status: output::paint(&t.status.to_string(), output::ticket_tone(t.status), ctx.color),
        },
        |t| format!("{}\t{}", t.id, t.status),
    )
}

/// Full ticket with its suggestion, for the agent's detail view.
pub fn ticket_detail(ticket: &SupportTicket, ctx: &Ctx) -> Result<String, CliError> {
    output::render_single(
        &ctx.output,
        ticket,
        |t| {
            let mut lines = vec![
                format!("ID:         {}", t.id),
                format!("Farmer:     {} ({})", t.farmer_name, t.phone_number),
                format!("Priority:   {}", t.priority),
                format!("Status:     {}", t.status),
                format!("Issue:      {}", t.issue),
            ];
            if let Some(ref suggestion) = t.ai_suggestion {
                lines.push(format!("Suggestion: {suggestion}"));
            }
            lines.join("\n")
        },
        |t| t.ai_suggestion.clone().unwrap_or_default(),
    )
}

pub fn activity(market: &Market, ctx: &Ctx) -> Result<String, CliError> {
    let entries = market.activity_snapshot();
    if entries.is_empty() && matches!(ctx.output, crate::cli::OutputFormat::Table) {
        return Ok("No dealer activity yet.".into());
    }
    output::render_list(
        &ctx.output,
        entries.as_slice(),
        |e: &Arc<ActivityEntry>| ActivityRow {
            when: output::time(e.timestamp),
            action: e.action.clone(),
            details: e.details.clone(),
        },
        |e| format!("{}\t{}", e.action, e.details),
    )
}

/// The farmer's phone inbox, oldest first, in the farmer's language.
pub fn inbox(market: &Market, ctx: &Ctx) -> Result<String, CliError> {
    sms_thread(&market.inbox_snapshot(), ctx)
}

/// Render a run of SMS messages as a chat thread.
pub fn sms_thread(messages: &[Arc<SmsMessage>], ctx: &Ctx) -> Result<String, CliError> {
    let lang = ctx.language;
    let line = |m: &Arc<SmsMessage>| {
        let from = match m.sender {
            SmsSender::Farmer => lang.pick("You", "እርስዎ"),
            SmsSender::System => "8080",
        };
        let stamp = output::paint(&output::time(m.timestamp), Tone::Neutral, ctx.color);
        format!("{stamp}  {from:>5}  {}", m.text_in(lang))
    };

    output::render_single(
        &ctx.output,
        &messages,
        |ms| ms.iter().map(&line).collect::<Vec<_>>().join("\n"),
        |ms| ms.iter().map(|m| m.text_in(lang)).collect::<Vec<_>>().join("\n"),
    )
}
