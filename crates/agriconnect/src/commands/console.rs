//! Interactive console: one market, every role.
//!
//! The farmer's handset and SMS inbox, the dealer dashboard (behind a
//! login) and the call-center desk all work against the same `Market`,
//! so an offer sent over USSD shows up in `offers`, and accepting it
//! lands a text in `inbox`. Notifications and new tickets print as they
//! are raised.

use std::sync::Arc;

use owo_colors::OwoColorize;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::{self, error::TryRecvError};

use agriconnect_core::{
    Category, Command as CoreCommand, CommandResult, EntityId, EntityStream, Handset, Market,
    NewProduct, Notification, OfferStatus, OrderStatus, SmsMessage, SupportTicket,
};

use agriconnect_core::ussd::TRIGGER_CODE;

use crate::config::Ctx;
use crate::error::CliError;
use crate::output;

use super::{dashboard, ussd};

const HELP: &str = "\
Farmer
  dial                       dial *808#
  ussd <input>               send input to the handset
  hangup | screen | lang     end the call, redraw, switch language
  sms <text> | tip | inbox   text 8080, fetch a daily tip, read the inbox

Dealer (login required)
  login <user> [password]    log into the dealer dashboard; logout to leave
  inventory | prices | offers | orders | activity
  price <crop> <etb/kg>      e.g. price teff 130
  stock <id> <count>         set stock;  restock <id> <+/-n> adjusts it
  image <id> <url>           attach a product photo
  add <name> | <category> | <price> | <stock> | <unit>
  accept|reject <offer-id>   fulfil|cancel <order-id>

Call center
  tickets [--open] | ticket <id>
  analyze <id>               ask the advisor for a suggestion
  resolve <id> <notes>       resolve and text the farmer

  status | help | quit";

// ── Parsed input ────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleCommand {
    Help,
    Quit,
    Status,
    // Farmer
    Dial,
    Ussd(String),
    Hangup,
    Screen,
    Lang,
    Sms(String),
    Tip,
    Inbox,
    // Dealer
    Login {
        username: String,
        password: Option<String>,
    },
    Logout,
    Inventory,
    Prices,
    Offers,
    Orders,
    Activity,
    SetPrice {
        crop: String,
        price: f64,
    },
    SetStock {
        id: EntityId,
        stock: u32,
    },
    Restock {
        id: EntityId,
        delta: i64,
    },
    Image {
        id: EntityId,
        url: String,
    },
    Add(NewProduct),
    Offer {
        id: EntityId,
        status: OfferStatus,
    },
    Order {
        id: EntityId,
        status: OrderStatus,
    },
    // Call center
    Tickets {
        open_only: bool,
    },
    Ticket(EntityId),
    Analyze(EntityId),
    Resolve {
        id: EntityId,
        notes: String,
    },
}

impl ConsoleCommand {
    /// Dealer dashboard actions need a login first. Returns the action
    /// name for gated commands.
    fn dealer_action(&self) -> Option<&'static str> {
        Some(match self {
            Self::Inventory => "inventory",
            Self::Offers => "offers",
            Self::Orders => "orders",
            Self::Activity => "activity",
            Self::SetPrice { .. } => "price",
            Self::SetStock { .. } => "stock",
            Self::Restock { .. } => "restock",
            Self::Image { .. } => "image",
            Self::Add(_) => "add",
            Self::Offer { status, .. } => match status {
                OfferStatus::Rejected => "reject",
                _ => "accept",
            },
            Self::Order { status, .. } => match status {
                OrderStatus::Cancelled => "cancel",
                _ => "fulfil",
            },
            _ => return None,
        })
    }
}

fn usage(reason: impl Into<String>) -> CliError {
    CliError::Validation {
        field: "command".into(),
        reason: reason.into(),
    }
}

fn record_id(raw: &str) -> Result<EntityId, CliError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(usage("missing record id"));
    }
    Ok(EntityId::from(raw.to_uppercase()))
}

fn number<T: std::str::FromStr>(raw: &str, what: &str) -> Result<T, CliError> {
    raw.trim()
        .parse()
        .map_err(|_| usage(format!("'{}' is not a valid {what}", raw.trim())))
}

fn parse_product(rest: &str) -> Result<NewProduct, CliError> {
    let fields: Vec<&str> = rest.split('|').map(str::trim).collect();
    let [name, category, price, stock, unit] = fields.as_slice() else {
        return Err(usage("add <name> | <category> | <price> | <stock> | <unit>"));
    };
    let category: Category = category
        .parse()
        .map_err(|_| usage(format!("unknown category '{category}'")))?;

    Ok(NewProduct {
        name: (*name).to_owned(),
        category,
        price: number(price, "price")?,
        stock: number(stock, "stock count")?,
        unit: (*unit).to_owned(),
        image: None,
    })
}

/// Parse one console line. Blank lines parse to `None`.
pub fn parse_line(line: &str) -> Result<Option<ConsoleCommand>, CliError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (verb, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim();

    let verb = verb.to_lowercase();
    let cmd = match verb.as_str() {
        "help" | "?" => ConsoleCommand::Help,
        "quit" | "exit" | "q" => ConsoleCommand::Quit,
        "status" => ConsoleCommand::Status,

        "dial" => ConsoleCommand::Dial,
        "ussd" | "u" => ConsoleCommand::Ussd(rest.to_owned()),
        "hangup" => ConsoleCommand::Hangup,
        "screen" => ConsoleCommand::Screen,
        "lang" => ConsoleCommand::Lang,
        "sms" if !rest.is_empty() => ConsoleCommand::Sms(rest.to_owned()),
        "sms" => return Err(usage("sms <text>")),
        "tip" => ConsoleCommand::Tip,
        "inbox" => ConsoleCommand::Inbox,

        "login" => {
            let mut parts = rest.split_whitespace();
            let username = parts.next().ok_or_else(|| usage("login <user> [password]"))?;
            ConsoleCommand::Login {
                username: username.to_owned(),
                password: parts.next().map(str::to_owned),
            }
        }
        "logout" => ConsoleCommand::Logout,
        "inventory" | "inv" => ConsoleCommand::Inventory,
        "prices" => ConsoleCommand::Prices,
        "offers" => ConsoleCommand::Offers,
        "orders" => ConsoleCommand::Orders,
        "activity" | "history" => ConsoleCommand::Activity,
        "price" => {
            let (crop, price) = rest
                .rsplit_once(char::is_whitespace)
                .ok_or_else(|| usage("price <crop> <etb/kg>"))?;
            ConsoleCommand::SetPrice {
                crop: crop.trim().to_owned(),
                price: number(price, "price")?,
            }
        }
        "stock" | "restock" | "image" => {
            let (id, value) = rest
                .split_once(char::is_whitespace)
                .ok_or_else(|| usage(format!("{verb} <id> <value>")))?;
            let id = record_id(id)?;
            match verb.as_str() {
                "stock" => ConsoleCommand::SetStock {
                    id,
                    stock: number(value, "stock count")?,
                },
                "restock" => ConsoleCommand::Restock {
                    id,
                    delta: number(value.trim().trim_start_matches('+'), "adjustment")?,
                },
                _ => ConsoleCommand::Image {
                    id,
                    url: value.trim().to_owned(),
                },
            }
        }
        "add" => ConsoleCommand::Add(parse_product(rest)?),
        "accept" => ConsoleCommand::Offer {
            id: record_id(rest)?,
            status: OfferStatus::Accepted,
        },
        "reject" => ConsoleCommand::Offer {
            id: record_id(rest)?,
            status: OfferStatus::Rejected,
        },
        "fulfil" | "fulfill" | "complete" => ConsoleCommand::Order {
            id: record_id(rest)?,
            status: OrderStatus::Completed,
        },
        "cancel" => ConsoleCommand::Order {
            id: record_id(rest)?,
            status: OrderStatus::Cancelled,
        },

        "tickets" => ConsoleCommand::Tickets {
            open_only: rest == "--open",
        },
        "ticket" => ConsoleCommand::Ticket(record_id(rest)?),
        "analyze" | "analyse" => ConsoleCommand::Analyze(record_id(rest)?),
        "resolve" => {
            let (id, notes) = rest
                .split_once(char::is_whitespace)
                .ok_or_else(|| usage("resolve <id> <notes>"))?;
            ConsoleCommand::Resolve {
                id: record_id(id)?,
                notes: notes.trim().to_owned(),
            }
        }

        other => return Err(usage(format!("unknown command '{other}', try help"))),
    };
    Ok(Some(cmd))
}

// ── Session ─────────────────────────────────────────────────────────

struct Console {
    market: Arc<Market>,
    handset: Handset<Market>,
    ctx: Ctx,
    dealer: Option<String>,
    toasts: broadcast::Receiver<Arc<Notification>>,
    inbox: EntityStream<SmsMessage>,
    tickets: EntityStream<SupportTicket>,
}

#[derive(Debug)]
enum Flow {
    Continue,
    Stop,
}

impl Console {
    fn new(market: Arc<Market>, ctx: Ctx) -> Self {
        let toasts = market.notifications();
        let inbox = market.subscribe_inbox();
        let tickets = market.subscribe_tickets();
        let handset = ctx.handset(Arc::clone(&market));
        Self {
            market,
            handset,
            ctx,
            dealer: None,
            toasts,
            inbox,
            tickets,
        }
    }

    fn print(&self, text: &str) {
        output::print_output(text, self.ctx.quiet);
    }

    fn ok(&self, text: &str) {
        let mark = output::paint("✓", output::Tone::Good, self.ctx.color);
        self.print(&format!("{mark} {text}"));
    }

    fn print_screen(&self) -> Result<(), CliError> {
        self.print(&ussd::render_view(&self.handset.view(), &self.ctx)?);
        Ok(())
    }

    /// Print every notification raised since the last command.
    fn drain_toasts(&mut self) {
        loop {
            match self.toasts.try_recv() {
                Ok(toast) => {
                    let title = if self.ctx.color {
                        toast.title.bold().to_string()
                    } else {
                        toast.title.clone()
                    };
                    self.print(&format!("📱 {title}: {}", toast.message));
                }
                Err(TryRecvError::Lagged(_)) => {}
                Err(TryRecvError::Empty | TryRecvError::Closed) => break,
            }
        }
    }

    /// Announce tickets filed since the last command, e.g. from the handset.
    fn announce_tickets(&mut self) {
        for ticket in self.tickets.take_new(|t| t.id.clone()) {
            let label = output::paint("New ticket", output::Tone::Bad, self.ctx.color);
            self.print(&format!(
                "🎫 {label} {}: {}",
                ticket.id,
                ticket.issue.chars().take(40).collect::<String>()
            ));
        }
    }

    /// Print the messages that reached the inbox since it was last shown.
    fn print_new_sms(&mut self) -> Result<(), CliError> {
        let fresh = self.inbox.take_new(|m| m.id.clone());
        self.print(&dashboard::sms_thread(&fresh, &self.ctx)?);
        Ok(())
    }

    fn status(&self) -> String {
        let store = self.market.store();
        let dealer = self.dealer.as_deref().unwrap_or("-");
        format!(
            "Advisor:         {}\nDealer:          {dealer}\nProducts:        {}\n\
             Pending offers:  {}\nOpen tickets:    {}\nHandset screen:  {}",
            self.market.advisor_name(),
            store.product_count(),
            store.pending_offer_count(),
            store.open_ticket_count(),
            self.handset.screen(),
        )
    }

    async fn core(&self, cmd: CoreCommand) -> Result<CommandResult, CliError> {
        Ok(self.market.execute(cmd).await?)
    }

    #[allow(clippy::too_many_lines)]
    async fn run(&mut self, cmd: ConsoleCommand) -> Result<Flow, CliError> {
        if let (Some(action), None) = (cmd.dealer_action(), &self.dealer) {
            return Err(CliError::LoginRequired {
                action: action.into(),
            });
        }
        let ctx = &self.ctx;

        match cmd {
            ConsoleCommand::Help => self.print(HELP),
            ConsoleCommand::Quit => return Ok(Flow::Stop),
            ConsoleCommand::Status => self.print(&self.status()),

            // ── Farmer ──────────────────────────────────────────────
            ConsoleCommand::Dial => {
                ussd::send_with_spinner(&mut self.handset, TRIGGER_CODE, ctx).await;
                self.print_screen()?;
            }
            ConsoleCommand::Ussd(input) => {
                ussd::send_with_spinner(&mut self.handset, &input, ctx).await;
                self.print_screen()?;
            }
            ConsoleCommand::Hangup => {
                self.handset.end_call();
                self.print_screen()?;
            }
            ConsoleCommand::Screen => self.print_screen()?,
            ConsoleCommand::Lang => {
                self.ctx.language = self.ctx.language.toggled();
                self.handset.set_language(self.ctx.language);
                self.ok(&format!("Language: {}", self.ctx.language));
            }
            ConsoleCommand::Sms(text) => {
                let language = ctx.language;
                self.core(CoreCommand::SendSms { text, language }).await?;
                self.print_new_sms()?;
            }
            ConsoleCommand::Tip => {
                let language = ctx.language;
                self.core(CoreCommand::RefreshDailyTip { language }).await?;
                self.print_new_sms()?;
            }
            ConsoleCommand::Inbox => {
                self.print(&dashboard::inbox(&self.market, ctx)?);
                self.inbox.take_update();
            }

            // ── Dealer ──────────────────────────────────────────────
            ConsoleCommand::Login { username, password } => {
                let password = match password {
                    Some(pw) => pw,
                    None => rpassword::prompt_password("Password: ")?,
                };
                self.market.authenticate(&username, &password)?;
                self.ok(&format!("Logged in as {username}"));
                self.dealer = Some(username);
            }
            ConsoleCommand::Logout => {
                self.dealer = None;
                self.ok("Logged out");
            }
            ConsoleCommand::Inventory => {
                self.print(&dashboard::inventory(&self.market, ctx, None, None)?);
            }
            ConsoleCommand::Prices => self.print(&dashboard::prices(&self.market, ctx)?),
            ConsoleCommand::Offers => self.print(&dashboard::offers(&self.market, ctx)?),
            ConsoleCommand::Orders => self.print(&dashboard::orders(&self.market, ctx)?),
            ConsoleCommand::Activity => self.print(&dashboard::activity(&self.market, ctx)?),
            ConsoleCommand::SetPrice { crop, price } => {
                let crop = self.match_crop(&crop);
                if let CommandResult::Price(p) =
                    self.core(CoreCommand::UpdatePrice { crop, price }).await?
                {
                    self.ok(&format!("{} now {} ETB/kg", p.crop, p.price_per_kg));
                }
            }
            ConsoleCommand::SetStock { id, stock } => {
                let result = self.core(CoreCommand::UpdateStock { id, stock }).await?;
                self.report_product(&result);
            }
            ConsoleCommand::Restock { id, delta } => {
                let result = self.core(CoreCommand::AdjustStock { id, delta }).await?;
                self.report_product(&result);
            }
            ConsoleCommand::Image { id, url } => {
                let result = self.core(CoreCommand::SetProductImage { id, url }).await?;
                self.report_product(&result);
            }
            ConsoleCommand::Add(request) => {
                let result = self.core(CoreCommand::AddProduct(request)).await?;
                self.report_product(&result);
            }
            ConsoleCommand::Offer { id, status } => {
                if let CommandResult::Offer(o) =
                    self.core(CoreCommand::UpdateOfferStatus { id, status }).await?
                {
                    self.ok(&format!("{} from {} {}", o.id, o.farmer_name, o.status));
                }
            }
            ConsoleCommand::Order { id, status } => {
                if let CommandResult::Order(o) =
                    self.core(CoreCommand::UpdateOrderStatus { id, status }).await?
                {
                    self.ok(&format!("{} for {} {}", o.id, o.farmer_name, o.status));
                }
            }

            // ── Call center ─────────────────────────────────────────
            ConsoleCommand::Tickets { open_only } => {
                self.print(&dashboard::tickets(&self.market, ctx, open_only)?);
            }
            ConsoleCommand::Ticket(id) => {
                let ticket = self
                    .market
                    .store()
                    .ticket(&id)
                    .ok_or_else(|| CliError::NotFound {
                        resource_type: "ticket".into(),
                        identifier: id.to_string(),
                        list_command: "tickets".into(),
                    })?;
                self.print(&dashboard::ticket_detail(&ticket, ctx)?);
            }
            ConsoleCommand::Analyze(id) => {
                if let CommandResult::Ticket(t) = self.core(CoreCommand::AnalyzeTicket { id }).await?
                {
                    self.print(&dashboard::ticket_detail(&t, &self.ctx)?);
                }
            }
            ConsoleCommand::Resolve { id, notes } => {
                let resolution = notes;
                if let CommandResult::Ticket(t) =
                    self.core(CoreCommand::ResolveTicket { id, resolution }).await?
                {
                    self.ok(&format!("{} resolved", t.id));
                }
            }
        }
        Ok(Flow::Continue)
    }

    /// Accept a crop name prefix such as `teff` for `Teff (White)`.
    fn match_crop(&self, input: &str) -> String {
        let wanted = input.to_lowercase();
        self.market
            .prices_snapshot()
            .iter()
            .find(|p| p.crop.to_lowercase().starts_with(&wanted))
            .map_or_else(|| input.to_owned(), |p| p.crop.clone())
    }

    fn report_product(&self, result: &CommandResult) {
        if let CommandResult::Product(p) = result {
            self.ok(&format!("{} {}: {} in stock", p.id, p.name, p.stock));
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(market: Arc<Market>, ctx: &Ctx) -> Result<(), CliError> {
    let mut console = Console::new(market, ctx.clone());
    if !ctx.quiet {
        eprintln!(
            "AgriConnect console ({} advisor). Type help for commands.",
            console.market.advisor_name()
        );
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let outcome = match parse_line(&line) {
            Ok(Some(cmd)) => console.run(cmd).await,
            Ok(None) => Ok(Flow::Continue),
            Err(e) => Err(e),
        };
        match outcome {
            Ok(Flow::Stop) => break,
            Ok(Flow::Continue) => {}
            Err(err) => eprintln!("{:?}", miette::Report::new(err)),
        }
        console.drain_toasts();
        console.announce_tickets();
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn quiet_ctx() -> Ctx {
        Ctx {
            output: crate::cli::OutputFormat::Plain,
            color: false,
            quiet: true,
            language: agriconnect_core::Language::En,
            device: agriconnect_core::DeviceSkin::Touchscreen,
            instant: true,
            latency_ms: 0,
        }
    }

    fn parse(line: &str) -> ConsoleCommand {
        parse_line(line).unwrap().unwrap()
    }

    #[test]
    fn blank_lines_are_ignored() {
        assert_eq!(parse_line("   ").unwrap(), None);
    }

    #[test]
    fn price_takes_the_last_word_as_value() {
        assert_eq!(
            parse("price Teff (White) 130"),
            ConsoleCommand::SetPrice {
                crop: "Teff (White)".into(),
                price: 130.0,
            }
        );
    }

    #[test]
    fn ids_are_normalised() {
        assert_eq!(
            parse("accept o-1021"),
            ConsoleCommand::Offer {
                id: EntityId::from("O-1021"),
                status: OfferStatus::Accepted,
            }
        );
        assert_eq!(
            parse("restock p-0001 +10"),
            ConsoleCommand::Restock {
                id: EntityId::from("P-0001"),
                delta: 10,
            }
        );
    }

    #[test]
    fn add_reads_pipe_separated_fields() {
        let ConsoleCommand::Add(product) = parse("add NPS Fertilizer | fertilizer | 3900 | 40 | 50kg bag")
        else {
            panic!("expected add");
        };
        assert_eq!(product.name, "NPS Fertilizer");
        assert_eq!(product.category, Category::Fertilizer);
        assert_eq!(product.stock, 40);
        assert_eq!(product.unit, "50kg bag");
    }

    #[test]
    fn malformed_input_is_a_usage_error() {
        assert!(parse_line("stock P-0001 lots").is_err());
        assert!(parse_line("add only-a-name").is_err());
        assert!(parse_line("teleport").is_err());
    }

    #[test]
    fn dealer_actions_are_gated() {
        assert_eq!(parse("accept O-1021").dealer_action(), Some("accept"));
        assert_eq!(parse("cancel or-2045").dealer_action(), Some("cancel"));
        assert_eq!(parse("offers").dealer_action(), Some("offers"));
        assert_eq!(parse("tickets").dealer_action(), None);
        assert_eq!(parse("resolve T-0421 done").dealer_action(), None);
        assert_eq!(parse("prices").dealer_action(), None);
    }

    #[tokio::test]
    async fn accepting_an_offer_needs_login_then_texts_farmer() {
        let market = Arc::new(Market::new(agriconnect_core::MarketConfig::default()));
        let mut console = Console::new(Arc::clone(&market), quiet_ctx());

        let denied = console.run(parse("accept O-1021")).await;
        assert!(matches!(denied, Err(CliError::LoginRequired { .. })));

        console.run(parse("login admin password")).await.unwrap();
        console.run(parse("accept O-1021")).await.unwrap();

        assert_eq!(console.toasts.try_recv().unwrap().title, "Offer Accepted SMS");
        assert_eq!(
            market.store().offer(&EntityId::from("O-1021")).unwrap().status,
            OfferStatus::Accepted
        );
    }

    #[tokio::test]
    async fn sms_shows_only_the_new_exchange() {
        let market = Arc::new(Market::new(agriconnect_core::MarketConfig::default()));
        let mut console = Console::new(market, quiet_ctx());

        console.run(parse("sms price")).await.unwrap();
        assert!(console.inbox.take_new(|m| m.id.clone()).is_empty());

        console.run(parse("tickets")).await.unwrap();
        assert!(console.inbox.take_update().is_none());
    }

    #[tokio::test]
    async fn status_counts_the_market() {
        let market = Arc::new(Market::new(agriconnect_core::MarketConfig::default()));
        let mut console = Console::new(market, quiet_ctx());
        console.run(parse("login admin password")).await.unwrap();
        console.run(parse("reject O-1008")).await.unwrap();

        let status = console.status();
        assert!(status.contains("Dealer:          admin"));
        assert!(status.contains("Pending offers:  1"));
        assert!(status.contains("Open tickets:    2"));
    }

    #[tokio::test]
    async fn wrong_password_keeps_dashboard_locked() {
        let market = Arc::new(Market::new(agriconnect_core::MarketConfig::default()));
        let mut console = Console::new(market, quiet_ctx());

        let err = console.run(parse("login admin nope")).await.unwrap_err();
        assert!(matches!(err, CliError::AuthFailed { .. }));
        assert!(console.dealer.is_none());
    }
}
