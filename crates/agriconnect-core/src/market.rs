// ── Market facade ──
//
// The single application-state object: it owns the store and the
// advisor, serves as the USSD host, and executes dealer and agent
// commands. Cheaply cloneable; every clone shares the same state.

use std::sync::Arc;

use chrono::Utc;
use rand::seq::SliceRandom;
use secrecy::ExposeSecret;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::advisor::{self, Advisor, OfflineAdvisor};
use crate::command::{Command, CommandResult, NewProduct};
use crate::config::MarketConfig;
use crate::error::CoreError;
use crate::model::{
    ActivityEntry, CropOffer, EntityId, IdPrefix, InputOrder, Language, MarketPrice, OfferStatus,
    OrderStatus, Priority, Product, Region, RegisteredUser, SmsMessage, SmsSender, SmsTemplate,
    SupportTicket, TicketStatus, Trend, format_amount,
};
use crate::store::{ETHIOPIAN_NAMES, MarketStore, fresh_id};
use crate::stream::EntityStream;
use crate::ussd::UssdHost;

const NOTIFICATION_CHANNEL_SIZE: usize = 64;

/// Inbox id of the daily tip; a refresh replaces it.
pub const DAILY_TIP_ID: &str = "daily-tip";

/// Farmer name on records created from a handset without an account.
pub const MOBILE_USER: &str = "Mobile User";

/// Masked number attached to handset support tickets.
pub const MASKED_PHONE: &str = "+251 911 *** ***";

/// Offer totals are quoted per kilogram; offers are in quintals.
const KG_PER_QUINTAL: f64 = 100.0;

/// A toast raised when the market texts the farmer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub message: String,
}

// ── Market ───────────────────────────────────────────────────────────

/// Entry point for every consumer: handset, SMS chat and dashboards.
#[derive(Clone)]
pub struct Market {
    inner: Arc<MarketInner>,
}

struct MarketInner {
    config: MarketConfig,
    store: MarketStore,
    advisor: Arc<dyn Advisor>,
    notifications: broadcast::Sender<Arc<Notification>>,
}

impl Market {
    /// Build a market from configuration. An advisor that cannot be set
    /// up degrades to the offline one.
    pub fn new(config: MarketConfig) -> Self {
        let advisor = advisor::from_settings(&config.advisor).unwrap_or_else(|e| {
            warn!(error = %e, "hosted advisor unavailable, using offline replies");
            Arc::new(OfflineAdvisor)
        });
        Self::with_advisor(config, advisor)
    }

    pub fn with_advisor(config: MarketConfig, advisor: Arc<dyn Advisor>) -> Self {
        let store = if config.demo_data {
            MarketStore::with_demo_data()
        } else {
            MarketStore::new()
        };
        let (notifications, _) = broadcast::channel(NOTIFICATION_CHANNEL_SIZE);
        info!(advisor = advisor.name(), demo_data = config.demo_data, "market ready");

        Self {
            inner: Arc::new(MarketInner {
                config,
                store,
                advisor,
                notifications,
            }),
        }
    }

    pub fn config(&self) -> &MarketConfig {
        &self.inner.config
    }

    pub fn store(&self) -> &MarketStore {
        &self.inner.store
    }

    pub fn advisor_name(&self) -> &'static str {
        self.inner.advisor.name()
    }

    // ── Dealer login ─────────────────────────────────────────────

    /// Check dealer dashboard credentials.
    pub fn authenticate(&self, username: &str, password: &str) -> Result<(), CoreError> {
        let dealer = &self.inner.config.dealer;
        let username = username.trim();
        if username == dealer.username && password == dealer.password.expose_secret() {
            info!(username, "dealer logged in");
            Ok(())
        } else {
            warn!(username, "dealer login rejected");
            Err(CoreError::AuthenticationFailed {
                username: username.into(),
            })
        }
    }

    // ── Observation ──────────────────────────────────────────────

    pub fn notifications(&self) -> broadcast::Receiver<Arc<Notification>> {
        self.inner.notifications.subscribe()
    }

    pub fn subscribe_inbox(&self) -> EntityStream<SmsMessage> {
        self.inner.store.subscribe_inbox()
    }

    pub fn subscribe_tickets(&self) -> EntityStream<SupportTicket> {
        self.inner.store.subscribe_tickets()
    }

    // ── Snapshot accessors (delegate to MarketStore) ─────────────

    pub fn products_snapshot(&self) -> Arc<Vec<Arc<Product>>> {
        self.inner.store.products_snapshot()
    }

    pub fn prices_snapshot(&self) -> Arc<Vec<Arc<MarketPrice>>> {
        self.inner.store.prices_snapshot()
    }

    pub fn offers_snapshot(&self) -> Arc<Vec<Arc<CropOffer>>> {
        self.inner.store.offers_snapshot()
    }

    pub fn orders_snapshot(&self) -> Arc<Vec<Arc<InputOrder>>> {
        self.inner.store.orders_snapshot()
    }

    pub fn tickets_snapshot(&self) -> Arc<Vec<Arc<SupportTicket>>> {
        self.inner.store.tickets_snapshot()
    }

    pub fn inbox_snapshot(&self) -> Arc<Vec<Arc<SmsMessage>>> {
        self.inner.store.inbox_snapshot()
    }

    pub fn activity_snapshot(&self) -> Arc<Vec<Arc<ActivityEntry>>> {
        self.inner.store.activity_snapshot()
    }

    // ── Command execution ────────────────────────────────────────

    /// Execute a dashboard command.
    pub async fn execute(&self, cmd: Command) -> Result<CommandResult, CoreError> {
        let kind = cmd.kind();
        debug!(command = kind, "executing command");
        let result = self.route(cmd).await;
        if let Err(ref e) = result {
            warn!(command = kind, error = %e, "command failed");
        }
        result
    }

    async fn route(&self, cmd: Command) -> Result<CommandResult, CoreError> {
        match cmd {
            // ── Prices ───────────────────────────────────────────
            Command::UpdatePrice { crop, price } => self.update_price(&crop, price),

            // ── Inventory ────────────────────────────────────────
            Command::UpdateStock { id, stock } => self.set_stock(&id, stock),
            Command::AdjustStock { id, delta } => {
                let product = self.product(&id)?;
                let next = i64::from(product.stock).saturating_add(delta).max(0);
                self.set_stock(&id, u32::try_from(next).unwrap_or(u32::MAX))
            }
            Command::SetProductImage { id, url } => self.set_image(&id, url),
            Command::AddProduct(request) => self.add_product(request),

            // ── Marketplace ──────────────────────────────────────
            Command::UpdateOfferStatus { id, status } => self.decide_offer(&id, status),
            Command::UpdateOrderStatus { id, status } => self.decide_order(&id, status),

            // ── Call center ──────────────────────────────────────
            Command::ResolveTicket { id, resolution } => self.resolve_ticket(&id, &resolution),
            Command::AnalyzeTicket { id } => self.analyze_ticket(&id).await,

            // ── SMS ──────────────────────────────────────────────
            Command::SendSms { text, language } => self.receive_sms(&text, language).await,
            Command::RefreshDailyTip { language } => self.refresh_daily_tip(language).await,
        }
    }

    fn update_price(&self, crop: &str, price: f64) -> Result<CommandResult, CoreError> {
        if !(price.is_finite() && price > 0.0) {
            return Err(CoreError::invalid(format!("price must be positive, got {price}")));
        }
        let store = &self.inner.store;
        let current = store.price_for(crop).ok_or_else(|| CoreError::UnknownCrop {
            crop: crop.into(),
        })?;
        let old = current.price_per_kg;

        let updated = store
            .prices
            .update(&EntityId::new(crop), |p| {
                p.trend = trend_between(old, price);
                p.price_per_kg = price;
                p.last_updated = Utc::now();
            })
            .ok_or_else(|| CoreError::UnknownCrop { crop: crop.into() })?;

        if (old - price).abs() > f64::EPSILON {
            store.log_activity("Price Update", format!("{crop}: {old} -> {price} ETB"));
        }
        Ok(CommandResult::Price(MarketPrice::clone(&updated)))
    }

    fn product(&self, id: &EntityId) -> Result<Arc<Product>, CoreError> {
        self.inner
            .store
            .product(id)
            .ok_or_else(|| CoreError::not_found("Product", id))
    }

    fn set_stock(&self, id: &EntityId, stock: u32) -> Result<CommandResult, CoreError> {
        let before = self.product(id)?;
        let updated = self
            .inner
            .store
            .products
            .update(id, |p| p.stock = stock)
            .ok_or_else(|| CoreError::not_found("Product", id))?;

        let diff = i64::from(stock) - i64::from(before.stock);
        if diff != 0 {
            self.inner
                .store
                .log_activity("Stock Update", format!("{}: {diff:+} units", updated.name));
        }
        Ok(CommandResult::Product(Product::clone(&updated)))
    }

    fn set_image(&self, id: &EntityId, url: String) -> Result<CommandResult, CoreError> {
        if url.trim().is_empty() {
            return Err(CoreError::invalid("image URL must not be empty"));
        }
        let updated = self
            .inner
            .store
            .products
            .update(id, |p| p.image = Some(url))
            .ok_or_else(|| CoreError::not_found("Product", id))?;
        self.inner
            .store
            .log_activity("Image Update", format!("New image uploaded for product ID {id}"));
        Ok(CommandResult::Product(Product::clone(&updated)))
    }

    fn add_product(&self, request: NewProduct) -> Result<CommandResult, CoreError> {
        request.validate()?;
        let store = &self.inner.store;
        let id = fresh_id(&store.products, IdPrefix::Product);
        let product = Product {
            id: id.clone(),
            name: request.name.trim().to_owned(),
            category: request.category,
            price: request.price,
            stock: request.stock,
            unit: request.unit.trim().to_owned(),
            image: request.image,
        };
        store.products.push_front(id.clone(), product.clone());
        store.log_activity("Stock Added", format!("Added {}", product.name));
        info!(%id, name = %product.name, "product added");
        Ok(CommandResult::Product(product))
    }

    fn decide_offer(&self, id: &EntityId, status: OfferStatus) -> Result<CommandResult, CoreError> {
        if status == OfferStatus::Pending {
            return Err(CoreError::InvalidTransition {
                id: id.clone(),
                message: "an offer can only be accepted or rejected".into(),
            });
        }
        let store = &self.inner.store;
        let offer = store.offer(id).ok_or_else(|| CoreError::not_found("Offer", id))?;
        if offer.status != OfferStatus::Pending {
            return Err(CoreError::InvalidTransition {
                id: id.clone(),
                message: format!("offer already {}", offer.status),
            });
        }

        let updated = store
            .offers
            .update(id, |o| o.status = status)
            .ok_or_else(|| CoreError::not_found("Offer", id))?;
        store.log_activity(
            "Produce Bought",
            format!("{status} offer from {} for {}", offer.farmer_name, offer.crop),
        );

        if status == OfferStatus::Accepted {
            let price = store.price_for(&offer.crop).map_or(0.0, |p| p.price_per_kg);
            let total = offer.quantity * KG_PER_QUINTAL * price;
            let template = SmsTemplate::OfferAccepted {
                quantity: offer.quantity.to_string(),
                crop: offer.crop.clone(),
                total: format_amount(total),
            };
            self.text_farmer("Offer Accepted SMS", template.render(Language::En), Some(template));
        }
        Ok(CommandResult::Offer(CropOffer::clone(&updated)))
    }

    fn decide_order(&self, id: &EntityId, status: OrderStatus) -> Result<CommandResult, CoreError> {
        if status == OrderStatus::Pending {
            return Err(CoreError::InvalidTransition {
                id: id.clone(),
                message: "an order can only be completed or cancelled".into(),
            });
        }
        let store = &self.inner.store;
        let order = store.order(id).ok_or_else(|| CoreError::not_found("Order", id))?;
        if order.status != OrderStatus::Pending {
            return Err(CoreError::InvalidTransition {
                id: id.clone(),
                message: format!("order already {}", order.status),
            });
        }

        let updated = store
            .orders
            .update(id, |o| o.status = status)
            .ok_or_else(|| CoreError::not_found("Order", id))?;
        store.log_activity(
            "Input Order",
            format!("{status} order for {} ({})", order.farmer_name, order.product_name),
        );

        if status == OrderStatus::Completed {
            let template = SmsTemplate::OrderFulfilled {
                quantity: order.quantity.to_string(),
                product: order.product_name.clone(),
                total: format_amount(order.total_price),
            };
            self.text_farmer("Order Fulfilled SMS", template.render(Language::En), Some(template));
        }
        Ok(CommandResult::Order(InputOrder::clone(&updated)))
    }

    fn resolve_ticket(&self, id: &EntityId, resolution: &str) -> Result<CommandResult, CoreError> {
        let store = &self.inner.store;
        let ticket = store.ticket(id).ok_or_else(|| CoreError::not_found("Ticket", id))?;
        if !ticket.is_active() {
            return Err(CoreError::InvalidTransition {
                id: id.clone(),
                message: "ticket already resolved".into(),
            });
        }

        let updated = store
            .tickets
            .update(id, |t| t.status = TicketStatus::Resolved)
            .ok_or_else(|| CoreError::not_found("Ticket", id))?;

        let excerpt: String = ticket.issue.chars().take(15).collect();
        let text = format!(
            "SUPPORT UPDATE: Your ticket regarding \"{excerpt}...\" has been resolved. Notes: {}",
            resolution.trim()
        );
        self.text_farmer("Support Resolved SMS", text, None);
        info!(%id, "ticket resolved");
        Ok(CommandResult::Ticket(SupportTicket::clone(&updated)))
    }

    async fn analyze_ticket(&self, id: &EntityId) -> Result<CommandResult, CoreError> {
        let ticket = self
            .inner
            .store
            .ticket(id)
            .ok_or_else(|| CoreError::not_found("Ticket", id))?;
        let suggestion = self.inner.advisor.ticket_suggestion(&ticket.issue).await;

        let updated = self
            .inner
            .store
            .tickets
            .update(id, |t| t.ai_suggestion = Some(suggestion))
            .ok_or_else(|| CoreError::not_found("Ticket", id))?;
        Ok(CommandResult::Ticket(SupportTicket::clone(&updated)))
    }

    async fn receive_sms(&self, text: &str, language: Language) -> Result<CommandResult, CoreError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(CoreError::invalid("message must not be empty"));
        }
        let incoming = self.append_sms(SmsSender::Farmer, text.into(), None);
        let reply = self.inner.advisor.sms_reply(text, language).await;
        let outgoing = self.append_sms(SmsSender::System, reply, None);
        Ok(CommandResult::Sms(vec![incoming, outgoing]))
    }

    async fn refresh_daily_tip(&self, language: Language) -> Result<CommandResult, CoreError> {
        let tip = self.inner.advisor.farming_tip(language).await;
        let prefix = language.pick("DAILY TIP", "የቀን ምክር");
        let id = EntityId::from(DAILY_TIP_ID);
        let message = SmsMessage {
            id: id.clone(),
            sender: SmsSender::System,
            text: format!("{prefix}: {tip}"),
            timestamp: Utc::now(),
            template: None,
        };

        let inbox = &self.inner.store.inbox;
        inbox.remove(&id);
        inbox.push_back(id, message.clone());
        Ok(CommandResult::Sms(vec![message]))
    }

    // ── Helpers ──────────────────────────────────────────────────

    fn append_sms(
        &self,
        sender: SmsSender,
        text: String,
        template: Option<SmsTemplate>,
    ) -> SmsMessage {
        let inbox = &self.inner.store.inbox;
        let id = fresh_id(inbox, IdPrefix::Sms);
        let message = SmsMessage {
            id: id.clone(),
            sender,
            text,
            timestamp: Utc::now(),
            template,
        };
        inbox.push_back(id, message.clone());
        message
    }

    /// Text the farmer and raise a notification toast.
    fn text_farmer(&self, title: &str, text: String, template: Option<SmsTemplate>) {
        let message = self.append_sms(SmsSender::System, text, template);
        info!(title, id = %message.id, "sms sent to farmer");
        // No receivers is fine: nobody is watching for toasts.
        let _ = self.inner.notifications.send(Arc::new(Notification {
            title: title.into(),
            message: message.text,
        }));
    }
}

fn trend_between(old: f64, new: f64) -> Trend {
    if new > old {
        Trend::Up
    } else if new < old {
        Trend::Down
    } else {
        Trend::Stable
    }
}

// ── USSD host ────────────────────────────────────────────────────────

impl UssdHost for Market {
    fn products(&self) -> Arc<Vec<Arc<Product>>> {
        self.products_snapshot()
    }

    fn prices(&self) -> Arc<Vec<Arc<MarketPrice>>> {
        self.prices_snapshot()
    }

    fn registered_user(&self) -> Option<Arc<RegisteredUser>> {
        self.inner.store.registered_user()
    }

    fn create_offer(&self, crop: &str, quantity: f64, farmer_name: Option<&str>) {
        let farmer_name = farmer_name.map_or_else(
            || {
                ETHIOPIAN_NAMES
                    .choose(&mut rand::thread_rng())
                    .map_or(MOBILE_USER, |name| *name)
                    .to_owned()
            },
            str::to_owned,
        );

        let store = &self.inner.store;
        let id = fresh_id(&store.offers, IdPrefix::Offer);
        let offer = CropOffer {
            id: id.clone(),
            farmer_name,
            crop: crop.into(),
            quantity,
            status: OfferStatus::Pending,
            timestamp: Utc::now(),
        };
        info!(%id, crop, quantity, farmer = %offer.farmer_name, "crop offer created");
        store.offers.push_front(id, offer);
    }

    fn create_order(&self, product_id: &EntityId, quantity: f64) {
        let store = &self.inner.store;
        let Some(product) = store.product(product_id) else {
            warn!(product = %product_id, "order for unknown product ignored");
            return;
        };

        let id = fresh_id(&store.orders, IdPrefix::Order);
        let order = InputOrder {
            id: id.clone(),
            farmer_name: MOBILE_USER.into(),
            product_name: product.name.clone(),
            quantity,
            total_price: product.price * quantity,
            status: OrderStatus::Pending,
            timestamp: Utc::now(),
        };
        info!(%id, product = %product.name, quantity, total = order.total_price, "input order created");
        store.orders.push_front(id, order);
    }

    fn create_support_ticket(&self, issue: &str) {
        let store = &self.inner.store;
        let id = fresh_id(&store.tickets, IdPrefix::Ticket);
        let ticket = SupportTicket {
            id: id.clone(),
            farmer_name: MOBILE_USER.into(),
            phone_number: MASKED_PHONE.into(),
            issue: issue.into(),
            status: TicketStatus::Open,
            priority: Priority::Medium,
            timestamp: Utc::now(),
            ai_suggestion: None,
        };
        info!(%id, "support ticket opened");
        store.tickets.push_front(id, ticket);
    }

    fn register_user(&self, name: &str, region: Region) {
        let user = RegisteredUser {
            name: name.into(),
            region,
        };
        if self.inner.store.register_user(user) {
            info!(name, %region, "handset account created");
        } else {
            warn!(name, "handset already has an account, registration ignored");
        }
    }
}
