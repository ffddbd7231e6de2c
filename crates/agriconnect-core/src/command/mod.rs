// ── Command API ──
//
// Every dashboard write flows through a single `Command` enum. The
// market routes each variant to the store and, where the dealer or agent
// action concerns a farmer, follows up with an SMS to the inbox.

pub mod requests;

use crate::model::{
    CropOffer, EntityId, InputOrder, Language, MarketPrice, OfferStatus, OrderStatus, Product,
    SmsMessage, SupportTicket,
};

pub use requests::NewProduct;

/// All write operations the dealer and agent dashboards can issue.
#[derive(Debug, Clone)]
pub enum Command {
    // ── Prices ───────────────────────────────────────────────────────
    UpdatePrice {
        crop: String,
        price: f64,
    },

    // ── Inventory ────────────────────────────────────────────────────
    UpdateStock {
        id: EntityId,
        stock: u32,
    },
    /// Relative stock change, clamped at zero.
    AdjustStock {
        id: EntityId,
        delta: i64,
    },
    SetProductImage {
        id: EntityId,
        url: String,
    },
    AddProduct(NewProduct),

    // ── Marketplace ──────────────────────────────────────────────────
    UpdateOfferStatus {
        id: EntityId,
        status: OfferStatus,
    },
    UpdateOrderStatus {
        id: EntityId,
        status: OrderStatus,
    },

    // ── Call center ──────────────────────────────────────────────────
    ResolveTicket {
        id: EntityId,
        resolution: String,
    },
    AnalyzeTicket {
        id: EntityId,
    },

    // ── SMS ──────────────────────────────────────────────────────────
    SendSms {
        text: String,
        language: Language,
    },
    RefreshDailyTip {
        language: Language,
    },
}

impl Command {
    /// Short name used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UpdatePrice { .. } => "update_price",
            Self::UpdateStock { .. } => "update_stock",
            Self::AdjustStock { .. } => "adjust_stock",
            Self::SetProductImage { .. } => "set_product_image",
            Self::AddProduct(_) => "add_product",
            Self::UpdateOfferStatus { .. } => "update_offer_status",
            Self::UpdateOrderStatus { .. } => "update_order_status",
            Self::ResolveTicket { .. } => "resolve_ticket",
            Self::AnalyzeTicket { .. } => "analyze_ticket",
            Self::SendSms { .. } => "send_sms",
            Self::RefreshDailyTip { .. } => "refresh_daily_tip",
        }
    }
}

/// Result of a successfully executed command.
#[derive(Debug, Clone)]
pub enum CommandResult {
    Price(MarketPrice),
    Product(Product),
    Offer(CropOffer),
    Order(InputOrder),
    Ticket(SupportTicket),
    /// Messages appended to the inbox, in arrival order.
    Sms(Vec<SmsMessage>),
}
