// ── Domain model ──
//
// Canonical record types shared by the handset, the dashboards and the
// SMS inbox. Consumers import them flat from the crate root.

pub mod catalog;
pub mod entity_id;
pub mod language;
pub mod product;
pub mod records;
pub mod sms;
pub mod user;

// ── Re-exports ──────────────────────────────────────────────────────

pub use catalog::{Category, Crop, Region, menu_choice};
pub use entity_id::{EntityId, IdPrefix};
pub use language::Language;
pub use product::{MarketPrice, Product, Trend, format_amount};
pub use records::{
    ActivityEntry, CropOffer, InputOrder, OfferStatus, OrderStatus, Priority, SupportTicket,
    TicketStatus,
};
pub use sms::{SmsMessage, SmsSender, SmsTemplate};
pub use user::RegisteredUser;
