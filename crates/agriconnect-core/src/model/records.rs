// ── Records created by farmers and handled on the dashboards ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::entity_id::EntityId;

// ── Crop offers (farmer sells produce) ──────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum OfferStatus {
    Pending,
    Accepted,
    Rejected,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropOffer {
    pub id: EntityId,
    pub farmer_name: String,
    pub crop: String,
    /// Quantity in quintals (100 kg).
    pub quantity: f64,
    pub status: OfferStatus,
    pub timestamp: DateTime<Utc>,
}

// ── Input orders (farmer buys from a dealer) ────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum OrderStatus {
    Pending,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputOrder {
    pub id: EntityId,
    pub farmer_name: String,
    pub product_name: String,
    pub quantity: f64,
    /// Authoritative total in ETB, computed by the market.
    pub total_price: f64,
    pub status: OrderStatus,
    pub timestamp: DateTime<Utc>,
}

// ── Support tickets (call center) ───────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum TicketStatus {
    Open,
    #[serde(rename = "In Progress")]
    #[strum(to_string = "In Progress", serialize = "inprogress")]
    InProgress,
    Resolved,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
pub enum Priority {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupportTicket {
    pub id: EntityId,
    pub farmer_name: String,
    pub phone_number: String,
    pub issue: String,
    pub status: TicketStatus,
    pub priority: Priority,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_suggestion: Option<String>,
}

impl SupportTicket {
    pub fn is_active(&self) -> bool {
        self.status != TicketStatus::Resolved
    }
}

// ── Dealer history ──────────────────────────────────────────────────

/// One line of the dealer dashboard's history tab.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityEntry {
    pub id: EntityId,
    pub action: String,
    pub details: String,
    pub timestamp: DateTime<Utc>,
}
