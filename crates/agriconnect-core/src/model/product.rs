// ── Dealer inventory and market prices ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::catalog::Category;
use super::entity_id::EntityId;

/// An input a dealer sells to farmers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: EntityId,
    pub name: String,
    pub category: Category,
    /// Unit price in ETB.
    pub price: f64,
    pub stock: u32,
    /// Selling unit, e.g. "50kg bag".
    pub unit: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl Product {
    /// Name cut to fit a handset menu line.
    pub fn short_name(&self) -> String {
        self.name.chars().take(15).collect()
    }
}

/// Price direction shown on the price board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Stable,
}

/// Current market price for one crop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketPrice {
    /// Catalog crop name, e.g. "Teff (White)".
    pub crop: String,
    pub price_per_kg: f64,
    pub trend: Trend,
    pub last_updated: DateTime<Utc>,
}

/// Format an ETB amount with thousands separators, e.g. `27,500` or `1,234.5`.
pub fn format_amount(value: f64) -> String {
    let rendered = format!("{:.2}", value.abs());
    let (whole, fraction) = rendered.split_once('.').unwrap_or((rendered.as_str(), ""));
    let fraction = fraction.trim_end_matches('0');

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if value < 0.0 { "-" } else { "" };
    if fraction.is_empty() {
        format!("{sign}{grouped}")
    } else {
        format!("{sign}{grouped}.{fraction}")
    }
}
