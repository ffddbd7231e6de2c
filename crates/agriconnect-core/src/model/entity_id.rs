// ── Record identity ──
//
// Every record the market stores (products, offers, orders, tickets,
// SMS messages) is addressed by a short prefixed identifier such as
// `T-0421` or `OR-1187`, the same shape dealers and agents read off
// their dashboards.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ── EntityId ────────────────────────────────────────────────────────

/// Canonical identifier for any stored record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Build a `{prefix}-{number}` identifier, zero-padded to four digits.
    pub fn prefixed(prefix: IdPrefix, number: u32) -> Self {
        Self(format!("{}-{number:04}", prefix.as_str()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The record family this id belongs to, if it carries a known prefix.
    pub fn prefix(&self) -> Option<IdPrefix> {
        let (head, _) = self.0.split_once('-')?;
        IdPrefix::ALL.into_iter().find(|p| p.as_str() == head)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for EntityId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s.trim()))
    }
}

impl From<String> for EntityId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ── IdPrefix ────────────────────────────────────────────────────────

/// Record families and the prefix their identifiers carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdPrefix {
    Product,
    Offer,
    Order,
    Ticket,
    Sms,
    Activity,
}

impl IdPrefix {
    pub const ALL: [Self; 6] = [
        Self::Product,
        Self::Offer,
        Self::Order,
        Self::Ticket,
        Self::Sms,
        Self::Activity,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Product => "P",
            Self::Offer => "O",
            Self::Order => "OR",
            Self::Ticket => "T",
            Self::Sms => "SMS",
            Self::Activity => "H",
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn prefixed_pads_to_four_digits() {
        let id = EntityId::prefixed(IdPrefix::Ticket, 42);
        assert_eq!(id.as_str(), "T-0042");
    }

    #[test]
    fn prefix_distinguishes_offer_from_order() {
        assert_eq!(EntityId::from("O-0001").prefix(), Some(IdPrefix::Offer));
        assert_eq!(EntityId::from("OR-0001").prefix(), Some(IdPrefix::Order));
    }

    #[test]
    fn unknown_prefix_is_none() {
        assert_eq!(EntityId::from("daily-tip").prefix(), None);
        assert_eq!(EntityId::from("plain").prefix(), None);
    }

    #[test]
    fn from_str_trims() {
        let id: EntityId = "  P-0003 ".parse().unwrap();
        assert_eq!(id.to_string(), "P-0003");
    }
}
