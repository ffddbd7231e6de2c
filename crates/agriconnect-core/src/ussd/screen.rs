// ── Handset screens ──

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};

/// One state of the USSD menu machine. Exactly one is active at a time.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    IntoStaticStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Screen {
    /// Handset on, nothing typed.
    #[default]
    Idle,
    /// Typing a dial string.
    Dialing,
    MenuLang,
    MenuMain,
    MenuSell,
    MenuSellQty,
    MenuBuy,
    MenuBuyItem,
    MenuBuyQty,
    MenuPrices,
    MenuReport,
    MenuRegName,
    MenuRegRegion,
    /// Terminal screen of a flow: "0" returns to the main menu.
    Result,
}

impl Screen {
    /// Whether a USSD session is open. Keys go to the dial buffer
    /// outside a session and to the session buffer inside one.
    pub fn in_session(self) -> bool {
        !matches!(self, Self::Idle | Self::Dialing)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn tags_are_screaming_snake_case() {
        assert_eq!(Screen::MenuRegRegion.to_string(), "MENU_REG_REGION");
        assert_eq!("MENU_BUY_ITEM".parse::<Screen>().unwrap(), Screen::MenuBuyItem);
        assert_eq!(
            serde_json::to_string(&Screen::MenuSellQty).unwrap(),
            "\"MENU_SELL_QTY\""
        );
    }

    #[test]
    fn only_idle_and_dialing_are_outside_a_session() {
        assert!(!Screen::Idle.in_session());
        assert!(!Screen::Dialing.in_session());
        assert!(Screen::MenuLang.in_session());
        assert!(Screen::Result.in_session());
    }
}
