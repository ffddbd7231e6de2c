// ── Fixed menu catalogs ──
//
// Crops a farmer can sell or price-check, input categories a dealer
// stocks, and the administrative regions offered at registration.
// Menu positions are part of the handset contract: option "1" always
// means the first entry of the relevant menu array below.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::language::Language;

/// Resolve a 1-based keypad choice against a fixed menu.
pub fn menu_choice<T: Copy>(menu: &[T], input: &str) -> Option<T> {
    let position: usize = input.parse().ok()?;
    position.checked_sub(1).and_then(|i| menu.get(i)).copied()
}

// ── Crops ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Crop {
    Teff,
    Coffee,
    Maize,
    Wheat,
}

impl Crop {
    /// Crops listed on the "sell produce" screen.
    pub const SELL_MENU: [Self; 4] = [Self::Teff, Self::Coffee, Self::Maize, Self::Wheat];

    /// Crops listed on the "check price" screen.
    pub const PRICE_MENU: [Self; 3] = [Self::Teff, Self::Coffee, Self::Maize];

    /// Market name used in offers and in the price board.
    pub fn catalog_name(self) -> &'static str {
        match self {
            Self::Teff => "Teff (White)",
            Self::Coffee => "Coffee (Jimma)",
            Self::Maize => "Maize",
            Self::Wheat => "Wheat",
        }
    }

    /// Short label used in menu listings.
    pub fn menu_label(self, lang: Language) -> &'static str {
        match self {
            Self::Teff => lang.pick("Teff", "ጤፍ"),
            Self::Coffee => lang.pick("Coffee", "ቡና"),
            Self::Maize => lang.pick("Maize", "በቆሎ"),
            Self::Wheat => lang.pick("Wheat", "ስንዴ"),
        }
    }

    /// Full name shown once a crop has been chosen.
    pub fn display_name(self, lang: Language) -> &'static str {
        match lang {
            Language::En => self.catalog_name(),
            Language::Am => match self {
                Self::Teff => "ጤፍ (ነጭ)",
                Self::Coffee => "ቡና (ጅማ)",
                Self::Maize => "በቆሎ",
                Self::Wheat => "ስንዴ",
            },
        }
    }
}

// ── Input categories ────────────────────────────────────────────────

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum Category {
    Seeds,
    Fertilizer,
    Tools,
    Pesticide,
}

impl Category {
    /// Order of the "buy inputs" screen.
    pub const BUY_MENU: [Self; 4] = [Self::Fertilizer, Self::Seeds, Self::Pesticide, Self::Tools];

    /// Plural label on the category menu.
    pub fn menu_label(self, lang: Language) -> &'static str {
        match self {
            Self::Fertilizer => lang.pick("Fertilizers", "ማዳበሪያ"),
            Self::Seeds => lang.pick("Seeds", "ምርጥ ዘር"),
            Self::Pesticide => lang.pick("Pesticides", "ፀረ-ተባይ"),
            Self::Tools => lang.pick("Tools", "የእርሻ መሳሪያ"),
        }
    }

    /// Singular name used in headings such as "Select Fertilizer:".
    pub fn heading(self, lang: Language) -> &'static str {
        match self {
            Self::Fertilizer => lang.pick("Fertilizer", "ማዳበሪያ"),
            Self::Seeds => lang.pick("Seeds", "ምርጥ ዘር"),
            Self::Pesticide => lang.pick("Pesticide", "ፀረ-ተባይ"),
            Self::Tools => lang.pick("Tools", "የእርሻ መሳሪያ"),
        }
    }
}

// ── Regions ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Region {
    Oromia,
    Amhara,
    #[serde(rename = "SNNPR")]
    Snnpr,
    Sidama,
    Tigray,
    Somali,
    #[serde(rename = "Addis Ababa")]
    AddisAbaba,
}

impl Region {
    pub const ALL: [Self; 7] = [
        Self::Oromia,
        Self::Amhara,
        Self::Snnpr,
        Self::Sidama,
        Self::Tigray,
        Self::Somali,
        Self::AddisAbaba,
    ];

    pub fn name(self, lang: Language) -> &'static str {
        match self {
            Self::Oromia => lang.pick("Oromia", "ኦሮሚያ"),
            Self::Amhara => lang.pick("Amhara", "አማራ"),
            Self::Snnpr => lang.pick("SNNPR", "ደቡብ"),
            Self::Sidama => lang.pick("Sidama", "ሲዳማ"),
            Self::Tigray => lang.pick("Tigray", "ትግራይ"),
            Self::Somali => lang.pick("Somali", "ሶማሌ"),
            Self::AddisAbaba => lang.pick("Addis Ababa", "አዲስ አበባ"),
        }
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name(Language::En))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn menu_choice_is_one_based() {
        assert_eq!(menu_choice(&Crop::SELL_MENU, "1"), Some(Crop::Teff));
        assert_eq!(menu_choice(&Crop::SELL_MENU, "4"), Some(Crop::Wheat));
        assert_eq!(menu_choice(&Crop::SELL_MENU, "0"), None);
        assert_eq!(menu_choice(&Crop::SELL_MENU, "5"), None);
    }

    #[test]
    fn menu_choice_rejects_non_digits() {
        assert_eq!(menu_choice(&Crop::PRICE_MENU, "1a"), None);
        assert_eq!(menu_choice(&Crop::PRICE_MENU, "-1"), None);
        assert_eq!(menu_choice(&Crop::PRICE_MENU, ""), None);
    }

    #[test]
    fn wheat_is_not_on_the_price_menu() {
        assert_eq!(menu_choice(&Crop::PRICE_MENU, "4"), None);
    }

    #[test]
    fn buy_menu_order_matches_handset_options() {
        assert_eq!(menu_choice(&Category::BUY_MENU, "1"), Some(Category::Fertilizer));
        assert_eq!(menu_choice(&Category::BUY_MENU, "3"), Some(Category::Pesticide));
    }

    #[test]
    fn region_names_are_parallel() {
        assert_eq!(Region::ALL.len(), 7);
        assert_eq!(Region::Oromia.name(Language::En), "Oromia");
        assert_eq!(Region::Snnpr.name(Language::Am), "ደቡብ");
        assert_eq!(Region::AddisAbaba.to_string(), "Addis Ababa");
    }
}
