// ── Display language ──

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// The two languages every screen and message is written in.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Language {
    #[default]
    En,
    Am,
}

impl Language {
    pub fn toggled(self) -> Self {
        match self {
            Self::En => Self::Am,
            Self::Am => Self::En,
        }
    }

    /// Pick the literal for this language from an English/Amharic pair.
    pub fn pick<T>(self, en: T, am: T) -> T {
        match self {
            Self::En => en,
            Self::Am => am,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("AM".parse::<Language>().unwrap(), Language::Am);
        assert_eq!("en".parse::<Language>().unwrap(), Language::En);
        assert!("fr".parse::<Language>().is_err());
    }

    #[test]
    fn toggles_between_the_two() {
        assert_eq!(Language::En.toggled(), Language::Am);
        assert_eq!(Language::Am.toggled().toggled(), Language::Am);
    }
}
