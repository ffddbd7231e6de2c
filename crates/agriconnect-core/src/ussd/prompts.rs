// ── Bilingual screen texts ──
//
// A pure function of the session state and the registered account.
// English and Amharic templates sit side by side so they stay parallel.

use std::fmt::Write as _;

use super::screen::Screen;
use super::session::{Notice, Outcome, SessionState};
use crate::model::{Category, Crop, Language, Product, Region, RegisteredUser};

const CONNECTION_ERROR: &str = "Connection Error or Invalid MMI Code.\nTry *808#";
const LANGUAGE_MENU: &str = "AgriConnect Ethiopia\n1. English\n2. አማርኛ (Amharic)";
const LANGUAGE_MENU_INVALID: &str = "Invalid Option/የተሳሳተ ምርጫ\n1. English\n2. አማርኛ";

/// Render the display text for `state`. Empty outside a session.
pub fn render(state: &SessionState, user: Option<&RegisteredUser>) -> String {
    let lang = state.language;
    let notice = state.notice;

    match state.screen {
        Screen::Idle | Screen::Dialing => String::new(),
        Screen::MenuLang => match notice {
            Some(_) => LANGUAGE_MENU_INVALID.into(),
            None => LANGUAGE_MENU.into(),
        },
        Screen::MenuMain => match notice {
            Some(_) => main_menu_invalid(lang),
            None => main_menu(lang, user),
        },
        Screen::MenuSell => {
            let title = match notice {
                Some(_) => lang.pick("Invalid Crop.", "የተሳሳተ ምርጫ።"),
                None => lang.pick("Select Crop to Sell:", "የሚሸጡትን ሰብል ይምረጡ:"),
            };
            crop_menu(title, &Crop::SELL_MENU, lang)
        }
        Screen::MenuSellQty => sell_quantity(state, lang),
        Screen::MenuBuy => match notice {
            Some(Notice::NoStock(category)) => {
                let heading = category.heading(lang);
                match lang {
                    Language::En => format!("No {heading} available.\n0. Back"),
                    Language::Am => format!("ምንም {heading} የለም።\n0. ተመለስ"),
                }
            }
            Some(_) => category_menu(lang.pick("Invalid Category.", "የተሳሳተ ምርጫ።"), lang),
            None => category_menu(lang.pick("Buy Inputs:", "ግብዓት መግዛት:"), lang),
        },
        Screen::MenuBuyItem => product_list(state, lang),
        Screen::MenuBuyQty => buy_quantity(state, lang),
        Screen::MenuPrices => {
            let title = match notice {
                Some(_) => lang.pick("Invalid Crop.", "የተሳሳተ ምርጫ።"),
                None => lang.pick("Check Price:", "ዋጋ ያረጋግጡ:"),
            };
            crop_menu(title, &Crop::PRICE_MENU, lang)
        }
        Screen::MenuReport => {
            let prompt = lang.pick("Describe your issue:", "ችግርዎን ይግለጹ:");
            match notice {
                Some(_) => format!(
                    "{}\n{prompt}",
                    lang.pick("Issue cannot be empty.", "ችግሩ ባዶ መሆን አይችልም።")
                ),
                None => prompt.into(),
            }
        }
        Screen::MenuRegName => match notice {
            Some(_) => lang
                .pick(
                    "Invalid Name (Letters only).\nEnter Full Name:",
                    "ትክክለኛ ስም ያስገቡ (ፊደላት ብቻ)።\nሙሉ ስም ያስገቡ:",
                )
                .into(),
            None => lang.pick("Enter your Full Name:", "ሙሉ ስምዎን ያስገቡ:").into(),
        },
        Screen::MenuRegRegion => match notice {
            Some(_) => {
                let mut text = lang.pick("Invalid Region.", "የተሳሳተ ክልል").to_owned();
                for (i, region) in Region::ALL.iter().take(4).enumerate() {
                    let _ = write!(text, "\n{}. {}", i + 1, region.name(lang));
                }
                text.push_str("...");
                text
            }
            None => {
                let mut text = lang.pick("Select Region:", "ክልል ይምረጡ:").to_owned();
                for (i, region) in Region::ALL.iter().enumerate() {
                    let _ = write!(text, "\n{}. {}", i + 1, region.name(lang));
                }
                text
            }
        },
        Screen::Result => state
            .outcome
            .as_ref()
            .map_or_else(|| main_menu(lang, user), |outcome| result(outcome, lang)),
    }
}

/// The main menu, greeting the account holder when there is one.
pub fn main_menu(lang: Language, user: Option<&RegisteredUser>) -> String {
    match lang {
        Language::En => {
            let greeting = user.map(|u| format!("\nHello, {}", u.name)).unwrap_or_default();
            let account = if user.is_some() { "My Account" } else { "Create Account" };
            format!(
                "AgriConnect Eth{greeting}\n1. Sell Produce\n2. Buy Inputs\n3. Market Prices\n\
                 4. Farming Tips\n5. Report Issue\n6. {account}"
            )
        }
        Language::Am => {
            let greeting = user.map(|u| format!("\nሰላም, {}", u.name)).unwrap_or_default();
            let account = if user.is_some() { "የእኔ መለያ" } else { "መለያ ይፍጠሩ" };
            format!(
                "አግሪ-ኮኔክት{greeting}\n1. ምርት ለመሸጥ\n2. ግብዓት ለመግዛት\n3. የገበያ ዋጋ\n\
                 4. የግብርና ምክር\n5. ችግር ለማመልከት\n6. {account}"
            )
        }
    }
}

fn main_menu_invalid(lang: Language) -> String {
    lang.pick(
        "Invalid Option.\n1. Sell Produce\n2. Buy Inputs\n3. Prices\n4. Tips\n5. Report\n6. Account",
        "የተሳሳተ ምርጫ።\n1. ምርት ለመሸጥ\n2. ግብዓት ለመግዛት\n3. የገበያ ዋጋ\n4. ምክር\n5. ሪፖርት\n6. መለያ",
    )
    .into()
}

fn back(lang: Language) -> &'static str {
    lang.pick("0. Back", "0. ተመለስ")
}

fn crop_menu(title: &str, crops: &[Crop], lang: Language) -> String {
    let mut text = title.to_owned();
    for (i, crop) in crops.iter().enumerate() {
        let _ = write!(text, "\n{}. {}", i + 1, crop.menu_label(lang));
    }
    let _ = write!(text, "\n{}", back(lang));
    text
}

fn category_menu(title: &str, lang: Language) -> String {
    let mut text = title.to_owned();
    for (i, category) in Category::BUY_MENU.iter().enumerate() {
        let _ = write!(text, "\n{}. {}", i + 1, category.menu_label(lang));
    }
    let _ = write!(text, "\n{}", back(lang));
    text
}

fn sell_quantity(state: &SessionState, lang: Language) -> String {
    let crop = state.selected_crop.map_or("", |c| c.display_name(lang));
    match (state.notice, lang) {
        (Some(_), Language::En) => "Invalid Quantity.\nEnter a number (e.g., 10)".into(),
        (Some(_), Language::Am) => "የተሳሳተ መጠን።\nትክክለኛ ቁጥር ያስገቡ".into(),
        (None, Language::En) => format!("Selling {crop}.\nEnter Quantity (Quintals):"),
        (None, Language::Am) => format!("{crop} መሸጥ።\nመጠን ያስገቡ (በኩንታል):"),
    }
}

fn product_line(index: usize, product: &Product, lang: Language) -> String {
    let currency = lang.pick("ETB", "ብር");
    format!("{index}. {}.. ({} {currency})", product.short_name(), product.price)
}

fn product_list(state: &SessionState, lang: Language) -> String {
    let heading = state.current_category.map_or("", |c| c.heading(lang));
    let mut text = match (state.notice, lang) {
        (Some(_), Language::En) => format!("Invalid. Select {heading}:"),
        (Some(_), Language::Am) => format!("የተሳሳተ። {heading} ይምረጡ:"),
        (None, Language::En) => format!("Select {heading}:"),
        (None, Language::Am) => format!("{heading} ይምረጡ:"),
    };
    for (i, product) in state.candidates.iter().enumerate() {
        let _ = write!(text, "\n{}", product_line(i + 1, product, lang));
    }
    let _ = write!(text, "\n{}", back(lang));
    text
}

fn buy_quantity(state: &SessionState, lang: Language) -> String {
    if state.notice.is_some() {
        return lang
            .pick("Invalid Quantity.\nEnter a number.", "የተሳሳተ መጠን።\nቁጥር ያስገቡ።")
            .into();
    }
    let Some(product) = state.selected_product.as_deref() else {
        return lang.pick("Enter Qty:", "መጠን ያስገቡ:").into();
    };
    match lang {
        Language::En => format!(
            "Buying {}\nPrice: {} ETB\nEnter Qty:",
            product.name, product.price
        ),
        Language::Am => format!("{} መግዛት\nዋጋ: {} ብር\nመጠን ያስገቡ:", product.name, product.price),
    }
}

fn result(outcome: &Outcome, lang: Language) -> String {
    match (outcome, lang) {
        (Outcome::ConnectionError, _) => CONNECTION_ERROR.into(),
        (Outcome::Tip, Language::En) => {
            "Tip: Rotate crops annually to prevent soil depletion.\n\n0. Back".into()
        }
        (Outcome::Tip, Language::Am) => {
            "ምክር: የአፈር ለምነትን ለመጠበቅ በየዓመቱ ሰብል ያፈራርቁ።\n\n0. ተመለስ".into()
        }
        (Outcome::Account(user), Language::En) => format!(
            "Name: {}\nRegion: {}\nStatus: Active\n\n0. Back",
            user.name,
            user.region.name(lang)
        ),
        (Outcome::Account(user), Language::Am) => format!(
            "ስም: {}\nክልል: {}\nሁኔታ: ንቁ\n\n0. ተመለስ",
            user.name,
            user.region.name(lang)
        ),
        (Outcome::Welcome(user), Language::En) => format!(
            "Welcome, {}!\nAccount Created.\nRegion: {}\n\n0. Main Menu",
            user.name,
            user.region.name(lang)
        ),
        (Outcome::Welcome(user), Language::Am) => format!(
            "እንኳን ደህና መጡ {}!\nመለያ ተፈጥሯል።\nክልል: {}\n\n0. ዋና ማውጫ",
            user.name,
            user.region.name(lang)
        ),
        (Outcome::OfferSent { crop, quantity }, Language::En) => format!(
            "Offer Sent!\n{quantity} Qtl of {}.\nDealers will contact you.\n\n0. Exit",
            crop.display_name(lang)
        ),
        (Outcome::OfferSent { crop, quantity }, Language::Am) => format!(
            "ተልኳል!\n{quantity} ኩንታል {}.\nነጋዴዎች ያግኙዎታል።\n\n0. ውጣ",
            crop.display_name(lang)
        ),
        (
            Outcome::OrderPlaced {
                product_name,
                quantity,
                total,
            },
            Language::En,
        ) => format!(
            "Order Placed!\n{product_name}\nQty: {quantity}\nTotal: {total} ETB\nPay at Dealer.\n\n0. Exit"
        ),
        (
            Outcome::OrderPlaced {
                product_name,
                quantity,
                total,
            },
            Language::Am,
        ) => format!("ትዕዛዝ ተቀብለናል!\n{product_name}\nመጠን: {quantity}\nጠቅላላ: {total} ብር\n\n0. ውጣ"),
        (Outcome::Price { crop, price }, _) => {
            let price = price.map_or_else(|| "N/A".to_owned(), |p| p.to_string());
            match lang {
                Language::En => format!("{}: {price} ETB/kg\n0. Back", crop.display_name(lang)),
                Language::Am => format!("{}: {price} ብር/ኪሎ\n0. ተመለስ", crop.display_name(lang)),
            }
        }
        (Outcome::ReportSent, Language::En) => "Report Sent!\n0. Exit".into(),
        (Outcome::ReportSent, Language::Am) => "ሪፖርት ተልኳል!\n0. ውጣ".into(),
    }
}
