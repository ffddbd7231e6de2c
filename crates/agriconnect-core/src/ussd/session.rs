// ── USSD session controller ──
//
// The menu state machine. `submit` is total: every input on every
// screen either moves to another screen or re-renders the current one
// with a notice, and the session buffer is always cleared afterwards.
// Display text is never stored; it is rendered on demand from the
// typed state below.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use super::host::UssdHost;
use super::latency::Pause;
use super::prompts;
use super::screen::Screen;
use super::validate::{is_valid_name, parse_quantity};
use crate::model::{
    Category, Crop, Language, Product, Region, RegisteredUser, menu_choice,
};

/// The dial string that opens a session.
pub const TRIGGER_CODE: &str = "*808#";

/// What a `RESULT` screen reports.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Dialed something other than the trigger code.
    ConnectionError,
    Tip,
    Account(RegisteredUser),
    Welcome(RegisteredUser),
    OfferSent { crop: Crop, quantity: f64 },
    OrderPlaced {
        product_name: String,
        quantity: f64,
        total: f64,
    },
    /// `price` is `None` when the crop is missing from the price board.
    Price { crop: Crop, price: Option<f64> },
    ReportSent,
}

/// Inline hint shown when an input did not match the current screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    InvalidOption,
    InvalidQuantity,
    InvalidName,
    InvalidRegion,
    EmptyReport,
    /// The chosen category has nothing in stock.
    NoStock(Category),
}

/// Everything the display is rendered from.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub screen: Screen,
    pub language: Language,
    /// Keys typed before a session opens.
    pub dial_buffer: String,
    /// Keys typed inside a session.
    pub session_buffer: String,
    pub selected_crop: Option<Crop>,
    pub selected_product: Option<Arc<Product>>,
    pub pending_name: Option<String>,
    pub current_category: Option<Category>,
    /// Products listed on `MENU_BUY_ITEM`, in the order shown.
    pub candidates: Vec<Arc<Product>>,
    pub outcome: Option<Outcome>,
    pub notice: Option<Notice>,
}

/// Snapshot consumed by device skins and the CLI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionView {
    pub screen: Screen,
    pub language: Language,
    pub text: String,
    pub dial_buffer: String,
    pub session_buffer: String,
    pub is_active: bool,
    pub loading: bool,
}

/// A single handset's USSD session.
#[derive(Debug, Clone, Default)]
pub struct UssdSession {
    state: SessionState,
}

impl UssdSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with a given menu language (the handset remembers the last
    /// choice across calls).
    pub fn with_language(language: Language) -> Self {
        Self {
            state: SessionState {
                language,
                ..SessionState::default()
            },
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn screen(&self) -> Screen {
        self.state.screen
    }

    pub fn language(&self) -> Language {
        self.state.language
    }

    /// The buffer `send` would submit.
    pub fn active_buffer(&self) -> &str {
        if self.state.screen.in_session() {
            &self.state.session_buffer
        } else {
            &self.state.dial_buffer
        }
    }

    // ── Keypad ───────────────────────────────────────────────────────

    /// Append keys to the active buffer. Outside a session only dial
    /// characters (digits, `*`, `#`) are taken; the first one moves the
    /// handset from `IDLE` to `DIALING`.
    pub fn press(&mut self, keys: &str) {
        if self.state.screen.in_session() {
            self.state.session_buffer.push_str(keys);
            return;
        }

        for key in keys.chars().filter(|c| c.is_ascii_digit() || matches!(c, '*' | '#')) {
            self.state.dial_buffer.push(key);
            self.state.screen = Screen::Dialing;
        }
    }

    /// Drop the last typed character. Emptying the dial buffer returns
    /// the handset to `IDLE`.
    pub fn backspace(&mut self) {
        if self.state.screen.in_session() {
            self.state.session_buffer.pop();
            return;
        }

        self.state.dial_buffer.pop();
        if self.state.dial_buffer.is_empty() {
            self.state.screen = Screen::Idle;
        }
    }

    /// Hang up: back to `IDLE` with every buffer and selection cleared.
    /// The menu language survives.
    pub fn end_call(&mut self) {
        let language = self.state.language;
        self.state = SessionState {
            language,
            ..SessionState::default()
        };
    }

    /// Switch the menu language. The current screen and all selections
    /// stay as they are; only the rendering changes.
    pub fn set_language(&mut self, language: Language) {
        self.state.language = language;
    }

    /// How long the gateway pauses before applying `input`.
    pub fn pause_for(&self, input: &str) -> Pause {
        match self.state.screen {
            Screen::Result => {
                let to_main = input.trim() == "0"
                    && self.state.outcome != Some(Outcome::ConnectionError);
                if to_main { Pause::None } else { Pause::Brief }
            }
            Screen::MenuRegRegion | Screen::MenuReport => Pause::Long,
            _ => Pause::Standard,
        }
    }

    // ── Rendering ────────────────────────────────────────────────────

    /// Current display text. Empty outside a session.
    pub fn display<H: UssdHost + ?Sized>(&self, host: &H) -> String {
        let user = host.registered_user();
        prompts::render(&self.state, user.as_deref())
    }

    pub fn view<H: UssdHost + ?Sized>(&self, host: &H, loading: bool) -> SessionView {
        SessionView {
            screen: self.state.screen,
            language: self.state.language,
            text: self.display(host),
            dial_buffer: self.state.dial_buffer.clone(),
            session_buffer: self.state.session_buffer.clone(),
            is_active: self.state.screen.in_session(),
            loading,
        }
    }

    // ── Transitions ──────────────────────────────────────────────────

    /// Apply the active buffer.
    pub fn submit_buffer<H: UssdHost + ?Sized>(&mut self, host: &H) -> Screen {
        let input = self.active_buffer().to_owned();
        self.submit(host, &input)
    }

    /// Apply one input to the current screen. Never fails.
    pub fn submit<H: UssdHost + ?Sized>(&mut self, host: &H, input: &str) -> Screen {
        let input = input.trim();
        let from = self.state.screen;
        self.state.notice = None;

        match from {
            Screen::Idle | Screen::Dialing => self.on_dial(input),
            Screen::MenuLang => self.on_language(input),
            Screen::MenuMain => self.on_main(host, input),
            Screen::MenuSell => self.on_sell(input),
            Screen::MenuSellQty => self.on_sell_quantity(host, input),
            Screen::MenuBuy => self.on_buy(host, input),
            Screen::MenuBuyItem => self.on_buy_item(input),
            Screen::MenuBuyQty => self.on_buy_quantity(host, input),
            Screen::MenuPrices => self.on_prices(host, input),
            Screen::MenuReport => self.on_report(host, input),
            Screen::MenuRegName => self.on_registration_name(input),
            Screen::MenuRegRegion => self.on_registration_region(host, input),
            Screen::Result => self.on_result(input),
        }

        self.state.session_buffer.clear();
        let to = self.state.screen;
        debug!(%from, %to, notice = ?self.state.notice, "ussd transition");
        to
    }

    fn on_dial(&mut self, input: &str) {
        self.state.dial_buffer.clear();
        if input == TRIGGER_CODE {
            self.state.screen = Screen::MenuLang;
        } else {
            self.show(Outcome::ConnectionError);
        }
    }

    fn on_language(&mut self, input: &str) {
        match input {
            "1" => {
                self.state.language = Language::En;
                self.go_main();
            }
            "2" => {
                self.state.language = Language::Am;
                self.go_main();
            }
            _ => self.reject(Notice::InvalidOption),
        }
    }

    fn on_main<H: UssdHost + ?Sized>(&mut self, host: &H, input: &str) {
        match input {
            "1" => self.state.screen = Screen::MenuSell,
            "2" => self.state.screen = Screen::MenuBuy,
            "3" => self.state.screen = Screen::MenuPrices,
            "4" => self.show(Outcome::Tip),
            "5" => self.state.screen = Screen::MenuReport,
            "6" => match host.registered_user() {
                Some(user) => self.show(Outcome::Account(RegisteredUser::clone(&user))),
                None => self.state.screen = Screen::MenuRegName,
            },
            _ => self.reject(Notice::InvalidOption),
        }
    }

    fn on_sell(&mut self, input: &str) {
        if input == "0" {
            self.go_main();
            return;
        }
        match menu_choice(&Crop::SELL_MENU, input) {
            Some(crop) => {
                self.state.selected_crop = Some(crop);
                self.state.screen = Screen::MenuSellQty;
            }
            None => self.reject(Notice::InvalidOption),
        }
    }

    fn on_sell_quantity<H: UssdHost + ?Sized>(&mut self, host: &H, input: &str) {
        let Some(crop) = self.state.selected_crop else {
            self.go_main();
            return;
        };
        let Some(quantity) = parse_quantity(input) else {
            self.reject(Notice::InvalidQuantity);
            return;
        };

        let user = host.registered_user();
        host.create_offer(crop.catalog_name(), quantity, user.as_deref().map(|u| u.name.as_str()));
        info!(crop = crop.catalog_name(), quantity, "crop offer submitted from handset");
        self.show(Outcome::OfferSent { crop, quantity });
    }

    fn on_buy<H: UssdHost + ?Sized>(&mut self, host: &H, input: &str) {
        if input == "0" {
            self.go_main();
            return;
        }
        let Some(category) = menu_choice(&Category::BUY_MENU, input) else {
            self.reject(Notice::InvalidOption);
            return;
        };

        let candidates: Vec<Arc<Product>> = host
            .products()
            .iter()
            .filter(|p| p.category == category)
            .cloned()
            .collect();

        if candidates.is_empty() {
            self.reject(Notice::NoStock(category));
            return;
        }

        self.state.current_category = Some(category);
        self.state.candidates = candidates;
        self.state.screen = Screen::MenuBuyItem;
    }

    fn on_buy_item(&mut self, input: &str) {
        if input == "0" {
            self.state.current_category = None;
            self.state.candidates.clear();
            self.state.screen = Screen::MenuBuy;
            return;
        }

        let picked = input
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| self.state.candidates.get(i))
            .cloned();

        match picked {
            Some(product) => {
                self.state.selected_product = Some(product);
                self.state.screen = Screen::MenuBuyQty;
            }
            None => self.reject(Notice::InvalidOption),
        }
    }

    fn on_buy_quantity<H: UssdHost + ?Sized>(&mut self, host: &H, input: &str) {
        let Some(product) = self.state.selected_product.clone() else {
            self.go_main();
            return;
        };
        let Some(quantity) = parse_quantity(input) else {
            self.reject(Notice::InvalidQuantity);
            return;
        };

        host.create_order(&product.id, quantity);
        let total = quantity * product.price;
        info!(product = %product.id, quantity, total, "input order submitted from handset");
        self.show(Outcome::OrderPlaced {
            product_name: product.name.clone(),
            quantity,
            total,
        });
    }

    fn on_prices<H: UssdHost + ?Sized>(&mut self, host: &H, input: &str) {
        if input == "0" {
            self.go_main();
            return;
        }
        let Some(crop) = menu_choice(&Crop::PRICE_MENU, input) else {
            self.reject(Notice::InvalidOption);
            return;
        };

        let price = host
            .prices()
            .iter()
            .find(|p| p.crop == crop.catalog_name())
            .map(|p| p.price_per_kg);
        self.show(Outcome::Price { crop, price });
    }

    fn on_report<H: UssdHost + ?Sized>(&mut self, host: &H, input: &str) {
        if input.is_empty() {
            self.reject(Notice::EmptyReport);
            return;
        }
        host.create_support_ticket(input);
        self.show(Outcome::ReportSent);
    }

    fn on_registration_name(&mut self, input: &str) {
        if is_valid_name(input) {
            self.state.pending_name = Some(input.to_owned());
            self.state.screen = Screen::MenuRegRegion;
        } else {
            self.reject(Notice::InvalidName);
        }
    }

    fn on_registration_region<H: UssdHost + ?Sized>(&mut self, host: &H, input: &str) {
        let Some(name) = self.state.pending_name.clone() else {
            self.state.screen = Screen::MenuRegName;
            return;
        };
        let Some(region) = menu_choice(&Region::ALL, input) else {
            self.reject(Notice::InvalidRegion);
            return;
        };

        host.register_user(&name, region);
        self.state.pending_name = None;
        self.show(Outcome::Welcome(RegisteredUser { name, region }));
    }

    fn on_result(&mut self, input: &str) {
        let connection_error = self.state.outcome == Some(Outcome::ConnectionError);
        if input == "0" && !connection_error {
            self.go_main();
        } else {
            self.end_call();
        }
    }

    // ── Helpers ──────────────────────────────────────────────────────

    fn go_main(&mut self) {
        let language = self.state.language;
        self.state = SessionState {
            screen: Screen::MenuMain,
            language,
            ..SessionState::default()
        };
    }

    fn show(&mut self, outcome: Outcome) {
        self.state.outcome = Some(outcome);
        self.state.screen = Screen::Result;
    }

    fn reject(&mut self, notice: Notice) {
        self.state.notice = Some(notice);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;

    use chrono::Utc;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::{EntityId, MarketPrice, Trend};

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Offer(String, f64, Option<String>),
        Order(EntityId, f64),
        Ticket(String),
        Register(String, Region),
    }

    #[derive(Default)]
    struct FakeHost {
        products: Vec<Arc<Product>>,
        prices: Vec<Arc<MarketPrice>>,
        user: Mutex<Option<Arc<RegisteredUser>>>,
        calls: Mutex<Vec<Call>>,
    }

    impl FakeHost {
        fn stocked() -> Self {
            let product = |id: &str, name: &str, category, price| {
                Arc::new(Product {
                    id: id.into(),
                    name: String::from(name),
                    category,
                    price,
                    stock: 10,
                    unit: "kg".into(),
                    image: None,
                })
            };
            Self {
                products: vec![
                    product("P-1", "Urea Fertilizer", Category::Fertilizer, 3500.0),
                    product("P-2", "Teff Seed", Category::Seeds, 500.0),
                    product("P-3", "Maize Seed", Category::Seeds, 320.0),
                ],
                prices: vec![Arc::new(MarketPrice {
                    crop: "Teff (White)".into(),
                    price_per_kg: 120.0,
                    trend: Trend::Up,
                    last_updated: Utc::now(),
                })],
                ..Self::default()
            }
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl UssdHost for FakeHost {
        fn products(&self) -> Arc<Vec<Arc<Product>>> {
            Arc::new(self.products.clone())
        }

        fn prices(&self) -> Arc<Vec<Arc<MarketPrice>>> {
            Arc::new(self.prices.clone())
        }

        fn registered_user(&self) -> Option<Arc<RegisteredUser>> {
            self.user.lock().unwrap().clone()
        }

        fn create_offer(&self, crop: &str, quantity: f64, farmer_name: Option<&str>) {
            self.calls.lock().unwrap().push(Call::Offer(
                crop.into(),
                quantity,
                farmer_name.map(String::from),
            ));
        }

        fn create_order(&self, product_id: &EntityId, quantity: f64) {
            self.calls
                .lock()
                .unwrap()
                .push(Call::Order(product_id.clone(), quantity));
        }

        fn create_support_ticket(&self, issue: &str) {
            self.calls.lock().unwrap().push(Call::Ticket(issue.into()));
        }

        fn register_user(&self, name: &str, region: Region) {
            self.calls
                .lock()
                .unwrap()
                .push(Call::Register(name.into(), region));
            let mut user = self.user.lock().unwrap();
            if user.is_none() {
                *user = Some(Arc::new(RegisteredUser {
                    name: name.into(),
                    region,
                }));
            }
        }
    }

    /// Dial in and pick English.
    fn at_main_menu(host: &FakeHost) -> UssdSession {
        let mut session = UssdSession::new();
        session.press("*808#");
        session.submit_buffer(host);
        session.submit(host, "1");
        assert_eq!(session.screen(), Screen::MenuMain);
        session
    }

    fn drive(host: &FakeHost, session: &mut UssdSession, inputs: &[&str]) {
        for input in inputs {
            session.press(input);
            session.submit_buffer(host);
        }
    }

    // ── Keypad ───────────────────────────────────────────────────────

    #[test]
    fn dial_keys_only_outside_a_session() {
        let mut session = UssdSession::new();
        session.press("a");
        assert_eq!(session.screen(), Screen::Idle);
        session.press("*8x0");
        assert_eq!(session.screen(), Screen::Dialing);
        assert_eq!(session.active_buffer(), "*80");
    }

    #[test]
    fn backspace_to_empty_returns_to_idle() {
        let mut session = UssdSession::new();
        session.press("*8");
        session.backspace();
        assert_eq!(session.screen(), Screen::Dialing);
        session.backspace();
        assert_eq!(session.screen(), Screen::Idle);
        session.backspace();
        assert_eq!(session.screen(), Screen::Idle);
    }

    #[test]
    fn session_buffer_accepts_any_text() {
        let host = FakeHost::stocked();
        let mut session = at_main_menu(&host);
        session.submit(&host, "6");
        session.press("Abebe ");
        session.press("Kebede");
        session.backspace();
        assert_eq!(session.active_buffer(), "Abebe Kebed");
    }

    // ── Dialing ──────────────────────────────────────────────────────

    #[test]
    fn trigger_code_always_opens_language_menu() {
        let host = FakeHost::stocked();
        host.register_user("Abebe Kebede", Region::Oromia);
        for language in [Language::En, Language::Am] {
            let mut session = UssdSession::with_language(language);
            session.press(TRIGGER_CODE);
            assert_eq!(session.submit_buffer(&host), Screen::MenuLang);
            assert_eq!(session.active_buffer(), "");
        }
    }

    #[test]
    fn wrong_code_shows_connection_error_then_any_key_hangs_up() {
        let host = FakeHost::stocked();
        let mut session = UssdSession::new();
        session.press("*123#");
        session.submit_buffer(&host);
        assert_eq!(session.screen(), Screen::Result);
        assert_eq!(
            session.display(&host),
            "Connection Error or Invalid MMI Code.\nTry *808#"
        );

        session.submit(&host, "0");
        assert_eq!(session.screen(), Screen::Idle);
    }

    // ── Invalid input ────────────────────────────────────────────────

    #[test]
    fn invalid_input_keeps_the_screen_and_clears_the_buffer() {
        let host = FakeHost::stocked();
        let cases: &[(&[&str], Screen)] = &[
            (&[], Screen::MenuLang),
            (&["1"], Screen::MenuMain),
            (&["1", "1"], Screen::MenuSell),
            (&["1", "1", "1"], Screen::MenuSellQty),
            (&["1", "2"], Screen::MenuBuy),
            (&["1", "2", "2"], Screen::MenuBuyItem),
            (&["1", "2", "2", "1"], Screen::MenuBuyQty),
            (&["1", "3"], Screen::MenuPrices),
            (&["1", "6"], Screen::MenuRegName),
            (&["1", "6", "Abebe Kebede"], Screen::MenuRegRegion),
        ];

        for (path, expected) in cases {
            let mut session = UssdSession::new();
            session.press(TRIGGER_CODE);
            session.submit_buffer(&host);
            drive(&host, &mut session, path);
            assert_eq!(session.screen(), *expected);

            let before = session.display(&host);
            session.press("99x");
            assert_eq!(session.submit_buffer(&host), *expected, "path {path:?}");
            assert_eq!(session.active_buffer(), "");
            assert!(session.state().notice.is_some());
            let first = session.display(&host);
            assert_ne!(first, before);

            // Retrying the same bad input lands on the same prompt.
            session.submit(&host, "99x");
            assert_eq!(session.screen(), *expected);
            assert_eq!(session.display(&host), first);
        }
        assert!(host.calls().is_empty());
    }

    #[test]
    fn empty_report_is_not_filed() {
        let host = FakeHost::stocked();
        let mut session = at_main_menu(&host);
        session.submit(&host, "5");
        session.submit(&host, "   ");
        assert_eq!(session.screen(), Screen::MenuReport);
        assert!(host.calls().is_empty());
    }

    // ── Sell ─────────────────────────────────────────────────────────

    #[test]
    fn bad_quantities_never_create_an_offer() {
        let host = FakeHost::stocked();
        let mut session = at_main_menu(&host);
        drive(&host, &mut session, &["1", "3"]);
        for qty in ["-5", "0", "ten", "5kg"] {
            session.submit(&host, qty);
            assert_eq!(session.screen(), Screen::MenuSellQty);
            assert_eq!(
                session.display(&host),
                "Invalid Quantity.\nEnter a number (e.g., 10)"
            );
        }
        assert!(host.calls().is_empty());
    }

    #[test]
    fn sell_flow_files_offer_with_catalog_name() {
        let host = FakeHost::stocked();
        let mut session = at_main_menu(&host);
        drive(&host, &mut session, &["1", "1", "12.5"]);

        assert_eq!(session.screen(), Screen::Result);
        assert_eq!(
            host.calls(),
            vec![Call::Offer("Teff (White)".into(), 12.5, None)]
        );
        assert_eq!(
            session.display(&host),
            "Offer Sent!\n12.5 Qtl of Teff (White).\nDealers will contact you.\n\n0. Exit"
        );
    }

    #[test]
    fn offers_carry_the_registered_name() {
        let host = FakeHost::stocked();
        host.register_user("Almaz Ayana", Region::Sidama);
        let mut session = at_main_menu(&host);
        drive(&host, &mut session, &["1", "4", "3"]);
        assert_eq!(
            host.calls().last(),
            Some(&Call::Offer("Wheat".into(), 3.0, Some("Almaz Ayana".into())))
        );
    }

    // ── Buy ──────────────────────────────────────────────────────────

    #[test]
    fn buy_flow_displays_exact_total() {
        let host = FakeHost::stocked();
        let mut session = at_main_menu(&host);
        drive(&host, &mut session, &["2", "2"]);
        assert_eq!(session.state().current_category, Some(Category::Seeds));
        assert_eq!(session.state().candidates.len(), 2);

        drive(&host, &mut session, &["1", "3"]);
        assert_eq!(host.calls(), vec![Call::Order("P-2".into(), 3.0)]);
        insta::assert_snapshot!(session.display(&host), @r"
        Order Placed!
        Teff Seed
        Qty: 3
        Total: 1500 ETB
        Pay at Dealer.

        0. Exit
        ");
    }

    #[test]
    fn empty_category_stays_on_buy_menu() {
        let host = FakeHost::stocked();
        let mut session = at_main_menu(&host);
        drive(&host, &mut session, &["2", "4"]);
        assert_eq!(session.screen(), Screen::MenuBuy);
        assert_eq!(session.state().notice, Some(Notice::NoStock(Category::Tools)));
        assert_eq!(session.display(&host), "No Tools available.\n0. Back");
    }

    #[test]
    fn back_from_item_list_returns_to_categories() {
        let host = FakeHost::stocked();
        let mut session = at_main_menu(&host);
        drive(&host, &mut session, &["2", "1", "0"]);
        assert_eq!(session.screen(), Screen::MenuBuy);
        assert!(session.state().candidates.is_empty());
        assert_eq!(session.state().current_category, None);
    }

    #[test]
    fn item_index_out_of_range_is_rejected() {
        let host = FakeHost::stocked();
        let mut session = at_main_menu(&host);
        drive(&host, &mut session, &["2", "1", "2"]);
        assert_eq!(session.screen(), Screen::MenuBuyItem);
        assert!(session.display(&host).starts_with("Invalid. Select Fertilizer:"));
    }

    // ── Prices ───────────────────────────────────────────────────────

    #[test]
    fn price_lookup_by_catalog_name() {
        let host = FakeHost::stocked();
        let mut session = at_main_menu(&host);
        drive(&host, &mut session, &["3", "1"]);
        assert_eq!(session.display(&host), "Teff (White): 120 ETB/kg\n0. Back");

        drive(&host, &mut session, &["0", "3", "2"]);
        assert_eq!(session.display(&host), "Coffee (Jimma): N/A ETB/kg\n0. Back");
    }

    // ── Report ───────────────────────────────────────────────────────

    #[test]
    fn report_keeps_full_issue_text() {
        let host = FakeHost::stocked();
        let mut session = at_main_menu(&host);
        let issue = "My maize leaves are turning yellow after the last rains";
        drive(&host, &mut session, &["5", issue]);
        assert_eq!(host.calls(), vec![Call::Ticket(issue.into())]);
        assert_eq!(session.display(&host), "Report Sent!\n0. Exit");
    }

    // ── Registration ─────────────────────────────────────────────────

    #[test]
    fn registration_rejects_digits_then_accepts_real_name() {
        let host = FakeHost::stocked();
        let mut session = at_main_menu(&host);
        drive(&host, &mut session, &["6", "Farmer1"]);
        assert_eq!(session.screen(), Screen::MenuRegName);
        assert_eq!(
            session.display(&host),
            "Invalid Name (Letters only).\nEnter Full Name:"
        );

        drive(&host, &mut session, &["Abebe Kebede", "1"]);
        assert_eq!(session.screen(), Screen::Result);
        assert_eq!(
            host.calls(),
            vec![Call::Register("Abebe Kebede".into(), Region::Oromia)]
        );
        let user = host.registered_user().unwrap();
        assert_eq!(user.region, Region::Oromia);
        assert_eq!(
            session.display(&host),
            "Welcome, Abebe Kebede!\nAccount Created.\nRegion: Oromia\n\n0. Main Menu"
        );
    }

    #[test]
    fn account_option_shows_details_once_registered() {
        let host = FakeHost::stocked();
        host.register_user("Abebe Kebede", Region::AddisAbaba);
        let mut session = at_main_menu(&host);
        session.submit(&host, "6");
        assert_eq!(
            session.display(&host),
            "Name: Abebe Kebede\nRegion: Addis Ababa\nStatus: Active\n\n0. Back"
        );
    }

    // ── Result ───────────────────────────────────────────────────────

    #[test]
    fn zero_from_result_returns_to_personalised_main_menu() {
        let host = FakeHost::stocked();
        let mut session = at_main_menu(&host);
        drive(&host, &mut session, &["6", "Abebe Kebede", "1", "0"]);
        assert_eq!(session.screen(), Screen::MenuMain);
        assert!(session.display(&host).starts_with("AgriConnect Eth\nHello, Abebe Kebede\n"));
        assert!(session.display(&host).ends_with("6. My Account"));
    }

    #[test]
    fn other_input_from_result_hangs_up() {
        let host = FakeHost::stocked();
        let mut session = at_main_menu(&host);
        drive(&host, &mut session, &["4", "9"]);
        assert_eq!(session.screen(), Screen::Idle);
        assert_eq!(session.display(&host), "");
    }

    // ── Language ─────────────────────────────────────────────────────

    #[test]
    fn language_switch_rerenders_without_losing_selection() {
        let host = FakeHost::stocked();
        let mut session = at_main_menu(&host);
        drive(&host, &mut session, &["1", "2"]);
        assert_eq!(
            session.display(&host),
            "Selling Coffee (Jimma).\nEnter Quantity (Quintals):"
        );

        session.set_language(Language::Am);
        assert_eq!(session.screen(), Screen::MenuSellQty);
        assert_eq!(session.state().selected_crop, Some(Crop::Coffee));
        assert_eq!(session.display(&host), "ቡና (ጅማ) መሸጥ።\nመጠን ያስገቡ (በኩንታል):");

        // The flow continues where it left off.
        session.submit(&host, "2");
        assert_eq!(
            host.calls(),
            vec![Call::Offer("Coffee (Jimma)".into(), 2.0, None)]
        );
    }

    #[test]
    fn end_call_clears_everything_but_language() {
        let host = FakeHost::stocked();
        let mut session = at_main_menu(&host);
        session.submit(&host, "2");
        session.submit(&host, "2");
        session.set_language(Language::Am);
        session.end_call();

        let state = session.state();
        assert_eq!(state.screen, Screen::Idle);
        assert_eq!(state.language, Language::Am);
        assert!(state.candidates.is_empty());
        assert!(state.current_category.is_none());
        assert!(state.dial_buffer.is_empty());
    }

    // ── Latency classes ──────────────────────────────────────────────

    #[test]
    fn pauses_follow_the_screen() {
        let host = FakeHost::stocked();
        let mut session = at_main_menu(&host);
        assert_eq!(session.pause_for("1"), Pause::Standard);

        session.submit(&host, "5");
        assert_eq!(session.pause_for("help"), Pause::Long);

        session.submit(&host, "help");
        assert_eq!(session.pause_for("0"), Pause::None);
        assert_eq!(session.pause_for("1"), Pause::Brief);
    }
}
