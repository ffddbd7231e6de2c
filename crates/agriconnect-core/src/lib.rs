//! Application core for the AgriConnect Ethiopia simulator.
//!
//! Everything a farmer, dealer or call-center agent touches goes through
//! this crate:
//!
//! - **[`Market`]**: the facade owning all state. It is the host the
//!   handset reports into and executes every dashboard [`Command`].
//!
//! - **[`MarketStore`]**: in-memory record collections (products,
//!   prices, offers, orders, tickets, SMS inbox, activity log) with watch
//!   channels, handed out as [`EntityStream<T>`] subscriptions.
//!
//! - **[`ussd`]**: the `*808#` menu state machine ([`UssdSession`]), the
//!   [`Handset`] driving it with network latency, and the [`DeviceSkin`]
//!   frames that render it.
//!
//! - **[`advisor`]**: farming tips, automatic SMS replies and ticket
//!   suggestions, either offline or backed by a hosted language model.

pub mod advisor;
pub mod command;
pub mod config;
pub mod error;
pub mod model;
pub mod store;
pub mod stream;
pub mod ussd;

mod market;

// ── Primary re-exports ──────────────────────────────────────────────
pub use advisor::Advisor;
pub use command::{Command, CommandResult, NewProduct};
pub use config::{AdvisorSettings, DealerCredentials, MarketConfig};
pub use error::CoreError;
pub use market::{DAILY_TIP_ID, MASKED_PHONE, MOBILE_USER, Market, Notification};
pub use store::MarketStore;
pub use stream::EntityStream;
pub use ussd::{DeviceSkin, Handset, Screen, SessionView, UssdHost, UssdSession};

// Model types at the crate root.
pub use model::{
    ActivityEntry, Category, Crop, CropOffer, EntityId, IdPrefix, InputOrder, Language,
    MarketPrice, OfferStatus, OrderStatus, Priority, Product, Region, RegisteredUser, SmsMessage,
    SmsSender, SmsTemplate, SupportTicket, TicketStatus, Trend, format_amount,
};
