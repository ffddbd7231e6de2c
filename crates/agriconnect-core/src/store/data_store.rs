// ── Central market store ──
//
// One object owns every record the simulator knows about: the dealer's
// inventory, crop prices, offers, orders, support tickets, the farmer's
// SMS inbox and the dealer activity log. It is constructed once at
// startup and handed to whoever needs it; there is no ambient state.

use std::sync::Arc;

use arc_swap::ArcSwapOption;
use chrono::Utc;
use rand::Rng;

use super::collection::EntityCollection;
use super::seed;
use crate::model::{
    ActivityEntry, CropOffer, EntityId, IdPrefix, InputOrder, MarketPrice, Product,
    RegisteredUser, SmsMessage, SupportTicket,
};
use crate::stream::EntityStream;

/// Random attempts before falling back to a sequential scan.
const RANDOM_ID_ATTEMPTS: usize = 32;

/// Reactive in-memory store for all market records.
///
/// Collections vend `Arc` snapshots; mutations are broadcast to
/// subscribers via `watch` channels.
pub struct MarketStore {
    pub(crate) products: EntityCollection<Product>,
    pub(crate) prices: EntityCollection<MarketPrice>,
    pub(crate) offers: EntityCollection<CropOffer>,
    pub(crate) orders: EntityCollection<InputOrder>,
    pub(crate) tickets: EntityCollection<SupportTicket>,
    pub(crate) inbox: EntityCollection<SmsMessage>,
    pub(crate) activity: EntityCollection<ActivityEntry>,
    registered_user: ArcSwapOption<RegisteredUser>,
}

impl MarketStore {
    /// An empty store. Mostly useful in tests.
    pub fn new() -> Self {
        Self {
            products: EntityCollection::new(),
            prices: EntityCollection::new(),
            offers: EntityCollection::new(),
            orders: EntityCollection::new(),
            tickets: EntityCollection::new(),
            inbox: EntityCollection::new(),
            activity: EntityCollection::new(),
            registered_user: ArcSwapOption::empty(),
        }
    }

    /// A store pre-filled with the demo catalog, prices and backlog.
    pub fn with_demo_data() -> Self {
        let now = Utc::now();
        Self {
            products: EntityCollection::from_items(seed::products()),
            prices: EntityCollection::from_items(seed::prices(now)),
            offers: EntityCollection::from_items(seed::offers(now)),
            orders: EntityCollection::from_items(seed::orders(now)),
            tickets: EntityCollection::from_items(seed::tickets(now)),
            inbox: EntityCollection::from_items(seed::inbox(now)),
            activity: EntityCollection::new(),
            registered_user: ArcSwapOption::empty(),
        }
    }

    // ── Snapshot accessors ───────────────────────────────────────────

    pub fn products_snapshot(&self) -> Arc<Vec<Arc<Product>>> {
        self.products.snapshot()
    }

    pub fn prices_snapshot(&self) -> Arc<Vec<Arc<MarketPrice>>> {
        self.prices.snapshot()
    }

    pub fn offers_snapshot(&self) -> Arc<Vec<Arc<CropOffer>>> {
        self.offers.snapshot()
    }

    pub fn orders_snapshot(&self) -> Arc<Vec<Arc<InputOrder>>> {
        self.orders.snapshot()
    }

    pub fn tickets_snapshot(&self) -> Arc<Vec<Arc<SupportTicket>>> {
        self.tickets.snapshot()
    }

    pub fn inbox_snapshot(&self) -> Arc<Vec<Arc<SmsMessage>>> {
        self.inbox.snapshot()
    }

    pub fn activity_snapshot(&self) -> Arc<Vec<Arc<ActivityEntry>>> {
        self.activity.snapshot()
    }

    // ── Single-record lookups ────────────────────────────────────────

    pub fn product(&self, id: &EntityId) -> Option<Arc<Product>> {
        self.products.get(id)
    }

    /// Price row for a crop, matched by its catalog name.
    pub fn price_for(&self, crop: &str) -> Option<Arc<MarketPrice>> {
        self.prices.find(|p| p.crop == crop)
    }

    pub fn offer(&self, id: &EntityId) -> Option<Arc<CropOffer>> {
        self.offers.get(id)
    }

    pub fn order(&self, id: &EntityId) -> Option<Arc<InputOrder>> {
        self.orders.get(id)
    }

    pub fn ticket(&self, id: &EntityId) -> Option<Arc<SupportTicket>> {
        self.tickets.get(id)
    }

    // ── Registered user ──────────────────────────────────────────────

    pub fn registered_user(&self) -> Option<Arc<RegisteredUser>> {
        self.registered_user.load_full()
    }

    /// Store the handset's account. Only the first registration sticks;
    /// returns `false` if an account already existed.
    pub fn register_user(&self, user: RegisteredUser) -> bool {
        let previous = self
            .registered_user
            .compare_and_swap(&None::<Arc<RegisteredUser>>, Some(Arc::new(user)));
        previous.is_none()
    }

    // ── Subscriptions ────────────────────────────────────────────────

    pub fn subscribe_products(&self) -> EntityStream<Product> {
        EntityStream::new(self.products.subscribe())
    }

    pub fn subscribe_offers(&self) -> EntityStream<CropOffer> {
        EntityStream::new(self.offers.subscribe())
    }

    pub fn subscribe_orders(&self) -> EntityStream<InputOrder> {
        EntityStream::new(self.orders.subscribe())
    }

    pub fn subscribe_tickets(&self) -> EntityStream<SupportTicket> {
        EntityStream::new(self.tickets.subscribe())
    }

    pub fn subscribe_inbox(&self) -> EntityStream<SmsMessage> {
        EntityStream::new(self.inbox.subscribe())
    }

    // ── Activity log ─────────────────────────────────────────────────

    /// Prepend an entry to the dealer activity log.
    pub(crate) fn log_activity(&self, action: &str, details: String) {
        let id = fresh_id(&self.activity, IdPrefix::Activity);
        let entry = ActivityEntry {
            id: id.clone(),
            action: action.into(),
            details,
            timestamp: Utc::now(),
        };
        self.activity.push_front(id, entry);
    }

    // ── Counts ───────────────────────────────────────────────────────

    pub fn product_count(&self) -> usize {
        self.products.len()
    }

    pub fn pending_offer_count(&self) -> usize {
        self.offers
            .snapshot()
            .iter()
            .filter(|o| o.status == crate::model::OfferStatus::Pending)
            .count()
    }

    pub fn open_ticket_count(&self) -> usize {
        self.tickets.snapshot().iter().filter(|t| t.is_active()).count()
    }
}

impl Default for MarketStore {
    fn default() -> Self {
        Self::with_demo_data()
    }
}

/// Pick an unused `{prefix}-NNNN` id for `col`.
///
/// Ids are random four-digit numbers, the shape agents read off their
/// dashboards. Collisions are retried; a crowded collection falls back
/// to the first free number.
pub(crate) fn fresh_id<T: Clone + Send + Sync + 'static>(
    col: &EntityCollection<T>,
    prefix: IdPrefix,
) -> EntityId {
    let mut rng = rand::thread_rng();
    for _ in 0..RANDOM_ID_ATTEMPTS {
        let id = EntityId::prefixed(prefix, rng.gen_range(0..10_000));
        if !col.contains(&id) {
            return id;
        }
    }

    (0u32..)
        .map(|n| EntityId::prefixed(prefix, n))
        .find(|id| !col.contains(id))
        .unwrap_or_else(|| EntityId::prefixed(prefix, 0))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::Region;

    #[test]
    fn demo_store_is_populated() {
        let store = MarketStore::with_demo_data();
        assert!(store.product_count() > 0);
        assert_eq!(store.prices_snapshot().len(), 4);
        assert_eq!(store.inbox_snapshot().len(), 1);
        assert!(store.activity_snapshot().is_empty());
        assert!(store.registered_user().is_none());
    }

    #[test]
    fn price_lookup_uses_catalog_name() {
        let store = MarketStore::with_demo_data();
        assert_eq!(store.price_for("Teff (White)").unwrap().price_per_kg, 120.0);
        assert!(store.price_for("Teff").is_none());
    }

    #[test]
    fn first_registration_wins() {
        let store = MarketStore::new();
        assert!(store.register_user(RegisteredUser {
            name: "Abebe Kebede".into(),
            region: Region::Oromia,
        }));
        assert!(!store.register_user(RegisteredUser {
            name: "Someone Else".into(),
            region: Region::Tigray,
        }));

        let user = store.registered_user().unwrap();
        assert_eq!(user.name, "Abebe Kebede");
        assert_eq!(user.region, Region::Oromia);
    }

    #[test]
    fn fresh_ids_carry_prefix_and_avoid_existing() {
        let store = MarketStore::with_demo_data();
        for _ in 0..50 {
            let id = fresh_id(&store.tickets, IdPrefix::Ticket);
            assert_eq!(id.prefix(), Some(IdPrefix::Ticket));
            assert!(!store.tickets.contains(&id));
        }
    }

    #[test]
    fn activity_log_is_newest_first() {
        let store = MarketStore::new();
        store.log_activity("Stock Added", "Added Hoe".into());
        store.log_activity("Price Update", "Maize: 55 -> 60 ETB".into());
        let log = store.activity_snapshot();
        assert_eq!(log[0].action, "Price Update");
        assert_eq!(log[1].action, "Stock Added");
    }
}
