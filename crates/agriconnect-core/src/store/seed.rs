// ── Demo data ──
//
// The records a fresh market starts with, so every dashboard has
// something to show before the first handset session.

use chrono::{DateTime, Duration, Utc};

use crate::model::{
    Category, CropOffer, EntityId, InputOrder, MarketPrice, OfferStatus, OrderStatus, Priority,
    Product, SmsMessage, SmsSender, SmsTemplate, SupportTicket, TicketStatus, Trend,
};

/// Farmer names used for offers placed by unregistered handsets.
pub const ETHIOPIAN_NAMES: &[&str] = &[
    "Abebe Bikila",
    "Almaz Ayana",
    "Kenenisa Bekele",
    "Tirunesh Dibaba",
    "Haile Gebrselassie",
    "Derartu Tulu",
    "Meseret Defar",
    "Tsegaye Kebede",
    "Genzebe Dibaba",
    "Mulugeta Wendimu",
    "Yohannes Tesfaye",
    "Hirut Bekele",
];

fn product(
    id: &str,
    name: &str,
    category: Category,
    price: f64,
    stock: u32,
    unit: &str,
) -> (EntityId, Product) {
    let id = EntityId::from(id);
    let product = Product {
        id: id.clone(),
        name: name.into(),
        category,
        price,
        stock,
        unit: unit.into(),
        image: None,
    };
    (id, product)
}

pub(crate) fn products() -> Vec<(EntityId, Product)> {
    vec![
        product("P-0001", "Urea Fertilizer", Category::Fertilizer, 3500.0, 120, "50kg bag"),
        product("P-0002", "DAP Fertilizer", Category::Fertilizer, 4200.0, 80, "50kg bag"),
        product("P-0003", "Improved Teff Seed (Quncho)", Category::Seeds, 500.0, 200, "kg"),
        product("P-0004", "Hybrid Maize Seed (BH-661)", Category::Seeds, 320.0, 150, "kg"),
        product("P-0005", "Wheat Seed (Kakaba)", Category::Seeds, 95.0, 0, "kg"),
        product("P-0006", "Malathion Insecticide", Category::Pesticide, 850.0, 40, "litre"),
        product("P-0007", "Hand Sickle", Category::Tools, 250.0, 60, "piece"),
        product("P-0008", "Knapsack Sprayer", Category::Tools, 2800.0, 15, "piece"),
    ]
}

fn price(crop: &str, price_per_kg: f64, trend: Trend, at: DateTime<Utc>) -> (EntityId, MarketPrice) {
    let price = MarketPrice {
        crop: crop.into(),
        price_per_kg,
        trend,
        last_updated: at,
    };
    (EntityId::from(crop), price)
}

pub(crate) fn prices(now: DateTime<Utc>) -> Vec<(EntityId, MarketPrice)> {
    vec![
        price("Teff (White)", 120.0, Trend::Up, now),
        price("Coffee (Jimma)", 380.0, Trend::Stable, now),
        price("Maize", 55.0, Trend::Down, now),
        price("Wheat", 85.0, Trend::Up, now),
    ]
}

pub(crate) fn offers(now: DateTime<Utc>) -> Vec<(EntityId, CropOffer)> {
    [
        ("O-1021", "Abebe Bikila", "Teff (White)", 10.0, OfferStatus::Pending, 2),
        ("O-1008", "Almaz Ayana", "Coffee (Jimma)", 4.0, OfferStatus::Pending, 26),
        ("O-0994", "Tsegaye Kebede", "Maize", 25.0, OfferStatus::Accepted, 50),
    ]
    .into_iter()
    .map(|(id, farmer, crop, quantity, status, hours_ago)| {
        let id = EntityId::from(id);
        let offer = CropOffer {
            id: id.clone(),
            farmer_name: farmer.into(),
            crop: crop.into(),
            quantity,
            status,
            timestamp: now - Duration::hours(hours_ago),
        };
        (id, offer)
    })
    .collect()
}

pub(crate) fn orders(now: DateTime<Utc>) -> Vec<(EntityId, InputOrder)> {
    [
        ("OR-2045", "Hirut Bekele", "Urea Fertilizer", 2.0, 7000.0, OrderStatus::Pending, 5),
        ("OR-2031", "Mulugeta Wendimu", "Hand Sickle", 3.0, 750.0, OrderStatus::Completed, 30),
    ]
    .into_iter()
    .map(|(id, farmer, product, quantity, total, status, hours_ago)| {
        let id = EntityId::from(id);
        let order = InputOrder {
            id: id.clone(),
            farmer_name: farmer.into(),
            product_name: product.into(),
            quantity,
            total_price: total,
            status,
            timestamp: now - Duration::hours(hours_ago),
        };
        (id, order)
    })
    .collect()
}

pub(crate) fn tickets(now: DateTime<Utc>) -> Vec<(EntityId, SupportTicket)> {
    [
        (
            "T-0421",
            "Kebede Alemu",
            "+251 911 234 567",
            "Yellow spots appearing on my teff leaves after the rains",
            TicketStatus::Open,
            Priority::High,
            1,
        ),
        (
            "T-0417",
            "Meseret Haile",
            "+251 922 345 678",
            "Fertilizer order has not arrived at the cooperative",
            TicketStatus::InProgress,
            Priority::Medium,
            20,
        ),
        (
            "T-0402",
            "Getachew Tadesse",
            "+251 933 456 789",
            "How do I register for the market price alerts?",
            TicketStatus::Resolved,
            Priority::Low,
            72,
        ),
    ]
    .into_iter()
    .map(|(id, farmer, phone, issue, status, priority, hours_ago)| {
        let id = EntityId::from(id);
        let ticket = SupportTicket {
            id: id.clone(),
            farmer_name: farmer.into(),
            phone_number: phone.into(),
            issue: issue.into(),
            status,
            priority,
            timestamp: now - Duration::hours(hours_ago),
            ai_suggestion: None,
        };
        (id, ticket)
    })
    .collect()
}

/// The weather alert every inbox starts with.
pub(crate) fn inbox(now: DateTime<Utc>) -> Vec<(EntityId, SmsMessage)> {
    let id = EntityId::from("SMS-0001");
    let template = SmsTemplate::SystemAlert;
    let alert = SmsMessage {
        id: id.clone(),
        sender: SmsSender::System,
        text: template.render(crate::model::Language::En),
        timestamp: now,
        template: Some(template),
    };
    vec![(id, alert)]
}
