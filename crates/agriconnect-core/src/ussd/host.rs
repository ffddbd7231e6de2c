// ── Host application seam ──
//
// The session controller reads catalog data from, and reports farmer
// actions to, whatever owns the market. Callbacks return nothing: the
// handset shows its confirmation screen regardless of what the host does.

use std::sync::Arc;

use crate::model::{EntityId, MarketPrice, Product, Region, RegisteredUser};

/// Everything the USSD controller needs from the surrounding application.
pub trait UssdHost: Send + Sync {
    /// Current inventory, in dashboard order.
    fn products(&self) -> Arc<Vec<Arc<Product>>>;

    /// Current crop price board.
    fn prices(&self) -> Arc<Vec<Arc<MarketPrice>>>;

    /// The handset's account, if one was created.
    fn registered_user(&self) -> Option<Arc<RegisteredUser>>;

    /// A farmer offered `quantity` quintals of `crop` (catalog name).
    fn create_offer(&self, crop: &str, quantity: f64, farmer_name: Option<&str>);

    /// A farmer ordered `quantity` units of a product.
    fn create_order(&self, product_id: &EntityId, quantity: f64);

    /// A farmer reported a problem.
    fn create_support_ticket(&self, issue: &str);

    /// A farmer finished registration.
    fn register_user(&self, name: &str, region: Region);
}
