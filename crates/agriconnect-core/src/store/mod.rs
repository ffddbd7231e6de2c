// ── In-memory market store ──
//
// Lock-protected record collections with push-based change notification.
// Everything lives for the lifetime of the process.

mod collection;
mod data_store;
mod seed;

pub use data_store::MarketStore;
pub(crate) use data_store::fresh_id;
pub use seed::ETHIOPIAN_NAMES;
