// ── Registered farmer ──

use serde::{Deserialize, Serialize};

use super::catalog::Region;

/// The farmer account created through the handset's registration flow.
///
/// Lives for the lifetime of the market, not of a single dial.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisteredUser {
    pub name: String,
    pub region: Region,
}
