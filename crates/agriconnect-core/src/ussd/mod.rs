// ── USSD handset simulation ──
//
// The menu state machine a farmer drives by dialing `*808#`, the host
// seam it reports through, and the handset/skin layers that present it.

pub mod handset;
pub mod host;
pub mod latency;
pub mod prompts;
pub mod screen;
pub mod session;
pub mod skin;
pub mod validate;

pub use handset::Handset;
pub use host::UssdHost;
pub use latency::{InstantLatency, Latency, LatencyProfile, Pause, TokioLatency};
pub use screen::Screen;
pub use session::{Notice, Outcome, SessionState, SessionView, TRIGGER_CODE, UssdSession};
pub use skin::DeviceSkin;
