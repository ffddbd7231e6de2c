// ── Farming advisor ──
//
// Generates the daily farming tip, automatic SMS replies and call-center
// ticket suggestions. The USSD menus never consult it. Advisors always
// answer: failures degrade to fixed fallback text, never to an error.

mod gemini;
mod offline;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::AdvisorSettings;
use crate::error::CoreError;
use crate::model::Language;

pub use gemini::GeminiAdvisor;
pub use offline::OfflineAdvisor;

#[async_trait]
pub trait Advisor: Send + Sync {
    /// Short label for logs and the CLI status line.
    fn name(&self) -> &'static str;

    /// One practical tip for a smallholder farmer.
    async fn farming_tip(&self, language: Language) -> String;

    /// Automatic reply to a farmer's SMS.
    async fn sms_reply(&self, message: &str, language: Language) -> String;

    /// Suggested resolution for a support ticket.
    async fn ticket_suggestion(&self, issue: &str) -> String;
}

/// Build the advisor described by `settings`.
pub fn from_settings(settings: &AdvisorSettings) -> Result<Arc<dyn Advisor>, CoreError> {
    match settings {
        AdvisorSettings::Offline => Ok(Arc::new(OfflineAdvisor)),
        AdvisorSettings::Gemini {
            api_key,
            model,
            base_url,
            timeout,
        } => Ok(Arc::new(GeminiAdvisor::new(
            api_key,
            model.clone(),
            base_url.clone(),
            *timeout,
        )?)),
    }
}
