// ── SMS inbox ──
//
// Messages are stored with the English text they were sent with. System
// messages that come from a known template also keep the template and
// its parameters, so the inbox can be re-rendered in Amharic.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::entity_id::EntityId;
use super::language::Language;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SmsSender {
    System,
    Farmer,
}

/// Re-renderable system message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SmsTemplate {
    SystemAlert,
    OfferAccepted {
        quantity: String,
        crop: String,
        total: String,
    },
    OrderFulfilled {
        quantity: String,
        product: String,
        total: String,
    },
}

impl SmsTemplate {
    pub fn render(&self, lang: Language) -> String {
        match (self, lang) {
            (Self::SystemAlert, Language::En) => {
                "ALERT: Heavy rains expected in Oromia region. Secure Teff harvest.".into()
            }
            (Self::SystemAlert, Language::Am) => {
                "ማስጠንቀቂያ: በኦሮሚያ ክልል ከባድ ዝናብ ይጠበቃል። የጤፍ ምርትዎን ይጠብቁ።".into()
            }
            (
                Self::OfferAccepted {
                    quantity,
                    crop,
                    total,
                },
                Language::En,
            ) => format!(
                "DEAL ALERT: Your offer for {quantity} Qtl of {crop} has been ACCEPTED. \
                 Total: {total} ETB. Call: 0911-55-44-22"
            ),
            (
                Self::OfferAccepted {
                    quantity,
                    crop,
                    total,
                },
                Language::Am,
            ) => format!(
                "የስምምነት ማሳወቂያ: ለ{quantity} ኩንታል {crop} ያቀረቡት ቅናሽ ተቀባይነት አግኝቷል። \
                 ጠቅላላ: {total} ብር። ይደውሉ: 0911-55-44-22"
            ),
            (
                Self::OrderFulfilled {
                    quantity,
                    product,
                    total,
                },
                Language::En,
            ) => format!(
                "ORDER READY: {quantity}x {product}. Total: {total} ETB. \
                 Contact Dealer: 0911-55-44-22."
            ),
            (
                Self::OrderFulfilled {
                    quantity,
                    product,
                    total,
                },
                Language::Am,
            ) => format!(
                "ትዕዛዝ ዝግጁ ነው: {quantity}x {product}። ጠቅላላ: {total} ብር። \
                 ነጋዴውን ያግኙ: 0911-55-44-22።"
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmsMessage {
    pub id: EntityId,
    pub sender: SmsSender,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<SmsTemplate>,
}

impl SmsMessage {
    /// Text to show in `lang`: templated messages are re-rendered, free
    /// text is shown as sent.
    pub fn text_in(&self, lang: Language) -> String {
        self.template
            .as_ref()
            .map_or_else(|| self.text.clone(), |t| t.render(lang))
    }
}
