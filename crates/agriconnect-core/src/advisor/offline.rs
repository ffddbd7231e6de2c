// ── Canned advisor ──
//
// Used whenever no API key is configured. SMS replies come from keyword
// tables, one per language. The Amharic table does not mirror the
// English one and has no BUY entry of its own. Its replies still tell
// farmers to send SELL, PRICE and HELP, so Amharic mode checks the
// English table before giving up with the Amharic default.

use async_trait::async_trait;

use super::Advisor;
use crate::model::Language;

pub(crate) const TIP_FALLBACK: &str =
    "Tip: Rotate your crops to maintain soil health (Mock Data - No API Key).";
const TIP_FALLBACK_AM: &str =
    "ምክር: የአፈር ጤናን ለመጠበቅ ሰብሎችዎን ያፈራርቁ (የሙከራ መረጃ - ቁልፍ የለም)።";
pub(crate) const SUGGESTION_FALLBACK: &str =
    "Suggestion: Please contact the local agronomist for a site visit (Mock Data).";

/// First table entry whose keywords appear in the message wins.
struct KeywordReply {
    keywords: &'static [&'static str],
    reply: &'static str,
}

const ENGLISH_REPLIES: &[KeywordReply] = &[
    KeywordReply {
        keywords: &["price"],
        reply: "MARKET UPDATE:\nMaize: 55 ETB/kg\nWheat: 85 ETB/kg\nTeff: 120 ETB/kg",
    },
    KeywordReply {
        keywords: &["sell"],
        reply: "To sell produce, reply with: [CROP] [QUANTITY]. Example: SELL TEFF 50",
    },
    KeywordReply {
        keywords: &["buy"],
        reply: "To buy inputs, visit your local dealer or use *808#.",
    },
    KeywordReply {
        keywords: &["hello", "hi"],
        reply: "Welcome! Reply SELL to offer produce, BUY for inputs, or PRICE for rates.",
    },
    KeywordReply {
        keywords: &["help"],
        reply: "Commands:\nSELL - Offer Crop\nBUY - Order Inputs\nPRICE - Market Rates\nTIP - Advice",
    },
];
const ENGLISH_DEFAULT: &str =
    "Thank you. An agent will review your request. Reply HELP for options.";

const AMHARIC_REPLIES: &[KeywordReply] = &[
    KeywordReply {
        keywords: &["ዋጋ"],
        reply: "የገበያ ዋጋ:\nበቆሎ: 55 ብር/ኪሎ\nስንዴ: 85 ብር/ኪሎ\nጤፍ: 120 ብር/ኪሎ",
    },
    KeywordReply {
        keywords: &["መሸጥ", "ሽያጭ"],
        reply: "ምርት ለመሸጥ: [ሰብል] [መጠን] ብለው ይመልሱ። ምሳሌ: SELL TEFF 50",
    },
    KeywordReply {
        keywords: &["ሰላም"],
        reply: "እንኳን ደህና መጡ! ለመሸጥ SELL፣ ለዋጋ PRICE ብለው ይመልሱ።",
    },
    KeywordReply {
        keywords: &["እርዳታ"],
        reply: "ትዕዛዞች:\nSELL - ምርት መሸጥ\nBUY - ግብዓት መግዛት\nPRICE - የገበያ ዋጋ\nTIP - ምክር",
    },
];
const AMHARIC_DEFAULT: &str = "እናመሰግናለን። ባለሙያ ጥያቄዎን ይመለከታል። ለአማራጮች HELP ብለው ይመልሱ።";

fn lookup(table: &[KeywordReply], lower: &str) -> Option<&'static str> {
    table
        .iter()
        .find(|entry| entry.keywords.iter().any(|k| lower.contains(k)))
        .map(|entry| entry.reply)
}

/// Canned replies, no network.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineAdvisor;

impl OfflineAdvisor {
    /// Keyword-matched reply for `message`.
    pub fn keyword_reply(message: &str, language: Language) -> &'static str {
        let lower = message.to_lowercase();
        match language {
            Language::En => lookup(ENGLISH_REPLIES, &lower).unwrap_or(ENGLISH_DEFAULT),
            Language::Am => lookup(AMHARIC_REPLIES, &lower)
                .or_else(|| lookup(ENGLISH_REPLIES, &lower))
                .unwrap_or(AMHARIC_DEFAULT),
        }
    }
}

#[async_trait]
impl Advisor for OfflineAdvisor {
    fn name(&self) -> &'static str {
        "offline"
    }

    async fn farming_tip(&self, language: Language) -> String {
        language.pick(TIP_FALLBACK, TIP_FALLBACK_AM).into()
    }

    async fn sms_reply(&self, message: &str, language: Language) -> String {
        Self::keyword_reply(message, language).into()
    }

    async fn ticket_suggestion(&self, _issue: &str) -> String {
        SUGGESTION_FALLBACK.into()
    }
}
