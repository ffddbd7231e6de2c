// ── Hosted advisor ──
//
// Calls the Gemini `generateContent` REST endpoint directly. An empty
// model answer and a failed request each map to a fixed fallback line,
// so callers always get text back.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use url::Url;

use super::Advisor;
use crate::error::CoreError;
use crate::model::Language;

const TIP_EMPTY: &str = "Keep your fields weed-free to ensure better yields.";
const TIP_FAILED: &str = "Ensure proper irrigation during dry spells.";
const SUGGESTION_EMPTY: &str = "Assess the crop for visible damage and isolate affected plants.";
const SUGGESTION_FAILED: &str = "Check for pest infestation signs under leaves.";
const SMS_EMPTY: &str = "System: Unable to process request.";
const SMS_FAILED: &str = "System: Service unavailable. Please try again later.";

/// Advisor backed by a hosted Gemini model.
#[derive(Clone)]
pub struct GeminiAdvisor {
    client: Client,
    model: String,
    base_url: Url,
}

impl std::fmt::Debug for GeminiAdvisor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiAdvisor")
            .field("model", &self.model)
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl GeminiAdvisor {
    /// The key is sent as the sensitive `x-goog-api-key` default header.
    pub fn new(
        api_key: &SecretString,
        model: impl Into<String>,
        base_url: Url,
        timeout: Duration,
    ) -> Result<Self, CoreError> {
        let mut headers = HeaderMap::new();
        let mut key_value =
            HeaderValue::from_str(api_key.expose_secret()).map_err(|e| CoreError::Config {
                message: format!("invalid advisor API key header value: {e}"),
            })?;
        key_value.set_sensitive(true);
        headers.insert("x-goog-api-key", key_value);

        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| CoreError::Config {
                message: format!("cannot build HTTP client: {e}"),
            })?;
        Ok(Self {
            client,
            model: model.into(),
            base_url,
        })
    }

    fn endpoint(&self) -> Result<Url, CoreError> {
        let raw = format!(
            "{}/{}:generateContent",
            self.base_url.as_str().trim_end_matches('/'),
            self.model
        );
        Url::parse(&raw).map_err(|e| CoreError::Config {
            message: format!("invalid advisor endpoint {raw}: {e}"),
        })
    }

    /// Send one prompt. `Ok(None)` means the model answered without text.
    async fn generate(&self, prompt: String) -> Result<Option<String>, CoreError> {
        let body = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(self.endpoint()?)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        let parsed: GenerateContentResponse = response.json().await?;
        Ok(extract_text(parsed))
    }

    async fn answer(&self, task: &'static str, prompt: String, empty: &str, failed: &str) -> String {
        match self.generate(prompt).await {
            Ok(Some(text)) => {
                debug!(task, chars = text.chars().count(), "advisor answered");
                text
            }
            Ok(None) => {
                warn!(task, "advisor returned no text, using fallback");
                empty.into()
            }
            Err(e) => {
                warn!(task, error = %e, "advisor request failed, using fallback");
                failed.into()
            }
        }
    }
}

fn language_hint(language: Language) -> &'static str {
    language.pick("", " Answer in Amharic.")
}

#[async_trait]
impl Advisor for GeminiAdvisor {
    fn name(&self) -> &'static str {
        "gemini"
    }

    async fn farming_tip(&self, language: Language) -> String {
        let prompt = format!(
            "Generate a short, practical, and easy-to-understand farming tip for a \
             smallholder farmer in Africa. Max 20 words.{}",
            language_hint(language)
        );
        self.answer("farming_tip", prompt, TIP_EMPTY, TIP_FAILED).await
    }

    async fn sms_reply(&self, message: &str, language: Language) -> String {
        let prompt = format!(
            "You are an SMS automated assistant for AgriConnect Ethiopia. The user is a farmer.\n\
             User message: \"{message}\".\n\
             Instructions:\n\
             1. Primary Goal: Help farmers SELL their produce (Teff, Coffee, etc.).\n\
             2. Secondary Goal: Help farmers BUY inputs (Fertilizer, Seeds).\n\
             3. If they ask for prices, give realistic Ethiopian market prices (ETB).\n\
             4. Keep answers short (under 160 chars).\n\
             5. Tone: Helpful, professional.{}",
            language_hint(language)
        );
        self.answer("sms_reply", prompt, SMS_EMPTY, SMS_FAILED).await
    }

    async fn ticket_suggestion(&self, issue: &str) -> String {
        let prompt = format!(
            "You are an expert agricultural support agent. A farmer has reported this issue: \
             \"{issue}\". Provide a concise, actionable solution (max 50 words)."
        );
        self.answer("ticket_suggestion", prompt, SUGGESTION_EMPTY, SUGGESTION_FAILED)
            .await
    }
}

// ── Wire types ──────────────────────────────────────────────────────

#[derive(Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Serialize)]
struct Content {
    role: &'static str,
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ContentResponse>,
}

#[derive(Deserialize)]
struct ContentResponse {
    #[serde(default)]
    parts: Vec<PartResponse>,
}

#[derive(Deserialize)]
struct PartResponse {
    text: Option<String>,
}

/// First candidate's text parts joined, or `None` if blank.
fn extract_text(response: GenerateContentResponse) -> Option<String> {
    let text: String = response
        .candidates?
        .into_iter()
        .next()?
        .content?
        .parts
        .into_iter()
        .filter_map(|p| p.text)
        .collect();
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_owned())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn advisor(server: &MockServer) -> GeminiAdvisor {
        GeminiAdvisor::new(
            &SecretString::from("test-key".to_owned()),
            "gemini-2.5-flash",
            Url::parse(&server.uri()).unwrap(),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    fn answer(text: &str) -> serde_json::Value {
        json!({ "candidates": [{ "content": { "parts": [{ "text": text }] } }] })
    }

    #[tokio::test]
    async fn returns_model_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/gemini-2.5-flash:generateContent"))
            .and(header("x-goog-api-key", "test-key"))
            .and(body_partial_json(json!({ "contents": [{ "role": "user" }] })))
            .respond_with(ResponseTemplate::new(200).set_body_json(answer("Mulch to keep moisture.")))
            .expect(1)
            .mount(&server)
            .await;

        let tip = advisor(&server).farming_tip(Language::En).await;
        assert_eq!(tip, "Mulch to keep moisture.");
    }

    #[tokio::test]
    async fn empty_answer_uses_fallback() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] })))
            .mount(&server)
            .await;

        let advisor = advisor(&server);
        assert_eq!(advisor.farming_tip(Language::En).await, TIP_EMPTY);
        assert_eq!(advisor.sms_reply("price?", Language::En).await, SMS_EMPTY);
        assert_eq!(advisor.ticket_suggestion("pests").await, SUGGESTION_EMPTY);
    }

    #[tokio::test]
    async fn http_failure_uses_error_fallback() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let advisor = advisor(&server);
        assert_eq!(advisor.farming_tip(Language::Am).await, TIP_FAILED);
        assert_eq!(advisor.sms_reply("hello", Language::En).await, SMS_FAILED);
        assert_eq!(advisor.ticket_suggestion("pests").await, SUGGESTION_FAILED);
    }

    #[tokio::test]
    async fn request_errors_do_not_carry_the_key() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = advisor(&server)
            .generate("tip".into())
            .await
            .unwrap_err()
            .to_string();
        assert!(err.contains("503"), "unexpected error: {err}");
        assert!(!err.contains("test-key"), "key leaked: {err}");
        assert!(!err.contains(&server.uri()), "url leaked: {err}");
    }

    #[test]
    fn extract_joins_parts_and_rejects_blank() {
        let parsed: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{ "content": { "parts": [{ "text": "Water " }, { "text": "early." }] } }]
        }))
        .unwrap();
        assert_eq!(extract_text(parsed).as_deref(), Some("Water early."));

        let blank: GenerateContentResponse =
            serde_json::from_value(json!({ "candidates": [{ "content": { "parts": [{ "text": "  " }] } }] }))
                .unwrap();
        assert_eq!(extract_text(blank), None);
    }

    #[test]
    fn debug_hides_the_key() {
        let advisor = GeminiAdvisor::new(
            &SecretString::from("super-secret".to_owned()),
            "m",
            Url::parse("http://localhost").unwrap(),
            Duration::from_secs(1),
        )
        .unwrap();
        assert!(!format!("{advisor:?}").contains("super-secret"));
    }
}
