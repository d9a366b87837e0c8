//! Gemini text generation for the editor.
//!
//! [`TextGenerator::generate`] never fails: every problem is reported to the
//! caller as a fixed message string that the editor shows in place of the
//! generated copy.

use serde::Deserialize;
use serde_json::json;

use crate::config::GeminiConfig;

/// House style applied to every prompt.
pub const SYSTEM_INSTRUCTION: &str = "You are a sophisticated writer for a luxury newsletter. Write in an elegant, intellectual, and slightly formal tone. Your audience appreciates nuance, history, and craftsmanship. Avoid slang, clichés, and overly casual language.";

pub const MISSING_KEY_MESSAGE: &str = "Error: API key not configured.";
pub const FAILURE_MESSAGE: &str = "Error: Could not generate text.";
pub const EMPTY_RESPONSE_MESSAGE: &str = "Error: Gemini did not return any text.";

#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("provider request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("provider request failed ({status}): {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("provider response parse failed: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Client for the `generateContent` REST endpoint.
pub struct TextGenerator {
    client: reqwest::Client,
    config: GeminiConfig,
}

impl TextGenerator {
    pub fn new(config: GeminiConfig) -> Self {
        TextGenerator {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// `true` if an API key is configured.
    pub fn is_configured(&self) -> bool {
        self.api_key().is_some()
    }

    fn api_key(&self) -> Option<&str> {
        self.config
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
    }

    /// Generates copy for `prompt`, or one of the fixed error messages.
    pub async fn generate(&self, prompt: &str) -> String {
        let Some(api_key) = self.api_key() else {
            tracing::warn!("GEMINI_API_KEY not set; text generation disabled");
            return MISSING_KEY_MESSAGE.to_string();
        };

        match self.request(api_key, prompt).await {
            Ok(Some(text)) => text,
            Ok(None) => EMPTY_RESPONSE_MESSAGE.to_string(),
            Err(err) => {
                tracing::error!(error = %err, model = %self.config.model, "text generation failed");
                FAILURE_MESSAGE.to_string()
            }
        }
    }

    async fn request(&self, api_key: &str, prompt: &str) -> Result<Option<String>, GenerationError> {
        let endpoint = format!(
            "{}/models/{}:generateContent",
            self.config.api_base_url.trim_end_matches('/'),
            self.config.model
        );

        let body = json!({
            "systemInstruction": {
                "parts": [{ "text": SYSTEM_INSTRUCTION }]
            },
            "contents": [{
                "role": "user",
                "parts": [{ "text": prompt }]
            }]
        });

        let response = self
            .client
            .post(endpoint)
            .header("x-goog-api-key", api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let body_text = response.text().await?;

        if !status.is_success() {
            return Err(GenerationError::Status {
                status,
                body: body_text,
            });
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&body_text)?;
        Ok(extract_text(&parsed))
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

/// Concatenates the text parts of the first candidate.
pub fn extract_text(response: &GenerateContentResponse) -> Option<String> {
    let content = response.candidates.first()?.content.as_ref()?;
    let mut texts = content.parts.iter().filter_map(|p| p.text.as_deref()).peekable();
    texts.peek()?;
    Some(texts.collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use axum::{Json, Router};

    fn parse(body: serde_json::Value) -> GenerateContentResponse {
        serde_json::from_value(body).unwrap()
    }

    fn config(api_key: Option<&str>, base_url: &str) -> GeminiConfig {
        GeminiConfig {
            api_key: api_key.map(str::to_string),
            model: "gemini-2.5-flash".to_string(),
            api_base_url: base_url.to_string(),
        }
    }

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[test]
    fn extracts_first_candidate_text() {
        let response = parse(json!({
            "candidates": [
                { "content": { "parts": [{ "text": "<p>Elegance " }, { "text": "endures.</p>" }] } },
                { "content": { "parts": [{ "text": "ignored" }] } }
            ]
        }));
        assert_eq!(
            extract_text(&response).as_deref(),
            Some("<p>Elegance endures.</p>")
        );
    }

    #[test]
    fn no_candidates_means_no_text() {
        assert_eq!(extract_text(&parse(json!({}))), None);
        assert_eq!(extract_text(&parse(json!({ "candidates": [] }))), None);
        assert_eq!(
            extract_text(&parse(json!({ "candidates": [{ "finishReason": "SAFETY" }] }))),
            None
        );
    }

    #[tokio::test]
    async fn missing_key_reports_configuration_error() {
        let generator = TextGenerator::new(config(None, "http://127.0.0.1:1"));
        assert!(!generator.is_configured());
        assert_eq!(generator.generate("prompt").await, MISSING_KEY_MESSAGE);

        let blank = TextGenerator::new(config(Some("  "), "http://127.0.0.1:1"));
        assert_eq!(blank.generate("prompt").await, MISSING_KEY_MESSAGE);
    }

    #[tokio::test]
    async fn unreachable_provider_reports_failure() {
        let generator = TextGenerator::new(config(Some("key"), "http://127.0.0.1:1"));
        assert_eq!(generator.generate("prompt").await, FAILURE_MESSAGE);
    }

    #[tokio::test]
    async fn sends_prompt_and_key_and_returns_text() {
        let router = Router::new().route(
            "/models/{action}",
            post(
                |headers: HeaderMap, Json(body): Json<serde_json::Value>| async move {
                    assert_eq!(headers["x-goog-api-key"], "test-key");
                    assert_eq!(
                        body["systemInstruction"]["parts"][0]["text"],
                        SYSTEM_INSTRUCTION
                    );
                    let prompt = body["contents"][0]["parts"][0]["text"]
                        .as_str()
                        .unwrap_or_default()
                        .to_string();
                    Json(json!({
                        "candidates": [{ "content": { "parts": [{ "text": format!("On {}", prompt) }] } }]
                    }))
                },
            ),
        );
        let base = serve(router).await;
        let generator = TextGenerator::new(config(Some("test-key"), &base));
        assert_eq!(generator.generate("heirloom watches").await, "On heirloom watches");
    }

    #[tokio::test]
    async fn empty_candidates_and_error_status_map_to_messages() {
        let empty = serve(Router::new().route(
            "/models/{action}",
            post(|| async { Json(json!({ "candidates": [] })) }),
        ))
        .await;
        let generator = TextGenerator::new(config(Some("key"), &empty));
        assert_eq!(generator.generate("x").await, EMPTY_RESPONSE_MESSAGE);

        let failing = serve(Router::new().route(
            "/models/{action}",
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "overloaded") }),
        ))
        .await;
        let generator = TextGenerator::new(config(Some("key"), &failing));
        assert_eq!(generator.generate("x").await, FAILURE_MESSAGE);
    }
}
