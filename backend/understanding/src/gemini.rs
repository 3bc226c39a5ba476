//! Recipe extraction via Google Gemini `generateContent`.

use std::time::Instant;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use recipesnap_config::GeminiConfig;
use recipesnap_core::{ImageInput, RecipeError, RecipeExtraction, RecipeExtractor, Service};
use recipesnap_logging::redact_sensitive_data;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::parse::parse_recipe_text;
use crate::prompt::RECIPE_EXTRACT_PROMPT;

/// Gemini vision extractor. One request per call, no retries.
pub struct GeminiExtractor {
    client: Client,
    config: GeminiConfig,
}

impl GeminiExtractor {
    pub fn new(config: GeminiConfig) -> Result<Self, RecipeError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| RecipeError::Config(format!("failed to build Gemini HTTP client: {e}")))?;
        Ok(Self { client, config })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Part<'a> {
    Text {
        text: &'a str,
    },
    #[serde(rename_all = "camelCase")]
    InlineData {
        inline_data: Blob<'a>,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Blob<'a> {
    mime_type: &'a str,
    data: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    response_mime_type: &'static str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
    status: Option<String>,
}

fn build_request<'a>(images: &'a [ImageInput]) -> GenerateRequest<'a> {
    let mut parts = Vec::with_capacity(images.len() + 1);
    parts.push(Part::Text {
        text: RECIPE_EXTRACT_PROMPT,
    });
    parts.extend(images.iter().map(|image| Part::InlineData {
        inline_data: Blob {
            mime_type: &image.mime_type,
            data: STANDARD.encode(&image.data),
        },
    }));
    GenerateRequest {
        contents: vec![Content { role: "user", parts }],
        generation_config: GenerationConfig {
            temperature: 0.1,
            response_mime_type: "application/json",
        },
    }
}

/// Gemini's `{"error": {...}}` detail, or the raw body.
fn upstream_message(body: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(ErrorEnvelope { error }) => match error.status {
            Some(status) => format!("{status}: {}", error.message),
            None => error.message,
        },
        Err(_) if body.trim().is_empty() => "empty response body".to_string(),
        Err(_) => body.trim().to_string(),
    }
}

fn response_text(response: GenerateResponse) -> Result<String, RecipeError> {
    let text: String = response
        .candidates
        .iter()
        .filter_map(|c| c.content.as_ref())
        .flat_map(|c| c.parts.iter())
        .filter_map(|p| p.text.as_deref())
        .collect::<Vec<_>>()
        .join("");
    if !text.trim().is_empty() {
        return Ok(text);
    }

    if let Some(reason) = response.prompt_feedback.and_then(|f| f.block_reason) {
        return Err(RecipeError::Extraction(format!("model blocked the request ({reason})")));
    }
    let finish = response
        .candidates
        .first()
        .and_then(|c| c.finish_reason.clone())
        .unwrap_or_else(|| "no candidates".to_string());
    Err(RecipeError::Extraction(format!("model returned no text ({finish})")))
}

fn transport_error(err: reqwest::Error) -> RecipeError {
    let timed_out = err.is_timeout();
    RecipeError::transport(Service::Gemini, err.without_url().to_string(), timed_out)
}

#[async_trait]
impl RecipeExtractor for GeminiExtractor {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn extract(&self, images: &[ImageInput]) -> Result<RecipeExtraction, RecipeError> {
        let start = Instant::now();
        let body = build_request(images);

        debug!(model = %self.config.model, images = images.len(), "Sending request to Gemini");

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", self.config.api_key.expose())
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        let text = response.text().await.map_err(transport_error)?;
        if !status.is_success() {
            let message = upstream_message(&text);
            warn!(status = status.as_u16(), error = %redact_sensitive_data(&message), "Gemini returned an error");
            return Err(RecipeError::upstream(Service::Gemini, status.as_u16(), message));
        }

        let parsed: GenerateResponse = serde_json::from_str(&text).map_err(|e| {
            RecipeError::Extraction(format!("unreadable Gemini response: {e}"))
        })?;
        let content = response_text(parsed)?;

        debug!(
            latency_ms = start.elapsed().as_millis() as u64,
            chars = content.len(),
            "Gemini response received"
        );

        parse_recipe_text(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const PATH: &str = "/v1beta/models/gemini-2.0-flash:generateContent";

    fn extractor(server: &MockServer) -> GeminiExtractor {
        GeminiExtractor::new(GeminiConfig::new("test-key").with_base_url(server.uri())).unwrap()
    }

    fn image() -> ImageInput {
        ImageInput::new(vec![0xFFu8, 0xD8, 0xFF, 0xE0], "image/jpeg")
    }

    fn model_reply(text: &str) -> serde_json::Value {
        json!({
            "candidates": [{
                "content": { "role": "model", "parts": [{ "text": text }] },
                "finishReason": "STOP"
            }]
        })
    }

    #[tokio::test]
    async fn sends_prompt_and_inline_image() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(PATH))
            .and(header("x-goog-api-key", "test-key"))
            .and(body_partial_json(json!({
                "generationConfig": { "responseMimeType": "application/json" }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(model_reply(
                r#"{"name":"Pancakes","ingredients":["flour","milk","eggs"],"steps":["mix","cook"],"cookTime":"20 min","servings":"4"}"#,
            )))
            .expect(1)
            .mount(&server)
            .await;

        let recipe = extractor(&server).extract(&[image()]).await.unwrap();
        assert_eq!(recipe.name, "Pancakes");
        assert_eq!(recipe.ingredients, "flour\nmilk\neggs");
        assert_eq!(recipe.cook_time.as_deref(), Some("20 min"));

        let requests = server.received_requests().await.unwrap();
        let body: serde_json::Value = requests[0].body_json().unwrap();
        let parts = body["contents"][0]["parts"].as_array().unwrap();
        assert_eq!(parts.len(), 2);
        assert!(parts[0]["text"].as_str().unwrap().contains("ingredients"));
        assert_eq!(parts[1]["inlineData"]["mimeType"], "image/jpeg");
        assert_eq!(parts[1]["inlineData"]["data"], STANDARD.encode([0xFFu8, 0xD8, 0xFF, 0xE0]));
    }

    #[tokio::test]
    async fn non_success_is_upstream_error_with_detail() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": { "code": 400, "message": "API key not valid.", "status": "INVALID_ARGUMENT" }
            })))
            .mount(&server)
            .await;

        let err = extractor(&server).extract(&[image()]).await.unwrap_err();
        match err {
            RecipeError::Upstream { service, status, message } => {
                assert_eq!(service, Service::Gemini);
                assert_eq!(status, 400);
                assert_eq!(message, "INVALID_ARGUMENT: API key not valid.");
            }
            other => panic!("expected upstream error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn reply_without_ingredients_is_extraction_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(model_reply(
                r#"{"name":"Pancakes","steps":["mix"],"cookTime":null,"servings":null}"#,
            )))
            .mount(&server)
            .await;

        let err = extractor(&server).extract(&[image()]).await.unwrap_err();
        assert!(matches!(err, RecipeError::Extraction(ref m) if m.contains("ingredients")));
    }

    #[tokio::test]
    async fn blocked_prompt_is_extraction_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "promptFeedback": { "blockReason": "SAFETY" }
            })))
            .mount(&server)
            .await;

        let err = extractor(&server).extract(&[image()]).await.unwrap_err();
        assert!(err.to_string().contains("SAFETY"));
    }

    #[tokio::test]
    async fn slow_upstream_times_out_as_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(model_reply("{}"))
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&server)
            .await;

        let mut config = GeminiConfig::new("test-key").with_base_url(server.uri());
        config.timeout = Duration::from_millis(200);
        let err = GeminiExtractor::new(config)
            .unwrap()
            .extract(&[image()])
            .await
            .unwrap_err();
        assert!(matches!(err, RecipeError::Transport { timed_out: true, .. }));
    }

    #[tokio::test]
    async fn unreachable_host_is_transport_error() {
        // Port 9 (discard) is closed on test machines.
        let config = GeminiConfig::new("test-key").with_base_url("http://127.0.0.1:9");
        let err = GeminiExtractor::new(config)
            .unwrap()
            .extract(&[image()])
            .await
            .unwrap_err();
        assert_eq!(err.kind(), recipesnap_core::ErrorKind::TransportError);
    }

    #[test]
    fn upstream_message_falls_back_to_body() {
        assert_eq!(upstream_message("Service Unavailable"), "Service Unavailable");
        assert_eq!(upstream_message(""), "empty response body");
    }
}
