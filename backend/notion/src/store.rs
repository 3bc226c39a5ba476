//! Notion pages API client (`POST /v1/pages`).

use std::time::Instant;

use async_trait::async_trait;
use recipesnap_config::NotionConfig;
use recipesnap_core::{RecipeError, RecipeExtraction, RecipeStore, RowId, Service};
use recipesnap_logging::redact_sensitive_data;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

use crate::columns::recipe_properties;

/// Writes recipes as pages of one Notion database.
pub struct NotionStore {
    client: Client,
    config: NotionConfig,
}

#[derive(Deserialize)]
struct CreatedPage {
    id: Option<String>,
}

/// Notion error body: `{"object":"error","status":400,"code":"...","message":"..."}`.
#[derive(Deserialize)]
struct NotionErrorBody {
    code: Option<String>,
    message: String,
}

impl NotionStore {
    pub fn new(config: NotionConfig) -> Result<Self, RecipeError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| RecipeError::Config(format!("failed to build Notion HTTP client: {e}")))?;
        Ok(Self { client, config })
    }

    fn pages_url(&self) -> String {
        format!("{}/v1/pages", self.config.base_url.trim_end_matches('/'))
    }
}

fn upstream_message(body: &str) -> String {
    match serde_json::from_str::<NotionErrorBody>(body) {
        Ok(NotionErrorBody { code: Some(code), message }) => format!("{code}: {message}"),
        Ok(NotionErrorBody { code: None, message }) => message,
        Err(_) if body.trim().is_empty() => "empty response body".to_string(),
        Err(_) => body.trim().to_string(),
    }
}

fn transport_error(err: reqwest::Error) -> RecipeError {
    let timed_out = err.is_timeout();
    RecipeError::transport(Service::Notion, err.without_url().to_string(), timed_out)
}

#[async_trait]
impl RecipeStore for NotionStore {
    fn name(&self) -> &str {
        "notion"
    }

    async fn save(&self, recipe: &RecipeExtraction) -> Result<RowId, RecipeError> {
        let database_id = self.config.database_id.trim();
        if database_id.is_empty() {
            return Err(RecipeError::Validation("Notion database id is not configured".into()));
        }
        if self.config.token.is_empty() {
            return Err(RecipeError::Validation("Notion token is not configured".into()));
        }

        let start = Instant::now();
        let body = json!({
            "parent": { "database_id": database_id },
            "properties": recipe_properties(recipe),
        });

        debug!(database_id = %database_id, recipe = %recipe.name, "Creating Notion page");

        let response = self
            .client
            .post(self.pages_url())
            .bearer_auth(self.config.token.expose())
            .header("Notion-Version", &self.config.version)
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        let text = response.text().await.map_err(transport_error)?;
        if !status.is_success() {
            let message = upstream_message(&text);
            warn!(status = status.as_u16(), error = %redact_sensitive_data(&message), "Notion returned an error");
            return Err(RecipeError::upstream(Service::Notion, status.as_u16(), message));
        }

        let page: CreatedPage = serde_json::from_str(&text).map_err(|e| {
            RecipeError::upstream(Service::Notion, status.as_u16(), format!("unreadable response: {e}"))
        })?;
        let id = page
            .id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| RecipeError::upstream(Service::Notion, status.as_u16(), "response has no page id"))?;

        debug!(latency_ms = start.elapsed().as_millis() as u64, page_id = %id, "Notion page created");
        Ok(RowId::new(id))
    }
}
