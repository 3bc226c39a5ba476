//! `recipesnap-config`: runtime configuration for RecipeSnap.
//!
//! Provides:
//! - Typed config read once from the process environment (fail fast)
//! - Secret wrapper that never prints its contents
//! - Config redaction for safe logging/display

pub mod defaults;
pub mod env;
pub mod redact;

pub use env::{
    AppConfig, ConfigError, GeminiConfig, LoggingConfig, NotionConfig, Secret, ServerConfig,
    GEMINI_API_KEY, NOTION_DATABASE_ID, NOTION_TOKEN,
};
pub use redact::redact;

/// Load `.env` (if present) and then read the configuration from the environment.
///
/// This is the main entry point at process start.
pub fn load() -> Result<AppConfig, ConfigError> {
    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!(path = %path.display(), "Loaded .env file"),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!(error = %e, "Ignoring unreadable .env file"),
    }
    AppConfig::from_env()
}
