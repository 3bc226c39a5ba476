//! Environment-backed configuration.
//!
//! Three secrets are required; everything else has a default. Missing or
//! blank required variables are all reported in one error so an operator
//! can fix them in a single pass.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use recipesnap_core::RecipeError;
use serde_json::{json, Value};
use thiserror::Error;

use crate::defaults::*;
use crate::redact::redact;

pub const GEMINI_API_KEY: &str = "GEMINI_API_KEY";
pub const NOTION_TOKEN: &str = "NOTION_TOKEN";
pub const NOTION_DATABASE_ID: &str = "NOTION_DATABASE_ID";

/// Error returned when the environment does not describe a runnable service.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable(s): {}", .0.join(", "))]
    Missing(Vec<String>),

    #[error("invalid value for {var}: {message}")]
    Invalid { var: String, message: String },
}

impl From<ConfigError> for RecipeError {
    fn from(err: ConfigError) -> Self {
        RecipeError::Config(err.to_string())
    }
}

/// A secret string. `Debug` and `Display` never show the value.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(***)")
    }
}

impl fmt::Display for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("***")
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_address: String,
    pub port: u16,
    pub static_dir: PathBuf,
    pub max_upload_bytes: usize,
}

impl ServerConfig {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: Secret,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key),
            model: DEFAULT_GEMINI_MODEL.to_string(),
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_AI_TIMEOUT_SECS),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

#[derive(Debug, Clone)]
pub struct NotionConfig {
    pub token: Secret,
    pub database_id: String,
    pub base_url: String,
    pub version: String,
    pub timeout: Duration,
}

impl NotionConfig {
    pub fn new(token: impl Into<String>, database_id: impl Into<String>) -> Self {
        Self {
            token: Secret::new(token),
            database_id: database_id.into(),
            base_url: DEFAULT_NOTION_BASE_URL.to_string(),
            version: DEFAULT_NOTION_VERSION.to_string(),
            timeout: Duration::from_secs(DEFAULT_DB_TIMEOUT_SECS),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: String,
    /// When set, a daily-rotated JSON log is written here as well.
    pub log_dir: Option<PathBuf>,
}

/// Immutable RecipeSnap configuration, built once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub gemini: GeminiConfig,
    pub notion: NotionConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration through `lookup` (useful for testing).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let mut missing = Vec::new();
        let mut required = |key: &str| match get(key) {
            Some(v) => v.trim().to_string(),
            None => {
                missing.push(key.to_string());
                String::new()
            }
        };
        let api_key = required(GEMINI_API_KEY);
        let token = required(NOTION_TOKEN);
        let database_id = required(NOTION_DATABASE_ID);
        if !missing.is_empty() {
            return Err(ConfigError::Missing(missing));
        }

        let server = ServerConfig {
            bind_address: get("RECIPESNAP_BIND").unwrap_or_else(|| DEFAULT_BIND_ADDRESS.into()),
            port: parse_or(get("PORT"), "PORT", DEFAULT_PORT)?,
            static_dir: get("RECIPESNAP_STATIC_DIR")
                .unwrap_or_else(|| DEFAULT_STATIC_DIR.into())
                .into(),
            max_upload_bytes: parse_or(
                get("RECIPESNAP_MAX_UPLOAD_BYTES"),
                "RECIPESNAP_MAX_UPLOAD_BYTES",
                DEFAULT_MAX_UPLOAD_BYTES,
            )?,
        };

        let gemini = GeminiConfig {
            api_key: Secret::new(api_key),
            model: get("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.into()),
            base_url: get("GEMINI_BASE_URL").unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.into()),
            timeout: timeout_or(
                get("RECIPESNAP_AI_TIMEOUT_SECS"),
                "RECIPESNAP_AI_TIMEOUT_SECS",
                DEFAULT_AI_TIMEOUT_SECS,
            )?,
        };

        let notion = NotionConfig {
            token: Secret::new(token),
            database_id,
            base_url: get("NOTION_BASE_URL").unwrap_or_else(|| DEFAULT_NOTION_BASE_URL.into()),
            version: get("NOTION_VERSION").unwrap_or_else(|| DEFAULT_NOTION_VERSION.into()),
            timeout: timeout_or(
                get("RECIPESNAP_DB_TIMEOUT_SECS"),
                "RECIPESNAP_DB_TIMEOUT_SECS",
                DEFAULT_DB_TIMEOUT_SECS,
            )?,
        };

        let logging = LoggingConfig {
            level: get("RECIPESNAP_LOG_LEVEL").unwrap_or_else(|| DEFAULT_LOG_LEVEL.into()),
            log_dir: get("RECIPESNAP_LOG_DIR").map(PathBuf::from),
        };

        Ok(Self {
            server,
            gemini,
            notion,
            logging,
        })
    }

    /// A snapshot of the configuration that is safe to log or print.
    pub fn redacted(&self) -> Value {
        redact(&json!({
            "server": {
                "bind": self.server.bind_address,
                "port": self.server.port,
                "staticDir": self.server.static_dir.display().to_string(),
                "maxUploadBytes": self.server.max_upload_bytes,
            },
            "gemini": {
                "apiKey": self.gemini.api_key.expose(),
                "model": self.gemini.model,
                "baseUrl": self.gemini.base_url,
                "timeoutSecs": self.gemini.timeout.as_secs(),
            },
            "notion": {
                "token": self.notion.token.expose(),
                "databaseId": self.notion.database_id,
                "baseUrl": self.notion.base_url,
                "version": self.notion.version,
                "timeoutSecs": self.notion.timeout.as_secs(),
            },
            "logging": {
                "level": self.logging.level,
                "logDir": self.logging.log_dir.as_ref().map(|p| p.display().to_string()),
            },
        }))
    }
}

fn parse_or<T>(raw: Option<String>, var: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match raw {
        None => Ok(default),
        Some(v) => v.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            var: var.to_string(),
            message: format!("{v:?}: {e}"),
        }),
    }
}

fn timeout_or(raw: Option<String>, var: &str, default_secs: u64) -> Result<Duration, ConfigError> {
    let secs: u64 = parse_or(raw, var, default_secs)?;
    if secs == 0 {
        return Err(ConfigError::Invalid {
            var: var.to_string(),
            message: "timeout must be at least one second".into(),
        });
    }
    Ok(Duration::from_secs(secs))
}
