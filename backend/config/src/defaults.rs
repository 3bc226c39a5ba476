//! Default values for optional settings.

pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0";

pub const DEFAULT_PORT: u16 = 5000;

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

pub const DEFAULT_NOTION_BASE_URL: &str = "https://api.notion.com";

/// Notion API version sent in the `Notion-Version` header.
pub const DEFAULT_NOTION_VERSION: &str = "2022-06-28";

/// Vision calls on several screenshots can take a while.
pub const DEFAULT_AI_TIMEOUT_SECS: u64 = 60;

pub const DEFAULT_DB_TIMEOUT_SECS: u64 = 20;

/// 20 MiB, the inline-data ceiling of the Gemini API.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

pub const DEFAULT_STATIC_DIR: &str = "static";

pub const DEFAULT_LOG_LEVEL: &str = "info";
