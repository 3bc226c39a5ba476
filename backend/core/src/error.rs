use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// External service a request was addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Service {
    Gemini,
    Notion,
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Service::Gemini => f.write_str("Gemini"),
            Service::Notion => f.write_str("Notion"),
        }
    }
}

/// Top-level error type for RecipeSnap.
#[derive(Debug, Error)]
pub enum RecipeError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("{service} request failed: {message}")]
    Transport {
        service: Service,
        message: String,
        timed_out: bool,
    },

    #[error("{service} returned {status}: {message}")]
    Upstream {
        service: Service,
        status: u16,
        message: String,
    },

    #[error("could not extract recipe: {0}")]
    Extraction(String),

    #[error("invalid request: {0}")]
    Validation(String),
}

/// Wire name of an error category, as reported to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    ConfigError,
    TransportError,
    UpstreamError,
    ExtractionError,
    ValidationError,
}

impl RecipeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RecipeError::Config(_) => ErrorKind::ConfigError,
            RecipeError::Transport { .. } => ErrorKind::TransportError,
            RecipeError::Upstream { .. } => ErrorKind::UpstreamError,
            RecipeError::Extraction(_) => ErrorKind::ExtractionError,
            RecipeError::Validation(_) => ErrorKind::ValidationError,
        }
    }

    pub fn transport(service: Service, message: impl Into<String>, timed_out: bool) -> Self {
        RecipeError::Transport {
            service,
            message: message.into(),
            timed_out,
        }
    }

    pub fn upstream(service: Service, status: u16, message: impl Into<String>) -> Self {
        RecipeError::Upstream {
            service,
            status,
            message: message.into(),
        }
    }

    /// Message shown to the caller of the upload endpoint.
    pub fn user_message(&self) -> String {
        match self {
            RecipeError::Extraction(_) => {
                format!("{self}. Try a clearer screenshot.")
            }
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_serialize_as_wire_names() {
        let kind = RecipeError::Extraction("no JSON".into()).kind();
        assert_eq!(serde_json::to_value(kind).unwrap(), "ExtractionError");
        let kind = RecipeError::upstream(Service::Notion, 400, "bad column").kind();
        assert_eq!(serde_json::to_value(kind).unwrap(), "UpstreamError");
    }

    #[test]
    fn upstream_message_carries_status_and_detail() {
        let err = RecipeError::upstream(Service::Notion, 401, "unauthorized: API token is invalid.");
        let msg = err.to_string();
        assert!(msg.contains("Notion"));
        assert!(msg.contains("401"));
        assert!(msg.contains("API token is invalid"));
    }

    #[test]
    fn extraction_message_suggests_clearer_image() {
        let err = RecipeError::Extraction("missing required field: ingredients".into());
        assert!(err.user_message().contains("clearer screenshot"));
        assert!(err.user_message().contains("ingredients"));
    }
}
