//! Error responses of the upload endpoint.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use recipesnap_core::{ErrorKind, RecipeError, StageFailure, UploadStage};
use serde::Serialize;

/// `{"status":"error","kind":"...","stage":"...","message":"..."}`
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub status: &'static str,
    pub kind: ErrorKind,
    pub stage: UploadStage,
    pub message: String,
}

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorBody,
}

impl ApiError {
    /// A request rejected while reading its body, before the pipeline ran.
    pub fn rejected(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            body: ErrorBody {
                status: "error",
                kind: ErrorKind::ValidationError,
                stage: UploadStage::Received,
                message: message.into(),
            },
        }
    }
}

/// HTTP status for each error category.
pub fn status_for(error: &RecipeError) -> StatusCode {
    match error {
        RecipeError::Validation(_) => StatusCode::BAD_REQUEST,
        RecipeError::Extraction(_) => StatusCode::UNPROCESSABLE_ENTITY,
        RecipeError::Upstream { .. } => StatusCode::BAD_GATEWAY,
        RecipeError::Transport { timed_out: true, .. } => StatusCode::GATEWAY_TIMEOUT,
        RecipeError::Transport { .. } => StatusCode::BAD_GATEWAY,
        RecipeError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<StageFailure> for ApiError {
    fn from(failure: StageFailure) -> Self {
        Self {
            status: status_for(&failure.error),
            body: ErrorBody {
                status: "error",
                kind: failure.error.kind(),
                stage: failure.stage,
                message: failure.error.user_message(),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use recipesnap_core::Service;

    #[test]
    fn maps_error_kinds_to_status_codes() {
        let cases = [
            (RecipeError::Validation("no image provided".into()), 400),
            (RecipeError::Extraction("missing required field: name".into()), 422),
            (RecipeError::upstream(Service::Notion, 400, "validation_error"), 502),
            (RecipeError::transport(Service::Gemini, "timed out", true), 504),
            (RecipeError::transport(Service::Gemini, "connection refused", false), 502),
            (RecipeError::Config("GEMINI_API_KEY".into()), 500),
        ];
        for (error, expected) in cases {
            assert_eq!(status_for(&error).as_u16(), expected, "{error}");
        }
    }

    #[test]
    fn stage_failure_keeps_stage_and_kind() {
        let err = ApiError::from(StageFailure {
            stage: UploadStage::Extracting,
            error: RecipeError::Extraction("missing required field: ingredients".into()),
        });
        let body = serde_json::to_value(&err.body).unwrap();
        assert_eq!(body["status"], "error");
        assert_eq!(body["kind"], "ExtractionError");
        assert_eq!(body["stage"], "extracting");
        assert!(body["message"].as_str().unwrap().contains("clearer screenshot"));
    }
}
