//! `POST /extract`: screenshot in, Notion row out.

use axum::body::Bytes;
use axum::extract::{FromRequest, Multipart, Request, State};
use axum::http::header::CONTENT_TYPE;
use axum::Json;
use recipesnap_core::{ImageInput, RecipeExtraction};
use recipesnap_logging::{EventLogger, UploadEvent};
use recipesnap_media::image_from_upload;
use serde::Serialize;
use tracing::{debug, info_span, Instrument};
use uuid::Uuid;

use crate::error::ApiError;
use crate::server::GatewayState;

/// Multipart fields that carry images. Other fields are ignored.
const IMAGE_FIELDS: [&str; 2] = ["images", "image"];

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractResponse {
    pub status: &'static str,
    pub row_id: String,
    pub recipe: RecipeExtraction,
}

/// Handler for `POST /extract` and `POST /api/recipes/extract`
pub async fn extract_recipe(
    State(state): State<GatewayState>,
    request: Request,
) -> Result<Json<ExtractResponse>, ApiError> {
    let request_id = Uuid::new_v4().to_string();
    let span = info_span!("upload", request_id = %request_id);

    async move {
        let images = match read_images(request, &state).await {
            Ok(images) => images,
            Err(err) => {
                EventLogger::log_event(
                    &request_id,
                    UploadEvent::Failed {
                        stage: err.body.stage,
                        kind: err.body.kind,
                        message: err.body.message.clone(),
                    },
                );
                return Err(err);
            }
        };

        match state.pipeline.process(&images).await {
            Ok(outcome) => {
                EventLogger::log_event(
                    &request_id,
                    UploadEvent::Completed {
                        row_id: outcome.row_id.to_string(),
                        recipe_name: outcome.recipe.name.clone(),
                        images: images.len(),
                    },
                );
                Ok(Json(ExtractResponse {
                    status: "ok",
                    row_id: outcome.row_id.0,
                    recipe: outcome.recipe,
                }))
            }
            Err(failure) => {
                EventLogger::log_event(
                    &request_id,
                    UploadEvent::Failed {
                        stage: failure.stage,
                        kind: failure.error.kind(),
                        message: failure.error.to_string(),
                    },
                );
                Err(ApiError::from(failure))
            }
        }
    }
    .instrument(span)
    .await
}

async fn read_images(request: Request, state: &GatewayState) -> Result<Vec<ImageInput>, ApiError> {
    let content_type = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.split(';').next().unwrap_or_default().trim().to_ascii_lowercase())
        .unwrap_or_default();

    if content_type == "multipart/form-data" {
        let multipart = Multipart::from_request(request, state)
            .await
            .map_err(|r| ApiError::rejected(r.status(), r.body_text()))?;
        return read_multipart(multipart).await;
    }

    if content_type.starts_with("image/") || content_type == "application/octet-stream" {
        let body = Bytes::from_request(request, state)
            .await
            .map_err(|r| ApiError::rejected(r.status(), r.body_text()))?;
        if body.is_empty() {
            return Ok(Vec::new());
        }
        return Ok(vec![image_from_upload(body, Some(&content_type), None)]);
    }

    debug!(content_type = %content_type, "Request carries no image");
    Ok(Vec::new())
}

async fn read_multipart(mut multipart: Multipart) -> Result<Vec<ImageInput>, ApiError> {
    let mut images = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::rejected(e.status(), e.body_text()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        if !IMAGE_FIELDS.contains(&name.as_str()) {
            debug!(field = %name, "Ignoring form field");
            continue;
        }
        let declared = field.content_type().map(str::to_string);
        let file_name = field.file_name().map(str::to_string);
        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::rejected(e.status(), e.body_text()))?;

        // Browsers send an empty, unnamed part when no file was picked.
        if data.is_empty() && file_name.as_deref().map_or(true, str::is_empty) {
            continue;
        }
        images.push(image_from_upload(data, declared.as_deref(), file_name.as_deref()));
    }
    Ok(images)
}

