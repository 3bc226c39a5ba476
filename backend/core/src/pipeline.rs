//! Upload pipeline: image in, table row out.
//!
//! `Received -> Extracting -> Saving -> Done`, or `Failed` from any stage.
//! Nothing is persisted between stages; a crash mid-flow is recovered by the
//! caller uploading again.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::error::RecipeError;
use crate::traits::{RecipeExtractor, RecipeStore};
use crate::types::{ImageInput, RecipeExtraction, RowId};

/// Stage of a single upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadStage {
    Received,
    Extracting,
    Saving,
    Done,
    Failed,
}

impl fmt::Display for UploadStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            UploadStage::Received => "received",
            UploadStage::Extracting => "extracting",
            UploadStage::Saving => "saving",
            UploadStage::Done => "done",
            UploadStage::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Result of a successful upload.
#[derive(Debug, Clone)]
pub struct UploadOutcome {
    pub row_id: RowId,
    pub recipe: RecipeExtraction,
}

/// An upload that stopped at `stage`.
#[derive(Debug, Error)]
#[error("upload failed while {stage}: {error}")]
pub struct StageFailure {
    pub stage: UploadStage,
    #[source]
    pub error: RecipeError,
}

/// Drives one upload through extraction and saving.
///
/// Cheap to clone; holds no per-request state.
#[derive(Clone)]
pub struct UploadPipeline {
    extractor: Arc<dyn RecipeExtractor>,
    store: Arc<dyn RecipeStore>,
}

impl UploadPipeline {
    pub fn new(extractor: Arc<dyn RecipeExtractor>, store: Arc<dyn RecipeStore>) -> Self {
        Self { extractor, store }
    }

    /// Run one upload to completion or to its first failure.
    pub async fn process(&self, images: &[ImageInput]) -> Result<UploadOutcome, StageFailure> {
        let mut stage = UploadStage::Received;
        validate_images(images).map_err(|error| fail(stage, error))?;
        info!(
            images = images.len(),
            bytes = images.iter().map(ImageInput::len).sum::<usize>(),
            "Upload received"
        );

        stage = advance(stage, UploadStage::Extracting);
        let recipe = self
            .extractor
            .extract(images)
            .await
            .map_err(|error| fail(stage, error))?;
        info!(
            extractor = self.extractor.name(),
            recipe = %recipe.name,
            "Recipe extracted"
        );

        stage = advance(stage, UploadStage::Saving);
        let row_id = self
            .store
            .save(&recipe)
            .await
            .map_err(|error| fail(stage, error))?;

        advance(stage, UploadStage::Done);
        info!(store = self.store.name(), row_id = %row_id, "Recipe saved");

        Ok(UploadOutcome { row_id, recipe })
    }
}

fn validate_images(images: &[ImageInput]) -> Result<(), RecipeError> {
    if images.is_empty() {
        return Err(RecipeError::Validation("no image provided".into()));
    }
    if let Some(pos) = images.iter().position(ImageInput::is_empty) {
        return Err(RecipeError::Validation(format!(
            "uploaded image #{} is empty",
            pos + 1
        )));
    }
    Ok(())
}

fn advance(from: UploadStage, to: UploadStage) -> UploadStage {
    debug!(from = %from, to = %to, "Upload stage transition");
    to
}

fn fail(stage: UploadStage, error: RecipeError) -> StageFailure {
    warn!(stage = %stage, kind = ?error.kind(), error = %error, "Upload failed");
    StageFailure { stage, error }
}
