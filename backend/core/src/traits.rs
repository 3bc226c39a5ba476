use async_trait::async_trait;

use crate::error::RecipeError;
use crate::types::{ImageInput, RecipeExtraction, RowId};

/// Turns recipe images into structured fields using a vision model.
#[async_trait]
pub trait RecipeExtractor: Send + Sync {
    /// Provider name (e.g., "gemini", "mock").
    fn name(&self) -> &str;

    /// Extract one recipe from one or more images of it.
    ///
    /// A single attempt is made; failures are returned as-is.
    async fn extract(&self, images: &[ImageInput]) -> Result<RecipeExtraction, RecipeError>;
}

/// Persists an extracted recipe as a new row of the remote table.
#[async_trait]
pub trait RecipeStore: Send + Sync {
    /// Store name (e.g., "notion", "recording").
    fn name(&self) -> &str;

    /// Create one row and return its identifier. Never deduplicates.
    async fn save(&self, recipe: &RecipeExtraction) -> Result<RowId, RecipeError>;
}
