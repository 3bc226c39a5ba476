use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use recipesnap_core::{RecipeError, RecipeExtraction, RecipeStore, RowId};

type ErrorFactory = Arc<dyn Fn() -> RecipeError + Send + Sync>;

/// A store that keeps saved recipes in memory.
///
/// Row ids are `row-1`, `row-2`, ... unless a failure is configured.
#[derive(Default)]
pub struct RecordingStore {
    rows: Mutex<Vec<RecipeExtraction>>,
    failure: Option<ErrorFactory>,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_with<F>(make: F) -> Self
    where
        F: Fn() -> RecipeError + Send + Sync + 'static,
    {
        Self {
            rows: Mutex::new(Vec::new()),
            failure: Some(Arc::new(make)),
        }
    }

    /// Everything saved so far, in order.
    pub fn saved(&self) -> Vec<RecipeExtraction> {
        self.rows.lock().map(|rows| rows.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl RecipeStore for RecordingStore {
    fn name(&self) -> &str {
        "recording"
    }

    async fn save(&self, recipe: &RecipeExtraction) -> Result<RowId, RecipeError> {
        if let Some(make) = &self.failure {
            return Err(make());
        }
        let mut rows = self
            .rows
            .lock()
            .map_err(|_| RecipeError::Validation("recording store poisoned".into()))?;
        rows.push(recipe.clone());
        Ok(RowId::new(format!("row-{}", rows.len())))
    }
}
