use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use recipesnap_core::{ImageInput, RecipeError, RecipeExtraction, RecipeExtractor};

use crate::parse::parse_recipe_text;

type ErrorFactory = Arc<dyn Fn() -> RecipeError + Send + Sync>;

enum Reply {
    Recipe(RecipeExtraction),
    ModelText(String),
    Error(ErrorFactory),
}

/// An extractor that returns canned results and counts its calls.
pub struct MockExtractor {
    reply: Reply,
    calls: AtomicUsize,
}

impl MockExtractor {
    pub fn with_recipe(recipe: RecipeExtraction) -> Self {
        Self::new(Reply::Recipe(recipe))
    }

    /// Reply as if the model had returned `text`; it goes through the real parser.
    pub fn with_model_text(text: impl Into<String>) -> Self {
        Self::new(Reply::ModelText(text.into()))
    }

    pub fn with_error<F>(make: F) -> Self
    where
        F: Fn() -> RecipeError + Send + Sync + 'static,
    {
        Self::new(Reply::Error(Arc::new(make)))
    }

    fn new(reply: Reply) -> Self {
        Self {
            reply,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RecipeExtractor for MockExtractor {
    fn name(&self) -> &str {
        "mock"
    }

    async fn extract(&self, _images: &[ImageInput]) -> Result<RecipeExtraction, RecipeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.reply {
            Reply::Recipe(recipe) => Ok(recipe.clone()),
            Reply::ModelText(text) => parse_recipe_text(text),
            Reply::Error(make) => Err(make()),
        }
    }
}
