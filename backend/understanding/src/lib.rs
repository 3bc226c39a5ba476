//! Recipe understanding: read a recipe off screenshots with a vision model.

pub mod gemini;
pub mod mock;
pub mod parse;
pub mod prompt;

pub use gemini::GeminiExtractor;
pub use mock::MockExtractor;
pub use parse::parse_recipe_text;
pub use prompt::RECIPE_EXTRACT_PROMPT;
