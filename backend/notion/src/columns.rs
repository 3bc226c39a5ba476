//! Mapping from recipe fields to the database's columns.
//!
//! The names must match the database schema exactly. Notion rejects writes
//! to unknown property names, so a renamed column fails loudly upstream.

use recipesnap_core::RecipeExtraction;
use serde_json::{json, Map, Value};

pub const COLUMN_NAME: &str = "Name";
pub const COLUMN_INGREDIENTS: &str = "Ingredients";
pub const COLUMN_STEPS: &str = "Steps";
pub const COLUMN_COOK_TIME: &str = "Cook Time";
pub const COLUMN_SERVINGS: &str = "Servings";

/// Notion caps `text.content` at 2000 characters per rich-text object.
pub const MAX_TEXT_CHARS: usize = 2000;

/// Page `properties` for one recipe: `Name` is the title column, the rest
/// are rich text. Missing optional fields are written empty.
pub fn recipe_properties(recipe: &RecipeExtraction) -> Value {
    let mut properties = Map::new();
    properties.insert(COLUMN_NAME.into(), json!({ "title": text_objects(&recipe.name) }));
    properties.insert(COLUMN_INGREDIENTS.into(), rich_text(&recipe.ingredients));
    properties.insert(COLUMN_STEPS.into(), rich_text(&recipe.steps));
    properties.insert(
        COLUMN_COOK_TIME.into(),
        rich_text(recipe.cook_time.as_deref().unwrap_or_default()),
    );
    properties.insert(
        COLUMN_SERVINGS.into(),
        rich_text(recipe.servings.as_deref().unwrap_or_default()),
    );
    Value::Object(properties)
}

fn rich_text(content: &str) -> Value {
    json!({ "rich_text": text_objects(content) })
}

fn text_objects(content: &str) -> Vec<Value> {
    chunk_chars(content, MAX_TEXT_CHARS)
        .into_iter()
        .map(|chunk| json!({ "type": "text", "text": { "content": chunk } }))
        .collect()
}

/// Split on char boundaries into pieces of at most `max` chars.
fn chunk_chars(content: &str, max: usize) -> Vec<&str> {
    let mut chunks = Vec::new();
    let mut rest = content;
    while !rest.is_empty() {
        let end = rest
            .char_indices()
            .nth(max)
            .map_or(rest.len(), |(idx, _)| idx);
        let (head, tail) = rest.split_at(end);
        chunks.push(head);
        rest = tail;
    }
    chunks
}
