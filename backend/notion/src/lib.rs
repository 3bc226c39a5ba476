//! Notion database writer: one extracted recipe becomes one page (row).

pub mod columns;
pub mod mock;
pub mod store;

pub use columns::{
    recipe_properties, COLUMN_COOK_TIME, COLUMN_INGREDIENTS, COLUMN_NAME, COLUMN_SERVINGS,
    COLUMN_STEPS,
};
pub use mock::RecordingStore;
pub use store::NotionStore;
