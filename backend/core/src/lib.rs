pub mod error;
pub mod pipeline;
pub mod traits;
pub mod types;

pub use error::{ErrorKind, RecipeError, Service};
pub use pipeline::{StageFailure, UploadOutcome, UploadPipeline, UploadStage};
pub use traits::{RecipeExtractor, RecipeStore};
pub use types::{ImageInput, RecipeExtraction, RowId};
