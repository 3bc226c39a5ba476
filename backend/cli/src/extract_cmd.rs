//! `recipesnap extract <files...>`

use std::path::PathBuf;

use anyhow::{Context, Result};
use recipesnap_config::AppConfig;
use recipesnap_core::RecipeExtractor;
use recipesnap_media::load_image;
use recipesnap_understanding::GeminiExtractor;

use crate::terminal_output::{note_error, note_success, render_recipe};

pub async fn run(config: &AppConfig, files: &[PathBuf], dry_run: bool) -> Result<()> {
    let mut images = Vec::with_capacity(files.len());
    for path in files {
        let image = load_image(path)
            .await
            .with_context(|| format!("cannot read {}", path.display()))?;
        images.push(image);
    }

    if dry_run {
        let extractor = GeminiExtractor::new(config.gemini.clone())?;
        let recipe = extractor.extract(&images).await?;
        println!("{}", serde_json::to_string_pretty(&recipe)?);
        return Ok(());
    }

    let pipeline = crate::build_pipeline(config)?;
    match pipeline.process(&images).await {
        Ok(outcome) => {
            note_success(&format!("Saved row {}", outcome.row_id));
            print!("{}", render_recipe(&outcome.recipe));
            Ok(())
        }
        Err(failure) => {
            note_error(&failure.error.user_message());
            Err(failure.into())
        }
    }
}
