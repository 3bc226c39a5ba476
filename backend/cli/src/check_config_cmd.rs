//! `recipesnap check-config`

use anyhow::{bail, Result};
use recipesnap_config::{AppConfig, ConfigError};

use crate::terminal_output::{note_error, note_success, note_warn};

/// Report whether the environment describes a runnable service.
pub fn run(config: Result<AppConfig, ConfigError>) -> Result<()> {
    match config {
        Ok(config) => {
            note_success("Configuration is valid");
            if !config.server.static_dir.join("index.html").is_file() {
                note_warn(&format!(
                    "{} has no index.html; the built-in upload page will be served",
                    config.server.static_dir.display()
                ));
            }
            println!("{}", serde_json::to_string_pretty(&config.redacted())?);
            Ok(())
        }
        Err(ConfigError::Missing(vars)) => {
            for var in &vars {
                note_error(&format!("{var} is missing (REQUIRED)"));
            }
            bail!("{} required variable(s) missing", vars.len())
        }
        Err(e) => {
            note_error(&e.to_string());
            Err(e.into())
        }
    }
}
