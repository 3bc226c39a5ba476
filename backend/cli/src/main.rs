mod check_config_cmd;
mod extract_cmd;
mod terminal_output;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use recipesnap_config::{AppConfig, ConfigError};
use recipesnap_core::UploadPipeline;
use recipesnap_gateway::{start_server, GatewayState};
use recipesnap_logging::init_logger;
use recipesnap_notion::NotionStore;
use recipesnap_understanding::GeminiExtractor;

#[derive(Parser)]
#[command(name = "recipesnap")]
#[command(about = "RecipeSnap: recipe screenshots to Notion rows")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the upload server
    Serve {
        /// Port to bind the HTTP server to (overrides PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Validate the environment and print the effective configuration
    CheckConfig,
    /// Run the pipeline on local image files
    Extract {
        /// Image files of one recipe
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Only extract and print the recipe; do not create a row
        #[arg(long)]
        dry_run: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = recipesnap_config::load();

    match &config {
        Ok(config) => init_logger(&config.logging.level, config.logging.log_dir.as_deref()),
        Err(_) => init_logger(recipesnap_config::defaults::DEFAULT_LOG_LEVEL, None),
    }

    match cli.command {
        Commands::CheckConfig => check_config_cmd::run(config),
        Commands::Serve { port } => serve(config, port).await,
        Commands::Extract { files, dry_run } => {
            let config = config.context("cannot run extraction")?;
            extract_cmd::run(&config, &files, dry_run).await
        }
    }
}

/// Build the Gemini + Notion pipeline from configuration.
pub(crate) fn build_pipeline(config: &AppConfig) -> Result<UploadPipeline> {
    let extractor = GeminiExtractor::new(config.gemini.clone())?;
    let store = NotionStore::new(config.notion.clone())?;
    Ok(UploadPipeline::new(Arc::new(extractor), Arc::new(store)))
}

/// Start the server. An invalid configuration fails here, before anything binds.
async fn serve(config: Result<AppConfig, ConfigError>, port: Option<u16>) -> Result<()> {
    let mut config = config.context("cannot start server")?;
    if let Some(port) = port {
        config.server.port = port;
    }

    info!(
        bind = %config.server.bind_address,
        port = config.server.port,
        model = %config.gemini.model,
        static_dir = %config.server.static_dir.display(),
        "Starting RecipeSnap"
    );

    let addr = config.server.addr();
    let socket_addr = tokio::net::lookup_host(&addr)
        .await
        .with_context(|| format!("cannot resolve bind address {addr}"))?
        .next()
        .with_context(|| format!("bind address {addr} resolved to nothing"))?;

    let pipeline = build_pipeline(&config)?;
    let state = GatewayState::new(pipeline, &config.server);
    start_server(socket_addr, state)
        .await
        .with_context(|| format!("server on {addr} failed"))
}
