//! Upload page.
//!
//! `index.html` is read from the configured static dir on each request so it
//! can be edited without a restart; the copy built into the binary is used
//! when the file is missing.

use axum::extract::State;
use axum::response::Html;
use tracing::debug;

use crate::server::GatewayState;

pub const EMBEDDED_INDEX: &str = include_str!("../../../static/index.html");

/// Handler for `GET /`
pub async fn index(State(state): State<GatewayState>) -> Html<String> {
    let path = state.static_dir.join("index.html");
    match tokio::fs::read_to_string(&path).await {
        Ok(page) => Html(page),
        Err(e) => {
            debug!(path = %path.display(), error = %e, "Serving embedded upload page");
            Html(EMBEDDED_INDEX.to_string())
        }
    }
}
