//! RecipeSnap HTTP gateway
//!
//! Accepts recipe screenshots, runs the upload pipeline and serves the upload page.

pub mod control_ui;
pub mod error;
pub mod health_api;
pub mod server;
pub mod upload;

pub use error::{ApiError, ErrorBody};
pub use server::{build_router, start_server, GatewayState};
pub use upload::ExtractResponse;
