//! Structured logging for RecipeSnap.
//!
//! Handles log redaction, console/JSON output, file rotation, and upload event logging.

pub mod event_logger;
pub mod logger;
pub mod redact;

pub use event_logger::{EventLogEntry, EventLogger, UploadEvent};
pub use logger::init_logger;
pub use redact::redact_sensitive_data;
