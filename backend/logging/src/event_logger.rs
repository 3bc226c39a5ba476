//! Upload Event Logger
//!
//! One structured record per finished upload, under the `upload_events` target.

use chrono::{DateTime, Utc};
use recipesnap_core::{ErrorKind, UploadStage};
use serde::Serialize;
use tracing::{info, warn};

use crate::redact::redact_sensitive_data;

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UploadEvent {
    Completed {
        row_id: String,
        recipe_name: String,
        images: usize,
    },
    Failed {
        stage: UploadStage,
        kind: ErrorKind,
        message: String,
    },
}

#[derive(Debug, Serialize)]
pub struct EventLogEntry {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
    pub event: UploadEvent,
}

pub struct EventLogger;

impl EventLogger {
    /// Emit an upload event with any secrets scrubbed from its message.
    pub fn log_event(request_id: &str, mut event: UploadEvent) -> EventLogEntry {
        if let UploadEvent::Failed { message, .. } = &mut event {
            *message = redact_sensitive_data(message);
        }

        let entry = EventLogEntry {
            request_id: request_id.into(),
            timestamp: Utc::now(),
            event,
        };

        let json = serde_json::to_string(&entry).unwrap_or_default();
        match entry.event {
            UploadEvent::Completed { .. } => info!(target: "upload_events", event = %json, "Upload event"),
            UploadEvent::Failed { .. } => warn!(target: "upload_events", event = %json, "Upload event"),
        }
        entry
    }
}
