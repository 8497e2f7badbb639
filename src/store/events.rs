use chrono::{DateTime, Utc};
use serde::Serialize;

/// Pipeline stage that emitted an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Received,
    Validate,
    Extract,
    Import,
    Center,
    Finalize,
}

/// One entry in a datafile's append-only processing log.
///
/// The log replaces the single overwritten status string: every stage
/// appends, nothing is lost, and the latest entry still serves as the
/// human-readable "where is my upload" answer.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessingEvent {
    pub stage: Stage,
    pub at: DateTime<Utc>,
    pub note: String,
    pub is_error: bool,
}

impl ProcessingEvent {
    pub fn progress(stage: Stage, note: impl Into<String>) -> Self {
        Self { stage, at: Utc::now(), note: note.into(), is_error: false }
    }

    pub fn error(stage: Stage, note: impl Into<String>) -> Self {
        Self { stage, at: Utc::now(), note: note.into(), is_error: true }
    }
}
