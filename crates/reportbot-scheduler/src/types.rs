use chrono::{DateTime, Utc};
use reportbot_core::types::{ReportType, Tone};
use serde::{Deserialize, Serialize};

/// A persisted schedule record.
///
/// Only `active` ever changes after creation (via toggle); every other
/// field is immutable for the lifetime of the record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schedule {
    /// UUID v4 string, assigned at creation.
    pub id: String,
    pub report_type: ReportType,
    pub tone: Tone,
    /// Weekdays to fire on, 0 = Monday .. 6 = Sunday. Normalized:
    /// sorted, deduplicated, never empty.
    pub days: Vec<u8>,
    /// Local wall-clock fire time, zero-padded "HH:MM".
    pub time: String,
    #[serde(default)]
    pub notes: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl Schedule {
    /// Payload handed to the execution pipeline at each firing.
    pub fn firing_context(&self) -> FiringContext {
        FiringContext {
            schedule_id: self.id.clone(),
            report_type: self.report_type,
            tone: self.tone,
            notes: self.notes.clone(),
        }
    }
}

/// Caller-supplied fields for a new schedule. Validation happens in
/// [`RecurrenceRule::compile`](crate::trigger::RecurrenceRule::compile),
/// before the record reaches the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleSpec {
    pub report_type: ReportType,
    #[serde(default)]
    pub tone: Tone,
    pub days: Vec<u8>,
    pub time: String,
    #[serde(default)]
    pub notes: String,
}

/// Self-contained description of one firing. Owned by the timer task
/// and cloned into each spawned pipeline run, so a firing never reads
/// shared mutable state.
#[derive(Debug, Clone)]
pub struct FiringContext {
    pub schedule_id: String,
    pub report_type: ReportType,
    pub tone: Tone,
    pub notes: String,
}
