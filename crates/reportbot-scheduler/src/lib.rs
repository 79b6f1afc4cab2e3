//! `reportbot-scheduler` — persistent recurring-report scheduler.
//!
//! # Overview
//!
//! Schedules ("send report type X with tone Y on days {Mon, Wed} at
//! 09:00") are persisted to a single JSON document and restored on
//! startup. Each active schedule owns one armed timer task; when a
//! timer fires, the execution pipeline assembles the current activity
//! summary, asks the generation backend for a draft, and hands the
//! result to the mail collaborator. Failures inside a firing are
//! contained: they are logged against the schedule id and never touch
//! the store, the timer, or any other schedule.
//!
//! # Pieces
//!
//! | Module     | Responsibility                                      |
//! |------------|-----------------------------------------------------|
//! | `store`    | Durable schedule document (full read / full write)  |
//! | `trigger`  | `(days, time)` -> recurrence rule + next-fire math  |
//! | `registry` | Armed timer tasks, one per active schedule          |
//! | `pipeline` | Context -> generate -> deliver, error containment   |
//! | `facade`   | Lifecycle operations keeping store + timers in sync |

pub mod error;
pub mod facade;
pub mod pipeline;
pub mod registry;
pub mod store;
pub mod trigger;
pub mod types;

pub use error::{Result, SchedulerError};
pub use facade::Scheduler;
pub use pipeline::{
    ActivitySource, DeliveryError, GenerationError, ReportGenerator, ReportMailer, ReportPipeline,
};
pub use registry::JobRegistry;
pub use store::ScheduleStore;
pub use trigger::RecurrenceRule;
pub use types::{FiringContext, Schedule, ScheduleSpec};
