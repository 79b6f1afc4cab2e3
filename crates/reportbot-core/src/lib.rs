//! `reportbot-core` — shared configuration, domain types, and errors.
//!
//! Everything here is consumed by at least two sibling crates;
//! anything specific to one subsystem lives in that subsystem's crate.

pub mod config;
pub mod error;
pub mod types;

pub use config::ReportbotConfig;
pub use error::{ReportbotError, Result};
pub use types::{ActivityEntry, ActivitySummary, AppUsage, ReportType, Tone};
