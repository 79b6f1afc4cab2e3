//! `reportbot-activity` — foreground-application sampler.
//!
//! Periodically records which application holds focus and for how
//! long, building the activity summary that report generation draws
//! on. Sampling only produces data on macOS; elsewhere the monitor
//! runs as a no-op and summaries stay empty. Reading a summary never
//! fails: missing or unreadable session data degrades to a zeroed
//! structure.

pub mod monitor;

pub use monitor::ActivityMonitor;
