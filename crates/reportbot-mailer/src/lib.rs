//! SMTP delivery for finished reports.
//!
//! One [`Mailer`] wraps an authenticated STARTTLS transport built from
//! `[mail]` config. It is the production [`ReportMailer`] handed to the
//! firing pipeline.

mod smtp;

pub use smtp::{Mailer, MailerError};

pub use reportbot_scheduler::ReportMailer;
