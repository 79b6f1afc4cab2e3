use thiserror::Error;

/// Errors surfaced by lifecycle operations.
///
/// Failures inside a single firing ([`GenerationError`], [`DeliveryError`])
/// are deliberately not part of this enum: they never leave the
/// execution pipeline.
///
/// [`GenerationError`]: crate::pipeline::GenerationError
/// [`DeliveryError`]: crate::pipeline::DeliveryError
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// The `(days, time)` specification cannot be compiled into a
    /// recurrence rule. Rejected before anything is persisted.
    #[error("Invalid schedule: {0}")]
    InvalidSpec(String),

    /// No schedule with the given ID exists in the store.
    #[error("Schedule not found: {id}")]
    NotFound { id: String },

    /// The schedule document could not be written. The on-disk state
    /// is left as it was before the operation.
    #[error("Store write failed: {0}")]
    Store(#[from] std::io::Error),

    /// The schedule document could not be encoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SchedulerError>;
