use thiserror::Error;

/// Crate-wide error type.
///
/// Validation errors (`InvalidRange`, `NotFound`, `EmptySequence`,
/// `HotkeyConflict`) are returned synchronously and never mutate the value
/// they were raised against. `StepExecutionFailed` is raised only from inside
/// a run and aborts it; input-injection failures are not retried.
#[derive(Debug, Error)]
pub enum Error {
    /// A setter received a value outside its accepted range.
    #[error("{name} must be within {min}..={max}, got {value}")]
    InvalidRange {
        name: &'static str,
        min: f64,
        max: f64,
        value: f64,
    },

    /// An index-addressed sequence operation referenced a missing slot.
    #[error("no step at index {0}")]
    NotFound(usize),

    /// `Engine::start` was called with zero steps to execute.
    #[error("step sequence is empty")]
    EmptySequence,

    /// A delay step was constructed or loaded with a non-positive duration.
    #[error("delay duration must be greater than zero, got {0}")]
    InvalidDuration(f64),

    /// Start and stop hotkeys resolve to the same key.
    #[error("start and stop hotkeys must differ (both are '{0}')")]
    HotkeyConflict(String),

    /// A key name could not be parsed into a known key.
    #[error("unrecognized key '{0}'")]
    UnknownKey(String),

    /// The underlying input-injection capability failed.
    #[error("input injection failed: {0}")]
    StepExecutionFailed(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;
