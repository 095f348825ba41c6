use std::fmt;

use tracing::info;

/// Coarse engine status pushed to observers.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum EngineStatus {
    /// Engine constructed, nothing running yet.
    Ready,
    /// Countdown in progress.
    Preparing,
    /// Countdown was cancelled before any input action.
    Cancelled,
    /// Run loop executing.
    Running,
    /// Run was stopped by the operator.
    Stopped,
    /// All requested loops finished.
    Completed,
    /// A step failed to inject; the run was aborted.
    Error,
}

impl fmt::Display for EngineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Ready => "ready",
            Self::Preparing => "preparing",
            Self::Cancelled => "cancelled",
            Self::Running => "running",
            Self::Stopped => "stopped",
            Self::Completed => "completed",
            Self::Error => "error",
        };
        f.write_str(s)
    }
}

/// How many loop iterations a run is bounded by.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LoopTotal {
    Finite(u32),
    Infinite,
}

impl LoopTotal {
    /// Map the policy's loop count (0 = infinite) to a total.
    #[must_use]
    pub fn from_loop_count(count: u32) -> Self {
        if count == 0 {
            Self::Infinite
        } else {
            Self::Finite(count)
        }
    }
}

impl fmt::Display for LoopTotal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Finite(n) => write!(f, "{n}"),
            Self::Infinite => f.write_str("infinite"),
        }
    }
}

/// Observer interface the engine publishes state and progress through.
///
/// All callbacks are invoked from the engine's worker task; a receiver that
/// cares about thread affinity (a UI, say) must marshal to its own context.
/// Implementations should return quickly and never panic.
pub trait StatusReporter: Send + Sync {
    /// A state transition ("preparing", "running", "stopped", ...).
    fn on_status(&self, status: EngineStatus);

    /// Countdown display text: "5".."1" once per second, then "" to clear.
    fn on_countdown(&self, text: &str);

    /// Progress at the top of each loop iteration.
    fn on_loop_progress(&self, current: u32, total: LoopTotal);
}

/// Reporter that forwards everything to `tracing` — the default observer for
/// the headless shell.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogReporter;

impl LogReporter {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl StatusReporter for LogReporter {
    fn on_status(&self, status: EngineStatus) {
        info!(target: "taploop::engine", %status, "status");
    }

    fn on_countdown(&self, text: &str) {
        if !text.is_empty() {
            info!(target: "taploop::engine", seconds = %text, "starting soon");
        }
    }

    fn on_loop_progress(&self, current: u32, total: LoopTotal) {
        info!(target: "taploop::engine", current, total = %total, "loop");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_displays_spec_strings() {
        let cases = [
            (EngineStatus::Ready, "ready"),
            (EngineStatus::Preparing, "preparing"),
            (EngineStatus::Cancelled, "cancelled"),
            (EngineStatus::Running, "running"),
            (EngineStatus::Stopped, "stopped"),
            (EngineStatus::Completed, "completed"),
            (EngineStatus::Error, "error"),
        ];
        for (status, expected) in cases {
            assert_eq!(status.to_string(), expected);
        }
    }

    #[test]
    fn loop_total_maps_zero_to_infinite() {
        assert_eq!(LoopTotal::from_loop_count(0), LoopTotal::Infinite);
        assert_eq!(LoopTotal::from_loop_count(3), LoopTotal::Finite(3));
        assert_eq!(LoopTotal::Infinite.to_string(), "infinite");
        assert_eq!(LoopTotal::Finite(7).to_string(), "7");
    }
}
