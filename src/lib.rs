#![forbid(unsafe_code)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

//! Taploop — a hotkey-driven multi-step input automator built on Enigo.
//!
//! Taploop replays an ordered sequence of input steps (mouse clicks/presses,
//! key presses, fixed delays) on a timed, loopable schedule. A run starts
//! with a cancellable 5-second countdown so the operator can focus the
//! target window, then loops the sequence until the configured count is
//! exhausted or a stop hotkey lands. Most implementation details live under
//! the internal modules:
//! - `config`: Persisted data models (steps, timing, hotkeys), loaders, and
//!   schema helpers.
//! - `engine`: Step sequence, input sink, status reporting, and the
//!   countdown/run/loop state machine.
//! - `hotkeys`: Key-down observation sources and the start/stop router.
//! - `error`: The crate error taxonomy.
//!
//! Use `taploop::prelude::*` to bring commonly used items into scope quickly.

/// Public module: configuration and persistence (models, loader, schemas).
pub mod config;
/// Public module: execution engine (sequence, sink, reporter, state machine).
pub mod engine;
/// Public module: crate error taxonomy.
pub mod error;
/// Public module: hotkey observation and routing.
pub mod hotkeys;

/// Crate-level constants for consumers that want to inspect package metadata at runtime.
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Returns the crate version (e.g., "0.1.0").
#[inline]
pub const fn version() -> &'static str {
    PKG_VERSION
}

/// Initialize tracing (logging) with a reasonable default.
/// - An explicit `level_override` (e.g. from a CLI flag) wins.
/// - Otherwise honors the `RUST_LOG` environment variable if set.
/// - Falls back to `info` level.
///
/// Safe to call multiple times; subsequent calls are no-ops.
pub fn init_tracing(level_override: Option<&str>) {
    use tracing::Level;
    use tracing_subscriber::fmt;

    let level = level_override
        .and_then(parse_level)
        .or_else(|| std::env::var("RUST_LOG").ok().as_deref().and_then(parse_level))
        .unwrap_or(Level::INFO);

    // Ignore the error if the global subscriber was already set.
    let _ = fmt().with_max_level(level).try_init();
}

/// Parse a simple level name (trace|debug|info|warn|error).
fn parse_level(s: &str) -> Option<tracing::Level> {
    use tracing::Level;
    match s.to_lowercase().as_str() {
        "trace" => Some(Level::TRACE),
        "debug" => Some(Level::DEBUG),
        "info" => Some(Level::INFO),
        "warn" | "warning" => Some(Level::WARN),
        "error" => Some(Level::ERROR),
        _ => None,
    }
}

/// A convenient set of exports for most consumers.
///
/// Bring this into scope with:
/// `use taploop::prelude::*;`
pub mod prelude {
    // Common result/error handling
    pub use crate::error::{Error, Result};
    pub use anyhow::Context as _;

    // Serialization
    pub use serde::{Deserialize, Serialize};

    // Tracing macros
    pub use tracing::{debug, error, info, instrument, trace, warn};

    // Timing helpers
    pub use std::time::Duration;
    pub use tokio::time::sleep;

    // External crates (namespaced) if callers want direct access
    pub use crate as taploop;
    pub use enigo;

    // Frequently used internal items
    pub use crate::config::{
        Config, HotkeyBinding, KeyAction, KeySpec, MouseAction, MouseButton, Step, TimingPolicy,
    };
    pub use crate::engine::{
        Engine, EngineState, EngineStatus, EnigoSink, InputSink, LogReporter, LoopTotal,
        StatusReporter, StepSequence,
    };
    pub use crate::hotkeys::{HotkeyRouter, KeySource, StdinKeySource};
}

#[cfg(test)]
mod tests {
    use super::parse_level;
    use tracing::Level;

    #[test]
    fn log_level_strings_parse() {
        assert_eq!(parse_level("trace"), Some(Level::TRACE));
        assert_eq!(parse_level("DEBUG"), Some(Level::DEBUG));
        assert_eq!(parse_level("info"), Some(Level::INFO));
        assert_eq!(parse_level("warn"), Some(Level::WARN));
        assert_eq!(parse_level("warning"), Some(Level::WARN));
        assert_eq!(parse_level("error"), Some(Level::ERROR));
        assert_eq!(parse_level("verbose"), None);
    }
}
