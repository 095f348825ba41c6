/*!
Execution engine for taploop.

This module wires together:
- `sequence`: the ordered, index-addressable step list
- `sink`: the "perform this step now" capability (Enigo-backed or test doubles)
- `reporter`: the observer seam the engine publishes state/progress through
- `runner`: the countdown/run/loop state machine itself

Typical usage:
- Construct an [`Engine`] with a sequence, timing policy, sink, and reporter.
- Call [`Engine::start`] / [`Engine::stop`] from anywhere (hotkeys, CLI, UI);
  redundant calls are no-ops by design.
*/

pub mod reporter;
pub mod runner;
pub mod sequence;
pub mod sink;

// Re-exports for convenient access from `taploop::engine::*`
pub use reporter::{EngineStatus, LogReporter, LoopTotal, StatusReporter};
pub use runner::{COUNTDOWN_SECS, Engine, EngineState};
pub use sequence::StepSequence;
pub use sink::{EnigoSink, InputSink};
