/*!
Hotkey observation and routing.

The OS-level "observe key-down events" capability is injected through the
[`KeySource`] trait: a source spawns a background task that pushes every
observed [`KeySpec`] into a channel, without coalescing — the router's
correctness depends on not missing a stop-key press during a run. The
[`HotkeyRouter`] consumes that stream and maps presses to engine intents.

Concrete source shipped here:

- `stdin_keys.rs` -> [`StdinKeySource`] (newline-delimited key names on
  standard input; the headless shell's stand-in for a global key listener)

Adding a platform listener means implementing `KeySource` over the platform's
hook API and handing it to [`spawn_key_source`]; the router is unchanged.
*/

use tokio::{sync::mpsc::Sender, task::JoinHandle};
use tracing::info;

use crate::config::KeySpec;

pub mod router;
pub mod stdin_keys;

pub use router::HotkeyRouter;
pub use stdin_keys::StdinKeySource;

/// Trait implemented by all key-down event sources.
///
/// A source spawns an asynchronous task that observes key-down events and
/// sends them into the provided channel. Tasks should never panic; log and
/// continue, or exit gracefully on unrecoverable errors. Every observed
/// event must be delivered — no coalescing or debouncing.
pub trait KeySource: Send + Sync {
    /// Static human-readable identifier (used in logs).
    fn name(&self) -> &'static str;

    /// Start observing in the background.
    fn start(&self, sender: Sender<KeySpec>) -> JoinHandle<()>;
}

/// Spawn a source, returning its `JoinHandle`.
///
/// The caller may store the handle to monitor or await termination;
/// typically the application keeps it detached and relies on process
/// lifetime / Ctrl+C for shutdown.
pub fn spawn_key_source(source: &dyn KeySource, sender: Sender<KeySpec>) -> JoinHandle<()> {
    info!(
        target: "taploop::hotkeys",
        source = %source.name(),
        "Starting key source task"
    );
    source.start(sender)
}
