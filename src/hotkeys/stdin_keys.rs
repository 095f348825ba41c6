//! Stdin key source.
//!
//! Reads newline-delimited key names from standard input — the headless
//! shell's stand-in for an OS global key listener.
//!
//! Behavior:
//! - Each non-empty line is trimmed and parsed as a [`KeySpec`]
//!   (`"f"`, `"q"`, `"esc"`, ...).
//! - Parsed keys are forwarded through the event channel as key-down events.
//! - Unrecognized names are logged with `warn!` and ignored; reading
//!   continues.
//! - End Of File (EOF) or a channel send error (receiver dropped) terminates
//!   the task gracefully.
//!
//! Rationale:
//! - Works over a pipe or an interactive terminal, e.g.:
//!     printf 'f\n' | taploop --steps steps.json
//! - Backpressure is naturally respected via `sender.send(key).await`, and
//!   nothing is coalesced: a stop key pressed during a run always arrives.

use tokio::{
    io::{self, AsyncBufReadExt, BufReader},
    sync::mpsc::Sender,
    task::JoinHandle,
};
use tracing::{error, info, trace, warn};

use super::KeySource;
use crate::config::KeySpec;

/// Source that reads newline-delimited key names from stdin.
#[derive(Debug, Clone, Default)]
pub struct StdinKeySource;

impl StdinKeySource {
    /// Construct a new `StdinKeySource`.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl KeySource for StdinKeySource {
    fn name(&self) -> &'static str {
        "stdin"
    }

    fn start(&self, sender: Sender<KeySpec>) -> JoinHandle<()> {
        tokio::spawn(async move {
            info!(target: "taploop::hotkeys", "StdinKeySource task started (reading lines)");
            let stdin = io::stdin();
            let mut reader = BufReader::new(stdin);
            let mut line = String::new();

            loop {
                line.clear();
                match reader.read_line(&mut line).await {
                    Ok(0) => {
                        // EOF
                        info!(target: "taploop::hotkeys", "EOF on stdin; StdinKeySource exiting");
                        break;
                    }
                    Ok(_) => {
                        let raw = line.trim();
                        if raw.is_empty() {
                            continue;
                        }
                        match raw.parse::<KeySpec>() {
                            Ok(key) => {
                                trace!(target: "taploop::hotkeys", %key, "key-down from stdin");
                                if let Err(e) = sender.send(key).await {
                                    error!(
                                        target: "taploop::hotkeys",
                                        error = %e,
                                        "Channel closed while sending key event; terminating task"
                                    );
                                    break;
                                }
                            }
                            Err(e) => {
                                warn!(
                                    target: "taploop::hotkeys",
                                    error = %e,
                                    line = raw,
                                    "Failed to parse stdin line as a key"
                                );
                            }
                        }
                    }
                    Err(e) => {
                        warn!(
                            target: "taploop::hotkeys",
                            error = %e,
                            "Error reading from stdin; terminating task"
                        );
                        break;
                    }
                }
            }

            trace!(target: "taploop::hotkeys", "StdinKeySource task ended");
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    // Directly testing async stdin reading is non-trivial without
    // substituting the global stdin handle; keep the tests to constructor
    // and trait linkage.

    #[test]
    fn test_name_and_new() {
        let s = StdinKeySource::new();
        assert_eq!(s.name(), "stdin");
    }

    #[tokio::test]
    async fn test_spawn_returns_handle() {
        let (tx, mut rx) = mpsc::channel::<KeySpec>(1);
        let src = StdinKeySource::new();
        let handle = src.start(tx);
        handle.abort();
        assert!(rx.try_recv().is_err());
    }
}
