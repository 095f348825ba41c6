use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::config::{Step, TimingPolicy};
use crate::engine::reporter::{EngineStatus, LoopTotal, StatusReporter};
use crate::engine::sequence::StepSequence;
use crate::engine::sink::InputSink;
use crate::error::{Error, Result};

/// Seconds between a successful `start()` and the first loop, giving the
/// operator time to focus the target window.
pub const COUNTDOWN_SECS: u32 = 5;

/// Externally observable engine lifecycle state.
///
/// `Stopping` marks a pending cancellation: the worker has not yet reached a
/// checkpoint. It always resolves to `Idle` within one in-flight sleep.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum EngineState {
    Idle,
    CountingDown,
    Running,
    Stopping,
}

/// The countdown/run/loop state machine.
///
/// `Engine` is a cheap clone (shared inner); `start`, `stop`, and `state` are
/// safe to call from any task or thread. At most one worker is ever in
/// flight: only the `Idle -> CountingDown` transition spawns one, and only
/// the worker restores `Idle`.
///
/// The sequence and timing are snapshotted when a run starts, so edits made
/// while a run is live take effect on the next run, never mid-run.
#[derive(Clone)]
pub struct Engine {
    inner: Arc<Inner>,
}

struct Inner {
    state: Mutex<EngineState>,
    cancel: Mutex<CancellationToken>,
    sequence: Mutex<StepSequence>,
    timing: Mutex<TimingPolicy>,
    sink: Mutex<Box<dyn InputSink>>,
    reporter: Arc<dyn StatusReporter>,
}

impl Inner {
    fn lock_state(&self) -> MutexGuard<'_, EngineState> {
        self.state.lock().expect("engine state lock poisoned")
    }

    fn lock_cancel(&self) -> MutexGuard<'_, CancellationToken> {
        self.cancel.lock().expect("cancel token lock poisoned")
    }

    fn lock_sequence(&self) -> MutexGuard<'_, StepSequence> {
        self.sequence.lock().expect("step sequence lock poisoned")
    }

    fn lock_timing(&self) -> MutexGuard<'_, TimingPolicy> {
        self.timing.lock().expect("timing policy lock poisoned")
    }

    fn lock_sink(&self) -> MutexGuard<'_, Box<dyn InputSink>> {
        self.sink.lock().expect("input sink lock poisoned")
    }

    /// Leave the state machine at `Idle` and publish the terminal status.
    fn finish(&self, status: EngineStatus) {
        *self.lock_state() = EngineState::Idle;
        self.reporter.on_status(status);
    }

    /// Countdown aborted: back to `Idle` with a cleared countdown display
    /// and zero input actions performed.
    fn cancel_countdown(&self) {
        *self.lock_state() = EngineState::Idle;
        self.reporter.on_countdown("");
        self.reporter.on_status(EngineStatus::Cancelled);
    }
}

impl Engine {
    /// Build an engine around a sequence, timing policy, input sink, and
    /// status observer.
    #[must_use]
    pub fn new(
        sequence: StepSequence,
        timing: TimingPolicy,
        sink: Box<dyn InputSink>,
        reporter: Arc<dyn StatusReporter>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(EngineState::Idle),
                cancel: Mutex::new(CancellationToken::new()),
                sequence: Mutex::new(sequence),
                timing: Mutex::new(timing),
                sink: Mutex::new(sink),
                reporter,
            }),
        }
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> EngineState {
        *self.inner.lock_state()
    }

    /// The live step sequence. Intended to be edited while the engine is
    /// idle; a running worker only ever sees its start-time snapshot.
    ///
    /// Lock ordering: the engine acquires this lock before its state lock,
    /// so `state()` and `stop()` are safe to call while the guard is held.
    /// Do not call `start()` while holding it; the same thread would
    /// re-lock the sequence.
    pub fn sequence(&self) -> MutexGuard<'_, StepSequence> {
        self.inner.lock_sequence()
    }

    /// The live timing policy. Same editing convention and lock ordering as
    /// [`Self::sequence`].
    pub fn timing(&self) -> MutexGuard<'_, TimingPolicy> {
        self.inner.lock_timing()
    }

    /// Begin a countdown-then-run on a background task.
    ///
    /// Fails with [`Error::EmptySequence`] when there is nothing to execute.
    /// A start while anything is already in flight is a no-op, not an error:
    /// the hotkey protocol must tolerate redundant presses.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start(&self) -> Result<()> {
        // Snapshot before taking the state lock: the sequence and timing
        // guards are public, and they are always acquired before the state
        // lock, never after it.
        let steps = self.inner.lock_sequence().clone();
        let timing = self.inner.lock_timing().clone();

        let mut state = self.inner.lock_state();
        if *state != EngineState::Idle {
            debug!(target: "taploop::engine", state = ?*state, "start ignored; not idle");
            return Ok(());
        }
        if steps.is_empty() {
            return Err(Error::EmptySequence);
        }

        let token = CancellationToken::new();
        *self.inner.lock_cancel() = token.clone();
        *state = EngineState::CountingDown;
        drop(state);

        info!(
            target: "taploop::engine",
            steps = steps.len(),
            loop_count = timing.loop_count(),
            "starting countdown"
        );
        let inner = Arc::clone(&self.inner);
        tokio::spawn(run_worker(inner, steps, timing, token));
        Ok(())
    }

    /// Request cancellation of the in-flight countdown or run.
    ///
    /// Returns immediately; the worker observes the signal at its next
    /// checkpoint (at most one in-flight sleep away) and no new step or loop
    /// iteration begins after that. A stop while idle is a no-op.
    pub fn stop(&self) {
        let mut state = self.inner.lock_state();
        match *state {
            EngineState::Idle => {
                debug!(target: "taploop::engine", "stop ignored; idle");
            }
            EngineState::Stopping => {}
            EngineState::CountingDown | EngineState::Running => {
                *state = EngineState::Stopping;
                self.inner.lock_cancel().cancel();
                info!(target: "taploop::engine", "stop requested");
            }
        }
    }
}

/// The single background worker: countdown, then the loop-bounded run.
async fn run_worker(
    inner: Arc<Inner>,
    steps: StepSequence,
    timing: TimingPolicy,
    token: CancellationToken,
) {
    inner.reporter.on_status(EngineStatus::Preparing);

    // Cancellation is observed at the top of each 1-second tick.
    for remaining in (1..=COUNTDOWN_SECS).rev() {
        if token.is_cancelled() {
            inner.cancel_countdown();
            return;
        }
        inner.reporter.on_countdown(&remaining.to_string());
        sleep(Duration::from_secs(1)).await;
    }

    // Transition under the lock so a stop() racing the final tick wins.
    {
        let mut state = inner.lock_state();
        if *state != EngineState::CountingDown {
            drop(state);
            inner.cancel_countdown();
            return;
        }
        *state = EngineState::Running;
    }
    inner.reporter.on_status(EngineStatus::Running);
    inner.reporter.on_countdown("");

    let total = LoopTotal::from_loop_count(timing.loop_count());
    let step_delay = timing.step_delay_duration();
    let loop_delay = timing.loop_delay_duration();
    let mut completed: u32 = 0;

    loop {
        if token.is_cancelled() {
            inner.finish(EngineStatus::Stopped);
            return;
        }
        if let LoopTotal::Finite(max) = total {
            if completed >= max {
                break;
            }
        }
        completed += 1;
        inner.reporter.on_loop_progress(completed, total);

        for step in steps.steps() {
            if token.is_cancelled() {
                inner.finish(EngineStatus::Stopped);
                return;
            }
            match step {
                Step::Delay { duration } => {
                    // Self-contained pause: no step_delay padding afterwards.
                    // A malformed duration must not panic the detached
                    // worker, which would strand the state machine.
                    let pause = Duration::try_from_secs_f64(*duration).unwrap_or(Duration::ZERO);
                    sleep(pause).await;
                }
                other => {
                    let outcome = inner.lock_sink().perform(other);
                    if let Err(err) = outcome {
                        error!(
                            target: "taploop::engine",
                            step = %other,
                            error = %err,
                            "step failed; aborting run"
                        );
                        inner.finish(EngineStatus::Error);
                        return;
                    }
                    sleep(step_delay).await;
                }
            }
        }

        let more_loops = match total {
            LoopTotal::Infinite => true,
            LoopTotal::Finite(max) => completed < max,
        };
        if more_loops && !token.is_cancelled() {
            sleep(loop_delay).await;
        }
    }

    inner.finish(EngineStatus::Completed);
}
