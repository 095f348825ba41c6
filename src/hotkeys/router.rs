use tracing::{debug, info, warn};

use crate::config::{HotkeyBinding, KeySpec};
use crate::engine::{Engine, EngineState};
use crate::error::Result;

/// Maps observed key-down events to engine start/stop intents.
///
/// The router holds no state beyond the two bound keys: the start key fires
/// only while the engine is idle, the stop key only while a countdown or run
/// is in flight, and every other key is ignored. Rebinding swaps the keys
/// without touching an in-progress run.
pub struct HotkeyRouter {
    engine: Engine,
    binding: HotkeyBinding,
}

impl HotkeyRouter {
    /// Build a router. Rejects bindings whose start and stop keys collide.
    pub fn new(engine: Engine, binding: HotkeyBinding) -> Result<Self> {
        binding.validate()?;
        Ok(Self { engine, binding })
    }

    /// The active binding.
    #[must_use]
    pub fn binding(&self) -> &HotkeyBinding {
        &self.binding
    }

    /// Replace the bound keys. The same collision rule applies; an
    /// in-progress run is unaffected.
    pub fn rebind(&mut self, binding: HotkeyBinding) -> Result<()> {
        binding.validate()?;
        info!(
            target: "taploop::hotkeys",
            start = %binding.start_key,
            stop = %binding.stop_key,
            "hotkeys rebound"
        );
        self.binding = binding;
        Ok(())
    }

    /// Route one observed key-down event.
    pub fn on_key_down(&self, key: KeySpec) {
        let state = self.engine.state();
        if key == self.binding.start_key && state == EngineState::Idle {
            debug!(target: "taploop::hotkeys", %key, "start hotkey");
            if let Err(err) = self.engine.start() {
                // The hotkey protocol is race-tolerant: surface the problem
                // in the log rather than to the key source.
                warn!(target: "taploop::hotkeys", error = %err, "start hotkey rejected");
            }
            return;
        }
        if key == self.binding.stop_key
            && matches!(state, EngineState::CountingDown | EngineState::Running)
        {
            debug!(target: "taploop::hotkeys", %key, "stop hotkey");
            self.engine.stop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{MouseAction, MouseButton, Step, TimingPolicy};
    use crate::engine::{InputSink, LogReporter, StepSequence};
    use crate::error::Error;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::time::sleep;

    struct NullSink;

    impl InputSink for NullSink {
        fn perform(&mut self, _step: &Step) -> Result<()> {
            Ok(())
        }
    }

    fn engine(steps: Vec<Step>) -> Engine {
        let mut timing = TimingPolicy::default();
        timing.set_step_delay(0.0).unwrap();
        timing.set_loop_delay(0.0).unwrap();
        timing.set_loop_count(1);
        Engine::new(
            StepSequence::from(steps),
            timing,
            Box::new(NullSink),
            Arc::new(LogReporter::new()),
        )
    }

    fn click() -> Step {
        Step::mouse(MouseButton::Left, MouseAction::Click)
    }

    #[test]
    fn rejects_colliding_binding() {
        let binding = HotkeyBinding {
            start_key: KeySpec::Char('z'),
            stop_key: KeySpec::Char('z'),
        };
        // Engine construction needs no runtime; only start() does.
        let result = HotkeyRouter::new(engine(vec![]), binding);
        assert!(matches!(result, Err(Error::HotkeyConflict(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn start_key_starts_only_while_idle() {
        let engine = engine(vec![click()]);
        let router = HotkeyRouter::new(engine.clone(), HotkeyBinding::default()).unwrap();

        router.on_key_down(KeySpec::Char('f'));
        assert_eq!(engine.state(), EngineState::CountingDown);

        // Second press mid-countdown must not spawn a second worker.
        router.on_key_down(KeySpec::Char('f'));
        assert_eq!(engine.state(), EngineState::CountingDown);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_key_cancels_a_countdown() {
        let engine = engine(vec![click()]);
        let router = HotkeyRouter::new(engine.clone(), HotkeyBinding::default()).unwrap();

        router.on_key_down(KeySpec::Char('f'));
        sleep(Duration::from_millis(500)).await;
        router.on_key_down(KeySpec::Char('q'));
        assert_eq!(engine.state(), EngineState::Stopping);
    }

    #[tokio::test(start_paused = true)]
    async fn unbound_keys_and_out_of_state_keys_are_ignored() {
        let engine = engine(vec![click()]);
        let router = HotkeyRouter::new(engine.clone(), HotkeyBinding::default()).unwrap();

        // Stop while idle: nothing to do.
        router.on_key_down(KeySpec::Char('q'));
        assert_eq!(engine.state(), EngineState::Idle);

        // Unbound key: nothing to do.
        router.on_key_down(KeySpec::Char('x'));
        assert_eq!(engine.state(), EngineState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn empty_sequence_start_is_swallowed() {
        let engine = engine(vec![]);
        let router = HotkeyRouter::new(engine.clone(), HotkeyBinding::default()).unwrap();

        router.on_key_down(KeySpec::Char('f'));
        assert_eq!(engine.state(), EngineState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn rebind_swaps_keys() {
        let engine = engine(vec![click()]);
        let mut router = HotkeyRouter::new(engine.clone(), HotkeyBinding::default()).unwrap();

        router
            .rebind(HotkeyBinding {
                start_key: KeySpec::Char('s'),
                stop_key: KeySpec::Char('x'),
            })
            .unwrap();

        router.on_key_down(KeySpec::Char('f'));
        assert_eq!(engine.state(), EngineState::Idle);
        router.on_key_down(KeySpec::Char('s'));
        assert_eq!(engine.state(), EngineState::CountingDown);
    }
}
