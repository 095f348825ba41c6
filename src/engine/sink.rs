use enigo::Keyboard as _;
use enigo::Mouse as _;
use enigo::{Button as EButton, Direction, Enigo, Key as EKey, Settings};
use tracing::{info, trace, warn};

use crate::config::{KeyAction, KeySpec, MouseAction, MouseButton, NamedKey, Step};
use crate::error::{Error, Result};

/// The "perform this step now" capability the engine drives.
///
/// Exactly one implementation is active per run; `Delay` steps are handled by
/// the engine's own sleep and never reach the sink.
pub trait InputSink: Send {
    /// Issue the given step against the input devices.
    fn perform(&mut self, step: &Step) -> Result<()>;
}

/// [`InputSink`] backed by Enigo, with optional dry-run mode.
/// In dry-run mode steps are only logged and no real input is injected.
pub struct EnigoSink {
    dry_run: bool,
    enigo: Option<Enigo>,
}

impl EnigoSink {
    /// Create a new sink.
    /// - `dry_run`: when true, only logs instead of simulating real input.
    #[must_use]
    pub fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            enigo: None,
        }
    }

    /// Returns whether the sink is currently in dry-run mode.
    #[must_use]
    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    fn ensure_enigo(&mut self) -> Result<&mut Enigo> {
        if self.enigo.is_none() {
            trace!(target: "taploop::sink", "Initializing Enigo");
            let enigo = Enigo::new(&Settings::default())
                .map_err(|e| Error::StepExecutionFailed(format!("failed to initialize enigo: {e}")))?;
            self.enigo = Some(enigo);
        }
        Ok(self.enigo.as_mut().expect("Enigo must be initialized"))
    }
}

impl InputSink for EnigoSink {
    fn perform(&mut self, step: &Step) -> Result<()> {
        if self.dry_run {
            info!(target: "taploop::sink", %step, "DRY-RUN perform");
            return Ok(());
        }
        match step {
            Step::Mouse { button, action } => {
                let enigo = self.ensure_enigo()?;
                trace!(target: "taploop::sink", ?button, ?action, "mouse");
                enigo
                    .button(map_mouse_button(*button), map_mouse_action(*action))
                    .map_err(|e| Error::StepExecutionFailed(e.to_string()))?;
            }
            Step::Keyboard { key, action } => {
                let enigo = self.ensure_enigo()?;
                trace!(target: "taploop::sink", %key, ?action, "keyboard");
                enigo
                    .key(map_key(*key), map_key_action(*action))
                    .map_err(|e| Error::StepExecutionFailed(e.to_string()))?;
            }
            Step::Delay { duration } => {
                // Engine-handled; reaching the sink is a caller bug but not
                // worth failing a run over.
                warn!(target: "taploop::sink", duration, "delay step routed to sink; ignoring");
            }
        }
        Ok(())
    }
}

fn map_mouse_button(btn: MouseButton) -> EButton {
    match btn {
        MouseButton::Left => EButton::Left,
        MouseButton::Right => EButton::Right,
        MouseButton::Middle => EButton::Middle,
    }
}

fn map_mouse_action(action: MouseAction) -> Direction {
    match action {
        MouseAction::Click => Direction::Click,
        MouseAction::Press => Direction::Press,
        MouseAction::Release => Direction::Release,
    }
}

fn map_key_action(action: KeyAction) -> Direction {
    match action {
        KeyAction::Press => Direction::Press,
        KeyAction::Release => Direction::Release,
    }
}

fn map_key(key: KeySpec) -> EKey {
    match key {
        KeySpec::Char(c) => EKey::Unicode(c),
        KeySpec::Named(named) => match named {
            NamedKey::Esc => EKey::Escape,
            NamedKey::Enter => EKey::Return,
            NamedKey::Space => EKey::Space,
            NamedKey::Tab => EKey::Tab,
            NamedKey::Shift => EKey::Shift,
            NamedKey::Ctrl => EKey::Control,
            NamedKey::Alt => EKey::Alt,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dry_run_performs_nothing_and_succeeds() {
        let mut sink = EnigoSink::new(true);
        assert!(sink.is_dry_run());
        sink.perform(&Step::mouse(MouseButton::Left, MouseAction::Click))
            .unwrap();
        sink.perform(&Step::keyboard(KeySpec::Char('a'), KeyAction::Press))
            .unwrap();
        assert!(sink.enigo.is_none());
    }

    #[test]
    fn named_keys_map_to_enigo_keys() {
        assert_eq!(map_key(KeySpec::Named(NamedKey::Esc)), EKey::Escape);
        assert_eq!(map_key(KeySpec::Named(NamedKey::Enter)), EKey::Return);
        assert_eq!(map_key(KeySpec::Char('x')), EKey::Unicode('x'));
    }
}
