use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{Error, Result};

/// Upper bound (seconds) accepted by [`TimingPolicy::set_step_delay`].
pub const MAX_STEP_DELAY_SECS: f64 = 60.0;
/// Upper bound (seconds) accepted by [`TimingPolicy::set_loop_delay`].
pub const MAX_LOOP_DELAY_SECS: f64 = 3600.0;

/// A single recorded action.
///
/// Steps are persisted as an ordered list of tagged records, e.g.
/// `{"type": "mouse", "button": "right", "action": "click"}`, so sequences
/// round-trip losslessly between runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Step {
    /// Press, release, or click a mouse button.
    Mouse {
        button: MouseButton,
        action: MouseAction,
    },

    /// Press or release a key (symbolic or literal character).
    Keyboard { key: KeySpec, action: KeyAction },

    /// Pause for a fixed number of seconds. Self-contained: the engine does
    /// not add the per-step delay after it.
    Delay {
        /// Strictly positive duration in seconds.
        #[serde(deserialize_with = "de_delay_secs")]
        duration: f64,
    },
}

/// Every construction path rejects non-positive delays, including files:
/// deserialization goes through the same rule as [`Step::delay`].
fn de_delay_secs<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let secs = f64::deserialize(deserializer)?;
    if !secs.is_finite() || secs <= 0.0 {
        return Err(serde::de::Error::custom(format!(
            "delay duration must be greater than zero, got {secs}"
        )));
    }
    Ok(secs)
}

impl Step {
    /// A mouse step.
    #[must_use]
    pub fn mouse(button: MouseButton, action: MouseAction) -> Self {
        Self::Mouse { button, action }
    }

    /// A keyboard step.
    #[must_use]
    pub fn keyboard(key: KeySpec, action: KeyAction) -> Self {
        Self::Keyboard { key, action }
    }

    /// A delay step. Rejects non-positive and non-finite durations.
    pub fn delay(duration: f64) -> Result<Self> {
        if !duration.is_finite() || duration <= 0.0 {
            return Err(Error::InvalidDuration(duration));
        }
        Ok(Self::Delay { duration })
    }

    /// Whether this step is a pure pause.
    #[must_use]
    pub fn is_delay(&self) -> bool {
        matches!(self, Self::Delay { .. })
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mouse { button, action } => write!(f, "mouse {button:?} {action:?}"),
            Self::Keyboard { key, action } => write!(f, "key {key} {action:?}"),
            Self::Delay { duration } => write!(f, "delay {duration}s"),
        }
    }
}

/// Mouse button enumeration.
#[derive(Debug, Copy, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// What to do with a mouse button.
#[derive(Debug, Copy, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MouseAction {
    Click,
    Press,
    Release,
}

/// What to do with a key.
#[derive(Debug, Copy, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum KeyAction {
    Press,
    Release,
}

/// A key identified either by symbolic name or by literal character.
///
/// Serialized as a plain string: `"esc"`, `"enter"`, `"a"`, `"7"`.
#[derive(Debug, Copy, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(untagged)]
pub enum KeySpec {
    Named(NamedKey),
    Char(char),
}

/// The symbolic (non-character) keys a step or hotkey may reference.
#[derive(Debug, Copy, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NamedKey {
    Esc,
    Enter,
    Space,
    Tab,
    Shift,
    Ctrl,
    Alt,
}

impl NamedKey {
    /// The canonical lowercase name used in config files and on stdin.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Esc => "esc",
            Self::Enter => "enter",
            Self::Space => "space",
            Self::Tab => "tab",
            Self::Shift => "shift",
            Self::Ctrl => "ctrl",
            Self::Alt => "alt",
        }
    }
}

impl fmt::Display for KeySpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(named) => f.write_str(named.as_str()),
            Self::Char(c) => write!(f, "{c}"),
        }
    }
}

impl FromStr for KeySpec {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let named = match s {
            "esc" => Some(NamedKey::Esc),
            "enter" => Some(NamedKey::Enter),
            "space" => Some(NamedKey::Space),
            "tab" => Some(NamedKey::Tab),
            "shift" => Some(NamedKey::Shift),
            "ctrl" => Some(NamedKey::Ctrl),
            "alt" => Some(NamedKey::Alt),
            _ => None,
        };
        if let Some(named) = named {
            return Ok(Self::Named(named));
        }
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(Self::Char(c)),
            _ => Err(Error::UnknownKey(s.to_string())),
        }
    }
}

/// Step-interval, loop-interval, and loop-count settings.
///
/// The range checks on the setters are advisory UX bounds carried over from
/// the original tool; the engine itself tolerates any non-negative value that
/// arrives through deserialization (loads are re-checked by
/// [`crate::config::validate_config`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TimingPolicy {
    /// Pause after each non-delay step, in seconds.
    #[serde(default = "TimingPolicy::default_step_delay")]
    step_delay: f64,

    /// Pause between loop iterations, in seconds.
    #[serde(default = "TimingPolicy::default_loop_delay")]
    loop_delay: f64,

    /// Number of loop iterations; 0 means loop forever.
    #[serde(default)]
    loop_count: u32,
}

impl Default for TimingPolicy {
    fn default() -> Self {
        Self {
            step_delay: Self::default_step_delay(),
            loop_delay: Self::default_loop_delay(),
            loop_count: 0,
        }
    }
}

impl TimingPolicy {
    fn default_step_delay() -> f64 {
        0.5
    }

    fn default_loop_delay() -> f64 {
        0.5
    }

    /// Set the per-step pause. Fails with `InvalidRange` outside [0, 60];
    /// the previous value is kept on failure.
    pub fn set_step_delay(&mut self, seconds: f64) -> Result<()> {
        if !seconds.is_finite() || !(0.0..=MAX_STEP_DELAY_SECS).contains(&seconds) {
            return Err(Error::InvalidRange {
                name: "step_delay",
                min: 0.0,
                max: MAX_STEP_DELAY_SECS,
                value: seconds,
            });
        }
        self.step_delay = seconds;
        Ok(())
    }

    /// Set the per-loop pause. Fails with `InvalidRange` outside [0, 3600];
    /// the previous value is kept on failure.
    pub fn set_loop_delay(&mut self, seconds: f64) -> Result<()> {
        if !seconds.is_finite() || !(0.0..=MAX_LOOP_DELAY_SECS).contains(&seconds) {
            return Err(Error::InvalidRange {
                name: "loop_delay",
                min: 0.0,
                max: MAX_LOOP_DELAY_SECS,
                value: seconds,
            });
        }
        self.loop_delay = seconds;
        Ok(())
    }

    /// Set how many loops to run; 0 means infinite. Total: the unsigned type
    /// already rules out negative counts.
    pub fn set_loop_count(&mut self, count: u32) {
        self.loop_count = count;
    }

    #[must_use]
    pub fn step_delay(&self) -> f64 {
        self.step_delay
    }

    #[must_use]
    pub fn loop_delay(&self) -> f64 {
        self.loop_delay
    }

    #[must_use]
    pub fn loop_count(&self) -> u32 {
        self.loop_count
    }

    #[must_use]
    pub fn step_delay_duration(&self) -> Duration {
        Duration::from_secs_f64(self.step_delay)
    }

    #[must_use]
    pub fn loop_delay_duration(&self) -> Duration {
        Duration::from_secs_f64(self.loop_delay)
    }
}

/// The two single-key triggers that control the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct HotkeyBinding {
    /// Key whose down-event starts a run when the engine is idle.
    pub start_key: KeySpec,
    /// Key whose down-event stops a countdown or run.
    pub stop_key: KeySpec,
}

impl Default for HotkeyBinding {
    fn default() -> Self {
        Self {
            start_key: KeySpec::Char('f'),
            stop_key: KeySpec::Char('q'),
        }
    }
}

impl HotkeyBinding {
    /// Bindings with identical start and stop keys are rejected: a single
    /// press would fire both intents at once.
    pub fn validate(&self) -> Result<()> {
        if self.start_key == self.stop_key {
            return Err(Error::HotkeyConflict(self.start_key.to_string()));
        }
        Ok(())
    }
}

/// Session settings persisted alongside the step list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Config {
    /// Interval and loop-count settings.
    #[serde(default)]
    pub timing: TimingPolicy,

    /// Start/stop hotkey bindings.
    #[serde(default)]
    pub hotkeys: HotkeyBinding,
}
