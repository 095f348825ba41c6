use anyhow::{Context, Result, bail};
use schemars::{Schema, schema_for};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tracing::debug;

use super::models::{Config, MAX_LOOP_DELAY_SECS, MAX_STEP_DELAY_SECS, Step};
use crate::engine::StepSequence;

/// Load a step sequence from a JSON string.
pub fn load_steps_from_str(s: &str) -> Result<StepSequence> {
    let steps: StepSequence =
        serde_json::from_str(s).context("Failed to parse JSON step list")?;
    validate_steps(&steps)?;
    Ok(steps)
}

/// Load a step sequence from any reader (e.g., a file).
pub fn load_steps_from_reader<R: Read>(reader: R) -> Result<StepSequence> {
    let steps: StepSequence =
        serde_json::from_reader(reader).context("Failed to parse JSON step list from reader")?;
    validate_steps(&steps)?;
    Ok(steps)
}

/// Load a step sequence from a file path synchronously.
pub fn load_steps_from_path<P: AsRef<Path>>(path: P) -> Result<StepSequence> {
    let path_ref = path.as_ref();
    let file = File::open(path_ref)
        .with_context(|| format!("Failed to open steps file {}", path_ref.display()))?;
    let steps = load_steps_from_reader(file)?;
    debug!("Loaded {} steps from {}", steps.len(), path_ref.display());
    Ok(steps)
}

/// Load a step sequence from a file path asynchronously (Tokio).
pub async fn load_steps_from_path_async<P: AsRef<Path>>(path: P) -> Result<StepSequence> {
    use tokio::fs;
    let path_ref = path.as_ref();
    let bytes = fs::read(path_ref)
        .await
        .with_context(|| format!("Failed to read steps file {}", path_ref.display()))?;
    let steps: StepSequence = serde_json::from_slice(&bytes)
        .with_context(|| format!("Failed to parse JSON steps from {}", path_ref.display()))?;
    validate_steps(&steps)?;
    debug!("Loaded {} steps from {}", steps.len(), path_ref.display());
    Ok(steps)
}

/// Write a step sequence as pretty JSON.
pub fn save_steps_to_writer<W: Write>(mut writer: W, steps: &StepSequence) -> Result<()> {
    let json = serde_json::to_string_pretty(steps).context("Failed to serialize steps")?;
    writer
        .write_all(json.as_bytes())
        .context("Failed to write steps")?;
    Ok(())
}

/// Save a step sequence to a file path synchronously.
pub fn save_steps_to_path<P: AsRef<Path>>(path: P, steps: &StepSequence) -> Result<()> {
    let path_ref = path.as_ref();
    let file = File::create(path_ref)
        .with_context(|| format!("Failed to create steps file {}", path_ref.display()))?;
    save_steps_to_writer(file, steps)?;
    debug!("Saved {} steps to {}", steps.len(), path_ref.display());
    Ok(())
}

/// Save a step sequence to a file path asynchronously (Tokio).
pub async fn save_steps_to_path_async<P: AsRef<Path>>(path: P, steps: &StepSequence) -> Result<()> {
    use tokio::fs;
    let path_ref = path.as_ref();
    let json = serde_json::to_string_pretty(steps).context("Failed to serialize steps")?;
    fs::write(path_ref, json)
        .await
        .with_context(|| format!("Failed to write steps file {}", path_ref.display()))?;
    debug!("Saved {} steps to {}", steps.len(), path_ref.display());
    Ok(())
}

/// Load session settings from a JSON string.
pub fn load_config_from_str(s: &str) -> Result<Config> {
    let cfg: Config = serde_json::from_str(s).context("Failed to parse JSON config")?;
    validate_config(&cfg)?;
    Ok(cfg)
}

/// Load session settings from a file path synchronously.
pub fn load_config_from_path<P: AsRef<Path>>(path: P) -> Result<Config> {
    let path_ref = path.as_ref();
    let file = File::open(path_ref)
        .with_context(|| format!("Failed to open config file {}", path_ref.display()))?;
    let cfg: Config =
        serde_json::from_reader(file).context("Failed to parse JSON config from reader")?;
    validate_config(&cfg)?;
    debug!("Loaded config from {}", path_ref.display());
    Ok(cfg)
}

/// Load session settings from a file path asynchronously (Tokio).
pub async fn load_config_from_path_async<P: AsRef<Path>>(path: P) -> Result<Config> {
    use tokio::fs;
    let path_ref = path.as_ref();
    let bytes = fs::read(path_ref)
        .await
        .with_context(|| format!("Failed to read config file {}", path_ref.display()))?;
    let cfg: Config = serde_json::from_slice(&bytes)
        .with_context(|| format!("Failed to parse JSON config from {}", path_ref.display()))?;
    validate_config(&cfg)?;
    debug!("Loaded config from {}", path_ref.display());
    Ok(cfg)
}

/// Save session settings to a file path synchronously.
pub fn save_config_to_path<P: AsRef<Path>>(path: P, cfg: &Config) -> Result<()> {
    let path_ref = path.as_ref();
    let json = serde_json::to_string_pretty(cfg).context("Failed to serialize config")?;
    std::fs::write(path_ref, json)
        .with_context(|| format!("Failed to write config file {}", path_ref.display()))?;
    debug!("Saved config to {}", path_ref.display());
    Ok(())
}

/// Save session settings to a file path asynchronously (Tokio).
pub async fn save_config_to_path_async<P: AsRef<Path>>(path: P, cfg: &Config) -> Result<()> {
    use tokio::fs;
    let path_ref = path.as_ref();
    let json = serde_json::to_string_pretty(cfg).context("Failed to serialize config")?;
    fs::write(path_ref, json)
        .await
        .with_context(|| format!("Failed to write config file {}", path_ref.display()))?;
    debug!("Saved config to {}", path_ref.display());
    Ok(())
}

/// Generate the JSON Schema for a step list (for external validation or tooling).
pub fn steps_schema() -> Schema {
    schema_for!(StepSequence)
}

/// Generate the JSON Schema for the session settings.
pub fn config_schema() -> Schema {
    schema_for!(Config)
}

/// Write a schema to any writer (pretty-printed).
pub fn write_schema_to_writer<W: Write>(mut writer: W, schema: &Schema) -> Result<()> {
    let json = serde_json::to_string_pretty(schema).context("Failed to serialize schema")?;
    writer
        .write_all(json.as_bytes())
        .context("Failed to write schema to writer")?;
    Ok(())
}

/// Sanity-check a loaded step list.
///
/// Serde enforces the tagged-variant shape; the only semantic rule a file
/// can still break is the delay-duration invariant.
pub fn validate_steps(steps: &StepSequence) -> Result<()> {
    for (idx, step) in steps.iter().enumerate() {
        if let Step::Delay { duration } = step {
            if !duration.is_finite() || *duration <= 0.0 {
                bail!(
                    "Step {} has a non-positive delay duration ({})",
                    idx,
                    duration
                );
            }
        }
    }
    Ok(())
}

/// Sanity-check loaded session settings.
///
/// Deserialization bypasses the policy setters, so re-apply their range
/// rules here, plus the hotkey-collision rule.
pub fn validate_config(cfg: &Config) -> Result<()> {
    let step_delay = cfg.timing.step_delay();
    if !step_delay.is_finite() || !(0.0..=MAX_STEP_DELAY_SECS).contains(&step_delay) {
        bail!(
            "step_delay {} is outside 0..={} seconds",
            step_delay,
            MAX_STEP_DELAY_SECS
        );
    }
    let loop_delay = cfg.timing.loop_delay();
    if !loop_delay.is_finite() || !(0.0..=MAX_LOOP_DELAY_SECS).contains(&loop_delay) {
        bail!(
            "loop_delay {} is outside 0..={} seconds",
            loop_delay,
            MAX_LOOP_DELAY_SECS
        );
    }
    cfg.hotkeys
        .validate()
        .context("Invalid hotkey binding in config")?;
    Ok(())
}
