//! Configuration and persistence for taploop.
//!
//! This module wires together the persisted data models (steps, timing,
//! hotkeys) and the loading/saving/validation helpers used throughout the
//! crate. Import from here for a convenient, stable API.
//!
//! Example:
//! use taploop::config::{self, Config};
//!
//! let cfg = config::load_config_from_path("config.json")?;

pub mod loader;
pub mod models;

// Re-export core data models
pub use models::{
    Config, HotkeyBinding, KeyAction, KeySpec, MAX_LOOP_DELAY_SECS, MAX_STEP_DELAY_SECS,
    MouseAction, MouseButton, NamedKey, Step, TimingPolicy,
};

// Re-export loader utilities
pub use loader::{
    config_schema, load_config_from_path, load_config_from_path_async, load_config_from_str,
    load_steps_from_path, load_steps_from_path_async, load_steps_from_reader, load_steps_from_str,
    save_config_to_path, save_config_to_path_async, save_steps_to_path, save_steps_to_path_async,
    save_steps_to_writer,
    steps_schema, validate_config, validate_steps, write_schema_to_writer,
};
