//! gcodemesh Settings Crate
//!
//! Handles tessellation configuration, validation and config files.

pub mod config;
pub mod error;

pub use config::{
    ColorPalette, Config, TessellationSettings, DEFAULT_ARC_MAX_CHORDS,
    DEFAULT_CHORD_TOLERANCE_MM, DEFAULT_ROTARY_MAX_STEPS, DEFAULT_ROTARY_STEP_DEGREES,
};
pub use error::{ConfigError, ConfigResult, SettingsError, SettingsResult};
