//! Tessellation configuration
//!
//! Provides the engine settings, their defaults and validation, and
//! configuration file handling. Supports JSON and TOML file formats; the
//! default location is a platform-specific config directory.

use crate::error::{ConfigError, ConfigResult, SettingsError, SettingsResult};
use gcodemesh_core::units::{Units, MM_PER_INCH};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default maximum chord length for arcs in millimeters
pub const DEFAULT_CHORD_TOLERANCE_MM: f64 = 1.0;
/// Default rotary subdivision step in degrees
pub const DEFAULT_ROTARY_STEP_DEGREES: f64 = 1.0;
/// Default cap on rotary subdivisions per sub-move
pub const DEFAULT_ROTARY_MAX_STEPS: u32 = 5000;
/// Default cap on chords per arc block
pub const DEFAULT_ARC_MAX_CHORDS: u32 = 100_000;

const CONFIG_DIR_NAME: &str = "gcodemesh";
const CONFIG_FILE_NAME: &str = "config.toml";

/// Line colors per motion class
///
/// Rapid moves (G0) and cutting moves (G1-G3) each get an RGB color; both
/// share one alpha value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorPalette {
    /// RGB for rapid/traverse moves
    pub rapid: [f32; 3],
    /// RGB for feed and arc moves
    pub cutting: [f32; 3],
    /// Alpha shared by both palettes
    pub alpha: f32,
}

impl Default for ColorPalette {
    fn default() -> Self {
        Self {
            rapid: [0.87, 0.33, 0.27],
            cutting: [0.33, 0.27, 0.87],
            alpha: 0.5,
        }
    }
}

impl ColorPalette {
    /// Rapid color as RGBA
    pub fn rapid_rgba(&self) -> [f32; 4] {
        [self.rapid[0], self.rapid[1], self.rapid[2], self.alpha]
    }

    /// Cutting color as RGBA
    pub fn cutting_rgba(&self) -> [f32; 4] {
        [self.cutting[0], self.cutting[1], self.cutting[2], self.alpha]
    }

    /// Check every channel lies in [0, 1]
    pub fn validate(&self) -> ConfigResult<()> {
        let channels = [
            ("palette.rapid", &self.rapid[..]),
            ("palette.cutting", &self.cutting[..]),
            ("palette.alpha", std::slice::from_ref(&self.alpha)),
        ];
        for (key, values) in channels {
            if let Some(bad) = values.iter().find(|v| !(0.0..=1.0).contains(*v)) {
                return Err(ConfigError::ValueOutOfRange {
                    key: key.to_string(),
                    value: bad.to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Tessellation engine settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TessellationSettings {
    /// Maximum arc chord length while in millimeters (G21)
    pub chord_tolerance_mm: f64,
    /// Maximum arc chord length while in inches (G20); derived from the
    /// millimeter value when not set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chord_tolerance_inch: Option<f64>,
    /// Angular step used to subdivide rotary moves, in degrees
    pub rotary_step_degrees: f64,
    /// Upper bound on rotary subdivisions per sub-move
    pub rotary_max_steps: u32,
    /// Upper bound on chords per arc block, including every turn of a helix
    pub arc_max_chords: u32,
    /// Line colors
    pub palette: ColorPalette,
}

impl Default for TessellationSettings {
    fn default() -> Self {
        Self {
            chord_tolerance_mm: DEFAULT_CHORD_TOLERANCE_MM,
            chord_tolerance_inch: None,
            rotary_step_degrees: DEFAULT_ROTARY_STEP_DEGREES,
            rotary_max_steps: DEFAULT_ROTARY_MAX_STEPS,
            arc_max_chords: DEFAULT_ARC_MAX_CHORDS,
            palette: ColorPalette::default(),
        }
    }
}

impl TessellationSettings {
    /// Create settings with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Chord tolerance for the active unit
    pub fn chord_tolerance(&self, unit: Units) -> f64 {
        match unit {
            Units::MM => self.chord_tolerance_mm,
            Units::INCH => self
                .chord_tolerance_inch
                .unwrap_or(self.chord_tolerance_mm / MM_PER_INCH),
        }
    }

    pub fn with_chord_tolerance_mm(mut self, tolerance: f64) -> Self {
        self.chord_tolerance_mm = tolerance;
        self
    }

    pub fn with_rotary_step_degrees(mut self, degrees: f64) -> Self {
        self.rotary_step_degrees = degrees;
        self
    }

    pub fn with_rotary_max_steps(mut self, steps: u32) -> Self {
        self.rotary_max_steps = steps;
        self
    }

    pub fn with_arc_max_chords(mut self, chords: u32) -> Self {
        self.arc_max_chords = chords;
        self
    }

    /// Validate settings
    ///
    /// Tolerances and the rotary step must be finite and strictly
    /// positive; the step and chord caps must be non-zero.
    pub fn validate(&self) -> ConfigResult<()> {
        require_positive("chord_tolerance_mm", self.chord_tolerance_mm)?;
        if let Some(inch) = self.chord_tolerance_inch {
            require_positive("chord_tolerance_inch", inch)?;
        }
        require_positive("rotary_step_degrees", self.rotary_step_degrees)?;
        require_nonzero("rotary_max_steps", self.rotary_max_steps)?;
        require_nonzero("arc_max_chords", self.arc_max_chords)?;
        self.palette.validate()
    }
}

fn require_nonzero(key: &str, value: u32) -> ConfigResult<()> {
    if value == 0 {
        return Err(ConfigError::NonPositive {
            key: key.to_string(),
            value: 0.0,
        });
    }
    Ok(())
}

fn require_positive(key: &str, value: f64) -> ConfigResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive {
            key: key.to_string(),
            value,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigFormat {
    Json,
    Toml,
}

impl ConfigFormat {
    fn from_path(path: &Path) -> ConfigResult<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(Self::Json),
            Some("toml") => Ok(Self::Toml),
            other => Err(ConfigError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }
}

/// Complete application configuration
///
/// Aggregates all settings sections and provides file I/O operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Tessellation engine settings
    pub tessellation: TessellationSettings,
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Default config file location: `<config dir>/gcodemesh/config.toml`
    pub fn default_path() -> ConfigResult<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
            .ok_or_else(|| {
                ConfigError::ConfigDirectory("no platform config directory".to_string())
            })
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = ConfigFormat::from_path(path)?;
        let content = std::fs::read_to_string(path)
            .map_err(|e| SettingsError::LoadError(format!("{}: {}", path.display(), e)))?;

        let config: Self = match format {
            ConfigFormat::Json => serde_json::from_str(&content)?,
            ConfigFormat::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load from `path`, or from the default location when it exists,
    /// falling back to defaults
    pub fn load_or_default(path: Option<&Path>) -> SettingsResult<Self> {
        if let Some(path) = path {
            return Self::load_from_file(path);
        }
        match Self::default_path() {
            Ok(default) if default.exists() => Self::load_from_file(&default),
            _ => {
                debug!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match ConfigFormat::from_path(path)? {
            ConfigFormat::Json => serde_json::to_string_pretty(self)?,
            ConfigFormat::Toml => toml::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)
            .map_err(|e| SettingsError::SaveError(format!("{}: {}", path.display(), e)))?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> ConfigResult<()> {
        self.tessellation.validate()
    }
}
