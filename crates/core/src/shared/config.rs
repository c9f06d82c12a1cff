use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::gesture::domain::gesture::GestureLabel;
use crate::shared::constants::{DEFAULT_ASSETS_DIR, SETTINGS_DIR_NAME};

pub const DEFAULT_TOUCHING_HEAD_MARGIN: f64 = 0.05;
pub const DEFAULT_REACTION_DURATION_SECS: f64 = 2.0;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Fixed confidence reported for each recognized gesture.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Confidences {
    pub thumbs_up: f64,
    pub pointing: f64,
    pub touching_head: f64,
}

impl Default for Confidences {
    fn default() -> Self {
        Self {
            thumbs_up: 0.95,
            pointing: 0.90,
            touching_head: 0.92,
        }
    }
}

impl Confidences {
    pub fn for_label(&self, label: GestureLabel) -> f64 {
        match label {
            GestureLabel::ThumbsUp => self.thumbs_up,
            GestureLabel::Pointing => self.pointing,
            GestureLabel::TouchingHead => self.touching_head,
            GestureLabel::None => 0.0,
        }
    }
}

/// Classifier and reaction timing constants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// How far below the forehead (in normalized y) the middle fingertip may
    /// sit and still count as touching the head.
    pub touching_head_margin: f64,
    pub reaction_duration_secs: f64,
    pub confidences: Confidences,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            touching_head_margin: DEFAULT_TOUCHING_HEAD_MARGIN,
            reaction_duration_secs: DEFAULT_REACTION_DURATION_SECS,
            confidences: Confidences::default(),
        }
    }
}

impl GestureConfig {
    /// Display window of a reaction. Only meaningful after [`validate`](Self::validate).
    pub fn reaction_duration(&self) -> Duration {
        Duration::try_from_secs_f64(self.reaction_duration_secs)
            .unwrap_or_else(|_| Duration::from_secs_f64(DEFAULT_REACTION_DURATION_SECS))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.touching_head_margin.is_finite() {
            return Err(ConfigError::Invalid {
                field: "touching_head_margin",
                reason: format!("must be finite, got {}", self.touching_head_margin),
            });
        }
        if !(self.reaction_duration_secs.is_finite() && self.reaction_duration_secs > 0.0) {
            return Err(ConfigError::Invalid {
                field: "reaction_duration_secs",
                reason: format!("must be positive, got {}", self.reaction_duration_secs),
            });
        }
        let c = &self.confidences;
        for (field, value) in [
            ("confidences.thumbs_up", c.thumbs_up),
            ("confidences.pointing", c.pointing),
            ("confidences.touching_head", c.touching_head),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("must be between 0.0 and 1.0, got {value}"),
                });
            }
        }
        Ok(())
    }
}

/// Everything a batch or live session needs besides the input itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub gesture: GestureConfig,
    /// Directory holding `<asset id>.jpg` reaction images.
    pub assets_dir: PathBuf,
    /// External landmark estimator (hand + face mesh), see the subprocess detector.
    pub landmark_program: PathBuf,
    pub landmark_args: Vec<String>,
    /// Capture device; `None` picks the platform default camera.
    pub camera_device: Option<String>,
    /// Flip camera frames for a selfie view before landmark detection.
    pub mirror: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            gesture: GestureConfig::default(),
            assets_dir: PathBuf::from(DEFAULT_ASSETS_DIR),
            landmark_program: PathBuf::from("python3"),
            landmark_args: vec!["landmark_server.py".to_string()],
            camera_device: None,
            mirror: true,
        }
    }
}

impl SessionConfig {
    /// Reads a JSON config. Missing fields keep their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: Self = serde_json::from_str(&json).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })?;
        config.gesture.validate()?;
        Ok(config)
    }

    /// Loads `path` if given, else the per-user settings file if it exists,
    /// else defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = path {
            return Self::load(path);
        }
        match Self::default_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(SETTINGS_DIR_NAME).join("settings.json"))
    }

    pub fn save(&self, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}
