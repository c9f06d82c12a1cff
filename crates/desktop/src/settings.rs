use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use gesture_reaction_core::shared::config::SessionConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Appearance {
    #[default]
    System,
    Dark,
    Light,
}

impl Appearance {
    pub const ALL: &[Appearance] = &[Appearance::System, Appearance::Dark, Appearance::Light];
}

impl std::fmt::Display for Appearance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Appearance::System => write!(f, "System"),
            Appearance::Dark => write!(f, "Dark"),
            Appearance::Light => write!(f, "Light"),
        }
    }
}

/// Desktop settings. Shares `settings.json` with the CLI: the session
/// fields sit at the top level and the CLI ignores the desktop-only ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(flatten)]
    pub session: SessionConfig,
    #[serde(default)]
    pub appearance: Appearance,
    #[serde(default = "default_show_landmarks")]
    pub show_landmarks: bool,
}

fn default_show_landmarks() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            session: SessionConfig::default(),
            appearance: Appearance::System,
            show_landmarks: default_show_landmarks(),
        }
    }
}

impl Settings {
    fn config_path() -> Option<PathBuf> {
        SessionConfig::default_path()
    }

    pub fn load() -> Self {
        Self::config_path()
            .map(|path| Self::load_from(&path))
            .unwrap_or_default()
    }

    /// Falls back to defaults when the file is missing or malformed.
    pub fn load_from(path: &Path) -> Self {
        let Ok(json) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        match serde_json::from_str::<Self>(&json) {
            Ok(settings) => match settings.session.gesture.validate() {
                Ok(()) => settings,
                Err(e) => {
                    log::warn!("Ignoring {}: {e}", path.display());
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Ignoring {}: {e}", path.display());
                Self::default()
            }
        }
    }

    pub fn save(&self) {
        if let Some(path) = Self::config_path() {
            self.save_to(&path);
        }
    }

    pub fn save_to(&self, path: &Path) {
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(e) = std::fs::write(path, json) {
                    log::warn!("Could not save settings to {}: {e}", path.display());
                }
            }
            Err(e) => log::warn!("Could not serialize settings: {e}"),
        }
    }
}
