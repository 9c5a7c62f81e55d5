use photo_picker::{PermissionStatus, PickerConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::AppError;

/// Statuses the desktop permission service reports
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PermissionSettings {
    pub photo: PermissionStatus,
    pub camera: PermissionStatus,
    /// Answer to an explicit request for an undetermined capability
    pub grant_on_request: bool,
}

impl Default for PermissionSettings {
    fn default() -> Self {
        Self {
            photo: PermissionStatus::Authorized,
            camera: PermissionStatus::Undetermined,
            grant_on_request: false,
        }
    }
}

/// Contents of the settings file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Where downscaled captures are written
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,
    pub permissions: PermissionSettings,
    pub picker: PickerConfig,
}

impl AppSettings {
    pub fn from_toml(s: &str) -> Result<Self, AppError> {
        Ok(toml::from_str(s)?)
    }

    /// Reads the settings file, or falls back to defaults when none is given
    pub fn load(path: Option<&Path>) -> Result<Self, AppError> {
        let Some(path) = path else {
            log::debug!("No settings file given, using defaults");
            return Ok(Self::default());
        };

        log::debug!("Loading settings from {}", path.display());
        let text = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Cannot read {}: {}", path.display(), e))
        })?;
        let settings = Self::from_toml(&text)?;
        settings.picker.validate()?;
        Ok(settings)
    }
}
