use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::PickerError;

/// Where an asset record came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetOrigin {
    /// Entry of a library page
    Library,
    /// Photo taken through the camera
    Camera,
    /// Item imported through the capture service's library picker
    Capture,
}

/// Canonical media record shown in the grid and handed back to the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetRecord {
    pub uri: String,
    pub width: u32,
    pub height: u32,
    pub mime_type: String,
    pub filename: String,
    pub source: AssetOrigin,
    pub is_stored: bool,
}

/// Assets are immutable once built and shared between pager, rows and selection
pub type SharedAsset = Arc<AssetRecord>;

/// Opaque continuation token handed out by an asset source
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageCursor(pub String);

impl PageCursor {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Leading action slot rendered before the assets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ControlToken {
    Camera,
    Album,
}

impl ControlToken {
    /// The capture a press on this slot starts
    pub fn capture_source(self) -> CaptureSource {
        match self {
            ControlToken::Camera => CaptureSource::Camera,
            ControlToken::Album => CaptureSource::Library,
        }
    }
}

/// A single cell of a row buffer
#[derive(Debug, Clone, PartialEq)]
pub enum Slot {
    Asset(SharedAsset),
    Control(ControlToken),
    Empty,
}

impl Slot {
    pub fn is_empty(&self) -> bool {
        matches!(self, Slot::Empty)
    }
}

/// Fixed-width display row
pub type RowBuffer = Vec<Slot>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CaptureSource {
    Camera,
    Library,
}

/// Permission domain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Capability {
    Photo,
    Camera,
}

impl Capability {
    pub const ALL: [Capability; 2] = [Capability::Photo, Capability::Camera];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionStatus {
    Authorized,
    Denied,
    Restricted,
    #[default]
    Undetermined,
}

impl PermissionStatus {
    pub fn is_authorized(self) -> bool {
        self == PermissionStatus::Authorized
    }
}

/// Reason a captured asset was turned down
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RejectionKind {
    TooLarge,
    TooSmall,
    TooLong,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationOutcome {
    Accepted(AssetRecord),
    Rejected(RejectionKind, AssetRecord),
}

impl ValidationOutcome {
    pub fn asset(&self) -> &AssetRecord {
        match self {
            ValidationOutcome::Accepted(asset) | ValidationOutcome::Rejected(_, asset) => asset,
        }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, ValidationOutcome::Accepted(_))
    }
}

/// Library grouping requested from the source (not every platform supports it)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GroupType {
    Album,
    All,
    Event,
    Faces,
    Library,
    PhotoStream,
    #[default]
    SavedPhotos,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AssetType {
    #[default]
    Photos,
    Videos,
    All,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FetchFilters {
    pub group_type: GroupType,
    pub asset_type: AssetType,
}

/// Configuration for one picker session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PickerConfig {
    /// Number of records requested per fetch
    pub page_size: usize,
    /// Slots per display row
    pub row_width: usize,
    pub maximum_selected: usize,
    /// Leading action slots, in display order
    pub control_tokens: Vec<ControlToken>,
    /// Quality passed to the capture service (0.0 - 1.0)
    pub capture_quality: f32,

    // Acceptance rules for captured assets
    pub min_width: u32,
    pub min_height: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_pixel_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_height_to_width_ratio: Option<f64>,

    // Optional downscale of captured assets
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resize_target_width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resize_target_height: Option<u32>,
    pub resize_quality: f32,

    /// Text shown when the library turned out to be empty
    pub empty_text: String,
    pub filters: FetchFilters,
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            page_size: 1000,
            row_width: 3,
            maximum_selected: 15,
            control_tokens: vec![ControlToken::Camera, ControlToken::Album],
            capture_quality: 1.0,
            min_width: 0,
            min_height: 0,
            max_width: None,
            max_height: None,
            max_pixel_count: None,
            max_height_to_width_ratio: None,
            resize_target_width: None,
            resize_target_height: None,
            resize_quality: 1.0,
            empty_text: "No photos.".to_string(),
            filters: FetchFilters::default(),
        }
    }
}

impl PickerConfig {
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    pub fn from_toml(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    /// Whether captured assets go through the downscale service
    pub fn resize_enabled(&self) -> bool {
        self.resize_target_width.is_some() || self.resize_target_height.is_some()
    }

    /// Rejects settings the controller cannot work with
    pub fn validate(&self) -> Result<(), PickerError> {
        if self.row_width == 0 {
            return Err(PickerError::Config("row_width must be at least 1".into()));
        }
        if self.page_size == 0 {
            return Err(PickerError::Config("page_size must be at least 1".into()));
        }
        for (name, quality) in [
            ("capture_quality", self.capture_quality),
            ("resize_quality", self.resize_quality),
        ] {
            if !(0.0..=1.0).contains(&quality) {
                return Err(PickerError::Config(format!(
                    "{} must be between 0.0 and 1.0, got {}",
                    name, quality
                )));
            }
        }
        if let Some(ratio) = self.max_height_to_width_ratio {
            if ratio.is_nan() || ratio <= 0.0 {
                return Err(PickerError::Config(format!(
                    "max_height_to_width_ratio must be positive, got {}",
                    ratio
                )));
            }
        }
        Ok(())
    }
}
