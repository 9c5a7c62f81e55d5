//! # Photo Picker
//!
//! A reusable camera-roll picker core, independent of any UI toolkit.
//!
//! This crate provides the logic behind a paged photo grid with capture
//! shortcuts, including:
//! - Cursor-based incremental fetch from a media library ([`Pager`])
//! - Fixed-width row layout with leading action slots ([`group`])
//! - Bounded multi-selection with toggle semantics ([`SelectionSet`])
//! - Photo/camera authorization tracking ([`PermissionGate`])
//! - Capture/import normalization, optional downscale and dimension
//!   validation ([`CapturePipeline`])
//!
//! ## Platform Separation
//!
//! The media store, camera, image resizer and permission API are reached
//! through the traits in [`traits`]. Platform-specific implementations
//! belong in the application crate.
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use photo_picker::{PickerConfig, PickerController};
//!
//! let config = PickerConfig {
//!     row_width: 4,
//!     maximum_selected: 5,
//!     ..PickerConfig::default()
//! };
//!
//! let mut picker = PickerController::new(config, source, camera, resizer, permissions)?;
//! picker.mount().await?;
//! for row in picker.rows() {
//!     // render row
//! }
//! ```

pub mod capture;
pub mod error;
pub mod metadata;
pub mod models;
pub mod pager;
pub mod permission;
pub mod rows;
pub mod selection;
pub mod service;
pub mod traits;

#[cfg(test)]
mod testing;

pub use capture::{CapturePipeline, ValidationRules};
pub use error::{PickerError, ServiceError};
pub use metadata::{infer_mime_type, normalize, MimeStrategy};
pub use models::{
    AssetOrigin, AssetRecord, AssetType, Capability, CaptureSource, ControlToken, FetchFilters,
    GroupType, PageCursor, PermissionStatus, PickerConfig, RejectionKind, RowBuffer, SharedAsset,
    Slot, ValidationOutcome,
};
pub use pager::Pager;
pub use permission::{AppState, PermissionGate};
pub use rows::group;
pub use selection::SelectionSet;
pub use service::{CaptureResult, PickerController};
pub use traits::{
    AssetSource, CaptureOptions, CaptureResponse, CaptureService, DownscaleOptions,
    DownscaleService, NoDownscale, Page, PageRequest, PermissionService, RawMedia,
};
