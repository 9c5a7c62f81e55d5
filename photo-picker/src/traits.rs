//! Interfaces of the external collaborators the picker drives.
//!
//! Every method is a single asynchronous call that resolves exactly once.
//! Implementations live in the application crate (or in tests); this crate
//! never touches a media store, camera or permission API directly.

use std::collections::HashMap;

use crate::error::ServiceError;
use crate::metadata::MimeStrategy;
use crate::models::{
    AssetRecord, Capability, CaptureSource, FetchFilters, PageCursor, PermissionStatus,
};

/// Parameters of a single page fetch
#[derive(Debug, Clone, PartialEq)]
pub struct PageRequest {
    /// `None` for the first page
    pub cursor: Option<PageCursor>,
    pub page_size: usize,
    pub filters: FetchFilters,
}

/// One page returned by an asset source
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Page {
    pub items: Vec<AssetRecord>,
    pub next_cursor: Option<PageCursor>,
    /// `None` when the source does not report it
    pub has_more: Option<bool>,
}

/// Paged media library
#[allow(async_fn_in_trait)]
pub trait AssetSource {
    async fn fetch_page(&self, request: &PageRequest) -> Result<Page, ServiceError>;
}

/// Raw response of the capture or downscale service, before normalization
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawMedia {
    /// May carry a `file://` prefix
    pub uri: String,
    pub width: u32,
    pub height: u32,
    pub file_name: Option<String>,
    /// Type reported by the platform, if any
    pub mime_type: Option<String>,
    /// Whether the platform persisted the file in its media store
    pub is_stored: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CaptureResponse {
    /// The user dismissed the camera or picker
    Cancelled,
    Captured(RawMedia),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaptureOptions {
    pub quality: f32,
}

/// Camera / library picker UI
#[allow(async_fn_in_trait)]
pub trait CaptureService {
    async fn capture(
        &self,
        source: CaptureSource,
        options: &CaptureOptions,
    ) -> Result<CaptureResponse, ServiceError>;

    /// How mime types of this service's responses are determined
    fn mime_strategy(&self) -> MimeStrategy {
        MimeStrategy::Extension
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DownscaleOptions {
    pub quality: f32,
    /// `None` leaves that dimension unbounded
    pub max_width: Option<u32>,
    pub max_height: Option<u32>,
}

#[allow(async_fn_in_trait)]
pub trait DownscaleService {
    async fn downscale(&self, uri: &str, options: &DownscaleOptions)
        -> Result<RawMedia, ServiceError>;

    fn mime_strategy(&self) -> MimeStrategy {
        MimeStrategy::Extension
    }
}

/// Downscale service for sessions that never resize
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDownscale;

impl DownscaleService for NoDownscale {
    async fn downscale(
        &self,
        _uri: &str,
        _options: &DownscaleOptions,
    ) -> Result<RawMedia, ServiceError> {
        Err(ServiceError::Unavailable(
            "No downscale service configured".to_string(),
        ))
    }
}

/// Platform authorization API
#[allow(async_fn_in_trait)]
pub trait PermissionService {
    async fn check(
        &self,
        capabilities: &[Capability],
    ) -> Result<HashMap<Capability, PermissionStatus>, ServiceError>;

    async fn request(&self, capability: Capability) -> Result<PermissionStatus, ServiceError>;
}
