use photo_picker::{CaptureOptions, CaptureResponse, CaptureService, CaptureSource, RawMedia, ServiceError};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::path::PathBuf;

use crate::image_processing::image_dimensions;

/// Capture service for desktop builds.
///
/// There is no camera; "library picks" are served from a queue of files
/// handed in up front, and an empty queue behaves like a dismissed picker.
#[derive(Debug, Default)]
pub struct DesktopCaptureService {
    imports: RefCell<VecDeque<PathBuf>>,
}

impl DesktopCaptureService {
    pub fn new(imports: impl IntoIterator<Item = PathBuf>) -> Self {
        Self {
            imports: RefCell::new(imports.into_iter().collect()),
        }
    }
}

impl CaptureService for DesktopCaptureService {
    async fn capture(
        &self,
        source: CaptureSource,
        options: &CaptureOptions,
    ) -> Result<CaptureResponse, ServiceError> {
        if source == CaptureSource::Camera {
            return Err(ServiceError::PlatformNotSupported(
                "Camera not available on this platform".to_string(),
            ));
        }

        let Some(path) = self.imports.borrow_mut().pop_front() else {
            log::debug!("No file queued for import, treating as cancelled");
            return Ok(CaptureResponse::Cancelled);
        };

        let path = std::fs::canonicalize(&path)?;
        let (width, height) = image_dimensions(&path)?;
        log::debug!(
            "Importing {} ({}x{}, quality {})",
            path.display(),
            width,
            height,
            options.quality
        );

        Ok(CaptureResponse::Captured(RawMedia {
            uri: format!("file://{}", path.to_string_lossy()),
            width,
            height,
            file_name: path
                .file_name()
                .and_then(|n| n.to_str())
                .map(|n| n.to_string()),
            mime_type: None,
            is_stored: true,
        }))
    }
}
