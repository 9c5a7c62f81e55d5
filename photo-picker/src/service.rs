use std::sync::Arc;

use crate::capture::CapturePipeline;
use crate::error::PickerError;
use crate::models::{
    AssetRecord, Capability, CaptureSource, ControlToken, PermissionStatus, PickerConfig,
    RowBuffer, SharedAsset, ValidationOutcome,
};
use crate::pager::Pager;
use crate::permission::{AppState, PermissionGate};
use crate::rows::group;
use crate::selection::SelectionSet;
use crate::traits::{AssetSource, CaptureService, DownscaleService, PermissionService};

/// Called after every selection change with the new selection and the toggled asset
pub type SelectionCallback = Box<dyn FnMut(&[SharedAsset], &SharedAsset)>;

/// Called after the downscale stage with either the error or the resized asset
pub type ResizeCallback = Box<dyn FnMut(Option<&PickerError>, Option<&AssetRecord>)>;

/// How a capture request ended
#[derive(Debug, Clone, PartialEq)]
pub enum CaptureResult {
    /// The user dismissed the camera or picker
    Cancelled,
    /// Permission is missing; the host should offer to open the settings
    PermissionRequired(Capability, PermissionStatus),
    Completed(ValidationOutcome),
}

impl CaptureResult {
    /// The accepted asset, if any
    pub fn accepted(&self) -> Option<&AssetRecord> {
        match self {
            CaptureResult::Completed(ValidationOutcome::Accepted(asset)) => Some(asset),
            _ => None,
        }
    }
}

/// One picker session.
///
/// Owns the paged asset list, its row layout, the selection and the
/// permission state. All mutation goes through `&mut self`, so the host's
/// event loop is the only writer.
pub struct PickerController<S, C, D, P> {
    config: PickerConfig,
    source: S,
    capture: C,
    downscaler: D,
    permissions: P,
    pager: Pager,
    rows: Vec<RowBuffer>,
    selection: SelectionSet,
    gate: PermissionGate,
    pipeline: CapturePipeline,
    on_selection_changed: Option<SelectionCallback>,
    on_capture_resized: Option<ResizeCallback>,
}

impl<S, C, D, P> PickerController<S, C, D, P>
where
    S: AssetSource,
    C: CaptureService,
    D: DownscaleService,
    P: PermissionService,
{
    pub fn new(
        config: PickerConfig,
        source: S,
        capture: C,
        downscaler: D,
        permissions: P,
    ) -> Result<Self, PickerError> {
        config.validate()?;

        let pager = Pager::new(config.page_size, config.filters);
        let rows = group(pager.items(), &config.control_tokens, config.row_width);

        Ok(Self {
            pager,
            rows,
            selection: SelectionSet::new(config.maximum_selected),
            gate: PermissionGate::new(),
            pipeline: CapturePipeline::from_config(&config),
            config,
            source,
            capture,
            downscaler,
            permissions,
            on_selection_changed: None,
            on_capture_resized: None,
        })
    }

    pub fn on_selection_changed(
        &mut self,
        callback: impl FnMut(&[SharedAsset], &SharedAsset) + 'static,
    ) {
        self.on_selection_changed = Some(Box::new(callback));
    }

    pub fn on_capture_resized(
        &mut self,
        callback: impl FnMut(Option<&PickerError>, Option<&AssetRecord>) + 'static,
    ) {
        self.on_capture_resized = Some(Box::new(callback));
    }

    pub fn config(&self) -> &PickerConfig {
        &self.config
    }

    /// Initial permission refresh and first page.
    ///
    /// The first page is requested even when the permission check fails;
    /// a fetch error is reported first, then the permission error.
    pub async fn mount(&mut self) -> Result<(), PickerError> {
        let refreshed = self.gate.refresh(&self.permissions).await;
        if let Err(e) = &refreshed {
            log::error!("Initial permission check failed: {}", e);
        }
        self.request_more().await?;
        refreshed
    }

    // ---- paging ----

    /// Fetches the next page.
    ///
    /// Returns `Ok(false)` without calling the source while a fetch is in
    /// flight or the library is exhausted. Failures are returned as-is;
    /// retrying is up to the caller.
    pub async fn request_more(&mut self) -> Result<bool, PickerError> {
        let Some(request) = self.pager.begin() else {
            return Ok(false);
        };

        log::debug!(
            "Fetching page (cursor={:?}, size={})",
            request.cursor,
            request.page_size
        );
        let result = self.source.fetch_page(&request).await;
        match self.pager.finish(result) {
            Ok(appended) => {
                if appended > 0 {
                    self.regroup();
                }
                Ok(true)
            }
            Err(e) => {
                log::error!("Page fetch failed: {}", e);
                Err(PickerError::Fetch(e))
            }
        }
    }

    /// Scroll reached the end of the list
    pub async fn on_end_reached(&mut self) -> Result<bool, PickerError> {
        if self.pager.is_exhausted() {
            return Ok(false);
        }
        self.request_more().await
    }

    fn regroup(&mut self) {
        self.rows = group(
            self.pager.items(),
            &self.config.control_tokens,
            self.config.row_width,
        );
    }

    pub fn rows(&self) -> &[RowBuffer] {
        &self.rows
    }

    pub fn items(&self) -> &[SharedAsset] {
        self.pager.items()
    }

    pub fn is_loading(&self) -> bool {
        self.pager.is_loading()
    }

    pub fn is_exhausted(&self) -> bool {
        self.pager.is_exhausted()
    }

    /// Changes the number of slots per row and relayouts
    pub fn set_row_width(&mut self, row_width: usize) -> Result<(), PickerError> {
        if row_width == 0 {
            return Err(PickerError::Config("row_width must be at least 1".into()));
        }
        if row_width != self.config.row_width {
            self.config.row_width = row_width;
            self.regroup();
        }
        Ok(())
    }

    pub fn show_footer_spinner(&self) -> bool {
        !self.pager.is_exhausted()
    }

    /// Text to show instead of the grid, once the library turned out empty
    pub fn empty_text(&self) -> Option<&str> {
        if self.pager.is_exhausted() && self.pager.items().is_empty() {
            Some(&self.config.empty_text)
        } else {
            None
        }
    }

    // ---- selection ----

    /// Toggles `asset` and notifies the selection observer when anything changed
    pub fn toggle_selection(&mut self, asset: &SharedAsset) -> bool {
        let (next, changed) = self.selection.toggle(asset);
        if !changed {
            return false;
        }

        self.selection = next;
        if let Some(callback) = self.on_selection_changed.as_mut() {
            callback(self.selection.assets(), asset);
        }
        true
    }

    /// Replaces the selection, e.g. with one the host kept from an earlier session.
    /// No notification is sent.
    pub fn set_selection(&mut self, assets: impl IntoIterator<Item = AssetRecord>) {
        self.selection = SelectionSet::from_assets(
            self.config.maximum_selected,
            assets.into_iter().map(Arc::new),
        );
    }

    pub fn selection(&self) -> &[SharedAsset] {
        self.selection.assets()
    }

    /// Whether the grid draws a selection marker on `uri`
    pub fn is_selected(&self, uri: &str) -> bool {
        self.selection.is_marked(uri)
    }

    // ---- permissions ----

    pub fn permission_status(&self, capability: Capability) -> PermissionStatus {
        self.gate.status(capability)
    }

    pub async fn request_permission(
        &mut self,
        capability: Capability,
    ) -> Result<PermissionStatus, PickerError> {
        self.gate.request(&self.permissions, capability).await
    }

    pub async fn refresh_permissions(&mut self) -> Result<(), PickerError> {
        self.gate.refresh(&self.permissions).await
    }

    /// Host lifecycle hook; refreshes permissions on a return to the foreground
    pub async fn app_state_changed(&mut self, state: AppState) -> Result<bool, PickerError> {
        self.gate.app_state_changed(&self.permissions, state).await
    }

    // ---- capture ----

    /// A control slot was pressed
    pub async fn press_control(&mut self, token: ControlToken) -> Result<CaptureResult, PickerError> {
        self.start_capture(token.capture_source()).await
    }

    /// Runs the capture pipeline for `source`.
    ///
    /// A camera capture first makes sure the camera is authorized. The
    /// outcome is handed back; whether an accepted asset gets selected is
    /// up to the caller.
    pub async fn start_capture(&mut self, source: CaptureSource) -> Result<CaptureResult, PickerError> {
        if source == CaptureSource::Camera {
            let status = self
                .gate
                .ensure(&self.permissions, Capability::Camera)
                .await?;
            if !status.is_authorized() {
                log::info!("Camera not authorized ({:?}), capture aborted", status);
                return Ok(CaptureResult::PermissionRequired(Capability::Camera, status));
            }
        }

        let mut on_resized = |err: Option<&PickerError>, asset: Option<&AssetRecord>| {
            if let Some(callback) = self.on_capture_resized.as_mut() {
                callback(err, asset);
            }
        };

        let outcome = self
            .pipeline
            .run(&self.capture, &self.downscaler, source, &mut on_resized)
            .await?;

        Ok(match outcome {
            Some(outcome) => CaptureResult::Completed(outcome),
            None => CaptureResult::Cancelled,
        })
    }
}
