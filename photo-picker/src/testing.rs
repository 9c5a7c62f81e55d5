//! In-memory collaborators and fixtures for unit tests.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use crate::error::ServiceError;
use crate::models::{
    AssetOrigin, AssetRecord, Capability, CaptureSource, PageCursor, PermissionStatus,
    SharedAsset,
};
use crate::traits::{
    AssetSource, CaptureOptions, CaptureResponse, CaptureService, DownscaleOptions,
    DownscaleService, Page, PageRequest, PermissionService, RawMedia,
};

pub fn asset(uri: &str) -> AssetRecord {
    AssetRecord {
        uri: uri.to_string(),
        width: 100,
        height: 100,
        mime_type: "image/jpeg".to_string(),
        filename: uri.to_string(),
        source: AssetOrigin::Library,
        is_stored: true,
    }
}

pub fn shared(uri: &str) -> SharedAsset {
    Arc::new(asset(uri))
}

pub fn page(uris: &[&str], next_cursor: Option<&str>, has_more: Option<bool>) -> Page {
    Page {
        items: uris.iter().map(|uri| asset(uri)).collect(),
        next_cursor: next_cursor.map(|c| PageCursor(c.to_string())),
        has_more,
    }
}

pub fn raw_media(uri: &str, width: u32, height: u32) -> RawMedia {
    RawMedia {
        uri: uri.to_string(),
        width,
        height,
        ..RawMedia::default()
    }
}

/// Asset source replaying a fixed list of results
pub struct ScriptedSource {
    script: RefCell<VecDeque<Result<Page, ServiceError>>>,
    requests: RefCell<Vec<PageRequest>>,
}

impl ScriptedSource {
    pub fn new(script: Vec<Result<Page, ServiceError>>) -> Self {
        Self {
            script: RefCell::new(script.into()),
            requests: RefCell::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.requests.borrow().len()
    }

    pub fn cursors(&self) -> Vec<Option<String>> {
        self.requests
            .borrow()
            .iter()
            .map(|r| r.cursor.as_ref().map(|c| c.as_str().to_string()))
            .collect()
    }
}

impl AssetSource for ScriptedSource {
    async fn fetch_page(&self, request: &PageRequest) -> Result<Page, ServiceError> {
        self.requests.borrow_mut().push(request.clone());
        self.script.borrow_mut().pop_front().unwrap_or_else(|| {
            Ok(Page {
                has_more: Some(false),
                ..Page::default()
            })
        })
    }
}

/// Capture service replaying a fixed list of responses; cancels once drained
pub struct ScriptedCapture {
    script: RefCell<VecDeque<Result<CaptureResponse, ServiceError>>>,
    invocations: RefCell<Vec<(CaptureSource, CaptureOptions)>>,
}

impl ScriptedCapture {
    pub fn new(script: Vec<Result<CaptureResponse, ServiceError>>) -> Self {
        Self {
            script: RefCell::new(script.into()),
            invocations: RefCell::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.invocations.borrow().len()
    }

    pub fn last_options(&self) -> Option<CaptureOptions> {
        self.invocations.borrow().last().map(|(_, options)| *options)
    }
}

impl CaptureService for ScriptedCapture {
    async fn capture(
        &self,
        source: CaptureSource,
        options: &CaptureOptions,
    ) -> Result<CaptureResponse, ServiceError> {
        self.invocations.borrow_mut().push((source, *options));
        self.script
            .borrow_mut()
            .pop_front()
            .unwrap_or(Ok(CaptureResponse::Cancelled))
    }
}

pub struct ScriptedDownscale {
    script: RefCell<VecDeque<Result<RawMedia, ServiceError>>>,
    invocations: RefCell<Vec<(String, DownscaleOptions)>>,
}

impl ScriptedDownscale {
    pub fn new(script: Vec<Result<RawMedia, ServiceError>>) -> Self {
        Self {
            script: RefCell::new(script.into()),
            invocations: RefCell::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.invocations.borrow().len()
    }

    pub fn last_call(&self) -> Option<(String, DownscaleOptions)> {
        self.invocations.borrow().last().cloned()
    }
}

impl DownscaleService for ScriptedDownscale {
    async fn downscale(
        &self,
        uri: &str,
        options: &DownscaleOptions,
    ) -> Result<RawMedia, ServiceError> {
        self.invocations
            .borrow_mut()
            .push((uri.to_string(), *options));
        self.script
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(ServiceError::Other("script drained".to_string())))
    }
}

/// Permission service backed by a mutable status table
pub struct FakePermissions {
    statuses: RefCell<HashMap<Capability, PermissionStatus>>,
    request_result: Cell<PermissionStatus>,
    fail_checks: Cell<bool>,
    check_calls: Cell<usize>,
    request_calls: Cell<usize>,
    last_checked: RefCell<Vec<Capability>>,
}

impl FakePermissions {
    pub fn new(photo: PermissionStatus, camera: PermissionStatus) -> Self {
        Self {
            statuses: RefCell::new(HashMap::from([
                (Capability::Photo, photo),
                (Capability::Camera, camera),
            ])),
            request_result: Cell::new(PermissionStatus::Authorized),
            fail_checks: Cell::new(false),
            check_calls: Cell::new(0),
            request_calls: Cell::new(0),
            last_checked: RefCell::new(Vec::new()),
        }
    }

    /// Status the next requests resolve to
    pub fn grant_on_request(&self, status: PermissionStatus) {
        self.request_result.set(status);
    }

    /// Simulates a change in the system settings
    pub fn set_status(&self, capability: Capability, status: PermissionStatus) {
        self.statuses.borrow_mut().insert(capability, status);
    }

    pub fn fail_checks(&self, fail: bool) {
        self.fail_checks.set(fail);
    }

    pub fn check_calls(&self) -> usize {
        self.check_calls.get()
    }

    pub fn request_calls(&self) -> usize {
        self.request_calls.get()
    }

    pub fn last_checked(&self) -> Vec<Capability> {
        self.last_checked.borrow().clone()
    }
}

impl PermissionService for FakePermissions {
    async fn check(
        &self,
        capabilities: &[Capability],
    ) -> Result<HashMap<Capability, PermissionStatus>, ServiceError> {
        self.check_calls.set(self.check_calls.get() + 1);
        *self.last_checked.borrow_mut() = capabilities.to_vec();
        if self.fail_checks.get() {
            return Err(ServiceError::Unavailable("permission service down".into()));
        }

        let statuses = self.statuses.borrow();
        Ok(capabilities
            .iter()
            .filter_map(|c| statuses.get(c).map(|s| (*c, *s)))
            .collect())
    }

    async fn request(&self, capability: Capability) -> Result<PermissionStatus, ServiceError> {
        self.request_calls.set(self.request_calls.get() + 1);
        let status = self.request_result.get();
        self.statuses.borrow_mut().insert(capability, status);
        Ok(status)
    }
}
