use std::collections::HashMap;

use crate::error::PickerError;
use crate::models::{Capability, PermissionStatus};
use crate::traits::PermissionService;

/// Host application lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppState {
    #[default]
    Active,
    Inactive,
    Background,
}

/// Tracks photo and camera authorization.
///
/// Statuses start out `Undetermined` and only change through an explicit
/// request or a refresh. No status is treated as final: the user may change
/// it in the system settings at any time, so every return from the
/// background re-queries both capabilities. Passing through `Inactive` alone
/// (system dialogs, including the permission prompt) does not.
#[derive(Debug, Clone, Default)]
pub struct PermissionGate {
    photo: PermissionStatus,
    camera: PermissionStatus,
    /// Set once the app went to the background, cleared by the refresh
    backgrounded: bool,
}

impl PermissionGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self, capability: Capability) -> PermissionStatus {
        match capability {
            Capability::Photo => self.photo,
            Capability::Camera => self.camera,
        }
    }

    fn set(&mut self, capability: Capability, status: PermissionStatus) {
        let slot = match capability {
            Capability::Photo => &mut self.photo,
            Capability::Camera => &mut self.camera,
        };
        if *slot != status {
            log::debug!("{:?} permission: {:?} -> {:?}", capability, *slot, status);
        }
        *slot = status;
    }

    fn apply(&mut self, statuses: &HashMap<Capability, PermissionStatus>) {
        for capability in Capability::ALL {
            match statuses.get(&capability) {
                Some(status) => self.set(capability, *status),
                None => log::warn!("Permission check returned no status for {:?}", capability),
            }
        }
    }

    /// Queries both capabilities with a single check call.
    pub async fn refresh<P: PermissionService>(&mut self, service: &P) -> Result<(), PickerError> {
        let statuses = service
            .check(&Capability::ALL)
            .await
            .map_err(PickerError::Permission)?;
        self.apply(&statuses);
        Ok(())
    }

    /// Records a lifecycle transition and refreshes when the app became
    /// active after having been in the background.
    ///
    /// Returns whether a refresh was issued.
    pub async fn app_state_changed<P: PermissionService>(
        &mut self,
        service: &P,
        next: AppState,
    ) -> Result<bool, PickerError> {
        match next {
            AppState::Background => {
                self.backgrounded = true;
                Ok(false)
            }
            AppState::Inactive => Ok(false),
            AppState::Active if !self.backgrounded => Ok(false),
            AppState::Active => {
                log::debug!("App returned from background, refreshing permissions");
                self.refresh(service).await?;
                self.backgrounded = false;
                Ok(true)
            }
        }
    }

    /// Explicitly asks the user for `capability`.
    pub async fn request<P: PermissionService>(
        &mut self,
        service: &P,
        capability: Capability,
    ) -> Result<PermissionStatus, PickerError> {
        let status = service
            .request(capability)
            .await
            .map_err(PickerError::Permission)?;
        self.set(capability, status);
        Ok(status)
    }

    /// Returns `Authorized` right away, otherwise requests the capability.
    pub async fn ensure<P: PermissionService>(
        &mut self,
        service: &P,
        capability: Capability,
    ) -> Result<PermissionStatus, PickerError> {
        let current = self.status(capability);
        if current.is_authorized() {
            return Ok(current);
        }
        self.request(service, capability).await
    }
}
