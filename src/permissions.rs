use photo_picker::{Capability, PermissionService, PermissionStatus, ServiceError};
use std::cell::RefCell;
use std::collections::HashMap;

use crate::config::PermissionSettings;

/// Permission service answering from the settings file.
///
/// Desktop systems have no photo or camera authorization, so the statuses
/// are configured; an explicit request settles an undetermined status.
#[derive(Debug)]
pub struct SettingsPermissions {
    statuses: RefCell<HashMap<Capability, PermissionStatus>>,
    grant_on_request: bool,
}

impl SettingsPermissions {
    pub fn from_settings(settings: &PermissionSettings) -> Self {
        Self {
            statuses: RefCell::new(HashMap::from([
                (Capability::Photo, settings.photo),
                (Capability::Camera, settings.camera),
            ])),
            grant_on_request: settings.grant_on_request,
        }
    }

    fn status(&self, capability: Capability) -> PermissionStatus {
        self.statuses
            .borrow()
            .get(&capability)
            .copied()
            .unwrap_or_default()
    }
}

impl PermissionService for SettingsPermissions {
    async fn check(
        &self,
        capabilities: &[Capability],
    ) -> Result<HashMap<Capability, PermissionStatus>, ServiceError> {
        Ok(capabilities
            .iter()
            .map(|c| (*c, self.status(*c)))
            .collect())
    }

    async fn request(&self, capability: Capability) -> Result<PermissionStatus, ServiceError> {
        let current = self.status(capability);
        if current != PermissionStatus::Undetermined {
            return Ok(current);
        }

        let status = if self.grant_on_request {
            PermissionStatus::Authorized
        } else {
            PermissionStatus::Denied
        };
        log::info!("{:?} permission requested, answering {:?}", capability, status);
        self.statuses.borrow_mut().insert(capability, status);
        Ok(status)
    }
}
