/// Failure reported by an external collaborator (asset source, capture,
/// downscale or permission service)
#[derive(Debug)]
pub enum ServiceError {
    Unavailable(String),
    PlatformNotSupported(String),
    IoError(std::io::Error),
    Other(String),
}

impl std::fmt::Display for ServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServiceError::Unavailable(msg) => write!(f, "Service unavailable: {}", msg),
            ServiceError::PlatformNotSupported(msg) => {
                write!(f, "Platform not supported: {}", msg)
            }
            ServiceError::IoError(e) => write!(f, "IO error: {}", e),
            ServiceError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for ServiceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ServiceError::IoError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ServiceError {
    fn from(err: std::io::Error) -> Self {
        ServiceError::IoError(err)
    }
}

/// Error type for picker operations
///
/// A cancelled capture and a toggle blocked by the selection cap are normal
/// outcomes and never show up here.
#[derive(Debug)]
pub enum PickerError {
    /// Page fetch failed; pager state is left as it was
    Fetch(ServiceError),
    /// Capture service failed; no asset was produced
    Capture(ServiceError),
    /// Downscale service failed; no asset was produced
    Downscale(ServiceError),
    /// Permission service could not be queried
    Permission(ServiceError),
    Config(String),
}

impl std::fmt::Display for PickerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PickerError::Fetch(e) => write!(f, "Fetch error: {}", e),
            PickerError::Capture(e) => write!(f, "Capture error: {}", e),
            PickerError::Downscale(e) => write!(f, "Downscale error: {}", e),
            PickerError::Permission(e) => write!(f, "Permission error: {}", e),
            PickerError::Config(msg) => write!(f, "Invalid configuration: {}", msg),
        }
    }
}

impl std::error::Error for PickerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PickerError::Fetch(e)
            | PickerError::Capture(e)
            | PickerError::Downscale(e)
            | PickerError::Permission(e) => Some(e),
            PickerError::Config(_) => None,
        }
    }
}
