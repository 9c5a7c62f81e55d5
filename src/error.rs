use photo_picker::PickerError;
use std::fmt;

/// Central error type of the picker app
#[derive(Debug)]
pub enum AppError {
    /// Settings file could not be read or parsed
    Config(String),
    /// Filesystem error
    Filesystem(std::io::Error),
    /// Error reported by the picker core
    Picker(PickerError),
    /// Output could not be produced
    Output(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::Config(msg) => write!(f, "Configuration error: {}", msg),
            AppError::Filesystem(e) => write!(f, "Filesystem error: {}", e),
            AppError::Picker(e) => write!(f, "{}", e),
            AppError::Output(msg) => write!(f, "Output error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self {
        AppError::Filesystem(e)
    }
}

impl From<PickerError> for AppError {
    fn from(e: PickerError) -> Self {
        AppError::Picker(e)
    }
}

impl From<toml::de::Error> for AppError {
    fn from(e: toml::de::Error) -> Self {
        AppError::Config(e.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::Output(e.to_string())
    }
}

/// User-friendly error messages
impl AppError {
    pub fn user_message(&self) -> String {
        match self {
            AppError::Config(msg) => format!("The settings file is invalid: {}", msg),
            AppError::Filesystem(_) => {
                "Error accessing files. Please check the library path and permissions.".to_string()
            }
            AppError::Picker(PickerError::Fetch(_)) => {
                "Could not load photos. Please try again.".to_string()
            }
            AppError::Picker(PickerError::Capture(e)) => {
                format!("The camera or photo library could not be opened: {}", e)
            }
            AppError::Picker(PickerError::Downscale(_)) => "Error processing image.".to_string(),
            AppError::Picker(PickerError::Permission(_)) => {
                "Permission status could not be determined.".to_string()
            }
            AppError::Picker(PickerError::Config(msg)) => msg.clone(),
            AppError::Output(_) => "Could not print the result.".to_string(),
        }
    }
}
