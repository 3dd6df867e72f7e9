use crate::device::CameraPosition;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScannerError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Serialization error: {0}")]
    TomlSerialization(#[from] toml::ser::Error),

    /// Camera input or output could not be attached to the session
    #[error("{details}")]
    Configuration { details: String },

    /// A still image yielded no codes
    #[error("not found")]
    DecodeEmpty,

    /// A live-frame candidate decoded to an empty string
    #[error("empty string")]
    EmptyPayload,

    #[error("Failed to lock {position} camera for configuration: {details}")]
    DeviceLock {
        position: CameraPosition,
        details: String,
    },

    #[error("{0} camera is not available")]
    DeviceUnavailable(CameraPosition),

    #[error("Scan session has already finished")]
    SessionFinished,

    #[error("System error: {message}")]
    System { message: String },
}

impl ScannerError {
    pub fn system<S: Into<String>>(message: S) -> Self {
        Self::System {
            message: message.into(),
        }
    }

    pub fn configuration<S: Into<String>>(details: S) -> Self {
        Self::Configuration {
            details: details.into(),
        }
    }

    /// Human-readable reason handed to the scan delegate
    pub fn reason(&self) -> String {
        self.to_string()
    }

    /// Whether this error ends the scan session
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ScannerError::Configuration { .. } | ScannerError::SessionFinished
        )
    }
}

pub type Result<T> = std::result::Result<T, ScannerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delegate_reasons() {
        assert_eq!(ScannerError::DecodeEmpty.reason(), "not found");
        assert_eq!(ScannerError::EmptyPayload.reason(), "empty string");
        assert_eq!(
            ScannerError::configuration("Failed to add Input").reason(),
            "Failed to add Input"
        );
    }

    #[test]
    fn test_fatal_classification() {
        assert!(ScannerError::configuration("Failed to add Output").is_fatal());
        assert!(!ScannerError::DecodeEmpty.is_fatal());
        assert!(!ScannerError::DeviceUnavailable(CameraPosition::Front).is_fatal());
    }
}
