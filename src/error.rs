// SPDX-License-Identifier: MPL-2.0
use std::fmt;

#[derive(Debug, Clone)]
pub enum Error {
    Io(String),
    Config(String),
    Grading(GradingError),
}

/// Message shown when a transport error carries no description of its own.
pub const GENERIC_NETWORK_ERROR: &str = "Network request failed";

/// Every failure a grading attempt can surface to the user.
///
/// Each variant is converted to exactly one user-visible message at the
/// boundary of the operation that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GradingError {
    /// Submit was pressed with no photo selected or captured.
    MissingImage,

    /// At least one of the four measurement fields is empty.
    MissingMeasurements,

    /// The capture device could not be opened (permission or hardware).
    CameraUnavailable(String),

    /// The picked file could not be read from disk.
    UnreadableImage(String),

    /// The server answered with a non-success status.
    /// Carries the body text, or a message naming the status code.
    RequestFailed(String),

    /// The request never produced a usable response.
    NetworkError(String),
}

impl GradingError {
    /// Returns the i18n message key for this error type.
    pub fn i18n_key(&self) -> &'static str {
        match self {
            GradingError::MissingImage => "error-missing-image",
            GradingError::MissingMeasurements => "error-missing-measurements",
            GradingError::CameraUnavailable(_) => "error-camera-unavailable",
            GradingError::UnreadableImage(_) => "error-unreadable-image",
            GradingError::RequestFailed(_) => "error-request-failed",
            GradingError::NetworkError(_) => "error-network",
        }
    }

    /// Builds a `RequestFailed` from a non-success response.
    ///
    /// The body is shown verbatim whenever it is non-empty; otherwise the
    /// status code is the only thing worth showing.
    pub fn from_status(status: u16, body: &str) -> Self {
        if body.is_empty() {
            GradingError::RequestFailed(format!("Request failed with status {status}"))
        } else {
            GradingError::RequestFailed(body.to_string())
        }
    }

    /// Builds a `NetworkError`, falling back to a generic message.
    pub fn network(description: impl Into<String>) -> Self {
        let description = description.into();
        if description.trim().is_empty() {
            GradingError::NetworkError(GENERIC_NETWORK_ERROR.to_string())
        } else {
            GradingError::NetworkError(description)
        }
    }

    /// Returns the message carried from outside the app, if any.
    ///
    /// Server and transport messages are shown verbatim; the other variants
    /// are described by their localized key alone.
    pub fn detail(&self) -> Option<&str> {
        match self {
            GradingError::RequestFailed(msg) | GradingError::NetworkError(msg) => Some(msg),
            GradingError::CameraUnavailable(msg) | GradingError::UnreadableImage(msg) => {
                Some(msg)
            }
            GradingError::MissingImage | GradingError::MissingMeasurements => None,
        }
    }
}

impl fmt::Display for GradingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GradingError::MissingImage => write!(f, "Please upload or capture a mango photo"),
            GradingError::MissingMeasurements => write!(f, "Please fill in all four measurements"),
            GradingError::CameraUnavailable(msg) => write!(f, "Camera unavailable: {}", msg),
            GradingError::UnreadableImage(msg) => write!(f, "Could not read image: {}", msg),
            GradingError::RequestFailed(msg) => write!(f, "{}", msg),
            GradingError::NetworkError(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for GradingError {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O Error: {}", e),
            Error::Config(e) => write!(f, "Config Error: {}", e),
            Error::Grading(e) => write!(f, "Grading Error: {}", e),
        }
    }
}

impl std::error::Error for Error {}

impl From<GradingError> for Error {
    fn from(err: GradingError) -> Self {
        Error::Grading(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
