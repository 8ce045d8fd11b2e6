// SPDX-License-Identifier: MPL-2.0
//! Capture device port definition.
//!
//! Adapters wrap a platform camera API. The session in
//! [`crate::application::camera_session`] owns at most one open
//! [`VideoStream`] at a time.
//!
//! # Design Notes
//!
//! - `open` blocks; callers run it on a worker, never on the UI thread
//! - `latest_frame` never blocks; it returns the newest decoded frame if any
//! - `failure` reports a stream that died after a successful open
//! - `stop` must be idempotent

use crate::domain::image::Frame;
use crate::error::GradingError;
use std::fmt;

/// Which way the requested camera should face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Facing {
    /// Rear camera, pointing away from the user.
    #[default]
    Environment,
}

/// Errors raised while acquiring a capture device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CameraError {
    /// This build has no camera backend.
    NoBackend,
    /// The OS refused access to the device.
    PermissionDenied(String),
    /// The device exists but could not be configured or streamed.
    Device(String),
}

impl fmt::Display for CameraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CameraError::NoBackend => write!(
                f,
                "no camera backend in this build (rebuild with --features v4l2)"
            ),
            CameraError::PermissionDenied(msg) => write!(f, "permission denied: {msg}"),
            CameraError::Device(msg) => write!(f, "device error: {msg}"),
        }
    }
}

impl std::error::Error for CameraError {}

impl From<CameraError> for GradingError {
    fn from(err: CameraError) -> Self {
        GradingError::CameraUnavailable(err.to_string())
    }
}

impl From<std::io::Error> for CameraError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::PermissionDenied => CameraError::PermissionDenied(err.to_string()),
            _ => CameraError::Device(err.to_string()),
        }
    }
}

/// A live stream opened from a [`CaptureDevice`].
pub trait VideoStream: Send {
    /// Native resolution of the stream, if the device reported one.
    fn resolution(&self) -> Option<(u32, u32)>;

    /// Returns the newest frame without blocking, or `None` if no frame has
    /// been decoded yet.
    fn latest_frame(&mut self) -> Option<Frame>;

    /// Error that ended the stream, if it stopped delivering frames.
    fn failure(&self) -> Option<CameraError> {
        None
    }

    /// Halts all tracks and releases the device. Safe to call twice.
    fn stop(&mut self);
}

/// Port for opening a capture device.
pub trait CaptureDevice: Send + Sync {
    /// Opens a stream facing the requested direction.
    ///
    /// # Errors
    ///
    /// Returns a [`CameraError`] when no device can be acquired.
    fn open(&self, facing: Facing) -> Result<Box<dyn VideoStream>, CameraError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camera_error_maps_to_camera_unavailable() {
        let err: GradingError = CameraError::PermissionDenied("/dev/video0".into()).into();
        match err {
            GradingError::CameraUnavailable(msg) => assert!(msg.contains("permission denied")),
            other => panic!("expected CameraUnavailable, got {other:?}"),
        }
    }

    #[test]
    fn io_permission_error_is_classified() {
        let io = std::io::Error::from(std::io::ErrorKind::PermissionDenied);
        assert!(matches!(CameraError::from(io), CameraError::PermissionDenied(_)));

        let io = std::io::Error::from(std::io::ErrorKind::NotFound);
        assert!(matches!(CameraError::from(io), CameraError::Device(_)));
    }

    #[test]
    fn default_facing_is_rear() {
        assert_eq!(Facing::default(), Facing::Environment);
    }
}
