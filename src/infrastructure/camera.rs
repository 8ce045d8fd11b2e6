// SPDX-License-Identifier: MPL-2.0
//! Capture device selection.

use crate::application::port::{CameraError, CaptureDevice, Facing, VideoStream};
use crate::config::CameraConfig;
use std::sync::Arc;

/// Device used when no capture backend is compiled in.
///
/// Every open fails with [`CameraError::NoBackend`], which surfaces as the
/// camera-unavailable message.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableDevice;

impl CaptureDevice for UnavailableDevice {
    fn open(&self, _facing: Facing) -> Result<Box<dyn VideoStream>, CameraError> {
        Err(CameraError::NoBackend)
    }
}

/// Returns the capture device for this build.
#[cfg(feature = "v4l2")]
pub fn default_device(config: &CameraConfig) -> Arc<dyn CaptureDevice> {
    let (width, height) = config.capture_size();
    Arc::new(super::v4l2::V4l2Device::new(config.device(), width, height))
}

/// Returns the capture device for this build.
#[cfg(not(feature = "v4l2"))]
pub fn default_device(config: &CameraConfig) -> Arc<dyn CaptureDevice> {
    tracing::info!(
        device = config.device(),
        "built without a camera backend; capture is disabled"
    );
    Arc::new(UnavailableDevice)
}
