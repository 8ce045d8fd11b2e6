// SPDX-License-Identifier: MPL-2.0
//! Centralized default values for all configuration constants.
//!
//! This module serves as the single source of truth for default values
//! used across the application. Constants are organized by category.

// ==========================================================================
// Prediction API Defaults
// ==========================================================================

/// Prediction endpoint used when neither the CLI nor the config names one.
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8000/predict";

// ==========================================================================
// Camera Defaults
// ==========================================================================

/// Capture device node opened by the V4L2 backend.
pub const DEFAULT_CAMERA_DEVICE: &str = "/dev/video0";

/// Requested capture width in pixels. The device may negotiate another.
pub const DEFAULT_CAPTURE_WIDTH: u32 = 1280;

/// Requested capture height in pixels.
pub const DEFAULT_CAPTURE_HEIGHT: u32 = 720;

/// JPEG quality for camera snapshots (1-100).
pub const DEFAULT_JPEG_QUALITY: u8 = 92;

/// Minimum JPEG quality.
pub const MIN_JPEG_QUALITY: u8 = 1;

/// Maximum JPEG quality.
pub const MAX_JPEG_QUALITY: u8 = 100;

/// Viewfinder refresh interval while the camera is open (milliseconds).
pub const VIEWFINDER_REFRESH_MS: u64 = 66;
