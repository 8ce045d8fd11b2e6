// SPDX-License-Identifier: MPL-2.0
//! Port definitions (traits) for dependency inversion.
//!
//! This module defines abstract interfaces that infrastructure adapters implement.
//! These traits use only domain types, ensuring the application layer remains
//! independent of concrete implementations.
//!
//! # Available Ports
//!
//! - [`camera`]: Capture devices and live video streams
//! - [`prediction`]: The remote quality-prediction API
//! - [`preview`]: Displayable previews of the current photo
//!
//! # Design Notes
//!
//! - All traits use domain types only (no Iced handles, no `reqwest` types)
//! - Traits are `Send + Sync` so adapters can be shared with background tasks
//! - The prediction port returns a boxed `'static` future; callers wrap it in
//!   an Iced `Task`

pub mod camera;
pub mod prediction;
pub mod preview;

pub use camera::{CameraError, CaptureDevice, Facing, VideoStream};
pub use prediction::{ApiResponse, PredictionApi, PredictionForm, TransportError, IMAGE_FIELD};
pub use preview::{PreviewHandle, PreviewId, PreviewRegistry};
