// SPDX-License-Identifier: MPL-2.0
//! Infrastructure layer adapters.
//!
//! Concrete implementations of the port traits defined in
//! `application::port`.
//!
//! # Available Adapters
//!
//! - [`http`]: Prediction API over HTTP multipart (implements [`PredictionApi`])
//! - [`preview`]: In-memory image handles for the UI (implements [`PreviewRegistry`])
//! - [`camera`]: Capture device selection (implements [`CaptureDevice`])
//!
//! [`PredictionApi`]: crate::application::port::PredictionApi
//! [`PreviewRegistry`]: crate::application::port::PreviewRegistry
//! [`CaptureDevice`]: crate::application::port::CaptureDevice

pub mod camera;
pub mod http;
pub mod preview;

#[cfg(feature = "v4l2")]
pub mod v4l2;

pub use camera::{default_device, UnavailableDevice};
pub use http::HttpPredictionApi;
pub use preview::PreviewStore;
