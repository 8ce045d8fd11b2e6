// SPDX-License-Identifier: MPL-2.0
//! Domain layer - grading data with no UI or I/O dependencies.
//!
//! # Modules
//!
//! - [`image`]: Photo payload ([`ImageFile`](image::ImageFile)) and camera
//!   frames ([`Frame`](image::Frame))
//! - [`measurement`]: The four measurement fields
//!   ([`Measurements`](measurement::Measurements))
//! - [`prediction`]: API results ([`PredictionResult`](prediction::PredictionResult))
//!   and the request lifecycle ([`RequestState`](prediction::RequestState))

pub mod image;
pub mod measurement;
pub mod prediction;
