// SPDX-License-Identifier: MPL-2.0
//! Application layer - the stateful components behind the grading screen.
//!
//! - [`port`]: Trait definitions (interfaces) for dependency inversion
//! - [`image_source`]: The current photo and its preview
//! - [`camera_session`]: Live camera lifecycle and snapshots
//! - [`measurement_form`]: The four measurement inputs
//! - [`orchestrator`]: Validation, the prediction request and its state
//!
//! # Dependency Rule
//!
//! - Application layer depends on domain layer (uses domain types)
//! - Infrastructure layer implements application layer ports
//! - Presentation layer (`app`, `ui`) calls command methods on these types
//!
//! Nothing here knows about Iced, so every component is tested without a
//! window.

pub mod camera_session;
pub mod image_source;
pub mod measurement_form;
pub mod orchestrator;
pub mod port;
