// SPDX-License-Identifier: MPL-2.0
//! `mango_grader` is a desktop client that grades mangoes through a remote
//! prediction API, built with the Iced GUI framework.
//!
//! The user supplies one photo (uploaded or captured from a camera) and four
//! measurements; the service answers with sweetness, defect percentage,
//! volume and a quality grade.
//!
//! # Layers
//!
//! - [`domain`]: plain data (photos, measurements, prediction results)
//! - [`application`]: the grading workflow and the port traits it needs
//! - [`infrastructure`]: adapters for HTTP, previews and capture devices
//! - [`app`] and [`ui`]: the Iced window

#![doc(html_root_url = "https://docs.rs/mango_grader/0.1.0")]

pub mod app;
pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod i18n;
pub mod infrastructure;
pub mod ui;
