// SPDX-License-Identifier: MPL-2.0
//! User interface panels.
//!
//! Each panel is a plain `view` function over borrowed state with its own
//! `Message` type; `App` maps the messages into its own.

pub mod design_tokens;
pub mod image_panel;
pub mod measurement_panel;
pub mod result_panel;
pub mod styles;
