// SPDX-License-Identifier: MPL-2.0
//! Widget styles shared by the panels.

pub mod button;
pub mod container;
